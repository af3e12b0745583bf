//! HTTP endpoint for the session-keyed transport.
//!
//! `POST` carries one JSON-RPC message per request, `DELETE` closes the
//! session named by the `Mcp-Session-Id` header. Every other method is
//! refused with 405.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_TYPE};
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use switchboard_json_rpc::{JsonRpcError, JsonRpcMessage, JsonRpcService, parse_json_rpc_message};

use crate::protocol::{MCP_SESSION_ID_HEADER, extract_session_id};
use crate::streamable::{Rejection, SessionTransport, TransportReply};
use crate::{Result, TransportError};

/// Configuration for the HTTP MCP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// Path for MCP endpoint
    pub mcp_path: String,
    /// Maximum request body size
    pub max_body_size: usize,
    /// Sessions idle this long are closed
    pub session_idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
            mcp_path: "/mcp".to_string(),
            max_body_size: 1024 * 1024,                          // 1MB
            session_idle_timeout: Duration::from_secs(30 * 60), // 30 minutes
        }
    }
}

/// Builder for [`HttpMcpServer`]
#[derive(Default)]
pub struct HttpMcpServerBuilder {
    config: ServerConfig,
    service: Option<Arc<dyn JsonRpcService>>,
}

impl HttpMcpServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Set the MCP endpoint path
    pub fn mcp_path(mut self, path: impl Into<String>) -> Self {
        self.config.mcp_path = path.into();
        self
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    pub fn session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.session_idle_timeout = timeout;
        self
    }

    /// The service answering requests
    pub fn service(mut self, service: Arc<dyn JsonRpcService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<HttpMcpServer> {
        let service = self
            .service
            .ok_or_else(|| TransportError::Config("A service must be provided".to_string()))?;
        if !self.config.mcp_path.starts_with('/') {
            return Err(TransportError::Config(format!(
                "MCP path must start with '/': {}",
                self.config.mcp_path
            )));
        }
        if self.config.max_body_size == 0 {
            return Err(TransportError::Config(
                "Maximum body size must be at least 1".to_string(),
            ));
        }

        Ok(HttpMcpServer {
            config: Arc::new(self.config),
            transport: SessionTransport::new(service),
        })
    }
}

/// Streamable HTTP server for a [`JsonRpcService`]
#[derive(Clone)]
pub struct HttpMcpServer {
    config: Arc<ServerConfig>,
    transport: SessionTransport,
}

impl HttpMcpServer {
    pub fn builder() -> HttpMcpServerBuilder {
        HttpMcpServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn transport(&self) -> &SessionTransport {
        &self.transport
    }

    /// Bind the configured address and serve until the listener fails
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_address).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("HTTP MCP server listening on {}", listener.local_addr()?);
        info!("MCP endpoint available at: {}", self.config.mcp_path);

        let cleanup = self.spawn_session_cleanup();
        let result = self.accept_loop(listener).await;
        cleanup.abort();
        result
    }

    async fn accept_loop(&self, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("New connection from {}", peer_addr);

            let server = self.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { Ok::<_, Infallible>(server.handle(req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    if err.is_incomplete_message() {
                        debug!("Client disconnected: {}", err);
                    } else {
                        error!("Error serving connection: {}", err);
                    }
                }
            });
        }
    }

    fn spawn_session_cleanup(&self) -> JoinHandle<()> {
        let sessions = self.transport.sessions().clone();
        let idle_timeout = self.config.session_idle_timeout;
        let period = idle_timeout
            .min(Duration::from_secs(60))
            .max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                for session_id in sessions.expire_idle(idle_timeout).await {
                    debug!(session_id = %session_id, "Expired idle session");
                }
            }
        })
    }

    /// Answer one HTTP request
    pub async fn handle<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        debug!("Handling {} {}", method, path);

        if path != self.config.mcp_path {
            return plain(StatusCode::NOT_FOUND, "Not Found");
        }

        match method {
            Method::POST => self.handle_post(request).await,
            Method::DELETE => self.handle_delete(extract_session_id(request.headers())).await,
            _ => {
                let mut response = plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("POST, DELETE"));
                response
            }
        }
    }

    async fn handle_post<B>(&self, request: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();
        let session_id = extract_session_id(&parts.headers);

        let bytes = match Limited::new(body, self.config.max_body_size).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
                warn!(limit = self.config.max_body_size, "Request body too large");
                return plain(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large");
            }
            Err(err) => {
                warn!("Failed to read request body: {}", err);
                return plain(StatusCode::BAD_REQUEST, "Bad Request");
            }
        };

        let decoded = std::str::from_utf8(&bytes)
            .map_err(|_| JsonRpcError::parse_error(None))
            .and_then(parse_json_rpc_message);
        let message = match decoded {
            Ok(message) => message,
            Err(err) => {
                debug!("Undecodable request body: {}", err);
                let status = if err.is_answerable() {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                };
                return json_response(status, &JsonRpcMessage::from(err), None);
            }
        };

        match self.transport.handle(session_id.as_deref(), message).await {
            TransportReply::Message {
                session_id,
                message,
            } => json_response(StatusCode::OK, &message, session_id.as_deref()),
            TransportReply::Accepted { session_id } => {
                let mut response = plain(StatusCode::ACCEPTED, "");
                set_session_header(&mut response, session_id.as_deref());
                response
            }
            TransportReply::Rejected { rejection, message } => {
                let status = match rejection {
                    Rejection::MissingSession => StatusCode::BAD_REQUEST,
                    Rejection::UnknownSession(_) => StatusCode::NOT_FOUND,
                };
                json_response(status, &message, None)
            }
        }
    }

    async fn handle_delete(&self, session_id: Option<String>) -> Response<Full<Bytes>> {
        let Some(session_id) = session_id else {
            return plain(StatusCode::BAD_REQUEST, "Missing Mcp-Session-Id header");
        };

        if self.transport.close(&session_id).await {
            plain(StatusCode::NO_CONTENT, "")
        } else {
            plain(StatusCode::NOT_FOUND, "Session not found")
        }
    }
}

fn plain(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(text.as_bytes())));
    *response.status_mut() = status;
    response
}

fn json_response(
    status: StatusCode,
    message: &JsonRpcMessage,
    session_id: Option<&str>,
) -> Response<Full<Bytes>> {
    let body = match serde_json::to_vec(message) {
        Ok(body) => body,
        Err(err) => {
            error!("Failed to encode response: {}", err);
            return plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    };

    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    set_session_header(&mut response, session_id);
    response
}

fn set_session_header<B>(response: &mut Response<B>, session_id: Option<&str>) {
    if let Some(value) = session_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        response.headers_mut().insert(MCP_SESSION_ID_HEADER, value);
    }
}
