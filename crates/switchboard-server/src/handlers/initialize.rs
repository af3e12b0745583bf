use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use switchboard_protocol::{InitializeParams, InitializeResult, McpError, McpResult};

use super::McpHandler;
use crate::context::RequestContext;

/// Handshake: negotiates the protocol version and advertises capabilities
pub struct InitializeHandler;

/// Pick the protocol version for a client.
///
/// No requested version selects the first supported one; an unknown
/// version is rejected with the supported list attached.
pub fn negotiate_protocol_version(
    requested: Option<&str>,
    supported: &[String],
) -> McpResult<String> {
    match requested {
        None => supported
            .first()
            .cloned()
            .ok_or_else(|| McpError::configuration("No protocol versions configured")),
        Some(version) if supported.iter().any(|v| v == version) => Ok(version.to_string()),
        Some(version) => Err(McpError::UnsupportedProtocolVersion {
            requested: version.to_string(),
            supported: supported.to_vec(),
        }),
    }
}

#[async_trait]
impl McpHandler for InitializeHandler {
    async fn handle(&self, ctx: &RequestContext) -> McpResult<Value> {
        let params: InitializeParams = ctx.params()?;

        let version = negotiate_protocol_version(
            params.protocol_version.as_deref(),
            ctx.protocol_versions(),
        )
        .inspect_err(|_| {
            warn!(
                requested = ?params.protocol_version,
                "Rejecting unsupported protocol version"
            );
        })?;

        if let Some(client) = &params.client_info {
            info!(
                client = %client.name,
                client_version = %client.version,
                protocol_version = %version,
                "Client initialized"
            );
        }

        let result = InitializeResult::new(
            version,
            ctx.capabilities().clone(),
            ctx.server_info().clone(),
        )
        .with_instructions(ctx.instructions().map(str::to_string));

        ctx.response().system(&result)
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["initialize".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> Vec<String> {
        vec!["2025-06-18".into(), "2025-03-26".into(), "2024-11-05".into()]
    }

    #[test]
    fn test_omitted_version_uses_first_supported() {
        assert_eq!(
            negotiate_protocol_version(None, &supported()).unwrap(),
            "2025-06-18"
        );
    }

    #[test]
    fn test_supported_version_is_echoed() {
        assert_eq!(
            negotiate_protocol_version(Some("2024-11-05"), &supported()).unwrap(),
            "2024-11-05"
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = negotiate_protocol_version(Some("1999-01-01"), &supported()).unwrap_err();
        let object = err.to_error_object();
        assert_eq!(object.code, -32602);
        assert_eq!(object.data.unwrap()["supported"][2], "2024-11-05");
    }
}
