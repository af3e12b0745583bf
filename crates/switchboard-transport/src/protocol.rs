//! HTTP header names used by the session-keyed transport

use hyper::HeaderMap;

/// Carries the session id in both directions (`Mcp-Session-Id`)
pub const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// The session id a request names, if any; blank values count as absent
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(MCP_SESSION_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
