//! MCP Protocol Version Support
//!
//! ## Version History
//! - **2024-11-05**: Initial MCP specification
//! - **2025-03-26**: Streamable HTTP, tool annotations, audio content
//! - **2025-06-18**: Structured tool output, resource links, titles

use serde::{Deserialize, Serialize};

/// Known MCP protocol versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum McpVersion {
    #[serde(rename = "2024-11-05")]
    V2024_11_05,
    #[serde(rename = "2025-03-26")]
    V2025_03_26,
    #[serde(rename = "2025-06-18")]
    V2025_06_18,
}

impl McpVersion {
    /// Every known version, preferred first
    pub const ALL: [McpVersion; 3] = [
        McpVersion::V2025_06_18,
        McpVersion::V2025_03_26,
        McpVersion::V2024_11_05,
    ];

    /// The version servers advertise when nothing else is configured
    pub const LATEST: McpVersion = McpVersion::V2025_06_18;

    /// Parse a version string like "2024-11-05"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "2024-11-05" => Some(McpVersion::V2024_11_05),
            "2025-03-26" => Some(McpVersion::V2025_03_26),
            "2025-06-18" => Some(McpVersion::V2025_06_18),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            McpVersion::V2024_11_05 => "2024-11-05",
            McpVersion::V2025_03_26 => "2025-03-26",
            McpVersion::V2025_06_18 => "2025-06-18",
        }
    }

    /// Version strings in preference order
    pub fn all_strings() -> Vec<String> {
        Self::ALL.iter().map(|v| v.as_str().to_string()).collect()
    }

    /// Whether tool results may carry `structuredContent`
    pub fn supports_structured_content(&self) -> bool {
        matches!(self, McpVersion::V2025_06_18)
    }
}

impl std::fmt::Display for McpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for McpVersion {
    fn default() -> Self {
        Self::LATEST
    }
}
