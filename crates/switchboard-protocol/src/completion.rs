//! MCP Completion Protocol Types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::meta::Meta;

/// Maximum number of values a single completion response may carry
pub const MAX_COMPLETION_VALUES: usize = 100;

/// What is being completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CompletionReference {
    /// A prompt, by name
    #[serde(rename = "ref/prompt")]
    Prompt { name: String },
    /// A resource or resource template, by URI or URI template
    #[serde(rename = "ref/resource")]
    Resource { uri: String },
}

/// Argument being completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteArgument {
    pub name: String,
    pub value: String,
}

/// Previously resolved arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, String>>,
}

/// Params of `completion/complete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteParams {
    #[serde(rename = "ref")]
    pub reference: CompletionReference,
    pub argument: CompleteArgument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CompletionContext>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Completion values plus paging hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

impl CompletionResult {
    /// Cap `values` at [`MAX_COMPLETION_VALUES`], reporting the full count.
    pub fn from_values(mut values: Vec<String>) -> Self {
        let total = values.len();
        values.truncate(MAX_COMPLETION_VALUES);
        Self {
            has_more: Some(total > values.len()),
            total: Some(total),
            values,
        }
    }

    pub fn empty() -> Self {
        Self::from_values(Vec::new())
    }
}

/// Result for `completion/complete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteResult {
    pub completion: CompletionResult,
}
