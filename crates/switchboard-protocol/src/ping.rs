//! `ping` and other methods whose result is an empty object.

use serde::{Deserialize, Serialize};

/// Serializes as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyResult {}

impl EmptyResult {
    pub fn new() -> Self {
        Self {}
    }
}
