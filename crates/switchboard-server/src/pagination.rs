//! Offset cursor pagination shared by every `*/list` method.
//!
//! A cursor is base64 of `{"offset": n}`. Only this module creates or reads
//! cursors; a missing, malformed or tampered cursor restarts from offset 0.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use tracing::debug;

/// One page of a list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present iff more items follow this page
    pub next_cursor: Option<String>,
}

/// Encode an offset as an opaque cursor
pub fn encode_cursor(offset: usize) -> String {
    STANDARD.encode(json!({ "offset": offset }).to_string())
}

/// Decode a cursor; anything unparseable yields offset 0
pub fn decode_cursor(cursor: &str) -> usize {
    let offset = STANDARD
        .decode(cursor)
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
        .and_then(|value| value.get("offset").and_then(Value::as_i64));

    match offset {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(0),
        Some(_) => 0,
        None => {
            debug!("Ignoring unreadable pagination cursor");
            0
        }
    }
}

/// Slice `items` starting at the cursor's offset.
///
/// `page_size` of zero is treated as one so a cursor always advances.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, cursor: Option<&str>) -> Page<T> {
    let page_size = page_size.max(1);
    let offset = cursor.map(decode_cursor).unwrap_or(0);

    if offset >= items.len() {
        return Page {
            items: Vec::new(),
            next_cursor: None,
        };
    }

    let end = offset.saturating_add(page_size).min(items.len());
    let next_cursor = (end < items.len()).then(|| encode_cursor(end));

    Page {
        items: items[offset..end].to_vec(),
        next_cursor,
    }
}
