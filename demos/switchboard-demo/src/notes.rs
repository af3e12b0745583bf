//! An in-memory notebook exposed as tools, resources and a prompt

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::RwLock;

use switchboard_server::McpServer;
use switchboard_server::prelude::*;

/// Notes keyed by id, shared by every entity below
#[derive(Clone, Default)]
pub struct NoteStore {
    notes: Arc<RwLock<BTreeMap<u64, String>>>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, text: impl Into<String>) -> u64 {
        let mut notes = self.notes.write().await;
        let id = notes.keys().next_back().map_or(1, |last| last + 1);
        notes.insert(id, text.into());
        id
    }

    pub async fn get(&self, id: u64) -> Option<String> {
        self.notes.read().await.get(&id).cloned()
    }

    pub async fn ids(&self) -> Vec<u64> {
        self.notes.read().await.keys().copied().collect()
    }

    pub async fn all(&self) -> Vec<(u64, String)> {
        self.notes
            .read()
            .await
            .iter()
            .map(|(id, text)| (*id, text.clone()))
            .collect()
    }
}

/// Stores a note and links to it
pub struct AddNoteTool {
    store: NoteStore,
}

#[async_trait]
impl McpTool for AddNoteTool {
    fn name(&self) -> &str {
        "add_note"
    }

    fn title(&self) -> Option<&str> {
        Some("Add Note")
    }

    fn description(&self) -> Option<&str> {
        Some("Save a note and return a link to it")
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "Note body"}
            },
            "required": ["text"]
        })
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let arguments = ctx.validate(&JsonSchemaValidator::new(self.input_schema()))?;
        let text = arguments["text"].as_str().unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(vec![Content::error("A note needs some text.")]);
        }

        let id = self.store.add(text).await;
        tracing::info!(note_id = id, "Note added");
        Ok(vec![
            Content::text(format!("Saved note {}", id)),
            Content::resource_link(format!("notes://{}", id)),
        ])
    }
}

/// Word statistics for a piece of text
pub struct WordCountTool;

#[async_trait]
impl McpTool for WordCountTool {
    fn name(&self) -> &str {
        "word_count"
    }

    fn description(&self) -> Option<&str> {
        Some("Count words and characters")
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {"text": {"type": "string"}},
            "required": ["text"]
        })
    }

    fn output_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "words": {"type": "integer"},
                "characters": {"type": "integer"}
            }
        }))
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new()
            .with_read_only_hint(true)
            .with_idempotent_hint(true)
    }

    async fn call(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let arguments = ctx.validate(&JsonSchemaValidator::new(self.input_schema()))?;
        let text = arguments["text"].as_str().unwrap_or_default();
        Ok(vec![Content::structured(json!({
            "words": text.split_whitespace().count(),
            "characters": text.chars().count(),
        }))])
    }
}

/// One note, addressed as `notes://{id}`
pub struct NoteResource {
    store: NoteStore,
}

#[async_trait]
impl McpResource for NoteResource {
    fn uri(&self) -> &str {
        "notes://{id}"
    }

    fn name(&self) -> &str {
        "note"
    }

    fn description(&self) -> Option<&str> {
        Some("A single note by id")
    }

    fn mime_type(&self) -> Option<&str> {
        Some("text/plain")
    }

    async fn read(&self, ctx: &RequestContext) -> McpResult<Content> {
        let raw = ctx.str_argument("id").unwrap_or_default();
        let note = match raw.parse::<u64>() {
            Ok(id) => self.store.get(id).await,
            Err(_) => None,
        };
        Ok(match note {
            Some(text) => Content::text(text),
            None => Content::error(format!("No note with id {}", raw)),
        })
    }

    async fn complete(
        &self,
        argument: &str,
        value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        if argument != "id" {
            return Ok(Vec::new());
        }
        Ok(self
            .store
            .ids()
            .await
            .into_iter()
            .map(|id| id.to_string())
            .filter(|id| id.starts_with(value))
            .collect())
    }
}

/// Every note as a JSON index
pub struct NoteIndexResource {
    store: NoteStore,
}

#[async_trait]
impl McpResource for NoteIndexResource {
    fn uri(&self) -> &str {
        "notes://index"
    }

    fn name(&self) -> &str {
        "index"
    }

    fn title(&self) -> Option<&str> {
        Some("Note Index")
    }

    fn mime_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn annotations(&self) -> Option<Annotations> {
        Some(Annotations::new().with_priority(1.0))
    }

    async fn read(&self, _ctx: &RequestContext) -> McpResult<Content> {
        let notes: Vec<Value> = self
            .store
            .all()
            .await
            .into_iter()
            .map(|(id, text)| json!({"id": id, "uri": format!("notes://{}", id), "text": text}))
            .collect();
        Ok(Content::text(json!({ "notes": notes }).to_string()))
    }
}

/// Asks the model to summarise the notebook
pub struct SummarizePrompt {
    store: NoteStore,
}

const STYLES: [&str; 3] = ["bullet points", "one paragraph", "headline"];

#[async_trait]
impl McpPrompt for SummarizePrompt {
    fn name(&self) -> &str {
        "summarize_notes"
    }

    fn description(&self) -> Option<&str> {
        Some("Summarise all notes on a topic")
    }

    fn arguments(&self) -> Vec<PromptArgument> {
        vec![
            PromptArgument::new("topic").required(),
            PromptArgument::new("style"),
        ]
    }

    async fn get(&self, ctx: &RequestContext) -> McpResult<Vec<Content>> {
        let topic = ctx.str_argument("topic").unwrap_or_default();
        let style = ctx.str_argument("style").unwrap_or(STYLES[0]);

        let mut messages = vec![Content::text(format!(
            "Summarise my notes about {} as {}.",
            topic, style
        ))];
        for (id, _) in self.store.all().await {
            messages.push(Content::embedded_resource(format!("notes://{}", id)));
        }
        Ok(messages)
    }

    async fn complete(
        &self,
        argument: &str,
        value: &str,
        _context: &CompletionContext,
    ) -> McpResult<Vec<String>> {
        if argument != "style" {
            return Ok(Vec::new());
        }
        Ok(STYLES
            .iter()
            .filter(|style| style.starts_with(value))
            .map(|style| style.to_string())
            .collect())
    }
}

/// Build the demo server around `store`
pub fn server(store: NoteStore) -> switchboard_server::Result<McpServer> {
    McpServer::builder()
        .name("switchboard-notes")
        .version(env!("CARGO_PKG_VERSION"))
        .title("Switchboard Notes")
        .instructions("Add notes with add_note, then read them back as notes:// resources.")
        .with_completions()
        .tool(AddNoteTool {
            store: store.clone(),
        })
        .tool(WordCountTool)
        .resource(NoteIndexResource {
            store: store.clone(),
        })
        .resource(NoteResource {
            store: store.clone(),
        })
        .prompt(SummarizePrompt { store })
        .build()
}
