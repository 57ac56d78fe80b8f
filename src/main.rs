//! keep-mcp: Command-line interface for the Google Keep MCP server

use anyhow::Result;
use clap::{Parser, Subcommand};
use keep_mcp::config::{path_resolver, AppConfig};
use keep_mcp::hierarchy::NewListItem;
use keep_mcp::mcp::{DeleteConfirmation, NoteView};
use keep_mcp::store::{HttpBackend, KeepClient};
use keep_mcp::{KeepError, MutationGuard};
use rmcp::{
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{stdin, stdout};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// MCP Server Implementation
// ============================================================================

/// MCP server for Google Keep notes and checklists
#[derive(Clone)]
struct KeepMcpServer {
    // One tool call at a time: the lock is held for the full call including
    // the backend sync, so mutations against a note never overlap.
    client: Arc<Mutex<KeepClient>>,
}

/// Request parameters for the find tool
#[derive(Debug, Deserialize, JsonSchema)]
struct FindParams {
    /// String to match against note titles and bodies (empty matches all)
    #[serde(default)]
    query: String,
}

/// Request parameters for create_note
#[derive(Debug, Deserialize, JsonSchema)]
struct CreateNoteParams {
    /// Title of the note
    #[serde(default)]
    title: Option<String>,
    /// Text content of the note
    #[serde(default)]
    text: Option<String>,
}

/// Request parameters for create_list
#[derive(Debug, Deserialize, JsonSchema)]
struct CreateListParams {
    /// Title of the list
    #[serde(default)]
    title: Option<String>,
    /// Rows of the list, in display order. A row may reference the local
    /// `id` of an earlier row as its `superListItemId` to nest under it.
    #[serde(default)]
    items: Vec<NewListItem>,
}

/// Request parameters for update_note
#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateNoteParams {
    /// Id of the note to update
    note_id: String,
    /// New title
    #[serde(default)]
    title: Option<String>,
    /// New text content (plain notes only)
    #[serde(default)]
    text: Option<String>,
}

/// Request parameters for delete_note
#[derive(Debug, Deserialize, JsonSchema)]
struct DeleteNoteParams {
    /// Id of the note to mark trashed
    note_id: String,
}

/// Request parameters for add_list_item
#[derive(Debug, Deserialize, JsonSchema)]
struct AddListItemParams {
    /// Id of the list to add the item to
    note_id: String,
    /// Text of the new item
    text: String,
    /// Checked state (default: false)
    #[serde(default)]
    checked: bool,
    /// Id of an existing top-level item to nest the new item under
    #[serde(rename = "superListItemId", default)]
    super_list_item_id: Option<String>,
}

/// Request parameters for update_list_item
#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateListItemParams {
    /// Id of the list containing the item
    note_id: String,
    /// Id of the item to update
    item_id: String,
    /// New text
    #[serde(default)]
    text: Option<String>,
    /// New checked state
    #[serde(default)]
    checked: Option<bool>,
}

/// Request parameters for delete_list_item
#[derive(Debug, Deserialize, JsonSchema)]
struct DeleteListItemParams {
    /// Id of the list containing the item
    note_id: String,
    /// Id of the item to delete
    item_id: String,
}

/// Convert a domain error into a structured MCP error result.
///
/// This is the only place faults cross the tool boundary; nothing below it
/// converts or suppresses errors.
fn to_mcp_error(err: KeepError) -> rmcp::Error {
    let message = format!("[{}] {}", err.kind(), err);
    match err {
        KeepError::Backend(_) => rmcp::Error::internal_error(message, None),
        _ => rmcp::Error::invalid_params(message, None),
    }
}

fn json_result<T: serde::Serialize>(value: &T) -> Result<CallToolResult, rmcp::Error> {
    let json = serde_json::to_string(value)
        .map_err(|e| rmcp::Error::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool(tool_box)]
impl KeepMcpServer {
    /// Connect to the backend and load the note cache
    async fn connect(config: &AppConfig) -> Result<Self> {
        let token = match config.api_token() {
            Some(token) => token.to_string(),
            None => {
                tracing::warn!("no API token configured, backend calls will be unauthorized");
                String::new()
            }
        };
        let backend = HttpBackend::new(config.api_url(), token);
        let guard = MutationGuard::new(config.unsafe_mode());
        if guard.unsafe_mode() {
            tracing::warn!("UNSAFE_MODE enabled: mutations are not restricted to server-created notes");
        }
        let mut client = KeepClient::new(backend, guard);
        client.load().await?;
        Ok(Self {
            client: Arc::new(Mutex::new(client)),
        })
    }

    /// Find notes matching a query
    #[tool(description = "Find notes by a query string matched against titles and contents")]
    async fn find(
        &self,
        #[tool(aggr)] params: FindParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let client = self.client.lock().await;
        let views: Vec<NoteView> = client
            .find(&params.query)
            .into_iter()
            .map(NoteView::from_note)
            .collect();
        json_result(&views)
    }

    /// Create a plain note
    #[tool(description = "Create a new note with title and text")]
    async fn create_note(
        &self,
        #[tool(aggr)] params: CreateNoteParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        let note_id = client
            .create_note(
                params.title.as_deref().unwrap_or(""),
                params.text.as_deref().unwrap_or(""),
            )
            .id
            .clone();
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        let view = NoteView::from_note(client.get(&note_id).map_err(to_mcp_error)?);
        json_result(&view)
    }

    /// Create a checklist
    #[tool(
        description = "Create a new list. Items may nest one level: give an item a local \
                       'id' and reference it from a later item's 'superListItemId'"
    )]
    async fn create_list(
        &self,
        #[tool(aggr)] params: CreateListParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        let note_id = client
            .create_list(params.title.as_deref().unwrap_or(""), &params.items)
            .map_err(to_mcp_error)?
            .id
            .clone();
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        let view = NoteView::from_note(client.get(&note_id).map_err(to_mcp_error)?);
        json_result(&view)
    }

    /// Update a note's title or text
    #[tool(description = "Update a note's title and/or text")]
    async fn update_note(
        &self,
        #[tool(aggr)] params: UpdateNoteParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        client
            .update_note(
                &params.note_id,
                params.title.as_deref(),
                params.text.as_deref(),
            )
            .map_err(to_mcp_error)?;
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        let view = NoteView::from_note(client.get(&params.note_id).map_err(to_mcp_error)?);
        json_result(&view)
    }

    /// Mark a note trashed
    #[tool(description = "Delete a note (marks it trashed)")]
    async fn delete_note(
        &self,
        #[tool(aggr)] params: DeleteNoteParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        client.delete_note(&params.note_id).map_err(to_mcp_error)?;
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        json_result(&DeleteConfirmation::for_note(&params.note_id))
    }

    /// Append an item to a list
    #[tool(description = "Add an item to an existing list, optionally nested under an existing item")]
    async fn add_list_item(
        &self,
        #[tool(aggr)] params: AddListItemParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        client
            .add_item(
                &params.note_id,
                &params.text,
                params.checked,
                params.super_list_item_id.as_deref(),
            )
            .map_err(to_mcp_error)?;
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        let view = NoteView::from_note(client.get(&params.note_id).map_err(to_mcp_error)?);
        json_result(&view)
    }

    /// Update an item's text or checked state
    #[tool(description = "Update an item in a list (text and/or checked state)")]
    async fn update_list_item(
        &self,
        #[tool(aggr)] params: UpdateListItemParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        client
            .update_item(
                &params.note_id,
                &params.item_id,
                params.text.as_deref(),
                params.checked,
            )
            .map_err(to_mcp_error)?;
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        let view = NoteView::from_note(client.get(&params.note_id).map_err(to_mcp_error)?);
        json_result(&view)
    }

    /// Remove an item from a list
    #[tool(description = "Delete an item from a list; children of the item become top-level")]
    async fn delete_list_item(
        &self,
        #[tool(aggr)] params: DeleteListItemParams,
    ) -> Result<CallToolResult, rmcp::Error> {
        let mut client = self.client.lock().await;
        client
            .delete_item(&params.note_id, &params.item_id)
            .map_err(to_mcp_error)?;
        client.sync().await.map_err(KeepError::Backend).map_err(to_mcp_error)?;
        let view = NoteView::from_note(client.get(&params.note_id).map_err(to_mcp_error)?);
        json_result(&view)
    }
}

#[tool(tool_box)]
impl ServerHandler for KeepMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Google Keep note server. Notes created here carry the keep-mcp label; \
                 by default only labeled notes can be modified or deleted."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// CLI Implementation
// ============================================================================

/// keep-mcp: MCP server for Google Keep notes and checklists
#[derive(Parser)]
#[command(name = "keep-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (default: XDG config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize keep-mcp configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Start the MCP server on stdio
    Serve {
        /// Disable the sentinel-label restriction on mutating tools
        #[arg(long)]
        unsafe_mode: bool,
    },
    /// Search notes from the command line (for testing)
    Find {
        /// Search query
        #[arg(default_value = "")]
        query: String,
    },
}

fn load_config(cli_config: Option<&PathBuf>) -> Result<AppConfig> {
    let path = cli_config
        .cloned()
        .unwrap_or_else(path_resolver::get_default_config_path);
    let config = AppConfig::load(&path)?;
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (to stderr to not interfere with MCP stdio)
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Init { force } => {
            let config_dir = path_resolver::get_config_dir();
            let config_path = config_dir.join("config.toml");

            eprintln!("Initializing keep-mcp configuration...");
            eprintln!("Config directory: {}", config_dir.display());

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
                eprintln!("Created config directory");
            }

            if config_path.exists() && !force {
                eprintln!("Configuration file already exists: {}", config_path.display());
                eprintln!("Use --force to overwrite");
                return Ok(());
            }

            let default_config = AppConfig::default();
            let toml_content = default_config.to_toml()?;
            std::fs::write(&config_path, &toml_content)?;

            eprintln!("Created configuration file: {}", config_path.display());
            eprintln!("\nSet api_token (or KEEP_MCP_API_TOKEN) before serving.");
            Ok(())
        }
        Commands::Serve { unsafe_mode } => {
            let mut config = load_config(cli.config.as_ref())?;
            if unsafe_mode {
                config = config.with_unsafe_mode(true);
            }
            tracing::info!(api_url = config.api_url(), "starting MCP server");
            eprintln!("keep-mcp server starting... (api_url: {})", config.api_url());

            let server = KeepMcpServer::connect(&config).await?;
            eprintln!("Notes loaded. Starting MCP stdio transport...");

            let transport = (stdin(), stdout());
            let service = server.serve(transport).await?;

            let _quit_reason = service.waiting().await?;
            Ok(())
        }
        Commands::Find { query } => {
            let config = load_config(cli.config.as_ref())?;
            let backend = HttpBackend::new(
                config.api_url(),
                config.api_token().unwrap_or("").to_string(),
            );
            let mut client = KeepClient::new(backend, MutationGuard::new(config.unsafe_mode()));
            client.load().await?;

            let notes = client.find(&query);
            if notes.is_empty() {
                println!("No notes found for '{}'", query);
            } else {
                println!("Found {} notes for '{}':\n", notes.len(), query);
                for (i, note) in notes.iter().enumerate() {
                    println!("{}. {} [{}]", i + 1, note.title, note.id);
                    match note.text() {
                        Some(text) => {
                            let snippet: String = text.chars().take(100).collect();
                            println!("   {}", snippet);
                        }
                        None => {
                            for item in note.items() {
                                let indent = if item.parent_id.is_some() { "     - " } else { "   - " };
                                let mark = if item.checked { "[x]" } else { "[ ]" };
                                println!("{}{} {}", indent, mark, item.text);
                            }
                        }
                    }
                    println!();
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["keep-mcp", "serve"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_serve_unsafe_mode() {
        let cli = Cli::try_parse_from(["keep-mcp", "serve", "--unsafe-mode"]).unwrap();
        match cli.command {
            Commands::Serve { unsafe_mode } => assert!(unsafe_mode),
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_cli_find_command() {
        let cli = Cli::try_parse_from(["keep-mcp", "find", "groceries"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_find_params_default_query() {
        let params: FindParams = serde_json::from_str("{}").expect("empty params should work");
        assert_eq!(params.query, "");
    }

    #[test]
    fn test_create_list_params_with_hierarchy() {
        let params: CreateListParams = serde_json::from_str(
            r#"{
                "title": "Groceries",
                "items": [
                    {"id": "produce", "text": "Produce"},
                    {"text": "Apples", "superListItemId": "produce"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(params.items.len(), 2);
        assert_eq!(params.items[1].super_list_item_id.as_deref(), Some("produce"));
        assert!(!params.items[1].checked);
    }

    #[test]
    fn test_add_list_item_params() {
        let params: AddListItemParams = serde_json::from_str(
            r#"{"note_id": "n1", "text": "Milk", "checked": true, "superListItemId": "i1"}"#,
        )
        .unwrap();
        assert_eq!(params.note_id, "n1");
        assert!(params.checked);
        assert_eq!(params.super_list_item_id.as_deref(), Some("i1"));
    }
}
