use deadlines::language::Settings;
use lsp_server::Connection;
use lsp_types::{
    CompletionOptions, InitializeParams, OneOf, ServerCapabilities, TextDocumentSyncCapability,
    TextDocumentSyncKind,
};
use serde_json::Value;
use tracing::{debug, info, warn};

mod hints;
mod server;

pub(crate) fn run_language_server() -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
    debug!("Starting Deadlines Language Server");

    let (connection, threads) = Connection::stdio();

    let capabilities = serde_json::to_value(ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        completion_provider: Some(CompletionOptions::default()),
        inlay_hint_provider: Some(OneOf::Left(true)),
        ..Default::default()
    })?;

    // extract any initialization parameters passed from the editor.
    let params = connection.initialize(capabilities)?;
    let params = serde_json::from_value::<InitializeParams>(params)?;
    let settings = settings_from(params.initialization_options);

    info!("Deadlines Language Server starting on stdin");

    let server = server::DeadlinesLanguageServer::new(settings);
    server.run(connection)?;

    threads.join()?;
    Ok(())
}

/// Thresholds supplied by the editor, or the defaults if there are none or
/// they cannot be read.
fn settings_from(options: Option<Value>) -> Settings {
    match options {
        Some(Value::Null) | None => Settings::default(),
        Some(value) => match serde_json::from_value::<Settings>(value) {
            Ok(settings) => {
                debug!(?settings, "Settings from initialization options");
                settings
            }
            Err(error) => {
                warn!("Ignoring initialization options: {}", error);
                Settings::default()
            }
        },
    }
}
