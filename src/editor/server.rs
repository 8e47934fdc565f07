use std::collections::HashMap;

use chrono::{Local, NaiveDateTime};
use deadlines::language::{self, Settings, Severity};
use deadlines::parsing::Parser;
use lsp_server::{Connection, Message, Notification, Request, Response};
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionParams, CompletionResponse, Diagnostic,
    DiagnosticSeverity, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DidSaveTextDocumentParams, InlayHint, InlayHintLabel,
    InlayHintParams, Position, PublishDiagnosticsParams, Range, Uri,
};
use serde_json::{from_value, to_value, Value};
use tracing::{debug, error, info, warn};

use super::hints::{Annotation, Annotator};

pub const END_SECTION: &str = "<!-- end section -->";

const SOURCE: &str = "deadlines";

pub struct DeadlinesLanguageServer {
    /// Map from URI to document content
    documents: HashMap<Uri, String>,
    /// Map from URI to the annotations found by the last parse
    annotations: HashMap<Uri, Vec<Annotation>>,
    settings: Settings,
    today: Option<NaiveDateTime>,
}

impl DeadlinesLanguageServer {
    pub fn new(settings: Settings) -> Self {
        Self {
            documents: HashMap::new(),
            annotations: HashMap::new(),
            settings,
            today: None,
        }
    }

    /// Main server loop that handles incoming LSP messages
    pub fn run(
        mut self,
        connection: Connection,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>> {
        info!("Starting Language Server main loop");

        for message in &connection.receiver {
            match message {
                Message::Request(request) => {
                    if let Err(err) = self.handle_request(request, &|msg| {
                        connection
                            .sender
                            .send(msg)
                    }) {
                        error!("Error handling request: {}", err);
                    }
                }
                Message::Notification(notification) => {
                    if notification.method == "exit" {
                        break;
                    }

                    if let Err(error) = self.handle_notification(notification, &|message| {
                        connection
                            .sender
                            .send(message)
                    }) {
                        error!("Error handling notification: {}", error);
                    }
                }
                Message::Response(_resp) => {
                    // We don't expect responses as a server
                    warn!("Received unexpected response message");
                }
            }
        }

        Ok(())
    }

    fn handle_request<E>(
        &mut self,
        req: Request,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match req
            .method
            .as_str()
        {
            "textDocument/completion" => {
                let params: CompletionParams = from_value(req.params)?;
                debug!(
                    "Completion request: {:?}",
                    params
                        .text_document_position
                        .text_document
                        .uri
                );
                let response = Response::new_ok(req.id, self.handle_completion());
                sender(Message::Response(response))?;
            }
            "textDocument/inlayHint" => {
                let params: InlayHintParams = from_value(req.params)?;
                let result = self.handle_inlay_hint(params);
                let response = Response::new_ok(req.id, result);
                sender(Message::Response(response))?;
            }
            "shutdown" => {
                info!("Language Server received shutdown request");
                let response = Response::new_ok(req.id, Value::Null);
                sender(Message::Response(response))?;
            }
            _ => {
                warn!("Unhandled request method: {}", req.method);
                let response = Response::new_err(
                    req.id,
                    lsp_server::ErrorCode::MethodNotFound as i32,
                    format!("Method not found: {}", req.method),
                );
                sender(Message::Response(response))?;
            }
        }
        Ok(())
    }

    fn handle_notification<E>(
        &mut self,
        notification: Notification,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match notification
            .method
            .as_str()
        {
            "textDocument/didOpen" => {
                let params: DidOpenTextDocumentParams = from_value(notification.params)?;
                self.handle_did_open(params, sender)?;
            }
            "textDocument/didChange" => {
                let params: DidChangeTextDocumentParams = from_value(notification.params)?;
                self.handle_did_change(params, sender)?;
            }
            "textDocument/didSave" => {
                let params: DidSaveTextDocumentParams = from_value(notification.params)?;
                self.handle_did_save(params, sender)?;
            }
            "textDocument/didClose" => {
                let params: DidCloseTextDocumentParams = from_value(notification.params)?;
                self.handle_did_close(params, sender)?;
            }
            _ => {
                debug!("Unhandled notification method: {}", notification.method);
            }
        }
        Ok(())
    }

    fn handle_did_open<E>(
        &mut self,
        params: DidOpenTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let document = params.text_document;

        if !is_markdown(&document.language_id, &document.uri) {
            debug!("Ignoring document: {:?}", document.uri);
            return Ok(());
        }

        debug!("Document opened: {:?}", document.uri);

        self.documents
            .insert(document.uri.clone(), document.text);

        self.parse_and_report(document.uri, sender)
    }

    fn handle_did_change<E>(
        &mut self,
        params: DidChangeTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;

        if !self
            .documents
            .contains_key(&uri)
        {
            return Ok(());
        }

        // full sync, so the last change holds the entire text
        if let Some(change) = params
            .content_changes
            .into_iter()
            .last()
        {
            debug!("Document changed: {:?}", uri);

            self.documents
                .insert(uri.clone(), change.text);

            self.parse_and_report(uri, sender)?;
        }
        Ok(())
    }

    fn handle_did_save<E>(
        &mut self,
        params: DidSaveTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;
        debug!("Document saved: {:?}", uri);

        if let Some(text) = params.text {
            if let Some(content) = self
                .documents
                .get_mut(&uri)
            {
                *content = text;
            }
        }

        if self
            .documents
            .contains_key(&uri)
        {
            self.parse_and_report(uri, sender)?;
        }
        Ok(())
    }

    fn handle_did_close<E>(
        &mut self,
        params: DidCloseTextDocumentParams,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let uri = params
            .text_document
            .uri;
        debug!("Document closed: {:?}", uri);

        self.annotations
            .remove(&uri);

        if self
            .documents
            .remove(&uri)
            .is_some()
        {
            // Clear diagnostics for closed document
            self.publish_diagnostics(uri, vec![], sender)?;
        }
        Ok(())
    }

    fn handle_completion(&self) -> CompletionResponse {
        CompletionResponse::Array(vec![CompletionItem {
            label: END_SECTION.to_string(),
            kind: Some(CompletionItemKind::SNIPPET),
            detail: Some("Stop attributing checklist items to the date above".to_string()),
            ..Default::default()
        }])
    }

    fn handle_inlay_hint(&self, params: InlayHintParams) -> Vec<InlayHint> {
        let range = params.range;

        match self
            .annotations
            .get(&params.text_document.uri)
        {
            Some(annotations) => annotations
                .iter()
                .filter(|annotation| {
                    let line = saturate(annotation.line);
                    line >= range
                        .start
                        .line
                        && line
                            <= range
                                .end
                                .line
                })
                .map(convert_annotation)
                .collect(),
            None => vec![],
        }
    }

    fn parse_and_report<E>(
        &mut self,
        uri: Uri,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let content = match self
            .documents
            .get(&uri)
        {
            Some(content) => content,
            None => return Err("Document not open".into()),
        };

        let now = self
            .today
            .unwrap_or_else(|| {
                Local::now().naive_local()
            });

        let annotator = Annotator::new(now.date());
        let results = annotator.shared();

        let mut parser = Parser::new(self.settings)
            .with_today(now)
            .with_visitor(annotator);

        let diagnostics = parser
            .parse(content)
            .iter()
            .map(convert_diagnostic)
            .collect();

        let annotations = results
            .borrow()
            .clone();
        self.annotations
            .insert(uri.clone(), annotations);

        self.publish_diagnostics(uri, diagnostics, sender)
    }

    fn publish_diagnostics<E>(
        &self,
        uri: Uri,
        diagnostics: Vec<Diagnostic>,
        sender: &dyn Fn(Message) -> Result<(), E>,
    ) -> Result<(), Box<dyn std::error::Error + Sync + Send>>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let params = PublishDiagnosticsParams {
            uri,
            diagnostics,
            version: None,
        };

        let notification = Notification::new(
            "textDocument/publishDiagnostics".to_string(),
            to_value(params)?,
        );

        sender(Message::Notification(notification))?;
        Ok(())
    }
}

fn is_markdown(language_id: &str, uri: &Uri) -> bool {
    language_id == "markdown"
        || uri
            .path()
            .as_str()
            .ends_with(".md")
}

/// Protocol positions are u32; anything past the end pins to the largest.
fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn convert_position(position: language::Position) -> Position {
    Position {
        line: saturate(position.line),
        character: saturate(position.column),
    }
}

fn convert_diagnostic(diagnostic: &language::Diagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Information => DiagnosticSeverity::INFORMATION,
        Severity::Hint => DiagnosticSeverity::HINT,
    };

    Diagnostic {
        range: Range {
            start: convert_position(
                diagnostic
                    .range
                    .start,
            ),
            end: convert_position(
                diagnostic
                    .range
                    .end,
            ),
        },
        severity: Some(severity),
        source: Some(SOURCE.to_string()),
        message: diagnostic
            .message
            .clone(),
        ..Default::default()
    }
}

fn convert_annotation(annotation: &Annotation) -> InlayHint {
    InlayHint {
        position: Position {
            line: saturate(annotation.line),
            character: saturate(annotation.column),
        },
        label: InlayHintLabel::String(
            annotation
                .label
                .clone(),
        ),
        kind: None,
        text_edits: None,
        tooltip: None,
        padding_left: Some(true),
        padding_right: None,
        data: None,
    }
}
