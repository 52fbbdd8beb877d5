/// Deference to the editor's own definition provider.
///
/// Before doing any work of its own, the server asks the editor whether
/// its built-in providers already know the definition.  If they do, the
/// server answers nothing so the editor does not show the same target
/// twice.
///
/// There is no standard LSP request for "run the other providers", so the
/// question is asked through the custom `sailsnav/hostDefinition` request.
/// An editor-side shim answers it by running the editor's definition
/// command.  That command includes this server, so the shim's answer can
/// arrive only after the server has been asked the very same question
/// again.  [`DeferenceGate`] makes that nested request return immediately.
use parking_lot::Mutex;
use tower_lsp::Client;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::request::Request;
use tower_lsp::lsp_types::*;

/// Something that can answer "what does the editor itself resolve here?".
#[tower_lsp::async_trait]
pub trait HostDefinitionProvider: Send + Sync {
    async fn host_definitions(
        &self,
        uri: &Url,
        position: Position,
    ) -> jsonrpc::Result<Vec<Location>>;
}

/// `sailsnav/hostDefinition`: server → client request asking for the
/// editor's own definition results at a position.
pub enum HostDefinitionRequest {}

impl Request for HostDefinitionRequest {
    type Params = TextDocumentPositionParams;
    type Result = Option<Vec<Location>>;
    const METHOD: &'static str = "sailsnav/hostDefinition";
}

/// Asks the connected client through [`HostDefinitionRequest`].
pub struct ClientHostProvider {
    client: Client,
}

impl ClientHostProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[tower_lsp::async_trait]
impl HostDefinitionProvider for ClientHostProvider {
    async fn host_definitions(
        &self,
        uri: &Url,
        position: Position,
    ) -> jsonrpc::Result<Vec<Location>> {
        let params = TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position,
        };
        let locations = self
            .client
            .send_request::<HostDefinitionRequest>(params)
            .await?;
        Ok(locations.unwrap_or_default())
    }
}

/// Whether a deference round-trip is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeferenceState {
    #[default]
    Idle,
    AwaitingHostDelegate,
}

/// Guards against re-entering the deference step while it is waiting on
/// the host.
#[derive(Debug, Default)]
pub struct DeferenceGate {
    state: Mutex<DeferenceState>,
}

impl DeferenceGate {
    /// Move from `Idle` to `AwaitingHostDelegate`.
    ///
    /// Returns `None` when a round-trip is already in flight.  The state
    /// returns to `Idle` when the ticket is dropped, however the caller
    /// leaves its scope.
    pub fn enter(&self) -> Option<DeferenceTicket<'_>> {
        let mut state = self.state.lock();
        match *state {
            DeferenceState::AwaitingHostDelegate => None,
            DeferenceState::Idle => {
                *state = DeferenceState::AwaitingHostDelegate;
                Some(DeferenceTicket { gate: self })
            }
        }
    }

    pub fn state(&self) -> DeferenceState {
        *self.state.lock()
    }
}

/// Proof that the caller owns the in-flight deference round-trip.
#[must_use]
pub struct DeferenceTicket<'a> {
    gate: &'a DeferenceGate,
}

impl Drop for DeferenceTicket<'_> {
    fn drop(&mut self) {
        *self.gate.state.lock() = DeferenceState::Idle;
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
