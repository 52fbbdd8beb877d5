//! sailsnav — go-to-definition for Sails.js globals.
//!
//! Sails injects every service and model as a global named after its
//! file, so `UserService.findById(id)` works without an import and
//! without anything an editor can follow.  This crate indexes the
//! configured module directories and resolves such references by parsing
//! the calling file and the module file with tree-sitter.
//!
//! The crate is organised into the following modules:
//!
//! - [`config`]: Settings layering (defaults, `.sailsnav.toml`, client
//!   options, command line)
//! - [`module_index`]: One-time scan of module directories into a
//!   name → file map
//! - [`syntax`]: JavaScript parsing and the node shapes the resolver uses
//! - [`definition`]: Cursor → reference → export location pipeline
//! - [`host`]: Deference to the editor's own definition providers
//! - `server`: The `LanguageServer` trait implementation
//! - [`types`] / [`error`]: Shared data and error types
//! - [`util`]: Position conversion helpers
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tower_lsp::Client;
use tower_lsp::lsp_types::{MessageType, Url};
use tracing::info;

pub mod config;
pub mod definition;
pub mod error;
pub mod host;
pub mod module_index;
mod server;
pub mod syntax;
pub mod types;
pub mod util;

pub use config::Settings;
pub use host::{DeferenceGate, DeferenceState, HostDefinitionProvider};
pub use module_index::ModuleIndex;
pub use types::*;

use host::ClientHostProvider;

pub struct Backend {
    name: String,
    version: String,
    /// Latest full text of every open document, keyed by URI.
    open_files: Mutex<HashMap<Url, String>>,
    workspace_root: Mutex<Option<PathBuf>>,
    /// `initializationOptions` from the client, kept until `initialized`.
    init_options: Mutex<Option<serde_json::Value>>,
    /// `--definition-path` flags; replace the configured paths when set.
    path_overrides: Vec<String>,
    settings: Mutex<Settings>,
    /// Built once in `initialized`, read-only afterwards.
    module_index: OnceLock<ModuleIndex>,
    host: Option<Arc<dyn HostDefinitionProvider>>,
    deference: DeferenceGate,
    client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        let host: Arc<dyn HostDefinitionProvider> =
            Arc::new(ClientHostProvider::new(client.clone()));
        Self {
            host: Some(host),
            client: Some(client),
            ..Self::new_test()
        }
    }

    /// A backend with no client and no host delegate.
    pub fn new_test() -> Self {
        Self {
            name: "sailsnav".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_files: Mutex::new(HashMap::new()),
            workspace_root: Mutex::new(None),
            init_options: Mutex::new(None),
            path_overrides: Vec::new(),
            settings: Mutex::new(Settings::default()),
            module_index: OnceLock::new(),
            host: None,
            deference: DeferenceGate::default(),
            client: None,
        }
    }

    /// A backend whose module index is already built from `workspace_root`.
    pub fn new_test_with_workspace(workspace_root: PathBuf, settings: Settings) -> Self {
        let backend = Self::new_test();
        *backend.workspace_root.lock() = Some(workspace_root.clone());
        backend.build_module_index(&workspace_root, &settings);
        *backend.settings.lock() = settings;
        backend
    }

    /// Replace the definition paths from configuration with these.
    pub fn with_path_overrides(mut self, definition_paths: Vec<String>) -> Self {
        self.path_overrides = definition_paths;
        self
    }

    /// Use `host` for the deference step instead of the client.
    pub fn with_host(mut self, host: Arc<dyn HostDefinitionProvider>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_version(&self) -> &str {
        &self.version
    }

    pub fn module_index(&self) -> Option<&ModuleIndex> {
        self.module_index.get()
    }

    pub fn deference_state(&self) -> DeferenceState {
        self.deference.state()
    }

    pub fn settings(&self) -> Settings {
        self.settings.lock().clone()
    }

    fn defer_to_host(&self) -> bool {
        self.settings.lock().defer_to_host
    }

    /// Build the module index unless it already exists.  Returns whether
    /// this call built it.
    fn build_module_index(&self, workspace_root: &Path, settings: &Settings) -> bool {
        if self.module_index.get().is_some() {
            return false;
        }
        let index = ModuleIndex::build(workspace_root, &settings.definition_paths);
        self.module_index.set(index).is_ok()
    }

    /// Load settings and build the module index for the workspace.
    pub(crate) async fn load_workspace(&self) {
        let root = self.workspace_root.lock().clone();
        let Some(root) = root else {
            self.log(
                MessageType::WARNING,
                "sailsnav: no workspace root, definitions disabled".to_string(),
            )
            .await;
            return;
        };

        let init_options = self.init_options.lock().take();
        let settings = Settings::load(
            Some(root.as_path()),
            init_options.as_ref(),
            &self.path_overrides,
        );

        if !self.build_module_index(&root, &settings) {
            return;
        }
        *self.settings.lock() = settings;

        let Some(index) = self.module_index.get() else {
            return;
        };
        for error in index.errors() {
            self.log(
                MessageType::WARNING,
                format!("sailsnav: error loading definitions: {}", error),
            )
            .await;
        }
        info!(root = %root.display(), modules = index.len(), "workspace loaded");
        self.log(
            MessageType::INFO,
            format!("sailsnav: loaded {} definitions.", index.len()),
        )
        .await;
    }

    /// Public helper for tests: the stored text of an open document.
    pub fn get_open_file(&self, uri: &Url) -> Option<String> {
        self.open_files.lock().get(uri).cloned()
    }
}
