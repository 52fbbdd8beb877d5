/// Server settings.
///
/// Settings are layered, later sources overriding earlier ones:
///
///   1. Built-in defaults (`api/services` and `api/models`)
///   2. `.sailsnav.toml` in the workspace root
///   3. `initializationOptions` sent by the client
///   4. `--definition-path` flags on the command line
///
/// Every layer is partial: a key that a layer leaves out keeps the value
/// from the layer below.
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

/// Name of the optional per-workspace settings file.
pub const CONFIG_FILE_NAME: &str = ".sailsnav.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directories, relative to the workspace root, whose files are
    /// indexed as globally available modules.
    pub definition_paths: Vec<String>,
    /// Ask the editor's own definition provider first and stay silent
    /// when it finds something.
    pub defer_to_host: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            definition_paths: vec!["api/services".to_string(), "api/models".to_string()],
            defer_to_host: true,
        }
    }
}

/// One settings layer as written by the user.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsLayer {
    #[serde(alias = "definitionPaths")]
    definition_paths: Option<Vec<String>>,
    #[serde(alias = "deferToHost")]
    defer_to_host: Option<bool>,
}

impl Settings {
    fn apply(&mut self, layer: SettingsLayer) {
        if let Some(paths) = layer.definition_paths {
            self.definition_paths = paths;
        }
        if let Some(defer) = layer.defer_to_host {
            self.defer_to_host = defer;
        }
    }

    /// Layer `.sailsnav.toml` from `workspace_root`, if present.
    pub fn merge_file(&mut self, workspace_root: &Path) -> Result<(), ConfigError> {
        let path = workspace_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let layer: SettingsLayer =
            toml::from_str(&content).map_err(|source| ConfigError::Toml { path, source })?;
        self.apply(layer);
        Ok(())
    }

    /// Layer the client's `initializationOptions`.
    pub fn merge_json(&mut self, options: &serde_json::Value) -> Result<(), ConfigError> {
        if options.is_null() {
            return Ok(());
        }
        let layer = SettingsLayer::deserialize(options)?;
        self.apply(layer);
        Ok(())
    }

    /// Replace the definition paths with the command-line ones, unless
    /// none were given.
    pub fn merge_overrides(&mut self, definition_paths: &[String]) {
        if !definition_paths.is_empty() {
            self.definition_paths = definition_paths.to_vec();
        }
    }

    /// Build the effective settings for a workspace.
    ///
    /// Broken layers are logged and skipped so a typo in a settings file
    /// never stops the server from starting.
    pub fn load(
        workspace_root: Option<&Path>,
        init_options: Option<&serde_json::Value>,
        overrides: &[String],
    ) -> Settings {
        let mut settings = Settings::default();

        if let Some(root) = workspace_root
            && let Err(e) = settings.merge_file(root)
        {
            warn!(error = %e, "ignoring settings file");
        }

        if let Some(options) = init_options
            && let Err(e) = settings.merge_json(options)
        {
            warn!(error = %e, "ignoring initialization options");
        }

        settings.merge_overrides(overrides);
        settings
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
