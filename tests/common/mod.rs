#![allow(dead_code)]

use sailsnav_lsp::{Backend, Settings};
use std::fs;
use std::path::Path;
use tower_lsp::LanguageServer;
use tower_lsp::lsp_types::*;

pub const USER_SERVICE: &str = "\
module.exports = {
  findById: function (id) {
    return User.findOne({ id: id });
  },

  create(attrs) {
    return User.create(attrs);
  },
};
";

/// `UserService.findById` sits on line 1; `UserService` spans columns
/// 21..32 and `findById` 33..41.
pub const CONTROLLER: &str = "\
async function show(req, res) {
  const user = await UserService.findById(req.param('id'));
  return res.json(user);
}
";

pub fn create_test_backend() -> Backend {
    Backend::new_test()
}

/// Write `files` (relative path, content) under a fresh temp directory.
pub fn create_files(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (rel_path, content) in files {
        let full = dir.path().join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create dirs");
        }
        fs::write(&full, content).expect("failed to write file");
    }
    dir
}

/// Helper: create a temp workspace with the given files, then return a
/// Backend whose module index was built from the default settings.
pub fn create_workspace(files: &[(&str, &str)]) -> (Backend, tempfile::TempDir) {
    let dir = create_files(files);
    let backend = Backend::new_test_with_workspace(dir.path().to_path_buf(), Settings::default());
    (backend, dir)
}

pub fn file_uri(root: &Path, rel_path: &str) -> Url {
    Url::from_file_path(root.join(rel_path)).expect("absolute path")
}

pub fn pos(line: u32, character: u32) -> Position {
    Position { line, character }
}

pub fn range(start: (u32, u32), end: (u32, u32)) -> Range {
    Range {
        start: pos(start.0, start.1),
        end: pos(end.0, end.1),
    }
}

pub async fn open_file(backend: &Backend, uri: &Url, text: &str) {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "javascript".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

pub async fn goto_definition(
    backend: &Backend,
    uri: &Url,
    position: Position,
) -> Option<GotoDefinitionResponse> {
    backend
        .goto_definition(GotoDefinitionParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
                position,
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap()
}
