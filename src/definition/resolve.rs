/// Goto-definition resolution.
///
/// Given a cursor position in a JavaScript file this module:
///   1. Lets the editor's own definition providers answer first, and stays
///      silent if they find anything.
///   2. Extracts the word under the cursor and finds the identifier node
///      spanning exactly that word.
///   3. Splits it into a module name and an optional member name.
///   4. Looks the module up in the [`ModuleIndex`].
///   5. Parses the module file and finds its `module.exports` assignment
///      (or the requested key inside it).
///   6. Returns a location the editor can jump to.
use tower_lsp::lsp_types::*;
use tracing::{debug, warn};

use crate::Backend;
use crate::error::ResolveError;
use crate::module_index::ModuleIndex;
use crate::syntax::parse_javascript;
use crate::types::{CursorQuery, DefinitionLocation, ExportTarget};
use crate::util::span_to_range;

use super::export::find_export;
use super::target::find_reference;

/// Resolve the reference under the cursor to its definition.
///
/// This is the synchronous core (steps 2–6); it never consults the editor.
pub fn resolve(
    query: &CursorQuery<'_>,
    index: &ModuleIndex,
) -> Result<DefinitionLocation, ResolveError> {
    let (_, reference) = find_reference(query.text, query.position)?;

    let file_path = index
        .get(&reference.object_name)
        .ok_or_else(|| ResolveError::UnknownModule {
            name: reference.object_name.clone(),
        })?
        .to_path_buf();

    let content =
        std::fs::read_to_string(&file_path).map_err(|source| ResolveError::CandidateUnreadable {
            path: file_path.clone(),
            source,
        })?;

    let parsed = parse_javascript(&content)?;
    if parsed.is_malformed() {
        return Err(ResolveError::CandidateUnparsable { path: file_path });
    }

    let Some((span, target)) = find_export(&parsed, reference.property_name.as_deref()) else {
        return Err(ResolveError::NoExportFound { path: file_path });
    };

    if let ExportTarget::ExportStatement {
        requested: Some(property),
    } = &target
    {
        debug!(
            module = %reference.object_name,
            property = %property,
            "member not found in export, falling back to module.exports"
        );
    }

    Ok(DefinitionLocation {
        range: span_to_range(&content, span),
        file_path,
        target,
    })
}

impl Backend {
    /// Handle a "go to definition" request.
    ///
    /// Returns `Some(Location)` when the symbol under the cursor is a
    /// known module (or one of its members) and the editor's own providers
    /// found nothing.  Every failure collapses to `None`.
    pub async fn resolve_definition(
        &self,
        uri: &Url,
        content: &str,
        position: Position,
    ) -> Option<Location> {
        // ── Deference: let the editor answer first ──
        if let Some(host) = self.host.as_ref().filter(|_| self.defer_to_host()) {
            let Some(ticket) = self.deference.enter() else {
                debug!(%uri, "nested definition request during deference, skipping");
                return None;
            };
            let host_result = host.host_definitions(uri, position).await;
            drop(ticket);

            match host_result {
                Ok(locations) if !locations.is_empty() => return None,
                Ok(_) => {}
                Err(e) => warn!(error = %e, "host definition request failed"),
            }
        }

        let index = self.module_index.get()?;
        let query = CursorQuery {
            text: content,
            position,
        };

        match resolve(&query, index) {
            Ok(definition) => definition.to_location(),
            Err(e) => {
                match &e {
                    ResolveError::NoTokenAtCursor | ResolveError::NotAnIdentifier { .. } => {
                        debug!(error = %e, "nothing to resolve")
                    }
                    _ => warn!(error = %e, "definition not found"),
                }
                None
            }
        }
    }
}
