/// Goto definition for globally injected modules.
///
/// Sails makes every service and model available as a bare global, so a
/// reference such as `UserService.findById(id)` has no import for the
/// editor to follow.  This module resolves such references by parsing both
/// the calling file and the module file and matching them structurally.
///
/// Supported references:
///   - **Modules**: `UserService` jumps to the file's `module.exports`
///   - **Members**: `UserService.findById` jumps to the `findById` key of
///     the exported object literal, falling back to `module.exports` when
///     the export is not an object literal or has no such key
///
/// - `target`: What is under the cursor — word span, exact node match
///   in the calling file and classification into module / member names.
/// - `export`: Where it is defined — the `module.exports = ...`
///   assignment in the module file and the matching key inside it.
/// - `resolve`: The request pipeline, including the deference step that
///   lets the editor's own providers answer first.
mod export;
mod resolve;
mod target;

pub use resolve::resolve;
pub use target::{find_reference, word_span_at};
