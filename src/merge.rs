//! Splicing nested isolated scopes into the outer container index.
//!
//! A private scope's internal declarations are invisible from outside
//! except for its whitelisted exposed keys, so the scope's own record set
//! is indexed by a recursive sub-pass and merged afterwards. The recursion
//! makes nested private scopes work for free.

use tracing::warn;

use crate::classify::PrivateScopeSignal;
use crate::error::ModelError;
use crate::model::Marker;
use crate::render::render_key;
use crate::runtime::LiveRuntime;
use crate::tree::ContainerIndex;

/// Merges one private scope into the outer index.
///
/// The scope's records are indexed into a fresh index exactly like the
/// outer pass. Containers already known above the hierarchy are skipped;
/// among the rest, only the scope's registration point is tagged `PRIVATE`
/// and marked as the entry, and declarations of exposed keys get the
/// `EXPOSED` tag. Finally, because exposed keys never appear as ordinary
/// records at the outer level, their declarations are synthesized from the
/// live runtime; a key without live resolution is skipped — exposure
/// through more than one nesting level is only visible at the first level.
///
/// # Errors
///
/// Propagates [`ModelError`] from the recursive indexing of the scope's
/// records.
pub fn merge_private_scope(
    index: &mut ContainerIndex,
    runtime: &dyn LiveRuntime,
    signal: &PrivateScopeSignal,
) -> Result<(), ModelError> {
    let inner = crate::forest::index_records(runtime, &signal.records)?;

    for (id, mut container) in inner.into_entries() {
        if index.contains(&id) {
            continue;
        }
        if id == signal.declaring_container {
            // Only the actual registration point is private; containers that
            // are merely reachable through the scope stay untagged.
            container.private_scope_entry = true;
            container.markers.insert(Marker::Private);
        }
        for declaration in &mut container.declarations {
            if declaration.key.as_ref().is_some_and(|key| signal.exposed_keys.contains(key)) {
                declaration.markers.insert(Marker::Exposed);
            }
        }
        index.insert(id, container);
    }

    for key in &signal.exposed_keys {
        let Some(record) = runtime.existing_binding(key) else {
            // Known limitation: only first-level exposure is externally
            // visible when private scopes nest.
            continue;
        };
        let Some(declaration) = crate::forest::classify_single(runtime, &record) else {
            continue;
        };
        match index.get_mut(&declaration.module) {
            Some(container) => container.declarations.push(declaration),
            None => warn!(
                key = %render_key(Some(key)),
                module = %declaration.module,
                "exposed binding resolved to an unknown container"
            ),
        }
    }
    Ok(())
}
