//! Introspection entry points: fold the runtime's record stream into a
//! sorted, enriched forest of container descriptors.

use crate::chain::resolve_chain;
use crate::classify::{classify, Classified};
use crate::enrich::enrich;
use crate::error::ModelError;
use crate::merge::merge_private_scope;
use crate::model::{BindingDeclaration, ContainerDescriptor};
use crate::record::DeclarationRecord;
use crate::runtime::LiveRuntime;
use crate::sort::sort_forest;
use crate::tree::ContainerIndex;

/// Runs the full introspection pass over a record stream.
///
/// Records are classified in declaration order, enriched against the live
/// runtime, folded into the container tree (private scopes merged
/// out-of-band) and deterministically sorted. The whole computation is a
/// pure fold plus read-only runtime queries; two runs over the same input
/// produce identical output.
///
/// # Errors
///
/// Returns [`ModelError`] on model inconsistencies; see
/// [`ModelError::ParentMismatch`].
pub fn build_forest(
    runtime: &dyn LiveRuntime,
    records: &[DeclarationRecord],
) -> Result<Vec<ContainerDescriptor>, ModelError> {
    let index = index_records(runtime, records)?;
    let mut forest = index.into_forest();
    sort_forest(&mut forest);
    Ok(forest)
}

/// Classifies and enriches a single record without tree context.
///
/// Returns `None` for records that carry no reportable declaration
/// (internal bookkeeping, uniquified infrastructure bindings and nested
/// scopes, which only make sense within a full pass).
#[must_use]
pub fn classify_single(
    runtime: &dyn LiveRuntime,
    record: &DeclarationRecord,
) -> Option<BindingDeclaration> {
    match classify(record) {
        Classified::Declaration(mut declaration) => {
            enrich(&mut declaration, record, runtime);
            Some(*declaration)
        }
        Classified::Skipped | Classified::PrivateScope(_) => None,
    }
}

/// Folds a record collection into a container index. Invoked once for the
/// outer pass and recursively per nested private scope.
pub(crate) fn index_records(
    runtime: &dyn LiveRuntime,
    records: &[DeclarationRecord],
) -> Result<ContainerIndex, ModelError> {
    let mut index = ContainerIndex::new();
    for record in records {
        match classify(record) {
            Classified::Skipped => {}
            Classified::Declaration(mut declaration) => {
                enrich(&mut declaration, record, runtime);
                let chain = resolve_chain(&record.source);
                index.insert_declaration(&chain, *declaration, runtime)?;
            }
            Classified::PrivateScope(signal) => {
                merge_private_scope(&mut index, runtime, &signal)?;
            }
        }
    }
    Ok(index)
}
