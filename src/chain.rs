//! Declaring-container chain resolution.
//!
//! Each record's source metadata carries a chain of container identities
//! (innermost first). This module extracts the chain a declaration should be
//! reported under, preferring original sources over repackaged ones and
//! collapsing synthetic containers that have no stable identity.

use crate::record::RecordSource;

/// Sentinel container identity grouping all ungrouped declarations: JIT
/// bindings created on demand by the runtime, and declarations whose entire
/// chain consisted of synthetic containers.
pub const JIT_CONTAINER: &str = "JIT";

/// Resolves the declaring-container chain for a record source.
///
/// Rules:
/// - A repackaged source is replaced by its original, so diagnostic
///   references point at user code rather than repackaging machinery.
/// - An absent chain means the binding was created on demand; the single
///   [`JIT_CONTAINER`] sentinel is returned.
/// - Synthetic (function-literal-style) identities are dropped from the
///   chain. When real containers remain above them the declaration attaches
///   directly to the nearest real container; when nothing remains the
///   sentinel is substituted so all synthetic declarations land together.
#[must_use]
pub fn resolve_chain(source: &RecordSource) -> Vec<String> {
    let source = original_source(source);
    if source.chain.is_empty() {
        return vec![JIT_CONTAINER.to_string()];
    }
    let chain: Vec<String> =
        source.chain.iter().filter(|name| !is_synthetic(name)).cloned().collect();
    if chain.is_empty() {
        return vec![JIT_CONTAINER.to_string()];
    }
    chain
}

/// Follows `original` links to the innermost source metadata.
pub(crate) fn original_source(source: &RecordSource) -> &RecordSource {
    let mut current = source;
    while let Some(original) = &current.original {
        current = original;
    }
    current
}

/// Synthetic containers carry compiler-generated identities (`$$` infix)
/// with no stable class behind them.
fn is_synthetic(name: &str) -> bool {
    name.contains("$$")
}
