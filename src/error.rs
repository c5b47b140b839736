//! Error taxonomy of the introspection pass.
//!
//! Only model inconsistencies are fatal; every other irregularity degrades
//! to partial output with a logged warning, because a diagnostics subsystem
//! must never be the reason a correctly-configured application fails.

use thiserror::Error;

/// Fatal introspection failure, aborting the whole pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// Two declaration chains disagree about where a container was
    /// installed. This indicates a contradictory runtime configuration and
    /// is never silently patched over.
    #[error(
        "parents don't match for container {container}: '{existing}' and '{observed}' in chain ({chain})"
    )]
    ParentMismatch {
        /// Container with conflicting parents.
        container: String,
        /// Parent recorded first, `<root>` when the container was a root.
        existing: String,
        /// Parent observed later, `<root>` when observed at a chain end.
        observed: String,
        /// Chain that triggered the conflict, innermost first.
        chain: String,
    },
}

impl ModelError {
    /// Builds a parent-mismatch error from the raw observations.
    #[must_use]
    pub(crate) fn parent_mismatch(
        container: &str,
        existing: Option<&str>,
        observed: Option<&str>,
        chain: &[String],
    ) -> Self {
        Self::ParentMismatch {
            container: container.to_string(),
            existing: existing.unwrap_or("<root>").to_string(),
            observed: observed.unwrap_or("<root>").to_string(),
            chain: chain.join("-"),
        }
    }
}
