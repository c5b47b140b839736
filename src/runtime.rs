//! Port trait for the live DI runtime.
//!
//! The introspection pass never touches the runtime directly; everything it
//! needs is behind this read-only, side-effect-free interface, so callers can
//! wire a real runtime, a recorded snapshot, or nothing at all.

use crate::model::BindingKey;
use crate::record::DeclarationRecord;

/// Read-only query interface over the live DI runtime.
pub trait LiveRuntime {
    /// Returns the record of the binding currently resolved for `key`, or
    /// `None` when the runtime holds no live binding for it. The returned
    /// record carries [`crate::record::LiveFacts`] when available.
    fn existing_binding(&self, key: &BindingKey) -> Option<DeclarationRecord>;

    /// Returns `true` when the container type is web-capable. Used only to
    /// tag containers in the report.
    fn is_web_container(&self, _type_name: &str) -> bool {
        false
    }
}

/// Runtime adapter with no live state, for pure static-record analysis.
///
/// Every lookup misses, so declarations keep whatever facts their records
/// carry and exposed keys without live resolution are silently omitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRuntime;

impl LiveRuntime for OfflineRuntime {
    fn existing_binding(&self, _key: &BindingKey) -> Option<DeclarationRecord> {
        None
    }
}
