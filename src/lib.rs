//! Binding-declaration introspection for dependency-injection runtimes.
//!
//! `bindlens` walks a DI runtime's flat stream of low-level declaration
//! records and rebuilds the logical hierarchy of declaring containers as a
//! deterministic, enriched forest for diagnostic reports and test
//! assertions. It is strictly read-only: the runtime is consulted through
//! the [`runtime::LiveRuntime`] port and never mutated, and a diagnostics
//! failure is never allowed to break a correctly-configured application —
//! the only fatal condition is a contradictory container model.
//!
//! The usual entry point is [`build_forest`]:
//!
//! ```
//! use bindlens::record::{DeclarationRecord, RecordKind, RecordSource};
//! use bindlens::{build_forest, BindingKey, OfflineRuntime};
//!
//! let records = vec![DeclarationRecord::new(
//!     RecordKind::Untargeted { key: BindingKey::simple("Service") },
//!     RecordSource::chain_only(vec!["AppModule".to_string()]),
//! )];
//! let forest = build_forest(&OfflineRuntime, &records)?;
//! assert_eq!(forest[0].type_name, "AppModule");
//! # Ok::<(), bindlens::ModelError>(())
//! ```

pub mod analysis;
pub mod chain;
pub mod classify;
pub mod enrich;
pub mod error;
pub mod forest;
pub mod merge;
pub mod model;
pub mod record;
pub mod render;
pub mod runtime;
pub mod sort;
pub mod tree;

pub use error::ModelError;
pub use forest::{build_forest, classify_single};
pub use model::{
    BindingDeclaration, BindingKey, ContainerDescriptor, DeclarationKind, Marker, Qualifier,
    ScopeKind, TypeRef,
};
pub use render::render_key;
pub use runtime::{LiveRuntime, OfflineRuntime};
