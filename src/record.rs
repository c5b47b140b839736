//! Low-level declaration records as emitted by the DI runtime.
//!
//! Records are the opaque input of the introspection pass: a flat,
//! order-sensitive stream with only weak structural hints (the declaring
//! container chain carried by each record's source metadata).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{BindingKey, ScopeKind};

/// Declaration-site locator attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLocator {
    /// Stack-frame-like locator with a line number.
    Frame {
        /// Rendered frame, e.g. `DbModule.configure(DbModule.java:42)`.
        frame: String,
        /// Declaration line number.
        line: u32,
    },
    /// Class-name fallback, typical for JIT bindings.
    Type {
        /// Fully-qualified class name.
        name: String,
    },
    /// String marker used for declarations synthesized by surrounding tooling.
    Synthetic {
        /// Free-form synthesis note.
        note: String,
    },
}

/// Source metadata of one record: the declaring-container chain plus locator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordSource {
    /// Declaring container identities, innermost first, outermost last.
    /// Empty for implicit (JIT) bindings created on demand by the runtime.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chain: Vec<String>,
    /// Original source when the record was re-wrapped by an intermediate
    /// analysis step; preferred over the outer metadata when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<Box<RecordSource>>,
    /// Declaration-site locator, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<SourceLocator>,
}

impl RecordSource {
    /// Creates source metadata for the given chain with no locator.
    #[must_use]
    pub fn chain_only(chain: Vec<String>) -> Self {
        Self { chain, original: None, locator: None }
    }
}

/// Facts readable only from the live runtime's resolved form of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveFacts {
    /// Actually-configured scope, which may differ from the static declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeKind>,
    /// Number of behaviour interceptors attached to the binding.
    #[serde(default)]
    pub interceptors: usize,
}

/// Record payload of a nested isolated scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateScopePayload {
    /// The scope's own records, invisible to the outer pass.
    pub records: Vec<DeclarationRecord>,
    /// Keys the scope whitelists for outside visibility.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exposed_keys: BTreeSet<BindingKey>,
}

/// The shape-specific payload of a declaration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Binding to a pre-built instance.
    Instance {
        /// Binding key.
        key: BindingKey,
    },
    /// Binding to a user-supplied provider instance.
    ProviderInstance {
        /// Binding key.
        key: BindingKey,
        /// Provider identity rendering.
        provider: String,
    },
    /// Binding to another key's provider.
    ProviderKey {
        /// Binding key.
        key: BindingKey,
        /// Key of the provider.
        provider_key: BindingKey,
    },
    /// Binding linked to another key.
    LinkedKey {
        /// Binding key.
        key: BindingKey,
        /// Linked target key.
        target: BindingKey,
    },
    /// Binding with no explicit target.
    Untargeted {
        /// Binding key.
        key: BindingKey,
    },
    /// Constant converted from another key's value.
    ConvertedConstant {
        /// Binding key.
        key: BindingKey,
        /// Key the constant was converted from.
        source_key: BindingKey,
        /// Converter identity.
        converter: String,
    },
    /// Exposure re-declaration of a private-scope binding.
    Exposed {
        /// Exposed binding key.
        key: BindingKey,
    },
    /// Provider-method binding declared on a container method.
    ProviderMethod {
        /// Binding key.
        key: BindingKey,
        /// Rendered provider method identity.
        method: String,
    },
    /// Constructor binding, the resolved runtime form of an untargeted
    /// binding. Appears only in records taken from the live runtime.
    Constructor {
        /// Binding key.
        key: BindingKey,
    },
    /// Scope registration; carries no binding key. Module analysis only.
    Scope {
        /// Registered scope.
        scope: ScopeKind,
    },
    /// Type listener registration; carries no binding key.
    TypeListener {
        /// Rendered listener identity.
        listener: String,
    },
    /// Provision listener registration; carries no binding key.
    ProvisionListener {
        /// Rendered listener identities.
        listeners: Vec<String>,
    },
    /// Type converter registration; carries no binding key.
    TypeConverter {
        /// Rendered converter identity.
        converter: String,
    },
    /// Http filter registration by target key.
    FilterKey {
        /// Filter key.
        key: BindingKey,
        /// URL pattern the filter is mapped to.
        pattern: String,
    },
    /// Http filter registration by instance.
    FilterInstance {
        /// Rendered filter instance identity.
        instance: String,
        /// URL pattern the filter is mapped to.
        pattern: String,
    },
    /// Http servlet registration by target key.
    ServletKey {
        /// Servlet key.
        key: BindingKey,
        /// URL pattern the servlet is mapped to.
        pattern: String,
    },
    /// Http servlet registration by instance.
    ServletInstance {
        /// Rendered servlet instance identity.
        instance: String,
        /// URL pattern the servlet is mapped to.
        pattern: String,
    },
    /// Interceptor registration; carries no binding key.
    Interceptor {
        /// Registration description.
        description: String,
    },
    /// Implementation-internal bookkeeping record with no reportable
    /// information (injection requests, provider lookups, configuration
    /// options, and the runtime-side shadow bindings behind servlet and
    /// filter registrations).
    Internal,
    /// Nested isolated scope carrying its own record set.
    PrivateScope(PrivateScopePayload),
}

/// One opaque declaration record from the runtime's record stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    /// Shape-specific payload.
    pub kind: RecordKind,
    /// Source metadata.
    #[serde(default)]
    pub source: RecordSource,
    /// Live facts, present only when the record came from the live runtime
    /// rather than static module analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveFacts>,
}

impl DeclarationRecord {
    /// Creates a record with the given payload and source, without live facts.
    #[must_use]
    pub fn new(kind: RecordKind, source: RecordSource) -> Self {
        Self { kind, source, live: None }
    }

    /// Attaches live facts to the record.
    #[must_use]
    pub fn with_live(mut self, live: LiveFacts) -> Self {
        self.live = Some(live);
        self
    }
}
