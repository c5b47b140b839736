//! Reconstructed binding model: keys, declarations and container descriptors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A type descriptor: a fully-qualified name plus generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Fully-qualified type name.
    pub name: String,
    /// Generic arguments, empty for non-generic types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Creates a non-generic type reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), args: Vec::new() }
    }

    /// Creates a generic type reference with the given arguments.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self { name: name.into(), args }
    }
}

/// A binding qualifier, modelled per supported shape.
///
/// Qualifier rendering must be total and deterministic, so each shape the
/// runtime can attach is an explicit variant instead of an opaque
/// reflection handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    /// Value-carrying qualifier, e.g. `@Named("db")`.
    Named {
        /// Qualifier annotation type name.
        annotation: String,
        /// Qualifier value.
        value: String,
    },
    /// Marker qualifier with no members, e.g. `@Admin`.
    Marker {
        /// Qualifier annotation type name.
        annotation: String,
    },
    /// Synthetic uniquifier attached by the runtime's internal machinery
    /// to keep otherwise identical keys distinct.
    Unique {
        /// Internal facility that minted the uniquifier.
        owner: String,
    },
}

impl Qualifier {
    /// Returns the qualifier annotation type name.
    #[must_use]
    pub fn annotation_name(&self) -> &str {
        match self {
            Self::Named { annotation, .. } | Self::Marker { annotation } => annotation,
            Self::Unique { owner } => owner,
        }
    }

    /// Returns `true` for runtime-internal uniquifier qualifiers.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        matches!(self, Self::Unique { .. })
    }
}

/// Immutable binding identity: a type plus an optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BindingKey {
    /// Bound type.
    pub type_ref: TypeRef,
    /// Optional qualifier discriminating bindings of the same type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<Qualifier>,
}

impl BindingKey {
    /// Creates a key for the given type with no qualifier.
    #[must_use]
    pub fn simple(type_name: impl Into<String>) -> Self {
        Self { type_ref: TypeRef::new(type_name), qualifier: None }
    }

    /// Creates a key for the given type and qualifier.
    #[must_use]
    pub fn qualified(type_name: impl Into<String>, qualifier: Qualifier) -> Self {
        Self { type_ref: TypeRef::new(type_name), qualifier: Some(qualifier) }
    }
}

/// Binding lifecycle policy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    /// Single instance per runtime.
    Singleton,
    /// Singleton created eagerly at startup. Normalized to
    /// [`ScopeKind::Singleton`] during enrichment.
    EagerSingleton,
    /// New instance per injection.
    Prototype,
    /// Instance per web request.
    RequestScoped,
    /// Instance per web session.
    SessionScoped,
    /// Runtime-specific scope, identified by name.
    Custom(String),
}

impl ScopeKind {
    /// Returns the stable scope name used in reports and sorting.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Singleton => "Singleton",
            Self::EagerSingleton => "EagerSingleton",
            Self::Prototype => "Prototype",
            Self::RequestScoped => "RequestScoped",
            Self::SessionScoped => "SessionScoped",
            Self::Custom(name) => name,
        }
    }
}

/// The shape of a reconstructed binding declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    /// Binding to a pre-built instance.
    Instance,
    /// Binding to a user-supplied provider instance.
    ProviderInstance,
    /// Binding to another key's provider.
    ProviderKey,
    /// Binding linked to another key.
    LinkedKey,
    /// Binding with no explicit target (implementation is the key type).
    Untargeted,
    /// Constant converted from another key's value.
    ConvertedConstant,
    /// Re-declaration exposing a private-scope binding outward.
    Exposed,
    /// Binding declared by a provider method on a container.
    ProviderMethod,
    /// Constructor binding, the resolved runtime form of an untargeted
    /// binding.
    ConstructorBinding,
    /// Scope registration; carries no binding key.
    Scope,
    /// Type listener registration; carries no binding key.
    TypeListener,
    /// Provision listener registration; carries no binding key.
    ProvisionListener,
    /// Type converter registration; carries no binding key.
    TypeConverter,
    /// Http filter registration by target key.
    FilterKey,
    /// Http filter registration by instance.
    FilterInstance,
    /// Http servlet registration by target key.
    ServletKey,
    /// Http servlet registration by instance.
    ServletInstance,
    /// Interceptor registration; carries no binding key.
    Interceptor,
}

impl DeclarationKind {
    /// Returns the lower-case kind label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::ProviderInstance => "providerinstance",
            Self::ProviderKey => "providerkey",
            Self::LinkedKey => "linkedkey",
            Self::Untargeted => "untargeted",
            Self::ConvertedConstant => "convertedconstant",
            Self::Exposed => "exposed",
            Self::ProviderMethod => "providermethod",
            Self::ConstructorBinding => "binding",
            Self::Scope => "scope",
            Self::TypeListener => "typelistener",
            Self::ProvisionListener => "provisionlistener",
            Self::TypeConverter => "typeconverter",
            Self::FilterKey => "filterkey",
            Self::FilterInstance => "filterinstance",
            Self::ServletKey => "servletkey",
            Self::ServletInstance => "servletinstance",
            Self::Interceptor => "interceptor",
        }
    }
}

/// Semantic tag attached to declarations and containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Container is the registration point of a private scope.
    Private,
    /// Declaration's key is exposed outside its private scope.
    Exposed,
    /// Live binding has interceptors attached.
    Aop,
    /// Multi-valued collection binding wrapper.
    Multibinding,
    /// Optional binding wrapper.
    OptionalBinding,
    /// Web-capable container.
    Web,
}

impl Marker {
    /// Returns the upper-case marker label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Exposed => "EXPOSED",
            Self::Aop => "AOP",
            Self::Multibinding => "MULTIBINDING",
            Self::OptionalBinding => "OPTIONAL",
            Self::Web => "WEB",
        }
    }
}

/// One reconstructed binding declaration, owned by its parent container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDeclaration {
    /// Declaration shape.
    pub kind: DeclarationKind,
    /// Binding key; absent for declarations such as interceptor registrations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<BindingKey>,
    /// Target key for linked declarations; presence marks the "real"
    /// declaration when the same key is re-declared by an exposure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<BindingKey>,
    /// Rendered provider identity for provider-backed declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provided_by: Option<String>,
    /// Lifecycle scope resolved against the live runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeKind>,
    /// Declaration-site locator (stack-frame-like string or class name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Declaration-site line number, used only for stable ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,
    /// Identity of the immediately-declaring container.
    pub module: String,
    /// Additional free-form data (converter identity, interceptor note).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special: Vec<String>,
    /// Semantic tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub markers: BTreeSet<Marker>,
}

/// A declaring container: a named grouping of binding declarations that may
/// install other containers, forming a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    /// Container type identity, or the JIT sentinel for ungrouped bindings.
    pub type_name: String,
    /// Identity of the installing container, `None` for roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Installed containers, populated and ordered after tree assembly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContainerDescriptor>,
    /// Declarations owned by this container, in deterministic order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub declarations: Vec<BindingDeclaration>,
    /// Semantic tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub markers: BTreeSet<Marker>,
    /// `true` only for the registration point of a private scope.
    #[serde(default)]
    pub private_scope_entry: bool,
}

impl ContainerDescriptor {
    /// Creates an empty descriptor with the observed parent.
    #[must_use]
    pub fn new(type_name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parent,
            children: Vec::new(),
            declarations: Vec::new(),
            markers: BTreeSet::new(),
            private_scope_entry: false,
        }
    }

    /// Returns `true` for the sentinel container grouping JIT and other
    /// ungrouped bindings.
    #[must_use]
    pub fn is_jit(&self) -> bool {
        self.type_name == crate::chain::JIT_CONTAINER
    }
}
