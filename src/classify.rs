//! Declaration classification: one opaque record in, a typed outcome out.
//!
//! Nested private scopes are an expected alternate outcome of
//! classification, not a failure, so the result is a tagged enum rather
//! than an error path.

use std::collections::BTreeSet;

use tracing::warn;

use crate::chain::{original_source, resolve_chain};
use crate::model::{BindingDeclaration, BindingKey, DeclarationKind, Qualifier};
use crate::record::{DeclarationRecord, PrivateScopePayload, RecordKind, SourceLocator};
use crate::render::render_key;

/// Qualifier type name the runtime uses for multi-valued collection
/// binding wrappers. Naming-convention match; unrecognized conventions are
/// simply not tagged.
const MULTIBINDING_QUALIFIER: &str = "MultiElement";

/// Qualifier type name prefix the runtime uses for optional binding
/// wrappers.
const OPTIONAL_WRAPPER_PREFIX: &str = "OptionalBinder";

/// Payload of a detected nested isolated scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateScopeSignal {
    /// The scope's own records.
    pub records: Vec<DeclarationRecord>,
    /// Keys the scope exposes outward.
    pub exposed_keys: BTreeSet<BindingKey>,
    /// Identity of the container in which the scope was registered.
    pub declaring_container: String,
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// The record is reportable and was turned into a declaration.
    Declaration(Box<BindingDeclaration>),
    /// The record carries no reportable information.
    Skipped,
    /// The record is a nested isolated scope, handled out-of-band.
    PrivateScope(PrivateScopeSignal),
}

/// Classifies one low-level record.
///
/// Internal bookkeeping records and instance bindings keyed by a
/// runtime-internal uniquifier are skipped. Nested scopes produce a
/// [`PrivateScopeSignal`]. Everything else becomes a declaration with its
/// source, declaring container and wrapper markers resolved; enrichment
/// against the live runtime happens separately.
#[must_use]
pub fn classify(record: &DeclarationRecord) -> Classified {
    let (kind, key, target, provided_by, special) = match &record.kind {
        RecordKind::Internal => return Classified::Skipped,
        RecordKind::PrivateScope(payload) => return private_scope_signal(record, payload),
        RecordKind::Instance { key } => {
            if key.qualifier.as_ref().is_some_and(Qualifier::is_unique) {
                // Uniquified instance bindings are infrastructure registrations
                // (e.g. filter instances) already reported elsewhere.
                return Classified::Skipped;
            }
            (DeclarationKind::Instance, Some(key.clone()), None, None, Vec::new())
        }
        RecordKind::ProviderInstance { key, provider } => (
            DeclarationKind::ProviderInstance,
            Some(key.clone()),
            None,
            Some(provider.clone()),
            Vec::new(),
        ),
        RecordKind::ProviderKey { key, provider_key } => (
            DeclarationKind::ProviderKey,
            Some(key.clone()),
            None,
            Some(render_key(Some(provider_key))),
            Vec::new(),
        ),
        RecordKind::LinkedKey { key, target } => (
            DeclarationKind::LinkedKey,
            Some(key.clone()),
            Some(target.clone()),
            None,
            Vec::new(),
        ),
        RecordKind::Untargeted { key } => {
            (DeclarationKind::Untargeted, Some(key.clone()), None, None, Vec::new())
        }
        RecordKind::ConvertedConstant { key, source_key, converter } => (
            DeclarationKind::ConvertedConstant,
            Some(key.clone()),
            Some(source_key.clone()),
            None,
            vec![format!("converted by {converter}")],
        ),
        RecordKind::Exposed { key } => {
            (DeclarationKind::Exposed, Some(key.clone()), None, None, Vec::new())
        }
        RecordKind::ProviderMethod { key, method } => (
            DeclarationKind::ProviderMethod,
            Some(key.clone()),
            None,
            Some(method.clone()),
            Vec::new(),
        ),
        RecordKind::Constructor { key } => {
            (DeclarationKind::ConstructorBinding, Some(key.clone()), None, None, Vec::new())
        }
        RecordKind::Scope { .. } => {
            // The registered scope itself is attached below, outside the
            // shared tuple.
            (DeclarationKind::Scope, None, None, None, Vec::new())
        }
        RecordKind::TypeListener { listener } => {
            (DeclarationKind::TypeListener, None, None, None, vec![listener.clone()])
        }
        RecordKind::ProvisionListener { listeners } => {
            (DeclarationKind::ProvisionListener, None, None, None, listeners.clone())
        }
        RecordKind::TypeConverter { converter } => {
            (DeclarationKind::TypeConverter, None, None, None, vec![converter.clone()])
        }
        RecordKind::FilterKey { key, pattern } => (
            DeclarationKind::FilterKey,
            Some(key.clone()),
            None,
            None,
            vec![pattern.clone()],
        ),
        RecordKind::FilterInstance { instance, pattern } => (
            DeclarationKind::FilterInstance,
            None,
            None,
            None,
            vec![instance.clone(), pattern.clone()],
        ),
        RecordKind::ServletKey { key, pattern } => (
            DeclarationKind::ServletKey,
            Some(key.clone()),
            None,
            None,
            vec![pattern.clone()],
        ),
        RecordKind::ServletInstance { instance, pattern } => (
            DeclarationKind::ServletInstance,
            None,
            None,
            None,
            vec![instance.clone(), pattern.clone()],
        ),
        RecordKind::Interceptor { description } => {
            (DeclarationKind::Interceptor, None, None, None, vec![description.clone()])
        }
    };

    let module = resolve_chain(&record.source).swap_remove(0);
    let mut declaration = BindingDeclaration {
        kind,
        key,
        target,
        provided_by,
        scope: None,
        source: None,
        source_line: None,
        module,
        special,
        markers: BTreeSet::new(),
    };
    if let RecordKind::Scope { scope } = &record.kind {
        declaration.scope = Some(scope.clone());
    }
    fill_source(&mut declaration, record);
    tag_wrapper_key(&mut declaration);
    Classified::Declaration(Box::new(declaration))
}

fn private_scope_signal(record: &DeclarationRecord, payload: &PrivateScopePayload) -> Classified {
    let declaring_container = resolve_chain(&record.source).swap_remove(0);
    Classified::PrivateScope(PrivateScopeSignal {
        records: payload.records.clone(),
        exposed_keys: payload.exposed_keys.clone(),
        declaring_container,
    })
}

/// Resolves the human-readable declaration site. Unknown sources are logged
/// and left unset; a missing source is never fatal.
fn fill_source(declaration: &mut BindingDeclaration, record: &DeclarationRecord) {
    match &original_source(&record.source).locator {
        Some(SourceLocator::Frame { frame, line }) => {
            declaration.source = Some(frame.clone());
            declaration.source_line = Some(*line);
        }
        Some(SourceLocator::Type { name }) => declaration.source = Some(name.clone()),
        Some(SourceLocator::Synthetic { note }) => declaration.source = Some(note.clone()),
        None => warn!(
            kind = declaration.kind.label(),
            key = %render_key(declaration.key.as_ref()),
            "unknown declaration source"
        ),
    }
}

/// Tags special-purpose wrapper keys detected by qualifier-type naming
/// convention.
fn tag_wrapper_key(declaration: &mut BindingDeclaration) {
    let Some(qualifier) = declaration.key.as_ref().and_then(|key| key.qualifier.as_ref()) else {
        return;
    };
    let name = qualifier.annotation_name();
    if name == MULTIBINDING_QUALIFIER {
        declaration.markers.insert(crate::model::Marker::Multibinding);
    }
    if name.starts_with(OPTIONAL_WRAPPER_PREFIX) {
        declaration.markers.insert(crate::model::Marker::OptionalBinding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Marker, ScopeKind};
    use crate::record::{LiveFacts, RecordSource};

    fn source_in(module: &str) -> RecordSource {
        RecordSource {
            chain: vec![module.to_string()],
            original: None,
            locator: Some(SourceLocator::Frame {
                frame: format!("{module}.configure({module}.java:10)"),
                line: 10,
            }),
        }
    }

    fn declaration(record: &DeclarationRecord) -> BindingDeclaration {
        match classify(record) {
            Classified::Declaration(dec) => *dec,
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn linked_record_keeps_key_target_and_source() {
        let record = DeclarationRecord::new(
            RecordKind::LinkedKey {
                key: BindingKey::simple("Repository"),
                target: BindingKey::simple("SqlRepository"),
            },
            source_in("DbModule"),
        );
        let dec = declaration(&record);
        assert_eq!(dec.kind, DeclarationKind::LinkedKey);
        assert_eq!(dec.key, Some(BindingKey::simple("Repository")));
        assert_eq!(dec.target, Some(BindingKey::simple("SqlRepository")));
        assert_eq!(dec.module, "DbModule");
        assert_eq!(dec.source.as_deref(), Some("DbModule.configure(DbModule.java:10)"));
        assert_eq!(dec.source_line, Some(10));
    }

    #[test]
    fn internal_record_is_skipped() {
        let record = DeclarationRecord::new(RecordKind::Internal, source_in("DbModule"));
        assert_eq!(classify(&record), Classified::Skipped);
    }

    #[test]
    fn uniquified_instance_binding_is_skipped() {
        let key = BindingKey::qualified(
            "FilterRegistration",
            Qualifier::Unique { owner: "UniqueAnnotations".to_string() },
        );
        let record =
            DeclarationRecord::new(RecordKind::Instance { key }, source_in("WebModule"));
        assert_eq!(classify(&record), Classified::Skipped);
    }

    #[test]
    fn interceptor_record_has_no_key() {
        let record = DeclarationRecord::new(
            RecordKind::Interceptor { description: "method interceptor".to_string() },
            source_in("AopModule"),
        );
        let dec = declaration(&record);
        assert_eq!(dec.kind, DeclarationKind::Interceptor);
        assert!(dec.key.is_none());
        assert_eq!(dec.special, vec!["method interceptor".to_string()]);
    }

    #[test]
    fn scope_registration_carries_the_registered_scope() {
        let record = DeclarationRecord::new(
            RecordKind::Scope { scope: ScopeKind::RequestScoped },
            source_in("WebModule"),
        );
        let dec = declaration(&record);
        assert_eq!(dec.kind, DeclarationKind::Scope);
        assert!(dec.key.is_none());
        assert_eq!(dec.scope, Some(ScopeKind::RequestScoped));
    }

    #[test]
    fn listener_registrations_keep_their_payloads() {
        let type_listener = DeclarationRecord::new(
            RecordKind::TypeListener { listener: "AuditListener".to_string() },
            source_in("AuditModule"),
        );
        let dec = declaration(&type_listener);
        assert_eq!(dec.kind, DeclarationKind::TypeListener);
        assert!(dec.key.is_none());
        assert_eq!(dec.special, vec!["AuditListener".to_string()]);

        let provision_listener = DeclarationRecord::new(
            RecordKind::ProvisionListener {
                listeners: vec!["First".to_string(), "Second".to_string()],
            },
            source_in("AuditModule"),
        );
        let dec = declaration(&provision_listener);
        assert_eq!(dec.kind, DeclarationKind::ProvisionListener);
        assert_eq!(dec.special, vec!["First".to_string(), "Second".to_string()]);
    }

    #[test]
    fn type_converter_registration_keeps_the_converter_identity() {
        let record = DeclarationRecord::new(
            RecordKind::TypeConverter { converter: "DurationConverter".to_string() },
            source_in("CoreModule"),
        );
        let dec = declaration(&record);
        assert_eq!(dec.kind, DeclarationKind::TypeConverter);
        assert!(dec.key.is_none());
        assert_eq!(dec.special, vec!["DurationConverter".to_string()]);
    }

    #[test]
    fn provider_method_records_its_declaring_method() {
        let record = DeclarationRecord::new(
            RecordKind::ProviderMethod {
                key: BindingKey::simple("DataSource"),
                method: "DbModule.dataSource()".to_string(),
            },
            source_in("DbModule"),
        );
        let dec = declaration(&record);
        assert_eq!(dec.kind, DeclarationKind::ProviderMethod);
        assert_eq!(dec.key, Some(BindingKey::simple("DataSource")));
        assert_eq!(dec.provided_by.as_deref(), Some("DbModule.dataSource()"));
    }

    #[test]
    fn constructor_binding_reports_under_the_binding_label() {
        let record = DeclarationRecord::new(
            RecordKind::Constructor { key: BindingKey::simple("Service") },
            source_in("AppModule"),
        );
        let dec = declaration(&record);
        assert_eq!(dec.kind, DeclarationKind::ConstructorBinding);
        assert_eq!(dec.kind.label(), "binding");
        assert_eq!(dec.key, Some(BindingKey::simple("Service")));
    }

    #[test]
    fn servlet_and_filter_registrations_carry_the_url_pattern() {
        let filter = DeclarationRecord::new(
            RecordKind::FilterKey {
                key: BindingKey::simple("AuthFilter"),
                pattern: "/admin/*".to_string(),
            },
            source_in("WebModule"),
        );
        let dec = declaration(&filter);
        assert_eq!(dec.kind, DeclarationKind::FilterKey);
        assert_eq!(dec.key, Some(BindingKey::simple("AuthFilter")));
        assert_eq!(dec.special, vec!["/admin/*".to_string()]);

        let servlet = DeclarationRecord::new(
            RecordKind::ServletInstance {
                instance: "StatusServlet@1a2b".to_string(),
                pattern: "/status".to_string(),
            },
            source_in("WebModule"),
        );
        let dec = declaration(&servlet);
        assert_eq!(dec.kind, DeclarationKind::ServletInstance);
        assert!(dec.key.is_none());
        assert_eq!(
            dec.special,
            vec!["StatusServlet@1a2b".to_string(), "/status".to_string()]
        );
    }

    #[test]
    fn private_scope_record_raises_signal_with_declaring_container() {
        let inner = DeclarationRecord::new(
            RecordKind::Untargeted { key: BindingKey::simple("Hidden") },
            source_in("InnerModule"),
        );
        let record = DeclarationRecord::new(
            RecordKind::PrivateScope(PrivateScopePayload {
                records: vec![inner],
                exposed_keys: BTreeSet::from([BindingKey::simple("Hidden")]),
            }),
            RecordSource::chain_only(vec!["Outer".to_string()]),
        );
        match classify(&record) {
            Classified::PrivateScope(signal) => {
                assert_eq!(signal.declaring_container, "Outer");
                assert_eq!(signal.records.len(), 1);
                assert!(signal.exposed_keys.contains(&BindingKey::simple("Hidden")));
            }
            other => panic!("expected private-scope signal, got {other:?}"),
        }
    }

    #[test]
    fn multibinding_wrapper_key_is_tagged_by_convention() {
        let key = BindingKey::qualified(
            "Plugin",
            Qualifier::Named { annotation: MULTIBINDING_QUALIFIER.to_string(), value: "0".to_string() },
        );
        let record =
            DeclarationRecord::new(RecordKind::Untargeted { key }, source_in("PluginModule"));
        let dec = declaration(&record);
        assert!(dec.markers.contains(&Marker::Multibinding));
    }

    #[test]
    fn optional_wrapper_key_is_tagged_by_prefix() {
        let key = BindingKey::qualified(
            "Cache",
            Qualifier::Marker { annotation: "OptionalBinderDefault".to_string() },
        );
        let record =
            DeclarationRecord::new(RecordKind::Untargeted { key }, source_in("CacheModule"));
        let dec = declaration(&record);
        assert!(dec.markers.contains(&Marker::OptionalBinding));
    }

    #[test]
    fn unrecognized_qualifier_convention_is_not_tagged() {
        let key = BindingKey::qualified(
            "Cache",
            Qualifier::Marker { annotation: "SomeFutureWrapper".to_string() },
        );
        let record =
            DeclarationRecord::new(RecordKind::Untargeted { key }, source_in("CacheModule"));
        let dec = declaration(&record);
        assert!(dec.markers.is_empty());
    }

    #[test]
    fn class_fallback_source_has_no_line() {
        let record = DeclarationRecord::new(
            RecordKind::Untargeted { key: BindingKey::simple("JitService") },
            RecordSource {
                chain: vec![],
                original: None,
                locator: Some(SourceLocator::Type { name: "JitService".to_string() }),
            },
        )
        .with_live(LiveFacts { scope: None, interceptors: 0 });
        let dec = declaration(&record);
        assert_eq!(dec.module, crate::chain::JIT_CONTAINER);
        assert_eq!(dec.source.as_deref(), Some("JitService"));
        assert!(dec.source_line.is_none());
    }

    #[test]
    fn missing_locator_leaves_source_unset() {
        let record = DeclarationRecord::new(
            RecordKind::Untargeted { key: BindingKey::simple("Service") },
            RecordSource::chain_only(vec!["AppModule".to_string()]),
        );
        let dec = declaration(&record);
        assert!(dec.source.is_none());
        assert!(dec.source_line.is_none());
    }
}
