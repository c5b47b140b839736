//! Scope and marker enrichment against the live runtime.
//!
//! Declaration-time scope information can be stale or incomplete for some
//! binding shapes, so the actually-configured scope and interception state
//! are read from the runtime's resolved binding whenever one exists.

use crate::model::{BindingDeclaration, Marker, ScopeKind};
use crate::record::DeclarationRecord;
use crate::runtime::LiveRuntime;

/// Enriches a declaration with live scope and interception facts.
///
/// Keyless declarations cannot be resolved and are left as-is. When the
/// runtime holds no live binding for the key, the record's own live facts
/// (present for records taken from the live runtime) are used instead; if
/// neither source applies the scope stays unset — the declaration may
/// describe an element that was never instantiated into the runtime.
pub fn enrich(
    declaration: &mut BindingDeclaration,
    record: &DeclarationRecord,
    runtime: &dyn LiveRuntime,
) {
    let Some(key) = &declaration.key else {
        return;
    };
    let facts = match runtime.existing_binding(key) {
        Some(live_record) => live_record.live,
        None => record.live.clone(),
    };
    let Some(facts) = facts else {
        return;
    };
    declaration.scope = facts.scope.map(normalize_scope);
    if facts.interceptors > 0 {
        declaration.markers.insert(Marker::Aop);
    }
}

/// The runtime-internal eager-singleton marker is an alias of singleton for
/// reporting purposes.
fn normalize_scope(scope: ScopeKind) -> ScopeKind {
    match scope {
        ScopeKind::EagerSingleton => ScopeKind::Singleton,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BindingKey, DeclarationKind};
    use crate::record::{LiveFacts, RecordKind, RecordSource};
    use crate::runtime::OfflineRuntime;
    use std::collections::BTreeSet;
    use std::collections::HashMap;

    struct FakeRuntime {
        bindings: HashMap<BindingKey, DeclarationRecord>,
    }

    impl LiveRuntime for FakeRuntime {
        fn existing_binding(&self, key: &BindingKey) -> Option<DeclarationRecord> {
            self.bindings.get(key).cloned()
        }
    }

    fn declaration(key: Option<BindingKey>) -> BindingDeclaration {
        BindingDeclaration {
            kind: DeclarationKind::Untargeted,
            key,
            target: None,
            provided_by: None,
            scope: None,
            source: None,
            source_line: None,
            module: "AppModule".to_string(),
            special: Vec::new(),
            markers: BTreeSet::new(),
        }
    }

    fn record_for(key: &BindingKey, facts: Option<LiveFacts>) -> DeclarationRecord {
        let mut record = DeclarationRecord::new(
            RecordKind::Untargeted { key: key.clone() },
            RecordSource::chain_only(vec!["AppModule".to_string()]),
        );
        record.live = facts;
        record
    }

    #[test]
    fn live_binding_supplies_the_scope() {
        let key = BindingKey::simple("Service");
        let runtime = FakeRuntime {
            bindings: HashMap::from([(
                key.clone(),
                record_for(&key, Some(LiveFacts { scope: Some(ScopeKind::Singleton), interceptors: 0 })),
            )]),
        };
        let mut dec = declaration(Some(key.clone()));
        enrich(&mut dec, &record_for(&key, None), &runtime);
        assert_eq!(dec.scope, Some(ScopeKind::Singleton));
    }

    #[test]
    fn eager_singleton_is_normalized() {
        let key = BindingKey::simple("Service");
        let runtime = FakeRuntime {
            bindings: HashMap::from([(
                key.clone(),
                record_for(
                    &key,
                    Some(LiveFacts { scope: Some(ScopeKind::EagerSingleton), interceptors: 0 }),
                ),
            )]),
        };
        let mut dec = declaration(Some(key.clone()));
        enrich(&mut dec, &record_for(&key, None), &runtime);
        assert_eq!(dec.scope, Some(ScopeKind::Singleton));
    }

    #[test]
    fn interceptors_add_the_aop_marker() {
        let key = BindingKey::simple("Service");
        let runtime = FakeRuntime {
            bindings: HashMap::from([(
                key.clone(),
                record_for(&key, Some(LiveFacts { scope: Some(ScopeKind::Prototype), interceptors: 2 })),
            )]),
        };
        let mut dec = declaration(Some(key.clone()));
        enrich(&mut dec, &record_for(&key, None), &runtime);
        assert!(dec.markers.contains(&Marker::Aop));
    }

    #[test]
    fn record_facts_are_used_when_no_live_binding_exists() {
        let key = BindingKey::simple("Service");
        let record = record_for(
            &key,
            Some(LiveFacts { scope: Some(ScopeKind::RequestScoped), interceptors: 0 }),
        );
        let mut dec = declaration(Some(key));
        enrich(&mut dec, &record, &OfflineRuntime);
        assert_eq!(dec.scope, Some(ScopeKind::RequestScoped));
    }

    #[test]
    fn scope_stays_unset_without_any_live_information() {
        let key = BindingKey::simple("Disabled");
        let record = record_for(&key, None);
        let mut dec = declaration(Some(key));
        enrich(&mut dec, &record, &OfflineRuntime);
        assert!(dec.scope.is_none());
        assert!(dec.markers.is_empty());
    }

    #[test]
    fn keyless_declaration_is_left_untouched() {
        let key = BindingKey::simple("Anything");
        let mut dec = declaration(None);
        enrich(&mut dec, &record_for(&key, None), &OfflineRuntime);
        assert!(dec.scope.is_none());
    }
}
