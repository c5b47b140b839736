//! Pure rendering helpers for keys, scopes and the diagnostic report.
//!
//! All rendering is deterministic: output depends only on the rendered
//! value, never on the iteration order of any collection.

use std::fmt::Write as _;

use crate::model::{BindingDeclaration, BindingKey, ContainerDescriptor, Qualifier, TypeRef};

/// Renders a binding key as a stable, human-readable string.
///
/// A missing key renders as `-`; a qualified key as
/// `@QualifierName("value") TypeName<Generics>`.
#[must_use]
pub fn render_key(key: Option<&BindingKey>) -> String {
    let Some(key) = key else {
        return "-".to_string();
    };
    let mut res = String::new();
    if let Some(qualifier) = &key.qualifier {
        res.push_str(&render_qualifier(qualifier));
        res.push(' ');
    }
    res.push_str(&render_type(&key.type_ref));
    res
}

/// Renders a qualifier as `@Name` or `@Name("value")`.
#[must_use]
pub fn render_qualifier(qualifier: &Qualifier) -> String {
    match qualifier {
        Qualifier::Named { annotation, value } if !value.is_empty() => {
            format!("@{annotation}(\"{value}\")")
        }
        Qualifier::Named { annotation, .. } | Qualifier::Marker { annotation } => {
            format!("@{annotation}")
        }
        Qualifier::Unique { owner } => format!("@{owner}"),
    }
}

/// Renders a type with its generic arguments, e.g. `Map<String, Service>`.
#[must_use]
pub fn render_type(type_ref: &TypeRef) -> String {
    if type_ref.args.is_empty() {
        return type_ref.name.clone();
    }
    let args: Vec<String> = type_ref.args.iter().map(render_type).collect();
    format!("{}<{}>", type_ref.name, args.join(", "))
}

/// Renders a sorted forest as an indented plain-text report.
///
/// One line per container (markers in brackets), one line per declaration
/// with kind, key, link target, scope, source and markers.
#[must_use]
pub fn render_report(forest: &[ContainerDescriptor]) -> String {
    let mut containers = 0usize;
    let mut bindings = 0usize;
    crate::analysis::visit_containers(forest, &mut |container| {
        containers += 1;
        bindings += container.declarations.len();
    });

    let mut out = format!("{containers} containers with {bindings} bindings\n");
    for container in forest {
        render_container(&mut out, container, 1);
    }
    out
}

fn render_container(out: &mut String, container: &ContainerDescriptor, depth: usize) {
    let indent = "    ".repeat(depth);
    let _ = write!(out, "{indent}{}", container.type_name);
    render_markers(out, container.markers.iter().map(|m| m.label()));
    out.push('\n');
    for declaration in &container.declarations {
        render_declaration(out, declaration, depth + 1);
    }
    for child in &container.children {
        render_container(out, child, depth + 1);
    }
}

fn render_declaration(out: &mut String, declaration: &BindingDeclaration, depth: usize) {
    let indent = "    ".repeat(depth);
    let _ = write!(
        out,
        "{indent}{:<20} {}",
        declaration.kind.label(),
        render_key(declaration.key.as_ref())
    );
    if let Some(target) = &declaration.target {
        let _ = write!(out, " -> {}", render_key(Some(target)));
    }
    if let Some(provided_by) = &declaration.provided_by {
        let _ = write!(out, " (via {provided_by})");
    }
    if let Some(scope) = &declaration.scope {
        let _ = write!(out, " [{}]", scope.name());
    }
    if let Some(source) = &declaration.source {
        let _ = write!(out, " at {source}");
    }
    for note in &declaration.special {
        let _ = write!(out, " ({note})");
    }
    render_markers(out, declaration.markers.iter().map(|m| m.label()));
    out.push('\n');
}

fn render_markers<'a>(out: &mut String, labels: impl Iterator<Item = &'a str>) {
    let labels: Vec<&str> = labels.collect();
    if !labels.is_empty() {
        let _ = write!(out, " [{}]", labels.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_renders_as_dash() {
        assert_eq!(render_key(None), "-");
    }

    #[test]
    fn named_key_renders_with_qualifier_value() {
        let key = BindingKey::qualified(
            "DataSource",
            Qualifier::Named { annotation: "Named".to_string(), value: "db".to_string() },
        );
        assert_eq!(render_key(Some(&key)), "@Named(\"db\") DataSource");
    }

    #[test]
    fn named_key_with_empty_value_omits_parentheses() {
        let key = BindingKey::qualified(
            "DataSource",
            Qualifier::Named { annotation: "Named".to_string(), value: String::new() },
        );
        assert_eq!(render_key(Some(&key)), "@Named DataSource");
    }

    #[test]
    fn marker_qualifier_renders_without_value() {
        let key =
            BindingKey::qualified("Service", Qualifier::Marker { annotation: "Admin".to_string() });
        assert_eq!(render_key(Some(&key)), "@Admin Service");
    }

    #[test]
    fn generic_type_renders_nested_arguments() {
        let key = BindingKey {
            type_ref: TypeRef::generic(
                "Map",
                vec![
                    TypeRef::new("String"),
                    TypeRef::generic("Set", vec![TypeRef::new("Plugin")]),
                ],
            ),
            qualifier: None,
        };
        assert_eq!(render_key(Some(&key)), "Map<String, Set<Plugin>>");
    }
}
