//! Traversal and lookup helpers over a built forest.

use std::collections::BTreeMap;

use crate::model::{BindingDeclaration, BindingKey, ContainerDescriptor};

/// Applies `f` to every container in the forest, depth-first in report order.
pub fn visit_containers<'a, F>(forest: &'a [ContainerDescriptor], f: &mut F)
where
    F: FnMut(&'a ContainerDescriptor),
{
    for container in forest {
        f(container);
        visit_containers(&container.children, f);
    }
}

/// Applies `f` to every declaration in the forest, in report order.
pub fn visit_declarations<'a, F>(forest: &'a [ContainerDescriptor], f: &mut F)
where
    F: FnMut(&'a BindingDeclaration),
{
    visit_containers(forest, &mut |container| {
        for declaration in &container.declarations {
            f(declaration);
        }
    });
}

/// Returns the container type identities used in the forest, excluding the
/// ungrouped sentinel, in report order.
#[must_use]
pub fn container_types(forest: &[ContainerDescriptor]) -> Vec<String> {
    let mut types = Vec::new();
    visit_containers(forest, &mut |container| {
        if !container.is_jit() {
            types.push(container.type_name.clone());
        }
    });
    types
}

/// Builds the global key-to-declaration index used by downstream analyses.
///
/// When the same key appears more than once — typical of a private scope
/// declaring a key and re-declaring it as the exposed copy — the
/// declaration carrying a non-null `target` wins, because the real linked
/// declaration is more informative than its exposure.
#[must_use]
pub fn key_index(
    forest: &[ContainerDescriptor],
) -> BTreeMap<BindingKey, &BindingDeclaration> {
    let mut index: BTreeMap<BindingKey, &BindingDeclaration> = BTreeMap::new();
    visit_declarations(forest, &mut |declaration| {
        let Some(key) = &declaration.key else {
            return;
        };
        if !index.contains_key(key) || declaration.target.is_some() {
            index.insert(key.clone(), declaration);
        }
    });
    index
}
