//! Deterministic ordering of the container forest.
//!
//! None of the declaration fields uniquely orders declarations on its own,
//! so a four-key comparison is used purely to make diagnostic output
//! reproducible across runs and platforms. Sorting is stable and idempotent.

use crate::model::{BindingDeclaration, ContainerDescriptor};
use crate::render::{render_key, render_type};

/// Imposes the total report order on the forest: on the root list, on every
/// `children` list and on every container's declaration list.
pub fn sort_forest(forest: &mut [ContainerDescriptor]) {
    sort_siblings(forest);
}

fn sort_siblings(containers: &mut [ContainerDescriptor]) {
    // The ungrouped sentinel always sorts last within its sibling group so
    // real containers stay visually grouped first.
    containers.sort_by_key(|container| (container.is_jit(), container.type_name.clone()));
    for container in containers {
        sort_declarations(&mut container.declarations);
        sort_siblings(&mut container.children);
    }
}

fn sort_declarations(declarations: &mut [BindingDeclaration]) {
    declarations.sort_by_key(|declaration| {
        (
            declaration.source_line.unwrap_or(0),
            declaration.key.as_ref().map(|key| render_type(&key.type_ref)).unwrap_or_default(),
            declaration.scope.as_ref().map(|scope| scope.name().to_string()).unwrap_or_default(),
            render_key(declaration.key.as_ref()),
        )
    });
}
