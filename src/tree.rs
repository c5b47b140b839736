//! Container tree assembly.
//!
//! Declarations arrive with per-record container chains; this module folds
//! those chains into an insertion-ordered index of container descriptors,
//! validating parent consistency, and finally wires the parent/child links
//! into a forest.

use std::collections::HashMap;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::ModelError;
use crate::model::{BindingDeclaration, ContainerDescriptor, Marker};
use crate::runtime::LiveRuntime;

/// Insertion-ordered mapping from container identity to descriptor, scoped
/// to one introspection pass. Nested private scopes get their own index,
/// merged into the outer one afterwards.
#[derive(Debug, Default)]
pub struct ContainerIndex {
    inner: IndexMap<String, ContainerDescriptor>,
}

impl ContainerIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the container identity is already indexed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    /// Returns a mutable reference to an indexed container.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut ContainerDescriptor> {
        self.inner.get_mut(id)
    }

    /// Number of indexed containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` when no container has been indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Adds a fully-built container under the given identity. Used when
    /// splicing private-scope containers into the outer index.
    pub(crate) fn insert(&mut self, id: String, container: ContainerDescriptor) {
        self.inner.insert(id, container);
    }

    /// Consumes the index, yielding `(identity, container)` pairs in
    /// insertion order.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, ContainerDescriptor)> {
        self.inner.into_iter()
    }

    /// Walks a declaring-container chain (innermost first), creating missing
    /// descriptors and validating recorded parents, then attaches the
    /// declaration to the innermost container.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ParentMismatch`] when a container's newly
    /// observed parent differs from the one recorded earlier: distinct
    /// declaration paths disagreeing about where a container was installed
    /// is a model inconsistency that must never be silently resolved.
    pub(crate) fn insert_declaration(
        &mut self,
        chain: &[String],
        declaration: BindingDeclaration,
        runtime: &dyn LiveRuntime,
    ) -> Result<(), ModelError> {
        // Walk the entire chain, not just the declaring container: containers
        // that only install other containers still need descriptors.
        let mut declaration = Some(declaration);
        for (position, name) in chain.iter().enumerate() {
            let parent = chain.get(position + 1).cloned();
            let container = match self.inner.entry(name.clone()) {
                Entry::Occupied(entry) => {
                    let container = entry.into_mut();
                    if container.parent != parent {
                        return Err(ModelError::parent_mismatch(
                            name,
                            container.parent.as_deref(),
                            parent.as_deref(),
                            chain,
                        ));
                    }
                    container
                }
                Entry::Vacant(entry) => {
                    let mut container = ContainerDescriptor::new(name.clone(), parent);
                    if runtime.is_web_container(name) {
                        container.markers.insert(Marker::Web);
                    }
                    entry.insert(container)
                }
            };
            if let Some(declaration) = declaration.take() {
                container.declarations.push(declaration);
            }
        }
        Ok(())
    }

    /// Consumes the index, wiring every non-root container into its parent's
    /// `children` list and returning the roots. Child order within a parent
    /// follows index insertion order; the final order is imposed by the
    /// sorter.
    #[must_use]
    pub fn into_forest(self) -> Vec<ContainerDescriptor> {
        let mut children_of: HashMap<String, Vec<String>> = HashMap::new();
        let mut roots: Vec<String> = Vec::new();
        for (id, container) in &self.inner {
            match &container.parent {
                Some(parent) if self.inner.contains_key(parent) => {
                    children_of.entry(parent.clone()).or_default().push(id.clone());
                }
                // A recorded parent missing from the index can only be a
                // container already merged into an outer pass; treat the
                // orphan as a root of this pass.
                _ => roots.push(id.clone()),
            }
        }

        let mut index = self.inner;
        roots.iter().filter_map(|id| take_subtree(id, &mut index, &children_of)).collect()
    }
}

fn take_subtree(
    id: &str,
    index: &mut IndexMap<String, ContainerDescriptor>,
    children_of: &HashMap<String, Vec<String>>,
) -> Option<ContainerDescriptor> {
    let mut container = index.swap_remove(id)?;
    if let Some(children) = children_of.get(id) {
        for child in children {
            if let Some(child) = take_subtree(child, index, children_of) {
                container.children.push(child);
            }
        }
    }
    Some(container)
}
