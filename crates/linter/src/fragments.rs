use graphql_syntax::{Document, FragmentDefinition, Selection};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Where a registered fragment definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentSource {
    /// The document being linted
    Primary,
    /// A sibling document supplied only for cross-file resolution
    Sibling,
}

#[derive(Debug, Clone, Copy)]
pub struct RegisteredFragment<'a> {
    pub definition: &'a FragmentDefinition,
    pub source: FragmentSource,
}

/// Name-indexed view over every fragment definition visible to a lint pass.
///
/// Built once from the primary document and its siblings, then read-only.
/// When a name is defined more than once, primary definitions shadow
/// sibling ones, and within the same tier the first definition in document
/// order wins (siblings are visited in the order they were supplied).
#[derive(Debug, Clone, Default)]
pub struct FragmentRegistry<'a> {
    fragments: HashMap<&'a str, RegisteredFragment<'a>>,
}

impl<'a> FragmentRegistry<'a> {
    #[tracing::instrument(skip_all)]
    pub fn register<I>(primary: &'a Document, siblings: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut registry = Self::default();

        registry.insert_all(primary, FragmentSource::Primary);
        for sibling in siblings {
            registry.insert_all(sibling, FragmentSource::Sibling);
        }

        tracing::debug!(fragments = registry.len(), "Fragment registry built");
        registry
    }

    fn insert_all(&mut self, document: &'a Document, source: FragmentSource) {
        for definition in document.fragments() {
            match self.fragments.entry(definition.name.as_ref()) {
                Entry::Occupied(existing) => {
                    tracing::debug!(
                        fragment = %definition.name,
                        kept = ?existing.get().source,
                        shadowed = ?source,
                        "Duplicate fragment definition ignored"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(RegisteredFragment { definition, source });
                }
            }
        }
    }

    /// Look up a fragment definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<RegisteredFragment<'a>> {
        self.fragments.get(name).copied()
    }

    /// Resolve a spread to the selection set of its definition.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&'a [Selection]> {
        self.get(name)
            .map(|fragment| fragment.definition.selection_set.as_slice())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
