use crate::OffsetRange;
use std::sync::Arc;

/// An executable GraphQL document: operations and fragment definitions only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

impl Document {
    /// Iterate over the operation definitions in document order.
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Operation(operation) => Some(operation),
            Definition::Fragment(_) => None,
        })
    }

    /// Iterate over the fragment definitions in document order.
    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|definition| match definition {
            Definition::Fragment(fragment) => Some(fragment),
            Definition::Operation(_) => None,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

impl Definition {
    /// Byte range of the whole definition.
    #[must_use]
    pub const fn range(&self) -> OffsetRange {
        match self {
            Self::Operation(operation) => operation.range,
            Self::Fragment(fragment) => fragment.range,
        }
    }

    #[must_use]
    pub fn selection_set(&self) -> &[Selection] {
        match self {
            Self::Operation(operation) => &operation.selection_set,
            Self::Fragment(fragment) => &fragment.selection_set,
        }
    }
}

/// The kind of GraphQL operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationKind {
    #[default]
    Query,
    Mutation,
    Subscription,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
            Self::Subscription => write!(f, "subscription"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDefinition {
    pub kind: OperationKind,
    /// `None` for anonymous operations, including the `{ ... }` shorthand
    pub name: Option<Arc<str>>,
    pub selection_set: Vec<Selection>,
    /// The text range of the entire operation definition
    pub range: OffsetRange,
    /// The text range of the operation name, if any
    pub name_range: Option<OffsetRange>,
}

impl OperationDefinition {
    /// Name used when reporting on this operation; empty for anonymous ones.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDefinition {
    pub name: Arc<str>,
    pub type_condition: Option<Arc<str>>,
    pub selection_set: Vec<Selection>,
    /// The text range of the entire fragment definition
    pub range: OffsetRange,
    /// The text range of the fragment name
    pub name_range: OffsetRange,
}

/// A selection in a selection set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

impl Selection {
    #[must_use]
    pub const fn range(&self) -> OffsetRange {
        match self {
            Self::Field(field) => field.range,
            Self::FragmentSpread(spread) => spread.range,
            Self::InlineFragment(inline) => inline.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Arc<str>,
    pub alias: Option<Arc<str>>,
    /// Empty for leaf fields
    pub selection_set: Vec<Selection>,
    pub range: OffsetRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSpread {
    pub name: Arc<str>,
    pub range: OffsetRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFragment {
    pub type_condition: Option<Arc<str>>,
    pub selection_set: Vec<Selection>,
    pub range: OffsetRange,
}
