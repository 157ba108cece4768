// Lowering from the apollo-parser CST into the owned document model.
//
// Nodes the parser could only partially recover (a field without a name, a
// spread without a fragment name) are dropped rather than guessed at.
// apollo-parser attaches trailing whitespace and commas to the preceding
// node, so ranges are trimmed against the source text.

use crate::model::{
    Definition, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment,
    OperationDefinition, OperationKind, Selection,
};
use crate::OffsetRange;
use apollo_parser::cst::{self, CstNode};
use std::sync::Arc;

pub(crate) fn lower_document(source: &str, document: &cst::Document) -> Document {
    let lowerer = Lowerer { source };

    let definitions = document
        .definitions()
        .filter_map(|definition| match definition {
            cst::Definition::OperationDefinition(operation) => {
                Some(Definition::Operation(lowerer.operation(&operation)))
            }
            cst::Definition::FragmentDefinition(fragment) => {
                lowerer.fragment(&fragment).map(Definition::Fragment)
            }
            _ => None,
        })
        .collect();

    Document { definitions }
}

struct Lowerer<'a> {
    source: &'a str,
}

impl Lowerer<'_> {
    fn operation(&self, operation: &cst::OperationDefinition) -> OperationDefinition {
        let kind = operation
            .operation_type()
            .map_or(OperationKind::Query, |op_type| operation_kind(&op_type));

        let name = operation.name();

        OperationDefinition {
            kind,
            name: name.as_ref().map(name_text),
            name_range: name.as_ref().map(|n| self.range_of(n)),
            selection_set: self.selection_set(operation.selection_set()),
            range: self.range_of(operation),
        }
    }

    fn fragment(&self, fragment: &cst::FragmentDefinition) -> Option<FragmentDefinition> {
        let name = fragment.fragment_name()?.name()?;

        let type_condition = fragment
            .type_condition()
            .and_then(|condition| condition.named_type())
            .and_then(|named| named.name())
            .map(|n| name_text(&n));

        Some(FragmentDefinition {
            name: name_text(&name),
            type_condition,
            selection_set: self.selection_set(fragment.selection_set()),
            range: self.range_of(fragment),
            name_range: self.range_of(&name),
        })
    }

    fn selection_set(&self, selection_set: Option<cst::SelectionSet>) -> Vec<Selection> {
        let Some(selection_set) = selection_set else {
            return Vec::new();
        };

        selection_set
            .selections()
            .filter_map(|selection| self.selection(&selection))
            .collect()
    }

    fn selection(&self, selection: &cst::Selection) -> Option<Selection> {
        match selection {
            cst::Selection::Field(field) => {
                let name = field.name()?;
                let alias = field
                    .alias()
                    .and_then(|alias| alias.name())
                    .map(|n| name_text(&n));

                Some(Selection::Field(Field {
                    name: name_text(&name),
                    alias,
                    selection_set: self.selection_set(field.selection_set()),
                    range: self.range_of(field),
                }))
            }
            cst::Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name()?.name()?;

                Some(Selection::FragmentSpread(FragmentSpread {
                    name: name_text(&name),
                    range: self.range_of(spread),
                }))
            }
            cst::Selection::InlineFragment(inline) => {
                let type_condition = inline
                    .type_condition()
                    .and_then(|condition| condition.named_type())
                    .and_then(|named| named.name())
                    .map(|n| name_text(&n));

                Some(Selection::InlineFragment(InlineFragment {
                    type_condition,
                    selection_set: self.selection_set(inline.selection_set()),
                    range: self.range_of(inline),
                }))
            }
        }
    }

    fn range_of<N: CstNode>(&self, node: &N) -> OffsetRange {
        let range = node.syntax().text_range();
        let start: usize = range.start().into();
        let end: usize = range.end().into();
        let trimmed = self
            .source
            .get(start..end)
            .map_or(end - start, |text| {
                text.trim_end_matches(|c: char| c.is_whitespace() || c == ',')
                    .len()
            });
        OffsetRange::new(start, start + trimmed)
    }
}

fn operation_kind(op_type: &cst::OperationType) -> OperationKind {
    if op_type.query_token().is_some() {
        OperationKind::Query
    } else if op_type.mutation_token().is_some() {
        OperationKind::Mutation
    } else {
        OperationKind::Subscription
    }
}

fn name_text(name: &cst::Name) -> Arc<str> {
    Arc::from(name.text().to_string())
}
