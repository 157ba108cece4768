//! Selection set depth computation.
//!
//! Depth is counted from 0 at an operation's first level of fields and grows
//! by one per field boundary. Fragment spreads and inline fragments are
//! transparent: their selections are counted as if written at the spread
//! site. Ignored fields keep their children at their own level.

use crate::fragments::{FragmentRegistry, FragmentSource};
use crate::ignore::IgnoreList;
use graphql_syntax::{Definition, Field, FragmentDefinition, OffsetRange, Selection};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Depth of the root itself, one level above its first fields.
///
/// Also the result for a root that reaches no field at all.
pub const ROOT_DEPTH: i64 = -1;

/// A field at which a walk first crossed the depth limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overflow {
    pub field: Arc<str>,
    pub range: OffsetRange,
    /// The document the field is written in
    pub source: FragmentSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthReport {
    pub max_depth: i64,
    /// Outermost fields beyond the limit, in traversal order
    pub overflows: Vec<Overflow>,
}

/// Computes selection set depth against a fragment registry and ignore list.
#[derive(Debug, Clone, Copy)]
pub struct DepthCalculator<'a> {
    fragments: &'a FragmentRegistry<'a>,
    ignore: &'a IgnoreList,
}

impl<'a> DepthCalculator<'a> {
    #[must_use]
    pub const fn new(fragments: &'a FragmentRegistry<'a>, ignore: &'a IgnoreList) -> Self {
        Self { fragments, ignore }
    }

    /// Maximum depth reached by a root selection set, or [`ROOT_DEPTH`] when
    /// no field is reachable.
    #[must_use]
    pub fn max_depth(&self, selections: &'a [Selection]) -> i64 {
        let mut walk = Walk::new(*self, None);
        walk.visit(selections, ROOT_DEPTH, FragmentSource::Primary);
        walk.max_depth
    }

    /// Walk a root selection set, recording where it first exceeds `limit`.
    #[must_use]
    pub fn analyze(&self, selections: &'a [Selection], limit: u32) -> DepthReport {
        let mut walk = Walk::new(*self, Some(i64::from(limit)));
        walk.visit(selections, ROOT_DEPTH, FragmentSource::Primary);
        walk.into_report()
    }

    /// Like [`analyze`](Self::analyze) for a fragment linted as its own root.
    ///
    /// The fragment counts as being expanded, so a spread of itself inside
    /// its own body is cut off immediately.
    #[must_use]
    pub fn analyze_fragment(&self, fragment: &'a FragmentDefinition, limit: u32) -> DepthReport {
        self.walk_fragment(fragment, Some(i64::from(limit))).into_report()
    }

    /// Maximum depth of an operation, or of a fragment taken as its own root.
    #[must_use]
    pub fn definition_depth(&self, definition: &'a Definition) -> i64 {
        match definition {
            Definition::Operation(operation) => self.max_depth(&operation.selection_set),
            Definition::Fragment(fragment) => self.walk_fragment(fragment, None).max_depth,
        }
    }

    fn walk_fragment(&self, fragment: &'a FragmentDefinition, limit: Option<i64>) -> Walk<'a> {
        let mut walk = Walk::new(*self, limit);
        walk.expanding.insert(fragment.name.as_ref());
        walk.visit(&fragment.selection_set, ROOT_DEPTH, FragmentSource::Primary);
        walk
    }
}

/// Pending work of a walk, popped from the end of the stack.
enum Task<'a> {
    Select {
        selection: &'a Selection,
        depth: i64,
        source: FragmentSource,
    },
    /// A fragment expansion finished
    Leave {
        name: &'a str,
        entry_depth: i64,
        cuts_before: usize,
    },
}

/// Outcome of a fragment expansion that cut no cycle.
///
/// Such an expansion reaches the same fields whatever path led to it, so its
/// result only depends on the depth it was entered at.
struct Settled {
    /// Deepest field relative to the entry depth, `None` when no field is reached
    relative: Option<i64>,
    /// Entry depths already expanded in full under the current limit
    entered_at: HashSet<i64>,
}

struct Walk<'a> {
    calculator: DepthCalculator<'a>,
    limit: Option<i64>,
    stack: Vec<Task<'a>>,
    /// Fragments on the active expansion path
    expanding: HashSet<&'a str>,
    /// Deepest field of each open expansion, the walk's root first
    frames: Vec<Option<i64>>,
    settled: HashMap<&'a str, Settled>,
    /// Spreads cut off by the cycle guard so far
    cuts: usize,
    max_depth: i64,
    overflows: Vec<Overflow>,
}

impl<'a> Walk<'a> {
    fn new(calculator: DepthCalculator<'a>, limit: Option<i64>) -> Self {
        Self {
            calculator,
            limit,
            stack: Vec::new(),
            expanding: HashSet::new(),
            frames: vec![None],
            settled: HashMap::new(),
            cuts: 0,
            max_depth: ROOT_DEPTH,
            overflows: Vec::new(),
        }
    }

    fn visit(&mut self, selections: &'a [Selection], current_depth: i64, source: FragmentSource) {
        self.push_selections(selections, current_depth, source);

        while let Some(task) = self.stack.pop() {
            match task {
                Task::Select {
                    selection,
                    depth,
                    source,
                } => self.select(selection, depth, source),
                Task::Leave {
                    name,
                    entry_depth,
                    cuts_before,
                } => self.leave(name, entry_depth, cuts_before),
            }
        }
    }

    /// Queue `selections` so they are handled in document order.
    fn push_selections(&mut self, selections: &'a [Selection], depth: i64, source: FragmentSource) {
        self.stack
            .extend(selections.iter().rev().map(|selection| Task::Select {
                selection,
                depth,
                source,
            }));
    }

    fn select(&mut self, selection: &'a Selection, current_depth: i64, source: FragmentSource) {
        match selection {
            Selection::Field(field) => self.visit_field(field, current_depth, source),
            Selection::InlineFragment(inline) => {
                self.push_selections(&inline.selection_set, current_depth, source);
            }
            Selection::FragmentSpread(spread) => {
                let Some(fragment) = self.calculator.fragments.get(&spread.name) else {
                    tracing::trace!(fragment = %spread.name, "Unresolved fragment spread skipped");
                    return;
                };

                let name = fragment.definition.name.as_ref();
                if self.expanding.contains(name) {
                    tracing::trace!(fragment = name, "Fragment cycle cut off");
                    self.cuts += 1;
                    return;
                }
                if self.reuse_settled(name, current_depth) {
                    return;
                }

                self.expanding.insert(name);
                self.frames.push(None);
                self.stack.push(Task::Leave {
                    name,
                    entry_depth: current_depth,
                    cuts_before: self.cuts,
                });
                self.push_selections(
                    &fragment.definition.selection_set,
                    current_depth,
                    fragment.source,
                );
            }
        }
    }

    /// Account for an already settled fragment without expanding it again.
    ///
    /// Returns `false` when the fragment must be expanded because it may
    /// cross the limit at a depth it was never entered at.
    fn reuse_settled(&mut self, name: &str, entry_depth: i64) -> bool {
        let Some(settled) = self.settled.get(name) else {
            return false;
        };

        let reached = settled.relative.map(|relative| entry_depth + relative);
        let reusable = match (self.limit, reached) {
            (None, _) | (_, None) => true,
            (Some(limit), Some(reached)) => {
                reached <= limit || settled.entered_at.contains(&entry_depth)
            }
        };

        if reusable {
            if let Some(reached) = reached {
                self.reach(reached);
            }
        }
        reusable
    }

    fn leave(&mut self, name: &'a str, entry_depth: i64, cuts_before: usize) {
        self.expanding.remove(name);

        let deepest = self.frames.pop().flatten();
        if let Some(deepest) = deepest {
            if let Some(parent) = self.frames.last_mut() {
                *parent = Some(parent.map_or(deepest, |current| current.max(deepest)));
            }
        }

        if self.cuts == cuts_before {
            let settled = self.settled.entry(name).or_insert_with(|| Settled {
                relative: deepest.map(|deepest| deepest - entry_depth),
                entered_at: HashSet::new(),
            });
            settled.entered_at.insert(entry_depth);
        }
    }

    fn visit_field(&mut self, field: &'a Field, current_depth: i64, source: FragmentSource) {
        let depth = if self.calculator.ignore.matches(&field.name) {
            current_depth
        } else {
            current_depth + 1
        };

        self.reach(depth);

        if let Some(limit) = self.limit {
            if depth > limit && current_depth <= limit {
                self.record_overflow(field, source);
            }
        }

        self.push_selections(&field.selection_set, depth, source);
    }

    /// A field was reached at `depth`, directly or through a settled fragment.
    fn reach(&mut self, depth: i64) {
        self.max_depth = self.max_depth.max(depth);
        if let Some(frame) = self.frames.last_mut() {
            *frame = Some(frame.map_or(depth, |current| current.max(depth)));
        }
    }

    fn record_overflow(&mut self, field: &Field, source: FragmentSource) {
        // A fragment spread twice reaches the same field twice
        let seen = self
            .overflows
            .iter()
            .any(|overflow| overflow.range == field.range && overflow.source == source);

        if !seen {
            self.overflows.push(Overflow {
                field: field.name.clone(),
                range: field.range,
                source,
            });
        }
    }

    fn into_report(self) -> DepthReport {
        DepthReport {
            max_depth: self.max_depth,
            overflows: self.overflows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_syntax::{parse, Document};

    fn document(source: &str) -> Document {
        let parse = parse(source);
        assert!(!parse.has_errors(), "{:?}", parse.errors());
        parse.into_document()
    }

    fn depth_with(source: &str, siblings: &[&str], ignore: &[&str]) -> i64 {
        let primary = document(source);
        let siblings: Vec<Document> = siblings.iter().map(|s| document(s)).collect();
        let fragments = FragmentRegistry::register(&primary, &siblings);
        let ignore = IgnoreList::parse(ignore).unwrap();
        let calculator = DepthCalculator::new(&fragments, &ignore);

        let operation = primary.operations().next().unwrap();
        calculator.max_depth(&operation.selection_set)
    }

    fn depth(source: &str) -> i64 {
        depth_with(source, &[], &[])
    }

    #[test]
    fn test_first_level_is_depth_zero() {
        assert_eq!(depth("query { viewer }"), 0);
        assert_eq!(depth("query { viewer { albums { title } } }"), 2);
    }

    #[test]
    fn test_siblings_take_the_deepest_branch() {
        assert_eq!(depth("{ a { b } c { d { e { f } } } g }"), 3);
    }

    #[test]
    fn test_depth_counts_ancestor_fields() {
        // Ignoring a field on another branch does not move this one
        assert_eq!(depth_with("{ a { b { c } } x { y } }", &[], &["x"]), 2);
    }

    #[test]
    fn test_ignored_field_keeps_children_flush() {
        let source = "{ viewer { albums { title } } }";
        assert_eq!(depth_with(source, &[], &[]), 2);
        assert_eq!(depth_with(source, &[], &["albums"]), 1);
        assert_eq!(depth_with(source, &[], &["albums", "viewer"]), 0);
    }

    #[test]
    fn test_ignored_root_field_sits_at_root_depth() {
        assert_eq!(depth_with("{ edges }", &[], &["edges"]), ROOT_DEPTH);
        assert_eq!(depth_with("{ edges { node } }", &[], &["edges"]), 0);
    }

    #[test]
    fn test_ignore_pattern() {
        let source = "{ userConnection { edges { node { id } } } }";
        assert_eq!(depth_with(source, &[], &["/Connection$/", "edges"]), 1);
    }

    #[test]
    fn test_spread_is_depth_neutral() {
        let inline = depth("{ viewer { albums { id modifier { date } } } }");
        let spread = depth_with(
            "{ viewer { albums { ...AlbumFields } } }",
            &["fragment AlbumFields on Album { id modifier { date } }"],
            &[],
        );
        assert_eq!(inline, 3);
        assert_eq!(spread, inline);
    }

    #[test]
    fn test_inline_fragment_is_depth_neutral() {
        assert_eq!(depth("{ viewer { albums { ... on Album { id } } } }"), 2);
        assert_eq!(depth("{ ... on Query { ... { viewer } } }"), 0);
    }

    #[test]
    fn test_fragment_in_primary_document() {
        let source = "{ viewer { ...V } } fragment V on User { friends { name } }";
        assert_eq!(depth(source), 2);
    }

    #[test]
    fn test_unresolved_spread_contributes_nothing() {
        assert_eq!(depth("{ viewer { ...Missing } }"), 0);
        assert_eq!(depth("{ ...Missing }"), ROOT_DEPTH);
    }

    #[test]
    fn test_self_referencing_fragment_terminates() {
        let source = "{ viewer { ...A } } fragment A on User { friends { ...A } }";
        assert_eq!(depth(source), 1);
    }

    #[test]
    fn test_mutual_fragment_cycle_terminates() {
        let source = r"
            { node { ...A } }
            fragment A on Node { a { ...B } }
            fragment B on Node { b { ...A } }
        ";
        // node(0) a(1) b(2), then A is already on the path
        assert_eq!(depth(source), 2);
    }

    #[test]
    fn test_same_fragment_on_separate_paths_is_expanded_each_time() {
        let source = r"
            { a { ...F } b { c { ...F } } }
            fragment F on T { x { y } }
        ";
        // b(0) c(1) x(2) y(3)
        assert_eq!(depth(source), 3);
    }

    /// Fragments `F0..Flevels` where each one spreads the next from two
    /// sibling fields, so every level doubles the number of paths.
    fn diamond(levels: usize) -> String {
        let mut source = String::from("query { root { ...F0 } }\n");
        for i in 0..levels {
            let next = i + 1;
            source.push_str(&format!(
                "fragment F{i} on T {{ a: x {{ ...F{next} }} b: y {{ ...F{next} }} }}\n"
            ));
        }
        source.push_str(&format!("fragment F{levels} on T {{ leaf }}\n"));
        source
    }

    #[test]
    fn test_diamond_fragments_are_not_reexpanded() {
        // root(0), then one field per level, then leaf
        assert_eq!(depth(&diamond(40)), 41);
    }

    #[test]
    fn test_diamond_overflows_are_recorded_once_per_field() {
        let primary = document(&diamond(40));
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let operation = primary.operations().next().unwrap();

        let report = calculator.analyze(&operation.selection_set, 10);
        assert_eq!(report.max_depth, 41);
        let fields: Vec<&str> = report
            .overflows
            .iter()
            .map(|overflow| overflow.field.as_ref())
            .collect();
        // Both fields of F10 sit at depth 11
        assert_eq!(fields, ["x", "y"]);
    }

    #[test]
    fn test_long_fragment_chain() {
        let mut source = String::from("query { ...F0 }\n");
        for i in 0..20_000 {
            let next = i + 1;
            source.push_str(&format!("fragment F{i} on T {{ f {{ ...F{next} }} }}\n"));
        }
        // F20000 is never defined, so the last spread fails open
        assert_eq!(depth(&source), 19_999);
    }

    #[test]
    fn test_reused_fragment_entered_deeper_reports_overflow() {
        let primary = document(
            "{ a { ...F } b { c { ...F } } } fragment F on T { x { y } }",
        );
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let operation = primary.operations().next().unwrap();

        // Under a: x(1) y(2) fits. Under b: c(1) x(2) y(3) crosses at y.
        let report = calculator.analyze(&operation.selection_set, 2);
        assert_eq!(report.max_depth, 3);
        assert_eq!(report.overflows.len(), 1);
        assert_eq!(report.overflows[0].field.as_ref(), "y");
    }

    #[test]
    fn test_fragment_cut_by_cycle_is_walked_again() {
        let source = r"
            { a { ...A } b { c { ...B } } }
            fragment A on T { x { ...B } }
            fragment B on T { y { ...A } }
        ";
        // a(0) x(1) y(2), A cut. b(0) c(1) y(2) x(3), B cut.
        assert_eq!(depth(source), 3);
    }

    #[test]
    fn test_analyze_records_outermost_overflow() {
        let primary = document("{ viewer { albums { title } } }");
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let operation = primary.operations().next().unwrap();

        let report = calculator.analyze(&operation.selection_set, 0);
        assert_eq!(report.max_depth, 2);
        assert_eq!(report.overflows.len(), 1);
        assert_eq!(report.overflows[0].field.as_ref(), "albums");
        assert_eq!(report.overflows[0].source, FragmentSource::Primary);

        let report = calculator.analyze(&operation.selection_set, 2);
        assert!(report.overflows.is_empty());
    }

    #[test]
    fn test_analyze_attributes_sibling_overflow() {
        let primary = document("{ viewer { albums { ...AlbumFields } } }");
        let sibling = document("fragment AlbumFields on Album { id modifier { date } }");
        let fragments = FragmentRegistry::register(&primary, [&sibling]);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let operation = primary.operations().next().unwrap();

        let report = calculator.analyze(&operation.selection_set, 2);
        assert_eq!(report.max_depth, 3);
        assert_eq!(report.overflows.len(), 1);
        assert_eq!(report.overflows[0].field.as_ref(), "date");
        assert_eq!(report.overflows[0].source, FragmentSource::Sibling);
    }

    #[test]
    fn test_analyze_dedupes_repeated_spreads() {
        let primary = document(
            "{ a { ...F } a2: a { ...F } } fragment F on T { deep { deeper } }",
        );
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let operation = primary.operations().next().unwrap();

        let report = calculator.analyze(&operation.selection_set, 1);
        assert_eq!(report.max_depth, 2);
        assert_eq!(report.overflows.len(), 1);
        assert_eq!(report.overflows[0].field.as_ref(), "deeper");
    }

    #[test]
    fn test_analyze_fragment_as_root() {
        let primary = document("fragment A on T { x { ...A y { z } } }");
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let fragment = primary.fragments().next().unwrap();

        let report = calculator.analyze_fragment(fragment, 5);
        assert_eq!(report.max_depth, 2);
        assert!(report.overflows.is_empty());
    }

    #[test]
    fn test_definition_depth() {
        let primary = document("query Q { a { ...F } } fragment F on T { b { ...F } }");
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);

        let depths: Vec<i64> = primary
            .definitions
            .iter()
            .map(|definition| calculator.definition_depth(definition))
            .collect();
        // Q: a(0) b(1); F alone: b(0)
        assert_eq!(depths, [1, 0]);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let primary = document("{ a { ...F } } fragment F on T { b { c } }");
        let fragments = FragmentRegistry::register(&primary, []);
        let ignore = IgnoreList::default();
        let calculator = DepthCalculator::new(&fragments, &ignore);
        let operation = primary.operations().next().unwrap();

        let first = calculator.analyze(&operation.selection_set, 1);
        let second = calculator.analyze(&operation.selection_set, 1);
        assert_eq!(first, second);
    }
}
