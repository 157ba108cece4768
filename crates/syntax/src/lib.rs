//! # GraphQL Syntax
//!
//! Parses executable GraphQL documents with `apollo-parser` and lowers the
//! lossless syntax tree into a small owned model: operations, fragment
//! definitions and the three selection variants. Analysis passes only ever
//! see the owned [`Document`], never the CST.
//!
//! ```rust,ignore
//! let parse = graphql_syntax::parse("query Q { viewer { id } }");
//! for operation in parse.document().operations() {
//!     println!("{}", operation.display_name());
//! }
//! ```
//!
//! Parsing is error tolerant. Syntax errors are collected on the [`Parse`]
//! and whatever could be recovered is still lowered, so callers decide
//! whether a document with errors is worth analyzing.

mod line_index;
mod lower;
mod model;

pub use line_index::{LineIndex, OffsetRange, Position};
pub use model::{
    Definition, Document, Field, FragmentDefinition, FragmentSpread, InlineFragment,
    OperationDefinition, OperationKind, Selection,
};

/// A parse error with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Byte offset where the error occurred
    pub offset: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at offset {})", self.message, self.offset)
    }
}

/// Result of parsing a GraphQL source text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parse {
    document: Document,
    errors: Vec<ParseError>,
}

impl Parse {
    /// The lowered executable document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Consume the parse and keep only the document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Returns the parse errors.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Returns true if there were any parse errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse GraphQL source text into an executable [`Document`].
///
/// Type system definitions are accepted by the parser but dropped during
/// lowering.
#[tracing::instrument(skip(source), fields(size = source.len()))]
pub fn parse(source: &str) -> Parse {
    let tree = apollo_parser::Parser::new(source).parse();

    let errors: Vec<ParseError> = tree
        .errors()
        .map(|e| ParseError {
            message: e.message().to_string(),
            offset: e.index(),
        })
        .collect();

    let document = lower::lower_document(source, &tree.document());

    tracing::debug!(
        definitions = document.definitions.len(),
        errors = errors.len(),
        "Parsed document"
    );

    Parse { document, errors }
}
