use crate::fragments::FragmentRegistry;
use graphql_syntax::Document;

/// Context for linting a single document
pub struct DocumentContext<'a> {
    pub document: &'a Document,
    pub file_name: &'a str,
    /// Every fragment visible to the document, including sibling documents
    pub fragments: &'a FragmentRegistry<'a>,
}
