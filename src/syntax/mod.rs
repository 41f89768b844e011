//! Syntax utilities layered on the parser: cursor queries, node construction
//! and canonical formatting.

pub mod formatter;
pub mod make;
pub mod query;

pub use formatter::{FormatOptions, normalize_whitespace};
pub use make::MakeError;
pub use query::{ancestor_or_self, extract_selected_nodes, find_node, namespace_at};
