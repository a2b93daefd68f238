//! Table file import and export.

mod md;
mod parser;
mod writer;

pub use md::{markdown_content, write_markdown};
pub use parser::{ParsedTable, parse_table, parse_table_content};
pub use writer::{write_table, write_table_content};
