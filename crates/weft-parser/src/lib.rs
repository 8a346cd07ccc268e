//! Weft parser: converts the flat token stream into an AST arena.

mod parse_section;
mod parser;

pub use parser::Parser;
