//! Weft lexer: converts source text into a token stream.
//!
//! Two layers: the [`section`] scanner splits raw text into typed sections,
//! and the [`lexer`] turns each section's body lines into tokens using the
//! grammar of that section kind.

pub mod lexer;
pub mod section;
pub mod token;

pub use lexer::{derive_key, LexResult, Lexer};
pub use section::{Section, SectionKind, SectionLine};
pub use token::{Instruction, Token, TokenKind, ALL_MNEMONICS};
