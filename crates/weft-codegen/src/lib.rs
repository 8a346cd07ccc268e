//! Weft code generator: walks the AST once and produces a [`CompiledArtifact`].
//!
//! # Architecture
//!
//! The generator takes a parsed [`weft_types::ast::Ast`] and:
//! 1. Resolves the locale-scoped constant tables (strings + rom)
//! 2. Renders every code section into the runtime's call protocol,
//!    assigning stable identifiers from one monotonic counter
//! 3. Bundles everything into an immutable [`CompiledArtifact`] with a
//!    single serialization method
//!
//! Identifier stability is the load-bearing contract here: the runtime
//! correlates nodes across recompilations by id, so the same AST must
//! always yield the same id sequence.

pub mod artifact;
pub mod error;
pub mod generator;
pub mod literal;

pub use artifact::{CompiledArtifact, RUNTIME_MARKER};
pub use error::{CodegenError, CodegenResult};
pub use generator::generate;
pub use literal::ascii_repr;
