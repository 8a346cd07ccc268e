//! Weft compiler: orchestrates the full compilation pipeline.
//!
//! ```text
//! Weft Source → Sections → Lexer → Parser → Codegen → CompiledArtifact
//! ```
//!
//! The [`Compiler`] value is explicit and caller-owned; there is no hidden
//! process-wide instance. It is safe to reuse sequentially across
//! independent compilations, one at a time.

pub mod cache;
pub mod options;
pub mod pipeline;

pub use cache::CompileCache;
pub use options::CompilerOptions;
pub use pipeline::{compile, CompileError, Compiler};
