//! Pipeline orchestration: source text in, [`CompiledArtifact`] out.

use thiserror::Error;

use weft_codegen::{generate, CodegenError, CompiledArtifact};
use weft_lexer::Lexer;
use weft_parser::Parser;
use weft_types::{SourceFile, WeftError};

use crate::cache::CompileCache;
use crate::options::CompilerOptions;

/// Any failure in the pipeline. All failures are fatal to the current
/// compilation; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A lexical or structural error tagged with a source line.
    #[error(transparent)]
    Source(#[from] WeftError),
    /// A whole-program semantic error from code generation.
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// A reusable compiler holding the options shared by its compilations.
///
/// Reuse is sequential only: each compilation owns its artifact and must
/// finish before the next begins on the same instance.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Run the full pipeline over one source file.
    ///
    /// Unsafe mode ends up enabled when either the options seed it or the
    /// source contains a `.unsafe_mode` section.
    pub fn compile(&self, name: &str, source: &str) -> Result<CompiledArtifact, CompileError> {
        let file = SourceFile::new(name, source);
        let lexed = Lexer::new(&file).lex()?;
        let unsafe_mode = self.options.unsafe_mode || lexed.unsafe_mode;
        let ast = Parser::new(lexed.tokens, &file).parse()?;
        let artifact = generate(&ast, &self.options.locale, unsafe_mode)?;
        Ok(artifact)
    }

    /// Like [`Compiler::compile`], but consult `cache` first and store the
    /// exported text on a miss. Returns the exported program text.
    pub fn compile_cached(
        &self,
        cache: &mut CompileCache,
        name: &str,
        source: &str,
    ) -> Result<String, CompileError> {
        if let Some(exported) = cache.get(source, &self.options) {
            return Ok(exported.to_string());
        }
        let exported = self.compile(name, source)?.export();
        cache.insert(source, &self.options, exported.clone());
        Ok(exported)
    }
}

/// One-shot convenience wrapper around [`Compiler::compile`].
pub fn compile(
    name: &str,
    source: &str,
    options: CompilerOptions,
) -> Result<CompiledArtifact, CompileError> {
    Compiler::new(options).compile(name, source)
}
