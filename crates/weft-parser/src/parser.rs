//! Core parser infrastructure: token cursor, error reporting, top-level loop.

use weft_lexer::section::SectionKind;
use weft_lexer::token::{Token, TokenKind};
use weft_types::ast::Ast;
use weft_types::{ErrorCode, Result, SourceFile, WeftError};

/// The weft parser.
///
/// Consumes the section-framed token stream produced by the lexer and builds
/// the AST arena, one root node per content-producing section.
///
/// There is exactly one cursor over the stream. Nested container and if
/// blocks recurse through the *same* cursor, each level consuming exactly
/// its own tokens up to and including its terminator — an independent
/// sub-stream per nesting level would mis-match an inner `econ` against an
/// outer scope once nesting reaches depth 2.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// The arena being built.
    pub(crate) ast: Ast,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            ast: Ast::new(),
        }
    }

    /// Parse the token stream into an [`Ast`].
    pub fn parse(mut self) -> Result<Ast> {
        while let Some(token) = self.advance() {
            let TokenKind::SectionStart { kind, argument } = token.kind else {
                // Section bodies consume their own SectionEnd; anything
                // else at top level was framed by the lexer already.
                continue;
            };

            match kind {
                SectionKind::UnsafeMode => self.skip_section()?,
                SectionKind::Strings | SectionKind::Rom => {
                    let node = self.parse_table_section(kind, argument)?;
                    let id = self.ast.add(node);
                    self.ast.add_root(id);
                }
                SectionKind::Code | SectionKind::Render => {
                    let node =
                        self.parse_code_section(argument, kind == SectionKind::Render)?;
                    let id = self.ast.add(node);
                    self.ast.add_root(id);
                }
            }
        }
        Ok(self.ast)
    }

    // ── Token cursor ─────────────────────────────────────────────────

    /// Consume and return the next token, or `None` at end of stream.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        Some(token)
    }

    /// Line number of the most recently consumed token (for end-of-stream
    /// errors), or 1 on an empty stream.
    pub(crate) fn previous_line(&self) -> u32 {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.line)
            .unwrap_or(1)
    }

    // ── Error reporting ──────────────────────────────────────────────

    /// Build an error pinned to a token's source line.
    pub(crate) fn error_at(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        line: u32,
    ) -> WeftError {
        let source_line = self.source_file.line(line).unwrap_or("");
        WeftError::at_line(&self.source_file.name, code, message, line, source_line)
    }

    /// The end of the stream arrived before a required terminator.
    pub(crate) fn unterminated(&self, what: &str) -> WeftError {
        self.error_at(
            ErrorCode::UNTERMINATED_BLOCK,
            format!("unterminated {what}: the token stream ended before its terminator"),
            self.previous_line(),
        )
    }
}
