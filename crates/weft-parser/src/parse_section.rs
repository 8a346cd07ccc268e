//! Section bodies: constant tables, code sections, and the shared
//! container-contents procedure.

use weft_lexer::section::SectionKind;
use weft_lexer::token::TokenKind;
use weft_types::ast::{MathOp, Node, NodeId};
use weft_types::{ErrorCode, Result};

use crate::parser::Parser;

impl Parser<'_> {
    // ── UnsafeMode ───────────────────────────────────────────────────

    /// Swallow an `.unsafe_mode` section: its tokens were checked by the
    /// lexer but contribute nothing to the AST.
    pub(crate) fn skip_section(&mut self) -> Result<()> {
        loop {
            match self.advance() {
                Some(token) if token.kind == TokenKind::SectionEnd => return Ok(()),
                Some(_) => continue,
                None => return Err(self.unterminated("section")),
            }
        }
    }

    // ── Strings / Rom ────────────────────────────────────────────────

    /// Collect entry tokens into a localized table section node.
    pub(crate) fn parse_table_section(
        &mut self,
        kind: SectionKind,
        locale: String,
    ) -> Result<Node> {
        let mut entries: Vec<NodeId> = Vec::new();

        loop {
            let Some(token) = self.advance() else {
                return Err(self.unterminated("section"));
            };
            let entry = match token.kind {
                TokenKind::SectionEnd => break,
                TokenKind::StringEntry { key, value } if kind == SectionKind::Strings => {
                    Node::StringEntry { key, value }
                }
                TokenKind::RomEntry { key, value } if kind == SectionKind::Rom => {
                    Node::RomEntry { key, value }
                }
                other => {
                    return Err(self.error_at(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!(
                            "unexpected token '{}' in a {kind} section",
                            other.describe()
                        ),
                        token.line,
                    ));
                }
            };
            let id = self.ast.add(entry);
            entries.push(id);
        }

        Ok(match kind {
            SectionKind::Strings => Node::StringsSection { locale, entries },
            _ => Node::RomSection { locale, entries },
        })
    }

    // ── Code / Render ────────────────────────────────────────────────

    /// Parse a code body as container contents under the implicit `root`
    /// element tag.
    pub(crate) fn parse_code_section(&mut self, label: String, is_render: bool) -> Result<Node> {
        let body = self.parse_container_contents(is_render)?;
        Ok(Node::CodeSection {
            label,
            is_render,
            body,
        })
    }

    /// The shared container-contents procedure.
    ///
    /// Consumes tokens from the shared cursor until an end-container,
    /// section-end, or end-if token, which it consumes as its own
    /// terminator before returning control to the enclosing call. Leaf
    /// instructions append one node each in encounter order; `cont` and
    /// `ifis` recurse.
    fn parse_container_contents(&mut self, is_render: bool) -> Result<Vec<NodeId>> {
        let mut children: Vec<NodeId> = Vec::new();

        loop {
            let Some(token) = self.advance() else {
                return Err(self.unterminated("block"));
            };

            if !is_render && token.kind.is_render_only() {
                return Err(self.error_at(
                    ErrorCode::RENDER_ONLY_INSTRUCTION,
                    format!(
                        "prohibited use of a render-section-only token '{}'",
                        token.kind.describe()
                    ),
                    token.line,
                ));
            }

            let node = match token.kind {
                // Any terminator closes the innermost open block.
                TokenKind::EndContainer | TokenKind::SectionEnd | TokenKind::EndIf => {
                    return Ok(children)
                }
                // Reaching the next section header means this block never
                // saw its terminator.
                TokenKind::SectionStart { .. } => return Err(self.unterminated("block")),

                TokenKind::StartContainer(element) => {
                    if matches!(element.as_deref(), Some("root") | Some("if")) {
                        return Err(self.error_at(
                            ErrorCode::RESERVED_ELEMENT_NAME,
                            "a container cannot be named 'root' or 'if'",
                            token.line,
                        ));
                    }
                    let inner = self.parse_container_contents(is_render)?;
                    Node::Container {
                        element,
                        children: inner,
                    }
                }
                TokenKind::StartIf => {
                    let inner = self.parse_container_contents(is_render)?;
                    Node::IfStatement { children: inner }
                }

                TokenKind::Elem(element) => Node::Elem(element),
                TokenKind::Text(value) => Node::RawValue {
                    value,
                    inject_raw: false,
                },
                TokenKind::Show(value) => Node::RawValue {
                    value,
                    inject_raw: true,
                },
                TokenKind::Call(label) => Node::Call(label),
                TokenKind::Render => Node::Render,
                TokenKind::AddEventListener { event, listener } => {
                    Node::AddEventListener { event, listener }
                }
                TokenKind::StackPush(value) => Node::StackPush(value),
                TokenKind::StackCopy => Node::StackCopy,
                TokenKind::StackPop => Node::StackPop,
                TokenKind::StackSwap { off_a, off_b } => Node::StackSwap { off_a, off_b },
                TokenKind::Compare => Node::Compare,
                TokenKind::Read => Node::Read,
                TokenKind::MathAdd => Node::MathOp(MathOp::Add),
                TokenKind::MathSub => Node::MathOp(MathOp::Sub),
                TokenKind::MathMul => Node::MathOp(MathOp::Mul),
                TokenKind::MathDiv => Node::MathOp(MathOp::Div),

                other @ (TokenKind::StringEntry { .. } | TokenKind::RomEntry { .. }) => {
                    return Err(self.error_at(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("unexpected token '{}' in a code section", other.describe()),
                        token.line,
                    ));
                }
            };

            let id = self.ast.add(node);
            children.push(id);
        }
    }
}
