//! Token types for the weft lexer.
//!
//! Defines the fixed instruction mnemonic table and [`Token`], which pairs
//! a [`TokenKind`] with the 1-based source line it came from.

use std::fmt;

use weft_types::ValueRef;

use crate::section::SectionKind;

/// All 20 instruction mnemonics, each exactly four characters.
pub const ALL_MNEMONICS: &[&str] = &[
    "cont", "econ", "elem", "text", "show", "call", "rend", "hear", "push", "copy", "pops",
    "swap", "comp", "read", "madd", "msub", "mmul", "mdiv", "ifis", "endi",
];

/// The instruction set of code and render sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `cont` — open a container.
    StartContainer,
    /// `econ` — close a container.
    EndContainer,
    /// `elem` — create an element without content.
    Elem,
    /// `text` — show a resolved value as text.
    Text,
    /// `show` — inject a resolved value as raw markup.
    Show,
    /// `call` — call another code section.
    Call,
    /// `rend` — schedule a re-render.
    Render,
    /// `hear` — listen for an event.
    AddEventListener,
    /// `push` — resolve a value and push it onto the stack.
    StackPush,
    /// `copy` — duplicate the top stack value.
    StackCopy,
    /// `pops` — pop a value, discarding it.
    StackPop,
    /// `swap` — swap two stack values by offset.
    StackSwap,
    /// `comp` — pop A, pop B, push A == B.
    Compare,
    /// `read` — push an element's content, then its length.
    Read,
    /// `madd` — pop A, pop B, push A + B.
    MathAdd,
    /// `msub` — pop A, pop B, push A - B.
    MathSub,
    /// `mmul` — pop A, pop B, push A * B.
    MathMul,
    /// `mdiv` — pop A, pop B, push A // B.
    MathDiv,
    /// `ifis` — pop A, run the block only if A == 1.
    StartIf,
    /// `endi` — end of an if block.
    EndIf,
}

impl Instruction {
    /// Look up a mnemonic. Returns `None` for unknown instructions.
    pub fn from_mnemonic(s: &str) -> Option<Instruction> {
        Some(match s {
            "cont" => Instruction::StartContainer,
            "econ" => Instruction::EndContainer,
            "elem" => Instruction::Elem,
            "text" => Instruction::Text,
            "show" => Instruction::Show,
            "call" => Instruction::Call,
            "rend" => Instruction::Render,
            "hear" => Instruction::AddEventListener,
            "push" => Instruction::StackPush,
            "copy" => Instruction::StackCopy,
            "pops" => Instruction::StackPop,
            "swap" => Instruction::StackSwap,
            "comp" => Instruction::Compare,
            "read" => Instruction::Read,
            "madd" => Instruction::MathAdd,
            "msub" => Instruction::MathSub,
            "mmul" => Instruction::MathMul,
            "mdiv" => Instruction::MathDiv,
            "ifis" => Instruction::StartIf,
            "endi" => Instruction::EndIf,
            _ => return None,
        })
    }

    /// The source mnemonic for this instruction.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Instruction::StartContainer => "cont",
            Instruction::EndContainer => "econ",
            Instruction::Elem => "elem",
            Instruction::Text => "text",
            Instruction::Show => "show",
            Instruction::Call => "call",
            Instruction::Render => "rend",
            Instruction::AddEventListener => "hear",
            Instruction::StackPush => "push",
            Instruction::StackCopy => "copy",
            Instruction::StackPop => "pops",
            Instruction::StackSwap => "swap",
            Instruction::Compare => "comp",
            Instruction::Read => "read",
            Instruction::MathAdd => "madd",
            Instruction::MathSub => "msub",
            Instruction::MathMul => "mmul",
            Instruction::MathDiv => "mdiv",
            Instruction::StartIf => "ifis",
            Instruction::EndIf => "endi",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A single token produced by the weft lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// 1-based source line the token came from.
    pub line: u32,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, line: u32) -> Self {
        Self { kind, line }
    }
}

/// Every token kind in the weft language.
///
/// Each variant carries only the payload its kind needs; tokens are
/// immutable once produced and consumed in a single linear pass.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Section framing ──────────────────────────────────────
    /// Opens a section's token run.
    SectionStart {
        kind: SectionKind,
        argument: String,
    },
    /// Closes a section's token run.
    SectionEnd,

    // ── Table entries ────────────────────────────────────────
    /// One `.strings` entry.
    StringEntry { key: i64, value: String },
    /// One `.rom` entry.
    RomEntry { key: i64, value: i64 },

    // ── Instructions ─────────────────────────────────────────
    StartContainer(Option<String>),
    EndContainer,
    Elem(String),
    Text(ValueRef),
    Show(ValueRef),
    Call(String),
    Render,
    AddEventListener { event: String, listener: String },
    StackPush(ValueRef),
    StackCopy,
    StackPop,
    StackSwap { off_a: i64, off_b: i64 },
    Compare,
    Read,
    MathAdd,
    MathSub,
    MathMul,
    MathDiv,
    StartIf,
    EndIf,
}

impl TokenKind {
    /// Returns `true` for instructions only legal in render sections:
    /// everything that builds or listens on document structure.
    pub fn is_render_only(&self) -> bool {
        matches!(
            self,
            TokenKind::Elem(_)
                | TokenKind::Show(_)
                | TokenKind::Text(_)
                | TokenKind::StartContainer(_)
                | TokenKind::EndContainer
                | TokenKind::AddEventListener { .. }
        )
    }

    /// A short human-readable name for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::SectionStart { .. } => "section start",
            TokenKind::SectionEnd => "section end",
            TokenKind::StringEntry { .. } => "string entry",
            TokenKind::RomEntry { .. } => "rom entry",
            TokenKind::StartContainer(_) => "cont",
            TokenKind::EndContainer => "econ",
            TokenKind::Elem(_) => "elem",
            TokenKind::Text(_) => "text",
            TokenKind::Show(_) => "show",
            TokenKind::Call(_) => "call",
            TokenKind::Render => "rend",
            TokenKind::AddEventListener { .. } => "hear",
            TokenKind::StackPush(_) => "push",
            TokenKind::StackCopy => "copy",
            TokenKind::StackPop => "pops",
            TokenKind::StackSwap { .. } => "swap",
            TokenKind::Compare => "comp",
            TokenKind::Read => "read",
            TokenKind::MathAdd => "madd",
            TokenKind::MathSub => "msub",
            TokenKind::MathMul => "mmul",
            TokenKind::MathDiv => "mdiv",
            TokenKind::StartIf => "ifis",
            TokenKind::EndIf => "endi",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_mnemonics_count() {
        assert_eq!(ALL_MNEMONICS.len(), 20);
    }

    #[test]
    fn test_from_mnemonic_recognises_all() {
        for &m in ALL_MNEMONICS {
            assert!(
                Instruction::from_mnemonic(m).is_some(),
                "from_mnemonic should recognise '{m}'"
            );
        }
    }

    #[test]
    fn test_from_mnemonic_rejects_unknown() {
        for name in ["CONT", "render", "blah", "eco", "conti", ""] {
            assert!(
                Instruction::from_mnemonic(name).is_none(),
                "from_mnemonic should not recognise '{name}'"
            );
        }
    }

    #[test]
    fn test_mnemonic_roundtrip() {
        for &m in ALL_MNEMONICS {
            let instruction = Instruction::from_mnemonic(m).unwrap();
            assert_eq!(instruction.mnemonic(), m);
            assert_eq!(instruction.to_string(), m);
        }
    }

    #[test]
    fn test_render_only_set() {
        let value: ValueRef = "1t".parse().unwrap();
        assert!(TokenKind::Elem("div".into()).is_render_only());
        assert!(TokenKind::Show(value).is_render_only());
        assert!(TokenKind::Text(value).is_render_only());
        assert!(TokenKind::StartContainer(None).is_render_only());
        assert!(TokenKind::EndContainer.is_render_only());
        assert!(TokenKind::AddEventListener {
            event: "click".into(),
            listener: "on_click".into()
        }
        .is_render_only());

        assert!(!TokenKind::StackPush(value).is_render_only());
        assert!(!TokenKind::Render.is_render_only());
        assert!(!TokenKind::Call("main".into()).is_render_only());
        assert!(!TokenKind::SectionEnd.is_render_only());
    }
}
