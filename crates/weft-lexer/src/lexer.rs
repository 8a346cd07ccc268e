//! Core weft lexer — converts scanned sections into a flat token stream.
//!
//! Each section kind has its own line grammar:
//! - `.strings`: `Let <key> be translated to <text>.`
//! - `.rom`: `Remember that <key> will always be <value>.` (base-11 value)
//! - `.code` / `.render`: one instruction mnemonic plus arguments per line
//! - `.unsafe_mode`: body lines use the code grammar (so malformed content
//!   is still caught) but the section itself only flips the unsafe flag
//!
//! The stream wraps every section in `SectionStart` / `SectionEnd` tokens.
//! All failures are fatal to the compilation and carry a line number.

use weft_types::{ErrorCode, Result, SourceFile, ValueRef, WeftError};

use crate::section::{self, Section, SectionKind, SectionLine};
use crate::token::{Instruction, Token, TokenKind};

const STRING_PREFIX: &str = "Let ";
const STRING_MARKER: &str = " be translated to ";
const ROM_PREFIX: &str = "Remember that ";
const ROM_MARKER: &str = " will always be ";

/// Derive a table key from the author's octal digits and the entry's
/// zero-based line offset within its section.
///
/// This deliberately obfuscating formula is part of the language's
/// observable contract and must stay bit-for-bit stable. It applies only
/// where entries are defined; references use plain decimal keys.
///
/// Returns `None` if `raw_digits` is empty, not valid octal, or the
/// derived key does not fit an `i64`.
pub fn derive_key(raw_digits: &str, relative_line: u32) -> Option<i64> {
    if raw_digits.is_empty() {
        return None;
    }
    let value = i64::from_str_radix(raw_digits, 8).ok()?;
    let r = (relative_line as usize % raw_digits.len()) % 3;
    match r {
        // (value * 3) << 2, with the shift as a checked multiplication
        0 => value.checked_mul(12)?.checked_add(0x42),
        // (value ^ 1337) << 3, likewise
        1 => (value ^ 1337).checked_mul(8)?.checked_sub(5),
        _ => Some(((value / 7) % 0x69) + 666),
    }
}

/// The weft lexer.
///
/// Scans the source into sections, then tokenizes each section body with
/// the grammar its kind demands. Fail-fast: the first malformed line aborts.
pub struct Lexer<'src> {
    source_file: &'src SourceFile,
}

/// Result of lexing: the flat token stream plus the unsafe-mode flag.
pub struct LexResult {
    /// Section-framed tokens in source order.
    pub tokens: Vec<Token>,
    /// `true` if any `.unsafe_mode` section appeared.
    pub unsafe_mode: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source file.
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self { source_file }
    }

    /// Lex the entire source into a token stream.
    pub fn lex(self) -> Result<LexResult> {
        let sections = section::scan(self.source_file)?;
        let mut tokens = Vec::new();
        let mut unsafe_mode = false;

        for section in &sections {
            tokens.push(Token::new(
                TokenKind::SectionStart {
                    kind: section.kind,
                    argument: section.argument.clone(),
                },
                section.header_line,
            ));

            if section.kind == SectionKind::UnsafeMode {
                unsafe_mode = true;
            }

            for line in &section.lines {
                let token = match section.kind {
                    SectionKind::Strings => self.tokenize_strings_line(section, line)?,
                    SectionKind::Rom => self.tokenize_rom_line(section, line)?,
                    SectionKind::Code | SectionKind::Render | SectionKind::UnsafeMode => {
                        self.tokenize_code_line(line)?
                    }
                };
                tokens.push(token);
            }

            let end_line = section
                .lines
                .last()
                .map(|l| l.number)
                .unwrap_or(section.header_line);
            tokens.push(Token::new(TokenKind::SectionEnd, end_line));
        }

        Ok(LexResult {
            tokens,
            unsafe_mode,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Strings / rom entry lines
    // ─────────────────────────────────────────────────────────────

    /// `Let <key> be translated to <text>.`
    ///
    /// `<text>` is stored verbatim; it may contain any character including
    /// further periods, since the terminal period is end-of-line anchored.
    fn tokenize_strings_line(&self, section: &Section, line: &SectionLine) -> Result<Token> {
        let (key_str, value) = self.split_entry_line(
            line,
            STRING_PREFIX,
            STRING_MARKER,
            ErrorCode::MALFORMED_STRING_ENTRY,
            "invalid string entry",
        )?;
        let key = self.derive_entry_key(key_str, section, line)?;
        Ok(Token::new(
            TokenKind::StringEntry {
                key,
                value: value.to_string(),
            },
            line.number,
        ))
    }

    /// `Remember that <key> will always be <value>.` — value in base 11
    /// (digits `0`–`9` plus `a` = ten).
    fn tokenize_rom_line(&self, section: &Section, line: &SectionLine) -> Result<Token> {
        let (key_str, value_str) = self.split_entry_line(
            line,
            ROM_PREFIX,
            ROM_MARKER,
            ErrorCode::MALFORMED_ROM_ENTRY,
            "invalid rom entry",
        )?;
        let key = self.derive_entry_key(key_str, section, line)?;
        let value = i64::from_str_radix(value_str, 11).map_err(|_| {
            self.error_at(
                ErrorCode::MALFORMED_ROM_ENTRY,
                format!("invalid base-11 constant {value_str:?}"),
                line,
            )
        })?;
        Ok(Token::new(TokenKind::RomEntry { key, value }, line.number))
    }

    /// Split `<prefix><key><marker><payload>.` into key and payload,
    /// enforcing the fixed markers and the trailing period.
    fn split_entry_line<'a>(
        &self,
        line: &'a SectionLine,
        prefix: &str,
        marker: &str,
        code: ErrorCode,
        what: &str,
    ) -> Result<(&'a str, &'a str)> {
        let text = line.text.as_str();
        let malformed = |msg: String| self.error_at(code, msg, line);

        if !text.starts_with(prefix) || !text.ends_with('.') {
            return Err(malformed(format!("{what}: expected '{prefix}<key>{marker}...'")));
        }
        let key_end = text[prefix.len()..]
            .find(' ')
            .map(|i| prefix.len() + i)
            .ok_or_else(|| malformed(format!("{what}: no key found")))?;
        if !text[key_end..].starts_with(marker) {
            return Err(malformed(format!("{what}: expected '{marker}' after the key")));
        }
        let key_str = &text[prefix.len()..key_end];
        let payload = &text[key_end + marker.len()..text.len() - 1];
        Ok((key_str, payload))
    }

    fn derive_entry_key(&self, key_str: &str, section: &Section, line: &SectionLine) -> Result<i64> {
        derive_key(key_str, section.relative_line(line)).ok_or_else(|| {
            self.error_at(
                ErrorCode::BAD_ENTRY_KEY,
                format!("invalid octal entry key {key_str:?}"),
                line,
            )
        })
    }

    // ─────────────────────────────────────────────────────────────
    // Code lines
    // ─────────────────────────────────────────────────────────────

    /// One whitespace-split instruction line: mnemonic plus arguments.
    fn tokenize_code_line(&self, line: &SectionLine) -> Result<Token> {
        let mut parts = line.text.split(' ');
        let mnemonic = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        let instruction = Instruction::from_mnemonic(mnemonic).ok_or_else(|| {
            self.error_at(
                ErrorCode::UNKNOWN_INSTRUCTION,
                format!("unknown instruction {mnemonic:?}"),
                line,
            )
        })?;

        let kind = match instruction {
            // The element tag is optional here, unlike `elem`.
            Instruction::StartContainer => {
                TokenKind::StartContainer(args.first().map(|s| s.to_string()))
            }
            Instruction::EndContainer => TokenKind::EndContainer,
            Instruction::Elem => TokenKind::Elem(self.require_arg(&args, 0, instruction, line)?),
            Instruction::Text => TokenKind::Text(self.value_ref_arg(&args, 0, instruction, line)?),
            Instruction::Show => TokenKind::Show(self.value_ref_arg(&args, 0, instruction, line)?),
            Instruction::Call => TokenKind::Call(self.require_arg(&args, 0, instruction, line)?),
            Instruction::Render => TokenKind::Render,
            Instruction::AddEventListener => TokenKind::AddEventListener {
                event: self.require_arg(&args, 0, instruction, line)?,
                listener: self.require_arg(&args, 1, instruction, line)?,
            },
            Instruction::StackPush => {
                TokenKind::StackPush(self.value_ref_arg(&args, 0, instruction, line)?)
            }
            Instruction::StackCopy => TokenKind::StackCopy,
            Instruction::StackPop => TokenKind::StackPop,
            Instruction::StackSwap => {
                // Offsets default to the top two slots; negative input is
                // clamped to zero, not rejected.
                let off_a = self.offset_arg(&args, 0, 0, line)?;
                let off_b = self.offset_arg(&args, 1, 1, line)?;
                TokenKind::StackSwap {
                    off_a: off_a.max(0),
                    off_b: off_b.max(0),
                }
            }
            Instruction::Compare => TokenKind::Compare,
            Instruction::Read => TokenKind::Read,
            Instruction::MathAdd => TokenKind::MathAdd,
            Instruction::MathSub => TokenKind::MathSub,
            Instruction::MathMul => TokenKind::MathMul,
            Instruction::MathDiv => TokenKind::MathDiv,
            Instruction::StartIf => TokenKind::StartIf,
            Instruction::EndIf => TokenKind::EndIf,
        };

        Ok(Token::new(kind, line.number))
    }

    fn require_arg(
        &self,
        args: &[&str],
        index: usize,
        instruction: Instruction,
        line: &SectionLine,
    ) -> Result<String> {
        args.get(index).map(|s| s.to_string()).ok_or_else(|| {
            self.error_at(
                ErrorCode::MISSING_ARGUMENT,
                format!("missing argument {} for instruction '{instruction}'", index + 1),
                line,
            )
        })
    }

    fn value_ref_arg(
        &self,
        args: &[&str],
        index: usize,
        instruction: Instruction,
        line: &SectionLine,
    ) -> Result<ValueRef> {
        let raw = self.require_arg(args, index, instruction, line)?;
        raw.parse().map_err(|e: weft_types::BadValueRef| {
            self.error_at(ErrorCode::MALFORMED_VALUE_REF, e.to_string(), line)
        })
    }

    fn offset_arg(
        &self,
        args: &[&str],
        index: usize,
        default: i64,
        line: &SectionLine,
    ) -> Result<i64> {
        match args.get(index) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                self.error_at(
                    ErrorCode::MALFORMED_OFFSET,
                    format!("invalid stack offset {raw:?}"),
                    line,
                )
            }),
        }
    }

    fn error_at(&self, code: ErrorCode, message: impl Into<String>, line: &SectionLine) -> WeftError {
        WeftError::at_line(
            &self.source_file.name,
            code,
            message,
            line.number,
            &line.text,
        )
    }
}
