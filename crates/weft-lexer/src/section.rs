//! Section scanner: splits raw source text into line-delimited sections.
//!
//! A line starting with `.` opens a section; the rest of that line, split on
//! the first space, gives the kind and a free-text argument. Every following
//! line belongs to the open section until the next `.` line or end of input.
//! Blank lines carry no content but still advance the line counter, which
//! matters for key derivation downstream.

use std::fmt;

use weft_types::{ErrorCode, Result, SourceFile, WeftError};

/// The five section kinds of the surface grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `.unsafe_mode` — flips the unsafe flag, produces no AST content.
    UnsafeMode,
    /// `.strings <locale>` — translated string table.
    Strings,
    /// `.rom <locale>` — numeric constant table.
    Rom,
    /// `.code <label>` — stack-machine-only code body.
    Code,
    /// `.render <label>` — code body that may build document structure.
    Render,
}

impl SectionKind {
    /// Look up a header keyword. Returns `None` for unknown kinds.
    pub fn from_header(s: &str) -> Option<SectionKind> {
        Some(match s {
            "unsafe_mode" => SectionKind::UnsafeMode,
            "strings" => SectionKind::Strings,
            "rom" => SectionKind::Rom,
            "code" => SectionKind::Code,
            "render" => SectionKind::Render,
            _ => return None,
        })
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::UnsafeMode => f.write_str("unsafe_mode"),
            SectionKind::Strings => f.write_str("strings"),
            SectionKind::Rom => f.write_str("rom"),
            SectionKind::Code => f.write_str("code"),
            SectionKind::Render => f.write_str("render"),
        }
    }
}

/// One non-blank body line, tagged with its 1-based absolute line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLine {
    pub text: String,
    pub number: u32,
}

/// A scanned section: kind, header argument, and body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// The free text after the kind keyword: a locale for table sections,
    /// a label for code sections.
    pub argument: String,
    /// Line number of the `.` header itself.
    pub header_line: u32,
    /// Line number of the first body line slot (header line + 1). Blank
    /// lines count toward offsets from here even though they are not kept.
    pub first_body_line: u32,
    /// Non-blank body lines in order.
    pub lines: Vec<SectionLine>,
}

impl Section {
    /// Zero-based offset of a body line from the section's first body line.
    pub fn relative_line(&self, line: &SectionLine) -> u32 {
        line.number - self.first_body_line
    }
}

/// Scan the whole source into an ordered list of sections.
pub fn scan(source_file: &SourceFile) -> Result<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for number in 1..=source_file.line_count() as u32 {
        let line = source_file.line(number).unwrap_or("");
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('.') {
            let Some((kind_str, argument)) = header.split_once(' ') else {
                return Err(WeftError::at_line(
                    &source_file.name,
                    ErrorCode::MISSING_SECTION_ARGUMENT,
                    "the section header must contain an argument",
                    number,
                    line,
                ));
            };
            let Some(kind) = SectionKind::from_header(kind_str) else {
                return Err(WeftError::at_line(
                    &source_file.name,
                    ErrorCode::UNKNOWN_SECTION_KIND,
                    format!("unknown section kind '{kind_str}'"),
                    number,
                    line,
                ));
            };
            sections.push(Section {
                kind,
                argument: argument.to_string(),
                header_line: number,
                first_body_line: number + 1,
                lines: Vec::new(),
            });
        } else {
            let Some(open) = sections.last_mut() else {
                return Err(WeftError::at_line(
                    &source_file.name,
                    ErrorCode::CONTENT_BEFORE_SECTION,
                    "the code must start with a section",
                    number,
                    line,
                ));
            };
            open.lines.push(SectionLine {
                text: line.to_string(),
                number,
            });
        }
    }

    Ok(sections)
}
