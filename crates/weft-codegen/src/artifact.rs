//! Compiled program representation and the textual export protocol.

use serde::Serialize;

use weft_types::hex_literal;

use crate::literal::ascii_repr;

/// Insertion point for the compiled calls inside the runtime template.
pub const RUNTIME_MARKER: &str = "// WEFT COMPILED CODE";

/// One compiled code section, kept in definition order.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledSection {
    pub label: String,
    pub renderable: bool,
    /// Semicolon-joined call sequence for the section body.
    pub body: String,
}

/// The output of one compilation: constant tables, compiled code sections
/// and the id counter that tags every render-relevant call.
///
/// Tables are plain vectors rather than maps so that export order always
/// matches definition order, and so a redefined code-section label lands
/// in the slot of its first definition.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledArtifact {
    unsafe_mode: bool,
    strings: Vec<(i64, String)>,
    rom: Vec<(i64, i64)>,
    sections: Vec<CompiledSection>,
    #[serde(skip)]
    current_id: u64,
}

impl CompiledArtifact {
    pub fn new(unsafe_mode: bool) -> Self {
        Self {
            unsafe_mode,
            strings: Vec::new(),
            rom: Vec::new(),
            sections: Vec::new(),
            current_id: 0,
        }
    }

    /// Allocate the next identifier, serialized as a hex literal.
    ///
    /// The counter is bumped before serialization, so the first id is `0x1`.
    pub fn next_id(&mut self) -> String {
        self.current_id += 1;
        hex_literal(self.current_id as i64)
    }

    pub fn push_string(&mut self, key: i64, value: String) {
        self.strings.push((key, value));
    }

    pub fn push_rom(&mut self, key: i64, value: i64) {
        self.rom.push((key, value));
    }

    /// Insert a compiled code section. A label seen before replaces the
    /// earlier body in place, keeping the original position.
    pub fn insert_section(&mut self, label: &str, renderable: bool, body: String) {
        if let Some(existing) = self.sections.iter_mut().find(|s| s.label == label) {
            existing.renderable = renderable;
            existing.body = body;
        } else {
            self.sections.push(CompiledSection {
                label: label.to_string(),
                renderable,
                body,
            });
        }
    }

    pub fn unsafe_mode(&self) -> bool {
        self.unsafe_mode
    }

    pub fn strings(&self) -> &[(i64, String)] {
        &self.strings
    }

    pub fn rom(&self) -> &[(i64, i64)] {
        &self.rom
    }

    pub fn sections(&self) -> &[CompiledSection] {
        &self.sections
    }

    pub fn has_section(&self, label: &str) -> bool {
        self.sections.iter().any(|s| s.label == label)
    }

    // ── Export ───────────────────────────────────────────────────────────

    pub fn export_unsafe_mode(&self) -> String {
        format!("setUnsafeMode({})", bool_literal(self.unsafe_mode))
    }

    pub fn export_strings(&self) -> String {
        let pairs = self
            .strings
            .iter()
            .map(|(key, value)| format!("[{},{}]", hex_literal(*key), ascii_repr(value)))
            .collect::<Vec<_>>()
            .join(",");
        format!("strings([{pairs}])")
    }

    pub fn export_rom(&self) -> String {
        let pairs = self
            .rom
            .iter()
            .map(|(key, value)| {
                format!("[{},{}]", hex_literal(*key), ascii_repr(&value.to_string()))
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("rom([{pairs}])")
    }

    pub fn export_codes(&self) -> String {
        self.sections
            .iter()
            .map(|s| {
                format!(
                    "code({},{},()=>{{{}}})",
                    ascii_repr(&s.label),
                    bool_literal(s.renderable),
                    s.body
                )
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Serialize the full call sequence in protocol order.
    pub fn export(&self) -> String {
        format!(
            "{};{};{};{};",
            self.export_unsafe_mode(),
            self.export_strings(),
            self.export_rom(),
            self.export_codes()
        )
    }

    /// Substitute the exported call sequence into a runtime template at
    /// [`RUNTIME_MARKER`].
    pub fn export_into(&self, template: &str) -> String {
        template.replace(RUNTIME_MARKER, &self.export())
    }
}

/// The runtime template requires `!0` / `!1` booleans.
fn bool_literal(value: bool) -> &'static str {
    if value {
        "!0"
    } else {
        "!1"
    }
}
