use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which table a [`ValueRef`] points into.
///
/// The one-character tags are part of the source grammar: a reference is
/// written as a decimal key immediately followed by its tag, e.g. `42t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueRefKind {
    /// `t` — the translated string table.
    String,
    /// `c` — the numeric constant (rom) table.
    Constant,
    /// `s` — a runtime stack slot.
    Stack,
}

impl ValueRefKind {
    /// The runtime accessor this kind resolves through.
    pub fn accessor(self) -> &'static str {
        match self {
            ValueRefKind::String => "getString",
            ValueRefKind::Constant => "getConstant",
            ValueRefKind::Stack => "getStack",
        }
    }
}

/// A reference to a string-table entry, constant-table entry, or stack slot.
///
/// Keys here are plain decimal integers — the obfuscating key derivation
/// applies only where entries are *defined*, never where they are referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRef {
    pub kind: ValueRefKind,
    pub key: i64,
}

/// Failure to parse the compact `<int><tag>` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse the value reference {0:?}")]
pub struct BadValueRef(pub String);

impl FromStr for ValueRef {
    type Err = BadValueRef;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BadValueRef(s.to_string());
        let tag = s.chars().next_back().ok_or_else(bad)?;
        let kind = match tag {
            't' => ValueRefKind::String,
            'c' => ValueRefKind::Constant,
            's' => ValueRefKind::Stack,
            _ => return Err(bad()),
        };
        let key = s[..s.len() - tag.len_utf8()].parse().map_err(|_| bad())?;
        Ok(ValueRef { kind, key })
    }
}

impl fmt::Display for ValueRef {
    /// Renders the runtime call expression, e.g. `getString(0x2a)`.
    ///
    /// This is executable code in the output, not a quoted literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.accessor(), hex_literal(self.key))
    }
}

/// Format an integer the way the runtime protocol expects: a lowercase
/// `0x` hex literal, with the sign ahead of the prefix for negatives.
pub fn hex_literal(value: i64) -> String {
    if value < 0 {
        format!("-0x{:x}", value.unsigned_abs())
    } else {
        format!("0x{value:x}")
    }
}
