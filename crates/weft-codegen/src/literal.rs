//! ASCII-safe string literal encoding for the output protocol.
//!
//! Labels, element tags, and translated strings become quoted literals in
//! the generated script, so the result must contain only printable ASCII
//! no matter what the source held.

/// Encode a string as an ASCII-only quoted literal.
///
//  Quote selection mirrors a conventional repr: single quotes by default,
//  double quotes when the text contains a single quote but no double quote.
/// Control characters and everything outside ASCII are escaped as `\xNN`,
/// `\uNNNN`, or `\UNNNNNNNN` by codepoint width; `\n`, `\r`, `\t` keep
/// their short forms.
pub fn ascii_repr(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (' '..='\u{7e}').contains(&c) => out.push(c),
            c => {
                let cp = c as u32;
                if cp < 0x100 {
                    out.push_str(&format!("\\x{cp:02x}"));
                } else if cp < 0x10000 {
                    out.push_str(&format!("\\u{cp:04x}"));
                } else {
                    out.push_str(&format!("\\U{cp:08x}"));
                }
            }
        }
    }
    out.push(quote);
    out
}
