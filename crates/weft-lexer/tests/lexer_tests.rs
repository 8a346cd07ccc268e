//! Lexer tests: section framing, the three line grammars, key derivation,
//! value references, and error positions.

use weft_lexer::{derive_key, LexResult, Lexer, SectionKind, TokenKind};
use weft_types::{ErrorCode, SourceFile, ValueRefKind, WeftError};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn lex(source: &str) -> Result<LexResult, WeftError> {
    let sf = SourceFile::new("test.weft", source);
    Lexer::new(&sf).lex()
}

fn lex_ok(source: &str) -> LexResult {
    lex(source).unwrap_or_else(|e| panic!("unexpected lex error: {e}"))
}

fn lex_err(source: &str) -> WeftError {
    match lex(source) {
        Ok(_) => panic!("expected a lex error"),
        Err(e) => e,
    }
}

/// Kinds of the tokens between the first SectionStart/SectionEnd pair.
fn body_kinds(source: &str) -> Vec<TokenKind> {
    let result = lex_ok(source);
    result.tokens[1..result.tokens.len() - 1]
        .iter()
        .map(|t| t.kind.clone())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────
// Key derivation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_derive_key_branch_zero() {
    // r = 0 mod 1 mod 3 = 0 ⇒ (7*3 << 2) + 0x42 = 84 + 66
    assert_eq!(derive_key("7", 0), Some(150));
}

#[test]
fn test_derive_key_branch_one() {
    // octal "10" = 8, r = 1 mod 2 mod 3 = 1 ⇒ ((8 ^ 1337) << 3) - 5
    assert_eq!(derive_key("10", 1), Some(((8 ^ 1337) << 3) - 5));
}

#[test]
fn test_derive_key_branch_two() {
    // "777" = 511, r = 2 mod 3 mod 3 = 2 ⇒ ((511 / 7) % 0x69) + 666
    assert_eq!(derive_key("777", 2), Some(((511 / 7) % 0x69) + 666));
}

#[test]
fn test_derive_key_depends_on_line_position() {
    assert_ne!(derive_key("7", 0), derive_key("7", 2));
}

#[test]
fn test_derive_key_wraps_by_digit_count() {
    // relative line 3 with a 1-digit key: r = 3 mod 1 mod 3 = 0
    assert_eq!(derive_key("7", 3), derive_key("7", 0));
}

#[test]
fn test_derive_key_rejects_bad_digits() {
    assert_eq!(derive_key("", 0), None);
    assert_eq!(derive_key("8", 0), None);
    assert_eq!(derive_key("zz", 1), None);
}

#[test]
fn test_derive_key_rejects_oversized_keys() {
    // 21 octal sevens = i64::MAX, which the formula cannot scale further
    let digits = "7".repeat(21);
    assert_eq!(derive_key(&digits, 0), None);
    assert_eq!(derive_key(&digits, 1), None);
    // The division branch stays in range even at the extreme
    assert_eq!(
        derive_key(&digits, 2),
        Some(((i64::MAX / 7) % 0x69) + 666)
    );
}

// ─────────────────────────────────────────────────────────────────────
// Section framing
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_section_start_and_end_tokens() {
    let result = lex_ok(".code main\nrend\n");
    assert_eq!(result.tokens.len(), 3);
    assert_eq!(
        result.tokens[0].kind,
        TokenKind::SectionStart {
            kind: SectionKind::Code,
            argument: "main".into()
        }
    );
    assert_eq!(result.tokens[1].kind, TokenKind::Render);
    assert_eq!(result.tokens[2].kind, TokenKind::SectionEnd);
}

#[test]
fn test_token_line_numbers() {
    let result = lex_ok(".code main\n\nrend\n");
    assert_eq!(result.tokens[0].line, 1);
    // Blank line 2 advances the counter but produces no token
    assert_eq!(result.tokens[1].line, 3);
}

#[test]
fn test_unsafe_mode_flag() {
    let result = lex_ok(".unsafe_mode on\n.code main\nrend\n");
    assert!(result.unsafe_mode);

    let result = lex_ok(".code main\nrend\n");
    assert!(!result.unsafe_mode);
}

#[test]
fn test_unsafe_mode_body_still_tokenized() {
    let err = lex_err(".unsafe_mode on\nnot-an-instruction\n");
    assert_eq!(err.code, ErrorCode::UNKNOWN_INSTRUCTION);
    assert_eq!(err.line, Some(2));
}

// ─────────────────────────────────────────────────────────────────────
// Strings sections
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_strings_entry() {
    let kinds = body_kinds(".strings en\nLet 7 be translated to Hello!.\n");
    assert_eq!(
        kinds,
        vec![TokenKind::StringEntry {
            key: 150,
            value: "Hello!".into()
        }]
    );
}

#[test]
fn test_strings_value_may_contain_periods() {
    let kinds = body_kinds(".strings en\nLet 7 be translated to One. Two. Three.\n");
    assert_eq!(
        kinds,
        vec![TokenKind::StringEntry {
            key: 150,
            value: "One. Two. Three".into()
        }]
    );
}

#[test]
fn test_strings_key_uses_relative_line() {
    // Same digits on body lines 0 and 1 derive different keys
    let kinds = body_kinds(
        ".strings en\nLet 45 be translated to a.\nLet 44 be translated to b.\n",
    );
    let keys: Vec<i64> = kinds
        .iter()
        .map(|k| match k {
            TokenKind::StringEntry { key, .. } => *key,
            other => panic!("unexpected token {other:?}"),
        })
        .collect();
    assert_eq!(keys[0], derive_key("45", 0).unwrap());
    assert_eq!(keys[1], derive_key("44", 1).unwrap());
}

#[test]
fn test_blank_line_shifts_derivation() {
    // A blank line advances the offset, so the same digits derive as line 2
    let kinds = body_kinds(".strings en\nLet 45 be translated to a.\n\nLet 44 be translated to b.\n");
    let second = &kinds[1];
    match second {
        TokenKind::StringEntry { key, .. } => {
            assert_eq!(*key, derive_key("44", 2).unwrap());
        }
        other => panic!("unexpected token {other:?}"),
    }
}

#[test]
fn test_strings_missing_period_fails() {
    let err = lex_err(".strings en\nLet 7 be translated to Hello\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_STRING_ENTRY);
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_strings_missing_marker_fails() {
    let err = lex_err(".strings en\nLet 7 equals Hello.\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_STRING_ENTRY);
}

#[test]
fn test_strings_marker_must_follow_key() {
    let err = lex_err(".strings en\nLet 7 x be translated to Hello.\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_STRING_ENTRY);
}

#[test]
fn test_strings_bad_key_fails() {
    let err = lex_err(".strings en\nLet 9 be translated to Hello.\n");
    assert_eq!(err.code, ErrorCode::BAD_ENTRY_KEY);
}

#[test]
fn test_strings_oversized_key_fails() {
    // Grammatically valid, but the derived key overflows an i64
    let err = lex_err(".strings en\nLet 777777777777777777777 be translated to X.\n");
    assert_eq!(err.code, ErrorCode::BAD_ENTRY_KEY);
    assert_eq!(err.line, Some(2));
}

// ─────────────────────────────────────────────────────────────────────
// Rom sections
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_rom_entry_base11() {
    // base-11 "a" = 10
    let kinds = body_kinds(".rom en\nRemember that 7 will always be a.\n");
    assert_eq!(kinds, vec![TokenKind::RomEntry { key: 150, value: 10 }]);
}

#[test]
fn test_rom_entry_multi_digit() {
    // base-11 "10" = 11
    let kinds = body_kinds(".rom en\nRemember that 7 will always be 10.\n");
    assert_eq!(kinds, vec![TokenKind::RomEntry { key: 150, value: 11 }]);
}

#[test]
fn test_rom_bad_value_fails() {
    let err = lex_err(".rom en\nRemember that 7 will always be b.\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_ROM_ENTRY);
}

#[test]
fn test_rom_malformed_line_fails() {
    let err = lex_err(".rom en\nRecall that 7 will always be 1.\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_ROM_ENTRY);
}

// ─────────────────────────────────────────────────────────────────────
// Code sections
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_zero_argument_instructions() {
    let kinds = body_kinds(
        ".code main\necon\nrend\ncopy\npops\ncomp\nread\nmadd\nmsub\nmmul\nmdiv\nifis\nendi\n",
    );
    assert_eq!(
        kinds,
        vec![
            TokenKind::EndContainer,
            TokenKind::Render,
            TokenKind::StackCopy,
            TokenKind::StackPop,
            TokenKind::Compare,
            TokenKind::Read,
            TokenKind::MathAdd,
            TokenKind::MathSub,
            TokenKind::MathMul,
            TokenKind::MathDiv,
            TokenKind::StartIf,
            TokenKind::EndIf,
        ]
    );
}

#[test]
fn test_container_argument_optional() {
    let kinds = body_kinds(".render main\ncont\ncont div\n");
    assert_eq!(
        kinds,
        vec![
            TokenKind::StartContainer(None),
            TokenKind::StartContainer(Some("div".into())),
        ]
    );
}

#[test]
fn test_elem_requires_argument() {
    let err = lex_err(".render main\nelem\n");
    assert_eq!(err.code, ErrorCode::MISSING_ARGUMENT);
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_value_ref_arguments() {
    let kinds = body_kinds(".render main\ntext 42t\nshow 3c\npush 7s\n");
    match &kinds[0] {
        TokenKind::Text(v) => {
            assert_eq!(v.kind, ValueRefKind::String);
            assert_eq!(v.key, 42);
        }
        other => panic!("unexpected token {other:?}"),
    }
    match &kinds[1] {
        TokenKind::Show(v) => assert_eq!(v.kind, ValueRefKind::Constant),
        other => panic!("unexpected token {other:?}"),
    }
    match &kinds[2] {
        TokenKind::StackPush(v) => assert_eq!(v.kind, ValueRefKind::Stack),
        other => panic!("unexpected token {other:?}"),
    }
}

#[test]
fn test_malformed_value_ref_fails() {
    let err = lex_err(".render main\ntext 42\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_VALUE_REF);

    let err = lex_err(".render main\npush t\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_VALUE_REF);
}

#[test]
fn test_swap_defaults_and_clamping() {
    let kinds = body_kinds(".code main\nswap\nswap 2\nswap 2 3\nswap -4 -1\n");
    assert_eq!(
        kinds,
        vec![
            TokenKind::StackSwap { off_a: 0, off_b: 1 },
            TokenKind::StackSwap { off_a: 2, off_b: 1 },
            TokenKind::StackSwap { off_a: 2, off_b: 3 },
            // Negative offsets are silently clamped, not rejected
            TokenKind::StackSwap { off_a: 0, off_b: 0 },
        ]
    );
}

#[test]
fn test_swap_non_integer_fails() {
    let err = lex_err(".code main\nswap x\n");
    assert_eq!(err.code, ErrorCode::MALFORMED_OFFSET);
}

#[test]
fn test_hear_takes_two_arguments() {
    let kinds = body_kinds(".render main\nhear click on_click\n");
    assert_eq!(
        kinds,
        vec![TokenKind::AddEventListener {
            event: "click".into(),
            listener: "on_click".into()
        }]
    );

    let err = lex_err(".render main\nhear click\n");
    assert_eq!(err.code, ErrorCode::MISSING_ARGUMENT);
}

#[test]
fn test_unknown_instruction_fails() {
    let err = lex_err(".code main\nnope 1t\n");
    assert_eq!(err.code, ErrorCode::UNKNOWN_INSTRUCTION);
    assert_eq!(err.line, Some(2));
    assert_eq!(err.source_line.as_deref(), Some("nope 1t"));
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_lex_determinism_100_iterations() {
    let source = ".strings en\nLet 7 be translated to Hi.\n.code main\npush 1c\nrend\n";
    let first = lex_ok(source);
    for i in 0..100 {
        let result = lex_ok(source);
        assert_eq!(first.tokens, result.tokens, "determinism failure at iteration {i}");
        assert_eq!(first.unsafe_mode, result.unsafe_mode);
    }
}
