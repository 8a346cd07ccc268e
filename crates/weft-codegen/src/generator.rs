//! AST → call-protocol generation.
//!
//! One post-order walk per code section. Leaf instructions draw their id as
//! they are emitted; containers, if-statements and section roots draw theirs
//! only after their children, so id order always follows emission order and
//! the runtime can correlate nodes across recompilations.

use weft_types::ast::{Ast, Node, NodeId};

use crate::artifact::CompiledArtifact;
use crate::error::{CodegenError, CodegenResult};
use crate::literal::ascii_repr;

/// Generate a [`CompiledArtifact`] from a parsed program.
///
/// `locale` selects which strings/rom sections populate the constant
/// tables; exactly one of each must match. `unsafe_mode` is the seed
/// recorded in the artifact, independent of any `.unsafe_mode` source
/// section (those are consumed earlier in the pipeline).
pub fn generate(ast: &Ast, locale: &str, unsafe_mode: bool) -> CodegenResult<CompiledArtifact> {
    let mut artifact = CompiledArtifact::new(unsafe_mode);
    collect_strings(ast, locale, &mut artifact)?;
    collect_rom(ast, locale, &mut artifact)?;
    emit_code_sections(ast, &mut artifact)?;
    Ok(artifact)
}

// ── Constant tables ──────────────────────────────────────────────────────

fn collect_strings(ast: &Ast, locale: &str, artifact: &mut CompiledArtifact) -> CodegenResult<()> {
    let mut found = false;
    for &root in ast.roots() {
        let Node::StringsSection {
            locale: section_locale,
            entries,
        } = ast.node(root)
        else {
            continue;
        };
        if section_locale != locale {
            continue;
        }
        if found {
            return Err(CodegenError::DuplicateLocale {
                table: "strings",
                locale: locale.to_string(),
            });
        }
        found = true;
        for &entry in entries {
            let Node::StringEntry { key, value } = ast.node(entry) else {
                return Err(CodegenError::Internal(format!(
                    "non-entry node {:?} in a strings section",
                    entry
                )));
            };
            if artifact.strings().iter().any(|(k, _)| k == key) {
                return Err(CodegenError::DuplicateKey {
                    table: "strings",
                    key: *key,
                });
            }
            artifact.push_string(*key, value.clone());
        }
    }
    if !found {
        return Err(CodegenError::MissingLocale {
            table: "strings",
            locale: locale.to_string(),
        });
    }
    Ok(())
}

fn collect_rom(ast: &Ast, locale: &str, artifact: &mut CompiledArtifact) -> CodegenResult<()> {
    let mut found = false;
    for &root in ast.roots() {
        let Node::RomSection {
            locale: section_locale,
            entries,
        } = ast.node(root)
        else {
            continue;
        };
        if section_locale != locale {
            continue;
        }
        if found {
            return Err(CodegenError::DuplicateLocale {
                table: "rom",
                locale: locale.to_string(),
            });
        }
        found = true;
        for &entry in entries {
            let Node::RomEntry { key, value } = ast.node(entry) else {
                return Err(CodegenError::Internal(format!(
                    "non-entry node {:?} in a rom section",
                    entry
                )));
            };
            if artifact.rom().iter().any(|(k, _)| k == key) {
                return Err(CodegenError::DuplicateKey {
                    table: "rom",
                    key: *key,
                });
            }
            artifact.push_rom(*key, *value);
        }
    }
    if !found {
        return Err(CodegenError::MissingLocale {
            table: "rom",
            locale: locale.to_string(),
        });
    }
    Ok(())
}

// ── Code sections ────────────────────────────────────────────────────────

fn emit_code_sections(ast: &Ast, artifact: &mut CompiledArtifact) -> CodegenResult<()> {
    let mut has_main = false;
    for &root in ast.roots() {
        let Node::CodeSection {
            label,
            is_render,
            body,
        } = ast.node(root)
        else {
            continue;
        };
        if label == "main" {
            has_main = true;
        }
        // The section root renders as a container tagged 'root'.
        let renderer = emit_children(ast, body, artifact)?;
        let compiled = format!("container({},()=>{{{renderer}}},'root')", artifact.next_id());
        artifact.insert_section(label, *is_render, compiled);
    }
    if !has_main {
        return Err(CodegenError::MissingMain);
    }
    Ok(())
}

fn emit_children(
    ast: &Ast,
    children: &[NodeId],
    artifact: &mut CompiledArtifact,
) -> CodegenResult<String> {
    let calls = children
        .iter()
        .map(|&child| emit_node(ast, child, artifact))
        .collect::<CodegenResult<Vec<_>>>()?;
    Ok(calls.join(";"))
}

fn emit_node(ast: &Ast, id: NodeId, artifact: &mut CompiledArtifact) -> CodegenResult<String> {
    let call = match ast.node(id) {
        Node::Container { element, children } => {
            let renderer = emit_children(ast, children, artifact)?;
            let tag = match element {
                Some(element) => format!(",{}", ascii_repr(element)),
                None => String::new(),
            };
            format!("container({},()=>{{{renderer}}}{tag})", artifact.next_id())
        }
        Node::IfStatement { children } => {
            let if_true = emit_children(ast, children, artifact)?;
            format!("ifStatement({},()=>{{{if_true}}})", artifact.next_id())
        }
        Node::Elem(element) => {
            format!("elem({},{})", artifact.next_id(), ascii_repr(element))
        }
        Node::RawValue { value, inject_raw } => {
            // The ValueRef becomes an executable expression, not a literal.
            format!(
                "rawValue({},{},{value})",
                artifact.next_id(),
                if *inject_raw { "!0" } else { "!1" }
            )
        }
        Node::Call(label) => {
            format!("call({},{})", artifact.next_id(), ascii_repr(label))
        }
        Node::Render => format!("scheduleRender({})", artifact.next_id()),
        Node::AddEventListener { event, listener } => format!(
            "eventListen({},{},{})",
            artifact.next_id(),
            ascii_repr(event),
            ascii_repr(listener)
        ),
        Node::StackPush(value) => format!("stackPush({},{value})", artifact.next_id()),
        Node::StackCopy => format!("stackCopy({})", artifact.next_id()),
        Node::StackPop => format!("stackPop({})", artifact.next_id()),
        Node::StackSwap { off_a, off_b } => {
            format!("stackSwap({},{off_a},{off_b})", artifact.next_id())
        }
        Node::Compare => format!("compare({})", artifact.next_id()),
        Node::Read => format!("read({})", artifact.next_id()),
        Node::MathOp(op) => format!("calc({},{})", artifact.next_id(), ascii_repr(op.symbol())),
        node @ (Node::StringsSection { .. }
        | Node::StringEntry { .. }
        | Node::RomSection { .. }
        | Node::RomEntry { .. }
        | Node::CodeSection { .. }) => {
            return Err(CodegenError::Internal(format!(
                "node {node:?} is not valid inside a code section body"
            )));
        }
    };
    Ok(call)
}
