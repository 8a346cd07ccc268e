//! AST arena for weft programs.
//!
//! Nodes live in a single growable arena per compilation and refer to their
//! children by [`NodeId`] index. Children never move between parents, there
//! are no back-references and no cycles, so the tree stays trivially
//! inspectable in tests.

use crate::ValueRef;

/// Index of a node in the [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// The arena holding every node of one compilation, plus the ordered list
/// of root nodes (one per source section that produces AST content).
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the arena and return its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Mark a node as a root (a top-level section).
    pub fn add_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// The root node ids, in source order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The four stack-machine arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl MathOp {
    /// The operator symbol the runtime's `calc` call expects.
    /// Division is the flooring `//`.
    pub fn symbol(self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Sub => "-",
            MathOp::Mul => "*",
            MathOp::Div => "//",
        }
    }
}

/// One AST node. Matched exhaustively by the code generator, so adding an
/// instruction forces every consumer to be updated.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // ── Constant tables ──────────────────────────────────────

    /// A `.strings <locale>` section; children are `StringEntry` nodes.
    StringsSection { locale: String, entries: Vec<NodeId> },
    /// One translated string: derived key → verbatim text.
    StringEntry { key: i64, value: String },
    /// A `.rom <locale>` section; children are `RomEntry` nodes.
    RomSection { locale: String, entries: Vec<NodeId> },
    /// One numeric constant: derived key → value.
    RomEntry { key: i64, value: i64 },

    // ── Code ─────────────────────────────────────────────────

    /// A `.code <label>` or `.render <label>` section body.
    CodeSection {
        label: String,
        is_render: bool,
        body: Vec<NodeId>,
    },
    /// A nestable render container with an element tag.
    Container {
        element: Option<String>,
        children: Vec<NodeId>,
    },
    /// A childless element.
    Elem(String),
    /// Inject a resolved value: as text (`inject_raw == false`) or raw
    /// markup (`inject_raw == true`).
    RawValue { value: ValueRef, inject_raw: bool },
    /// Call another code section by label.
    Call(String),
    /// Schedule a re-render.
    Render,
    /// Register an event listener dispatching to a labeled section.
    AddEventListener { event: String, listener: String },

    // ── Stack machine ────────────────────────────────────────

    StackPush(ValueRef),
    StackCopy,
    StackPop,
    StackSwap { off_a: i64, off_b: i64 },
    Compare,
    Read,
    MathOp(MathOp),

    /// Conditionally executed block; children run only when the popped
    /// stack value equals 1.
    IfStatement { children: Vec<NodeId> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_indexing() {
        let mut ast = Ast::new();
        let a = ast.add(Node::Render);
        let b = ast.add(Node::Compare);
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(ast.node(a), &Node::Render);
        assert_eq!(ast.node(b), &Node::Compare);
        assert_eq!(ast.len(), 2);
    }

    #[test]
    fn test_roots_preserve_order() {
        let mut ast = Ast::new();
        let a = ast.add(Node::CodeSection {
            label: "main".into(),
            is_render: false,
            body: vec![],
        });
        let b = ast.add(Node::StringsSection {
            locale: "en".into(),
            entries: vec![],
        });
        ast.add_root(a);
        ast.add_root(b);
        assert_eq!(ast.roots(), &[a, b]);
    }

    #[test]
    fn test_children_by_index() {
        let mut ast = Ast::new();
        let leaf = ast.add(Node::Elem("img".into()));
        let cont = ast.add(Node::Container {
            element: Some("div".into()),
            children: vec![leaf],
        });
        match ast.node(cont) {
            Node::Container { children, .. } => {
                assert_eq!(ast.node(children[0]), &Node::Elem("img".into()));
            }
            other => panic!("expected container, got {other:?}"),
        }
    }

    #[test]
    fn test_math_op_symbols() {
        assert_eq!(MathOp::Add.symbol(), "+");
        assert_eq!(MathOp::Sub.symbol(), "-");
        assert_eq!(MathOp::Mul.symbol(), "*");
        assert_eq!(MathOp::Div.symbol(), "//");
    }
}
