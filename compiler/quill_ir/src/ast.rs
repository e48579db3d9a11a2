//! Typed abstract syntax tree handed to the back end.
//!
//! The tree is produced (and type-checked) upstream and is never mutated
//! here. Nodes own their children directly; every node carries a [`Span`].
//!
//! The constructor helpers on [`Node`] build nodes with [`Span::DUMMY`];
//! chain [`Node::with_span`] when a location matters.

use crate::{Span, Type};

/// One AST node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Whole program: function definitions in source order.
    Root { items: Vec<Node> },
    Function(Function),
    Block { statements: Vec<Node> },
    /// `name = value`. `ty` is the statically known type, `Unknown` on a
    /// re-assignment the front end did not annotate.
    Assignment {
        name: String,
        value: Box<Node>,
        ty: Type,
    },
    /// Arithmetic on two operands. `operator` is the source token.
    BinaryOperator {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    Return { value: Option<Box<Node>> },
    Call { callee: String, args: Vec<Node> },
    If {
        condition: Box<Node>,
        then_body: Box<Node>,
        else_body: Option<Box<Node>>,
    },
    Boolean(bool),
    Number(i32),
    String(StringLiteral),
    VariableReference { name: String, ty: Type },
    EqualsComparison { left: Box<Node>, right: Box<Node> },
}

impl NodeKind {
    /// Short name of the node kind, for diagnostics and tracing.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root { .. } => "root",
            NodeKind::Function(_) => "function",
            NodeKind::Block { .. } => "block",
            NodeKind::Assignment { .. } => "assignment",
            NodeKind::BinaryOperator { .. } => "binary operator",
            NodeKind::Return { .. } => "return",
            NodeKind::Call { .. } => "call",
            NodeKind::If { .. } => "if",
            NodeKind::Boolean(_) => "boolean literal",
            NodeKind::Number(_) => "number literal",
            NodeKind::String(_) => "string literal",
            NodeKind::VariableReference { .. } => "variable reference",
            NodeKind::EqualsComparison { .. } => "equality comparison",
        }
    }
}

/// A function definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub body: Box<Node>,
    /// Declared in source but implemented by the back end itself.
    pub intrinsic: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: name.into(),
            ty,
            span: Span::DUMMY,
        }
    }
}

/// A string literal, possibly split into interpolated segments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StringLiteral {
    pub segments: Vec<StringSegment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringSegment {
    Text(String),
    /// `{name}` inside the literal.
    Reference(String),
    /// `{expr}` inside the literal, for anything other than a bare name.
    Expression(Box<Node>),
}

impl StringLiteral {
    /// A literal consisting of a single text segment.
    pub fn flat(text: impl Into<String>) -> Self {
        StringLiteral {
            segments: vec![StringSegment::Text(text.into())],
        }
    }

    /// The literal's text when every segment is plain text, concatenated.
    ///
    /// Returns `None` for a literal with at least one interpolated segment.
    pub fn flat_text(&self) -> Option<String> {
        let mut text = String::new();
        for segment in &self.segments {
            match segment {
                StringSegment::Text(t) => text.push_str(t),
                StringSegment::Reference(_) | StringSegment::Expression(_) => return None,
            }
        }
        Some(text)
    }
}

impl Node {
    #[inline]
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn dummy(kind: NodeKind) -> Self {
        Node::new(kind, Span::DUMMY)
    }

    pub fn root(items: Vec<Node>) -> Self {
        Node::dummy(NodeKind::Root { items })
    }

    pub fn function(
        name: impl Into<String>,
        params: Vec<Param>,
        return_type: Type,
        body: Vec<Node>,
    ) -> Self {
        Node::dummy(NodeKind::Function(Function {
            name: name.into(),
            params,
            return_type,
            body: Box::new(Node::block(body)),
            intrinsic: false,
        }))
    }

    /// Declaration of a function whose body the back end supplies.
    pub fn intrinsic(name: impl Into<String>, params: Vec<Param>, return_type: Type) -> Self {
        Node::dummy(NodeKind::Function(Function {
            name: name.into(),
            params,
            return_type,
            body: Box::new(Node::block(Vec::new())),
            intrinsic: true,
        }))
    }

    pub fn block(statements: Vec<Node>) -> Self {
        Node::dummy(NodeKind::Block { statements })
    }

    pub fn assign(name: impl Into<String>, ty: Type, value: Node) -> Self {
        Node::dummy(NodeKind::Assignment {
            name: name.into(),
            value: Box::new(value),
            ty,
        })
    }

    pub fn binary(operator: impl Into<String>, left: Node, right: Node) -> Self {
        Node::dummy(NodeKind::BinaryOperator {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn ret(value: Node) -> Self {
        Node::dummy(NodeKind::Return {
            value: Some(Box::new(value)),
        })
    }

    pub fn ret_void() -> Self {
        Node::dummy(NodeKind::Return { value: None })
    }

    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Self {
        Node::dummy(NodeKind::Call {
            callee: callee.into(),
            args,
        })
    }

    pub fn if_(condition: Node, then_body: Vec<Node>, else_body: Option<Vec<Node>>) -> Self {
        Node::dummy(NodeKind::If {
            condition: Box::new(condition),
            then_body: Box::new(Node::block(then_body)),
            else_body: else_body.map(|stmts| Box::new(Node::block(stmts))),
        })
    }

    pub fn boolean(value: bool) -> Self {
        Node::dummy(NodeKind::Boolean(value))
    }

    pub fn number(value: i32) -> Self {
        Node::dummy(NodeKind::Number(value))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Node::dummy(NodeKind::String(StringLiteral::flat(text)))
    }

    pub fn segmented(segments: Vec<StringSegment>) -> Self {
        Node::dummy(NodeKind::String(StringLiteral { segments }))
    }

    /// Reference to a variable whose type the front end did not annotate.
    pub fn var(name: impl Into<String>) -> Self {
        Node::typed_var(name, Type::Unknown)
    }

    pub fn typed_var(name: impl Into<String>, ty: Type) -> Self {
        Node::dummy(NodeKind::VariableReference {
            name: name.into(),
            ty,
        })
    }

    pub fn equals(left: Node, right: Node) -> Self {
        Node::dummy(NodeKind::EqualsComparison {
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn flat_text_joins_text_segments() {
        let lit = StringLiteral {
            segments: vec![
                StringSegment::Text("ab".into()),
                StringSegment::Text("cd".into()),
            ],
        };
        assert_eq!(lit.flat_text().as_deref(), Some("abcd"));
    }

    #[test]
    fn flat_text_is_none_with_reference() {
        let lit = StringLiteral {
            segments: vec![
                StringSegment::Text("hi ".into()),
                StringSegment::Reference("name".into()),
            ],
        };
        assert_eq!(lit.flat_text(), None);
    }

    #[test]
    fn builders_use_dummy_span() {
        let node = Node::number(1);
        assert_eq!(node.span, Span::DUMMY);
        assert_eq!(node.with_span(Span::new(4, 5)).span, Span::new(4, 5));
    }

    #[test]
    fn if_without_else_has_no_else_body() {
        let node = Node::if_(Node::boolean(true), vec![], None);
        match node.kind {
            NodeKind::If { else_body, .. } => assert!(else_body.is_none()),
            other => panic!("expected if, got {}", other.name()),
        }
    }
}
