//! 语法树
//!
//! A [`Node`] is either structural (ordered children) or a leaf carrying the
//! literal text of the token it was built from. Nodes are built bottom-up by
//! the parser and never mutated afterwards.

use std::fmt::{self, Write};

/// Production names used as node labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Prog,
    Main,
    Class,
    Params,
    Commands,
    If,
    While,
    Print,
    Assignment,
    Block,
    Number,
    Boolean,
    Identifier,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Prog => "PROG",
            Label::Main => "MAIN",
            Label::Class => "CLASS",
            Label::Params => "PARAMS",
            Label::Commands => "COMMANDS",
            Label::If => "IF",
            Label::While => "WHILE",
            Label::Print => "PRINT",
            Label::Assignment => "ASSIGNMENT",
            Label::Block => "BLOCK",
            Label::Number => "NUMBER",
            Label::Boolean => "BOOLEAN",
            Label::Identifier => "IDENTIFIER",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Internal { label: Label, children: Vec<Node> },
    Leaf { label: Label, text: String },
}

impl Node {
    pub fn internal(label: Label, children: Vec<Node>) -> Self {
        Node::Internal { label, children }
    }

    pub fn leaf(label: Label, text: impl Into<String>) -> Self {
        Node::Leaf {
            label,
            text: text.into(),
        }
    }

    pub fn label(&self) -> Label {
        match self {
            Node::Internal { label, .. } | Node::Leaf { label, .. } => *label,
        }
    }

    /// Children of a structural node; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Internal { children, .. } => children,
            Node::Leaf { .. } => &[],
        }
    }

    /// Literal payload of a leaf.
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Internal { .. } => None,
            Node::Leaf { text, .. } => Some(text),
        }
    }

    /// Indented text rendering, two spaces per level.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // 写入 String 不会失败
        let _ = self.write_indented(&mut out, 0);
        out
    }

    fn write_indented(&self, out: &mut impl Write, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Node::Internal { label, children } => {
                writeln!(out, "{indent}{label}:")?;
                for child in children {
                    child.write_indented(out, depth + 1)?;
                }
                Ok(())
            }
            Node::Leaf { label, text } => writeln!(out, "{indent}{label}: {text}"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
