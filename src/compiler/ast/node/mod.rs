use std::fmt::Display;

mod iter;

pub use self::iter::PreOrderIter;

use super::{
    error::SemanticError,
    expression::{
        BinaryExpression, BinaryOperator, Call, Identifier, Indice, Literal, Read,
        UnaryExpression, UnaryOperator, Value,
    },
    statement::{Assignment, Control, ForLoop, IfElse, Procedure, WhileLoop, Write},
    ty::Type,
};

static NONE: Type = Type::None;

/**
A node of a validated Nice9 AST.  Every variant is built through a
constructor that checks the typing rules of the construct, so holding a
`Node` means holding a well typed tree.
 */
#[derive(Debug)]
pub enum Node {
    Sequence(Vec<Node>),
    Procedure(Procedure),
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Literal(Literal),
    Identifier(Identifier),
    Indice(Indice),
    Assignment(Assignment),
    Call(Call),
    ForLoop(ForLoop),
    WhileLoop(WhileLoop),
    IfElse(IfElse),
    Control(Control),
    Read(Read),
    Write(Write),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Sequence,
    Procedure,
    Binary,
    Unary,
    Literal,
    Identifier,
    Indice,
    Assignment,
    Call,
    ForLoop,
    WhileLoop,
    IfElse,
    Control,
    Read,
    Write,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Sequence => f.write_str("seq"),
            NodeType::Procedure => f.write_str("proc"),
            NodeType::Binary => f.write_str("binop"),
            NodeType::Unary => f.write_str("unop"),
            NodeType::Literal => f.write_str("literal"),
            NodeType::Identifier => f.write_str("id"),
            NodeType::Indice => f.write_str("indice"),
            NodeType::Assignment => f.write_str("assign"),
            NodeType::Call => f.write_str("call"),
            NodeType::ForLoop => f.write_str("for"),
            NodeType::WhileLoop => f.write_str("while"),
            NodeType::IfElse => f.write_str("if"),
            NodeType::Control => f.write_str("control"),
            NodeType::Read => f.write_str("read"),
            NodeType::Write => f.write_str("write"),
        }
    }
}

impl Node {
    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Result<Node, SemanticError> {
        BinaryExpression::new(op, left, right).map(Node::Binary)
    }

    pub fn unary(op: UnaryOperator, operand: Node) -> Result<Node, SemanticError> {
        UnaryExpression::new(op, operand).map(Node::Unary)
    }

    pub fn index(base: Node, index: Node) -> Result<Node, SemanticError> {
        Indice::new(base, index).map(Node::Indice)
    }

    pub fn assign(target: Node, value: Node) -> Result<Node, SemanticError> {
        Assignment::new(target, value).map(Node::Assignment)
    }

    pub fn write(newline: bool, exp: Node) -> Result<Node, SemanticError> {
        Write::new(newline, exp).map(Node::Write)
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Sequence(_) => NodeType::Sequence,
            Node::Procedure(_) => NodeType::Procedure,
            Node::Binary(_) => NodeType::Binary,
            Node::Unary(_) => NodeType::Unary,
            Node::Literal(_) => NodeType::Literal,
            Node::Identifier(_) => NodeType::Identifier,
            Node::Indice(_) => NodeType::Indice,
            Node::Assignment(_) => NodeType::Assignment,
            Node::Call(_) => NodeType::Call,
            Node::ForLoop(_) => NodeType::ForLoop,
            Node::WhileLoop(_) => NodeType::WhileLoop,
            Node::IfElse(_) => NodeType::IfElse,
            Node::Control(_) => NodeType::Control,
            Node::Read(_) => NodeType::Read,
            Node::Write(_) => NodeType::Write,
        }
    }

    /// The type of the value this node produces; statements produce `none`.
    pub fn ty(&self) -> &Type {
        match self {
            Node::Binary(b) => b.ty(),
            Node::Unary(u) => u.ty(),
            Node::Literal(l) => l.ty(),
            Node::Identifier(id) => id.ty(),
            Node::Indice(i) => i.ty(),
            Node::Call(c) => c.ty(),
            Node::Read(r) => r.ty(),
            Node::Sequence(_)
            | Node::Procedure(_)
            | Node::Assignment(_)
            | Node::ForLoop(_)
            | Node::WhileLoop(_)
            | Node::IfElse(_)
            | Node::Control(_)
            | Node::Write(_) => &NONE,
        }
    }

    /// Only variables and array elements have a memory address.
    pub fn is_addressable(&self) -> bool {
        matches!(self, Node::Identifier(_) | Node::Indice(_))
    }

    /// The direct children of this node in declaration order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Sequence(nodes) => nodes.iter().collect(),
            Node::Procedure(p) => vec![p.body()],
            Node::Binary(b) => vec![b.left(), b.right()],
            Node::Unary(u) => vec![u.operand()],
            Node::Indice(i) => vec![i.base(), i.index()],
            Node::Assignment(a) => vec![a.target(), a.value()],
            Node::Call(c) => c.args().iter().collect(),
            Node::ForLoop(f) => vec![f.counter(), f.from(), f.to(), f.body()],
            Node::WhileLoop(w) => vec![w.cond(), w.body()],
            Node::IfElse(ie) => {
                let mut children = vec![ie.cond(), ie.then()];
                if let Some(otherwise) = ie.otherwise() {
                    children.push(otherwise)
                }
                children
            }
            Node::Write(w) => vec![w.exp()],
            Node::Literal(_) | Node::Identifier(_) | Node::Control(_) | Node::Read(_) => vec![],
        }
    }

    pub fn iter_preorder(&self) -> PreOrderIter {
        PreOrderIter::new(self)
    }

    /// Applies `f` to this node and then to every descendant, parents before
    /// children and siblings in declaration order.
    pub fn walk<F: FnMut(&Node)>(&self, f: &mut F) {
        for n in self.iter_preorder() {
            f(n)
        }
    }

    fn indent(f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        f.write_fmt(format_args!("{:width$}", "", width = depth * 2))
    }

    fn fmt_tree(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        match self {
            Node::Sequence(nodes) => {
                f.write_str("(seq")?;
                for n in nodes {
                    f.write_str("\n")?;
                    Self::indent(f, depth + 1)?;
                    n.fmt_tree(f, depth + 1)?;
                }
                f.write_str(")")
            }
            Node::Procedure(p) => {
                f.write_fmt(format_args!("(proc {} ", p.name()))?;
                p.body().fmt_tree(f, depth)?;
                f.write_str(")")
            }
            Node::Binary(b) => {
                f.write_fmt(format_args!("({} ", b.op()))?;
                b.left().fmt_tree(f, depth)?;
                f.write_str(" ")?;
                b.right().fmt_tree(f, depth)?;
                f.write_str(")")
            }
            Node::Unary(u) => {
                f.write_fmt(format_args!("({} ", u.op()))?;
                u.operand().fmt_tree(f, depth)?;
                f.write_str(")")
            }
            Node::Literal(l) => match l.value() {
                Value::Int(i) => f.write_fmt(format_args!("(int {})", i)),
                Value::Bool(b) => f.write_fmt(format_args!("(bool {})", b)),
                Value::Str(s) => f.write_fmt(format_args!("(string \"{}\")", s)),
            },
            Node::Identifier(id) => f.write_fmt(format_args!("(id {})", id.name())),
            Node::Indice(i) => {
                f.write_str("([] ")?;
                i.base().fmt_tree(f, depth)?;
                f.write_str(" ")?;
                i.index().fmt_tree(f, depth)?;
                f.write_str(")")
            }
            Node::Assignment(a) => {
                f.write_str("(:= ")?;
                a.target().fmt_tree(f, depth)?;
                f.write_str(" ")?;
                a.value().fmt_tree(f, depth)?;
                f.write_str(")")
            }
            Node::Call(c) => {
                f.write_fmt(format_args!("(call {} (", c.name()))?;
                for (idx, arg) in c.args().iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    arg.fmt_tree(f, depth)?;
                }
                f.write_str("))")
            }
            Node::ForLoop(fl) => {
                f.write_str("(for ")?;
                fl.counter().fmt_tree(f, depth)?;
                f.write_str(" ")?;
                fl.from().fmt_tree(f, depth)?;
                f.write_str("..")?;
                fl.to().fmt_tree(f, depth)?;
                f.write_str("\n")?;
                Self::indent(f, depth + 1)?;
                fl.body().fmt_tree(f, depth + 1)?;
                f.write_str(")")
            }
            Node::WhileLoop(w) => {
                f.write_str("(while ")?;
                w.cond().fmt_tree(f, depth)?;
                f.write_str("\n")?;
                Self::indent(f, depth + 1)?;
                w.body().fmt_tree(f, depth + 1)?;
                f.write_str(")")
            }
            Node::IfElse(ie) => {
                f.write_str("(if ")?;
                ie.cond().fmt_tree(f, depth)?;
                f.write_str("\n")?;
                Self::indent(f, depth + 1)?;
                ie.then().fmt_tree(f, depth + 1)?;
                if let Some(otherwise) = ie.otherwise() {
                    f.write_str("\n")?;
                    Self::indent(f, depth + 1)?;
                    otherwise.fmt_tree(f, depth + 1)?;
                }
                f.write_str(")")
            }
            Node::Control(c) => f.write_fmt(format_args!("({})", c)),
            Node::Read(r) => f.write_fmt(format_args!("(read {})", r.ty())),
            Node::Write(w) => {
                f.write_str(if w.newline() { "(write " } else { "(writes " })?;
                w.exp().fmt_tree(f, depth)?;
                f.write_str(")")
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::symbol_table::{StorageMode, SymbolTable};

    #[test]
    fn statements_have_no_type() {
        let w = Node::write(true, Node::Literal(Literal::int(1))).unwrap();
        assert_eq!(*w.ty(), Type::None);
        assert_eq!(*Node::Sequence(vec![]).ty(), Type::None);
    }

    #[test]
    fn display_nested_sequence() {
        let mut symbols = SymbolTable::new();
        let x = symbols.add_var("x", Type::Int, StorageMode::Value);
        let x = || Node::Identifier(Identifier::new(&symbols, x));

        let assign = Node::assign(
            x(),
            Node::binary(
                BinaryOperator::Add,
                x(),
                Node::Literal(Literal::int(2)),
            )
            .unwrap(),
        )
        .unwrap();
        let tree = Node::Sequence(vec![
            assign,
            Node::WhileLoop(
                WhileLoop::new(
                    Node::Literal(Literal::bool(true)),
                    Node::Sequence(vec![Node::Control(Control::Break)]),
                )
                .unwrap(),
            ),
        ]);

        assert_eq!(
            tree.to_string(),
            "(seq\n  (:= (id x) (+ (id x) (int 2)))\n  (while (bool true)\n    (seq\n      (break))))"
        );
    }
}
