use super::Node;

/**
Performs a Pre Order traversal of an AST.  Every node is visited before its
children and children are visited in declaration order.  The layout of string
constants and loop variables depends on this order, so it must never change.

Using this iterator will transform the AST into an ordered list of nodes and
does not preserve the AST topology.
*/
pub struct PreOrderIter<'a> {
    out: Vec<&'a Node>,
}

impl<'a> PreOrderIter<'a> {
    /**
    Create a new Iterator which will perform a PreOrder DFS traversal of an AST
    starting at the given node as its root.
    */
    pub fn new(node: &'a Node) -> PreOrderIter<'a> {
        let mut stack = vec![node];
        let mut out = vec![];

        while let Some(n) = stack.pop() {
            out.push(n);
            for c in n.children().into_iter().rev() {
                stack.push(c);
            }
        }

        // `next` pops from the back
        out.reverse();

        PreOrderIter { out }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.out.pop()
    }
}

#[cfg(test)]
mod test_preorder {
    use super::*;
    use crate::compiler::ast::{
        expression::{BinaryOperator, Identifier, Literal},
        node::NodeType,
        statement::{ForLoop, IfElse},
        symbol_table::{StorageMode, SymbolTable},
        ty::Type,
    };

    #[test]
    fn single_node() {
        let lit = Node::Literal(Literal::int(1));
        let order: Vec<_> = lit.iter_preorder().map(|n| n.node_type()).collect();
        assert_eq!(order, vec![NodeType::Literal]);
    }

    #[test]
    fn parents_before_children_in_declaration_order() {
        let mut symbols = SymbolTable::new();
        let i = symbols.add_var("i", Type::Int, StorageMode::Value);

        let body = Node::Sequence(vec![
            Node::write(true, Node::Identifier(Identifier::new(&symbols, i))).unwrap(),
            Node::write(false, Node::Literal(Literal::string("a").unwrap())).unwrap(),
        ]);
        let for_loop = Node::ForLoop(
            ForLoop::new(
                &symbols,
                i,
                Node::Literal(Literal::int(1)),
                Node::binary(
                    BinaryOperator::Add,
                    Node::Literal(Literal::int(2)),
                    Node::Literal(Literal::int(3)),
                )
                .unwrap(),
                body,
            )
            .unwrap(),
        );
        let cond = Node::binary(
            BinaryOperator::Ls,
            Node::Literal(Literal::int(4)),
            Node::Literal(Literal::int(5)),
        )
        .unwrap();
        let root = Node::Sequence(vec![Node::IfElse(
            IfElse::new(
                cond,
                Node::Sequence(vec![for_loop]),
                Some(Node::Sequence(vec![])),
            )
            .unwrap(),
        )]);

        use NodeType as T;
        let expected = vec![
            T::Sequence,
            T::IfElse,
            T::Binary,
            T::Literal,
            T::Literal,
            T::Sequence,
            T::ForLoop,
            T::Identifier,
            T::Literal,
            T::Binary,
            T::Literal,
            T::Literal,
            T::Sequence,
            T::Write,
            T::Identifier,
            T::Write,
            T::Literal,
            T::Sequence,
        ];
        let order: Vec<_> = root.iter_preorder().map(|n| n.node_type()).collect();
        assert_eq!(order, expected);

        let mut ints = vec![];
        root.walk(&mut |n| {
            if let Node::Literal(l) = n {
                if let crate::compiler::ast::expression::Value::Int(i) = l.value() {
                    ints.push(*i)
                }
            }
        });
        assert_eq!(ints, vec![4, 5, 1, 2, 3]);
    }
}
