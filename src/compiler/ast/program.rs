use super::{error::SemanticError, node::Node, symbol_table::VarId};

/**
The root of a compilation unit: the global variables, the procedures and
the top level statements.  Procedures may only appear in the procedure list;
they are never nested in another procedure or in a statement.
 */
#[derive(Debug)]
pub struct Program {
    globals: Vec<VarId>,
    procedures: Node,
    body: Node,
}

impl Program {
    pub fn new(
        globals: Vec<VarId>,
        procedures: Vec<Node>,
        body: Vec<Node>,
    ) -> Result<Program, SemanticError> {
        for p in &procedures {
            match p {
                Node::Procedure(proc) => Self::no_procedures_in(proc.body())?,
                other => {
                    return Err(SemanticError::ExpectedProcedure(
                        other.node_type().to_string(),
                    ))
                }
            }
        }
        for stm in &body {
            Self::no_procedures_in(stm)?;
        }

        Ok(Program {
            globals,
            procedures: Node::Sequence(procedures),
            body: Node::Sequence(body),
        })
    }

    fn no_procedures_in(node: &Node) -> Result<(), SemanticError> {
        match node.iter_preorder().find(|n| matches!(n, Node::Procedure(_))) {
            Some(Node::Procedure(p)) => Err(SemanticError::MisplacedProcedure(p.name().into())),
            _ => Ok(()),
        }
    }

    pub fn globals(&self) -> &[VarId] {
        &self.globals
    }

    /// The sequence of procedure nodes.
    pub fn procedures(&self) -> &Node {
        &self.procedures
    }

    /// The sequence of top level statements.
    pub fn body(&self) -> &Node {
        &self.body
    }

    /// Walks the procedures and then the top level statements in pre order.
    pub fn walk<F: FnMut(&Node)>(&self, f: &mut F) {
        self.procedures.walk(f);
        self.body.walk(f);
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "(program\n  {}\n  {})",
            self.procedures, self.body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::{
        expression::Literal,
        statement::Procedure,
        symbol_table::SymbolTable,
    };

    fn proc_node(symbols: &mut SymbolTable, name: &str, body: Vec<Node>) -> Node {
        let p = symbols.add_proc(name, vec![], None).unwrap();
        Node::Procedure(Procedure::new(symbols, p, vec![], Node::Sequence(body)))
    }

    #[test]
    fn procedures_only_in_procedure_list() {
        let mut symbols = SymbolTable::new();
        let p = proc_node(&mut symbols, "p", vec![]);
        let q = proc_node(&mut symbols, "q", vec![]);
        assert!(Program::new(vec![], vec![p, q], vec![]).is_ok());

        let p = proc_node(&mut symbols, "p", vec![]);
        assert_eq!(
            Program::new(vec![], vec![], vec![p]).unwrap_err(),
            SemanticError::MisplacedProcedure("p".into())
        );

        let inner = proc_node(&mut symbols, "inner", vec![]);
        let outer = proc_node(&mut symbols, "outer", vec![inner]);
        assert_eq!(
            Program::new(vec![], vec![outer], vec![]).unwrap_err(),
            SemanticError::MisplacedProcedure("inner".into())
        );

        let stm = Node::write(true, Node::Literal(Literal::int(1))).unwrap();
        assert_eq!(
            Program::new(vec![], vec![stm], vec![]).unwrap_err(),
            SemanticError::ExpectedProcedure("write".into())
        );
    }
}
