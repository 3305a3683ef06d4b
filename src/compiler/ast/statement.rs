use serde::{Deserialize, Serialize};

use super::{
    error::SemanticError,
    expression::Identifier,
    node::Node,
    symbol_table::{ProcId, StorageMode, SymbolTable, VarId},
};

#[derive(Debug)]
pub struct Assignment {
    target: Box<Node>,
    value: Box<Node>,
}

impl Assignment {
    /// Target and value must be the same scalar kind: whole arrays are never
    /// copied.
    pub fn new(target: Node, value: Node) -> Result<Self, SemanticError> {
        if !target.is_addressable() {
            return Err(SemanticError::AssignmentTargetNotAddressable);
        }

        if !target.ty().same_scalar_kind(value.ty()) {
            return Err(SemanticError::AssignmentMismatch(
                target.ty().clone(),
                value.ty().clone(),
            ));
        }

        Ok(Assignment {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn target(&self) -> &Node {
        &self.target
    }

    pub fn value(&self) -> &Node {
        &self.value
    }
}

/**
Counts `counter` from `from` up to and including `to`.  The upper bound is
evaluated once, before the first iteration.  The counter is scoped to the
loop and gets its own slot from the memory layout pass.
 */
#[derive(Debug)]
pub struct ForLoop {
    counter: Box<Node>,
    var: VarId,
    from: Box<Node>,
    to: Box<Node>,
    body: Box<Node>,
}

impl ForLoop {
    pub fn new(
        symbols: &SymbolTable,
        counter: VarId,
        from: Node,
        to: Node,
        body: Node,
    ) -> Result<Self, SemanticError> {
        let decl = symbols.var(counter);
        if !decl.ty.is_int() || decl.mode != StorageMode::Value {
            return Err(SemanticError::InvalidLoopCounter(
                decl.name.clone(),
                decl.ty.clone(),
            ));
        }

        for bound in [&from, &to] {
            if !bound.ty().is_int() {
                return Err(SemanticError::LoopBoundNotInteger(bound.ty().clone()));
            }
        }

        Ok(ForLoop {
            counter: Box::new(Node::Identifier(Identifier::new(symbols, counter))),
            var: counter,
            from: Box::new(from),
            to: Box::new(to),
            body: Box::new(body),
        })
    }

    /// The identifier node of the loop counter.
    pub fn counter(&self) -> &Node {
        &self.counter
    }

    pub fn var(&self) -> VarId {
        self.var
    }

    pub fn from(&self) -> &Node {
        &self.from
    }

    pub fn to(&self) -> &Node {
        &self.to
    }

    pub fn body(&self) -> &Node {
        &self.body
    }
}

#[derive(Debug)]
pub struct WhileLoop {
    cond: Box<Node>,
    body: Box<Node>,
}

impl WhileLoop {
    pub fn new(cond: Node, body: Node) -> Result<Self, SemanticError> {
        if !cond.ty().is_bool() {
            return Err(SemanticError::ConditionNotBool("while", cond.ty().clone()));
        }
        Ok(WhileLoop {
            cond: Box::new(cond),
            body: Box::new(body),
        })
    }

    pub fn cond(&self) -> &Node {
        &self.cond
    }

    pub fn body(&self) -> &Node {
        &self.body
    }
}

/// A conditional.  An `else if` chain is an `IfElse` whose `otherwise` branch
/// is another `IfElse`.
#[derive(Debug)]
pub struct IfElse {
    cond: Box<Node>,
    then: Box<Node>,
    otherwise: Option<Box<Node>>,
}

impl IfElse {
    pub fn new(cond: Node, then: Node, otherwise: Option<Node>) -> Result<Self, SemanticError> {
        if !cond.ty().is_bool() {
            return Err(SemanticError::ConditionNotBool("if", cond.ty().clone()));
        }
        Ok(IfElse {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: otherwise.map(Box::new),
        })
    }

    pub fn cond(&self) -> &Node {
        &self.cond
    }

    pub fn then(&self) -> &Node {
        &self.then
    }

    pub fn otherwise(&self) -> Option<&Node> {
        self.otherwise.as_deref()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Return,
    Break,
    Exit,
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Control::Return => f.write_str("return"),
            Control::Break => f.write_str("break"),
            Control::Exit => f.write_str("exit"),
        }
    }
}

#[derive(Debug)]
pub struct Write {
    newline: bool,
    exp: Box<Node>,
}

impl Write {
    /// `write` ends the output with a newline, `writes` does not.
    pub fn new(newline: bool, exp: Node) -> Result<Self, SemanticError> {
        if !(exp.ty().is_int() || exp.ty().is_string()) {
            return Err(SemanticError::WriteInvalidType(exp.ty().clone()));
        }
        Ok(Write {
            newline,
            exp: Box::new(exp),
        })
    }

    pub fn newline(&self) -> bool {
        self.newline
    }

    pub fn exp(&self) -> &Node {
        &self.exp
    }
}

/// The body of a procedure, along with the variables declared locally in it.
#[derive(Debug)]
pub struct Procedure {
    proc: ProcId,
    name: String,
    locals: Vec<VarId>,
    body: Box<Node>,
}

impl Procedure {
    pub fn new(symbols: &SymbolTable, proc: ProcId, locals: Vec<VarId>, body: Node) -> Procedure {
        Procedure {
            proc,
            name: symbols.proc(proc).name.clone(),
            locals,
            body: Box::new(body),
        }
    }

    pub fn proc(&self) -> ProcId {
        self.proc
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locals(&self) -> &[VarId] {
        &self.locals
    }

    pub fn body(&self) -> &Node {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::{
        expression::{Indice, Literal},
        ty::Type,
    };

    fn var(symbols: &mut SymbolTable, name: &str, ty: Type) -> Node {
        let id = symbols.add_var(name, ty, StorageMode::Value);
        Node::Identifier(Identifier::new(symbols, id))
    }

    #[test]
    fn assignment_requires_same_scalar_kind() {
        let mut symbols = SymbolTable::new();
        for (ty, value) in [
            (Type::Int, Node::Literal(Literal::int(3))),
            (Type::Bool, Node::Literal(Literal::bool(false))),
            (Type::Str, Node::Literal(Literal::string("s").unwrap())),
        ] {
            let target = var(&mut symbols, "x", ty);
            assert!(Assignment::new(target, value).is_ok());
        }

        let target = var(&mut symbols, "x", Type::Int);
        assert_eq!(
            Assignment::new(target, Node::Literal(Literal::bool(true))).unwrap_err(),
            SemanticError::AssignmentMismatch(Type::Int, Type::Bool)
        );
    }

    #[test]
    fn whole_arrays_cannot_be_assigned() {
        let mut symbols = SymbolTable::new();
        let a = var(&mut symbols, "a", Type::array(Type::Int, 2));
        let b = var(&mut symbols, "b", Type::array(Type::Int, 2));
        assert!(matches!(
            Assignment::new(a, b),
            Err(SemanticError::AssignmentMismatch(..))
        ));
    }

    #[test]
    fn assignment_to_element() {
        let mut symbols = SymbolTable::new();
        let a = var(&mut symbols, "a", Type::array(Type::Int, 2));
        let elem = Node::Indice(Indice::new(a, Node::Literal(Literal::int(0))).unwrap());
        assert!(Assignment::new(elem, Node::Literal(Literal::int(1))).is_ok());
    }

    #[test]
    fn assignment_to_constant() {
        assert_eq!(
            Assignment::new(Node::Literal(Literal::int(1)), Node::Literal(Literal::int(1)))
                .unwrap_err(),
            SemanticError::AssignmentTargetNotAddressable
        );
    }

    #[test]
    fn write_requires_int_or_string() {
        assert!(Write::new(true, Node::Literal(Literal::int(1))).is_ok());
        assert!(Write::new(false, Node::Literal(Literal::string("x").unwrap())).is_ok());
        assert_eq!(
            Write::new(true, Node::Literal(Literal::bool(true))).unwrap_err(),
            SemanticError::WriteInvalidType(Type::Bool)
        );
    }

    #[test]
    fn conditions_must_be_bool() {
        let one = || Node::Literal(Literal::int(1));
        assert_eq!(
            WhileLoop::new(one(), Node::Sequence(vec![])).unwrap_err(),
            SemanticError::ConditionNotBool("while", Type::Int)
        );
        assert_eq!(
            IfElse::new(one(), Node::Sequence(vec![]), None).unwrap_err(),
            SemanticError::ConditionNotBool("if", Type::Int)
        );
    }

    #[test]
    fn for_loop_counter_and_bounds() {
        let mut symbols = SymbolTable::new();
        let i = symbols.add_var("i", Type::Int, StorageMode::Value);
        let b = symbols.add_var("b", Type::Bool, StorageMode::Value);
        let one = || Node::Literal(Literal::int(1));

        assert!(ForLoop::new(&symbols, i, one(), one(), Node::Sequence(vec![])).is_ok());
        assert_eq!(
            ForLoop::new(&symbols, b, one(), one(), Node::Sequence(vec![])).unwrap_err(),
            SemanticError::InvalidLoopCounter("b".into(), Type::Bool)
        );
        assert_eq!(
            ForLoop::new(
                &symbols,
                i,
                one(),
                Node::Literal(Literal::bool(true)),
                Node::Sequence(vec![])
            )
            .unwrap_err(),
            SemanticError::LoopBoundNotInteger(Type::Bool)
        );
    }
}
