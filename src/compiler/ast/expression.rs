use std::cell::OnceCell;

use serde::{Deserialize, Serialize};

use super::{
    error::SemanticError,
    node::Node,
    symbol_table::{ProcId, StorageMode, SymbolTable, VarId},
    ty::Type,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "%")]
    Mod,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NEq,
    #[serde(rename = "<")]
    Ls,
    #[serde(rename = "<=")]
    LsEq,
    #[serde(rename = ">")]
    Gr,
    #[serde(rename = ">=")]
    GrEq,
}

impl BinaryOperator {
    /// Returns `true` if both operands may be given to this operator.  `+`
    /// and `*` double as logical or/and when both operands are booleans.
    pub fn accepts(&self, l: &Type, r: &Type) -> bool {
        use BinaryOperator::*;
        let ints = l.is_int() && r.is_int();
        let bools = l.is_bool() && r.is_bool();
        match self {
            Sub | Div | Mod => ints,
            Add | Mul => ints || bools,
            Eq | NEq => ints || bools,
            Ls | LsEq | Gr | GrEq => ints,
        }
    }

    pub fn is_comparison(&self) -> bool {
        use BinaryOperator::*;
        matches!(self, Eq | NEq | Ls | LsEq | Gr | GrEq)
    }

    /// The type of the result when applied to operands of type `operand`.
    pub fn result_type(&self, operand: &Type) -> Type {
        use BinaryOperator::*;
        match self {
            Sub | Div | Mod => Type::Int,
            Add | Mul => operand.clone(),
            _ => Type::Bool,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use BinaryOperator::*;
        match self {
            Add => f.write_str("+"),
            Sub => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            Eq => f.write_str("="),
            NEq => f.write_str("!="),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    #[serde(rename = "-")]
    Negate,
    #[serde(rename = "?")]
    Not,
}

impl UnaryOperator {
    pub fn accepts(&self, operand: &Type) -> bool {
        match self {
            UnaryOperator::Negate => operand.is_int() || operand.is_bool(),
            UnaryOperator::Not => operand.is_bool(),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
            UnaryOperator::Not => f.write_str("?"),
        }
    }
}

#[derive(Debug)]
pub struct BinaryExpression {
    op: BinaryOperator,
    left: Box<Node>,
    right: Box<Node>,
    ty: Type,
}

impl BinaryExpression {
    pub fn new(op: BinaryOperator, left: Node, right: Node) -> Result<Self, SemanticError> {
        if !op.accepts(left.ty(), right.ty()) {
            return Err(SemanticError::BinaryOperandMismatch(
                op,
                left.ty().clone(),
                right.ty().clone(),
            ));
        }

        let ty = op.result_type(left.ty());
        Ok(BinaryExpression {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        })
    }

    pub fn op(&self) -> BinaryOperator {
        self.op
    }

    pub fn left(&self) -> &Node {
        &self.left
    }

    pub fn right(&self) -> &Node {
        &self.right
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Boolean `+` and `*` only evaluate their right operand when the left
    /// operand does not already decide the result.
    pub fn short_circuits(&self) -> bool {
        matches!(self.op, BinaryOperator::Add | BinaryOperator::Mul) && self.left.ty().is_bool()
    }
}

#[derive(Debug)]
pub struct UnaryExpression {
    op: UnaryOperator,
    operand: Box<Node>,
}

impl UnaryExpression {
    pub fn new(op: UnaryOperator, operand: Node) -> Result<Self, SemanticError> {
        if !op.accepts(operand.ty()) {
            return Err(SemanticError::UnaryOperandMismatch(op, operand.ty().clone()));
        }
        Ok(UnaryExpression {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn op(&self) -> UnaryOperator {
        self.op
    }

    pub fn operand(&self) -> &Node {
        &self.operand
    }

    pub fn ty(&self) -> &Type {
        self.operand.ty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Str(String),
}

/**
A constant.  String literals live in the static data area and so carry the
address that the string pool assigns them before code generation starts.
 */
#[derive(Debug)]
pub struct Literal {
    value: Value,
    ty: Type,
    address: OnceCell<i32>,
}

impl Literal {
    pub fn int(i: i32) -> Literal {
        Literal {
            value: Value::Int(i),
            ty: Type::Int,
            address: OnceCell::new(),
        }
    }

    pub fn bool(b: bool) -> Literal {
        Literal {
            value: Value::Bool(b),
            ty: Type::Bool,
            address: OnceCell::new(),
        }
    }

    /// The listing declares strings between double quotes, one per line, so a
    /// string holding either a quote or a line break cannot be represented.
    /// The data area stores one character per word and `.DATA` counts them,
    /// so the string must also be ASCII for its length to be its byte count.
    pub fn string(s: &str) -> Result<Literal, SemanticError> {
        if s.chars().any(|c| !c.is_ascii() || c == '"' || c == '\n' || c == '\r') {
            return Err(SemanticError::InvalidStringLiteral(s.into()));
        }
        Ok(Literal {
            value: Value::Str(s.into()),
            ty: Type::Str,
            address: OnceCell::new(),
        })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Address of the string's length word, once it has been assigned.
    pub fn address(&self) -> Option<i32> {
        self.address.get().copied()
    }

    /// Assigns the data address of a string literal.  Returns `false` if the
    /// address had already been assigned, in which case it is left unchanged.
    pub fn set_address(&self, addr: i32) -> bool {
        self.address.set(addr).is_ok()
    }
}

#[derive(Debug)]
pub struct Identifier {
    var: VarId,
    name: String,
    ty: Type,
    mode: StorageMode,
}

impl Identifier {
    pub fn new(symbols: &SymbolTable, var: VarId) -> Identifier {
        let decl = symbols.var(var);
        Identifier {
            var,
            name: decl.name.clone(),
            ty: decl.ty.clone(),
            mode: decl.mode,
        }
    }

    pub fn var(&self) -> VarId {
        self.var
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }
}

/**
Indexes one dimension of an array.  `a[i][j]` is an `Indice` over `j` whose
base is the `Indice` over `i`, whose base in turn is the identifier `a`.
 */
#[derive(Debug)]
pub struct Indice {
    base: Box<Node>,
    index: Box<Node>,
    len: usize,
    ty: Type,
}

impl Indice {
    pub fn new(base: Node, index: Node) -> Result<Self, SemanticError> {
        if !base.is_addressable() {
            return Err(SemanticError::IndexTargetNotAddressable);
        }

        let (elem, len) = match base.ty() {
            Type::Array(elem, len) => (elem.as_ref().clone(), *len),
            ty => return Err(SemanticError::IndexTargetNotArray(ty.clone())),
        };

        if !index.ty().is_int() {
            return Err(SemanticError::IndexNotInteger(index.ty().clone()));
        }

        Ok(Indice {
            base: Box::new(base),
            index: Box::new(index),
            len,
            ty: elem,
        })
    }

    pub fn base(&self) -> &Node {
        &self.base
    }

    pub fn index(&self) -> &Node {
        &self.index
    }

    /// Number of elements in the dimension being indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Type of one element of the dimension being indexed.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// The identifier at the root of a chain of indices.
    pub fn root(&self) -> &Identifier {
        let mut base = self.base();
        loop {
            match base {
                Node::Indice(inner) => base = inner.base(),
                Node::Identifier(id) => return id,
                _ => unreachable!("indices are only built over addressable nodes"),
            }
        }
    }
}

#[derive(Debug)]
pub struct Call {
    proc: ProcId,
    name: String,
    args: Vec<Node>,
    modes: Vec<StorageMode>,
    ty: Type,
}

impl Call {
    /**
    Creates a call to `proc`.  Each argument must have exactly the type of its
    parameter and an argument given to a by-reference parameter must be
    something that has an address.
     */
    pub fn new(symbols: &SymbolTable, proc: ProcId, args: Vec<Node>) -> Result<Self, SemanticError> {
        let decl = symbols.proc(proc);
        if decl.args.len() != args.len() {
            return Err(SemanticError::ArgumentCountMismatch(
                decl.name.clone(),
                decl.args.len(),
                args.len(),
            ));
        }

        let mut modes = vec![];
        for (idx, (param, arg)) in decl.args.iter().zip(args.iter()).enumerate() {
            let param = symbols.var(*param);
            if param.ty != *arg.ty() {
                return Err(SemanticError::ArgumentTypeMismatch(
                    decl.name.clone(),
                    idx,
                    param.ty.clone(),
                    arg.ty().clone(),
                ));
            }
            if param.is_reference() && !arg.is_addressable() {
                return Err(SemanticError::ArgumentNotAddressable(decl.name.clone(), idx));
            }
            modes.push(param.mode);
        }

        let ty = decl
            .ret
            .map_or(Type::None, |ret| symbols.var(ret).ty.clone());

        Ok(Call {
            proc,
            name: decl.name.clone(),
            args,
            modes,
            ty,
        })
    }

    pub fn proc(&self) -> ProcId {
        self.proc
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Node] {
        &self.args
    }

    /// Each argument paired with the storage mode of the parameter it binds to.
    pub fn bindings(&self) -> impl Iterator<Item = (&Node, StorageMode)> {
        self.args.iter().zip(self.modes.iter().copied())
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

#[derive(Debug)]
pub struct Read {
    ty: Type,
}

impl Read {
    pub fn new(ty: Type) -> Result<Self, SemanticError> {
        if !(ty.is_int() || ty.is_bool()) {
            return Err(SemanticError::ReadInvalidType(ty));
        }
        Ok(Read { ty })
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}
