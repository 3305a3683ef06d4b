mod error;
mod expression;
mod node;
mod program;
mod statement;
mod symbol_table;
mod ty;

pub use self::error::SemanticError;
pub use self::expression::{
    BinaryExpression, BinaryOperator, Call, Identifier, Indice, Literal, Read, UnaryExpression,
    UnaryOperator, Value,
};
pub use self::node::{Node, NodeType, PreOrderIter};
pub use self::program::Program;
pub use self::statement::{Assignment, Control, ForLoop, IfElse, Procedure, WhileLoop, Write};
pub use self::symbol_table::{ProcDecl, ProcId, StorageMode, SymbolTable, VarDecl, VarId};
pub use self::ty::Type;
