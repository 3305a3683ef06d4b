use super::{
    expression::{BinaryOperator, UnaryOperator},
    ty::Type,
};

/// Errors raised while building the AST.  A node whose operands violate the
/// typing rules of its operator or statement is never created.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticError {
    BinaryOperandMismatch(BinaryOperator, Type, Type),
    UnaryOperandMismatch(UnaryOperator, Type),
    WriteInvalidType(Type),
    ReadInvalidType(Type),
    AssignmentMismatch(Type, Type),
    AssignmentTargetNotAddressable,
    IndexTargetNotArray(Type),
    IndexTargetNotAddressable,
    IndexNotInteger(Type),
    ConditionNotBool(&'static str, Type),
    InvalidLoopCounter(String, Type),
    LoopBoundNotInteger(Type),
    ArgumentCountMismatch(String, usize, usize),
    ArgumentTypeMismatch(String, usize, Type, Type),
    ArgumentNotAddressable(String, usize),
    InvalidStringLiteral(String),
    ArrayReturnType(String, Type),
    ArrayArgumentByValue(String, String),
    MisplacedProcedure(String),
    ExpectedProcedure(String),
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SemanticError::*;
        match self {
            BinaryOperandMismatch(op, l, r) => f.write_fmt(format_args!(
                "incompatible types ({}, {}) in expression for '{}' operator",
                l, r, op
            )),
            UnaryOperandMismatch(op, ty) => f.write_fmt(format_args!(
                "invalid type ({}) in expression for unary '{}' operator",
                ty, op
            )),
            WriteInvalidType(ty) => f.write_fmt(format_args!(
                "invalid type ({}) in expression for write statement, expected int or string",
                ty
            )),
            ReadInvalidType(ty) => f.write_fmt(format_args!(
                "cannot read a value of type {}, expected int or bool",
                ty
            )),
            AssignmentMismatch(target, value) => f.write_fmt(format_args!(
                "incompatible types ({}, {}) in expression for ':=' operator",
                target, value
            )),
            AssignmentTargetNotAddressable => {
                f.write_str("target of an assignment must be a variable or an array element")
            }
            IndexTargetNotArray(ty) => {
                f.write_fmt(format_args!("cannot index into a value of type {}", ty))
            }
            IndexTargetNotAddressable => {
                f.write_str("only variables and array elements can be indexed")
            }
            IndexNotInteger(ty) => f.write_fmt(format_args!(
                "array index must be of type int but found {}",
                ty
            )),
            ConditionNotBool(stm, ty) => f.write_fmt(format_args!(
                "condition of {} statement must be of type bool but found {}",
                stm, ty
            )),
            InvalidLoopCounter(name, ty) => f.write_fmt(format_args!(
                "loop variable {} must be an int held by value but found {}",
                name, ty
            )),
            LoopBoundNotInteger(ty) => f.write_fmt(format_args!(
                "range of a for loop must be of type int but found {}",
                ty
            )),
            ArgumentCountMismatch(name, expected, got) => f.write_fmt(format_args!(
                "{} expects {} arguments but was given {}",
                name, expected, got
            )),
            ArgumentTypeMismatch(name, idx, expected, got) => f.write_fmt(format_args!(
                "argument {} of {} expects type {} but was given {}",
                idx, name, expected, got
            )),
            ArgumentNotAddressable(name, idx) => f.write_fmt(format_args!(
                "argument {} of {} is passed by reference and must be a variable or an array element",
                idx, name
            )),
            InvalidStringLiteral(s) => f.write_fmt(format_args!(
                "string literal {:?} must be ASCII without double quotes or line breaks",
                s
            )),
            ArrayReturnType(name, ty) => f.write_fmt(format_args!(
                "procedure {} cannot return a value of type {}",
                name, ty
            )),
            ArrayArgumentByValue(name, arg) => f.write_fmt(format_args!(
                "array argument {} of {} must be passed by reference",
                arg, name
            )),
            MisplacedProcedure(name) => f.write_fmt(format_args!(
                "procedure {} can only be declared at the top of a program",
                name
            )),
            ExpectedProcedure(found) => f.write_fmt(format_args!(
                "expected a procedure in the procedure list but found {}",
                found
            )),
        }
    }
}
