use crate::{
    compiler::{
        ast::{
            BinaryExpression, BinaryOperator, Identifier, Indice, Literal, Read, StorageMode,
            UnaryExpression, UnaryOperator, Value,
        },
        error::CompilerError,
        tm::{Inst, Opcode, Reg},
    },
    tm,
};

use super::Compiler;

impl<'a> Compiler<'a> {
    pub(super) fn binary(&mut self, b: &BinaryExpression) -> Result<(), CompilerError> {
        if b.short_circuits() {
            return self.short_circuit(b);
        }

        self.traverse(b.left())?;
        self.push_ac("left operand");
        self.traverse(b.right())?;

        let l = self.registers.checkout()?;
        self.pop(l, "left operand");
        match b.op() {
            BinaryOperator::Add => {
                tm!((self.code) {ADD %ac, %{l}, %ac;});
            }
            BinaryOperator::Sub => {
                tm!((self.code) {SUB %ac, %{l}, %ac;});
            }
            BinaryOperator::Mul => {
                tm!((self.code) {MUL %ac, %{l}, %ac;});
            }
            BinaryOperator::Div => {
                tm!((self.code) {DIV %ac, %{l}, %ac;});
            }
            BinaryOperator::Mod => {
                // l - (l / r) * r
                let r = self.registers.checkout()?;
                tm!((self.code) {
                    LDA %{r}, 0(%ac);
                    DIV %ac, %{l}, %{r};
                    MUL %ac, %ac, %{r};
                    SUB %ac, %{l}, %ac => "remainder";
                });
                self.registers.release(r)?;
            }
            BinaryOperator::Eq => self.comparison(l, Opcode::Jeq, b.op()),
            BinaryOperator::NEq => self.comparison(l, Opcode::Jne, b.op()),
            BinaryOperator::Ls => self.comparison(l, Opcode::Jlt, b.op()),
            BinaryOperator::LsEq => self.comparison(l, Opcode::Jle, b.op()),
            BinaryOperator::Gr => self.comparison(l, Opcode::Jgt, b.op()),
            BinaryOperator::GrEq => self.comparison(l, Opcode::Jge, b.op()),
        }
        self.registers.release(l)
    }

    /// Sets the accumulator to 1 if `l - ac` satisfies the condition of
    /// `jump`, to 0 otherwise.
    fn comparison(&mut self, l: Reg, jump: Opcode, op: BinaryOperator) {
        tm!((self.code) {SUB %ac, %{l}, %ac => format!("compare {}", op);});
        self.code.emit(Inst::rm(jump, Reg::Ac, 2, Reg::Pc), "");
        tm!((self.code) {
            LDC %ac, 0(%zero) => "false";
            JEQ %zero, 1(%pc);
            LDC %ac, 1(%zero) => "true";
        });
    }

    /// Boolean `+` skips its right operand when the left one is true and
    /// boolean `*` skips it when the left one is false.
    fn short_circuit(&mut self, b: &BinaryExpression) -> Result<(), CompilerError> {
        self.traverse(b.left())?;
        let skip = self.code.reserve("skip right operand");
        self.traverse(b.right())?;

        let end = self.code.next_line();
        match b.op() {
            BinaryOperator::Add => self.resolve_jump(skip, Opcode::Jne, Reg::Ac, end, "left is true"),
            _ => self.resolve_jump(skip, Opcode::Jeq, Reg::Ac, end, "left is false"),
        }
    }

    pub(super) fn unary(&mut self, u: &UnaryExpression) -> Result<(), CompilerError> {
        self.traverse(u.operand())?;

        let r = self.registers.checkout()?;
        match u.op() {
            UnaryOperator::Negate if u.ty().is_int() => {
                tm!((self.code) {
                    LDC %{r}, -1(%zero);
                    MUL %ac, %ac, %{r} => "negate";
                });
            }
            UnaryOperator::Negate | UnaryOperator::Not => {
                tm!((self.code) {
                    LDC %{r}, 1(%zero);
                    SUB %ac, %{r}, %ac => "not";
                });
            }
        }
        self.registers.release(r)
    }

    pub(super) fn literal(&mut self, l: &Literal) -> Result<(), CompilerError> {
        match l.value() {
            Value::Int(i) => {
                tm!((self.code) {LDC %ac, {*i}(%zero);});
            }
            Value::Bool(b) => {
                tm!((self.code) {LDC %ac, {*b as i32}(%zero) => b.to_string();});
            }
            Value::Str(s) => {
                let addr = l
                    .address()
                    .ok_or(CompilerError::MissingRuntime("string pool"))?;
                tm!((self.code) {LDA %ac, {addr}(%zero) => format!("\"{}\"", s);});
            }
        }
        Ok(())
    }

    /// An array variable evaluates to the address of its data, any other
    /// variable to the value it holds.
    pub(super) fn identifier(&mut self, id: &Identifier) -> Result<(), CompilerError> {
        if id.ty().is_array() {
            return self.identifier_address(id);
        }

        let slot = self.slot(id.var())?;
        let base = Self::base(&slot);
        let off = slot.offset;
        match id.mode() {
            StorageMode::Reference => {
                tm!((self.code) {
                    LD %ac, {off}(%{base}) => format!("address held by {}", id.name());
                    LD %ac, 0(%ac) => format!("load {}", id.name());
                });
            }
            StorageMode::Value => {
                tm!((self.code) {LD %ac, {off}(%{base}) => format!("load {}", id.name());});
            }
        }
        Ok(())
    }

    /// An element of scalar type evaluates to its value, a row of a
    /// multi-dimensional array to its address.
    pub(super) fn indice(&mut self, i: &Indice) -> Result<(), CompilerError> {
        self.indice_address(i)?;
        if i.ty().is_scalar() {
            tm!((self.code) {LD %ac, 0(%ac) => "load element";});
        }
        Ok(())
    }

    pub(super) fn read(&mut self, r: &Read) -> Result<(), CompilerError> {
        if r.ty().is_bool() {
            tm!((self.code) {INB %ac => "read bool";});
        } else {
            tm!((self.code) {IN %ac => "read int";});
        }
        Ok(())
    }
}
