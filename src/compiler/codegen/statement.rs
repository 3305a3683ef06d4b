use log::debug;

use crate::{
    compiler::{
        ast::{Assignment, Control, ForLoop, IfElse, WhileLoop, Write},
        error::CompilerError,
        tm::{Opcode, Reg},
    },
    tm,
};

use super::Compiler;

impl<'a> Compiler<'a> {
    pub(super) fn assignment(&mut self, a: &Assignment) -> Result<(), CompilerError> {
        self.traverse(a.value())?;
        self.push_ac("value");
        self.address_of(a.target())?;

        let r = self.registers.checkout()?;
        self.pop(r, "value");
        tm!((self.code) {ST %{r}, 0(%ac) => "assign";});
        self.registers.release(r)
    }

    pub(super) fn if_else(&mut self, ie: &IfElse) -> Result<(), CompilerError> {
        self.traverse(ie.cond())?;
        let to_else = self.code.reserve("if: skip then");
        self.traverse(ie.then())?;

        match ie.otherwise() {
            Some(otherwise) => {
                let to_end = self.code.reserve("if: skip else");
                let else_line = self.code.next_line();
                self.resolve_jump(to_else, Opcode::Jeq, Reg::Ac, else_line, "if: condition false")?;
                self.traverse(otherwise)?;
                let end = self.code.next_line();
                self.resolve_jump(to_end, Opcode::Jeq, Reg::Zero, end, "if: skip else")
            }
            None => {
                let end = self.code.next_line();
                self.resolve_jump(to_else, Opcode::Jeq, Reg::Ac, end, "if: condition false")
            }
        }
    }

    pub(super) fn while_loop(&mut self, w: &WhileLoop) -> Result<(), CompilerError> {
        let start = self.code.next_line();
        self.traverse(w.cond())?;
        let exit = self.code.reserve("while: exit");

        self.breaks.push(vec![]);
        self.traverse(w.body())?;
        self.jump_back(start, "while: repeat")?;

        let end = self.code.next_line();
        self.resolve_jump(exit, Opcode::Jeq, Reg::Ac, end, "while: condition false")?;
        self.resolve_breaks(end)
    }

    /**
    The counter is assigned the lower bound and the upper bound is evaluated
    once and kept on the stack for the duration of the loop.  The body runs
    while the counter does not exceed the upper bound.
     */
    pub(super) fn for_loop(&mut self, f: &ForLoop) -> Result<(), CompilerError> {
        let slot = self.slot(f.var())?;
        let base = Self::base(&slot);
        let off = slot.offset;

        self.traverse(f.from())?;
        tm!((self.code) {ST %ac, {off}(%{base}) => "for: initialize counter";});
        self.traverse(f.to())?;
        self.push_ac("upper bound");

        let start = self.code.next_line();
        let r = self.registers.checkout()?;
        tm!((self.code) {
            LD %{r}, 1(%sp) => "for: upper bound";
            LD %ac, {off}(%{base}) => "for: counter";
            SUB %ac, %{r}, %ac;
        });
        self.registers.release(r)?;
        let exit = self.code.reserve("for: exit");

        self.breaks.push(vec![]);
        self.traverse(f.body())?;
        tm!((self.code) {
            LD %ac, {off}(%{base});
            LDA %ac, 1(%ac);
            ST %ac, {off}(%{base}) => "for: increment counter";
        });
        self.jump_back(start, "for: repeat")?;

        let end = self.code.next_line();
        self.resolve_jump(exit, Opcode::Jlt, Reg::Ac, end, "for: counter past upper bound")?;
        self.resolve_breaks(end)?;
        tm!((self.code) {LDA %sp, 1(%sp) => "for: drop upper bound";});
        Ok(())
    }

    fn resolve_breaks(&mut self, end: usize) -> Result<(), CompilerError> {
        let breaks = self.breaks.pop().unwrap_or_default();
        debug!("{} break(s) to L{}", breaks.len(), end);
        for b in breaks {
            self.resolve_jump(b, Opcode::Jeq, Reg::Zero, end, "break")?;
        }
        Ok(())
    }

    /// Reserves the jump of a `return`, `break` or `exit`, to be resolved at
    /// the end of the enclosing procedure, loop or program.
    pub(super) fn control(&mut self, c: Control) -> Result<(), CompilerError> {
        match c {
            Control::Return if self.current.is_some() => {
                let ret = self.code.reserve("return");
                self.returns.push(ret);
            }
            Control::Return | Control::Exit => {
                let exit = self.code.reserve("exit");
                self.exits.push(exit);
            }
            Control::Break => match self.breaks.last_mut() {
                Some(breaks) => breaks.push(self.code.reserve("break")),
                None => return Err(CompilerError::BreakOutsideLoop),
            },
        }
        Ok(())
    }

    pub(super) fn write(&mut self, w: &Write) -> Result<(), CompilerError> {
        self.traverse(w.exp())?;
        if w.exp().ty().is_string() {
            self.call_print_string()?;
        } else {
            tm!((self.code) {OUT %ac => "write int";});
        }
        if w.newline() {
            tm!((self.code) {OUTNL;});
        }
        Ok(())
    }
}
