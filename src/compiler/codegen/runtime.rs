use log::debug;

use crate::{
    compiler::{
        error::CompilerError,
        tm::{Inst, Opcode, Reg},
    },
    tm,
};

use super::Compiler;

impl<'a> Compiler<'a> {
    /// The shared handler every bounds check jumps to: prints the fault
    /// message and halts.
    pub(super) fn bounds_fault_handler(&mut self) -> Result<(), CompilerError> {
        let msg = Self::word(self.fault_message)?;
        self.fault_handler = Some(self.code.next_line());

        tm!((self.code) {
            ; "BEGIN array index out of bounds handler"
            LDA %ac, {msg}(%zero) => "load fault message";
        });
        self.call_print_string()?;
        tm!((self.code) {
            OUTNL;
            HALT => "abort";
            ; "END array index out of bounds handler"
        });
        Ok(())
    }

    /**
    Prints the string whose address is in the accumulator.  The caller pushes
    its return address; the routine walks the characters following the
    length word, then pops the return address and jumps to it.
     */
    pub(super) fn print_string_routine(&mut self) -> Result<(), CompilerError> {
        let entry = self.code.next_line();
        self.print_string = Some(entry);

        let len = self.registers.checkout()?;
        let ch = self.registers.checkout()?;
        tm!((self.code) {
            ; "BEGIN print_string"
            LD %{len}, 0(%ac) => "load length";
            LDA %ac, 1(%ac) => "first character";
        });
        let top = self.code.next_line();
        let done = self.code.reserve("end of string");
        tm!((self.code) {
            LD %{ch}, 0(%ac);
            OUTC %{ch};
            LDA %ac, 1(%ac) => "next character";
            LDA %{len}, -1(%{len});
        });
        self.jump_back(top, "loop over characters")?;
        let end = self.code.next_line();
        self.resolve_jump(done, Opcode::Jeq, len, end, "no characters left")?;
        tm!((self.code) {
            LDA %sp, 1(%sp);
            LD %pc, 0(%sp) => "return";
            ; "END print_string"
        });
        self.registers.release(ch)?;
        self.registers.release(len)?;

        let entry_addr = Self::word(entry)?;
        for call in std::mem::take(&mut self.pending_prints) {
            debug!("L{}: call print_string at L{}", call.line(), entry);
            self.code.resolve(
                call,
                Inst::rm(Opcode::Ldc, Reg::Pc, entry_addr, Reg::Zero),
                "call print_string",
            );
        }
        Ok(())
    }

    /// Calls the string printing routine on the address in the accumulator.
    pub(super) fn call_print_string(&mut self) -> Result<(), CompilerError> {
        self.no_live_registers()?;

        let ret = self.registers.checkout()?;
        tm!((self.code) {
            LDA %{ret}, 3(%pc) => "return address";
            ST %{ret}, 0(%sp);
            LDA %sp, -1(%sp);
        });
        self.registers.release(ret)?;

        match self.print_string {
            Some(entry) => {
                let entry = Self::word(entry)?;
                tm!((self.code) {LDC %pc, {entry}(%zero) => "call print_string";});
            }
            None => {
                let call = self.code.reserve("call print_string");
                self.pending_prints.push(call);
            }
        }
        Ok(())
    }
}
