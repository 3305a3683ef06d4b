use log::debug;

use crate::{
    compiler::{
        ast::{Call, Procedure, StorageMode},
        error::CompilerError,
        tm::{Inst, Opcode, Reg},
    },
    tm,
};

use super::Compiler;

/**
Calling convention

The caller pushes the return address and its frame pointer, the frame
pointer is moved to the word below them and the stack pointer to the bottom
of the callee's activation record:

```text
      | return address  | <- stack pointer of the caller
      | caller's fp     |
fp -> | saved sp        |
      | return value    |  -1
      | arguments       |
      | locals          |
      | loop variables  |
sp -> |                 |  -record size
```

Arguments are stored into the callee's frame before the linkage is pushed,
with the stack pointer moved below the frame so that evaluating an argument
can neither overwrite a stored argument nor the linkage words.
 */
impl<'a> Compiler<'a> {
    pub(super) fn procedure(&mut self, p: &Procedure) -> Result<(), CompilerError> {
        if self.entries.contains_key(&p.proc()) {
            return Err(CompilerError::ProcedureEmittedTwice(p.name().into()));
        }

        let frame = self.frame(p.proc())?;
        let record = Self::word(frame.record_size)?;
        let entry = self.code.next_line();
        debug!("Procedure {} at L{}: {} words", p.name(), entry, frame.record_size);
        self.entries.insert(p.proc(), entry);

        tm!((self.code) {
            ; {format!("BEGIN procedure {}", p.name())}
            ST %sp, 0(%fp) => "save stack pointer";
        });

        self.current = Some(p.proc());
        self.traverse(p.body())?;

        let epilogue = self.code.next_line();
        for ret in std::mem::take(&mut self.returns) {
            self.resolve_jump(ret, Opcode::Jeq, Reg::Zero, epilogue, "return")?;
        }
        tm!((self.code) {LD %sp, 0(%fp) => "restore stack pointer";});
        if self.symbols.proc(p.proc()).ret.is_some() {
            tm!((self.code) {LD %ac, -1(%fp) => "load return value";});
        }
        tm!((self.code) {
            LDA %sp, {record + 2}(%sp) => "pop activation record";
            LD %fp, -1(%sp) => "restore frame pointer";
            LD %pc, 0(%sp) => "return to caller";
            ; {format!("END procedure {}", p.name())}
        });
        self.current = None;

        let entry_addr = Self::word(entry)?;
        let (ready, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_calls)
            .into_iter()
            .partition(|(proc, _)| *proc == p.proc());
        self.pending_calls = pending;
        for (_, call) in ready {
            debug!("L{}: call {} at L{}", call.line(), p.name(), entry);
            self.code.resolve(
                call,
                Inst::rm(Opcode::Ldc, Reg::Pc, entry_addr, Reg::Zero),
                &format!("call {}", p.name()),
            );
        }
        Ok(())
    }

    /// Calls a procedure.  Its return value, if it has one, is left in the
    /// accumulator.
    pub(super) fn call(&mut self, c: &Call) -> Result<(), CompilerError> {
        self.no_live_registers()?;

        let frame = self.frame(c.proc())?;
        let record = Self::word(frame.record_size)?;
        let symbols = self.symbols;
        let params = &symbols.proc(c.proc()).args;

        if !c.args().is_empty() {
            tm!((self.code) {LDA %sp, {-(record + 2)}(%sp) => format!("reserve frame of {}", c.name());});
            for ((arg, mode), param) in c.bindings().zip(params.iter()) {
                match mode {
                    StorageMode::Reference => self.address_of(arg)?,
                    StorageMode::Value => self.traverse(arg)?,
                }
                let off = self.slot(*param)?.offset;
                let name = &symbols.var(*param).name;
                tm!((self.code) {ST %ac, {off + record}(%sp) => format!("argument {}", name);});
            }
            tm!((self.code) {LDA %sp, {record + 2}(%sp);});
        }

        tm!((self.code) {
            LDA %ac, 5(%pc) => "return address";
            ST %ac, 0(%sp);
            ST %fp, -1(%sp) => "save frame pointer";
            LDA %fp, -2(%sp);
            LDA %sp, {-record}(%fp) => "bottom of frame";
        });

        match self.entries.get(&c.proc()) {
            Some(entry) => {
                let entry = Self::word(*entry)?;
                tm!((self.code) {LDC %pc, {entry}(%zero) => format!("call {}", c.name());});
            }
            None => {
                let call = self.code.reserve("call");
                self.pending_calls.push((c.proc(), call));
            }
        }
        Ok(())
    }
}
