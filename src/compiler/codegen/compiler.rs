use std::collections::HashMap;

use log::debug;

use crate::{
    compiler::{
        arch::registers::RegisterPool,
        ast::{Node, ProcId, Program, SymbolTable, VarId},
        error::CompilerError,
        memory::{Frame, MemoryLayout, StringPool, VarSlot},
        tm::{Assembly, Inst, Listing, Opcode, Reg, Reservation},
    },
    diagnostics::config::{Tracing, TracingConfig},
    tm,
};

/**
Generates the listing of one program.  A `Compiler` holds all the mutable
state of a single compilation: the listing, the scratch register pool, the
entry lines of the procedures emitted so far, and the jumps waiting for a
target.  It is consumed by [`Compiler::compile`].
 */
pub struct Compiler<'a> {
    pub(super) code: Listing,
    pub(super) symbols: &'a SymbolTable,
    pub(super) layout: &'a MemoryLayout,
    pub(super) registers: RegisterPool,

    /// Entry line of every procedure emitted so far.
    pub(super) entries: HashMap<ProcId, usize>,
    /// Calls to procedures that have not been emitted yet.
    pub(super) pending_calls: Vec<(ProcId, Reservation)>,
    /// Calls to the string printing routine made before it was emitted.
    pub(super) pending_prints: Vec<Reservation>,

    /// The procedure being generated, if any.
    pub(super) current: Option<ProcId>,
    pub(super) returns: Vec<Reservation>,
    pub(super) exits: Vec<Reservation>,
    /// One list of `break` jumps for each enclosing loop.
    pub(super) breaks: Vec<Vec<Reservation>>,

    pub(super) fault_handler: Option<usize>,
    pub(super) fault_message: usize,
    pub(super) print_string: Option<usize>,

    pub(super) tracing: TracingConfig,
}

impl<'a> Tracing for Compiler<'a> {
    fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }
}

impl<'a> Compiler<'a> {
    /// Compiles `program` into a complete Tiny Machine listing.
    pub fn compile(
        program: &Program,
        symbols: &SymbolTable,
        tracing: TracingConfig,
    ) -> Result<Assembly, CompilerError> {
        let mut code = Listing::new();
        let pool = StringPool::extract_from(program, &mut code)?;
        let layout = MemoryLayout::compute(program, symbols, pool.heap_end())?;
        debug!(
            "Static data ends at {}, bounds message at {}",
            layout.data_end(),
            pool.fault_message()
        );

        let mut compiler = Compiler::new(code, symbols, &layout, pool.fault_message());
        compiler.set_tracing(tracing);
        compiler.program(program)?;
        compiler.code.finish()
    }

    fn new(
        code: Listing,
        symbols: &'a SymbolTable,
        layout: &'a MemoryLayout,
        fault_message: usize,
    ) -> Compiler<'a> {
        Compiler {
            code,
            symbols,
            layout,
            registers: RegisterPool::new(),
            entries: HashMap::new(),
            pending_calls: vec![],
            pending_prints: vec![],
            current: None,
            returns: vec![],
            exits: vec![],
            breaks: vec![],
            fault_handler: None,
            fault_message,
            print_string: None,
            tracing: TracingConfig::Off,
        }
    }

    /**
    Lays out the whole program: the preamble, a jump over the runtime
    routines and the procedures, the runtime routines, the procedures, the
    top level statements and finally the epilogue that every `exit` (and every
    `return` outside of a procedure) jumps to.
     */
    fn program(&mut self, program: &Program) -> Result<(), CompilerError> {
        tm!((self.code) {
            ; "BEGIN preamble"
            LD %sp, 0(%zero) => "load top of memory";
        });
        let skip = self.code.reserve("jump to main");

        self.bounds_fault_handler()?;
        self.print_string_routine()?;
        self.traverse(program.procedures())?;

        let main = self.code.next_line();
        let d = Listing::displacement(skip.line(), main)?;
        self.code
            .resolve(skip, Inst::rm(Opcode::Lda, Reg::Pc, d, Reg::Pc), "jump to main");

        tm!((self.code) {; "BEGIN main"});
        self.traverse(program.body())?;

        let end = self.code.next_line();
        for exit in std::mem::take(&mut self.exits) {
            self.resolve_jump(exit, Opcode::Jeq, Reg::Zero, end, "exit")?;
        }
        tm!((self.code) {
            ; "END main"
            HALT;
        });

        if let Some((proc, _)) = self.pending_calls.first() {
            return Err(CompilerError::MissingFrame(self.symbols.proc(*proc).name.clone()));
        }
        Ok(())
    }

    /// Generates code for any node, leaving the value of an expression in the
    /// accumulator.
    pub(super) fn traverse(&mut self, node: &Node) -> Result<(), CompilerError> {
        trace!(self, node);
        match node {
            Node::Sequence(nodes) => {
                for n in nodes {
                    self.traverse(n)?;
                }
                Ok(())
            }
            Node::Procedure(p) => match self.current {
                None => self.procedure(p),
                Some(_) => Err(CompilerError::NestedProcedure(p.name().into())),
            },
            Node::Binary(b) => self.binary(b),
            Node::Unary(u) => self.unary(u),
            Node::Literal(l) => self.literal(l),
            Node::Identifier(id) => self.identifier(id),
            Node::Indice(i) => self.indice(i),
            Node::Assignment(a) => self.assignment(a),
            Node::Call(c) => self.call(c),
            Node::ForLoop(f) => self.for_loop(f),
            Node::WhileLoop(w) => self.while_loop(w),
            Node::IfElse(ie) => self.if_else(ie),
            Node::Control(c) => self.control(*c),
            Node::Read(r) => self.read(r),
            Node::Write(w) => self.write(w),
        }
    }

    pub(super) fn slot(&self, var: VarId) -> Result<VarSlot, CompilerError> {
        self.layout
            .slot(var)
            .copied()
            .ok_or_else(|| CompilerError::UnallocatedVariable(self.symbols.var(var).name.clone()))
    }

    pub(super) fn frame(&self, proc: ProcId) -> Result<Frame, CompilerError> {
        self.layout
            .frame(proc)
            .copied()
            .ok_or_else(|| CompilerError::MissingFrame(self.symbols.proc(proc).name.clone()))
    }

    /// The register an offset of `slot` is relative to.
    pub(super) fn base(slot: &VarSlot) -> Reg {
        if slot.global {
            Reg::Zero
        } else {
            Reg::Fp
        }
    }

    /// A size, length or address as an immediate operand.
    pub(super) fn word(n: usize) -> Result<i32, CompilerError> {
        Listing::address(n)
    }

    pub(super) fn push_ac(&mut self, what: &str) {
        tm!((self.code) {
            ST %ac, 0(%sp) => format!("push {}", what);
            LDA %sp, -1(%sp);
        });
    }

    pub(super) fn pop(&mut self, reg: Reg, what: &str) {
        tm!((self.code) {
            LDA %sp, 1(%sp);
            LD %{reg}, 0(%sp) => format!("pop {}", what);
        });
    }

    /// Fills `res` with a jump, relative to the program counter, to `target`.
    pub(super) fn resolve_jump(
        &mut self,
        res: Reservation,
        op: Opcode,
        reg: Reg,
        target: usize,
        comment: &str,
    ) -> Result<(), CompilerError> {
        let d = Listing::displacement(res.line(), target)?;
        self.code.resolve(res, Inst::rm(op, reg, d, Reg::Pc), comment);
        Ok(())
    }

    /// Emits an unconditional jump back to `target`.
    pub(super) fn jump_back(&mut self, target: usize, comment: &str) -> Result<(), CompilerError> {
        let d = Listing::displacement(self.code.next_line(), target)?;
        tm!((self.code) {JEQ %zero, {d}(%pc) => comment;});
        Ok(())
    }

    /// Fails if a scratch register is checked out: the callee is free to use
    /// every scratch register.
    pub(super) fn no_live_registers(&self) -> Result<(), CompilerError> {
        let held = self.registers.held();
        if held.is_empty() {
            Ok(())
        } else {
            Err(CompilerError::RegistersLiveAcrossCall(held.to_vec()))
        }
    }
}
