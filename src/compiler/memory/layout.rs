use std::collections::HashMap;

use log::debug;

use crate::compiler::{
    ast::{Node, ProcId, Program, SymbolTable, VarId},
    error::CompilerError,
};

/**
 * Compute how every variable of a program is laid out in memory: global
 * variables and the loop variables of top level statements are placed in
 * the static data area, growing upward from the end of the string constants.
 * The return value, arguments, locals and loop variables of a procedure are
 * placed in its activation record, growing downward from the frame pointer.
 *
 * Offsets are computed into a side table keyed by descriptor handle.  A
 * variable is placed at most once: visiting it again, or running the layout
 * over the same program a second time, leaves its slot unchanged.
 */

/// Where a variable lives: an absolute data address if it is global,
/// otherwise an offset from the frame pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VarSlot {
    pub offset: i32,
    pub size: usize,
    pub global: bool,
}

/// Activation record of a procedure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Words between the frame pointer and the bottom of the frame,
    /// including the saved stack pointer at offset 0.
    pub record_size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Direction {
    Up,
    Down,
}

/// The next free address while placing a run of variables.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LayoutData {
    next: i64,
    direction: Direction,
}

impl LayoutData {
    fn up(start: usize) -> Result<LayoutData, CompilerError> {
        let next = i64::try_from(start).map_err(|_| CompilerError::AddressOverflow(start))?;
        Ok(LayoutData {
            next,
            direction: Direction::Up,
        })
    }

    fn down() -> LayoutData {
        LayoutData {
            next: -1,
            direction: Direction::Down,
        }
    }

    /// Distance of the next free address from zero.
    fn extent(&self) -> usize {
        usize::try_from(self.next.unsigned_abs()).unwrap_or(usize::MAX)
    }

    /// Claims `size` words and returns the lowest address of the block.  Every
    /// word of the block and the next free address must fit in an `i32`.
    fn claim(&mut self, size: usize) -> Result<i32, CompilerError> {
        let overflow = CompilerError::AddressOverflow(self.extent().saturating_add(size));
        let words = i64::try_from(size).map_err(|_| overflow.clone())?;
        let (offset, next) = match self.direction {
            Direction::Up => (Some(self.next), self.next.checked_add(words)),
            Direction::Down => {
                let offset = self.next.checked_sub(words).and_then(|o| o.checked_add(1));
                (offset, offset.and_then(|o| o.checked_sub(1)))
            }
        };
        match (
            offset.and_then(|o| i32::try_from(o).ok()),
            next.and_then(|n| i32::try_from(n).ok()),
        ) {
            (Some(offset), Some(next)) => {
                self.next = i64::from(next);
                Ok(offset)
            }
            _ => Err(overflow),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryLayout {
    slots: HashMap<VarId, VarSlot>,
    frames: HashMap<ProcId, Frame>,
    data_end: usize,
}

impl MemoryLayout {
    pub fn new() -> MemoryLayout {
        MemoryLayout {
            slots: HashMap::new(),
            frames: HashMap::new(),
            data_end: 0,
        }
    }

    /// Lays out `program` with its static variables starting at `heap_base`.
    pub fn compute(
        program: &Program,
        symbols: &SymbolTable,
        heap_base: usize,
    ) -> Result<MemoryLayout, CompilerError> {
        let mut layout = MemoryLayout::new();
        layout.allocate(program, symbols, heap_base)?;
        Ok(layout)
    }

    /// Places every variable of `program` that does not yet have a slot.
    pub fn allocate(
        &mut self,
        program: &Program,
        symbols: &SymbolTable,
        heap_base: usize,
    ) -> Result<(), CompilerError> {
        let mut statics = LayoutData::up(heap_base.max(self.data_end))?;
        for var in program.globals() {
            self.place(symbols, *var, &mut statics)?;
        }
        self.place_loop_vars(symbols, program.body(), &mut statics)?;
        self.data_end = statics.extent();

        if let Node::Sequence(procs) = program.procedures() {
            for p in procs {
                if let Node::Procedure(p) = p {
                    self.allocate_frame(symbols, p.proc(), p.locals(), p.body())?;
                }
            }
        }
        Ok(())
    }

    fn allocate_frame(
        &mut self,
        symbols: &SymbolTable,
        proc: ProcId,
        locals: &[VarId],
        body: &Node,
    ) -> Result<(), CompilerError> {
        if self.frames.contains_key(&proc) {
            return Ok(());
        }

        let decl = symbols.proc(proc);
        debug!("Frame of {}", decl.name);
        let mut frame = LayoutData::down();
        if let Some(ret) = decl.ret {
            self.place(symbols, ret, &mut frame)?;
        }
        for arg in &decl.args {
            self.place(symbols, *arg, &mut frame)?;
        }
        for local in locals {
            self.place(symbols, *local, &mut frame)?;
        }
        self.place_loop_vars(symbols, body, &mut frame)?;

        // offset 0 holds the saved stack pointer
        let record_size = frame.extent();
        debug!("Frame of {}: {} words", decl.name, record_size);
        self.frames.insert(proc, Frame { record_size });
        Ok(())
    }

    /// Visits sequences, both branches of conditionals, loop bodies and
    /// procedure bodies, placing each for loop counter as it is found.
    fn place_loop_vars(
        &mut self,
        symbols: &SymbolTable,
        node: &Node,
        layout: &mut LayoutData,
    ) -> Result<(), CompilerError> {
        match node {
            Node::Sequence(nodes) => {
                for n in nodes {
                    self.place_loop_vars(symbols, n, layout)?
                }
            }
            Node::IfElse(ie) => {
                self.place_loop_vars(symbols, ie.then(), layout)?;
                if let Some(otherwise) = ie.otherwise() {
                    self.place_loop_vars(symbols, otherwise, layout)?
                }
            }
            Node::WhileLoop(w) => self.place_loop_vars(symbols, w.body(), layout)?,
            Node::ForLoop(f) => {
                self.place(symbols, f.var(), layout)?;
                self.place_loop_vars(symbols, f.body(), layout)?
            }
            Node::Procedure(p) => self.place_loop_vars(symbols, p.body(), layout)?,
            _ => (),
        }
        Ok(())
    }

    fn place(
        &mut self,
        symbols: &SymbolTable,
        var: VarId,
        layout: &mut LayoutData,
    ) -> Result<(), CompilerError> {
        if self.slots.contains_key(&var) {
            return Ok(());
        }

        let decl = symbols.var(var);
        let size = decl
            .slot_size()
            .ok_or_else(|| CompilerError::StorageOverflow(decl.name.clone()))?;
        let offset = layout.claim(size)?;
        let global = layout.direction == Direction::Up;
        debug!(
            "{} {}: {} words at {}{}",
            decl.name,
            decl.ty,
            size,
            offset,
            if global { "" } else { "(fp)" }
        );
        self.slots.insert(
            var,
            VarSlot {
                offset,
                size,
                global,
            },
        );
        Ok(())
    }

    pub fn slot(&self, var: VarId) -> Option<&VarSlot> {
        self.slots.get(&var)
    }

    pub fn frame(&self, proc: ProcId) -> Option<&Frame> {
        self.frames.get(&proc)
    }

    /// First address past the static variables.
    pub fn data_end(&self) -> usize {
        self.data_end
    }
}
