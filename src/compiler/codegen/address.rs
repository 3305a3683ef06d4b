use crate::{
    compiler::{
        ast::{Identifier, Indice, Node, StorageMode},
        error::CompilerError,
    },
    tm,
};

use super::Compiler;

impl<'a> Compiler<'a> {
    /**
    Computes the address of the data of an addressable node into the
    accumulator.  For a variable held by reference this is the address
    stored in its slot, otherwise it is the address of the slot itself.
     */
    pub(super) fn address_of(&mut self, node: &Node) -> Result<(), CompilerError> {
        match node {
            Node::Identifier(id) => self.identifier_address(id),
            Node::Indice(i) => self.indice_address(i),
            _ => unreachable!("only identifiers and indices are addressable"),
        }
    }

    pub(super) fn identifier_address(&mut self, id: &Identifier) -> Result<(), CompilerError> {
        let slot = self.slot(id.var())?;
        let base = Self::base(&slot);
        let off = slot.offset;
        match id.mode() {
            StorageMode::Reference => {
                tm!((self.code) {LD %ac, {off}(%{base}) => format!("address held by {}", id.name());});
            }
            StorageMode::Value => {
                tm!((self.code) {LDA %ac, {off}(%{base}) => format!("address of {}", id.name());});
            }
        }
        Ok(())
    }

    /**
    The offset of an element is folded from the outermost index inward: at
    each level the offset so far is saved on the stack, the index is
    evaluated and checked against the length of its dimension, scaled by the
    size of one element of that dimension and added to the saved offset.
    The base address of the array is added last.
     */
    pub(super) fn indice_address(&mut self, indice: &Indice) -> Result<(), CompilerError> {
        let fault = self
            .fault_handler
            .ok_or(CompilerError::MissingRuntime("bounds fault handler"))?;
        let fault = Self::word(fault)?;
        tm!((self.code) {LDC %ac, 0(%zero) => "element offset";});

        let mut level = indice;
        loop {
            self.push_ac("element offset");
            self.traverse(level.index())?;

            let len = Self::word(level.len())?;
            let size = level
                .ty()
                .storage_size()
                .ok_or_else(|| CompilerError::StorageOverflow(level.ty().to_string()))?;
            let size = Self::word(size)?;
            let r = self.registers.checkout()?;
            tm!((self.code) {
                JLT %ac, {fault}(%zero) => "index below zero";
                LDC %{r}, {len - 1}(%zero) => "last index";
                SUB %{r}, %{r}, %ac;
                JLT %{r}, {fault}(%zero) => "index past the end";
            });
            if size > 1 {
                tm!((self.code) {
                    LDC %{r}, {size}(%zero) => "element size";
                    MUL %ac, %ac, %{r};
                });
            }
            self.pop(r, "element offset");
            tm!((self.code) {ADD %ac, %ac, %{r};});
            self.registers.release(r)?;

            match level.base() {
                Node::Indice(inner) => level = inner,
                _ => break,
            }
        }

        let id = indice.root();
        let slot = self.slot(id.var())?;
        let base = Self::base(&slot);
        let off = slot.offset;
        let r = self.registers.checkout()?;
        match id.mode() {
            StorageMode::Reference => {
                tm!((self.code) {LD %{r}, {off}(%{base}) => format!("address held by {}", id.name());});
            }
            StorageMode::Value => {
                tm!((self.code) {LDA %{r}, {off}(%{base}) => format!("address of {}", id.name());});
            }
        }
        tm!((self.code) {ADD %ac, %{r}, %ac;});
        self.registers.release(r)
    }
}
