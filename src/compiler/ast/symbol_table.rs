use serde::{Deserialize, Serialize};

use super::{error::SemanticError, ty::Type};

/// Handle to a variable descriptor owned by a [`SymbolTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

/// Handle to a procedure descriptor owned by a [`SymbolTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcId(usize);

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("v{}", self.0))
    }
}

impl std::fmt::Display for ProcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("p{}", self.0))
    }
}

/// Whether the slot of a variable holds its data or the address of its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Value,
    Reference,
}

impl Default for StorageMode {
    fn default() -> Self {
        StorageMode::Value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub mode: StorageMode,
}

impl VarDecl {
    /// Number of memory words the variable's slot occupies.  A reference
    /// holds a single address no matter how large the referenced data is.
    pub fn slot_size(&self) -> Option<usize> {
        match self.mode {
            StorageMode::Reference => Some(1),
            StorageMode::Value => self.ty.storage_size(),
        }
    }

    pub fn is_reference(&self) -> bool {
        self.mode == StorageMode::Reference
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcDecl {
    pub name: String,
    pub args: Vec<VarId>,
    pub ret: Option<VarId>,
}

/**
Owns every variable and procedure descriptor of a program.  Nodes refer to
descriptors by handle, so the table must outlive the AST built against it.
Descriptors are immutable once added: layout information is computed into a
separate side table by the memory layout pass.
 */
#[derive(Debug, Default)]
pub struct SymbolTable {
    vars: Vec<VarDecl>,
    procs: Vec<ProcDecl>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            vars: vec![],
            procs: vec![],
        }
    }

    pub fn add_var(&mut self, name: &str, ty: Type, mode: StorageMode) -> VarId {
        self.vars.push(VarDecl {
            name: name.into(),
            ty,
            mode,
        });
        VarId(self.vars.len() - 1)
    }

    /**
    Adds a procedure descriptor.  Procedures cannot return arrays and array
    arguments must be passed by reference; the caller only ever hands the
    callee the address of array data.
     */
    pub fn add_proc(
        &mut self,
        name: &str,
        args: Vec<VarId>,
        ret: Option<VarId>,
    ) -> Result<ProcId, SemanticError> {
        if let Some(ret) = ret {
            let ty = &self.var(ret).ty;
            if !ty.is_scalar() {
                return Err(SemanticError::ArrayReturnType(name.into(), ty.clone()));
            }
        }

        for arg in &args {
            let decl = self.var(*arg);
            if decl.ty.is_array() && !decl.is_reference() {
                return Err(SemanticError::ArrayArgumentByValue(
                    name.into(),
                    decl.name.clone(),
                ));
            }
        }

        self.procs.push(ProcDecl {
            name: name.into(),
            args,
            ret,
        });
        Ok(ProcId(self.procs.len() - 1))
    }

    pub fn var(&self, id: VarId) -> &VarDecl {
        &self.vars[id.0]
    }

    pub fn proc(&self, id: ProcId) -> &ProcDecl {
        &self.procs[id.0]
    }

    pub fn vars(&self) -> impl Iterator<Item = (VarId, &VarDecl)> {
        self.vars.iter().enumerate().map(|(i, v)| (VarId(i), v))
    }

    pub fn procs(&self) -> impl Iterator<Item = (ProcId, &ProcDecl)> {
        self.procs.iter().enumerate().map(|(i, p)| (ProcId(i), p))
    }
}
