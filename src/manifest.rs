use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    compiler::ast::{
        BinaryOperator, Call, Control, ForLoop, Identifier, IfElse, Literal, Node, ProcId, Procedure,
        Program, Read, StorageMode, SymbolTable, Type, UnaryOperator, VarId, WhileLoop,
    },
    result::Result,
};

/**
A program that has already been checked by a front end, in a form that can be
stored as YAML or JSON.  Every name is resolved and every node is rebuilt
through the validating AST constructors by [`Manifest::build`], so a manifest
cannot describe an ill typed tree.
 */
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Manifest {
    #[serde(default)]
    pub globals: Vec<VarDef>,
    #[serde(default)]
    pub procedures: Vec<ProcDef>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VarDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub mode: StorageMode,
}

/// A procedure assigns its return value to a variable named after the
/// procedure.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ProcDef {
    pub name: String,
    #[serde(default)]
    pub params: Vec<VarDef>,
    #[serde(default)]
    pub returns: Option<Type>,
    #[serde(default)]
    pub locals: Vec<VarDef>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    Assign {
        target: Expr,
        value: Expr,
    },
    If {
        cond: Expr,
        then: Vec<Stmt>,
        #[serde(default)]
        otherwise: Option<Vec<Stmt>>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    /// The counter is declared by the loop and only visible in its body.
    For {
        var: String,
        from: Expr,
        to: Expr,
        body: Vec<Stmt>,
    },
    Call {
        proc: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Write(Expr),
    /// Writes without a trailing newline.
    Writes(Expr),
    Return,
    Break,
    Exit,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Int(i32),
    Bool(bool),
    Str(String),
    Var(String),
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    Call {
        proc: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Read(Type),
}

impl Manifest {
    /**
    Resolves every name and builds the descriptors and the validated tree.
    Procedure headers are declared before any body is built, so procedures
    may call each other regardless of the order they are listed in.
     */
    pub fn build(&self) -> Result<(SymbolTable, Program)> {
        let mut builder = Builder::new();

        let globals = self
            .globals
            .iter()
            .map(|g| builder.declare(g))
            .collect::<Result<Vec<_>>>()?;

        let headers = self
            .procedures
            .iter()
            .map(|p| builder.declare_proc(p))
            .collect::<Result<Vec<_>>>()?;

        let procedures = self
            .procedures
            .iter()
            .zip(headers)
            .map(|(p, h)| builder.procedure(p, h))
            .collect::<Result<Vec<_>>>()?;

        let body = builder.block(&self.body)?;
        let program = Program::new(globals, procedures, body).map_err(|e| e.to_string())?;
        debug!(
            "Built {} procedure(s) and {} top level statement(s)",
            self.procedures.len(),
            self.body.len()
        );
        Ok((builder.symbols, program))
    }
}

/// The variables a procedure is declared with, before its body is built.
struct ProcHeader {
    proc: ProcId,
    params: Vec<VarId>,
    ret: Option<VarId>,
}

struct Builder {
    symbols: SymbolTable,
    scopes: Vec<HashMap<String, VarId>>,
    procs: HashMap<String, ProcId>,
}

impl Builder {
    fn new() -> Builder {
        Builder {
            symbols: SymbolTable::new(),
            scopes: vec![HashMap::new()],
            procs: HashMap::new(),
        }
    }

    fn declare(&mut self, v: &VarDef) -> Result<VarId> {
        let id = self.symbols.add_var(&v.name, v.ty.clone(), v.mode);
        self.bind(&v.name, id)?;
        Ok(id)
    }

    fn bind(&mut self, name: &str, id: VarId) -> Result<()> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| format!("No scope to declare {} in", name))?;
        if scope.insert(name.into(), id).is_some() {
            return Err(format!("{} is declared twice in the same scope", name));
        }
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<VarId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.get(name).copied())
            .ok_or_else(|| format!("Could not find variable {}", name))
    }

    fn lookup_proc(&self, name: &str) -> Result<ProcId> {
        self.procs
            .get(name)
            .copied()
            .ok_or_else(|| format!("Could not find procedure {}", name))
    }

    fn declare_proc(&mut self, p: &ProcDef) -> Result<ProcHeader> {
        if self.procs.contains_key(&p.name) {
            return Err(format!("Procedure {} is declared twice", p.name));
        }

        let params: Vec<_> = p
            .params
            .iter()
            .map(|v| self.symbols.add_var(&v.name, v.ty.clone(), v.mode))
            .collect();
        let ret = p
            .returns
            .as_ref()
            .map(|ty| self.symbols.add_var(&p.name, ty.clone(), StorageMode::Value));

        let proc = self
            .symbols
            .add_proc(&p.name, params.clone(), ret)
            .map_err(|e| e.to_string())?;
        self.procs.insert(p.name.clone(), proc);
        Ok(ProcHeader { proc, params, ret })
    }

    fn procedure(&mut self, p: &ProcDef, header: ProcHeader) -> Result<Node> {
        self.scopes.push(HashMap::new());
        let body = self.procedure_body(p, &header);
        self.scopes.pop();

        let (locals, body) = body?;
        Ok(Node::Procedure(Procedure::new(
            &self.symbols,
            header.proc,
            locals,
            body,
        )))
    }

    fn procedure_body(&mut self, p: &ProcDef, header: &ProcHeader) -> Result<(Vec<VarId>, Node)> {
        if let Some(ret) = header.ret {
            self.bind(&p.name, ret)?;
        }
        for (v, id) in p.params.iter().zip(&header.params) {
            self.bind(&v.name, *id)?;
        }
        let locals = p
            .locals
            .iter()
            .map(|v| self.declare(v))
            .collect::<Result<Vec<_>>>()?;
        let body = self.block(&p.body)?;
        Ok((locals, Node::Sequence(body)))
    }

    fn block(&mut self, stmts: &[Stmt]) -> Result<Vec<Node>> {
        stmts.iter().map(|s| self.statement(s)).collect()
    }

    fn statement(&mut self, stmt: &Stmt) -> Result<Node> {
        let node = match stmt {
            Stmt::Assign { target, value } => {
                let target = self.expression(target)?;
                let value = self.expression(value)?;
                Node::assign(target, value)
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                let cond = self.expression(cond)?;
                let then = Node::Sequence(self.block(then)?);
                let otherwise = match otherwise {
                    Some(stmts) => Some(Node::Sequence(self.block(stmts)?)),
                    None => None,
                };
                IfElse::new(cond, then, otherwise).map(Node::IfElse)
            }
            Stmt::While { cond, body } => {
                let cond = self.expression(cond)?;
                let body = Node::Sequence(self.block(body)?);
                WhileLoop::new(cond, body).map(Node::WhileLoop)
            }
            Stmt::For {
                var,
                from,
                to,
                body,
            } => return self.for_loop(var, from, to, body),
            Stmt::Call { proc, args } => return self.call(proc, args),
            Stmt::Write(exp) => {
                let exp = self.expression(exp)?;
                Node::write(true, exp)
            }
            Stmt::Writes(exp) => {
                let exp = self.expression(exp)?;
                Node::write(false, exp)
            }
            Stmt::Return => Ok(Node::Control(Control::Return)),
            Stmt::Break => Ok(Node::Control(Control::Break)),
            Stmt::Exit => Ok(Node::Control(Control::Exit)),
        };
        node.map_err(|e| e.to_string())
    }

    fn for_loop(&mut self, var: &str, from: &Expr, to: &Expr, body: &[Stmt]) -> Result<Node> {
        let from = self.expression(from)?;
        let to = self.expression(to)?;

        self.scopes.push(HashMap::new());
        let counter = self.declare(&VarDef {
            name: var.into(),
            ty: Type::Int,
            mode: StorageMode::Value,
        });
        let body = counter.and_then(|c| self.block(body).map(|b| (c, b)));
        self.scopes.pop();

        let (counter, body) = body?;
        ForLoop::new(&self.symbols, counter, from, to, Node::Sequence(body))
            .map(Node::ForLoop)
            .map_err(|e| e.to_string())
    }

    fn call(&mut self, proc: &str, args: &[Expr]) -> Result<Node> {
        let proc = self.lookup_proc(proc)?;
        let args = args
            .iter()
            .map(|a| self.expression(a))
            .collect::<Result<Vec<_>>>()?;
        Call::new(&self.symbols, proc, args)
            .map(Node::Call)
            .map_err(|e| e.to_string())
    }

    fn expression(&mut self, exp: &Expr) -> Result<Node> {
        let node = match exp {
            Expr::Int(i) => Ok(Node::Literal(Literal::int(*i))),
            Expr::Bool(b) => Ok(Node::Literal(Literal::bool(*b))),
            Expr::Str(s) => Literal::string(s).map(Node::Literal),
            Expr::Var(name) => {
                let var = self.lookup(name)?;
                Ok(Node::Identifier(Identifier::new(&self.symbols, var)))
            }
            Expr::Index { base, index } => {
                let base = self.expression(base)?;
                let index = self.expression(index)?;
                Node::index(base, index)
            }
            Expr::Binary { op, left, right } => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                Node::binary(*op, left, right)
            }
            Expr::Unary { op, operand } => {
                let operand = self.expression(operand)?;
                Node::unary(*op, operand)
            }
            Expr::Call { proc, args } => return self.call(proc, args),
            Expr::Read(ty) => Read::new(ty.clone()).map(Node::Read),
        };
        node.map_err(|e| e.to_string())
    }
}
