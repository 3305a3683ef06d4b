/**
 * The Compiler takes a Nice9 program that has been type checked and converts
 * it into Tiny Machine assembly.
 *
 * The program arrives as an AST whose nodes validated themselves when they
 * were constructed: holding a `Program` means holding a well typed tree.
 * This is the last stage where a User error can occur; an ill typed
 * construct is reported as a `SemanticError` by the constructor that was
 * asked to build it.
 *
 * Before generating code the compiler runs two precompilation steps over
 * the tree, handled by the `memory` submodule:
 * 1. Place every string literal in the static data area.
 * 2. Compute the size of every variable, assign each one a location (an
 * absolute address for globals, a frame offset for everything declared in a
 * procedure) and compute the size of every activation record.
 *
 * After these steps the input is considered correct and compilable, so any
 * fault in the actual generation can only come from a bug in the compiler
 * itself.  Those faults are reported as a `CompilerError` and abort the
 * compilation: no partial listing is ever produced.
 */
pub mod arch;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod memory;
pub mod tm;

use crate::diagnostics::config::TracingConfig;

use self::{ast::Program, ast::SymbolTable, error::CompilerError, tm::Assembly};

/// Compiles `program`, whose variables and procedures are described by
/// `symbols`, into a Tiny Machine listing.
pub fn compile(program: &Program, symbols: &SymbolTable) -> Result<Assembly, CompilerError> {
    codegen::Compiler::compile(program, symbols, TracingConfig::Off)
}

/// Like [`compile`], printing to stderr every node the generator visits on the lines
/// selected by `tracing`.
pub fn compile_with_tracing(
    program: &Program,
    symbols: &SymbolTable,
    tracing: TracingConfig,
) -> Result<Assembly, CompilerError> {
    codegen::Compiler::compile(program, symbols, tracing)
}
