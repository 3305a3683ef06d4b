/**
 * The code generator walks a validated program and writes Tiny Machine
 * instructions into a `Listing`.
 *
 * Before any instruction is generated the string pool places every string
 * literal in the static data area and the memory layout assigns every
 * variable its address or frame offset, and every procedure the size of its
 * activation record.  The generator only reads those tables.
 *
 * Jumps whose target has not been generated yet (the end of a branch, the
 * exit of a loop, a `break`, a `return`, a call to a procedure further down
 * the listing) reserve their line and are resolved once the target is known.
 * The listing refuses to complete while a reservation is pending.
 *
 * Every expression leaves its value in the accumulator.  Intermediate values
 * are kept on the runtime stack, scratch registers are only held across
 * straight line code, so a call never finds a register checked out.
 */
macro_rules! trace {
    ($self:expr, $node:expr) => {
        if $self.tracing.includes($self.code.next_line()) {
            eprintln!(
                "{} <- L{}: {}",
                stdext::function_name!(),
                $self.code.next_line(),
                $node.node_type()
            )
        }
    };
}

mod address;
mod compiler;
mod expression;
mod routine;
mod runtime;
mod statement;


pub use self::compiler::Compiler;
