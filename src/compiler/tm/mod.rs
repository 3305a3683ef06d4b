/**
 * The Tiny Machine target: its instruction set, the `tm!` DSL for writing
 * instructions, and the listing that numbers instructions and holds the lines
 * reserved for jumps whose target is not yet known.
 */
pub mod assembly;
pub mod listing;

#[cfg(test)]
pub mod machine;

pub use self::assembly::{Inst, Opcode, Operands, Reg};
pub use self::listing::{Assembly, Listing, Reservation};
