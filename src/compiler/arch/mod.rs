/**
 * Arch contains the architectural concepts of the Tiny Machine: its register
 * file and the pool of scratch registers that the code generator draws from.
 */
pub mod registers;
