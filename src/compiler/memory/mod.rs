/**
 * Memory layout of a program on the Tiny Machine.
 *
 * The following tasks are performed by this submodule
 * 1. Place every string literal in the static data area, followed by the
 * message printed when an array index is out of bounds.
 * 2. Compute the size of every variable and assign each global variable an
 * address in the static data area, after the string constants.
 * 3. Compute the activation record size of every procedure and assign its
 * return value, arguments, locals and loop variables an offset from the
 * frame pointer.
 */
pub mod layout;
pub mod stringpool;

pub use self::layout::{Frame, MemoryLayout, VarSlot};
pub use self::stringpool::{StringPool, BOUNDS_FAULT_MESSAGE, DATA_BASE};
