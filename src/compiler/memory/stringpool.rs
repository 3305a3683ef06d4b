use log::debug;

use crate::compiler::{
    ast::{Node, Program, Value},
    error::CompilerError,
    tm::Listing,
};

/// Printed by the shared handler when an array index is out of bounds.
pub const BOUNDS_FAULT_MESSAGE: &str = "Error: Array index out of bounds";

/// First address of the static data area; cell 0 holds the top of memory.
pub const DATA_BASE: usize = 1;

/**
The static string constants of a program.  Every string literal node gets
its own block of data memory holding a length word followed by one word per
character.  Literals are placed in the pre-order in which the program walk
visits them, followed by the bounds fault message.
 */
#[derive(Debug, PartialEq)]
pub struct StringPool {
    next: usize,
    fault_message: usize,
}

impl StringPool {
    /// Places every string literal of `program` and declares it in `code`.
    pub fn extract_from(program: &Program, code: &mut Listing) -> Result<StringPool, CompilerError> {
        let mut next = DATA_BASE;
        let mut result = Ok(());
        program.walk(&mut |node| {
            if result.is_err() {
                return;
            }
            if let Node::Literal(lit) = node {
                if let Value::Str(s) = lit.value() {
                    result = Self::place(s, next).and_then(|addr| {
                        // a second compilation of the same tree lands on the same address
                        if !lit.set_address(addr) && lit.address() != Some(addr) {
                            return Err(CompilerError::LiteralRelocated(s.clone()));
                        }
                        Ok(())
                    });
                    code.string_data(s);
                    next += s.len() + 1;
                }
            }
        });
        result?;

        let fault_message = next;
        Self::place(BOUNDS_FAULT_MESSAGE, fault_message)?;
        code.string_data(BOUNDS_FAULT_MESSAGE);
        next += BOUNDS_FAULT_MESSAGE.len() + 1;

        Ok(StringPool {
            next,
            fault_message,
        })
    }

    fn place(s: &str, addr: usize) -> Result<i32, CompilerError> {
        debug!("\"{}\" at {}", s, addr);
        Listing::address(addr)
    }

    /// First address past the string constants.
    pub fn heap_end(&self) -> usize {
        self.next
    }

    /// Address of the bounds fault message.
    pub fn fault_message(&self) -> usize {
        self.fault_message
    }
}
