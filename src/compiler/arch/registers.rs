use crate::compiler::error::CompilerError;

/**
 * The eight registers of the Tiny Machine.  Register 0 always holds zero,
 * register 7 is the program counter, and registers 4 and 5 anchor the stack
 * and the current activation record.  The accumulator receives the result of
 * every expression.  Registers 2, 3 and 6 are scratch registers handed out by
 * the [`RegisterPool`].
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg {
    Zero,
    Ac,
    R2,
    R3,
    Sp,
    Fp,
    R6,
    Pc,
}

impl Reg {
    pub fn index(&self) -> usize {
        match self {
            Reg::Zero => 0,
            Reg::Ac => 1,
            Reg::R2 => 2,
            Reg::R3 => 3,
            Reg::Sp => 4,
            Reg::Fp => 5,
            Reg::R6 => 6,
            Reg::Pc => 7,
        }
    }
}

impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{}", self.index()))
    }
}

/**
 * The free list of scratch registers.  Registers are checked out and
 * returned in strict LIFO order, matching the nesting of the expressions
 * that use them.
 */
#[derive(Debug)]
pub struct RegisterPool {
    free: Vec<Reg>,
    held: Vec<Reg>,
}

impl RegisterPool {
    pub fn new() -> RegisterPool {
        RegisterPool {
            free: vec![Reg::R6, Reg::R3, Reg::R2],
            held: vec![],
        }
    }

    pub fn checkout(&mut self) -> Result<Reg, CompilerError> {
        let reg = self.free.pop().ok_or(CompilerError::RegisterPoolExhausted)?;
        self.held.push(reg);
        Ok(reg)
    }

    /// Returns `reg` to the pool.  It must be the most recently checked out
    /// register that has not yet been released.
    pub fn release(&mut self, reg: Reg) -> Result<(), CompilerError> {
        match self.held.last() {
            Some(last) if *last == reg => {
                self.held.pop();
                self.free.push(reg);
                Ok(())
            }
            _ => Err(CompilerError::RegisterReleasedOutOfOrder(reg)),
        }
    }

    /// The registers currently checked out, oldest first.
    pub fn held(&self) -> &[Reg] {
        &self.held
    }
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_register_number() {
        assert_eq!(Reg::Zero.to_string(), "0");
        assert_eq!(Reg::Ac.to_string(), "1");
        assert_eq!(Reg::Sp.to_string(), "4");
        assert_eq!(Reg::Fp.to_string(), "5");
        assert_eq!(Reg::Pc.to_string(), "7");
    }

    #[test]
    fn checkout_order() {
        let mut pool = RegisterPool::new();
        assert_eq!(pool.checkout(), Ok(Reg::R2));
        assert_eq!(pool.checkout(), Ok(Reg::R3));
        assert_eq!(pool.checkout(), Ok(Reg::R6));
        assert_eq!(pool.checkout(), Err(CompilerError::RegisterPoolExhausted));
        assert_eq!(pool.held(), &[Reg::R2, Reg::R3, Reg::R6]);
    }

    #[test]
    fn release_is_lifo() {
        let mut pool = RegisterPool::new();
        let a = pool.checkout().unwrap();
        let b = pool.checkout().unwrap();
        assert_eq!(
            pool.release(a),
            Err(CompilerError::RegisterReleasedOutOfOrder(a))
        );
        assert!(pool.release(b).is_ok());
        assert!(pool.release(a).is_ok());
        assert!(pool.held().is_empty());

        // a released register is the next one handed out
        assert_eq!(pool.checkout(), Ok(a));
    }

    #[test]
    fn release_of_free_register() {
        let mut pool = RegisterPool::new();
        assert_eq!(
            pool.release(Reg::R6),
            Err(CompilerError::RegisterReleasedOutOfOrder(Reg::R6))
        );
    }
}
