use std::fmt::*;

pub use crate::compiler::arch::registers::Reg;

/*
Assembly DSL
Registers are prefixed with %
Each instruction is followed by a ;
Expressions to evaluate are in {}
An instruction may be followed by => and a comment
```
let x = 8;
tm!(
    (buffer) {
        ; "set up"
        LD %sp, 0(%zero) => "load top of memory";
        LDC %ac, {x}(%zero);
        LDA %sp, -1(%sp);
        ADD %ac, %{reg}, %ac;
        OUT %ac;
        HALT;
    }
)
```

would translate to:
```
 * set up
0000:      LD 4,0(0)     load top of memory
0001:     LDC 1,8(0)
0002:     LDA 4,-1(4)
0003:     ADD 1,2,1
0004:     OUT 1,0,0
0005:    HALT 0,0,0
```

operand combinations:
register only:
%_, %_, %_
%_
(none)

register and memory:
%_, d(%_)
%_, {d}(%_)
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Halt,
    In,
    Out,
    InB,
    OutB,
    OutC,
    OutNl,
    Add,
    Sub,
    Mul,
    Div,

    Ld,
    Lda,
    Ldc,
    St,
    Jlt,
    Jle,
    Jeq,
    Jne,
    Jge,
    Jgt,
}

impl Opcode {
    /// Register only instructions take three registers, all others take a
    /// register and a displacement from a base register.
    pub fn is_register_only(&self) -> bool {
        use Opcode::*;
        matches!(
            self,
            Halt | In | Out | InB | OutB | OutC | OutNl | Add | Sub | Mul | Div
        )
    }

    pub fn is_jump(&self) -> bool {
        use Opcode::*;
        matches!(self, Jlt | Jle | Jeq | Jne | Jge | Jgt)
    }

    pub fn mnemonic(&self) -> &'static str {
        use Opcode::*;
        match self {
            Halt => "HALT",
            In => "IN",
            Out => "OUT",
            InB => "INB",
            OutB => "OUTB",
            OutC => "OUTC",
            OutNl => "OUTNL",
            Add => "ADD",
            Sub => "SUB",
            Mul => "MUL",
            Div => "DIV",
            Ld => "LD",
            Lda => "LDA",
            Ldc => "LDC",
            St => "ST",
            Jlt => "JLT",
            Jle => "JLE",
            Jeq => "JEQ",
            Jne => "JNE",
            Jge => "JGE",
            Jgt => "JGT",
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operands {
    Registers(Reg, Reg),
    Memory(i32, Reg),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inst {
    op: Opcode,
    r: Reg,
    operands: Operands,
}

impl Inst {
    /// A register only instruction: `op r,s,t`.
    pub fn ro(op: Opcode, r: Reg, s: Reg, t: Reg) -> Inst {
        debug_assert!(op.is_register_only(), "{} takes a memory operand", op);
        Inst {
            op,
            r,
            operands: Operands::Registers(s, t),
        }
    }

    /// A register and memory instruction: `op r,d(s)`.
    pub fn rm(op: Opcode, r: Reg, d: i32, s: Reg) -> Inst {
        debug_assert!(!op.is_register_only(), "{} takes register operands", op);
        Inst {
            op,
            r,
            operands: Operands::Memory(d, s),
        }
    }

    pub fn op(&self) -> Opcode {
        self.op
    }

    pub fn r(&self) -> Reg {
        self.r
    }

    pub fn operands(&self) -> Operands {
        self.operands
    }
}

impl Display for Inst {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.operands {
            Operands::Registers(s, t) => f.write_fmt(format_args!(
                "{:>8} {},{},{}",
                self.op.mnemonic(),
                self.r,
                s,
                t
            )),
            Operands::Memory(d, s) => f.write_fmt(format_args!(
                "{:>8} {},{}({})",
                self.op.mnemonic(),
                self.r,
                d,
                s
            )),
        }
    }
}

#[macro_export]
macro_rules! opcode {
    (HALT) => {
        $crate::compiler::tm::Opcode::Halt
    };
    (IN) => {
        $crate::compiler::tm::Opcode::In
    };
    (OUT) => {
        $crate::compiler::tm::Opcode::Out
    };
    (INB) => {
        $crate::compiler::tm::Opcode::InB
    };
    (OUTB) => {
        $crate::compiler::tm::Opcode::OutB
    };
    (OUTC) => {
        $crate::compiler::tm::Opcode::OutC
    };
    (OUTNL) => {
        $crate::compiler::tm::Opcode::OutNl
    };
    (ADD) => {
        $crate::compiler::tm::Opcode::Add
    };
    (SUB) => {
        $crate::compiler::tm::Opcode::Sub
    };
    (MUL) => {
        $crate::compiler::tm::Opcode::Mul
    };
    (DIV) => {
        $crate::compiler::tm::Opcode::Div
    };
    (LD) => {
        $crate::compiler::tm::Opcode::Ld
    };
    (LDA) => {
        $crate::compiler::tm::Opcode::Lda
    };
    (LDC) => {
        $crate::compiler::tm::Opcode::Ldc
    };
    (ST) => {
        $crate::compiler::tm::Opcode::St
    };
    (JLT) => {
        $crate::compiler::tm::Opcode::Jlt
    };
    (JLE) => {
        $crate::compiler::tm::Opcode::Jle
    };
    (JEQ) => {
        $crate::compiler::tm::Opcode::Jeq
    };
    (JNE) => {
        $crate::compiler::tm::Opcode::Jne
    };
    (JGE) => {
        $crate::compiler::tm::Opcode::Jge
    };
    (JGT) => {
        $crate::compiler::tm::Opcode::Jgt
    };
}

#[macro_export]
macro_rules! reg {
    (zero) => {
        $crate::compiler::tm::Reg::Zero
    };
    (ac) => {
        $crate::compiler::tm::Reg::Ac
    };
    (sp) => {
        $crate::compiler::tm::Reg::Sp
    };
    (fp) => {
        $crate::compiler::tm::Reg::Fp
    };
    (pc) => {
        $crate::compiler::tm::Reg::Pc
    };
    ({$e:expr}) => {
        $e
    };
}

#[macro_export]
macro_rules! tm {
    (($buf:expr) {}) => {
    };

    /********************/
    /*     COMMENTS     */
    /********************/
    (($buf:expr) {;$comment:literal $($tail:tt)*}) => {
        $buf.comment($comment);
        $crate::tm!(($buf) {$($tail)*})
    };

    (($buf:expr) {;{$comment:expr} $($tail:tt)*}) => {
        $buf.comment(&$comment);
        $crate::tm!(($buf) {$($tail)*})
    };

    /********************/
    /* REGISTER, MEMORY */
    /********************/
    (($buf:expr) {$op:ident %$r:tt, $d:literal(%$s:tt) => $c:expr; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::rm($crate::opcode!($op), $crate::reg!($r), $d, $crate::reg!($s)), &$c);
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident %$r:tt, $d:literal(%$s:tt); $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::rm($crate::opcode!($op), $crate::reg!($r), $d, $crate::reg!($s)), "");
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident %$r:tt, {$d:expr}(%$s:tt) => $c:expr; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::rm($crate::opcode!($op), $crate::reg!($r), $d, $crate::reg!($s)), &$c);
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident %$r:tt, {$d:expr}(%$s:tt); $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::rm($crate::opcode!($op), $crate::reg!($r), $d, $crate::reg!($s)), "");
        $crate::tm!(($buf) {$($tail)*})
    };

    /********************/
    /*  REGISTER ONLY   */
    /********************/
    (($buf:expr) {$op:ident %$r:tt, %$s:tt, %$t:tt => $c:expr; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::ro($crate::opcode!($op), $crate::reg!($r), $crate::reg!($s), $crate::reg!($t)), &$c);
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident %$r:tt, %$s:tt, %$t:tt; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::ro($crate::opcode!($op), $crate::reg!($r), $crate::reg!($s), $crate::reg!($t)), "");
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident %$r:tt => $c:expr; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::ro($crate::opcode!($op), $crate::reg!($r), $crate::reg!(zero), $crate::reg!(zero)), &$c);
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident %$r:tt; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::ro($crate::opcode!($op), $crate::reg!($r), $crate::reg!(zero), $crate::reg!(zero)), "");
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident => $c:expr; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::ro($crate::opcode!($op), $crate::reg!(zero), $crate::reg!(zero), $crate::reg!(zero)), &$c);
        $crate::tm!(($buf) {$($tail)*})
    };
    (($buf:expr) {$op:ident; $($tail:tt)*}) => {
        $buf.emit($crate::compiler::tm::Inst::ro($crate::opcode!($op), $crate::reg!(zero), $crate::reg!(zero), $crate::reg!(zero)), "");
        $crate::tm!(($buf) {$($tail)*})
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::tm::Listing;

    #[test]
    fn register_only_display() {
        let inst = Inst::ro(Opcode::Add, Reg::Ac, Reg::R2, Reg::Ac);
        assert_eq!(inst.to_string(), "     ADD 1,2,1");
        let inst = Inst::ro(Opcode::Halt, Reg::Zero, Reg::Zero, Reg::Zero);
        assert_eq!(inst.to_string(), "    HALT 0,0,0");
    }

    #[test]
    fn memory_display() {
        let inst = Inst::rm(Opcode::Lda, Reg::Sp, -1, Reg::Sp);
        assert_eq!(inst.to_string(), "     LDA 4,-1(4)");
        let inst = Inst::rm(Opcode::Jeq, Reg::Zero, 12, Reg::Pc);
        assert_eq!(inst.to_string(), "     JEQ 0,12(7)");
    }

    #[test]
    fn opcode_forms() {
        for op in [Opcode::Halt, Opcode::OutNl, Opcode::Div, Opcode::InB] {
            assert!(op.is_register_only());
        }
        for op in [Opcode::Ld, Opcode::St, Opcode::Jgt, Opcode::Ldc] {
            assert!(!op.is_register_only());
        }
        assert!(Opcode::Jne.is_jump());
        assert!(!Opcode::Lda.is_jump());
    }

    #[test]
    fn dsl() {
        let mut code = Listing::new();
        let x = 8;
        let reg = Reg::R3;
        tm!((code) {
            ; "set up"
            LD %sp, 0(%zero) => "load top of memory";
            LDC %ac, {x}(%zero);
            LDA %sp, -1(%sp);
            ADD %ac, %{reg}, %ac => format!("add {}", x);
            OUT %ac;
            HALT;
        });

        let asm = code.finish().unwrap();
        let insts: Vec<_> = asm.instructions().collect();
        assert_eq!(
            insts,
            vec![
                Inst::rm(Opcode::Ld, Reg::Sp, 0, Reg::Zero),
                Inst::rm(Opcode::Ldc, Reg::Ac, 8, Reg::Zero),
                Inst::rm(Opcode::Lda, Reg::Sp, -1, Reg::Sp),
                Inst::ro(Opcode::Add, Reg::Ac, Reg::R3, Reg::Ac),
                Inst::ro(Opcode::Out, Reg::Ac, Reg::Zero, Reg::Zero),
                Inst::ro(Opcode::Halt, Reg::Zero, Reg::Zero, Reg::Zero),
            ]
        );
        assert_eq!(
            asm.to_string(),
            " * set up\n\
             0000:      LD 4,0(0)     load top of memory\n\
             0001:     LDC 1,8(0)\n\
             0002:     LDA 4,-1(4)\n\
             0003:     ADD 1,3,1      add 8\n\
             0004:     OUT 1,0,0\n\
             0005:    HALT 0,0,0\n"
        );
    }
}
