use super::arch::registers::Reg;

/// Internal invariant violations detected while laying out memory or
/// generating code.  A valid AST never produces one of these; each indicates
/// a defect in the compiler itself.
#[derive(Clone, Debug, PartialEq)]
pub enum CompilerError {
    RegisterPoolExhausted,
    RegisterReleasedOutOfOrder(Reg),
    RegistersLiveAcrossCall(Vec<Reg>),
    UnresolvedReservation(usize),
    UnallocatedVariable(String),
    MissingFrame(String),
    BreakOutsideLoop,
    ProcedureEmittedTwice(String),
    DisplacementOverflow(usize, usize),
    AddressOverflow(usize),
    StorageOverflow(String),
    LiteralRelocated(String),
    NestedProcedure(String),
    MissingRuntime(&'static str),
}

impl std::fmt::Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CompilerError::*;
        match self {
            RegisterPoolExhausted => f.write_str("no scratch registers are free"),
            RegisterReleasedOutOfOrder(reg) => f.write_fmt(format_args!(
                "register {} released out of order",
                reg
            )),
            RegistersLiveAcrossCall(regs) => f.write_fmt(format_args!(
                "registers {:?} are checked out across a subroutine call",
                regs.iter().map(|r| r.index()).collect::<Vec<_>>()
            )),
            UnresolvedReservation(line) => f.write_fmt(format_args!(
                "line {} was reserved but never resolved",
                line
            )),
            UnallocatedVariable(name) => f.write_fmt(format_args!(
                "variable {} has not been assigned a memory location",
                name
            )),
            MissingFrame(name) => f.write_fmt(format_args!(
                "procedure {} has no activation record layout",
                name
            )),
            BreakOutsideLoop => f.write_str("break statement outside of a loop"),
            ProcedureEmittedTwice(name) => f.write_fmt(format_args!(
                "procedure {} was emitted more than once",
                name
            )),
            DisplacementOverflow(from, to) => f.write_fmt(format_args!(
                "jump from line {} to line {} does not fit in a displacement",
                from, to
            )),
            AddressOverflow(addr) => f.write_fmt(format_args!(
                "address {} does not fit in an instruction",
                addr
            )),
            StorageOverflow(what) => f.write_fmt(format_args!(
                "{} is too large to fit in memory",
                what
            )),
            LiteralRelocated(s) => f.write_fmt(format_args!(
                "string literal \"{}\" already has a different data address",
                s
            )),
            NestedProcedure(name) => f.write_fmt(format_args!(
                "procedure {} appears inside another construct",
                name
            )),
            MissingRuntime(routine) => f.write_fmt(format_args!(
                "{} is used before it has been generated",
                routine
            )),
        }
    }
}
