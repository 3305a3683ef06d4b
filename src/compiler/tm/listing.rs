use log::debug;

use crate::compiler::error::CompilerError;

use super::assembly::Inst;

/// Column at which the comment of an instruction line starts.
const COMMENT_COLUMN: usize = 25;

#[derive(Clone, Debug, PartialEq)]
enum Item {
    Line(usize),
    Comment(String),
    Data(usize),
    StringData(String),
}

#[derive(Clone, Debug)]
enum Slot {
    Emitted(Inst, String),
    Reserved(String),
}

/**
A numbered line that has been set aside for an instruction whose operands are
not yet known (usually a jump to a line that has not been generated yet).  A
reservation can only be consumed by [`Listing::resolve`], so every reserved
line is resolved at most once.
 */
#[must_use]
#[derive(Debug, PartialEq)]
pub struct Reservation {
    line: usize,
}

impl Reservation {
    pub fn line(&self) -> usize {
        self.line
    }
}

/**
The instruction stream under construction.  Instructions are appended to an
indexable list of numbered lines; a line may be reserved and filled in later,
once the target of the jump it will hold is known.  Comments and static data
directives are interleaved with the numbered lines in the order in which they
were emitted.
 */
#[derive(Debug, Default)]
pub struct Listing {
    items: Vec<Item>,
    lines: Vec<Slot>,
}

impl Listing {
    pub fn new() -> Listing {
        Listing {
            items: vec![],
            lines: vec![],
        }
    }

    /// The number that the next emitted or reserved line will get.
    pub fn next_line(&self) -> usize {
        self.lines.len()
    }

    pub fn emit(&mut self, inst: Inst, comment: &str) -> usize {
        let line = self.next_line();
        self.lines.push(Slot::Emitted(inst, comment.into()));
        self.items.push(Item::Line(line));
        line
    }

    pub fn comment(&mut self, text: &str) {
        self.items.push(Item::Comment(text.into()))
    }

    /// Declares a string constant: its length followed by its characters.
    pub fn string_data(&mut self, s: &str) {
        self.items.push(Item::Data(s.len()));
        self.items.push(Item::StringData(s.into()));
    }

    pub fn reserve(&mut self, what: &str) -> Reservation {
        let line = self.next_line();
        self.lines.push(Slot::Reserved(what.into()));
        self.items.push(Item::Line(line));
        Reservation { line }
    }

    /// Fills a reserved line with its final instruction.
    pub fn resolve(&mut self, res: Reservation, inst: Inst, comment: &str) {
        debug!("L{}: resolved to {}", res.line, inst.to_string().trim());
        self.lines[res.line] = Slot::Emitted(inst, comment.into());
    }

    /// The displacement that a jump placed on line `from` must use, relative
    /// to the program counter, to reach line `to`.  The program counter
    /// already points at the following line while the jump executes.
    pub fn displacement(from: usize, to: usize) -> Result<i32, CompilerError> {
        let overflow = || CompilerError::DisplacementOverflow(from, to);
        let next = i64::try_from(from)
            .ok()
            .and_then(|f| f.checked_add(1))
            .ok_or_else(overflow)?;
        let target = i64::try_from(to).map_err(|_| overflow())?;
        i32::try_from(target - next).map_err(|_| overflow())
    }

    /// An absolute line number or data address as an instruction operand.
    pub fn address(addr: usize) -> Result<i32, CompilerError> {
        i32::try_from(addr).map_err(|_| CompilerError::AddressOverflow(addr))
    }

    /// Completes the listing.  Fails if any reserved line was never resolved.
    pub fn finish(self) -> Result<Assembly, CompilerError> {
        let mut lines = vec![];
        for (idx, slot) in self.lines.into_iter().enumerate() {
            match slot {
                Slot::Emitted(inst, comment) => lines.push((inst, comment)),
                Slot::Reserved(what) => {
                    debug!("L{}: reserved for {} but never resolved", idx, what);
                    return Err(CompilerError::UnresolvedReservation(idx));
                }
            }
        }

        Ok(Assembly {
            items: self.items,
            lines,
        })
    }
}

/// A complete Tiny Machine program: every line holds an instruction.
#[derive(Debug)]
pub struct Assembly {
    items: Vec<Item>,
    lines: Vec<(Inst, String)>,
}

impl Assembly {
    /// The instructions in line number order.
    pub fn instructions(&self) -> impl Iterator<Item = Inst> + '_ {
        self.lines.iter().map(|(inst, _)| *inst)
    }

    pub fn instruction(&self, line: usize) -> Option<&Inst> {
        self.lines.get(line).map(|(inst, _)| inst)
    }

    pub fn comment(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(|(_, c)| c.as_str())
    }

    /// The string constants in declaration order.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|i| match i {
            Item::StringData(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn print(&self, output: &mut dyn std::io::Write) -> std::io::Result<()> {
        write!(output, "{}", self)
    }

    fn fmt_line(f: &mut std::fmt::Formatter<'_>, line: usize, inst: &Inst, comment: &str) -> std::fmt::Result {
        let text = format!("{:04}:{}", line, inst);
        if comment.is_empty() {
            f.write_fmt(format_args!("{}\n", text))
        } else {
            f.write_fmt(format_args!("{:<width$}{}\n", text, comment, width = COMMENT_COLUMN))
        }
    }
}

impl std::fmt::Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for item in &self.items {
            match item {
                Item::Line(line) => {
                    let (inst, comment) = &self.lines[*line];
                    Self::fmt_line(f, *line, inst, comment)?
                }
                Item::Comment(text) => f.write_fmt(format_args!(" * {}\n", text))?,
                Item::Data(len) => f.write_fmt(format_args!(".DATA {}\n", len))?,
                Item::StringData(s) => f.write_fmt(format_args!(".SDATA \"{}\"\n", s))?,
            }
        }
        Ok(())
    }
}
