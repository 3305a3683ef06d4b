use std::collections::VecDeque;

use super::{Assembly, Inst, Opcode, Operands};

const STEP_LIMIT: usize = 1_000_000;

/**
Executes an [`Assembly`] the way the Tiny Machine does, so that generated
code can be checked by what it prints.  Memory cell 0 holds the highest
address and string constants are loaded from address 1 upwards.
 */
pub struct Machine {
    imem: Vec<Inst>,
    dmem: Vec<i64>,
    reg: [i64; 8],
    input: VecDeque<i64>,
    output: String,
    steps: usize,
}

impl Machine {
    pub fn load(asm: &Assembly, memory_size: usize) -> Machine {
        let mut dmem = vec![0; memory_size];
        dmem[0] = (memory_size - 1) as i64;

        let mut addr = 1;
        for s in asm.strings() {
            dmem[addr] = s.len() as i64;
            for (i, c) in s.bytes().enumerate() {
                dmem[addr + 1 + i] = c as i64;
            }
            addr += s.len() + 1;
        }

        Machine {
            imem: asm.instructions().collect(),
            dmem,
            reg: [0; 8],
            input: VecDeque::new(),
            output: String::new(),
            steps: 0,
        }
    }

    pub fn with_input(mut self, input: &[i64]) -> Machine {
        self.input.extend(input.iter().copied());
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn memory(&self, addr: usize) -> i64 {
        self.dmem[addr]
    }

    pub fn register(&self, idx: usize) -> i64 {
        self.reg[idx]
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Runs until the machine halts.
    pub fn run(&mut self) -> Result<(), String> {
        loop {
            if self.steps >= STEP_LIMIT {
                return Err("step limit reached".into());
            }
            self.steps += 1;

            let pc = self.reg[7];
            let inst = *usize::try_from(pc)
                .ok()
                .and_then(|pc| self.imem.get(pc))
                .ok_or(format!("pc {} is outside of instruction memory", pc))?;
            self.reg[7] = pc + 1;

            let r = inst.r().index();
            match inst.operands() {
                Operands::Registers(s, t) => {
                    let (s, t) = (self.reg[s.index()], self.reg[t.index()]);
                    match inst.op() {
                        Opcode::Halt => return Ok(()),
                        Opcode::In | Opcode::InB => {
                            self.reg[r] = self.input.pop_front().ok_or("input exhausted")?
                        }
                        Opcode::Out => self.output.push_str(&self.reg[r].to_string()),
                        Opcode::OutB => self
                            .output
                            .push_str(if self.reg[r] != 0 { "true" } else { "false" }),
                        Opcode::OutC => self.output.push(self.reg[r] as u8 as char),
                        Opcode::OutNl => self.output.push('\n'),
                        Opcode::Add => self.reg[r] = s + t,
                        Opcode::Sub => self.reg[r] = s - t,
                        Opcode::Mul => self.reg[r] = s * t,
                        Opcode::Div => {
                            if t == 0 {
                                return Err(format!("division by zero at line {}", pc));
                            }
                            self.reg[r] = s / t
                        }
                        op => return Err(format!("{} given register operands", op)),
                    }
                }
                Operands::Memory(d, s) => {
                    let a = d as i64 + self.reg[s.index()];
                    let v = self.reg[r];
                    match inst.op() {
                        Opcode::Ld => self.reg[r] = self.dmem[self.data_addr(a, pc)?],
                        Opcode::Lda => self.reg[r] = a,
                        Opcode::Ldc => self.reg[r] = d as i64,
                        Opcode::St => {
                            let a = self.data_addr(a, pc)?;
                            self.dmem[a] = v
                        }
                        Opcode::Jlt if v < 0 => self.reg[7] = a,
                        Opcode::Jle if v <= 0 => self.reg[7] = a,
                        Opcode::Jeq if v == 0 => self.reg[7] = a,
                        Opcode::Jne if v != 0 => self.reg[7] = a,
                        Opcode::Jge if v >= 0 => self.reg[7] = a,
                        Opcode::Jgt if v > 0 => self.reg[7] = a,
                        op if op.is_jump() => (),
                        op => return Err(format!("{} given a memory operand", op)),
                    }
                }
            }
        }
    }

    fn data_addr(&self, a: i64, pc: i64) -> Result<usize, String> {
        usize::try_from(a)
            .ok()
            .filter(|a| *a < self.dmem.len())
            .ok_or(format!("address {} out of data memory at line {}", a, pc))
    }
}
