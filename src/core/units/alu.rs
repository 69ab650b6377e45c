//! Integer ALU: the arithmetic/logical/comparison core shared by OP and
//! OP-IMM. Shift amounts are masked to 5 bits; `SUB`/`SRA` are selected by
//! `funct7` bit 5, but only for register-register (`OP`) encodings — the
//! immediate forms have no `SUBI`, and `funct7`'s bit 5 for an `OP-IMM`
//! `ADD_SUB` slot is just part of the already-sign-extended immediate.

use crate::isa::funct3 as f3;
use crate::isa::opcode;

/// Evaluates the OP/OP-IMM ALU operation selected by `funct3`/`funct7` for
/// the given opcode, returning the 32-bit result.
pub fn compute(op_code: u32, funct3: u32, funct7: u32, lhs: i32, rhs: i32) -> i32 {
    let arithmetic_variant = op_code == opcode::OP && funct7 & 0x20 != 0;
    let shift_arithmetic = funct7 & 0x20 != 0;
    match funct3 {
        f3::ADD_SUB => {
            if arithmetic_variant {
                lhs.wrapping_sub(rhs)
            } else {
                lhs.wrapping_add(rhs)
            }
        }
        f3::SLL => lhs.wrapping_shl((rhs as u32) & 0x1f),
        f3::SLT => (lhs < rhs) as i32,
        f3::SLTU => ((lhs as u32) < (rhs as u32)) as i32,
        f3::XOR => lhs ^ rhs,
        f3::SRL_SRA => {
            let shamt = (rhs as u32) & 0x1f;
            if shift_arithmetic {
                lhs.wrapping_shr(shamt)
            } else {
                ((lhs as u32).wrapping_shr(shamt)) as i32
            }
        }
        f3::OR => lhs | rhs,
        f3::AND => lhs & rhs,
        _ => 0,
    }
}

/// Evaluates a branch condition for `funct3` against `lhs`/`rhs` (the values
/// of `rs1`/`rs2`), signed or unsigned per the opcode's encoding.
pub fn branch_taken(funct3: u32, lhs: i32, rhs: i32) -> bool {
    match funct3 {
        f3::BEQ => lhs == rhs,
        f3::BNE => lhs != rhs,
        f3::BLT => lhs < rhs,
        f3::BGE => lhs >= rhs,
        f3::BLTU => (lhs as u32) < (rhs as u32),
        f3::BGEU => (lhs as u32) >= (rhs as u32),
        _ => false,
    }
}
