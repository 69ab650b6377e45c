//! Decode stage: splits the instruction word into its positional fields,
//! reconstructs the RV32I immediate encodings, reads the register file, and
//! dispatches on opcode to populate the ALU/branch operands and the
//! producer/consumer control bits the hazard unit needs.

use crate::common::reg::RegisterFile;
use crate::core::latches::{DcToEx, FtoDc};
use crate::isa::{fields, funct3, imm_b, imm_i, imm_j, imm_s, imm_u, opcode};

/// Decodes `input` against the architectural register file snapshot `regs`.
///
/// If `input.we` is clear (a bubble arriving from Fetch), every
/// consumer/producer bit and `is_branch` is forced to zero, regardless of
/// what the (meaningless) instruction bits would otherwise decode to.
pub fn decode(input: &FtoDc, regs: &RegisterFile) -> DcToEx {
    let mut out = DcToEx {
        pc: input.pc,
        instruction: input.instruction,
        we: input.we,
        ..Default::default()
    };

    if !input.we {
        return out;
    }

    let f = fields(input.instruction);
    out.op_code = f.op_code;
    out.funct3 = f.funct3;
    out.funct7 = f.funct7;
    out.rs1 = f.rs1;
    out.rs2 = f.rs2;
    out.rd = f.rd;

    let read1 = regs.read(f.rs1);
    let read2 = regs.read(f.rs2);

    match f.op_code {
        opcode::LUI => {
            out.lhs = imm_u(input.instruction);
            out.rhs = 0;
            out.use_rd = true;
        }
        opcode::AUIPC => {
            out.lhs = input.pc as i32;
            out.rhs = imm_u(input.instruction);
            out.use_rd = true;
        }
        opcode::JAL => {
            out.lhs = input.pc.wrapping_add(4) as i32;
            out.next_pc_dc = (input.pc as i32).wrapping_add(imm_j(input.instruction)) as u32;
            out.is_branch = true;
            out.use_rd = true;
        }
        opcode::JALR => {
            out.lhs = read1;
            out.rhs = imm_i(input.instruction);
            out.use_rs1 = true;
            out.use_rd = true;
        }
        opcode::BRANCH => {
            out.lhs = read1;
            out.rhs = read2;
            out.datac = imm_b(input.instruction);
            out.use_rs1 = true;
            out.use_rs2 = true;
        }
        opcode::LOAD => {
            out.lhs = read1;
            out.rhs = imm_i(input.instruction);
            out.use_rs1 = true;
            out.use_rd = true;
        }
        opcode::STORE => {
            out.lhs = read1;
            out.rhs = imm_s(input.instruction);
            out.datac = read2;
            out.rs3 = f.rs2;
            out.use_rs1 = true;
            out.use_rs3 = true;
        }
        opcode::OP_IMM => {
            out.lhs = read1;
            out.rhs = imm_i(input.instruction);
            out.use_rs1 = true;
            out.use_rd = true;
        }
        opcode::OP => {
            out.lhs = read1;
            out.rhs = read2;
            out.use_rs1 = true;
            out.use_rs2 = true;
            // The M-extension (funct7 = 0b0000001) is stubbed at execute: it
            // produces no defined result. Decode gates `use_rd` off for it so
            // a stub never writes garbage into the register file (see
            // DESIGN.md for the open-question resolution).
            out.use_rd = f.funct7 & 0x7f != 0x01;
        }
        opcode::MISC_MEM => {
            // fence: nop.
        }
        opcode::SYSTEM => {
            match f.funct3 {
                funct3::CSRRW | funct3::CSRRS | funct3::CSRRC => {
                    out.lhs = read1;
                    out.use_rs1 = true;
                    out.use_rd = f.rd != 0;
                }
                funct3::CSRRWI | funct3::CSRRSI | funct3::CSRRCI => {
                    out.lhs = f.rs1 as i32; // zimm
                    out.use_rd = f.rd != 0;
                }
                _ => {
                    // ECALL / EBREAK: nop. Host-side syscall handling is an
                    // external collaborator.
                }
            }
        }
        _ => {
            // Undefined opcode: silently treated as a nop, matching the
            // "no illegal-instruction trap" design.
        }
    }

    if out.rd == 0 {
        out.use_rd = false;
    }

    out
}
