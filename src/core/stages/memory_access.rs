//! Memory stage: stages the D-cache request parameters for the driver to
//! issue. This function never touches the cache itself — it only decides,
//! from the ALU result and opcode, whether this is a load, a store, or
//! neither, and what address/value/mask to present.

use crate::core::latches::{ExToMem, MemToWb};
use crate::core::units::memory_interface::MemMask;
use crate::isa::{funct3, opcode};

/// Maps a load/store `funct3` field to the access width/sign-mode the
/// memory interface expects.
pub fn mask_from_funct3(funct3: u32) -> MemMask {
    match funct3 {
        self::funct3::BYTE => MemMask::Byte,
        self::funct3::HALF => MemMask::Half,
        self::funct3::WORD => MemMask::Word,
        self::funct3::BYTE_U => MemMask::ByteU,
        self::funct3::HALF_U => MemMask::HalfU,
        _ => MemMask::Word,
    }
}

pub fn memory_stage(input: &ExToMem) -> MemToWb {
    let is_load = input.we && input.op_code == opcode::LOAD;
    let is_store = input.we && input.op_code == opcode::STORE;

    MemToWb {
        rd: input.rd,
        use_rd: input.we && input.use_rd,
        result: input.result,
        address: input.result as u32,
        value_to_write: input.datac,
        byte_enable: 0xF,
        is_load,
        is_store,
        we: input.we,
    }
}
