//! Hazard unit: per-cycle forwarding selectors and the load-use stall.
//!
//! Runs against the tentative (pre-commit) outputs of Execute, Memory, and
//! Writeback for the instruction currently being decoded. Priority is
//! nearest-producer-wins (EX > MEM > WB); a producer in EX that is itself a
//! load cannot forward (its value isn't ready yet) and instead forces a
//! one-cycle stall of Fetch and Decode.

use crate::core::latches::{DcToEx, ExToMem, MemToWb, WbOut};

/// Where a decode operand's value should come from, after accounting for
/// in-flight producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Forward {
    #[default]
    None,
    Ex,
    Mem,
    Wb,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HazardResult {
    /// True exactly on a load-use hazard: freeze Fetch and Decode, and the
    /// driver must inject a bubble into the newly latched Decode -> Execute
    /// register (not just hold it).
    pub stall: bool,
    pub forward_rs1: Forward,
    pub forward_rs2: Forward,
    pub forward_rs3: Forward,
}

fn resolve_operand(used: bool, reg: u8, ex: &ExToMem, mem: &MemToWb, wb: &WbOut) -> (Forward, bool) {
    if !used || reg == 0 {
        return (Forward::None, false);
    }
    if ex.we && ex.use_rd && ex.rd == reg {
        if ex.is_long_instruction {
            return (Forward::None, true);
        }
        return (Forward::Ex, false);
    }
    if mem.we && mem.use_rd && mem.rd == reg {
        return (Forward::Mem, false);
    }
    if wb.we && wb.use_rd && wb.rd == reg {
        return (Forward::Wb, false);
    }
    (Forward::None, false)
}

/// Computes forwarding selectors and the load-use stall for the decode
/// operands in `decode_temp`, given this cycle's tentative Execute/Memory/
/// Writeback outputs.
pub fn resolve(decode_temp: &DcToEx, ex: &ExToMem, mem: &MemToWb, wb: &WbOut) -> HazardResult {
    let (f1, s1) = resolve_operand(decode_temp.use_rs1, decode_temp.rs1, ex, mem, wb);
    let (f2, s2) = resolve_operand(decode_temp.use_rs2, decode_temp.rs2, ex, mem, wb);
    let (f3, s3) = resolve_operand(decode_temp.use_rs3, decode_temp.rs3, ex, mem, wb);

    HazardResult {
        stall: s1 || s2 || s3,
        forward_rs1: f1,
        forward_rs2: f2,
        forward_rs3: f3,
    }
}
