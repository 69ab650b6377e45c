//! Fetch stage.

use crate::core::latches::FtoDc;

/// Builds the Fetch -> Decode latch for `pc` given the instruction word the
/// caller has already pulled from the I-cache this cycle. A stalled or
/// squashed fetch is expressed by the caller never committing this value (or
/// clearing `we` afterward), not by this function — fetch itself has no
/// notion of stalling.
pub fn fetch(pc: u32, instruction: u32) -> FtoDc {
    FtoDc {
        pc,
        instruction,
        next_pc_fetch: pc.wrapping_add(4),
        we: true,
    }
}
