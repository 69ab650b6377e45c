//! Writeback stage.

use crate::core::latches::{MemToWb, WbOut};

/// Produces the writeback output. `use_rd` is cleared whenever the
/// destination is `x0`, the latch is a bubble, or decode never asked for a
/// register write in the first place — in all three cases the driver must
/// skip the register-file write.
pub fn writeback(input: &MemToWb) -> WbOut {
    let use_rd = input.we && input.use_rd && input.rd != 0;
    WbOut {
        rd: input.rd,
        use_rd,
        value: input.result,
        we: input.we,
    }
}
