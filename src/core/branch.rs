//! Branch unit: decides whether a redirect happened this cycle and how much
//! of the front end must be squashed.
//!
//! Two resolution points feed this unit. `JAL` is resolved in Decode, which
//! only pollutes the instruction Fetch just issued (one bubble). Conditional
//! branches and `JALR` are resolved in Execute, which pollutes both the
//! instruction in Fetch and the one in Decode (two bubbles). Execute takes
//! priority when both fire in the same cycle, since it reflects an older
//! instruction in program order.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Redirect {
    pub taken: bool,
    pub target: u32,
    pub squash_fetch: bool,
    pub squash_decode: bool,
}

/// `decode_branch` is `(taken, target)` from a `JAL` resolved this cycle in
/// Decode; `execute_branch` is the same from a conditional branch or `JALR`
/// resolved in Execute.
pub fn resolve(decode_branch: (bool, u32), execute_branch: (bool, u32)) -> Redirect {
    let (ex_taken, ex_target) = execute_branch;
    if ex_taken {
        return Redirect { taken: true, target: ex_target, squash_fetch: true, squash_decode: true };
    }
    let (dc_taken, dc_target) = decode_branch;
    if dc_taken {
        return Redirect { taken: true, target: dc_target, squash_fetch: true, squash_decode: false };
    }
    Redirect::default()
}
