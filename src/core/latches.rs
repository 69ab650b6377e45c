//! Pipeline latches: the five inter-stage registers.
//!
//! Every latch carries a `we` bit. When clear, the latch is a bubble: every
//! stage downstream of it must treat the slot as a nop producing no branch,
//! no register write, and no memory access. `Default` gives every field its
//! zero value and `we = false`, so a freshly constructed latch is already a
//! valid bubble — this is exactly what the simulator starts with at cycle 0.

/// Fetch -> Decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FtoDc {
    pub pc: u32,
    pub instruction: u32,
    pub next_pc_fetch: u32,
    pub we: bool,
}

/// Decode -> Execute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DcToEx {
    pub pc: u32,
    pub instruction: u32,
    pub op_code: u32,
    pub funct3: u32,
    pub funct7: u32,
    pub rs1: u8,
    pub rs2: u8,
    /// Store-data source register; aliases `rs2` for stores so the hazard
    /// unit can forward into the store's data operand independently of
    /// whether `rs2` itself is consumed (stores don't set `use_rs2`).
    pub rs3: u8,
    pub rd: u8,
    pub use_rs1: bool,
    pub use_rs2: bool,
    pub use_rs3: bool,
    pub use_rd: bool,
    pub lhs: i32,
    pub rhs: i32,
    pub datac: i32,
    pub next_pc_dc: u32,
    pub is_branch: bool,
    pub we: bool,
}

/// Execute -> Memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExToMem {
    pub pc: u32,
    pub instruction: u32,
    pub op_code: u32,
    pub funct3: u32,
    pub result: i32,
    pub rd: u8,
    pub use_rd: bool,
    pub datac: i32,
    pub next_pc: u32,
    pub is_branch: bool,
    /// Set only for loads; the hazard unit's sole load-use stall trigger.
    pub is_long_instruction: bool,
    pub we: bool,
}

/// Memory -> Writeback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemToWb {
    pub rd: u8,
    pub use_rd: bool,
    pub result: i32,
    pub address: u32,
    pub value_to_write: i32,
    pub byte_enable: u8,
    pub is_load: bool,
    pub is_store: bool,
    pub we: bool,
}

/// Writeback output. Not fed into any further stage; kept around purely so
/// the last committed writeback is inspectable, matching the source's own
/// latch enumeration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WbOut {
    pub rd: u8,
    pub use_rd: bool,
    pub value: i32,
    pub we: bool,
}
