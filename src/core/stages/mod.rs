//! The five pipeline stage functions. Each is a pure combinational function
//! from an input latch (and the register file, for decode) to an output
//! latch; none of them touch the cache or the program counter directly —
//! that orchestration belongs to [`crate::core::Simulator::step`].

pub mod decode;
pub mod execute;
pub mod fetch;
pub mod memory_access;
pub mod write_back;
