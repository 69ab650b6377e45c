//! Execution units and the memory hierarchy's request interface.

/// Integer ALU and branch-condition evaluation.
pub mod alu;

/// Set-associative, write-back cache.
pub mod cache;

/// Flat backing memory (realistic and zero-latency variants).
pub mod memory;

/// The `MemoryInterface` trait shared by every level of the hierarchy.
pub mod memory_interface;
