//! Cycle-accurate RV32I pipeline simulator.
//!
//! Models a 5-stage in-order pipeline (Fetch, Decode, Execute, Memory,
//! Writeback) with forwarding, load-use stalling, and two-level branch
//! redirection, sitting on a configurable 4-way set-associative write-back
//! cache hierarchy (split I$/D$ over one backing store).
//!
//! # Architecture
//!
//! * **Core**: 5-stage in-order pipeline, driven one clock at a time via
//!   [`core::Simulator::step`].
//! * **Memory**: one configurable instruction cache and one configurable
//!   data cache, each chained to a shared flat backing store.
//!
//! # Modules
//!
//! * `common`: register file and construction-time error type.
//! * `config`: TOML-backed configuration for cache geometry and memory size.
//! * `core`: the pipeline, its latches, hazard/branch units, and the
//!   memory-hierarchy units (ALU, cache, backing memory).
//! * `isa`: RV32I instruction field and immediate decoding.
//! * `stats`: per-run performance counters.

/// Register file and the construction-time error surface used throughout
/// the simulator.
pub mod common;

/// Configuration for cache geometry and backing memory size, loadable from
/// TOML or constructed directly.
pub mod config;

/// The pipeline driver: latches, hazard and branch units, pipeline stages,
/// and the memory hierarchy (ALU, cache, backing memory).
pub mod core;

/// RV32I instruction field and immediate decoding.
pub mod isa;

/// Per-run performance counters (cycles, retired instructions, cache
/// hits/misses, stalls, branch redirects).
pub mod stats;
