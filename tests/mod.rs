//! Test module organization.
//!
//! Each sibling file (`alu_tests.rs`, `arch_tests.rs`, ...) is its own
//! cargo-discovered integration test binary; this file is not wired into
//! any of them (cargo excludes `mod.rs` from test-target discovery) and
//! exists purely as an index for readers.


/// Register-file and configuration tests.
mod arch_tests;






/// Stress tests covering longer-running programs.
mod stress_tests;
