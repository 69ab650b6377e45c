//! Integration tests for the architectural register file and configuration.

use riscv_pipeline_sim::common::RegisterFile;
use riscv_pipeline_sim::config::{CacheConfig, Config, MemoryConfig};
use riscv_pipeline_sim::core::Simulator;

#[test]
fn register_file_hardwires_x0_to_zero() {
    let mut regs = RegisterFile::new();
    regs.write(0, 0xDEAD_BEEFu32 as i32);
    assert_eq!(regs.read(0), 0);
}

#[test]
fn register_file_tracks_every_other_register_independently() {
    let mut regs = RegisterFile::new();
    for i in 1u8..32 {
        regs.write(i, i as i32 * 10);
    }
    for i in 1u8..32 {
        assert_eq!(regs.read(i), i as i32 * 10);
    }
}

#[test]
fn default_config_is_valid() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn simulator_construction_rejects_bad_cache_geometry() {
    let config = Config {
        icache: CacheConfig { interface_size: 4, line_size: 12, set_size: 64 },
        ..Config::default()
    };
    assert!(Simulator::new(config).is_err());
}

#[test]
fn simulator_construction_rejects_empty_memory() {
    let config = Config {
        memory: MemoryConfig { words: 0 },
        ..Config::default()
    };
    assert!(Simulator::new(config).is_err());
}

#[test]
fn freshly_constructed_simulator_starts_at_pc_zero_with_zeroed_registers() {
    let sim = Simulator::new(Config::default()).unwrap();
    assert_eq!(sim.pc, 0);
    for i in 0u8..32 {
        assert_eq!(sim.regs.read(i), 0);
    }
}
