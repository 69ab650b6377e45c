//! Stress tests exercising the register file, ALU, cache, and full pipeline
//! over larger inputs and longer-running programs than the focused tests
//! elsewhere in this suite.

use riscv_pipeline_sim::common::RegisterFile;
use riscv_pipeline_sim::config::CacheConfig;
use riscv_pipeline_sim::core::units::alu::compute;
use riscv_pipeline_sim::core::units::cache::Cache;
use riscv_pipeline_sim::core::units::memory::BackingMemory;
use riscv_pipeline_sim::core::units::memory_interface::{MemMask, MemOpType, MemoryInterface};
use riscv_pipeline_sim::core::Simulator;
use riscv_pipeline_sim::config::Config;
use riscv_pipeline_sim::isa::{funct3, opcode};

const FUNCT7_ALT: u32 = 0x20;

fn encode_i(opc: u32, rd: u8, funct3: u32, rs1: u8, imm: i32) -> u32 {
    opc | ((rd as u32) << 7) | (funct3 << 12) | ((rs1 as u32) << 15) | ((imm as u32) << 20)
}

fn encode_r(opc: u32, rd: u8, funct3: u32, rs1: u8, rs2: u8, f7: u32) -> u32 {
    opc | ((rd as u32) << 7) | (funct3 << 12) | ((rs1 as u32) << 15) | ((rs2 as u32) << 20) | (f7 << 25)
}

fn program(words: &[u32]) -> Simulator {
    let mut sim = Simulator::new(Config::default()).unwrap();
    for (i, w) in words.iter().enumerate() {
        sim.write_memory_word(i, *w);
    }
    sim
}

fn run(sim: &mut Simulator, cycles: usize) {
    for _ in 0..cycles {
        sim.step(false);
    }
}

#[test]
fn register_file_holds_every_register_independently_under_full_occupancy() {
    let mut regs = RegisterFile::new();
    for i in 0u8..32 {
        regs.write(i, (i as i32).wrapping_mul(0x1111_1111));
    }
    for i in 1u8..32 {
        assert_eq!(regs.read(i), (i as i32).wrapping_mul(0x1111_1111));
    }
    assert_eq!(regs.read(0), 0, "x0 must never hold a written value");
}

#[test]
fn alu_sll_handles_every_shift_amount_without_panicking() {
    for shift in 0u32..32 {
        let out = compute(opcode::OP_IMM, funct3::SLL, 0, 1, shift as i32);
        assert_eq!(out, 1i32 << shift);
    }
}

#[test]
fn cache_handles_many_sequential_distinct_lines_without_losing_data() {
    // 4 words/line, 8 sets, 2 ways -> 64 lines; walk far more distinct lines
    // than fit resident at once to force a long churn of evictions.
    let config = CacheConfig { interface_size: 4, line_size: 16, set_size: 8 };
    let mut cache = Cache::new(config, Box::new(BackingMemory::new(1 << 16))).unwrap();

    let stride = 16u32; // one line apart, walks through every set in turn
    for i in 0..200u32 {
        let addr = i * stride;
        loop {
            let (_, wait) = cache.process(addr, MemMask::Word, MemOpType::Store, i);
            if !wait {
                break;
            }
        }
    }

    // Re-read the most recent handful: these must still be resident or, if
    // evicted, must come back from the write-back path with the right value.
    for i in 190..200u32 {
        let addr = i * stride;
        let out = loop {
            let (out, wait) = cache.process(addr, MemMask::Word, MemOpType::Load, 0);
            if !wait {
                break out;
            }
        };
        assert_eq!(out, i, "line {i} must still carry the value it was stored with");
    }

    assert!(cache.accesses >= 210);
}

#[test]
fn a_word_spanning_cache_line_fills_every_slot_with_distinct_correct_data() {
    // Interface narrower than the line forces a multi-beat fill; every word
    // in the line must come back byte-exact, not shifted or zeroed.
    let config = CacheConfig { interface_size: 4, line_size: 16, set_size: 4 };
    let mut backing = BackingMemory::new(4096);
    for w in 0..4u32 {
        backing.write_word(w as usize, 0x1000 + w);
    }
    let mut cache = Cache::new(config, Box::new(backing)).unwrap();

    for w in 0..4u32 {
        let addr = w * 4;
        let out = loop {
            let (out, wait) = cache.process(addr, MemMask::Word, MemOpType::Load, 0);
            if !wait {
                break out;
            }
        };
        assert_eq!(out, 0x1000 + w, "word {w} of a freshly filled line must match backing store");
    }
}

#[test]
fn long_running_arithmetic_chain_accumulates_correctly_across_hundreds_of_cycles() {
    // x1 starts at 0 and gets incremented 40 times through a sequence of
    // forwarding-chained ADDs, each depending on the previous instruction's
    // result, stressing sustained EX-to-EX forwarding over a long run.
    let mut words = Vec::new();
    words.push(encode_i(opcode::OP_IMM, 1, funct3::ADD_SUB, 0, 0));
    for _ in 0..40 {
        words.push(encode_r(opcode::OP, 1, funct3::ADD_SUB, 1, 2, 0));
    }
    // x2 = 1, placed after the chain so it stays zero until this point,
    // meaning every add above actually adds zero; reorder so x2 is set first.
    let mut program_words = vec![encode_i(opcode::OP_IMM, 2, funct3::ADD_SUB, 0, 1)];
    program_words.extend(words);

    let mut sim = program(&program_words);
    run(&mut sim, 500);
    assert_eq!(sim.regs.read(1), 40);
}

#[test]
fn repeated_register_subtract_eventually_underflows_and_wraps() {
    // x1 = 2 ; SUB x1,x1,x2 (x2=5) repeated three times: 2-5-5-5 wraps i32.
    let mut sim = program(&[
        encode_i(opcode::OP_IMM, 2, funct3::ADD_SUB, 0, 5),
        encode_i(opcode::OP_IMM, 1, funct3::ADD_SUB, 0, 2),
        encode_r(opcode::OP, 1, funct3::ADD_SUB, 1, 2, FUNCT7_ALT),
        encode_r(opcode::OP, 1, funct3::ADD_SUB, 1, 2, FUNCT7_ALT),
        encode_r(opcode::OP, 1, funct3::ADD_SUB, 1, 2, FUNCT7_ALT),
    ]);
    run(&mut sim, 100);
    assert_eq!(sim.regs.read(1), 2i32.wrapping_sub(15));
}

#[test]
fn a_long_backward_loop_with_memory_traffic_each_iteration_terminates_with_the_right_totals() {
    // x3 = data base (word-aligned) ; x1 = loop counter ; x4 = running sum
    // each iteration: store x1 to [x3], load it back into x5, add into x4,
    // increment x1, branch back while x1 != 20.
    let data_base = 4000i32;
    let mut sim = program(&[
        encode_i(opcode::OP_IMM, 3, funct3::ADD_SUB, 0, data_base), // 0
        encode_i(opcode::OP_IMM, 1, funct3::ADD_SUB, 0, 0),         // 1: x1 = 0
        encode_i(opcode::OP_IMM, 4, funct3::ADD_SUB, 0, 0),         // 2: x4 = 0
        encode_i(opcode::OP_IMM, 6, funct3::ADD_SUB, 0, 20),        // 3: x6 = 20 (loop bound)
        // loop: word 4
        {
            opcode::STORE
                | (0u32 << 7)
                | (funct3::WORD << 12)
                | ((3u32) << 15)
                | ((1u32) << 20)
                | (0u32 << 25)
        }, // 4: SW x1, 0(x3)
        encode_i(opcode::LOAD, 5, funct3::WORD, 3, 0),  // 5: LW x5, 0(x3)
        encode_r(opcode::OP, 4, funct3::ADD_SUB, 4, 5, 0), // 6: x4 += x5
        encode_i(opcode::OP_IMM, 1, funct3::ADD_SUB, 1, 1), // 7: x1 += 1
        // BNE x1,x6,loop : loop starts at byte 16 (word 4), this branch is
        // word 8 (byte 32) -> imm = 16 - 32 = -16.
        {
            let imm: i32 = -16;
            let u = imm as u32;
            let bit12 = (u >> 12) & 1;
            let bit11 = (u >> 11) & 1;
            let bits10_5 = (u >> 5) & 0x3f;
            let bits4_1 = (u >> 1) & 0xf;
            (bit12 << 31)
                | (bits10_5 << 25)
                | ((6u32) << 20)
                | ((1u32) << 15)
                | (funct3::BNE << 12)
                | (bits4_1 << 8)
                | (bit11 << 7)
                | opcode::BRANCH
        }, // 8
        encode_i(opcode::OP_IMM, 7, funct3::ADD_SUB, 0, 1), // 9: x7 = 1 (loop exited)
    ]);
    run(&mut sim, 2000);
    assert_eq!(sim.regs.read(1), 20);
    assert_eq!(sim.regs.read(4), (0..20).sum::<i32>());
    assert_eq!(sim.regs.read(7), 1);
}
