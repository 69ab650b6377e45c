//! The simulator driver: ties the register file, the five pipeline latches,
//! the hazard and branch units, and the I/D cache pair together into one
//! `step` per simulated clock.
//!
//! Everything in [`stages`], [`hazard`], and [`branch`] is a pure function;
//! this module is the only place that owns mutable state and decides, each
//! cycle, which of those pure results actually get committed. See
//! `DESIGN.md` for the commit-ordering rationale (pre-commit reads, atomic
//! end-of-cycle writes, retroactive branch squash).

pub mod branch;
pub mod hazard;
pub mod latches;
pub mod stages;
pub mod units;

use tracing::{debug, trace};

use crate::common::error::SimError;
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::stats::SimStats;

use hazard::Forward;
use latches::{DcToEx, ExToMem, FtoDc, MemToWb, WbOut};
use units::cache::Cache;
use units::memory::{BackingMemory, SharedBacking};
use units::memory_interface::{MemMask, MemOpType};

/// The five-stage pipeline plus its memory hierarchy, as one inspectable,
/// steppable object.
///
/// The I-cache and D-cache are independent [`Cache`] instances chained to
/// the same [`SharedBacking`] handle, modeling a split front end over a
/// unified address space (a store the D-cache later writes back is visible
/// to a later I-cache fill at the same address).
pub struct Simulator {
    pub regs: RegisterFile,
    pub pc: u32,

    pub ftodc: FtoDc,
    pub dctoex: DcToEx,
    pub extomem: ExToMem,
    pub memtowb: MemToWb,
    pub wbout: WbOut,

    pub icache: Cache,
    pub dcache: Cache,
    backing: SharedBacking,

    pub stats: SimStats,
}

impl Simulator {
    /// Builds a simulator from `config`: a zeroed backing memory sized per
    /// `config.memory`, an I-cache and a D-cache (per `config.icache` /
    /// `config.dcache`) chained to it, a zeroed register file, PC at 0, and
    /// every latch a bubble.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        let backing = SharedBacking::new(BackingMemory::new(config.memory.words));
        let icache = Cache::new(config.icache, Box::new(backing.handle()))?;
        let dcache = Cache::new(config.dcache, Box::new(backing.handle()))?;

        debug!(
            icache_line = config.icache.line_size,
            icache_sets = config.icache.set_size,
            dcache_line = config.dcache.line_size,
            dcache_sets = config.dcache.set_size,
            memory_words = config.memory.words,
            "simulator constructed"
        );

        Ok(Self {
            regs: RegisterFile::new(),
            pc: 0,
            ftodc: FtoDc::default(),
            dctoex: DcToEx::default(),
            extomem: ExToMem::default(),
            memtowb: MemToWb::default(),
            wbout: WbOut::default(),
            icache,
            dcache,
            backing,
            stats: SimStats::default(),
        })
    }

    /// Out-of-band word write into the shared backing store, for seeding
    /// program/data memory. Bypasses cache and pipeline timing entirely (it
    /// is not a simulated cycle).
    pub fn write_memory_word(&self, word_index: usize, value: u32) {
        self.backing.write_word(word_index, value);
    }

    /// Out-of-band word read from the shared backing store. See
    /// [`Simulator::write_memory_word`].
    pub fn read_memory_word(&self, word_index: usize) -> u32 {
        self.backing.read_word(word_index)
    }

    /// Advances every piece of state by exactly one clock.
    ///
    /// `external_stall` is a caller-supplied global backpressure signal
    /// (e.g. a multi-core harness serializing shared resources); when set,
    /// every latch and the PC freeze for the cycle exactly as they do for
    /// an I-cache or D-cache miss.
    pub fn step(&mut self, external_stall: bool) {
        // 1. Evaluate every stage from the current (pre-commit) state. Each
        // reads only `self.<latch>`, never another stage's temporary.
        let (instruction, stall_im) = self.icache.process(self.pc, MemMask::Word, MemOpType::Load, 0);
        let fetch_temp = stages::fetch::fetch(self.pc, instruction);
        let decode_temp = stages::decode::decode(&self.ftodc, &self.regs);
        let execute_temp = stages::execute::execute(&self.dctoex);
        let memory_temp = stages::memory_access::memory_stage(&self.extomem);
        let writeback_temp = stages::write_back::writeback(&self.memtowb);

        trace!(
            pc = self.pc,
            instruction,
            dc_pc = self.ftodc.pc,
            ex_pc = self.dctoex.pc,
            mem_pc = self.extomem.pc,
            "stage evaluation"
        );

        // 2. Hazard unit: forwarding selectors and the load-use stall for
        // the instruction now sitting in decode, against this cycle's EX /
        // MEM / WB producers.
        let hazard = hazard::resolve(&decode_temp, &execute_temp, &memory_temp, &writeback_temp);

        // 3. D-cache request, derived from the *committed* ExtoMem's
        // funct3 (the mask a newly-latched ExtoMem would carry isn't valid
        // until it commits below).
        let mask = stages::memory_access::mask_from_funct3(self.extomem.funct3);
        let issue_dcache = memory_temp.we && (memory_temp.is_load || memory_temp.is_store);
        let (dcache_out, stall_dm) = if issue_dcache {
            let op = if memory_temp.is_load { MemOpType::Load } else { MemOpType::Store };
            self.dcache
                .process(memory_temp.address, mask, op, memory_temp.value_to_write as u32)
        } else {
            (0, false)
        };

        if stall_im {
            debug!(pc = self.pc, "icache miss in progress, freezing front end");
        }
        if stall_dm {
            debug!(addr = memory_temp.address, "dcache busy, freezing pipeline");
        }

        let stall_all = stall_im || stall_dm || external_stall;

        // 4. Commit latches. FtoDc and DcToEx are gated by the load-use
        // stall as well as the pipeline-wide freeze; ExtoMem/MemToWb/WbOut
        // only by the pipeline-wide freeze, so older in-flight instructions
        // keep draining while a load-use bubble sits behind them.
        if !hazard.stall && !stall_all {
            self.ftodc = fetch_temp.clone();
        }

        // The value a MEM-stage producer actually hands forward: for a load
        // this is the word the D-cache just returned, not the effective
        // address `memory_stage` staged into `result` before the cache was
        // issued. Both forwarding and the committed `MemToWb` must agree on
        // this, so it is computed once and shared by both.
        let mut memtowb_temp = memory_temp.clone();
        memtowb_temp.result = if memory_temp.is_load {
            dcache_out as i32
        } else {
            memory_temp.result
        };

        if !stall_all {
            if hazard.stall {
                // Bubble injected into Execute; the decode that triggered
                // the hazard stays put (re-decoded next cycle, since
                // `ftodc` above was also held back).
                self.dctoex = DcToEx::default();
            } else {
                self.dctoex = decode_temp.clone();
                apply_forwarding(&mut self.dctoex, &hazard, &execute_temp, &memtowb_temp, &writeback_temp);
            }

            self.extomem = execute_temp.clone();
            self.memtowb = memtowb_temp;
            let wbout_new = stages::write_back::writeback(&self.memtowb);
            self.wbout = wbout_new.clone();

            if wbout_new.we {
                self.stats.instructions_retired += 1;
            }
            if wbout_new.use_rd {
                self.regs.write(wbout_new.rd, wbout_new.value);
            }
        }

        if hazard.stall || stall_all {
            self.stats.stall_cycles += 1;
        }

        // 5. Branch unit: redirect priority execute > decode > sequential.
        let redirect = branch::resolve(
            (decode_temp.we && decode_temp.is_branch, decode_temp.next_pc_dc),
            (execute_temp.we && execute_temp.is_branch, execute_temp.next_pc),
        );

        if redirect.taken && !stall_all {
            if redirect.squash_fetch {
                self.ftodc.we = false;
            }
            if redirect.squash_decode {
                self.dctoex.we = false;
            }
            self.pc = redirect.target;
            self.stats.branch_mispredicts += 1;
        } else if !stall_all && !hazard.stall {
            self.pc = fetch_temp.next_pc_fetch;
        }

        // 6. Bookkeeping.
        self.stats.cycles += 1;
        self.stats.icache_misses = self.icache.misses;
        self.stats.icache_hits = self.icache.accesses - self.icache.misses;
        self.stats.dcache_misses = self.dcache.misses;
        self.stats.dcache_hits = self.dcache.accesses - self.dcache.misses;
    }
}

/// Overwrites `dctoex`'s operand fields with the forwarded producer value
/// selected by `hazard`, for each slot whose producer is itself a valid
/// (`we = true`) instruction. Applied once, immediately after `dctoex` is
/// freshly latched from this cycle's decode output.
///
/// `mem` must be the MEM-stage latch *after* the D-cache result has been
/// folded into `result` for loads (see `memtowb_temp` in `step`) — forwarding
/// a load's pre-cache `result` would hand the consumer the effective address
/// instead of the loaded word.
fn apply_forwarding(
    dctoex: &mut DcToEx,
    hazard: &hazard::HazardResult,
    ex: &ExToMem,
    mem: &MemToWb,
    wb: &WbOut,
) {
    if let Some(v) = forwarded_value(hazard.forward_rs1, ex, mem, wb) {
        dctoex.lhs = v;
    }
    if let Some(v) = forwarded_value(hazard.forward_rs2, ex, mem, wb) {
        dctoex.rhs = v;
    }
    if let Some(v) = forwarded_value(hazard.forward_rs3, ex, mem, wb) {
        dctoex.datac = v;
    }
}

fn forwarded_value(forward: Forward, ex: &ExToMem, mem: &MemToWb, wb: &WbOut) -> Option<i32> {
    match forward {
        Forward::None => None,
        Forward::Ex => ex.we.then_some(ex.result),
        Forward::Mem => mem.we.then_some(mem.result),
        Forward::Wb => wb.we.then_some(wb.value),
    }
}
