//! Set-associative, write-back, write-allocate cache with a multi-cycle
//! miss state machine and LRU-approximate (cycle-stamp) replacement.
//!
//! This is the hard part of the simulator: associativity is fixed at four
//! ways; `interface_size`, `line_size`, and `set_size` are configurable
//! (see [`crate::config::CacheConfig`]). A cache owns its next level as a
//! boxed [`MemoryInterface`], so instances chain arbitrarily (I$/D$ over a
//! single backing store, or a future L2 between them).

use super::memory_interface::{extract, merge, MemMask, MemOpType, MemoryInterface};
use crate::common::error::SimError;
use crate::config::CacheConfig;

/// One way's worth of stored state within a set.
#[derive(Debug, Clone)]
struct Line {
    tag: u32,
    /// `line_size / 4` words, in ascending address order.
    data: Vec<u32>,
    valid: bool,
    dirty: bool,
    /// Cycle stamp of last touch (hit or fill); the smallest stamp in a set
    /// is evicted first. A `u64` here is a strict superset of the source's
    /// 40-bit counter and shares its "never wraps in practice" property.
    age: u64,
}

impl Line {
    fn empty(words_per_line: usize) -> Self {
        Self {
            tag: 0,
            data: vec![0; words_per_line],
            valid: false,
            dirty: false,
            age: 0,
        }
    }
}

/// A write staged by a hit-store or a miss-commit, installed into the
/// cache arrays on the *next* call to [`Cache::process`]. This one-cycle
/// gap is deliberate (see the crate's design notes) and must not be
/// special-cased away for the hit path vs. the miss-fill path: both land
/// here and both install identically.
struct Deferred {
    set_index: usize,
    way: usize,
    tag: u32,
    data: Vec<u32>,
    dirty: bool,
    data_out: u32,
}

/// In-flight state for a miss currently being serviced.
struct MissInProgress {
    set_index: usize,
    tag: u32,
    victim_way: usize,
    victim_tag: u32,
    old_val: Vec<u32>,
    new_val: Vec<u32>,
    is_dirty: bool,
    /// The original request, held stable across the whole state machine.
    addr: u32,
    mask: MemMask,
    op_type: MemOpType,
    data_in: u32,
}

pub struct Cache {
    config: CacheConfig,
    words_per_line: usize,
    set_index_bits: u32,
    offset_bits: u32,
    sets: Vec<[Line; 4]>,
    cycle: u64,
    /// `0` = idle; `> 0` = miss-servicing countdown, per §4.9.
    cache_state: u32,
    miss: Option<MissInProgress>,
    deferred: Option<Deferred>,
    next_level: Box<dyn MemoryInterface>,
    pub accesses: u64,
    pub misses: u64,
}

impl Cache {
    /// Builds a cache over `next_level`, validating `config`'s geometry
    /// first (see [`CacheConfig::validate`]).
    pub fn new(config: CacheConfig, next_level: Box<dyn MemoryInterface>) -> Result<Self, SimError> {
        config.validate()?;
        let words_per_line = config.line_size / 4;
        let set_count = config.set_size;
        let sets = (0..set_count)
            .map(|_| std::array::from_fn(|_| Line::empty(words_per_line)))
            .collect();
        Ok(Self {
            config,
            words_per_line,
            set_index_bits: set_count.trailing_zeros(),
            offset_bits: words_per_line.trailing_zeros(),
            sets,
            cycle: 0,
            cache_state: 0,
            miss: None,
            deferred: None,
            next_level,
            accesses: 0,
            misses: 0,
        })
    }

    fn decompose(&self, addr: u32) -> (u32, usize, usize) {
        let word_addr = addr >> 2;
        let offset = (word_addr as usize) & ((1 << self.offset_bits) - 1);
        let set_index = ((word_addr as usize) >> self.offset_bits) & ((1 << self.set_index_bits) - 1);
        let tag = addr >> (self.offset_bits + self.set_index_bits + 2);
        (tag, set_index, offset)
    }

    fn reconstruct_addr(&self, tag: u32, set_index: usize) -> u32 {
        (tag << (self.offset_bits + self.set_index_bits + 2)) | ((set_index as u32) << (self.offset_bits + 2))
    }

    fn select_victim(&self, set_index: usize) -> usize {
        let set = &self.sets[set_index];
        let mut victim = 0;
        for way in 1..4 {
            if set[way].age < set[victim].age {
                victim = way;
            }
        }
        victim
    }

    fn words_per_transfer(&self) -> usize {
        self.config.words_per_transfer()
    }

    fn state_cache_miss(&self) -> u32 {
        (2 * self.words_per_transfer() + 2) as u32
    }
    fn state_last_store(&self) -> u32 {
        (self.words_per_transfer() + 3) as u32
    }
    fn state_first_load(&self) -> u32 {
        (self.words_per_transfer() + 2) as u32
    }
    fn state_last_load(&self) -> u32 {
        2
    }

    /// Advances the cache by one cycle. See §4.9 for the full contract.
    pub fn process(&mut self, addr: u32, mask: MemMask, op_type: MemOpType, data_in: u32) -> (u32, bool) {
        if let Some(d) = self.deferred.take() {
            let line = &mut self.sets[d.set_index][d.way];
            line.tag = d.tag;
            line.data = d.data;
            line.valid = true;
            line.dirty = d.dirty;
            line.age = self.cycle;
            self.cycle += 1;
            return (d.data_out, false);
        }

        if self.cache_state == 0 {
            if op_type == MemOpType::None {
                self.cycle += 1;
                return (0, false);
            }
            let (tag, set_index, offset) = self.decompose(addr);
            self.accesses += 1;
            let hit_way = (0..4).find(|&w| self.sets[set_index][w].valid && self.sets[set_index][w].tag == tag);

            let result = if let Some(way) = hit_way {
                match op_type {
                    MemOpType::Load => {
                        let word = self.sets[set_index][way].data[offset];
                        (extract(word, addr, mask), false)
                    }
                    MemOpType::Store => {
                        let mut data = self.sets[set_index][way].data.clone();
                        data[offset] = merge(data[offset], addr, mask, data_in);
                        let tag_kept = self.sets[set_index][way].tag;
                        self.deferred = Some(Deferred {
                            set_index,
                            way,
                            tag: tag_kept,
                            data,
                            dirty: true,
                            data_out: 0,
                        });
                        (0, true)
                    }
                    MemOpType::None => unreachable!(),
                }
            } else {
                self.misses += 1;
                let victim_way = self.select_victim(set_index);
                let victim = &self.sets[set_index][victim_way];
                let is_dirty = victim.valid && victim.dirty;
                // Any non-dirty victim (clean-valid or never-used-invalid)
                // has nothing worth writing back, so the writeback phase is
                // skipped outright and the state machine jumps straight to
                // the fill phase. This matches the source unconditionally,
                // including for a cold (invalid) victim.
                let skip_writeback = !victim.dirty;
                self.miss = Some(MissInProgress {
                    set_index,
                    tag,
                    victim_way,
                    victim_tag: victim.tag,
                    old_val: victim.data.clone(),
                    new_val: vec![0; self.words_per_line],
                    is_dirty,
                    addr,
                    mask,
                    op_type,
                    data_in,
                });
                self.cache_state = if skip_writeback {
                    self.state_first_load()
                } else {
                    self.state_cache_miss()
                };
                (0, true)
            };

            self.cycle += 1;
            result
        } else {
            self.step_miss_state_machine()
        }
    }

    fn step_miss_state_machine(&mut self) -> (u32, bool) {
        let s = self.cache_state;
        let state_miss = self.state_cache_miss();
        let state_last_store = self.state_last_store();
        let state_first_load = self.state_first_load();
        let state_last_load = self.state_last_load();

        if s <= state_miss && s >= state_last_store {
            let idx = (state_miss - s) as usize;
            let victim_addr = {
                let m = self.miss.as_ref().unwrap();
                self.reconstruct_addr(m.victim_tag, m.set_index) + (idx as u32) * 4
            };
            let (is_dirty, data_word) = {
                let m = self.miss.as_ref().unwrap();
                (m.is_dirty, m.old_val[idx])
            };
            let op = if is_dirty { MemOpType::Store } else { MemOpType::None };
            let (_out, wait) = self.next_level.process(victim_addr, MemMask::Long, op, data_word);
            if wait {
                return (0, true);
            }
            self.cache_state = if s == state_last_store {
                state_first_load
            } else {
                s - 1
            };
            return (0, true);
        }

        if s <= state_first_load && s >= state_last_load {
            let idx = (state_first_load - s) as usize;
            let victim_addr = {
                let m = self.miss.as_ref().unwrap();
                (m.addr & !((self.words_per_line as u32) * 4 - 1)) + (idx as u32) * 4
            };
            let issue = s > state_last_load;
            let (out, wait) = if issue {
                self.next_level.process(victim_addr, MemMask::Long, MemOpType::Load, 0)
            } else {
                (0, false)
            };
            if wait {
                return (0, true);
            }
            if issue {
                let m = self.miss.as_mut().unwrap();
                m.new_val[idx] = out;
            }
            self.cache_state = if s == state_last_load { 1 } else { s - 1 };
            return (0, true);
        }

        if s == 1 {
            let m = self.miss.take().unwrap();
            let mut new_val = m.new_val;
            let (offset, data_out, dirty) = match m.op_type {
                MemOpType::Store => {
                    let word = new_val[offset_of(m.addr, self.offset_bits)];
                    let merged = merge(word, m.addr, m.mask, m.data_in);
                    let idx = offset_of(m.addr, self.offset_bits);
                    new_val[idx] = merged;
                    (idx, extract(merged, m.addr, m.mask), true)
                }
                _ => {
                    let idx = offset_of(m.addr, self.offset_bits);
                    (idx, extract(new_val[idx], m.addr, m.mask), false)
                }
            };
            let _ = offset;
            self.deferred = Some(Deferred {
                set_index: m.set_index,
                way: m.victim_way,
                tag: m.tag,
                data: new_val,
                dirty,
                data_out,
            });
            self.cache_state = 0;
            self.cycle += 1;
            return (0, true);
        }

        unreachable!("cache_state {} out of range", s)
    }
}

fn offset_of(addr: u32, offset_bits: u32) -> usize {
    ((addr >> 2) as usize) & ((1usize << offset_bits) - 1)
}

impl MemoryInterface for Cache {
    fn process(&mut self, addr: u32, mask: MemMask, op_type: MemOpType, data_in: u32) -> (u32, bool) {
        Cache::process(self, addr, mask, op_type, data_in)
    }
}
