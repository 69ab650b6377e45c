//! Flat, word-addressed backing memory: the bottom of the hierarchy.
//!
//! Two variants are provided, mirroring the source: [`BackingMemory`] models
//! a realistic word-granular store where sub-word stores cost a one-cycle
//! read before the masked write completes, and [`SimpleMemory`] is a
//! zero-latency variant useful for seeding and inspecting memory in tests
//! and for harness code that doesn't care about backing-store timing.

use std::cell::RefCell;
use std::rc::Rc;

use super::memory_interface::{extract, merge, MemMask, MemOpType, MemoryInterface};

/// Word-addressed memory with a two-cycle sub-word store protocol: loads and
/// word stores complete in one cycle, but a sub-word store first reads the
/// existing word (asserting `wait_out`) and merges/writes it on the next
/// call with the same address and mask.
pub struct BackingMemory {
    words: Vec<u32>,
    pending_write: bool,
    value_loaded: u32,
}

impl BackingMemory {
    /// Creates a zeroed backing memory of `word_count` 32-bit words.
    pub fn new(word_count: usize) -> Self {
        Self {
            words: vec![0; word_count],
            pending_write: false,
            value_loaded: 0,
        }
    }

    /// Direct, out-of-band word access for test/harness seeding.
    pub fn read_word(&self, word_index: usize) -> u32 {
        self.words[word_index]
    }

    /// Direct, out-of-band word write for test/harness seeding.
    pub fn write_word(&mut self, word_index: usize, value: u32) {
        self.words[word_index] = value;
    }

    pub fn len_words(&self) -> usize {
        self.words.len()
    }
}

impl MemoryInterface for BackingMemory {
    fn process(
        &mut self,
        addr: u32,
        mask: MemMask,
        op_type: MemOpType,
        data_in: u32,
    ) -> (u32, bool) {
        let index = (addr >> 2) as usize;

        let needs_read_first = !self.pending_write && op_type == MemOpType::Store && mask != MemMask::Word;

        if needs_read_first || op_type == MemOpType::Load {
            let word = self.words[index];
            if needs_read_first {
                self.pending_write = true;
                self.value_loaded = word;
                (0, true)
            } else {
                self.pending_write = false;
                (extract(word, addr, mask), false)
            }
        } else if op_type == MemOpType::Store {
            self.pending_write = false;
            let new_word = match mask {
                MemMask::Word | MemMask::Long => data_in,
                _ => merge(self.value_loaded, addr, mask, data_in),
            };
            self.words[index] = new_word;
            (0, false)
        } else {
            (0, false)
        }
    }
}

/// Zero-latency backing memory: every access, including sub-word stores,
/// completes the cycle it is issued. `wait_out` is always false.
pub struct SimpleMemory {
    words: Vec<u32>,
}

impl SimpleMemory {
    pub fn new(word_count: usize) -> Self {
        Self {
            words: vec![0; word_count],
        }
    }

    pub fn read_word(&self, word_index: usize) -> u32 {
        self.words[word_index]
    }

    pub fn write_word(&mut self, word_index: usize, value: u32) {
        self.words[word_index] = value;
    }
}

impl MemoryInterface for SimpleMemory {
    fn process(
        &mut self,
        addr: u32,
        mask: MemMask,
        op_type: MemOpType,
        data_in: u32,
    ) -> (u32, bool) {
        let index = (addr >> 2) as usize;
        match op_type {
            MemOpType::Store => {
                let existing = self.words[index];
                self.words[index] = match mask {
                    MemMask::Word | MemMask::Long => data_in,
                    _ => merge(existing, addr, mask, data_in),
                };
                (0, false)
            }
            MemOpType::Load => (extract(self.words[index], addr, mask), false),
            MemOpType::None => (0, false),
        }
    }
}

/// A handle onto a [`BackingMemory`] shared by multiple cache instances.
///
/// The I-cache and D-cache model split Harvard front ends over one unified
/// address space: both chain to a `SharedBacking` wrapping the same
/// `Rc<RefCell<BackingMemory>>`, so a store the D-cache eventually writes
/// back is visible to a later I-cache fill at the same address (self-
/// modifying code included).
#[derive(Clone)]
pub struct SharedBacking {
    inner: Rc<RefCell<BackingMemory>>,
}

impl SharedBacking {
    pub fn new(memory: BackingMemory) -> Self {
        Self {
            inner: Rc::new(RefCell::new(memory)),
        }
    }

    pub fn handle(&self) -> Self {
        self.clone()
    }
}

impl MemoryInterface for SharedBacking {
    fn process(
        &mut self,
        addr: u32,
        mask: MemMask,
        op_type: MemOpType,
        data_in: u32,
    ) -> (u32, bool) {
        self.inner.borrow_mut().process(addr, mask, op_type, data_in)
    }
}
