//! Typed slot pools
//!
//! The generator and the solver create and destroy nodes at a very high rate
//! compared to their size. A [`Pool`] keeps its records in fixed-size blocks and
//! recycles released slots through a free list, so a release followed by an
//! allocation never goes back to the system allocator.
//!
//! Records are addressed with an [`Id`] that carries the generation of the slot
//! at allocation time. Using an id after its record was released is detected
//! and treated as a fatal invariant violation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Records per block
pub const BLOCK_SIZE: usize = 128;

/// Handle to a record of a [`Pool<T>`]
pub struct Id<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    fn new(index: u32, generation: u32) -> Self {
        Id {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Slot index, stable for the lifetime of the record
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Block allocated pool of `T` records
pub struct Pool<T> {
    blocks: Vec<Vec<Slot<T>>>,
    free: Vec<u32>,
    live: usize,
    peak: usize,
    /// Generation given to freshly carved slots, above every id issued before
    /// the last flush
    epoch: u32,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Pool {
            blocks: Vec::new(),
            free: Vec::new(),
            live: 0,
            peak: 0,
            epoch: 0,
        }
    }

    /// Number of records currently allocated
    pub fn live(&self) -> usize {
        self.live
    }

    /// Highest number of records allocated at once since the last flush
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Number of blocks obtained from the system allocator
    pub fn blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Store `value` and return its handle
    ///
    /// # Panics
    ///
    /// Panics when the system allocator cannot provide a new block.
    pub fn alloc(&mut self, value: T) -> Id<T> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => self.carve(),
        };
        let slot = self.slot_mut(index);
        debug_assert!(slot.value.is_none());
        slot.value = Some(value);
        let generation = slot.generation;

        self.live += 1;
        self.peak = self.peak.max(self.live);
        Id::new(index, generation)
    }

    /// Release a record and return its value
    pub fn free(&mut self, id: Id<T>) -> T {
        let slot = self.slot_mut(id.index);
        if slot.generation != id.generation || slot.value.is_none() {
            crate::fatal!("release of stale pool id {:?}", id);
        }
        slot.generation = slot.generation.wrapping_add(1);
        let value = slot.value.take();
        self.free.push(id.index);
        self.live -= 1;
        match value {
            Some(value) => value,
            None => crate::fatal!("pool slot {:?} emptied during release", id),
        }
    }

    /// Release a batch of records at once
    pub fn free_many<I: IntoIterator<Item = Id<T>>>(&mut self, ids: I) {
        for id in ids {
            self.free(id);
        }
    }

    /// Release every block back to the system
    ///
    /// Every outstanding id becomes invalid.
    pub fn flush(&mut self) {
        if let Some(newest) = self.blocks.iter().flatten().map(|slot| slot.generation).max() {
            self.epoch = newest.wrapping_add(1);
        }
        self.blocks = Vec::new();
        self.free = Vec::new();
        self.live = 0;
        self.peak = 0;
    }

    /// True iff `id` refers to a live record
    pub fn contains(&self, id: Id<T>) -> bool {
        self.slot(id.index)
            .is_some_and(|slot| slot.generation == id.generation && slot.value.is_some())
    }

    pub fn get(&self, id: Id<T>) -> Option<&T> {
        self.slot(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        let block = id.index as usize / BLOCK_SIZE;
        let slot = self
            .blocks
            .get_mut(block)?
            .get_mut(id.index as usize % BLOCK_SIZE)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Handles of every live record, in slot order
    pub fn ids(&self) -> impl Iterator<Item = Id<T>> + '_ {
        self.blocks.iter().enumerate().flat_map(|(b, block)| {
            block.iter().enumerate().filter_map(move |(i, slot)| {
                slot.value
                    .as_ref()
                    .map(|_| Id::new((b * BLOCK_SIZE + i) as u32, slot.generation))
            })
        })
    }

    /// Take a fresh slot from the tail of the last block, growing if needed
    fn carve(&mut self) -> u32 {
        let needs_block = self
            .blocks
            .last()
            .map_or(true, |block| block.len() == BLOCK_SIZE);
        if needs_block {
            let mut block = Vec::new();
            if let Err(e) = block.try_reserve_exact(BLOCK_SIZE) {
                crate::fatal!(
                    "unable to allocate a block of {} records ({} live): {}",
                    BLOCK_SIZE,
                    self.live,
                    e
                );
            }
            self.blocks.push(block);
        }

        let b = self.blocks.len() - 1;
        let block = &mut self.blocks[b];
        block.push(Slot {
            generation: self.epoch,
            value: None,
        });
        let index = b * BLOCK_SIZE + block.len() - 1;
        match u32::try_from(index) {
            Ok(index) => index,
            Err(_) => crate::fatal!("pool exhausted the id space at {} records", index),
        }
    }

    fn slot(&self, index: u32) -> Option<&Slot<T>> {
        self.blocks
            .get(index as usize / BLOCK_SIZE)?
            .get(index as usize % BLOCK_SIZE)
    }

    fn slot_mut(&mut self, index: u32) -> &mut Slot<T> {
        let block = index as usize / BLOCK_SIZE;
        match self
            .blocks
            .get_mut(block)
            .and_then(|block| block.get_mut(index as usize % BLOCK_SIZE))
        {
            Some(slot) => slot,
            None => crate::fatal!("pool slot #{} does not exist", index),
        }
    }
}

impl<T> Index<Id<T>> for Pool<T> {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => crate::fatal!("access through stale pool id {:?}", id),
        }
    }
}

impl<T> IndexMut<Id<T>> for Pool<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => crate::fatal!("access through stale pool id {:?}", id),
        }
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("live", &self.live)
            .field("peak", &self.peak)
            .field("blocks", &self.blocks.len())
            .finish()
    }
}
