//! Host-held cells the collector must treat as roots.
//!
//! A slab whose occupied slots are threaded into a doubly linked list, so
//! registering and releasing a value are both O(1) splices and walking the
//! roots touches only live entries. Vacant slots form a free list and carry a
//! generation so a stale key can never release someone else's entry.

use ren_cell::Cell;

/// Handle to one registered cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LiveKey {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Entry {
    cell: Cell,
    prev: Option<u32>,
    next: Option<u32>,
}

#[derive(Debug)]
enum Slot {
    Occupied { generation: u32, entry: Entry },
    Vacant { generation: u32, next_free: Option<u32> },
}

#[derive(Debug, Default)]
pub(crate) struct LiveSet {
    slots: Vec<Slot>,
    head: Option<u32>,
    free: Option<u32>,
    len: usize,
}

impl LiveSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, cell: Cell) -> LiveKey {
        let entry = Entry {
            cell,
            prev: None,
            next: self.head,
        };
        let (index, generation) = match self.free {
            Some(index) => {
                let generation = match self.slots.get(index as usize) {
                    Some(Slot::Vacant {
                        generation,
                        next_free,
                    }) => {
                        self.free = *next_free;
                        generation.wrapping_add(1)
                    }
                    _ => 0,
                };
                self.slots[index as usize] = Slot::Occupied { generation, entry };
                (index, generation)
            }
            None => {
                let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    entry,
                });
                (index, 0)
            }
        };
        if let Some(old_head) = self.head {
            if let Some(e) = self.entry_mut(old_head) {
                e.prev = Some(index);
            }
        }
        self.head = Some(index);
        self.len += 1;
        LiveKey { index, generation }
    }

    /// Release `key`. Returns the cell it held, or `None` for a stale key.
    pub(crate) fn remove(&mut self, key: LiveKey) -> Option<Cell> {
        let (prev, next, cell) = match self.slots.get(key.index as usize) {
            Some(Slot::Occupied { generation, entry }) if *generation == key.generation => {
                (entry.prev, entry.next, entry.cell)
            }
            _ => return None,
        };
        match prev {
            Some(p) => {
                if let Some(e) = self.entry_mut(p) {
                    e.next = next;
                }
            }
            None => self.head = next,
        }
        if let Some(n) = next {
            if let Some(e) = self.entry_mut(n) {
                e.prev = prev;
            }
        }
        self.slots[key.index as usize] = Slot::Vacant {
            generation: key.generation,
            next_free: self.free,
        };
        self.free = Some(key.index);
        self.len -= 1;
        Some(cell)
    }

    /// Replace the cell registered under `key`.
    pub(crate) fn update(&mut self, key: LiveKey, cell: Cell) -> bool {
        match self.slots.get_mut(key.index as usize) {
            Some(Slot::Occupied { generation, entry }) if *generation == key.generation => {
                entry.cell = cell;
                true
            }
            _ => false,
        }
    }

    /// Registered cells, most recent first.
    pub(crate) fn cells(&self) -> Cells<'_> {
        Cells {
            set: self,
            at: self.head,
        }
    }

    fn entry(&self, index: u32) -> Option<&Entry> {
        match self.slots.get(index as usize) {
            Some(Slot::Occupied { entry, .. }) => Some(entry),
            _ => None,
        }
    }

    fn entry_mut(&mut self, index: u32) -> Option<&mut Entry> {
        match self.slots.get_mut(index as usize) {
            Some(Slot::Occupied { entry, .. }) => Some(entry),
            _ => None,
        }
    }
}

pub(crate) struct Cells<'a> {
    set: &'a LiveSet,
    at: Option<u32>,
}

impl Iterator for Cells<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let entry = self.set.entry(self.at?)?;
        self.at = entry.next;
        Some(entry.cell)
    }
}
