//! In-memory inodes.
//!
//! An inode describes a single file or directory. Identity is a plain index
//! (`Inumber`) into an owned, fixed-size table of per-slot rwlocks; nothing
//! holds a long-lived reference across an operation boundary, only the
//! scoped guard returned by [`InodeTable::read`] / [`InodeTable::write`].
//! This is deliberately simpler than a reference-counted, table-recycling
//! design: the table never grows, so a slot's address never moves, and
//! `delete` just re-locks the slot and clears it.

use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::block::{BlockId, BlockPool};
use crate::directory;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Inumber(usize);

pub(crate) const ROOT_INUM: Inumber = Inumber(0);

impl Inumber {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Directory,
    File,
}

/// The fields guarded by an inode's rwlock.
pub(crate) struct InodeData {
    pub(crate) kind: Kind,
    pub(crate) size: usize,
    pub(crate) data_block: Option<BlockId>,
    pub(crate) hard_links: u32,
    pub(crate) sym_link: bool,
    pub(crate) sym_path: String,
}

impl InodeData {
    fn free() -> Self {
        Self {
            kind: Kind::File,
            size: 0,
            data_block: None,
            hard_links: 0,
            sym_link: false,
            sym_path: String::new(),
        }
    }
}

pub(crate) struct InodeTable {
    slots: Vec<RwLock<InodeData>>,
    /// `true` at index `i` iff slot `i` is in use. Guards allocation
    /// independently of any per-inode rwlock, per the locking protocol.
    free_bitmap: Mutex<Vec<bool>>,
}

impl InodeTable {
    pub(crate) fn new(count: usize) -> Self {
        let slots = (0..count).map(|_| RwLock::new(InodeData::free())).collect();
        Self {
            slots,
            free_bitmap: Mutex::new(vec![false; count]),
        }
    }

    /// Allocates a slot, zero-initializes it, and sets `hard_links = 1`.
    ///
    /// For a directory, also allocates and clears a data block.
    pub(crate) fn create(&self, blocks: &BlockPool, kind: Kind) -> Result<Inumber> {
        let inum = {
            let mut free = self.free_bitmap.lock().unwrap();
            let idx = free
                .iter()
                .position(|&used| !used)
                .ok_or(Error::NoSpace)?;
            free[idx] = true;
            Inumber(idx)
        };

        let data_block = if kind == Kind::Directory {
            match blocks.alloc() {
                Ok(id) => {
                    let block = unsafe { blocks.get(id) };
                    directory::clear_entries(block);
                    Some(id)
                }
                Err(e) => {
                    let mut free = self.free_bitmap.lock().unwrap();
                    free[inum.index()] = false;
                    return Err(e);
                }
            }
        } else {
            None
        };

        let mut slot = self.slots[inum.index()].write().unwrap();
        *slot = InodeData {
            kind,
            size: 0,
            data_block,
            hard_links: 1,
            sym_link: false,
            sym_path: String::new(),
        };
        Ok(inum)
    }

    /// Frees the inode's data block (if any) and clears its slot.
    pub(crate) fn delete(&self, blocks: &BlockPool, inum: Inumber) {
        let mut slot = self.slots[inum.index()].write().unwrap();
        if let Some(block) = slot.data_block.take() {
            blocks.free(block);
        }
        *slot = InodeData::free();
        drop(slot);

        let mut free = self.free_bitmap.lock().unwrap();
        debug_assert!(free[inum.index()], "double delete of inode {}", inum.index());
        free[inum.index()] = false;
    }

    pub(crate) fn read(&self, inum: Inumber) -> RwLockReadGuard<'_, InodeData> {
        self.slots[inum.index()].read().unwrap()
    }

    pub(crate) fn write(&self, inum: Inumber) -> RwLockWriteGuard<'_, InodeData> {
        self.slots[inum.index()].write().unwrap()
    }
}
