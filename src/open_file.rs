//! The open-file table: one mutex-guarded array of `(inumber, offset)`
//! entries, indexed by the handle returned to callers.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::inode::Inumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

struct Entry {
    inum: Inumber,
    offset: usize,
}

pub(crate) struct OpenFileTable {
    entries: Mutex<Vec<Option<Entry>>>,
}

impl OpenFileTable {
    pub(crate) fn new(count: usize) -> Self {
        let mut entries = Vec::with_capacity(count);
        entries.resize_with(count, || None);
        Self {
            entries: Mutex::new(entries),
        }
    }

    pub(crate) fn add(&self, inum: Inumber, offset: usize) -> Result<Handle> {
        let mut entries = self.entries.lock().unwrap();
        let idx = entries
            .iter()
            .position(Option::is_none)
            .ok_or(Error::NoSpace)?;
        entries[idx] = Some(Entry { inum, offset });
        Ok(Handle(idx))
    }

    pub(crate) fn remove(&self, handle: Handle) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let slot = entries.get_mut(handle.0).ok_or(Error::InvalidHandle)?;
        slot.take().ok_or(Error::InvalidHandle)?;
        Ok(())
    }

    pub(crate) fn get(&self, handle: Handle) -> Result<(Inumber, usize)> {
        let entries = self.entries.lock().unwrap();
        let entry = entries
            .get(handle.0)
            .and_then(Option::as_ref)
            .ok_or(Error::InvalidHandle)?;
        Ok((entry.inum, entry.offset))
    }

    pub(crate) fn set_offset(&self, handle: Handle, offset: usize) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .ok_or(Error::InvalidHandle)?;
        entry.offset = offset;
        Ok(())
    }
}
