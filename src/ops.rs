//! The public operations: path resolution, the locking protocol, and the
//! seven core calls (`open`, `close`, `read`, `write`, `link`, `sym_link`,
//! `unlink`) plus the out-of-scope `list` read path.

use crate::directory;
use crate::error::{Error, Result};
use crate::inode::{Kind, ROOT_INUM};
use crate::open_file::Handle;
use crate::params::OpenFlags;
use crate::Tfs;

/// Validates a path and returns its basename.
///
/// A path is valid iff it is non-empty, begins with `/`, has length > 1, the
/// basename is non-empty, contains no further `/` (this is a single flat
/// directory), and fits in a directory entry's name bound.
fn validate_path(path: &str) -> Result<&str> {
    if path.len() <= 1 || !path.starts_with('/') {
        return Err(Error::BadPath);
    }
    let name = &path[1..];
    if name.is_empty() || name.contains('/') || name.len() >= directory::NAME_LEN {
        return Err(Error::BadPath);
    }
    Ok(name)
}

impl Tfs {
    pub(crate) fn open(&self, path: &str, flags: OpenFlags) -> Result<Handle> {
        let name = validate_path(path)?;

        let mut inum = {
            let root = self.inodes.read(ROOT_INUM);
            let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
            directory::find(block, name)
        };

        if let Some(found) = inum {
            let target = {
                let g = self.inodes.read(found);
                g.sym_link.then(|| g.sym_path.clone())
            };
            if let Some(target) = target {
                let target_name = validate_path(&target)?;
                let root = self.inodes.read(ROOT_INUM);
                let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
                inum = Some(directory::find(block, target_name).ok_or(Error::BrokenLink)?);
            }
        }

        let inum = match inum {
            Some(inum) => inum,
            None => {
                if !flags.contains(OpenFlags::CREAT) {
                    log::warn!("open({path:?}): not found");
                    return Err(Error::NotFound);
                }
                let new_inum = self.inodes.create(&self.blocks, Kind::File)?;
                let root = self.inodes.write(ROOT_INUM);
                let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
                if let Err(e) = directory::add(block, name, new_inum) {
                    drop(root);
                    self.inodes.delete(&self.blocks, new_inum);
                    return Err(e);
                }
                new_inum
            }
        };

        let offset = if flags.contains(OpenFlags::TRUNC) {
            let mut w = self.inodes.write(inum);
            if w.size > 0 {
                if let Some(block) = w.data_block.take() {
                    self.blocks.free(block);
                }
                w.size = 0;
            }
            if flags.contains(OpenFlags::APPEND) {
                w.size
            } else {
                0
            }
        } else {
            let r = self.inodes.read(inum);
            if flags.contains(OpenFlags::APPEND) {
                r.size
            } else {
                0
            }
        };

        let handle = self.open_files.add(inum, offset)?;
        log::debug!("open({path:?}, {flags:?}) -> {handle:?}");
        Ok(handle)
    }

    pub(crate) fn close(&self, handle: Handle) -> Result<()> {
        self.open_files.remove(handle)?;
        log::debug!("close({handle:?})");
        Ok(())
    }

    pub(crate) fn read(&self, handle: Handle, buf: &mut [u8]) -> Result<usize> {
        let (inum, offset) = self.open_files.get(handle)?;
        let r = self.inodes.read(inum);
        let available = r.size.saturating_sub(offset);
        let len = available.min(buf.len());
        if len > 0 {
            let block_id = r
                .data_block
                .expect("file with size > 0 must have a data block");
            let block = unsafe { self.blocks.get(block_id) };
            buf[..len].copy_from_slice(&block[offset..offset + len]);
        }
        drop(r);
        if len > 0 {
            self.open_files.set_offset(handle, offset + len)?;
        }
        Ok(len)
    }

    pub(crate) fn write(&self, handle: Handle, buf: &[u8]) -> Result<usize> {
        let (inum, offset) = self.open_files.get(handle)?;
        let mut w = self.inodes.write(inum);
        let len = buf
            .len()
            .min(self.blocks.block_size().saturating_sub(offset));
        if len > 0 {
            if w.data_block.is_none() {
                w.data_block = Some(self.blocks.alloc()?);
            }
            let block = unsafe { self.blocks.get(w.data_block.unwrap()) };
            block[offset..offset + len].copy_from_slice(&buf[..len]);
            let new_offset = offset + len;
            if new_offset > w.size {
                w.size = new_offset;
            }
            drop(w);
            self.open_files.set_offset(handle, new_offset)?;
        }
        Ok(len)
    }

    pub(crate) fn link(&self, target: &str, link_name: &str) -> Result<()> {
        let target_name = validate_path(target)?;
        let link_name = validate_path(link_name)?;

        let root = self.inodes.write(ROOT_INUM);
        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        let target_inum = directory::find(block, target_name).ok_or(Error::NotFound)?;

        let mut target_w = self.inodes.write(target_inum);
        if target_w.sym_link {
            return Err(Error::IsSymlink);
        }

        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        directory::add(block, link_name, target_inum)?;
        target_w.hard_links += 1;
        log::debug!("link({target:?}, {link_name:?})");
        Ok(())
    }

    pub(crate) fn sym_link(&self, target: &str, link_name: &str) -> Result<()> {
        let target_name = validate_path(target)?;
        let link_name = validate_path(link_name)?;

        let root = self.inodes.write(ROOT_INUM);
        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        let target_inum = directory::find(block, target_name).ok_or(Error::NotFound)?;

        // If `target` itself names a symlink, store its resolved path rather
        // than `target` verbatim, so a chain of symlinks collapses to a
        // single hop at the point each link is created instead of growing
        // deeper with every `sym_link` call.
        let stored_path = {
            let g = self.inodes.read(target_inum);
            if g.sym_link {
                g.sym_path.clone()
            } else {
                target.to_string()
            }
        };

        let link_inum = self.inodes.create(&self.blocks, Kind::File)?;
        {
            let mut w = self.inodes.write(link_inum);
            w.sym_link = true;
            w.sym_path = stored_path;
        }

        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        if let Err(e) = directory::add(block, link_name, link_inum) {
            drop(root);
            self.inodes.delete(&self.blocks, link_inum);
            return Err(e);
        }
        log::debug!("sym_link({target:?}, {link_name:?})");
        Ok(())
    }

    pub(crate) fn unlink(&self, name: &str) -> Result<()> {
        let basename = validate_path(name)?;

        let root = self.inodes.write(ROOT_INUM);
        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        let inum = directory::find(block, basename).ok_or(Error::NotFound)?;

        let mut target_w = self.inodes.write(inum);
        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        directory::clear(block, basename)?;

        if target_w.sym_link {
            drop(target_w);
            self.inodes.delete(&self.blocks, inum);
        } else {
            target_w.hard_links -= 1;
            let should_delete = target_w.hard_links == 0;
            drop(target_w);
            if should_delete {
                self.inodes.delete(&self.blocks, inum);
            }
        }
        log::debug!("unlink({name:?})");
        Ok(())
    }

    pub(crate) fn list(&self) -> Vec<String> {
        let root = self.inodes.read(ROOT_INUM);
        let block = unsafe { self.blocks.get(root.data_block.unwrap()) };
        directory::entries(block)
    }
}
