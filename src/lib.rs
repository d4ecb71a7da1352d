//! TécnicoFS: an in-memory, single-directory file system.
//!
//! Client threads open, read, write, link, and unlink files through integer
//! handles; all state lives in process-local tables backed by a fixed-size
//! block pool. There is no on-disk persistence, no nested directories (the
//! root is the only directory), and no file larger than one data block.
//!
//! The public API is a set of free functions operating on a process-wide
//! singleton, mirroring the reference C library's `tfs_init`/`tfs_open`/...
//! design: a process calls [`init`] once, then any number of threads call
//! [`open`], [`read`], [`write`], [`link`], [`sym_link`], [`unlink`], and
//! [`close`], and finally the process calls [`destroy`] once.

use std::sync::RwLock;

mod block;
mod directory;
pub mod error;
mod inode;
mod open_file;
mod ops;
pub mod params;

pub mod external;

pub use error::Error;
pub use open_file::Handle;
pub use params::{OpenFlags, Parameters};

use block::BlockPool;
use error::Result;
use inode::{InodeTable, Kind, ROOT_INUM};
use open_file::OpenFileTable;

/// An instantiable TFS, for embedders that want more than one independent
/// file system in a single process (most callers should prefer the free
/// functions below, which manage one process-wide instance for them).
pub struct Tfs {
    params: Parameters,
    blocks: BlockPool,
    inodes: InodeTable,
    open_files: OpenFileTable,
}

impl Tfs {
    /// Creates a fresh, empty file system with the given parameters.
    pub fn new(params: Parameters) -> Result<Self> {
        let blocks = BlockPool::new(params.max_block_count, params.block_size);
        let inodes = InodeTable::new(params.max_inode_count);
        let root = inodes.create(&blocks, Kind::Directory)?;
        debug_assert_eq!(root, ROOT_INUM, "root inode must be allocated at slot 0");
        let open_files = OpenFileTable::new(params.max_open_files_count);
        Ok(Self {
            params,
            blocks,
            inodes,
            open_files,
        })
    }

    pub fn params(&self) -> Parameters {
        self.params
    }
}

static STATE: RwLock<Option<Tfs>> = RwLock::new(None);

fn with_tfs<T>(f: impl FnOnce(&Tfs) -> Result<T>) -> Result<T> {
    let guard = STATE.read().unwrap();
    let tfs = guard.as_ref().ok_or(Error::NotInited)?;
    f(tfs)
}

/// Initializes the process-wide file system. Uses [`Parameters::default`]
/// when `params` is `None`.
pub fn init(params: Option<Parameters>) -> Result<()> {
    let mut guard = STATE.write().unwrap();
    if guard.is_some() {
        log::warn!("tfs::init called while already initialized");
        return Err(Error::AlreadyInited);
    }
    let tfs = Tfs::new(params.unwrap_or_default())?;
    log::debug!("tfs initialized with {:?}", tfs.params);
    *guard = Some(tfs);
    Ok(())
}

/// Tears down the process-wide file system.
pub fn destroy() -> Result<()> {
    let mut guard = STATE.write().unwrap();
    if guard.take().is_none() {
        log::warn!("tfs::destroy called before init");
        return Err(Error::NotInited);
    }
    log::debug!("tfs destroyed");
    Ok(())
}

/// Opens or creates a file, returning a handle on success.
pub fn open(path: &str, flags: OpenFlags) -> Result<Handle> {
    with_tfs(|tfs| tfs.open(path, flags))
}

/// Closes a handle previously returned by [`open`].
pub fn close(handle: Handle) -> Result<()> {
    with_tfs(|tfs| tfs.close(handle))
}

/// Reads up to `buf.len()` bytes at the handle's current offset.
pub fn read(handle: Handle, buf: &mut [u8]) -> Result<usize> {
    with_tfs(|tfs| tfs.read(handle, buf))
}

/// Writes up to `buf.len()` bytes at the handle's current offset, clamped to
/// the one-block file size cap.
pub fn write(handle: Handle, buf: &[u8]) -> Result<usize> {
    with_tfs(|tfs| tfs.write(handle, buf))
}

/// Creates a hard link `link_name` pointing at the same inode as `target`.
pub fn link(target: &str, link_name: &str) -> Result<()> {
    with_tfs(|tfs| tfs.link(target, link_name))
}

/// Creates a symbolic link `link_name` naming the path `target`.
pub fn sym_link(target: &str, link_name: &str) -> Result<()> {
    with_tfs(|tfs| tfs.sym_link(target, link_name))
}

/// Removes a directory entry, deleting its inode once unreferenced.
pub fn unlink(name: &str) -> Result<()> {
    with_tfs(|tfs| tfs.unlink(name))
}

/// Lists the names of every file currently in the root directory.
pub fn list() -> Result<Vec<String>> {
    with_tfs(|tfs| Ok(tfs.list()))
}
