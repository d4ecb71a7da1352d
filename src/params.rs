use bitflags::bitflags;

/// Configuration record fixed for the lifetime of an initialized file system.
///
/// Mirrors the reference `tfs_params` / `tfs_default_params` pair: every
/// field is a plain count, fixed once `init` has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    /// Number of inode slots in the inode table. Slot 0 is reserved for the root.
    pub max_inode_count: usize,
    /// Number of fixed-size blocks in the block pool.
    pub max_block_count: usize,
    /// Number of concurrently open file handles.
    pub max_open_files_count: usize,
    /// Size in bytes of a single data block. Also the maximum file size.
    pub block_size: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_inode_count: 64,
            max_block_count: 1024,
            max_open_files_count: 16,
            block_size: 1024,
        }
    }
}

bitflags! {
    /// Mode flags passed to [`crate::open`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct OpenFlags: u32 {
        const CREAT = 1;
        const TRUNC = 2;
        const APPEND = 4;
    }
}
