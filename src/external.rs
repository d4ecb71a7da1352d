//! Thin external collaborators, specified only at their interface: an
//! OS-file ingestion helper. No design content lives here — the hard parts
//! are all in the core `open`/`write` path this calls into.

use std::io::Read as _;
use std::path::Path;

use crate::params::OpenFlags;

/// Errors from [`copy_from_external`]: either a core TFS error, or an I/O
/// failure reading the host file. Kept separate from [`crate::Error`] rather
/// than widening the core enum for one out-of-scope helper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Tfs(#[from] crate::Error),
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads up to one block's worth of bytes from `source_path` on the host
/// file system and writes them into `dest_path` inside TFS, creating or
/// truncating it as needed. Reads until EOF or the block-size cap, whichever
/// comes first; a short read that is not at EOF is not an error.
pub fn copy_from_external(source_path: impl AsRef<Path>, dest_path: &str) -> Result<(), Error> {
    let block_size = crate::with_tfs(|tfs| Ok(tfs.params().block_size))?;

    let mut source = std::fs::File::open(source_path)?;
    let mut buf = vec![0u8; block_size];
    let mut total = 0;
    while total < buf.len() {
        let n = source.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }

    let handle = crate::open(dest_path, OpenFlags::CREAT | OpenFlags::TRUNC)?;
    let written = crate::write(handle, &buf[..total])?;
    crate::close(handle)?;
    if written != total {
        return Err(crate::Error::NoSpace.into());
    }
    Ok(())
}
