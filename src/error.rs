/// Errors returned by every public TFS operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("file system is not initialized")]
    NotInited,
    #[error("file system is already initialized")]
    AlreadyInited,
    #[error("path is not a valid TFS path")]
    BadPath,
    #[error("no such file or directory")]
    NotFound,
    #[error("file already exists")]
    Exists,
    #[error("symbolic link points to a missing target")]
    BrokenLink,
    #[error("target is a symbolic link")]
    IsSymlink,
    #[error("invalid file handle")]
    InvalidHandle,
    #[error("no space left in the file system")]
    NoSpace,
}

pub type Result<T> = std::result::Result<T, Error>;
