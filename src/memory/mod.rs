//! Pointer-like views over contiguous memory and the unified
//! buffer-or-stream read/write protocol built on top of them.

use thiserror::Error;

mod const_ptr;
mod ops;
mod ptr;
mod sink;
mod source;

pub use const_ptr::ConstPtr;
pub use ptr::Ptr;
pub use sink::{PtrOrStream, ReadWriteSeek, WriteLease};
pub use source::{Bytes, ConstPtrOrStream, ReadSeek};

/// Errors raised by indexing, slicing and pointer arithmetic on views.
///
/// Every variant is fatal to the operation that raised it; there are no
/// partial results. Short reads, short writes and clamped seeks are *not*
/// errors and are reported through return values instead.
#[derive(Error, Debug)]
pub enum MemoryError {

    #[error("Index {index} is out of range for a ptr of length {length}!")]
    OutOfRangeError { index: usize, length: usize },

    #[error("The slice at {start} of length {length} is out of range for a ptr of length {available}!")]
    SliceOutOfRangeError { start: usize, length: usize, available: usize },

    #[error("The ptr is empty!")]
    EmptyPtrError,
}

/// Errors raised by [`ConstPtrOrStream`] and [`PtrOrStream`].
#[derive(Error, Debug)]
pub enum PtrOrStreamError {

    #[error("The backing storage is a stream, not a ptr!")]
    NotAPtrError,

    #[error("The backing storage is a ptr, not a stream!")]
    NotAStreamError,

    #[error("An operation on the backing stream failed!")]
    IoError(#[from] std::io::Error),
}
