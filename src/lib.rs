//! # ptr-rs
//!
//! A Rust library providing pointer-arithmetic-style, bounds-checked views
//! over contiguous memory and a unified read/write protocol over in-memory
//! buffers and seekable streams.
//!
//! ## Example
//! The example below reads the same data once through a buffer and once
//! through a stream, using the identical call sequence.
//! ```rust
//! use std::io::Cursor;
//!
//! use ptr_rs::memory::{ConstPtr, ConstPtrOrStream};
//!
//! let data = [1u8, 2, 3, 4, 5];
//!
//! let mut source = ConstPtrOrStream::of_ptr(ConstPtr::new(&data));
//! let head = source.read(2)
//!     .expect("Failed to read from the buffer!");
//! assert_eq!(head.as_slice(), &[1, 2]);
//!
//! let mut stream = Cursor::new(data.to_vec());
//! let mut source = ConstPtrOrStream::of_stream(&mut stream)
//!     .expect("Failed to wrap the stream!");
//! let head = source.read(2)
//!     .expect("Failed to read from the stream!");
//! assert_eq!(head.as_slice(), &[1, 2]);
//! ```
//!
//! ## Details
//!
//! * [`memory::ConstPtr`] and [`memory::Ptr`] are non-owning, bounds-checked
//!   views over contiguous memory with pointer-arithmetic-style operations
//!   (advance, offset, distance).
//! * [`memory::ConstPtrOrStream`] and [`memory::PtrOrStream`] wrap either a
//!   view or a seekable stream behind one read/seek/write protocol.
//! * [`result::Outcome`] is a lightweight success/failure value carrying an
//!   optional message, convertible into a [`result::Fault`] error at the
//!   boundary.

pub mod memory;
pub mod result;
