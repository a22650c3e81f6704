//! The read-only half of the buffer-or-stream protocol.
//!
//! [`ConstPtrOrStream`] hides whether data comes from an in-memory view or
//! from a seekable [`Read`]er behind one cursor-based read/seek protocol. The
//! two backends live in [`PtrSource`] and [`StreamSource`] and share the
//! [`SourceImplementation`] contract, so the public type only dispatches.

use std::io;
use std::io::{Read, Seek, SeekFrom};
use std::ops::Deref;

use crate::memory::{ConstPtr, Ptr, PtrOrStreamError};

/// A seekable byte source. Automatically implemented for everything that is
/// both [`Read`] and [`Seek`].
pub trait ReadSeek: Read + Seek {}

impl <S> ReadSeek for S
where S: Read + Seek {}

/// Bytes handed out by a read operation.
///
/// A buffer backend lends a view into its own memory, a stream backend has
/// to materialize the bytes it pulled. Both cases dereference to `&[u8]`, so
/// callers rarely need to distinguish them.
#[derive(Debug)]
pub enum Bytes<'a> {
    View(ConstPtr<'a, u8>),
    Owned(Vec<u8>),
}

impl <'a> Bytes<'a> {

    /// The bytes as a plain slice.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Bytes::View(ptr) => ptr.as_slice(),
            Bytes::Owned(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// The bytes as a view, borrowed from this value.
    pub fn as_const_ptr(&self) -> ConstPtr<'_, u8> {
        ConstPtr::new(self.as_slice())
    }

    /// The bytes as an owned `Vec`, copying only if they are still a view.
    pub fn into_vec(self) -> Vec<u8> {
        match self {
            Bytes::View(ptr) => ptr.to_vec(),
            Bytes::Owned(bytes) => bytes,
        }
    }
}

impl <'a> Deref for Bytes<'a> {

    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// The operations a backend has to provide. Positions are logical, i.e.
/// relative to the backend's own origin, never to the underlying stream.
pub(crate) trait SourceImplementation {
    fn read(&mut self, length: usize) -> Result<Bytes<'_>, PtrOrStreamError>;
    fn read_to(&mut self, result: Ptr<'_, u8>) -> Result<usize, PtrOrStreamError>;
    fn read_all(&mut self) -> Result<Bytes<'_>, PtrOrStreamError>;
    fn get_all(&mut self) -> Result<Vec<u8>, PtrOrStreamError>;
    fn seek(&mut self, origin: SeekFrom) -> Result<usize, PtrOrStreamError>;
    fn position(&mut self) -> Result<usize, PtrOrStreamError>;
}

/// Performs exactly one read from the stream, retrying only when the read
/// was interrupted. The result may be shorter than the buffer even before
/// the end of the stream; accumulating reads is the caller's decision.
pub(crate) fn read_once<S>(stream: &mut S, buffer: &mut [u8]) -> Result<usize, PtrOrStreamError>
where S: Read + ?Sized {
    loop {
        match stream.read(buffer) {
            Ok(count) => return Ok(count),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
}

/// Cursor arithmetic shared by the view-backed source and sink, so both
/// keep identical read/seek semantics.
pub(crate) fn read_buffer<'s>(data: &'s [u8], offset: &mut usize, length: usize) -> Bytes<'s> {
    let start = *offset;
    let length = length.min(data.len() - start);
    *offset = start + length;
    Bytes::View(ConstPtr::new(&data[start..start + length]))
}

pub(crate) fn read_buffer_to(data: &[u8], offset: &mut usize, mut result: Ptr<'_, u8>) -> usize {
    let length = result.len().min(data.len() - *offset);
    result.as_mut_slice()[..length].copy_from_slice(&data[*offset..*offset + length]);
    *offset += length;
    length
}

pub(crate) fn take_buffer(data: &[u8], offset: &mut usize) -> Vec<u8> {
    let bytes = data[*offset..].to_vec();
    *offset = data.len();
    bytes
}

pub(crate) fn seek_buffer(length: usize, offset: &mut usize, target: SeekFrom) -> usize {
    let target = match target {
        SeekFrom::Start(position) => i64::try_from(position).unwrap_or(i64::MAX),
        SeekFrom::Current(delta) => *offset as i64 + delta,
        SeekFrom::End(delta) => length as i64 + delta,
    };
    *offset = target.clamp(0, length as i64) as usize;
    *offset
}

pub(crate) struct PtrSource<'a> {
    pub(crate) ptr: ConstPtr<'a, u8>,
    pub(crate) offset: usize,
}

impl <'a> SourceImplementation for PtrSource<'a> {

    fn read(&mut self, length: usize) -> Result<Bytes<'_>, PtrOrStreamError> {
        Ok(read_buffer(self.ptr.as_slice(), &mut self.offset, length))
    }

    fn read_to(&mut self, result: Ptr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        Ok(read_buffer_to(self.ptr.as_slice(), &mut self.offset, result))
    }

    fn read_all(&mut self) -> Result<Bytes<'_>, PtrOrStreamError> {
        let remaining = self.ptr.len() - self.offset;
        self.read(remaining)
    }

    fn get_all(&mut self) -> Result<Vec<u8>, PtrOrStreamError> {
        Ok(take_buffer(self.ptr.as_slice(), &mut self.offset))
    }

    fn seek(&mut self, origin: SeekFrom) -> Result<usize, PtrOrStreamError> {
        Ok(seek_buffer(self.ptr.len(), &mut self.offset, origin))
    }

    fn position(&mut self) -> Result<usize, PtrOrStreamError> {
        Ok(self.offset)
    }
}

/// Translates a logical seek target into a physical one, never crossing
/// the origin backwards, and returns the resulting logical position.
pub(crate) fn seek_stream<S>(stream: &mut S, origin: u64, target: SeekFrom) -> Result<usize, PtrOrStreamError>
where S: Seek + ?Sized {
    let physical = match target {
        SeekFrom::Start(offset) => {
            stream.seek(SeekFrom::Start(origin + offset))?
        }
        SeekFrom::Current(offset) => {
            let current = stream.stream_position()? as i64;
            let target = (current + offset).max(origin as i64);
            stream.seek(SeekFrom::Start(target as u64))?
        }
        SeekFrom::End(offset) => {
            let reached = stream.seek(SeekFrom::End(offset))?;
            if reached < origin {
                stream.seek(SeekFrom::Start(origin))?
            }
            else {
                reached
            }
        }
    };
    Ok((physical - origin) as usize)
}

pub(crate) struct StreamSource<'a> {
    pub(crate) stream: &'a mut dyn ReadSeek,
    pub(crate) origin: u64,
}

impl <'a> SourceImplementation for StreamSource<'a> {

    fn read(&mut self, length: usize) -> Result<Bytes<'_>, PtrOrStreamError> {
        let mut buffer = vec![0; length];
        let filled = read_once(&mut *self.stream, &mut buffer)?;
        buffer.truncate(filled);
        Ok(Bytes::Owned(buffer))
    }

    fn read_to(&mut self, mut result: Ptr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        read_once(&mut *self.stream, result.as_mut_slice())
    }

    fn read_all(&mut self) -> Result<Bytes<'_>, PtrOrStreamError> {
        let mut buffer = Vec::new();
        self.stream.read_to_end(&mut buffer)?;
        Ok(Bytes::Owned(buffer))
    }

    fn get_all(&mut self) -> Result<Vec<u8>, PtrOrStreamError> {
        let mut buffer = Vec::new();
        self.stream.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn seek(&mut self, origin: SeekFrom) -> Result<usize, PtrOrStreamError> {
        seek_stream(&mut *self.stream, self.origin, origin)
    }

    fn position(&mut self) -> Result<usize, PtrOrStreamError> {
        let physical = self.stream.stream_position()?;
        Ok(physical.saturating_sub(self.origin) as usize)
    }
}

pub(crate) enum ConstBackend<'a> {
    Ptr(PtrSource<'a>),
    Stream(StreamSource<'a>),
}

/// A read-only byte source backed by either an in-memory view or a seekable
/// stream.
///
/// All operations work against a cursor that starts at the source's origin.
/// For a view the origin is the view's first element; for a stream it is the
/// position the stream had when the source was created, unless
/// [`of_stream_inheriting`] is used, which makes positions match the stream's
/// own. Reads past the end are short instead of failing, and seeks are
/// clamped to the origin (and, for views, to the end).
///
/// [`of_stream_inheriting`]: ConstPtrOrStream::of_stream_inheriting
pub struct ConstPtrOrStream<'a> {
    pub(crate) backend: ConstBackend<'a>,
}

impl <'a> ConstPtrOrStream<'a> {

    /// Creates a source over the given view.
    pub fn of_ptr(ptr: ConstPtr<'a, u8>) -> ConstPtrOrStream<'a> {
        ConstPtrOrStream {
            backend: ConstBackend::Ptr(PtrSource { ptr, offset: 0 }),
        }
    }

    /// Creates a source over the given stream, with the stream's current
    /// position as the origin. Fails if the position cannot be queried.
    pub fn of_stream(stream: &'a mut dyn ReadSeek) -> Result<ConstPtrOrStream<'a>, PtrOrStreamError> {
        let origin = stream.stream_position()?;
        Ok(ConstPtrOrStream {
            backend: ConstBackend::Stream(StreamSource { stream, origin }),
        })
    }

    /// Creates a source over the given stream whose positions are the
    /// stream's own, regardless of where the stream currently is.
    pub fn of_stream_inheriting(stream: &'a mut dyn ReadSeek) -> ConstPtrOrStream<'a> {
        ConstPtrOrStream {
            backend: ConstBackend::Stream(StreamSource { stream, origin: 0 }),
        }
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self.backend, ConstBackend::Ptr(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.backend, ConstBackend::Stream(_))
    }

    /// The backing view, covering the whole viewed memory regardless of the
    /// read position. Fails for a stream backend.
    pub fn ptr(&self) -> Result<ConstPtr<'a, u8>, PtrOrStreamError> {
        match &self.backend {
            ConstBackend::Ptr(source) => Ok(source.ptr),
            ConstBackend::Stream(_) => Err(PtrOrStreamError::NotAPtrError),
        }
    }

    /// The backing stream. Fails for a view backend.
    pub fn stream(&mut self) -> Result<&mut dyn ReadSeek, PtrOrStreamError> {
        match &mut self.backend {
            ConstBackend::Stream(source) => Ok(&mut *source.stream),
            ConstBackend::Ptr(_) => Err(PtrOrStreamError::NotAStreamError),
        }
    }

    /// Reads up to `length` bytes, advancing the cursor. A view backend
    /// returns less only when it ends first; a stream backend performs a
    /// single underlying read and returns whatever it delivers.
    pub fn read(&mut self, length: usize) -> Result<Bytes<'_>, PtrOrStreamError> {
        self.implementation().read(length)
    }

    /// Reads into the given view, advancing the cursor, and returns how many
    /// bytes were actually read. The stream backend performs a single
    /// underlying read.
    pub fn read_to(&mut self, result: Ptr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        self.implementation().read_to(result)
    }

    /// Reads everything from the cursor to the end, leaving the cursor at
    /// the end.
    pub fn read_all(&mut self) -> Result<Bytes<'_>, PtrOrStreamError> {
        self.implementation().read_all()
    }

    /// Like [`read_all`], but the result is independently owned and safe to
    /// hold past the source's lifetime.
    ///
    /// [`read_all`]: ConstPtrOrStream::read_all
    pub fn get_all(&mut self) -> Result<Vec<u8>, PtrOrStreamError> {
        self.implementation().get_all()
    }

    /// Moves the cursor and returns its new position. Targets before the
    /// origin are clamped to the origin; for a view, targets past the end
    /// are clamped to the end.
    pub fn seek(&mut self, origin: SeekFrom) -> Result<usize, PtrOrStreamError> {
        self.implementation().seek(origin)
    }

    /// The cursor's position, relative to the origin.
    pub fn position(&mut self) -> Result<usize, PtrOrStreamError> {
        self.implementation().position()
    }

    fn implementation(&mut self) -> &mut (dyn SourceImplementation + '_) {
        match &mut self.backend {
            ConstBackend::Ptr(implementation) => implementation,
            ConstBackend::Stream(implementation) => implementation,
        }
    }
}

impl <'a> From<ConstPtr<'a, u8>> for ConstPtrOrStream<'a> {
    fn from(ptr: ConstPtr<'a, u8>) -> ConstPtrOrStream<'a> {
        ConstPtrOrStream::of_ptr(ptr)
    }
}

impl <'a> From<&'a [u8]> for ConstPtrOrStream<'a> {
    fn from(data: &'a [u8]) -> ConstPtrOrStream<'a> {
        ConstPtrOrStream::of_ptr(ConstPtr::new(data))
    }
}
