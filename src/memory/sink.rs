//! The writable half of the buffer-or-stream protocol.
//!
//! [`PtrOrStream`] supports everything [`ConstPtrOrStream`] does and adds
//! writes. Plain writes go through [`write_from`]; in-place writes go
//! through a [`WriteLease`], which borrows the sink for as long as the
//! caller holds the writable window and commits it on [`end`].
//!
//! [`write_from`]: PtrOrStream::write_from
//! [`end`]: WriteLease::end

use std::io::{Read, Seek, SeekFrom, Write};
use std::ops::{Deref, DerefMut, Range};

use crate::memory::{Bytes, ConstPtr, ConstPtrOrStream, Ptr, PtrOrStreamError, ReadSeek};
use crate::memory::source::{read_buffer, read_buffer_to, read_once, seek_buffer, seek_stream, take_buffer, ConstBackend, PtrSource, SourceImplementation, StreamSource};

/// A seekable byte sink that can also be read back. Automatically
/// implemented for everything that is [`Read`], [`Write`] and [`Seek`].
///
/// [`as_read_seek`] narrows the sink to its read-only capabilities; it
/// exists because a `&mut dyn ReadWriteSeek` cannot be coerced into a
/// `&mut dyn ReadSeek` directly.
///
/// [`as_read_seek`]: ReadWriteSeek::as_read_seek
pub trait ReadWriteSeek: Read + Write + Seek {
    fn as_read_seek(&mut self) -> &mut dyn ReadSeek;
}

impl <S> ReadWriteSeek for S
where S: Read + Write + Seek {
    fn as_read_seek(&mut self) -> &mut dyn ReadSeek {
        self
    }
}

pub(crate) trait SinkImplementation: SourceImplementation {
    fn write_from(&mut self, source: ConstPtr<'_, u8>) -> Result<usize, PtrOrStreamError>;
}

pub(crate) struct PtrSink<'a> {
    pub(crate) ptr: Ptr<'a, u8>,
    pub(crate) offset: usize,
}

// The read half is the shared buffer cursor arithmetic from the source
// module, so the two view backends cannot drift apart.
impl <'a> SourceImplementation for PtrSink<'a> {

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

impl <'a> SinkImplementation for PtrSink<'a> {

    fn write_from(&mut self, source: ConstPtr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        let length = source.len().min(self.ptr.len() - self.offset);
        self.ptr.as_mut_slice()[self.offset..self.offset + length]
            .copy_from_slice(&source.as_slice()[..length]);
        self.offset += length;
        Ok(length)
    }
}

pub(crate) struct StreamSink<'a> {
    pub(crate) stream: &'a mut dyn ReadWriteSeek,
    pub(crate) origin: u64,
}

impl <'a> SourceImplementation for StreamSink<'a> {

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

impl <'a> SinkImplementation for StreamSink<'a> {

    fn write_from(&mut self, source: ConstPtr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        self.stream.write_all(source.as_slice())?;
        Ok(source.len())
    }
}

pub(crate) enum Backend<'a> {
    Ptr(PtrSink<'a>),
    Stream(StreamSink<'a>),
}

/// A writable byte sink backed by either an in-memory view or a seekable
/// stream.
///
/// Reads, seeks and the cursor behave exactly as on [`ConstPtrOrStream`].
/// Writes come in two shapes:
///
/// * [`write_from`] copies bytes from a view to the cursor. A view backend
///   writes short when it runs out of room; a stream backend writes
///   everything.
/// * [`start_write`] / [`start_read_write`] lend out a writable window at
///   the cursor as a [`WriteLease`]. The cursor moves past the window
///   immediately, so a view backend exposes its own memory without further
///   bookkeeping, while a stream backend commits the window once
///   [`WriteLease::end`] is called.
///
/// [`write_from`]: PtrOrStream::write_from
/// [`start_write`]: PtrOrStream::start_write
/// [`start_read_write`]: PtrOrStream::start_read_write
pub struct PtrOrStream<'a> {
    backend: Backend<'a>,
}

impl <'a> PtrOrStream<'a> {

    /// Creates a sink over the given view.
    pub fn of_ptr(ptr: Ptr<'a, u8>) -> PtrOrStream<'a> {
        PtrOrStream {
            backend: Backend::Ptr(PtrSink { ptr, offset: 0 }),
        }
    }

    /// Creates a sink over the given stream, with the stream's current
    /// position as the origin. Fails if the position cannot be queried.
    pub fn of_stream(stream: &'a mut dyn ReadWriteSeek) -> Result<PtrOrStream<'a>, PtrOrStreamError> {
        let origin = stream.stream_position()?;
        Ok(PtrOrStream {
            backend: Backend::Stream(StreamSink { stream, origin }),
        })
    }

    /// Creates a sink over the given stream whose positions are the
    /// stream's own, regardless of where the stream currently is.
    pub fn of_stream_inheriting(stream: &'a mut dyn ReadWriteSeek) -> PtrOrStream<'a> {
        PtrOrStream {
            backend: Backend::Stream(StreamSink { stream, origin: 0 }),
        }
    }

    pub fn is_ptr(&self) -> bool {
        matches!(self.backend, Backend::Ptr(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.backend, Backend::Stream(_))
    }

    /// The backing view, covering the whole viewed memory regardless of the
    /// cursor. Fails for a stream backend.
    pub fn ptr(&mut self) -> Result<Ptr<'_, u8>, PtrOrStreamError> {
        match &mut self.backend {
            Backend::Ptr(sink) => Ok(sink.ptr.reborrow()),
            Backend::Stream(_) => Err(PtrOrStreamError::NotAPtrError),
        }
    }

    /// The backing stream. Fails for a view backend.
    pub fn stream(&mut self) -> Result<&mut dyn ReadWriteSeek, PtrOrStreamError> {
        match &mut self.backend {
            Backend::Stream(sink) => Ok(&mut *sink.stream),
            Backend::Ptr(_) => Err(PtrOrStreamError::NotAStreamError),
        }
    }

    /// See [`ConstPtrOrStream::read`].
    pub fn read(&mut self, length: usize) -> Result<Bytes<'_>, PtrOrStreamError> {
        self.implementation().read(length)
    }

    /// See [`ConstPtrOrStream::read_to`].
    pub fn read_to(&mut self, result: Ptr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        self.implementation().read_to(result)
    }

    /// See [`ConstPtrOrStream::read_all`].
    pub fn read_all(&mut self) -> Result<Bytes<'_>, PtrOrStreamError> {
        self.implementation().read_all()
    }

    /// See [`ConstPtrOrStream::get_all`].
    pub fn get_all(&mut self) -> Result<Vec<u8>, PtrOrStreamError> {
        self.implementation().get_all()
    }

    /// See [`ConstPtrOrStream::seek`].
    pub fn seek(&mut self, origin: SeekFrom) -> Result<usize, PtrOrStreamError> {
        self.implementation().seek(origin)
    }

    /// See [`ConstPtrOrStream::position`].
    pub fn position(&mut self) -> Result<usize, PtrOrStreamError> {
        self.implementation().position()
    }

    /// Copies bytes from the given view to the cursor, advancing it, and
    /// returns how many bytes were written. A view backend stops at its end;
    /// a stream backend always writes all of `source`.
    pub fn write_from(&mut self, source: ConstPtr<'_, u8>) -> Result<usize, PtrOrStreamError> {
        self.implementation().write_from(source)
    }

    /// Lends out a writable window of up to `length` bytes at the cursor
    /// and moves the cursor past it. The window's initial contents are not
    /// meaningful; overwrite them and call [`WriteLease::end`].
    ///
    /// A view backend shortens the window when it runs out of room.
    pub fn start_write(&mut self, length: usize) -> WriteLease<'_, 'a> {
        let window = match &mut self.backend {
            Backend::Ptr(sink) => {
                let start = sink.offset;
                let length = length.min(sink.ptr.len() - start);
                sink.offset = start + length;
                WriteWindow::Ptr(start..start + length)
            }
            Backend::Stream(_) => WriteWindow::Stream(vec![0; length]),
        };
        WriteLease { sink: self, window }
    }

    /// Like [`start_write`], but the window starts out holding the bytes
    /// currently at the cursor, so callers can modify them in place. The
    /// window is shortened when the sink ends before `length` bytes.
    ///
    /// [`start_write`]: PtrOrStream::start_write
    pub fn start_read_write(&mut self, length: usize) -> Result<WriteLease<'_, 'a>, PtrOrStreamError> {
        let window = match &mut self.backend {
            Backend::Ptr(sink) => {
                let start = sink.offset;
                let length = length.min(sink.ptr.len() - start);
                sink.offset = start + length;
                WriteWindow::Ptr(start..start + length)
            }
            Backend::Stream(sink) => {
                let mut scratch = vec![0; length];
                let filled = read_once(&mut *sink.stream, &mut scratch)?;
                scratch.truncate(filled);
                // Back to the window's start, so end() overwrites it.
                sink.stream.seek(SeekFrom::Current(-(filled as i64)))?;
                WriteWindow::Stream(scratch)
            }
        };
        Ok(WriteLease { sink: self, window })
    }

    /// Converts this sink into a read-only source over the same backing
    /// storage, keeping the cursor where it is.
    pub fn into_const(self) -> ConstPtrOrStream<'a> {
        let backend = match self.backend {
            Backend::Ptr(sink) => ConstBackend::Ptr(PtrSource {
                ptr: sink.ptr.into_const(),
                offset: sink.offset,
            }),
            Backend::Stream(sink) => ConstBackend::Stream(StreamSource {
                stream: sink.stream.as_read_seek(),
                origin: sink.origin,
            }),
        };
        ConstPtrOrStream { backend }
    }

    fn implementation(&mut self) -> &mut (dyn SinkImplementation + '_) {
        match &mut self.backend {
            Backend::Ptr(implementation) => implementation,
            Backend::Stream(implementation) => implementation,
        }
    }
}

impl <'a> From<Ptr<'a, u8>> for PtrOrStream<'a> {
    fn from(ptr: Ptr<'a, u8>) -> PtrOrStream<'a> {
        PtrOrStream::of_ptr(ptr)
    }
}

impl <'a> From<&'a mut [u8]> for PtrOrStream<'a> {
    fn from(data: &'a mut [u8]) -> PtrOrStream<'a> {
        PtrOrStream::of_ptr(Ptr::new(data))
    }
}

impl <'a> From<PtrOrStream<'a>> for ConstPtrOrStream<'a> {
    fn from(sink: PtrOrStream<'a>) -> ConstPtrOrStream<'a> {
        sink.into_const()
    }
}

enum WriteWindow {
    Ptr(Range<usize>),
    Stream(Vec<u8>),
}

/// A writable window lent out by [`PtrOrStream::start_write`] or
/// [`PtrOrStream::start_read_write`].
///
/// The lease borrows the sink exclusively, so no other operation can run
/// until it is released. Dereference it to read and write the window, then
/// call [`end`] to commit; for a view backend the window is the sink's own
/// memory and every write lands immediately, for a stream backend the
/// window is scratch space that [`end`] flushes. Dropping the lease without
/// calling [`end`] discards a stream window and leaves the stream at the
/// window's start.
///
/// [`end`]: WriteLease::end
pub struct WriteLease<'s, 'a> {
    sink: &'s mut PtrOrStream<'a>,
    window: WriteWindow,
}

impl <'s, 'a> WriteLease<'s, 'a> {

    /// The window's length in bytes.
    pub fn len(&self) -> usize {
        match &self.window {
            WriteWindow::Ptr(range) => range.len(),
            WriteWindow::Stream(scratch) => scratch.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The window as a writable view.
    pub fn as_ptr(&mut self) -> Ptr<'_, u8> {
        Ptr::new(&mut self[..])
    }

    /// Commits the window and releases the sink. Returns the window's
    /// length.
    pub fn end(self) -> Result<usize, PtrOrStreamError> {
        let WriteLease { sink, window } = self;
        match window {
            WriteWindow::Ptr(range) => Ok(range.len()),
            WriteWindow::Stream(scratch) => {
                match &mut sink.backend {
                    Backend::Stream(stream_sink) => {
                        stream_sink.stream.write_all(&scratch)?;
                        Ok(scratch.len())
                    }
                    Backend::Ptr(_) => {
                        unreachable!("A stream window always belongs to a stream backend!")
                    }
                }
            }
        }
    }
}

impl <'s, 'a> Deref for WriteLease<'s, 'a> {

    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.window {
            WriteWindow::Ptr(range) => {
                match &self.sink.backend {
                    Backend::Ptr(sink) => &sink.ptr.as_slice()[range.clone()],
                    Backend::Stream(_) => {
                        unreachable!("A ptr window always belongs to a ptr backend!")
                    }
                }
            }
            WriteWindow::Stream(scratch) => scratch,
        }
    }
}

impl <'s, 'a> DerefMut for WriteLease<'s, 'a> {

    fn deref_mut(&mut self) -> &mut [u8] {
        match &mut self.window {
            WriteWindow::Ptr(range) => {
                match &mut self.sink.backend {
                    Backend::Ptr(sink) => &mut sink.ptr.as_mut_slice()[range.clone()],
                    Backend::Stream(_) => {
                        unreachable!("A ptr window always belongs to a ptr backend!")
                    }
                }
            }
            WriteWindow::Stream(scratch) => scratch,
        }
    }
}
