use std::{
    collections::TryReserveError,
    fmt::{self, Debug, Display, Formatter},
    io,
};

use crate::fifo::foreign::FifoBuffer;

/// A first-in-first-out buffer which owns its storage and grows it on demand.
///
/// Writers ask for room with [`GrowableFifoBuffer::want_write`] (or
/// [`GrowableFifoBuffer::write_n`]). The buffer first tries to shift its
/// contents to the start of the storage, and only allocates a larger block
/// when that is not enough. The capacity is doubled until the request fits.
///
/// It is not thread safe.
pub struct GrowableFifoBuffer<T> {
    inner: FifoBuffer<Box<[T]>>,
}

impl<T: Copy + Default> GrowableFifoBuffer<T> {
    /// Creates an empty buffer with room for `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        Ok(GrowableFifoBuffer {
            inner: FifoBuffer::new(allocate(capacity)?),
        })
    }

    /// Returns the number of elements the buffer can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Discards all buffered elements. The storage is kept.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Returns true if there is nothing to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if the next write needs to grow the storage.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Returns the number of readable elements.
    #[inline]
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    /// Returns the readable elements.
    #[inline]
    pub fn read(&self) -> &[T] {
        self.inner.read()
    }

    /// Marks `n` elements at the head as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n` is greater than [`GrowableFifoBuffer::available`].
    pub fn consume(&mut self, n: usize) {
        self.inner.consume(n);
    }

    /// Returns the writable space after the tail, without shifting or growing.
    #[inline]
    pub fn write(&mut self) -> &mut [T] {
        self.inner.write()
    }

    /// Marks `n` elements after the tail as written.
    ///
    /// # Panics
    ///
    /// Panics if `n` is greater than the length of [`GrowableFifoBuffer::write`].
    pub fn append(&mut self, n: usize) {
        self.inner.append(n);
    }

    /// Replaces the storage with a new block of exactly `new_capacity`
    /// elements, keeping the readable elements.
    ///
    /// The buffer is unchanged if the allocation fails.
    ///
    /// # Panics
    ///
    /// Panics if `new_capacity` is not greater than the current capacity.
    pub fn grow(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        assert!(
            new_capacity > self.capacity(),
            "grow to {} elements, but the capacity is already {}",
            new_capacity,
            self.capacity()
        );

        let data = allocate(new_capacity)?;

        log::debug!(
            "Grow buffer from {} to {} elements ({} in use)",
            self.capacity(),
            new_capacity,
            self.available()
        );

        // The old block is dropped here, after the data has been copied.
        self.inner.move_buffer(data);

        Ok(())
    }

    /// Makes sure [`GrowableFifoBuffer::write`] returns at least `n` elements.
    ///
    /// Shifts the readable elements if that frees enough space, otherwise
    /// grows the storage to the smallest doubling of the current capacity
    /// that holds them plus `n` more.
    pub fn want_write(&mut self, n: usize) -> Result<(), AllocError> {
        if self.inner.want_write(n) {
            return Ok(());
        }

        let required_capacity = self
            .available()
            .checked_add(n)
            .ok_or(AllocError::CapacityOverflow)?;

        let mut new_capacity = self.capacity().max(1);
        loop {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(AllocError::CapacityOverflow)?;
            if new_capacity >= required_capacity {
                break;
            }
        }

        self.grow(new_capacity)
    }

    /// Returns the writable space after the tail, growing the buffer so it
    /// holds at least `n` elements.
    ///
    /// Call [`GrowableFifoBuffer::append`] with the number of elements
    /// actually written.
    pub fn write_n(&mut self, n: usize) -> Result<&mut [T], AllocError> {
        self.want_write(n)?;
        Ok(self.inner.write())
    }

    /// Copies `data` to the end of the buffer, growing it as needed.
    pub fn append_slice(&mut self, data: &[T]) -> Result<(), AllocError> {
        self.write_n(data.len())?[..data.len()].copy_from_slice(data);
        self.inner.append(data.len());

        Ok(())
    }

    #[cfg(test)]
    fn storage_ptr(&self) -> *const T {
        self.inner.storage_ptr()
    }

    #[cfg(test)]
    fn offsets(&self) -> (usize, usize) {
        self.inner.offsets()
    }
}

impl<T: Copy + Default> Clone for GrowableFifoBuffer<T> {
    /// Copies the readable elements into a new block of the same capacity.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    fn clone(&self) -> Self {
        let mut buf = match GrowableFifoBuffer::new(self.capacity()) {
            Ok(buf) => buf,
            Err(e) => panic!("unable to clone buffer: {}", e),
        };

        let data = self.read();
        buf.write()[..data.len()].copy_from_slice(data);
        buf.append(data.len());

        buf
    }
}

impl<T: Copy + Default> Debug for GrowableFifoBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GrowableFifoBuffer")
            .field(&self.inner)
            .finish()
    }
}

/// Allocates a block of `capacity` default elements.
fn allocate<T: Copy + Default>(capacity: usize) -> Result<Box<[T]>, AllocError> {
    let mut data = Vec::new();
    if let Err(e) = data.try_reserve_exact(capacity) {
        log::error!("Unable to allocate a buffer of {} elements", capacity);
        return Err(AllocError::OutOfMemory {
            capacity,
            source: e,
        });
    }

    data.resize(capacity, T::default());
    Ok(data.into_boxed_slice())
}

/// Errors when allocating storage for a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The required capacity does not fit in `usize`.
    CapacityOverflow,

    /// The allocator could not provide the block.
    OutOfMemory {
        /// The requested capacity in elements.
        capacity: usize,
        source: TryReserveError,
    },
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow => write!(f, "capacity overflow"),
            AllocError::OutOfMemory { capacity, .. } => {
                write!(f, "unable to allocate {} elements", capacity)
            }
        }
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocError::CapacityOverflow => None,
            AllocError::OutOfMemory { source, .. } => Some(source),
        }
    }
}

impl From<AllocError> for io::Error {
    fn from(e: AllocError) -> Self {
        io::Error::new(io::ErrorKind::OutOfMemory, e)
    }
}
