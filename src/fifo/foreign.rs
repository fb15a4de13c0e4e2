use std::{
    fmt::{self, Debug, Formatter},
    mem,
    ops::{Deref, DerefMut},
};

/// A first-in-first-out window over a block of storage it does not allocate.
///
/// Data is appended at the tail and read from the head. The readable part is
/// always the contiguous region `[head, tail)` of the block. When the buffer
/// is drained both offsets go back to zero.
///
/// The buffer never allocates or frees memory: whoever supplies the storage
/// keeps owning it, and gets it back from [`FifoBuffer::move_buffer`] or
/// [`FifoBuffer::into_inner`].
///
/// It is not thread safe.
pub struct FifoBuffer<S> {
    data: S,
    head: usize,
    tail: usize,
}

/// A [`FifoBuffer`] over a borrowed block.
pub type ForeignFifoBuffer<'a, T> = FifoBuffer<&'a mut [T]>;

impl<T, S> FifoBuffer<S>
where
    T: Copy,
    S: DerefMut<Target = [T]>,
{
    /// Creates an empty buffer over the given storage.
    ///
    /// The capacity is the length of the storage.
    pub fn new(data: S) -> Self {
        FifoBuffer {
            data,
            head: 0,
            tail: 0,
        }
    }

    /// Returns the number of elements the storage can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Discards all buffered elements.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Returns true if there is nothing to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns true if the buffer can't take another element, even after
    /// shifting its contents.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.head == 0 && self.tail == self.capacity()
    }

    /// Returns the number of readable elements.
    #[inline]
    pub fn available(&self) -> usize {
        self.tail - self.head
    }

    /// Returns the readable elements.
    ///
    /// The returned slice is empty if the buffer is empty.
    #[inline]
    pub fn read(&self) -> &[T] {
        &self.data[self.head..self.tail]
    }

    /// Marks `n` elements at the head as consumed.
    ///
    /// # Panics
    ///
    /// Panics if `n` is greater than [`FifoBuffer::available`].
    pub fn consume(&mut self, n: usize) {
        assert!(
            n <= self.available(),
            "consume {} elements, but only {} available",
            n,
            self.available()
        );

        self.head += n;
        if self.head == self.tail {
            self.clear();
        }
    }

    /// Returns the writable space after the tail.
    ///
    /// The buffer is not shifted here, call [`FifoBuffer::want_write`] first
    /// to reclaim space in front of the head.
    #[inline]
    pub fn write(&mut self) -> &mut [T] {
        let tail = self.tail;
        &mut self.data[tail..]
    }

    /// Makes sure [`FifoBuffer::write`] returns at least `n` elements,
    /// without reallocating.
    ///
    /// The readable region is moved to the start of the storage if that frees
    /// enough space.
    ///
    /// Returns false, leaving the buffer untouched, if the storage is too small.
    pub fn want_write(&mut self, n: usize) -> bool {
        if self.capacity() - self.tail >= n {
            return true;
        }

        let in_use = self.available();
        if self.head == 0 || self.capacity() - in_use < n {
            return false;
        }

        log::trace!(
            "Shift {} elements from offset {} to the start of the buffer",
            in_use,
            self.head
        );

        self.data.copy_within(self.head..self.tail, 0);
        self.head = 0;
        self.tail = in_use;

        true
    }

    /// Marks `n` elements after the tail as written.
    ///
    /// # Panics
    ///
    /// Panics if `n` is greater than the length of [`FifoBuffer::write`].
    pub fn append(&mut self, n: usize) {
        assert!(
            n <= self.capacity() - self.tail,
            "append {} elements, but only {} writable",
            n,
            self.capacity() - self.tail
        );

        self.tail += n;
    }

    /// Copies the readable elements to the start of `data` and continues on
    /// top of it.
    ///
    /// Returns the old storage.
    ///
    /// # Panics
    ///
    /// Panics if `data` can't hold the readable elements.
    pub fn move_buffer(&mut self, mut data: S) -> S {
        let in_use = self.available();
        assert!(
            data.len() >= in_use,
            "new storage holds {} elements, but {} are in use",
            data.len(),
            in_use
        );

        data[..in_use].copy_from_slice(self.read());
        self.head = 0;
        self.tail = in_use;

        mem::replace(&mut self.data, data)
    }

    /// Returns the underlying storage.
    pub fn into_inner(self) -> S {
        self.data
    }

    #[cfg(test)]
    pub(crate) fn offsets(&self) -> (usize, usize) {
        (self.head, self.tail)
    }

    #[cfg(test)]
    pub(crate) fn storage_ptr(&self) -> *const T {
        self.data.as_ptr()
    }
}

impl<T, S> Debug for FifoBuffer<S>
where
    S: Deref<Target = [T]>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoBuffer")
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("capacity", &self.data.len())
            .finish()
    }
}
