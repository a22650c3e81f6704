use std::fmt;
use std::mem;
use std::slice::Iter;

use crate::memory::{MemoryError, Ptr};

/// A non-owning, bounds-checked, read-only view over contiguous memory with
/// pointer-arithmetic-style operations.
///
/// A `ConstPtr` is a plain {base, length} pair and is `Copy`: duplicating it
/// duplicates the handle, never the memory. All derived views ([`slice`],
/// [`advance`], [`offset_by`]) are new values; a `ConstPtr` is never mutated
/// in place.
///
/// Equality of two `ConstPtr`s is *identity* (same base address and length),
/// exposed as [`ptr_eq`]; comparing element values is a separate operation,
/// [`has_same_contents`]. `PartialEq` and `Hash` are deliberately not
/// implemented, so accidental content-or-identity confusion is rejected at
/// compile time.
///
/// # Examples
///
/// ```rust
/// use ptr_rs::memory::ConstPtr;
///
/// let data = [1, 2, 3];
/// let mut ptr = ConstPtr::new(&data);
///
/// let mut sum = 0;
/// while !ptr.is_empty() {
///     sum += ptr.first().expect("Failed to read the first element!");
///     ptr = ptr.advance().expect("Failed to advance the ptr!");
/// }
///
/// assert_eq!(sum, 6);
/// ```
///
/// [`slice`]: ConstPtr::slice
/// [`advance`]: ConstPtr::advance
/// [`offset_by`]: ConstPtr::offset_by
/// [`ptr_eq`]: ConstPtr::ptr_eq
/// [`has_same_contents`]: ConstPtr::has_same_contents
pub struct ConstPtr<'a, A> {
    data: &'a [A],
}

impl <'a, A> ConstPtr<'a, A> {

    /// Creates a `ConstPtr` over the given slice or array.
    pub fn new(data: &'a [A]) -> ConstPtr<'a, A> {
        ConstPtr { data }
    }

    /// The number of elements in the viewed memory.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the view contains no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the element at index 0.
    pub fn first(&self) -> Result<&'a A, MemoryError> {
        self.data.first().ok_or(MemoryError::EmptyPtrError)
    }

    /// Returns the element at the given index.
    pub fn at(&self, index: usize) -> Result<&'a A, MemoryError> {
        self.data.get(index).ok_or(MemoryError::OutOfRangeError {
            index,
            length: self.data.len(),
        })
    }

    /// Returns a new view over `length` elements starting at `start`.
    ///
    /// The slice is valid iff `start <= len()` and `start + length <= len()`;
    /// in particular a zero-length slice at the very end of the view is
    /// valid.
    pub fn slice(&self, start: usize, length: usize) -> Result<ConstPtr<'a, A>, MemoryError> {
        if start > self.data.len() || self.data.len() - start < length {
            return Err(MemoryError::SliceOutOfRangeError {
                start,
                length,
                available: self.data.len(),
            });
        }
        Ok(ConstPtr::new(&self.data[start..start + length]))
    }

    /// Returns a new view shifted by one element, one element shorter.
    pub fn advance(self) -> Result<ConstPtr<'a, A>, MemoryError> {
        if self.data.is_empty() {
            return Err(MemoryError::EmptyPtrError);
        }
        Ok(ConstPtr::new(&self.data[1..]))
    }

    /// Returns a new view shifted by `count` elements, `count` elements
    /// shorter.
    ///
    /// `count` must be strictly less than the length: an empty tail cannot be
    /// produced through this operation, only through [`advance`](Self::advance)
    /// at length one or through [`slice`](Self::slice).
    pub fn offset_by(self, count: usize) -> Result<ConstPtr<'a, A>, MemoryError> {
        if count >= self.data.len() {
            return Err(MemoryError::OutOfRangeError {
                index: count,
                length: self.data.len(),
            });
        }
        Ok(ConstPtr::new(&self.data[count..]))
    }

    /// The element distance from `origin`'s base address to this view's base
    /// address.
    ///
    /// The result is only meaningful when both views originate from the same
    /// backing memory; for unrelated views it is an arbitrary value (computed
    /// from raw addresses without dereferencing, so unlike real pointer
    /// subtraction it is never undefined behaviour).
    pub fn distance_to(&self, origin: ConstPtr<'_, A>) -> isize {
        // Zero-sized elements have no address spacing, fall back to bytes.
        let size = mem::size_of::<A>().max(1);
        (self.data.as_ptr() as isize - origin.data.as_ptr() as isize) / size as isize
    }

    /// Returns true if both views have the same base address and the same
    /// length. This does not compare the viewed elements, see
    /// [`has_same_contents`](Self::has_same_contents).
    pub fn ptr_eq(&self, other: ConstPtr<'_, A>) -> bool {
        self.data.len() == other.data.len()
            && std::ptr::eq(self.data.as_ptr(), other.data.as_ptr())
    }

    /// The viewed memory as a plain slice.
    pub fn as_slice(&self) -> &'a [A] {
        self.data
    }

    /// Iterates over the viewed elements. The iteration consumes nothing;
    /// the view can be iterated any number of times.
    pub fn iter(&self) -> Iter<'a, A> {
        self.data.iter()
    }
}

impl <'a, A> ConstPtr<'a, A>
where A: Copy {

    /// Copies all viewed elements to the beginning of `dest`.
    pub fn copy_to(&self, dest: &mut Ptr<'_, A>) -> Result<(), MemoryError> {
        if dest.len() < self.data.len() {
            return Err(MemoryError::SliceOutOfRangeError {
                start: 0,
                length: self.data.len(),
                available: dest.len(),
            });
        }
        dest.as_mut_slice()[..self.data.len()].copy_from_slice(self.data);
        Ok(())
    }
}

impl <'a, A> Clone for ConstPtr<'a, A> {
    fn clone(&self) -> ConstPtr<'a, A> {
        *self
    }
}

impl <'a, A> Copy for ConstPtr<'a, A> {}

impl <'a, A> fmt::Debug for ConstPtr<'a, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("ConstPtr")
            .field("address", &self.data.as_ptr())
            .field("length", &self.data.len())
            .finish()
    }
}

impl <'a, A> IntoIterator for ConstPtr<'a, A> {

    type Item = &'a A;
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Iter<'a, A> {
        self.data.iter()
    }
}

impl <'s, 'a, A> IntoIterator for &'s ConstPtr<'a, A> {

    type Item = &'a A;
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Iter<'a, A> {
        self.data.iter()
    }
}

impl <'a, A> From<&'a [A]> for ConstPtr<'a, A> {
    fn from(data: &'a [A]) -> ConstPtr<'a, A> {
        ConstPtr::new(data)
    }
}

impl <'a, A, const N: usize> From<&'a [A; N]> for ConstPtr<'a, A> {
    fn from(data: &'a [A; N]) -> ConstPtr<'a, A> {
        ConstPtr::new(data)
    }
}

impl <'a, A> From<&'a Vec<A>> for ConstPtr<'a, A> {
    fn from(data: &'a Vec<A>) -> ConstPtr<'a, A> {
        ConstPtr::new(data)
    }
}

impl <'a, A> From<Ptr<'a, A>> for ConstPtr<'a, A> {
    fn from(ptr: Ptr<'a, A>) -> ConstPtr<'a, A> {
        ptr.into_const()
    }
}

#[cfg(test)]
mod test {
    use hamcrest2::prelude::*;

    use crate::memory::{ConstPtr, MemoryError, Ptr};

    #[test]
    fn test_that_a_ptr_reflects_the_backing_array() {

        let data = [10, 20, 30, 40, 50];
        let ptr = ConstPtr::new(&data);

        assert_that!(ptr.len(), is(equal_to(data.len())));

        for (index, value) in data.iter().enumerate() {
            assert_that!(ptr.at(index).unwrap(), is(equal_to(value)));
        }
    }

    #[test]
    fn test_that_at_fails_outside_the_valid_range() {

        let data = [1, 2, 3];
        let ptr = ConstPtr::new(&data);

        assert_that!(ptr.at(3), is(err()));
        assert_that!(ptr.at(100), is(err()));
    }

    #[test]
    fn test_that_first_returns_the_first_element() {

        let data = [7, 8, 9];
        let ptr = ConstPtr::new(&data);

        assert_that!(ptr.first().unwrap(), is(equal_to(&7)));
        assert_that!(ConstPtr::<i32>::new(&[]).first(), is(err()));
    }

    #[test]
    fn test_that_advance_shifts_by_one_element() {

        let data = [1, 2, 3, 4];
        let mut ptr = ConstPtr::new(&data);

        for expected in &data {
            assert_that!(ptr.first().unwrap(), is(equal_to(expected)));
            ptr = ptr.advance().unwrap();
        }

        assert_that!(ptr.is_empty(), is(true));
        assert_that!(ptr.advance(), is(err()));
    }

    #[test]
    fn test_that_offset_by_shifts_and_shrinks() {

        let data = [1, 2, 3, 4, 5];
        let ptr = ConstPtr::new(&data);

        let shifted = ptr.offset_by(3).unwrap();

        assert_that!(shifted.len(), is(equal_to(2)));
        assert_that!(shifted.first().unwrap(), is(equal_to(&4)));
    }

    #[test]
    fn test_that_offset_by_rejects_the_full_length() {

        let data = [1, 2, 3];
        let ptr = ConstPtr::new(&data);

        assert_that!(ptr.offset_by(3).is_err(), is(true));
        assert_that!(matches!(ptr.offset_by(3), Err(MemoryError::OutOfRangeError { .. })), is(true));
    }

    #[test]
    fn test_that_slice_and_distance_round_trip() {

        let data = [0, 1, 2, 3, 4, 5, 6, 7];
        let ptr = ConstPtr::new(&data);

        for start in 0..data.len() {
            for length in 0..=(data.len() - start) {
                let slice = ptr.slice(start, length).unwrap();
                assert_that!(slice.len(), is(equal_to(length)));
                assert_that!(slice.distance_to(ptr), is(equal_to(start as isize)));
            }
        }
    }

    #[test]
    fn test_that_a_zero_length_slice_at_the_end_is_valid() {

        let data = [1, 2, 3];
        let ptr = ConstPtr::new(&data);

        assert_that!(ptr.slice(3, 0).unwrap().is_empty(), is(true));
        assert_that!(ptr.slice(3, 1), is(err()));
        assert_that!(ptr.slice(4, 0), is(err()));
        assert_that!(ptr.slice(1, 3), is(err()));
    }

    #[test]
    fn test_that_ptr_eq_compares_identity_not_contents() {

        let left = [1, 2, 3];
        let right = [1, 2, 3];

        let ptr = ConstPtr::new(&left);
        let other = ConstPtr::new(&right);

        assert_that!(ptr.ptr_eq(ptr), is(true));
        assert_that!(ptr.ptr_eq(other), is(false));
        assert_that!(ptr.ptr_eq(ptr.slice(0, 2).unwrap()), is(false));
    }

    #[test]
    fn test_that_iteration_is_restartable() {

        let data = [1, 2, 3];
        let ptr = ConstPtr::new(&data);

        let first: i32 = ptr.iter().sum();
        let second: i32 = ptr.iter().sum();

        assert_that!(first, is(equal_to(6)));
        assert_that!(second, is(equal_to(6)));
    }

    #[test]
    fn test_that_copy_to_copies_the_contents() {

        let source = [1, 2, 3];
        let mut destination = [0; 5];

        let ptr = ConstPtr::new(&source);
        let mut dest = Ptr::new(&mut destination);

        ptr.copy_to(&mut dest).unwrap();

        assert_that!(destination.to_vec(), is(equal_to(vec![1, 2, 3, 0, 0])));
    }

    #[test]
    fn test_that_copy_to_fails_when_the_destination_is_too_short() {

        let source = [1, 2, 3];
        let mut destination = [0; 2];

        let ptr = ConstPtr::new(&source);
        let mut dest = Ptr::new(&mut destination);

        assert_that!(ptr.copy_to(&mut dest), is(err()));
    }

    #[test]
    fn test_that_a_const_ptr_can_be_created_from_a_ptr() {

        let mut data = [1, 2, 3];
        let ptr = Ptr::new(&mut data);

        let const_ptr: ConstPtr<i32> = ptr.into();

        assert_that!(const_ptr.len(), is(equal_to(3)));
        assert_that!(const_ptr.first().unwrap(), is(equal_to(&1)));
    }
}
