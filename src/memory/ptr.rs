use std::fmt;
use std::slice::{Iter, IterMut};

use crate::memory::{ConstPtr, MemoryError};

/// The mutable counterpart of [`ConstPtr`]: a non-owning, bounds-checked view
/// over contiguous memory whose elements can be read and written.
///
/// Because mutable access is exclusive, a `Ptr` is not `Copy`; derived views
/// ([`slice`], [`advance`], [`offset_by`]) consume the ptr and hand the
/// borrow on. Use [`reborrow`] to work with a temporary copy while keeping
/// the original, and [`as_const`] / [`into_const`] for the widening
/// conversion to [`ConstPtr`]. The reverse conversion does not exist.
///
/// [`slice`]: Ptr::slice
/// [`advance`]: Ptr::advance
/// [`offset_by`]: Ptr::offset_by
/// [`reborrow`]: Ptr::reborrow
/// [`as_const`]: Ptr::as_const
/// [`into_const`]: Ptr::into_const
pub struct Ptr<'a, A> {
    data: &'a mut [A],
}

impl <'a, A> Ptr<'a, A> {

    /// Creates a `Ptr` over the given mutable slice or array.
    pub fn new(data: &'a mut [A]) -> Ptr<'a, A> {
        Ptr { data }
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
    pub fn first(&self) -> Result<&A, MemoryError> {
        self.data.first().ok_or(MemoryError::EmptyPtrError)
    }

    /// Returns the element at index 0 for writing.
    pub fn first_mut(&mut self) -> Result<&mut A, MemoryError> {
        self.data.first_mut().ok_or(MemoryError::EmptyPtrError)
    }

    /// Returns the element at the given index.
    pub fn at(&self, index: usize) -> Result<&A, MemoryError> {
        let length = self.data.len();
        self.data.get(index).ok_or(MemoryError::OutOfRangeError { index, length })
    }

    /// Returns the element at the given index for writing.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut A, MemoryError> {
        let length = self.data.len();
        self.data.get_mut(index).ok_or(MemoryError::OutOfRangeError { index, length })
    }

    /// Returns a new view over `length` elements starting at `start`,
    /// consuming this ptr. The boundary rule matches [`ConstPtr::slice`]:
    /// `start <= len()` and `start + length <= len()`.
    pub fn slice(self, start: usize, length: usize) -> Result<Ptr<'a, A>, MemoryError> {
        if start > self.data.len() || self.data.len() - start < length {
            return Err(MemoryError::SliceOutOfRangeError {
                start,
                length,
                available: self.data.len(),
            });
        }
        Ok(Ptr::new(&mut self.data[start..start + length]))
    }

    /// Returns a new view shifted by one element, one element shorter,
    /// consuming this ptr.
    pub fn advance(self) -> Result<Ptr<'a, A>, MemoryError> {
        if self.data.is_empty() {
            return Err(MemoryError::EmptyPtrError);
        }
        Ok(Ptr::new(&mut self.data[1..]))
    }

    /// Returns a new view shifted by `count` elements, `count` elements
    /// shorter, consuming this ptr. `count` must be strictly less than the
    /// length, matching [`ConstPtr::offset_by`].
    pub fn offset_by(self, count: usize) -> Result<Ptr<'a, A>, MemoryError> {
        if count >= self.data.len() {
            return Err(MemoryError::OutOfRangeError {
                index: count,
                length: self.data.len(),
            });
        }
        Ok(Ptr::new(&mut self.data[count..]))
    }

    /// Returns a shorter-lived `Ptr` over the same memory, leaving this ptr
    /// usable once the reborrowed one is gone.
    pub fn reborrow(&mut self) -> Ptr<'_, A> {
        Ptr::new(&mut *self.data)
    }

    /// Returns a read-only view over the same memory, borrowed from this
    /// ptr.
    pub fn as_const(&self) -> ConstPtr<'_, A> {
        ConstPtr::new(&*self.data)
    }

    /// Converts this ptr into a read-only view over the same memory.
    pub fn into_const(self) -> ConstPtr<'a, A> {
        ConstPtr::new(self.data)
    }

    /// The element distance from `origin`'s base address to this view's base
    /// address, see [`ConstPtr::distance_to`].
    pub fn distance_to(&self, origin: ConstPtr<'_, A>) -> isize {
        self.as_const().distance_to(origin)
    }

    /// Returns true if both views have the same base address and the same
    /// length, see [`ConstPtr::ptr_eq`].
    pub fn ptr_eq(&self, other: &Ptr<'_, A>) -> bool {
        self.as_const().ptr_eq(other.as_const())
    }

    /// The viewed memory as a plain slice.
    pub fn as_slice(&self) -> &[A] {
        self.data
    }

    /// The viewed memory as a plain mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [A] {
        self.data
    }

    /// Iterates over the viewed elements.
    pub fn iter(&self) -> Iter<'_, A> {
        self.data.iter()
    }

    /// Iterates over the viewed elements, allowing in-place mutation.
    pub fn iter_mut(&mut self) -> IterMut<'_, A> {
        self.data.iter_mut()
    }
}

impl <'a, A> Ptr<'a, A>
where A: Clone {

    /// Overwrites every viewed element with the given value.
    pub fn fill(&mut self, value: A) {
        self.data.fill(value)
    }
}

impl <'a, A> Ptr<'a, A>
where A: Copy {

    /// Copies all viewed elements to the beginning of `dest`, see
    /// [`ConstPtr::copy_to`].
    pub fn copy_to(&self, dest: &mut Ptr<'_, A>) -> Result<(), MemoryError> {
        self.as_const().copy_to(dest)
    }
}

impl <'a, A> fmt::Debug for Ptr<'a, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Ptr")
            .field("address", &self.data.as_ptr())
            .field("length", &self.data.len())
            .finish()
    }
}

impl <'a, A> IntoIterator for Ptr<'a, A> {

    type Item = &'a mut A;
    type IntoIter = IterMut<'a, A>;

    fn into_iter(self) -> IterMut<'a, A> {
        self.data.iter_mut()
    }
}

impl <'s, 'a, A> IntoIterator for &'s Ptr<'a, A> {

    type Item = &'s A;
    type IntoIter = Iter<'s, A>;

    fn into_iter(self) -> Iter<'s, A> {
        self.data.iter()
    }
}

impl <'s, 'a, A> IntoIterator for &'s mut Ptr<'a, A> {

    type Item = &'s mut A;
    type IntoIter = IterMut<'s, A>;

    fn into_iter(self) -> IterMut<'s, A> {
        self.data.iter_mut()
    }
}

impl <'a, A> From<&'a mut [A]> for Ptr<'a, A> {
    fn from(data: &'a mut [A]) -> Ptr<'a, A> {
        Ptr::new(data)
    }
}

impl <'a, A, const N: usize> From<&'a mut [A; N]> for Ptr<'a, A> {
    fn from(data: &'a mut [A; N]) -> Ptr<'a, A> {
        Ptr::new(data)
    }
}

impl <'a, A> From<&'a mut Vec<A>> for Ptr<'a, A> {
    fn from(data: &'a mut Vec<A>) -> Ptr<'a, A> {
        Ptr::new(data)
    }
}

#[cfg(test)]
mod test {
    use hamcrest2::prelude::*;

    use crate::memory::Ptr;

    #[test]
    fn test_that_elements_can_be_mutated_through_at_mut() {

        let mut data = [1, 2, 3];

        {
            let mut ptr = Ptr::new(&mut data);
            *ptr.at_mut(1).unwrap() = 42;
            assert_that!(ptr.at_mut(3), is(err()));
        }

        assert_that!(data.to_vec(), is(equal_to(vec![1, 42, 3])));
    }

    #[test]
    fn test_that_first_mut_rejects_an_empty_ptr() {

        let mut data: [i32; 0] = [];
        let mut ptr = Ptr::new(&mut data);

        assert_that!(ptr.first_mut(), is(err()));
    }

    #[test]
    fn test_that_iteration_mutates_in_place() {

        let mut data = [1, 2, 3, 4];

        {
            let ptr = Ptr::new(&mut data);
            for value in ptr {
                *value *= 10;
            }
        }

        assert_that!(data.to_vec(), is(equal_to(vec![10, 20, 30, 40])));
    }

    #[test]
    fn test_that_slice_transfers_the_borrow() {

        let mut data = [0; 5];

        {
            let ptr = Ptr::new(&mut data);
            let mut middle = ptr.slice(1, 3).unwrap();
            middle.fill(7);
        }

        assert_that!(data.to_vec(), is(equal_to(vec![0, 7, 7, 7, 0])));
    }

    #[test]
    fn test_that_advance_walks_the_whole_ptr() {

        let mut data = [1, 2, 3];

        {
            let mut ptr = Ptr::new(&mut data);
            while !ptr.is_empty() {
                *ptr.first_mut().unwrap() += 1;
                ptr = match ptr.advance() {
                    Ok(advanced) => advanced,
                    Err(_) => break,
                };
            }
        }

        assert_that!(data.to_vec(), is(equal_to(vec![2, 3, 4])));
    }

    #[test]
    fn test_that_reborrow_leaves_the_original_usable() {

        let mut data = [1, 2, 3];
        let mut ptr = Ptr::new(&mut data);

        {
            let mut copy = ptr.reborrow();
            *copy.first_mut().unwrap() = 9;
        }

        assert_that!(ptr.first().unwrap(), is(equal_to(&9)));
        assert_that!(ptr.len(), is(equal_to(3)));
    }

    #[test]
    fn test_that_offset_by_rejects_the_full_length() {

        let mut data = [1, 2, 3];
        let ptr = Ptr::new(&mut data);

        assert_that!(ptr.offset_by(3), is(err()));
    }

    #[test]
    fn test_that_distance_is_measured_against_the_origin() {

        let mut data = [1, 2, 3, 4, 5];
        let ptr = Ptr::new(&mut data);

        let origin = ptr.as_const();
        let offset = ptr.as_const().offset_by(2).unwrap();

        assert_that!(offset.distance_to(origin), is(equal_to(2)));
    }
}
