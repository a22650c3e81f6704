//! Search and comparison operations built on top of the public view
//! contract of [`ConstPtr`] and [`Ptr`].
//!
//! The operations on [`Ptr`] delegate to their [`ConstPtr`] counterparts
//! through the widening conversion. Elements that model a "no value" state
//! use `Option<A>`, whose equality already treats two `None`s as a match and
//! `None` against `Some` as a mismatch.

use crate::memory::{ConstPtr, Ptr};

impl <'a, A> ConstPtr<'a, A>
where A: PartialEq {

    /// Finds the index of the first element equal to the given value.
    pub fn index_of(&self, value: &A) -> Option<usize> {
        self.iter().position(|element| element == value)
    }

    /// Finds the index of the first occurrence of the given sub-view.
    /// An empty `value` matches at index 0.
    pub fn index_of_ptr(&self, value: ConstPtr<'_, A>) -> Option<usize> {
        if value.len() > self.len() {
            return None;
        }
        (0..=self.len() - value.len())
            .find(|&offset| ConstPtr::new(&self.as_slice()[offset..]).starts_with(value))
    }

    /// Finds the index of the first occurrence of the given sub-view that
    /// starts on a multiple of the sub-view's length.
    ///
    /// # Examples
    ///
    /// If the ptr views `abbcdd` and the value is `dd`, the result is
    /// `Some(4)`; with the value `bb` the result is `None`, because `bb`
    /// occurs at index 1, which is not a multiple of its length 2.
    ///
    /// ```rust
    /// use ptr_rs::memory::ConstPtr;
    ///
    /// let ptr = ConstPtr::new(b"abbcdd");
    ///
    /// assert_eq!(ptr.index_of_repeat(ConstPtr::new(b"dd")), Some(4));
    /// assert_eq!(ptr.index_of_repeat(ConstPtr::new(b"bb")), None);
    /// ```
    pub fn index_of_repeat(&self, value: ConstPtr<'_, A>) -> Option<usize> {
        if value.is_empty() {
            return Some(0);
        }
        let mut offset = 0;
        while self.len() - offset >= value.len() {
            if ConstPtr::new(&self.as_slice()[offset..]).starts_with(value) {
                return Some(offset);
            }
            offset += value.len();
        }
        None
    }

    /// Returns true if this view starts with all elements of the given
    /// sub-view. A sub-view longer than this view never matches; an empty
    /// sub-view always does.
    pub fn starts_with(&self, value: ConstPtr<'_, A>) -> bool {
        if self.len() < value.len() {
            return false;
        }
        self.iter().zip(value.iter()).all(|(left, right)| left == right)
    }

    /// Returns true if both views have equal contents: identical views
    /// compare equal without touching the elements, views of different
    /// length never compare equal, anything else is an element-wise value
    /// comparison.
    pub fn has_same_contents(&self, other: ConstPtr<'_, A>) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        self.iter().zip(other.iter()).all(|(left, right)| left == right)
    }
}

impl <'a, A> ConstPtr<'a, A>
where A: Clone {

    /// Materializes an owned copy of the viewed elements.
    pub fn to_vec(&self) -> Vec<A> {
        self.as_slice().to_vec()
    }
}

impl <'a, A> Ptr<'a, A>
where A: PartialEq {

    /// See [`ConstPtr::index_of`].
    pub fn index_of(&self, value: &A) -> Option<usize> {
        self.as_const().index_of(value)
    }

    /// See [`ConstPtr::index_of_ptr`].
    pub fn index_of_ptr(&self, value: ConstPtr<'_, A>) -> Option<usize> {
        self.as_const().index_of_ptr(value)
    }

    /// See [`ConstPtr::index_of_repeat`].
    pub fn index_of_repeat(&self, value: ConstPtr<'_, A>) -> Option<usize> {
        self.as_const().index_of_repeat(value)
    }

    /// See [`ConstPtr::starts_with`].
    pub fn starts_with(&self, value: ConstPtr<'_, A>) -> bool {
        self.as_const().starts_with(value)
    }

    /// See [`ConstPtr::has_same_contents`].
    pub fn has_same_contents(&self, other: ConstPtr<'_, A>) -> bool {
        self.as_const().has_same_contents(other)
    }
}

impl <'a, A> Ptr<'a, A>
where A: Clone {

    /// See [`ConstPtr::to_vec`].
    pub fn to_vec(&self) -> Vec<A> {
        self.as_const().to_vec()
    }
}
