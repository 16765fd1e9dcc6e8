//! A double-ended queue that serves as the explicit stack or queue
//! replacing recursion in every tree walk.
//!
//! Each operation takes the internal lock for its own duration only, so
//! a single call is atomic with respect to other threads, but a
//! check-then-act sequence such as `is_empty()` followed by
//! `pop_front()` is not.

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct Deque<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deque<T> {
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { items: Mutex::new(VecDeque::with_capacity(cap)) }
    }

    // A panic while the lock is held cannot leave the `VecDeque` in a
    // torn state, so a poisoned lock is still usable.
    #[inline(always)]
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn push_front(&self, item: T) {
        self.lock().push_front(item);
    }

    #[inline]
    pub fn push_back(&self, item: T) {
        self.lock().push_back(item);
    }

    /// Remove and return the front item.
    /// Return an error if `self` is empty.
    #[inline]
    pub fn pop_front(&self) -> Result<T> {
        self.lock().pop_front().ok_or(Error::EmptyQueue)
    }

    /// Remove and return the back item.
    /// Return an error if `self` is empty.
    #[inline]
    pub fn pop_back(&self) -> Result<T> {
        self.lock().pop_back().ok_or(Error::EmptyQueue)
    }

    /// Return a copy of the front item without removing it.
    #[inline]
    pub fn peek_front(&self) -> Result<T>
    where
        T: Clone,
    {
        self.lock().front().cloned().ok_or(Error::EmptyQueue)
    }

    /// Return a copy of the back item without removing it.
    #[inline]
    pub fn peek_back(&self) -> Result<T>
    where
        T: Clone,
    {
        self.lock().back().cloned().ok_or(Error::EmptyQueue)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into()
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: Mutex::new(iter.into_iter().collect()) }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Deque<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.lock().iter()).finish()
    }
}
