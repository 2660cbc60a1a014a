//! Persistent singly-linked list, newest entry first.
//!
//! Pushing onto a `Chain` allocates one link and shares the whole older
//! tail with the original, so every search node can hold its complete
//! history while siblings reuse their common ancestors. Links are freed
//! once the last chain referring to them goes away.

use std::sync::Arc;

struct Link<T> {
    value: T,
    next: Chain<T>,
    len: usize,
}

pub struct Chain<T> {
    head: Option<Arc<Link<T>>>,
}

impl<T> Chain<T> {
    pub fn new() -> Self {
        Chain { head: None }
    }

    /// A new chain with `value` in front of this one.
    pub fn push(&self, value: T) -> Chain<T> {
        let len = self.len() + 1;
        Chain {
            head: Some(Arc::new(Link {
                value,
                next: self.clone(),
                len,
            })),
        }
    }

    /// Newest entry.
    pub fn first(&self) -> Option<&T> {
        self.head.as_deref().map(|link| &link.value)
    }

    /// Everything but the newest entry.
    pub fn rest(&self) -> Chain<T> {
        match &self.head {
            Some(link) => link.next.clone(),
            None => Chain::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.head.as_deref().map_or(0, |link| link.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate from newest to oldest.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Copy the entries out, oldest first.
    pub fn to_vec_oldest_first(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out: Vec<T> = self.iter().cloned().collect();
        out.reverse();
        out
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Chain::new()
    }
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Chain {
            head: self.head.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// Unlink iteratively; the default recursive drop can overflow the stack on
// long histories.
impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(link) = head {
            match Arc::try_unwrap(link) {
                Ok(mut link) => head = link.next.head.take(),
                Err(_) => break,
            }
        }
    }
}

pub struct Iter<'a, T> {
    next: Option<&'a Link<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let link = self.next?;
        self.next = link.next.head.as_deref();
        Some(&link.value)
    }
}
