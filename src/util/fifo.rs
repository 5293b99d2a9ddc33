//! FIFO implemented using VecDeque
use serde::{Deserialize, Serialize};
use std::collections::vec_deque::{IntoIter, Iter};
use std::collections::VecDeque;

#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
pub struct FIFO<A> {
    deq: VecDeque<A>,
}

impl<A> Default for FIFO<A> {
    fn default() -> Self {
        Self {
            deq: VecDeque::new(),
        }
    }
}

impl<A> FIFO<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> Iter<'_, A> {
        self.deq.iter()
    }

    pub fn append_back(&mut self, e: A) {
        self.deq.push_back(e);
    }

    pub fn pop_front(&mut self) -> Option<A> {
        self.deq.pop_front()
    }

    /// Re-inserts a split remainder at the head.
    ///
    /// Intended sequence: pop; split -> (take, leave); consume take; push_front(leave).
    pub fn push_front(&mut self, e: A) {
        self.deq.push_front(e);
    }

    pub fn peek_front(&self) -> Option<&A> {
        self.deq.front()
    }

    pub fn len(&self) -> usize {
        self.deq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deq.is_empty()
    }
}

impl<A> FromIterator<A> for FIFO<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let mut fifo = FIFO::new();
        fifo.extend(iter);
        fifo
    }
}

impl<A> IntoIterator for FIFO<A> {
    type Item = A;
    type IntoIter = IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.deq.into_iter()
    }
}

impl<A> Extend<A> for FIFO<A> {
    fn extend<T: IntoIterator<Item = A>>(&mut self, iter: T) {
        for item in iter.into_iter() {
            self.append_back(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_front_precedes_earlier_entries() {
        let mut fifo: FIFO<u32> = [1, 2, 3].into_iter().collect();

        let head = fifo.pop_front().unwrap();
        assert_eq!(head, 1);

        fifo.push_front(10);
        assert_eq!(fifo.peek_front(), Some(&10));
        assert_eq!(fifo.into_iter().collect::<Vec<_>>(), vec![10, 2, 3]);
    }
}
