use crate::thread::ThreadId;
use std::collections::VecDeque;

/// FIFO of threads eligible for the processor.
///
/// A thread is in here exactly when its status is `Ready`. Both policies
/// append at the tail; round-robin always takes the head, while the
/// preemptive policy may pluck a thread out of the middle.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    q: VecDeque<ThreadId>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self {
            q: VecDeque::with_capacity(64),
        }
    }

    pub fn append(&mut self, id: ThreadId) {
        self.q.push_back(id);
    }

    pub fn take_head(&mut self) -> Option<ThreadId> {
        self.q.pop_front()
    }

    /// Remove `id` wherever it sits. Returns whether it was present.
    pub fn remove(&mut self, id: ThreadId) -> bool {
        match self.q.iter().position(|&t| t == id) {
            Some(idx) => {
                self.q.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove the thread at queue position `idx` (0 = head).
    pub fn remove_at(&mut self, idx: usize) -> Option<ThreadId> {
        self.q.remove(idx)
    }

    pub fn contains(&self, id: ThreadId) -> bool {
        self.q.iter().any(|&t| t == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ThreadId> + '_ {
        self.q.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = ReadyQueue::new();
        q.append(1);
        q.append(2);
        q.append(3);
        assert_eq!(q.take_head(), Some(1));
        q.append(1);
        assert_eq!(q.take_head(), Some(2));
        assert_eq!(q.take_head(), Some(3));
        assert_eq!(q.take_head(), Some(1));
        assert_eq!(q.take_head(), None);
    }

    #[test]
    fn test_remove_from_middle() {
        let mut q = ReadyQueue::new();
        q.append(5);
        q.append(6);
        q.append(7);
        assert!(q.remove(6));
        assert!(!q.remove(6));
        assert!(q.contains(5));
        assert!(!q.contains(6));
        assert_eq!(q.remove_at(1), Some(7));
        assert_eq!(q.len(), 1);
    }
}
