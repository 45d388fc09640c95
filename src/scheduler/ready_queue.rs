use std::collections::VecDeque;

/// Handles (indices into the engine's process list) of processes waiting for
/// the CPU, in the order they were queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadyQueue {
    items: VecDeque<usize>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, process: usize) {
        self.items.push_back(process);
    }

    /// Puts `process` back at the head, ahead of everything queued.
    pub fn enqueue_front(&mut self, process: usize) {
        self.items.push_front(process);
    }

    pub fn dequeue_front(&mut self) -> Option<usize> {
        self.items.pop_front()
    }

    pub fn remove_at(&mut self, position: usize) -> Option<usize> {
        self.items.remove(position)
    }

    pub fn peek_all(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().copied()
    }

    pub fn contains(&self, process: usize) -> bool {
        self.items.contains(&process)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drops `process` and shifts every handle above it down by one, to
    /// follow a removal from the process list.
    pub fn forget(&mut self, process: usize) {
        self.items.retain(|&handle| handle != process);
        for handle in self.items.iter_mut() {
            if *handle > process {
                *handle -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut queue = ReadyQueue::new();
        queue.enqueue(2);
        queue.enqueue(0);
        queue.enqueue(1);

        assert_eq!(queue.dequeue_front(), Some(2));
        assert_eq!(queue.dequeue_front(), Some(0));
        assert_eq!(queue.dequeue_front(), Some(1));
        assert_eq!(queue.dequeue_front(), None);

        queue.enqueue(1);
        queue.enqueue_front(0);
        assert_eq!(queue.peek_all().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn remove_at_keeps_the_rest_in_order() {
        let mut queue = ReadyQueue::new();
        for handle in [4, 5, 6] {
            queue.enqueue(handle);
        }

        assert_eq!(queue.remove_at(1), Some(5));
        assert_eq!(queue.remove_at(7), None);
        assert_eq!(queue.peek_all().collect::<Vec<_>>(), vec![4, 6]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn forget_renumbers_handles() {
        let mut queue = ReadyQueue::new();
        for handle in [3, 1, 0, 2] {
            queue.enqueue(handle);
        }

        queue.forget(1);
        assert_eq!(queue.peek_all().collect::<Vec<_>>(), vec![2, 0, 1]);
    }
}
