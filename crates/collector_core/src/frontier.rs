use std::collections::VecDeque;

use crate::NormalizedUrl;

/// FIFO of links waiting to be fetched. Breadth-first by construction.
///
/// Does not deduplicate; callers check the visited and found sets first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    queue: VecDeque<NormalizedUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, url: NormalizedUrl) {
        self.queue.push_back(url);
    }

    pub fn dequeue(&mut self) -> Option<NormalizedUrl> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
