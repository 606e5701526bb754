use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::model::EventRecord;

/// FIFO that evicts the oldest record once `capacity` is reached. A capacity
/// of zero never evicts.
#[derive(Debug, Default)]
pub(crate) struct RecordRing {
    capacity: usize,
    queue: Mutex<VecDeque<EventRecord>>,
}

impl RecordRing {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity.min(65_536))),
        }
    }

    /// Returns true when an older record had to be evicted.
    pub(crate) fn push(&self, record: EventRecord) -> bool {
        let mut guard = self.queue.lock();
        let mut evicted = false;
        if self.capacity > 0 && guard.len() >= self.capacity {
            guard.pop_front();
            evicted = true;
        }
        guard.push_back(record);
        evicted
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub(crate) fn snapshot(&self) -> Vec<EventRecord> {
        self.queue.lock().iter().cloned().collect()
    }

    pub(crate) fn tail(&self, limit: usize) -> Vec<EventRecord> {
        let guard = self.queue.lock();
        let skip = guard.len().saturating_sub(limit);
        guard.iter().skip(skip).cloned().collect()
    }
}
