// Copyright 2026 appmon contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded FIFO of recently observed values for one history series.

use appmon_core::HistorySample;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A bounded, append-only ring of the most recent samples for one name.
///
/// Append is the only mutation; once the buffer exceeds its capacity the
/// oldest entries are evicted. The capacity is passed in on every append
/// rather than stored here, because it is a registry-wide setting that may
/// change at runtime — a shrink takes effect lazily on the next append, and
/// a capacity of zero evicts every sample immediately (a valid, permanently
/// empty series).
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    samples: Mutex<VecDeque<HistorySample>>,
}

impl HistoryBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample, then evicts oldest-first until the buffer holds at
    /// most `max_entries` samples.
    pub fn append(&self, sample: HistorySample, max_entries: usize) {
        let mut samples = self.samples.lock().unwrap();
        samples.push_back(sample);
        while samples.len() > max_entries {
            samples.pop_front();
        }
    }

    /// Returns the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<HistorySample> {
        self.samples.lock().unwrap().iter().cloned().collect()
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    /// Whether the buffer currently holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(buffer: &HistoryBuffer) -> Vec<String> {
        buffer.snapshot().into_iter().map(|s| s.value).collect()
    }

    #[test]
    fn test_append_beyond_capacity_evicts_oldest() {
        let buffer = HistoryBuffer::new();
        for value in ["1", "2", "3", "4", "5"] {
            buffer.append(HistorySample::new(value), 3);
        }
        assert_eq!(values(&buffer), ["3", "4", "5"]);
    }

    #[test]
    fn test_zero_capacity_is_always_empty() {
        let buffer = HistoryBuffer::new();
        for value in ["a", "b", "c"] {
            buffer.append(HistorySample::new(value), 0);
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_capacity_shrink_applies_on_next_append() {
        let buffer = HistoryBuffer::new();
        for value in ["1", "2", "3", "4"] {
            buffer.append(HistorySample::new(value), 5);
        }
        // Shrinking the registry capacity does not touch the buffer until
        // something is appended under the new limit.
        assert_eq!(buffer.len(), 4);
        buffer.append(HistorySample::new("5"), 2);
        assert_eq!(values(&buffer), ["4", "5"]);
    }
}
