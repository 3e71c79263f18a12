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

//! RAII-based timing of a scope, recorded as a timer measurement on drop.

use crate::monitor::Monitor;
use std::time::Instant;

/// Times a scope and records the elapsed milliseconds when dropped.
///
/// The RAII pattern guarantees the measurement is recorded on every exit
/// path, including early returns. Recording goes through the facade, so
/// deactivation and plugin fan-out apply as for any other timer sample.
///
/// ```
/// use appmon_telemetry::{Monitor, ScopedTimer};
///
/// let monitor = Monitor::new();
/// {
///     let _timer = ScopedTimer::new(&monitor, "db.query_ms");
///     // ... timed work ...
/// }
/// assert_eq!(monitor.core_plugin().timer_snapshot("db.query_ms").map(|(count, _)| count), Some(1));
/// ```
#[derive(Debug)]
pub struct ScopedTimer<'a> {
    monitor: &'a Monitor,
    name: String,
    started: Instant,
}

impl<'a> ScopedTimer<'a> {
    /// Starts timing immediately.
    pub fn new(monitor: &'a Monitor, name: impl Into<String>) -> Self {
        Self {
            monitor,
            name: name.into(),
            started: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_millis() as i64;
        self.monitor.add_timer_measurement(&self.name, elapsed_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_exactly_one_sample_on_drop() {
        let monitor = Monitor::new();
        {
            let _timer = ScopedTimer::new(&monitor, "scope");
        }
        let (count, total) = monitor.core_plugin().timer_snapshot("scope").unwrap();
        assert_eq!(count, 1);
        assert!(total >= 0);
    }

    #[test]
    fn test_nothing_recorded_before_drop() {
        let monitor = Monitor::new();
        let timer = ScopedTimer::new(&monitor, "scope");
        assert_eq!(monitor.core_plugin().timer_snapshot("scope"), None);
        drop(timer);
        assert!(monitor.core_plugin().timer_snapshot("scope").is_some());
    }
}
