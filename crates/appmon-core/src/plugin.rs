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

//! The capability interface implemented by every monitoring backend.

use crate::error::MonitorResult;
use std::fmt::Debug;

/// A monitoring backend that receives the event fan-out.
///
/// Every backend — the in-process reference backend as well as external
/// exporters — implements this trait and is registered with the dispatch
/// facade under a unique name. The facade delivers each event to every
/// registered plugin synchronously, in registration order, with the metric
/// name already normalized.
///
/// Handlers are called on the reporting thread's hot path and must not
/// block; a backend that writes events elsewhere should enqueue and flush
/// off-thread. A handler's `Err` is caught at the dispatch boundary and
/// logged — it never reaches the reporting caller and never prevents
/// delivery to the remaining backends.
///
/// The `high_rate` and `single_event` variants carry the same payload as
/// their base counterpart. They are hints about the expected event rate: a
/// network-exporting backend may sample high-rate events or skip
/// single-event bookkeeping entirely. The default implementations forward
/// to the base handler, which is also the required behavior of the
/// reference backend.
pub trait MonitorPlugin: Send + Sync + Debug + 'static {
    /// A unique, stable identifier for this backend.
    fn unique_name(&self) -> &str;

    /// Adjusts the named counter by a signed delta, creating it on first use.
    fn increment_counter(&self, name: &str, delta: i64) -> MonitorResult<()>;

    /// Ensures the named counter exists without mutating an existing value.
    fn initialize_counter(&self, name: &str) -> MonitorResult<()>;

    /// Records one timing sample for the named timer, creating it on first
    /// use. The caller picks the time unit; the value may be any sign.
    fn add_timer_measurement(&self, name: &str, timing: i64) -> MonitorResult<()>;

    /// Ensures the named timer exists with zero samples.
    fn initialize_timer_measurement(&self, name: &str) -> MonitorResult<()>;

    /// Counter increment flagged as very frequent. Backends may sample.
    fn increment_high_rate_counter(&self, name: &str, delta: i64) -> MonitorResult<()> {
        self.increment_counter(name, delta)
    }

    /// Timing sample flagged as very frequent. Backends may sample.
    fn add_high_rate_timer_measurement(&self, name: &str, timing: i64) -> MonitorResult<()> {
        self.add_timer_measurement(name, timing)
    }

    /// Timing sample flagged as rare. Backends may skip expensive
    /// bookkeeping that only pays off for recurring events.
    fn add_single_event_timer_measurement(&self, name: &str, timing: i64) -> MonitorResult<()> {
        self.add_timer_measurement(name, timing)
    }
}
