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

//! The pull-based export protocol.

use crate::reportable::HistorySample;

/// A consumer of one snapshot walk over all registered reportables.
///
/// The registry calls exactly one method per entry during a walk, with the
/// entry's value read at the moment of the visit. Walks are independent and
/// restartable — the visitor holds whatever state it accumulates, the
/// registry keeps no cursor. State-value callbacks are re-evaluated on
/// every walk, so two consecutive walks may observe different values.
pub trait ReportVisitor {
    /// Visits a counter and its current value.
    fn visit_counter(&mut self, name: &str, value: i64);

    /// Visits a timer with its sample count and accumulated sum.
    fn visit_timer(&mut self, name: &str, count: u64, total: i64);

    /// Visits a state value, freshly computed for this walk.
    fn visit_state_value(&mut self, name: &str, value: i64);

    /// Visits a version tag.
    fn visit_version(&mut self, name: &str, version: &str);

    /// Visits a history series' current contents, oldest first.
    fn visit_history(&mut self, name: &str, samples: &[HistorySample]);
}
