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

//! JSON report rendering for status pages and machine consumers.

use appmon_core::{HistorySample, ReportVisitor};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::UNIX_EPOCH;

/// One timer in a JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct TimerEntry {
    /// Number of samples recorded.
    pub count: u64,
    /// Sum of all recorded timings, in the caller's unit.
    pub total: i64,
}

/// One history sample in a JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Milliseconds since the Unix epoch at append time.
    pub timestamp_ms: u64,
    /// The caller-supplied payload.
    pub value: String,
}

/// Collects one snapshot walk into a `serde`-serializable report.
///
/// Keys are sorted maps, so the rendered JSON is deterministic for a given
/// registry population.
#[derive(Debug, Default, Serialize)]
pub struct JsonReportVisitor {
    counters: BTreeMap<String, i64>,
    timers: BTreeMap<String, TimerEntry>,
    state_values: BTreeMap<String, i64>,
    versions: BTreeMap<String, String>,
    histories: BTreeMap<String, Vec<HistoryEntry>>,
}

impl JsonReportVisitor {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the collected report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl ReportVisitor for JsonReportVisitor {
    fn visit_counter(&mut self, name: &str, value: i64) {
        self.counters.insert(name.to_string(), value);
    }

    fn visit_timer(&mut self, name: &str, count: u64, total: i64) {
        self.timers
            .insert(name.to_string(), TimerEntry { count, total });
    }

    fn visit_state_value(&mut self, name: &str, value: i64) {
        self.state_values.insert(name.to_string(), value);
    }

    fn visit_version(&mut self, name: &str, version: &str) {
        self.versions.insert(name.to_string(), version.to_string());
    }

    fn visit_history(&mut self, name: &str, samples: &[HistorySample]) {
        let entries = samples
            .iter()
            .map(|sample| HistoryEntry {
                timestamp_ms: sample
                    .timestamp
                    .duration_since(UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_millis() as u64)
                    .unwrap_or(0),
                value: sample.value.clone(),
            })
            .collect();
        self.histories.insert(name.to_string(), entries);
    }
}
