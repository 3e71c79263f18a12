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

//! Plain-text report rendering, one line per reportable.

use appmon_core::{HistorySample, ReportVisitor};
use std::fmt::Write;

/// Accumulates a human-readable report during one snapshot walk.
///
/// ```
/// use appmon_telemetry::{Monitor, TextReportVisitor};
///
/// let monitor = Monitor::new();
/// monitor.increment_counter("requests.handled");
///
/// let mut report = TextReportVisitor::new();
/// monitor.core_plugin().report_into(&mut report);
/// assert_eq!(report.into_string(), "counter requests.handled = 1\n");
/// ```
#[derive(Debug, Default)]
pub struct TextReportVisitor {
    output: String,
}

impl TextReportVisitor {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the visitor and returns the rendered report.
    pub fn into_string(self) -> String {
        self.output
    }
}

impl ReportVisitor for TextReportVisitor {
    fn visit_counter(&mut self, name: &str, value: i64) {
        let _ = writeln!(self.output, "counter {name} = {value}");
    }

    fn visit_timer(&mut self, name: &str, count: u64, total: i64) {
        let _ = writeln!(self.output, "timer {name} count={count} total={total}");
    }

    fn visit_state_value(&mut self, name: &str, value: i64) {
        let _ = writeln!(self.output, "state {name} = {value}");
    }

    fn visit_version(&mut self, name: &str, version: &str) {
        let _ = writeln!(self.output, "version {name} = {version}");
    }

    fn visit_history(&mut self, name: &str, samples: &[HistorySample]) {
        let _ = writeln!(self.output, "history {name} ({} entries)", samples.len());
        for sample in samples {
            let _ = writeln!(self.output, "  - {}", sample.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_one_line_per_kind() {
        let mut visitor = TextReportVisitor::new();
        visitor.visit_counter("c", 3);
        visitor.visit_timer("t", 2, 40);
        visitor.visit_state_value("s", -1);
        visitor.visit_version("v", "1.2.3");
        visitor.visit_history("h", &[HistorySample::new("first")]);

        let report = visitor.into_string();
        assert_eq!(
            report.lines().collect::<Vec<_>>(),
            [
                "counter c = 3",
                "timer t count=2 total=40",
                "state s = -1",
                "version v = 1.2.3",
                "history h (1 entries)",
                "  - first",
            ]
        );
    }
}
