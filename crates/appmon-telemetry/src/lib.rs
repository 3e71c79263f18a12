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

//! # Appmon Telemetry
//!
//! Lightweight in-application monitoring: counters, timers, state values,
//! version tags, and bounded history series, reported through one facade
//! and fanned out to pluggable backends.
//!
//! The [`Monitor`] facade normalizes metric names and dispatches events to
//! every registered [`MonitorPlugin`](appmon_core::MonitorPlugin). The
//! in-process reference backend ([`CorePlugin`]) aggregates everything and
//! exposes it through the pull-based [`ReportVisitor`](appmon_core::ReportVisitor)
//! walk:
//!
//! ```
//! use appmon_telemetry::{Monitor, TextReportVisitor};
//!
//! let monitor = Monitor::new();
//! monitor.increment_counter("requests.handled");
//! monitor.add_timer_measurement("db.query_ms", 12);
//!
//! let mut report = TextReportVisitor::new();
//! monitor.core_plugin().report_into(&mut report);
//! let rendered = report.into_string();
//! assert!(rendered.contains("counter requests.handled = 1"));
//! assert!(rendered.contains("timer db.query_ms count=1 total=12"));
//! ```

pub mod key;
pub mod monitor;
pub mod process;
pub mod report;
pub mod storage;
pub mod utils;

pub use key::normalize;
pub use monitor::Monitor;
pub use report::{JsonReportVisitor, TextReportVisitor};
pub use storage::{CorePlugin, HistoryBuffer, CORE_PLUGIN_NAME, DEFAULT_MAX_HISTORY_ENTRIES};
pub use utils::ScopedTimer;
