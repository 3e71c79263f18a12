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

//! The in-process reference backend.
//!
//! `CorePlugin` owns the canonical mapping from metric name to its live
//! entry and is the source of truth for introspection and testing: unlike
//! external backends it never samples, never drops events, and never fails.
//! It is registered with every [`Monitor`](crate::Monitor) at construction
//! and survives `remove_all_plugins`.
//!
//! Keys are stored verbatim — the dispatch facade normalizes names before
//! they arrive here. Hot-path updates touch only the entry's own atomics;
//! the sharded map is locked briefly on the create-on-first-write path, so
//! contention on one name never serializes updates to another.

use crate::storage::history::HistoryBuffer;
use appmon_core::{
    HistorySample, MonitorPlugin, MonitorResult, ReportVisitor, ReportableKind,
    ReportableObserver, StateValueProvider,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// Unique name under which the reference backend registers itself.
pub const CORE_PLUGIN_NAME: &str = "core";

/// Number of entries each history series keeps unless reconfigured.
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 5;

/// Accumulated statistics for one timer: sample count and timing sum.
#[derive(Debug, Default)]
struct TimerCell {
    count: AtomicU64,
    total: AtomicI64,
}

impl TimerCell {
    fn record(&self, timing: i64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total.fetch_add(timing, Ordering::Relaxed);
    }
}

/// A live registry entry. Variants share their payload via `Arc` so a
/// snapshot walk can hold an entry without holding the registry.
#[derive(Clone)]
enum Reportable {
    Counter(Arc<AtomicI64>),
    Timer(Arc<TimerCell>),
    StateValue(Arc<dyn StateValueProvider>),
    Version(Arc<str>),
    History(Arc<HistoryBuffer>),
}

impl Reportable {
    fn kind(&self) -> ReportableKind {
        match self {
            Reportable::Counter(_) => ReportableKind::Counter,
            Reportable::Timer(_) => ReportableKind::Timer,
            Reportable::StateValue(_) => ReportableKind::StateValue,
            Reportable::Version(_) => ReportableKind::Version,
            Reportable::History(_) => ReportableKind::History,
        }
    }
}

impl fmt::Debug for Reportable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}

/// The in-process reference backend and reportable registry.
pub struct CorePlugin {
    reportables: DashMap<String, Reportable>,
    observers: RwLock<Vec<Arc<dyn ReportableObserver>>>,
    max_history_entries: AtomicUsize,
}

impl CorePlugin {
    /// Creates an empty registry with the default history capacity.
    pub fn new() -> Self {
        Self {
            reportables: DashMap::new(),
            observers: RwLock::new(Vec::new()),
            max_history_entries: AtomicUsize::new(DEFAULT_MAX_HISTORY_ENTRIES),
        }
    }

    /// Number of entries each history series keeps before evicting.
    pub fn max_history_entries(&self) -> usize {
        self.max_history_entries.load(Ordering::Relaxed)
    }

    /// Reconfigures the history capacity. Existing series shrink lazily on
    /// their next append, not immediately.
    pub fn set_max_history_entries(&self, max_entries: usize) {
        self.max_history_entries.store(max_entries, Ordering::Relaxed);
    }

    /// Stores or overwrites the state-value binding for `name`. The
    /// provider is not evaluated here — only during report walks.
    pub fn register_state_value(&self, name: String, provider: Arc<dyn StateValueProvider>) {
        self.insert_overwrite(name, Reportable::StateValue(provider));
    }

    /// Stores or overwrites the version tag for `name`.
    pub fn register_version(&self, name: String, version: &str) {
        self.insert_overwrite(name, Reportable::Version(Arc::from(version)));
    }

    /// Appends a value to the named history series, creating the series on
    /// first use with the registry's current capacity.
    pub fn add_historizable(&self, name: &str, value: impl Into<String>) {
        if let Some(buffer) = self.history_buffer(name) {
            buffer.append(HistorySample::new(value), self.max_history_entries());
        }
    }

    /// Attaches an observer and catches it up with one notification per
    /// reportable registered before it attached.
    pub fn add_reportable_observer(&self, observer: Arc<dyn ReportableObserver>) {
        let existing: Vec<(String, ReportableKind)> = self
            .reportables
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().kind()))
            .collect();
        self.observers.write().unwrap().push(Arc::clone(&observer));
        for (name, kind) in existing {
            observer.on_new_reportable(&name, kind);
        }
    }

    /// Detaches an observer by identity. Mainly for tests.
    pub fn remove_reportable_observer(&self, observer: &Arc<dyn ReportableObserver>) {
        self.observers
            .write()
            .unwrap()
            .retain(|attached| !Arc::ptr_eq(attached, observer));
    }

    /// Walks every reportable, presenting each to the visitor through the
    /// method matching its kind.
    ///
    /// The walk never blocks concurrent writers: entry handles are cloned
    /// up front and each value is read at the moment of its visit, so the
    /// result is per-entry point-in-time, not a transactional whole.
    /// Entries registered after the walk starts may or may not appear.
    /// State-value callbacks are evaluated exactly once per walk. Entries
    /// are visited in name order for deterministic reports.
    pub fn report_into(&self, visitor: &mut dyn ReportVisitor) {
        let mut entries: Vec<(String, Reportable)> = self
            .reportables
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, reportable) in entries {
            match reportable {
                Reportable::Counter(cell) => {
                    visitor.visit_counter(&name, cell.load(Ordering::Relaxed));
                }
                Reportable::Timer(cell) => {
                    visitor.visit_timer(
                        &name,
                        cell.count.load(Ordering::Relaxed),
                        cell.total.load(Ordering::Relaxed),
                    );
                }
                Reportable::StateValue(provider) => {
                    visitor.visit_state_value(&name, provider.value());
                }
                Reportable::Version(version) => {
                    visitor.visit_version(&name, &version);
                }
                Reportable::History(buffer) => {
                    visitor.visit_history(&name, &buffer.snapshot());
                }
            }
        }
    }

    /// Current value of the named counter, if one exists.
    pub fn counter_value(&self, name: &str) -> Option<i64> {
        match self.reportables.get(name)?.value() {
            Reportable::Counter(cell) => Some(cell.load(Ordering::Relaxed)),
            _ => None,
        }
    }

    /// Sample count and timing sum of the named timer, if one exists.
    pub fn timer_snapshot(&self, name: &str) -> Option<(u64, i64)> {
        match self.reportables.get(name)?.value() {
            Reportable::Timer(cell) => Some((
                cell.count.load(Ordering::Relaxed),
                cell.total.load(Ordering::Relaxed),
            )),
            _ => None,
        }
    }

    /// Freshly computed value of the named state-value binding.
    pub fn state_value(&self, name: &str) -> Option<i64> {
        let provider = match self.reportables.get(name)?.value() {
            Reportable::StateValue(provider) => Arc::clone(provider),
            _ => return None,
        };
        Some(provider.value())
    }

    /// Version tag registered under `name`, if any.
    pub fn version(&self, name: &str) -> Option<String> {
        match self.reportables.get(name)?.value() {
            Reportable::Version(version) => Some(version.to_string()),
            _ => None,
        }
    }

    /// Current contents of the named history series, oldest first.
    pub fn history(&self, name: &str) -> Option<Vec<HistorySample>> {
        let buffer = match self.reportables.get(name)?.value() {
            Reportable::History(buffer) => Arc::clone(buffer),
            _ => return None,
        };
        Some(buffer.snapshot())
    }

    /// Total number of registered reportables.
    pub fn reportable_count(&self) -> usize {
        self.reportables.len()
    }

    fn counter_cell(&self, name: &str) -> Option<Arc<AtomicI64>> {
        if let Some(entry) = self.reportables.get(name) {
            return match entry.value() {
                Reportable::Counter(cell) => Some(Arc::clone(cell)),
                other => {
                    drop_mismatch(name, ReportableKind::Counter, other.kind());
                    None
                }
            };
        }
        let mut created = false;
        let cell = match self.reportables.entry(name.to_string()) {
            Entry::Occupied(entry) => match entry.get() {
                Reportable::Counter(cell) => Some(Arc::clone(cell)),
                other => {
                    drop_mismatch(name, ReportableKind::Counter, other.kind());
                    None
                }
            },
            Entry::Vacant(entry) => {
                created = true;
                let cell = Arc::new(AtomicI64::new(0));
                entry.insert(Reportable::Counter(Arc::clone(&cell)));
                Some(cell)
            }
        };
        if created {
            self.notify_new(name, ReportableKind::Counter);
        }
        cell
    }

    fn timer_cell(&self, name: &str) -> Option<Arc<TimerCell>> {
        if let Some(entry) = self.reportables.get(name) {
            return match entry.value() {
                Reportable::Timer(cell) => Some(Arc::clone(cell)),
                other => {
                    drop_mismatch(name, ReportableKind::Timer, other.kind());
                    None
                }
            };
        }
        let mut created = false;
        let cell = match self.reportables.entry(name.to_string()) {
            Entry::Occupied(entry) => match entry.get() {
                Reportable::Timer(cell) => Some(Arc::clone(cell)),
                other => {
                    drop_mismatch(name, ReportableKind::Timer, other.kind());
                    None
                }
            },
            Entry::Vacant(entry) => {
                created = true;
                let cell = Arc::new(TimerCell::default());
                entry.insert(Reportable::Timer(Arc::clone(&cell)));
                Some(cell)
            }
        };
        if created {
            self.notify_new(name, ReportableKind::Timer);
        }
        cell
    }

    fn history_buffer(&self, name: &str) -> Option<Arc<HistoryBuffer>> {
        if let Some(entry) = self.reportables.get(name) {
            return match entry.value() {
                Reportable::History(buffer) => Some(Arc::clone(buffer)),
                other => {
                    drop_mismatch(name, ReportableKind::History, other.kind());
                    None
                }
            };
        }
        let mut created = false;
        let buffer = match self.reportables.entry(name.to_string()) {
            Entry::Occupied(entry) => match entry.get() {
                Reportable::History(buffer) => Some(Arc::clone(buffer)),
                other => {
                    drop_mismatch(name, ReportableKind::History, other.kind());
                    None
                }
            },
            Entry::Vacant(entry) => {
                created = true;
                let buffer = Arc::new(HistoryBuffer::new());
                entry.insert(Reportable::History(Arc::clone(&buffer)));
                Some(buffer)
            }
        };
        if created {
            self.notify_new(name, ReportableKind::History);
        }
        buffer
    }

    /// Overwrite-style registration: the new entry replaces whatever held
    /// the name, and observers fire only the first time the name is seen.
    fn insert_overwrite(&self, name: String, reportable: Reportable) {
        let kind = reportable.kind();
        let previous = self.reportables.insert(name.clone(), reportable);
        if previous.is_none() {
            self.notify_new(&name, kind);
        }
    }

    /// Notification runs after the entry is visible and without holding the
    /// observer lock, so an observer may itself touch the registry.
    fn notify_new(&self, name: &str, kind: ReportableKind) {
        let observers: Vec<Arc<dyn ReportableObserver>> =
            self.observers.read().unwrap().clone();
        for observer in observers {
            observer.on_new_reportable(name, kind);
        }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CorePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorePlugin")
            .field("reportables", &self.reportables.len())
            .field("max_history_entries", &self.max_history_entries())
            .finish()
    }
}

impl MonitorPlugin for CorePlugin {
    fn unique_name(&self) -> &str {
        CORE_PLUGIN_NAME
    }

    fn increment_counter(&self, name: &str, delta: i64) -> MonitorResult<()> {
        if let Some(cell) = self.counter_cell(name) {
            cell.fetch_add(delta, Ordering::Relaxed);
        }
        Ok(())
    }

    fn initialize_counter(&self, name: &str) -> MonitorResult<()> {
        let _ = self.counter_cell(name);
        Ok(())
    }

    fn add_timer_measurement(&self, name: &str, timing: i64) -> MonitorResult<()> {
        if let Some(cell) = self.timer_cell(name) {
            cell.record(timing);
        }
        Ok(())
    }

    fn initialize_timer_measurement(&self, name: &str) -> MonitorResult<()> {
        let _ = self.timer_cell(name);
        Ok(())
    }

    // The high-rate and single-event hints deliberately use the trait's
    // forwarding defaults: the reference backend is the source of truth and
    // never samples.
}

fn drop_mismatch(name: &str, expected: ReportableKind, found: ReportableKind) {
    log::warn!("reportable `{name}` is registered as {found:?}; dropping {expected:?} event");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingObserver {
        seen: Mutex<Vec<(String, ReportableKind)>>,
    }

    impl ReportableObserver for RecordingObserver {
        fn on_new_reportable(&self, name: &str, kind: ReportableKind) {
            self.seen.lock().unwrap().push((name.to_string(), kind));
        }
    }

    #[derive(Default)]
    struct RecordingVisitor {
        lines: Vec<String>,
    }

    impl ReportVisitor for RecordingVisitor {
        fn visit_counter(&mut self, name: &str, value: i64) {
            self.lines.push(format!("counter {name} {value}"));
        }

        fn visit_timer(&mut self, name: &str, count: u64, total: i64) {
            self.lines.push(format!("timer {name} {count} {total}"));
        }

        fn visit_state_value(&mut self, name: &str, value: i64) {
            self.lines.push(format!("state {name} {value}"));
        }

        fn visit_version(&mut self, name: &str, version: &str) {
            self.lines.push(format!("version {name} {version}"));
        }

        fn visit_history(&mut self, name: &str, samples: &[HistorySample]) {
            self.lines.push(format!("history {name} {}", samples.len()));
        }
    }

    #[test]
    fn test_counter_sums_signed_deltas() {
        let core = CorePlugin::new();
        core.increment_counter("c", 5).unwrap();
        core.increment_counter("c", -2).unwrap();
        core.increment_counter("c", 1).unwrap();
        assert_eq!(core.counter_value("c"), Some(4));
    }

    #[test]
    fn test_initialize_counter_is_idempotent() {
        let core = CorePlugin::new();
        core.initialize_counter("c").unwrap();
        assert_eq!(core.counter_value("c"), Some(0));

        core.increment_counter("c", 1).unwrap();
        core.initialize_counter("c").unwrap();
        assert_eq!(core.counter_value("c"), Some(1));
        assert_eq!(core.reportable_count(), 1);
    }

    #[test]
    fn test_timer_accumulates_count_and_sum() {
        let core = CorePlugin::new();
        core.initialize_timer_measurement("t").unwrap();
        assert_eq!(core.timer_snapshot("t"), Some((0, 0)));

        for timing in [3, 5, 7] {
            core.add_timer_measurement("t", timing).unwrap();
        }
        assert_eq!(core.timer_snapshot("t"), Some((3, 15)));
    }

    #[test]
    fn test_high_rate_variants_are_not_sampled() {
        let core = CorePlugin::new();
        core.increment_high_rate_counter("c", 1).unwrap();
        core.increment_counter("c", 1).unwrap();
        assert_eq!(core.counter_value("c"), Some(2));

        core.add_high_rate_timer_measurement("t", 2).unwrap();
        core.add_single_event_timer_measurement("t", 3).unwrap();
        assert_eq!(core.timer_snapshot("t"), Some((2, 5)));
    }

    #[test]
    fn test_state_value_reevaluated_per_walk() {
        let core = CorePlugin::new();
        let calls = Arc::new(AtomicI64::new(0));
        let source = Arc::clone(&calls);
        core.register_state_value(
            "x".to_string(),
            Arc::new(move || source.fetch_add(1, Ordering::Relaxed) + 1),
        );

        let mut first = RecordingVisitor::default();
        core.report_into(&mut first);
        let mut second = RecordingVisitor::default();
        core.report_into(&mut second);

        assert_eq!(first.lines, ["state x 1"]);
        assert_eq!(second.lines, ["state x 2"]);
    }

    #[test]
    fn test_version_reregistration_overwrites() {
        let core = CorePlugin::new();
        core.register_version("app".to_string(), "1.0.0");
        core.register_version("app".to_string(), "1.1.0");
        assert_eq!(core.version("app").as_deref(), Some("1.1.0"));
        assert_eq!(core.reportable_count(), 1);
    }

    #[test]
    fn test_history_honors_runtime_capacity() {
        let core = CorePlugin::new();
        core.set_max_history_entries(3);
        for value in ["1", "2", "3", "4", "5"] {
            core.add_historizable("h", value);
        }
        let values: Vec<String> = core
            .history("h")
            .unwrap()
            .into_iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, ["3", "4", "5"]);

        core.set_max_history_entries(0);
        core.add_historizable("empty", "a");
        assert!(core.history("empty").unwrap().is_empty());
    }

    #[test]
    fn test_observer_notified_once_per_name() {
        let core = CorePlugin::new();
        let observer = Arc::new(RecordingObserver::default());
        core.add_reportable_observer(observer.clone());

        core.increment_counter("c", 1).unwrap();
        core.increment_counter("c", 1).unwrap();
        core.add_timer_measurement("t", 9).unwrap();

        let seen = observer.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            [
                ("c".to_string(), ReportableKind::Counter),
                ("t".to_string(), ReportableKind::Timer),
            ]
        );
    }

    #[test]
    fn test_observer_catch_up_and_removal() {
        let core = CorePlugin::new();
        core.increment_counter("early", 1).unwrap();

        let observer: Arc<RecordingObserver> = Arc::new(RecordingObserver::default());
        core.add_reportable_observer(observer.clone());
        assert_eq!(
            observer.seen.lock().unwrap().clone(),
            [("early".to_string(), ReportableKind::Counter)]
        );

        let as_dyn: Arc<dyn ReportableObserver> = observer.clone();
        core.remove_reportable_observer(&as_dyn);
        core.increment_counter("late", 1).unwrap();
        assert_eq!(observer.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_kind_mismatch_events_are_dropped() {
        let core = CorePlugin::new();
        core.increment_counter("c", 7).unwrap();
        core.add_timer_measurement("c", 100).unwrap();

        assert_eq!(core.counter_value("c"), Some(7));
        assert_eq!(core.timer_snapshot("c"), None);
    }

    #[test]
    fn test_report_visits_each_kind_in_name_order() {
        let core = CorePlugin::new();
        core.increment_counter("b.counter", 2).unwrap();
        core.add_timer_measurement("d.timer", 4).unwrap();
        core.register_state_value("c.state".to_string(), Arc::new(|| 11_i64));
        core.register_version("a.version".to_string(), "2.0");
        core.add_historizable("e.history", "x");

        let mut visitor = RecordingVisitor::default();
        core.report_into(&mut visitor);
        assert_eq!(
            visitor.lines,
            [
                "version a.version 2.0",
                "counter b.counter 2",
                "state c.state 11",
                "timer d.timer 1 4",
                "history e.history 1",
            ]
        );
    }

    #[test]
    fn test_concurrent_increments_sum_exactly() {
        const THREADS: usize = 8;
        const INCREMENTS: usize = 1_000;

        let core = CorePlugin::new();
        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..INCREMENTS {
                        core.increment_counter("hot", 1).unwrap();
                    }
                });
            }
        });
        assert_eq!(core.counter_value("hot"), Some((THREADS * INCREMENTS) as i64));
    }
}
