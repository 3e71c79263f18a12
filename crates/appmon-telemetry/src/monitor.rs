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

//! The monitoring facade: name normalization, activation gating, and event
//! fan-out to every registered backend.
//!
//! A [`Monitor`] is the single entry point application code reports
//! through. It is designed for very high call volume on hot request paths:
//! the plugin list is a copy-on-write snapshot read without locking, the
//! activation switch is one relaxed atomic load, and delivery is a plain
//! loop over the snapshot. Construct one explicitly and pass it through
//! your call graph, or use the process-wide [`Monitor::global`] instance.

use crate::key::normalize;
use crate::storage::CorePlugin;
use appmon_core::{MonitorPlugin, MonitorResult, StateValueProvider};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Monitor> = OnceLock::new();

/// The central in-application monitor.
///
/// Owns the set of registered backends and fans every event out to each of
/// them, in registration order, with the metric name normalized once. The
/// in-process reference backend ([`CorePlugin`]) is registered at
/// construction and cannot be removed.
pub struct Monitor {
    active: AtomicBool,
    core: Arc<CorePlugin>,
    plugins: ArcSwap<Vec<Arc<dyn MonitorPlugin>>>,
}

impl Monitor {
    /// Creates a monitor with only the reference backend attached.
    pub fn new() -> Self {
        let core = Arc::new(CorePlugin::new());
        let plugins: Vec<Arc<dyn MonitorPlugin>> =
            vec![Arc::clone(&core) as Arc<dyn MonitorPlugin>];
        Self {
            active: AtomicBool::new(true),
            core,
            plugins: ArcSwap::from_pointee(plugins),
        }
    }

    /// The process-wide default instance, created on first use.
    ///
    /// The default instance additionally registers this crate's version tag
    /// and system memory state values, so a bare process has something to
    /// report. Code that wants a pristine monitor constructs its own with
    /// [`Monitor::new`].
    pub fn global() -> &'static Monitor {
        GLOBAL.get_or_init(|| {
            let monitor = Monitor::new();
            monitor.register_version(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            crate::process::register_system_state_values(&monitor);
            log::info!("in-application monitor started");
            monitor
        })
    }

    /// Re-enables event dispatch.
    pub fn activate(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Disables event dispatch. While inactive, increment and timer calls
    /// return immediately without normalizing or touching any backend;
    /// initialization and registration calls still take effect.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Whether events are currently dispatched.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    /// Increments the named counter by one.
    pub fn increment_counter(&self, name: &str) {
        self.increment_counter_by(name, 1);
    }

    /// Increments the named counter by a signed delta.
    pub fn increment_counter_by(&self, name: &str, delta: i64) {
        if !self.is_active() {
            return;
        }
        let key = normalize(name);
        self.dispatch(&key, |plugin| plugin.increment_counter(&key, delta));
    }

    /// Increments the named counter by one, hinting backends that this
    /// event fires very often and may be sampled.
    pub fn increment_high_rate_counter(&self, name: &str) {
        if !self.is_active() {
            return;
        }
        let key = normalize(name);
        self.dispatch(&key, |plugin| plugin.increment_high_rate_counter(&key, 1));
    }

    /// Ensures the named counter exists in every backend. Useful to guard
    /// operational dashboards against spelling drift. Not gated by the
    /// activation switch.
    pub fn initialize_counter(&self, name: &str) {
        let key = normalize(name);
        self.dispatch(&key, |plugin| plugin.initialize_counter(&key));
    }

    /// Records one timing sample for the named timer, implicitly counting
    /// the event. The application picks the time unit; all backends must
    /// agree on it out of band.
    pub fn add_timer_measurement(&self, name: &str, timing: i64) {
        if !self.is_active() {
            return;
        }
        let key = normalize(name);
        self.dispatch(&key, |plugin| plugin.add_timer_measurement(&key, timing));
    }

    /// Records the timing `end - begin` for the named timer.
    pub fn add_timer_measurement_between(&self, name: &str, begin: i64, end: i64) {
        self.add_timer_measurement(name, end - begin);
    }

    /// Records a timing sample for an event expected to fire rarely.
    /// Backends may skip bookkeeping that only pays off for recurring
    /// events.
    pub fn add_single_event_timer_measurement(&self, name: &str, timing: i64) {
        if !self.is_active() {
            return;
        }
        let key = normalize(name);
        self.dispatch(&key, |plugin| {
            plugin.add_single_event_timer_measurement(&key, timing)
        });
    }

    /// Records a timing sample for an event expected to fire very often.
    /// Backends may sample.
    pub fn add_high_rate_timer_measurement(&self, name: &str, timing: i64) {
        if !self.is_active() {
            return;
        }
        let key = normalize(name);
        self.dispatch(&key, |plugin| {
            plugin.add_high_rate_timer_measurement(&key, timing)
        });
    }

    /// Ensures the named timer exists in every backend with zero samples.
    /// Not gated by the activation switch.
    pub fn initialize_timer_measurement(&self, name: &str) {
        let key = normalize(name);
        self.dispatch(&key, |plugin| plugin.initialize_timer_measurement(&key));
    }

    /// Binds a pull-model state value to `name` in the reference backend.
    /// The provider is evaluated on every report walk, never here.
    pub fn register_state_value(&self, name: &str, provider: impl StateValueProvider + 'static) {
        let key = normalize(name);
        self.core
            .register_state_value(key.into_owned(), Arc::new(provider));
    }

    /// Registers an opaque version string under `name`, overwriting any
    /// previous tag for that name.
    pub fn register_version(&self, name: &str, version: &str) {
        let key = normalize(name);
        self.core.register_version(key.into_owned(), version);
    }

    /// Appends a value to the named bounded history series.
    pub fn add_historizable(&self, name: &str, value: impl Into<String>) {
        let key = normalize(name);
        self.core.add_historizable(&key, value);
    }

    /// Registers a backend under its unique name. A no-op if a backend
    /// with the same name is already present.
    pub fn register_plugin(&self, plugin: Arc<dyn MonitorPlugin>) {
        let previous = self.plugins.rcu(|current| {
            let mut next = Vec::clone(current);
            if !next.iter().any(|p| p.unique_name() == plugin.unique_name()) {
                next.push(Arc::clone(&plugin));
            }
            next
        });
        if !previous
            .iter()
            .any(|p| p.unique_name() == plugin.unique_name())
        {
            log::info!("registered monitor plugin `{}`", plugin.unique_name());
        }
    }

    /// Removes every backend except the reference backend, which is
    /// immediately re-added.
    pub fn remove_all_plugins(&self) {
        let core = Arc::clone(&self.core) as Arc<dyn MonitorPlugin>;
        self.plugins.store(Arc::new(vec![core]));
    }

    /// Unique names of the currently registered backends, in registration
    /// order. A point-in-time snapshot.
    pub fn registered_plugin_names(&self) -> Vec<String> {
        self.plugins
            .load()
            .iter()
            .map(|plugin| plugin.unique_name().to_string())
            .collect()
    }

    /// The in-process reference backend. Registry-only operations —
    /// observers, history capacity, typed reads, and report walks — are
    /// reached through it.
    pub fn core_plugin(&self) -> &Arc<CorePlugin> {
        &self.core
    }

    /// Delivers one event to every plugin in the current snapshot.
    ///
    /// The snapshot is captured once and iterated to completion, so a
    /// concurrent register or remove never affects a dispatch already in
    /// flight. A failing plugin is logged and skipped; delivery continues
    /// with the remaining plugins.
    fn dispatch<F>(&self, name: &str, deliver: F)
    where
        F: Fn(&dyn MonitorPlugin) -> MonitorResult<()>,
    {
        for plugin in self.plugins.load().iter() {
            if let Err(err) = deliver(plugin.as_ref()) {
                log::warn!(
                    "monitor plugin `{}` failed to record `{name}`: {err}",
                    plugin.unique_name()
                );
            }
        }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("active", &self.is_active())
            .field("plugins", &self.registered_plugin_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::CORE_PLUGIN_NAME;

    #[test]
    fn test_core_plugin_is_registered_at_construction() {
        let monitor = Monitor::new();
        assert_eq!(monitor.registered_plugin_names(), [CORE_PLUGIN_NAME]);
    }

    #[test]
    fn test_names_are_normalized_before_dispatch() {
        let monitor = Monitor::new();
        monitor.increment_counter("http:status=200");
        assert_eq!(
            monitor.core_plugin().counter_value("http_status_200"),
            Some(1)
        );
    }

    #[test]
    fn test_deactivation_suppresses_mutation() {
        let monitor = Monitor::new();
        monitor.deactivate();
        for _ in 0..100 {
            monitor.increment_counter("c");
        }
        monitor.add_timer_measurement("t", 5);
        assert_eq!(monitor.core_plugin().counter_value("c"), None);
        assert_eq!(monitor.core_plugin().timer_snapshot("t"), None);

        monitor.activate();
        monitor.increment_counter("c");
        assert_eq!(monitor.core_plugin().counter_value("c"), Some(1));
    }

    #[test]
    fn test_initialize_bypasses_deactivation() {
        let monitor = Monitor::new();
        monitor.deactivate();
        monitor.initialize_counter("c");
        monitor.initialize_timer_measurement("t");
        assert_eq!(monitor.core_plugin().counter_value("c"), Some(0));
        assert_eq!(monitor.core_plugin().timer_snapshot("t"), Some((0, 0)));
    }

    #[test]
    fn test_registration_bypasses_deactivation() {
        let monitor = Monitor::new();
        monitor.deactivate();
        monitor.register_version("app", "3.1");
        monitor.register_state_value("s", || 9_i64);
        monitor.add_historizable("h", "event");

        let core = monitor.core_plugin();
        assert_eq!(core.version("app").as_deref(), Some("3.1"));
        assert_eq!(core.state_value("s"), Some(9));
        assert_eq!(core.history("h").map(|h| h.len()), Some(1));
    }

    #[test]
    fn test_timer_measurement_between_records_difference() {
        let monitor = Monitor::new();
        monitor.add_timer_measurement_between("t", 100, 175);
        assert_eq!(monitor.core_plugin().timer_snapshot("t"), Some((1, 75)));
    }

    #[test]
    fn test_remove_all_plugins_keeps_core() {
        let monitor = Monitor::new();
        monitor.remove_all_plugins();
        assert_eq!(monitor.registered_plugin_names(), [CORE_PLUGIN_NAME]);
    }

    #[test]
    fn test_global_instance_reports_defaults() {
        let monitor = Monitor::global();
        assert!(monitor
            .core_plugin()
            .version("appmon-telemetry")
            .is_some());
        assert!(monitor
            .core_plugin()
            .state_value("system.memory.total_bytes")
            .is_some());
    }
}
