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

//! Built-in state values for system memory.

use crate::monitor::Monitor;
use std::sync::{Arc, Mutex};
use sysinfo::System;

/// Name under which the total system memory state value is registered.
pub const TOTAL_MEMORY_STATE_VALUE: &str = "system.memory.total_bytes";

/// Name under which the used system memory state value is registered.
pub const USED_MEMORY_STATE_VALUE: &str = "system.memory.used_bytes";

/// Registers pull-model state values for total and used system memory.
///
/// The values are refreshed at report time, not continuously — reading
/// system memory on every walk is cheap, and a monitor that is never
/// reported from costs nothing. [`Monitor::global`] calls this once; call
/// it yourself when constructing monitors explicitly.
pub fn register_system_state_values(monitor: &Monitor) {
    let system = Arc::new(Mutex::new(System::new()));

    let sys = Arc::clone(&system);
    monitor.register_state_value(TOTAL_MEMORY_STATE_VALUE, move || {
        let mut sys = sys.lock().unwrap();
        sys.refresh_memory();
        sys.total_memory() as i64
    });

    let sys = system;
    monitor.register_state_value(USED_MEMORY_STATE_VALUE, move || {
        let mut sys = sys.lock().unwrap();
        sys.refresh_memory();
        sys.used_memory() as i64
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_state_values_are_registered() {
        let monitor = Monitor::new();
        register_system_state_values(&monitor);

        let core = monitor.core_plugin();
        assert!(core.state_value(TOTAL_MEMORY_STATE_VALUE).is_some());
        assert!(core.state_value(USED_MEMORY_STATE_VALUE).is_some());
    }
}
