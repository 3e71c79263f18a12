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

//! Core data types describing reportables.
//!
//! A "reportable" is any named entity tracked by the registry: a counter, a
//! timer, a state-value binding, a version tag, or a history series. The
//! registry itself lives in `appmon-telemetry`; this module only defines the
//! vocabulary shared between backends, observers, and export visitors.

use std::time::SystemTime;

/// The fundamental kind of a reportable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportableKind {
    /// A named integer adjusted by signed deltas.
    Counter,
    /// Accumulated count and sum over a stream of timing samples.
    Timer,
    /// A pull-model binding to a caller-supplied value callback.
    StateValue,
    /// An opaque version string attached to a name.
    Version,
    /// A bounded FIFO of recently observed values.
    History,
}

/// A single entry in a history series.
///
/// The value is an opaque string chosen by the caller; the timestamp records
/// when the entry was appended.
#[derive(Debug, Clone)]
pub struct HistorySample {
    /// Wall-clock time the sample was appended.
    pub timestamp: SystemTime,
    /// The caller-supplied payload.
    pub value: String,
}

impl HistorySample {
    /// Creates a sample stamped with the current wall-clock time.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            value: value.into(),
        }
    }

    /// Creates a sample with an explicit timestamp.
    pub fn at(timestamp: SystemTime, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }
}

/// A pull-model provider for a state value.
///
/// The registry stores the provider, never its result: the callback is
/// invoked fresh on every export walk. Providers must not block — they run
/// on whichever thread requested the report.
///
/// Any `Fn() -> i64 + Send + Sync` closure is a provider:
///
/// ```
/// use appmon_core::StateValueProvider;
///
/// fn takes_provider(provider: impl StateValueProvider) -> i64 {
///     provider.value()
/// }
///
/// assert_eq!(takes_provider(|| 42_i64), 42);
/// ```
pub trait StateValueProvider: Send + Sync {
    /// Computes the current value of the bound state.
    fn value(&self) -> i64;
}

impl<F> StateValueProvider for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn value(&self) -> i64 {
        self()
    }
}
