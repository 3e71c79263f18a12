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

//! Error types shared across the monitoring system.

use thiserror::Error;

/// A specialized `Result` type for monitoring operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// An error raised by a monitoring backend while handling an event.
///
/// The reference backend never fails; these errors come from external
/// backends (e.g. a network-exporting plugin losing its connection). The
/// dispatch facade catches them at the fan-out boundary, logs them, and
/// continues delivery to the remaining backends — they never propagate to
/// the thread that reported the metric.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The backend rejected or failed to record the event.
    #[error("backend `{backend}` rejected event: {reason}")]
    Backend {
        /// The unique name of the failing backend.
        backend: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// An I/O failure inside a backend that writes events elsewhere.
    #[error("backend I/O failure")]
    Io(#[from] std::io::Error),
}
