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

//! # Appmon Core
//!
//! Foundational crate containing the traits, core types, and interface
//! contracts of the in-application monitoring system.
//!
//! This crate defines the "common language" spoken by every monitoring
//! backend: the [`MonitorPlugin`] capability interface that receives the
//! event fan-out, the [`ReportVisitor`] export protocol used to walk a
//! backend's reportables, and the [`ReportableObserver`] notification
//! contract for discovering newly registered reportables. The central
//! registry, dispatch facade, and reference backend live in
//! `appmon-telemetry`.

#![warn(missing_docs)]

pub mod error;
pub mod observer;
pub mod plugin;
pub mod reportable;
pub mod visitor;

pub use error::{MonitorError, MonitorResult};
pub use observer::ReportableObserver;
pub use plugin::MonitorPlugin;
pub use reportable::{HistorySample, ReportableKind, StateValueProvider};
pub use visitor::ReportVisitor;
