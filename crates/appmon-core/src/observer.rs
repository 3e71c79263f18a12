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

//! Notification contract for discovering newly registered reportables.

use crate::reportable::ReportableKind;

/// An observer notified when a reportable name is first registered.
///
/// The reference backend invokes [`on_new_reportable`] exactly once per
/// distinct name, after the entry has become visible to reads, and never
/// again for that name. An observer attached after reportables already
/// exist is caught up with one notification per existing name, so a
/// late-starting exporter still discovers the full population.
///
/// [`on_new_reportable`]: ReportableObserver::on_new_reportable
pub trait ReportableObserver: Send + Sync {
    /// Called with the normalized name and kind of a newly seen reportable.
    fn on_new_reportable(&self, name: &str, kind: ReportableKind);
}
