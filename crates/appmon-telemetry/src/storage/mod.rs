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

//! In-process storage for reportables: the reference backend and its
//! supporting history buffers.

pub mod core_plugin;
pub mod history;

pub use core_plugin::{CorePlugin, CORE_PLUGIN_NAME, DEFAULT_MAX_HISTORY_ENTRIES};
pub use history::HistoryBuffer;
