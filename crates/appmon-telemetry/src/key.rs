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

//! Metric name normalization.
//!
//! Export formats use `:` and `=` as domain separators, so those characters
//! may not appear inside a key. Every raw name passes through [`normalize`]
//! before it reaches any backend. Names that differ only in reserved
//! characters collapse to the same key; that collision is accepted, not
//! detected.

use std::borrow::Cow;

/// Characters that carry meaning in the export format.
const RESERVED: [char; 2] = [':', '='];

/// Replacement for reserved characters.
const FILLER: char = '_';

/// Replaces every reserved character in `name` with the filler.
///
/// Total and deterministic: any input is valid. Runs in O(length) and
/// borrows the input when it is already clean, so the common case performs
/// no allocation and the dirty case exactly one.
pub fn normalize(name: &str) -> Cow<'_, str> {
    if name.contains(RESERVED) {
        Cow::Owned(
            name.chars()
                .map(|c| if RESERVED.contains(&c) { FILLER } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters_are_replaced() {
        assert_eq!(normalize("db:query=select"), "db_query_select");
        assert_eq!(normalize("==::"), "____");
    }

    #[test]
    fn test_clean_names_borrow() {
        let name = "requests.handled";
        assert!(matches!(normalize(name), Cow::Borrowed(_)));
        assert_eq!(normalize(name), name);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in ["a:b=c", "plain", "", ":=:=", "trailing:"] {
            let once = normalize(raw).into_owned();
            let twice = normalize(&once).into_owned();
            assert_eq!(once, twice);
            assert!(!once.contains(RESERVED));
        }
    }
}
