// Copyright 2024-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::identifiable::{FxIndexSet, Id, StringId};

/// Holds unique strings and provides [StringId]s that correspond to the order
/// that the strings were inserted.
pub struct StringTable {
    /// The ordered hash set of unique strings. The order becomes the StringId.
    strings: FxIndexSet<Box<str>>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StringTable {
    /// Creates a new string table, which initially holds the empty string and
    /// no others.
    pub fn new() -> Self {
        let mut strings = FxIndexSet::default();
        // A stack-sample profile needs at least "", "wall", "nanoseconds",
        // "thread id", one thread id and a file and function name per frame
        // before the first sample is complete. Skip the tiny initial sizes.
        strings.reserve(32);

        // Always hold the empty string as item 0.
        strings.insert(Box::from(""));

        Self { strings }
    }

    /// Returns the number of strings currently held in the string table.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Adds the string to the string table if it isn't present already, and
    /// returns a [StringId] that corresponds to the order that this string
    /// was originally inserted.
    pub fn intern(&mut self, str: &str) -> StringId {
        match self.strings.get_index_of(str) {
            Some(offset) => StringId::from_offset(offset),
            None => {
                let (offset, _) = self.strings.insert_full(Box::from(str));
                StringId::from_offset(offset)
            }
        }
    }

    /// Looks up the id of a string without interning it.
    pub fn fetch(&self, str: &str) -> Option<StringId> {
        self.strings.get_index_of(str).map(StringId::from_offset)
    }

    pub fn get(&self, id: StringId) -> Option<&str> {
        self.strings.get_index(id.to_offset()).map(Box::as_ref)
    }

    /// The strings in [StringId] order, starting with the empty string.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.strings.iter().map(Box::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks functional correctness against a "golden" ordered set built
    /// from the standard library.
    ///
    /// `cargo +nightly bolero test collections::string_table::tests::fuzz_string_table -T 1min`
    #[test]
    fn fuzz_string_table() {
        bolero::check!()
            .with_type::<Vec<String>>()
            .for_each(|strings| {
                let mut golden_list = vec![""];
                let mut golden_set = std::collections::HashSet::from([""]);
                let mut st = StringTable::new();

                for string in strings {
                    assert_eq!(st.len(), golden_set.len());
                    if golden_set.insert(string) {
                        golden_list.push(string);
                    }

                    let str_id = st.intern(string);
                    assert_eq!(string, golden_list[usize::from(str_id)]);
                    // Interning again never moves a string.
                    assert_eq!(str_id, st.intern(string));
                }
                assert_eq!(st.len(), golden_list.len());
                assert_eq!(st.len(), golden_set.len());

                // Check that the strings remain in order
                assert!(st.iter().eq(golden_list.iter().copied()));
            })
    }

    #[test]
    fn test_basics() {
        let mut table = StringTable::new();
        // The empty string should already be present.
        assert_eq!(1, table.len());
        assert_eq!(Some(StringId::ZERO), table.fetch(""));
        assert_eq!(StringId::ZERO, table.intern(""));

        let string = table.intern("datadog");
        assert_eq!(StringId::from_offset(1), string);
        assert_eq!(2, table.len());
        assert_eq!(Some("datadog"), table.get(string));
    }

    #[test]
    fn fetch_does_not_intern() {
        let mut table = StringTable::new();
        assert_eq!(None, table.fetch("thread id"));
        assert_eq!(1, table.len());

        let id = table.intern("thread id");
        assert_eq!(Some(id), table.fetch("thread id"));
        assert_eq!(None, table.get(StringId::from_offset(2)));
    }

    #[track_caller]
    fn test_from_src(src: &[&str]) {
        // Insert all the strings.
        let mut table = StringTable::new();
        let n_strings = src.len();
        for string in src {
            table.intern(string);
        }
        assert_eq!(n_strings, table.len());

        // Re-inserting doesn't change the size.
        for string in src {
            table.intern(string);
        }
        assert_eq!(n_strings, table.len());

        // Check that they are ordered correctly when iterating.
        assert!(table.iter().eq(src.iter().copied()));
    }

    #[test]
    fn test_small_set_of_strings() {
        let cases: &[_] = &[
            "",
            "wall",
            "nanoseconds",
            "thread id",
            "70368744177664",
            "/usr/local/bundle/gems/puma-6.4.2/lib/puma/thread_pool.rb",
            "block in spawn_thread",
            "/app/app/controllers/orders_controller.rb",
            "OrdersController#index",
            "<main>",
            "sleep",
        ];
        test_from_src(cases);
    }
}
