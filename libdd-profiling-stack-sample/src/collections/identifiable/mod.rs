// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod string_id;

use std::hash::{BuildHasherDefault, Hash};
use std::num::NonZeroU32;

pub type FxIndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<rustc_hash::FxHasher>>;
pub type FxIndexSet<K> = indexmap::IndexSet<K, BuildHasherDefault<rustc_hash::FxHasher>>;

pub use string_id::*;

pub trait Id: Copy + Eq + Hash {
    type RawId;

    /// Convert from a usize offset into an Id. This should be loss-less
    /// except for certain edges.
    /// # Panics
    /// Panic if the usize cannot be represented in the Id, for instance if
    /// the offset cannot fit in the underlying integer type. This is expected
    /// to be ultra-rare (more than u32::MAX-1 items created?!).
    fn from_offset(inner: usize) -> Self;

    fn to_raw_id(&self) -> Self::RawId;

    /// The position of the item in the collection which created the Id.
    fn to_offset(&self) -> usize;
}

pub trait Item: Eq + Hash {
    /// The Id associated with this Item, e.g. Function -> FunctionId.
    type Id: Id;
}

/// Used to associate an Item with a pprof::* type.
pub trait PprofItem: Item {
    /// The pprof::* type associated with this Item.
    /// For example, Function -> pprof::Function.
    type PprofMessage: prost::Message;

    // Items don't store their own id, the container does, so the conversion
    // needs to be told which id to emit.
    fn to_pprof(&self, id: Self::Id) -> Self::PprofMessage;
}

/// Creates a non-zero, 32-bit unsigned id from the offset. It's guaranteed to
/// be the offset + 1, with guards to not overflow the size of u32.
///
/// pprof does not allow a location, function or mapping with an id of zero,
/// even if it's the first item in the collection.
#[inline]
pub fn small_non_zero_pprof_id(offset: usize) -> Option<NonZeroU32> {
    let small: u32 = offset.try_into().ok()?;
    NonZeroU32::new(small.checked_add(1)?)
}

pub trait Dedup<T: Item> {
    /// Deduplicate the Item and return its associated Id. An Item which is
    /// already present keeps its original Id and is not stored again.
    /// # Panics
    /// Panics if the number of items overflows the storage capabilities of
    /// the associated Id type.
    fn dedup(&mut self, item: T) -> <T as Item>::Id;
}

impl<T: Item> Dedup<T> for FxIndexSet<T> {
    fn dedup(&mut self, item: T) -> <T as Item>::Id {
        let (offset, _) = self.insert_full(item);
        <T as Item>::Id::from_offset(offset)
    }
}

/// Converts every item of the collection into its pprof message, in
/// insertion order. The collection is left untouched so it can keep growing
/// after a snapshot is taken.
pub fn pprof_iter<T: PprofItem>(
    collection: &FxIndexSet<T>,
) -> impl Iterator<Item = T::PprofMessage> + '_ {
    collection
        .iter()
        .enumerate()
        .map(|(offset, item)| item.to_pprof(<T as Item>::Id::from_offset(offset)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_non_zero_pprof_id() {
        assert_eq!(NonZeroU32::new(1), small_non_zero_pprof_id(0));
        assert_eq!(NonZeroU32::new(2), small_non_zero_pprof_id(1));
        assert_eq!(
            NonZeroU32::new(u32::MAX),
            small_non_zero_pprof_id((u32::MAX - 1) as usize)
        );

        assert_eq!(None, small_non_zero_pprof_id(u32::MAX as usize));
        assert_eq!(None, small_non_zero_pprof_id(usize::MAX));
    }

    #[derive(Eq, PartialEq, Hash)]
    struct Name(&'static str);

    impl Item for Name {
        type Id = StringId;
    }

    #[test]
    fn dedup_returns_first_id_for_repeats() {
        let mut set: FxIndexSet<Name> = FxIndexSet::default();
        let a = set.dedup(Name("main"));
        let b = set.dedup(Name("work"));
        assert_ne!(a, b);
        assert_eq!(a, set.dedup(Name("main")));
        assert_eq!(2, set.len());
        assert_eq!(1, b.to_offset());
    }
}
