// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;

/// The offset of a string in the [crate::collections::string_table::StringTable].
/// Unlike the other ids, zero is valid: it is always the empty string.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct StringId(u32);

impl StringId {
    pub const ZERO: StringId = StringId(0);

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Id for StringId {
    type RawId = i64;

    fn from_offset(inner: usize) -> Self {
        #[allow(clippy::expect_used)]
        let index: u32 = inner.try_into().expect("StringId to fit into a u32");
        Self(index)
    }

    fn to_raw_id(&self) -> Self::RawId {
        self.0.into()
    }

    fn to_offset(&self) -> usize {
        self.0 as usize
    }
}

impl From<StringId> for usize {
    fn from(value: StringId) -> Self {
        value.to_offset()
    }
}
