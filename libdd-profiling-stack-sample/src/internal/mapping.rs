// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;

/// The synthetic mapping every location points at. Stack samples are
/// symbolized before they reach the profile, so no binary or address range
/// is ever resolved; the mapping only names the program.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Mapping {
    pub filename: StringId,
}

impl Item for Mapping {
    type Id = MappingId;
}

impl PprofItem for Mapping {
    type PprofMessage = pprof::Mapping;

    fn to_pprof(&self, id: Self::Id) -> Self::PprofMessage {
        pprof::Mapping {
            id: id.to_raw_id(),
            memory_start: 0,
            memory_limit: 0,
            file_offset: 0,
            filename: self.filename.to_raw_id(),
            build_id: 0,
            has_functions: true,
            has_filenames: true,
            has_line_numbers: true,
            has_inline_frames: false,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct MappingId(NonZeroU32);

impl Id for MappingId {
    type RawId = u64;

    fn from_offset(offset: usize) -> Self {
        #[allow(clippy::expect_used)]
        Self(small_non_zero_pprof_id(offset).expect("MappingId to fit into a u32"))
    }

    fn to_raw_id(&self) -> Self::RawId {
        self.0.get().into()
    }

    fn to_offset(&self) -> usize {
        (self.0.get() - 1) as usize
    }
}
