// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::api::StackSampleEvent;

pub const VALUE_TYPE_WALL: &str = "wall";
pub const VALUE_UNIT_NANOSECONDS: &str = "nanoseconds";
pub const LABEL_KEY_THREAD_ID: &str = "thread id";

/// The values a single event contributes to its sample, in the order of the
/// profile's sample types. Currently only the wall time.
#[inline]
pub fn build_sample_values(event: &StackSampleEvent) -> Vec<i64> {
    vec![event.wall_time_ns()]
}

/// An aggregated observation, ready to be emitted as a [pprof::Sample].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Sample {
    /// One location per captured frame, in capture order.
    pub locations: Box<[LocationId]>,
    /// Element-wise sums, one per sample type.
    pub values: Vec<i64>,
    pub labels: Box<[Label]>,
}

impl From<&Sample> for pprof::Sample {
    fn from(sample: &Sample) -> Self {
        pprof::Sample {
            location_id: sample.locations.iter().map(Id::to_raw_id).collect(),
            value: sample.values.clone(),
            label: sample.labels.iter().map(pprof::Label::from).collect(),
        }
    }
}
