// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod shared;

pub use shared::*;

use super::*;
use crate::api::{Frame, StackSampleEvent};
use crate::collections::string_table::StringTable;
use crate::config::BuilderConfig;
use crate::serializer::{encode_compressed_pprof, EncodedProfile};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{debug, trace};

/// Builds a wall-time pprof out of stack-sample events.
///
/// Every string, function, location and the mapping is interned into a
/// table owned by the builder; samples hold ids into those tables. The
/// tables and samples grow for the whole accumulation cycle, which ends only
/// when [ProfileBuilder::reset_and_return_previous] is called.
pub struct ProfileBuilder {
    config: BuilderConfig,
    /// The finalized snapshot of the current cycle. Cleared whenever a
    /// sample, a string or a location is added.
    cached_profile: Option<Arc<pprof::Profile>>,
    functions: FxIndexSet<Function>,
    locations: FxIndexSet<Location>,
    /// The single synthetic mapping, created with the first location.
    mapping_id: Option<MappingId>,
    mappings: FxIndexSet<Mapping>,
    period: Option<(i64, ValueType)>,
    sample_types: Box<[ValueType]>,
    samples: Vec<Sample>,
    start_time: SystemTime,
    strings: StringTable,
    thread_id_label: StringId,
}

/// Public API
impl ProfileBuilder {
    /// Creates a builder whose first cycle starts at `start_time`.
    /// Initializes the string table to hold:
    ///  - "" (the empty string)
    ///  - "wall" and "nanoseconds"
    ///  - "thread id"
    ///  - the period's type and unit, if one is configured.
    pub fn new(config: BuilderConfig, start_time: SystemTime) -> Self {
        let mut builder = Self {
            cached_profile: None,
            functions: Default::default(),
            locations: Default::default(),
            mapping_id: None,
            mappings: Default::default(),
            period: None,
            sample_types: Box::new([]),
            samples: Vec::with_capacity(config.samples_capacity),
            start_time,
            strings: StringTable::new(),
            thread_id_label: StringId::ZERO,
            config,
        };

        builder.sample_types = builder.build_sample_types().into_boxed_slice();
        builder.thread_id_label = builder.intern(LABEL_KEY_THREAD_ID);

        // Break "cannot borrow `*builder` as mutable because it is also
        // borrowed as immutable" by moving it out and putting it back.
        let period = builder.config.period.take();
        if let Some(period_config) = &period {
            builder.period = Some((
                period_config.value,
                ValueType::new(
                    builder.intern(&period_config.r#type),
                    builder.intern(&period_config.unit),
                ),
            ));
        }
        builder.config.period = period;

        builder
    }

    /// Groups `events` and adds one sample per group to the current cycle.
    /// Groups from different calls are never merged with each other.
    pub fn add_events<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a StackSampleEvent>,
    {
        let samples_before = self.samples.len();
        for (event, values) in group_events(events) {
            self.add_group(event, values);
        }
        debug!(
            added = self.samples.len() - samples_before,
            total = self.samples.len(),
            "Added stack samples to the profile"
        );
    }

    /// Adds the sample for one group of events: `event` is the group's
    /// representative and `values` the group's summed values.
    pub fn add_group(&mut self, event: &StackSampleEvent, values: Vec<i64>) {
        let sample = self.build_sample(event, values);
        self.samples.push(sample);
        self.cached_profile = None;
    }

    /// Adds `events` and returns the resulting snapshot.
    pub fn build_profile<'a, I>(&mut self, events: I) -> Arc<pprof::Profile>
    where
        I: IntoIterator<Item = &'a StackSampleEvent>,
    {
        self.add_events(events);
        self.to_profile()
    }

    /// Finalizes the current cycle into a pprof. The first call after any
    /// change builds the profile; the following calls hand out the very same
    /// instance until a sample is added or the builder is reset.
    pub fn to_profile(&mut self) -> Arc<pprof::Profile> {
        if let Some(profile) = &self.cached_profile {
            trace!("Reusing the finalized profile");
            return profile.clone();
        }

        let profile = Arc::new(self.assemble_profile(SystemTime::now()));
        debug!(
            samples = profile.sample.len(),
            locations = profile.location.len(),
            functions = profile.function.len(),
            strings = profile.string_table.len(),
            "Finalized stack-sample profile"
        );
        self.cached_profile = Some(profile.clone());
        profile
    }

    /// Ends the current cycle: every table is cleared (the string table is
    /// seeded again), a new cycle starts at `start_time` (or now), and the
    /// finalized profile of the cycle that just ended is returned.
    pub fn reset_and_return_previous(
        &mut self,
        start_time: Option<SystemTime>,
    ) -> Arc<pprof::Profile> {
        let previous = self.to_profile();
        let config = self.config.clone();
        *self = Self::new(config, start_time.unwrap_or_else(SystemTime::now));
        debug!(
            samples = previous.sample.len(),
            "Reset the stack-sample profile for a new cycle"
        );
        previous
    }

    /// Finalizes the current cycle and encodes it as an lz4-framed pprof.
    pub fn serialize_into_compressed_pprof(&mut self) -> anyhow::Result<EncodedProfile> {
        encode_compressed_pprof(&self.to_profile())
    }

    /// Interns the `str` as a string, returning the id in the string table.
    /// The empty string is guaranteed to have an id of [StringId::ZERO].
    /// A string which wasn't interned yet invalidates the finalized profile.
    pub fn intern(&mut self, item: &str) -> StringId {
        let len = self.strings.len();
        let id = self.strings.intern(item);
        if self.strings.len() != len {
            self.cached_profile = None;
        }
        id
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get_location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get_index(id.to_offset())
    }

    pub fn get_function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get_index(id.to_offset())
    }

    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }
}

/// Sample construction
impl ProfileBuilder {
    /// The single wall-time value type every sample reports.
    pub fn build_sample_types(&mut self) -> Vec<ValueType> {
        let r#type = self.intern(VALUE_TYPE_WALL);
        let unit = self.intern(VALUE_UNIT_NANOSECONDS);
        vec![ValueType::new(r#type, unit)]
    }

    pub fn build_sample_labels(&mut self, event: &StackSampleEvent) -> Vec<Label> {
        let thread_id = self.intern(&event.thread_id().to_string());
        vec![Label::str(self.thread_id_label, thread_id)]
    }

    /// Builds the sample of `event` with the given `values`. There is one
    /// location per captured frame regardless of the event's declared total
    /// frame count; an event without frames makes a sample without locations.
    pub fn build_sample(&mut self, event: &StackSampleEvent, values: Vec<i64>) -> Sample {
        let locations = event
            .frames()
            .iter()
            .map(|frame| self.resolve_location(frame))
            .collect();
        let labels = self.build_sample_labels(event).into_boxed_slice();
        Sample {
            locations,
            values,
            labels,
        }
    }

    /// Returns the location of `frame`, creating it (and its function, and
    /// on first use the mapping) if the frame wasn't seen yet this cycle.
    pub fn resolve_location(&mut self, frame: &Frame) -> LocationId {
        let filename = self.intern_optional(frame.filename.as_deref());
        let name = self.intern_optional(frame.function.as_deref());
        let function_id = self.functions.dedup(Function { name, filename });
        let mapping_id = self.mapping_id();
        let len = self.locations.len();
        let location_id = self.locations.dedup(Location {
            mapping_id,
            function_id,
            line: frame.line,
        });
        // A new function or the mapping always comes with a new location.
        if self.locations.len() != len {
            self.cached_profile = None;
        }
        location_id
    }
}

/// Private helper functions
impl ProfileBuilder {
    fn assemble_profile(&self, end_time: SystemTime) -> pprof::Profile {
        let duration_nanos = end_time
            .duration_since(self.start_time)
            // Let's not throw away the whole profile just because the clocks were wrong.
            .unwrap_or(Duration::ZERO)
            .as_nanos()
            .min(i64::MAX as u128) as i64;
        let (period, period_type) = match self.period {
            Some((value, value_type)) => (value, Some(value_type.into())),
            None => (0, None),
        };

        pprof::Profile {
            sample_type: self.sample_types.iter().map(pprof::ValueType::from).collect(),
            sample: self.samples.iter().map(pprof::Sample::from).collect(),
            mapping: pprof_iter(&self.mappings).collect(),
            location: pprof_iter(&self.locations).collect(),
            function: pprof_iter(&self.functions).collect(),
            string_table: self.strings.iter().map(String::from).collect(),
            time_nanos: self
                .start_time
                .duration_since(SystemTime::UNIX_EPOCH)
                .map_or(0, |duration| duration.as_nanos().min(i64::MAX as u128) as i64),
            duration_nanos,
            period_type,
            period,
            ..Default::default()
        }
    }

    #[inline]
    fn intern_optional(&mut self, item: Option<&str>) -> StringId {
        item.map_or(StringId::ZERO, |s| self.intern(s))
    }

    fn mapping_id(&mut self) -> MappingId {
        match self.mapping_id {
            Some(id) => id,
            None => {
                let filename = self.strings.intern(&self.config.program_name);
                let id = self.mappings.dedup(Mapping { filename });
                self.mapping_id = Some(id);
                id
            }
        }
    }
}
