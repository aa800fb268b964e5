// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;

/// A [ProfileBuilder] that the sampling thread and the export thread can use
/// at the same time.
///
/// The sampler's critical section is a single group of events: grouping a
/// batch happens before the lock is taken, and the lock is released between
/// groups. Once a profile has been finalized, readers get it without taking
/// the lock at all until the next sample arrives.
pub struct SharedProfileBuilder {
    builder: Mutex<ProfileBuilder>,
    /// Only written while `builder` is locked, so it always matches the
    /// builder's own cached profile.
    published: ArcSwapOption<pprof::Profile>,
}

impl SharedProfileBuilder {
    pub fn new(config: BuilderConfig, start_time: SystemTime) -> Self {
        Self::from(ProfileBuilder::new(config, start_time))
    }

    pub fn add_events<'a, I>(&self, events: I)
    where
        I: IntoIterator<Item = &'a StackSampleEvent>,
    {
        let mut added = 0_usize;
        for (event, values) in group_events(events) {
            let mut builder = self.builder.lock();
            builder.add_group(event, values);
            self.published.store(None);
            added += 1;
        }
        debug!(added, "Added stack samples to the shared profile");
    }

    /// Returns the finalized profile of the current cycle. See
    /// [ProfileBuilder::to_profile].
    pub fn to_profile(&self) -> Arc<pprof::Profile> {
        if let Some(profile) = self.published.load_full() {
            trace!("Reusing the published profile");
            return profile;
        }

        let mut builder = self.builder.lock();
        let profile = builder.to_profile();
        self.published.store(Some(profile.clone()));
        profile
    }

    /// See [ProfileBuilder::reset_and_return_previous].
    pub fn reset_and_return_previous(
        &self,
        start_time: Option<SystemTime>,
    ) -> Arc<pprof::Profile> {
        let mut builder = self.builder.lock();
        self.published.store(None);
        builder.reset_and_return_previous(start_time)
    }

    pub fn serialize_into_compressed_pprof(&self) -> anyhow::Result<EncodedProfile> {
        encode_compressed_pprof(&self.to_profile())
    }

    pub fn into_inner(self) -> ProfileBuilder {
        self.builder.into_inner()
    }
}

impl From<ProfileBuilder> for SharedProfileBuilder {
    fn from(builder: ProfileBuilder) -> Self {
        Self {
            builder: Mutex::new(builder),
            published: ArcSwapOption::empty(),
        }
    }
}
