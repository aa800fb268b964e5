// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::api::{Frame, StackSampleEvent};

/// What makes two stack-sample events the same observation: the thread, the
/// exact frames in order, and the declared stack depth. A truncated capture
/// and a complete one with the same visible frames stay separate.
///
/// The key borrows the frames from the event, so equality and hashing are
/// structural over the whole stack without copying it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EventGroupKey<'a> {
    thread_id: u64,
    frames: &'a [Frame],
    total_frame_count: usize,
}

impl<'a> From<&'a StackSampleEvent> for EventGroupKey<'a> {
    fn from(event: &'a StackSampleEvent) -> Self {
        Self {
            thread_id: event.thread_id(),
            frames: event.frames(),
            total_frame_count: event.total_frame_count(),
        }
    }
}

/// Groups events by [EventGroupKey], summing the values of every event in a
/// group element-wise.
///
/// Yields one `(representative, values)` pair per group, where the
/// representative is the first event seen for that key. Groups come out in
/// the order their first event appeared in `events`.
pub fn group_events<'a, I>(events: I) -> impl Iterator<Item = (&'a StackSampleEvent, Vec<i64>)>
where
    I: IntoIterator<Item = &'a StackSampleEvent>,
{
    let mut groups: FxIndexMap<EventGroupKey<'a>, (&'a StackSampleEvent, Vec<i64>)> =
        FxIndexMap::default();

    for event in events {
        let values = build_sample_values(event);
        match groups.entry(EventGroupKey::from(event)) {
            indexmap::map::Entry::Occupied(mut entry) => entry
                .get_mut()
                .1
                .iter_mut()
                .zip(values)
                .for_each(|(a, b)| *a = a.saturating_add(b)),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert((event, values));
            }
        }
    }

    groups.into_values()
}
