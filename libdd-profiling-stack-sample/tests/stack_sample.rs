// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use libdd_profiling_stack_sample::api::{Frame, StackSampleEvent};
use libdd_profiling_stack_sample::config::BuilderConfig;
use libdd_profiling_stack_sample::internal::{ProfileBuilder, SharedProfileBuilder};
use libdd_profiling_stack_sample::pprof;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

// A Puma worker thread serving a Rails request, leaf first.
fn rails_stack() -> Vec<Frame> {
    vec![
        Frame::new("/app/app/models/order.rb", 27, "Order#total"),
        Frame::new("/app/app/controllers/orders_controller.rb", 8, "OrdersController#index"),
        Frame::new(
            "/usr/local/bundle/gems/puma-6.4.2/lib/puma/thread_pool.rb",
            155,
            "block in spawn_thread",
        ),
    ]
}

fn builder() -> ProfileBuilder {
    ProfileBuilder::new(BuilderConfig::default(), SystemTime::now())
}

#[track_caller]
fn labels(profile: &pprof::Profile, sample: &pprof::Sample) -> Vec<(String, String)> {
    sample
        .label
        .iter()
        .map(|label| {
            (
                pprof::string_table_fetch(profile, label.key).clone(),
                pprof::string_table_fetch(profile, label.str).clone(),
            )
        })
        .collect()
}

#[track_caller]
fn frames(profile: &pprof::Profile, sample: &pprof::Sample) -> Vec<Frame> {
    sample
        .location_id
        .iter()
        .map(|id| {
            let location = profile
                .location
                .iter()
                .find(|location| location.id == *id)
                .expect("sample location to be defined");
            let line = location.line[0];
            let function = profile
                .function
                .iter()
                .find(|function| function.id == line.function_id)
                .expect("location function to be defined");
            Frame::new(
                pprof::string_table_fetch(profile, function.filename).as_str(),
                line.line,
                pprof::string_table_fetch(profile, function.name).as_str(),
            )
        })
        .collect()
}

#[test]
fn same_thread_and_stack_are_one_sample() {
    let mut builder = builder();
    let profile = builder.build_profile(&[
        StackSampleEvent::new(1, rails_stack(), 100),
        StackSampleEvent::new(1, rails_stack(), 200),
    ]);

    assert_eq!(1, profile.sample.len());
    let sample = &profile.sample[0];
    assert_eq!(vec![300], sample.value);
    assert_eq!(
        vec![("thread id".to_string(), "1".to_string())],
        labels(&profile, sample)
    );
    assert_eq!(rails_stack(), frames(&profile, sample));
}

#[test]
fn different_threads_are_separate_samples() {
    let mut builder = builder();
    let profile = builder.build_profile(&[
        StackSampleEvent::new(1, rails_stack(), 100),
        StackSampleEvent::new(2, rails_stack(), 200),
    ]);

    assert_eq!(2, profile.sample.len());
    assert_eq!(vec![100], profile.sample[0].value);
    assert_eq!(vec![200], profile.sample[1].value);
    assert_eq!(
        vec![("thread id".to_string(), "2".to_string())],
        labels(&profile, &profile.sample[1])
    );

    // Both samples point at the same locations.
    assert_eq!(profile.sample[0].location_id, profile.sample[1].location_id);
    assert_eq!(3, profile.location.len());
}

#[test]
fn truncated_stacks_keep_only_captured_frames() {
    let mut builder = builder();
    let truncated = StackSampleEvent::with_total_frame_count(1, rails_stack(), 400, 100).unwrap();
    let complete = StackSampleEvent::new(1, rails_stack(), 100);
    let profile = builder.build_profile([&truncated, &complete]);

    assert_eq!(2, profile.sample.len());
    for sample in profile.sample.iter() {
        assert_eq!(3, sample.location_id.len());
    }
}

#[test]
fn the_wall_time_sample_type() {
    let mut builder = builder();
    let profile = builder.to_profile();
    assert_eq!(1, profile.sample_type.len());
    let sample_type = profile.sample_type[0];
    assert_eq!("wall", pprof::string_table_fetch(&profile, sample_type.r#type));
    assert_eq!(
        "nanoseconds",
        pprof::string_table_fetch(&profile, sample_type.unit)
    );
}

#[test]
fn ids_are_valid_pprof_ids() {
    let mut builder = builder();
    let profile = builder.build_profile(&[
        StackSampleEvent::new(1, rails_stack(), 100),
        StackSampleEvent::new(2, rails_stack()[1..].to_vec(), 100),
    ]);

    for (offset, location) in profile.location.iter().enumerate() {
        assert_eq!(offset as u64 + 1, location.id);
    }
    for (offset, function) in profile.function.iter().enumerate() {
        assert_eq!(offset as u64 + 1, function.id);
    }
    assert_eq!(vec![1], profile.mapping.iter().map(|m| m.id).collect::<Vec<_>>());
}

#[test]
fn serialized_profile_roundtrips() {
    let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let mut builder = ProfileBuilder::new(BuilderConfig::default(), start);
    builder.add_events(&[
        StackSampleEvent::new(1, rails_stack(), 100),
        StackSampleEvent::new(2, rails_stack(), 200),
        StackSampleEvent::new(1, rails_stack(), 300),
    ]);

    let encoded = builder
        .serialize_into_compressed_pprof()
        .expect("serialization to succeed");
    assert_eq!(start, encoded.start);
    assert!(encoded.end >= encoded.start);

    let decoded = pprof::deserialize_compressed_pprof(&encoded.buffer)
        .expect("the lz4 pprof to decode");
    let finalized = builder.to_profile();
    assert_eq!(*finalized, decoded);

    let values: Vec<_> = pprof::sorted_samples(&decoded)
        .into_iter()
        .map(|sample| sample.value)
        .collect();
    assert_eq!(vec![vec![200], vec![400]], values);
}

#[test]
fn accumulation_cycles() {
    let shared = SharedProfileBuilder::new(BuilderConfig::default(), SystemTime::now());

    shared.add_events(&[StackSampleEvent::new(1, rails_stack(), 100)]);
    let first_cycle = shared.to_profile();
    assert!(Arc::ptr_eq(&first_cycle, &shared.to_profile()));

    let previous = shared.reset_and_return_previous(None);
    assert!(Arc::ptr_eq(&first_cycle, &previous));

    let empty_cycle = shared.to_profile();
    assert!(empty_cycle.sample.is_empty());
    assert_eq!(
        vec!["", "wall", "nanoseconds", "thread id"],
        empty_cycle.string_table
    );

    shared.add_events(&[StackSampleEvent::new(9, rails_stack(), 50)]);
    let second_cycle = shared.to_profile();
    assert_eq!(1, second_cycle.sample.len());
    assert_eq!(vec![50], second_cycle.sample[0].value);
}
