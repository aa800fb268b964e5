// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod compressed_streaming_encoder;

pub use compressed_streaming_encoder::*;

use crate::pprof;
use anyhow::Context;
use std::time::{Duration, SystemTime};

pub struct EncodedProfile {
    pub start: SystemTime,
    pub end: SystemTime,
    pub buffer: Vec<u8>,
}

/// Encodes a finalized profile into an lz4-framed pprof. The start and end
/// are recovered from the profile's `time_nanos` and `duration_nanos`.
pub fn encode_compressed_pprof(profile: &pprof::Profile) -> anyhow::Result<EncodedProfile> {
    let start = SystemTime::UNIX_EPOCH + Duration::from_nanos(profile.time_nanos.max(0) as u64);
    let end = start + Duration::from_nanos(profile.duration_nanos.max(0) as u64);

    // Stack-sample profiles of a single cycle are usually small, but the
    // string table alone is a few KiB as soon as real application frames
    // show up. Start big enough to skip the first few reallocations.
    const INITIAL_PPROF_BUFFER_SIZE: usize = 16 * 1024;
    let mut encoder = CompressedProtobufSerializer::with_capacity(INITIAL_PPROF_BUFFER_SIZE);
    encoder
        .encode(profile)
        .context("failed to encode the stack-sample profile")?;

    Ok(EncodedProfile {
        start,
        end,
        buffer: encoder.finish()?,
    })
}
