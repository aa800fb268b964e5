// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// One entry of a captured call stack.
///
/// Frames compare by value. A missing file name or function name is a valid
/// value of its own: it is distinct from an empty string when grouping, and
/// it is emitted as the empty string in the pprof tables.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Frame {
    pub filename: Option<Box<str>>,
    pub line: i64,
    pub function: Option<Box<str>>,
}

impl Frame {
    pub fn new(filename: impl Into<Box<str>>, line: i64, function: impl Into<Box<str>>) -> Self {
        Self {
            filename: Some(filename.into()),
            line,
            function: Some(function.into()),
        }
    }
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum StackSampleError {
    #[error("stack sample holds {frames} frames but declares a total of {total_frame_count}")]
    FrameCountMismatch {
        frames: usize,
        total_frame_count: usize,
    },
}

/// A periodic snapshot of one thread's call stack, plus the wall time
/// attributed to it.
///
/// The frames are kept in the order they were captured, and that order is
/// the order of the location ids in the resulting pprof sample. The declared
/// total frame count may be larger than the number of frames when the
/// sampler truncated a deep stack.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StackSampleEvent {
    thread_id: u64,
    frames: Box<[Frame]>,
    total_frame_count: usize,
    wall_time_ns: i64,
}

impl StackSampleEvent {
    /// Creates an event for a stack which was captured in full.
    pub fn new(thread_id: u64, frames: impl Into<Box<[Frame]>>, wall_time_ns: i64) -> Self {
        let frames = frames.into();
        Self {
            thread_id,
            total_frame_count: frames.len(),
            frames,
            wall_time_ns,
        }
    }

    /// Creates an event whose stack may have been truncated by the sampler.
    /// Fails if fewer frames are declared than were captured.
    pub fn with_total_frame_count(
        thread_id: u64,
        frames: impl Into<Box<[Frame]>>,
        total_frame_count: usize,
        wall_time_ns: i64,
    ) -> Result<Self, StackSampleError> {
        let frames = frames.into();
        if frames.len() > total_frame_count {
            return Err(StackSampleError::FrameCountMismatch {
                frames: frames.len(),
                total_frame_count,
            });
        }
        Ok(Self {
            thread_id,
            frames,
            total_frame_count,
            wall_time_ns,
        })
    }

    #[inline]
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn total_frame_count(&self) -> usize {
        self.total_frame_count
    }

    #[inline]
    pub fn wall_time_ns(&self) -> i64 {
        self.wall_time_ns
    }
}
