// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Turns batches of thread stack-sample events into a deduplicated pprof
//! wall-time profile.
//!
//! Events are grouped by thread, stack and declared stack depth, and each
//! group becomes one pprof sample whose value is the summed wall time. The
//! strings, functions, locations and the synthetic mapping referenced by the
//! samples are interned into the integer-indexed tables pprof requires.

pub mod api;
pub mod collections;
pub mod config;
pub mod internal;
pub mod pprof;
pub mod serializer;
