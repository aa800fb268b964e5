// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod test_utils;

pub use libdd_profiling_protobuf::*;
pub use test_utils::*;
