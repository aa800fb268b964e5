// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// Settings which stay the same across accumulation cycles. They are kept by
/// the builder and re-applied every time it is reset.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct BuilderConfig {
    /// Filename of the synthetic mapping every location points at.
    pub program_name: String,
    /// The sampling period, emitted as the pprof `period` and `period_type`.
    pub period: Option<PeriodConfig>,
    /// Initial capacity of the sample list of each cycle.
    pub samples_capacity: usize,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct PeriodConfig {
    pub value: i64,
    #[serde(rename = "type")]
    pub r#type: String,
    pub unit: String,
}
