// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

mod event_group;
mod function;
mod label;
mod location;
mod mapping;
mod profile;
mod sample;
mod value_type;

pub use event_group::*;
pub use function::*;
pub use label::*;
pub use location::*;
pub use mapping::*;
pub use profile::*;
pub use sample::*;
pub use value_type::*;

use crate::collections::identifiable::*;
use crate::pprof;
use std::num::NonZeroU32;
