// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;

/// The interned type and unit of a sample value or of the profile's period.
/// Stack samples always report one `wall`/`nanoseconds` value; a period may
/// use any type and unit the caller configured.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ValueType {
    pub r#type: StringId,
    pub unit: StringId,
}

impl ValueType {
    #[inline]
    pub fn new(r#type: StringId, unit: StringId) -> Self {
        Self { r#type, unit }
    }
}

impl From<&ValueType> for pprof::ValueType {
    fn from(value_type: &ValueType) -> Self {
        Self {
            r#type: value_type.r#type.to_raw_id(),
            unit: value_type.unit.to_raw_id(),
        }
    }
}

impl From<ValueType> for pprof::ValueType {
    fn from(value_type: ValueType) -> Self {
        Self::from(&value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_raw_string_ids() {
        let wall = ValueType::new(StringId::from_offset(1), StringId::from_offset(2));
        assert_eq!(
            pprof::ValueType { r#type: 1, unit: 2 },
            pprof::ValueType::from(wall)
        );
    }
}
