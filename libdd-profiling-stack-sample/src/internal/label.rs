// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::*;

/// A string-valued sample label. Stack-sample profiles only label samples
/// with strings (the thread id is sent as its decimal representation).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Label {
    key: StringId,
    str: StringId,
}

impl Label {
    pub fn str(key: StringId, str: StringId) -> Self {
        Self { key, str }
    }

    pub fn get_key(&self) -> StringId {
        self.key
    }

    pub fn get_str(&self) -> StringId {
        self.str
    }
}

impl From<Label> for pprof::Label {
    fn from(l: Label) -> Self {
        Self::from(&l)
    }
}

impl From<&Label> for pprof::Label {
    fn from(l: &Label) -> pprof::Label {
        pprof::Label::str(l.key.to_raw_id(), l.str.to_raw_id())
    }
}
