// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use lz4_flex::frame::FrameEncoder;
use std::io::Write;

pub struct CompressedProtobufSerializer {
    buffer: Vec<u8>,
    zipper: FrameEncoder<Vec<u8>>,
}

impl CompressedProtobufSerializer {
    /// Encodes the message and feeds it to the lz4 frame. Messages encoded
    /// one after the other concatenate into a single protobuf message, so a
    /// profile may be written whole or one repeated field entry at a time.
    pub fn encode(&mut self, item: &impl prost::Message) -> anyhow::Result<()> {
        item.encode(&mut self.buffer)?;
        self.zipper.write_all(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }

    pub fn finish(self) -> anyhow::Result<Vec<u8>> {
        Ok(self.zipper.finish()?)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let buffer = Vec::with_capacity(capacity);
        let zipper = FrameEncoder::new(Vec::with_capacity(capacity));
        Self { buffer, zipper }
    }
}
