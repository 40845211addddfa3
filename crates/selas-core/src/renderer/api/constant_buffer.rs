// Copyright 2025 The Selas Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The CPU shadow of a shader constant buffer and its reflected layout.
//!
//! Shader reflection (which lives outside this crate) produces a
//! [`ConstantBufferLayout`]: the byte offset of every reachable variable in a
//! constant buffer, keyed by its dotted shader name (`"gLight.worldPos"`).
//! A [`ConstantBuffer`] pairs one such layout with CPU-side storage; scene
//! code writes packed records into it by offset and the backend uploads the
//! bytes wholesale.

use std::collections::{HashMap, HashSet};

/// The reflected layout of one shader constant buffer.
///
/// Maps fully qualified variable names to byte offsets from the start of the
/// buffer. Layouts are produced by reflection; tests construct them by hand
/// with the builder methods.
#[derive(Debug, Clone, Default)]
pub struct ConstantBufferLayout {
    size: usize,
    fields: HashMap<String, usize>,
}

impl ConstantBufferLayout {
    /// Creates an empty layout for a buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            fields: HashMap::new(),
        }
    }

    /// Adds a variable to the layout and returns the layout for chaining.
    ///
    /// `name` is the fully qualified shader name, e.g. `"gLight.worldPos"`.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, offset: usize) -> Self {
        self.fields.insert(name.into(), offset);
        self
    }

    /// Returns the byte offset of a variable, or `None` if the shader does
    /// not declare it (dead-stripped or simply absent).
    pub fn field_offset(&self, name: &str) -> Option<usize> {
        self.fields.get(name).copied()
    }

    /// Returns the total size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// CPU-side storage for one shader constant buffer.
///
/// Owns a byte vector the size of the reflected buffer plus the layout used
/// to address it. Also carries the per-variable layout-validation memo: the
/// expensive CPU-vs-GPU offset comparison runs once per distinct variable
/// name on each buffer, not once per frame.
#[derive(Debug)]
pub struct ConstantBuffer {
    layout: ConstantBufferLayout,
    data: Vec<u8>,
    checked_vars: HashSet<String>,
}

impl ConstantBuffer {
    /// Creates a zero-initialized buffer shadow for the given layout.
    pub fn from_layout(layout: ConstantBufferLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            data: vec![0; size],
            checked_vars: HashSet::new(),
        }
    }

    /// Returns the reflected layout backing this buffer.
    pub fn layout(&self) -> &ConstantBufferLayout {
        &self.layout
    }

    /// Returns the byte offset of a variable, or `None` if the shader does
    /// not declare it.
    pub fn variable_offset(&self, name: &str) -> Option<usize> {
        self.layout.field_offset(name)
    }

    /// Returns the total size of the buffer in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the raw contents of the buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Copies `blob` into the buffer starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the write would run past the end of the buffer. Callers are
    /// expected to have sized their writes against [`Self::size`]; a failure
    /// here is a programming error, not a runtime condition.
    pub fn set_blob(&mut self, blob: &[u8], offset: usize) {
        assert!(
            offset + blob.len() <= self.data.len(),
            "constant buffer write of {} bytes at offset {} exceeds buffer size {}",
            blob.len(),
            offset,
            self.data.len()
        );
        self.data[offset..offset + blob.len()].copy_from_slice(blob);
    }

    /// Records that layout validation ran for `var_name`.
    ///
    /// # Returns
    ///
    /// `true` the first time a given variable name is seen on this buffer
    /// (the caller should validate now), `false` on every later call.
    pub fn mark_layout_checked(&mut self, var_name: &str) -> bool {
        if self.checked_vars.contains(var_name) {
            return false;
        }
        self.checked_vars.insert(var_name.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_layout() -> ConstantBufferLayout {
        ConstantBufferLayout::new(64)
            .with_field("gLight.worldPos", 0)
            .with_field("gLight.intensity", 16)
    }

    #[test]
    fn field_lookup() {
        let cb = ConstantBuffer::from_layout(test_layout());
        assert_eq!(cb.variable_offset("gLight.worldPos"), Some(0));
        assert_eq!(cb.variable_offset("gLight.intensity"), Some(16));
        assert_eq!(cb.variable_offset("gLight.missing"), None);
        assert_eq!(cb.size(), 64);
    }

    #[test]
    fn set_blob_writes_in_place() {
        let mut cb = ConstantBuffer::from_layout(test_layout());
        cb.set_blob(&[1, 2, 3, 4], 16);
        assert_eq!(&cb.bytes()[16..20], &[1, 2, 3, 4]);
        assert_eq!(&cb.bytes()[0..16], &[0; 16]);
        // Writing exactly up to the end is allowed.
        cb.set_blob(&[9; 4], 60);
        assert_eq!(&cb.bytes()[60..], &[9; 4]);
    }

    #[test]
    #[should_panic(expected = "exceeds buffer size")]
    fn set_blob_rejects_overflow() {
        let mut cb = ConstantBuffer::from_layout(test_layout());
        cb.set_blob(&[0; 8], 60);
    }

    #[test]
    fn layout_check_memo_fires_once_per_variable() {
        let mut cb = ConstantBuffer::from_layout(test_layout());
        assert!(cb.mark_layout_checked("gLight"));
        assert!(!cb.mark_layout_checked("gLight"));
        assert!(!cb.mark_layout_checked("gLight"));
        // A different variable name on the same buffer gets its own check.
        assert!(cb.mark_layout_checked("gLights[0]"));
        assert!(!cb.mark_layout_checked("gLights[0]"));
    }
}
