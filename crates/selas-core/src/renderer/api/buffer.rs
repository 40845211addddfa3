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

//! Defines data structures related to GPU buffer resources.

use crate::selas_bitflags;
use std::borrow::Cow;

selas_bitflags! {
    /// A set of flags describing the allowed usages of a [`BufferId`].
    ///
    /// The device uses these flags to place the buffer in the most suitable
    /// memory type and to validate bindings at runtime.
    pub struct BufferUsage: u32 {
        /// The buffer can be mapped for reading on the CPU.
        const MAP_READ = 1 << 0;
        /// The buffer can be mapped for writing on the CPU.
        const MAP_WRITE = 1 << 1;
        /// The buffer can be the source of a copy operation.
        const COPY_SRC = 1 << 2;
        /// The buffer can be the destination of a copy operation.
        const COPY_DST = 1 << 3;

        /// The buffer can be bound as a vertex buffer.
        const VERTEX = 1 << 4;
        /// The buffer can be bound as an index buffer.
        const INDEX = 1 << 5;
        /// The buffer can be bound as a constant (uniform) buffer.
        const UNIFORM = 1 << 6;
        /// The buffer can be bound as a storage buffer with shader read/write access.
        const STORAGE = 1 << 7;
    }
}

/// The kind of CPU access a buffer is created with.
///
/// Determines which of the mapped-access paths are legal for the buffer and
/// which memory pool the backend should allocate it from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CpuAccess {
    /// Device-local memory; the CPU never maps the buffer directly.
    #[default]
    None,
    /// The CPU writes to the buffer (upload heap).
    Write,
    /// The CPU reads the buffer back (readback heap).
    Read,
}

/// A descriptor used to create a [`BufferId`].
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The total size of the buffer in bytes. Must be non-zero.
    pub size: u64,
    /// A bitmask of [`BufferUsage`] flags describing how the buffer will be used.
    pub usage: BufferUsage,
    /// The CPU access pattern the buffer is created for.
    pub cpu_access: CpuAccess,
}

impl<'a> BufferDescriptor<'a> {
    /// Creates a descriptor for a device-local buffer with the given label.
    pub fn new(label: impl Into<Cow<'a, str>>, size: u64, usage: BufferUsage) -> Self {
        Self {
            label: Some(label.into()),
            size,
            usage,
            cpu_access: CpuAccess::None,
        }
    }
}

/// An opaque handle to a GPU buffer resource.
///
/// Returned by [`GpuDevice::create_buffer`](crate::renderer::traits::GpuDevice::create_buffer)
/// and used to reference the buffer in all subsequent operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// A GPU virtual address for a buffer that has been made resident.
///
/// A zero address means "not resident"; devices never hand out zero for a
/// live residency. The raw value is what gets packed into bindless records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GpuAddress(pub u64);

impl GpuAddress {
    /// The null address, marking a buffer that is not resident.
    pub const NULL: Self = Self(0);

    /// Returns `true` if this is the null (non-resident) address.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_defaults_to_device_local() {
        let desc = BufferDescriptor::new("scratch", 256, BufferUsage::VERTEX);
        assert_eq!(desc.size, 256);
        assert_eq!(desc.cpu_access, CpuAccess::None);
        assert!(desc.usage.contains(BufferUsage::VERTEX));
        assert_eq!(desc.label.as_deref(), Some("scratch"));
    }

    #[test]
    fn gpu_address_null_semantics() {
        assert!(GpuAddress::NULL.is_null());
        assert!(GpuAddress::default().is_null());
        assert!(!GpuAddress(0x1000).is_null());
    }
}
