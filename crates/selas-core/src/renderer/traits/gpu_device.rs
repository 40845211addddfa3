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

//! Defines the [`GpuDevice`] trait, the backend-agnostic resource interface.

use crate::renderer::api::{BufferDescriptor, BufferId, GpuAddress};
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The interface every graphics backend implements for resource management.
///
/// Scene code holds a `&dyn GpuDevice` and never touches backend types
/// directly. All methods take `&self`; implementations use interior
/// mutability so a single device can be shared across systems.
pub trait GpuDevice: Send + Sync + Debug {
    /// Creates a new GPU buffer.
    /// ## Arguments
    /// * `descriptor` - A reference to a `BufferDescriptor` containing the buffer configuration.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Creates a new GPU buffer and initializes it with the provided data.
    /// This is the preferred path for static geometry and lookup tables.
    /// ## Arguments
    /// * `descriptor` - A reference to a `BufferDescriptor` containing the buffer configuration.
    /// * `data` - A slice of bytes containing the initial data for the buffer.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError>;

    /// Destroys a GPU buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to be destroyed.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Writes data to a GPU buffer.
    /// ## Arguments
    /// * `id` - The ID of the buffer to write to.
    /// * `offset` - The offset in the buffer where the data will be written.
    /// * `data` - A slice of bytes containing the data to be written.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError>;

    /// Reads data back from a GPU buffer, blocking until the copy completes.
    ///
    /// Intended for tooling and derivation passes (e.g. reading mesh geometry
    /// to build sampling tables), not for per-frame use.
    /// ## Arguments
    /// * `id` - The ID of the buffer to read from.
    /// * `offset` - The offset in the buffer where the read starts.
    /// * `dst` - The destination slice; its length is the number of bytes read.
    /// ## Returns
    /// A `Result` indicating success or failure of the operation.
    fn read_buffer(&self, id: BufferId, offset: u64, dst: &mut [u8]) -> Result<(), ResourceError>;

    /// Returns the size of a buffer in bytes.
    /// ## Arguments
    /// * `id` - The ID of the buffer to query.
    fn buffer_size(&self, id: BufferId) -> Result<u64, ResourceError>;

    /// Makes a buffer resident and returns its stable GPU virtual address.
    ///
    /// Residency is idempotent: calling this on an already resident buffer
    /// returns the same address. The address stays valid until [`Self::evict`]
    /// or [`Self::destroy_buffer`].
    /// ## Arguments
    /// * `id` - The ID of the buffer to make resident.
    /// ## Returns
    /// A `Result` containing the buffer's non-null GPU virtual address.
    fn make_resident(&self, id: BufferId) -> Result<GpuAddress, ResourceError>;

    /// Removes a buffer from the resident set.
    ///
    /// Evicting a buffer that is not resident is a no-op. Any previously
    /// handed out address for the buffer becomes invalid.
    /// ## Arguments
    /// * `id` - The ID of the buffer to evict.
    fn evict(&self, id: BufferId) -> Result<(), ResourceError>;
}
