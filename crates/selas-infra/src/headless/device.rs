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

//! A [`GpuDevice`] that stores every buffer in host memory.
//!
//! The headless device executes the full resource contract (creation, writes,
//! blocking readback, residency) without any GPU. Asset pipelines use it to
//! run geometry derivation passes offline, and the scene crate's tests use it
//! to exercise code that would otherwise need a swapchain-capable backend.

use selas_core::renderer::api::{BufferDescriptor, BufferId, BufferUsage, CpuAccess, GpuAddress};
use selas_core::renderer::error::ResourceError;
use selas_core::renderer::traits::GpuDevice;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Base of the fake GPU virtual address range handed out for residency.
///
/// Kept far from zero so a null address can never collide with a live one.
const GPU_VA_BASE: u64 = 0x0001_0000_0000;
/// Address stride between consecutive buffer ids.
const GPU_VA_STRIDE: u64 = 0x1_0000;

#[derive(Debug)]
struct BufferEntry {
    bytes: Vec<u8>,
    #[allow(dead_code)]
    usage: BufferUsage,
    #[allow(dead_code)]
    cpu_access: CpuAccess,
    resident: Option<GpuAddress>,
    label: Option<String>,
}

/// A CPU-backed [`GpuDevice`] implementation.
///
/// Every buffer is a `Vec<u8>` behind a mutex, so the device is cheap to
/// construct per test and safe to share between threads. Residency hands out
/// stable fake virtual addresses derived from the buffer id.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    buffers: Mutex<HashMap<BufferId, BufferEntry>>,
    next_buffer_id: AtomicUsize,
}

impl HeadlessDevice {
    /// Creates an empty device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live buffers, for leak checks in tests.
    pub fn buffer_count(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }

    /// Returns the residency address of a buffer, if it is resident.
    pub fn residency_of(&self, id: BufferId) -> Option<GpuAddress> {
        self.buffers
            .lock()
            .unwrap()
            .get(&id)
            .and_then(|entry| entry.resident)
    }

    fn address_for(id: BufferId) -> GpuAddress {
        GpuAddress(GPU_VA_BASE + id.0 as u64 * GPU_VA_STRIDE)
    }
}

impl GpuDevice for HeadlessDevice {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        if descriptor.size == 0 {
            return Err(ResourceError::InvalidDescriptor(
                "buffer size must be non-zero".to_string(),
            ));
        }
        let id = BufferId(self.next_buffer_id.fetch_add(1, Ordering::Relaxed));
        let entry = BufferEntry {
            bytes: vec![0; descriptor.size as usize],
            usage: descriptor.usage,
            cpu_access: descriptor.cpu_access,
            resident: None,
            label: descriptor.label.as_ref().map(|l| l.to_string()),
        };
        log::debug!(
            "HeadlessDevice: created buffer {:?} ({} bytes, label {:?})",
            id,
            descriptor.size,
            entry.label
        );
        self.buffers.lock().unwrap().insert(id, entry);
        Ok(id)
    }

    fn create_buffer_with_data(
        &self,
        descriptor: &BufferDescriptor,
        data: &[u8],
    ) -> Result<BufferId, ResourceError> {
        if data.len() as u64 > descriptor.size {
            return Err(ResourceError::InvalidDescriptor(format!(
                "initial data ({} bytes) larger than buffer size ({})",
                data.len(),
                descriptor.size
            )));
        }
        let id = self.create_buffer(descriptor)?;
        self.write_buffer(id, 0, data)?;
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        match self.buffers.lock().unwrap().remove(&id) {
            Some(entry) => {
                log::debug!(
                    "HeadlessDevice: destroyed buffer {:?} (label {:?})",
                    id,
                    entry.label
                );
                Ok(())
            }
            None => Err(ResourceError::NotFound),
        }
    }

    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), ResourceError> {
        let mut buffers = self.buffers.lock().unwrap();
        let entry = buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let end = offset as usize + data.len();
        if end > entry.bytes.len() {
            return Err(ResourceError::OutOfBounds);
        }
        entry.bytes[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn read_buffer(&self, id: BufferId, offset: u64, dst: &mut [u8]) -> Result<(), ResourceError> {
        let buffers = self.buffers.lock().unwrap();
        let entry = buffers.get(&id).ok_or(ResourceError::NotFound)?;
        let end = offset as usize + dst.len();
        if end > entry.bytes.len() {
            return Err(ResourceError::OutOfBounds);
        }
        dst.copy_from_slice(&entry.bytes[offset as usize..end]);
        Ok(())
    }

    fn buffer_size(&self, id: BufferId) -> Result<u64, ResourceError> {
        let buffers = self.buffers.lock().unwrap();
        let entry = buffers.get(&id).ok_or(ResourceError::NotFound)?;
        Ok(entry.bytes.len() as u64)
    }

    fn make_resident(&self, id: BufferId) -> Result<GpuAddress, ResourceError> {
        let mut buffers = self.buffers.lock().unwrap();
        let entry = buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        let address = *entry.resident.get_or_insert_with(|| Self::address_for(id));
        Ok(address)
    }

    fn evict(&self, id: BufferId) -> Result<(), ResourceError> {
        let mut buffers = self.buffers.lock().unwrap();
        let entry = buffers.get_mut(&id).ok_or(ResourceError::NotFound)?;
        entry.resident = None;
        Ok(())
    }
}
