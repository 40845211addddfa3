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

//! Backend-agnostic rendering API types.
//!
//! - **[`buffer`]**: GPU buffer handles, descriptors, and usage flags.
//! - **[`constant_buffer`]**: the CPU shadow of a reflected constant buffer.

pub mod buffer;
pub mod constant_buffer;

pub use self::buffer::{BufferDescriptor, BufferId, BufferUsage, CpuAccess, GpuAddress};
pub use self::constant_buffer::{ConstantBuffer, ConstantBufferLayout};
