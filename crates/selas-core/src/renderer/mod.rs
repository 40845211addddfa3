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

//! Provides the public, backend-agnostic rendering contracts.
//!
//! This module is the "common language" between the scene layer and whatever
//! backend executes GPU work. It contains the abstract traits (like
//! [`GpuDevice`]), the data structures describing resources (like
//! [`BufferDescriptor`]), the CPU shadow of a reflected constant buffer, and
//! the error types shared by every backend.
//!
//! The module defines the *what* of resource management; the *how* lives in a
//! concrete implementation in the `selas-infra` crate, and the scene layer in
//! `selas-scene` works exclusively through these contracts.

pub mod api;
pub mod error;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::error::ResourceError;
pub use self::traits::GpuDevice;
