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

//! Error types for the light subsystem.

use selas_core::renderer::ResourceError;
use thiserror::Error;

/// Errors raised while deriving or packing light data.
///
/// Most conditions degrade gracefully at their call sites (logged, operation
/// skipped); only device failures propagate to the caller. See the packing
/// and derivation paths for the per-variant policy.
#[derive(Error, Debug)]
pub enum LightError {
    /// The reflected constant-buffer layout disagrees with the host record.
    #[error("light record layout mismatch at {variable}.{field}: shader offset {shader_offset}, host offset {host_offset}")]
    LayoutMismatch {
        /// The constant-buffer variable being validated.
        variable: String,
        /// The shader field whose offset disagrees.
        field: &'static str,
        /// Absolute byte offset the shader reflection reports.
        shader_offset: usize,
        /// Absolute byte offset the host record requires.
        host_offset: usize,
    },

    /// A named constant-buffer variable is not declared by the shader.
    #[error("constant buffer variable not found: {variable}")]
    VariableNotFound {
        /// The fully qualified variable name that was looked up.
        variable: String,
    },

    /// An area light source mesh is not a two-triangle quad.
    #[error("unsupported area light topology: {triangles} triangles, {vertices} vertices (expected a 2-triangle quad)")]
    UnsupportedTopology {
        /// Triangle count of the rejected mesh.
        triangles: u32,
        /// Vertex count of the rejected mesh.
        vertices: u32,
    },

    /// A GPU resource operation failed.
    #[error("GPU resource error: {0}")]
    Resource(#[from] ResourceError),
}
