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

//! Defines the error types for GPU resource management.

use std::fmt;

/// An error raised by a [`GpuDevice`](crate::renderer::traits::GpuDevice)
/// while creating or operating on a resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The referenced resource does not exist on this device (wrong id, or
    /// already destroyed).
    NotFound,
    /// The descriptor passed to a creation call is malformed.
    InvalidDescriptor(String),
    /// An access touched bytes outside the resource's extent.
    OutOfBounds,
    /// An error originating from the specific backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound => write!(f, "Resource not found on this device."),
            ResourceError::InvalidDescriptor(msg) => {
                write!(f, "Invalid resource descriptor: {msg}")
            }
            ResourceError::OutOfBounds => {
                write!(f, "Resource access out of bounds.")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_error_display() {
        assert_eq!(
            format!("{}", ResourceError::NotFound),
            "Resource not found on this device."
        );
        assert_eq!(
            format!(
                "{}",
                ResourceError::InvalidDescriptor("zero-sized buffer".to_string())
            ),
            "Invalid resource descriptor: zero-sized buffer"
        );
        assert_eq!(
            format!("{}", ResourceError::OutOfBounds),
            "Resource access out of bounds."
        );
    }

    #[test]
    fn resource_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ResourceError::NotFound);
        assert!(err.source().is_none());
    }
}
