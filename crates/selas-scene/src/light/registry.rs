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

//! Light index allocation.

/// Allocates the stable zero-based indices lights carry for their lifetime.
///
/// One registry belongs to one scene session; light constructors take it by
/// mutable reference, which keeps index allocation off global state. Indices
/// feed default light names (`"pointLight3"`) and shader-side array slots.
#[derive(Debug, Default)]
pub struct LightRegistry {
    next_index: u32,
}

impl LightRegistry {
    /// Creates a registry that will hand out indices from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next index and advances the counter.
    pub fn allocate(&mut self) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Returns how many indices have been handed out.
    pub fn allocated(&self) -> u32 {
        self.next_index
    }

    /// Restarts allocation from zero.
    ///
    /// Lights created before the reset keep their indices; creating more
    /// lights afterwards can repeat them. Callers resetting mid-session must
    /// not mix lights from both generations in one binding set.
    pub fn reset(&mut self) {
        self.next_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_sequential_from_zero() {
        let mut registry = LightRegistry::new();
        assert_eq!(registry.allocate(), 0);
        assert_eq!(registry.allocate(), 1);
        assert_eq!(registry.allocate(), 2);
        assert_eq!(registry.allocated(), 3);
    }

    #[test]
    fn reset_restarts_allocation() {
        let mut registry = LightRegistry::new();
        let first = registry.allocate();
        let second = registry.allocate();

        registry.reset();
        assert_eq!(registry.allocated(), 0);
        // Fresh indices repeat the old ones; earlier lights are not renumbered.
        assert_eq!(registry.allocate(), first);
        assert_eq!(registry.allocate(), second);
    }
}
