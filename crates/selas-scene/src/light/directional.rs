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

//! The directional light variant.

use crate::light::data::{LightData, LightKind, LightRecord};
use crate::light::registry::LightRegistry;
use crate::light::LightCore;
use selas_core::math::Vec3;

/// A sun-style light: parallel rays along a direction, no falloff.
///
/// The packed world position is derived, never authored directly: the light
/// is placed at `center - direction * distance`, outside the reference scene
/// bounds on the incoming side. Both the direction setter and the scene
/// parameter setter re-derive it, so repeating either call with the same
/// inputs leaves the record unchanged.
#[derive(Debug)]
pub struct DirectionalLight {
    pub(crate) core: LightCore,
    pub(crate) data: LightData,
    center: Vec3,
    distance: f32,
}

impl DirectionalLight {
    /// Creates a directional light named `"dirLight{index}"`.
    pub fn new(registry: &mut LightRegistry) -> Self {
        Self {
            core: LightCore::new(registry, "dirLight"),
            data: LightData {
                record: LightRecord {
                    kind: LightKind::Directional as u32,
                    ..LightRecord::default()
                },
                ..LightData::default()
            },
            center: Vec3::ZERO,
            // Placement distance before set_world_params supplies scene
            // bounds; the derived position stays finite.
            distance: -1.0,
        }
    }

    /// Returns the direction the light travels, unit length.
    pub fn world_direction(&self) -> Vec3 {
        self.data.record.world_dir
    }

    /// Returns the derived world position.
    pub fn world_position(&self) -> Vec3 {
        self.data.record.world_pos
    }

    /// Points the light along `dir` and re-derives the world position.
    ///
    /// The direction is normalized on store.
    pub fn set_world_direction(&mut self, dir: Vec3) {
        let record = &mut self.data.record;
        record.world_dir = dir.normalize();
        record.world_pos = self.center - record.world_dir * self.distance;
    }

    /// Sets the reference scene bounds the light is placed against.
    ///
    /// `radius` becomes the placement distance from `center`; the world
    /// position is re-derived immediately.
    pub fn set_world_params(&mut self, center: Vec3, radius: f32) {
        self.center = center;
        self.distance = radius;
        self.set_world_direction(self.data.record.world_dir);
    }

    /// Directional lights have no position to move; logs and ignores.
    pub fn move_to(&mut self, _position: Vec3, _target: Vec3, _up: Vec3) {
        log::error!(
            "DirectionalLight '{}': move is not supported for this variant",
            self.core.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selas_core::math::EPSILON;

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn defaults() {
        let mut registry = LightRegistry::new();
        let light = DirectionalLight::new(&mut registry);
        assert_eq!(light.core.name(), "dirLight0");
        assert_eq!(light.data.record.kind, LightKind::Directional as u32);
        assert_eq!(light.world_direction(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn direction_is_normalized_on_store() {
        let mut registry = LightRegistry::new();
        let mut light = DirectionalLight::new(&mut registry);
        light.set_world_direction(Vec3::new(0.0, -10.0, 0.0));
        assert!(vec3_approx_eq(
            light.world_direction(),
            Vec3::new(0.0, -1.0, 0.0)
        ));
    }

    #[test]
    fn position_is_derived_from_scene_params() {
        let mut registry = LightRegistry::new();
        let mut light = DirectionalLight::new(&mut registry);

        light.set_world_params(Vec3::new(1.0, 2.0, 3.0), 100.0);
        light.set_world_direction(Vec3::new(0.0, -1.0, 0.0));
        // center - direction * distance puts the light above the scene.
        assert!(vec3_approx_eq(
            light.world_position(),
            Vec3::new(1.0, 102.0, 3.0)
        ));

        // Re-running either setter with the same inputs changes nothing.
        let before = light.data.record;
        light.set_world_params(Vec3::new(1.0, 2.0, 3.0), 100.0);
        light.set_world_direction(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(light.data.record, before);
    }

    #[test]
    fn move_is_ignored() {
        let mut registry = LightRegistry::new();
        let mut light = DirectionalLight::new(&mut registry);
        let before = light.data.record;
        light.move_to(Vec3::ONE, Vec3::ZERO, Vec3::Y);
        assert_eq!(light.data.record, before);
    }
}
