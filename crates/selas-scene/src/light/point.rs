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

//! The point (spot) light variant.

use crate::light::data::LightData;
use crate::light::registry::LightRegistry;
use crate::light::LightCore;
use selas_core::math::{Vec3, PI};

/// A point light, optionally restricted to a spot cone.
///
/// The opening half-angle doubles as the spot switch: at the default `π` the
/// cone covers the full sphere and the light is an omni point source. The
/// angle's cosine is cached in the packed record so shading can run the
/// cone-membership test without trigonometry.
#[derive(Debug)]
pub struct PointLight {
    pub(crate) core: LightCore,
    pub(crate) data: LightData,
}

impl PointLight {
    /// Creates a point light named `"pointLight{index}"`.
    pub fn new(registry: &mut LightRegistry) -> Self {
        Self {
            core: LightCore::new(registry, "pointLight"),
            // The record default is already the Point variant.
            data: LightData::default(),
        }
    }

    /// Returns the world-space position.
    pub fn world_position(&self) -> Vec3 {
        self.data.record.world_pos
    }

    /// Returns the aim direction, with whatever magnitude it was stored at.
    pub fn world_direction(&self) -> Vec3 {
        self.data.record.world_dir
    }

    /// Returns the spot opening half-angle in radians.
    pub fn opening_angle(&self) -> f32 {
        self.data.record.opening_angle
    }

    /// Returns the penumbra angle in radians.
    pub fn penumbra_angle(&self) -> f32 {
        self.data.record.penumbra_angle
    }

    /// Sets the world-space position.
    pub fn set_world_position(&mut self, position: Vec3) {
        self.data.record.world_pos = position;
    }

    /// Sets the aim direction, stored as given.
    pub fn set_world_direction(&mut self, direction: Vec3) {
        self.data.record.world_dir = direction;
    }

    /// Sets the spot opening half-angle, clamped to `[0, π]`, and caches
    /// its cosine in the packed record.
    pub fn set_opening_angle(&mut self, angle: f32) {
        let angle = angle.clamp(0.0, PI);
        let record = &mut self.data.record;
        record.opening_angle = angle;
        record.cos_opening_angle = angle.cos();
    }

    /// Sets the penumbra angle, clamped to `[0, π]`.
    pub fn set_penumbra_angle(&mut self, angle: f32) {
        self.data.record.penumbra_angle = angle.clamp(0.0, PI);
    }

    /// Places the light at `position`, aimed at `target`.
    ///
    /// The stored direction is `target - position`, kept unnormalized;
    /// consumers needing unit length normalize at use. `up` is accepted for
    /// interface symmetry and unused by this variant.
    pub fn move_to(&mut self, position: Vec3, target: Vec3, _up: Vec3) {
        let record = &mut self.data.record;
        record.world_pos = position;
        record.world_dir = target - position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::data::LightKind;
    use selas_core::math::FRAC_PI_4;

    #[test]
    fn defaults() {
        let mut registry = LightRegistry::new();
        let light = PointLight::new(&mut registry);
        assert_eq!(light.core.name(), "pointLight0");
        assert_eq!(light.data.record.kind, LightKind::Point as u32);
        assert_eq!(light.opening_angle(), PI);
    }

    #[test]
    fn opening_angle_clamps_and_caches_cosine() {
        let mut registry = LightRegistry::new();
        let mut light = PointLight::new(&mut registry);

        light.set_opening_angle(FRAC_PI_4);
        assert_eq!(light.opening_angle(), FRAC_PI_4);
        assert_eq!(light.data.record.cos_opening_angle, FRAC_PI_4.cos());

        light.set_opening_angle(-0.5);
        assert_eq!(light.opening_angle(), 0.0);
        assert_eq!(light.data.record.cos_opening_angle, 1.0);

        light.set_opening_angle(10.0);
        assert_eq!(light.opening_angle(), PI);
        assert_eq!(light.data.record.cos_opening_angle, PI.cos());
    }

    #[test]
    fn penumbra_angle_clamps() {
        let mut registry = LightRegistry::new();
        let mut light = PointLight::new(&mut registry);
        light.set_penumbra_angle(-1.0);
        assert_eq!(light.penumbra_angle(), 0.0);
        light.set_penumbra_angle(4.0);
        assert_eq!(light.penumbra_angle(), PI);
    }

    #[test]
    fn move_keeps_direction_unnormalized() {
        let mut registry = LightRegistry::new();
        let mut light = PointLight::new(&mut registry);

        light.move_to(Vec3::new(1.0, 0.0, 0.0), Vec3::new(4.0, 4.0, 0.0), Vec3::Y);
        assert_eq!(light.world_position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.world_direction(), Vec3::new(3.0, 4.0, 0.0));
        // Magnitude carries the aim distance; it is not unit length.
        assert_eq!(light.world_direction().length(), 5.0);
    }

    #[test]
    fn direction_setter_stores_as_given() {
        let mut registry = LightRegistry::new();
        let mut light = PointLight::new(&mut registry);
        light.set_world_direction(Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(light.world_direction(), Vec3::new(0.0, -3.0, 0.0));
    }
}
