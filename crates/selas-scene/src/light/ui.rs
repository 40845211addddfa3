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

//! Defines the [`LightEditor`] trait, the widget sink lights render into.

use selas_core::math::Vec3;

/// The interface a UI backend implements to edit light parameters.
///
/// `Light::render_ui` drives one widget row per call. Every method shows
/// the current value and returns `true` when the user changed it, in which
/// case the light routes the new value through the matching setter so
/// derived fields (cached cosines, world positions) stay consistent.
pub trait LightEditor {
    /// A unit-direction widget.
    fn direction(&mut self, label: &str, value: &mut Vec3) -> bool;

    /// A world-position widget.
    fn position(&mut self, label: &str, value: &mut Vec3) -> bool;

    /// An angle slider in radians, bounded to `[min, max]`.
    fn angle(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool;

    /// A generic scalar slider, bounded to `[min, max]`.
    fn scalar(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool;

    /// An RGB color picker.
    fn rgb_color(&mut self, label: &str, value: &mut Vec3) -> bool;
}
