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

//! Scene lights and their GPU packing path.
//!
//! A [`Light`] is a tagged sum over the directional, point, and mesh-derived
//! area variants. Every variant packs the shared [`LightRecord`] prefix;
//! area lights extend it with a residency table. Packing into a
//! [`ConstantBuffer`] anchors on the reflected `"{var}.worldPos"` offset,
//! validates the reflected layout against the host record once per variable
//! name per buffer, and writes the non-material prefix in a single blob.
//!
//! Intensity is stored as linear RGB radiance. For editing it is decomposed
//! into a normalized color and a scalar scale; the decomposition is cached
//! and recomputed lazily after any direct intensity write.

pub mod area;
pub mod data;
pub mod directional;
pub mod error;
pub mod point;
pub mod registry;
pub mod ui;

pub use area::{create_area_light, create_area_lights_for_model, AreaLight};
pub use data::{
    validate_layout, AreaLightData, AreaLightRecord, GpuBufferRef, LightData, LightKind,
    LightRecord,
};
pub use directional::DirectionalLight;
pub use error::LightError;
pub use point::PointLight;
pub use registry::LightRegistry;
pub use ui::LightEditor;

use selas_core::math::{Vec3, PI};
use selas_core::renderer::{ConstantBuffer, GpuDevice};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, mutable handle to a light.
pub type SharedLight = Rc<RefCell<Light>>;

/// Cached decomposition of the packed intensity into a display color and a
/// scalar scale.
///
/// The packed intensity stays authoritative; the cache goes stale whenever a
/// non-UI path writes it and is recomputed on the next UI read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IntensityUi {
    color: Vec3,
    scale: f32,
    dirty: bool,
}

impl Default for IntensityUi {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            scale: 1.0,
            dirty: true,
        }
    }
}

impl IntensityUi {
    /// Flags the cache stale; the next UI read recomputes the decomposition.
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn refresh(&mut self, intensity: Vec3) {
        if !self.dirty {
            return;
        }
        let magnitude = intensity.max_element();
        if magnitude > 1.0 {
            self.color = intensity / magnitude;
            self.scale = magnitude;
        } else {
            self.color = intensity;
            self.scale = 1.0;
        }
        self.dirty = false;
    }

    fn color_for_ui(&mut self, intensity: Vec3) -> Vec3 {
        self.refresh(intensity);
        self.color
    }

    fn scale_for_ui(&mut self, intensity: Vec3) -> f32 {
        self.refresh(intensity);
        self.scale
    }

    fn set_color(&mut self, color: Vec3) -> Vec3 {
        self.color = color;
        self.dirty = false;
        self.color * self.scale
    }

    fn set_scale(&mut self, scale: f32) -> Vec3 {
        self.scale = scale;
        self.dirty = false;
        self.color * self.scale
    }
}

/// State shared by every light variant: the registry index, the display
/// name, and the UI intensity cache.
#[derive(Debug)]
pub struct LightCore {
    index: u32,
    name: String,
    pub(crate) ui: IntensityUi,
}

impl LightCore {
    pub(crate) fn new(registry: &mut LightRegistry, prefix: &str) -> Self {
        let index = registry.allocate();
        Self {
            index,
            name: format!("{prefix}{index}"),
            ui: IntensityUi::default(),
        }
    }

    /// Returns the stable zero-based light index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// A scene light.
#[derive(Debug)]
pub enum Light {
    /// Sun-style light: parallel rays, no falloff.
    Directional(DirectionalLight),
    /// Point light, optionally restricted to a spot cone.
    Point(PointLight),
    /// Light emitted by mesh geometry.
    Area(AreaLight),
}

impl Light {
    /// Creates a directional light.
    pub fn directional(registry: &mut LightRegistry) -> Self {
        Self::Directional(DirectionalLight::new(registry))
    }

    /// Creates a point light.
    pub fn point(registry: &mut LightRegistry) -> Self {
        Self::Point(PointLight::new(registry))
    }

    /// Creates a detached area light.
    pub fn area(registry: &mut LightRegistry) -> Self {
        Self::Area(AreaLight::new(registry))
    }

    fn core(&self) -> &LightCore {
        match self {
            Light::Directional(light) => &light.core,
            Light::Point(light) => &light.core,
            Light::Area(light) => &light.core,
        }
    }

    fn core_mut(&mut self) -> &mut LightCore {
        match self {
            Light::Directional(light) => &mut light.core,
            Light::Point(light) => &mut light.core,
            Light::Area(light) => &mut light.core,
        }
    }

    /// Returns the variant tag.
    pub fn kind(&self) -> LightKind {
        match self {
            Light::Directional(_) => LightKind::Directional,
            Light::Point(_) => LightKind::Point,
            Light::Area(_) => LightKind::Area,
        }
    }

    /// Returns the stable zero-based light index.
    pub fn index(&self) -> u32 {
        self.core().index()
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        self.core().name()
    }

    /// Replaces the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.core_mut().set_name(name);
    }

    /// Returns the shared base prefix of the packed record.
    pub fn record(&self) -> &LightRecord {
        match self {
            Light::Directional(light) => &light.data.record,
            Light::Point(light) => &light.data.record,
            Light::Area(light) => &light.data.record.base,
        }
    }

    fn record_mut(&mut self) -> &mut LightRecord {
        match self {
            Light::Directional(light) => &mut light.data.record,
            Light::Point(light) => &mut light.data.record,
            Light::Area(light) => &mut light.data.record.base,
        }
    }

    /// Returns the packed intensity, linear RGB radiance.
    pub fn intensity(&self) -> Vec3 {
        self.record().intensity
    }

    /// Sets the packed intensity directly and marks the UI cache stale.
    ///
    /// Does not touch the embedded material block; only the UI setters
    /// propagate intensity into emissive layers.
    pub fn set_intensity(&mut self, intensity: Vec3) {
        self.record_mut().intensity = intensity;
        self.core_mut().ui.mark_dirty();
    }

    /// Returns the display color: the packed intensity scaled so its largest
    /// component is at most one.
    pub fn get_color_for_ui(&mut self) -> Vec3 {
        let intensity = self.intensity();
        self.core_mut().ui.color_for_ui(intensity)
    }

    /// Returns the display scale paired with [`Self::get_color_for_ui`].
    pub fn get_intensity_for_ui(&mut self) -> f32 {
        let intensity = self.intensity();
        self.core_mut().ui.scale_for_ui(intensity)
    }

    /// Sets the display color and repacks `intensity = color * scale`.
    ///
    /// On area lights the new intensity also lands in every emissive layer
    /// of the embedded material block.
    pub fn set_color_from_ui(&mut self, color: Vec3) {
        let intensity = self.core_mut().ui.set_color(color);
        self.record_mut().intensity = intensity;
        self.sync_material_intensity();
    }

    /// Sets the display scale and repacks `intensity = color * scale`.
    ///
    /// On area lights the new intensity also lands in every emissive layer
    /// of the embedded material block.
    pub fn set_intensity_from_ui(&mut self, scale: f32) {
        let intensity = self.core_mut().ui.set_scale(scale);
        self.record_mut().intensity = intensity;
        self.sync_material_intensity();
    }

    fn sync_material_intensity(&mut self) {
        if let Light::Area(light) = self {
            light.propagate_intensity_to_material();
        }
    }

    /// Returns an estimate of the light's total emitted power.
    pub fn power(&self) -> f32 {
        let luminance = self.intensity().length();
        match self {
            Light::Directional(_) => luminance,
            Light::Point(_) => luminance * 4.0 * PI,
            Light::Area(light) => luminance * light.surface_area() * PI,
        }
    }

    /// Moves the light; semantics are variant-specific.
    ///
    /// Directional lights log an error and ignore the call, point lights
    /// take the position and aim directly, area lights move their attached
    /// mesh instance.
    pub fn move_to(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        match self {
            Light::Directional(light) => light.move_to(position, target, up),
            Light::Point(light) => light.move_to(position, target, up),
            Light::Area(light) => light.move_to(position, target, up),
        }
    }

    /// Draws the light's editing rows into `editor`.
    ///
    /// Every change is routed through the corresponding setter, so derived
    /// state (normalized directions, cached cosines, material propagation)
    /// stays consistent with the packed record.
    pub fn render_ui(&mut self, editor: &mut dyn LightEditor) {
        match self {
            Light::Directional(light) => {
                let mut direction = light.world_direction();
                if editor.direction("Direction", &mut direction) {
                    light.set_world_direction(direction);
                }
            }
            Light::Point(light) => {
                let mut position = light.world_position();
                if editor.position("World Position", &mut position) {
                    light.set_world_position(position);
                }
                let mut direction = light.world_direction();
                if editor.direction("Direction", &mut direction) {
                    light.set_world_direction(direction);
                }
                let mut opening = light.opening_angle();
                if editor.angle("Opening Angle", &mut opening, 0.0, PI) {
                    light.set_opening_angle(opening);
                }
                let mut penumbra = light.penumbra_angle();
                if editor.angle("Penumbra Width", &mut penumbra, 0.0, PI) {
                    light.set_penumbra_angle(penumbra);
                }
            }
            Light::Area(_) => {}
        }

        let mut color = self.get_color_for_ui();
        if editor.rgb_color("Color", &mut color) {
            self.set_color_from_ui(color);
        }
        let mut scale = self.get_intensity_for_ui();
        if editor.scalar("Intensity", &mut scale, 0.0, f32::MAX) {
            self.set_intensity_from_ui(scale);
        }
    }

    /// Packs the light into `cb` at the record named `var_name`.
    ///
    /// The write anchors on the reflected offset of `"{var_name}.worldPos"`;
    /// a buffer that does not declare the record is tolerated with a warning
    /// and zero writes. The first packing of each variable name on a buffer
    /// validates the reflected layout against the host record; a
    /// disagreement is logged and trips a debug assertion, but release
    /// packing proceeds. Area lights refresh their residency data first, so
    /// device errors can surface here.
    pub fn set_into_constant_buffer(
        &mut self,
        device: &dyn GpuDevice,
        cb: &mut ConstantBuffer,
        var_name: &str,
    ) -> Result<(), LightError> {
        // Residency must be current even if the buffer turns out not to
        // declare the record.
        if let Light::Area(light) = self {
            light.prepare_gpu_data(device)?;
        }

        let anchor = format!("{var_name}.worldPos");
        let Some(offset) = cb.variable_offset(&anchor) else {
            log::warn!(
                "Light '{}': constant buffer variable '{}' not found, skipping packing",
                self.name(),
                var_name
            );
            return Ok(());
        };

        if cb.mark_layout_checked(var_name) {
            if let Err(err) = validate_layout(cb, var_name, offset, self.kind()) {
                log::error!("Light '{}': {}", self.name(), err);
                debug_assert!(false, "light record layout validation failed: {err}");
            }
        }

        let (blob, len) = match self {
            Light::Directional(light) => {
                (bytemuck::bytes_of(&light.data), LightData::PACKED_PREFIX)
            }
            Light::Point(light) => (bytemuck::bytes_of(&light.data), LightData::PACKED_PREFIX),
            Light::Area(light) => (
                bytemuck::bytes_of(&light.data),
                AreaLightData::PACKED_PREFIX,
            ),
        };
        assert!(
            offset + len <= cb.size(),
            "light record of {} bytes at offset {} exceeds constant buffer size {}",
            len,
            offset,
            cb.size()
        );
        cb.set_blob(&blob[..len], offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{LayerKind, Material, MaterialLayer};
    use crate::mesh::{Mesh, MeshInstance, SharedMeshInstance};
    use selas_core::math::Vec4;
    use selas_core::renderer::{BufferDescriptor, BufferUsage, ConstantBufferLayout};
    use selas_infra::HeadlessDevice;
    use std::mem::size_of;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Builds a reflected layout matching the host record at `base`.
    fn light_layout(var: &str, base: usize, area: bool) -> ConstantBufferLayout {
        let mut layout = ConstantBufferLayout::new(base + 512);
        for &(field, offset) in LightRecord::SHADER_FIELDS.iter() {
            layout = layout.with_field(format!("{var}.{field}"), base + offset);
        }
        if area {
            for &(field, offset) in AreaLightRecord::SHADER_FIELDS.iter() {
                layout = layout.with_field(format!("{var}.{field}"), base + offset);
            }
        }
        layout
    }

    /// Uploads a unit square (two triangles of area 0.5 each).
    fn quad_instance(device: &HeadlessDevice, material: Option<Material>) -> SharedMeshInstance {
        let positions = [
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::Y,
        ];
        let indices = [[0u32, 1, 2], [0, 2, 3]];
        let index_buffer = device
            .create_buffer_with_data(
                &BufferDescriptor::new(
                    "indices",
                    size_of::<[[u32; 3]; 2]>() as u64,
                    BufferUsage::INDEX,
                ),
                bytemuck::cast_slice(&indices),
            )
            .unwrap();
        let position_buffer = device
            .create_buffer_with_data(
                &BufferDescriptor::new(
                    "positions",
                    size_of::<[Vec3; 4]>() as u64,
                    BufferUsage::VERTEX,
                ),
                bytemuck::cast_slice(&positions),
            )
            .unwrap();
        let mesh = Mesh::new("quad", index_buffer, position_buffer, 2, 4);
        let mesh = match material {
            Some(material) => mesh.with_material(material),
            None => mesh,
        };
        MeshInstance::shared(std::rc::Rc::new(mesh))
    }

    #[test]
    fn variant_factories_allocate_names() {
        let mut registry = LightRegistry::new();
        let directional = Light::directional(&mut registry);
        let point = Light::point(&mut registry);
        let area = Light::area(&mut registry);

        assert_eq!(directional.name(), "dirLight0");
        assert_eq!(point.name(), "pointLight1");
        assert_eq!(area.name(), "areaLight2");
        assert_eq!(area.index(), 2);
        assert_eq!(area.kind(), LightKind::Area);
        assert_eq!(
            directional.record().kind,
            LightKind::Directional as u32
        );

        let mut named = point;
        named.set_name("key light");
        assert_eq!(named.name(), "key light");
    }

    #[test]
    fn ui_decomposition_normalizes_bright_intensities() {
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);

        light.set_intensity(Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(light.get_color_for_ui(), Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(light.get_intensity_for_ui(), 4.0);

        // A dim intensity decomposes as itself with unit scale.
        light.set_intensity(Vec3::new(0.25, 0.5, 1.0));
        assert_eq!(light.get_color_for_ui(), Vec3::new(0.25, 0.5, 1.0));
        assert_eq!(light.get_intensity_for_ui(), 1.0);
    }

    #[test]
    fn ui_setters_repack_exactly() {
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);

        light.set_color_from_ui(Vec3::new(0.25, 0.5, 0.75));
        light.set_intensity_from_ui(8.0);
        assert_eq!(light.intensity(), Vec3::new(2.0, 4.0, 6.0));

        // The cache stayed clean, so the reads hand back the set values.
        assert_eq!(light.get_color_for_ui(), Vec3::new(0.25, 0.5, 0.75));
        assert_eq!(light.get_intensity_for_ui(), 8.0);
    }

    #[test]
    fn direct_intensity_update_refreshes_the_ui_cache() {
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);
        // Prime the cache clean, then write around it.
        light.get_color_for_ui();

        light.set_intensity(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(light.get_color_for_ui(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.get_intensity_for_ui(), 10.0);
    }

    #[test]
    fn area_ui_intensity_reaches_emissive_layers() {
        init_logs();
        let device = HeadlessDevice::new();
        let material = Material::new("glow")
            .with_layer(MaterialLayer::new(
                LayerKind::Diffuse,
                Vec4::new(0.3, 0.3, 0.3, 1.0),
            ))
            .with_layer(MaterialLayer::emissive(Vec3::splat(4.0)));
        let instance = quad_instance(&device, Some(material));

        let mut registry = LightRegistry::new();
        let mut area = AreaLight::new(&mut registry);
        area.set_mesh_data(&device, &instance).unwrap();
        let mut light = Light::Area(area);

        light.set_color_from_ui(Vec3::new(1.0, 0.5, 0.25));
        light.set_intensity_from_ui(2.0);

        let Light::Area(area) = &light else {
            panic!("variant changed");
        };
        assert_eq!(area.data.record.base.intensity, Vec3::new(2.0, 1.0, 0.5));
        let layers = &area.data.material.layers;
        assert_eq!(layers[0].albedo, Vec4::new(0.3, 0.3, 0.3, 1.0));
        assert_eq!(layers[1].albedo, Vec4::new(2.0, 1.0, 0.5, 0.0));
    }

    #[test]
    fn power_scales_with_variant_geometry() {
        init_logs();
        let mut registry = LightRegistry::new();

        let mut directional = Light::directional(&mut registry);
        directional.set_intensity(Vec3::new(3.0, 0.0, 4.0));
        assert_eq!(directional.power(), 5.0);

        let mut point = Light::point(&mut registry);
        point.set_intensity(Vec3::new(3.0, 0.0, 4.0));
        assert_eq!(point.power(), 5.0 * 4.0 * PI);

        let device = HeadlessDevice::new();
        let instance = quad_instance(&device, None);
        let mut area = AreaLight::new(&mut registry);
        area.set_mesh_data(&device, &instance).unwrap();
        let mut light = Light::Area(area);
        light.set_intensity(Vec3::new(3.0, 0.0, 4.0));
        // Unit square, total surface area 1.
        assert_eq!(light.power(), 5.0 * 1.0 * PI);
    }

    /// Records row labels and plays back scripted edits.
    #[derive(Default)]
    struct ScriptedEditor {
        rows: Vec<String>,
        color: Option<Vec3>,
        intensity: Option<f32>,
        opening: Option<f32>,
    }

    impl LightEditor for ScriptedEditor {
        fn direction(&mut self, label: &str, _value: &mut Vec3) -> bool {
            self.rows.push(label.to_string());
            false
        }

        fn position(&mut self, label: &str, _value: &mut Vec3) -> bool {
            self.rows.push(label.to_string());
            false
        }

        fn angle(&mut self, label: &str, value: &mut f32, _min: f32, _max: f32) -> bool {
            self.rows.push(label.to_string());
            if label == "Opening Angle" {
                if let Some(opening) = self.opening {
                    *value = opening;
                    return true;
                }
            }
            false
        }

        fn scalar(&mut self, label: &str, value: &mut f32, _min: f32, _max: f32) -> bool {
            self.rows.push(label.to_string());
            if let Some(intensity) = self.intensity {
                *value = intensity;
                return true;
            }
            false
        }

        fn rgb_color(&mut self, label: &str, value: &mut Vec3) -> bool {
            self.rows.push(label.to_string());
            if let Some(color) = self.color {
                *value = color;
                return true;
            }
            false
        }
    }

    #[test]
    fn ui_rows_per_variant() {
        let mut registry = LightRegistry::new();

        let mut editor = ScriptedEditor::default();
        Light::directional(&mut registry).render_ui(&mut editor);
        assert_eq!(editor.rows, ["Direction", "Color", "Intensity"]);

        let mut editor = ScriptedEditor::default();
        Light::point(&mut registry).render_ui(&mut editor);
        assert_eq!(
            editor.rows,
            [
                "World Position",
                "Direction",
                "Opening Angle",
                "Penumbra Width",
                "Color",
                "Intensity"
            ]
        );

        let mut editor = ScriptedEditor::default();
        Light::area(&mut registry).render_ui(&mut editor);
        assert_eq!(editor.rows, ["Color", "Intensity"]);
    }

    #[test]
    fn ui_edits_route_through_setters() {
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);
        let mut editor = ScriptedEditor {
            color: Some(Vec3::new(0.5, 0.5, 1.0)),
            intensity: Some(4.0),
            opening: Some(10.0),
            ..ScriptedEditor::default()
        };

        light.render_ui(&mut editor);

        assert_eq!(light.intensity(), Vec3::new(2.0, 2.0, 4.0));
        let Light::Point(point) = &light else {
            panic!("variant changed");
        };
        // The oversized slider value went through the clamping setter.
        assert_eq!(point.opening_angle(), PI);
        assert_eq!(point.data.record.cos_opening_angle, PI.cos());
    }

    #[test]
    fn point_packs_prefix_at_anchor() {
        init_logs();
        let device = HeadlessDevice::new();
        let mut cb = ConstantBuffer::from_layout(light_layout("gLight", 64, false));
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);
        light.set_intensity(Vec3::new(2.0, 3.0, 4.0));

        light
            .set_into_constant_buffer(&device, &mut cb, "gLight")
            .unwrap();

        let Light::Point(point) = &light else {
            panic!("variant changed");
        };
        let expected = &bytemuck::bytes_of(&point.data)[..LightData::PACKED_PREFIX];
        assert_eq!(&cb.bytes()[64..64 + LightData::PACKED_PREFIX], expected);
        // The intensity row sits at its reflected offset.
        assert_eq!(
            &cb.bytes()[64 + 32..64 + 44],
            bytemuck::bytes_of(&Vec3::new(2.0, 3.0, 4.0))
        );
        // Nothing outside the anchored prefix is touched.
        assert!(cb.bytes()[..64].iter().all(|&b| b == 0));
        assert!(cb.bytes()[64 + LightData::PACKED_PREFIX..]
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn area_packs_residency_table_without_material() {
        init_logs();
        let device = HeadlessDevice::new();
        let material = Material::new("glow").with_layer(MaterialLayer::emissive(Vec3::splat(5.0)));
        let instance = quad_instance(&device, Some(material));
        let mut registry = LightRegistry::new();
        let mut area = AreaLight::new(&mut registry);
        area.set_mesh_data(&device, &instance).unwrap();
        let mut light = Light::Area(area);

        let mut cb = ConstantBuffer::from_layout(light_layout("gAreaLight", 0, true));
        light
            .set_into_constant_buffer(&device, &mut cb, "gAreaLight")
            .unwrap();

        let Light::Area(area) = &light else {
            panic!("variant changed");
        };
        // Packing prepared the GPU data: residency addresses and the triplet
        // count are in the record and in the buffer.
        let record = area.data.record;
        assert!(record.index_buf.is_bound());
        assert!(record.mesh_cdf_buf.is_bound());
        assert_eq!(record.base.num_indices, 2);
        assert_eq!(
            &cb.bytes()[..AreaLightData::PACKED_PREFIX],
            bytemuck::bytes_of(&record)
        );
        // The embedded material block is nonzero on the host but excluded
        // from the write.
        assert!(area.data.material.layers[0].kind != 0);
        assert!(cb.bytes()[AreaLightData::PACKED_PREFIX..]
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn missing_variable_skips_packing() {
        init_logs();
        let device = HeadlessDevice::new();
        let mut cb = ConstantBuffer::from_layout(ConstantBufferLayout::new(256));
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);
        light.set_intensity(Vec3::splat(9.0));

        light
            .set_into_constant_buffer(&device, &mut cb, "gLight")
            .unwrap();
        assert!(cb.bytes().iter().all(|&b| b == 0));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "layout validation failed")]
    fn shifted_layout_trips_the_debug_assertion() {
        init_logs();
        let device = HeadlessDevice::new();
        let layout = light_layout("gLight", 0, false).with_field("gLight.transMat", 96);
        let mut cb = ConstantBuffer::from_layout(layout);
        let mut registry = LightRegistry::new();
        let mut light = Light::point(&mut registry);

        let _ = light.set_into_constant_buffer(&device, &mut cb, "gLight");
    }
}
