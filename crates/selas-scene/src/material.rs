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

//! Layered surface materials and their packed GPU form.
//!
//! A [`Material`] is an ordered stack of typed layers. The shading model
//! consumes it as a fixed-capacity [`MaterialData`] block, which is also
//! embedded at the tail of every packed light record. Layers tagged
//! [`LayerKind::Emissive`] are what the area-light factory scans for.

use selas_core::math::{Vec3, Vec4};

/// Number of layer slots in the packed material block.
pub const MAX_MATERIAL_LAYERS: usize = 4;

/// The role a material layer plays during shading.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerKind {
    /// An unused layer slot.
    #[default]
    None = 0,
    /// Diffuse reflectance.
    Diffuse = 1,
    /// Specular reflectance.
    Specular = 2,
    /// Self-emitted radiance; the albedo is emitted light, not reflectance.
    Emissive = 3,
}

/// One authored material layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialLayer {
    /// The role of this layer.
    pub kind: LayerKind,
    /// Layer color. For emissive layers the RGB is emitted radiance and the
    /// alpha channel is unused (kept at zero by the light subsystem).
    pub albedo: Vec4,
}

impl MaterialLayer {
    /// Creates a layer with the given role and color.
    pub fn new(kind: LayerKind, albedo: Vec4) -> Self {
        Self { kind, albedo }
    }

    /// Creates an emissive layer from an RGB radiance, alpha zero.
    pub fn emissive(radiance: Vec3) -> Self {
        Self {
            kind: LayerKind::Emissive,
            albedo: Vec4::from_vec3(radiance, 0.0),
        }
    }
}

/// An authored surface description: a named, ordered stack of layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Display name used in logs and tooling.
    pub name: String,
    layers: Vec<MaterialLayer>,
}

impl Material {
    /// Creates an empty material with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    /// Appends a layer and returns the material for chaining.
    #[must_use]
    pub fn with_layer(mut self, layer: MaterialLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Appends a layer.
    pub fn push_layer(&mut self, layer: MaterialLayer) {
        self.layers.push(layer);
    }

    /// Returns the layer stack in authoring order.
    pub fn layers(&self) -> &[MaterialLayer] {
        &self.layers
    }

    /// Returns `true` if any layer is tagged [`LayerKind::Emissive`].
    pub fn is_emissive(&self) -> bool {
        self.layers.iter().any(|l| l.kind == LayerKind::Emissive)
    }

    /// Returns the first emissive layer, if any.
    pub fn first_emissive(&self) -> Option<&MaterialLayer> {
        self.layers.iter().find(|l| l.kind == LayerKind::Emissive)
    }

    /// Packs the layer stack into the fixed-capacity GPU block.
    ///
    /// Only the first [`MAX_MATERIAL_LAYERS`] layers are packed; unused slots
    /// stay [`LayerKind::None`].
    pub fn to_packed(&self) -> MaterialData {
        let mut data = MaterialData::default();
        for (slot, layer) in data.layers.iter_mut().zip(&self.layers) {
            slot.kind = layer.kind as u32;
            slot.albedo = layer.albedo;
        }
        data
    }
}

/// One material layer, formatted for GPU consumption.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialLayerData {
    /// Layer role, [`LayerKind`] as `u32`.
    pub kind: u32,
    /// Padding for 16-byte alignment.
    pub _pad: [u32; 3],
    /// Layer color (rgb) and spare channel (a).
    pub albedo: Vec4,
}

/// The packed material block embedded at the tail of light records.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialData {
    /// Fixed-capacity layer table; unused slots keep kind zero.
    pub layers: [MaterialLayerData; MAX_MATERIAL_LAYERS],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn packed_layout_matches_shader_rows() {
        assert_eq!(size_of::<MaterialLayerData>(), 32);
        assert_eq!(offset_of!(MaterialLayerData, albedo), 16);
        assert_eq!(size_of::<MaterialData>(), 32 * MAX_MATERIAL_LAYERS);
    }

    #[test]
    fn to_packed_maps_layers_in_order() {
        let material = Material::new("lamp")
            .with_layer(MaterialLayer::new(
                LayerKind::Diffuse,
                Vec4::new(0.5, 0.5, 0.5, 1.0),
            ))
            .with_layer(MaterialLayer::emissive(Vec3::new(2.0, 1.0, 0.5)));

        let packed = material.to_packed();
        assert_eq!(packed.layers[0].kind, LayerKind::Diffuse as u32);
        assert_eq!(packed.layers[1].kind, LayerKind::Emissive as u32);
        assert_eq!(packed.layers[1].albedo, Vec4::new(2.0, 1.0, 0.5, 0.0));
        assert_eq!(packed.layers[2].kind, LayerKind::None as u32);
        assert_eq!(packed.layers[3].kind, LayerKind::None as u32);
    }

    #[test]
    fn to_packed_truncates_past_capacity() {
        let mut material = Material::new("overstacked");
        for i in 0..6 {
            material.push_layer(MaterialLayer::new(
                LayerKind::Diffuse,
                Vec4::new(i as f32, 0.0, 0.0, 1.0),
            ));
        }
        let packed = material.to_packed();
        assert_eq!(packed.layers[3].albedo.x, 3.0);
        // Layers four and five do not fit and are dropped.
        assert_eq!(packed.layers.len(), MAX_MATERIAL_LAYERS);
    }

    #[test]
    fn emissive_queries() {
        let plain = Material::new("matte").with_layer(MaterialLayer::new(
            LayerKind::Diffuse,
            Vec4::new(0.8, 0.8, 0.8, 1.0),
        ));
        assert!(!plain.is_emissive());
        assert!(plain.first_emissive().is_none());

        let lit = plain
            .clone()
            .with_layer(MaterialLayer::emissive(Vec3::new(1.0, 0.0, 0.0)))
            .with_layer(MaterialLayer::emissive(Vec3::new(0.0, 1.0, 0.0)));
        assert!(lit.is_emissive());
        // First emissive layer wins for queries.
        let first = lit.first_emissive().unwrap();
        assert_eq!(first.albedo, Vec4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn zeroed_block_is_all_none() {
        let data = MaterialData::default();
        for layer in &data.layers {
            assert_eq!(layer.kind, LayerKind::None as u32);
            assert_eq!(layer.albedo, Vec4::ZERO);
        }
    }
}
