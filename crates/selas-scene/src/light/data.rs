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

//! Packed light records, formatted for GPU consumption.
//!
//! Every variant shares the [`LightRecord`] prefix; area lights extend it
//! with a residency table ([`AreaLightRecord`]). Both full records end with
//! the embedded [`MaterialData`] block, which must stay the strictly
//! trailing field: light packing uploads only the non-material prefix
//! (`PACKED_PREFIX` bytes), the material system owns the tail.
//!
//! The shader declares the same records field for field under camelCase
//! names. [`validate_layout`] compares the reflected offsets against the
//! host tables the first time a variable is packed into a buffer.

use crate::light::error::LightError;
use crate::material::MaterialData;
use selas_core::math::{Aabb, Mat4, Vec3, PI};
use selas_core::renderer::ConstantBuffer;
use std::mem::{offset_of, size_of};

/// Discriminant of a light variant, stored in the packed record.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Sun-style light: parallel rays along a direction, no falloff.
    Directional = 0,
    /// Point light, optionally restricted to a spot cone.
    Point = 1,
    /// Light emitted by mesh geometry.
    Area = 2,
}

/// The non-material prefix shared by every packed light record.
///
/// Fields are laid out in 16-byte rows: each `Vec3` shares its row with the
/// scalar that follows it. The shader-side declaration must match this
/// layout field for field; [`validate_layout`] checks the reflected offsets
/// against [`Self::SHADER_FIELDS`] when a light is first packed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRecord {
    /// World-space position (xyz); shares its row with the variant tag.
    pub world_pos: Vec3,
    /// The light variant, [`LightKind`] as `u32`.
    pub kind: u32,
    /// World-space direction (xyz); shares its row with the opening angle.
    pub world_dir: Vec3,
    /// Spot opening half-angle in radians.
    pub opening_angle: f32,
    /// Emitted radiance in linear RGB.
    pub intensity: Vec3,
    /// Cosine of the opening half-angle, cached for fast cone tests.
    pub cos_opening_angle: f32,
    /// Minimum corner of the world-space bounds.
    pub aabb_min: Vec3,
    /// Penumbra angle in radians for soft cone edges.
    pub penumbra_angle: f32,
    /// Maximum corner of the world-space bounds.
    pub aabb_max: Vec3,
    /// Total surface area of the source geometry.
    pub surface_area: f32,
    /// First tangent of the surface frame (unnormalized).
    pub tangent: Vec3,
    /// Number of `uint3` index triplets in the source index buffer.
    pub num_indices: u32,
    /// Second tangent of the surface frame (unnormalized).
    pub bitangent: Vec3,
    /// Padding for 16-byte alignment.
    pub _pad0: f32,
    /// Source-to-world transform of the light geometry.
    pub trans_mat: Mat4,
}

impl LightRecord {
    /// Shader-side field names and their host byte offsets.
    ///
    /// [`validate_layout`] walks this table; the area variant appends
    /// [`AreaLightRecord::SHADER_FIELDS`].
    pub const SHADER_FIELDS: [(&'static str, usize); 7] = [
        ("worldPos", offset_of!(LightRecord, world_pos)),
        ("worldDir", offset_of!(LightRecord, world_dir)),
        ("intensity", offset_of!(LightRecord, intensity)),
        ("aabbMin", offset_of!(LightRecord, aabb_min)),
        ("aabbMax", offset_of!(LightRecord, aabb_max)),
        ("transMat", offset_of!(LightRecord, trans_mat)),
        ("numIndices", offset_of!(LightRecord, num_indices)),
    ];
}

impl Default for LightRecord {
    fn default() -> Self {
        Self {
            world_pos: Vec3::ZERO,
            kind: LightKind::Point as u32,
            world_dir: Vec3::new(0.0, -1.0, 0.0),
            opening_angle: PI,
            intensity: Vec3::ONE,
            cos_opening_angle: PI.cos(),
            aabb_min: Aabb::INVALID.min,
            penumbra_angle: 0.0,
            aabb_max: Aabb::INVALID.max,
            surface_area: 0.0,
            tangent: Vec3::ZERO,
            num_indices: 0,
            bitangent: Vec3::ZERO,
            _pad0: 0.0,
            trans_mat: Mat4::IDENTITY,
        }
    }
}

/// A bindless buffer slot in a packed record.
///
/// Holds the raw GPU virtual address of a resident buffer; zero means the
/// buffer is not resident. Residency passes fill the slot, eviction zeroes
/// it again.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuBufferRef {
    /// GPU virtual address of the resident buffer, zero when unbound.
    pub address: u64,
    /// Padding for 16-byte alignment.
    pub _pad: [u32; 2],
}

impl GpuBufferRef {
    /// Returns `true` when a resident buffer address has been recorded.
    pub fn is_bound(&self) -> bool {
        self.address != 0
    }
}

/// The packed record for an area light: the shared prefix plus the
/// residency table of its geometry buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AreaLightRecord {
    /// The shared light prefix; `base.kind` is [`LightKind::Area`].
    pub base: LightRecord,
    /// Residency slot for the index buffer.
    pub index_buf: GpuBufferRef,
    /// Residency slot for the vertex position buffer.
    pub vertex_buf: GpuBufferRef,
    /// Residency slot for the texture coordinate buffer, zero when the mesh
    /// has none.
    pub tex_coord_buf: GpuBufferRef,
    /// Residency slot for the sampling CDF buffer.
    pub mesh_cdf_buf: GpuBufferRef,
}

impl AreaLightRecord {
    /// Residency-table rows appended to [`LightRecord::SHADER_FIELDS`] when
    /// validating the area layout.
    pub const SHADER_FIELDS: [(&'static str, usize); 4] = [
        ("indexBuf", offset_of!(AreaLightRecord, index_buf)),
        ("vertexBuf", offset_of!(AreaLightRecord, vertex_buf)),
        ("texCoordBuf", offset_of!(AreaLightRecord, tex_coord_buf)),
        ("meshCDFBuf", offset_of!(AreaLightRecord, mesh_cdf_buf)),
    ];
}

impl Default for AreaLightRecord {
    fn default() -> Self {
        Self {
            base: LightRecord {
                kind: LightKind::Area as u32,
                ..LightRecord::default()
            },
            index_buf: GpuBufferRef::default(),
            vertex_buf: GpuBufferRef::default(),
            tex_coord_buf: GpuBufferRef::default(),
            mesh_cdf_buf: GpuBufferRef::default(),
        }
    }
}

/// The full packed record for directional and point lights.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightData {
    /// The shared prefix every variant packs.
    pub record: LightRecord,
    /// The embedded surface material, strictly the last field.
    pub material: MaterialData,
}

impl LightData {
    /// Byte length of the non-material prefix written by light packing.
    pub const PACKED_PREFIX: usize = size_of::<LightData>() - size_of::<MaterialData>();
}

/// The full packed record for area lights.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AreaLightData {
    /// The area record with its residency table.
    pub record: AreaLightRecord,
    /// The embedded surface material, strictly the last field.
    pub material: MaterialData,
}

impl AreaLightData {
    /// Byte length of the non-material prefix written by light packing.
    pub const PACKED_PREFIX: usize = size_of::<AreaLightData>() - size_of::<MaterialData>();
}

// The material block must stay strictly trailing and the packed prefix must
// keep the constant-buffer row alignment; the shader records are declared
// against these exact sizes.
const _: () = {
    assert!(offset_of!(LightData, material) == LightData::PACKED_PREFIX);
    assert!(LightData::PACKED_PREFIX % 16 == 0);
    assert!(LightData::PACKED_PREFIX == 176);
    assert!(offset_of!(AreaLightData, material) == AreaLightData::PACKED_PREFIX);
    assert!(AreaLightData::PACKED_PREFIX % 16 == 0);
    assert!(AreaLightData::PACKED_PREFIX == 240);
};

/// Checks the reflected constant-buffer layout against the host record.
///
/// `base_offset` is the reflected offset of `"{var_name}.worldPos"`. Every
/// field in the variant's table must be declared at `base_offset` plus its
/// host offset; a missing field reports [`LightError::VariableNotFound`], a
/// disagreeing one [`LightError::LayoutMismatch`] with absolute offsets.
///
/// The packing path runs this once per variable name per buffer, gated by
/// [`ConstantBuffer::mark_layout_checked`].
pub fn validate_layout(
    cb: &ConstantBuffer,
    var_name: &str,
    base_offset: usize,
    kind: LightKind,
) -> Result<(), LightError> {
    let area_fields: &[(&'static str, usize)] = if kind == LightKind::Area {
        &AreaLightRecord::SHADER_FIELDS
    } else {
        &[]
    };

    for &(field, host_offset) in LightRecord::SHADER_FIELDS.iter().chain(area_fields.iter()) {
        let name = format!("{var_name}.{field}");
        let Some(reflected) = cb.variable_offset(&name) else {
            return Err(LightError::VariableNotFound { variable: name });
        };
        if reflected != base_offset + host_offset {
            return Err(LightError::LayoutMismatch {
                variable: var_name.to_string(),
                field,
                shader_offset: reflected,
                host_offset: base_offset + host_offset,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use selas_core::renderer::ConstantBufferLayout;

    /// Builds a reflected layout matching the host record at `base`.
    fn reflected_layout(var: &str, base: usize, area: bool) -> ConstantBufferLayout {
        let mut layout = ConstantBufferLayout::new(base + 1024);
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

    #[test]
    fn record_rows_are_16_byte_aligned() {
        assert_eq!(offset_of!(LightRecord, world_pos), 0);
        assert_eq!(offset_of!(LightRecord, kind), 12);
        assert_eq!(offset_of!(LightRecord, world_dir), 16);
        assert_eq!(offset_of!(LightRecord, opening_angle), 28);
        assert_eq!(offset_of!(LightRecord, intensity), 32);
        assert_eq!(offset_of!(LightRecord, cos_opening_angle), 44);
        assert_eq!(offset_of!(LightRecord, aabb_min), 48);
        assert_eq!(offset_of!(LightRecord, penumbra_angle), 60);
        assert_eq!(offset_of!(LightRecord, aabb_max), 64);
        assert_eq!(offset_of!(LightRecord, surface_area), 76);
        assert_eq!(offset_of!(LightRecord, tangent), 80);
        assert_eq!(offset_of!(LightRecord, num_indices), 92);
        assert_eq!(offset_of!(LightRecord, bitangent), 96);
        assert_eq!(offset_of!(LightRecord, trans_mat), 112);
        assert_eq!(size_of::<LightRecord>(), 176);
    }

    #[test]
    fn area_record_appends_residency_rows() {
        assert_eq!(offset_of!(AreaLightRecord, base), 0);
        assert_eq!(offset_of!(AreaLightRecord, index_buf), 176);
        assert_eq!(offset_of!(AreaLightRecord, vertex_buf), 192);
        assert_eq!(offset_of!(AreaLightRecord, tex_coord_buf), 208);
        assert_eq!(offset_of!(AreaLightRecord, mesh_cdf_buf), 224);
        assert_eq!(size_of::<AreaLightRecord>(), 240);
        assert_eq!(size_of::<GpuBufferRef>(), 16);
    }

    #[test]
    fn packed_prefix_excludes_the_material_tail() {
        assert_eq!(LightData::PACKED_PREFIX, 176);
        assert_eq!(AreaLightData::PACKED_PREFIX, 240);
        assert_eq!(offset_of!(LightData, material), LightData::PACKED_PREFIX);
        assert_eq!(
            offset_of!(AreaLightData, material),
            AreaLightData::PACKED_PREFIX
        );
    }

    #[test]
    fn record_defaults() {
        let record = LightRecord::default();
        assert_eq!(record.kind, LightKind::Point as u32);
        assert_eq!(record.world_dir, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(record.intensity, Vec3::ONE);
        assert_eq!(record.opening_angle, PI);
        assert_eq!(record.cos_opening_angle, PI.cos());
        // The bounds start at the invalid sentinel until geometry sets them.
        assert!(record.aabb_min.x.is_infinite() && record.aabb_min.x > 0.0);
        assert!(record.aabb_max.x.is_infinite() && record.aabb_max.x < 0.0);
        assert_eq!(record.trans_mat, Mat4::IDENTITY);

        let area = AreaLightRecord::default();
        assert_eq!(area.base.kind, LightKind::Area as u32);
        assert!(!area.index_buf.is_bound());
        assert!(!area.mesh_cdf_buf.is_bound());
    }

    #[test]
    fn validate_layout_accepts_matching_reflection() {
        let cb = ConstantBuffer::from_layout(reflected_layout("gLight", 64, false));
        assert!(validate_layout(&cb, "gLight", 64, LightKind::Point).is_ok());
        assert!(validate_layout(&cb, "gLight", 64, LightKind::Directional).is_ok());

        let cb = ConstantBuffer::from_layout(reflected_layout("gAreaLight", 0, true));
        assert!(validate_layout(&cb, "gAreaLight", 0, LightKind::Area).is_ok());
    }

    #[test]
    fn validate_layout_rejects_shifted_field() {
        let layout =
            reflected_layout("gLight", 0, false).with_field("gLight.transMat", 96);
        let cb = ConstantBuffer::from_layout(layout);

        let err = validate_layout(&cb, "gLight", 0, LightKind::Point).unwrap_err();
        match err {
            LightError::LayoutMismatch {
                field,
                shader_offset,
                host_offset,
                ..
            } => {
                assert_eq!(field, "transMat");
                assert_eq!(shader_offset, 96);
                assert_eq!(host_offset, 112);
            }
            other => panic!("expected LayoutMismatch, got {other:?}"),
        }
    }

    #[test]
    fn validate_layout_reports_missing_area_fields() {
        // A buffer reflecting only the base record cannot bind an area light.
        let cb = ConstantBuffer::from_layout(reflected_layout("gLight", 0, false));
        assert!(validate_layout(&cb, "gLight", 0, LightKind::Point).is_ok());

        let err = validate_layout(&cb, "gLight", 0, LightKind::Area).unwrap_err();
        match err {
            LightError::VariableNotFound { variable } => {
                assert_eq!(variable, "gLight.indexBuf");
            }
            other => panic!("expected VariableNotFound, got {other:?}"),
        }
    }
}
