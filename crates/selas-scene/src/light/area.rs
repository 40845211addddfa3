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

//! The mesh-derived area light variant and its scene factories.
//!
//! An area light borrows its shape from an attached mesh instance. Attaching
//! runs a derivation pass over the geometry: per-triangle surface areas fold
//! into a normalized sampling CDF, the first triangle supplies the tangent
//! frame and facing normal, and the vertex bounds place the light. The CDF is
//! uploaded to a GPU buffer owned by the light; [`AreaLight::prepare_gpu_data`]
//! then makes every geometry buffer resident and records the addresses in the
//! packed record for bindless access.

use crate::light::data::{AreaLightData, GpuBufferRef};
use crate::light::error::LightError;
use crate::light::registry::LightRegistry;
use crate::light::{Light, LightCore, SharedLight};
use crate::material::{LayerKind, Material};
use crate::mesh::{Model, SharedMeshInstance};
use selas_core::math::{Aabb, Vec3, Vec4};
use selas_core::renderer::{BufferDescriptor, BufferId, BufferUsage, GpuDevice};
use std::cell::RefCell;
use std::mem::size_of;
use std::rc::Rc;
use uuid::Uuid;

/// The exact instance state a derivation ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AttachmentStamp {
    instance: Uuid,
    generation: u64,
}

/// A light emitted by mesh geometry.
///
/// Holds no independent placement state: `world_pos`, `world_dir`, and the
/// bounds in the packed record stay whatever the last derivation wrote until
/// the geometry is re-derived. Only two-triangle quads are accepted as source
/// geometry; anything else leaves the previously derived state in place.
#[derive(Debug)]
pub struct AreaLight {
    pub(crate) core: LightCore,
    pub(crate) data: AreaLightData,
    instance: Option<SharedMeshInstance>,
    attachment: Option<AttachmentStamp>,
    index_buffer: Option<BufferId>,
    position_buffer: Option<BufferId>,
    tex_coord_buffer: Option<BufferId>,
    cdf_buffer: Option<BufferId>,
    mesh_cdf: Vec<f32>,
    surface_area: f32,
    tangent: Vec3,
    bitangent: Vec3,
}

impl AreaLight {
    /// Creates a detached area light named `"areaLight{index}"`.
    pub fn new(registry: &mut LightRegistry) -> Self {
        Self {
            core: LightCore::new(registry, "areaLight"),
            data: AreaLightData::default(),
            instance: None,
            attachment: None,
            index_buffer: None,
            position_buffer: None,
            tex_coord_buffer: None,
            cdf_buffer: None,
            mesh_cdf: Vec::new(),
            surface_area: 0.0,
            tangent: Vec3::ZERO,
            bitangent: Vec3::ZERO,
        }
    }

    /// Returns the attached mesh instance, if any.
    pub fn mesh_instance(&self) -> Option<&SharedMeshInstance> {
        self.instance.as_ref()
    }

    /// Returns the sampling CDF: a leading zero, then one normalized prefix
    /// sum per triangle, ending at exactly `1.0`.
    pub fn mesh_cdf(&self) -> &[f32] {
        &self.mesh_cdf
    }

    /// Returns the total surface area of the attached geometry.
    pub fn surface_area(&self) -> f32 {
        self.surface_area
    }

    /// Attaches a mesh instance and derives the light from its geometry.
    ///
    /// A repeated call with the same instance at the same generation is a
    /// no-op. Otherwise the geometry buffers are captured and the derivation
    /// runs; an unsupported topology has already been logged by then and does
    /// not fail the attach, while device errors are returned. The mesh
    /// material is packed into the embedded block and its first emissive
    /// layer, if any, becomes the light's intensity.
    pub fn set_mesh_data(
        &mut self,
        device: &dyn GpuDevice,
        instance: &SharedMeshInstance,
    ) -> Result<(), LightError> {
        let stamp = {
            let borrowed = instance.borrow();
            AttachmentStamp {
                instance: borrowed.id(),
                generation: borrowed.generation(),
            }
        };
        if self.attachment == Some(stamp) {
            return Ok(());
        }

        {
            let borrowed = instance.borrow();
            let mesh = borrowed.mesh();
            self.index_buffer = Some(mesh.index_buffer);
            self.position_buffer = Some(mesh.position_buffer);
            self.tex_coord_buffer = mesh.tex_coord_buffer;
        }
        // Addresses recorded for a previous attachment must not leak into
        // this one.
        self.clear_residency_slots();
        self.instance = Some(Rc::clone(instance));
        self.attachment = Some(stamp);

        match self.compute_surface_area(device) {
            Ok(()) | Err(LightError::UnsupportedTopology { .. }) => {}
            Err(err) => return Err(err),
        }

        let borrowed = instance.borrow();
        if let Some(material) = &borrowed.mesh().material {
            self.data.material = material.to_packed();
            if let Some(layer) = material.first_emissive() {
                self.data.record.base.intensity = layer.albedo.truncate();
                self.core.ui.mark_dirty();
            }
        }
        Ok(())
    }

    /// Derives surface area, sampling CDF, tangent frame, and placement from
    /// the attached geometry; without an attachment this is a no-op.
    ///
    /// Reads the index and position buffers back from the device. Source
    /// geometry must be a two-triangle quad over four vertices; any other
    /// topology warns and returns [`LightError::UnsupportedTopology`] with
    /// all derived state untouched. On success the CDF is uploaded to a
    /// fresh GPU buffer, replacing the previous one.
    pub fn compute_surface_area(&mut self, device: &dyn GpuDevice) -> Result<(), LightError> {
        let (Some(index_buffer), Some(position_buffer)) = (self.index_buffer, self.position_buffer)
        else {
            return Ok(());
        };
        let (primitive_count, vertex_count) = match &self.instance {
            Some(instance) => {
                let instance = instance.borrow();
                let mesh = instance.mesh();
                (mesh.primitive_count, mesh.vertex_count)
            }
            None => return Ok(()),
        };
        if primitive_count != 2 || vertex_count != 4 {
            log::warn!(
                "AreaLight '{}': only two-triangle quads are supported, got {} triangles over {} vertices",
                self.core.name(),
                primitive_count,
                vertex_count
            );
            return Err(LightError::UnsupportedTopology {
                triangles: primitive_count,
                vertices: vertex_count,
            });
        }

        // Readback extents come from the device, not the mesh metadata.
        let index_bytes = device.buffer_size(index_buffer)? as usize;
        let mut indices = vec![[0u32; 3]; index_bytes / size_of::<[u32; 3]>()];
        device.read_buffer(index_buffer, 0, bytemuck::cast_slice_mut(&mut indices))?;

        let position_bytes = device.buffer_size(position_buffer)? as usize;
        let mut positions = vec![Vec3::ZERO; position_bytes / size_of::<Vec3>()];
        device.read_buffer(position_buffer, 0, bytemuck::cast_slice_mut(&mut positions))?;

        // Prefix sums of triangle areas, with a leading zero sentinel.
        self.mesh_cdf.clear();
        self.mesh_cdf.push(0.0);
        let mut total_area = 0.0f32;
        for triangle in &indices {
            let p0 = positions[triangle[0] as usize];
            let p1 = positions[triangle[1] as usize];
            let p2 = positions[triangle[2] as usize];
            total_area += 0.5 * (p1 - p0).cross(p2 - p0).length();
            self.mesh_cdf.push(total_area);
        }
        self.surface_area = total_area;

        if total_area > 0.0 {
            let scale = 1.0 / total_area;
            for entry in self.mesh_cdf.iter_mut().skip(1) {
                *entry *= scale;
            }
        }
        // The tail is pinned to exactly one so sampling never lands outside
        // [0, 1], even when the normalized sum drifts.
        if let Some(last) = self.mesh_cdf.last_mut() {
            *last = 1.0;
        }

        // The first triangle supplies the surface frame and facing normal.
        // Both tangents keep their magnitudes; they carry edge lengths.
        let [i0, i1, i2] = indices[0];
        let p0 = positions[i0 as usize];
        let p1 = positions[i1 as usize];
        let p2 = positions[i2 as usize];
        self.tangent = p0 - p1;
        self.bitangent = p2 - p1;

        let record = &mut self.data.record.base;
        record.world_dir = (p1 - p0).cross(p2 - p0).normalize();
        if let Some(bounds) = Aabb::from_points(&positions) {
            record.aabb_min = bounds.min;
            record.aabb_max = bounds.max;
            record.world_pos = bounds.center();
        }

        self.upload_mesh_cdf(device)
    }

    /// Makes the captured geometry buffers resident and refreshes the packed
    /// record.
    ///
    /// Each residency slot is filled only if its address is still zero, so
    /// repeated calls are cheap. The triplet count, cached derivation
    /// results, the instance's current transform, and the mesh material are
    /// mirrored on every call.
    pub fn prepare_gpu_data(&mut self, device: &dyn GpuDevice) -> Result<(), LightError> {
        bind_slot(device, self.index_buffer, &mut self.data.record.index_buf)?;
        bind_slot(
            device,
            self.position_buffer,
            &mut self.data.record.vertex_buf,
        )?;
        bind_slot(
            device,
            self.tex_coord_buffer,
            &mut self.data.record.tex_coord_buf,
        )?;
        bind_slot(device, self.cdf_buffer, &mut self.data.record.mesh_cdf_buf)?;

        if let Some(buffer) = self.index_buffer {
            let bytes = device.buffer_size(buffer)? as usize;
            self.data.record.base.num_indices = (bytes / size_of::<[u32; 3]>()) as u32;
        }

        self.data.record.base.surface_area = self.surface_area;
        self.data.record.base.tangent = self.tangent;
        self.data.record.base.bitangent = self.bitangent;

        if let Some(instance) = self.instance.clone() {
            let instance = instance.borrow();
            self.data.record.base.trans_mat = instance.transform();
            if let Some(material) = &instance.mesh().material {
                self.data.material = material.to_packed();
            }
        }
        Ok(())
    }

    /// Evicts every captured geometry buffer and zeroes the residency slots.
    ///
    /// Eviction failures are logged per buffer and do not stop the sweep. A
    /// later [`Self::prepare_gpu_data`] re-acquires residency.
    pub fn unload_gpu_data(&mut self, device: &dyn GpuDevice) {
        let buffers = [
            self.index_buffer,
            self.position_buffer,
            self.tex_coord_buffer,
            self.cdf_buffer,
        ];
        for buffer in buffers.into_iter().flatten() {
            if let Err(err) = device.evict(buffer) {
                log::warn!(
                    "AreaLight '{}': failed to evict buffer {:?}: {}",
                    self.core.name(),
                    buffer,
                    err
                );
            }
        }
        self.clear_residency_slots();
    }

    /// Moves the attached mesh instance; the light itself holds no placement.
    ///
    /// The derived placement in the record is refreshed by the next
    /// derivation, not by this call. Without an attachment this warns and
    /// does nothing.
    pub fn move_to(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        match &self.instance {
            Some(instance) => instance.borrow_mut().move_to(position, target, up),
            None => log::warn!(
                "AreaLight '{}': move ignored, no mesh instance attached",
                self.core.name()
            ),
        }
    }

    /// Writes the packed intensity into every emissive layer of the embedded
    /// material block, alpha fixed at zero.
    pub(crate) fn propagate_intensity_to_material(&mut self) {
        let albedo = Vec4::from_vec3(self.data.record.base.intensity, 0.0);
        for layer in &mut self.data.material.layers {
            if layer.kind == LayerKind::Emissive as u32 {
                layer.albedo = albedo;
            }
        }
    }

    fn clear_residency_slots(&mut self) {
        let record = &mut self.data.record;
        record.index_buf = GpuBufferRef::default();
        record.vertex_buf = GpuBufferRef::default();
        record.tex_coord_buf = GpuBufferRef::default();
        record.mesh_cdf_buf = GpuBufferRef::default();
    }

    fn upload_mesh_cdf(&mut self, device: &dyn GpuDevice) -> Result<(), LightError> {
        if let Some(old) = self.cdf_buffer.take() {
            if let Err(err) = device.destroy_buffer(old) {
                log::warn!(
                    "AreaLight '{}': failed to destroy previous CDF buffer: {}",
                    self.core.name(),
                    err
                );
            }
        }
        let descriptor = BufferDescriptor::new(
            format!("{}_mesh_cdf", self.core.name()),
            (self.mesh_cdf.len() * size_of::<f32>()) as u64,
            BufferUsage::STORAGE,
        );
        let buffer =
            device.create_buffer_with_data(&descriptor, bytemuck::cast_slice(&self.mesh_cdf))?;
        self.cdf_buffer = Some(buffer);
        // The slot still points at the old buffer; the next prepare rebinds.
        self.data.record.mesh_cdf_buf = GpuBufferRef::default();
        Ok(())
    }
}

fn bind_slot(
    device: &dyn GpuDevice,
    buffer: Option<BufferId>,
    slot: &mut GpuBufferRef,
) -> Result<(), LightError> {
    if let Some(id) = buffer {
        if !slot.is_bound() {
            slot.address = device.make_resident(id)?.0;
        }
    }
    Ok(())
}

/// Builds an area light over `instance` and runs the geometry derivation.
///
/// An unsupported topology still yields a light (the warning is already
/// logged and the derived state stays at its defaults); device failures are
/// returned.
pub fn create_area_light(
    registry: &mut LightRegistry,
    device: &dyn GpuDevice,
    instance: &SharedMeshInstance,
) -> Result<SharedLight, LightError> {
    let mut light = AreaLight::new(registry);
    light.set_mesh_data(device, instance)?;
    Ok(Rc::new(RefCell::new(Light::Area(light))))
}

/// Scans a model and creates one area light per emissive mesh instance.
///
/// A mesh qualifies when its material carries at least one emissive layer.
/// Every placed instance of a qualifying mesh yields an independent light
/// with its own derived buffers, even for identical geometry.
pub fn create_area_lights_for_model(
    registry: &mut LightRegistry,
    device: &dyn GpuDevice,
    model: &Model,
) -> Result<Vec<SharedLight>, LightError> {
    let mut lights = Vec::new();
    for mesh_id in 0..model.mesh_count() {
        if !model
            .mesh(mesh_id)
            .material
            .as_ref()
            .is_some_and(Material::is_emissive)
        {
            continue;
        }
        for instance in model.instances(mesh_id) {
            lights.push(create_area_light(registry, device, instance)?);
        }
    }
    Ok(lights)
}
