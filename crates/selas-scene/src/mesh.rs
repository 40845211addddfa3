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

//! Mesh geometry sources and their placed instances.
//!
//! A [`Mesh`] references GPU buffers that hold its geometry; it does not own
//! the vertex data on the CPU side. A [`MeshInstance`] places a shared mesh
//! in the world and carries a stable [`Uuid`] identity plus a generation
//! counter bumped on every transform mutation. Systems that derive data from
//! an instance (area lights) compare the `(id, generation)` pair to decide
//! whether their cached derivation is still current.

use crate::material::Material;
use selas_core::math::{Mat4, Vec3};
use selas_core::renderer::BufferId;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Shared ownership handle for immutable mesh geometry.
pub type SharedMesh = Rc<Mesh>;

/// Shared, mutable handle for a placed mesh instance.
pub type SharedMeshInstance = Rc<RefCell<MeshInstance>>;

/// GPU-backed triangle geometry with an optional surface material.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Display name used in logs and tooling.
    pub name: String,
    /// Index buffer of `u32` triangle triplets.
    pub index_buffer: BufferId,
    /// Vertex position buffer of tightly packed `Vec3`s.
    pub position_buffer: BufferId,
    /// Optional texture coordinate buffer.
    pub tex_coord_buffer: Option<BufferId>,
    /// Number of triangles.
    pub primitive_count: u32,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Surface material, if the mesh has one.
    pub material: Option<Material>,
}

impl Mesh {
    /// Creates a mesh over the given geometry buffers, without texture
    /// coordinates or a material.
    pub fn new(
        name: impl Into<String>,
        index_buffer: BufferId,
        position_buffer: BufferId,
        primitive_count: u32,
        vertex_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            index_buffer,
            position_buffer,
            tex_coord_buffer: None,
            primitive_count,
            vertex_count,
            material: None,
        }
    }

    /// Attaches a texture coordinate buffer and returns the mesh for chaining.
    #[must_use]
    pub fn with_tex_coords(mut self, buffer: BufferId) -> Self {
        self.tex_coord_buffer = Some(buffer);
        self
    }

    /// Attaches a material and returns the mesh for chaining.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}

/// A placed copy of a mesh in the scene.
#[derive(Debug)]
pub struct MeshInstance {
    id: Uuid,
    mesh: SharedMesh,
    transform: Mat4,
    generation: u64,
}

impl MeshInstance {
    /// Creates an instance of `mesh` at the identity transform.
    pub fn new(mesh: SharedMesh) -> Self {
        Self {
            id: Uuid::new_v4(),
            mesh,
            transform: Mat4::IDENTITY,
            generation: 0,
        }
    }

    /// Creates an instance and wraps it in the shared handle.
    pub fn shared(mesh: SharedMesh) -> SharedMeshInstance {
        Rc::new(RefCell::new(Self::new(mesh)))
    }

    /// Returns the stable identity of this instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the instanced mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Returns the instance-to-world transform.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Returns the generation counter.
    ///
    /// The counter starts at zero and increases by one for every transform
    /// mutation; it never repeats within an instance's lifetime.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the instance-to-world transform.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.generation += 1;
    }

    /// Places the instance at `position`, aimed at `target`.
    ///
    /// A degenerate aim (target at the position, or the aim parallel to `up`)
    /// is logged and leaves the placement and generation unchanged.
    pub fn move_to(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        match Mat4::from_look_to(position, target - position, up) {
            Some(transform) => self.set_transform(transform),
            None => log::warn!(
                "MeshInstance {}: degenerate move to {:?} aimed at {:?} ignored",
                self.id,
                position,
                target
            ),
        }
    }
}

/// A named collection of meshes and their placed instances.
#[derive(Debug, Default)]
pub struct Model {
    /// Display name used in logs and tooling.
    pub name: String,
    meshes: Vec<SharedMesh>,
    instances: Vec<Vec<SharedMeshInstance>>,
}

impl Model {
    /// Creates an empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meshes: Vec::new(),
            instances: Vec::new(),
        }
    }

    /// Adds a mesh and returns its id within this model.
    pub fn add_mesh(&mut self, mesh: SharedMesh) -> usize {
        self.meshes.push(mesh);
        self.instances.push(Vec::new());
        self.meshes.len() - 1
    }

    /// Places a new instance of the mesh `mesh_id` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if `mesh_id` is out of range.
    pub fn add_instance(&mut self, mesh_id: usize, transform: Mat4) -> SharedMeshInstance {
        let instance = MeshInstance::shared(Rc::clone(&self.meshes[mesh_id]));
        instance.borrow_mut().set_transform(transform);
        self.instances[mesh_id].push(Rc::clone(&instance));
        instance
    }

    /// Returns the number of meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Returns the mesh with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `mesh_id` is out of range.
    pub fn mesh(&self, mesh_id: usize) -> &SharedMesh {
        &self.meshes[mesh_id]
    }

    /// Returns the placed instances of the mesh `mesh_id`.
    ///
    /// # Panics
    ///
    /// Panics if `mesh_id` is out of range.
    pub fn instances(&self, mesh_id: usize) -> &[SharedMeshInstance] {
        &self.instances[mesh_id]
    }

    /// Returns the number of placed instances of the mesh `mesh_id`.
    ///
    /// # Panics
    ///
    /// Panics if `mesh_id` is out of range.
    pub fn instance_count(&self, mesh_id: usize) -> usize {
        self.instances[mesh_id].len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mesh() -> SharedMesh {
        Rc::new(Mesh::new("quad", BufferId(1), BufferId(2), 2, 4))
    }

    #[test]
    fn mesh_builders() {
        let mesh = Mesh::new("quad", BufferId(1), BufferId(2), 2, 4)
            .with_tex_coords(BufferId(3))
            .with_material(Material::new("glow"));
        assert_eq!(mesh.tex_coord_buffer, Some(BufferId(3)));
        assert_eq!(mesh.material.as_ref().unwrap().name, "glow");
        assert_eq!(mesh.primitive_count, 2);
        assert_eq!(mesh.vertex_count, 4);
    }

    #[test]
    fn instances_get_distinct_ids() {
        let mesh = test_mesh();
        let a = MeshInstance::new(Rc::clone(&mesh));
        let b = MeshInstance::new(mesh);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn transform_mutations_bump_generation() {
        let mut instance = MeshInstance::new(test_mesh());
        assert_eq!(instance.generation(), 0);

        instance.set_transform(Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(instance.generation(), 1);

        instance.move_to(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::X);
        assert_eq!(instance.generation(), 2);
        assert_eq!(instance.transform().translation(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn degenerate_move_is_ignored() {
        let mut instance = MeshInstance::new(test_mesh());
        let before = instance.transform();

        // Aiming at the current position has no direction to look along.
        instance.move_to(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::Y);
        assert_eq!(instance.generation(), 0);
        assert_eq!(instance.transform(), before);

        // An aim parallel to `up` cannot form a basis either.
        instance.move_to(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert_eq!(instance.generation(), 0);
    }

    #[test]
    fn model_bookkeeping() {
        let mut model = Model::new("room");
        let mesh_id = model.add_mesh(test_mesh());
        assert_eq!(model.mesh_count(), 1);
        assert_eq!(model.instance_count(mesh_id), 0);

        let placed = model.add_instance(mesh_id, Mat4::from_translation(Vec3::X));
        assert_eq!(model.instance_count(mesh_id), 1);
        assert!(Rc::ptr_eq(&placed, &model.instances(mesh_id)[0]));
        assert_eq!(placed.borrow().transform().translation(), Vec3::X);
        // Placement through the model counts as a transform mutation.
        assert_eq!(placed.borrow().generation(), 1);
    }
}
