//! Scene wrapper owning every node and texture the editor works on

use super::components::{
    ClipData, Container2DData, Enabled, Instance, LightData, Material, Name, NodeId, NodeKind,
    Parent, SpriteData, Transform,
};
use super::hierarchy;
use crate::core::camera::Camera;
use crate::core::texture::Texture;
use glam::Vec3;
use hecs::Entity;
use tracing::{debug, info};

/// Errors returned by scene lookups and mutations
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Node {0:?} not found")]
    NodeNotFound(Entity),

    #[error("Texture {0:?} not found")]
    TextureNotFound(Entity),

    #[error("Node {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("Cannot parent {child:?} under {parent:?}: it is the node itself or one of its descendants")]
    Cycle { child: Entity, parent: Entity },

    #[error("Instance source {0:?} is not a mesh")]
    InvalidInstanceSource(Entity),
}

/// Scene-wide rendering settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub clear_color: Vec3,
    pub ambient_color: Vec3,
    pub fog_enabled: bool,
    pub fog_density: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            clear_color: Vec3::new(0.2, 0.2, 0.3),
            ambient_color: Vec3::ZERO,
            fog_enabled: false,
            fog_density: 0.1,
        }
    }
}

/// Description of a node to spawn
#[derive(Debug, Clone)]
pub struct NodeDesc {
    pub kind: NodeKind,
    pub name: String,
    /// Empty means "let the editor assign one"
    pub id: String,
    pub parent: Option<Entity>,
    pub transform: Transform,
    pub light: Option<LightData>,
    pub camera: Option<Camera>,
    pub instance_source: Option<Entity>,
    pub textures: Vec<Entity>,
}

impl NodeDesc {
    fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            id: String::new(),
            parent: None,
            transform: Transform::default(),
            light: None,
            camera: None,
            instance_source: None,
            textures: Vec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Mesh, name)
    }

    /// An instance sharing geometry with `source`
    pub fn instance(name: impl Into<String>, source: Entity) -> Self {
        Self {
            instance_source: Some(source),
            ..Self::new(NodeKind::InstancedMesh, name)
        }
    }

    pub fn light(name: impl Into<String>, light: LightData) -> Self {
        Self {
            light: Some(light),
            ..Self::new(NodeKind::Light, name)
        }
    }

    pub fn camera(name: impl Into<String>, camera: Camera) -> Self {
        Self {
            camera: Some(camera),
            ..Self::new(NodeKind::Camera, name)
        }
    }

    pub fn container_2d(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Container2D, name)
    }

    pub fn sprite_2d(name: impl Into<String>, textures: Vec<Entity>) -> Self {
        Self {
            textures,
            ..Self::new(NodeKind::Sprite2D, name)
        }
    }

    pub fn clip_2d(name: impl Into<String>, textures: Vec<Entity>) -> Self {
        Self {
            textures,
            ..Self::new(NodeKind::Clip2D, name)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Wrapper around hecs::World keeping the engine's ordered node collections
pub struct Scene {
    inner: hecs::World,
    meshes: Vec<Entity>,
    lights: Vec<Entity>,
    cameras: Vec<Entity>,
    nodes_2d: Vec<Entity>,
    textures: Vec<Entity>,
    pub settings: SceneSettings,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
            meshes: Vec::new(),
            lights: Vec::new(),
            cameras: Vec::new(),
            nodes_2d: Vec::new(),
            textures: Vec::new(),
            settings: SceneSettings::default(),
        }
    }

    /// Spawn a node described by `desc`
    pub fn spawn_node(&mut self, desc: NodeDesc) -> Result<Entity, SceneError> {
        if let Some(parent) = desc.parent {
            self.kind(parent)?;
        }
        if let Some(source) = desc.instance_source {
            if self.kind(source)? != NodeKind::Mesh {
                return Err(SceneError::InvalidInstanceSource(source));
            }
        }
        for &texture in &desc.textures {
            self.texture(texture)?;
        }

        let mut builder = hecs::EntityBuilder::new();
        builder.add(desc.kind);
        builder.add(Name::new(desc.name));
        builder.add(NodeId::new(desc.id));
        builder.add(Enabled::default());

        if let Some(parent) = desc.parent {
            builder.add(Parent(parent));
        }

        match desc.kind {
            NodeKind::Mesh => {
                builder.add(desc.transform);
                builder.add(Material::default());
            }
            NodeKind::InstancedMesh => {
                builder.add(desc.transform);
                if let Some(source) = desc.instance_source {
                    builder.add(Instance { source });
                }
            }
            NodeKind::Light => {
                builder.add(desc.transform);
                builder.add(desc.light.unwrap_or_default());
            }
            NodeKind::Camera => {
                builder.add(desc.transform);
                builder.add(desc.camera.unwrap_or_default());
            }
            NodeKind::Container2D => {
                builder.add(Container2DData::default());
            }
            NodeKind::Sprite2D | NodeKind::Clip2D => {
                builder.add(Container2DData::default());
                builder.add(SpriteData {
                    textures: desc.textures,
                    ..Default::default()
                });
                if desc.kind == NodeKind::Clip2D {
                    builder.add(ClipData::default());
                }
            }
        }

        let entity = self.inner.spawn(builder.build());
        match desc.kind {
            NodeKind::Mesh | NodeKind::InstancedMesh => self.meshes.push(entity),
            NodeKind::Light => self.lights.push(entity),
            NodeKind::Camera => self.cameras.push(entity),
            _ => self.nodes_2d.push(entity),
        }

        debug!(entity = ?entity, kind = ?desc.kind, "Spawned scene node");
        Ok(entity)
    }

    /// Add a texture to the scene's texture collection
    pub fn add_texture(&mut self, texture: Texture) -> Entity {
        let name = texture.display_name().to_string();
        let entity = self.inner.spawn((texture,));
        self.textures.push(entity);
        debug!(entity = ?entity, name = %name, "Added texture");
        entity
    }

    /// Remove a node, its descendants and the instances of every removed mesh
    ///
    /// Returns the removed entities, the requested node first.
    pub fn remove_node(&mut self, entity: Entity) -> Result<Vec<Entity>, SceneError> {
        self.kind(entity)?;

        let mut removed = vec![entity];
        let mut index = 0;
        while index < removed.len() {
            let current = removed[index];
            for node in self.all_nodes() {
                if removed.contains(&node) {
                    continue;
                }
                let is_child = self.parent_of(node) == Some(current);
                let is_instance = self.instance_source(node) == Some(current);
                if is_child || is_instance {
                    removed.push(node);
                }
            }
            index += 1;
        }

        for &node in &removed {
            let _ = self.inner.despawn(node);
        }
        for list in [
            &mut self.meshes,
            &mut self.lights,
            &mut self.cameras,
            &mut self.nodes_2d,
        ] {
            list.retain(|e| !removed.contains(e));
        }

        info!(entity = ?entity, count = removed.len(), "Removed scene node");
        Ok(removed)
    }

    /// Remove a texture and every reference to it
    pub fn remove_texture(&mut self, texture: Entity) -> Result<(), SceneError> {
        self.texture(texture)?;
        let _ = self.inner.despawn(texture);
        self.textures.retain(|&e| e != texture);

        for (_, material) in self.inner.query_mut::<&mut Material>() {
            if material.diffuse_texture == Some(texture) {
                material.diffuse_texture = None;
            }
        }
        for (_, sprite) in self.inner.query_mut::<&mut SpriteData>() {
            sprite.textures.retain(|&e| e != texture);
            if sprite.texture_index >= sprite.textures.len() {
                sprite.texture_index = 0;
            }
        }

        debug!(texture = ?texture, "Removed texture");
        Ok(())
    }

    /// Attach `child` to `parent`, or detach it when `parent` is `None`
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), SceneError> {
        self.kind(child)?;
        match parent {
            Some(parent) => {
                self.kind(parent)?;
                if hierarchy::is_ancestor_or_self(self, child, parent) {
                    return Err(SceneError::Cycle { child, parent });
                }
                let _ = self.inner.insert_one(child, Parent(parent));
            }
            None => {
                let _ = self.inner.remove_one::<Parent>(child);
            }
        }
        debug!(child = ?child, parent = ?parent, "Reparented node");
        Ok(())
    }

    /// Kind of a node
    pub fn kind(&self, entity: Entity) -> Result<NodeKind, SceneError> {
        self.inner
            .get::<&NodeKind>(entity)
            .map(|kind| *kind)
            .map_err(|_| SceneError::NodeNotFound(entity))
    }

    /// Identifier of a node, possibly empty
    pub fn id_of(&self, entity: Entity) -> Result<String, SceneError> {
        self.inner
            .get::<&NodeId>(entity)
            .map(|id| id.0.clone())
            .map_err(|_| SceneError::NodeNotFound(entity))
    }

    /// Make sure a node has an identifier, generating a random one if needed
    pub fn ensure_id(&mut self, entity: Entity) -> Result<String, SceneError> {
        let id = self
            .inner
            .query_one_mut::<&mut NodeId>(entity)
            .map_err(|_| SceneError::NodeNotFound(entity))?;
        if id.is_empty() {
            *id = NodeId::random();
            debug!(entity = ?entity, id = %id.0, "Assigned random node id");
        }
        Ok(id.0.clone())
    }

    /// Replace a node's identifier
    pub fn set_id(&mut self, entity: Entity, id: impl Into<String>) -> Result<(), SceneError> {
        let current = self
            .inner
            .query_one_mut::<&mut NodeId>(entity)
            .map_err(|_| SceneError::NodeNotFound(entity))?;
        *current = NodeId::new(id);
        Ok(())
    }

    /// Display name of a node
    pub fn name_of(&self, entity: Entity) -> Result<String, SceneError> {
        self.inner
            .get::<&Name>(entity)
            .map(|name| name.0.clone())
            .map_err(|_| SceneError::NodeNotFound(entity))
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) -> Result<(), SceneError> {
        let current = self
            .inner
            .query_one_mut::<&mut Name>(entity)
            .map_err(|_| SceneError::NodeNotFound(entity))?;
        *current = Name::new(name);
        Ok(())
    }

    /// Find a node by identifier
    pub fn find_by_id(&self, id: &str) -> Option<Entity> {
        self.all_nodes().into_iter().find(|&e| {
            self.inner
                .get::<&NodeId>(e)
                .map(|node_id| node_id.0 == id)
                .unwrap_or(false)
        })
    }

    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.inner.get::<&Parent>(entity).ok().map(|parent| parent.0)
    }

    /// Source mesh of an instance
    pub fn instance_source(&self, entity: Entity) -> Option<Entity> {
        self.inner
            .get::<&Instance>(entity)
            .ok()
            .map(|instance| instance.source)
    }

    /// Instances of `source` in scene order
    pub fn instances_of(&self, source: Entity) -> Vec<Entity> {
        self.meshes
            .iter()
            .copied()
            .filter(|&mesh| self.instance_source(mesh) == Some(source))
            .collect()
    }

    /// Direct children in scene order
    pub fn children_of(&self, entity: Entity) -> Vec<Entity> {
        self.all_nodes()
            .into_iter()
            .filter(|&node| self.parent_of(node) == Some(entity))
            .collect()
    }

    /// Every descendant of `root` in scene order
    pub fn descendants(&self, root: Entity) -> Vec<Entity> {
        self.all_nodes()
            .into_iter()
            .filter(|&node| node != root && hierarchy::is_ancestor_or_self(self, root, node))
            .collect()
    }

    /// Every node: meshes, then lights, cameras and 2D nodes, each in insertion order
    pub fn all_nodes(&self) -> Vec<Entity> {
        self.meshes
            .iter()
            .chain(&self.lights)
            .chain(&self.cameras)
            .chain(&self.nodes_2d)
            .copied()
            .collect()
    }

    pub fn meshes(&self) -> &[Entity] {
        &self.meshes
    }

    pub fn lights(&self) -> &[Entity] {
        &self.lights
    }

    pub fn cameras(&self) -> &[Entity] {
        &self.cameras
    }

    pub fn nodes_2d(&self) -> &[Entity] {
        &self.nodes_2d
    }

    pub fn textures(&self) -> &[Entity] {
        &self.textures
    }

    /// Number of nodes, textures excluded
    pub fn node_count(&self) -> usize {
        self.meshes.len() + self.lights.len() + self.cameras.len() + self.nodes_2d.len()
    }

    /// Get a texture by entity
    pub fn texture(&self, entity: Entity) -> Result<hecs::Ref<'_, Texture>, SceneError> {
        self.inner
            .get::<&Texture>(entity)
            .map_err(|_| SceneError::TextureNotFound(entity))
    }

    /// Index of a texture in the texture collection
    pub fn texture_index(&self, entity: Entity) -> Option<usize> {
        self.textures.iter().position(|&e| e == entity)
    }

    /// Get a reference to a component on a node
    pub fn get<T: hecs::Component>(&self, entity: Entity) -> Result<hecs::Ref<'_, T>, SceneError> {
        self.inner
            .get::<&T>(entity)
            .map_err(|_| SceneError::MissingComponent {
                entity,
                component: short_type_name::<T>(),
            })
    }

    /// Run `f` with a mutable reference to a component on a node
    pub fn with_mut<T: hecs::Component, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, SceneError> {
        let component = self
            .inner
            .query_one_mut::<&mut T>(entity)
            .map_err(|_| SceneError::MissingComponent {
                entity,
                component: short_type_name::<T>(),
            })?;
        Ok(f(component))
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Remove every node and texture, keeping the settings
    pub fn clear(&mut self) {
        self.inner.clear();
        self.meshes.clear();
        self.lights.clear();
        self.cameras.clear();
        self.nodes_2d.clear();
        self.textures.clear();
    }

    /// Get access to the inner hecs::World for advanced operations
    pub fn inner(&self) -> &hecs::World {
        &self.inner
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
