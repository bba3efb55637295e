//! Core components for scene nodes

use bitflags::bitflags;
use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component representing position, rotation, and scale in local space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in local space
    pub position: Vec3,
    /// Rotation in local space as a quaternion
    pub rotation: Quat,
    /// Scale in local space
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the scale of the transform
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as XYZ euler angles in degrees, the way the edition panel shows it
    pub fn euler_degrees(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Replace the rotation from XYZ euler angles in degrees
    pub fn set_euler_degrees(&mut self, degrees: Vec3) {
        self.rotation = Quat::from_euler(
            EulerRot::XYZ,
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
    }
}

/// Parent component establishing a parent-child relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Display name of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Engine-side unique identifier of a node
///
/// Empty ids are allowed at spawn time and replaced by a random one on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random identifier
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether the node takes part in rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enabled(pub bool);

impl Default for Enabled {
    fn default() -> Self {
        Self(true)
    }
}

/// Link from an instanced mesh to the mesh it shares geometry with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instance {
    pub source: hecs::Entity,
}

/// Runtime kind of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Mesh,
    InstancedMesh,
    Light,
    Camera,
    Container2D,
    Sprite2D,
    Clip2D,
}

impl NodeKind {
    /// Meshes and instances
    pub fn is_mesh(self) -> bool {
        matches!(self, NodeKind::Mesh | NodeKind::InstancedMesh)
    }

    /// Nodes living in the 2D overlay
    pub fn is_2d(self) -> bool {
        matches!(
            self,
            NodeKind::Container2D | NodeKind::Sprite2D | NodeKind::Clip2D
        )
    }

    /// Sprites and clips are containers too
    pub fn is_container(self) -> bool {
        self.is_2d()
    }

    /// Clips are sprites with playback
    pub fn is_sprite(self) -> bool {
        matches!(self, NodeKind::Sprite2D | NodeKind::Clip2D)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Mesh => "Mesh",
            NodeKind::InstancedMesh => "Instanced Mesh",
            NodeKind::Light => "Light",
            NodeKind::Camera => "Camera",
            NodeKind::Container2D => "Container 2D",
            NodeKind::Sprite2D => "Sprite 2D",
            NodeKind::Clip2D => "Clip 2D",
        }
    }
}

/// Light type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
    Spot,
    Hemispheric,
}

/// Light parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LightData {
    pub kind: LightKind,
    pub intensity: f32,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub range: f32,
}

impl LightData {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            intensity: 1.0,
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            range: f32::MAX,
        }
    }
}

impl Default for LightData {
    fn default() -> Self {
        Self::new(LightKind::Point)
    }
}

/// Surface material of a mesh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Material {
    pub diffuse_texture: Option<hecs::Entity>,
}

bitflags! {
    /// Anchoring of a 2D container inside its parent
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Dock: u8 {
        const LEFT = 1;
        const TOP = 2;
        const RIGHT = 4;
        const BOTTOM = 8;
        const CENTER_HORIZONTAL = 16;
        const CENTER_VERTICAL = 32;
    }
}

impl Dock {
    pub const HORIZONTAL_NAMES: [&'static str; 3] = ["LEFT", "RIGHT", "CENTER_HORIZONTAL"];
    pub const VERTICAL_NAMES: [&'static str; 3] = ["TOP", "BOTTOM", "CENTER_VERTICAL"];

    /// Horizontal component name, `LEFT` winning over the others
    pub fn horizontal_name(self) -> &'static str {
        if self.contains(Dock::LEFT) {
            "LEFT"
        } else if self.contains(Dock::CENTER_HORIZONTAL) {
            "CENTER_HORIZONTAL"
        } else if self.contains(Dock::RIGHT) {
            "RIGHT"
        } else {
            ""
        }
    }

    /// Vertical component name, `TOP` winning over the others
    pub fn vertical_name(self) -> &'static str {
        if self.contains(Dock::TOP) {
            "TOP"
        } else if self.contains(Dock::CENTER_VERTICAL) {
            "CENTER_VERTICAL"
        } else if self.contains(Dock::BOTTOM) {
            "BOTTOM"
        } else {
            ""
        }
    }
}

/// How a 2D container adapts to its parent size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resize {
    #[default]
    None,
    Cover,
    Contain,
    Fit,
}

impl Resize {
    pub const NAMES: [&'static str; 4] = ["NONE", "COVER", "CONTAIN", "FIT"];

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<Resize> {
        match name {
            "NONE" => Some(Resize::None),
            "COVER" => Some(Resize::Cover),
            "CONTAIN" => Some(Resize::Contain),
            "FIT" => Some(Resize::Fit),
            _ => None,
        }
    }
}

/// Layout parameters of a 2D container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container2DData {
    /// Empty until the container is docked somewhere
    pub dock: Dock,
    pub resize: Resize,
    pub fit_coefficient: f32,
    pub pivot: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Default for Container2DData {
    fn default() -> Self {
        Self {
            dock: Dock::empty(),
            resize: Resize::None,
            fit_coefficient: 1.0,
            pivot: Vec2::splat(0.5),
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Texture frames of a sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteData {
    pub textures: Vec<hecs::Entity>,
    pub texture_index: usize,
    pub texture_offset: Vec2,
    pub texture_scale: Vec2,
    pub invert_y: bool,
}

impl Default for SpriteData {
    fn default() -> Self {
        Self {
            textures: Vec::new(),
            texture_index: 0,
            texture_offset: Vec2::ZERO,
            texture_scale: Vec2::ONE,
            invert_y: false,
        }
    }
}

impl SpriteData {
    /// Texture currently displayed, if the index points at one
    pub fn current_texture(&self) -> Option<hecs::Entity> {
        self.textures.get(self.texture_index).copied()
    }

    /// Replace all frames with a single texture
    pub fn set_texture(&mut self, texture: hecs::Entity) {
        self.textures = vec![texture];
        self.texture_index = 0;
    }
}

/// Playback state of a clip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClipState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Frame animation of a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipData {
    pub delay_ms: u32,
    pub count: u32,
    pub state: ClipState,
}

impl Default for ClipData {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            count: 1,
            state: ClipState::Stopped,
        }
    }
}

impl ClipData {
    pub fn play(&mut self, delay_ms: u32, count: u32) {
        self.delay_ms = delay_ms;
        self.count = count;
        self.state = ClipState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == ClipState::Playing {
            self.state = ClipState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.state = ClipState::Stopped;
    }

    pub fn is_playing(&self) -> bool {
        self.state == ClipState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let transform = Transform::default();
        assert_eq!(transform.position, Vec3::ZERO);
        assert_eq!(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn test_transform_euler_degrees() {
        let mut transform = Transform::default();
        transform.set_euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let euler = transform.euler_degrees();
        assert!((euler.y - 90.0).abs() < 1e-3);
        assert!(euler.x.abs() < 1e-3);
    }

    #[test]
    fn test_node_id_random_is_unique() {
        let a = NodeId::random();
        let b = NodeId::random();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_node_kind_predicates() {
        assert!(NodeKind::InstancedMesh.is_mesh());
        assert!(NodeKind::Clip2D.is_sprite());
        assert!(NodeKind::Clip2D.is_container());
        assert!(!NodeKind::Sprite2D.is_mesh());
        assert!(!NodeKind::Camera.is_2d());
    }

    #[test]
    fn test_dock_names() {
        let dock = Dock::LEFT | Dock::BOTTOM;
        assert_eq!(dock.horizontal_name(), "LEFT");
        assert_eq!(dock.vertical_name(), "BOTTOM");
        assert_eq!(Dock::from_name("CENTER_VERTICAL"), Some(Dock::CENTER_VERTICAL));
        assert_eq!(Dock::from_name("SIDEWAYS"), None);
    }

    #[test]
    fn test_resize_names() {
        assert_eq!(Resize::Fit.name(), "FIT");
        assert_eq!(Resize::from_name("COVER"), Some(Resize::Cover));
        assert_eq!(Resize::from_name("fit"), None);
    }

    #[test]
    fn test_clip_playback() {
        let mut clip = ClipData::default();
        clip.pause();
        assert_eq!(clip.state, ClipState::Stopped);
        clip.play(50, 3);
        assert!(clip.is_playing());
        clip.pause();
        assert_eq!(clip.state, ClipState::Paused);
        clip.stop();
        assert_eq!(clip.state, ClipState::Stopped);
    }
}
