//! References to the objects the editor edits

use scene_engine::prelude::{Entity, NodeKind, Scene};

/// Borrowed handle to something owned by the scene
///
/// The editor never owns scene data; it keeps entities and resolves them
/// against the scene whenever it needs to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    /// The scene itself (settings, clear color, fog)
    Scene,
    Node(Entity),
    Texture(Entity),
}

/// Dispatch key used to pick edition tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Scene,
    Texture,
    Node(NodeKind),
}

impl ObjectRef {
    /// Resolve the runtime kind, `None` when the object no longer exists
    pub fn target_kind(self, scene: &Scene) -> Option<TargetKind> {
        match self {
            ObjectRef::Scene => Some(TargetKind::Scene),
            ObjectRef::Node(entity) => scene.kind(entity).ok().map(TargetKind::Node),
            ObjectRef::Texture(entity) => scene.texture(entity).ok().map(|_| TargetKind::Texture),
        }
    }

    pub fn entity(self) -> Option<Entity> {
        match self {
            ObjectRef::Scene => None,
            ObjectRef::Node(entity) | ObjectRef::Texture(entity) => Some(entity),
        }
    }
}
