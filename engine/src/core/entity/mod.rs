//! Scene node storage
//!
//! Nodes are hecs entities carrying a kind, a name, an identifier and the
//! property components of that kind. Parent links live in `Parent`.

pub mod components;
pub mod hierarchy;
pub mod scene;

// Re-export commonly used types
pub use components::{
    ClipData, ClipState, Container2DData, Dock, Enabled, Instance, LightData, LightKind, Material,
    Name, NodeId, NodeKind, Parent, Resize, SpriteData, Transform,
};
pub use scene::{NodeDesc, Scene, SceneError, SceneSettings};

// Re-export hecs types that users will need
pub use hecs::Entity;
