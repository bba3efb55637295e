//! In-memory scene graph for the scene editor
//!
//! This crate provides the object model the editor operates on: meshes,
//! instances, lights, cameras, 2D containers and textures stored in a
//! hecs world with ordered collections and parent links.

pub mod core;

// Re-export commonly used types
pub mod prelude {
    pub use crate::core::entity::{
        hierarchy, ClipData, ClipState, Container2DData, Dock, Enabled, Entity, Instance,
        LightData, LightKind, Material, Name, NodeDesc, NodeId, NodeKind, Parent, Resize, Scene,
        SceneError, SceneSettings, SpriteData, Transform,
    };

    pub use crate::core::camera::Camera;
    pub use crate::core::texture::Texture;

    // Math types
    pub use glam::{Quat, Vec2, Vec3};
}

/// Initialize logging for the editor
pub fn init_logging() {
    init_logging_with_filter("info");
}

/// Initialize logging, using `RUST_LOG` when set and `default_filter` otherwise
pub fn init_logging_with_filter(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
