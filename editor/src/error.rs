use crate::edition::EditionError;
use crate::graph::GraphError;
use crate::settings::SettingsError;
use crate::texture_browser::TextureBrowserError;
use scene_engine::prelude::{Entity, SceneError};

/// Errors surfaced by [`crate::EditorState`]
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Edition(#[from] EditionError),

    #[error(transparent)]
    TextureBrowser(#[from] TextureBrowserError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Node {0:?} has no entry in the scene graph")]
    NotInGraph(Entity),

    #[error("No texture browser is open")]
    NoTextureBrowser,
}
