//! Texture resources referenced by meshes and sprites

use serde::{Deserialize, Serialize};
use serde_json::json;

/// A texture known to the scene
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Texture {
    /// Display name, may be empty for textures loaded from a url
    pub name: String,
    /// Source location of the image data
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
    pub is_cube: bool,
    pub is_render_target: bool,
}

impl Texture {
    /// Create a plain 2D texture
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a cube texture
    pub fn cube(name: impl Into<String>, size: u32) -> Self {
        Self {
            is_cube: true,
            ..Self::new(name, size, size)
        }
    }

    /// Create a render target texture
    pub fn render_target(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            is_render_target: true,
            ..Self::new(name, width, height)
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Name shown in lists, falling back to the url
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.url.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }

    /// Size of the base mip level, `None` until the texture has been sized
    pub fn base_size(&self) -> Option<(u32, u32)> {
        if self.width == 0 && self.height == 0 {
            None
        } else {
            Some((self.width, self.height))
        }
    }

    /// Serialize the texture description
    pub fn serialize(&self) -> serde_json::Value {
        json!({
            "name": self.display_name(),
            "url": self.url,
            "width": self.width,
            "height": self.height,
            "isCube": self.is_cube,
            "isRenderTarget": self.is_render_target,
        })
    }
}
