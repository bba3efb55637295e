//! Scene graph core: nodes, cameras and textures

pub mod camera;
pub mod entity;
pub mod texture;
