//! Scene operation handlers
//!
//! This module provides the scene content the editor starts with.

use scene_engine::prelude::*;
use tracing::info;

/// Create a default scene with camera, lighting, a few meshes and a 2D overlay
pub fn create_default_scene(scene: &mut Scene) -> Result<(), SceneError> {
    info!("Creating default scene");

    // Clear the scene first
    scene.clear();

    let grass = scene.add_texture(Texture::new("grass", 512, 512).with_url("textures/grass.png"));
    let frames = scene.add_texture(Texture::new("walk", 256, 64).with_url("textures/walk.png"));

    // Create camera
    scene.spawn_node(
        NodeDesc::camera("Main Camera", Camera::new(60.0, 0.1, 1000.0))
            .with_transform(Transform::from_position(Vec3::new(0.0, 5.0, 10.0))),
    )?;

    // Create light
    let mut sun = LightData::new(LightKind::Directional);
    sun.intensity = 0.8;
    scene.spawn_node(
        NodeDesc::light("Sun", sun)
            .with_transform(Transform::from_position(Vec3::new(4.0, 10.0, 4.0))),
    )?;

    // Create a cube and an instance of it
    let cube = scene.spawn_node(NodeDesc::mesh("Default Cube"))?;
    scene.spawn_node(
        NodeDesc::instance("Cube Instance", cube)
            .with_transform(Transform::from_position(Vec3::new(3.0, 0.0, 0.0))),
    )?;

    // Create a ground plane
    let plane = scene.spawn_node(
        NodeDesc::mesh("Ground Plane").with_transform(
            Transform::from_position(Vec3::new(0.0, -1.0, 0.0))
                .with_scale(Vec3::new(20.0, 1.0, 20.0)),
        ),
    )?;
    scene.with_mut::<Material, _>(plane, |m| m.diffuse_texture = Some(grass))?;

    // Create the 2D overlay
    let hud = scene.spawn_node(NodeDesc::container_2d("HUD"))?;
    scene.spawn_node(NodeDesc::sprite_2d("Logo", vec![grass]).with_parent(hud))?;
    scene.spawn_node(NodeDesc::clip_2d("Walk Cycle", vec![frames]).with_parent(hud))?;

    info!(
        nodes = scene.node_count(),
        textures = scene.textures().len(),
        "Default scene created"
    );
    Ok(())
}
