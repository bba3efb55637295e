//! Integration tests for scene node storage and parent links

use scene_engine::prelude::*;

fn scene() -> (Scene, Entity, Entity, Entity) {
    let mut scene = Scene::new();
    let root = scene.spawn_node(NodeDesc::mesh("root")).unwrap();
    let child = scene
        .spawn_node(
            NodeDesc::mesh("child")
                .with_parent(root)
                .with_transform(Transform::from_position(Vec3::X)),
        )
        .unwrap();
    let grandchild = scene
        .spawn_node(NodeDesc::camera("eye", Camera::default()).with_parent(child))
        .unwrap();
    (scene, root, child, grandchild)
}

#[test]
fn test_descendants_and_ancestors() {
    let (scene, root, child, grandchild) = scene();

    assert_eq!(scene.descendants(root), vec![child, grandchild]);
    assert_eq!(hierarchy::ancestors(&scene, grandchild), vec![child, root]);
    assert!(hierarchy::is_ancestor_or_self(&scene, root, grandchild));
    assert!(!hierarchy::is_ancestor_or_self(&scene, grandchild, root));
}

#[test]
fn test_reparent_rejects_cycles() {
    let (mut scene, root, _, grandchild) = scene();

    let err = scene.set_parent(root, Some(grandchild)).unwrap_err();
    assert!(matches!(err, SceneError::Cycle { .. }));
    assert!(matches!(
        scene.set_parent(root, Some(root)),
        Err(SceneError::Cycle { .. })
    ));

    scene.set_parent(grandchild, None).unwrap();
    assert_eq!(scene.parent_of(grandchild), None);
}

#[test]
fn test_remove_takes_descendants_and_instances() {
    let (mut scene, root, child, grandchild) = scene();
    let copy = scene.spawn_node(NodeDesc::instance("copy", child)).unwrap();
    let other = scene.spawn_node(NodeDesc::mesh("other")).unwrap();

    let removed = scene.remove_node(root).unwrap();
    assert_eq!(removed[0], root);
    for entity in [child, grandchild, copy] {
        assert!(removed.contains(&entity));
        assert!(!scene.contains(entity));
    }
    assert_eq!(scene.meshes(), &[other]);
    assert!(scene.cameras().is_empty());
}

#[test]
fn test_instances_of_lists_every_instance() {
    let (mut scene, root, child, _) = scene();
    let first = scene.spawn_node(NodeDesc::instance("first", child)).unwrap();
    let second = scene
        .spawn_node(NodeDesc::instance("second", child).with_parent(root))
        .unwrap();

    assert_eq!(scene.instances_of(child), vec![first, second]);
    assert!(scene.instances_of(root).is_empty());
}

#[test]
fn test_ids_are_assigned_on_demand() {
    let (mut scene, root, _, _) = scene();
    assert_eq!(scene.id_of(root).unwrap(), "");

    let id = scene.ensure_id(root).unwrap();
    assert!(!id.is_empty());
    assert_eq!(scene.ensure_id(root).unwrap(), id);
    assert_eq!(scene.find_by_id(&id), Some(root));
}

#[test]
fn test_removing_texture_clears_references() {
    let mut scene = Scene::new();
    let grass = scene.add_texture(Texture::new("grass", 16, 16));
    let sprite = scene
        .spawn_node(NodeDesc::sprite_2d("logo", vec![grass]))
        .unwrap();

    scene.remove_texture(grass).unwrap();
    assert!(scene.textures().is_empty());
    assert_eq!(scene.get::<SpriteData>(sprite).unwrap().current_texture(), None);
    assert!(matches!(
        scene.texture(grass),
        Err(SceneError::TextureNotFound(_))
    ));
}
