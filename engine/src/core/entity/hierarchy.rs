//! Parent chain helpers for scene nodes

use super::scene::Scene;
use hecs::Entity;
use std::collections::HashSet;
use tracing::error;

/// Ancestors of `entity`, closest first
///
/// Stops on a parent cycle instead of looping forever.
pub fn ancestors(scene: &Scene, entity: Entity) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(entity);

    let mut current = scene.parent_of(entity);
    while let Some(parent) = current {
        if !visited.insert(parent) {
            error!(entity = ?entity, parent = ?parent, "Parent cycle detected");
            break;
        }
        result.push(parent);
        current = scene.parent_of(parent);
    }
    result
}

/// True when `ancestor` is `node` or one of its ancestors
pub fn is_ancestor_or_self(scene: &Scene, ancestor: Entity, node: Entity) -> bool {
    node == ancestor || ancestors(scene, node).contains(&ancestor)
}
