//! Scene graph tree view
//!
//! Projects the scene's nodes into a [`TreeView`] and keeps it in sync as
//! nodes are added, removed, reparented and renamed.

use crate::object::ObjectRef;
use crate::tree::{Icon, TreeEntry, TreeError, TreeView};
use scene_engine::prelude::{hierarchy, Entity, NodeKind, Scene, SceneError};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Id of the synthetic entry standing for the scene itself
pub const DEFAULT_ROOT_ID: &str = "ROOT";

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("The scene entry cannot be {0}")]
    RootImmutable(&'static str),

    #[error("Entry ids cannot be empty")]
    EmptyId,
}

/// Tree view over the scene graph
pub struct GraphController {
    tree: TreeView<ObjectRef>,
    root_id: String,
    root_label: String,
    child_counts: HashMap<String, usize>,
}

impl Default for GraphController {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_ID, "Scene")
    }
}

impl GraphController {
    pub fn new(root_id: impl Into<String>, root_label: impl Into<String>) -> Self {
        Self {
            tree: TreeView::new("SceneGraph"),
            root_id: root_id.into(),
            root_label: root_label.into(),
            child_counts: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &TreeView<ObjectRef> {
        &self.tree
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// Fill the tree from the scene
    ///
    /// Without `root` the tree is reset to the scene entry plus every
    /// top-level node, and the scene object is returned so the caller can
    /// route it to the edition panel. With `root` the root's descendants are
    /// added below their parents (the root's entry must already exist).
    /// Instanced meshes always go under their source mesh.
    pub fn fill(
        &mut self,
        scene: &mut Scene,
        root: Option<Entity>,
    ) -> Result<Option<ObjectRef>, GraphError> {
        match root {
            None => {
                self.tree.clear();
                self.child_counts.clear();

                let entry = TreeEntry::new(
                    self.root_id.clone(),
                    self.root_label.clone(),
                    ObjectRef::Scene,
                )
                .with_icon(Some(Icon::Scene));
                self.tree.add(None, entry)?;
                self.tree.expand(&self.root_id)?;
                self.tree.select(&self.root_id)?;

                let top_level: Vec<Entity> = scene
                    .all_nodes()
                    .into_iter()
                    .filter(|&node| scene.parent_of(node).is_none())
                    .collect();

                let root_id = self.root_id.clone();
                for node in top_level {
                    self.insert_node(scene, node, &root_id)?;
                }

                info!(entries = self.tree.len(), "Filled scene graph");
                Ok(Some(ObjectRef::Scene))
            }
            Some(root) => {
                let root_id = scene.ensure_id(root)?;
                if !self.tree.contains(&root_id) {
                    return Err(TreeError::NotFound(root_id).into());
                }

                // Parents first so every node finds its parent entry
                let mut descendants = scene.descendants(root);
                descendants.sort_by_key(|&node| hierarchy::ancestors(&*scene, node).len());

                for node in descendants {
                    let id = scene.ensure_id(node)?;
                    if self.tree.contains(&id) {
                        debug!(id = %id, "Node already in graph");
                        continue;
                    }
                    let fallback = match scene.parent_of(node) {
                        Some(parent) => {
                            let parent_id = scene.ensure_id(parent)?;
                            if self.tree.contains(&parent_id) {
                                parent_id
                            } else {
                                root_id.clone()
                            }
                        }
                        None => root_id.clone(),
                    };
                    self.insert_node(scene, node, &fallback)?;
                }
                Ok(None)
            }
        }
    }

    /// Fill the scene entry, then every node below it
    pub fn fill_all(&mut self, scene: &mut Scene) -> Result<ObjectRef, GraphError> {
        let routed = self.fill(scene, None)?.unwrap_or(ObjectRef::Scene);
        let top_level: Vec<Entity> = scene
            .all_nodes()
            .into_iter()
            .filter(|&node| scene.parent_of(node).is_none())
            .collect();
        for node in top_level {
            self.fill(scene, Some(node))?;
        }
        Ok(routed)
    }

    /// Add an entry under `parent_id`
    pub fn add(&mut self, entry: TreeEntry<ObjectRef>, parent_id: &str) -> Result<(), GraphError> {
        self.tree.add(Some(parent_id), entry)?;
        Ok(())
    }

    /// Add the entry of a node that was just created in the scene
    ///
    /// The entry goes under the instance source, the scene parent, or the
    /// scene entry, whichever is found first. Returns the entry id.
    pub fn add_node(&mut self, scene: &mut Scene, entity: Entity) -> Result<String, GraphError> {
        let parent_id = match scene.parent_of(entity) {
            Some(parent) => scene.ensure_id(parent)?,
            None => self.root_id.clone(),
        };
        let parent_id = if self.tree.contains(&parent_id) {
            parent_id
        } else {
            warn!(parent = %parent_id, "Parent entry missing, adding node under the scene");
            self.root_id.clone()
        };
        self.insert_node(scene, entity, &parent_id)
    }

    /// Remove an entry and its subtree
    pub fn remove(&mut self, id: &str) -> Result<Vec<ObjectRef>, GraphError> {
        if id == self.root_id {
            return Err(GraphError::RootImmutable("removed"));
        }
        let removed = self.tree.remove(id)?;
        for entry in &removed {
            self.child_counts.remove(&entry.id);
        }
        debug!(id = id, count = removed.len(), "Removed graph entries");
        Ok(removed.into_iter().map(|entry| entry.payload).collect())
    }

    /// Check that `id` can move under `parent_id`, leaving the tree as is
    pub fn check_parent(&self, id: &str, parent_id: &str) -> Result<(), GraphError> {
        if id == self.root_id {
            return Err(GraphError::RootImmutable("moved"));
        }
        self.tree.check_reparent(id, parent_id)?;
        Ok(())
    }

    /// Move `id` under `parent_id` and make it visible
    pub fn set_parent(&mut self, id: &str, parent_id: &str) -> Result<(), GraphError> {
        self.check_parent(id, parent_id)?;
        self.tree.reparent(id, parent_id)?;
        *self.child_counts.entry(parent_id.to_string()).or_insert(0) += 1;
        self.tree.expand_parents(id)?;
        debug!(id = id, parent = parent_id, "Moved graph entry");
        Ok(())
    }

    /// Number of nodes moved under `id` since the last fill
    pub fn child_count(&self, id: &str) -> usize {
        self.child_counts.get(id).copied().unwrap_or(0)
    }

    /// Rename an entry; its id and text both become `name`
    ///
    /// Ids stay unique and non-empty: renaming onto an id already present
    /// is rejected and both entries are left untouched.
    pub fn rename_node(&mut self, id: &str, name: &str) -> Result<(), GraphError> {
        if id == self.root_id {
            return Err(GraphError::RootImmutable("renamed"));
        }
        if name.is_empty() {
            return Err(GraphError::EmptyId);
        }
        self.tree.rename(id, name)?;
        self.tree.set_text(name, name)?;
        if let Some(count) = self.child_counts.remove(id) {
            self.child_counts.insert(name.to_string(), count);
        }
        self.tree.refresh();
        Ok(())
    }

    /// Select an entry, returning the object it stands for
    pub fn select(&mut self, id: &str) -> Result<ObjectRef, GraphError> {
        self.tree.expand_parents(id)?;
        self.tree.select(id)?;
        self.tree.scroll_into_view(id)?;
        let payload = self
            .tree
            .get(id)
            .map(|entry| entry.payload)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))?;
        debug!(id = id, "Selected graph entry");
        Ok(payload)
    }

    pub fn selected(&self) -> Option<&str> {
        self.tree.selected()
    }

    /// Id of the entry projecting `entity`
    pub fn id_of(&self, entity: Entity) -> Option<&str> {
        self.tree
            .iter()
            .find(|entry| entry.payload == ObjectRef::Node(entity))
            .map(|entry| entry.id.as_str())
    }

    /// Icon for a node kind, `None` for kinds without one
    pub fn get_icon(kind: NodeKind) -> Option<Icon> {
        match kind {
            NodeKind::Mesh | NodeKind::InstancedMesh => Some(Icon::Mesh),
            NodeKind::Light => Some(Icon::Light),
            NodeKind::Camera => Some(Icon::Camera),
            NodeKind::Container2D | NodeKind::Sprite2D | NodeKind::Clip2D => None,
        }
    }

    fn insert_node(
        &mut self,
        scene: &mut Scene,
        node: Entity,
        parent_id: &str,
    ) -> Result<String, GraphError> {
        let id = scene.ensure_id(node)?;
        let kind = scene.kind(node)?;
        let name = scene.name_of(node)?;

        let mut parent_id = parent_id.to_string();
        if let Some(source) = scene.instance_source(node) {
            let source_id = scene.ensure_id(source)?;
            if self.tree.contains(&source_id) {
                parent_id = source_id;
            } else {
                warn!(instance = %id, source = %source_id, "Instance source not in graph");
            }
        }

        let entry = TreeEntry::new(id.clone(), name, ObjectRef::Node(node))
            .with_icon(Self::get_icon(kind));
        self.tree.add(Some(&parent_id), entry)?;
        debug!(id = %id, parent = %parent_id, "Added graph entry");

        self.adopt_instances(scene, node, &id)?;
        Ok(id)
    }

    /// Move entries of `source`'s instances added before it under its entry
    fn adopt_instances(
        &mut self,
        scene: &mut Scene,
        source: Entity,
        source_id: &str,
    ) -> Result<(), GraphError> {
        for instance in scene.instances_of(source) {
            let instance_id = scene.ensure_id(instance)?;
            let misplaced = self
                .tree
                .get(&instance_id)
                .is_some_and(|entry| entry.parent() != Some(source_id));
            if !misplaced {
                continue;
            }
            match self.tree.reparent(&instance_id, source_id) {
                Ok(()) => {
                    debug!(instance = %instance_id, source = %source_id, "Grouped instance under its source");
                }
                Err(TreeError::Cycle { .. }) => {
                    warn!(instance = %instance_id, source = %source_id, "Source is below its instance");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::prelude::{LightData, NodeDesc};

    fn scene() -> (Scene, Entity, Entity, Entity) {
        let mut scene = Scene::new();
        let cube = scene
            .spawn_node(NodeDesc::mesh("cube").with_id("cube"))
            .unwrap();
        let child = scene
            .spawn_node(NodeDesc::mesh("child").with_id("child").with_parent(cube))
            .unwrap();
        let lamp = scene
            .spawn_node(NodeDesc::light("lamp", LightData::default()).with_id("lamp"))
            .unwrap();
        (scene, cube, child, lamp)
    }

    #[test]
    fn test_fill_adds_top_level_nodes_only() {
        let (mut scene, _, _, _) = scene();
        let mut graph = GraphController::default();

        let routed = graph.fill(&mut scene, None).unwrap();
        assert_eq!(routed, Some(ObjectRef::Scene));
        assert!(graph.tree().contains("cube"));
        assert!(graph.tree().contains("lamp"));
        assert!(!graph.tree().contains("child"));

        let root = graph.tree().get(DEFAULT_ROOT_ID).unwrap();
        assert!(root.is_expanded());
        assert!(root.is_selected());
        assert_eq!(root.text, "Scene");
    }

    #[test]
    fn test_fill_with_root_adds_descendants() {
        let (mut scene, cube, _, _) = scene();
        let mut graph = GraphController::default();
        graph.fill(&mut scene, None).unwrap();

        assert_eq!(graph.fill(&mut scene, Some(cube)).unwrap(), None);
        assert_eq!(graph.tree().get("child").unwrap().parent(), Some("cube"));
    }

    #[test]
    fn test_fill_with_unknown_root_is_not_found() {
        let (mut scene, cube, _, _) = scene();
        let mut graph = GraphController::default();
        let err = graph.fill(&mut scene, Some(cube)).unwrap_err();
        assert!(matches!(err, GraphError::Tree(TreeError::NotFound(_))));
    }

    #[test]
    fn test_fill_assigns_missing_ids() {
        let mut scene = Scene::new();
        let anonymous = scene.spawn_node(NodeDesc::mesh("anonymous")).unwrap();
        let mut graph = GraphController::default();
        graph.fill(&mut scene, None).unwrap();

        let id = scene.id_of(anonymous).unwrap();
        assert!(!id.is_empty());
        assert_eq!(graph.id_of(anonymous), Some(id.as_str()));
    }

    #[test]
    fn test_instances_are_grouped_under_source() {
        let (mut scene, cube, _, lamp) = scene();
        let instance = scene
            .spawn_node(NodeDesc::instance("copy", cube).with_id("copy").with_parent(lamp))
            .unwrap();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();

        assert_eq!(scene.parent_of(instance), Some(lamp));
        assert_eq!(graph.tree().get("copy").unwrap().parent(), Some("cube"));
    }

    #[test]
    fn test_instance_added_before_nested_source_moves_under_it() {
        let mut scene = Scene::new();
        let holder = scene
            .spawn_node(NodeDesc::mesh("holder").with_id("holder"))
            .unwrap();
        let source = scene
            .spawn_node(NodeDesc::mesh("source").with_id("source").with_parent(holder))
            .unwrap();
        scene
            .spawn_node(NodeDesc::instance("inst", source).with_id("inst"))
            .unwrap();
        let mut graph = GraphController::default();

        graph.fill(&mut scene, None).unwrap();
        assert_eq!(graph.tree().get("inst").unwrap().parent(), Some(DEFAULT_ROOT_ID));

        graph.fill_all(&mut scene).unwrap();
        assert_eq!(graph.tree().get("source").unwrap().parent(), Some("holder"));
        assert_eq!(graph.tree().get("inst").unwrap().parent(), Some("source"));
    }

    #[test]
    fn test_check_parent_leaves_tree_untouched() {
        let (mut scene, cube, _, _) = scene();
        scene
            .spawn_node(NodeDesc::instance("copy", cube).with_id("copy"))
            .unwrap();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();
        let before = graph.tree().revision();

        assert!(matches!(
            graph.check_parent("cube", "copy"),
            Err(GraphError::Tree(TreeError::Cycle { .. }))
        ));
        assert!(graph.check_parent("lamp", "copy").is_ok());
        assert_eq!(graph.tree().revision(), before);
        assert_eq!(graph.tree().get("cube").unwrap().parent(), Some(DEFAULT_ROOT_ID));
    }

    #[test]
    fn test_rename_to_empty_is_rejected() {
        let (mut scene, _, _, _) = scene();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();

        assert!(matches!(graph.rename_node("cube", ""), Err(GraphError::EmptyId)));
        assert!(graph.tree().contains("cube"));
        assert!(!graph.tree().contains(""));
    }

    #[test]
    fn test_set_parent_counts_and_expands() {
        let (mut scene, _, _, _) = scene();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();

        graph.set_parent("lamp", "child").unwrap();
        assert_eq!(graph.child_count("child"), 1);
        assert!(graph.tree().is_visible("lamp"));

        graph.set_parent("lamp", "cube").unwrap();
        graph.set_parent("lamp", "child").unwrap();
        assert_eq!(graph.child_count("child"), 2);
        assert_eq!(graph.child_count("cube"), 1);
    }

    #[test]
    fn test_set_parent_missing_parent() {
        let (mut scene, _, _, _) = scene();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();

        let err = graph.set_parent("lamp", "nowhere").unwrap_err();
        assert!(matches!(err, GraphError::Tree(TreeError::NotFound(id)) if id == "nowhere"));
        assert_eq!(graph.tree().get("lamp").unwrap().parent(), Some(DEFAULT_ROOT_ID));
    }

    #[test]
    fn test_root_is_immutable() {
        let mut graph = GraphController::default();
        graph.fill(&mut Scene::new(), None).unwrap();
        assert!(matches!(
            graph.remove(DEFAULT_ROOT_ID),
            Err(GraphError::RootImmutable(_))
        ));
        assert!(matches!(
            graph.rename_node(DEFAULT_ROOT_ID, "Other"),
            Err(GraphError::RootImmutable(_))
        ));
    }

    #[test]
    fn test_rename_updates_id_and_text() {
        let (mut scene, _, _, _) = scene();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();

        let before = graph.tree().revision();
        graph.rename_node("child", "renamed").unwrap();
        let entry = graph.tree().get("renamed").unwrap();
        assert_eq!(entry.text, "renamed");
        assert!(!graph.tree().contains("child"));
        assert!(graph.tree().revision() > before);
    }

    #[test]
    fn test_select_returns_payload() {
        let (mut scene, _, child, _) = scene();
        let mut graph = GraphController::default();
        graph.fill_all(&mut scene).unwrap();

        assert_eq!(graph.select("child").unwrap(), ObjectRef::Node(child));
        assert_eq!(graph.tree().scroll_target(), Some("child"));
        assert!(graph.tree().get("cube").unwrap().is_expanded());
    }

    #[test]
    fn test_get_icon() {
        assert_eq!(GraphController::get_icon(NodeKind::InstancedMesh), Some(Icon::Mesh));
        assert_eq!(GraphController::get_icon(NodeKind::Light), Some(Icon::Light));
        assert_eq!(GraphController::get_icon(NodeKind::Camera), Some(Icon::Camera));
        assert_eq!(GraphController::get_icon(NodeKind::Sprite2D), None);
    }
}
