//! Main editor state management
//!
//! This module contains the EditorState struct which owns the scene and
//! wires the scene graph, the edition panel, the event bus and the frame
//! hooks together. Every mutation goes through it so the tree, the panel
//! and the listeners stay consistent.

use crate::edition::{EditionController, FieldChange};
use crate::error::EditorError;
use crate::events::{Event, EventBus, GuiEventKind, SceneEventKind};
use crate::form::FieldValue;
use crate::graph::{GraphController, GraphError};
use crate::hooks::{FrameUpdate, HookId, UpdateHooks};
use crate::object::ObjectRef;
use crate::scene_operations::create_default_scene;
use crate::settings::EditorSettings;
use crate::texture_browser::{TextureBrowser, TextureSelection, TextureTarget};
use crate::tools::default_tools;
use crate::tree::TreeError;
use scene_engine::prelude::{Entity, NodeDesc, Scene, Texture};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Main editor state that manages all editor functionality
pub struct EditorState {
    /// The edited scene
    scene: Scene,
    /// Bus shared with every listener
    bus: Rc<EventBus>,
    /// Tree view of the scene graph
    graph: GraphController,
    /// Tools shown for the selected object
    edition: EditionController,
    /// Hooks run around each frame update
    hooks: UpdateHooks,
    /// Open texture browser, if any
    texture_browser: Option<Rc<RefCell<TextureBrowser>>>,
    settings: EditorSettings,
}

impl EditorState {
    /// Create a new editor state with the built-in edition tools
    pub fn new(settings: EditorSettings) -> Result<Self, EditorError> {
        info!("Initializing editor state");

        let graph = GraphController::new(
            settings.graph.root_id.clone(),
            settings.graph.root_label.clone(),
        );
        let mut edition = EditionController::new(settings.edition.panel_width);
        for tool in default_tools() {
            edition.add_tool(tool)?;
        }

        Ok(Self {
            scene: Scene::new(),
            bus: EventBus::new(),
            graph,
            edition,
            hooks: UpdateHooks::new(),
            texture_browser: None,
            settings,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn graph(&self) -> &GraphController {
        &self.graph
    }

    pub fn edition(&self) -> &EditionController {
        &self.edition
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    fn send(&self, event: Event) -> usize {
        self.bus.send(&event, &self.scene)
    }

    /// Rebuild the whole tree and route the scene to the edition panel
    pub fn fill(&mut self) -> Result<ObjectRef, EditorError> {
        let routed = self.graph.fill_all(&mut self.scene)?;
        if self.settings.graph.auto_select_root {
            self.edition.set_object(routed, &mut self.scene);
        }
        Ok(routed)
    }

    /// Select a tree entry and show the tools able to edit it
    pub fn select(&mut self, id: &str) -> Result<ObjectRef, EditorError> {
        let object = self.graph.select(id)?;
        let tools = self.edition.set_object(object, &mut self.scene);
        debug!(id = %id, tools = tools, "Selected object");
        self.send(Event::scene(SceneEventKind::ObjectPicked, object));
        Ok(object)
    }

    pub fn select_entity(&mut self, entity: Entity) -> Result<ObjectRef, EditorError> {
        let id = self
            .graph
            .id_of(entity)
            .ok_or(EditorError::NotInGraph(entity))?
            .to_string();
        self.select(&id)
    }

    /// Spawn a node and add its tree entry
    pub fn add_node(&mut self, desc: NodeDesc) -> Result<Entity, EditorError> {
        let entity = self.scene.spawn_node(desc)?;
        let id = self.graph.add_node(&mut self.scene, entity)?;
        info!(id = %id, "Added node");
        self.send(Event::scene(
            SceneEventKind::ObjectAdded,
            ObjectRef::Node(entity),
        ));
        Ok(entity)
    }

    pub fn add_texture(&mut self, texture: Texture) -> Entity {
        let entity = self.scene.add_texture(texture);
        self.send(Event::scene(
            SceneEventKind::ObjectAdded,
            ObjectRef::Texture(entity),
        ));
        entity
    }

    /// Remove a node with its descendants and instances, in the scene and the tree
    pub fn remove_node(&mut self, entity: Entity) -> Result<Vec<Entity>, EditorError> {
        let removed = self.scene.remove_node(entity)?;

        // Instances are grouped under their source, not their scene parent
        for &node in &removed {
            if let Some(id) = self.graph.id_of(node).map(str::to_string) {
                self.graph.remove(&id)?;
            }
        }

        if self
            .edition
            .current_object()
            .and_then(ObjectRef::entity)
            .is_some_and(|current| removed.contains(&current))
        {
            self.edition.clear_object();
        }

        info!(count = removed.len(), "Removed node");
        self.send(Event::scene(
            SceneEventKind::ObjectRemoved,
            ObjectRef::Node(entity),
        ));

        // The browser closes itself when its target goes away
        if self
            .texture_browser
            .as_ref()
            .is_some_and(|browser| !browser.borrow().is_open())
        {
            self.texture_browser = None;
        }
        Ok(removed)
    }

    pub fn remove_texture(&mut self, texture: Entity) -> Result<(), EditorError> {
        self.scene.remove_texture(texture)?;
        self.send(Event::scene(
            SceneEventKind::ObjectRemoved,
            ObjectRef::Texture(texture),
        ));
        Ok(())
    }

    /// Move a node under `parent`, or to the top level
    ///
    /// The tree move is checked before the scene changes, so a rejected
    /// move leaves both untouched.
    pub fn reparent(&mut self, entity: Entity, parent: Option<Entity>) -> Result<(), EditorError> {
        let is_instance = self.scene.instance_source(entity).is_some();
        let entry = self.graph.id_of(entity).map(str::to_string);

        let tree_move = match entry {
            Some(id) if !is_instance => {
                let parent_id = match parent {
                    Some(parent) => self
                        .graph
                        .id_of(parent)
                        .ok_or(EditorError::NotInGraph(parent))?
                        .to_string(),
                    None => self.graph.root_id().to_string(),
                };
                self.graph.check_parent(&id, &parent_id)?;
                Some((id, parent_id))
            }
            _ => None,
        };

        self.scene.set_parent(entity, parent)?;

        match tree_move {
            Some((id, parent_id)) => self.graph.set_parent(&id, &parent_id)?,
            None if is_instance => {
                debug!(entity = ?entity, "Instance entry stays under its source");
            }
            None => {
                self.graph.add_node(&mut self.scene, entity)?;
            }
        }

        self.send(Event::scene(
            SceneEventKind::ObjectReparented,
            ObjectRef::Node(entity),
        ));
        Ok(())
    }

    /// Rename a node; its id and name both become `name`
    pub fn rename(&mut self, entity: Entity, name: &str) -> Result<(), EditorError> {
        if name.is_empty() {
            return Err(GraphError::EmptyId.into());
        }
        let id = self
            .graph
            .id_of(entity)
            .ok_or(EditorError::NotInGraph(entity))?
            .to_string();
        if self
            .scene
            .find_by_id(name)
            .is_some_and(|other| other != entity)
        {
            warn!(id = %id, name = %name, "Rename rejected, id already in use");
            return Err(GraphError::from(TreeError::DuplicateId(name.to_string())).into());
        }

        self.graph.rename_node(&id, name)?;
        self.scene.set_name(entity, name)?;
        self.scene.set_id(entity, name)?;
        info!(from = %id, to = %name, "Renamed node");

        self.send(Event::scene(
            SceneEventKind::ObjectRenamed,
            ObjectRef::Node(entity),
        ));
        Ok(())
    }

    pub fn change_tab(&mut self, tab: &str) -> Result<(), EditorError> {
        self.edition.change_tab(tab)?;
        self.send(Event::gui(GuiEventKind::TabChanged, Some(tab.to_string())));
        Ok(())
    }

    /// Edit a field of the active tool and notify listeners
    pub fn edit_field(&mut self, path: &str, value: FieldValue) -> Result<FieldChange, EditorError> {
        let change = self.edition.edit_field(path, value, &mut self.scene)?;
        self.send(Event::scene(SceneEventKind::ObjectChanged, change.object));
        if change.rebuild {
            self.send(Event::gui(
                GuiEventKind::FormChanged,
                self.edition.active_tab().map(str::to_string),
            ));
        }
        Ok(change)
    }

    /// Apply the active tool; returns whether it changed anything
    pub fn apply(&mut self) -> bool {
        let applied = self.edition.apply(&mut self.scene);
        if applied {
            if let Some(object) = self.edition.current_object() {
                self.send(Event::scene(SceneEventKind::ObjectChanged, object));
            }
        }
        applied
    }

    pub fn resize(&mut self, width: f32) {
        self.edition.resize(width);
        self.send(Event::gui(GuiEventKind::LayoutChanged, None));
    }

    /// Replace the scene with an empty one
    pub fn new_scene(&mut self) -> Result<(), EditorError> {
        self.scene.clear();
        self.reset()
    }

    /// Replace the scene with the default content
    pub fn load_default_scene(&mut self) -> Result<(), EditorError> {
        create_default_scene(&mut self.scene)?;
        self.reset()
    }

    fn reset(&mut self) -> Result<(), EditorError> {
        self.edition.clear_object();
        self.fill()?;
        info!(nodes = self.scene.node_count(), "New scene created");
        self.send(Event::scene(SceneEventKind::NewSceneCreated, ObjectRef::Scene));
        Ok(())
    }

    /// Open the texture browser, replacing any browser already open
    pub fn open_texture_browser(
        &mut self,
        target: Option<TextureTarget>,
    ) -> Result<Rc<RefCell<TextureBrowser>>, EditorError> {
        self.close_texture_browser();
        let browser = TextureBrowser::open(&self.bus, &self.scene, target)?;
        self.texture_browser = Some(browser.clone());
        Ok(browser)
    }

    pub fn close_texture_browser(&mut self) {
        if let Some(browser) = self.texture_browser.take() {
            browser.borrow_mut().close();
        }
    }

    /// Click a row of the open texture browser
    pub fn select_texture(&mut self, index: usize) -> Result<TextureSelection, EditorError> {
        let browser = self
            .texture_browser
            .clone()
            .ok_or(EditorError::NoTextureBrowser)?;
        let selection = browser.borrow_mut().select(index, &mut self.scene)?;
        if let Some(event) = &selection.event {
            self.bus.send(event, &self.scene);
        }
        Ok(selection)
    }

    pub fn register_hook(&mut self, hook: Box<dyn FrameUpdate>) -> HookId {
        self.hooks.register(hook)
    }

    pub fn unregister_hook(&mut self, id: HookId) -> bool {
        self.hooks.unregister(id)
    }

    /// Run the pre-update hooks; returns the number of failures
    pub fn pre_update(&mut self) -> usize {
        self.hooks.pre_update(&mut self.scene)
    }

    /// Run the post-update hooks; returns the number of failures
    pub fn post_update(&mut self) -> usize {
        self.hooks.post_update(&mut self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventReceiver;
    use crate::texture_browser::TextureSlot;
    use scene_engine::prelude::{Material, Transform, Vec3};

    #[derive(Default)]
    struct Journal {
        channels: Vec<&'static str>,
    }

    impl EventReceiver for Journal {
        fn on_event(&mut self, event: &Event, _scene: &Scene) -> bool {
            self.channels.push(event.channel());
            true
        }
    }

    fn editor() -> (EditorState, Rc<RefCell<Journal>>) {
        let mut editor = EditorState::new(EditorSettings::default()).unwrap();
        editor.load_default_scene().unwrap();
        let journal = Rc::new(RefCell::new(Journal::default()));
        editor.bus().register(&journal);
        (editor, journal)
    }

    #[test]
    fn test_default_scene_is_projected() {
        let (editor, _) = editor();
        // Root plus every node
        assert_eq!(editor.graph().tree().len(), editor.scene().node_count() + 1);
        assert_eq!(editor.edition().active_tab(), Some("Scene"));
    }

    #[test]
    fn test_select_routes_to_tools() {
        let (mut editor, journal) = editor();
        let light = editor.scene().lights()[0];

        editor.select_entity(light).unwrap();
        assert_eq!(editor.edition().visible_tabs(), vec!["Node", "Light"]);
        assert_eq!(editor.edition().active_tab(), Some("Node"));

        editor.change_tab("Light").unwrap();
        assert_eq!(editor.edition().visible_containers(), vec!["LIGHT-TOOL"]);
        assert_eq!(
            journal.borrow().channels,
            vec!["scene.object_picked", "gui.tab_changed"]
        );
    }

    #[test]
    fn test_edit_field_sends_object_changed() {
        let (mut editor, journal) = editor();
        let cube = editor.scene().meshes()[0];
        editor.select_entity(cube).unwrap();

        editor
            .edit_field("position", FieldValue::Vector3(Vec3::Y))
            .unwrap();
        assert_eq!(
            editor.scene().get::<Transform>(cube).unwrap().position,
            Vec3::Y
        );
        assert_eq!(
            journal.borrow().channels.last(),
            Some(&"scene.object_changed")
        );
    }

    #[test]
    fn test_remove_node_drops_entries_and_panel_object() {
        let (mut editor, _) = editor();
        let cube = editor.scene().meshes()[0];
        let instance = editor.scene().meshes()[1];
        editor.select_entity(instance).unwrap();

        let removed = editor.remove_node(cube).unwrap();
        assert!(removed.contains(&instance));
        assert!(editor.graph().id_of(cube).is_none());
        assert!(editor.graph().id_of(instance).is_none());
        assert_eq!(editor.edition().current_object(), None);
        assert!(editor.edition().visible_containers().is_empty());
    }

    #[test]
    fn test_rename_updates_scene_and_tree() {
        let (mut editor, _) = editor();
        let cube = editor.scene().meshes()[0];

        editor.rename(cube, "Box").unwrap();
        assert_eq!(editor.scene().name_of(cube).unwrap(), "Box");
        assert_eq!(editor.scene().find_by_id("Box"), Some(cube));
        assert_eq!(editor.graph().id_of(cube), Some("Box"));
        assert_eq!(editor.graph().tree().get("Box").unwrap().text, "Box");
    }

    #[test]
    fn test_reparent_moves_entry() {
        let (mut editor, journal) = editor();
        let cube = editor.scene().meshes()[0];
        let camera = editor.scene().cameras()[0];

        editor.reparent(camera, Some(cube)).unwrap();
        let camera_id = editor.graph().id_of(camera).unwrap().to_string();
        let cube_id = editor.graph().id_of(cube).unwrap().to_string();
        assert_eq!(
            editor.graph().tree().get(&camera_id).unwrap().parent(),
            Some(cube_id.as_str())
        );
        assert_eq!(
            journal.borrow().channels.last(),
            Some(&"scene.object_reparented")
        );

        // Moving a node under its own descendant is a cycle
        assert!(editor.reparent(cube, Some(camera)).is_err());
    }

    #[test]
    fn test_rejected_reparent_leaves_scene_and_tree_in_sync() {
        let (mut editor, journal) = editor();
        let cube = editor.scene().meshes()[0];
        let instance = editor.scene().meshes()[1];
        assert_eq!(editor.scene().instance_source(instance), Some(cube));
        let cube_id = editor.graph().id_of(cube).unwrap().to_string();

        // The instance entry sits under the cube entry
        let err = editor.reparent(cube, Some(instance)).unwrap_err();
        assert!(matches!(
            err,
            EditorError::Graph(GraphError::Tree(TreeError::Cycle { .. }))
        ));
        assert_eq!(editor.scene().parent_of(cube), None);
        assert_eq!(
            editor.graph().tree().get(&cube_id).unwrap().parent(),
            Some(editor.graph().root_id())
        );
        assert!(journal.borrow().channels.is_empty());
    }

    #[test]
    fn test_reparent_under_node_missing_from_graph_changes_nothing() {
        let (mut editor, _) = editor();
        let camera = editor.scene().cameras()[0];
        let cube = editor.scene().meshes()[0];
        let cube_id = editor.graph().id_of(cube).unwrap().to_string();
        editor.graph.remove(&cube_id).unwrap();

        let err = editor.reparent(camera, Some(cube)).unwrap_err();
        assert!(matches!(err, EditorError::NotInGraph(node) if node == cube));
        assert_eq!(editor.scene().parent_of(camera), None);
    }

    #[test]
    fn test_rename_to_empty_is_rejected() {
        let (mut editor, _) = editor();
        let cube = editor.scene().meshes()[0];
        let id = editor.graph().id_of(cube).unwrap().to_string();

        let err = editor.rename(cube, "").unwrap_err();
        assert!(matches!(err, EditorError::Graph(GraphError::EmptyId)));
        assert_eq!(editor.scene().id_of(cube).unwrap(), id);
        assert_eq!(editor.graph().id_of(cube), Some(id.as_str()));

        let child = editor
            .add_node(NodeDesc::mesh("child").with_parent(cube))
            .unwrap();
        let child_id = editor.graph().id_of(child).unwrap().to_string();
        assert_eq!(
            editor.graph().tree().get(&child_id).unwrap().parent(),
            Some(id.as_str())
        );
    }

    #[test]
    fn test_rename_onto_used_id_is_duplicate() {
        let (mut editor, _) = editor();
        let cube = editor.scene().meshes()[0];
        let plane = editor.scene().meshes()[2];
        let plane_id = editor.scene().id_of(plane).unwrap();

        let err = editor.rename(cube, &plane_id).unwrap_err();
        assert!(matches!(
            err,
            EditorError::Graph(GraphError::Tree(TreeError::DuplicateId(id))) if id == plane_id
        ));
    }

    #[test]
    fn test_removing_browser_target_closes_browser() {
        let (mut editor, _) = editor();
        let logo = editor.scene().nodes_2d()[1];
        editor
            .open_texture_browser(Some(TextureTarget::new(logo, TextureSlot::SpriteTexture)))
            .unwrap();

        editor.remove_node(logo).unwrap();
        assert!(matches!(
            editor.select_texture(0),
            Err(EditorError::NoTextureBrowser)
        ));
    }

    #[test]
    fn test_texture_browser_assigns_through_editor() {
        let (mut editor, journal) = editor();
        let cube = editor.scene().meshes()[0];
        let grass = editor.scene().textures()[0];

        let browser = editor
            .open_texture_browser(Some(TextureTarget::new(cube, TextureSlot::DiffuseTexture)))
            .unwrap();
        let selection = editor.select_texture(0).unwrap();
        assert!(selection.assigned);
        assert_eq!(
            editor.scene().get::<Material>(cube).unwrap().diffuse_texture,
            Some(grass)
        );
        assert_eq!(
            journal.borrow().channels.last(),
            Some(&"scene.object_changed")
        );

        editor.add_texture(Texture::new("stone", 8, 8));
        assert_eq!(browser.borrow().rows().len(), 3);

        editor.close_texture_browser();
        assert!(matches!(
            editor.select_texture(0),
            Err(EditorError::NoTextureBrowser)
        ));
    }

    #[test]
    fn test_new_scene_resets_everything() {
        let (mut editor, journal) = editor();
        editor.new_scene().unwrap();
        assert_eq!(editor.scene().node_count(), 0);
        assert_eq!(editor.graph().tree().len(), 1);
        assert_eq!(
            journal.borrow().channels.last(),
            Some(&"scene.new_scene_created")
        );
    }
}
