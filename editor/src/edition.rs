//! Edition panel: pluggable tools shown for the selected object

use crate::form::{FieldValue, FormError, PropertyForm};
use crate::object::{ObjectRef, TargetKind};
use scene_engine::prelude::Scene;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Default width of the edition panel, in pixels
pub const DEFAULT_PANEL_WIDTH: f32 = 350.0;

/// A tool editing one family of objects
///
/// Tools keep no state between selections except the form built by their
/// last `update`.
pub trait EditionTool {
    /// Name of the tab shown for this tool
    fn tab_name(&self) -> &str;

    /// Id of the container the tool draws into
    fn container_id(&self) -> &str;

    /// Kinds this tool is registered for in the dispatch table
    fn supported_kinds(&self) -> &[TargetKind];

    /// Whether the tool handles `object`; tools can refine the kind check
    fn is_supported(&self, object: ObjectRef, scene: &Scene) -> bool {
        object
            .target_kind(scene)
            .is_some_and(|kind| self.supported_kinds().contains(&kind))
    }

    /// Rebuild the form for `object`; false when part of it could not be built
    fn update(&mut self, object: ObjectRef, scene: &mut Scene) -> bool;

    /// Commit pending changes, if the tool buffers any
    fn apply(&mut self, _scene: &mut Scene) -> bool {
        false
    }

    fn resize(&mut self, _width: f32) {}

    fn form(&self) -> Option<&PropertyForm>;

    fn form_mut(&mut self) -> Option<&mut PropertyForm>;
}

#[derive(Debug, thiserror::Error)]
pub enum EditionError {
    #[error("Tab '{0}' already exists")]
    DuplicateTab(String),

    #[error("Unknown tab '{0}'")]
    UnknownTab(String),

    #[error("Tab '{0}' is hidden for the current object")]
    TabHidden(String),

    #[error("No edition tool is active")]
    NoActiveTool,

    #[error("Tool '{0}' has no form")]
    NoForm(String),

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Panel area owned by a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolContainer {
    pub id: String,
    pub visible: bool,
    pub width: f32,
}

/// Result of an edit routed through the panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub object: ObjectRef,
    pub path: String,
    pub rebuild: bool,
}

struct ToolSlot {
    tool: Box<dyn EditionTool>,
    container: ToolContainer,
    tab_visible: bool,
}

/// Routes the selected object to the tools able to edit it
pub struct EditionController {
    slots: Vec<ToolSlot>,
    dispatch: HashMap<TargetKind, Vec<usize>>,
    active: Option<usize>,
    object: Option<ObjectRef>,
    width: f32,
}

impl Default for EditionController {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_WIDTH)
    }
}

impl EditionController {
    pub fn new(width: f32) -> Self {
        Self {
            slots: Vec::new(),
            dispatch: HashMap::new(),
            active: None,
            object: None,
            width,
        }
    }

    /// Register a tool with a hidden tab and container
    pub fn add_tool(&mut self, tool: Box<dyn EditionTool>) -> Result<(), EditionError> {
        let tab = tool.tab_name().to_string();
        if self.slot_index(&tab).is_some() {
            return Err(EditionError::DuplicateTab(tab));
        }

        let index = self.slots.len();
        for kind in tool.supported_kinds() {
            let tools = self.dispatch.entry(*kind).or_default();
            if !tools.contains(&index) {
                tools.push(index);
            }
        }

        let container = ToolContainer {
            id: tool.container_id().to_string(),
            visible: false,
            width: self.width,
        };
        debug!(tab = %tab, container = %container.id, "Registered edition tool");
        self.slots.push(ToolSlot {
            tool,
            container,
            tab_visible: false,
        });
        Ok(())
    }

    /// Show the tools supporting `object` and update them
    ///
    /// Returns the number of matching tools. No match hides everything.
    pub fn set_object(&mut self, object: ObjectRef, scene: &mut Scene) -> usize {
        self.object = Some(object);
        self.active = None;
        for slot in &mut self.slots {
            slot.tab_visible = false;
            slot.container.visible = false;
        }

        let Some(kind) = object.target_kind(scene) else {
            warn!(object = ?object, "Selected object no longer exists");
            return 0;
        };
        let candidates = self.dispatch.get(&kind).cloned().unwrap_or_default();

        let mut matched = 0;
        for index in candidates {
            let slot = &mut self.slots[index];
            if !slot.tool.is_supported(object, scene) {
                continue;
            }
            slot.tab_visible = true;
            if !slot.tool.update(object, scene) {
                warn!(tab = %slot.tool.tab_name(), object = ?object, "Tool update was incomplete");
            }
            if self.active.is_none() {
                self.active = Some(index);
            }
            matched += 1;
        }

        if let Some(active) = self.active {
            self.show_only(active);
        }
        debug!(object = ?object, tools = matched, "Edition object changed");
        matched
    }

    /// Forget the current object and hide every tool
    pub fn clear_object(&mut self) {
        self.object = None;
        self.active = None;
        for slot in &mut self.slots {
            slot.tab_visible = false;
            slot.container.visible = false;
        }
    }

    /// Make `tab` the active tool, showing only its container
    pub fn change_tab(&mut self, tab: &str) -> Result<(), EditionError> {
        let index = self
            .slot_index(tab)
            .ok_or_else(|| EditionError::UnknownTab(tab.to_string()))?;
        if !self.slots[index].tab_visible {
            return Err(EditionError::TabHidden(tab.to_string()));
        }
        self.active = Some(index);
        self.show_only(index);
        debug!(tab = %tab, "Changed edition tab");
        Ok(())
    }

    /// Resize every container, visible or not
    pub fn resize(&mut self, width: f32) {
        self.width = width;
        for slot in &mut self.slots {
            slot.container.width = width;
            slot.tool.resize(width);
        }
    }

    /// Route an edit to the active tool's form
    pub fn edit_field(
        &mut self,
        path: &str,
        value: FieldValue,
        scene: &mut Scene,
    ) -> Result<FieldChange, EditionError> {
        let (index, object) = match (self.active, self.object) {
            (Some(index), Some(object)) => (index, object),
            _ => return Err(EditionError::NoActiveTool),
        };
        let slot = &mut self.slots[index];
        let tab = slot.tool.tab_name().to_string();
        let form = slot
            .tool
            .form_mut()
            .ok_or_else(|| EditionError::NoForm(tab.clone()))?;

        let outcome = form.set(path, value, scene)?;
        if outcome.rebuild {
            slot.tool.update(object, scene);
        }
        debug!(tab = %tab, path = %path, rebuild = outcome.rebuild, "Edited field");

        Ok(FieldChange {
            object,
            path: path.to_string(),
            rebuild: outcome.rebuild,
        })
    }

    /// Apply the active tool's pending changes
    pub fn apply(&mut self, scene: &mut Scene) -> bool {
        match self.active {
            Some(index) => self.slots[index].tool.apply(scene),
            None => false,
        }
    }

    pub fn visible_containers(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.container.visible)
            .map(|slot| slot.container.id.as_str())
            .collect()
    }

    pub fn visible_tabs(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|slot| slot.tab_visible)
            .map(|slot| slot.tool.tab_name())
            .collect()
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active.map(|index| self.slots[index].tool.tab_name())
    }

    pub fn tool(&self, tab: &str) -> Option<&dyn EditionTool> {
        self.slot_index(tab).map(|index| self.slots[index].tool.as_ref())
    }

    pub fn container(&self, tab: &str) -> Option<&ToolContainer> {
        self.slot_index(tab).map(|index| &self.slots[index].container)
    }

    /// Form of the active tool
    pub fn active_form(&self) -> Option<&PropertyForm> {
        self.active.and_then(|index| self.slots[index].tool.form())
    }

    pub fn current_object(&self) -> Option<ObjectRef> {
        self.object
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn tool_count(&self) -> usize {
        self.slots.len()
    }

    fn slot_index(&self, tab: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.tool.tab_name() == tab)
    }

    fn show_only(&mut self, index: usize) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.container.visible = i == index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_engine::prelude::{NodeDesc, NodeKind};

    struct FakeTool {
        tab: &'static str,
        kinds: Vec<TargetKind>,
        form: Option<PropertyForm>,
        updates: usize,
        width: f32,
    }

    impl FakeTool {
        fn new(tab: &'static str, kinds: Vec<TargetKind>) -> Self {
            Self {
                tab,
                kinds,
                form: None,
                updates: 0,
                width: 0.0,
            }
        }
    }

    impl EditionTool for FakeTool {
        fn tab_name(&self) -> &str {
            self.tab
        }

        fn container_id(&self) -> &str {
            self.tab
        }

        fn supported_kinds(&self) -> &[TargetKind] {
            &self.kinds
        }

        fn update(&mut self, _object: ObjectRef, _scene: &mut Scene) -> bool {
            self.updates += 1;
            let mut form = PropertyForm::new(self.tab);
            form.number(None, "value", 0.0).min(0.0).max(10.0).rebuild();
            self.form = Some(form);
            true
        }

        fn resize(&mut self, width: f32) {
            self.width = width;
        }

        fn form(&self) -> Option<&PropertyForm> {
            self.form.as_ref()
        }

        fn form_mut(&mut self) -> Option<&mut PropertyForm> {
            self.form.as_mut()
        }
    }

    fn controller() -> EditionController {
        let mut edition = EditionController::default();
        edition
            .add_tool(Box::new(FakeTool::new("scene", vec![TargetKind::Scene])))
            .unwrap();
        edition
            .add_tool(Box::new(FakeTool::new(
                "mesh",
                vec![TargetKind::Node(NodeKind::Mesh)],
            )))
            .unwrap();
        edition
            .add_tool(Box::new(FakeTool::new(
                "node",
                vec![
                    TargetKind::Node(NodeKind::Mesh),
                    TargetKind::Node(NodeKind::Light),
                ],
            )))
            .unwrap();
        edition
    }

    #[test]
    fn test_registered_tools_start_hidden() {
        let edition = controller();
        assert_eq!(edition.tool_count(), 3);
        assert!(edition.visible_containers().is_empty());
        assert!(edition.visible_tabs().is_empty());
        assert_eq!(edition.active_tab(), None);
    }

    #[test]
    fn test_duplicate_tab_is_rejected() {
        let mut edition = controller();
        let err = edition
            .add_tool(Box::new(FakeTool::new("scene", vec![])))
            .unwrap_err();
        assert!(matches!(err, EditionError::DuplicateTab(_)));
    }

    #[test]
    fn test_single_match_shows_only_its_container() {
        let mut scene = Scene::new();
        let mut edition = controller();

        assert_eq!(edition.set_object(ObjectRef::Scene, &mut scene), 1);
        assert_eq!(edition.visible_containers(), vec!["scene"]);
        assert_eq!(edition.active_tab(), Some("scene"));
    }

    #[test]
    fn test_multiple_matches_activate_the_first() {
        let mut scene = Scene::new();
        let mesh = scene.spawn_node(NodeDesc::mesh("cube")).unwrap();
        let mut edition = controller();

        assert_eq!(edition.set_object(ObjectRef::Node(mesh), &mut scene), 2);
        assert_eq!(edition.visible_tabs(), vec!["mesh", "node"]);
        assert_eq!(edition.visible_containers(), vec!["mesh"]);

        edition.change_tab("node").unwrap();
        assert_eq!(edition.visible_containers(), vec!["node"]);
        assert!(matches!(
            edition.change_tab("scene"),
            Err(EditionError::TabHidden(_))
        ));
        assert!(matches!(
            edition.change_tab("missing"),
            Err(EditionError::UnknownTab(_))
        ));
    }

    #[test]
    fn test_no_match_hides_everything() {
        let mut scene = Scene::new();
        let camera = scene
            .spawn_node(NodeDesc::camera("main", Default::default()))
            .unwrap();
        let mut edition = controller();

        edition.set_object(ObjectRef::Scene, &mut scene);
        assert_eq!(edition.set_object(ObjectRef::Node(camera), &mut scene), 0);
        assert!(edition.visible_containers().is_empty());
        assert_eq!(edition.active_tab(), None);
        assert_eq!(edition.current_object(), Some(ObjectRef::Node(camera)));
    }

    #[test]
    fn test_resize_reaches_hidden_containers() {
        let mut edition = controller();
        edition.resize(420.0);
        assert_eq!(edition.container("mesh").unwrap().width, 420.0);
        assert_eq!(edition.width(), 420.0);
    }

    #[test]
    fn test_edit_field_routes_to_active_form() {
        let mut scene = Scene::new();
        let mut edition = controller();
        assert!(matches!(
            edition.edit_field("value", FieldValue::Number(1.0), &mut scene),
            Err(EditionError::NoActiveTool)
        ));

        edition.set_object(ObjectRef::Scene, &mut scene);
        let change = edition
            .edit_field("value", FieldValue::Number(42.0), &mut scene)
            .unwrap();
        assert_eq!(change.object, ObjectRef::Scene);
        assert!(change.rebuild);

        // The rebuild recreated the form from scratch
        let form = edition.active_form().unwrap();
        assert_eq!(form.value("value"), Some(&FieldValue::Number(0.0)));
    }
}
