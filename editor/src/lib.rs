//! Scene graph editor core
//!
//! This crate provides the editor model for scene browsing and property
//! editing: a tree view of the scene graph, an edition panel with pluggable
//! tools, declarative property forms, an event bus and a texture browser.
//! Drawing the widgets is left to the host.

pub mod edition;
pub mod editor_state;
pub mod error;
pub mod events;
pub mod form;
pub mod graph;
pub mod hooks;
pub mod object;
pub mod scene_operations;
pub mod settings;
pub mod texture_browser;
pub mod tools;
pub mod tree;

pub use edition::{EditionController, EditionError, EditionTool, FieldChange, ToolContainer};
pub use editor_state::EditorState;
pub use error::EditorError;
pub use events::{Event, EventBus, EventReceiver, GuiEventKind, SceneEventKind};
pub use form::{Control, FieldValue, FormError, PropertyForm};
pub use graph::{GraphController, GraphError};
pub use hooks::{FrameUpdate, HookError, UpdateHooks};
pub use object::{ObjectRef, TargetKind};
pub use settings::EditorSettings;
pub use texture_browser::{TextureBrowser, TextureSlot, TextureTarget};
pub use tree::{Icon, TreeEntry, TreeError, TreeView};
