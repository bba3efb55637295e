//! Texture browser: lists scene textures and assigns them to a node property

use crate::events::{Event, EventBus, EventReceiver, GuiEventKind, ReceiverId, SceneEventKind};
use crate::object::ObjectRef;
use scene_engine::prelude::{Entity, Material, Scene, SceneError, SpriteData};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TextureBrowserError {
    #[error("No texture at row {0}")]
    RowNotFound(usize),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Texture property of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// Current frame of a sprite or clip
    SpriteTexture,
    /// Diffuse texture of a mesh material
    DiffuseTexture,
}

impl TextureSlot {
    fn current(self, scene: &Scene, object: Entity) -> Result<Option<Entity>, SceneError> {
        match self {
            TextureSlot::SpriteTexture => Ok(scene.get::<SpriteData>(object)?.current_texture()),
            TextureSlot::DiffuseTexture => Ok(scene.get::<Material>(object)?.diffuse_texture),
        }
    }

    fn assign(self, scene: &mut Scene, object: Entity, texture: Entity) -> Result<(), SceneError> {
        match self {
            TextureSlot::SpriteTexture => {
                scene.with_mut::<SpriteData, _>(object, |s| s.set_texture(texture))
            }
            TextureSlot::DiffuseTexture => {
                scene.with_mut::<Material, _>(object, |m| m.diffuse_texture = Some(texture))
            }
        }
    }
}

/// Property the browser assigns the selected texture to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureTarget {
    pub object: Entity,
    pub slot: TextureSlot,
    pub allow_cubes: bool,
}

impl TextureTarget {
    pub fn new(object: Entity, slot: TextureSlot) -> Self {
        Self {
            object,
            slot,
            allow_cubes: true,
        }
    }

    pub fn without_cubes(mut self) -> Self {
        self.allow_cubes = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    Cube,
    RenderTarget,
}

/// One line of the texture list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRow {
    pub texture: Entity,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub style: RowStyle,
}

/// Outcome of clicking a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSelection {
    pub texture: Entity,
    /// The target property now holds the texture
    pub assigned: bool,
    /// Event for the caller to send once the browser is released
    pub event: Option<Event>,
}

pub struct TextureBrowser {
    bus: Rc<EventBus>,
    receiver: Option<ReceiverId>,
    target: Option<TextureTarget>,
    rows: Vec<TextureRow>,
    selected: Option<Entity>,
    preview_dirty: bool,
    needs_resize: bool,
}

impl TextureBrowser {
    /// Open the browser and register it on `bus`
    ///
    /// With a target whose property already holds a texture, that texture
    /// starts selected.
    pub fn open(
        bus: &Rc<EventBus>,
        scene: &Scene,
        target: Option<TextureTarget>,
    ) -> Result<Rc<RefCell<Self>>, TextureBrowserError> {
        let selected = match target {
            Some(target) => target.slot.current(scene, target.object)?,
            None => None,
        };

        let mut browser = Self {
            bus: bus.clone(),
            receiver: None,
            target,
            rows: Vec::new(),
            selected,
            preview_dirty: selected.is_some(),
            needs_resize: false,
        };
        browser.fill(scene);

        let browser = Rc::new(RefCell::new(browser));
        let id = bus.register(&browser);
        browser.borrow_mut().receiver = Some(id);
        info!(textures = browser.borrow().rows.len(), "Opened texture browser");
        Ok(browser)
    }

    /// Unregister from the bus
    pub fn close(&mut self) {
        if let Some(id) = self.receiver.take() {
            self.bus.unregister(id);
            debug!("Closed texture browser");
        }
    }

    /// Still registered on the bus
    pub fn is_open(&self) -> bool {
        self.receiver.is_some()
    }

    fn fill(&mut self, scene: &Scene) {
        self.rows = scene
            .textures()
            .iter()
            .filter_map(|&entity| {
                let texture = scene.texture(entity).ok()?;
                let style = if texture.is_cube {
                    RowStyle::Cube
                } else if texture.is_render_target {
                    RowStyle::RenderTarget
                } else {
                    RowStyle::Plain
                };
                Some(TextureRow {
                    texture: entity,
                    name: texture.display_name().to_string(),
                    width: texture.width,
                    height: texture.height,
                    style,
                })
            })
            .collect();

        if self
            .selected
            .is_some_and(|selected| !self.rows.iter().any(|row| row.texture == selected))
        {
            self.selected = None;
        }
    }

    /// Select the texture at `index`
    ///
    /// With a target the texture is assigned to it, unless it is a cube the
    /// target does not accept. Without a target the returned event reports
    /// the pick.
    pub fn select(
        &mut self,
        index: usize,
        scene: &mut Scene,
    ) -> Result<TextureSelection, TextureBrowserError> {
        let row = self
            .rows
            .get(index)
            .ok_or(TextureBrowserError::RowNotFound(index))?;
        let texture = row.texture;
        let is_cube = row.style == RowStyle::Cube;

        self.selected = Some(texture);
        self.preview_dirty = true;

        let mut assigned = false;
        let event = match self.target {
            Some(target) => {
                if target.allow_cubes || !is_cube {
                    target.slot.assign(scene, target.object, texture)?;
                    assigned = true;
                    Some(Event::scene(
                        SceneEventKind::ObjectChanged,
                        ObjectRef::Node(target.object),
                    ))
                } else {
                    debug!(texture = ?texture, "Cube texture rejected by target");
                    None
                }
            }
            None => Some(Event::scene(
                SceneEventKind::ObjectPicked,
                ObjectRef::Texture(texture),
            )),
        };

        Ok(TextureSelection {
            texture,
            assigned,
            event,
        })
    }

    /// Property rows shown when a texture row is expanded
    pub fn details(
        &self,
        index: usize,
        scene: &Scene,
    ) -> Result<Vec<(&'static str, String)>, TextureBrowserError> {
        let row = self
            .rows
            .get(index)
            .ok_or(TextureBrowserError::RowNotFound(index))?;
        let texture = scene.texture(row.texture)?;

        let mut details = vec![
            ("width", texture.width.to_string()),
            ("height", texture.height.to_string()),
            ("name", texture.display_name().to_string()),
        ];
        if let Some(url) = &texture.url {
            details.push(("url", url.clone()));
        }
        Ok(details)
    }

    pub fn rows(&self) -> &[TextureRow] {
        &self.rows
    }

    pub fn target(&self) -> Option<TextureTarget> {
        self.target
    }

    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected?;
        self.rows.iter().position(|row| row.texture == selected)
    }

    /// The preview must be redrawn
    pub fn preview_dirty(&self) -> bool {
        self.preview_dirty
    }

    /// The preview must be resized to the new layout
    pub fn needs_resize(&self) -> bool {
        self.needs_resize
    }

    /// Acknowledge a redraw and resize of the preview
    pub fn mark_presented(&mut self) {
        self.preview_dirty = false;
        self.needs_resize = false;
    }
}

impl EventReceiver for TextureBrowser {
    fn on_event(&mut self, event: &Event, scene: &Scene) -> bool {
        match event {
            Event::Scene(event) => match event.kind {
                SceneEventKind::ObjectRemoved
                    if self.target.is_some_and(|target| !scene.contains(target.object)) =>
                {
                    info!("Texture browser target removed, closing");
                    self.target = None;
                    self.close();
                }
                SceneEventKind::ObjectAdded
                | SceneEventKind::ObjectRemoved
                | SceneEventKind::NewSceneCreated => self.fill(scene),
                SceneEventKind::ObjectChanged => {
                    if let ObjectRef::Texture(texture) = event.object {
                        if Some(texture) == self.selected {
                            self.preview_dirty = true;
                        }
                    }
                }
                _ => {}
            },
            Event::Gui(event) => {
                if event.kind == GuiEventKind::LayoutChanged {
                    self.needs_resize = true;
                }
            }
        }
        false
    }
}
