use crate::edition::EditionTool;
use crate::form::PropertyForm;
use crate::object::{ObjectRef, TargetKind};
use scene_engine::prelude::{
    ClipData, Container2DData, Dock, Entity, NodeKind, Resize, Scene, SpriteData, Vec2,
};
use tracing::warn;

/// Layout of 2D containers, plus sprite and clip specifics
pub struct Container2DTool {
    form: Option<PropertyForm>,
}

impl Container2DTool {
    pub fn new() -> Self {
        Self { form: None }
    }
}

impl Default for Container2DTool {
    fn default() -> Self {
        Self::new()
    }
}

const HORIZONTAL: Dock = Dock::LEFT
    .union(Dock::RIGHT)
    .union(Dock::CENTER_HORIZONTAL);
const VERTICAL: Dock = Dock::TOP.union(Dock::BOTTOM).union(Dock::CENTER_VERTICAL);

/// Replace the `axis` part of a dock with the flag named `name`
fn redock(dock: Dock, axis: Dock, name: &str) -> Dock {
    let flag = Dock::from_name(name).unwrap_or(Dock::empty()) & axis;
    dock.difference(axis) | flag
}

impl EditionTool for Container2DTool {
    fn tab_name(&self) -> &str {
        "Container 2D"
    }

    fn container_id(&self) -> &str {
        "CONTAINER-2D-TOOL"
    }

    fn supported_kinds(&self) -> &[TargetKind] {
        &[
            TargetKind::Node(NodeKind::Container2D),
            TargetKind::Node(NodeKind::Sprite2D),
            TargetKind::Node(NodeKind::Clip2D),
        ]
    }

    fn update(&mut self, object: ObjectRef, scene: &mut Scene) -> bool {
        let ObjectRef::Node(entity) = object else {
            return false;
        };
        let Ok(kind) = scene.kind(entity) else {
            return false;
        };
        if !kind.is_2d() {
            return false;
        }

        // Undocked containers start at the bottom left corner
        let Ok(layout) = scene.with_mut::<Container2DData, _>(entity, |c| {
            if c.dock.is_empty() {
                c.dock = Dock::LEFT | Dock::BOTTOM;
            }
            *c
        }) else {
            return false;
        };

        let mut complete = true;
        let mut form = PropertyForm::new(self.container_id());
        build_display(&mut form, entity, &layout);
        build_pivot(&mut form, entity, &layout);

        if kind == NodeKind::Clip2D {
            if let Ok(clip) = scene.get::<ClipData>(entity).map(|c| *c) {
                build_clip(&mut form, entity, &clip);
            }
        }

        if kind.is_sprite() {
            complete = build_sprite(&mut form, entity, kind, scene);
        }

        if matches!(kind, NodeKind::Container2D | NodeKind::Clip2D) {
            build_dimensions(&mut form, entity, &layout);
        }

        self.form = Some(form);
        complete
    }

    fn form(&self) -> Option<&PropertyForm> {
        self.form.as_ref()
    }

    fn form_mut(&mut self) -> Option<&mut PropertyForm> {
        self.form.as_mut()
    }
}

fn build_display(form: &mut PropertyForm, entity: Entity, layout: &Container2DData) {
    form.add_folder("Display", None, true);
    form.choice(
        Some("Display"),
        "dockX",
        layout.dock.horizontal_name(),
        &Dock::HORIZONTAL_NAMES,
    )
    .name("Dock X")
    .on_change(move |scene, value| {
        let name = value.as_str().unwrap_or_default().to_string();
        scene.with_mut::<Container2DData, _>(entity, |c| {
            c.dock = redock(c.dock, HORIZONTAL, &name);
        })?;
        Ok(())
    });
    form.choice(
        Some("Display"),
        "dockY",
        layout.dock.vertical_name(),
        &Dock::VERTICAL_NAMES,
    )
    .name("Dock Y")
    .on_change(move |scene, value| {
        let name = value.as_str().unwrap_or_default().to_string();
        scene.with_mut::<Container2DData, _>(entity, |c| {
            c.dock = redock(c.dock, VERTICAL, &name);
        })?;
        Ok(())
    });

    form.choice(
        Some("Display"),
        "resize",
        layout.resize.name(),
        &Resize::NAMES,
    )
    .name("Resize type")
    .rebuild()
    .on_change(move |scene, value| {
        let resize = value
            .as_str()
            .and_then(Resize::from_name)
            .unwrap_or_default();
        scene.with_mut::<Container2DData, _>(entity, |c| c.resize = resize)?;
        Ok(())
    });

    if layout.resize == Resize::Fit {
        form.number(
            Some("Display"),
            "fitCoefficient",
            layout.fit_coefficient as f64,
        )
        .name("Fit coefficient")
        .min(0.0)
        .step(0.01)
        .on_change(move |scene, value| {
            let coefficient = super::number(value);
            scene.with_mut::<Container2DData, _>(entity, |c| c.fit_coefficient = coefficient)?;
            Ok(())
        });
    }
}

fn build_pivot(form: &mut PropertyForm, entity: Entity, layout: &Container2DData) {
    form.add_folder("Pivot", None, false);
    form.number(Some("Pivot"), "pivot.x", layout.pivot.x as f64)
        .name("x")
        .min(0.0)
        .max(1.0)
        .step(0.01)
        .on_change(move |scene, value| {
            let x = super::number(value);
            scene.with_mut::<Container2DData, _>(entity, |c| c.pivot.x = x)?;
            Ok(())
        });
    form.number(Some("Pivot"), "pivot.y", layout.pivot.y as f64)
        .name("y")
        .min(0.0)
        .max(1.0)
        .step(0.01)
        .on_change(move |scene, value| {
            let y = super::number(value);
            scene.with_mut::<Container2DData, _>(entity, |c| c.pivot.y = y)?;
            Ok(())
        });
}

fn build_clip(form: &mut PropertyForm, entity: Entity, clip: &ClipData) {
    form.add_folder("Clip", None, true);

    // A playing clip restarts with the new parameters
    form.number(Some("Clip"), "clip.delay", clip.delay_ms as f64)
        .name("Clip delay")
        .min(0.0)
        .step(1.0)
        .on_change(move |scene, value| {
            let delay = super::count(value);
            scene.with_mut::<ClipData, _>(entity, |c| {
                c.delay_ms = delay;
                if c.is_playing() {
                    c.play(c.delay_ms, c.count);
                }
            })?;
            Ok(())
        });
    form.number(Some("Clip"), "clip.count", clip.count as f64)
        .name("Clip count")
        .min(0.0)
        .step(1.0)
        .on_change(move |scene, value| {
            let count = super::count(value);
            scene.with_mut::<ClipData, _>(entity, |c| {
                c.count = count;
                if c.is_playing() {
                    c.play(c.delay_ms, c.count);
                }
            })?;
            Ok(())
        });

    form.button(Some("Clip"), "clip.play")
        .name("Play clip")
        .on_change(move |scene, _| {
            scene.with_mut::<ClipData, _>(entity, |c| c.play(c.delay_ms, c.count))?;
            Ok(())
        });
    form.button(Some("Clip"), "clip.pause")
        .name("Pause clip")
        .on_change(move |scene, _| {
            scene.with_mut::<ClipData, _>(entity, ClipData::pause)?;
            Ok(())
        });
    form.button(Some("Clip"), "clip.stop")
        .name("Stop clip")
        .on_change(move |scene, _| {
            scene.with_mut::<ClipData, _>(entity, ClipData::stop)?;
            Ok(())
        });
}

/// Returns false when the sprite's current texture is missing
fn build_sprite(form: &mut PropertyForm, entity: Entity, kind: NodeKind, scene: &Scene) -> bool {
    let Ok(sprite) = scene.get::<SpriteData>(entity).map(|s| (*s).clone()) else {
        return false;
    };

    let textures = texture_labels(scene);

    let current = sprite
        .current_texture()
        .and_then(|texture| textures.iter().find(|(_, t)| *t == texture))
        .map(|(name, _)| name.clone());
    if current.is_none() {
        warn!(entity = ?entity, index = sprite.texture_index, "Sprite texture is missing");
    }

    form.add_folder("Sprite", None, true);
    let options: Vec<&str> = textures.iter().map(|(name, _)| name.as_str()).collect();
    let lookup = textures.clone();
    form.choice(
        Some("Sprite"),
        "sprite.texture",
        current.as_deref().unwrap_or_default(),
        &options,
    )
    .name("Texture")
    .on_change(move |scene, value| {
        let picked = value
            .as_str()
            .and_then(|name| lookup.iter().find(|(n, _)| n == name))
            .map(|(_, texture)| *texture);
        if let Some(texture) = picked {
            scene.with_mut::<SpriteData, _>(entity, |s| s.set_texture(texture))?;
        }
        Ok(())
    });

    if kind != NodeKind::Clip2D {
        form.vector2(Some("Sprite"), "sprite.offset", sprite.texture_offset)
            .name("Texture offset")
            .on_change(move |scene, value| {
                let offset = value.as_vec2().unwrap_or(Vec2::ZERO);
                scene.with_mut::<SpriteData, _>(entity, |s| s.texture_offset = offset)?;
                Ok(())
            });
        form.vector2(Some("Sprite"), "sprite.zoom", sprite.texture_scale)
            .name("Texture zoom")
            .on_change(move |scene, value| {
                let zoom = value.as_vec2().unwrap_or(Vec2::ONE);
                scene.with_mut::<SpriteData, _>(entity, |s| s.texture_scale = zoom)?;
                Ok(())
            });
    }

    form.add_folder("Drawing", Some("Sprite"), true);
    form.toggle(Some("Drawing"), "sprite.invertY", sprite.invert_y)
        .name("Invert Y")
        .on_change(move |scene, value| {
            let invert = value.as_bool().unwrap_or_default();
            scene.with_mut::<SpriteData, _>(entity, |s| s.invert_y = invert)?;
            Ok(())
        });

    current.is_some()
}

fn build_dimensions(form: &mut PropertyForm, entity: Entity, layout: &Container2DData) {
    form.add_folder("Dimensions", None, true);
    form.number(Some("Dimensions"), "width", layout.width as f64)
        .name("Width")
        .min(0.0)
        .step(0.01)
        .on_change(move |scene, value| {
            let width = super::number(value);
            scene.with_mut::<Container2DData, _>(entity, |c| c.width = width)?;
            Ok(())
        });
    form.number(Some("Dimensions"), "height", layout.height as f64)
        .name("Height")
        .min(0.0)
        .step(0.01)
        .on_change(move |scene, value| {
            let height = super::number(value);
            scene.with_mut::<Container2DData, _>(entity, |c| c.height = height)?;
            Ok(())
        });
}

/// Scene textures with unique labels; repeated names get a ` (n)` suffix
fn texture_labels(scene: &Scene) -> Vec<(String, Entity)> {
    let mut labels: Vec<(String, Entity)> = Vec::with_capacity(scene.textures().len());
    for &texture in scene.textures() {
        let Ok(name) = scene.texture(texture).map(|t| t.display_name().to_string()) else {
            continue;
        };
        let mut label = name.clone();
        let mut n = 1;
        while labels.iter().any(|(taken, _)| *taken == label) {
            n += 1;
            label = format!("{} ({})", name, n);
        }
        labels.push((label, texture));
    }
    labels
}
