use crate::edition::EditionTool;
use crate::form::PropertyForm;
use crate::object::{ObjectRef, TargetKind};
use scene_engine::prelude::Scene;

/// Scene-wide settings: colors and fog
pub struct SceneTool {
    form: Option<PropertyForm>,
}

impl SceneTool {
    pub fn new() -> Self {
        Self { form: None }
    }
}

impl Default for SceneTool {
    fn default() -> Self {
        Self::new()
    }
}

impl EditionTool for SceneTool {
    fn tab_name(&self) -> &str {
        "Scene"
    }

    fn container_id(&self) -> &str {
        "SCENE-TOOL"
    }

    fn supported_kinds(&self) -> &[TargetKind] {
        &[TargetKind::Scene]
    }

    fn update(&mut self, object: ObjectRef, scene: &mut Scene) -> bool {
        if object != ObjectRef::Scene {
            return false;
        }
        let settings = &scene.settings;
        let mut form = PropertyForm::new(self.container_id());

        form.add_folder("Colors", None, true);
        form.color(Some("Colors"), "clearColor", settings.clear_color)
            .name("Clear color")
            .on_change(|scene, value| {
                scene.settings.clear_color = value.as_vec3().unwrap_or(scene.settings.clear_color);
                Ok(())
            });
        form.color(Some("Colors"), "ambientColor", settings.ambient_color)
            .name("Ambient color")
            .on_change(|scene, value| {
                scene.settings.ambient_color =
                    value.as_vec3().unwrap_or(scene.settings.ambient_color);
                Ok(())
            });

        form.add_folder("Fog", None, false);
        form.toggle(Some("Fog"), "fogEnabled", settings.fog_enabled)
            .name("Enabled")
            .on_change(|scene, value| {
                scene.settings.fog_enabled = value.as_bool().unwrap_or(scene.settings.fog_enabled);
                Ok(())
            });
        form.number(Some("Fog"), "fogDensity", settings.fog_density as f64)
            .name("Density")
            .min(0.0)
            .max(1.0)
            .step(0.001)
            .on_change(|scene, value| {
                scene.settings.fog_density = super::number(value);
                Ok(())
            });

        self.form = Some(form);
        true
    }

    fn form(&self) -> Option<&PropertyForm> {
        self.form.as_ref()
    }

    fn form_mut(&mut self) -> Option<&mut PropertyForm> {
        self.form.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldValue;
    use scene_engine::prelude::Vec3;

    #[test]
    fn test_scene_settings_are_bound() {
        let mut scene = Scene::new();
        let mut tool = SceneTool::new();
        assert!(tool.update(ObjectRef::Scene, &mut scene));

        let form = tool.form_mut().unwrap();
        form.set("clearColor", FieldValue::Color(Vec3::X), &mut scene)
            .unwrap();
        form.set("fogEnabled", FieldValue::Bool(true), &mut scene)
            .unwrap();
        form.set("fogDensity", FieldValue::Number(3.0), &mut scene)
            .unwrap();

        assert_eq!(scene.settings.clear_color, Vec3::X);
        assert!(scene.settings.fog_enabled);
        assert_eq!(scene.settings.fog_density, 1.0);
    }
}
