use crate::edition::EditionTool;
use crate::form::PropertyForm;
use crate::object::{ObjectRef, TargetKind};
use scene_engine::prelude::{LightData, NodeKind, Scene};

/// Light intensity, range and colors
pub struct LightTool {
    form: Option<PropertyForm>,
}

impl LightTool {
    pub fn new() -> Self {
        Self { form: None }
    }
}

impl Default for LightTool {
    fn default() -> Self {
        Self::new()
    }
}

impl EditionTool for LightTool {
    fn tab_name(&self) -> &str {
        "Light"
    }

    fn container_id(&self) -> &str {
        "LIGHT-TOOL"
    }

    fn supported_kinds(&self) -> &[TargetKind] {
        &[TargetKind::Node(NodeKind::Light)]
    }

    fn update(&mut self, object: ObjectRef, scene: &mut Scene) -> bool {
        let ObjectRef::Node(entity) = object else {
            return false;
        };
        let Ok(light) = scene.get::<LightData>(entity).map(|l| *l) else {
            return false;
        };

        let mut form = PropertyForm::new(self.container_id());
        form.text(None, "kind", &format!("{:?}", light.kind))
            .name("Type")
            .read_only();
        form.number(None, "intensity", light.intensity as f64)
            .name("Intensity")
            .min(0.0)
            .step(0.01)
            .on_change(move |scene, value| {
                let intensity = super::number(value);
                scene.with_mut::<LightData, _>(entity, |l| l.intensity = intensity)?;
                Ok(())
            });
        form.number(None, "range", light.range as f64)
            .name("Range")
            .min(0.0)
            .on_change(move |scene, value| {
                let range = super::number(value);
                scene.with_mut::<LightData, _>(entity, |l| l.range = range)?;
                Ok(())
            });

        form.add_folder("Colors", None, true);
        form.color(Some("Colors"), "diffuse", light.diffuse)
            .name("Diffuse")
            .on_change(move |scene, value| {
                if let Some(color) = value.as_vec3() {
                    scene.with_mut::<LightData, _>(entity, |l| l.diffuse = color)?;
                }
                Ok(())
            });
        form.color(Some("Colors"), "specular", light.specular)
            .name("Specular")
            .on_change(move |scene, value| {
                if let Some(color) = value.as_vec3() {
                    scene.with_mut::<LightData, _>(entity, |l| l.specular = color)?;
                }
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
    use scene_engine::prelude::{LightKind, NodeDesc, Vec3};

    #[test]
    fn test_light_fields() {
        let mut scene = Scene::new();
        let sun = scene
            .spawn_node(NodeDesc::light("sun", LightData::new(LightKind::Directional)))
            .unwrap();
        let mut tool = LightTool::new();
        assert!(tool.update(ObjectRef::Node(sun), &mut scene));

        let form = tool.form_mut().unwrap();
        assert_eq!(form.value("kind"), Some(&FieldValue::Text("Directional".into())));

        form.set("intensity", FieldValue::Number(-1.0), &mut scene)
            .unwrap();
        form.set("diffuse", FieldValue::Color(Vec3::new(1.0, 0.5, 0.0)), &mut scene)
            .unwrap();

        let light = *scene.get::<LightData>(sun).unwrap();
        assert_eq!(light.intensity, 0.0);
        assert_eq!(light.diffuse, Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_meshes_are_not_lights() {
        let mut scene = Scene::new();
        let cube = scene.spawn_node(NodeDesc::mesh("cube")).unwrap();
        let mut tool = LightTool::new();
        assert!(!tool.is_supported(ObjectRef::Node(cube), &scene));
        assert!(!tool.update(ObjectRef::Node(cube), &mut scene));
    }
}
