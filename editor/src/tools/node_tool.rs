use crate::edition::EditionTool;
use crate::form::PropertyForm;
use crate::object::{ObjectRef, TargetKind};
use scene_engine::prelude::{Enabled, NodeKind, Scene, Transform};

/// Common node properties: name, visibility and transform
pub struct NodeTool {
    form: Option<PropertyForm>,
}

impl NodeTool {
    pub fn new() -> Self {
        Self { form: None }
    }
}

impl Default for NodeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl EditionTool for NodeTool {
    fn tab_name(&self) -> &str {
        "Node"
    }

    fn container_id(&self) -> &str {
        "NODE-TOOL"
    }

    fn supported_kinds(&self) -> &[TargetKind] {
        &[
            TargetKind::Node(NodeKind::Mesh),
            TargetKind::Node(NodeKind::InstancedMesh),
            TargetKind::Node(NodeKind::Light),
            TargetKind::Node(NodeKind::Camera),
        ]
    }

    fn update(&mut self, object: ObjectRef, scene: &mut Scene) -> bool {
        let ObjectRef::Node(entity) = object else {
            return false;
        };
        let Ok(transform) = scene.get::<Transform>(entity).map(|t| *t) else {
            return false;
        };
        let name = scene.name_of(entity).unwrap_or_default();
        let enabled = scene.get::<Enabled>(entity).map(|e| e.0).unwrap_or(true);

        let mut form = PropertyForm::new(self.container_id());
        form.text(None, "name", &name).name("Name").read_only();
        if let Some(source) = scene.instance_source(entity) {
            let source_name = scene.name_of(source).unwrap_or_default();
            form.text(None, "source", &source_name)
                .name("Instance of")
                .read_only();
        }
        form.toggle(None, "enabled", enabled)
            .name("Enabled")
            .on_change(move |scene, value| {
                let enabled = value.as_bool().unwrap_or(true);
                scene.with_mut::<Enabled, _>(entity, |e| e.0 = enabled)?;
                Ok(())
            });

        form.add_folder("Transform", None, true);
        form.vector3(Some("Transform"), "position", transform.position)
            .name("Position")
            .on_change(move |scene, value| {
                if let Some(position) = value.as_vec3() {
                    scene.with_mut::<Transform, _>(entity, |t| t.position = position)?;
                }
                Ok(())
            });
        form.vector3(Some("Transform"), "rotation", transform.euler_degrees())
            .name("Rotation")
            .on_change(move |scene, value| {
                if let Some(degrees) = value.as_vec3() {
                    scene.with_mut::<Transform, _>(entity, |t| t.set_euler_degrees(degrees))?;
                }
                Ok(())
            });
        form.vector3(Some("Transform"), "scale", transform.scale)
            .name("Scale")
            .on_change(move |scene, value| {
                if let Some(scale) = value.as_vec3() {
                    scene.with_mut::<Transform, _>(entity, |t| t.scale = scale)?;
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
    use crate::form::{FieldValue, FormError};
    use scene_engine::prelude::{NodeDesc, Vec3};

    #[test]
    fn test_transform_fields_write_back() {
        let mut scene = Scene::new();
        let cube = scene.spawn_node(NodeDesc::mesh("cube")).unwrap();
        let mut tool = NodeTool::new();
        assert!(tool.update(ObjectRef::Node(cube), &mut scene));

        let form = tool.form_mut().unwrap();
        form.set("position", FieldValue::Vector3(Vec3::new(1.0, 2.0, 3.0)), &mut scene)
            .unwrap();
        form.set("enabled", FieldValue::Bool(false), &mut scene)
            .unwrap();

        assert_eq!(
            scene.get::<Transform>(cube).unwrap().position,
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert!(!scene.get::<Enabled>(cube).unwrap().0);

        let err = form
            .set("name", FieldValue::Text("sphere".into()), &mut scene)
            .unwrap_err();
        assert!(matches!(err, FormError::ReadOnly(_)));
    }

    #[test]
    fn test_instance_shows_its_source() {
        let mut scene = Scene::new();
        let cube = scene.spawn_node(NodeDesc::mesh("cube")).unwrap();
        let copy = scene.spawn_node(NodeDesc::instance("copy", cube)).unwrap();
        let mut tool = NodeTool::new();

        assert!(tool.is_supported(ObjectRef::Node(copy), &scene));
        assert!(tool.update(ObjectRef::Node(copy), &mut scene));
        assert_eq!(
            tool.form().unwrap().value("source"),
            Some(&FieldValue::Text("cube".into()))
        );
    }

    #[test]
    fn test_rotation_is_edited_in_degrees() {
        let mut scene = Scene::new();
        let cube = scene.spawn_node(NodeDesc::mesh("cube")).unwrap();
        let mut tool = NodeTool::new();
        tool.update(ObjectRef::Node(cube), &mut scene);

        tool.form_mut()
            .unwrap()
            .set("rotation", FieldValue::Vector3(Vec3::new(0.0, 90.0, 0.0)), &mut scene)
            .unwrap();
        let degrees = scene.get::<Transform>(cube).unwrap().euler_degrees();
        assert!((degrees.y - 90.0).abs() < 1e-3);
    }
}
