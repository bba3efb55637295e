use crate::edition::EditionTool;
use crate::form::PropertyForm;
use crate::object::{ObjectRef, TargetKind};
use scene_engine::prelude::{Camera, NodeKind, Scene};

/// Camera projection parameters
pub struct CameraTool {
    form: Option<PropertyForm>,
}

impl CameraTool {
    pub fn new() -> Self {
        Self { form: None }
    }
}

impl Default for CameraTool {
    fn default() -> Self {
        Self::new()
    }
}

impl EditionTool for CameraTool {
    fn tab_name(&self) -> &str {
        "Camera"
    }

    fn container_id(&self) -> &str {
        "CAMERA-TOOL"
    }

    fn supported_kinds(&self) -> &[TargetKind] {
        &[TargetKind::Node(NodeKind::Camera)]
    }

    fn update(&mut self, object: ObjectRef, scene: &mut Scene) -> bool {
        let ObjectRef::Node(entity) = object else {
            return false;
        };
        let Ok(camera) = scene.get::<Camera>(entity).map(|c| *c) else {
            return false;
        };

        let mut form = PropertyForm::new(self.container_id());
        form.number(None, "fov", camera.fov_degrees() as f64)
            .name("Field of view")
            .min(1.0)
            .max(179.0)
            .on_change(move |scene, value| {
                let degrees = super::number(value);
                scene.with_mut::<Camera, _>(entity, |c| c.set_fov_degrees(degrees))?;
                Ok(())
            });
        form.number(None, "near", camera.z_near as f64)
            .name("Near")
            .min(0.0)
            .on_change(move |scene, value| {
                let near = super::number(value);
                scene.with_mut::<Camera, _>(entity, |c| c.z_near = near)?;
                Ok(())
            });
        form.number(None, "far", camera.z_far as f64)
            .name("Far")
            .min(0.0)
            .on_change(move |scene, value| {
                let far = super::number(value);
                scene.with_mut::<Camera, _>(entity, |c| c.z_far = far)?;
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
