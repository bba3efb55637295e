//! Declarative property forms built by edition tools
//!
//! A form is a list of fields bound to object properties. Each field has a
//! control with its constraints and an optional setter that writes the new
//! value back into the scene.

use glam::{Vec2, Vec3};
use scene_engine::prelude::{Scene, SceneError};

/// Value carried by a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Choice(String),
    Color(Vec3),
    Vector2(Vec2),
    Vector3(Vec3),
    /// Buttons carry no value
    Trigger,
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.as_number().map(|value| value as f32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Text of a text or choice value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) | FieldValue::Choice(value) => Some(value),
            _ => None,
        }
    }

    /// Components of a color or 3D vector value
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            FieldValue::Color(value) | FieldValue::Vector3(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            FieldValue::Vector2(value) => Some(*value),
            _ => None,
        }
    }
}

/// Widget used to edit a field, with its constraints
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Number {
        min: Option<f64>,
        max: Option<f64>,
        step: Option<f64>,
    },
    Toggle,
    Choice {
        options: Vec<String>,
    },
    Text,
    Color,
    Vector2,
    Vector3,
    Button,
}

impl Control {
    fn expected(&self) -> &'static str {
        match self {
            Control::Number { .. } => "number",
            Control::Toggle => "bool",
            Control::Choice { .. } => "choice",
            Control::Text => "text",
            Control::Color => "color",
            Control::Vector2 => "vector2",
            Control::Vector3 => "vector3",
            Control::Button => "trigger",
        }
    }
}

/// Errors raised while editing a form
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Field '{0}' is read-only")]
    ReadOnly(String),

    #[error("Field '{path}' expects a {expected} value")]
    TypeMismatch {
        path: String,
        expected: &'static str,
    },

    #[error("'{value}' is not an option of field '{path}'")]
    InvalidChoice { path: String, value: String },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Writes a validated value into the scene
pub type Setter = Box<dyn Fn(&mut Scene, &FieldValue) -> Result<(), FormError>>;

/// A single bound property
pub struct Field {
    pub path: String,
    pub label: String,
    pub folder: Option<String>,
    pub control: Control,
    pub value: FieldValue,
    pub read_only: bool,
    /// The owning tool rebuilds its form after this field changes
    pub rebuild: bool,
    setter: Option<Setter>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("label", &self.label)
            .field("folder", &self.folder)
            .field("control", &self.control)
            .field("value", &self.value)
            .field("read_only", &self.read_only)
            .field("rebuild", &self.rebuild)
            .finish()
    }
}

impl Field {
    fn normalize(&self, value: FieldValue) -> Result<FieldValue, FormError> {
        let mismatch = || FormError::TypeMismatch {
            path: self.path.clone(),
            expected: self.control.expected(),
        };

        match (&self.control, value) {
            (Control::Number { min, max, step }, FieldValue::Number(mut number)) => {
                if let Some(step) = step.filter(|s| *s > 0.0) {
                    let base = min.unwrap_or(0.0);
                    number = base + ((number - base) / step).round() * step;
                }
                if let Some(min) = min {
                    number = number.max(*min);
                }
                if let Some(max) = max {
                    number = number.min(*max);
                }
                Ok(FieldValue::Number(number))
            }
            (Control::Toggle, value @ FieldValue::Bool(_)) => Ok(value),
            (Control::Choice { options }, FieldValue::Choice(choice)) => {
                if options.iter().any(|option| *option == choice) {
                    Ok(FieldValue::Choice(choice))
                } else {
                    Err(FormError::InvalidChoice {
                        path: self.path.clone(),
                        value: choice,
                    })
                }
            }
            (Control::Text, value @ FieldValue::Text(_)) => Ok(value),
            (Control::Color, value @ FieldValue::Color(_)) => Ok(value),
            (Control::Vector2, value @ FieldValue::Vector2(_)) => Ok(value),
            (Control::Vector3, value @ FieldValue::Vector3(_)) => Ok(value),
            (Control::Button, FieldValue::Trigger) => Ok(FieldValue::Trigger),
            _ => Err(mismatch()),
        }
    }
}

/// Chained configuration of a field just added to a form
pub struct FieldBuilder<'a> {
    field: &'a mut Field,
}

impl FieldBuilder<'_> {
    pub fn name(self, label: impl Into<String>) -> Self {
        self.field.label = label.into();
        self
    }

    pub fn min(self, value: f64) -> Self {
        if let Control::Number { min, .. } = &mut self.field.control {
            *min = Some(value);
        }
        self
    }

    pub fn max(self, value: f64) -> Self {
        if let Control::Number { max, .. } = &mut self.field.control {
            *max = Some(value);
        }
        self
    }

    pub fn step(self, value: f64) -> Self {
        if let Control::Number { step, .. } = &mut self.field.control {
            *step = Some(value);
        }
        self
    }

    pub fn read_only(self) -> Self {
        self.field.read_only = true;
        self
    }

    /// Rebuild the whole form once this field changed
    pub fn rebuild(self) -> Self {
        self.field.rebuild = true;
        self
    }

    pub fn on_change<F>(self, setter: F) -> Self
    where
        F: Fn(&mut Scene, &FieldValue) -> Result<(), FormError> + 'static,
    {
        self.field.setter = Some(Box::new(setter));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub parent: Option<String>,
    pub open: bool,
}

/// Result of a successful edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    pub rebuild: bool,
}

/// Form shown in a tool container
#[derive(Debug, Default)]
pub struct PropertyForm {
    pub id: String,
    folders: Vec<Folder>,
    fields: Vec<Field>,
}

impl PropertyForm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            folders: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add a folder, optionally nested in another one
    pub fn add_folder(&mut self, name: &str, parent: Option<&str>, open: bool) {
        self.folders.push(Folder {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            open,
        });
    }

    /// Add a field; later fields with the same path shadow nothing, paths are unique
    pub fn add(
        &mut self,
        folder: Option<&str>,
        path: &str,
        control: Control,
        value: FieldValue,
    ) -> FieldBuilder<'_> {
        self.fields.retain(|field| field.path != path);
        self.fields.push(Field {
            path: path.to_string(),
            label: path.to_string(),
            folder: folder.map(str::to_string),
            control,
            value,
            read_only: false,
            rebuild: false,
            setter: None,
        });
        let index = self.fields.len() - 1;
        FieldBuilder {
            field: &mut self.fields[index],
        }
    }

    pub fn number(&mut self, folder: Option<&str>, path: &str, value: f64) -> FieldBuilder<'_> {
        let control = Control::Number {
            min: None,
            max: None,
            step: None,
        };
        self.add(folder, path, control, FieldValue::Number(value))
    }

    pub fn toggle(&mut self, folder: Option<&str>, path: &str, value: bool) -> FieldBuilder<'_> {
        self.add(folder, path, Control::Toggle, FieldValue::Bool(value))
    }

    pub fn choice(
        &mut self,
        folder: Option<&str>,
        path: &str,
        current: &str,
        options: &[&str],
    ) -> FieldBuilder<'_> {
        let control = Control::Choice {
            options: options.iter().map(|option| option.to_string()).collect(),
        };
        self.add(folder, path, control, FieldValue::Choice(current.to_string()))
    }

    pub fn text(&mut self, folder: Option<&str>, path: &str, value: &str) -> FieldBuilder<'_> {
        self.add(folder, path, Control::Text, FieldValue::Text(value.to_string()))
    }

    pub fn color(&mut self, folder: Option<&str>, path: &str, value: Vec3) -> FieldBuilder<'_> {
        self.add(folder, path, Control::Color, FieldValue::Color(value))
    }

    pub fn vector2(&mut self, folder: Option<&str>, path: &str, value: Vec2) -> FieldBuilder<'_> {
        self.add(folder, path, Control::Vector2, FieldValue::Vector2(value))
    }

    pub fn vector3(&mut self, folder: Option<&str>, path: &str, value: Vec3) -> FieldBuilder<'_> {
        self.add(folder, path, Control::Vector3, FieldValue::Vector3(value))
    }

    pub fn button(&mut self, folder: Option<&str>, path: &str) -> FieldBuilder<'_> {
        self.add(folder, path, Control::Button, FieldValue::Trigger)
    }

    /// Validate `value`, run the field's setter and store the value
    pub fn set(
        &mut self,
        path: &str,
        value: FieldValue,
        scene: &mut Scene,
    ) -> Result<FieldOutcome, FormError> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.path == path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        if field.read_only {
            return Err(FormError::ReadOnly(path.to_string()));
        }

        let value = field.normalize(value)?;
        if let Some(setter) = &field.setter {
            setter(scene, &value)?;
        }
        field.value = value;
        Ok(FieldOutcome {
            rebuild: field.rebuild,
        })
    }

    pub fn get(&self, path: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.path == path)
    }

    pub fn value(&self, path: &str) -> Option<&FieldValue> {
        self.get(path).map(|field| &field.value)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.name == name)
    }

    /// Paths of the fields placed in `folder`
    pub fn paths_in(&self, folder: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.folder.as_deref() == Some(folder))
            .map(|field| field.path.as_str())
            .collect()
    }
}
