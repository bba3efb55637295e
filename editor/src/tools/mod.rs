//! Edition tools shipped with the editor

mod camera_tool;
mod container_2d_tool;
mod light_tool;
mod node_tool;
mod scene_tool;

pub use camera_tool::CameraTool;
pub use container_2d_tool::Container2DTool;
pub use light_tool::LightTool;
pub use node_tool::NodeTool;
pub use scene_tool::SceneTool;

use crate::edition::EditionTool;
use crate::form::FieldValue;

/// One instance of every built-in tool, in tab order
pub fn default_tools() -> Vec<Box<dyn EditionTool>> {
    vec![
        Box::new(SceneTool::new()) as Box<dyn EditionTool>,
        Box::new(NodeTool::new()),
        Box::new(LightTool::new()),
        Box::new(CameraTool::new()),
        Box::new(Container2DTool::new()),
    ]
}

/// Number carried by a validated value, as f32
fn number(value: &FieldValue) -> f32 {
    value.as_f32().unwrap_or_default()
}

/// Number carried by a validated value, as a non-negative integer
fn count(value: &FieldValue) -> u32 {
    value.as_number().unwrap_or_default().max(0.0).round() as u32
}
