//! Per-frame update hooks

use scene_engine::prelude::Scene;
use tracing::{error, trace};

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Scene(#[from] scene_engine::prelude::SceneError),
}

/// Code run once before and once after each frame update
pub trait FrameUpdate {
    fn on_pre_update(&mut self, _scene: &mut Scene) -> Result<(), HookError> {
        Ok(())
    }

    fn on_post_update(&mut self, _scene: &mut Scene) -> Result<(), HookError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Registered frame hooks, run in registration order
#[derive(Default)]
pub struct UpdateHooks {
    hooks: Vec<(HookId, Box<dyn FrameUpdate>)>,
    next_id: u64,
}

impl UpdateHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Box<dyn FrameUpdate>) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.push((id, hook));
        id
    }

    pub fn unregister(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(hook_id, _)| *hook_id != id);
        before != self.hooks.len()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every pre-update hook; returns the number of failures
    pub fn pre_update(&mut self, scene: &mut Scene) -> usize {
        self.run(scene, "pre_update", |hook, scene| hook.on_pre_update(scene))
    }

    /// Run every post-update hook; returns the number of failures
    pub fn post_update(&mut self, scene: &mut Scene) -> usize {
        self.run(scene, "post_update", |hook, scene| hook.on_post_update(scene))
    }

    fn run(
        &mut self,
        scene: &mut Scene,
        phase: &'static str,
        mut call: impl FnMut(&mut dyn FrameUpdate, &mut Scene) -> Result<(), HookError>,
    ) -> usize {
        let mut failures = 0;
        for (id, hook) in &mut self.hooks {
            // A failing hook does not prevent the others from running
            if let Err(e) = call(hook.as_mut(), scene) {
                error!(hook = ?id, phase = phase, error = %e, "Frame hook failed");
                failures += 1;
            }
        }
        trace!(phase = phase, hooks = self.hooks.len(), "Ran frame hooks");
        failures
    }
}
