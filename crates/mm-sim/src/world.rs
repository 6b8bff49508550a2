//! Start-of-tick world snapshot.

use mm_behavior::UnitView;
use mm_core::{Position, UnitId};
use mm_motion::MotionMaster;

use crate::UnitBody;

/// Every in-world unit as it stood when the tick began.
///
/// The think phase reads it through [`AiContext`][mm_behavior::AiContext];
/// the apply phase resolves other units' positions and names against it, so
/// the order units are ticked in never changes what they see.
#[derive(Clone, Debug, Default)]
pub struct WorldSnapshot {
    /// Sorted by ascending `UnitId`.
    pub views: Vec<UnitView>,
    names:     Vec<String>,
    /// Flat floor height; `None` means the world has no ground.
    pub ground_z: Option<f32>,
}

impl WorldSnapshot {
    /// Capture `bodies` and their schedulers.  Both slices are indexed alike
    /// and sorted by id; despawned bodies are left out.
    pub fn capture(bodies: &[UnitBody], motion: &[MotionMaster], ground_z: Option<f32>) -> Self {
        let mut views = Vec::with_capacity(bodies.len());
        let mut names = Vec::with_capacity(bodies.len());
        for (body, motion) in bodies.iter().zip(motion) {
            if !body.in_world {
                continue;
            }
            views.push(UnitView {
                id:           body.id,
                position:     body.position,
                alive:        body.alive,
                player:       body.player,
                current_kind: motion.current_kind(),
                current_slot: motion.current_slot(),
                unit_state:   body.unit_state,
            });
            names.push(body.name.clone());
        }
        Self { views, names, ground_z }
    }

    fn index(&self, id: UnitId) -> Option<usize> {
        self.views.binary_search_by_key(&id, |v| v.id).ok()
    }

    pub fn view(&self, id: UnitId) -> Option<&UnitView> {
        self.index(id).map(|i| &self.views[i])
    }

    pub fn position(&self, id: UnitId) -> Option<Position> {
        self.view(id).map(|v| v.position)
    }

    pub fn name(&self, id: UnitId) -> Option<&str> {
        self.index(id).map(|i| self.names[i].as_str())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
