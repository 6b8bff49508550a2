//! Diagnostic listing of a scheduler's generators.

use mm_core::UnitId;

use crate::{MotionMaster, MotionOwner, MovementKind};

/// One row of [`MotionMaster::movement_generators_info`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementGeneratorInfo {
    pub kind:        MovementKind,
    /// Unit the generator moves relative to (chase, follow).
    pub target:      Option<UnitId>,
    pub target_name: Option<String>,
}

impl MotionMaster {
    /// Default first, then the active stack front to back.  From inside a
    /// tick the checked-out generator is listed in its place.
    pub fn movement_generators_info(&self, owner: &dyn MotionOwner) -> Vec<MovementGeneratorInfo> {
        self.generators()
            .map(|generator| {
                let target = generator.target();
                MovementGeneratorInfo {
                    kind: generator.kind(),
                    target,
                    target_name: target.and_then(|t| owner.target_name(t)),
                }
            })
            .collect()
    }
}
