//! An AI that never asks for anything.

use mm_core::{UnitId, UnitRng};

use crate::{AiContext, CreatureAi, MovementIntent};

/// A [`CreatureAi`] that always returns an empty intent list.
///
/// Units driven by it keep whatever default movement their data selects.
pub struct NoopAi;

impl CreatureAi for NoopAi {
    fn think(
        &self,
        _unit: UnitId,
        _ctx:  &AiContext<'_>,
        _rng:  &mut UnitRng,
    ) -> Vec<MovementIntent> {
        vec![]
    }
}
