//! Mutations queued while the scheduler may not change its slots directly.

use std::fmt;

use mm_core::GeneratorId;

use crate::{
    Generator, MotionMaster, MotionOwner, MovementKind, MovementMode, MovementPriority,
    MovementSlot,
};

/// Predicate re-checked right before a queued action runs.
pub type ActionGuard = Box<dyn Fn(&MotionMaster) -> bool + Send>;

/// Diagnostic tag of a queued action.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DelayedActionKind {
    Clear,
    ClearSlot,
    ClearMode,
    ClearPriority,
    Add,
    Remove,
    RemoveKind,
    Initialize,
}

/// The mutation to replay.
#[derive(Debug)]
pub enum DelayedOp {
    Clear,
    ClearSlot(MovementSlot),
    ClearMode(MovementMode),
    ClearPriority(MovementPriority),
    Add(Generator, MovementSlot),
    Remove(GeneratorId, MovementSlot),
    RemoveKind(MovementKind, MovementSlot),
    Initialize,
}

impl DelayedOp {
    pub fn kind(&self) -> DelayedActionKind {
        match self {
            DelayedOp::Clear            => DelayedActionKind::Clear,
            DelayedOp::ClearSlot(_)     => DelayedActionKind::ClearSlot,
            DelayedOp::ClearMode(_)     => DelayedActionKind::ClearMode,
            DelayedOp::ClearPriority(_) => DelayedActionKind::ClearPriority,
            DelayedOp::Add(..)          => DelayedActionKind::Add,
            DelayedOp::Remove(..)       => DelayedActionKind::Remove,
            DelayedOp::RemoveKind(..)   => DelayedActionKind::RemoveKind,
            DelayedOp::Initialize       => DelayedActionKind::Initialize,
        }
    }
}

/// One queued mutation plus an optional validity check.
pub struct DelayedAction {
    op:    DelayedOp,
    guard: Option<ActionGuard>,
}

impl DelayedAction {
    pub fn new(op: DelayedOp) -> Self {
        Self { op, guard: None }
    }

    pub fn guarded(op: DelayedOp, guard: ActionGuard) -> Self {
        Self { op, guard: Some(guard) }
    }

    #[inline]
    pub fn kind(&self) -> DelayedActionKind {
        self.op.kind()
    }

    /// Replay the mutation through the scheduler's public API unless the
    /// guard rejects it.
    pub(crate) fn resolve(self, motion: &mut MotionMaster, owner: &mut dyn MotionOwner) {
        let kind = self.kind();
        if let Some(guard) = &self.guard {
            if !guard(motion) {
                tracing::trace!(unit = %motion.owner_id(), ?kind, "delayed action skipped");
                return;
            }
        }
        tracing::trace!(unit = %motion.owner_id(), ?kind, "resolving delayed action");

        match self.op {
            DelayedOp::Clear                   => motion.clear(owner),
            DelayedOp::ClearSlot(slot)         => motion.clear_slot(owner, slot),
            DelayedOp::ClearMode(mode)         => motion.clear_mode(owner, mode),
            DelayedOp::ClearPriority(priority) => motion.clear_priority(owner, priority),
            DelayedOp::Add(generator, slot)    => motion.add(owner, generator, slot),
            DelayedOp::Remove(id, slot)        => motion.remove(owner, id, slot),
            DelayedOp::RemoveKind(kind, slot)  => motion.remove_kind(owner, kind, slot),
            DelayedOp::Initialize              => motion.initialize(owner),
        }
    }
}

impl fmt::Debug for DelayedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayedAction")
            .field("op", &self.op)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
