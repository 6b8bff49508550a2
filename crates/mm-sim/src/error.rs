use mm_behavior::BehaviorError;
use mm_core::UnitId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("unit {0} spawned twice")]
    DuplicateUnit(UnitId),

    #[error("no unit {0} in the world")]
    UnknownUnit(UnitId),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),
}

pub type SimResult<T> = Result<T, SimError>;
