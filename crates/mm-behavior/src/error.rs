use mm_core::UnitId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error("rule {rule} of {unit} refers to unknown unit {target}")]
    UnknownUnit {
        unit:   UnitId,
        rule:   usize,
        target: UnitId,
    },
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
