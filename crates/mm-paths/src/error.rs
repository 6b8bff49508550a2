use mm_core::PathId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("path parse error: {0}")]
    Parse(String),

    #[error("path {0} has no nodes")]
    EmptyPath(PathId),

    #[error("path {path} lists node {node} twice")]
    DuplicateNode { path: PathId, node: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PathResult<T> = Result<T, PathError>;
