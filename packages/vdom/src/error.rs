//! Error types for the render engine

use crate::tree::NodeId;
use thiserror::Error;
use weft_common::BackendError;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("node {0} carries a reused real node but no old link")]
    MissingOld(NodeId),

    #[error("node {0} has no real node beneath its component layers")]
    NoHostNode(NodeId),

    #[error("node {0} has no ancestor owning a real node")]
    NoHostParent(NodeId),

    #[error("cannot create a real node for {0}")]
    NotHostKind(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
