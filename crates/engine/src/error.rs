//! Errors the engine can return.
//!
//! Validation failures ([`Validation`], [`InvalidId`]) are raised before
//! any remote call is made. [`Remote`] wraps a failed call and
//! [`PartialArchive`] flags an archive that reached history but could not
//! be removed from the active list.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`Remote`]: EngineError::Remote
//!  [`PartialArchive`]: EngineError::PartialArchive
use thiserror::Error;

use crate::store::RemoteError;

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("record {id} was copied to history but is still in the active list: {source}")]
    PartialArchive { id: String, source: RemoteError },
}
