use super::{resolve::ResolveErrorKind, tag::TagParseError};
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ServiceErrorKind {
    #[error(transparent)]
    Tag(#[from] TagParseError),
    #[error("cannot inject dependency '{dependency}' into a private field")]
    PrivateField { dependency: TypeInfo },
    #[error("setter method '{setter}' not found")]
    SetterNotFound { setter: &'static str },
    #[error("setter method '{setter}' cannot take more than one param")]
    SetterArity { setter: &'static str },
    #[error("setter method '{setter}' cannot take param with type '{actual}'")]
    SetterTypeMismatch { setter: &'static str, actual: TypeInfo },
    #[error("provided value cannot be read as '{expected}'")]
    InvalidTarget { expected: TypeInfo },
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
    #[error(transparent)]
    Call(anyhow::Error),
}
