use super::{resolve::ResolveErrorKind, service::ServiceErrorKind};
use crate::any::BindingKey;

#[derive(thiserror::Error, Debug)]
pub enum ProvideErrorKind {
    #[error("dependency '{key}' already exists")]
    AlreadyExists { key: BindingKey },
    #[error(transparent)]
    Service(#[from] ServiceErrorKind),
}

#[derive(thiserror::Error, Debug)]
pub enum InvokeErrorKind {
    #[error(transparent)]
    Resolve(#[from] ResolveErrorKind),
    #[error(transparent)]
    Call(anyhow::Error),
}
