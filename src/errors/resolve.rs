use crate::any::{BindingKey, TypeInfo};

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("dependency '{key}' not found")]
    NotFound { key: BindingKey },
    #[error("dependency '{key}' has type '{actual}', expected '{expected}'")]
    IncorrectType {
        key: BindingKey,
        expected: TypeInfo,
        actual: TypeInfo,
    },
}
