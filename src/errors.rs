mod container;
mod resolve;
mod service;
mod tag;

pub use container::{InvokeErrorKind, ProvideErrorKind};
pub use resolve::ResolveErrorKind;
pub use service::ServiceErrorKind;
pub use tag::TagParseError;
