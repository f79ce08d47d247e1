#![no_std]

extern crate alloc;

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod invoker;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod tag;
pub(crate) mod value;

pub use any::{BindingKey, TypeInfo};
pub use config::Settings;
pub use container::Container;
pub use dependency_resolver::{DependencyResolver, Inject, Variadic};
pub use errors::{InvokeErrorKind, ProvideErrorKind, ResolveErrorKind, ServiceErrorKind, TagParseError};
pub use invoker::{InvokeOutput, Invoker};
pub use service::{MethodBinding, ServiceBinding, ServiceMethod};
