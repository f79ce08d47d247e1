use alloc::{borrow::Cow, boxed::Box, collections::BTreeMap, vec::Vec};
use core::any::{type_name, TypeId};
use tracing::{debug, error, info_span};

use super::{
    config::Settings,
    errors::{InvokeErrorKind, ProvideErrorKind, ResolveErrorKind},
    registry::{Entry, Registry},
    service::{ErasedServiceBinding, ServiceBinding},
};
use crate::{
    any::{BindingKey, TypeInfo},
    dependency_resolver::DependencyResolver,
    invoker::{InvokeOutput as _, Invoker},
    value::BoxCloneValue,
};

/// A container of singleton dependencies keyed by concrete type or explicit
/// name, with declared service bindings wiring dependencies into values as
/// they are registered.
///
/// Registration takes `&mut self` and invocation `&self`; the container has
/// no internal locking, so sharing it across threads is the caller's problem.
pub struct Container {
    pub(crate) settings: Settings,
    pub(crate) registry: Registry,
    pub(crate) bindings: BTreeMap<TypeId, Box<dyn ErasedServiceBinding>>,
}

impl Default for Container {
    #[inline]
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Container {
    #[inline]
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: Registry::new(),
            bindings: BTreeMap::new(),
        }
    }

    /// Declares the injection shape for a service type. A later declaration
    /// for the same type replaces the earlier one.
    pub fn declare<S: 'static>(&mut self, binding: ServiceBinding<S>) {
        if self.bindings.insert(TypeId::of::<S>(), Box::new(binding)).is_some() {
            debug!(service = type_name::<S>(), "Service binding replaced");
        }
    }

    /// Registers a singleton under its concrete type.
    ///
    /// If a service binding is declared for the type, its fields are resolved
    /// against already-registered dependencies before the value is stored, so
    /// producers must be provided before their consumers. A failed resolution
    /// stores nothing.
    ///
    /// # Errors
    /// - Returns [`ProvideErrorKind::AlreadyExists`] if the type is already registered
    /// - Returns [`ProvideErrorKind::Service`] if field resolution fails
    pub fn provide<T: Clone + 'static>(&mut self, value: T) -> Result<(), ProvideErrorKind> {
        self.provide_inner(value, None)
    }

    /// Registers a singleton under an explicit name instead of its type.
    ///
    /// Named and type-keyed registrations never collide, so several values of
    /// one type can coexist under distinct names. A named dependency is
    /// reachable from a field tag carrying a `name(...)` clause.
    ///
    /// # Errors
    /// - Returns [`ProvideErrorKind::AlreadyExists`] if the name is already taken
    /// - Returns [`ProvideErrorKind::Service`] if field resolution fails
    pub fn provide_with_name<T: Clone + 'static>(&mut self, value: T, name: impl Into<Cow<'static, str>>) -> Result<(), ProvideErrorKind> {
        self.provide_inner(value, Some(name.into()))
    }

    fn provide_inner<T: Clone + 'static>(&mut self, mut value: T, name: Option<Cow<'static, str>>) -> Result<(), ProvideErrorKind> {
        let type_info = TypeInfo::of::<T>();

        let span = info_span!("provide", dependency = type_info.name);
        let _guard = span.enter();

        let key = match name {
            Some(name) => BindingKey::Name(name),
            None => BindingKey::Type(type_info),
        };
        if self.registry.contains(&key) {
            let err = ProvideErrorKind::AlreadyExists { key };
            error!("{}", err);
            return Err(err);
        }

        if let Some(binding) = self.bindings.get(&type_info.id) {
            debug!("Service binding declared, resolving fields");
            binding.resolve(&mut value, &self.registry, &self.settings)?;
        }

        self.registry.insert(
            key,
            Entry {
                type_info,
                value: BoxCloneValue::new(value),
            },
        );
        debug!("Registered");

        Ok(())
    }

    /// Invokes a function after resolving each of its parameters from the
    /// container, in declaration order.
    ///
    /// With [`Settings::invoke_err_check`] disabled the call reports success
    /// whatever the function returns; its side effects stand either way.
    ///
    /// # Errors
    /// - Returns [`InvokeErrorKind::Resolve`] if a parameter cannot be resolved
    /// - Returns [`InvokeErrorKind::Call`] with the function's own error when error checking is enabled
    pub fn invoke<F, Args>(&self, function: F) -> Result<(), InvokeErrorKind>
    where
        F: Invoker<Args>,
        Args: DependencyResolver<Error = ResolveErrorKind>,
    {
        let span = info_span!("invoke");
        let _guard = span.enter();

        let mut keys = Vec::new();
        Args::push_keys(&mut keys);
        debug!(?keys, "Parameter keys derived");

        let args = match Args::resolve(self) {
            Ok(args) => args,
            Err(err) => {
                error!("{}", err);
                return Err(InvokeErrorKind::Resolve(err));
            }
        };
        let output = function.invoke(args);
        if !self.settings.invoke_err_check {
            return Ok(());
        }
        match output.into_result() {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("{}", err);
                Err(InvokeErrorKind::Call(err))
            }
        }
    }
}
