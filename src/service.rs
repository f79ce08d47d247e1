use alloc::{borrow::Cow, boxed::Box, collections::BTreeMap, vec::Vec};
use core::any::Any;
use tracing::{debug, error, warn};

use super::{
    config::Settings,
    errors::{ResolveErrorKind, ServiceErrorKind},
    invoker::InvokeOutput,
    registry::Registry,
    tag,
    value::BoxCloneValue,
};
use crate::any::{BindingKey, TypeInfo};

type FieldWriter<S> = Box<dyn Fn(&mut S, BoxCloneValue)>;
type SetterThunk<S> = Box<dyn Fn(&mut S, BoxCloneValue) -> Result<(), anyhow::Error>>;

struct FieldBinding<S> {
    tag: &'static str,
    dependency: TypeInfo,
    writer: Option<FieldWriter<S>>,
}

enum MethodShape<S> {
    Unary { param: TypeInfo, thunk: SetterThunk<S> },
    Arity(usize),
}

/// A method declared on a service binding, addressable from an
/// `inject(Method)` tag clause.
pub struct MethodBinding<S> {
    shape: MethodShape<S>,
}

/// Converts a method of a supported shape into a [`MethodBinding`].
///
/// Implemented for `Fn(&mut S)` through `Fn(&mut S, A, B, C)`. Only the
/// single-parameter shape is invocable during injection; the others are
/// declarable but rejected when a tag addresses them.
pub trait ServiceMethod<S, Args> {
    fn into_binding(self) -> MethodBinding<S>;
}

impl<S, F, Output> ServiceMethod<S, ()> for F
where
    S: 'static,
    F: Fn(&mut S) -> Output + 'static,
    Output: InvokeOutput,
{
    fn into_binding(self) -> MethodBinding<S> {
        MethodBinding {
            shape: MethodShape::Arity(0),
        }
    }
}

impl<S, F, Dep, Output> ServiceMethod<S, (Dep,)> for F
where
    S: 'static,
    F: Fn(&mut S, Dep) -> Output + 'static,
    Dep: 'static,
    Output: InvokeOutput,
{
    fn into_binding(self) -> MethodBinding<S> {
        MethodBinding {
            shape: MethodShape::Unary {
                param: TypeInfo::of::<Dep>(),
                thunk: Box::new(move |target, value| {
                    let dependency = value.downcast::<Dep>().expect("Failed to downcast dependency in setter thunk");
                    self(target, dependency).into_result()
                }),
            },
        }
    }
}

impl<S, F, A, B, Output> ServiceMethod<S, (A, B)> for F
where
    S: 'static,
    F: Fn(&mut S, A, B) -> Output + 'static,
    Output: InvokeOutput,
{
    fn into_binding(self) -> MethodBinding<S> {
        MethodBinding {
            shape: MethodShape::Arity(2),
        }
    }
}

impl<S, F, A, B, C, Output> ServiceMethod<S, (A, B, C)> for F
where
    S: 'static,
    F: Fn(&mut S, A, B, C) -> Output + 'static,
    Output: InvokeOutput,
{
    fn into_binding(self) -> MethodBinding<S> {
        MethodBinding {
            shape: MethodShape::Arity(3),
        }
    }
}

/// Declared injection shape for a service type: the fields injection may
/// touch, each driven by its tag, and the named methods usable as setters.
///
/// Fields keep their declaration order during resolution.
pub struct ServiceBinding<S> {
    type_info: TypeInfo,
    fields: Vec<FieldBinding<S>>,
    methods: BTreeMap<&'static str, MethodBinding<S>>,
}

impl<S: 'static> Default for ServiceBinding<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> ServiceBinding<S> {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_info: TypeInfo::of::<S>(),
            fields: Vec::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Declares a field with write access. The dependency type comes from the
    /// writer's parameter; the tag drives resolution (`inject()`,
    /// `inject(Method)`, `name(binding)`).
    #[must_use]
    pub fn field<Dep, W>(mut self, tag: &'static str, writer: W) -> Self
    where
        Dep: 'static,
        W: Fn(&mut S, Dep) + 'static,
    {
        self.fields.push(FieldBinding {
            tag,
            dependency: TypeInfo::of::<Dep>(),
            writer: Some(Box::new(move |target, value| {
                let dependency = value.downcast::<Dep>().expect("Failed to downcast dependency in field writer");
                writer(target, dependency);
            })),
        });
        self
    }

    /// Declares a field injection cannot write. Forward injection into it
    /// fails; setter injection works, since the declared method does the
    /// writing.
    #[must_use]
    pub fn private_field<Dep: 'static>(mut self, tag: &'static str) -> Self {
        self.fields.push(FieldBinding {
            tag,
            dependency: TypeInfo::of::<Dep>(),
            writer: None,
        });
        self
    }

    /// Declares a named method. A later declaration under the same name
    /// replaces the earlier one.
    #[must_use]
    pub fn method<M, Args>(mut self, name: &'static str, method: M) -> Self
    where
        M: ServiceMethod<S, Args>,
    {
        self.methods.insert(name, method.into_binding());
        self
    }

    pub(crate) fn resolve_fields(&self, target: &mut S, registry: &Registry, settings: &Settings) -> Result<(), ServiceErrorKind> {
        for field in &self.fields {
            if field.tag.is_empty() {
                continue;
            }
            let directive = match tag::parse(field.tag) {
                Ok(directive) => directive,
                Err(err) => {
                    error!("{}", err);
                    return Err(err.into());
                }
            };
            if !directive.inject {
                warn!(dependency = field.dependency.name, "Tag without inject clause, field skipped");
                continue;
            }
            let key = match directive.name {
                Some(name) => BindingKey::Name(Cow::Borrowed(name)),
                None => BindingKey::Type(field.dependency),
            };
            match directive.setter {
                None => {
                    let Some(writer) = &field.writer else {
                        let err = ServiceErrorKind::PrivateField {
                            dependency: field.dependency,
                        };
                        error!("{}", err);
                        return Err(err);
                    };
                    let entry = match registry.get(&key) {
                        Ok(entry) => entry,
                        Err(err) => {
                            error!("{}", err);
                            return Err(err.into());
                        }
                    };
                    if entry.type_info != field.dependency {
                        let err = ServiceErrorKind::Resolve(ResolveErrorKind::IncorrectType {
                            key,
                            expected: field.dependency,
                            actual: entry.type_info,
                        });
                        error!("{}", err);
                        return Err(err);
                    }
                    writer(target, entry.value.clone());
                    debug!(dependency = entry.type_info.name, "Field injected");
                }
                Some(setter) => {
                    let Some(method) = self.methods.get(setter) else {
                        let err = ServiceErrorKind::SetterNotFound { setter };
                        error!("{}", err);
                        return Err(err);
                    };
                    let (param, thunk) = match &method.shape {
                        MethodShape::Unary { param, thunk } => (param, thunk),
                        MethodShape::Arity(arity) => {
                            let err = ServiceErrorKind::SetterArity { setter };
                            error!(arity = *arity, "{}", err);
                            return Err(err);
                        }
                    };
                    let entry = match registry.get(&key) {
                        Ok(entry) => entry,
                        Err(err) => {
                            error!("{}", err);
                            return Err(err.into());
                        }
                    };
                    if entry.type_info != *param {
                        let err = ServiceErrorKind::SetterTypeMismatch {
                            setter,
                            actual: entry.type_info,
                        };
                        error!("{}", err);
                        return Err(err);
                    }
                    if let Err(err) = thunk(target, entry.value.clone()) {
                        if settings.invoke_err_check {
                            error!("{}", err);
                            return Err(ServiceErrorKind::Call(err));
                        }
                        debug!("Setter error discarded, error checking disabled");
                    }
                    debug!(dependency = entry.type_info.name, setter, "Setter invoked");
                }
            }
        }
        Ok(())
    }
}

pub(crate) trait ErasedServiceBinding {
    fn resolve(&self, target: &mut dyn Any, registry: &Registry, settings: &Settings) -> Result<(), ServiceErrorKind>;
}

impl<S: 'static> ErasedServiceBinding for ServiceBinding<S> {
    fn resolve(&self, target: &mut dyn Any, registry: &Registry, settings: &Settings) -> Result<(), ServiceErrorKind> {
        let Some(target) = target.downcast_mut::<S>() else {
            let err = ServiceErrorKind::InvalidTarget {
                expected: self.type_info,
            };
            error!("{}", err);
            return Err(err);
        };
        self.resolve_fields(target, registry, settings)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::ServiceBinding;
    use crate::{
        any::{BindingKey, TypeInfo},
        config::Settings,
        registry::{Entry, Registry},
        value::BoxCloneValue,
        ResolveErrorKind, ServiceErrorKind,
    };

    use alloc::{
        format,
        string::{String, ToString as _},
    };
    use tracing_test::traced_test;

    #[derive(Clone, Default)]
    struct Profile {
        theme: String,
        retries: i32,
    }

    impl Profile {
        fn set_retries(&mut self, retries: i32) {
            self.retries = retries;
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert(
            BindingKey::of::<String>(),
            Entry {
                type_info: TypeInfo::of::<String>(),
                value: BoxCloneValue::new(String::from("dark")),
            },
        );
        registry.insert(
            BindingKey::of::<i32>(),
            Entry {
                type_info: TypeInfo::of::<i32>(),
                value: BoxCloneValue::new(3_i32),
            },
        );
        registry
    }

    #[test]
    #[traced_test]
    fn test_forward_and_setter() {
        let binding = ServiceBinding::new()
            .field("inject()", |profile: &mut Profile, theme: String| profile.theme = theme)
            .private_field::<i32>("inject(SetRetries)")
            .method("SetRetries", Profile::set_retries);

        let mut profile = Profile::default();
        binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap();

        assert_eq!(profile.theme, "dark");
        assert_eq!(profile.retries, 3);
    }

    #[test]
    #[traced_test]
    fn test_empty_tag_skipped() {
        let binding = ServiceBinding::new().field("", |profile: &mut Profile, theme: String| profile.theme = theme);

        let mut profile = Profile::default();
        binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap();

        assert_eq!(profile.theme, "");
    }

    #[test]
    #[traced_test]
    fn test_tag_without_inject_skipped() {
        let binding = ServiceBinding::new().field("name(primary)", |profile: &mut Profile, theme: String| profile.theme = theme);

        let mut profile = Profile::default();
        binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap();

        assert_eq!(profile.theme, "");
        assert!(logs_contain("Tag without inject clause, field skipped"));
    }

    #[test]
    #[traced_test]
    fn test_malformed_tag_aborts() {
        let binding = ServiceBinding::new().field("inject", |profile: &mut Profile, theme: String| profile.theme = theme);

        let mut profile = Profile::default();
        let err = binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap_err();

        assert!(matches!(err, ServiceErrorKind::Tag(_)));
        assert_eq!(err.to_string(), "incorrect tag format: inject");
    }

    #[test]
    #[traced_test]
    fn test_private_field_forward_rejected() {
        let binding = ServiceBinding::<Profile>::new().private_field::<String>("inject()");

        let mut profile = Profile::default();

        // fails before any lookup, with or without the dependency registered
        for registry in [Registry::new(), registry()] {
            let err = binding.resolve_fields(&mut profile, &registry, &Settings::default()).unwrap_err();
            assert!(matches!(err, ServiceErrorKind::PrivateField { .. }));
            assert_eq!(err.to_string(), "cannot inject dependency 'alloc::string::String' into a private field");
        }
    }

    #[test]
    #[traced_test]
    fn test_setter_not_found() {
        let binding = ServiceBinding::<Profile>::new().private_field::<i32>("inject(Missing)");

        let mut profile = Profile::default();
        let err = binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap_err();

        assert!(matches!(err, ServiceErrorKind::SetterNotFound { setter: "Missing" }));
        assert_eq!(err.to_string(), "setter method 'Missing' not found");
    }

    #[test]
    #[traced_test]
    fn test_setter_must_be_unary() {
        let binding = ServiceBinding::new()
            .private_field::<i32>("inject(Reset)")
            .method("Reset", |profile: &mut Profile| profile.retries = 0);
        let binding_two_params = ServiceBinding::new()
            .private_field::<i32>("inject(Configure)")
            .method("Configure", |profile: &mut Profile, theme: String, retries: i32| {
                profile.theme = theme;
                profile.retries = retries;
            });

        let mut profile = Profile::default();

        let err = binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap_err();
        assert!(matches!(err, ServiceErrorKind::SetterArity { setter: "Reset" }));

        let err = binding_two_params
            .resolve_fields(&mut profile, &registry(), &Settings::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "setter method 'Configure' cannot take more than one param");
    }

    #[test]
    #[traced_test]
    fn test_setter_param_type_checked() {
        let binding = ServiceBinding::new()
            .private_field::<i32>("inject(SetTheme)")
            .method("SetTheme", |profile: &mut Profile, theme: String| profile.theme = theme);

        let mut profile = Profile::default();
        let err = binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap_err();

        assert!(matches!(err, ServiceErrorKind::SetterTypeMismatch { setter: "SetTheme", .. }));
        assert_eq!(err.to_string(), "setter method 'SetTheme' cannot take param with type 'i32'");
    }

    #[test]
    #[traced_test]
    fn test_setter_error_gated_by_settings() {
        let binding = ServiceBinding::new()
            .private_field::<i32>("inject(SetRetries)")
            .method("SetRetries", |profile: &mut Profile, retries: i32| {
                profile.retries = retries;
                Err::<(), _>(anyhow::anyhow!("retries rejected"))
            });

        let mut profile = Profile::default();

        binding.resolve_fields(&mut profile, &registry(), &Settings::default()).unwrap();
        assert_eq!(profile.retries, 3);

        let err = binding
            .resolve_fields(&mut profile, &registry(), &Settings { invoke_err_check: true })
            .unwrap_err();
        assert!(matches!(err, ServiceErrorKind::Call(_)));
        assert_eq!(err.to_string(), "retries rejected");
    }

    #[test]
    #[traced_test]
    fn test_named_forward_type_checked() {
        let mut registry = Registry::new();
        registry.insert(
            BindingKey::Name("primary".into()),
            Entry {
                type_info: TypeInfo::of::<i32>(),
                value: BoxCloneValue::new(3_i32),
            },
        );

        let binding = ServiceBinding::new().field("inject(),name(primary)", |profile: &mut Profile, theme: String| {
            profile.theme = theme;
        });

        let mut profile = Profile::default();
        let err = binding.resolve_fields(&mut profile, &registry, &Settings::default()).unwrap_err();

        assert!(matches!(
            err,
            ServiceErrorKind::Resolve(ResolveErrorKind::IncorrectType { .. })
        ));
    }
}
