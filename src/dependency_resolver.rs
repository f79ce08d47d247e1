use alloc::vec::Vec;

use super::errors::ResolveErrorKind;
use crate::{
    any::{BindingKey, TypeInfo},
    Container,
};

/// A function parameter the container can resolve.
///
/// `push_keys` appends the registry keys the parameter resolves from, in
/// declaration order; `resolve` produces the argument itself.
pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    fn push_keys(keys: &mut Vec<BindingKey>);

    fn resolve(container: &Container) -> Result<Self, Self::Error>;
}

/// Resolves a dependency by cloning the registered value out of the
/// container.
///
/// Plain values are observed as of registration time; handle types such as
/// `Rc<RefCell<T>>` alias the registered referent.
pub struct Inject<Dep>(pub Dep);

impl<Dep: Clone + 'static> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    fn push_keys(keys: &mut Vec<BindingKey>) {
        keys.push(BindingKey::of::<Dep>());
    }

    fn resolve(container: &Container) -> Result<Self, Self::Error> {
        let key = BindingKey::of::<Dep>();
        let entry = container.registry.get(&key)?;
        match entry.value.clone().downcast::<Dep>() {
            Some(dependency) => Ok(Self(dependency)),
            None => Err(ResolveErrorKind::IncorrectType {
                key,
                expected: TypeInfo::of::<Dep>(),
                actual: entry.type_info,
            }),
        }
    }
}

/// Trailing variadic parameter.
///
/// Contributes no registry key and never consults the container; it always
/// resolves to an empty `Vec`. By convention it is declared last.
pub struct Variadic<Dep>(pub Vec<Dep>);

impl<Dep: 'static> DependencyResolver for Variadic<Dep> {
    type Error = ResolveErrorKind;

    fn push_keys(_keys: &mut Vec<BindingKey>) {}

    fn resolve(_container: &Container) -> Result<Self, Self::Error> {
        Ok(Self(Vec::new()))
    }
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn push_keys(keys: &mut Vec<BindingKey>) {
                $( $ty::push_keys(keys); )*
            }

            #[inline]
            #[allow(unused_variables)]
            fn resolve(container: &Container) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(container).map_err(Into::into)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);
