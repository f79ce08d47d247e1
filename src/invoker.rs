use anyhow::Error;

use super::dependency_resolver::DependencyResolver;

/// A callable the container can invoke: a function of up to 16 parameters,
/// each one a [`DependencyResolver`]. Anything else is rejected at compile
/// time.
pub trait Invoker<Args>
where
    Args: DependencyResolver,
{
    type Output: InvokeOutput;

    fn invoke(self, args: Args) -> Self::Output;
}

/// Return position of an invoked function or setter.
///
/// `()` always converts to success; a `Result` keeps its error, which the
/// container inspects only when error checking is enabled.
pub trait InvokeOutput {
    fn into_result(self) -> Result<(), Error>;
}

impl InvokeOutput for () {
    #[inline]
    fn into_result(self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T, E> InvokeOutput for Result<T, E>
where
    E: Into<Error>,
{
    #[inline]
    fn into_result(self) -> Result<(), Error> {
        self.map(|_| ()).map_err(Into::into)
    }
}

macro_rules! impl_invoker {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Output, $($ty,)*> Invoker<($($ty,)*)> for F
        where
            F: FnOnce($($ty,)*) -> Output,
            Output: InvokeOutput,
            $( $ty: DependencyResolver, )*
        {
            type Output = Output;

            #[inline]
            fn invoke(self, ($($ty,)*): ($($ty,)*)) -> Self::Output {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_invoker);
