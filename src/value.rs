use alloc::boxed::Box;
use core::any::Any;

pub(crate) trait CloneValue {
    #[must_use]
    fn clone_box(&self) -> Box<dyn CloneValue>;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> CloneValue for T
where
    T: Clone + 'static,
{
    #[inline]
    fn clone_box(&self) -> Box<dyn CloneValue> {
        Box::new(self.clone())
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

pub(crate) struct BoxCloneValue(Box<dyn CloneValue>);

impl Clone for BoxCloneValue {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl BoxCloneValue {
    #[inline]
    pub(crate) fn new<T: Clone + 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub(crate) fn downcast<T: 'static>(self) -> Option<T> {
        self.0.into_any().downcast().ok().map(|value| *value)
    }
}
