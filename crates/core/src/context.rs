use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// User data made available to instructions and hooks during a
/// run.
///
/// The context is type-erased, retrieve it with [`RunContext::get`] using
/// the same type it was created with. Cloning is cheap, all clones share
/// the same value.
#[derive(Clone, Default)]
pub struct RunContext {
    value: Option<Arc<dyn Any + Send + Sync>>,
}

impl RunContext {
    /// Creates a context holding `value`.
    #[inline]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Some(Arc::new(value)),
        }
    }

    /// Returns the value if there is one and it has type `T`.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.as_deref()?.downcast_ref()
    }

    /// Returns `true` if this context holds no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

impl Debug for RunContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("is_empty", &self.is_empty())
            .finish()
    }
}
