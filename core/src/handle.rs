use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// Owns at most one native instance. Replacing or clearing the instance
/// releases the held one first, and dropping the handle releases it too.
pub struct ResourceHandle<T> {
    instance: Option<T>,
    name: &'static str,
}

impl<T> ResourceHandle<T> {
    pub fn new(name: &'static str) -> Self {
        Self { instance: None, name }
    }

    pub fn from_instance(name: &'static str, instance: T) -> Self {
        Self {
            instance: Some(instance),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Releases the held instance, then holds the one built by `ctor`.
    /// The handle stays empty when `ctor` fails.
    pub fn initialize<F, E>(&mut self, ctor: F) -> Result<&mut T>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        Error: From<E>,
    {
        self.delete();
        let instance: T = ctor()?;
        Ok(self.instance.insert(instance))
    }

    /// Releases the held instance and adopts `instance` as is.
    pub fn inject(&mut self, instance: T) {
        self.delete();
        self.instance = Some(instance);
    }

    /// Releases the held instance. No-op on an empty handle.
    pub fn delete(&mut self) {
        if let Some(instance) = self.instance.take() {
            drop(instance);
            trace!(resource = self.name, "released native instance");
        }
    }

    pub fn instance(&self) -> Option<&T> {
        self.instance.as_ref()
    }

    pub fn instance_mut(&mut self) -> Option<&mut T> {
        self.instance.as_mut()
    }

    /// Moves the instance out, leaving the handle empty.
    pub fn take(&mut self) -> Option<T> {
        self.instance.take()
    }

    pub fn is_empty(&self) -> bool {
        self.instance.is_none()
    }

    pub fn require(&self) -> Result<&T> {
        self.instance.as_ref().ok_or(Error::Released(self.name))
    }

    pub fn require_mut(&mut self) -> Result<&mut T> {
        self.instance.as_mut().ok_or(Error::Released(self.name))
    }
}

impl<T> Drop for ResourceHandle<T> {
    fn drop(&mut self) {
        self.delete();
    }
}

impl<T: fmt::Debug> fmt::Debug for ResourceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("name", &self.name)
            .field("instance", &self.instance)
            .finish()
    }
}
