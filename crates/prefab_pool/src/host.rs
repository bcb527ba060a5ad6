//! Host boundary
//!
//! The pool never builds, shows, or parents objects itself. The application
//! supplies those primitives through [`PoolHost`], typically backed by its
//! scene graph. [`crate::scene::Scene`] is a self-contained implementation.

use crate::key::TypeKey;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Prototype from which pooled instances are cloned
pub trait PoolTemplate {
    /// Payload type every instance of this template carries
    fn type_key(&self) -> TypeKey;

    /// Human readable template name
    fn name(&self) -> &str;
}

/// Construction, activation and parenting primitives consumed by the pool
pub trait PoolHost {
    /// Handle to a live instance
    type Instance: Copy + Eq + Hash + fmt::Debug;
    /// Handle to a parenting container
    type Container: Copy + fmt::Debug;
    /// Prototype type
    type Template: PoolTemplate;

    /// Create a named container, optionally attached under `parent`
    fn create_container(&mut self, name: &str, parent: Option<Self::Container>) -> Self::Container;

    /// Clone `template` into a fresh, enabled instance parented under `parent`
    fn instantiate(&mut self, template: &Self::Template, parent: Self::Container) -> Self::Instance;

    /// Toggle whether the instance is live
    fn set_enabled(&mut self, instance: Self::Instance, enabled: bool);

    /// Move the instance under `container`
    fn set_parent(&mut self, instance: Self::Instance, container: Self::Container);

    /// Label used when reporting on an instance
    fn describe(&self, instance: Self::Instance) -> String {
        format!("{instance:?}")
    }
}

/// Instance handle checked out for payload type `T`
pub struct Pooled<T, I> {
    instance: I,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, I> Pooled<T, I> {
    pub(crate) fn new(instance: I) -> Self {
        Self {
            instance,
            _phantom: PhantomData,
        }
    }

    /// Drop the payload type and keep the raw handle
    pub fn into_instance(self) -> I {
        self.instance
    }
}

impl<T, I: Copy> Pooled<T, I> {
    /// Raw instance handle
    pub fn instance(&self) -> I {
        self.instance
    }
}

impl<T, I: Clone> Clone for Pooled<T, I> {
    fn clone(&self) -> Self {
        Self::new(self.instance.clone())
    }
}

impl<T, I: Copy> Copy for Pooled<T, I> {}

impl<T, I: PartialEq> PartialEq for Pooled<T, I> {
    fn eq(&self, other: &Self) -> bool {
        self.instance == other.instance
    }
}

impl<T, I: Eq> Eq for Pooled<T, I> {}

impl<T, I: Hash> Hash for Pooled<T, I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instance.hash(state);
    }
}

impl<T: 'static, I: fmt::Debug> fmt::Debug for Pooled<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("payload", &TypeKey::of::<T>().short_name())
            .field("instance", &self.instance)
            .finish()
    }
}
