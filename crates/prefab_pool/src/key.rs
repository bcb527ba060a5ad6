//! Pool addressing
//!
//! Every pool is reachable through exactly one [`PoolKey`]: either the
//! structural payload type its template carries, or an explicit string key
//! supplied by configuration. The two keyspaces never overlap.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a payload type, usable as a map key
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Underlying type id
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path, e.g. `Bullet` for `game::weapons::Bullet`
    pub fn short_name(&self) -> &'static str {
        let base_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..base_end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Address of a single pool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoolKey {
    /// Pool addressed by the payload type of its template
    Type(TypeKey),
    /// Pool addressed by an explicit string key
    Named(String),
}

impl PoolKey {
    /// Type key for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(TypeKey::of::<T>())
    }

    /// String key
    pub fn named(key: impl Into<String>) -> Self {
        Self::Named(key.into())
    }

    /// Whether this key lives in the string keyspace
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(type_key) => write!(f, "<{type_key}>"),
            Self::Named(key) => write!(f, "\"{key}\""),
        }
    }
}

impl From<TypeKey> for PoolKey {
    fn from(type_key: TypeKey) -> Self {
        Self::Type(type_key)
    }
}
