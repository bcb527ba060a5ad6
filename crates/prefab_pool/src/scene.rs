//! In-memory scene host
//!
//! A minimal node hierarchy backed by a slot map. Nodes carry a name, an
//! optional parent, an enabled flag and, for instantiated prefabs, the
//! payload type. It implements [`PoolHost`] so pools can run without a
//! rendering backend, which is what the tests and the demo use.

use crate::host::{PoolHost, PoolTemplate};
use crate::key::TypeKey;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a scene node
    pub struct NodeId;
}

/// Prototype that clones into payload-carrying nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefab {
    name: String,
    payload: TypeKey,
}

impl Prefab {
    /// Prefab whose instances carry payload type `T`
    pub fn new<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: TypeKey::of::<T>(),
        }
    }
}

impl PoolTemplate for Prefab {
    fn type_key(&self) -> TypeKey {
        self.payload
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    enabled: bool,
    /// Payload type for instantiated prefabs
    payload: Option<TypeKey>,
}

/// Flat node arena with parent links
#[derive(Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    instantiations: usize,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enabled node without payload
    pub fn create_node(&mut self, name: impl Into<String>, parent: Option<NodeId>) -> NodeId {
        self.nodes.insert(Node {
            name: name.into(),
            parent,
            enabled: true,
            payload: None,
        })
    }

    /// Move `node` under `parent`
    pub fn reparent(&mut self, node: NodeId, parent: NodeId) {
        if let Some(node) = self.nodes.get_mut(node) {
            node.parent = Some(parent);
        }
    }

    /// Name of a node
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(|node| node.name.as_str())
    }

    /// Parent of a node
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    /// Whether a node exists and is enabled
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.enabled)
    }

    /// Payload type of an instantiated node
    pub fn payload_of(&self, id: NodeId) -> Option<TypeKey> {
        self.nodes.get(id)?.payload
    }

    /// Direct children of `parent`
    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(move |(_, node)| node.parent == Some(parent))
            .map(|(id, _)| id)
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of prefab instantiations so far
    pub fn instantiate_count(&self) -> usize {
        self.instantiations
    }
}

impl PoolHost for Scene {
    type Instance = NodeId;
    type Container = NodeId;
    type Template = Prefab;

    fn create_container(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.create_node(name, parent)
    }

    fn instantiate(&mut self, template: &Prefab, parent: NodeId) -> NodeId {
        self.instantiations += 1;
        self.nodes.insert(Node {
            name: format!("{}(Clone)", template.name),
            parent: Some(parent),
            enabled: true,
            payload: Some(template.payload),
        })
    }

    fn set_enabled(&mut self, instance: NodeId, enabled: bool) {
        if let Some(node) = self.nodes.get_mut(instance) {
            node.enabled = enabled;
        }
    }

    fn set_parent(&mut self, instance: NodeId, container: NodeId) {
        self.reparent(instance, container);
    }

    fn describe(&self, instance: NodeId) -> String {
        match self.name_of(instance) {
            Some(name) => format!("\"{name}\""),
            None => format!("{instance:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bullet;

    #[test]
    fn test_instantiate_clones_prefab() {
        let mut scene = Scene::new();
        let root = scene.create_node("Root", None);
        let prefab = Prefab::new::<Bullet>("bullet");

        let instance = scene.instantiate(&prefab, root);
        assert_eq!(scene.name_of(instance), Some("bullet(Clone)"));
        assert_eq!(scene.parent_of(instance), Some(root));
        assert_eq!(scene.payload_of(instance), Some(TypeKey::of::<Bullet>()));
        assert!(scene.is_enabled(instance));
        assert_eq!(scene.instantiate_count(), 1);
        assert_eq!(scene.children(root).collect::<Vec<_>>(), vec![instance]);
    }

    #[test]
    fn test_enable_and_reparent() {
        let mut scene = Scene::new();
        let a = scene.create_node("A", None);
        let b = scene.create_node("B", None);
        let child = scene.create_node("Child", Some(a));

        scene.set_enabled(child, false);
        scene.set_parent(child, b);

        assert!(!scene.is_enabled(child));
        assert_eq!(scene.parent_of(child), Some(b));
        assert_eq!(scene.describe(child), "\"Child\"");
        assert_eq!(scene.children(a).count(), 0);
    }
}
