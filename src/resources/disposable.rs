use std::any::Any;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::error::DisposeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
    Other,
}

/// A graphics object that must be torn down explicitly before it is dropped.
pub trait Disposable: Send + Sync {
    fn dispose(&self) -> Result<(), DisposeError>;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Other
    }
}

#[derive(Clone)]
pub enum MaterialSlot {
    Single(Arc<dyn Disposable>),
    List(Vec<Arc<dyn Disposable>>),
}

impl MaterialSlot {
    fn materials(&self) -> Vec<Arc<dyn Disposable>> {
        match self {
            MaterialSlot::Single(material) => vec![material.clone()],
            MaterialSlot::List(materials) => materials.clone(),
        }
    }
}

/// Node of a scene hierarchy. Mesh nodes own a geometry and one or more
/// materials; group nodes only hold children.
pub struct SceneNode {
    name: String,
    geometry: Option<Arc<dyn Disposable>>,
    material: Option<MaterialSlot>,
    children: RwLock<Vec<Arc<SceneNode>>>,
    parent: RwLock<Weak<SceneNode>>,
}

impl SceneNode {
    pub fn group(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            geometry: None,
            material: None,
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        })
    }

    pub fn mesh(
        name: impl Into<String>,
        geometry: Arc<dyn Disposable>,
        material: MaterialSlot,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            geometry: Some(geometry),
            material: Some(material),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_mesh(&self) -> bool {
        self.geometry.is_some() || self.material.is_some()
    }

    pub fn parent(&self) -> Option<Arc<SceneNode>> {
        self.parent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()
    }

    pub fn children(&self) -> Vec<Arc<SceneNode>> {
        self.children
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Attaches `child`, detaching it from any previous parent first.
    /// Refuses (returns false) when `child` is this node or one of its
    /// ancestors, since the tree would then contain a cycle.
    pub fn add_child(self: &Arc<Self>, child: Arc<SceneNode>) -> bool {
        if self.has_ancestor_or_self(&child) {
            log::warn!(
                "Refusing to add {} as a child of {}: would create a cycle",
                child.name,
                self.name
            );
            return false;
        }

        child.detach();
        *child.parent.write().unwrap_or_else(PoisonError::into_inner) = Arc::downgrade(self);
        self.children
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(child);
        true
    }

    fn has_ancestor_or_self(self: &Arc<Self>, node: &Arc<SceneNode>) -> bool {
        let mut current = Some(self.clone());
        while let Some(candidate) = current {
            if Arc::ptr_eq(&candidate, node) {
                return true;
            }
            current = candidate.parent();
        }
        false
    }

    pub fn remove_child(&self, child: &SceneNode) -> bool {
        let mut children = self.children.write().unwrap_or_else(PoisonError::into_inner);
        let before = children.len();
        children.retain(|c| !std::ptr::eq(Arc::as_ptr(c), child));
        let removed = children.len() != before;
        drop(children);

        if removed {
            *child.parent.write().unwrap_or_else(PoisonError::into_inner) = Weak::new();
        }
        removed
    }

    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    /// Depth-first visit of this node and all descendants.
    pub fn traverse(self: &Arc<Self>, visit: &mut dyn FnMut(&Arc<SceneNode>)) {
        visit(self);
        for child in self.children() {
            child.traverse(visit);
        }
    }

    /// Disposes every mesh's geometry and materials in the subtree, then
    /// detaches this node from its parent. Keeps going past failures and
    /// returns them.
    pub fn dispose_tree(self: &Arc<Self>) -> Vec<DisposeError> {
        let mut errors = Vec::new();

        self.traverse(&mut |node: &Arc<SceneNode>| {
            if let Some(geometry) = &node.geometry {
                if let Err(e) = geometry.dispose() {
                    errors.push(e);
                }
            }
            if let Some(slot) = &node.material {
                for material in slot.materials() {
                    if let Err(e) = material.dispose() {
                        errors.push(e);
                    }
                }
            }
        });

        self.detach();
        errors
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("mesh", &self.is_mesh())
            .field("children", &self.children().len())
            .finish()
    }
}

/// Anything a component can hand to the registry.
#[derive(Clone)]
pub enum Resource {
    Node(Arc<SceneNode>),
    Disposable(Arc<dyn Disposable>),
    /// Tracked for bookkeeping only, never torn down.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Resource {
    pub fn node(node: Arc<SceneNode>) -> Self {
        Resource::Node(node)
    }

    pub fn disposable(resource: impl Disposable + 'static) -> Self {
        Resource::Disposable(Arc::new(resource))
    }

    pub fn is_disposable(&self) -> bool {
        !matches!(self, Resource::Opaque(_))
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::Disposable(resource) => resource.kind(),
            Resource::Node(_) | Resource::Opaque(_) => ResourceKind::Other,
        }
    }

    /// Identity comparison: both refer to the same underlying object.
    pub fn same_as(&self, other: &Resource) -> bool {
        match (self, other) {
            (Resource::Node(a), Resource::Node(b)) => Arc::ptr_eq(a, b),
            (Resource::Disposable(a), Resource::Disposable(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (Resource::Opaque(a), Resource::Opaque(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }

    pub(crate) fn release(&self) -> Vec<DisposeError> {
        match self {
            Resource::Node(node) => node.dispose_tree(),
            Resource::Disposable(resource) => resource.dispose().err().into_iter().collect(),
            Resource::Opaque(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Resource::Disposable(resource) => {
                f.debug_tuple("Disposable").field(&resource.kind()).finish()
            }
            Resource::Opaque(_) => f.write_str("Opaque"),
        }
    }
}
