use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::disposable::Resource;

static SHARED: OnceLock<Arc<ResourceRegistry>> = OnceLock::new();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_resources: usize,
    pub disposable_resources: usize,
}

#[derive(Default)]
struct RegistryInner {
    resources: HashMap<String, Resource>,
    disposables: HashSet<String>,
}

/// Owns every tracked graphics resource and tears each one down at most once.
#[derive(Default)]
pub struct ResourceRegistry {
    inner: RwLock<RegistryInner>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry, created on first use.
    pub fn shared() -> Arc<ResourceRegistry> {
        SHARED.get_or_init(|| Arc::new(ResourceRegistry::new())).clone()
    }

    // Entries are plain data, so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `resource` under `id`. A previous entry under the same id is
    /// replaced without being disposed.
    pub fn register(&self, id: impl Into<String>, resource: Resource) {
        let id = id.into();
        let mut inner = self.write();

        if resource.is_disposable() {
            inner.disposables.insert(id.clone());
        } else {
            inner.disposables.remove(&id);
        }
        inner.resources.insert(id, resource);
    }

    pub fn get(&self, id: &str) -> Option<Resource> {
        self.read().resources.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().resources.contains_key(id)
    }

    /// Tears down and forgets `id`. Returns false when nothing was registered,
    /// which makes repeated calls harmless.
    pub fn dispose(&self, id: &str) -> bool {
        let removed = {
            let mut inner = self.write();
            let disposable = inner.disposables.remove(id);
            inner.resources.remove(id).map(|resource| (resource, disposable))
        };

        let Some((resource, disposable)) = removed else {
            return false;
        };

        if disposable {
            release(id, &resource);
        }
        true
    }

    pub fn dispose_all(&self) {
        let drained = std::mem::take(&mut *self.write());

        for id in &drained.disposables {
            if let Some(resource) = drained.resources.get(id) {
                release(id, resource);
            }
        }

        log::debug!(
            "Disposed {} of {} tracked resources",
            drained.disposables.len(),
            drained.resources.len()
        );
    }

    /// Releases everything; intended for process exit.
    pub fn shutdown(&self) {
        self.dispose_all();
    }

    pub fn stats(&self) -> RegistryStats {
        let inner = self.read();
        RegistryStats {
            total_resources: inner.resources.len(),
            disposable_resources: inner.disposables.len(),
        }
    }
}

fn release(id: &str, resource: &Resource) {
    for error in resource.release() {
        log::warn!("Error disposing resource {}: {}", id, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisposeError;
    use crate::resources::disposable::{Disposable, MaterialSlot, ResourceKind, SceneNode};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counted(Arc<AtomicUsize>);

    impl Disposable for Counted {
        fn dispose(&self) -> Result<(), DisposeError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn kind(&self) -> ResourceKind {
            ResourceKind::Geometry
        }
    }

    struct Failing;

    impl Disposable for Failing {
        fn dispose(&self) -> Result<(), DisposeError> {
            Err(DisposeError::AlreadyReleased("texture".to_string()))
        }
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn test_register_and_get() {
        let registry = ResourceRegistry::new();
        let calls = counter();
        registry.register("geo", Resource::disposable(Counted(calls.clone())));

        assert!(registry.contains("geo"));
        assert!(registry.get("geo").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(
            registry.stats(),
            RegistryStats {
                total_resources: 1,
                disposable_resources: 1
            }
        );
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let registry = ResourceRegistry::new();
        let calls = counter();
        registry.register("geo", Resource::disposable(Counted(calls.clone())));

        assert!(registry.dispose("geo"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(!registry.dispose("geo"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_dispose_unknown_id_is_noop() {
        let registry = ResourceRegistry::new();
        assert!(!registry.dispose("nothing"));
    }

    #[test]
    fn test_failed_disposal_still_removes_entry() {
        let registry = ResourceRegistry::new();
        registry.register("tex", Resource::disposable(Failing));

        assert!(registry.dispose("tex"));
        assert!(!registry.contains("tex"));
        assert_eq!(registry.stats().disposable_resources, 0);
    }

    #[test]
    fn test_opaque_resources_counted_but_not_disposable() {
        let registry = ResourceRegistry::new();
        registry.register("label", Resource::Opaque(Arc::new("text".to_string())));

        let stats = registry.stats();
        assert_eq!(stats.total_resources, 1);
        assert_eq!(stats.disposable_resources, 0);

        assert!(registry.dispose("label"));
        assert_eq!(registry.stats().total_resources, 0);
    }

    #[test]
    fn test_overwrite_does_not_dispose_previous() {
        let registry = ResourceRegistry::new();
        let first = counter();
        let second = counter();

        registry.register("geo", Resource::disposable(Counted(first.clone())));
        registry.register("geo", Resource::disposable(Counted(second.clone())));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(registry.stats().total_resources, 1);

        registry.dispose("geo");
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_overwrite_with_opaque_drops_disposable_flag() {
        let registry = ResourceRegistry::new();
        registry.register("slot", Resource::disposable(Counted(counter())));
        registry.register("slot", Resource::Opaque(Arc::new(1u8)));

        assert_eq!(registry.stats().disposable_resources, 0);
    }

    #[test]
    fn test_dispose_scene_node() {
        let registry = ResourceRegistry::new();
        let calls = counter();
        let scene = SceneNode::group("scene");
        let mesh = SceneNode::mesh(
            "agent-body",
            Arc::new(Counted(calls.clone())),
            MaterialSlot::List(vec![
                Arc::new(Counted(calls.clone())),
                Arc::new(Counted(calls.clone())),
            ]),
        );
        scene.add_child(mesh.clone());

        registry.register("agent", Resource::node(mesh));
        registry.dispose("agent");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(scene.children().is_empty());
    }

    #[test]
    fn test_dispose_all() {
        let registry = ResourceRegistry::new();
        let calls = counter();
        registry.register("a", Resource::disposable(Counted(calls.clone())));
        registry.register("b", Resource::disposable(Counted(calls.clone())));
        registry.register("c", Resource::Opaque(Arc::new(0u8)));

        registry.dispose_all();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.stats(), RegistryStats::default());

        registry.dispose_all();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_registry_is_singleton() {
        let a = ResourceRegistry::shared();
        let b = ResourceRegistry::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
