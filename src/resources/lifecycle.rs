use chrono::Utc;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::disposable::Resource;
use super::registry::{RegistryStats, ResourceRegistry};

pub type LifecycleCallback = Box<dyn FnMut() + Send>;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Unmounted,
    Mounted,
}

/// Binds a visual component's mount/unmount to registry registration and
/// disposal. Whatever framework hook owns the component calls `activate`
/// and `deactivate`; repeated signals in the same state are ignored.
pub struct ComponentLifecycle {
    component_id: String,
    registry: Arc<ResourceRegistry>,
    on_mount: Option<LifecycleCallback>,
    on_unmount: Option<LifecycleCallback>,
    resources: Vec<Option<Resource>>,
    resource_ids: Vec<String>,
    state: MountState,
}

impl ComponentLifecycle {
    pub fn new(component_id: impl Into<String>, registry: Arc<ResourceRegistry>) -> Self {
        Self {
            component_id: component_id.into(),
            registry,
            on_mount: None,
            on_unmount: None,
            resources: Vec::new(),
            resource_ids: Vec::new(),
            state: MountState::Unmounted,
        }
    }

    pub fn with_resources(mut self, resources: Vec<Option<Resource>>) -> Self {
        self.resources = resources;
        self
    }

    pub fn on_mount(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_mount = Some(Box::new(callback));
        self
    }

    pub fn on_unmount(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_unmount = Some(Box::new(callback));
        self
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state == MountState::Mounted
    }

    /// Ids this binding currently owns in the registry.
    pub fn resource_ids(&self) -> &[String] {
        &self.resource_ids
    }

    pub fn activate(&mut self) {
        if self.is_mounted() {
            return;
        }

        self.register_resource_list();
        self.state = MountState::Mounted;
        if let Some(callback) = self.on_mount.as_mut() {
            callback();
        }

        log::debug!("3D component {} mounted", self.component_id);
    }

    pub fn deactivate(&mut self) {
        if !self.is_mounted() {
            return;
        }

        self.dispose_tracked();
        if let Some(callback) = self.on_unmount.as_mut() {
            callback();
        }
        self.state = MountState::Unmounted;

        log::debug!("3D component {} unmounted", self.component_id);
    }

    /// Activates now and deactivates when the returned scope is dropped.
    pub fn mount(&mut self) -> MountScope<'_> {
        self.activate();
        MountScope { binding: self }
    }

    /// Replaces the resource list. A list holding the same objects in the
    /// same slots is not a change.
    pub fn set_resources(&mut self, resources: Vec<Option<Resource>>) {
        if same_resources(&self.resources, &resources) {
            return;
        }

        self.resources = resources;
        if self.is_mounted() {
            self.dispose_tracked();
            self.register_resource_list();
        }
    }

    /// Registers an extra resource under `{component}-{suffix}-{token}` and
    /// tracks it for teardown.
    pub fn register_resource(&mut self, resource: Resource, suffix: &str) -> String {
        let id = format!("{}-{}-{}", self.component_id, suffix, unique_token());
        self.registry.register(id.clone(), resource);
        self.resource_ids.push(id.clone());
        id
    }

    pub fn dispose_resource(&mut self, id: &str) -> bool {
        self.resource_ids.retain(|tracked| tracked != id);
        self.registry.dispose(id)
    }

    pub fn get_resource(&self, id: &str) -> Option<Resource> {
        self.registry.get(id)
    }

    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    fn register_resource_list(&mut self) {
        for (index, resource) in self.resources.iter().enumerate() {
            if let Some(resource) = resource {
                let id = format!("{}-resource-{}", self.component_id, index);
                self.registry.register(id.clone(), resource.clone());
                self.resource_ids.push(id);
            }
        }
    }

    fn dispose_tracked(&mut self) {
        for id in self.resource_ids.drain(..) {
            self.registry.dispose(&id);
        }
    }
}

impl Drop for ComponentLifecycle {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Scope guard returned by [`ComponentLifecycle::mount`].
pub struct MountScope<'a> {
    binding: &'a mut ComponentLifecycle,
}

impl Deref for MountScope<'_> {
    type Target = ComponentLifecycle;

    fn deref(&self) -> &Self::Target {
        &*self.binding
    }
}

impl DerefMut for MountScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.binding
    }
}

impl Drop for MountScope<'_> {
    fn drop(&mut self) {
        self.binding.deactivate();
    }
}

fn same_resources(a: &[Option<Resource>], b: &[Option<Resource>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (None, None) => true,
            (Some(x), Some(y)) => x.same_as(y),
            _ => false,
        })
}

/// Millisecond timestamp plus a process-wide sequence number.
fn unique_token() -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", Utc::now().timestamp_millis(), sequence)
}
