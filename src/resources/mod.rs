//! Tracking and teardown of GPU-backed scene resources.

pub mod disposable;
pub mod lifecycle;
pub mod registry;

pub use disposable::{Disposable, MaterialSlot, Resource, ResourceKind, SceneNode};
pub use lifecycle::{ComponentLifecycle, LifecycleCallback, MountScope, MountState};
pub use registry::{RegistryStats, ResourceRegistry};
