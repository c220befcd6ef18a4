pub mod types;
pub mod definitions;
pub mod engine;
pub mod resources;
pub mod store;
pub mod providers;
pub mod api;
pub mod poller;
pub mod performance;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ConstellationError, ConstellationResult, DisposeError};
pub use poller::ConstellationPoller;
pub use resources::{ComponentLifecycle, ResourceRegistry};
pub use store::ConstellationStore;
pub use types::*;
