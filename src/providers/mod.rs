pub mod backend;

pub use backend::{AgentBackend, HttpBackend};
