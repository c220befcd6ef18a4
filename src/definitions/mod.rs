pub mod builtin;

pub use builtin::builtin_agent_config;
