pub mod agent;
pub mod connection;
pub mod response;
pub mod thought;

pub use agent::{
    AgentConfig, AnimationConfig, Agent, Capability, GeometryKind, PerformanceMetrics, Task,
    VisualConfig,
};
pub use connection::{Connection, FlowDirection, InteractionHistory};
pub use response::{
    Block, HealthAgent, HealthResponse, HealthStatus, QueryRequest, QueryResponse, ResponseData,
    StopResponse,
};
pub use thought::{
    Pathway, PathwayType, ReasoningSegment, ReasoningStep, ThoughtNetwork, ThoughtType,
};

use serde::{Deserialize, Serialize};

pub type AgentId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Casual,
    Coder,
    File,
    Browser,
    Planner,
}

impl AgentType {
    /// Canonical order of the constellation.
    pub const ALL: [AgentType; 5] = [
        AgentType::Casual,
        AgentType::Coder,
        AgentType::File,
        AgentType::Browser,
        AgentType::Planner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Casual => "casual",
            AgentType::Coder => "coder",
            AgentType::File => "file",
            AgentType::Browser => "browser",
            AgentType::Planner => "planner",
        }
    }

    pub fn agent_id(&self) -> AgentId {
        format!("agent-{}", self.as_str())
    }

    /// Maps a free-form agent name reported by the backend onto a known type.
    pub fn from_name(name: &str) -> Option<AgentType> {
        if name.is_empty() {
            return None;
        }

        let name = name.to_lowercase();
        if name.contains("casual") {
            Some(AgentType::Casual)
        } else if name.contains("coder") || name.contains("code") {
            Some(AgentType::Coder)
        } else if name.contains("file") {
            Some(AgentType::File)
        } else if name.contains("browser") || name.contains("web") {
            Some(AgentType::Browser)
        } else if name.contains("planner") || name.contains("plan") {
            Some(AgentType::Planner)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Processing,
    Error,
    Offline,
}

impl AgentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Processing => "processing",
            AgentStatus::Error => "error",
            AgentStatus::Offline => "offline",
        }
    }

    /// Maps a backend status string onto a display status. Unknown values are idle.
    pub fn from_api(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "processing" | "working" | "active" => AgentStatus::Processing,
            "idle" | "ready" | "waiting" => AgentStatus::Idle,
            "error" | "failed" => AgentStatus::Error,
            "offline" | "disconnected" => AgentStatus::Offline,
            _ => AgentStatus::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the vertical axis, ignoring height.
    pub fn horizontal_distance(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }
}
