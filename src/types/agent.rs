use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AgentId, AgentStatus, AgentType, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub agent_type: AgentType,
    pub status: AgentStatus,
    pub capabilities: Vec<Capability>,
    pub current_task: Option<Task>,
    pub performance: PerformanceMetrics,
    pub visual_config: VisualConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

impl Capability {
    pub fn enabled(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    /// 0 to 100.
    pub progress: u8,
    pub start_time: DateTime<Utc>,
}

/// Serialized in the backend's camelCase health shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Milliseconds.
    pub response_time: f64,
    pub success_rate: f64,
    /// Megabytes.
    pub memory_usage: f64,
    pub cpu_usage: f64,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            response_time: 0.0,
            success_rate: 1.0,
            memory_usage: 0.0,
            cpu_usage: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Sphere,
    Cube,
    Octahedron,
    Tetrahedron,
    Dodecahedron,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub idle: String,
    pub processing: String,
    pub error: String,
    pub transition: String,
}

impl AnimationConfig {
    pub fn new(idle: &str, processing: &str, error: &str, transition: &str) -> Self {
        Self {
            idle: idle.to_string(),
            processing: processing.to_string(),
            error: error.to_string(),
            transition: transition.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    pub color: String,
    pub geometry: GeometryKind,
    pub position: Vec3,
    pub scale: f64,
    pub animation: AnimationConfig,
}

/// Fixed per-type configuration used to seed the constellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub capabilities: Vec<Capability>,
    pub visual_config: VisualConfig,
}

impl Agent {
    pub fn from_config(agent_type: AgentType, config: AgentConfig) -> Self {
        Self {
            id: agent_type.agent_id(),
            name: config.name,
            agent_type,
            status: AgentStatus::Idle,
            capabilities: config.capabilities,
            current_task: None,
            performance: PerformanceMetrics::default(),
            visual_config: config.visual_config,
        }
    }

    /// The agent name as the backend reports it: lower-cased, without the `" agent"` suffix.
    pub fn backend_name(&self) -> String {
        let lower = self.name.to_lowercase();
        match lower.strip_suffix(" agent") {
            Some(stripped) => stripped.to_string(),
            None => lower,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == AgentStatus::Processing
    }

    pub fn animation_for_status(&self) -> &str {
        let animation = &self.visual_config.animation;
        match self.status {
            AgentStatus::Processing => &animation.processing,
            AgentStatus::Error => &animation.error,
            AgentStatus::Idle | AgentStatus::Offline => &animation.idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_agent(name: &str) -> Agent {
        Agent::from_config(
            AgentType::Coder,
            AgentConfig {
                name: name.to_string(),
                capabilities: vec![Capability::enabled("code", "Code", "Writes code")],
                visual_config: VisualConfig {
                    color: "#50E3C2".to_string(),
                    geometry: GeometryKind::Cube,
                    position: Vec3::new(-1.0, 1.0, 0.0),
                    scale: 1.0,
                    animation: AnimationConfig::new("rotate", "spin", "shake", "smooth"),
                },
            },
        )
    }

    #[test]
    fn test_backend_name_strips_suffix() {
        assert_eq!(sample_agent("Coder Agent").backend_name(), "coder");
        assert_eq!(sample_agent("Coder").backend_name(), "coder");
    }

    #[test]
    fn test_animation_for_status() {
        let mut agent = sample_agent("Coder Agent");
        assert_eq!(agent.animation_for_status(), "rotate");

        agent.status = AgentStatus::Processing;
        assert_eq!(agent.animation_for_status(), "spin");

        agent.status = AgentStatus::Error;
        assert_eq!(agent.animation_for_status(), "shake");

        agent.status = AgentStatus::Offline;
        assert_eq!(agent.animation_for_status(), "rotate");
    }

    #[test]
    fn test_default_performance() {
        let metrics = PerformanceMetrics::default();
        assert_eq!(metrics.success_rate, 1.0);
        assert_eq!(metrics.response_time, 0.0);
    }
}
