use crate::types::{
    AgentConfig, AgentType, AnimationConfig, Capability, GeometryKind, Vec3, VisualConfig,
};

pub fn builtin_agent_config(agent_type: AgentType) -> AgentConfig {
    match agent_type {
        AgentType::Casual => casual_agent_config(),
        AgentType::Coder => coder_agent_config(),
        AgentType::File => file_agent_config(),
        AgentType::Browser => browser_agent_config(),
        AgentType::Planner => planner_agent_config(),
    }
}

fn floating_animation() -> AnimationConfig {
    AnimationConfig::new("float", "pulse", "shake", "smooth")
}

pub fn casual_agent_config() -> AgentConfig {
    AgentConfig {
        name: "Casual Agent".to_string(),
        capabilities: vec![
            Capability::enabled("chat", "Conversation", "General conversation and assistance"),
            Capability::enabled("help", "Help & Support", "Provide help and guidance"),
        ],
        visual_config: VisualConfig {
            color: "#4A90E2".to_string(),
            geometry: GeometryKind::Sphere,
            position: Vec3::new(-2.0, 0.0, 0.0),
            scale: 1.0,
            animation: floating_animation(),
        },
    }
}

pub fn coder_agent_config() -> AgentConfig {
    AgentConfig {
        name: "Coder Agent".to_string(),
        capabilities: vec![
            Capability::enabled("code", "Code Generation", "Generate and modify code"),
            Capability::enabled("debug", "Debugging", "Debug and fix code issues"),
            Capability::enabled("review", "Code Review", "Review and analyze code"),
        ],
        visual_config: VisualConfig {
            color: "#50E3C2".to_string(),
            geometry: GeometryKind::Cube,
            position: Vec3::new(-1.0, 1.0, 0.0),
            scale: 1.0,
            animation: AnimationConfig::new("rotate", "spin", "shake", "smooth"),
        },
    }
}

pub fn file_agent_config() -> AgentConfig {
    AgentConfig {
        name: "File Agent".to_string(),
        capabilities: vec![
            Capability::enabled("read", "File Reading", "Read and analyze files"),
            Capability::enabled("write", "File Writing", "Create and modify files"),
            Capability::enabled("search", "File Search", "Search through files and directories"),
        ],
        visual_config: VisualConfig {
            color: "#F5A623".to_string(),
            geometry: GeometryKind::Octahedron,
            position: Vec3::new(1.0, 1.0, 0.0),
            scale: 1.0,
            animation: floating_animation(),
        },
    }
}

pub fn browser_agent_config() -> AgentConfig {
    AgentConfig {
        name: "Browser Agent".to_string(),
        capabilities: vec![
            Capability::enabled(
                "navigate",
                "Web Navigation",
                "Navigate and interact with web pages",
            ),
            Capability::enabled("scrape", "Data Extraction", "Extract data from web pages"),
            Capability::enabled("screenshot", "Screenshots", "Capture web page screenshots"),
        ],
        visual_config: VisualConfig {
            color: "#BD10E0".to_string(),
            geometry: GeometryKind::Tetrahedron,
            position: Vec3::new(2.0, 0.0, 0.0),
            scale: 1.0,
            animation: floating_animation(),
        },
    }
}

pub fn planner_agent_config() -> AgentConfig {
    AgentConfig {
        name: "Planner Agent".to_string(),
        capabilities: vec![
            Capability::enabled("plan", "Task Planning", "Plan and organize complex tasks"),
            Capability::enabled(
                "coordinate",
                "Agent Coordination",
                "Coordinate between different agents",
            ),
            Capability::enabled("optimize", "Optimization", "Optimize workflows and processes"),
        ],
        visual_config: VisualConfig {
            color: "#D0021B".to_string(),
            geometry: GeometryKind::Dodecahedron,
            position: Vec3::new(0.0, -1.0, 0.0),
            scale: 1.0,
            animation: floating_animation(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_enabled_capabilities() {
        for agent_type in AgentType::ALL {
            let config = builtin_agent_config(agent_type);
            assert!(!config.capabilities.is_empty());
            assert!(config.capabilities.iter().all(|c| c.enabled));
        }
    }

    #[test]
    fn test_coder_agent_config() {
        let config = coder_agent_config();

        assert_eq!(config.name, "Coder Agent");
        assert_eq!(config.visual_config.geometry, GeometryKind::Cube);
        assert_eq!(config.visual_config.animation.processing, "spin");
        assert_eq!(config.capabilities.len(), 3);
    }
}
