use chrono::Utc;
use std::collections::BTreeMap;
use std::f64::consts::PI;
use uuid::Uuid;

use crate::definitions::builtin_agent_config;
use crate::engine::random::RandomSource;
use crate::types::{
    Agent, AgentId, AgentStatus, AgentType, PerformanceMetrics, ResponseData, Task, Vec3,
};

const TASK_DESCRIPTION_LIMIT: usize = 100;

/// One agent per known type, keyed by `agent-{type}`.
pub fn create_default_agents() -> BTreeMap<AgentId, Agent> {
    AgentType::ALL
        .into_iter()
        .map(|agent_type| {
            let agent = Agent::from_config(agent_type, builtin_agent_config(agent_type));
            (agent.id.clone(), agent)
        })
        .collect()
}

/// Simulated metrics; the backend does not report per-agent performance.
pub fn sample_performance(rng: &mut dyn RandomSource) -> PerformanceMetrics {
    PerformanceMetrics {
        response_time: rng.uniform(200.0, 1000.0),
        success_rate: rng.uniform(0.8, 0.2),
        memory_usage: rng.uniform(50.0, 100.0),
        cpu_usage: rng.uniform(0.1, 0.3),
    }
}

pub fn task_description(answer: &str) -> String {
    let mut chars = answer.chars();
    let head: String = chars.by_ref().take(TASK_DESCRIPTION_LIMIT).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Applies one poll response to an agent. Status and task only change when
/// the response names this agent; performance is resampled on every call.
pub fn update_agent_from_response(
    agent: &Agent,
    response: &ResponseData,
    rng: &mut dyn RandomSource,
) -> Agent {
    let mut updated = agent.clone();

    if response.agent_name.as_deref() == Some(agent.backend_name().as_str()) {
        if let Some(status) = response.status() {
            updated.status = AgentStatus::from_api(status);
        }

        if let Some(answer) = response.answer() {
            updated.current_task = Some(Task {
                id: format!("task-{}", Uuid::now_v7()),
                description: task_description(answer),
                progress: if response.done { 100 } else { 50 },
                start_time: Utc::now(),
            });
        }
    }

    updated.performance = sample_performance(rng);
    updated
}

pub fn is_agent_active(agent_type: AgentType, response: &ResponseData) -> bool {
    let Some(reported) = response.agent_name() else {
        return false;
    };

    let agent_name = agent_type.as_str().to_lowercase();
    let reported = reported.to_lowercase();
    reported.contains(&agent_name) || agent_name.contains(&reported)
}

/// Evenly spaced points on a horizontal circle, with a small height wave.
pub fn get_constellation_positions(count: usize, radius: f64) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }

    let angle_step = (PI * 2.0) / count as f64;
    (0..count)
        .map(|index| {
            let angle = index as f64 * angle_step;
            Vec3::new(
                angle.cos() * radius,
                (index as f64 * 0.5).sin() * 0.5,
                angle.sin() * radius,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRandom(f64);

    impl RandomSource for FixedRandom {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn default_agent(agent_type: AgentType) -> Agent {
        create_default_agents()
            .remove(&agent_type.agent_id())
            .unwrap()
    }

    fn response(agent_name: &str, status: &str, answer: &str, done: bool) -> ResponseData {
        ResponseData {
            agent_name: Some(agent_name.to_string()),
            status: Some(status.to_string()),
            answer: Some(answer.to_string()),
            done,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_default_agents() {
        let agents = create_default_agents();
        assert_eq!(agents.len(), 5);

        for agent_type in AgentType::ALL {
            let agent = &agents[&agent_type.agent_id()];
            assert_eq!(agent.agent_type, agent_type);
            assert_eq!(agent.status, AgentStatus::Idle);
            assert!(agent.capabilities.iter().all(|c| c.enabled));
            assert_eq!(agent.performance.success_rate, 1.0);
            assert_eq!(agent.performance.response_time, 0.0);
            assert!(agent.current_task.is_none());
        }

        let positions: Vec<Vec3> = agents.values().map(|a| a.visual_config.position).collect();
        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_update_matching_agent() {
        let coder = default_agent(AgentType::Coder);
        let answer = "x".repeat(150);
        let mut rng = FixedRandom(0.5);

        let updated = update_agent_from_response(
            &coder,
            &response("coder", "working", &answer, false),
            &mut rng,
        );

        assert_eq!(updated.status, AgentStatus::Processing);
        let task = updated.current_task.unwrap();
        assert_eq!(task.description.chars().count(), 103);
        assert!(task.description.ends_with("..."));
        assert_eq!(task.progress, 50);
        assert!(task.id.starts_with("task-"));
    }

    #[test]
    fn test_update_short_answer_done() {
        let file = default_agent(AgentType::File);
        let mut rng = FixedRandom(0.0);

        let updated =
            update_agent_from_response(&file, &response("file", "ready", "done", true), &mut rng);

        assert_eq!(updated.status, AgentStatus::Idle);
        let task = updated.current_task.unwrap();
        assert_eq!(task.description, "done");
        assert_eq!(task.progress, 100);
    }

    #[test]
    fn test_exactly_limit_answer_not_truncated() {
        let answer = "y".repeat(100);
        assert_eq!(task_description(&answer), answer);
    }

    #[test]
    fn test_update_without_status_keeps_status() {
        let mut coder = default_agent(AgentType::Coder);
        coder.status = AgentStatus::Error;
        let mut rng = FixedRandom(0.0);

        let data = ResponseData {
            agent_name: Some("coder".to_string()),
            ..Default::default()
        };
        let updated = update_agent_from_response(&coder, &data, &mut rng);

        assert_eq!(updated.status, AgentStatus::Error);
        assert!(updated.current_task.is_none());
    }

    #[test]
    fn test_update_empty_status_keeps_status() {
        let mut coder = default_agent(AgentType::Coder);
        coder.status = AgentStatus::Error;

        let updated = update_agent_from_response(
            &coder,
            &response("coder", "", "still going", false),
            &mut FixedRandom(0.5),
        );

        assert_eq!(updated.status, AgentStatus::Error);
        assert_eq!(updated.current_task.unwrap().description, "still going");
    }

    #[test]
    fn test_non_matching_agent_still_refreshes_performance() {
        // Pins the current behavior: performance is resampled even for
        // agents the response does not name.
        let planner = default_agent(AgentType::Planner);
        let mut rng = FixedRandom(0.5);

        let updated = update_agent_from_response(
            &planner,
            &response("coder", "working", "busy", false),
            &mut rng,
        );

        assert_eq!(updated.status, planner.status);
        assert_eq!(updated.current_task, planner.current_task);
        assert_eq!(updated.name, planner.name);
        assert!((updated.performance.response_time - 700.0).abs() < 1e-9);
        assert!((updated.performance.success_rate - 0.9).abs() < 1e-9);
        assert!((updated.performance.memory_usage - 100.0).abs() < 1e-9);
        assert!((updated.performance.cpu_usage - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_sample_performance_bounds() {
        let low = sample_performance(&mut FixedRandom(0.0));
        assert_eq!(low.response_time, 200.0);
        assert_eq!(low.success_rate, 0.8);
        assert_eq!(low.memory_usage, 50.0);
        assert!((low.cpu_usage - 0.1).abs() < 1e-12);

        let high = sample_performance(&mut FixedRandom(0.999_999));
        assert!(high.response_time < 1200.0);
        assert!(high.success_rate < 1.0);
        assert!(high.memory_usage < 150.0);
        assert!(high.cpu_usage < 0.4);
    }

    #[test]
    fn test_is_agent_active() {
        let data = ResponseData {
            agent_name: Some("coder_agent".to_string()),
            ..Default::default()
        };
        assert!(is_agent_active(AgentType::Coder, &data));
        assert!(!is_agent_active(AgentType::File, &data));

        let short = ResponseData {
            agent_name: Some("Plan".to_string()),
            ..Default::default()
        };
        assert!(is_agent_active(AgentType::Planner, &short));

        assert!(!is_agent_active(AgentType::Coder, &ResponseData::default()));
    }

    #[test]
    fn test_constellation_positions_on_circle() {
        let positions = get_constellation_positions(5, 4.0);
        assert_eq!(positions.len(), 5);

        for (index, position) in positions.iter().enumerate() {
            assert!((position.horizontal_distance() - 4.0).abs() < 1e-9);
            assert!((position.y - (index as f64 * 0.5).sin() * 0.5).abs() < 1e-12);
        }
        assert!((positions[0].x - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_constellation_positions_empty() {
        assert!(get_constellation_positions(0, 3.0).is_empty());
    }

    #[test]
    fn test_constellation_positions_nan_radius_does_not_panic() {
        let positions = get_constellation_positions(3, f64::NAN);
        assert_eq!(positions.len(), 3);
        assert!(positions[0].x.is_nan());
    }
}
