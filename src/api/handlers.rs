use axum::{extract::State, Json};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::server::{pick, MockActivity, MockBackend};
use crate::engine::agents::sample_performance;
use crate::engine::random::RandomSource;
use crate::types::{
    AgentType, Block, HealthAgent, HealthResponse, HealthStatus, PerformanceMetrics,
    QueryRequest, QueryResponse, ResponseData, StopResponse,
};

const ANSWERS: [&str; 7] = [
    "Analyzing code structure and dependencies...",
    "Searching for relevant files in the project...",
    "Processing user request and generating response...",
    "Coordinating with other agents for optimal solution...",
    "Executing file operations and validating results...",
    "Browsing documentation for latest information...",
    "Planning next steps in the workflow...",
];

const REASONING: [&str; 4] = [
    "First, I need to analyze the user's request carefully to understand the context and \
     requirements. This involves breaking down the problem into smaller, manageable components. \
     Then, I should consider multiple approaches to solve the problem effectively, weighing the \
     pros and cons of each option. After thorough evaluation, I will choose the most appropriate \
     solution based on the established criteria. Finally, I will implement the chosen approach \
     systematically and verify the results to ensure quality.",
    "I begin by examining the current codebase structure to identify potential areas for \
     improvement. The analysis reveals several optimization opportunities in the data processing \
     pipeline. Based on this assessment, I decide to refactor the core algorithms for better \
     performance. The implementation will involve updating the existing functions while \
     maintaining backward compatibility. Upon reflection, this approach should significantly \
     improve system efficiency.",
    "The user's query requires coordination between multiple system components. I start by \
     determining which agents are best suited for different aspects of the task. The file agent \
     can handle data retrieval, while the coder agent manages implementation details. This \
     collaborative approach ensures comprehensive coverage of all requirements. The final \
     solution integrates outputs from all participating agents seamlessly.",
    "To address this complex problem, I must first gather all relevant information from \
     available sources. The research phase reveals important constraints that will influence the \
     solution design. I then formulate a strategic plan that accounts for these limitations while \
     maximizing effectiveness. The execution phase involves careful monitoring and adjustment as \
     needed. This methodical approach ensures robust and reliable results.",
];

fn sample_blocks() -> HashMap<String, Block> {
    HashMap::from([
        (
            "block1".to_string(),
            Block {
                tool_type: "code_execution".to_string(),
                block: "console.log(\"Processing agent constellation...\");".to_string(),
                feedback: "Code executed successfully".to_string(),
                success: true,
            },
        ),
        (
            "block2".to_string(),
            Block {
                tool_type: "file_read".to_string(),
                block: "Reading agent configuration files...".to_string(),
                feedback: "Files loaded successfully".to_string(),
                success: true,
            },
        ),
    ])
}

fn display_name(agent_type: AgentType) -> String {
    let name = agent_type.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{} Agent", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Canned poll answer for the given activity.
pub fn mock_answer(activity: MockActivity, rng: &mut dyn RandomSource) -> ResponseData {
    ResponseData {
        agent_name: Some(activity.agent.as_str().to_string()),
        status: Some(activity.status.as_str().to_string()),
        answer: Some(pick(&ANSWERS, rng).to_string()),
        reasoning: Some(pick(&REASONING, rng).to_string()),
        done: activity.progress > 90,
        blocks: (rng.next_f64() > 0.5).then(sample_blocks),
        uid: Some(format!("task-{}", Utc::now().timestamp_millis())),
    }
}

/// Health report listing every agent; only the active one carries the
/// simulated status.
pub fn mock_health(activity: MockActivity, rng: &mut dyn RandomSource) -> HealthResponse {
    let agents = AgentType::ALL
        .iter()
        .map(|&agent_type| HealthAgent {
            id: agent_type.agent_id(),
            name: display_name(agent_type),
            agent_type: agent_type.as_str().to_string(),
            status: if agent_type == activity.agent {
                activity.status.as_str().to_string()
            } else {
                "idle".to_string()
            },
            performance: sample_performance(rng),
        })
        .collect();

    HealthResponse {
        status: HealthStatus::Online,
        agents,
        performance: PerformanceMetrics {
            response_time: rng.uniform(100.0, 500.0),
            success_rate: 0.95,
            memory_usage: 150.5,
            cpu_usage: 0.25,
        },
    }
}

pub async fn latest_answer(State(backend): State<Arc<MockBackend>>) -> Json<ResponseData> {
    Json(mock_answer(backend.current(), &mut rand::thread_rng()))
}

pub async fn health(State(backend): State<Arc<MockBackend>>) -> Json<HealthResponse> {
    Json(mock_health(backend.current(), &mut rand::thread_rng()))
}

pub async fn query(
    State(backend): State<Arc<MockBackend>>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    tokio::time::sleep(backend.query_delay()).await;
    let current = backend.current();

    Json(QueryResponse {
        answer: format!(
            "Processing your query: \"{}\". The agent constellation is analyzing this request...",
            request.query
        ),
        agent_name: current.agent.as_str().to_string(),
        status: "processing".to_string(),
        uid: format!("query-{}", Utc::now().timestamp_millis()),
        done: false,
        reasoning: None,
        blocks: None,
    })
}

pub async fn stop(State(backend): State<Arc<MockBackend>>) -> Json<StopResponse> {
    backend.stop();
    Json(StopResponse {
        message: "Processing stopped".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::AgentStatus;

    struct FixedRandom(f64);

    impl RandomSource for FixedRandom {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn coder_busy(progress: u8) -> MockActivity {
        MockActivity {
            agent: AgentType::Coder,
            status: AgentStatus::Processing,
            progress,
        }
    }

    #[test]
    fn test_mock_health_samples_performance() {
        let health = mock_health(coder_busy(10), &mut FixedRandom(0.5));

        assert_eq!(health.agents.len(), 5);
        assert_eq!(health.agents[1].status, "processing");
        assert_eq!(health.agents[2].status, "idle");
        for agent in &health.agents {
            assert!((agent.performance.response_time - 700.0).abs() < 1e-9);
            assert!((agent.performance.success_rate - 0.9).abs() < 1e-9);
            assert!((agent.performance.memory_usage - 100.0).abs() < 1e-9);
            assert!((agent.performance.cpu_usage - 0.25).abs() < 1e-9);
        }
        assert!((health.performance.response_time - 350.0).abs() < 1e-9);
        assert_eq!(health.performance.success_rate, 0.95);
    }

    #[test]
    fn test_mock_answer_picks_canned_text() {
        let answer = mock_answer(coder_busy(95), &mut FixedRandom(0.0));

        assert_eq!(answer.agent_name(), Some("coder"));
        assert_eq!(answer.status(), Some("processing"));
        assert_eq!(answer.answer(), Some(ANSWERS[0]));
        assert_eq!(answer.reasoning.as_deref(), Some(REASONING[0]));
        assert!(answer.done);
        assert!(answer.blocks.is_none());

        let answer = mock_answer(coder_busy(90), &mut FixedRandom(0.99));
        assert_eq!(answer.answer(), Some(ANSWERS[6]));
        assert!(!answer.done);
        assert_eq!(answer.blocks.unwrap().len(), 2);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(AgentType::Casual), "Casual Agent");
        assert_eq!(display_name(AgentType::Planner), "Planner Agent");
    }

    #[test]
    fn test_canned_reasoning_splits_into_steps() {
        for reasoning in REASONING {
            assert_eq!(crate::engine::split_sentences(reasoning).len(), 5);
        }
    }
}
