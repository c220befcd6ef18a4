use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::engine::random::RandomSource;
use crate::poller::MIN_POLL_INTERVAL;
use crate::types::{AgentStatus, AgentType};

pub const SIMULATION_PERIOD: Duration = Duration::from_secs(3);

// A tick re-rolls when its sample exceeds this, i.e. 30% of the time.
const REROLL_THRESHOLD: f64 = 0.7;

const STATUSES: [AgentStatus; 4] = [
    AgentStatus::Idle,
    AgentStatus::Processing,
    AgentStatus::Error,
    AgentStatus::Offline,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockActivity {
    pub agent: AgentType,
    pub status: AgentStatus,
    pub progress: u8,
}

impl Default for MockActivity {
    fn default() -> Self {
        Self {
            agent: AgentType::Casual,
            status: AgentStatus::Idle,
            progress: 0,
        }
    }
}

/// Simulated agent backend for local development.
pub struct MockBackend {
    activity: RwLock<MockActivity>,
    query_delay: Duration,
}

pub(crate) fn pick<T: Copy>(items: &[T], rng: &mut dyn RandomSource) -> T {
    let index = (rng.next_f64() * items.len() as f64) as usize;
    items[index.min(items.len() - 1)]
}

impl MockBackend {
    pub fn new(query_delay: Duration) -> Self {
        Self {
            activity: RwLock::new(MockActivity::default()),
            query_delay,
        }
    }

    pub fn current(&self) -> MockActivity {
        *self.activity.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_activity(&self, activity: MockActivity) {
        *self.activity.write().unwrap_or_else(PoisonError::into_inner) = activity;
    }

    pub fn query_delay(&self) -> Duration {
        self.query_delay
    }

    pub fn stop(&self) {
        self.activity
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .status = AgentStatus::Idle;
    }

    /// With probability 0.3, switches to a random agent, status and progress.
    pub fn reroll(&self, rng: &mut dyn RandomSource) -> bool {
        if rng.next_f64() <= REROLL_THRESHOLD {
            return false;
        }

        let activity = MockActivity {
            agent: pick(&AgentType::ALL, rng),
            status: pick(&STATUSES, rng),
            progress: (rng.next_f64() * 100.0).floor().min(99.0) as u8,
        };
        self.set_activity(activity);
        true
    }

    /// Re-rolls the simulated activity every `period` until aborted.
    pub fn spawn_simulation(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let backend = self.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut ticker = tokio::time::interval(period.max(MIN_POLL_INTERVAL));
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if backend.reroll(&mut rng) {
                    log::debug!("Mock activity changed: {:?}", backend.current());
                }
            }
        })
    }
}

pub fn create_router(backend: Arc<MockBackend>) -> Router {
    Router::new()
        .route("/latest_answer", get(handlers::latest_answer))
        .route("/health", get(handlers::health))
        .route("/query", post(handlers::query))
        .route("/stop", get(handlers::stop))
        .layer(CorsLayer::permissive())
        .with_state(backend)
}

pub async fn serve(backend: Arc<MockBackend>, port: u16) -> Result<()> {
    let simulation = backend.spawn_simulation(SIMULATION_PERIOD);
    let app = create_router(backend);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    log::info!("Mock agent backend listening on port {}", port);

    let result = axum::serve(listener, app).await;
    simulation.abort();
    result?;
    Ok(())
}
