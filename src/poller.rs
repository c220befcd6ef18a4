//! Periodic polling of the agent backend into a [`ConstellationStore`].

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::engine::random::RandomSource;
use crate::providers::AgentBackend;
use crate::store::ConstellationStore;

/// Shortest tick `run` will use; zero periods are raised to this.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct ConstellationPoller {
    backend: Arc<dyn AgentBackend>,
    store: Arc<ConstellationStore>,
}

impl ConstellationPoller {
    pub fn new(backend: Arc<dyn AgentBackend>, store: Arc<ConstellationStore>) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &Arc<ConstellationStore> {
        &self.store
    }

    /// Fetches the latest answer and applies it. A failed fetch leaves the
    /// store at its last good state and returns false.
    pub async fn poll_once<R: RandomSource>(&self, rng: &mut R) -> bool {
        match self.backend.latest_answer().await {
            Ok(response) => {
                let active = self.store.apply_response(&response, rng);
                log::debug!(
                    "Poll applied: agent={:?} active={:?}",
                    response.agent_name(),
                    active
                );
                true
            }
            Err(e) => {
                log::warn!("Failed to poll latest answer: {}", e);
                false
            }
        }
    }

    /// Polls every `interval` until `shutdown` turns true or its sender is
    /// dropped. `on_poll` sees the outcome of each tick.
    pub async fn run<F>(
        &self,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
        mut on_poll: F,
    ) -> Result<()>
    where
        F: FnMut(bool, &ConstellationStore) + Send,
    {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let mut rng = StdRng::from_entropy();
        let mut ticker = tokio::time::interval(interval);

        log::info!("Polling agent backend every {:?}", interval);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let ok = self.poll_once(&mut rng).await;
                    on_poll(ok, &self.store);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        log::info!("Poller stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AgentStatus, HealthResponse, QueryRequest, QueryResponse, ResponseData, StopResponse,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedRandom(f64);

    impl RandomSource for FixedRandom {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    struct ScriptedBackend {
        responses: Mutex<Vec<Option<ResponseData>>>,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Option<ResponseData>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl AgentBackend for ScriptedBackend {
        async fn latest_answer(&self) -> Result<ResponseData> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Ok(ResponseData::default());
            }
            responses
                .remove(0)
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn health(&self) -> Result<HealthResponse> {
            anyhow::bail!("not scripted")
        }

        async fn send_query(&self, _request: QueryRequest) -> Result<QueryResponse> {
            anyhow::bail!("not scripted")
        }

        async fn stop(&self) -> Result<StopResponse> {
            anyhow::bail!("not scripted")
        }
    }

    fn coder_working() -> ResponseData {
        ResponseData {
            agent_name: Some("coder".to_string()),
            status: Some("working".to_string()),
            answer: Some("Compiling".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_poll_once_applies_response() {
        let backend = Arc::new(ScriptedBackend::new(vec![Some(coder_working())]));
        let poller = ConstellationPoller::new(backend, Arc::new(ConstellationStore::new()));

        assert!(poller.poll_once(&mut FixedRandom(0.5)).await);
        let coder = poller.store().get_agent("agent-coder").unwrap();
        assert_eq!(coder.status, AgentStatus::Processing);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_last_state() {
        let backend = Arc::new(ScriptedBackend::new(vec![Some(coder_working()), None]));
        let poller = ConstellationPoller::new(backend, Arc::new(ConstellationStore::new()));

        assert!(poller.poll_once(&mut FixedRandom(0.5)).await);
        let before = poller.store().state();

        assert!(!poller.poll_once(&mut FixedRandom(0.1)).await);
        assert_eq!(poller.store().state(), before);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let backend = Arc::new(ScriptedBackend::new(vec![Some(coder_working())]));
        let poller = ConstellationPoller::new(backend, Arc::new(ConstellationStore::new()));
        let (tx, rx) = watch::channel(false);

        let mut ticks = 0;
        let run = poller.run(Duration::from_millis(5), rx, |_, _| ticks += 1);
        let stop = async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            tx.send(true).unwrap();
        };

        let (result, _) = tokio::join!(run, stop);
        assert!(result.is_ok());
        assert!(ticks >= 1);
        assert_eq!(poller.store().agents().len(), 5);
    }

    #[tokio::test]
    async fn test_run_with_zero_interval_is_clamped() {
        let backend = Arc::new(ScriptedBackend::new(vec![Some(coder_working())]));
        let poller = Arc::new(ConstellationPoller::new(
            backend,
            Arc::new(ConstellationStore::new()),
        ));
        let (tx, rx) = watch::channel(false);

        let running = poller.clone();
        let handle = tokio::spawn(async move {
            running.run(Duration::ZERO, rx, |_, _| {}).await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();

        let result = handle.await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_ok());
        assert_eq!(poller.store().agents().len(), 5);
    }
}
