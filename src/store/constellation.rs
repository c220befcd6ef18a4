use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::engine::agents::{
    create_default_agents, get_constellation_positions, is_agent_active,
    update_agent_from_response,
};
use crate::engine::connections::{build_connections, ordered_agents};
use crate::engine::random::RandomSource;
use crate::types::{
    Agent, AgentId, AgentStatus, Connection, InteractionHistory, ResponseData, ThoughtNetwork,
    Vec3,
};

pub const DEFAULT_THOUGHT_CENTER: Vec3 = Vec3::new(0.0, 2.0, 0.0);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstellationState {
    pub agents: BTreeMap<AgentId, Agent>,
    pub active_agents: Vec<AgentId>,
    pub interactions: InteractionHistory,
    pub reasoning: Option<String>,
    pub thoughts: ThoughtNetwork,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPlacement {
    pub agent: Agent,
    pub position: Vec3,
    pub animation: String,
    pub is_active: bool,
}

/// Plain-data description of everything the renderer draws for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationSnapshot {
    pub agents: Vec<AgentPlacement>,
    pub connections: Vec<Connection>,
    pub thoughts: ThoughtNetwork,
}

/// Canonical agent state, updated on each poll tick.
pub struct ConstellationStore {
    state: RwLock<ConstellationState>,
    thought_center: Vec3,
    thought_scale: f64,
}

impl ConstellationStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ConstellationState::default()),
            thought_center: DEFAULT_THOUGHT_CENTER,
            thought_scale: 1.0,
        }
    }

    pub fn with_defaults() -> Self {
        let store = Self::new();
        store.initialize_defaults();
        store
    }

    pub fn with_thought_layout(mut self, center: Vec3, scale: f64) -> Self {
        self.thought_center = center;
        self.thought_scale = scale;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, ConstellationState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ConstellationState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds one agent per known type. Does nothing if any agent exists.
    pub fn initialize_defaults(&self) -> bool {
        let mut state = self.write();
        if !state.agents.is_empty() {
            return false;
        }

        state.agents = create_default_agents();
        true
    }

    pub fn state(&self) -> ConstellationState {
        self.read().clone()
    }

    pub fn agents(&self) -> Vec<Agent> {
        ordered_agents(&self.read().agents).into_iter().cloned().collect()
    }

    pub fn get_agent(&self, id: &str) -> Option<Agent> {
        self.read().agents.get(id).cloned()
    }

    pub fn add_agent(&self, agent: Agent) {
        self.write().agents.insert(agent.id.clone(), agent);
    }

    /// Applies `update` to the agent if it exists.
    pub fn update_agent(&self, id: &str, update: impl FnOnce(&mut Agent)) -> bool {
        match self.write().agents.get_mut(id) {
            Some(agent) => {
                update(agent);
                true
            }
            None => false,
        }
    }

    pub fn remove_agent(&self, id: &str) -> Option<Agent> {
        let mut state = self.write();
        state.active_agents.retain(|active| active != id);
        state.agents.remove(id)
    }

    pub fn active_agents(&self) -> Vec<AgentId> {
        self.read().active_agents.clone()
    }

    pub fn set_active_agents(&self, ids: Vec<AgentId>) {
        self.write().active_agents = ids;
    }

    pub fn add_active_agent(&self, id: &str) {
        let mut state = self.write();
        if !state.active_agents.iter().any(|active| active == id) {
            state.active_agents.push(id.to_string());
        }
    }

    pub fn remove_active_agent(&self, id: &str) {
        self.write().active_agents.retain(|active| active != id);
    }

    pub fn record_interaction(&self, from: &str, to: &str) {
        self.write().interactions.record(from, to);
    }

    pub fn reset(&self) {
        *self.write() = ConstellationState::default();
    }

    /// One poll tick: refreshes the agents the response names, idles the
    /// ones that stopped processing, and rebuilds the thought network when
    /// the reasoning text changed. Returns the new active ids.
    pub fn apply_response(
        &self,
        response: &ResponseData,
        rng: &mut dyn RandomSource,
    ) -> Vec<AgentId> {
        self.initialize_defaults();

        let mut state = self.write();
        let mut active = Vec::new();

        for agent in state.agents.values_mut() {
            if is_agent_active(agent.agent_type, response) {
                active.push(agent.id.clone());
                *agent = update_agent_from_response(agent, response, rng);
            } else if agent.status == AgentStatus::Processing {
                agent.status = AgentStatus::Idle;
                agent.current_task = None;
            }
        }
        state.active_agents = active.clone();

        if let Some(reasoning) = response.reasoning.as_deref() {
            if state.reasoning.as_deref() != Some(reasoning) {
                state.thoughts =
                    ThoughtNetwork::build(reasoning, self.thought_center, self.thought_scale, rng);
                state.reasoning = Some(reasoning.to_string());
            }
        }

        active
    }

    pub fn thoughts(&self) -> ThoughtNetwork {
        self.read().thoughts.clone()
    }

    /// Rebuilds the connection graph from the current state.
    pub fn connections(&self) -> Vec<Connection> {
        let state = self.read();
        let active: HashSet<AgentId> = state.active_agents.iter().cloned().collect();
        build_connections(&state.agents, &active, &state.interactions)
    }

    pub fn snapshot(&self, radius: f64) -> ConstellationSnapshot {
        let state = self.read();
        let active: HashSet<AgentId> = state.active_agents.iter().cloned().collect();
        let ordered = ordered_agents(&state.agents);
        let positions = get_constellation_positions(ordered.len(), radius);

        let agents = ordered
            .into_iter()
            .zip(positions)
            .map(|(agent, position)| AgentPlacement {
                agent: agent.clone(),
                position,
                animation: agent.animation_for_status().to_string(),
                is_active: active.contains(&agent.id),
            })
            .collect();

        ConstellationSnapshot {
            agents,
            connections: build_connections(&state.agents, &active, &state.interactions),
            thoughts: state.thoughts.clone(),
        }
    }
}

impl Default for ConstellationStore {
    fn default() -> Self {
        Self::new()
    }
}
