use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AgentId, AgentType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    Forward,
    Backward,
    Bidirectional,
}

/// A derived link between two agents. Never stored, rebuilt on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: AgentId,
    pub to: AgentId,
    pub from_type: AgentType,
    pub to_type: AgentType,
    pub strength: f64,
    pub is_active: bool,
    pub direction: FlowDirection,
}

impl Connection {
    pub fn involves(&self, agent_id: &str) -> bool {
        self.from == agent_id || self.to == agent_id
    }

    pub fn connects(&self, a: AgentType, b: AgentType) -> bool {
        (self.from_type == a && self.to_type == b) || (self.from_type == b && self.to_type == a)
    }
}

/// Directed interaction counts between agent pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionHistory {
    counts: HashMap<String, u32>,
}

impl InteractionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(from: &str, to: &str) -> String {
        format!("{}-{}", from, to)
    }

    pub fn record(&mut self, from: &str, to: &str) {
        *self.counts.entry(Self::key(from, to)).or_insert(0) += 1;
    }

    pub fn set(&mut self, from: &str, to: &str, count: u32) {
        self.counts.insert(Self::key(from, to), count);
    }

    pub fn count(&self, from: &str, to: &str) -> u32 {
        self.counts.get(&Self::key(from, to)).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
