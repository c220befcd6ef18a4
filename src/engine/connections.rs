use std::collections::{BTreeMap, HashSet};

use crate::types::{
    Agent, AgentId, AgentStatus, AgentType, Connection, FlowDirection, InteractionHistory,
};

/// Connections at or below this strength are never materialized.
pub const MIN_CONNECTION_STRENGTH: f64 = 0.1;

const AFFINITY_BONUS: f64 = 0.3;
const CO_PROCESSING_BONUS: f64 = 0.4;
const COMPLEMENTARY_BONUS: f64 = 0.2;

fn affinity_partners(agent_type: AgentType) -> &'static [AgentType] {
    match agent_type {
        AgentType::Coder => &[AgentType::File, AgentType::Browser],
        AgentType::File => &[AgentType::Coder, AgentType::Browser, AgentType::Planner],
        AgentType::Browser => &[AgentType::Coder, AgentType::File],
        AgentType::Planner => &[
            AgentType::Coder,
            AgentType::File,
            AgentType::Browser,
            AgentType::Casual,
        ],
        AgentType::Casual => &[AgentType::Planner],
    }
}

pub fn has_affinity(a: AgentType, b: AgentType) -> bool {
    affinity_partners(a).contains(&b) || affinity_partners(b).contains(&a)
}

fn is_pair(a: AgentType, b: AgentType, x: AgentType, y: AgentType) -> bool {
    (a == x && b == y) || (a == y && b == x)
}

/// History-based strength: 0.1 base plus 0.1 per recorded interaction in
/// either direction, saturating at 1.0.
pub fn calculate_connection_strength(
    from: &Agent,
    to: &Agent,
    history: &InteractionHistory,
) -> f64 {
    if from.id.is_empty() || to.id.is_empty() {
        return 0.0;
    }

    let total = history.count(&from.id, &to.id) + history.count(&to.id, &from.id);
    (MIN_CONNECTION_STRENGTH + total as f64 * 0.1).min(1.0)
}

pub fn apply_affinity_bonus(from: &Agent, to: &Agent, base_strength: f64) -> f64 {
    let (a, b) = (from.agent_type, to.agent_type);
    let mut strength = base_strength;

    if has_affinity(a, b) {
        strength += AFFINITY_BONUS;
    }
    if from.is_processing() && to.is_processing() {
        strength += CO_PROCESSING_BONUS;
    }
    if is_pair(a, b, AgentType::Coder, AgentType::File) {
        strength += COMPLEMENTARY_BONUS;
    }
    if is_pair(a, b, AgentType::Coder, AgentType::Browser) {
        strength += COMPLEMENTARY_BONUS;
    }

    strength.min(1.0)
}

/// Which way data flows along `from -> to`. Type rules win over status rules.
pub fn flow_direction(from: &Agent, to: &Agent) -> FlowDirection {
    use AgentType::*;

    match (from.agent_type, to.agent_type) {
        (Planner, _) => return FlowDirection::Forward,
        (_, Planner) => return FlowDirection::Backward,
        (File, Coder) | (Browser, Coder) => return FlowDirection::Forward,
        (Coder, File) | (Coder, Browser) => return FlowDirection::Backward,
        _ => {}
    }

    match (from.status, to.status) {
        (AgentStatus::Processing, AgentStatus::Idle) => FlowDirection::Forward,
        (AgentStatus::Idle, AgentStatus::Processing) => FlowDirection::Backward,
        _ => FlowDirection::Bidirectional,
    }
}

/// Agents in constellation order: by type, then id.
pub fn ordered_agents(agents: &BTreeMap<AgentId, Agent>) -> Vec<&Agent> {
    let mut ordered: Vec<&Agent> = agents.values().collect();
    ordered.sort_by(|a, b| a.agent_type.cmp(&b.agent_type).then_with(|| a.id.cmp(&b.id)));
    ordered
}

/// Builds the full connection graph from scratch. Weak pairs are dropped.
pub fn build_connections(
    agents: &BTreeMap<AgentId, Agent>,
    active_agents: &HashSet<AgentId>,
    history: &InteractionHistory,
) -> Vec<Connection> {
    let ordered = ordered_agents(agents);
    let mut connections = Vec::new();

    for (i, from) in ordered.iter().enumerate() {
        for to in ordered.iter().skip(i + 1) {
            let base = calculate_connection_strength(from, to, history);
            let strength = apply_affinity_bonus(from, to, base);

            if strength <= MIN_CONNECTION_STRENGTH {
                continue;
            }

            connections.push(Connection {
                from: from.id.clone(),
                to: to.id.clone(),
                from_type: from.agent_type,
                to_type: to.agent_type,
                strength,
                is_active: active_agents.contains(&from.id) || active_agents.contains(&to.id),
                direction: flow_direction(from, to),
            });
        }
    }

    connections
}
