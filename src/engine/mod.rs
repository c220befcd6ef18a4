pub mod agents;
pub mod connections;
pub mod random;
pub mod reasoning;

pub use agents::{
    create_default_agents, get_constellation_positions, is_agent_active,
    update_agent_from_response,
};
pub use connections::{build_connections, calculate_connection_strength};
pub use random::RandomSource;
pub use reasoning::{parse_reasoning, reasoning_segments, split_sentences};
