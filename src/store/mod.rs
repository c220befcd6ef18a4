pub mod constellation;

pub use constellation::{
    AgentPlacement, ConstellationSnapshot, ConstellationState, ConstellationStore,
    DEFAULT_THOUGHT_CENTER,
};
