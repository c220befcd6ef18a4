use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThoughtType {
    Analysis,
    Decision,
    Action,
    Reflection,
}

impl ThoughtType {
    pub fn as_str(&self) -> &str {
        match self {
            ThoughtType::Analysis => "analysis",
            ThoughtType::Decision => "decision",
            ThoughtType::Action => "action",
            ThoughtType::Reflection => "reflection",
        }
    }
}

/// One classified sentence of reasoning output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub id: String,
    pub content: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
    pub thought_type: ThoughtType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathwayType {
    Reasoning,
    Data,
    Feedback,
}

/// Edge between two reasoning steps, addressed by step index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub from: usize,
    pub to: usize,
    pub from_position: Vec3,
    pub to_position: Vec3,
    pub strength: f64,
    pub pathway_type: PathwayType,
}

/// A reasoning sentence prepared for the stacked text display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningSegment {
    pub id: String,
    pub text: String,
    pub confidence: f64,
    pub position: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThoughtNetwork {
    pub steps: Vec<ReasoningStep>,
    pub positions: Vec<Vec3>,
    pub pathways: Vec<Pathway>,
}

impl ThoughtNetwork {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
