use chrono::Utc;
use std::collections::HashSet;
use std::f64::consts::PI;

use crate::engine::random::RandomSource;
use crate::types::{
    Pathway, PathwayType, ReasoningSegment, ReasoningStep, ThoughtNetwork, ThoughtType, Vec3,
};

const ANALYSIS_KEYWORDS: &[&str] = &["analy", "examin", "consider"];
const DECISION_KEYWORDS: &[&str] = &["decid", "choos", "select"];
const ACTION_KEYWORDS: &[&str] = &["execut", "implement", "perform"];

const HIGH_CERTAINTY: &[&str] = &["certain", "definitely", "clearly", "obviously", "confirmed"];
const MEDIUM_CERTAINTY: &[&str] = &["likely", "probably", "appears", "seems", "suggests"];
const LOW_CERTAINTY: &[&str] = &["might", "could", "possibly", "perhaps", "maybe", "uncertain"];

const SEQUENTIAL_THRESHOLD: f64 = 0.3;
const CROSS_LINK_THRESHOLD: f64 = 0.4;
const CROSS_LINK_FACTOR: f64 = 0.6;
const SEGMENT_SPACING: f64 = 0.4;
const DEFAULT_OVERALL_CONFIDENCE: f64 = 0.8;

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Splits on runs of `.`, `!` and `?`, keeping non-blank trimmed sentences in order.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn classify_thought(content: &str) -> ThoughtType {
    let lower = content.to_lowercase();

    if contains_any(&lower, ANALYSIS_KEYWORDS) {
        ThoughtType::Analysis
    } else if contains_any(&lower, DECISION_KEYWORDS) {
        ThoughtType::Decision
    } else if contains_any(&lower, ACTION_KEYWORDS) {
        ThoughtType::Action
    } else {
        ThoughtType::Reflection
    }
}

/// Thought-node steps with a loose confidence in `[0.6, 1.0)`.
pub fn parse_reasoning(reasoning: &str, rng: &mut dyn RandomSource) -> Vec<ReasoningStep> {
    split_sentences(reasoning)
        .into_iter()
        .enumerate()
        .map(|(index, content)| ReasoningStep {
            id: format!("thought-{}", index),
            thought_type: classify_thought(&content),
            confidence: rng.uniform(0.6, 0.4),
            timestamp: Utc::now(),
            content,
        })
        .collect()
}

/// Certainty-word confidence used by the reasoning text display.
pub fn sentence_confidence(sentence: &str, rng: &mut dyn RandomSource) -> f64 {
    let lower = sentence.to_lowercase();

    if contains_any(&lower, HIGH_CERTAINTY) {
        rng.uniform(0.9, 0.1)
    } else if contains_any(&lower, MEDIUM_CERTAINTY) {
        rng.uniform(0.6, 0.2)
    } else if contains_any(&lower, LOW_CERTAINTY) {
        rng.uniform(0.3, 0.3)
    } else {
        let word_count = sentence.split_whitespace().count();
        (0.5 + word_count as f64 / 20.0).min(0.9)
    }
}

pub fn reasoning_segments(
    reasoning: &str,
    origin: Vec3,
    rng: &mut dyn RandomSource,
) -> Vec<ReasoningSegment> {
    split_sentences(reasoning)
        .into_iter()
        .enumerate()
        .map(|(index, text)| ReasoningSegment {
            id: format!("segment-{}", index),
            confidence: sentence_confidence(&text, rng),
            position: Vec3::new(origin.x, origin.y - index as f64 * SEGMENT_SPACING, origin.z),
            text,
        })
        .collect()
}

pub fn overall_confidence(segments: &[ReasoningSegment]) -> f64 {
    if segments.is_empty() {
        return DEFAULT_OVERALL_CONFIDENCE;
    }

    segments.iter().map(|s| s.confidence).sum::<f64>() / segments.len() as f64
}

pub fn type_compatibility(a: ThoughtType, b: ThoughtType) -> f64 {
    use ThoughtType::*;

    match (a, b) {
        (Analysis, Analysis) => 0.8,
        (Analysis, Decision) | (Decision, Analysis) => 0.9,
        (Analysis, Action) | (Action, Analysis) => 0.6,
        (Analysis, Reflection) | (Reflection, Analysis) => 0.7,
        (Decision, Decision) => 0.7,
        (Decision, Action) | (Action, Decision) => 0.95,
        (Decision, Reflection) | (Reflection, Decision) => 0.5,
        (Action, Action) => 0.8,
        (Action, Reflection) | (Reflection, Action) => 0.8,
        (Reflection, Reflection) => 0.9,
    }
}

fn word_set(content: &str) -> HashSet<String> {
    content.split_whitespace().map(str::to_lowercase).collect()
}

/// Shared distinct words over all distinct words, case-insensitive.
pub fn word_overlap_ratio(a: &str, b: &str) -> f64 {
    let words_a = word_set(a);
    let words_b = word_set(b);

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }

    words_a.intersection(&words_b).count() as f64 / union as f64
}

pub fn thought_relation(a: &ReasoningStep, b: &ReasoningStep) -> f64 {
    let compatibility = type_compatibility(a.thought_type, b.thought_type);
    let confidence = (a.confidence + b.confidence) / 2.0;
    let overlap = word_overlap_ratio(&a.content, &b.content);

    compatibility * 0.5 + confidence * 0.3 + overlap * 0.2
}

pub fn pathway_type(from: ThoughtType, to: ThoughtType) -> PathwayType {
    match (from, to) {
        (ThoughtType::Decision, ThoughtType::Action) => PathwayType::Data,
        (ThoughtType::Action, ThoughtType::Reflection) => PathwayType::Feedback,
        _ => PathwayType::Reasoning,
    }
}

/// Steps on a circle of radius `2 * scale` around `center`.
pub fn node_positions(count: usize, center: Vec3, scale: f64) -> Vec<Vec3> {
    let radius = 2.0 * scale;

    (0..count)
        .map(|index| {
            let angle = (index as f64 / count as f64) * PI * 2.0;
            let height = (index as f64 * 0.5).sin() * 0.5 * scale;
            Vec3::new(
                center.x + angle.cos() * radius,
                center.y + height,
                center.z + angle.sin() * radius,
            )
        })
        .collect()
}

/// Sequential links between neighbours plus weaker cross-links two and three steps apart.
pub fn build_pathways(steps: &[ReasoningStep], positions: &[Vec3]) -> Vec<Pathway> {
    let mut pathways = Vec::new();
    let count = steps.len().min(positions.len());

    for i in 0..count.saturating_sub(1) {
        let (current, next) = (&steps[i], &steps[i + 1]);
        let strength = thought_relation(current, next);

        if strength > SEQUENTIAL_THRESHOLD {
            pathways.push(Pathway {
                from: i,
                to: i + 1,
                from_position: positions[i],
                to_position: positions[i + 1],
                strength,
                pathway_type: pathway_type(current.thought_type, next.thought_type),
            });
        }
    }

    for i in 0..count {
        for j in (i + 2)..(i + 4).min(count) {
            let strength = thought_relation(&steps[i], &steps[j]) * CROSS_LINK_FACTOR;

            if strength > CROSS_LINK_THRESHOLD {
                pathways.push(Pathway {
                    from: i,
                    to: j,
                    from_position: positions[i],
                    to_position: positions[j],
                    strength,
                    pathway_type: PathwayType::Reasoning,
                });
            }
        }
    }

    pathways
}

impl ThoughtNetwork {
    pub fn build(reasoning: &str, center: Vec3, scale: f64, rng: &mut dyn RandomSource) -> Self {
        let steps = parse_reasoning(reasoning, rng);
        let positions = node_positions(steps.len(), center, scale);
        let pathways = build_pathways(&steps, &positions);

        Self {
            steps,
            positions,
            pathways,
        }
    }
}
