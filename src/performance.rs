//! Frame-rate sampling and render quality recommendation.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const HISTORY_LIMIT: usize = 60;
const SAMPLE_WINDOW_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityLevel {
    pub fn as_str(&self) -> &str {
        match self {
            QualityLevel::Low => "low",
            QualityLevel::Medium => "medium",
            QualityLevel::High => "high",
            QualityLevel::Ultra => "ultra",
        }
    }

    pub fn recommend(fps: u32) -> Self {
        match fps {
            55.. => QualityLevel::Ultra,
            45..=54 => QualityLevel::High,
            30..=44 => QualityLevel::Medium,
            _ => QualityLevel::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub fps: u32,
    /// Mean of the recorded frame deltas, in milliseconds.
    pub frame_time: f64,
    /// Mean of the recorded memory samples, in megabytes.
    pub memory_usage: f64,
    pub frame_time_history: Vec<f64>,
    pub memory_history: Vec<f64>,
    pub is_monitoring: bool,
}

/// Rolling frame statistics. Timestamps are milliseconds from any fixed origin.
#[derive(Debug, Default)]
pub struct FrameMonitor {
    monitoring: bool,
    fps: u32,
    frames_in_window: u32,
    window_start: f64,
    last_frame: f64,
    frame_times: VecDeque<f64>,
    memory: VecDeque<f64>,
}

fn push_bounded(history: &mut VecDeque<f64>, value: f64) {
    history.push_back(value);
    if history.len() > HISTORY_LIMIT {
        history.pop_front();
    }
}

fn mean(values: &VecDeque<f64>) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl FrameMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears history and starts a new window at `now`. Ignored while running.
    pub fn start(&mut self, now: f64) {
        if self.monitoring {
            return;
        }

        self.monitoring = true;
        self.frames_in_window = 0;
        self.window_start = now;
        self.last_frame = now;
        self.frame_times.clear();
        self.memory.clear();
        log::debug!("Frame monitoring started");
    }

    pub fn stop(&mut self) {
        self.monitoring = false;
        log::debug!("Frame monitoring stopped");
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Records one rendered frame. Returns fresh metrics whenever a full
    /// sample window has elapsed and the fps figure was updated.
    pub fn record_frame(&mut self, now: f64) -> Option<FrameMetrics> {
        if !self.monitoring {
            return None;
        }

        push_bounded(&mut self.frame_times, (now - self.last_frame).max(0.0));
        self.last_frame = now;
        self.frames_in_window += 1;

        let elapsed = now - self.window_start;
        if elapsed < SAMPLE_WINDOW_MS {
            return None;
        }

        self.fps = (self.frames_in_window as f64 * 1000.0 / elapsed).round() as u32;
        self.frames_in_window = 0;
        self.window_start = now;
        Some(self.metrics())
    }

    pub fn record_memory(&mut self, megabytes: f64) {
        push_bounded(&mut self.memory, megabytes);
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn metrics(&self) -> FrameMetrics {
        FrameMetrics {
            fps: self.fps,
            frame_time: mean(&self.frame_times),
            memory_usage: mean(&self.memory),
            frame_time_history: self.frame_times.iter().copied().collect(),
            memory_history: self.memory.iter().copied().collect(),
            is_monitoring: self.monitoring,
        }
    }

    pub fn recommended_quality(&self) -> QualityLevel {
        QualityLevel::recommend(self.fps)
    }
}
