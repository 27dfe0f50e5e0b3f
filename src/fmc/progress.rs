//! Construction milestones.
//!
//! The engine reports each construction step to a [`ProgressSink`]. This is a
//! purely observational channel: sinks cannot influence the computation.

use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    CheckParameters,
    StoreParameters,
    StartComputations,
    ComputeFmeasure,
    ComputeSelection,
    ComputeContrast,
    ComputationsDone,
}

impl Milestone {
    /// All milestones in the order a successful construction reports them.
    pub const ALL: [Milestone; 7] = [
        Milestone::CheckParameters,
        Milestone::StoreParameters,
        Milestone::StartComputations,
        Milestone::ComputeFmeasure,
        Milestone::ComputeSelection,
        Milestone::ComputeContrast,
        Milestone::ComputationsDone,
    ];

    pub fn message(self) -> &'static str {
        match self {
            Milestone::CheckParameters => "Check parameters.",
            Milestone::StoreParameters => "Store parameters.",
            Milestone::StartComputations => "Start computations.",
            Milestone::ComputeFmeasure => "Compute Features F-Measure.",
            Milestone::ComputeSelection => "Compute Features Selection.",
            Milestone::ComputeContrast => "Compute Features Contrast.",
            Milestone::ComputationsDone => "Computations done.",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub trait ProgressSink: Send + Sync {
    fn milestone(&self, milestone: Milestone);
}

/// Discards every milestone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn milestone(&self, _milestone: Milestone) {}
}

/// Emits each milestone as a `tracing` info event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn milestone(&self, milestone: Milestone) {
        tracing::info!(target: "features_maximization_metric", "`FeaturesMaximizationMetric::new` : {milestone}");
    }
}

/// Keeps milestones in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    seen: Mutex<Vec<Milestone>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn milestones(&self) -> Vec<Milestone> {
        match self.seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.milestones().into_iter().map(Milestone::message).collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn milestone(&self, milestone: Milestone) {
        match self.seen.lock() {
            Ok(mut seen) => seen.push(milestone),
            Err(poisoned) => poisoned.into_inner().push(milestone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingProgress::new();
        sink.milestone(Milestone::CheckParameters);
        sink.milestone(Milestone::ComputationsDone);
        assert_eq!(
            sink.messages(),
            vec!["Check parameters.", "Computations done."]
        );
    }

    #[test]
    fn display_matches_message() {
        for m in Milestone::ALL {
            assert_eq!(m.to_string(), m.message());
        }
    }
}
