//! Engine configuration.

use serde::Deserialize;

use crate::error::FmcError;

/// Configuration for the metric engine.
///
/// Loaded from the `config` object of a dataset file when present, then
/// overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FmcConfig {
    /// Exponent applied to the contrast ratio. Must be a positive integer;
    /// larger values push contrasts further away from 1.0.
    pub amplification_factor: i64,
    /// Report construction milestones through `tracing` at `info` level.
    pub verbose: bool,
}

impl Default for FmcConfig {
    fn default() -> Self {
        Self {
            amplification_factor: 1,
            verbose: false,
        }
    }
}

impl FmcConfig {
    pub fn with_amplification_factor(mut self, amplification_factor: i64) -> Self {
        self.amplification_factor = amplification_factor;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Checked amplification factor.
    pub(crate) fn validated_amplification_factor(&self) -> Result<u32, FmcError> {
        match u32::try_from(self.amplification_factor) {
            Ok(factor) if factor >= 1 => Ok(factor),
            _ => Err(FmcError::InvalidAmplificationFactor(
                self.amplification_factor,
            )),
        }
    }
}
