use serde::Deserialize;

use super::error::TraceError;

/// Upper bound on `steps_per_segment`.
pub const MAX_STEPS_PER_SEGMENT: usize = 1024;

/// Tuning knobs for sampling and gesture validation.
///
/// All distances are in the coordinate space the glyph is placed in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Samples evaluated per cubic segment (default: 32, 2 to 1024).
    pub steps_per_segment: usize,
    /// Maximum distance from the path for a move to be accepted (default: 36).
    pub tolerance_radius: f32,
    /// Touch-down radius around the start (or resume) sample.
    /// Falls back to `tolerance_radius` when unset.
    pub start_tolerance: Option<f32>,
    /// Forward search window as a fraction of the sample count (default: 0.05, at most 1).
    pub lookahead_fraction: f32,
    /// Lower bound for the forward search window (default: 3).
    pub min_lookahead: usize,
    /// Samples behind the cursor still considered on-track (default: 3).
    pub backward_slack: usize,
    /// Samples before the last one that already count as the end (default: 0).
    /// Must stay below the sample count of the glyph it is used with.
    pub completion_margin: usize,
    /// Keep progress when the finger lifts mid-trace (default: true).
    pub resume_after_lift: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            steps_per_segment: 32,
            tolerance_radius: 36.0,
            start_tolerance: None,
            lookahead_fraction: 0.05,
            min_lookahead: 3,
            backward_slack: 3,
            completion_margin: 0,
            resume_after_lift: true,
        }
    }
}

impl TraceConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Copy of this config with a different move tolerance.
    pub fn with_tolerance(mut self, radius: f32) -> Self {
        self.tolerance_radius = radius;
        self
    }

    /// Effective touch-down radius.
    pub fn start_radius(&self) -> f32 {
        self.start_tolerance.unwrap_or(self.tolerance_radius)
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        if self.steps_per_segment < 2 {
            return Err(TraceError::TooFewSamples(self.steps_per_segment));
        }
        if self.steps_per_segment > MAX_STEPS_PER_SEGMENT {
            return Err(TraceError::InvalidConfig(format!(
                "steps_per_segment must be <= {MAX_STEPS_PER_SEGMENT}, got {}",
                self.steps_per_segment
            )));
        }
        if !(self.tolerance_radius.is_finite() && self.tolerance_radius > 0.0) {
            return Err(TraceError::InvalidConfig(format!(
                "tolerance_radius must be positive, got {}",
                self.tolerance_radius
            )));
        }
        let start = self.start_radius();
        if !(start.is_finite() && start > 0.0) {
            return Err(TraceError::InvalidConfig(format!(
                "start_tolerance must be positive, got {start}"
            )));
        }
        if !(0.0..=1.0).contains(&self.lookahead_fraction) {
            return Err(TraceError::InvalidConfig(format!(
                "lookahead_fraction must be in [0, 1], got {}",
                self.lookahead_fraction
            )));
        }
        Ok(())
    }

    /// [`validate`](Self::validate), plus the checks that depend on the
    /// sampled glyph. A completion margin must not let the first advance
    /// (onto sample 1) already count as the end.
    pub fn validate_for(&self, sample_count: usize) -> Result<(), TraceError> {
        self.validate()?;
        let last = sample_count.saturating_sub(1);
        if self.completion_margin > 0 && self.completion_margin.saturating_add(1) >= last {
            return Err(TraceError::InvalidConfig(format!(
                "completion_margin {} leaves nothing to trace over {sample_count} samples",
                self.completion_margin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TraceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start_radius(), config.tolerance_radius);
    }

    #[test]
    fn parse_partial_json() {
        let config = TraceConfig::from_json(r#"{ "tolerance_radius": 48.0, "backward_slack": 5 }"#)
            .unwrap();
        assert_eq!(config.tolerance_radius, 48.0);
        assert_eq!(config.backward_slack, 5);
        assert_eq!(config.steps_per_segment, 32);
        assert!(config.resume_after_lift);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            TraceConfig::from_json(r#"{ "steps_per_segment": 1 }"#),
            Err(TraceError::TooFewSamples(1))
        ));
        assert!(matches!(
            TraceConfig::from_json(r#"{ "tolerance_radius": 0.0 }"#),
            Err(TraceError::InvalidConfig(_))
        ));
        assert!(matches!(
            TraceConfig::from_json(r#"{ "start_tolerance": -2.0 }"#),
            Err(TraceError::InvalidConfig(_))
        ));
        assert!(matches!(
            TraceConfig::from_json("not json"),
            Err(TraceError::Json(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_window_and_resolution() {
        assert!(matches!(
            TraceConfig::from_json(r#"{ "lookahead_fraction": 1e30 }"#),
            Err(TraceError::InvalidConfig(_))
        ));
        assert!(matches!(
            TraceConfig::from_json(r#"{ "lookahead_fraction": 1.5 }"#),
            Err(TraceError::InvalidConfig(_))
        ));
        assert!(TraceConfig::from_json(r#"{ "lookahead_fraction": 1.0 }"#).is_ok());
        assert!(matches!(
            TraceConfig::from_json(r#"{ "steps_per_segment": 1000000 }"#),
            Err(TraceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn completion_margin_must_leave_room_to_trace() {
        let config = TraceConfig::from_json(r#"{ "completion_margin": 1000 }"#).unwrap();
        assert!(matches!(config.validate_for(20), Err(TraceError::InvalidConfig(_))));

        let config = TraceConfig {
            completion_margin: usize::MAX,
            ..TraceConfig::default()
        };
        assert!(matches!(config.validate_for(20), Err(TraceError::InvalidConfig(_))));

        let config = TraceConfig {
            completion_margin: 2,
            ..TraceConfig::default()
        };
        assert!(config.validate_for(20).is_ok());
        assert!(matches!(config.validate_for(3), Err(TraceError::InvalidConfig(_))));
        assert!(TraceConfig::default().validate_for(2).is_ok());
    }

    #[test]
    fn start_tolerance_overrides() {
        let config = TraceConfig {
            start_tolerance: Some(50.0),
            ..TraceConfig::default()
        };
        assert_eq!(config.start_radius(), 50.0);
        assert_eq!(config.clone().with_tolerance(10.0).tolerance_radius, 10.0);
    }
}
