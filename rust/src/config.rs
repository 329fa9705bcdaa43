//! Configuration types for the scheduling engine.

use std::str::FromStr;

use crate::engine::ScheduleError;

/// How plan issues found during validation are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Any issue aborts the calculation.
    #[default]
    Strict,
    /// Only fatal issues abort; the resolvable part of the plan is scheduled
    /// and the rest is left unscheduled.
    Lenient,
}

impl FromStr for ValidationMode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(ScheduleError::InvalidConfig(format!(
                "unknown validation mode: {}",
                other
            ))),
        }
    }
}

/// Ordering among ready activities that share a priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Keep the order activities appear in the plan.
    #[default]
    InputOrder,
    /// Lexicographic activity id, then plan order.
    IdAscending,
}

impl FromStr for TieBreak {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input_order" => Ok(Self::InputOrder),
            "id_ascending" => Ok(Self::IdAscending),
            other => Err(ScheduleError::InvalidConfig(format!(
                "unknown tie break: {}",
                other
            ))),
        }
    }
}

/// Configuration for one `calculate` call.
#[derive(Clone, Debug)]
pub struct ScheduleConfig {
    pub validation: ValidationMode,
    pub tie_break: TieBreak,
    /// Activities with float at or below this are critical.
    pub critical_epsilon: f64,
    /// Effort floor applied to zero or negative durations.
    pub min_duration_days: f64,
    /// Upper bound on calendar days walked for a single activity.
    pub max_horizon_days: u32,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Strict,
            tie_break: TieBreak::InputOrder,
            critical_epsilon: 0.001,
            min_duration_days: 0.1,
            max_horizon_days: 100_000,
            verbosity: 0,
        }
    }
}

impl ScheduleConfig {
    /// Lenient configuration matching the fail-open editor behaviour.
    pub fn lenient() -> Self {
        Self {
            validation: ValidationMode::Lenient,
            ..Self::default()
        }
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Reject settings that would make the passes misbehave.
    pub fn check(&self) -> Result<(), ScheduleError> {
        if !self.critical_epsilon.is_finite() || self.critical_epsilon < 0.0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "critical_epsilon must be a non-negative number, got {}",
                self.critical_epsilon
            )));
        }
        if !self.min_duration_days.is_finite() || self.min_duration_days <= 0.0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "min_duration_days must be positive, got {}",
                self.min_duration_days
            )));
        }
        if self.max_horizon_days == 0 {
            return Err(ScheduleError::InvalidConfig(
                "max_horizon_days must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Effort actually consumed for a declared duration.
    pub fn effective_duration(&self, duration_days: f64) -> f64 {
        if duration_days.is_finite() && duration_days > self.min_duration_days {
            duration_days
        } else {
            self.min_duration_days
        }
    }
}
