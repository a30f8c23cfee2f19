//! Duration estimation for a single task.
//!
//! A task carries either a fixed estimate or a three-point PERT estimate.
//! Everything downstream (the critical path engine, the repository and the
//! chart renderer) goes through [`intrinsic_duration`] and never looks at the
//! variant directly.

use std::fmt;
use std::str::FromStr;

use crate::error::TaskError;
use crate::models::Task;

/// How long a task takes on its own, in days.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DurationSpec {
    /// A single estimate, used verbatim.
    Fixed(f64),
    /// Three-point estimate combined with the PERT weighted average.
    Pert {
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    },
}

/// PERT expected duration: `(o + 4m + p) / 6`.
pub fn pert_estimate(optimistic: f64, most_likely: f64, pessimistic: f64) -> f64 {
    (optimistic + 4.0 * most_likely + pessimistic) / 6.0
}

/// Intrinsic duration of a task, excluding anything it waits on.
pub fn intrinsic_duration(task: &Task) -> f64 {
    task.estimate.expected()
}

fn check_days(label: &str, value: f64) -> Result<(), TaskError> {
    if !value.is_finite() || value < 0.0 {
        return Err(TaskError::InvalidEstimate(format!(
            "{label} must be a non-negative number of days, got {value}"
        )));
    }
    Ok(())
}

impl DurationSpec {
    /// Build a validated fixed estimate.
    pub fn fixed(days: f64) -> Result<Self, TaskError> {
        let spec = Self::Fixed(days);
        spec.validate()?;
        Ok(spec)
    }

    /// Build a validated PERT estimate.
    pub fn pert(optimistic: f64, most_likely: f64, pessimistic: f64) -> Result<Self, TaskError> {
        let spec = Self::Pert {
            optimistic,
            most_likely,
            pessimistic,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check that all values are non-negative and, for PERT, ordered
    /// `optimistic <= most_likely <= pessimistic`.
    pub fn validate(&self) -> Result<(), TaskError> {
        match *self {
            Self::Fixed(days) => check_days("duration", days),
            Self::Pert {
                optimistic,
                most_likely,
                pessimistic,
            } => {
                check_days("optimistic", optimistic)?;
                check_days("most likely", most_likely)?;
                check_days("pessimistic", pessimistic)?;
                if optimistic > most_likely || most_likely > pessimistic {
                    return Err(TaskError::InvalidEstimate(format!(
                        "expected optimistic <= most likely <= pessimistic, got {optimistic}/{most_likely}/{pessimistic}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Expected duration in days.
    pub fn expected(&self) -> f64 {
        match *self {
            Self::Fixed(days) => days,
            Self::Pert {
                optimistic,
                most_likely,
                pessimistic,
            } => pert_estimate(optimistic, most_likely, pessimistic),
        }
    }

    pub fn is_pert(&self) -> bool {
        matches!(self, Self::Pert { .. })
    }
}

impl fmt::Display for DurationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(days) => write!(f, "{days}"),
            Self::Pert {
                optimistic,
                most_likely,
                pessimistic,
            } => write!(f, "{optimistic}/{most_likely}/{pessimistic}"),
        }
    }
}

fn parse_days(field: &str, s: &str) -> Result<f64, TaskError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| TaskError::invalid_input(field, s))
}

impl FromStr for DurationSpec {
    type Err = TaskError;

    /// Parse `2.5` as a fixed estimate or `1/2/9` as optimistic/most-likely/pessimistic.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [days] => Self::fixed(parse_days("duration", days)?),
            [o, m, p] => Self::pert(
                parse_days("optimistic", o)?,
                parse_days("most likely", m)?,
                parse_days("pessimistic", p)?,
            ),
            _ => Err(TaskError::invalid_input("estimate", s)),
        }
    }
}

/// A requested change to a task's estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EstimateUpdate {
    /// Replace the estimate outright.
    Replace(DurationSpec),
    /// Change some of the three PERT points, keeping the others.
    Pert {
        optimistic: Option<f64>,
        most_likely: Option<f64>,
        pessimistic: Option<f64>,
    },
}

impl EstimateUpdate {
    /// Combine separately supplied estimate fields.
    ///
    /// Returns `None` when nothing was given. A whole estimate together with
    /// individual PERT points is ambiguous and rejected.
    pub fn from_parts(
        estimate: Option<DurationSpec>,
        optimistic: Option<f64>,
        most_likely: Option<f64>,
        pessimistic: Option<f64>,
    ) -> Result<Option<Self>, TaskError> {
        let any_point = optimistic.is_some() || most_likely.is_some() || pessimistic.is_some();
        match estimate {
            Some(spec) if any_point => Err(TaskError::invalid_input(
                "duration",
                format!("{spec} (given together with PERT estimates)"),
            )),
            Some(spec) => Ok(Some(Self::Replace(spec))),
            None if any_point => Ok(Some(Self::Pert {
                optimistic,
                most_likely,
                pessimistic,
            })),
            None => Ok(None),
        }
    }

    /// The estimate for a brand new task; partial PERT points are not enough.
    pub fn into_estimate(self) -> Result<DurationSpec, TaskError> {
        match self {
            Self::Replace(spec) => {
                spec.validate()?;
                Ok(spec)
            }
            Self::Pert {
                optimistic: Some(o),
                most_likely: Some(m),
                pessimistic: Some(p),
            } => DurationSpec::pert(o, m, p),
            Self::Pert { .. } => Err(TaskError::invalid_input(
                "estimate",
                "optimistic, most likely and pessimistic are all required",
            )),
        }
    }

    /// Apply the update on top of `current`, returning a validated estimate.
    ///
    /// Partial PERT updates merge with a current PERT triple. Against a fixed
    /// estimate all three points are required.
    pub fn apply(&self, current: &DurationSpec) -> Result<DurationSpec, TaskError> {
        let merged = match (*self, *current) {
            (Self::Replace(spec), _) => spec,
            (
                Self::Pert {
                    optimistic,
                    most_likely,
                    pessimistic,
                },
                DurationSpec::Pert {
                    optimistic: cur_o,
                    most_likely: cur_m,
                    pessimistic: cur_p,
                },
            ) => DurationSpec::Pert {
                optimistic: optimistic.unwrap_or(cur_o),
                most_likely: most_likely.unwrap_or(cur_m),
                pessimistic: pessimistic.unwrap_or(cur_p),
            },
            (
                Self::Pert {
                    optimistic: Some(optimistic),
                    most_likely: Some(most_likely),
                    pessimistic: Some(pessimistic),
                },
                DurationSpec::Fixed(_),
            ) => DurationSpec::Pert {
                optimistic,
                most_likely,
                pessimistic,
            },
            (Self::Pert { .. }, DurationSpec::Fixed(_)) => {
                return Err(TaskError::invalid_input(
                    "estimate",
                    "a fixed-duration task needs all three PERT points",
                ));
            }
        };
        merged.validate()?;
        Ok(merged)
    }
}
