//! # Observation window resolution
//!
//! A run samples one window of time, described by a [`TimeWindowPolicy`]:
//!
//! - [`TimeWindowPolicy::Fixed`]: a 12-hour **slot** of a calendar day: `"morning"` starts
//!   at local midnight, `"evening"` at local noon.
//! - [`TimeWindowPolicy::Custom`]: explicit local start and finish timestamps.
//!
//! Both are resolved against an [`ObservatorySite`] into an [`ObservationWindow`], a plain
//! value object (UTC start, UTC end, sampling interval) that drives the
//! [`VisibilityEngine`](crate::visibility::engine::VisibilityEngine). Resolution is pure and
//! every failure is a configuration fault surfaced before any computation starts.
use std::str::FromStr;

use hifitime::{Duration, Epoch, Unit};

use crate::constants::{Seconds, FIXED_SLOT_HOURS};
use crate::observers::ObservatorySite;
use crate::satplan_errors::SatPlanError;
use crate::time::CivilTime;

/// Named 12-hour observing slot of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSlot {
    Morning,
    Evening,
}

impl WindowSlot {
    /// Local civil hour at which the slot opens.
    pub fn local_start_hour(&self) -> u8 {
        match self {
            WindowSlot::Morning => 0,
            WindowSlot::Evening => 12,
        }
    }
}

impl FromStr for WindowSlot {
    type Err = SatPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "morning" => Ok(WindowSlot::Morning),
            "evening" => Ok(WindowSlot::Evening),
            other => Err(SatPlanError::InvalidWindowSlot(other.to_string())),
        }
    }
}

/// How the observation window of a run is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeWindowPolicy {
    /// A 12-hour slot of a local calendar day.
    Fixed {
        year: i32,
        month: u8,
        day: u8,
        /// `"morning"` or `"evening"`; anything else is rejected at resolution.
        slot: String,
        interval: Seconds,
    },
    /// Explicit local start and finish timestamps.
    Custom {
        start: CivilTime,
        finish: CivilTime,
        interval: Seconds,
    },
}

impl TimeWindowPolicy {
    pub fn interval(&self) -> Seconds {
        match self {
            TimeWindowPolicy::Fixed { interval, .. } | TimeWindowPolicy::Custom { interval, .. } => {
                *interval
            }
        }
    }

    /// Resolve the policy into UTC instants for a given site.
    ///
    /// Fixed slots open at local hour 0 (`morning`) or 12 (`evening`) and the local
    /// start is shifted by the site UTC offset. A morning slot at a site east of
    /// Greenwich therefore opens on the previous UTC calendar day. Custom windows
    /// convert both ends independently.
    ///
    /// Arguments
    /// -----------------
    /// * `site`: the canonical site providing the UTC offset.
    ///
    /// Return
    /// ----------
    /// * The [`ObservationWindow`], or a configuration fault:
    ///   [`SatPlanError::InvalidWindowSlot`], [`SatPlanError::InvalidCivilTime`],
    ///   [`SatPlanError::InvalidSamplingInterval`], [`SatPlanError::EmptyWindow`].
    pub fn resolve(&self, site: &ObservatorySite) -> Result<ObservationWindow, SatPlanError> {
        let offset = site.utc_offset();
        let (start, end) = match self {
            TimeWindowPolicy::Fixed {
                year,
                month,
                day,
                slot,
                ..
            } => {
                let slot: WindowSlot = slot.parse()?;
                let local = CivilTime::new(*year, *month, *day, slot.local_start_hour(), 0, 0);
                let start = local.to_utc(offset)?;
                (start, start + Unit::Hour * FIXED_SLOT_HOURS)
            }
            TimeWindowPolicy::Custom { start, finish, .. } => {
                (start.to_utc(offset)?, finish.to_utc(offset)?)
            }
        };

        ObservationWindow::new(start, end, self.interval())
    }
}

/// Resolved window: UTC start, UTC end and sampling interval.
///
/// Invariants: `end > start`, `interval > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationWindow {
    start: Epoch,
    end: Epoch,
    interval: Duration,
}

impl ObservationWindow {
    pub fn new(start: Epoch, end: Epoch, interval: Seconds) -> Result<Self, SatPlanError> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(SatPlanError::InvalidSamplingInterval(interval));
        }
        // below one nanosecond the interval rounds to zero
        let step = Unit::Second * interval;
        if step.total_nanoseconds() <= 0 {
            return Err(SatPlanError::InvalidSamplingInterval(interval));
        }
        if end <= start {
            return Err(SatPlanError::EmptyWindow {
                start: start.to_string(),
                finish: end.to_string(),
            });
        }
        Ok(ObservationWindow {
            start,
            end,
            interval: step,
        })
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn interval_seconds(&self) -> Seconds {
        self.interval.to_seconds()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Number of sampled instants: `floor(duration / interval)`, counted in nanoseconds.
    pub fn step_count(&self) -> usize {
        (self.duration().total_nanoseconds() / self.interval.total_nanoseconds()) as usize
    }

    /// The instant one interval before the window opens, used to seed the rate estimator.
    pub fn pre_start(&self) -> Epoch {
        self.start - self.interval
    }

    /// Sampled instants `start + i·interval` for `i` in `[0, step_count)`.
    pub fn epochs(&self) -> impl Iterator<Item = Epoch> + '_ {
        let step = self.interval.total_nanoseconds();
        (0..self.step_count())
            .map(move |i| self.start + Duration::from_total_nanoseconds(step * i as i128))
    }
}
