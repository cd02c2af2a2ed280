//! # Observation report
//!
//! Merges the independent per-object results of a run into one [`ObservationReport`]:
//!
//! * a **detailed** table, one row per accepted sample, sorted by `(object, time)`;
//! * a **simple** table, one pseudo-randomly chosen sample per observable object,
//!   sorted by `(time, object)`;
//! * the sorted list of objects that could not be propagated at all.
//!
//! ## Determinism
//!
//! [`ResultAggregator::aggregate`] sorts and groups before doing anything order
//! dependent, so any permutation of the same results yields identical tables:
//!
//! - an object is failed only when **every** result for it is a failure;
//! - duplicated `(object, timestamp)` samples collapse into one row (the smallest row wins
//!   when two duplicates disagree);
//! - the simple-table draw walks objects in identifier order with an RNG seeded by
//!   [`SIMPLE_TABLE_SEED`].
//!
//! ## See also
//! * [`writer::ReportWriter`] – TSV output.
//! * [`display`] – terminal summary.
pub mod display;
pub mod writer;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::constants::{ObjectId, SIMPLE_TABLE_SEED};
use crate::time::{fmt_date, fmt_time};
use crate::visibility::{ObjectVisibilityResult, VisibilitySample};

/// Column names of the detailed table.
pub const DETAILED_HEADER: [&str; 14] = [
    "satellite",
    "date[UT]",
    "time[UT]",
    "SatLon[deg]",
    "SatLat[deg]",
    "SatAlt[km]",
    "SatAzimuth[deg]",
    "SatElevation[deg]",
    "SatRA[hr]",
    "SatDEC[deg]",
    "SunRA[hr]",
    "SunDEC[deg]",
    "SunZenithAngle[deg]",
    "SatAngularSpeed[arcsecs/sec]",
];

/// Column names of the simple table.
pub const SIMPLE_HEADER: [&str; 5] = [
    "satellite",
    "date[UT]",
    "time[UT]",
    "RA[hh:mm:ss]",
    "DEC[dd:mm:ss]",
];

/// Column name of the failed-objects list.
pub const FAILED_HEADER: [&str; 1] = ["satellite"];

/// Formatted row of the detailed table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DetailedRow {
    pub satellite: String,
    #[serde(rename = "date[UT]")]
    pub date: String,
    #[serde(rename = "time[UT]")]
    pub time: String,
    #[serde(rename = "SatLon[deg]")]
    pub sat_lon: String,
    #[serde(rename = "SatLat[deg]")]
    pub sat_lat: String,
    #[serde(rename = "SatAlt[km]")]
    pub sat_alt: String,
    #[serde(rename = "SatAzimuth[deg]")]
    pub azimuth: String,
    #[serde(rename = "SatElevation[deg]")]
    pub elevation: String,
    #[serde(rename = "SatRA[hr]")]
    pub ra: String,
    #[serde(rename = "SatDEC[deg]")]
    pub dec: String,
    #[serde(rename = "SunRA[hr]")]
    pub sun_ra: String,
    #[serde(rename = "SunDEC[deg]")]
    pub sun_dec: String,
    #[serde(rename = "SunZenithAngle[deg]")]
    pub sun_zenith: String,
    #[serde(rename = "SatAngularSpeed[arcsecs/sec]")]
    pub angular_rate: String,
}

impl DetailedRow {
    pub fn new(object: &str, sample: &VisibilitySample) -> Self {
        DetailedRow {
            satellite: object.to_string(),
            date: fmt_date(&sample.timestamp),
            time: fmt_time(&sample.timestamp),
            sat_lon: format!("{:9.6}", sample.sat_lon),
            sat_lat: format!("{:9.6}", sample.sat_lat),
            sat_alt: format!("{:5.2}", sample.sat_alt),
            azimuth: format!("{:06.3}", sample.azimuth),
            elevation: format!("{:06.3}", sample.elevation),
            ra: sample.ra.to_string(),
            dec: sample.dec.to_string(),
            sun_ra: format!("{:09.7}", sample.sun_ra),
            sun_dec: format!("{:09.7}", sample.sun_dec),
            sun_zenith: format!("{:07.3}", sample.sun_zenith),
            angular_rate: format!("{:08.3}", sample.angular_rate),
        }
    }
}

/// Formatted row of the simple table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SimpleRow {
    pub satellite: String,
    #[serde(rename = "date[UT]")]
    pub date: String,
    #[serde(rename = "time[UT]")]
    pub time: String,
    #[serde(rename = "RA[hh:mm:ss]")]
    pub ra: String,
    #[serde(rename = "DEC[dd:mm:ss]")]
    pub dec: String,
}

impl SimpleRow {
    pub fn new(object: &str, sample: &VisibilitySample) -> Self {
        SimpleRow {
            satellite: object.to_string(),
            date: fmt_date(&sample.timestamp),
            time: fmt_time(&sample.timestamp),
            ra: sample.ra.to_string(),
            dec: sample.dec.to_string(),
        }
    }
}

/// Final product of a run. Built once by [`ResultAggregator`], never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationReport {
    detailed: Vec<DetailedRow>,
    simple: Vec<SimpleRow>,
    failed: Vec<ObjectId>,
}

impl ObservationReport {
    pub fn detailed(&self) -> &[DetailedRow] {
        &self.detailed
    }

    pub fn simple(&self) -> &[SimpleRow] {
        &self.simple
    }

    /// Objects that could not be propagated, sorted.
    pub fn failed(&self) -> &[ObjectId] {
        &self.failed
    }

    /// Number of distinct objects with at least one accepted sample.
    pub fn observable_count(&self) -> usize {
        self.simple.len()
    }
}

/// Sample kept for one `(object, timestamp)` pair.
struct Kept {
    detailed: DetailedRow,
    simple: SimpleRow,
}

#[derive(Default)]
struct ObjectGroup {
    computed: bool,
    // keyed by TAI nanoseconds
    samples: BTreeMap<i128, Kept>,
}

/// Merges per-object results into an [`ObservationReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAggregator {
    seed: u64,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        ResultAggregator {
            seed: SIMPLE_TABLE_SEED,
        }
    }
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator drawing the simple table with another seed.
    pub fn with_seed(seed: u64) -> Self {
        ResultAggregator { seed }
    }

    /// Build the report from the complete collection of results, in any order.
    pub fn aggregate<I>(&self, results: I) -> ObservationReport
    where
        I: IntoIterator<Item = ObjectVisibilityResult>,
    {
        let mut groups: BTreeMap<ObjectId, ObjectGroup> = BTreeMap::new();

        for result in results {
            let group = groups.entry(result.object().to_string()).or_default();
            let ObjectVisibilityResult::Computed { object, samples } = result else {
                continue;
            };
            group.computed = true;

            for sample in &samples {
                let key = sample.timestamp.to_tai_duration().total_nanoseconds();
                let candidate = Kept {
                    detailed: DetailedRow::new(&object, sample),
                    simple: SimpleRow::new(&object, sample),
                };
                let replace = group
                    .samples
                    .get(&key)
                    .map_or(true, |kept| candidate.detailed < kept.detailed);
                if replace {
                    group.samples.insert(key, candidate);
                }
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut report = ObservationReport::default();
        let mut simple: Vec<(i128, SimpleRow)> = Vec::new();

        for (object, group) in groups {
            if !group.computed {
                report.failed.push(object);
                continue;
            }
            if group.samples.is_empty() {
                continue;
            }

            let pick = rng.random_range(0..group.samples.len());
            for (i, (key, kept)) in group.samples.into_iter().enumerate() {
                if i == pick {
                    simple.push((key, kept.simple));
                }
                report.detailed.push(kept.detailed);
            }
        }

        // (time, object): the row starts with the satellite name
        simple.sort();
        report.simple = simple.into_iter().map(|(_, row)| row).collect();
        report
    }
}
