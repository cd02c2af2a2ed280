use thiserror::Error;

/// Fault raised by an ephemeris collaborator for one object.
///
/// These never abort a run: at engine initialization they turn the object into a
/// failed result, during stepping they cause the current step to be skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropagationError {
    #[error("Object not found in the ephemeris source: {0}")]
    UnknownObject(String),

    #[error("Invalid orbital elements for {object}: {reason}")]
    InvalidElements { object: String, reason: String },

    #[error("Orbit has decayed: {0}")]
    Decayed(String),

    #[error("Numerical fault during propagation: {0}")]
    Numerical(String),

    #[error("Epoch cannot be represented by the propagator: {0}")]
    TimeOutOfRange(String),
}

#[derive(Error, Debug)]
pub enum SatPlanError {
    #[error("Invalid observation window keyword: {0} (expected \"morning\" or \"evening\")")]
    InvalidWindowSlot(String),

    #[error("Invalid civil date/time: {0}")]
    InvalidCivilTime(String),

    #[error("Sampling interval must be a positive number of seconds, got {0}")]
    InvalidSamplingInterval(f64),

    #[error("Observation window is empty: finish ({finish}) is not after start ({start})")]
    EmptyWindow { start: String, finish: String },

    #[error("Invalid observation constraints: {0}")]
    InvalidConstraints(String),

    #[error("Invalid observatory site: {0}")]
    InvalidSite(String),

    #[error("Unknown observatory: {0}")]
    UnknownObservatory(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TLE parsing error at line {line}: {reason}")]
    TleParse { line: usize, reason: String },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to write table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to persist output file: {0}")]
    PersistError(#[from] tempfile::PersistError),

    #[error("Unable to build the worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("TOML configuration error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl PartialEq for SatPlanError {
    fn eq(&self, other: &Self) -> bool {
        use SatPlanError::*;
        match (self, other) {
            (InvalidWindowSlot(a), InvalidWindowSlot(b)) => a == b,
            (InvalidCivilTime(a), InvalidCivilTime(b)) => a == b,
            (InvalidSamplingInterval(a), InvalidSamplingInterval(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (
                EmptyWindow {
                    start: s1,
                    finish: f1,
                },
                EmptyWindow {
                    start: s2,
                    finish: f2,
                },
            ) => s1 == s2 && f1 == f2,
            (InvalidConstraints(a), InvalidConstraints(b)) => a == b,
            (InvalidSite(a), InvalidSite(b)) => a == b,
            (UnknownObservatory(a), UnknownObservatory(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (TleParse { line: l1, reason: r1 }, TleParse { line: l2, reason: r2 }) => {
                l1 == l2 && r1 == r2
            }

            // Wrapped foreign errors are not comparable: equal when the variant matches
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (PersistError(_), PersistError(_)) => true,
            (WorkerPool(_), WorkerPool(_)) => true,
            (TomlError(_), TomlError(_)) => true,

            _ => false,
        }
    }
}
