//! Tab-separated output of an [`ObservationReport`].
//!
//! Three files are produced in the output directory, `<stem>.txt` each:
//!
//! | File       | Columns                                   |
//! |------------|-------------------------------------------|
//! | detailed   | [`DETAILED_HEADER`]                       |
//! | simple     | [`SIMPLE_HEADER`]                         |
//! | failed     | [`FAILED_HEADER`]                         |
//!
//! Every table is first written to a temporary file in the output directory. The final
//! names are only taken, by rename, once all three tables are complete, so a failing write
//! never leaves a truncated table behind.
//!
//! The three renames are not one atomic operation. When the second or third rename fails,
//! the tables already renamed belong to the new report while the others still hold the
//! previous run; the returned error is the signal that the set is mixed.
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{Terminator, WriterBuilder};
use log::info;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::satplan_errors::SatPlanError;

use super::{ObservationReport, DETAILED_HEADER, FAILED_HEADER, SIMPLE_HEADER};

/// File stems of the three tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub detailed: String,
    pub simple: String,
    pub failed: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        OutputNames {
            detailed: "complete".into(),
            simple: "simple".into(),
            failed: "failed".into(),
        }
    }
}

/// Paths of the tables written by [`ReportWriter::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub detailed: Utf8PathBuf,
    pub simple: Utf8PathBuf,
    pub failed: Utf8PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWriter {
    directory: Utf8PathBuf,
    names: OutputNames,
}

impl ReportWriter {
    pub fn new(directory: impl Into<Utf8PathBuf>) -> Self {
        ReportWriter {
            directory: directory.into(),
            names: OutputNames::default(),
        }
    }

    pub fn with_names(mut self, names: OutputNames) -> Self {
        self.names = names;
        self
    }

    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    fn path_of(&self, stem: &str) -> Utf8PathBuf {
        self.directory.join(format!("{stem}.txt"))
    }

    /// Write the three tables of `report`.
    ///
    /// The output directory is created when missing.
    ///
    /// Return
    /// ----------
    /// * The final paths, or the I/O fault that stopped the write. A fault while writing a
    ///   table leaves every final path untouched. A fault on the second or third rename
    ///   leaves the earlier tables replaced and the later ones from the previous run.
    pub fn write(&self, report: &ObservationReport) -> Result<WrittenReport, SatPlanError> {
        fs::create_dir_all(&self.directory)?;

        let detailed = self.table(&DETAILED_HEADER, report.detailed())?;
        let simple = self.table(&SIMPLE_HEADER, report.simple())?;
        let failed = self.table(
            &FAILED_HEADER,
            report.failed().iter().map(|object| [object]).collect::<Vec<_>>().as_slice(),
        )?;

        let written = WrittenReport {
            detailed: self.path_of(&self.names.detailed),
            simple: self.path_of(&self.names.simple),
            failed: self.path_of(&self.names.failed),
        };
        detailed.persist(&written.detailed)?;
        simple.persist(&written.simple)?;
        failed.persist(&written.failed)?;

        info!(
            "{} detailed rows, {} objects observable, {} failed, written to {}",
            report.detailed().len(),
            report.simple().len(),
            report.failed().len(),
            self.directory
        );
        Ok(written)
    }

    /// Write one table into a temporary file of the output directory.
    fn table<R: Serialize>(
        &self,
        header: &[&str],
        rows: &[R],
    ) -> Result<NamedTempFile, SatPlanError> {
        let file = NamedTempFile::new_in(&self.directory)?;
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(file);

        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| SatPlanError::IoError(e.into_error()))?;
        file.as_file().sync_all()?;
        Ok(file)
    }
}

#[cfg(test)]
mod writer_test {
    use super::*;
    use crate::conversion::{dec_dms, ra_hms};
    use crate::report::ResultAggregator;
    use crate::visibility::{ObjectVisibilityResult, VisibilitySample};
    use hifitime::Epoch;

    fn report() -> ObservationReport {
        let sample = VisibilitySample {
            timestamp: Epoch::from_gregorian_utc_hms(2021, 11, 26, 0, 1, 0),
            sat_lon: -71.5,
            sat_lat: -30.25,
            sat_alt: 1200.0,
            azimuth: 123.4567,
            elevation: 45.0,
            ra: ra_hms(1.0),
            dec: dec_dms(-0.25),
            sun_ra: 16.25,
            sun_dec: -21.0,
            sun_zenith: 105.5,
            angular_rate: 123.456,
        };
        ResultAggregator::new().aggregate(vec![
            ObjectVisibilityResult::Computed {
                object: "ONEWEB-0012".into(),
                samples: vec![sample],
            },
            ObjectVisibilityResult::Failed {
                object: "ONEWEB-0666".into(),
                reason: "decayed".into(),
            },
        ])
    }

    fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_write_tables() {
        let dir = tempfile::tempdir().unwrap();
        let out = utf8(&dir).join("run");
        let written = ReportWriter::new(&out).write(&report()).unwrap();

        assert_eq!(written.detailed, out.join("complete.txt"));
        assert_eq!(
            fs::read_to_string(&written.detailed).unwrap(),
            "satellite\tdate[UT]\ttime[UT]\tSatLon[deg]\tSatLat[deg]\tSatAlt[km]\t\
             SatAzimuth[deg]\tSatElevation[deg]\tSatRA[hr]\tSatDEC[deg]\tSunRA[hr]\t\
             SunDEC[deg]\tSunZenithAngle[deg]\tSatAngularSpeed[arcsecs/sec]\n\
             ONEWEB-0012\t2021-11-26\t00:01:00s\t-71.500000\t-30.250000\t1200.00\t\
             123.457\t45.000\t03:49:10.99\t-14:19:26.20\t16.2500000\t-21.0000000\t\
             105.500\t0123.456\n"
        );
        assert_eq!(
            fs::read_to_string(&written.simple).unwrap(),
            "satellite\tdate[UT]\ttime[UT]\tRA[hh:mm:ss]\tDEC[dd:mm:ss]\n\
             ONEWEB-0012\t2021-11-26\t00:01:00s\t03:49:10.99\t-14:19:26.20\n"
        );
        assert_eq!(
            fs::read_to_string(&written.failed).unwrap(),
            "satellite\nONEWEB-0666\n"
        );
    }

    #[test]
    fn test_empty_report_keeps_headers_and_replaces_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = utf8(&dir);
        let names = OutputNames {
            detailed: "d".into(),
            simple: "s".into(),
            failed: "f".into(),
        };
        fs::write(out.join("f.txt"), "stale content\n").unwrap();

        let written = ReportWriter::new(&out)
            .with_names(names)
            .write(&ObservationReport::default())
            .unwrap();
        assert_eq!(fs::read_to_string(&written.failed).unwrap(), "satellite\n");
        assert_eq!(
            fs::read_to_string(&written.simple).unwrap(),
            "satellite\tdate[UT]\ttime[UT]\tRA[hh:mm:ss]\tDEC[dd:mm:ss]\n"
        );

        // only the three tables remain, no temporary file
        assert_eq!(fs::read_dir(&out).unwrap().count(), 3);
    }

    #[test]
    fn test_failed_rename_reports_error_after_earlier_tables() {
        let dir = tempfile::tempdir().unwrap();
        let out = utf8(&dir);
        // a non-empty directory cannot be replaced by a file
        fs::create_dir_all(out.join("failed.txt").join("keep")).unwrap();
        fs::write(out.join("simple.txt"), "previous run\n").unwrap();

        let err = ReportWriter::new(&out).write(&report()).err();
        assert!(matches!(err, Some(SatPlanError::PersistError(_))));

        // renamed before the fault: new content
        assert!(fs::read_to_string(out.join("complete.txt"))
            .unwrap()
            .contains("ONEWEB-0012"));
        assert!(fs::read_to_string(out.join("simple.txt"))
            .unwrap()
            .starts_with("satellite\t"));
        assert!(out.join("failed.txt").is_dir());
        // the unpersisted temporary table is cleaned up
        assert_eq!(fs::read_dir(&out).unwrap().count(), 3);
    }
}
