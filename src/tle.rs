//! # Two-line element catalogs
//!
//! Local TLE text files in the usual CelesTrak layout, either as **3-line sets**
//!
//! ```text
//! ONEWEB-0012
//! 1 44057U 19010A   21329.50000000  .00000100  00000-0  10000-3 0  9998
//! 2 44057  87.9000 100.0000 0001500  90.0000 270.0000 13.15500000123451
//! ```
//!
//! or as bare **2-line sets**, in which case the object is named after its catalog
//! number (`44057`). A leading `0 ` on a name line is dropped.
//!
//! The catalog only checks the layout of each set (line markers, matching catalog numbers).
//! The elements themselves are decoded when an ephemeris is requested, so one bad set
//! fails only its own object.
use std::fs;

use ahash::AHashMap;
use camino::Utf8Path;
use log::debug;
use regex::RegexBuilder;

use crate::constants::ObjectId;
use crate::ephemeris::sgp4_backend::Sgp4Ephemeris;
use crate::ephemeris::EphemerisSource;
use crate::satplan_errors::{PropagationError, SatPlanError};

/// One element set as found in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleRecord {
    pub name: ObjectId,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    /// NORAD catalog number (columns 3–7).
    pub fn catalog_number(&self) -> &str {
        catalog_field(&self.line1)
    }
}

fn catalog_field(line: &str) -> &str {
    line.get(2..7).map(str::trim).unwrap_or("")
}

/// Element sets keyed by object name, in file order.
#[derive(Debug, Clone, Default)]
pub struct TleCatalog {
    records: Vec<TleRecord>,
    index: AHashMap<ObjectId, usize>,
}

impl TleCatalog {
    /// Read and parse a TLE file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SatPlanError> {
        let text = fs::read_to_string(path)?;
        let catalog = Self::parse(&text)?;
        debug!("{path}: {} element sets", catalog.len());
        Ok(catalog)
    }

    /// Parse the content of a TLE file.
    ///
    /// Return
    /// ----------
    /// * [`SatPlanError::TleParse`] with the 1-based line number of the first malformed set.
    pub fn parse(text: &str) -> Result<Self, SatPlanError> {
        let mut catalog = TleCatalog::default();
        let mut pending_name: Option<(usize, String)> = None;
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()))
            .filter(|(_, l)| !l.trim().is_empty());

        while let Some((n, line)) = lines.next() {
            if line.starts_with("1 ") {
                let (n2, line2) = lines.next().ok_or_else(|| SatPlanError::TleParse {
                    line: n,
                    reason: "line 1 is not followed by line 2".into(),
                })?;
                if !line2.starts_with("2 ") {
                    return Err(SatPlanError::TleParse {
                        line: n2,
                        reason: "expected line 2 of the element set".into(),
                    });
                }
                if catalog_field(line).is_empty() || catalog_field(line) != catalog_field(line2)
                {
                    return Err(SatPlanError::TleParse {
                        line: n2,
                        reason: "catalog numbers of line 1 and line 2 differ".into(),
                    });
                }

                let name = match pending_name.take() {
                    Some((_, name)) => name,
                    None => catalog_field(line).to_string(),
                };
                catalog.insert(TleRecord {
                    name,
                    line1: line.to_string(),
                    line2: line2.to_string(),
                });
            } else if line.starts_with("2 ") {
                return Err(SatPlanError::TleParse {
                    line: n,
                    reason: "line 2 without a preceding line 1".into(),
                });
            } else {
                if let Some((previous, _)) = pending_name {
                    return Err(SatPlanError::TleParse {
                        line: previous,
                        reason: "name line without element set".into(),
                    });
                }
                let name = line.strip_prefix("0 ").unwrap_or(line).trim();
                pending_name = Some((n, name.to_string()));
            }
        }

        if let Some((n, _)) = pending_name {
            return Err(SatPlanError::TleParse {
                line: n,
                reason: "name line without element set".into(),
            });
        }
        Ok(catalog)
    }

    /// Add a record; a later set for the same name replaces the earlier one in place.
    pub fn insert(&mut self, record: TleRecord) {
        match self.index.get(&record.name) {
            Some(&i) => {
                debug!("{}: element set replaced by a later one", record.name);
                self.records[i] = record;
            }
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TleRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[TleRecord] {
        &self.records
    }

    /// Object names, in file order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Names of the objects of one constellation.
    ///
    /// A name belongs to `brand` when it starts with the brand (case-insensitive) followed
    /// either by `-<digits>…)` or by one separator and digits, e.g. `ONEWEB-0012`,
    /// `STARLINK-1007 (DARKSAT)` or `FLOCK 4P-1` for `flock`.
    pub fn names_for_brand(&self, brand: &str) -> Result<Vec<ObjectId>, SatPlanError> {
        let brand = regex::escape(brand.trim());
        let pattern = RegexBuilder::new(&format!(r"^{brand}(?:-[0-9]*.*\)|.[0-9]*)"))
            .case_insensitive(true)
            .build()
            .map_err(|e| SatPlanError::InvalidConfig(format!("brand filter: {e}")))?;

        Ok(self
            .names()
            .filter(|name| pattern.is_match(name))
            .map(str::to_string)
            .collect())
    }
}

impl EphemerisSource for TleCatalog {
    type Ephemeris = Sgp4Ephemeris;

    fn ephemeris(&self, object: &str) -> Result<Sgp4Ephemeris, PropagationError> {
        let record = self
            .get(object)
            .ok_or_else(|| PropagationError::UnknownObject(object.to_string()))?;
        Sgp4Ephemeris::from_tle(record.name.clone(), &record.line1, &record.line2)
    }
}

#[cfg(test)]
mod tle_test {
    use super::*;

    const CATALOG: &str = "\
ONEWEB-0012
1 44057U 19010A   21329.50000000  .00000100  00000-0  10000-3 0  9998
2 44057  87.9000 100.0000 0001500  90.0000 270.0000 13.15500000123451
0 STARLINK-2001
1 48000U 21036B   21329.25000000  .00000100  00000-0  10000-3 0  9993
2 48000  53.0500 200.0000 0001200  80.0000 280.0000 15.06400000034564

1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

    #[test]
    fn test_parse_catalog() {
        let catalog = TleCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["ONEWEB-0012", "STARLINK-2001", "25544"]
        );
        assert_eq!(catalog.get("25544").unwrap().catalog_number(), "25544");
    }

    #[test]
    fn test_parse_errors() {
        let err = TleCatalog::parse("ONEWEB-0012\n2 44057  87.9000").unwrap_err();
        assert_eq!(
            err,
            SatPlanError::TleParse {
                line: 2,
                reason: "line 2 without a preceding line 1".into()
            }
        );

        let text = "X\n1 44057U 19010A\n2 44058  87.9000";
        assert!(matches!(
            TleCatalog::parse(text),
            Err(SatPlanError::TleParse { line: 3, .. })
        ));

        assert!(matches!(
            TleCatalog::parse("A\nB\n"),
            Err(SatPlanError::TleParse { line: 1, .. })
        ));
        assert!(matches!(
            TleCatalog::parse("1 44057U 19010A"),
            Err(SatPlanError::TleParse { line: 1, .. })
        ));
    }

    #[test]
    fn test_names_for_brand() {
        let catalog = TleCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.names_for_brand("oneweb").unwrap(), vec!["ONEWEB-0012"]);
        assert_eq!(
            catalog.names_for_brand("Starlink").unwrap(),
            vec!["STARLINK-2001"]
        );
        assert!(catalog.names_for_brand("iridium").unwrap().is_empty());
    }

    #[test]
    fn test_ephemeris_source() {
        let catalog = TleCatalog::parse(CATALOG).unwrap();
        assert!(catalog.ephemeris("ONEWEB-0012").is_ok());
        assert_eq!(
            catalog.ephemeris("ONEWEB-9999").err(),
            Some(PropagationError::UnknownObject("ONEWEB-9999".into()))
        );
    }
}
