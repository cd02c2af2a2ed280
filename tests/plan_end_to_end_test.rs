use std::fs;

use camino::Utf8PathBuf;
use hifitime::Epoch;

use satplan::config::PlanConfig;
use satplan::ephemeris::sgp4_backend::Sgp4Ephemeris;
use satplan::ephemeris::{Ephemeris, EphemerisSource};
use satplan::TleCatalog;

const TLE: &str = "\
ONEWEB-0012
1 44057U 19010A   21329.50000000  .00000100  00000-0  10000-3 0  9998
2 44057  87.9000 100.0000 0001500  90.0000 270.0000 13.15500000123451
0 STARLINK-2001
1 48000U 21036B   21329.25000000  .00000100  00000-0  10000-3 0  9993
2 48000  53.0500 200.0000 0001200  80.0000 280.0000 15.06400000034564
";

const CONFIG: &str = r#"
[site]
observatory = "lasilla"

[window]
kind = "fixed"
date = [2021, 11, 25]
slot = "evening"
interval = 30.0

[catalog]
tle = "catalog.tle"
objects = ["ONEWEB-0012", "STARLINK-2001", "ONEWEB-0666"]

[output]
directory = "results"
detailed = "detailed"

[run]
workers = 2
"#;

fn workspace() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    fs::write(base.join("catalog.tle"), TLE).unwrap();
    fs::write(base.join("plan.toml"), CONFIG).unwrap();
    (dir, base)
}

#[test]
fn test_catalog_resolves_sgp4_ephemerides() {
    let catalog = TleCatalog::parse(TLE).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.names().collect::<Vec<_>>(), ["ONEWEB-0012", "STARLINK-2001"]);
    assert_eq!(catalog.names_for_brand("oneweb").unwrap(), ["ONEWEB-0012"]);

    let ephemeris: Sgp4Ephemeris = catalog.ephemeris("STARLINK-2001").unwrap();
    let footprint = ephemeris
        .footprint(&Epoch::from_gregorian_utc_hms(2021, 11, 25, 12, 0, 0))
        .unwrap();
    assert!(footprint.altitude > 450.0 && footprint.altitude < 650.0);
    assert!(catalog.ephemeris("ONEWEB-0666").is_err());
}

#[test]
fn test_plan_from_configuration_file() {
    let (_dir, base) = workspace();

    let config = PlanConfig::from_path(&base.join("plan.toml")).unwrap();
    let plan = config.resolve().unwrap();
    let catalog = config.load_catalog().unwrap();
    let objects = config.objects(&catalog).unwrap();
    assert_eq!(objects.len(), 3);

    let report = plan.planner().plan(&catalog, &objects).unwrap();
    assert_eq!(report.failed(), ["ONEWEB-0666".to_string()]);
    assert!(report.observable_count() <= 2);

    for row in report.detailed() {
        assert!(row.satellite == "ONEWEB-0012" || row.satellite == "STARLINK-2001");
        let elevation: f64 = row.elevation.trim().parse().unwrap();
        let zenith: f64 = row.sun_zenith.trim().parse().unwrap();
        assert!(elevation > 30.0);
        assert!(zenith > 97.0 && zenith < 114.0);
    }

    let written = config.writer().write(&report).unwrap();
    assert_eq!(written.detailed, base.join("results").join("detailed.txt"));
    assert_eq!(written.simple, base.join("results").join("simple.txt"));

    let detailed = fs::read_to_string(&written.detailed).unwrap();
    assert!(detailed.starts_with("satellite\tdate[UT]\ttime[UT]\tSatLon[deg]"));
    assert_eq!(detailed.lines().count(), report.detailed().len() + 1);

    let simple = fs::read_to_string(&written.simple).unwrap();
    assert_eq!(simple.lines().count(), report.observable_count() + 1);
    assert!(simple
        .lines()
        .skip(1)
        .all(|line| line.split('\t').count() == 5));

    assert_eq!(
        fs::read_to_string(&written.failed).unwrap(),
        "satellite\nONEWEB-0666\n"
    );
}
