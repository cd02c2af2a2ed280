//! Built-in table of professional observatories.
//!
//! Entries keep the raw conventions of the classic observatory tables:
//! longitudes are **degrees west** (up to 360), angles may be `[deg, min, sec]` lists and
//! the time zone is the number of hours **west** of Greenwich. Use [`lookup`] to obtain a
//! normalized [`ObservatorySite`].
use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{ObservatorySite, RawCoordinate, RawSite};
use crate::satplan_errors::SatPlanError;

enum C {
    D(f64),
    S(&'static [f64]),
}

use C::{D, S};

#[rustfmt::skip]
const TABLE: &[(&str, &str, C, C, f64, f64)] = &[
        ("kpno", "Kitt Peak National Observatory", S(&[111.0, 36.0]), S(&[31.0, 57.8]), 2120.0, 7.0),
        ("ctio", "Cerro Tololo Interamerican Observatory", D(70.815), D(-30.16527778), 2215.0, 4.0),
        ("lasilla", "European Southern Observatory, La Silla", S(&[70.0, 43.8]), S(&[-29.0, 15.4]), 2347.0, 4.0),
        ("lick", "Lick Observatory", S(&[121.0, 38.2]), S(&[37.0, 20.6]), 1290.0, 8.0),
        ("mmto", "MMT Observatory", S(&[110.0, 53.1]), S(&[31.0, 41.3]), 2600.0, 7.0),
        ("cfht", "Canada-France-Hawaii Telescope", S(&[155.0, 28.3]), S(&[19.0, 49.6]), 4215.0, 10.0),
        ("lapalma", "Roque de los Muchachos, La Palma", S(&[17.0, 52.8]), S(&[28.0, 45.5]), 2327.0, 0.0),
        ("mso", "Mt. Stromlo Observatory", S(&[210.0, 58.0, 32.4]), S(&[-35.0, 19.0, 14.34]), 767.0, -10.0),
        ("sso", "Siding Spring Observatory", S(&[210.0, 56.0, 19.7]), S(&[-31.0, 16.0, 24.1]), 1149.0, -10.0),
        ("aao", "Anglo-Australian Observatory", S(&[210.0, 56.0, 2.09]), S(&[-31.0, 16.0, 37.34]), 1164.0, -10.0),
        ("mcdonald", "McDonald Observatory", D(104.0216667), D(30.6716667), 2075.0, 6.0),
        ("mtbigelow", "Catalina Observatory: 61 inch telescope", S(&[110.0, 43.9]), S(&[32.0, 25.0]), 2510.0, 7.0),
        ("dao", "Dominion Astrophysical Observatory", S(&[123.0, 25.0]), S(&[48.0, 31.3]), 229.0, 8.0),
        ("mdm", "Michigan-Dartmouth-MIT Observatory", S(&[111.0, 37.0]), S(&[31.0, 57.0]), 1938.5, 7.0),
        ("nov", "National Observatory of Venezuela", S(&[70.0, 52.0]), S(&[8.0, 47.4]), 3610.0, 4.0),
        ("bao", "Beijing XingLong Observatory", S(&[242.0, 25.5]), S(&[40.0, 23.6]), 950.0, -8.0),
        ("keck", "W. M. Keck Observatory", S(&[155.0, 28.7]), S(&[19.0, 49.7]), 4160.0, 10.0),
        ("loiano", "Bologna Astronomical Observatory, Loiano - Italy", S(&[348.0, 39.0, 58.0]), S(&[44.0, 15.0, 33.0]), 785.0, -1.0),
        ("apo", "Apache Point Observatory", S(&[105.0, 49.2]), S(&[32.0, 46.8]), 2798.0, 7.0),
        ("vbo", "Vainu Bappu Observatory", D(281.1734), D(12.57666), 725.0, -5.5),
        ("flwo", "Whipple Observatory", S(&[110.0, 52.0, 39.0]), S(&[31.0, 40.0, 51.4]), 2320.0, 7.0),
        ("oro", "Oak Ridge Observatory", S(&[71.0, 33.0, 29.32]), S(&[42.0, 30.0, 18.94]), 184.0, 5.0),
        ("saao", "South African Astronomical Observatory", S(&[339.0, 11.0, 21.5]), S(&[-32.0, 22.0, 46.0]), 1798.0, -2.0),
        ("bosque", "Estacion Astrofisica Bosque Alegre, Cordoba", S(&[64.0, 32.0, 45.0]), S(&[-31.0, 35.0, 54.0]), 1250.0, 3.0),
        ("rozhen", "National Astronomical Observatory Rozhen - Bulgaria", S(&[335.0, 15.0, 22.0]), S(&[41.0, 41.0, 35.0]), 1759.0, -2.0),
        ("irtf", "NASA Infrared Telescope Facility", D(155.471999), D(19.826218), 4168.0, 10.0),
        ("bgsuo", "Bowling Green State Univ Observatory", S(&[83.0, 39.0, 33.0]), S(&[41.0, 22.0, 42.0]), 225.0, 5.0),
        ("ca", "Calar Alto Observatory", S(&[2.0, 32.0, 46.5]), S(&[37.0, 13.0, 25.0]), 2168.0, -1.0),
        ("fmo", "Fan Mountain Observatory", S(&[78.0, 41.0, 34.0]), S(&[37.0, 52.0, 41.0]), 556.0, 5.0),
        ("whitin", "Whitin Observatory, Wellesley College", D(71.305833), D(42.295), 32.0, 5.0),
        ("tubitak", "TUBITAK National Observatory, Turkey", S(&[329.0, 39.0, 52.0]), S(&[36.0, 49.0, 27.0]), 2490.0, -3.0),
        ("lco", "Las Campanas Observatory", S(&[70.0, 42.1]), S(&[-29.0, 0.2]), 2282.0, 4.0),
        ("ekar", "Mt. Ekar 182 cm. Telescope", S(&[348.0, 25.0, 7.92]), S(&[45.0, 50.0, 54.92]), 1413.69, -1.0),
        ("lowell", "Lowell Observatory", S(&[111.0, 32.1]), S(&[35.0, 5.8]), 2198.0, 7.0),
        ("casleo", "Complejo Astronomico El Leoncito, San Juan", S(&[69.0, 18.0, 0.0]), S(&[-31.0, 47.0, 57.0]), 2552.0, 3.0),
        ("mgio", "Mount Graham International Observatory", S(&[109.0, 53.0, 31.25]), S(&[32.0, 42.0, 4.69]), 3191.0, 7.0),
        ("lna", "Laboratorio Nacional de Astrofisica - Brazil", D(45.5825), S(&[-22.0, 32.0, 4.0]), 1864.0, 3.0),
        ("spm", "Observatorio Astronomico Nacional, San Pedro Martir", S(&[115.0, 29.0, 13.0]), S(&[31.0, 1.0, 45.0]), 2830.0, 7.0),
        ("ckoir", "Ckoirama Observatory, Universidad de Antofagasta, Chile", D(69.93058889), D(-24.08913333), 966.0, 4.0),
        ("lmo", "Leander McCormick Observatory", S(&[78.0, 31.0, 24.0]), S(&[38.0, 2.0, 0.0]), 264.0, 5.0),
        ("palomar", "The Hale Telescope", S(&[116.0, 51.0, 46.8]), S(&[33.0, 21.0, 21.6]), 1706.0, 8.0),
        ("quynhon", "The Quy Nhon Observatory", D(250.786994), D(13.71863), 5.0, -7.0),
        ("CBNUO", "ChungBuk National University Observatory", D(232.524644889), D(36.7815), 86.92, -9.0),
        ("ouka", "Oukaimeden observatory", D(7.866), D(31.206389), 2700.0, -1.0),
];

static OBSERVATORIES: Lazy<HashMap<&'static str, RawSite>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|(key, name, lon, lat, altitude, tz)| {
            (
                *key,
                RawSite {
                    name: (*name).to_string(),
                    longitude: lon.into(),
                    latitude: lat.into(),
                    altitude: *altitude,
                    utc_offset: *tz,
                },
            )
        })
        .collect()
});

impl From<&C> for RawCoordinate {
    fn from(c: &C) -> Self {
        match c {
            D(v) => RawCoordinate::Decimal(*v),
            S(v) => RawCoordinate::Sexagesimal(v.to_vec()),
        }
    }
}

/// Raw table entry for a key, exact match first, then case-insensitive.
pub fn raw(key: &str) -> Option<&'static RawSite> {
    OBSERVATORIES.get(key).or_else(|| {
        OBSERVATORIES
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, site)| site)
    })
}

/// Normalized site for a table key.
///
/// Return
/// ----------
/// * The canonical [`ObservatorySite`], or [`SatPlanError::UnknownObservatory`].
pub fn lookup(key: &str) -> Result<ObservatorySite, SatPlanError> {
    raw(key)
        .ok_or_else(|| SatPlanError::UnknownObservatory(key.to_string()))?
        .normalize()
}

/// Sorted keys of the built-in table.
pub fn keys() -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = OBSERVATORIES.keys().copied().collect();
    keys.sort_unstable();
    keys
}

#[cfg(test)]
mod observatories_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lasilla() {
        let site = lookup("lasilla").unwrap();
        assert_eq!(site.name(), "European Southern Observatory, La Silla");
        assert_relative_eq!(site.longitude(), -70.73, epsilon = 1e-12);
        assert_relative_eq!(site.latitude(), -29.256666666666668, epsilon = 1e-12);
        assert_eq!(site.altitude(), 2347.0);
        assert_eq!(site.utc_offset(), 4.0);
    }

    #[test]
    fn test_east_of_greenwich() {
        let site = lookup("mso").unwrap();
        assert_relative_eq!(site.longitude(), 149.02433333333335, epsilon = 1e-9);
        assert_eq!(site.utc_offset(), -10.0);

        let site = lookup("vbo").unwrap();
        assert_relative_eq!(site.longitude(), 78.8266, epsilon = 1e-9);
        assert_eq!(site.utc_offset(), -5.5);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        assert!(lookup("cbnuo").is_ok());
        assert!(lookup("LASILLA").is_ok());
        assert_eq!(
            lookup("atlantis"),
            Err(SatPlanError::UnknownObservatory("atlantis".into()))
        );
    }

    #[test]
    fn test_every_entry_normalizes() {
        assert_eq!(keys().len(), TABLE.len());
        for key in keys() {
            assert!(lookup(key).is_ok(), "{key} does not normalize");
        }
    }
}
