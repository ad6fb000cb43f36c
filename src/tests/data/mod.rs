use crate::{
    constants::{AMBIGUITY_RANGE_M, ECCENTRICITY_SCALE},
    prelude::{
        eci_to_ecef, Constellation, DataField, EphemerisRecord, Fields, Message, Record, Vector3,
        SV,
    },
};

/// Receiver coordinates used in synthetic scenarios (m ECEF)
pub const REFERENCE_COORDS_ECEF_M: (f64, f64, f64) = (3582105.291, 532589.7313, 5232754.8054);

/// Receiver clock bias used in synthetic scenarios (m)
pub const REFERENCE_CLOCK_BIAS_M: f64 = 1234.5;

/// GPS week of synthetic ephemerides
pub const TEST_WEEK: u32 = 2200;

pub fn reference_position() -> Vector3<f64> {
    Vector3::new(
        REFERENCE_COORDS_ECEF_M.0,
        REFERENCE_COORDS_ECEF_M.1,
        REFERENCE_COORDS_ECEF_M.2,
    )
}

pub fn gps(prn: u8) -> SV {
    SV::new(Constellation::GPS, prn)
}

/// Raw (protocol units) Keplerian elements
#[derive(Debug, Copy, Clone)]
pub struct RawEphemeris {
    pub prn: u8,
    pub eccentricity: f64,
    pub inclination: f64,
    pub mean_anomaly: f64,
    pub sqrt_a: f64,
    pub raan: f64,
    pub periapsis: f64,
    pub toe: f64,
}

impl RawEphemeris {
    /// Builds a GPS-like orbit, elements spread by PRN.
    pub fn gps_like(prn: u8, toe: f64) -> Self {
        let k = prn as f64;
        Self {
            prn,
            eccentricity: 0.01 / ECCENTRICITY_SCALE,
            inclination: 0.3,
            mean_anomaly: (0.37 * k).rem_euclid(2.0) - 1.0,
            sqrt_a: 5153.7,
            raan: (0.61 * k).rem_euclid(2.0) - 1.0,
            periapsis: (0.23 * k).rem_euclid(2.0) - 1.0,
            toe,
        }
    }

    pub fn to_message(&self) -> Message {
        let header = Fields::default()
            .with(DataField::DF009, self.prn as f64)
            .with(DataField::DF090, self.eccentricity)
            .with(DataField::DF097, self.inclination)
            .with(DataField::DF088, self.mean_anomaly)
            .with(DataField::DF092, self.sqrt_a)
            .with(DataField::DF095, self.raan)
            .with(DataField::DF099, self.periapsis)
            .with(DataField::DF076, TEST_WEEK as f64)
            .with(DataField::DF081, self.toe);
        Message::new(1019, header, Vec::new())
    }

    pub fn to_record(&self) -> EphemerisRecord {
        match self.to_message().decode() {
            Ok(Some(Record::Ephemeris(eph))) => eph,
            other => panic!("failed to decode test ephemeris: {:?}", other),
        }
    }
}

/// Builds an observables message sampled at `tow_s`, from (prn, pseudo range) pairs.
pub fn observables_message(tow_s: f64, content: &[(u8, f64)]) -> Message {
    let header = Fields::default()
        .with(DataField::DF004, tow_s * 1000.0)
        .with(DataField::DF006, content.len() as f64);

    let slots = content
        .iter()
        .map(|(prn, pr)| {
            let ambiguity = (pr / AMBIGUITY_RANGE_M).floor();
            let remainder = pr - ambiguity * AMBIGUITY_RANGE_M;
            Fields::default()
                .with(DataField::DF009, *prn as f64)
                .with(DataField::DF014, ambiguity)
                .with(DataField::DF011, remainder)
        })
        .collect();

    Message::new(1002, header, slots)
}

/// Satellite position (m ECEF) predicted from this ephemeris at `t`
pub fn predicted_position(eph: &EphemerisRecord, t: f64) -> Vector3<f64> {
    let nu = eph.true_anomaly(t - eph.time_of_week);
    let eci = eph.perifocal_to_eci() * eph.perifocal_position(nu);
    eci_to_ecef(&eci, t)
}

/// Noiseless pseudo range from satellite to reference receiver (m)
pub fn synthetic_pseudorange(eph: &EphemerisRecord, t: f64) -> f64 {
    (predicted_position(eph, t) - reference_position()).norm() + REFERENCE_CLOCK_BIAS_M
}

/// Satellite positions observed by the reference receiver (m ECEF)
pub fn reference_constellation() -> [Vector3<f64>; 4] {
    [
        Vector3::new(24170352.34904016, -16029029.85873581, -5905924.153143198),
        Vector3::new(16069642.946692571, -8992001.827692423, 23184746.654093638),
        Vector3::new(26119621.94656989, 7791422.617964384, 11558902.718228433),
        Vector3::new(-3601205.0295727667, -20311399.087870672, 21230831.216778148),
    ]
}

/// Compares two series within 1 µm
pub fn assert_close(series: &[f64], expected: &[f64]) {
    assert_eq!(series.len(), expected.len(), "series length mismatch");
    for (value, expected) in series.iter().zip(expected) {
        assert!(
            (value - expected).abs() < 1.0E-6,
            "{} differs from expected {}",
            value,
            expected
        );
    }
}
