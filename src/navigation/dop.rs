use nalgebra::{DMatrix, Matrix3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [DilutionOfPrecision] of a resolved epoch
#[derive(Debug, Clone, Default, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,

    /// Position DOP
    pub pdop: f64,

    /// Horizontal DOP
    pub hdop: f64,

    /// Vertical DOP
    pub vdop: f64,

    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Rotates the position block of `q` to local east, north, up.
    pub(crate) fn q_enu(q: &DMatrix<f64>, lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
        let (sin_lat, cos_lat) = lat_rad.sin_cos();
        let (sin_lon, cos_lon) = lon_rad.sin_cos();

        let r = Matrix3::<f64>::new(
            -sin_lon,
            cos_lon,
            0.0_f64,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        );

        let q_3 = q.fixed_view::<3, 3>(0, 0).into_owned();

        r * q_3 * r.transpose()
    }

    /// Creates new [DilutionOfPrecision].
    ///
    /// ## Input
    /// - q: (Hᵀ.H)⁻¹ 4x4 matrix
    /// - lat_rad, lon_rad: receiver geocentric coordinates
    pub(crate) fn new(q: &DMatrix<f64>, lat_rad: f64, lon_rad: f64) -> Self {
        let q_enu = Self::q_enu(q, lat_rad, lon_rad);

        Self {
            gdop: q.trace().sqrt(),
            pdop: (q[(0, 0)] + q[(1, 1)] + q[(2, 2)]).sqrt(),
            tdop: q[(3, 3)].sqrt(),
            vdop: q_enu[(2, 2)].sqrt(),
            hdop: (q_enu[(0, 0)] + q_enu[(1, 1)]).sqrt(),
        }
    }
}
