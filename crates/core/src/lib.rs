//! Core units, constants, and shared primitives for the debris capture workspace.

/// Physical constants expressed in SI units.
pub mod constants {
    /// Standard gravity used for specific-impulse conversions (m/s²).
    pub const G0: f64 = 9.81;
    /// Seconds per hour, for kW·s to kWh conversions.
    pub const SECONDS_PER_HOUR: f64 = 3_600.0;
    /// Metres per millimetre.
    pub const M_PER_MM: f64 = 1.0e-3;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{M_PER_MM, SECONDS_PER_HOUR};

    /// Convert millimetres to metres.
    #[inline]
    pub fn mm_to_m(v: f64) -> f64 {
        v * M_PER_MM
    }

    /// Energy in kWh drawn by a constant load of `kw` over `seconds`.
    #[inline]
    pub fn kw_seconds_to_kwh(kw: f64, seconds: f64) -> f64 {
        kw * seconds / SECONDS_PER_HOUR
    }

    /// Constant power in kW that draws `kwh` over `seconds`.
    #[inline]
    pub fn kwh_over_seconds_to_kw(kwh: f64, seconds: f64) -> f64 {
        kwh * SECONDS_PER_HOUR / seconds
    }
}

/// Free-function arithmetic on LVLH-frame triples.
///
/// Positions, velocities and accelerations share one array type so the
/// control laws can mix them without conversions; the unit follows from the
/// field or argument name (`_m`, `_m_s`, `_m_s2`).
pub mod vector {
    /// Radial, along-track and cross-track components.
    pub type Vector3 = [f64; 3];

    pub const ZERO: Vector3 = [0.0; 3];

    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        std::array::from_fn(|i| a[i] + b[i])
    }

    /// `a - b`, the offset from `b` to `a`.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        std::array::from_fn(|i| a[i] - b[i])
    }

    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        v.map(|c| c * s)
    }

    /// Range between two points, e.g. stage and debris.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }

    /// Saturate the magnitude of a command at `limit`, keeping its direction.
    ///
    /// Vectors already within the limit, and the zero vector, pass through.
    #[inline]
    pub fn clamp_norm(v: &Vector3, limit: f64) -> Vector3 {
        let mag = norm(v);
        if mag > limit && mag > 0.0 {
            scale(v, limit / mag)
        } else {
            *v
        }
    }

    /// Rejects NaN and infinite components from configs and integrators.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}

/// Six-component kinematic state in the target-relative LVLH frame.
pub mod state {
    use serde::{Deserialize, Serialize};

    use super::vector::{self, Vector3};

    /// Position (m) and velocity (m/s) of the stage.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
    pub struct StateVector {
        pub position_m: Vector3,
        pub velocity_m_s: Vector3,
    }

    impl StateVector {
        pub fn new(position_m: Vector3, velocity_m_s: Vector3) -> Self {
            Self {
                position_m,
                velocity_m_s,
            }
        }

        /// Build from the packed `[x, y, z, vx, vy, vz]` layout.
        pub fn from_array(values: [f64; 6]) -> Self {
            Self {
                position_m: [values[0], values[1], values[2]],
                velocity_m_s: [values[3], values[4], values[5]],
            }
        }

        /// Packed `[x, y, z, vx, vy, vz]` layout.
        pub fn to_array(&self) -> [f64; 6] {
            let p = self.position_m;
            let v = self.velocity_m_s;
            [p[0], p[1], p[2], v[0], v[1], v[2]]
        }

        /// Distance from the stage to a point in the same frame.
        pub fn range_to(&self, point: &Vector3) -> f64 {
            vector::distance(&self.position_m, point)
        }

        /// Semi-implicit Euler step under a constant acceleration.
        pub fn integrate(&mut self, accel_m_s2: &Vector3, dt: f64) {
            self.velocity_m_s = vector::add(&self.velocity_m_s, &vector::scale(accel_m_s2, dt));
            self.position_m = vector::add(&self.position_m, &vector::scale(&self.velocity_m_s, dt));
        }

        pub fn is_finite(&self) -> bool {
            vector::is_finite(&self.position_m) && vector::is_finite(&self.velocity_m_s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::state::StateVector;
    use super::vector;

    #[test]
    fn clamp_norm_keeps_direction() {
        let v = [3.0, 4.0, 0.0];
        let c = vector::clamp_norm(&v, 2.5);
        assert!((vector::norm(&c) - 2.5).abs() < 1e-12);
        assert!((c[0] / c[1] - 0.75).abs() < 1e-12);
        assert_eq!(vector::clamp_norm(&v, 10.0), v);
        assert_eq!(vector::clamp_norm(&vector::ZERO, 0.0), vector::ZERO);
    }

    #[test]
    fn offsets_point_from_second_to_first() {
        let debris = [10.0, -2.0, 4.0];
        let stage = [7.0, 2.0, 4.0];
        let offset = vector::sub(&debris, &stage);
        assert_eq!(offset, [3.0, -4.0, 0.0]);
        assert_eq!(vector::distance(&debris, &stage), 5.0);
        assert_eq!(vector::add(&stage, &offset), debris);
        assert_eq!(vector::dot(&offset, &vector::scale(&offset, 2.0)), 50.0);
        assert!(!vector::is_finite(&[0.0, f64::NAN, 0.0]));
    }

    #[test]
    fn integrate_uses_updated_velocity() {
        let mut s = StateVector::from_array([0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        s.integrate(&[1.0, 0.0, 0.0], 0.5);
        assert_eq!(s.velocity_m_s, [1.5, 0.0, 0.0]);
        assert_eq!(s.position_m, [0.75, 0.0, 0.0]);
        assert_eq!(s.to_array()[3], 1.5);
    }
}
