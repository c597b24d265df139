//! Attribute value formatting.
//!
//! Numbers are printed as the shortest decimal that reads back to the same
//! `f64`, never in exponent form, so the same scene always renders to the same
//! bytes and small scales keep every digit.

use gyrobot_ir::{Quat, Rgba, Vec3};

/// Format one real number.
pub fn real(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    format!("{v}")
}

/// Space-separated list of reals.
pub fn reals(values: &[f64]) -> String {
    values.iter().map(|&v| real(v)).collect::<Vec<_>>().join(" ")
}

/// `x y z`.
pub fn vec3(v: &Vec3) -> String {
    reals(&v.to_array())
}

/// `w x y z`.
pub fn quat(q: &Quat) -> String {
    reals(&[q.w, q.x, q.y, q.z])
}

/// `r g b a`.
pub fn rgba(c: &Rgba) -> String {
    reals(c)
}

/// `x0 y0 z0 x1 y1 z1`.
pub fn fromto(from: &Vec3, to: &Vec3) -> String {
    reals(&[from.x, from.y, from.z, to.x, to.y, to.z])
}

/// `lower upper`.
pub fn range(r: (f64, f64)) -> String {
    reals(&[r.0, r.1])
}
