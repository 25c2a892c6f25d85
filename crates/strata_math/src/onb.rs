use crate::Vec3;

/// Orthonormal basis built around a single axis.
///
/// `w` is the supplied direction (normalized); `u` and `v` complete a
/// right-handed frame. Used to carry locally sampled directions (cosine
/// lobes, cones toward a sphere) into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        // Pick a helper axis that is not nearly parallel to w.
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.u
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.v
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Local coordinates `(a, b, c)` to world space.
    #[inline]
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.x * self.u + local.y * self.v + local.z * self.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(onb: &Onb) {
        for axis in [onb.u(), onb.v(), onb.w()] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(onb.u().dot(onb.v()).abs() < 1e-5);
        assert!(onb.v().dot(onb.w()).abs() < 1e-5);
        assert!(onb.w().dot(onb.u()).abs() < 1e-5);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        assert_orthonormal(&Onb::new(Vec3::new(0.3, -2.0, 0.7)));
        // w almost along +X exercises the other helper axis
        assert_orthonormal(&Onb::new(Vec3::new(5.0, 0.1, 0.0)));
    }

    #[test]
    fn test_transform_local_z_is_w() {
        let normal = Vec3::new(0.0, 0.0, -3.0);
        let onb = Onb::new(normal);
        let world = onb.transform(Vec3::Z);
        assert!((world - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
