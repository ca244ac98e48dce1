use nalgebra::{Isometry3, Matrix3, Unit, UnitQuaternion, Vector3, Vector6};
use serde::{Serialize, Deserialize};

/// A representation for an SE(3) transform composed of a unit quaternion rotation and a
/// translation.  All frame poses throughout the toolbox are expressed with this type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SE3Pose {
    rotation: UnitQuaternion<f64>,
    translation: Vector3<f64>
}
impl SE3Pose {
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation
        }
    }
    pub fn new_identity() -> Self {
        return Self::new(UnitQuaternion::identity(), Vector3::zeros());
    }
    pub fn new_from_euler_angles(rx: f64, ry: f64, rz: f64, x: f64, y: f64, z: f64) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(rx, ry, rz);
        return Self::new(rotation, Vector3::new(x, y, z));
    }
    pub fn new_from_axis_angle(axis: &Unit<Vector3<f64>>, angle: f64, x: f64, y: f64, z: f64) -> Self {
        let rotation = UnitQuaternion::from_axis_angle(axis, angle);
        return Self::new(rotation, Vector3::new(x, y, z));
    }
    /// Returns the rotation component of the pose.
    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }
    /// Returns the translation component of the pose.
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }
    /// Multiplication.
    pub fn multiply(&self, other: &SE3Pose) -> SE3Pose {
        let rotation = self.rotation * other.rotation;
        let translation = self.rotation * other.translation + self.translation;
        return Self::new(rotation, translation);
    }
    /// Multiplication by a point.
    pub fn multiply_by_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        return self.rotation * point + self.translation;
    }
    /// The inverse transform such that T * T^-1 = I.
    pub fn inverse(&self) -> SE3Pose {
        let rotation = self.rotation.inverse();
        let translation = rotation * -self.translation;
        return Self::new(rotation, translation);
    }
    /// The displacement transform such that T_self * T_disp = T_other.
    pub fn displacement(&self, other: &SE3Pose) -> SE3Pose {
        return self.inverse().multiply(other);
    }
    /// The SE(3) logarithm map of the pose.  The first three components are the translational
    /// part (V^-1 * t), the last three are the scaled rotation axis.  The result is the zero
    /// vector exactly when the pose is the identity.
    pub fn ln(&self) -> Vector6<f64> {
        let phi = self.rotation.scaled_axis();
        let theta = phi.norm();
        let phi_skew = skew_symmetric_matrix(&phi);
        let phi_skew_sq = phi_skew * phi_skew;

        // Small angles take the series expansion of V^-1 to sidestep the 1/theta^2 singularity.
        let v_inv: Matrix3<f64> = if theta < 1e-8 {
            Matrix3::identity() - 0.5 * phi_skew + phi_skew_sq / 12.0
        } else {
            let coefficient = if theta.sin().abs() < 1e-9 {
                1.0 / (theta * theta)
            } else {
                1.0 / (theta * theta) - (1.0 + theta.cos()) / (2.0 * theta * theta.sin())
            };
            Matrix3::identity() - 0.5 * phi_skew + coefficient * phi_skew_sq
        };

        let rho = v_inv * self.translation;
        return Vector6::new(rho[0], rho[1], rho[2], phi[0], phi[1], phi[2]);
    }
    /// The geodesic distance on SE(3) between the two poses, i.e., the norm of the logarithm
    /// map of self^-1 * other.  Zero exactly when the poses coincide, and invariant to
    /// common left-multiplication of both poses by any rigid transform.
    pub fn geodesic_distance(&self, other: &SE3Pose) -> f64 {
        return self.displacement(other).ln().norm();
    }
    /// Provides an approximate distance between two poses (rotation angle plus translation
    /// distance).  This is not an official distance metric, but is cheap and adequate for
    /// error reports.
    pub fn approximate_distance(&self, other: &SE3Pose) -> f64 {
        let angle_between = self.rotation.angle_to(&other.rotation);
        let translation_between = (self.translation - other.translation).norm();
        return angle_between + translation_between;
    }
    /// Outputs an Isometry3 object in the nalgebra library that corresponds to the SE(3) pose.
    pub fn to_nalgebra_isometry(&self) -> Isometry3<f64> {
        return Isometry3::from_parts(self.translation.into(), self.rotation);
    }
}

fn skew_symmetric_matrix(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v[2], v[1],
                 v[2], 0.0, -v[0],
                 -v[1], v[0], 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ln_of_identity_is_zero() {
        let pose = SE3Pose::new_identity();
        assert_relative_eq!(pose.ln().norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn geodesic_distance_is_zero_iff_poses_match() {
        let a = SE3Pose::new_from_euler_angles(0.2, -0.4, 1.1, 0.5, 0.1, 0.2);
        let b = SE3Pose::new_from_euler_angles(0.2, -0.4, 1.1, 0.5, 0.1, 0.2);
        assert_relative_eq!(a.geodesic_distance(&b), 0.0, epsilon = 1e-10);

        let c = SE3Pose::new_from_euler_angles(0.2, -0.4, 1.1, 0.5, 0.1, 0.3);
        assert!(a.geodesic_distance(&c) > 1e-3);
    }

    #[test]
    fn geodesic_distance_is_left_invariant() {
        let a = SE3Pose::new_from_euler_angles(0.3, 0.1, -0.7, 1.0, -2.0, 0.5);
        let b = SE3Pose::new_from_euler_angles(-0.5, 0.9, 0.2, 0.0, 0.4, -1.2);
        let g = SE3Pose::new_from_euler_angles(1.2, -0.3, 0.8, 3.0, 1.0, -0.6);

        let d = a.geodesic_distance(&b);
        let d_shifted = g.multiply(&a).geodesic_distance(&g.multiply(&b));
        assert_relative_eq!(d, d_shifted, epsilon = 1e-9);
    }

    #[test]
    fn multiply_then_inverse_recovers_identity() {
        let a = SE3Pose::new_from_euler_angles(0.3, 0.1, -0.7, 1.0, -2.0, 0.5);
        let res = a.multiply(&a.inverse());
        assert_relative_eq!(res.ln().norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn displacement_maps_self_onto_other() {
        let a = SE3Pose::new_from_euler_angles(0.3, 0.1, -0.7, 1.0, -2.0, 0.5);
        let b = SE3Pose::new_from_euler_angles(-0.5, 0.9, 0.2, 0.0, 0.4, -1.2);
        let disp = a.displacement(&b);
        let recovered = a.multiply(&disp);
        assert_relative_eq!(recovered.geodesic_distance(&b), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn approximate_distance_is_angle_plus_translation() {
        let a = SE3Pose::new_identity();
        let z_axis = Vector3::z_axis();
        let b = SE3Pose::new_from_axis_angle(&z_axis, 0.4, 0.3, 0.0, 0.0);
        assert_relative_eq!(a.approximate_distance(&b), 0.4 + 0.3, epsilon = 1e-12);
        assert_relative_eq!(a.approximate_distance(&a), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn nalgebra_isometry_agrees_with_multiply_by_point() {
        let a = SE3Pose::new_from_euler_angles(0.3, 0.1, -0.7, 1.0, -2.0, 0.5);
        let p = Vector3::new(0.5, -0.25, 2.0);
        let via_pose = a.multiply_by_point(&p);
        let via_isometry = a.to_nalgebra_isometry() * nalgebra::Point3::from(p);
        assert_relative_eq!((via_pose - via_isometry.coords).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn inverse_multiply_by_point_roundtrip() {
        let a = SE3Pose::new_from_euler_angles(0.3, 0.1, -0.7, 1.0, -2.0, 0.5);
        let p = Vector3::new(0.5, -0.25, 2.0);
        let q = a.multiply_by_point(&p);
        let p2 = a.inverse().multiply_by_point(&q);
        assert_relative_eq!((p - p2).norm(), 0.0, epsilon = 1e-12);
    }
}
