use nalgebra::{DMatrix, DVector, Vector3};
use serde::{Serialize, Deserialize};
use crate::robot_modules::KinematicModel;
use crate::robot_modules::robot_joint_state_module::{RobotJointState, RobotJointStateModule};
use crate::robot_modules::robot_model_module::{FrameRef, JointAxisPrimitiveType, RobotModelModule};
use crate::utils::utils_console::{invgeom_print, invgeom_print_new_line, PrintColor, PrintMode};
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_se3::se3_pose::SE3Pose;

/// Forward kinematics and differential kinematics for a serial-chain robot model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotKinematicsModule {
    robot_model_module: RobotModelModule,
    robot_joint_state_module: RobotJointStateModule
}
impl RobotKinematicsModule {
    pub fn new(robot_model_module: RobotModelModule) -> Self {
        let robot_joint_state_module = RobotJointStateModule::new(&robot_model_module);
        Self {
            robot_model_module,
            robot_joint_state_module
        }
    }
    pub fn robot_model_module(&self) -> &RobotModelModule {
        &self.robot_model_module
    }
    pub fn robot_joint_state_module(&self) -> &RobotJointStateModule {
        &self.robot_joint_state_module
    }
    /// Computes the world pose of every joint frame at the given configuration.
    pub fn compute_fk(&self, joint_state: &RobotJointState) -> Result<RobotFKResult, InvGeomError> {
        let q = joint_state.joint_state();
        let joint_frame_poses = self.compute_joint_frame_poses(q)?;
        let mut entries = vec![];
        for (joint_idx, pose) in joint_frame_poses.iter().enumerate() {
            entries.push(RobotFKResultJointEntry {
                joint_idx,
                joint_name: self.robot_model_module.joints()[joint_idx].name().to_string(),
                pose: pose.clone()
            });
        }
        return Ok(RobotFKResult { joint_frame_entries: entries });
    }
    /// World pose of the given frame at configuration q.  For `FrameRef::CenterOfMass` the
    /// returned pose carries an identity rotation and the center-of-mass position.
    pub fn frame_pose(&self, q: &DVector<f64>, frame: &FrameRef) -> Result<SE3Pose, InvGeomError> {
        let joint_frame_poses = self.compute_joint_frame_poses(q)?;
        return self.frame_pose_from_joint_frame_poses(&joint_frame_poses, frame);
    }
    /// Mass-weighted center of mass of all links with mass properties, in the world frame.
    pub fn center_of_mass(&self, q: &DVector<f64>) -> Result<Vector3<f64>, InvGeomError> {
        let joint_frame_poses = self.compute_joint_frame_poses(q)?;
        return self.center_of_mass_from_joint_frame_poses(&joint_frame_poses);
    }
    /// The 3 x num_dofs Jacobian of the given frame's world position with respect to the
    /// configuration.  Used for analytical gradients of position goals.
    pub fn compute_position_jacobian(&self, q: &DVector<f64>, frame: &FrameRef) -> Result<DMatrix<f64>, InvGeomError> {
        let joint_frame_poses = self.compute_joint_frame_poses(q)?;
        return match frame {
            FrameRef::CenterOfMass => {
                let mut total_mass = 0.0;
                let mut out_jacobian = DMatrix::zeros(3, self.robot_model_module.num_dofs());
                for (joint_idx, mass_properties) in self.robot_model_module.link_mass_properties().iter().enumerate() {
                    if let Some(m) = mass_properties {
                        let link_com = joint_frame_poses[joint_idx].multiply_by_point(m.local_com());
                        out_jacobian += m.mass() * self.point_jacobian(&joint_frame_poses, &link_com, joint_idx);
                        total_mass += m.mass();
                    }
                }
                if total_mass == 0.0 {
                    return Err(InvGeomError::new_generic_error_str(&format!("robot {:?} has no link mass properties; cannot compute a center of mass jacobian.", self.robot_model_module.robot_name()), file!(), line!()));
                }
                Ok(out_jacobian / total_mass)
            }
            _ => {
                let frame_idx = self.resolve_frame_idx(frame)?;
                let model_frame = self.robot_model_module.get_frame_by_idx(frame_idx)?;
                let p = self.frame_pose_from_joint_frame_poses(&joint_frame_poses, frame)?.translation().clone();
                Ok(self.point_jacobian(&joint_frame_poses, &p, model_frame.parent_joint_idx()))
            }
        }
    }

    fn compute_joint_frame_poses(&self, q: &DVector<f64>) -> Result<Vec<SE3Pose>, InvGeomError> {
        let num_dofs = self.robot_model_module.num_dofs();
        if q.len() != num_dofs {
            return Err(InvGeomError::new_joint_state_vec_wrong_size_error("compute_joint_frame_poses", q.len(), num_dofs, file!(), line!()));
        }

        let mut out_poses = Vec::with_capacity(num_dofs);
        let mut current_pose = SE3Pose::new_identity();
        for (joint_idx, joint) in self.robot_model_module.joints().iter().enumerate() {
            current_pose = current_pose.multiply(joint.origin_offset_pose());
            let joint_value = q[joint_idx];
            let motion_pose = match joint.axis_primitive_type() {
                JointAxisPrimitiveType::Rotation => {
                    SE3Pose::new_from_axis_angle(&joint.axis_as_unit(), joint_value, 0., 0., 0.)
                }
                JointAxisPrimitiveType::Translation => {
                    let t = joint_value * joint.axis();
                    SE3Pose::new_from_euler_angles(0., 0., 0., t[0], t[1], t[2])
                }
            };
            current_pose = current_pose.multiply(&motion_pose);
            out_poses.push(current_pose.clone());
        }
        return Ok(out_poses);
    }
    fn frame_pose_from_joint_frame_poses(&self, joint_frame_poses: &Vec<SE3Pose>, frame: &FrameRef) -> Result<SE3Pose, InvGeomError> {
        return match frame {
            FrameRef::CenterOfMass => {
                let com = self.center_of_mass_from_joint_frame_poses(joint_frame_poses)?;
                Ok(SE3Pose::new(nalgebra::UnitQuaternion::identity(), com))
            }
            _ => {
                let frame_idx = self.resolve_frame_idx(frame)?;
                let model_frame = self.robot_model_module.get_frame_by_idx(frame_idx)?;
                Ok(joint_frame_poses[model_frame.parent_joint_idx()].multiply(model_frame.local_offset_pose()))
            }
        }
    }
    fn center_of_mass_from_joint_frame_poses(&self, joint_frame_poses: &Vec<SE3Pose>) -> Result<Vector3<f64>, InvGeomError> {
        let mut total_mass = 0.0;
        let mut weighted_sum = Vector3::zeros();
        for (joint_idx, mass_properties) in self.robot_model_module.link_mass_properties().iter().enumerate() {
            if let Some(m) = mass_properties {
                weighted_sum += m.mass() * joint_frame_poses[joint_idx].multiply_by_point(m.local_com());
                total_mass += m.mass();
            }
        }
        if total_mass == 0.0 {
            return Err(InvGeomError::new_generic_error_str(&format!("robot {:?} has no link mass properties; cannot compute a center of mass.", self.robot_model_module.robot_name()), file!(), line!()));
        }
        return Ok(weighted_sum / total_mass);
    }
    fn resolve_frame_idx(&self, frame: &FrameRef) -> Result<usize, InvGeomError> {
        return match frame {
            FrameRef::Name(name) => { self.robot_model_module.get_frame_idx_by_name(name) }
            FrameRef::Idx(idx) => {
                if *idx >= self.robot_model_module.frames().len() {
                    Err(InvGeomError::new_idx_out_of_bound_error(*idx, self.robot_model_module.frames().len(), file!(), line!()))
                } else {
                    Ok(*idx)
                }
            }
            FrameRef::CenterOfMass => {
                Err(InvGeomError::new_generic_error_str("center of mass does not resolve to a model frame index.", file!(), line!()))
            }
        }
    }
    /// Jacobian of the world position of point p, which is rigidly attached to the frame of
    /// joint `max_joint_idx`.  Columns past that joint stay zero.
    fn point_jacobian(&self, joint_frame_poses: &Vec<SE3Pose>, p: &Vector3<f64>, max_joint_idx: usize) -> DMatrix<f64> {
        let num_dofs = self.robot_model_module.num_dofs();
        let mut out_jacobian = DMatrix::zeros(3, num_dofs);
        for joint_idx in 0..=max_joint_idx {
            let joint = &self.robot_model_module.joints()[joint_idx];
            let z = joint_frame_poses[joint_idx].rotation() * joint.axis();
            let column = match joint.axis_primitive_type() {
                JointAxisPrimitiveType::Rotation => {
                    let o = joint_frame_poses[joint_idx].translation();
                    z.cross(&(p - o))
                }
                JointAxisPrimitiveType::Translation => { z }
            };
            out_jacobian[(0, joint_idx)] = column[0];
            out_jacobian[(1, joint_idx)] = column[1];
            out_jacobian[(2, joint_idx)] = column[2];
        }
        return out_jacobian;
    }
}
impl KinematicModel for RobotKinematicsModule {
    fn num_dofs(&self) -> usize {
        self.robot_joint_state_module.num_dofs()
    }
    fn home_configuration(&self) -> DVector<f64> {
        self.robot_joint_state_module.home_configuration().clone()
    }
    fn frame_pose(&self, joint_state: &DVector<f64>, frame: &FrameRef) -> Result<SE3Pose, InvGeomError> {
        return RobotKinematicsModule::frame_pose(self, joint_state, frame);
    }
    fn frame_position_jacobian(&self, joint_state: &DVector<f64>, frame: &FrameRef) -> Result<Option<DMatrix<f64>>, InvGeomError> {
        return Ok(Some(self.compute_position_jacobian(joint_state, frame)?));
    }
    fn joint_state_bounds(&self) -> Vec<(f64, f64)> {
        self.robot_joint_state_module.joint_state_bounds().clone()
    }
}

/// The result of a forward kinematics computation: one world pose per joint frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotFKResult {
    joint_frame_entries: Vec<RobotFKResultJointEntry>
}
impl RobotFKResult {
    pub fn joint_frame_entries(&self) -> &Vec<RobotFKResultJointEntry> {
        &self.joint_frame_entries
    }
    pub fn print_summary(&self) {
        for entry in &self.joint_frame_entries {
            invgeom_print(&format!("joint {} ({}) ---> ", entry.joint_idx, entry.joint_name), PrintMode::Print, PrintColor::Blue, true);
            invgeom_print(&format!("{:?}", entry.pose), PrintMode::Print, PrintColor::None, false);
            invgeom_print_new_line();
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotFKResultJointEntry {
    joint_idx: usize,
    joint_name: String,
    pose: SE3Pose
}
impl RobotFKResultJointEntry {
    pub fn joint_idx(&self) -> usize {
        self.joint_idx
    }
    pub fn joint_name(&self) -> &str {
        &self.joint_name
    }
    pub fn pose(&self) -> &SE3Pose {
        &self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use approx::assert_relative_eq;
    use crate::utils::utils_math::finite_difference::{DEFAULT_FD_PERTURBATION, FiniteDifferenceUtils};

    /// Planar 2R arm in the xy plane: link lengths 0.3 and 0.25.
    fn planar_two_link() -> RobotKinematicsModule {
        let mut model = RobotModelModule::new("planar_2r");
        model.add_revolute_joint("shoulder", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
        model.add_revolute_joint("elbow", Vector3::z(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.3, 0., 0.), (-3.14, 3.14));
        model.add_frame("tool", 1, SE3Pose::new_from_euler_angles(0., 0., 0., 0.25, 0., 0.)).expect("error");
        model.set_link_mass_properties(0, 2.0, Vector3::new(0.15, 0., 0.)).expect("error");
        model.set_link_mass_properties(1, 1.0, Vector3::new(0.125, 0., 0.)).expect("error");
        RobotKinematicsModule::new(model)
    }

    #[test]
    fn fk_at_zero_configuration() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.0, 0.0]);
        let pose = kinematics.frame_pose(&q, &FrameRef::Name("tool".to_string())).expect("error");
        assert_relative_eq!(pose.translation()[0], 0.55, epsilon = 1e-12);
        assert_relative_eq!(pose.translation()[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn fk_with_rotated_joints() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![FRAC_PI_2, -FRAC_PI_2]);
        let pose = kinematics.frame_pose(&q, &FrameRef::Name("tool".to_string())).expect("error");
        assert_relative_eq!(pose.translation()[0], 0.25, epsilon = 1e-12);
        assert_relative_eq!(pose.translation()[1], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn fk_result_has_one_entry_per_joint() {
        let kinematics = planar_two_link();
        let joint_state = kinematics.robot_joint_state_module()
            .spawn_robot_joint_state(DVector::from_vec(vec![FRAC_PI_2, -FRAC_PI_2])).expect("error");
        let fk_result = kinematics.compute_fk(&joint_state).expect("error");

        let entries = fk_result.joint_frame_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].joint_name(), "shoulder");
        // elbow joint frame sits at the end of the first link
        assert_relative_eq!(entries[1].pose().translation()[1], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn wrong_configuration_dimension_errors() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.0, 0.0, 0.0]);
        assert!(kinematics.frame_pose(&q, &FrameRef::Name("tool".to_string())).is_err());
    }

    #[test]
    fn unknown_frame_errors() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.0, 0.0]);
        assert!(kinematics.frame_pose(&q, &FrameRef::Name("no_such_frame".to_string())).is_err());
    }

    #[test]
    fn center_of_mass_at_zero_configuration() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.0, 0.0]);
        let com = kinematics.center_of_mass(&q).expect("error");
        // (2.0 * 0.15 + 1.0 * 0.425) / 3.0
        assert_relative_eq!(com[0], 0.7250 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(com[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn position_jacobian_matches_finite_differences() {
        let kinematics = planar_two_link();
        let frame = FrameRef::Name("tool".to_string());
        let q = DVector::from_vec(vec![0.4, -0.9]);
        let jacobian = kinematics.compute_position_jacobian(&q, &frame).expect("error");

        for coord in 0..3 {
            let f = |qq: &DVector<f64>| -> Result<f64, InvGeomError> {
                Ok(kinematics.frame_pose(qq, &frame)?.translation()[coord])
            };
            let g = FiniteDifferenceUtils::scalar_function_gradient(f, &q, DEFAULT_FD_PERTURBATION).expect("error");
            for dof in 0..2 {
                assert_relative_eq!(jacobian[(coord, dof)], g[dof], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn com_jacobian_matches_finite_differences() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.7, 0.3]);
        let jacobian = kinematics.compute_position_jacobian(&q, &FrameRef::CenterOfMass).expect("error");

        for coord in 0..3 {
            let f = |qq: &DVector<f64>| -> Result<f64, InvGeomError> {
                Ok(kinematics.center_of_mass(qq)?[coord])
            };
            let g = FiniteDifferenceUtils::scalar_function_gradient(f, &q, DEFAULT_FD_PERTURBATION).expect("error");
            for dof in 0..2 {
                assert_relative_eq!(jacobian[(coord, dof)], g[dof], epsilon = 1e-5);
            }
        }
    }
}
