use nalgebra::{DMatrix, DVector};
use crate::robot_modules::robot_model_module::FrameRef;
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_se3::se3_pose::SE3Pose;

pub mod robot_model_module;
pub mod robot_joint_state_module;
pub mod robot_kinematics_module;

/// The kinematic model provider contract that the inverse geometry solver and the objective
/// functions are written against.  Given a configuration vector and a frame identifier, a
/// provider returns that frame's pose in a fixed world frame; it also exposes the model's
/// degree-of-freedom count and a home/default configuration.
pub trait KinematicModel {
    fn num_dofs(&self) -> usize;
    fn home_configuration(&self) -> DVector<f64>;
    fn frame_pose(&self, joint_state: &DVector<f64>, frame: &FrameRef) -> Result<SE3Pose, InvGeomError>;
    /// Providers that can compute the 3 x num_dofs Jacobian of a frame's world position may
    /// override this; objective functions fall back to finite differences when it returns
    /// `None`.
    fn frame_position_jacobian(&self, _joint_state: &DVector<f64>, _frame: &FrameRef) -> Result<Option<DMatrix<f64>>, InvGeomError> {
        Ok(None)
    }
    fn joint_state_bounds(&self) -> Vec<(f64, f64)> {
        vec![(-f64::INFINITY, f64::INFINITY); self.num_dofs()]
    }
}
