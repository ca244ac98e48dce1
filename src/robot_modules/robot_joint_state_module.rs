use nalgebra::DVector;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::robot_modules::robot_model_module::RobotModelModule;
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_sampling::SimpleSamplers;

/// A validated configuration vector for a particular robot model.  Spawning a joint state
/// through the `RobotJointStateModule` is the only way to construct one, so holding a
/// `RobotJointState` implies its dimension matches the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotJointState {
    joint_state: DVector<f64>
}
impl RobotJointState {
    pub fn joint_state(&self) -> &DVector<f64> {
        &self.joint_state
    }
}

/// Handles joint state bookkeeping for a robot model: degree-of-freedom count, the
/// home/default configuration, per-DOF bounds, dimension checking, and configuration
/// sampling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotJointStateModule {
    num_dofs: usize,
    joint_state_bounds: Vec<(f64, f64)>,
    home_configuration: DVector<f64>,
    robot_name: String
}
impl RobotJointStateModule {
    pub fn new(robot_model_module: &RobotModelModule) -> Self {
        Self {
            num_dofs: robot_model_module.num_dofs(),
            joint_state_bounds: robot_model_module.joint_bounds(),
            home_configuration: robot_model_module.home_configuration().clone(),
            robot_name: robot_model_module.robot_name().to_string()
        }
    }
    pub fn num_dofs(&self) -> usize {
        self.num_dofs
    }
    pub fn home_configuration(&self) -> &DVector<f64> {
        &self.home_configuration
    }
    pub fn joint_state_bounds(&self) -> &Vec<(f64, f64)> {
        &self.joint_state_bounds
    }
    /// Wraps the given vector as a `RobotJointState`, erroring if the dimension does not
    /// match the model's degree-of-freedom count.
    pub fn spawn_robot_joint_state(&self, joint_state: DVector<f64>) -> Result<RobotJointState, InvGeomError> {
        if joint_state.len() != self.num_dofs {
            return Err(InvGeomError::new_joint_state_vec_wrong_size_error("spawn_robot_joint_state", joint_state.len(), self.num_dofs, file!(), line!()));
        }
        return Ok(RobotJointState { joint_state });
    }
    pub fn spawn_zeros_robot_joint_state(&self) -> RobotJointState {
        RobotJointState { joint_state: DVector::zeros(self.num_dofs) }
    }
    pub fn spawn_home_robot_joint_state(&self) -> RobotJointState {
        RobotJointState { joint_state: self.home_configuration.clone() }
    }
    /// Uniformly samples a configuration within the joint state bounds.
    pub fn sample_joint_state<R: Rng>(&self, rng: &mut R) -> RobotJointState {
        let samples = SimpleSamplers::uniform_samples_with_rng(&self.joint_state_bounds, rng);
        RobotJointState { joint_state: DVector::from_vec(samples) }
    }
}
