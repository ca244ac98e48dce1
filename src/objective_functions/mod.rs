use nalgebra::{DVector, Vector3};
use serde::{Serialize, Deserialize};
use crate::robot_modules::KinematicModel;
use crate::robot_modules::robot_model_module::FrameRef;
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_math::finite_difference::{DEFAULT_FD_PERTURBATION, FiniteDifferenceUtils};
use crate::utils::utils_robot::frame_specification::{FrameGoal, FrameGoalCollection};
use crate::utils::utils_se3::se3_pose::SE3Pose;

/// A scalar cost over configurations.  Implementations must be pure functions of q (all
/// side effects belong in iteration observers, never in the cost); the optimizer's line
/// search assumptions rely on this.
pub trait ScalarObjective {
    fn call(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<f64, InvGeomError>;
    /// Analytical gradient where one is available, finite differences otherwise.
    fn gradient(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<DVector<f64>, InvGeomError> {
        if let Some(gradient) = self.gradient_analytical(q, model)? {
            return Ok(gradient);
        }
        return self.gradient_finite_difference(q, model);
    }
    fn gradient_analytical(&self, _q: &DVector<f64>, _model: &dyn KinematicModel) -> Result<Option<DVector<f64>>, InvGeomError> {
        Ok(None)
    }
    fn gradient_finite_difference(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<DVector<f64>, InvGeomError> {
        return FiniteDifferenceUtils::scalar_function_gradient(|x| self.call(x, model), q, DEFAULT_FD_PERTURBATION);
    }
}

/// Position-only pose matching: the Euclidean norm of the difference between a frame's
/// world position at q and a fixed target position.  Orientation is ignored; use this when
/// only translational reach matters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FramePositionObjective {
    frame: FrameRef,
    goal: Vector3<f64>
}
impl FramePositionObjective {
    pub fn new(frame: FrameRef, goal: Vector3<f64>) -> Self {
        Self {
            frame,
            goal
        }
    }
    pub fn frame(&self) -> &FrameRef {
        &self.frame
    }
    pub fn goal(&self) -> &Vector3<f64> {
        &self.goal
    }
}
impl ScalarObjective for FramePositionObjective {
    fn call(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<f64, InvGeomError> {
        let pose = model.frame_pose(q, &self.frame)?;
        return Ok((pose.translation() - self.goal).norm());
    }
    fn gradient_analytical(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<Option<DVector<f64>>, InvGeomError> {
        let jacobian = match model.frame_position_jacobian(q, &self.frame)? {
            None => { return Ok(None); }
            Some(jacobian) => { jacobian }
        };
        let pose = model.frame_pose(q, &self.frame)?;
        let diff = pose.translation() - self.goal;
        let norm = diff.norm();
        // The norm is not differentiable at the target itself.
        if norm < 1e-12 {
            return Ok(Some(DVector::zeros(q.len())));
        }
        return Ok(Some(jacobian.transpose() * diff / norm));
    }
}

/// Full pose matching: the norm of the SE(3) logarithm of pose(q)^-1 * target_pose, i.e.,
/// the geodesic distance between the frame's pose and the target on the rigid-transform
/// manifold.  Use this when orientation matching matters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameSE3PoseObjective {
    frame: FrameRef,
    goal: SE3Pose
}
impl FrameSE3PoseObjective {
    pub fn new(frame: FrameRef, goal: SE3Pose) -> Self {
        Self {
            frame,
            goal
        }
    }
    pub fn frame(&self) -> &FrameRef {
        &self.frame
    }
    pub fn goal(&self) -> &SE3Pose {
        &self.goal
    }
}
impl ScalarObjective for FrameSE3PoseObjective {
    fn call(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<f64, InvGeomError> {
        let pose = model.frame_pose(q, &self.frame)?;
        return Ok(pose.geodesic_distance(&self.goal));
    }
}

/// Multi-point weighted pose matching: the sum over several frame goals of the squared
/// discrepancy, each scaled by an explicit non-negative weight.  This expresses competing
/// soft constraints (e.g., reach with one hand while keeping both feet planted and the
/// center of mass above the support region).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightedFrameGoalObjective {
    goals: FrameGoalCollection
}
impl WeightedFrameGoalObjective {
    pub fn new(goals: FrameGoalCollection) -> Result<Self, InvGeomError> {
        for goal in goals.frame_goal_refs() {
            if goal.weight() < 0.0 {
                return Err(InvGeomError::new_generic_error_str(&format!("frame goal {:?} has a negative weight.", goal.frame()), file!(), line!()));
            }
        }
        return Ok(Self { goals });
    }
    pub fn frame_goal_collection_ref(&self) -> &FrameGoalCollection {
        &self.goals
    }
}
impl ScalarObjective for WeightedFrameGoalObjective {
    fn call(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<f64, InvGeomError> {
        let mut out_cost = 0.0;
        for goal in self.goals.frame_goal_refs() {
            let error = goal.compute_error(q, model)?;
            out_cost += goal.weight() * error * error;
        }
        return Ok(out_cost);
    }
    fn gradient_analytical(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<Option<DVector<f64>>, InvGeomError> {
        let mut out_gradient = DVector::zeros(q.len());
        for goal in self.goals.frame_goal_refs() {
            match goal {
                FrameGoal::Position { frame, goal: target, weight: _ } => {
                    let jacobian = match model.frame_position_jacobian(q, frame)? {
                        None => { return Ok(None); }
                        Some(jacobian) => { jacobian }
                    };
                    let pose = model.frame_pose(q, frame)?;
                    let diff = pose.translation() - target;
                    out_gradient += 2.0 * goal.weight() * jacobian.transpose() * diff;
                }
                // No closed-form gradient for the geodesic term; let the whole objective
                // fall back to finite differences.
                FrameGoal::SE3Pose { .. } => { return Ok(None); }
            }
        }
        return Ok(Some(out_gradient));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::robot_modules::robot_kinematics_module::RobotKinematicsModule;
    use crate::robot_modules::robot_model_module::RobotModelModule;

    fn planar_two_link() -> RobotKinematicsModule {
        let mut model = RobotModelModule::new("planar_2r");
        model.add_revolute_joint("shoulder", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
        model.add_revolute_joint("elbow", Vector3::z(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.3, 0., 0.), (-3.14, 3.14));
        model.add_frame("tool", 1, SE3Pose::new_from_euler_angles(0., 0., 0., 0.25, 0., 0.)).expect("error");
        RobotKinematicsModule::new(model)
    }

    #[test]
    fn position_cost_is_zero_iff_position_matches() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.3, -0.7]);
        let frame = FrameRef::Name("tool".to_string());
        let reached = kinematics.frame_pose(&q, &frame).expect("error").translation().clone();

        let objective = FramePositionObjective::new(frame.clone(), reached);
        assert_relative_eq!(objective.call(&q, &kinematics).expect("error"), 0.0, epsilon = 1e-12);

        let other = FramePositionObjective::new(frame, reached + Vector3::new(0.0, 0.0, 0.1));
        assert!(other.call(&q, &kinematics).expect("error") > 0.05);
    }

    #[test]
    fn se3_cost_is_zero_iff_pose_matches() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.3, -0.7]);
        let frame = FrameRef::Name("tool".to_string());
        let reached = kinematics.frame_pose(&q, &frame).expect("error");

        let objective = FrameSE3PoseObjective::new(frame.clone(), reached.clone());
        assert_relative_eq!(objective.call(&q, &kinematics).expect("error"), 0.0, epsilon = 1e-10);

        // Same position, rotated target: the geodesic cost must see the orientation mismatch.
        let rotated = SE3Pose::new_from_euler_angles(0., 0., 0.5, reached.translation()[0], reached.translation()[1], reached.translation()[2]);
        let objective = FrameSE3PoseObjective::new(frame, rotated);
        assert!(objective.call(&q, &kinematics).expect("error") > 0.1);
    }

    #[test]
    fn position_gradient_analytical_matches_finite_differences() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.4, -0.9]);
        let objective = FramePositionObjective::new(FrameRef::Name("tool".to_string()), Vector3::new(0.5, 0.1, 0.0));

        let analytical = objective.gradient_analytical(&q, &kinematics).expect("error").expect("expected analytical gradient");
        let fd = objective.gradient_finite_difference(&q, &kinematics).expect("error");
        for i in 0..2 {
            assert_relative_eq!(analytical[i], fd[i], epsilon = 1e-5);
        }
    }

    #[test]
    fn weighted_cost_is_monotonically_non_decreasing_in_each_weight() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.2, 0.5]);
        let frame = FrameRef::Name("tool".to_string());

        let cost_with_weight = |w: f64| -> f64 {
            let mut goals = FrameGoalCollection::new();
            goals.insert_or_replace(FrameGoal::Position {
                frame: frame.clone(),
                goal: Vector3::new(0.5, 0.1, 0.2),
                weight: Some(w)
            });
            goals.insert_or_replace(FrameGoal::Position {
                frame: FrameRef::Idx(0),
                goal: Vector3::new(0.0, 0.0, 0.0),
                weight: Some(1.0)
            });
            WeightedFrameGoalObjective::new(goals).expect("error").call(&q, &kinematics).expect("error")
        };

        let mut previous = cost_with_weight(0.0);
        for w in [0.5, 1.0, 2.0, 10.0] {
            let current = cost_with_weight(w);
            assert!(current >= previous - 1e-12);
            previous = current;
        }
    }

    #[test]
    fn negative_weights_are_rejected() {
        let mut goals = FrameGoalCollection::new();
        goals.insert_or_replace(FrameGoal::Position {
            frame: FrameRef::Name("tool".to_string()),
            goal: Vector3::new(0.5, 0.1, 0.2),
            weight: Some(-1.0)
        });
        assert!(WeightedFrameGoalObjective::new(goals).is_err());
    }

    #[test]
    fn invalid_frame_fault_propagates_from_cost() {
        let kinematics = planar_two_link();
        let q = DVector::from_vec(vec![0.0, 0.0]);
        let objective = FramePositionObjective::new(FrameRef::Name("no_such_frame".to_string()), Vector3::zeros());
        assert!(objective.call(&q, &kinematics).is_err());
    }
}
