use nalgebra::{DVector, Vector3};
use serde::{Serialize, Deserialize};
use crate::robot_modules::KinematicModel;
use crate::robot_modules::robot_model_module::FrameRef;
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_se3::se3_pose::SE3Pose;

/// A target that a frame on the model should reach.  The optional weight scales the goal's
/// contribution to a multi-goal objective; weights are always explicit here, never captured
/// from ambient state.  A weight of `None` means 1.0.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FrameGoal {
    /// Translational target only; orientation is ignored.
    Position { frame: FrameRef, goal: Vector3<f64>, weight: Option<f64> },
    /// Full SE(3) pose target; errors are measured with the geodesic distance.
    SE3Pose { frame: FrameRef, goal: SE3Pose, weight: Option<f64> }
}
impl FrameGoal {
    pub fn frame(&self) -> &FrameRef {
        return match self {
            FrameGoal::Position { frame, .. } => { frame }
            FrameGoal::SE3Pose { frame, .. } => { frame }
        }
    }
    pub fn weight(&self) -> f64 {
        let weight = match self {
            FrameGoal::Position { weight, .. } => { weight }
            FrameGoal::SE3Pose { weight, .. } => { weight }
        };
        return match weight {
            None => { 1.0 }
            Some(w) => { *w }
        }
    }
    /// The scalar discrepancy between the frame's pose at configuration q and the goal
    /// (unweighted).
    pub fn compute_error(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<f64, InvGeomError> {
        return match self {
            FrameGoal::Position { frame, goal, .. } => {
                let pose = model.frame_pose(q, frame)?;
                Ok((pose.translation() - goal).norm())
            }
            FrameGoal::SE3Pose { frame, goal, .. } => {
                let pose = model.frame_pose(q, frame)?;
                Ok(pose.geodesic_distance(goal))
            }
        }
    }
    pub fn compute_error_report(&self, q: &DVector<f64>, model: &dyn KinematicModel) -> Result<FrameGoalErrorReport, InvGeomError> {
        return match self {
            FrameGoal::Position { frame, goal, .. } => {
                let pose = model.frame_pose(q, frame)?;
                Ok(FrameGoalErrorReport {
                    frame: frame.clone(),
                    translation_error: (pose.translation() - goal).norm(),
                    rotation_error: 0.0
                })
            }
            FrameGoal::SE3Pose { frame, goal, .. } => {
                let pose = model.frame_pose(q, frame)?;
                Ok(FrameGoalErrorReport {
                    frame: frame.clone(),
                    translation_error: (pose.translation() - goal.translation()).norm(),
                    rotation_error: pose.rotation().angle_to(goal.rotation())
                })
            }
        }
    }
    pub fn is_error_allowable(&self, q: &DVector<f64>, model: &dyn KinematicModel, allowable_error: &FrameGoalAllowableError) -> Result<bool, InvGeomError> {
        let report = self.compute_error_report(q, model)?;
        return Ok(report.translation_error <= allowable_error.translation && report.rotation_error <= allowable_error.rotation);
    }
}

/// Per-goal tolerances used by the retrying solver to accept or reject a solution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameGoalAllowableError {
    pub translation: f64,
    pub rotation: f64
}
impl Default for FrameGoalAllowableError {
    fn default() -> Self {
        Self {
            translation: 0.001,
            rotation: 0.01
        }
    }
}

/// All frame goals for a solve.  At most one goal per frame; inserting a goal for a frame
/// that already has one replaces it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameGoalCollection {
    goals: Vec<FrameGoal>
}
impl FrameGoalCollection {
    pub fn new() -> Self {
        Self {
            goals: vec![]
        }
    }
    pub fn insert_or_replace(&mut self, goal: FrameGoal) {
        let existing = self.goals.iter().position(|g| g.frame() == goal.frame());
        match existing {
            None => { self.goals.push(goal); }
            Some(idx) => { self.goals[idx] = goal; }
        }
    }
    pub fn remove_all(&mut self) {
        self.goals.clear();
    }
    pub fn frame_goal_refs(&self) -> &Vec<FrameGoal> {
        &self.goals
    }
    pub fn print_summary(&self) {
        for goal in &self.goals {
            println!("{:?}", goal);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameGoalErrorReport {
    frame: FrameRef,
    translation_error: f64,
    rotation_error: f64
}
impl FrameGoalErrorReport {
    pub fn frame(&self) -> &FrameRef {
        &self.frame
    }
    pub fn translation_error(&self) -> f64 {
        self.translation_error
    }
    pub fn rotation_error(&self) -> f64 {
        self.rotation_error
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameGoalErrorReportCollection {
    reports: Vec<FrameGoalErrorReport>
}
impl FrameGoalErrorReportCollection {
    pub fn new() -> Self {
        Self {
            reports: vec![]
        }
    }
    pub fn add(&mut self, report: FrameGoalErrorReport) {
        self.reports.push(report);
    }
    pub fn reports(&self) -> &Vec<FrameGoalErrorReport> {
        &self.reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_or_replace_keeps_one_goal_per_frame() {
        let mut collection = FrameGoalCollection::new();
        collection.insert_or_replace(FrameGoal::Position {
            frame: FrameRef::Name("tool".to_string()),
            goal: Vector3::new(0.5, 0.1, 0.2),
            weight: None
        });
        collection.insert_or_replace(FrameGoal::Position {
            frame: FrameRef::Name("tool".to_string()),
            goal: Vector3::new(0.4, 0.0, 0.3),
            weight: Some(2.0)
        });
        assert_eq!(collection.frame_goal_refs().len(), 1);
        assert_eq!(collection.frame_goal_refs()[0].weight(), 2.0);

        collection.insert_or_replace(FrameGoal::Position {
            frame: FrameRef::CenterOfMass,
            goal: Vector3::new(0.0, 0.0, 0.5),
            weight: Some(10.0)
        });
        assert_eq!(collection.frame_goal_refs().len(), 2);

        collection.remove_all();
        assert!(collection.frame_goal_refs().is_empty());
    }
}
