use std::time::Duration;
use nalgebra::DVector;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::objective_functions::WeightedFrameGoalObjective;
use crate::optimization::{IterationObserver, NonlinearOptimizer, OptimizerParameters, SolveStatus};
use crate::robot_modules::KinematicModel;
use crate::utils::utils_console::{invgeom_print, PrintColor, PrintMode};
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_robot::frame_specification::{FrameGoalAllowableError, FrameGoalCollection, FrameGoalErrorReportCollection};
use crate::utils::utils_sampling::SimpleSamplers;

/// Inverse geometry solver: finds a configuration whose frame poses match a collection of
/// frame goals.  The solver is an explicit context object; the model it queries, the goals
/// it matches, and the optimizer parameters it runs with are all owned fields, never
/// ambient state.
pub struct InvGeomSolver {
    model: Box<dyn KinematicModel>,
    goals: FrameGoalCollection,
    parameters: OptimizerParameters
}
impl InvGeomSolver {
    pub fn new<M: KinematicModel + 'static>(model: M) -> Self {
        Self {
            model: Box::new(model),
            goals: FrameGoalCollection::new(),
            parameters: OptimizerParameters::default()
        }
    }
    pub fn model(&self) -> &dyn KinematicModel {
        &*self.model
    }
    pub fn frame_goal_collection_ref(&self) -> &FrameGoalCollection {
        &self.goals
    }
    pub fn frame_goal_collection_mut_ref(&mut self) -> &mut FrameGoalCollection {
        &mut self.goals
    }
    pub fn parameters_mut_ref(&mut self) -> &mut OptimizerParameters {
        &mut self.parameters
    }
    /// A single solve from the given initial condition (the model's home configuration when
    /// `None`).  Always returns the best configuration found, converged or not.
    pub fn solve(&self, init_condition: Option<&DVector<f64>>) -> Result<InvGeomSolution, InvGeomError> {
        let optimizer = self.spawn_optimizer()?;
        let init = self.resolve_init_condition(init_condition)?;
        let result = optimizer.optimize(&init, &*self.model, &self.parameters)?;
        return Ok(InvGeomSolution::new_from_optimizer_result(result.x_min().clone(), result.cost(), result.status(), result.num_iterations(), result.solve_time()));
    }
    /// Same as `solve`, but the given observer fires with the candidate configuration after
    /// every optimizer iteration.
    pub fn solve_with_observer(&self, init_condition: Option<&DVector<f64>>, observer: &mut dyn IterationObserver) -> Result<InvGeomSolution, InvGeomError> {
        let optimizer = self.spawn_optimizer()?;
        let init = self.resolve_init_condition(init_condition)?;
        let result = optimizer.optimize_with_observer(&init, &*self.model, &self.parameters, observer)?;
        return Ok(InvGeomSolution::new_from_optimizer_result(result.x_min().clone(), result.cost(), result.status(), result.num_iterations(), result.solve_time()));
    }
    /// Solves repeatedly from random restarts until every goal's error is within the given
    /// allowable error.  The first attempt starts from `init_condition` (or home); later
    /// attempts sample uniformly within the model's joint state bounds using the given rng.
    /// Returns `Ok(None)` when no attempt succeeds.
    pub fn solve_with_retries<R: Rng>(&self, allowable_error: &FrameGoalAllowableError, max_num_tries: usize, init_condition: Option<&DVector<f64>>, rng: &mut R) -> Result<Option<InvGeomSolution>, InvGeomError> {
        let optimizer = self.spawn_optimizer()?;
        let bounds = self.model.joint_state_bounds();

        for try_idx in 0..max_num_tries {
            let init = if try_idx == 0 {
                self.resolve_init_condition(init_condition)?
            } else {
                DVector::from_vec(SimpleSamplers::uniform_samples_with_rng(&bounds, rng))
            };

            let result = optimizer.optimize(&init, &*self.model, &self.parameters)?;

            let mut all_allowable = true;
            for goal in self.goals.frame_goal_refs() {
                if !goal.is_error_allowable(result.x_min(), &*self.model, allowable_error)? {
                    all_allowable = false;
                    break;
                }
            }
            if all_allowable {
                return Ok(Some(InvGeomSolution::new_from_optimizer_result(result.x_min().clone(), result.cost(), result.status(), result.num_iterations(), result.solve_time())));
            }

            invgeom_print(&format!("WARNING: inverse geometry solve attempt {} did not reach all goals within allowable error (cost was {:.8}).  Retrying from a random configuration.", try_idx, result.cost()), PrintMode::Println, PrintColor::Yellow, true);
        }

        invgeom_print(&format!("WARNING: inverse geometry solver exhausted all {} tries without a solution within allowable error.", max_num_tries), PrintMode::Println, PrintColor::Yellow, true);
        return Ok(None);
    }
    /// Per-goal translation and rotation errors at the given configuration.
    pub fn compute_frame_goal_error_reports(&self, q: &DVector<f64>) -> Result<FrameGoalErrorReportCollection, InvGeomError> {
        let mut out = FrameGoalErrorReportCollection::new();
        for goal in self.goals.frame_goal_refs() {
            out.add(goal.compute_error_report(q, &*self.model)?);
        }
        return Ok(out);
    }
    fn spawn_optimizer(&self) -> Result<NonlinearOptimizer, InvGeomError> {
        if self.goals.frame_goal_refs().is_empty() {
            return Err(InvGeomError::new_generic_error_str("cannot solve inverse geometry with an empty frame goal collection", file!(), line!()));
        }
        let objective = WeightedFrameGoalObjective::new(self.goals.clone())?;
        let mut optimizer = NonlinearOptimizer::new(objective, self.model.num_dofs());
        optimizer.set_bounds(self.model.joint_state_bounds());
        return Ok(optimizer);
    }
    fn resolve_init_condition(&self, init_condition: Option<&DVector<f64>>) -> Result<DVector<f64>, InvGeomError> {
        return match init_condition {
            None => { Ok(self.model.home_configuration()) }
            Some(init) => {
                if init.len() != self.model.num_dofs() {
                    return Err(InvGeomError::new_joint_state_vec_wrong_size_error("resolve_init_condition", init.len(), self.model.num_dofs(), file!(), line!()));
                }
                Ok(init.clone())
            }
        }
    }
}

/// The outcome of an inverse geometry solve: the best configuration found plus solve
/// metadata.  Non-convergence is reported through `status`, never as an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvGeomSolution {
    joint_state: DVector<f64>,
    cost: f64,
    status: SolveStatus,
    num_iterations: usize,
    solve_time: Duration
}
impl InvGeomSolution {
    fn new_from_optimizer_result(joint_state: DVector<f64>, cost: f64, status: SolveStatus, num_iterations: usize, solve_time: Duration) -> Self {
        Self { joint_state, cost, status, num_iterations, solve_time }
    }
    pub fn joint_state(&self) -> &DVector<f64> {
        &self.joint_state
    }
    pub fn cost(&self) -> f64 {
        self.cost
    }
    pub fn status(&self) -> SolveStatus {
        self.status
    }
    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }
    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }
    pub fn print_summary(&self) {
        invgeom_print("inverse geometry solution ", PrintMode::Print, PrintColor::Blue, true);
        invgeom_print(&format!("({:?} after {} iterations, {:?})", self.status, self.num_iterations, self.solve_time), PrintMode::Println, PrintColor::None, false);
        invgeom_print(&format!("  q: {:?}", self.joint_state.as_slice()), PrintMode::Println, PrintColor::None, false);
        invgeom_print(&format!("  cost: {:.10}", self.cost), PrintMode::Println, PrintColor::None, false);
    }
}
