use std::time::Duration;
use instant::Instant;
use nalgebra::DVector;
use optimization_engine::{constraints, Optimizer, Problem, SolverError};
use optimization_engine::core::ExitStatus;
use optimization_engine::panoc::{PANOCCache, PANOCOptimizer};
use serde::{Serialize, Deserialize};
use crate::objective_functions::ScalarObjective;
use crate::robot_modules::KinematicModel;
use crate::utils::utils_errors::InvGeomError;

pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Drives a generic unconstrained minimizer (the PANOC solver from Optimization Engine)
/// over a `ScalarObjective`.  The solver itself is an external collaborator; this type only
/// configures it, feeds it cost and gradient closures, and shapes its output.
pub struct NonlinearOptimizer {
    cost_function: Box<dyn ScalarObjective>,
    problem_size: usize,
    bounds: (Vec<f64>, Vec<f64>)
}
impl NonlinearOptimizer {
    pub fn new<F: ScalarObjective + 'static>(cost: F, problem_size: usize) -> Self {
        let mut lower_bounds = vec![];
        let mut upper_bounds = vec![];
        for _ in 0..problem_size { lower_bounds.push(-f64::INFINITY); upper_bounds.push(f64::INFINITY); }
        Self {
            cost_function: Box::new(cost),
            problem_size,
            bounds: (lower_bounds, upper_bounds)
        }
    }
    pub fn set_bounds(&mut self, bounds: Vec<(f64, f64)>) {
        assert_eq!(self.problem_size, bounds.len());
        let mut lower_bounds = vec![];
        let mut upper_bounds = vec![];
        for b in bounds {
            lower_bounds.push(b.0);
            upper_bounds.push(b.1);
        }
        self.bounds = (lower_bounds, upper_bounds);
    }
    pub fn cost(&self) -> &dyn ScalarObjective {
        &*self.cost_function
    }
    /// Runs the solver to completion from the given initial condition.  Non-convergence is
    /// not an error; the result carries the last iterate and a `MaxItersReached` status.
    pub fn optimize(&self, init_condition: &DVector<f64>, model: &dyn KinematicModel, parameters: &OptimizerParameters) -> Result<OptimizerResult, InvGeomError> {
        // Surfaces invalid-input faults (bad frame, wrong dimension) before the solve so the
        // closures handed to the solver cannot fail mid-iteration.
        self.cost_function.call(init_condition, model)?;
        self.cost_function.gradient(init_condition, model)?;

        let start = Instant::now();
        let mut panoc_cache = PANOCCache::new(self.problem_size, parameters.tolerance, parameters.lbfgs_memory);

        let df = |u: &[f64], grad: &mut [f64]| -> Result<(), SolverError> {
            let input = DVector::from_column_slice(u);
            let res = self.cost_function.gradient(&input, model).expect("error");
            for (i, v) in res.iter().enumerate() { grad[i] = *v; }
            Ok(())
        };
        let f = |u: &[f64], cost: &mut f64| -> Result<(), SolverError> {
            let input = DVector::from_column_slice(u);
            *cost = self.cost_function.call(&input, model).expect("error");
            Ok(())
        };

        let bounds = constraints::Rectangle::new(Some(&self.bounds.0), Some(&self.bounds.1));
        let problem = Problem::new(&bounds, df, f);

        let mut panoc = PANOCOptimizer::new(problem, &mut panoc_cache);
        if let Some(a) = &parameters.max_time { panoc = panoc.with_max_duration(a.clone()); }
        if let Some(a) = &parameters.max_iterations { panoc = panoc.with_max_iter(a.clone()); }

        let mut u = init_condition.as_slice().to_vec();
        let status = panoc.solve(&mut u)
            .map_err(|e| InvGeomError::new_generic_error_str(&format!("solver failed: {:?}", e), file!(), line!()))?;

        return Ok(OptimizerResult {
            x_min: DVector::from_vec(u),
            cost: status.cost_value(),
            num_iterations: status.iterations(),
            solve_time: start.elapsed(),
            status: map_exit_status(&status.exit_status())
        });
    }
    /// Runs the solver one inner iteration per outer step so the given observer fires with
    /// the candidate configuration after every completed cost evaluation.  The observer is
    /// purely observational: it receives an immutable view and cannot steer the solve.
    pub fn optimize_with_observer(&self, init_condition: &DVector<f64>, model: &dyn KinematicModel, parameters: &OptimizerParameters, observer: &mut dyn IterationObserver) -> Result<OptimizerResult, InvGeomError> {
        self.cost_function.call(init_condition, model)?;
        self.cost_function.gradient(init_condition, model)?;

        let start = Instant::now();
        let max_iterations = match parameters.max_iterations {
            None => { DEFAULT_MAX_ITERATIONS }
            Some(m) => { m }
        };
        let mut panoc_cache = PANOCCache::new(self.problem_size, parameters.tolerance, parameters.lbfgs_memory);

        let mut u = init_condition.as_slice().to_vec();
        let mut out_status = SolveStatus::MaxItersReached;
        let mut out_cost = self.cost_function.call(init_condition, model)?;
        let mut num_iterations = 0;

        for iteration in 0..max_iterations {
            if let Some(max_time) = &parameters.max_time {
                if &start.elapsed() > max_time { break; }
            }

            let df = |u: &[f64], grad: &mut [f64]| -> Result<(), SolverError> {
                let input = DVector::from_column_slice(u);
                let res = self.cost_function.gradient(&input, model).expect("error");
                for (i, v) in res.iter().enumerate() { grad[i] = *v; }
                Ok(())
            };
            let f = |u: &[f64], cost: &mut f64| -> Result<(), SolverError> {
                let input = DVector::from_column_slice(u);
                *cost = self.cost_function.call(&input, model).expect("error");
                Ok(())
            };

            let bounds = constraints::Rectangle::new(Some(&self.bounds.0), Some(&self.bounds.1));
            let problem = Problem::new(&bounds, df, f);
            let mut panoc = PANOCOptimizer::new(problem, &mut panoc_cache).with_max_iter(1);

            let status = panoc.solve(&mut u)
                .map_err(|e| InvGeomError::new_generic_error_str(&format!("solver failed: {:?}", e), file!(), line!()))?;

            out_cost = status.cost_value();
            num_iterations = iteration + 1;
            observer.notify(iteration, &u, out_cost);

            if matches!(status.exit_status(), ExitStatus::Converged) {
                out_status = SolveStatus::Converged;
                break;
            }
        }

        return Ok(OptimizerResult {
            x_min: DVector::from_vec(u),
            cost: out_cost,
            num_iterations,
            solve_time: start.elapsed(),
            status: out_status
        });
    }
}

fn map_exit_status(exit_status: &ExitStatus) -> SolveStatus {
    return match exit_status {
        ExitStatus::Converged => { SolveStatus::Converged }
        ExitStatus::NotConvergedIterations => { SolveStatus::MaxItersReached }
        ExitStatus::NotConvergedOutOfTime => { SolveStatus::MaxItersReached }
    }
}

/// Injected per-iteration observer.  Invoked by the optimization driver after each completed
/// iteration with the current candidate configuration and its cost.  Side effects (logging,
/// animation) belong here and only here; implementations must not attempt to influence the
/// solve.
pub trait IterationObserver {
    fn notify(&mut self, iteration: usize, q: &[f64], cost: f64);
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizerParameters {
    tolerance: f64,
    lbfgs_memory: usize,
    max_iterations: Option<usize>,
    max_time: Option<Duration>
}
impl OptimizerParameters {
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance;
    }
    pub fn set_lbfgs_memory(&mut self, lbfgs_memory: usize) {
        self.lbfgs_memory = lbfgs_memory;
    }
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.max_iterations = Some(max_iterations);
    }
    pub fn set_max_time(&mut self, max_time: Duration) {
        self.max_time = Some(max_time);
    }
}
impl Default for OptimizerParameters {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            lbfgs_memory: 10,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            max_time: None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Converged,
    MaxItersReached
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OptimizerResult {
    x_min: DVector<f64>,
    cost: f64,
    num_iterations: usize,
    solve_time: Duration,
    status: SolveStatus
}
impl OptimizerResult {
    pub fn x_min(&self) -> &DVector<f64> {
        &self.x_min
    }
    pub fn cost(&self) -> f64 {
        self.cost
    }
    pub fn num_iterations(&self) -> usize {
        self.num_iterations
    }
    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }
    pub fn status(&self) -> SolveStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use crate::objective_functions::{FramePositionObjective, WeightedFrameGoalObjective};
    use crate::robot_modules::robot_kinematics_module::RobotKinematicsModule;
    use crate::robot_modules::robot_model_module::{FrameRef, RobotModelModule};
    use crate::utils::utils_robot::frame_specification::{FrameGoal, FrameGoalCollection};
    use crate::utils::utils_se3::se3_pose::SE3Pose;

    /// One revolute joint about z; tool at radius sqrt(0.5^2 + 0.1^2) with a 0.2 z offset,
    /// so the target (0.5, 0.1, 0.2) is exactly reachable.
    fn one_dof_placeholder() -> RobotKinematicsModule {
        let radius = (0.5f64 * 0.5 + 0.1 * 0.1).sqrt();
        let mut model = RobotModelModule::new("one_dof_placeholder");
        model.add_revolute_joint("j0", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
        model.add_frame("tool", 0, SE3Pose::new_from_euler_angles(0., 0., 0., radius, 0., 0.2)).expect("error");
        RobotKinematicsModule::new(model)
    }

    fn one_dof_objective() -> WeightedFrameGoalObjective {
        let mut goals = FrameGoalCollection::new();
        goals.insert_or_replace(FrameGoal::Position {
            frame: FrameRef::Name("tool".to_string()),
            goal: Vector3::new(0.5, 0.1, 0.2),
            weight: None
        });
        WeightedFrameGoalObjective::new(goals).expect("error")
    }

    #[test]
    fn one_dof_placeholder_scenario_converges() {
        let kinematics = one_dof_placeholder();
        let optimizer = NonlinearOptimizer::new(one_dof_objective(), 1);

        let seed = kinematics.robot_joint_state_module().home_configuration().clone();
        let result = optimizer.optimize(&seed, &kinematics, &OptimizerParameters::default()).expect("error");

        assert!(result.cost() < 1e-6, "final cost {} was not below 1e-6", result.cost());
        assert!(result.num_iterations() <= DEFAULT_MAX_ITERATIONS);
        assert_eq!(result.status(), SolveStatus::Converged);
    }

    #[test]
    fn repeated_solves_are_reproducible() {
        let kinematics = one_dof_placeholder();
        let optimizer = NonlinearOptimizer::new(one_dof_objective(), 1);
        let seed = kinematics.robot_joint_state_module().home_configuration().clone();

        let a = optimizer.optimize(&seed, &kinematics, &OptimizerParameters::default()).expect("error");
        let b = optimizer.optimize(&seed, &kinematics, &OptimizerParameters::default()).expect("error");
        assert!((a.cost() - b.cost()).abs() < 1e-12);
    }

    #[test]
    fn unreachable_target_returns_best_effort_result() {
        let kinematics = one_dof_placeholder();
        let objective = FramePositionObjective::new(FrameRef::Name("tool".to_string()), Vector3::new(5.0, 5.0, 5.0));
        let optimizer = NonlinearOptimizer::new(objective, 1);

        let mut parameters = OptimizerParameters::default();
        parameters.set_max_iterations(5);
        let seed = kinematics.robot_joint_state_module().home_configuration().clone();
        let result = optimizer.optimize(&seed, &kinematics, &parameters).expect("error");

        // Non-convergence is not an error; the last iterate comes back as-is.
        assert!(result.cost() > 1.0);
        assert_eq!(result.x_min().len(), 1);
    }

    #[test]
    fn invalid_frame_fault_propagates_from_optimize() {
        let kinematics = one_dof_placeholder();
        let objective = FramePositionObjective::new(FrameRef::Name("no_such_frame".to_string()), Vector3::zeros());
        let optimizer = NonlinearOptimizer::new(objective, 1);
        let seed = kinematics.robot_joint_state_module().home_configuration().clone();
        assert!(optimizer.optimize(&seed, &kinematics, &OptimizerParameters::default()).is_err());
    }

    struct RecordingObserver {
        notifications: Vec<(usize, Vec<f64>, f64)>
    }
    impl IterationObserver for RecordingObserver {
        fn notify(&mut self, iteration: usize, q: &[f64], cost: f64) {
            self.notifications.push((iteration, q.to_vec(), cost));
        }
    }

    #[test]
    fn observer_fires_each_iteration_and_sees_final_cost() {
        let kinematics = one_dof_placeholder();
        let optimizer = NonlinearOptimizer::new(one_dof_objective(), 1);
        let seed = kinematics.robot_joint_state_module().home_configuration().clone();

        let mut observer = RecordingObserver { notifications: vec![] };
        let result = optimizer.optimize_with_observer(&seed, &kinematics, &OptimizerParameters::default(), &mut observer).expect("error");

        assert!(!observer.notifications.is_empty());
        assert_eq!(observer.notifications.len(), result.num_iterations());
        let last = observer.notifications.last().expect("error");
        assert_eq!(last.1.len(), 1);
        assert!((last.2 - result.cost()).abs() < 1e-12);
        assert!(result.cost() < 1e-6);
    }
}
