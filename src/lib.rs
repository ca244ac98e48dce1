//! # Introduction
//!
//! Invgeom is an easy to set up and easy to use inverse geometry toolbox.  It solves
//! pose-matching inverse kinematics as numerical optimization: a kinematic model maps a
//! configuration vector to frame poses, a frame goal collection states where those frames
//! should be, and the solver drives a nonlinear optimizer (the PANOC solver from
//! Optimization Engine) to a configuration that matches the goals.
//!
//! Discrepancies between a frame's pose and its goal can be measured three ways: the
//! Euclidean distance between positions, the geodesic distance between full SE(3) poses, and
//! a weighted sum of squared position errors over several frames at once (including the
//! model's center of mass).
//!
//! Progress is observable per iteration: an `IterationObserver` receives every candidate
//! configuration the optimizer produces, and the bundled `AnimationObserver` replays them on
//! a display surface with a configurable delay so a solve reads as a motion.
//!
//! # Example
//!
//! ```
//! use invgeom::inverse_geometry::InvGeomSolver;
//! use invgeom::robot_modules::robot_kinematics_module::RobotKinematicsModule;
//! use invgeom::robot_modules::robot_model_module::{FrameRef, RobotModelModule};
//! use invgeom::utils::utils_robot::frame_specification::FrameGoal;
//! use invgeom::utils::utils_se3::se3_pose::SE3Pose;
//! use nalgebra::Vector3;
//!
//! let mut model = RobotModelModule::new("planar_2r");
//! model.add_revolute_joint("j0", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
//! model.add_revolute_joint("j1", Vector3::z(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.3, 0., 0.), (-3.14, 3.14));
//! model.add_frame("ee", 1, SE3Pose::new_from_euler_angles(0., 0., 0., 0.25, 0., 0.)).expect("error");
//!
//! let mut solver = InvGeomSolver::new(RobotKinematicsModule::new(model));
//! solver.frame_goal_collection_mut_ref().insert_or_replace(FrameGoal::Position {
//!     frame: FrameRef::Name("ee".to_string()),
//!     goal: Vector3::new(0.4, 0.1, 0.0),
//!     weight: None
//! });
//!
//! let solution = solver.solve(None).expect("solve failed");
//! solution.print_summary();
//! ```

pub mod display;
pub mod inverse_geometry;
pub mod objective_functions;
pub mod optimization;
pub mod robot_modules;
pub mod utils;
