extern crate invgeom;

use std::time::Duration;
use nalgebra::{DVector, Vector3};
use invgeom::display::{AnimationObserver, ConsoleDisplaySurface};
use invgeom::inverse_geometry::InvGeomSolver;
use invgeom::robot_modules::robot_kinematics_module::RobotKinematicsModule;
use invgeom::robot_modules::robot_model_module::{FrameRef, RobotModelModule};
use invgeom::utils::utils_robot::frame_specification::FrameGoal;
use invgeom::utils::utils_se3::se3_pose::SE3Pose;

/// Six-revolute arm: yaw base, shoulder and elbow about y, three-axis wrist.
fn six_dof_arm() -> RobotKinematicsModule {
    let mut model = RobotModelModule::new("six_dof_arm");
    model.add_revolute_joint("base_yaw", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
    model.add_revolute_joint("shoulder", Vector3::y(), SE3Pose::new_from_euler_angles(0., 0., 0., 0., 0., 0.33), (-3.14, 3.14));
    model.add_revolute_joint("elbow", Vector3::y(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.33, 0., 0.), (-3.14, 3.14));
    model.add_revolute_joint("wrist_roll", Vector3::x(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.26, 0., 0.), (-3.14, 3.14));
    model.add_revolute_joint("wrist_pitch", Vector3::y(), SE3Pose::new_identity(), (-3.14, 3.14));
    model.add_revolute_joint("wrist_yaw", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
    model.add_frame("tool", 5, SE3Pose::new_from_euler_angles(0., 0., 0., 0.08, 0., 0.)).expect("error");
    model.set_home_configuration(DVector::from_vec(vec![0., -1.5, 0., 0., 0., 0.])).expect("error");
    RobotKinematicsModule::new(model)
}

fn main() {
    let kinematics = six_dof_arm();

    let mut solver = InvGeomSolver::new(kinematics.clone());
    solver.frame_goal_collection_mut_ref().insert_or_replace(FrameGoal::Position {
        frame: FrameRef::Name("tool".to_string()),
        goal: Vector3::new(0.5, 0.1, 0.2),
        weight: None
    });

    let mut observer = AnimationObserver::new(&kinematics, Box::new(ConsoleDisplaySurface));
    observer.set_watched_frame(FrameRef::Name("tool".to_string()));
    observer.set_frame_delay(Duration::from_millis(20));

    let solution = solver.solve_with_observer(None, &mut observer).expect("error");
    solution.print_summary();
}
