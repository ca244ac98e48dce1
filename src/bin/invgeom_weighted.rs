extern crate invgeom;

use nalgebra::{DVector, Vector3};
use invgeom::inverse_geometry::InvGeomSolver;
use invgeom::robot_modules::robot_kinematics_module::RobotKinematicsModule;
use invgeom::robot_modules::robot_model_module::{FrameRef, RobotModelModule};
use invgeom::utils::utils_robot::frame_specification::FrameGoal;
use invgeom::utils::utils_se3::se3_pose::SE3Pose;

/// Six-revolute arm with link masses, so the center of mass is a usable goal frame.
fn six_dof_arm_with_masses() -> RobotKinematicsModule {
    let mut model = RobotModelModule::new("six_dof_arm");
    model.add_revolute_joint("base_yaw", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
    model.add_revolute_joint("shoulder", Vector3::y(), SE3Pose::new_from_euler_angles(0., 0., 0., 0., 0., 0.33), (-3.14, 3.14));
    model.add_revolute_joint("elbow", Vector3::y(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.33, 0., 0.), (-3.14, 3.14));
    model.add_revolute_joint("wrist_roll", Vector3::x(), SE3Pose::new_from_euler_angles(0., 0., 0., 0.26, 0., 0.), (-3.14, 3.14));
    model.add_revolute_joint("wrist_pitch", Vector3::y(), SE3Pose::new_identity(), (-3.14, 3.14));
    model.add_revolute_joint("wrist_yaw", Vector3::z(), SE3Pose::new_identity(), (-3.14, 3.14));
    model.add_frame("elbow_frame", 2, SE3Pose::new_identity()).expect("error");
    model.add_frame("tool", 5, SE3Pose::new_from_euler_angles(0., 0., 0., 0.08, 0., 0.)).expect("error");
    model.set_link_mass_properties(1, 2.0, Vector3::new(0.165, 0., 0.)).expect("error");
    model.set_link_mass_properties(2, 1.5, Vector3::new(0.13, 0., 0.)).expect("error");
    model.set_link_mass_properties(3, 0.5, Vector3::new(0.04, 0., 0.)).expect("error");
    model.set_home_configuration(DVector::from_vec(vec![0., -1.5, 0., 0., 0., 0.])).expect("error");
    RobotKinematicsModule::new(model)
}

fn main() {
    let mut solver = InvGeomSolver::new(six_dof_arm_with_masses());

    // the tool goal dominates; the elbow and center-of-mass goals shape the posture
    solver.frame_goal_collection_mut_ref().insert_or_replace(FrameGoal::Position {
        frame: FrameRef::Name("tool".to_string()),
        goal: Vector3::new(0.5, 0.1, 0.2),
        weight: Some(10.0)
    });
    solver.frame_goal_collection_mut_ref().insert_or_replace(FrameGoal::Position {
        frame: FrameRef::Name("elbow_frame".to_string()),
        goal: Vector3::new(0.2, 0.0, 0.4),
        weight: Some(1.0)
    });
    solver.frame_goal_collection_mut_ref().insert_or_replace(FrameGoal::Position {
        frame: FrameRef::CenterOfMass,
        goal: Vector3::new(0.2, 0.05, 0.35),
        weight: Some(0.5)
    });

    let solution = solver.solve(None).expect("error");
    solution.print_summary();

    let reports = solver.compute_frame_goal_error_reports(solution.joint_state()).expect("error");
    for report in reports.reports() {
        println!("{:?}: translation error {:.6}", report.frame(), report.translation_error());
    }
}
