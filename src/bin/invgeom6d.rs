extern crate invgeom;

use nalgebra::{DVector, Vector3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use invgeom::inverse_geometry::InvGeomSolver;
use invgeom::robot_modules::robot_kinematics_module::RobotKinematicsModule;
use invgeom::robot_modules::robot_model_module::{FrameRef, RobotModelModule};
use invgeom::utils::utils_robot::frame_specification::{FrameGoal, FrameGoalAllowableError};
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

    // a full pose goal, taken from a known reachable configuration
    let q_goal = DVector::from_vec(vec![0.6, -1.0, 1.2, 0.4, 0.5, -0.3]);
    let goal = kinematics.frame_pose(&q_goal, &FrameRef::Name("tool".to_string())).expect("error");

    let mut solver = InvGeomSolver::new(kinematics);
    solver.frame_goal_collection_mut_ref().insert_or_replace(FrameGoal::SE3Pose {
        frame: FrameRef::Name("tool".to_string()),
        goal,
        weight: None
    });

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let outcome = solver.solve_with_retries(&FrameGoalAllowableError::default(), 20, None, &mut rng).expect("error");
    match outcome {
        None => { println!("no solution found within the allotted tries"); }
        Some(solution) => {
            solution.print_summary();
            let reports = solver.compute_frame_goal_error_reports(solution.joint_state()).expect("error");
            for report in reports.reports() {
                println!("{:?}: translation error {:.6}, rotation error {:.6}", report.frame(), report.translation_error(), report.rotation_error());
            }
        }
    }
}
