pub mod se3_pose;
