use std::time::Duration;
use nalgebra::DVector;
use crate::optimization::IterationObserver;
use crate::robot_modules::KinematicModel;
use crate::robot_modules::robot_model_module::FrameRef;
use crate::utils::utils_console::{invgeom_print, PrintColor, PrintMode};
use crate::utils::utils_se3::se3_pose::SE3Pose;

/// Where intermediate configurations get shown during an animated solve.  A surface is a
/// pure sink; the solver never reads from it.
pub trait DisplaySurface {
    fn display_configuration(&mut self, joint_state: &[f64]);
    fn place_marker(&mut self, name: &str, pose: &SE3Pose);
}

/// Prints each configuration (and any markers) to the console.
pub struct ConsoleDisplaySurface;
impl DisplaySurface for ConsoleDisplaySurface {
    fn display_configuration(&mut self, joint_state: &[f64]) {
        let formatted: Vec<String> = joint_state.iter().map(|x| format!("{:.4}", x)).collect();
        invgeom_print(&format!("q: [ {} ]", formatted.join(", ")), PrintMode::Println, PrintColor::Cyan, false);
    }
    fn place_marker(&mut self, name: &str, pose: &SE3Pose) {
        let t = pose.translation();
        invgeom_print(&format!("marker {}: [ {:.4}, {:.4}, {:.4} ]", name, t[0], t[1], t[2]), PrintMode::Println, PrintColor::Magenta, false);
    }
}

/// Swallows everything.  Useful when an observer is wanted for its timing side effects only,
/// or in tests.
pub struct NullDisplaySurface;
impl DisplaySurface for NullDisplaySurface {
    fn display_configuration(&mut self, _joint_state: &[f64]) { }
    fn place_marker(&mut self, _name: &str, _pose: &SE3Pose) { }
}

/// Forwards every optimizer iteration to a display surface, optionally re-placing a marker
/// at a watched frame's current pose, then sleeps so the sequence of candidate
/// configurations reads as a motion on screen.
pub struct AnimationObserver<'a> {
    model: &'a dyn KinematicModel,
    surface: Box<dyn DisplaySurface>,
    watched_frame: Option<FrameRef>,
    frame_delay: Duration
}
impl<'a> AnimationObserver<'a> {
    pub fn new(model: &'a dyn KinematicModel, surface: Box<dyn DisplaySurface>) -> Self {
        Self {
            model,
            surface,
            watched_frame: None,
            frame_delay: Duration::from_millis(100)
        }
    }
    pub fn set_watched_frame(&mut self, frame: FrameRef) {
        self.watched_frame = Some(frame);
    }
    pub fn set_frame_delay(&mut self, frame_delay: Duration) {
        self.frame_delay = frame_delay;
    }
}
impl<'a> IterationObserver for AnimationObserver<'a> {
    fn notify(&mut self, iteration: usize, q: &[f64], cost: f64) {
        invgeom_print(&format!("iteration {} | cost {:.8}", iteration, cost), PrintMode::Println, PrintColor::Blue, true);
        self.surface.display_configuration(q);
        if let Some(frame) = &self.watched_frame {
            let joint_state = DVector::from_column_slice(q);
            match self.model.frame_pose(&joint_state, frame) {
                Ok(pose) => { self.surface.place_marker("watched_frame", &pose); }
                Err(_) => {
                    invgeom_print(&format!("WARNING: could not compute a pose for watched frame {:?}; no marker placed.", frame), PrintMode::Println, PrintColor::Yellow, true);
                }
            }
        }
        if !self.frame_delay.is_zero() { std::thread::sleep(self.frame_delay); }
    }
}
