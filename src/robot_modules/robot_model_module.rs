use nalgebra::{DVector, Unit, Vector3};
use serde::{Serialize, Deserialize};
use crate::utils::utils_errors::InvGeomError;
use crate::utils::utils_console::{invgeom_print, invgeom_print_new_line, PrintColor, PrintMode};
use crate::utils::utils_se3::se3_pose::SE3Pose;

/// A single joint axis can characterize either a rotation around the axis or a translation
/// along it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum JointAxisPrimitiveType {
    Rotation,
    Translation
}

/// One joint in a serial kinematic chain.  Each joint contributes exactly one degree of
/// freedom; the joint frame is reached by applying `origin_offset_pose` in the preceding
/// joint's frame and then the variable motion around or along `axis`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainJoint {
    name: String,
    joint_idx: usize,
    axis: Vector3<f64>,
    axis_primitive_type: JointAxisPrimitiveType,
    origin_offset_pose: SE3Pose,
    bounds: (f64, f64)
}
impl ChainJoint {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn joint_idx(&self) -> usize {
        self.joint_idx
    }
    pub fn axis(&self) -> &Vector3<f64> {
        &self.axis
    }
    pub fn axis_as_unit(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.axis)
    }
    pub fn axis_primitive_type(&self) -> &JointAxisPrimitiveType {
        &self.axis_primitive_type
    }
    pub fn origin_offset_pose(&self) -> &SE3Pose {
        &self.origin_offset_pose
    }
    pub fn bounds(&self) -> (f64, f64) {
        self.bounds
    }
}

/// A named operational frame rigidly attached to a joint frame (e.g., "tool" or "right_hand").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelFrame {
    name: String,
    frame_idx: usize,
    parent_joint_idx: usize,
    local_offset_pose: SE3Pose
}
impl ModelFrame {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn frame_idx(&self) -> usize {
        self.frame_idx
    }
    pub fn parent_joint_idx(&self) -> usize {
        self.parent_joint_idx
    }
    pub fn local_offset_pose(&self) -> &SE3Pose {
        &self.local_offset_pose
    }
}

/// Mass and local center of mass of the link carried by a joint.  Only needed when the
/// center-of-mass frame is used as an optimization target.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkMassProperties {
    mass: f64,
    local_com: Vector3<f64>
}
impl LinkMassProperties {
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn local_com(&self) -> &Vector3<f64> {
        &self.local_com
    }
}

/// Identifies a frame on a model: a named operational frame, a frame by index, or the whole
/// model's center of mass.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FrameRef {
    Name(String),
    Idx(usize),
    CenterOfMass
}

/// A programmatic description of a serial-chain robot model: ordered joints, named
/// operational frames, and optional per-link mass properties.  Robot-description file
/// parsing is out of scope for this toolbox; models are built directly through this module.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RobotModelModule {
    robot_name: String,
    joints: Vec<ChainJoint>,
    frames: Vec<ModelFrame>,
    link_mass_properties: Vec<Option<LinkMassProperties>>,
    home_configuration: DVector<f64>
}
impl RobotModelModule {
    pub fn new(robot_name: &str) -> Self {
        Self {
            robot_name: robot_name.to_string(),
            joints: vec![],
            frames: vec![],
            link_mass_properties: vec![],
            home_configuration: DVector::zeros(0)
        }
    }
    pub fn add_revolute_joint(&mut self, name: &str, axis: Vector3<f64>, origin_offset_pose: SE3Pose, bounds: (f64, f64)) -> usize {
        return self.add_joint(name, axis, JointAxisPrimitiveType::Rotation, origin_offset_pose, bounds);
    }
    pub fn add_prismatic_joint(&mut self, name: &str, axis: Vector3<f64>, origin_offset_pose: SE3Pose, bounds: (f64, f64)) -> usize {
        return self.add_joint(name, axis, JointAxisPrimitiveType::Translation, origin_offset_pose, bounds);
    }
    fn add_joint(&mut self, name: &str, axis: Vector3<f64>, axis_primitive_type: JointAxisPrimitiveType, origin_offset_pose: SE3Pose, bounds: (f64, f64)) -> usize {
        let joint_idx = self.joints.len();
        self.joints.push(ChainJoint {
            name: name.to_string(),
            joint_idx,
            axis,
            axis_primitive_type,
            origin_offset_pose,
            bounds
        });
        self.link_mass_properties.push(None);
        self.home_configuration = DVector::zeros(self.joints.len());
        return joint_idx;
    }
    /// Attaches a named operational frame to the given joint frame.  Frame names must
    /// be unique on a model.
    pub fn add_frame(&mut self, name: &str, parent_joint_idx: usize, local_offset_pose: SE3Pose) -> Result<usize, InvGeomError> {
        if parent_joint_idx >= self.joints.len() {
            return Err(InvGeomError::new_idx_out_of_bound_error(parent_joint_idx, self.joints.len(), file!(), line!()));
        }
        if self.frames.iter().any(|f| f.name == name) {
            return Err(InvGeomError::new_generic_error_str(&format!("frame with name {:?} already exists on robot {:?}.", name, self.robot_name), file!(), line!()));
        }
        let frame_idx = self.frames.len();
        self.frames.push(ModelFrame {
            name: name.to_string(),
            frame_idx,
            parent_joint_idx,
            local_offset_pose
        });
        return Ok(frame_idx);
    }
    pub fn set_link_mass_properties(&mut self, joint_idx: usize, mass: f64, local_com: Vector3<f64>) -> Result<(), InvGeomError> {
        if joint_idx >= self.joints.len() {
            return Err(InvGeomError::new_idx_out_of_bound_error(joint_idx, self.joints.len(), file!(), line!()));
        }
        self.link_mass_properties[joint_idx] = Some(LinkMassProperties { mass, local_com });
        Ok(())
    }
    pub fn set_home_configuration(&mut self, home_configuration: DVector<f64>) -> Result<(), InvGeomError> {
        if home_configuration.len() != self.joints.len() {
            return Err(InvGeomError::new_joint_state_vec_wrong_size_error("set_home_configuration", home_configuration.len(), self.joints.len(), file!(), line!()));
        }
        self.home_configuration = home_configuration;
        Ok(())
    }
    pub fn robot_name(&self) -> &str {
        &self.robot_name
    }
    pub fn joints(&self) -> &Vec<ChainJoint> {
        &self.joints
    }
    pub fn frames(&self) -> &Vec<ModelFrame> {
        &self.frames
    }
    pub fn link_mass_properties(&self) -> &Vec<Option<LinkMassProperties>> {
        &self.link_mass_properties
    }
    pub fn num_dofs(&self) -> usize {
        self.joints.len()
    }
    pub fn home_configuration(&self) -> &DVector<f64> {
        &self.home_configuration
    }
    pub fn joint_bounds(&self) -> Vec<(f64, f64)> {
        return self.joints.iter().map(|j| j.bounds).collect();
    }
    pub fn get_joint_by_idx(&self, joint_idx: usize) -> Result<&ChainJoint, InvGeomError> {
        if joint_idx >= self.joints.len() {
            return Err(InvGeomError::new_idx_out_of_bound_error(joint_idx, self.joints.len(), file!(), line!()));
        }
        return Ok(&self.joints[joint_idx]);
    }
    pub fn get_frame_by_idx(&self, frame_idx: usize) -> Result<&ModelFrame, InvGeomError> {
        if frame_idx >= self.frames.len() {
            return Err(InvGeomError::new_idx_out_of_bound_error(frame_idx, self.frames.len(), file!(), line!()));
        }
        return Ok(&self.frames[frame_idx]);
    }
    pub fn get_frame_idx_by_name(&self, name: &str) -> Result<usize, InvGeomError> {
        for frame in &self.frames {
            if frame.name == name { return Ok(frame.frame_idx); }
        }
        return Err(InvGeomError::new_frame_not_found_error(name, &self.robot_name, file!(), line!()));
    }
    pub fn print_summary(&self) {
        invgeom_print(&format!("robot model {} ", self.robot_name), PrintMode::Print, PrintColor::Blue, true);
        invgeom_print(&format!("({} dofs, {} frames)", self.num_dofs(), self.frames.len()), PrintMode::Print, PrintColor::None, false);
        invgeom_print_new_line();
        for joint in &self.joints {
            invgeom_print(&format!("  joint {} ({}) ---> ", joint.joint_idx, joint.name), PrintMode::Print, PrintColor::Blue, false);
            invgeom_print(&format!("{:?} about {:?}", joint.axis_primitive_type, joint.axis.as_slice()), PrintMode::Print, PrintColor::None, false);
            invgeom_print_new_line();
        }
        for frame in &self.frames {
            invgeom_print(&format!("  frame {} ({}) on joint {}", frame.frame_idx, frame.name, frame.parent_joint_idx), PrintMode::Println, PrintColor::Cyan, false);
        }
    }
}
