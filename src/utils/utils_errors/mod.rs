/// A common error type returned by functions throughout the toolbox.
#[derive(Clone, Debug)]
pub enum InvGeomError {
    GenericError(String),
    IdxOutOfBoundError(String),
    FrameNotFoundError(String),
    JointStateVecWrongSizeError(String)
}
impl InvGeomError {
    pub fn new_generic_error_str(s: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: {} -- File: {}, Line: {}", s, file, line);
        return Self::GenericError(s);
    }
    pub fn new_idx_out_of_bound_error(given_idx: usize, length_of_array: usize, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Index {:?} is too large for the array of length {:?} -- File: {}, Line: {}", given_idx, length_of_array, file, line);
        return Self::IdxOutOfBoundError(s);
    }
    pub fn new_frame_not_found_error(frame_name: &str, robot_name: &str, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Frame {:?} was not found on robot {:?} -- File: {}, Line: {}", frame_name, robot_name, file, line);
        return Self::FrameNotFoundError(s);
    }
    pub fn new_joint_state_vec_wrong_size_error(function_name: &str, given_size: usize, expected_size: usize, file: &str, line: u32) -> Self {
        let s = format!("ERROR: Joint state vector of size {:?} given to function {} (expected size {:?}) -- File: {}, Line: {}", given_size, function_name, expected_size, file, line);
        return Self::JointStateVecWrongSizeError(s);
    }
}
