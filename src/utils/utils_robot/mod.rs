pub mod frame_specification;
