pub mod finite_difference;
