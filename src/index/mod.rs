pub mod inverted;
pub mod posting;
