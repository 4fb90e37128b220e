//! Small shared helpers.

pub mod random;

pub use random::uniform_random_tensor;
