//! Single-hidden-layer perceptron trained by backpropagation, with curriculum-style
//! partitioning of the training data across successive training runs.

pub mod config;
pub mod data;
pub mod feedforward;
pub mod session;

#[cfg(feature = "python")]
pub mod python_ffi;
