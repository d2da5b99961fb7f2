//! Single-hidden-layer feedforward neural network with backpropagation-based gradient descent
//! training

mod net;
mod trainer;
mod training_log;

pub use net::*;
pub use trainer::*;
pub use training_log::*;
