pub mod net;
pub mod trainer;

use pyo3::{prelude::*, wrap_pymodule};

use crate::data::Entry;

#[pymodule]
fn feedforward(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<net::Net>()?;
    m.add_class::<trainer::Trainer>()?;
    Ok(())
}

pub fn construct_module(m: &PyModule) -> PyResult<()> {
    m.add_wrapped(wrap_pymodule!(feedforward))?;
    Ok(())
}

/// `(pattern, target)` pairs as passed from Python.
pub(super) type Samples = Vec<(Vec<f64>, Vec<f64>)>;

pub(super) fn to_entries(samples: Samples) -> Vec<Entry> {
    samples
        .into_iter()
        .map(|(pattern, target)| Entry::new(pattern, target))
        .collect()
}
