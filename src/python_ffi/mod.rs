//! Python bindings: `bpnnet.feedforward.Net` and `bpnnet.feedforward.Trainer`.
use pyo3::prelude::*;

pub mod feedforward;
mod gen_macros;

#[pymodule]
fn bpnnet(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    feedforward::construct_module(m)?;
    Ok(())
}
