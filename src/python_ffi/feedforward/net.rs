use pyo3::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

use super::trainer::{ConsumableTrainer, Trainer};
use super::{to_entries, Samples};
use crate::feedforward::{
    Discrete, Network, NewNetError, ProcessError, SizeMismatch, Topology, WeightsError,
};
use crate::{Impl_to_PyErr, MakeConsumable};

MakeConsumable!(ConsumableNet, Network, Net);

/// `Discrete` as seen from Python: 0, 1, or `None` when undecided.
pub(super) fn discrete_to_py(value: Discrete) -> Option<u8> {
    match value {
        Discrete::Zero => Some(0),
        Discrete::One => Some(1),
        Discrete::Undecided => None,
    }
}

pub(super) fn topology_to_py(topology: Topology) -> (usize, usize, usize) {
    (topology.inputs, topology.hidden, topology.outputs)
}

#[pyclass]
pub struct Net {
    pub(super) net: ConsumableNet,
}

#[pymethods]
impl Net {
    /// Random weights (seeded if `seed` is given) unless `weights` are provided.
    #[new]
    pub fn new(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        seed: Option<u64>,
        weights: Option<Vec<f64>>,
    ) -> Result<Self, NewNetError> {
        let topology = Topology::new(inputs, hidden, outputs);
        let net = match weights {
            Some(weights) => Network::from_weights(topology, &weights)?,
            None => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                Network::new(topology, &mut rng)?
            }
        };

        Ok(Self {
            net: ConsumableNet::acquire(net),
        })
    }

    pub fn topology(&self) -> PyResult<(usize, usize, usize)> {
        Ok(topology_to_py(self.net.get_ref()?.topology()))
    }

    pub fn export(&self) -> PyResult<((usize, usize, usize), Vec<f64>)> {
        let (topology, weights) = self.net.get_ref()?.export();
        Ok((topology_to_py(topology), weights.to_owned()))
    }

    pub fn forward(&mut self, pattern: Vec<f64>) -> PyResult<Vec<f64>> {
        let outputs = self.net.get_ref_mut()?.forward(&pattern)?;
        Ok(outputs.to_vec())
    }

    pub fn classify(&mut self, pattern: Vec<f64>) -> PyResult<Vec<Option<u8>>> {
        let classes = self.net.get_ref_mut()?.classify(&pattern)?;
        Ok(classes.into_iter().map(discrete_to_py).collect())
    }

    pub fn accuracy(&mut self, samples: Samples) -> PyResult<f64> {
        Ok(self.net.get_ref_mut()?.accuracy(&to_entries(samples))?)
    }

    pub fn mse(&mut self, samples: Samples) -> PyResult<f64> {
        Ok(self.net.get_ref_mut()?.mse(&to_entries(samples))?)
    }

    pub fn load_weights(&mut self, path: String) -> PyResult<()> {
        Ok(self.net.get_ref_mut()?.load_weights(path)?)
    }

    pub fn save_weights(&self, path: String) -> PyResult<()> {
        Ok(self.net.get_ref()?.save_weights(path)?)
    }

    /// Moves the network into a new `Trainer`, this object becomes unusable.
    pub fn build_trainer(&mut self) -> PyResult<Trainer> {
        Ok(Trainer {
            trainer: ConsumableTrainer::acquire(self.net.release()?.build_trainer()),
        })
    }

    #[staticmethod]
    pub fn calc_cost(outputs: Vec<f64>, desired_outputs: Vec<f64>) -> Result<f64, SizeMismatch> {
        Network::calc_cost(&outputs, &desired_outputs)
    }
}

Impl_to_PyErr!(for NewNetError, ProcessError, SizeMismatch, WeightsError);
