use pyo3::prelude::*;
use std::num::NonZeroUsize;

use super::net::{discrete_to_py, topology_to_py, ConsumableNet, Net};
use super::{to_entries, Samples};
use crate::data::TrainingSet;
use crate::feedforward::{SetStats, Termination, TrainError, Trainer as InnerTrainer};
use crate::{Impl_to_PyErr, MakeConsumable};

MakeConsumable!(ConsumableTrainer, InnerTrainer, Trainer);

type PyStats = (f64, f64);

fn stats_to_py(stats: SetStats) -> PyStats {
    (stats.accuracy, stats.mse)
}

#[pyclass]
pub struct Trainer {
    pub(super) trainer: ConsumableTrainer,
}

#[pymethods]
impl Trainer {
    pub fn topology(&self) -> PyResult<(usize, usize, usize)> {
        Ok(topology_to_py(self.trainer.get_ref()?.net_ref().topology()))
    }

    pub fn export_net(&self) -> PyResult<((usize, usize, usize), Vec<f64>)> {
        let (topology, weights) = self.trainer.get_ref()?.net_ref().export();
        Ok((topology_to_py(topology), weights.to_owned()))
    }

    pub fn forward(&mut self, pattern: Vec<f64>) -> PyResult<Vec<f64>> {
        let outputs = self.trainer.get_ref_mut()?.net_mut().forward(&pattern)?;
        Ok(outputs.to_vec())
    }

    pub fn classify(&mut self, pattern: Vec<f64>) -> PyResult<Vec<Option<u8>>> {
        let classes = self.trainer.get_ref_mut()?.net_mut().classify(&pattern)?;
        Ok(classes.into_iter().map(discrete_to_py).collect())
    }

    pub fn set_training_parameters(
        &mut self,
        learning_rate: f64,
        momentum: f64,
        use_batch: bool,
    ) -> PyResult<()> {
        self.trainer
            .get_ref_mut()?
            .set_training_parameters(learning_rate, momentum, use_batch);
        Ok(())
    }

    pub fn set_stopping_conditions(
        &mut self,
        max_epochs: usize,
        desired_accuracy: f64,
    ) -> PyResult<()> {
        self.trainer
            .get_ref_mut()?
            .set_stopping_conditions(max_epochs, desired_accuracy);
        Ok(())
    }

    pub fn enable_logging(&mut self, path: String, resolution: usize) -> PyResult<()> {
        let resolution = NonZeroUsize::new(resolution).ok_or_else(|| {
            pyo3::exceptions::PyValueError::new_err("Log resolution must be positive!")
        })?;
        self.trainer
            .get_ref_mut()?
            .enable_logging(path, resolution)
            .map_err(TrainError::Log)?;
        Ok(())
    }

    pub fn disable_logging(&mut self) -> PyResult<()> {
        self.trainer.get_ref_mut()?.disable_logging();
        Ok(())
    }

    /// Trains until convergence or the epochs limit.
    ///
    /// # Returns
    /// `(epochs, converged, training, generalization, validation)`, each set's stats being
    /// an `(accuracy, mse)` pair.
    pub fn train_run(
        &mut self,
        training: Samples,
        generalization: Samples,
        validation: Samples,
    ) -> PyResult<(usize, bool, PyStats, PyStats, PyStats)> {
        let (training, generalization, validation) = (
            to_entries(training),
            to_entries(generalization),
            to_entries(validation),
        );
        let set = TrainingSet {
            training: &training,
            generalization: &generalization,
            validation: &validation,
        };

        let report = self.trainer.get_ref_mut()?.train_run(&set)?;
        Ok((
            report.epochs,
            report.termination == Termination::Converged,
            stats_to_py(report.training),
            stats_to_py(report.generalization),
            stats_to_py(report.validation),
        ))
    }

    /// Gives the network back as a `Net`, this object becomes unusable.
    pub fn teardown(&mut self) -> PyResult<Net> {
        Ok(Net {
            net: ConsumableNet::acquire(self.trainer.release()?.teardown()),
        })
    }
}

Impl_to_PyErr!(for TrainError);
