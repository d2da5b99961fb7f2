use log::{debug, info};
use std::{error::Error, fmt, io, num::NonZeroUsize, path::Path};

use super::net::{Network, ProcessError, SizeMismatch, Topology};
use super::training_log::{EpochRecord, TrainingLog};
use crate::data::{Entry, TrainingSet};

pub const LEARNING_RATE: f64 = 0.001;
pub const MOMENTUM: f64 = 0.9;
pub const MAX_EPOCHS: usize = 1500;
pub const DESIRED_ACCURACY: f64 = 90.0;

/// Accuracy (percent) and mean squared error of a network over one set.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SetStats {
    pub accuracy: f64,
    pub mse: f64,
}

/// Why a training run stopped. Neither is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Training and generalization accuracy both reached the desired accuracy.
    Converged,
    MaxEpochsReached,
}

/// Outcome of `Trainer::train_run`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Epochs run.
    pub epochs: usize,
    pub termination: Termination,
    pub training: SetStats,
    pub generalization: SetStats,
    pub validation: SetStats,
}

/// Net trainer structure.
///
/// Gradient descent with momentum and optional batch learning. Training procedure looks
/// like this:
/// * One allocates training buffers by calling `Network::build_trainer`, which consumes the
/// `Network` and returns `Trainer` object.
/// (Consuming `Network` prevents one from building another concurrent `Trainer`.)
/// * Parameters and stopping conditions are set with `Trainer::set_training_parameters` and
/// `Trainer::set_stopping_conditions`, logging to a csv file with `Trainer::enable_logging`.
/// * Each call of `Trainer::train_run` trains on one `TrainingSet` until the desired accuracy
/// or the epochs limit is reached. Weights carry over from run to run.
/// * Once finished training, `Trainer::teardown` frees the training buffers and gives the
/// `Network` back.
pub struct Trainer {
    /// The network object trainer posesses.
    pub(crate) net: Network,

    learning_rate: f64,
    momentum: f64,
    use_batch: bool,

    max_epochs: usize,
    desired_accuracy: f64,

    epoch: usize,

    /// Buffer with equivalent structure and size as `Network::coeffs`, holding weight changes.
    /// * Online learning: the change applied after the last entry (needed for momentum).
    /// * Batch learning: changes accumulated over the epoch, zeroed once applied.
    pub(crate) delta_buffer: Box<[f64]>,

    /// Error gradients of hidden neurons (bias neuron excluded).
    hidden_gradients: Box<[f64]>,

    /// Error gradients of output neurons.
    output_gradients: Box<[f64]>,

    training: SetStats,
    generalization: SetStats,
    validation: SetStats,

    log: Option<TrainingLog>,
}

impl Trainer {
    /// Consumes `Network` and builds `Trainer` object containing it.
    pub(super) fn build(net: Network) -> Trainer {
        let Topology {
            hidden, outputs, ..
        } = net.topology;

        Trainer {
            delta_buffer: vec![0.0; net.coeffs.len()].into_boxed_slice(),
            hidden_gradients: vec![0.0; hidden].into_boxed_slice(),
            output_gradients: vec![0.0; outputs].into_boxed_slice(),
            net,
            learning_rate: LEARNING_RATE,
            momentum: MOMENTUM,
            use_batch: false,
            max_epochs: MAX_EPOCHS,
            desired_accuracy: DESIRED_ACCURACY,
            epoch: 0,
            training: SetStats::default(),
            generalization: SetStats::default(),
            validation: SetStats::default(),
            log: None,
        }
    }

    /// Returns reference to contained `Network`.
    pub fn net_ref(&self) -> &Network {
        &self.net
    }

    /// Returns mutable reference to contained `Network`, allowing the use of
    /// `Network::forward`.
    pub fn net_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    /// Sets learning rate, momentum (ignored by batch learning) and update mode.
    /// Switching the update mode clears pending weight changes; weights are never touched.
    pub fn set_training_parameters(&mut self, learning_rate: f64, momentum: f64, use_batch: bool) {
        if use_batch != self.use_batch {
            self.delta_buffer.iter_mut().for_each(|d| *d = 0.0);
        }
        self.learning_rate = learning_rate;
        self.momentum = momentum;
        self.use_batch = use_batch;
    }

    /// Sets the epochs limit and the accuracy (percent) both training and generalization
    /// sets have to reach to stop early.
    pub fn set_stopping_conditions(&mut self, max_epochs: usize, desired_accuracy: f64) {
        self.max_epochs = max_epochs;
        self.desired_accuracy = desired_accuracy;
    }

    /// Logs training progress to a csv file every `resolution` epochs, replacing any
    /// previous log.
    pub fn enable_logging<P: AsRef<Path>>(
        &mut self,
        path: P,
        resolution: NonZeroUsize,
    ) -> Result<(), csv::Error> {
        self.log = Some(TrainingLog::create(path, resolution)?);
        Ok(())
    }

    /// Same as `Trainer::enable_logging`, writing to any sink.
    pub fn enable_logging_to<W: io::Write + Send + 'static>(
        &mut self,
        sink: W,
        resolution: NonZeroUsize,
    ) -> Result<(), csv::Error> {
        self.log = Some(TrainingLog::from_writer(sink, resolution)?);
        Ok(())
    }

    /// Stops logging, returning the log if there was one.
    pub fn disable_logging(&mut self) -> Option<TrainingLog> {
        self.log.take()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn use_batch(&self) -> bool {
        self.use_batch
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    pub fn desired_accuracy(&self) -> f64 {
        self.desired_accuracy
    }

    /// Epochs run so far by the current (or last) training run.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    fn accuracy_reached(&self) -> bool {
        self.training.accuracy >= self.desired_accuracy
            && self.generalization.accuracy >= self.desired_accuracy
    }

    fn epoch_record(&self) -> EpochRecord {
        EpochRecord {
            epoch: self.epoch,
            training_accuracy: self.training.accuracy,
            generalization_accuracy: self.generalization.accuracy,
            training_mse: self.training.mse,
            generalization_mse: self.generalization.mse,
        }
    }

    fn score(&mut self, set: &[Entry]) -> Result<SetStats, ProcessError> {
        Ok(SetStats {
            accuracy: self.net.accuracy(set)?,
            mse: self.net.mse(set)?,
        })
    }

    /// Trains the network on `set.training` until both training and generalization accuracy
    /// reach the desired accuracy, or the epochs limit is hit; then scores `set.validation`.
    ///
    /// Only the epoch counter restarts. Accuracies carry over from the previous run, so a run
    /// following a converged one trains no epoch and only scores `set.validation`.
    ///
    /// # Returns
    /// * `Ok(RunReport)` however the run ended;
    /// * `Err(TrainError)` if an entry doesn't fit the network or the log can't be written.
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::data::{Entry, TrainingSet};
    /// # use bpnnet::feedforward::{Network, Topology};
    /// # use rand::{rngs::StdRng, SeedableRng};
    /// let entries = [
    ///     Entry::new(vec![0.0, 0.0], vec![0.0]),
    ///     Entry::new(vec![0.0, 1.0], vec![0.0]),
    ///     Entry::new(vec![1.0, 0.0], vec![0.0]),
    ///     Entry::new(vec![1.0, 1.0], vec![1.0]),
    /// ];
    /// let set = TrainingSet { training: &entries, generalization: &entries, validation: &entries };
    ///
    /// let net = Network::new(Topology::new(2, 3, 1), &mut StdRng::seed_from_u64(0)).unwrap();
    /// let mut trainer = net.build_trainer();
    /// trainer.set_stopping_conditions(10, 100.0);
    /// let report = trainer.train_run(&set).unwrap();
    /// assert!(report.epochs <= 10);
    /// ```
    pub fn train_run(&mut self, set: &TrainingSet<'_>) -> Result<RunReport, TrainError> {
        info!(
            "training started: lr {}, momentum {}, {} learning, max epochs {}, {}, \
            {} training / {} generalization / {} validation entries",
            self.learning_rate,
            self.momentum,
            if self.use_batch { "batch" } else { "online" },
            self.max_epochs,
            self.net.topology,
            set.training.len(),
            set.generalization.len(),
            set.validation.len(),
        );

        self.epoch = 0;

        while !self.accuracy_reached() && self.epoch < self.max_epochs {
            let previous_training = self.training.accuracy;
            let previous_generalization = self.generalization.accuracy;

            self.run_epoch(set.training)?;

            self.training = self.score(set.training)?;
            self.generalization = self.score(set.generalization)?;

            let record = self.epoch_record();
            if let Some(log) = &mut self.log {
                if log.is_due(self.epoch) {
                    log.record(&record)?;
                }
            }

            // Report only changes of at least a percent
            if previous_training.ceil() != self.training.accuracy.ceil()
                || previous_generalization.ceil() != self.generalization.accuracy.ceil()
            {
                debug!(
                    "epoch {}: training accuracy {}%, MSE {}; generalization accuracy {}%, MSE {}",
                    self.epoch,
                    self.training.accuracy,
                    self.training.mse,
                    self.generalization.accuracy,
                    self.generalization.mse,
                );
            }

            self.epoch += 1;
        }

        self.validation = self.score(set.validation)?;

        let record = self.epoch_record();
        if let Some(log) = &mut self.log {
            log.record(&record)?;
            log.flush()?;
        }

        let report = RunReport {
            epochs: self.epoch,
            termination: if self.accuracy_reached() {
                Termination::Converged
            } else {
                Termination::MaxEpochsReached
            },
            training: self.training,
            generalization: self.generalization,
            validation: self.validation,
        };

        info!(
            "training complete ({:?}) after {} epochs: validation accuracy {}%, MSE {}",
            report.termination, report.epochs, report.validation.accuracy, report.validation.mse,
        );

        Ok(report)
    }

    /// Feeds every entry forward and backpropagates its errors.
    /// Batch learning applies the accumulated changes once at the end.
    /// A failed batch epoch drops its accumulated changes.
    fn run_epoch(&mut self, set: &[Entry]) -> Result<(), ProcessError> {
        if let Err(err) = self.feed_entries(set) {
            if self.use_batch {
                self.delta_buffer.iter_mut().for_each(|d| *d = 0.0);
            }
            return Err(err);
        }

        if self.use_batch {
            self.update_weights();
        }
        Ok(())
    }

    fn feed_entries(&mut self, set: &[Entry]) -> Result<(), ProcessError> {
        for entry in set {
            self.net.forward(entry.pattern())?;
            self.backpropagate(entry.target())?;
        }
        Ok(())
    }

    /// Adds the change of one row of weights (all weights leaving a neuron) to `deltas`.
    ///
    /// # Arguments
    /// * `deltas` - weight changes of the row;
    /// * `activation` - activation of the upstream neuron;
    /// * `gradients` - error gradients of the downstream neurons.
    fn update_deltas(&self, deltas: &mut [f64], activation: f64, gradients: &[f64]) {
        for (d, &g) in deltas.iter_mut().zip(gradients.iter()) {
            let change = self.learning_rate * activation * g;
            if self.use_batch {
                *d += change;
            } else {
                *d = change + self.momentum * *d;
            }
        }
    }

    /// Calculates error gradients of the last forward pass and the resulting weight changes.
    /// Online learning applies them right away.
    fn backpropagate(&mut self, desired_outputs: &[f64]) -> Result<(), ProcessError> {
        let Topology {
            hidden, outputs, ..
        } = self.net.topology;

        if desired_outputs.len() != outputs {
            return Err(ProcessError::BadTargets(SizeMismatch {
                expected: outputs,
                got: desired_outputs.len(),
            }));
        }

        // Output gradients
        for ((g, &o), &d) in self
            .output_gradients
            .iter_mut()
            .zip(self.net.outputs.iter())
            .zip(desired_outputs.iter())
        {
            *g = Network::sigmoid_der_s(o) * (d - o);
        }

        // Hidden gradients, from hidden -> output weights before they change
        let input_hidden_len = self.net.topology.input_hidden_len();
        let hidden_output = &self.net.coeffs[input_hidden_len..];
        for (j, g) in self.hidden_gradients.iter_mut().enumerate() {
            let weighted_sum: f64 = hidden_output[j * outputs..(j + 1) * outputs]
                .iter()
                .zip(self.output_gradients.iter())
                .map(|(w, og)| w * og)
                .sum();
            *g = Network::sigmoid_der_s(self.net.hidden[j]) * weighted_sum;
        }

        // Weight changes, bias neurons included
        let mut deltas = std::mem::take(&mut self.delta_buffer);
        let (input_hidden_deltas, hidden_output_deltas) = deltas.split_at_mut(input_hidden_len);

        for (row, &h) in hidden_output_deltas
            .chunks_mut(outputs)
            .zip(self.net.hidden.iter())
        {
            self.update_deltas(row, h, &self.output_gradients);
        }
        for (row, &i) in input_hidden_deltas
            .chunks_mut(hidden)
            .zip(self.net.inputs.iter())
        {
            self.update_deltas(row, i, &self.hidden_gradients);
        }

        self.delta_buffer = deltas;

        if !self.use_batch {
            self.update_weights();
        }
        Ok(())
    }

    /// Applies weight changes. Batch learning clears them afterwards, online learning keeps
    /// them for momentum.
    fn update_weights(&mut self) {
        let clear = self.use_batch;
        for (c, d) in self.net.coeffs.iter_mut().zip(self.delta_buffer.iter_mut()) {
            *c += *d;
            if clear {
                *d = 0.0;
            }
        }
    }

    /// Frees training buffers, consuming `Trainer` object, and returns contained `Network`
    /// back. Batch changes not applied yet are lost.
    pub fn teardown(self) -> Network {
        self.net
    }
}

#[derive(Debug)]
pub enum TrainError {
    Process(ProcessError),
    Log(csv::Error),
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            TrainError::Process(err) => write!(f, "{}", err),
            TrainError::Log(err) => write!(f, "Can't write training log: {}", err),
        }
    }
}

impl Error for TrainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainError::Process(err) => Some(err),
            TrainError::Log(err) => Some(err),
        }
    }
}

impl From<ProcessError> for TrainError {
    fn from(err: ProcessError) -> Self {
        TrainError::Process(err)
    }
}

impl From<csv::Error> for TrainError {
    fn from(err: csv::Error) -> Self {
        TrainError::Log(err)
    }
}
