//! Whole training session: data loading, network setup, training over every training set
//! of the selected partitioning, and saving the result.

use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::{error::Error, fmt};

use crate::config::TrainingConfig;
use crate::data::{DataError, DataReader, PartitionError};
use crate::feedforward::{Network, NewNetError, RunReport, TrainError, WeightsError};

/// Trained network together with the report of every training run, in order.
#[derive(Debug)]
pub struct SessionOutcome {
    pub network: Network,
    pub reports: Vec<RunReport>,
}

/// Runs the session described by `config`.
///
/// Weights carry over from one training set to the next. A seeded session is reproducible:
/// the same seed gives the same shuffling, initial weights and therefore the same result.
pub fn run(config: &TrainingConfig) -> Result<SessionOutcome, SessionError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut reader = DataReader::new();
    reader.load_data_file(
        &config.data.path,
        config.data.inputs,
        config.data.outputs,
        &mut rng,
    )?;
    let count = reader.set_partitioning(config.partitioning)?;

    let mut network = Network::new(config.topology(), &mut rng)?;
    if let Some(path) = &config.initial_weights {
        network.load_weights(path)?;
    }

    let mut trainer = network.build_trainer();
    trainer.set_training_parameters(config.learning_rate, config.momentum, config.use_batch);
    trainer.set_stopping_conditions(config.max_epochs, config.desired_accuracy);
    if let Some(log) = &config.log {
        trainer
            .enable_logging(&log.path, log.resolution)
            .map_err(TrainError::Log)?;
    }

    let mut reports = Vec::new();
    for index in 1..=count {
        let set = reader.next_training_set()?;
        let report = trainer.train_run(&set)?;
        info!(
            "training set {}/{} done in {} epoch(s) ({:?}), validation accuracy {}%",
            index, count, report.epochs, report.termination, report.validation.accuracy
        );
        reports.push(report);
    }

    let network = trainer.teardown();
    if let Some(path) = &config.save_weights {
        network.save_weights(path)?;
    } else {
        warn!("trained weights are not saved anywhere");
    }

    Ok(SessionOutcome { network, reports })
}

/// Error structure for `session::run`
#[derive(Debug)]
pub enum SessionError {
    Data(DataError),
    Partition(PartitionError),
    Net(NewNetError),
    Weights(WeightsError),
    Train(TrainError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            SessionError::Data(err) => write!(f, "{}", err),
            SessionError::Partition(err) => write!(f, "{}", err),
            SessionError::Net(err) => write!(f, "{}", err),
            SessionError::Weights(err) => write!(f, "{}", err),
            SessionError::Train(err) => write!(f, "{}", err),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Data(err) => Some(err),
            SessionError::Partition(err) => Some(err),
            SessionError::Net(err) => Some(err),
            SessionError::Weights(err) => Some(err),
            SessionError::Train(err) => Some(err),
        }
    }
}

impl From<DataError> for SessionError {
    fn from(err: DataError) -> Self {
        SessionError::Data(err)
    }
}

impl From<PartitionError> for SessionError {
    fn from(err: PartitionError) -> Self {
        SessionError::Partition(err)
    }
}

impl From<NewNetError> for SessionError {
    fn from(err: NewNetError) -> Self {
        SessionError::Net(err)
    }
}

impl From<WeightsError> for SessionError {
    fn from(err: WeightsError) -> Self {
        SessionError::Weights(err)
    }
}

impl From<TrainError> for SessionError {
    fn from(err: TrainError) -> Self {
        SessionError::Train(err)
    }
}
