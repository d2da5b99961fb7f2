use serde::Serialize;
use std::{fs::File, io, num::NonZeroUsize, path::Path};

/// Column names of the training log.
pub const LOG_HEADER: [&str; 5] = [
    "Epoch",
    "Training Set Accuracy",
    "Generalization Set Accuracy",
    "Training Set MSE",
    "Generalization Set MSE",
];

/// One row of the training log, in `LOG_HEADER` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochRecord {
    pub epoch: usize,
    pub training_accuracy: f64,
    pub generalization_accuracy: f64,
    pub training_mse: f64,
    pub generalization_mse: f64,
}

/// Csv log of training progress, shared by all runs of a `Trainer`.
pub struct TrainingLog {
    writer: csv::Writer<Box<dyn io::Write + Send>>,
    resolution: NonZeroUsize,
}

impl TrainingLog {
    /// Creates (truncates) the log file and writes the header.
    pub fn create<P: AsRef<Path>>(
        path: P,
        resolution: NonZeroUsize,
    ) -> Result<TrainingLog, csv::Error> {
        let file = File::create(path)?;
        TrainingLog::from_writer(file, resolution)
    }

    /// Writes the header to `sink`.
    pub fn from_writer<W: io::Write + Send + 'static>(
        sink: W,
        resolution: NonZeroUsize,
    ) -> Result<TrainingLog, csv::Error> {
        let sink: Box<dyn io::Write + Send> = Box::new(sink);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        writer.write_record(LOG_HEADER)?;

        Ok(TrainingLog { writer, resolution })
    }

    pub fn resolution(&self) -> NonZeroUsize {
        self.resolution
    }

    /// Whether progress of `epoch` gets a row: epochs 0, resolution, 2 * resolution, ...
    pub fn is_due(&self, epoch: usize) -> bool {
        epoch % self.resolution.get() == 0
    }

    pub fn record(&mut self, record: &EpochRecord) -> Result<(), csv::Error> {
        self.writer.serialize(record)
    }

    pub fn flush(&mut self) -> Result<(), csv::Error> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");

        let mut log = TrainingLog::create(&path, NonZeroUsize::new(5).unwrap()).unwrap();
        log.record(&EpochRecord {
            epoch: 5,
            training_accuracy: 75.0,
            generalization_accuracy: 50.0,
            training_mse: 0.125,
            generalization_mse: 0.25,
        })
        .unwrap();
        log.flush().unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Epoch,Training Set Accuracy,Generalization Set Accuracy,Training Set MSE,Generalization Set MSE"
        );
        let row: Vec<f64> = lines[1].split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(row, vec![5.0, 75.0, 50.0, 0.125, 0.25]);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn due_every_resolution_epochs() {
        let log = TrainingLog::from_writer(io::sink(), NonZeroUsize::new(3).unwrap()).unwrap();
        let due: Vec<usize> = (0..10).filter(|&e| log.is_due(e)).collect();
        assert_eq!(due, vec![0, 3, 6, 9]);
    }
}
