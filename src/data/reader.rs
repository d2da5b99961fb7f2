use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt, fs::File, io, path::Path};

use super::entry::{Dataset, Entry, TrainingSet};

/// Approach used to pick the training subset of each successive training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Partitioning {
    /// A single run over the whole training slice.
    Static,
    /// Runs over a prefix of the training slice growing by `step_percent` of it each time.
    Growing { step_percent: f64 },
    /// Runs over a window of `window_size` entries sliding by `step_size` each time.
    Windowing { window_size: usize, step_size: usize },
}

/// Most training sets a growing partitioning may yield.
pub const MAX_TRAINING_SETS: usize = 1 << 20;

/// Position of the partitioning within the training slice.
#[derive(Debug, Clone, Copy)]
enum Cursor {
    Static,
    Growing { step: usize, end: usize },
    Windowing { size: usize, step: usize, start: usize },
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    partitioning: Partitioning,
    cursor: Cursor,
    count: usize,
    served: usize,
}

/// Loads entries, splits them, and hands out training sets according to the selected
/// `Partitioning`.
///
/// # Examples
/// ```
/// # use bpnnet::data::{DataReader, Partitioning};
/// # use rand::{rngs::StdRng, SeedableRng};
/// let csv = (0..10).map(|i| format!("{},{}\n", i, i % 2)).collect::<String>();
///
/// let mut reader = DataReader::new();
/// reader.read_data(csv.as_bytes(), 1, 1, &mut StdRng::seed_from_u64(0)).unwrap();
/// let count = reader.set_partitioning(Partitioning::Static).unwrap();
///
/// assert_eq!(count, 1);
/// assert_eq!(reader.next_training_set().unwrap().training.len(), 6);
/// ```
#[derive(Debug, Default)]
pub struct DataReader {
    dataset: Option<Dataset>,
    schedule: Option<Schedule>,
}

impl DataReader {
    pub fn new() -> DataReader {
        DataReader::default()
    }

    /// Loads a comma separated data file, see `DataReader::read_data`.
    pub fn load_data_file<P: AsRef<Path>, R: Rng + ?Sized>(
        &mut self,
        path: P,
        inputs: usize,
        outputs: usize,
        rng: &mut R,
    ) -> Result<usize, DataError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let count = self.read_data(file, inputs, outputs, rng)?;
        info!("input file '{}' read: {} patterns loaded", path.display(), count);
        Ok(count)
    }

    /// Parses entries from `source`, shuffles them with `rng` and splits them.
    ///
    /// On success the previous dataset and partitioning are replaced (partitioning has to be
    /// selected again). On failure the reader is left as it was.
    ///
    /// # Returns
    /// * `Ok(usize)` - number of loaded entries;
    /// * `Err(DataError)` if the source can't be read or holds a malformed record.
    pub fn read_data<S: io::Read, R: Rng + ?Sized>(
        &mut self,
        source: S,
        inputs: usize,
        outputs: usize,
        rng: &mut R,
    ) -> Result<usize, DataError> {
        let entries = parse_entries(source, inputs, outputs)?;
        let dataset = Dataset::shuffled(entries, rng);
        let count = dataset.len();

        self.dataset = Some(dataset);
        self.schedule = None;
        Ok(count)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Selects how training sets are created, restarting from the first one.
    ///
    /// # Returns
    /// * `Ok(usize)` - the number of training sets the approach yields;
    /// * `Err(PartitionError)` if no data is loaded or parameters are out of range.
    ///   The previously selected approach stays in effect.
    pub fn set_partitioning(&mut self, partitioning: Partitioning) -> Result<usize, PartitionError> {
        let dataset = self.dataset.as_ref().ok_or(PartitionError::NoData)?;
        let training_len = dataset.training().len();

        let (cursor, count) = match partitioning {
            Partitioning::Static => (Cursor::Static, 1),
            Partitioning::Growing { step_percent } => {
                if !(step_percent > 0.0 && step_percent <= 100.0) {
                    return Err(PartitionError::BadStepPercent(step_percent));
                }
                let count = (100.0 / step_percent).ceil();
                if count > MAX_TRAINING_SETS as f64 {
                    return Err(PartitionError::TooManySets {
                        step_percent,
                        limit: MAX_TRAINING_SETS,
                    });
                }
                let count = count as usize;
                let step = (step_percent * training_len as f64 / 100.0).ceil() as usize;
                (
                    Cursor::Growing {
                        step: step.min(training_len),
                        end: 0,
                    },
                    count,
                )
            }
            Partitioning::Windowing {
                window_size,
                step_size,
            } => {
                if window_size == 0
                    || window_size >= training_len
                    || step_size == 0
                    || step_size > window_size
                {
                    return Err(PartitionError::BadWindow {
                        window_size,
                        step_size,
                        training_len,
                    });
                }
                let count = (training_len - window_size + step_size - 1) / step_size + 1;
                (
                    Cursor::Windowing {
                        size: window_size,
                        step: step_size,
                        start: 0,
                    },
                    count,
                )
            }
        };

        info!(
            "training data partitioning: {:?}, {} training set(s)",
            partitioning, count
        );
        self.schedule = Some(Schedule {
            partitioning,
            cursor,
            count,
            served: 0,
        });
        Ok(count)
    }

    pub fn partitioning(&self) -> Option<Partitioning> {
        self.schedule.map(|s| s.partitioning)
    }

    /// Number of training sets the selected approach yields, `None` if none is selected.
    pub fn training_sets_count(&self) -> Option<usize> {
        self.schedule.map(|s| s.count)
    }

    /// Number of training sets still to be handed out.
    pub fn remaining_training_sets(&self) -> Option<usize> {
        self.schedule.map(|s| s.count - s.served)
    }

    /// Returns the next training set: the next training subset, together with the full
    /// generalization and validation slices.
    pub fn next_training_set(&mut self) -> Result<TrainingSet<'_>, PartitionError> {
        let dataset = self.dataset.as_ref().ok_or(PartitionError::NoData)?;
        let schedule = self.schedule.as_mut().ok_or(PartitionError::NoStrategy)?;
        let training = dataset.training();

        if schedule.served >= schedule.count {
            warn!(
                "all {} training set(s) were already handed out",
                schedule.count
            );
            return Err(PartitionError::Exhausted(schedule.count));
        }

        let range = match &mut schedule.cursor {
            Cursor::Static => 0..training.len(),
            Cursor::Growing { step, end } => {
                *end = (*end + *step).min(training.len());
                0..*end
            }
            Cursor::Windowing { size, step, start } => {
                let from = *start;
                *start += *step;
                from..(from + *size).min(training.len())
            }
        };
        schedule.served += 1;

        Ok(TrainingSet {
            training: &training[range],
            generalization: dataset.generalization(),
            validation: dataset.validation(),
        })
    }
}

/// Parses comma separated records: first `inputs` fields are the pattern, next `outputs`
/// the target. Further fields are ignored, records of less than three characters skipped.
pub fn parse_entries<S: io::Read>(
    source: S,
    inputs: usize,
    outputs: usize,
) -> Result<Vec<Entry>, DataError> {
    if inputs == 0 || outputs == 0 {
        return Err(DataError::BadShape { inputs, outputs });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut entries = Vec::new();
    let mut record = csv::StringRecord::new();

    while reader.read_record(&mut record)? {
        if super::is_short_record(&record) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line());
        if record.len() < inputs + outputs {
            return Err(DataError::ShortRecord {
                line,
                expected: inputs + outputs,
                got: record.len(),
            });
        }

        let mut values = record.iter().take(inputs + outputs).map(|field| {
            field.parse::<f64>().map_err(|_| DataError::BadValue {
                line,
                value: field.to_owned(),
            })
        });
        let pattern = values.by_ref().take(inputs).collect::<Result<Vec<_>, _>>()?;
        let target = values.collect::<Result<Vec<_>, _>>()?;

        entries.push(Entry::new(pattern, target));
    }

    Ok(entries)
}

/// Error structure for data loading
#[derive(Debug)]
pub enum DataError {
    Io(io::Error),
    Csv(csv::Error),
    BadShape { inputs: usize, outputs: usize },
    ShortRecord { line: u64, expected: usize, got: usize },
    BadValue { line: u64, value: String },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            DataError::Io(err) => write!(f, "Can't open data file: {}", err),
            DataError::Csv(err) => write!(f, "Can't read data file: {}", err),
            DataError::BadShape { inputs, outputs } => write!(
                f,
                "Entries need at least one input and one output, but got {} and {}!",
                inputs, outputs
            ),
            DataError::ShortRecord {
                line,
                expected,
                got,
            } => write!(
                f,
                "Expected {} values on line {}, but got {}!",
                expected, line, got
            ),
            DataError::BadValue { line, value } => {
                write!(f, "Can't parse '{}' on line {} as a number!", value, line)
            }
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataError::Io(err) => Some(err),
            DataError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for DataError {
    fn from(err: io::Error) -> Self {
        DataError::Io(err)
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv(err)
    }
}

/// Error structure for training set creation
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    NoData,
    NoStrategy,
    BadStepPercent(f64),
    TooManySets { step_percent: f64, limit: usize },
    BadWindow {
        window_size: usize,
        step_size: usize,
        training_len: usize,
    },
    Exhausted(usize),
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            PartitionError::NoData => write!(f, "No data loaded!"),
            PartitionError::NoStrategy => write!(f, "No partitioning approach selected!"),
            PartitionError::BadStepPercent(step) => write!(
                f,
                "Growing step must be in (0, 100] percent, but got {}!",
                step
            ),
            PartitionError::TooManySets {
                step_percent,
                limit,
            } => write!(
                f,
                "Growing step of {} percent yields more than {} training sets!",
                step_percent, limit
            ),
            PartitionError::BadWindow {
                window_size,
                step_size,
                training_len,
            } => write!(
                f,
                "Window of {} entries moving by {} doesn't fit {} training entries \
                (need 0 < step <= window < entries)!",
                window_size, step_size, training_len
            ),
            PartitionError::Exhausted(count) => {
                write!(f, "All {} training sets were already used!", count)
            }
        }
    }
}

impl Error for PartitionError {}
