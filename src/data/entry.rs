use rand::{seq::SliceRandom, Rng};

/// Single training sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Activations fed to the input neurons.
    pattern: Box<[f64]>,
    /// Desired activations of the output neurons.
    target: Box<[f64]>,
}

impl Entry {
    /// Returns entry for given pattern and target.
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::data::Entry;
    /// let entry = Entry::new(vec![0.0, 1.0], vec![1.0]);
    /// assert_eq!(entry.pattern(), &[0.0, 1.0]);
    /// assert_eq!(entry.target(), &[1.0]);
    /// ```
    pub fn new(pattern: impl Into<Box<[f64]>>, target: impl Into<Box<[f64]>>) -> Entry {
        Entry {
            pattern: pattern.into(),
            target: target.into(),
        }
    }

    pub fn pattern(&self) -> &[f64] {
        &self.pattern
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }
}

/// All loaded entries, split once into three disjoint, contiguous slices:
/// `entries = [training][generalization][validation]`.
///
/// * training - first `floor(0.6 * N)` entries;
/// * generalization - next `ceil(0.2 * N)` entries;
/// * validation - the rest.
#[derive(Debug, Clone)]
pub struct Dataset {
    entries: Vec<Entry>,
    training_end: usize,
    generalization_end: usize,
}

impl Dataset {
    /// Splits entries in their current order.
    pub fn split(entries: Vec<Entry>) -> Dataset {
        let len = entries.len();
        let training_end = len * 6 / 10;
        let generalization_len = (len * 2 + 9) / 10;
        let generalization_end = (training_end + generalization_len).min(len);

        Dataset {
            entries,
            training_end,
            generalization_end,
        }
    }

    /// Shuffles entries with the given random source, then splits them.
    pub fn shuffled<R: Rng + ?Sized>(mut entries: Vec<Entry>, rng: &mut R) -> Dataset {
        entries.shuffle(rng);
        Dataset::split(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in split order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn training(&self) -> &[Entry] {
        &self.entries[..self.training_end]
    }

    pub fn generalization(&self) -> &[Entry] {
        &self.entries[self.training_end..self.generalization_end]
    }

    pub fn validation(&self) -> &[Entry] {
        &self.entries[self.generalization_end..]
    }

    /// The whole split as a single training set.
    pub fn training_set(&self) -> TrainingSet<'_> {
        TrainingSet {
            training: self.training(),
            generalization: self.generalization(),
            validation: self.validation(),
        }
    }
}

/// Slices used by one training run: the (sub)set to train on, the set deciding when to stop,
/// and the held out set scored once at the end.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSet<'a> {
    pub training: &'a [Entry],
    pub generalization: &'a [Entry],
    pub validation: &'a [Entry],
}
