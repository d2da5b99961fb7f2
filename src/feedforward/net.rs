use log::info;
use rand::{distributions::Uniform, prelude::Distribution, Rng};
use std::{error::Error, fmt, fs::File, io, path::Path};

use super::trainer::Trainer;
use crate::data::{self, Entry};

/// Constant signal of the bias neurons.
pub(super) const BIAS: f64 = -1.0;

/// Number of neurons in each of the three layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topology {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
}

impl Topology {
    pub fn new(inputs: usize, hidden: usize, outputs: usize) -> Topology {
        Topology {
            inputs,
            hidden,
            outputs,
        }
    }

    /// Number of input -> hidden weights, bias neuron included.
    pub fn input_hidden_len(&self) -> usize {
        (self.inputs + 1) * self.hidden
    }

    /// Number of hidden -> output weights, bias neuron included.
    pub fn hidden_output_len(&self) -> usize {
        (self.hidden + 1) * self.outputs
    }

    pub fn weights_len(&self) -> usize {
        self.input_hidden_len() + self.hidden_output_len()
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} input, {} hidden, {} output neurons",
            self.inputs, self.hidden, self.outputs
        )
    }
}

/// Output activation clamped for comparison against binary targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discrete {
    Zero,
    One,
    /// Activation in `[0.1, 0.9]`, never equal to any target.
    Undecided,
}

impl Discrete {
    pub fn matches(self, target: f64) -> bool {
        match self {
            Discrete::Zero => target == 0.0,
            Discrete::One => target == 1.0,
            Discrete::Undecided => false,
        }
    }
}

/// Neural network structure
#[derive(Debug, Clone)]
pub struct Network {
    pub(super) topology: Topology,

    /// Array of all weights.
    ///
    /// Both weight matrices are stored row-major, one row per upstream neuron (bias neuron
    /// last), one column per downstream neuron:
    /// `coeffs = [input -> hidden][hidden -> output]`
    /// `input -> hidden = [input_1 row][input_2 row] ... [bias row]`, each row `hidden` long
    /// `hidden -> output = [hidden_1 row][hidden_2 row] ... [bias row]`, each row `outputs` long
    /// This is also the order weights are saved and loaded in.
    pub(super) coeffs: Box<[f64]>,

    /// Activations of input neurons, the last one is the bias neuron and always `-1`.
    pub(super) inputs: Box<[f64]>,

    /// Activations of hidden neurons, the last one is the bias neuron and always `-1`.
    pub(super) hidden: Box<[f64]>,

    /// Activations of output neurons.
    pub(super) outputs: Box<[f64]>,
}

impl Network {
    /// Returns network for given topology.
    /// Weights are drawn uniformly from `[-1/sqrt(fan_in), 1/sqrt(fan_in)]`, fan-in being the
    /// input count for input -> hidden weights and the hidden count for hidden -> output ones.
    ///
    /// # Returns
    /// * `Ok(Network)` if all neuron counts are positive;
    /// * `Err(NewNetError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::feedforward::{Network, Topology};
    /// # use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let net = Network::new(Topology::new(16, 20, 3), &mut rng).unwrap();
    /// assert_eq!(net.weights().len(), 17 * 20 + 21 * 3);
    /// ```
    pub fn new<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Result<Network, NewNetError> {
        Network::check_topology(topology)?;

        let mut coeffs = Vec::with_capacity(topology.weights_len());

        let range = 1.0 / (topology.inputs as f64).sqrt();
        let weights_between = Uniform::from(-range..=range);
        for _ in 0..topology.input_hidden_len() {
            coeffs.push(weights_between.sample(rng));
        }

        let range = 1.0 / (topology.hidden as f64).sqrt();
        let weights_between = Uniform::from(-range..=range);
        for _ in 0..topology.hidden_output_len() {
            coeffs.push(weights_between.sample(rng));
        }

        Ok(Network::build(topology, coeffs.into_boxed_slice()))
    }

    /// Returns network for given topology and weights (in the saving order, see
    /// `Network::coeffs`).
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::feedforward::{Network, Topology};
    /// let weights = [0.5, -0.25, 1.5, 0.75];
    /// let net = Network::from_weights(Topology::new(1, 1, 1), &weights).unwrap();
    /// assert_eq!(net.input_hidden_weights(), &[0.5, -0.25]);
    /// assert_eq!(net.hidden_output_weights(), &[1.5, 0.75]);
    /// ```
    pub fn from_weights(topology: Topology, weights: &[f64]) -> Result<Network, NewNetError> {
        Network::check_topology(topology)?;

        if weights.len() != topology.weights_len() {
            return Err(NewNetError::BadWeights(SizeMismatch {
                expected: topology.weights_len(),
                got: weights.len(),
            }));
        }

        Ok(Network::build(topology, weights.into()))
    }

    fn check_topology(topology: Topology) -> Result<(), NewNetError> {
        if topology.inputs == 0 || topology.hidden == 0 || topology.outputs == 0 {
            return Err(NewNetError::BadTopology(topology));
        }
        Ok(())
    }

    fn build(topology: Topology, coeffs: Box<[f64]>) -> Network {
        let mut inputs = vec![0.0; topology.inputs + 1];
        inputs[topology.inputs] = BIAS;

        let mut hidden = vec![0.0; topology.hidden + 1];
        hidden[topology.hidden] = BIAS;

        Network {
            topology,
            coeffs,
            inputs: inputs.into_boxed_slice(),
            hidden: hidden.into_boxed_slice(),
            outputs: vec![0.0; topology.outputs].into_boxed_slice(),
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// All weights, in the saving order.
    pub fn weights(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn input_hidden_weights(&self) -> &[f64] {
        &self.coeffs[..self.topology.input_hidden_len()]
    }

    pub fn hidden_output_weights(&self) -> &[f64] {
        &self.coeffs[self.topology.input_hidden_len()..]
    }

    /// Exports topology and weights from network.
    ///
    /// # Returns
    /// `(topology, weights)`.
    pub fn export(&self) -> (Topology, &[f64]) {
        (self.topology, &self.coeffs)
    }

    /// Sigmoid function.
    /// Implements the formula:
    /// `1 / (1 + exp(-x))`.
    pub(super) fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Sigmoid derivative function, expressed in terms of sigmoid itself.
    /// Implements the formula:
    /// `s * (1 - s)`.
    pub(super) fn sigmoid_der_s(s: f64) -> f64 {
        s * (1.0 - s)
    }

    /// Clamps an activation to `Zero` below 0.1, `One` above 0.9, `Undecided` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::feedforward::{Discrete, Network};
    /// assert_eq!(Network::discretize(0.05), Discrete::Zero);
    /// assert_eq!(Network::discretize(0.95), Discrete::One);
    /// assert_eq!(Network::discretize(0.5), Discrete::Undecided);
    /// ```
    pub fn discretize(x: f64) -> Discrete {
        if x < 0.1 {
            Discrete::Zero
        } else if x > 0.9 {
            Discrete::One
        } else {
            Discrete::Undecided
        }
    }

    /// Calculates activations of one layer.
    ///
    /// # Arguments
    /// * `activations` - activations of previous layer, bias neuron included;
    /// * `weights` - weights between the layers, `activations.len()` rows of `layer.len()`;
    /// * `layer` - mutable slice of activations to fill.
    fn process_layer(activations: &[f64], weights: &[f64], layer: &mut [f64]) {
        let width = layer.len();
        for (j, neuron) in layer.iter_mut().enumerate() {
            let sum: f64 = activations
                .iter()
                .zip(weights[j..].iter().step_by(width))
                .map(|(a, w)| a * w)
                .sum();
            *neuron = Network::sigmoid(sum);
        }
    }

    /// Calculates output of the network using given pattern.
    ///
    /// Overwrites activations of all neurons, outputs can be read afterwards with
    /// `Network::outputs` and `Network::discretized_outputs`.
    ///
    /// # Returns
    /// * `Ok(&[f64])` with output activations if pattern size is right;
    /// * `Err(ProcessError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::feedforward::{Network, Topology};
    /// # use rand::{rngs::StdRng, SeedableRng};
    /// let mut net = Network::new(Topology::new(10, 20, 3), &mut StdRng::seed_from_u64(0)).unwrap();
    /// let outputs = net.forward(&[1.0; 10]).unwrap();
    /// assert_eq!(outputs.len(), 3);
    /// ```
    pub fn forward(&mut self, pattern: &[f64]) -> Result<&[f64], ProcessError> {
        if pattern.len() != self.topology.inputs {
            return Err(ProcessError::BadInputs(SizeMismatch {
                expected: self.topology.inputs,
                got: pattern.len(),
            }));
        }

        // Bias neuron stays untouched
        self.inputs[..pattern.len()].copy_from_slice(pattern);

        let (input_hidden, hidden_output) = self.coeffs.split_at(self.topology.input_hidden_len());
        let hidden_len = self.topology.hidden;

        Network::process_layer(&self.inputs, input_hidden, &mut self.hidden[..hidden_len]);
        Network::process_layer(&self.hidden, hidden_output, &mut self.outputs);

        Ok(&self.outputs[..])
    }

    /// Output activations of the last `Network::forward`.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Discretized output activations of the last `Network::forward`.
    pub fn discretized_outputs(&self) -> Vec<Discrete> {
        self.outputs.iter().map(|&o| Network::discretize(o)).collect()
    }

    /// Runs `Network::forward` and returns discretized outputs.
    pub fn classify(&mut self, pattern: &[f64]) -> Result<Vec<Discrete>, ProcessError> {
        self.forward(pattern)?;
        Ok(self.discretized_outputs())
    }

    /// Whether every discretized output of the last `Network::forward` equals its target.
    pub(super) fn outputs_match(&self, target: &[f64]) -> bool {
        self.outputs
            .iter()
            .zip(target.iter())
            .all(|(&o, &t)| Network::discretize(o).matches(t))
    }

    fn check_target(&self, target: &[f64]) -> Result<(), ProcessError> {
        if target.len() != self.topology.outputs {
            return Err(ProcessError::BadTargets(SizeMismatch {
                expected: self.topology.outputs,
                got: target.len(),
            }));
        }
        Ok(())
    }

    /// Percentage of entries whose every discretized output equals the target.
    ///
    /// # Returns
    /// * `Ok(f64)` in `[0, 100]`; an empty set has nothing misclassified and scores `100`;
    /// * `Err(ProcessError)` if an entry doesn't fit the topology.
    pub fn accuracy(&mut self, set: &[Entry]) -> Result<f64, ProcessError> {
        if set.is_empty() {
            return Ok(100.0);
        }

        let mut incorrect = 0;
        for entry in set {
            self.check_target(entry.target())?;
            self.forward(entry.pattern())?;
            if !self.outputs_match(entry.target()) {
                incorrect += 1;
            }
        }

        Ok(100.0 - incorrect as f64 / set.len() as f64 * 100.0)
    }

    /// Mean squared error of raw outputs over all entries and output neurons.
    ///
    /// # Returns
    /// * `Ok(f64)`; an empty set scores `0`;
    /// * `Err(ProcessError)` if an entry doesn't fit the topology.
    pub fn mse(&mut self, set: &[Entry]) -> Result<f64, ProcessError> {
        if set.is_empty() {
            return Ok(0.0);
        }

        let mut cost = 0.0;
        for entry in set {
            self.check_target(entry.target())?;
            let outputs = self.forward(entry.pattern())?;
            cost += Network::calc_cost(outputs, entry.target()).map_err(ProcessError::BadTargets)?;
        }

        Ok(cost / (self.topology.outputs * set.len()) as f64)
    }

    /// Calculates squared error of output values given the desired values.
    /// Implements the formula:
    /// `sum((outputs - desired outputs)^2)`
    ///
    /// # Returns
    /// * `Ok(f64)` if `outputs` and `desired_outputs` have the same size;
    /// * `SizeMismatch` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use bpnnet::feedforward::Network;
    /// let outputs = [10.0; 1000];
    /// let desired_outputs = [10.25; 1000];
    /// let cost = Network::calc_cost(&outputs, &desired_outputs).unwrap();
    /// assert_eq!(cost, 62.5);
    /// ```
    pub fn calc_cost(outputs: &[f64], desired_outputs: &[f64]) -> Result<f64, SizeMismatch> {
        if outputs.len() != desired_outputs.len() {
            return Err(SizeMismatch {
                expected: outputs.len(),
                got: desired_outputs.len(),
            });
        };

        Ok(outputs
            .iter()
            .zip(desired_outputs.iter())
            .map(|(&a, &b)| (a - b) * (a - b))
            .sum())
    }

    /// Reads comma separated weights (see `Network::coeffs` for the order).
    ///
    /// Weights are replaced only if exactly `Topology::weights_len` values were read.
    pub fn read_weights<S: io::Read>(&mut self, source: S) -> Result<(), WeightsError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut weights = Vec::with_capacity(self.coeffs.len());
        let mut record = csv::StringRecord::new();

        while reader.read_record(&mut record)? {
            if data::is_short_record(&record) {
                continue;
            }
            for field in record.iter().filter(|f| !f.is_empty()) {
                let weight = field.parse::<f64>().map_err(|_| WeightsError::BadValue {
                    index: weights.len(),
                    value: field.to_owned(),
                })?;
                weights.push(weight);
            }
        }

        if weights.len() != self.coeffs.len() {
            return Err(WeightsError::BadCount(SizeMismatch {
                expected: self.coeffs.len(),
                got: weights.len(),
            }));
        }

        self.coeffs.copy_from_slice(&weights);
        Ok(())
    }

    /// Writes all weights as a single comma separated record.
    pub fn write_weights<S: io::Write>(&self, sink: S) -> Result<(), WeightsError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        writer.write_record(self.coeffs.iter().map(|w| w.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    /// Loads weights from file, see `Network::read_weights`.
    pub fn load_weights<P: AsRef<Path>>(&mut self, path: P) -> Result<(), WeightsError> {
        let path = path.as_ref();
        self.read_weights(File::open(path)?)?;
        info!("neuron weights loaded from '{}'", path.display());
        Ok(())
    }

    /// Saves weights to file, see `Network::write_weights`.
    pub fn save_weights<P: AsRef<Path>>(&self, path: P) -> Result<(), WeightsError> {
        let path = path.as_ref();
        self.write_weights(File::create(path)?)?;
        info!("neuron weights saved to '{}'", path.display());
        Ok(())
    }

    /// Consumes `Network` and builds `Trainer` object containing it.
    /// See `Trainer`'s documentation for details.
    pub fn build_trainer(self) -> Trainer {
        Trainer::build(self)
    }
}

/// Error structure for `Network::new`
#[derive(Debug, Clone)]
pub enum NewNetError {
    BadTopology(Topology),
    BadWeights(SizeMismatch),
}

impl fmt::Display for NewNetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            NewNetError::BadTopology(topology) => write!(
                f,
                "Every layer must have at least one neuron, but got {}!",
                topology
            ),
            NewNetError::BadWeights(SizeMismatch { expected, got }) => write!(
                f,
                "Expected {} weights because of provided topology, but got {}!",
                expected, got
            ),
        }
    }
}

impl Error for NewNetError {}

/// Error structure for `Network::forward` and set scoring
#[derive(Debug, Clone)]
pub enum ProcessError {
    BadInputs(SizeMismatch),
    BadTargets(SizeMismatch),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            ProcessError::BadInputs(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} input(s), but got {}!", expected, got)
            }
            ProcessError::BadTargets(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} target(s), but got {}!", expected, got)
            }
        }
    }
}

impl Error for ProcessError {}

/// Error structure for weights loading and saving
#[derive(Debug)]
pub enum WeightsError {
    Io(io::Error),
    Csv(csv::Error),
    BadValue { index: usize, value: String },
    BadCount(SizeMismatch),
}

impl fmt::Display for WeightsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            WeightsError::Io(err) => write!(f, "Weights file error: {}", err),
            WeightsError::Csv(err) => write!(f, "Weights file error: {}", err),
            WeightsError::BadValue { index, value } => {
                write!(f, "Can't parse weight #{} '{}' as a number!", index, value)
            }
            WeightsError::BadCount(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} weights, but got {}!", expected, got)
            }
        }
    }
}

impl Error for WeightsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WeightsError::Io(err) => Some(err),
            WeightsError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for WeightsError {
    fn from(err: io::Error) -> Self {
        WeightsError::Io(err)
    }
}

impl From<csv::Error> for WeightsError {
    fn from(err: csv::Error) -> Self {
        WeightsError::Csv(err)
    }
}

/// Error structure for collections size mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeMismatch {
    pub expected: usize,
    pub got: usize,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Expected {} values, but got {}!",
            self.expected, self.got
        )
    }
}

impl Error for SizeMismatch {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn net(inputs: usize, hidden: usize, outputs: usize, seed: u64) -> Network {
        Network::new(
            Topology::new(inputs, hidden, outputs),
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_layers() {
        let mut rng = StdRng::seed_from_u64(0);
        for topology in [
            Topology::new(0, 1, 1),
            Topology::new(1, 0, 1),
            Topology::new(1, 1, 0),
        ] {
            assert!(matches!(
                Network::new(topology, &mut rng),
                Err(NewNetError::BadTopology(_))
            ));
        }
        assert!(matches!(
            Network::from_weights(Topology::new(1, 1, 1), &[0.0; 3]),
            Err(NewNetError::BadWeights(SizeMismatch {
                expected: 4,
                got: 3
            }))
        ));
    }

    #[test]
    fn initial_weights_within_fan_in_range() {
        let net = net(16, 4, 3, 11);

        let input_range = 1.0 / 4.0;
        assert!(net
            .input_hidden_weights()
            .iter()
            .all(|w| w.abs() <= input_range));

        let hidden_range = 1.0 / 2.0;
        assert!(net
            .hidden_output_weights()
            .iter()
            .all(|w| w.abs() <= hidden_range));
        assert_eq!(net.input_hidden_weights().len(), 17 * 4);
        assert_eq!(net.hidden_output_weights().len(), 5 * 3);
    }

    #[test]
    fn bias_neurons_fixed() {
        let mut net = net(3, 2, 1, 5);
        net.forward(&[7.0, 8.0, 9.0]).unwrap();
        assert_eq!(net.inputs[3], BIAS);
        assert_eq!(net.hidden[2], BIAS);
    }

    #[test]
    fn forward_by_hand() {
        // w_ih = [[0.5], [-1.0]] (input, bias), w_ho = [[2.0], [0.5]] (hidden, bias)
        let mut net = Network::from_weights(Topology::new(1, 1, 1), &[0.5, -1.0, 2.0, 0.5]).unwrap();
        let output = net.forward(&[2.0]).unwrap()[0];

        let hidden = Network::sigmoid(2.0 * 0.5 + BIAS * -1.0);
        let expected = Network::sigmoid(hidden * 2.0 + BIAS * 0.5);
        assert_eq!(output, expected);
    }

    #[test]
    fn forward_is_deterministic() {
        let mut net = net(4, 5, 2, 3);
        let pattern = [0.1, 0.9, -0.3, 1.0];

        let first = net.forward(&pattern).unwrap().to_vec();
        let again = net.outputs().to_vec();
        let second = net.forward(&pattern).unwrap().to_vec();

        assert_eq!(first, again);
        assert_eq!(first, second);
    }

    #[test]
    fn forward_rejects_bad_pattern() {
        let mut net = net(4, 5, 2, 3);
        assert!(matches!(
            net.forward(&[1.0; 3]),
            Err(ProcessError::BadInputs(SizeMismatch {
                expected: 4,
                got: 3
            }))
        ));
    }

    #[test]
    fn discretize_thresholds() {
        assert_eq!(Network::discretize(0.05), Discrete::Zero);
        assert_eq!(Network::discretize(0.95), Discrete::One);
        assert_eq!(Network::discretize(0.5), Discrete::Undecided);
        assert_eq!(Network::discretize(0.1), Discrete::Undecided);
        assert_eq!(Network::discretize(0.9), Discrete::Undecided);
        assert!(!Discrete::Undecided.matches(0.5));
        assert!(Discrete::One.matches(1.0));
    }

    #[test]
    fn empty_set_scores() {
        let mut net = net(2, 2, 1, 0);
        assert_eq!(net.accuracy(&[]).unwrap(), 100.0);
        assert_eq!(net.mse(&[]).unwrap(), 0.0);
    }

    #[test]
    fn scores_against_known_outputs() {
        // Huge positive bias weight on the output drives it to ~0, whatever the input.
        let mut net = Network::from_weights(Topology::new(1, 1, 1), &[0.0, 0.0, 0.0, 50.0]).unwrap();
        let set = [
            Entry::new(vec![0.0], vec![0.0]),
            Entry::new(vec![1.0], vec![0.0]),
            Entry::new(vec![2.0], vec![1.0]),
            Entry::new(vec![3.0], vec![0.0]),
        ];

        assert_eq!(net.accuracy(&set).unwrap(), 75.0);

        let output = Network::sigmoid(-50.0);
        let expected = (3.0 * output * output + (output - 1.0) * (output - 1.0)) / 4.0;
        assert!((net.mse(&set).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn scoring_rejects_bad_targets() {
        let mut net = net(1, 1, 2, 0);
        let set = [Entry::new(vec![0.0], vec![0.0])];
        assert!(matches!(
            net.accuracy(&set),
            Err(ProcessError::BadTargets(_))
        ));
        assert!(matches!(net.mse(&set), Err(ProcessError::BadTargets(_))));
    }

    #[test]
    fn weights_round_trip() {
        let original = net(5, 4, 3, 8);
        let mut sink = Vec::new();
        original.write_weights(&mut sink).unwrap();

        let mut restored = net(5, 4, 3, 9);
        assert_ne!(restored.weights(), original.weights());
        restored.read_weights(sink.as_slice()).unwrap();

        assert_eq!(restored.weights(), original.weights());
    }

    #[test]
    fn weights_count_mismatch_keeps_weights() {
        let mut net = net(1, 1, 1, 4);
        let before = net.weights().to_vec();

        match net.read_weights("0.1,0.2,0.3".as_bytes()) {
            Err(WeightsError::BadCount(SizeMismatch {
                expected: 4,
                got: 3,
            })) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            net.read_weights("0.1,0.2,nope,0.4".as_bytes()),
            Err(WeightsError::BadValue { index: 2, .. })
        ));
        assert_eq!(net.weights(), &before[..]);
    }

    #[test]
    fn weights_spread_over_lines() {
        let mut net = net(1, 1, 1, 4);
        net.read_weights("0.1,0.2,\n0.3,0.4\n".as_bytes()).unwrap();
        assert_eq!(net.weights(), &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn missing_weights_file() {
        let mut net = net(1, 1, 1, 4);
        assert!(matches!(
            net.load_weights("/nonexistent/weights.csv"),
            Err(WeightsError::Io(_))
        ));
    }
}
