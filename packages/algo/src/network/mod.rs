//! Fixed 4-20-1 feed-forward network with sigmoid units
//!
//! Forward pass for every layer l > 0 and unit i:
//!
//! ```text
//! output[l][i] = sigmoid( Σ_j weight[l][i][j] * output[l-1][j] )
//! ```
//!
//! There are no bias terms. Each weighted layer owns an exact
//! `units × prev_units` matrix stored row-major, so the flattened weight
//! order (layer by layer, unit by unit, input by input) is simply the
//! concatenation of the layer buffers.

mod backprop;

use rand::Rng;

use crate::normalize::{denormalize_interval, normalize_inputs};
use crate::types::{INITIAL_WEIGHT_RANGE, INPUT_UNITS, TOPOLOGY, WEIGHT_COUNT};

// ==================== Activation ====================

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative expressed in terms of the squashed output y
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

// ==================== Layer ====================

/// One network layer
///
/// The input layer has `inputs == 0` and no weights; its outputs are the
/// normalised feature values.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    units: usize,
    inputs: usize,
    /// `units × inputs`, row-major
    weights: Vec<f64>,
    outputs: Vec<f64>,
    /// Backpropagated error terms
    deltas: Vec<f64>,
}

impl Layer {
    fn new(units: usize, inputs: usize) -> Self {
        Self {
            units,
            inputs,
            weights: vec![0.0; units * inputs],
            outputs: vec![0.0; units],
            deltas: vec![0.0; units],
        }
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    #[inline]
    fn weight(&self, unit: usize, input: usize) -> f64 {
        self.weights[unit * self.inputs + input]
    }

    /// Weighted sums of `previous` squashed into `out`
    fn activate(&self, previous: &[f64], out: &mut [f64]) {
        for (unit, slot) in out.iter_mut().enumerate().take(self.units) {
            let row = &self.weights[unit * self.inputs..(unit + 1) * self.inputs];
            let sum: f64 = row.iter().zip(previous.iter()).map(|(w, x)| w * x).sum();
            *slot = sigmoid(sum);
        }
    }
}

// ==================== Network ====================

#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Network with every weight set to zero
    pub fn new() -> Self {
        let layers = TOPOLOGY
            .iter()
            .enumerate()
            .map(|(l, &units)| {
                let inputs = if l == 0 { 0 } else { TOPOLOGY[l - 1] };
                Layer::new(units, inputs)
            })
            .collect();

        Self { layers }
    }

    /// Network with weights drawn uniformly from [-0.5, 0.5)
    pub fn with_random_weights<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut network = Self::new();
        for layer in network.layers.iter_mut().skip(1) {
            for w in layer.weights.iter_mut() {
                *w = rng.gen_range(-INITIAL_WEIGHT_RANGE..INITIAL_WEIGHT_RANGE);
            }
        }
        network
    }

    /// Rebuilds a network from the flattened persistence order
    ///
    /// Returns `None` unless exactly [`WEIGHT_COUNT`] values are supplied.
    pub fn from_weights(weights: &[f64]) -> Option<Self> {
        if weights.len() != WEIGHT_COUNT {
            return None;
        }

        let mut network = Self::new();
        let mut offset = 0;
        for layer in network.layers.iter_mut().skip(1) {
            let len = layer.weights.len();
            layer.weights.copy_from_slice(&weights[offset..offset + len]);
            offset += len;
        }
        Some(network)
    }

    /// Weights flattened layer by layer, unit by unit, input by input
    pub fn flatten_weights(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(WEIGHT_COUNT);
        for layer in self.layers.iter().skip(1) {
            flat.extend_from_slice(&layer.weights);
        }
        flat
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Weight from `input` of layer `layer - 1` into `unit` of `layer`
    pub fn weight(&self, layer: usize, unit: usize, input: usize) -> f64 {
        self.layers[layer].weight(unit, input)
    }

    /// Output of the single output unit after the last forward pass
    pub fn output(&self) -> f64 {
        self.layers
            .last()
            .and_then(|layer| layer.outputs.first())
            .copied()
            .unwrap_or(0.0)
    }

    /// Forward pass over normalised inputs, keeping every layer's outputs
    /// for a following backpropagation step
    pub fn forward(&mut self, inputs: &[f64; INPUT_UNITS]) -> f64 {
        self.layers[0].outputs.copy_from_slice(inputs);

        for l in 1..self.layers.len() {
            let (before, rest) = self.layers.split_at_mut(l);
            let previous = &before[l - 1].outputs;
            let layer = &mut rest[0];
            let mut outputs = std::mem::take(&mut layer.outputs);
            layer.activate(previous, &mut outputs);
            layer.outputs = outputs;
        }

        self.output()
    }

    /// Forward pass that leaves the network untouched
    pub fn evaluate(&self, inputs: &[f64; INPUT_UNITS]) -> f64 {
        let mut previous = inputs.to_vec();
        for layer in self.layers.iter().skip(1) {
            let mut outputs = vec![0.0; layer.units];
            layer.activate(&previous, &mut outputs);
            previous = outputs;
        }
        previous.first().copied().unwrap_or(0.0)
    }

    /// Predicts the next interval in days from raw domain values
    pub fn predict(
        &self,
        last_predicted_interval: f64,
        review_interval: f64,
        repetition: f64,
        grade: f64,
    ) -> u32 {
        let inputs = normalize_inputs(last_predicted_interval, review_interval, repetition, grade);
        denormalize_interval(self.evaluate(&inputs))
    }
}
