//! Per-sample gradient descent
//!
//! Given the outputs of the preceding forward pass:
//!
//! ```text
//! error          = output - target
//! delta[last]    = y(1 - y) * error
//! delta[l-1][i]  = y(1 - y) * Σ_j weight[l][j][i] * delta[l][j]
//! weight[l][i][j] -= delta[l][i] * output[l-1][j] * rate
//! ```
//!
//! All deltas are computed before any weight moves. No batching, momentum or
//! weight decay.

use super::{sigmoid_derivative, Network};
use crate::types::INPUT_UNITS;

impl Network {
    /// Backpropagates against `target` and updates every weight in place
    ///
    /// Must follow [`Network::forward`] for the same sample. Returns the
    /// signed output error before squaring.
    pub fn backpropagate(&mut self, target: f64, learning_rate: f64) -> f64 {
        let last = self.layers.len() - 1;
        let output = self.output();
        let error = output - target;
        self.layers[last].deltas[0] = sigmoid_derivative(output) * error;

        // the input layer needs no delta
        for l in (2..self.layers.len()).rev() {
            let (before, rest) = self.layers.split_at_mut(l);
            let upper = &rest[0];
            let lower = &mut before[l - 1];

            for i in 0..lower.units {
                let propagated: f64 = (0..upper.units)
                    .map(|j| upper.weight(j, i) * upper.deltas[j])
                    .sum();
                lower.deltas[i] = sigmoid_derivative(lower.outputs[i]) * propagated;
            }
        }

        for l in 1..self.layers.len() {
            let (before, rest) = self.layers.split_at_mut(l);
            let previous = &before[l - 1].outputs;
            let layer = &mut rest[0];
            let inputs = layer.inputs;

            for i in 0..layer.units {
                let step = layer.deltas[i] * learning_rate;
                let row = &mut layer.weights[i * inputs..(i + 1) * inputs];
                for (w, x) in row.iter_mut().zip(previous.iter()) {
                    *w -= step * x;
                }
            }
        }

        error
    }

    /// Forward pass followed by one backpropagation step
    pub fn train_sample(
        &mut self,
        inputs: &[f64; INPUT_UNITS],
        target: f64,
        learning_rate: f64,
    ) -> f64 {
        self.forward(inputs);
        self.backpropagate(target, learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::super::sigmoid;
    use super::*;
    use crate::types::WEIGHT_COUNT;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_returns_signed_error() {
        let mut network = Network::new();
        // zero weights always output 0.5
        let error = network.train_sample(&[0.2, 0.2, 0.2, 0.2], 0.8, 0.5);
        assert!((error - (0.5 - 0.8)).abs() < 1e-12);

        let mut network = Network::new();
        let error = network.train_sample(&[0.2, 0.2, 0.2, 0.2], 0.1, 0.5);
        assert!((error - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_output_layer_update_from_zero_weights() {
        let mut network = Network::new();
        let rate = 0.9;
        network.train_sample(&[0.2, 0.4, 0.6, 0.8], 1.0, rate);

        // every hidden output is 0.5; output delta is 0.25 * (0.5 - 1.0)
        let output_delta = 0.25 * -0.5;
        let expected = -(output_delta * 0.5 * rate);
        for unit in 0..20 {
            assert!((network.weight(2, 0, unit) - expected).abs() < 1e-12);
        }

        // hidden deltas used the pre-update (zero) output weights
        for unit in 0..20 {
            for input in 0..4 {
                assert_eq!(network.weight(1, unit, input), 0.0);
            }
        }
    }

    #[test]
    fn test_hidden_delta_uses_old_weights() {
        let mut flat = vec![0.0; WEIGHT_COUNT];
        flat[80] = 1.0; // hidden 0 -> output
        let mut network = Network::from_weights(&flat).expect("weight count matches");
        let inputs = [1.0, 0.0, 0.0, 0.0];
        let rate = 0.5;

        network.train_sample(&inputs, 0.0, rate);

        let output = sigmoid(0.5);
        let output_delta = output * (1.0 - output) * output;
        let hidden_delta = 0.25 * 1.0 * output_delta;
        let expected = -(hidden_delta * 1.0 * rate);
        assert!((network.weight(1, 0, 0) - expected).abs() < 1e-12);
        assert_eq!(network.weight(1, 0, 1), 0.0);
        assert_eq!(network.weight(1, 1, 0), 0.0);
    }

    #[test]
    fn test_repeated_steps_reduce_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut network = Network::with_random_weights(&mut rng);
        let inputs = [0.3, 0.25, 0.1, 0.8];
        let target = 0.2;

        let first = network.train_sample(&inputs, target, 0.9).abs();
        let mut last = first;
        for _ in 0..200 {
            last = network.train_sample(&inputs, target, 0.9).abs();
        }
        assert!(last < first);
        assert!(last < 0.01, "error still {}", last);
    }
}
