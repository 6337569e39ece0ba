//! Neural networks instantiated from genomes.

use crate::genomics::{ActivationType, NNGenome};

use polyneat::Genome;

use ahash::RandomState;

use std::collections::HashMap;

struct Connection {
    source: usize,
    weight: f64,
}

struct Unit {
    activation: ActivationType,
    inputs: Vec<Connection>,
    value: f64,
}

/// A synchronously activated network suited for function
/// approximation.
///
/// One activation pass recomputes every non-input unit from the
/// previous pass's values; [`evaluate_at`] runs enough passes for a
/// signal to cross the longest feed-forward path (one more than the
/// hidden-unit count), so recurrent links act as one-pass delays.
///
/// [`evaluate_at`]: Network::evaluate_at
pub struct Network {
    units: Vec<Unit>,
    input_count: usize,
    output_count: usize,
    depth: usize,
}

impl From<&NNGenome> for Network {
    fn from(genome: &NNGenome) -> Network {
        let index_of: HashMap<u64, usize, RandomState> = genome
            .neurons()
            .enumerate()
            .map(|(index, neuron)| (neuron.id(), index))
            .collect();

        let mut units: Vec<Unit> = genome
            .neurons()
            .map(|neuron| Unit {
                activation: neuron.activation(),
                inputs: Vec::new(),
                value: 0.0,
            })
            .collect();
        for link in genome.links() {
            let source = index_of[&link.from()];
            let target = index_of[&link.to()];
            units[target].inputs.push(Connection {
                source,
                weight: link.weight(),
            });
        }

        let hidden = units.len() - genome.num_inputs() - genome.num_outputs();
        Network {
            units,
            input_count: genome.num_inputs(),
            output_count: genome.num_outputs(),
            depth: hidden + 1,
        }
    }
}

impl Network {
    /// Resets every unit to a quiescent state.
    pub fn clear_state(&mut self) {
        for unit in &mut self.units {
            unit.value = 0.0;
        }
    }

    /// Returns the network's outputs at the N-dimensional point
    /// given by `inputs`, after clearing any previous state.
    pub fn evaluate_at(&mut self, inputs: &[f64]) -> Vec<f64> {
        assert_eq!(inputs.len(), self.input_count, "input arity mismatch");

        self.clear_state();
        for (unit, &input) in self.units.iter_mut().zip(inputs) {
            unit.value = input;
        }
        for _ in 0..self.depth {
            self.activate_pass();
        }
        self.units[self.input_count..self.input_count + self.output_count]
            .iter()
            .map(|unit| unit.value)
            .collect()
    }

    fn activate_pass(&mut self) {
        let previous: Vec<f64> = self.units.iter().map(|unit| unit.value).collect();
        for (index, unit) in self.units.iter_mut().enumerate() {
            if index < self.input_count {
                continue;
            }
            let excitation: f64 = unit
                .inputs
                .iter()
                .map(|connection| previous[connection.source] * connection.weight)
                .sum();
            unit.value = unit.activation.apply(excitation);
        }
    }
}
