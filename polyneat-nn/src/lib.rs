//! A neural-network genome for the `polyneat` evolutionary core,
//! along with a network phenotype to run it.
//!
//! [`NNGenome`] implements `polyneat::Genome`: neuron genes and
//! weighted link genes, structural mutation (link addition, link
//! removal, and neuron splits registered against the population's
//! innovation database), weight mutation, innovation-aligned
//! crossover, and a compatibility distance built from excess genes,
//! disjoint genes and weight differences.
//!
//! [`Network`] instantiates a genome as a synchronously activated
//! network suitable for function approximation.
//!
//! # Example usage: evolving an XOR approximator
//! ```
//! use polyneat::{Parameters, Population};
//! use polyneat_nn::genomics::{GeneticConfig, NNGenome};
//! use polyneat_nn::networks::Network;
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(genome: &NNGenome) -> f64 {
//!     let mut network = Network::from(genome);
//!     let rows = [
//!         ([0.0, 0.0, 1.0], 0.0),
//!         ([0.0, 1.0, 1.0], 1.0),
//!         ([1.0, 0.0, 1.0], 1.0),
//!         ([1.0, 1.0, 1.0], 0.0),
//!     ];
//!     -rows
//!         .iter()
//!         .map(|(inputs, target)| (network.evaluate_at(inputs)[0] - target).abs())
//!         .sum::<f64>()
//! }
//!
//! let config = GeneticConfig {
//!     input_count: NonZeroUsize::new(3).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let params = Parameters {
//!     population_size: 40,
//!     compat_threshold: 2.0,
//!     ..Parameters::default()
//! };
//!
//! let seed = NNGenome::new(&config);
//! let mut population: Population<NNGenome> =
//!     Population::new(seed, config, params, true, 1.0, 0);
//! for _ in 0..5 {
//!     population.evaluate_fitness(evaluate_xor);
//!     population.epoch();
//! }
//! assert!(population.best_fitness_ever() > -4.0);
//! ```

pub mod genomics;
pub mod networks;
