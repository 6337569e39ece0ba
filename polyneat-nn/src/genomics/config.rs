use crate::genomics::ActivationType;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for genome generation and inter-genome
/// operations.
///
/// # Note
/// All quantities expressing probabilities should be in the range
/// [0.0, 1.0]. Using values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome, including any bias line the
    /// domain feeds with a constant.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Activation type given to neurons created by link splits.
    pub hidden_activation: ActivationType,
    /// Activation type of output neurons.
    pub output_activation: ActivationType,
    /// Maximum magnitude of a link's weight.
    pub weight_bound: f64,
    /// Chance that each link's weight is mutated during a weight
    /// mutation pass.
    pub weight_mutation_rate: f64,
    /// Chance that a mutated weight is replaced outright rather
    /// than perturbed.
    pub weight_replacement_rate: f64,
    /// Magnitude bound of the uniform weight perturbation. Assumed
    /// to be smaller than [`weight_bound`].
    ///
    /// [`weight_bound`]: GeneticConfig::weight_bound
    pub weight_mutation_power: f64,
    /// Chance of a neuron-split mutation.
    pub add_neuron_prob: f64,
    /// Chance of a link-addition mutation.
    pub add_link_prob: f64,
    /// Chance of a link-removal mutation.
    pub remove_link_prob: f64,
    /// Maximum number of endpoint draws before a link-addition
    /// mutation gives up.
    pub max_link_addition_attempts: usize,
    /// Whether a link may connect a neuron to itself.
    pub allow_loops: bool,
    /// Chance that matching link weights are averaged during
    /// crossover, instead of copying from a randomly chosen parent.
    pub mate_by_averaging_chance: f64,
    /// Weight of excess links in the compatibility distance.
    pub excess_coeff: f64,
    /// Weight of disjoint links in the compatibility distance.
    pub disjoint_coeff: f64,
    /// Weight of the mean matched-link weight difference in the
    /// compatibility distance.
    pub weight_diff_coeff: f64,
    /// Divides the gene-count terms of the compatibility distance
    /// by the larger genome's link count.
    pub normalize_genome_size: bool,
}

impl GeneticConfig {
    /// Returns a "zero-valued" configuration: all rates are 0, the
    /// counts are 1, and every activation is the identity.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments. It
    /// is meant as a way to abbreviate configuration instantiation,
    /// or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use polyneat_nn::genomics::GeneticConfig;
    ///
    /// let config = GeneticConfig {
    ///     add_link_prob: 0.05,
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(1).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            hidden_activation: ActivationType::Identity,
            output_activation: ActivationType::Identity,
            weight_bound: 0.0,
            weight_mutation_rate: 0.0,
            weight_replacement_rate: 0.0,
            weight_mutation_power: 0.0,
            add_neuron_prob: 0.0,
            add_link_prob: 0.0,
            remove_link_prob: 0.0,
            max_link_addition_attempts: 0,
            allow_loops: false,
            mate_by_averaging_chance: 0.0,
            excess_coeff: 0.0,
            disjoint_coeff: 0.0,
            weight_diff_coeff: 0.0,
            normalize_genome_size: false,
        }
    }
}

impl Default for GeneticConfig {
    /// Workable settings for small function-approximation domains.
    fn default() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(1).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            hidden_activation: ActivationType::UnsignedSigmoid,
            output_activation: ActivationType::UnsignedSigmoid,
            weight_bound: 8.0,
            weight_mutation_rate: 0.8,
            weight_replacement_rate: 0.1,
            weight_mutation_power: 0.5,
            add_neuron_prob: 0.03,
            add_link_prob: 0.3,
            remove_link_prob: 0.01,
            max_link_addition_attempts: 20,
            allow_loops: false,
            mate_by_averaging_chance: 0.4,
            excess_coeff: 1.0,
            disjoint_coeff: 1.0,
            weight_diff_coeff: 0.4,
            normalize_genome_size: false,
        }
    }
}
