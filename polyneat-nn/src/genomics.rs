//! Genomes are the focus of evolution. They are a collection of
//! neuron genes and weighted link genes that can be instantiated as
//! a phenotype (a neural network) and progressively mutated, thus
//! adding or removing structure.
mod config;
mod genes;
mod neurons;

pub use config::GeneticConfig;
pub use genes::LinkGene;
pub use neurons::{ActivationType, NeuronGene, NeuronKind};

use polyneat::{Genome, InnovationDatabase, LoadError, Parameters, SearchMode};

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::io::{self, BufRead, Write};

/// A mutable collection of neuron and link genes, together with the
/// bookkeeping the evolutionary core maintains across a generation.
///
/// Neuron genes are ordered inputs first, then outputs, then hidden
/// neurons in creation order; link genes are kept sorted by
/// innovation ID so crossover and distance computations can align
/// two genomes in a single pass.
///
/// There is no suppressed-gene state: a neuron split removes the
/// split link and replaces it with the two new ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NNGenome {
    id: u64,
    num_inputs: usize,
    num_outputs: usize,
    neurons: Vec<NeuronGene>,
    links: Vec<LinkGene>,
    fitness: f64,
    adj_fitness: f64,
    offspring_amount: f64,
    evaluated: bool,
    parent: bool,
    behavior_slot: Option<usize>,
}

impl NNGenome {
    /// Creates a genome with the configured inputs and outputs,
    /// fully connected with zero-weight links.
    ///
    /// Input neurons get IDs `0..input_count` and output neurons
    /// follow; the link between input `i` and output `o` gets
    /// innovation ID `o + i × output_count`, so independently
    /// created genomes agree on their initial structure.
    ///
    /// # Examples
    /// ```
    /// use polyneat_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let genome = NNGenome::new(&config);
    ///
    /// assert_eq!(genome.neurons().count(), 3 + 2);
    /// assert_eq!(genome.links().count(), 3 * 2);
    /// assert!(genome.links().all(|l| (0..6).contains(&l.innovation())));
    /// ```
    pub fn new(config: &GeneticConfig) -> NNGenome {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();

        let mut neurons = Vec::with_capacity(input_count + output_count);
        for i in 0..input_count {
            neurons.push(NeuronGene::new(
                i as u64,
                NeuronKind::Input,
                ActivationType::Identity,
            ));
        }
        for o in 0..output_count {
            neurons.push(NeuronGene::new(
                (input_count + o) as u64,
                NeuronKind::Output,
                config.output_activation,
            ));
        }

        let mut links = Vec::with_capacity(input_count * output_count);
        for i in 0..input_count {
            for o in 0..output_count {
                links.push(LinkGene::new(
                    (o + i * output_count) as u64,
                    i as u64,
                    (input_count + o) as u64,
                    0.0,
                ));
            }
        }

        NNGenome {
            id: 0,
            num_inputs: input_count,
            num_outputs: output_count,
            neurons,
            links,
            fitness: 0.0,
            adj_fitness: 0.0,
            offspring_amount: 0.0,
            evaluated: false,
            parent: false,
            behavior_slot: None,
        }
    }

    /// Returns an iterator over the neuron genes, inputs first,
    /// then outputs, then hidden neurons.
    pub fn neurons(&self) -> impl Iterator<Item = &NeuronGene> {
        self.neurons.iter()
    }

    /// Returns an iterator over the link genes, sorted by
    /// innovation ID.
    pub fn links(&self) -> impl Iterator<Item = &LinkGene> {
        self.links.iter()
    }

    /// Returns the neuron gene with the passed ID, if present.
    pub fn neuron(&self, id: u64) -> Option<&NeuronGene> {
        self.neurons.iter().find(|n| n.id() == id)
    }

    /// Whether a link with the passed endpoints exists.
    pub fn contains_link(&self, from: u64, to: u64) -> bool {
        self.links.iter().any(|l| l.from() == from && l.to() == to)
    }

    /// Adds a hidden neuron gene. Intended for seeding custom
    /// topologies; evolution adds neurons through
    /// [`mutate_add_neuron`].
    ///
    /// [`mutate_add_neuron`]: NNGenome::mutate_add_neuron
    pub fn add_hidden_neuron(&mut self, id: u64, activation: ActivationType) {
        debug_assert!(self.neuron(id).is_none(), "duplicate neuron id");
        self.neurons
            .push(NeuronGene::new(id, NeuronKind::Hidden, activation));
    }

    /// Adds a link gene, keeping the innovation order.
    pub fn add_link(&mut self, link: LinkGene) {
        debug_assert!(
            !self.contains_link(link.from(), link.to()),
            "duplicate link endpoints"
        );
        self.insert_link(link);
    }

    /// Sets the weight of the link with the passed innovation ID.
    /// Returns false if no such link exists.
    pub fn set_link_weight(&mut self, innovation: u64, weight: f64) -> bool {
        match self.links.iter_mut().find(|l| l.innovation() == innovation) {
            Some(link) => {
                link.set_weight(weight);
                true
            }
            None => false,
        }
    }

    fn insert_link(&mut self, link: LinkGene) {
        let position = self
            .links
            .partition_point(|l| l.innovation() < link.innovation());
        self.links.insert(position, link);
    }

    /// Splits a random link: the link is removed, a hidden neuron
    /// takes its place, and two links are created around it. The
    /// incoming link starts at weight 1 and the outgoing one keeps
    /// the split link's weight, which preserves the network's
    /// behavior reasonably well.
    ///
    /// IDs come from the innovation registry, so the same split in
    /// another genome of the same generation yields the same neuron
    /// and link IDs.
    pub fn mutate_add_neuron(
        &mut self,
        config: &GeneticConfig,
        innovations: &mut InnovationDatabase,
        rng: &mut dyn RngCore,
    ) {
        if self.links.is_empty() {
            return;
        }
        let index = rng.gen_range(0..self.links.len());
        let split = self.links[index];

        let (neuron, in_link, out_link) =
            innovations.register_neuron_split(split.innovation(), split.from(), split.to());
        if self.neuron(neuron).is_some() {
            // This genome already performed the same split.
            return;
        }

        self.links.remove(index);
        self.neurons
            .push(NeuronGene::new(neuron, NeuronKind::Hidden, config.hidden_activation));
        self.insert_link(LinkGene::new(in_link, split.from(), neuron, 1.0));
        self.insert_link(LinkGene::new(out_link, neuron, split.to(), split.weight()));
    }

    /// Adds a link between two random neurons, drawing its ID from
    /// the innovation registry. Gives up after the configured
    /// number of attempts if only duplicates, input targets, or
    /// disallowed loops come up.
    pub fn mutate_add_link(
        &mut self,
        config: &GeneticConfig,
        innovations: &mut InnovationDatabase,
        rng: &mut dyn RngCore,
    ) {
        for _ in 0..config.max_link_addition_attempts {
            let from = self.neurons[rng.gen_range(0..self.neurons.len())].id();
            let target = &self.neurons[rng.gen_range(0..self.neurons.len())];
            if target.kind() == NeuronKind::Input {
                continue;
            }
            let to = target.id();
            if from == to && !config.allow_loops {
                continue;
            }
            if self.contains_link(from, to) {
                continue;
            }

            let innovation = innovations.register_link(from, to);
            let weight = rng
                .gen_range(-config.weight_mutation_power..=config.weight_mutation_power);
            self.insert_link(LinkGene::new(innovation, from, to, weight));
            return;
        }
    }

    /// Removes a random link. The last link is never removed.
    pub fn mutate_remove_link(&mut self, rng: &mut dyn RngCore) {
        if self.links.len() <= 1 {
            return;
        }
        let index = rng.gen_range(0..self.links.len());
        self.links.remove(index);
    }

    /// Perturbs or replaces link weights, clamping them to the
    /// configured bound.
    pub fn mutate_weights(&mut self, config: &GeneticConfig, rng: &mut dyn RngCore) {
        for link in &mut self.links {
            if rng.gen::<f64>() >= config.weight_mutation_rate {
                continue;
            }
            if rng.gen::<f64>() < config.weight_replacement_rate {
                link.set_weight(rng.gen_range(-config.weight_bound..=config.weight_bound));
            } else {
                let nudged = link.weight()
                    + rng.gen_range(-config.weight_mutation_power..=config.weight_mutation_power);
                link.set_weight(nudged.clamp(-config.weight_bound, config.weight_bound));
            }
        }
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome {} ({} neurons, {} links, fitness {:.4})",
            self.id,
            self.neurons.len(),
            self.links.len(),
            self.fitness
        )
    }
}

impl Genome for NNGenome {
    type Config = GeneticConfig;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    fn adj_fitness(&self) -> f64 {
        self.adj_fitness
    }

    fn set_adj_fitness(&mut self, fitness: f64) {
        self.adj_fitness = fitness;
    }

    fn offspring_amount(&self) -> f64 {
        self.offspring_amount
    }

    fn set_offspring_amount(&mut self, amount: f64) {
        self.offspring_amount = amount;
    }

    fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    fn set_evaluated(&mut self, evaluated: bool) {
        self.evaluated = evaluated;
    }

    fn is_parent(&self) -> bool {
        self.parent
    }

    fn set_parent(&mut self, parent: bool) {
        self.parent = parent;
    }

    fn num_links(&self) -> usize {
        self.links.len()
    }

    fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    fn max_link_innovation(&self) -> u64 {
        self.links.last().map_or(0, LinkGene::innovation)
    }

    fn max_neuron_id(&self) -> u64 {
        self.neurons.iter().map(NeuronGene::id).max().unwrap_or(0)
    }

    fn behavior_slot(&self) -> Option<usize> {
        self.behavior_slot
    }

    fn set_behavior_slot(&mut self, slot: Option<usize>) {
        self.behavior_slot = slot;
    }

    /// Excess and disjoint link counts plus the mean weight
    /// difference of matched links, each weighted by its configured
    /// coefficient. The gene-count terms are optionally normalized
    /// by the larger genome's link count.
    fn compatibility_distance(&self, other: &Self, config: &GeneticConfig) -> f64 {
        let (mut excess, mut disjoint, mut matching) = (0usize, 0usize, 0usize);
        let mut weight_difference = 0.0;

        let (mut i, mut j) = (0, 0);
        while i < self.links.len() || j < other.links.len() {
            if i >= self.links.len() {
                excess += other.links.len() - j;
                break;
            }
            if j >= other.links.len() {
                excess += self.links.len() - i;
                break;
            }
            let a = &self.links[i];
            let b = &other.links[j];
            if a.innovation() == b.innovation() {
                matching += 1;
                weight_difference += (a.weight() - b.weight()).abs();
                i += 1;
                j += 1;
            } else if a.innovation() < b.innovation() {
                disjoint += 1;
                i += 1;
            } else {
                disjoint += 1;
                j += 1;
            }
        }

        let normalizer = if config.normalize_genome_size {
            self.links.len().max(other.links.len()).max(1) as f64
        } else {
            1.0
        };
        let mean_weight_difference = if matching > 0 {
            weight_difference / matching as f64
        } else {
            0.0
        };

        (config.excess_coeff * excess as f64 + config.disjoint_coeff * disjoint as f64)
            / normalizer
            + config.weight_diff_coeff * mean_weight_difference
    }

    fn mutate(
        &mut self,
        config: &GeneticConfig,
        _params: &Parameters,
        mode: SearchMode,
        innovations: &mut InnovationDatabase,
        rng: &mut dyn RngCore,
    ) {
        // The search mode gates structure: growth only while
        // complexifying, shrinkage only while simplifying (which
        // also absorbs the addition probability mass).
        let (add_neuron, add_link, remove_link) = match mode {
            SearchMode::Complexifying => (config.add_neuron_prob, config.add_link_prob, 0.0),
            SearchMode::Simplifying => (
                0.0,
                0.0,
                config.remove_link_prob + config.add_neuron_prob + config.add_link_prob,
            ),
            SearchMode::Blended => (
                config.add_neuron_prob,
                config.add_link_prob,
                config.remove_link_prob,
            ),
        };

        if rng.gen::<f64>() < add_neuron {
            self.mutate_add_neuron(config, innovations, rng);
        } else if rng.gen::<f64>() < add_link {
            self.mutate_add_link(config, innovations, rng);
        } else if rng.gen::<f64>() < remove_link {
            self.mutate_remove_link(rng);
        } else {
            self.mutate_weights(config, rng);
        }
    }

    /// Matched links are inherited from either parent at random (or
    /// averaged, with the configured chance); disjoint and excess
    /// links come from `self`, the fitter parent. Neuron genes are
    /// rebuilt from the fixed inputs and outputs plus whatever the
    /// inherited links reference.
    fn crossover(&self, other: &Self, config: &GeneticConfig, rng: &mut dyn RngCore) -> Self {
        let mut links = Vec::with_capacity(self.links.len());
        let (mut i, mut j) = (0, 0);
        while i < self.links.len() {
            if j >= other.links.len() {
                links.push(self.links[i]);
                i += 1;
                continue;
            }
            let a = &self.links[i];
            let b = &other.links[j];
            if a.innovation() == b.innovation() {
                let mut gene = if rng.gen::<bool>() { *a } else { *b };
                if rng.gen::<f64>() < config.mate_by_averaging_chance {
                    gene.set_weight((a.weight() + b.weight()) / 2.0);
                }
                links.push(gene);
                i += 1;
                j += 1;
            } else if a.innovation() < b.innovation() {
                links.push(*a);
                i += 1;
            } else {
                j += 1;
            }
        }

        let mut neurons: Vec<NeuronGene> = self
            .neurons
            .iter()
            .filter(|n| n.kind() != NeuronKind::Hidden)
            .copied()
            .collect();
        for link in &links {
            for endpoint in [link.from(), link.to()] {
                if neurons.iter().any(|n| n.id() == endpoint) {
                    continue;
                }
                let gene = self
                    .neuron(endpoint)
                    .or_else(|| other.neuron(endpoint))
                    .copied()
                    .expect("link endpoint missing from both parents");
                neurons.push(gene);
            }
        }

        NNGenome {
            id: 0,
            num_inputs: self.num_inputs,
            num_outputs: self.num_outputs,
            neurons,
            links,
            fitness: 0.0,
            adj_fitness: 0.0,
            offspring_amount: 0.0,
            evaluated: false,
            parent: false,
            behavior_slot: None,
        }
    }

    fn randomize_link_weights(&mut self, range: f64, rng: &mut dyn RngCore) {
        for link in &mut self.links {
            link.set_weight(rng.gen_range(-range..=range));
        }
    }

    fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(
            writer,
            "GenomeStart {} {} {}",
            self.id, self.num_inputs, self.num_outputs
        )?;
        for neuron in &self.neurons {
            writeln!(writer, "Neuron {} {} {}", neuron.id(), neuron.kind(), neuron.activation())?;
        }
        for link in &self.links {
            writeln!(
                writer,
                "Link {} {} {} {:3.8}",
                link.innovation(),
                link.from(),
                link.to(),
                link.weight()
            )?;
        }
        writeln!(writer, "GenomeEnd")
    }

    fn read_from(reader: &mut dyn BufRead) -> Result<NNGenome, LoadError> {
        let header = read_snapshot_line(reader)?;
        let mut fields = header
            .strip_prefix("GenomeStart")
            .ok_or_else(|| LoadError::Malformed(header.clone()))?
            .split_whitespace();
        let id = next_field(&mut fields, &header)?;
        let num_inputs = next_field(&mut fields, &header)?;
        let num_outputs = next_field(&mut fields, &header)?;

        let mut neurons = Vec::new();
        let mut links = Vec::new();
        loop {
            let line = read_snapshot_line(reader)?;
            if line == "GenomeEnd" {
                break;
            } else if let Some(rest) = line.strip_prefix("Neuron") {
                let mut fields = rest.split_whitespace();
                let id = next_field(&mut fields, &line)?;
                let kind = next_field(&mut fields, &line)?;
                let activation = next_field(&mut fields, &line)?;
                neurons.push(NeuronGene::new(id, kind, activation));
            } else if let Some(rest) = line.strip_prefix("Link") {
                let mut fields = rest.split_whitespace();
                let innovation = next_field(&mut fields, &line)?;
                let from = next_field(&mut fields, &line)?;
                let to = next_field(&mut fields, &line)?;
                let weight = next_field(&mut fields, &line)?;
                links.push(LinkGene::new(innovation, from, to, weight));
            } else {
                return Err(LoadError::Malformed(line));
            }
        }

        Ok(NNGenome {
            id,
            num_inputs,
            num_outputs,
            neurons,
            links,
            fitness: 0.0,
            adj_fitness: 0.0,
            offspring_amount: 0.0,
            evaluated: false,
            parent: false,
            behavior_slot: None,
        })
    }
}

fn read_snapshot_line(reader: &mut dyn BufRead) -> Result<String, LoadError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(LoadError::Malformed("unexpected end of file".into()));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn next_field<T: std::str::FromStr>(
    fields: &mut std::str::SplitWhitespace<'_>,
    line: &str,
) -> Result<T, LoadError> {
    fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| LoadError::Malformed(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            hidden_activation: ActivationType::UnsignedSigmoid,
            excess_coeff: 1.0,
            disjoint_coeff: 1.0,
            weight_diff_coeff: 0.4,
            ..GeneticConfig::zero()
        }
    }

    fn registry_for(genome: &NNGenome) -> InnovationDatabase {
        InnovationDatabase::new(genome.max_link_innovation() + 1, genome.max_neuron_id() + 1)
    }

    #[test]
    fn new_genome_is_fully_connected() {
        let genome = NNGenome::new(&config(3, 2));
        assert_eq!(genome.neurons().count(), 5);
        assert_eq!(genome.links().count(), 6);
        assert_eq!(genome.max_link_innovation(), 5);
        assert_eq!(genome.max_neuron_id(), 4);
        for link in genome.links() {
            assert!(link.from() < 3);
            assert!((3..5).contains(&link.to()));
        }
    }

    #[test]
    fn split_rewires_the_split_link() {
        let mut genome = NNGenome::new(&config(1, 1));
        genome.set_link_weight(0, 2.5);
        let mut innovations = registry_for(&genome);
        let mut rng = SmallRng::seed_from_u64(0);

        genome.mutate_add_neuron(&config(1, 1), &mut innovations, &mut rng);

        assert_eq!(genome.neurons().count(), 3);
        assert_eq!(genome.links().count(), 2);
        assert!(!genome.contains_link(0, 1));
        let hidden = genome
            .neurons()
            .find(|n| n.kind() == NeuronKind::Hidden)
            .unwrap();
        let incoming = genome
            .links()
            .find(|l| l.to() == hidden.id())
            .unwrap();
        let outgoing = genome
            .links()
            .find(|l| l.from() == hidden.id())
            .unwrap();
        assert_eq!(incoming.weight(), 1.0);
        assert_eq!(outgoing.weight(), 2.5);
    }

    #[test]
    fn identical_splits_share_ids_across_genomes() {
        let config = config(1, 1);
        let mut first = NNGenome::new(&config);
        let mut second = NNGenome::new(&config);
        let mut innovations = registry_for(&first);
        let mut rng = SmallRng::seed_from_u64(0);

        first.mutate_add_neuron(&config, &mut innovations, &mut rng);
        second.mutate_add_neuron(&config, &mut innovations, &mut rng);

        let ids = |genome: &NNGenome| -> Vec<u64> {
            genome.links().map(LinkGene::innovation).collect()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.max_neuron_id(), second.max_neuron_id());
    }

    #[test]
    fn add_link_skips_duplicates_and_input_targets() {
        let config = config(2, 1);
        let mut genome = NNGenome::new(&config);
        let mut innovations = registry_for(&genome);
        let mut rng = SmallRng::seed_from_u64(7);

        // Both feasible forward links already exist and loops are
        // disallowed, so nothing can be added.
        let mut attempts_config = config.clone();
        attempts_config.max_link_addition_attempts = 50;
        genome.mutate_add_link(&attempts_config, &mut innovations, &mut rng);
        assert_eq!(genome.links().count(), 2);
    }

    #[test]
    fn remove_link_never_empties_the_genome() {
        let mut genome = NNGenome::new(&config(1, 1));
        let mut rng = SmallRng::seed_from_u64(0);
        genome.mutate_remove_link(&mut rng);
        assert_eq!(genome.links().count(), 1);
    }

    #[test]
    fn weight_mutation_respects_the_bound() {
        let mut config = config(3, 2);
        config.weight_mutation_rate = 1.0;
        config.weight_mutation_power = 10.0;
        config.weight_bound = 3.0;
        let mut genome = NNGenome::new(&config);
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..20 {
            genome.mutate_weights(&config, &mut rng);
        }
        assert!(genome.links().all(|l| l.weight().abs() <= 3.0));
    }

    #[test]
    fn crossover_aligns_matching_links() {
        let config = config(2, 1);
        let mut fitter = NNGenome::new(&config);
        let mut other = NNGenome::new(&config);
        for innovation in 0..2 {
            fitter.set_link_weight(innovation, 1.0);
            other.set_link_weight(innovation, -1.0);
        }
        let mut rng = SmallRng::seed_from_u64(3);

        let baby = fitter.crossover(&other, &config, &mut rng);
        assert_eq!(baby.links().count(), 2);
        let innovations: Vec<u64> = baby.links().map(LinkGene::innovation).collect();
        assert_eq!(innovations, [0, 1]);
        assert!(baby.links().all(|l| l.weight().abs() == 1.0));
    }

    #[test]
    fn crossover_inherits_extra_structure_from_the_fitter_parent() {
        let config = config(2, 1);
        let mut fitter = NNGenome::new(&config);
        let other = NNGenome::new(&config);
        fitter.add_hidden_neuron(5, ActivationType::UnsignedSigmoid);
        fitter.add_link(LinkGene::new(7, 0, 5, 0.5));
        fitter.add_link(LinkGene::new(8, 5, 2, 0.5));
        let mut rng = SmallRng::seed_from_u64(0);

        let baby = fitter.crossover(&other, &config, &mut rng);
        assert!(baby.neuron(5).is_some());
        assert!(baby.contains_link(0, 5));
        assert!(baby.contains_link(5, 2));

        let reverse = other.crossover(&fitter, &config, &mut rng);
        assert!(reverse.neuron(5).is_none());
        assert_eq!(reverse.links().count(), 2);
    }

    #[test]
    fn compatibility_distance_counts_structural_mismatch() {
        let config = config(2, 1);
        let mut grown = NNGenome::new(&config);
        let flat = NNGenome::new(&config);
        assert_eq!(grown.compatibility_distance(&flat, &config), 0.0);

        grown.add_hidden_neuron(5, ActivationType::UnsignedSigmoid);
        grown.add_link(LinkGene::new(7, 0, 5, 0.0));
        grown.add_link(LinkGene::new(8, 5, 2, 0.0));

        assert_eq!(grown.compatibility_distance(&flat, &config), 2.0);
        // Distance is symmetric.
        assert_eq!(flat.compatibility_distance(&grown, &config), 2.0);
    }

    #[test]
    fn weight_differences_contribute_to_distance() {
        let config = config(1, 1);
        let mut heavy = NNGenome::new(&config);
        let light = NNGenome::new(&config);
        heavy.set_link_weight(0, 5.0);

        // One matching link with weight difference 5, weighted 0.4.
        assert_eq!(heavy.compatibility_distance(&light, &config), 2.0);
    }

    #[test]
    fn genome_block_round_trips_byte_identically() {
        let config = config(3, 1);
        let mut genome = NNGenome::new(&config);
        let mut rng = SmallRng::seed_from_u64(11);
        genome.randomize_link_weights(2.0, &mut rng);
        genome.add_hidden_neuron(9, ActivationType::Tanh);
        genome.add_link(LinkGene::new(12, 0, 9, 0.25));
        genome.set_id(41);

        let mut first = Vec::new();
        genome.write_to(&mut first).unwrap();
        let reloaded = NNGenome::read_from(&mut first.as_slice()).unwrap();
        let mut second = Vec::new();
        reloaded.write_to(&mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(reloaded.id(), 41);
        assert_eq!(reloaded.num_inputs(), 3);
        assert_eq!(reloaded.num_outputs(), 1);
        assert_eq!(reloaded.links().count(), genome.links().count());
    }
}
