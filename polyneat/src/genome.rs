use crate::errors::LoadError;
use crate::innovation::InnovationDatabase;
use crate::parameters::Parameters;
use crate::populations::SearchMode;

use rand::RngCore;

use std::io::{self, BufRead, Write};

/// An interface for genomes that can be evolved by a
/// [`Population`].
///
/// The population never inspects gene structure; everything it
/// needs is exposed here: identity, the fitness bookkeeping fields
/// it maintains across a generation, structural summaries for
/// complexity tracking, and the genetic operators. The associated
/// `Config` carries genome-side tunables (mutation rates, distance
/// coefficients, ...) and is threaded through the operators, while
/// [`Parameters`] carries the population-side ones.
///
/// Randomized operators take `&mut dyn RngCore` so all randomness
/// flows from the population's seeded generator.
///
/// [`Population`]: crate::Population
pub trait Genome: Clone {
    type Config;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);

    fn fitness(&self) -> f64;
    fn set_fitness(&mut self, fitness: f64);
    /// Fitness after explicit sharing and age/stagnation modifiers.
    /// Written by the population during fitness adjustment.
    fn adj_fitness(&self) -> f64;
    fn set_adj_fitness(&mut self, fitness: f64);
    /// Fractional offspring allotment, written during offspring
    /// counting.
    fn offspring_amount(&self) -> f64;
    fn set_offspring_amount(&mut self, amount: f64);

    /// Whether the genome has been evaluated since its birth. The
    /// steady-state loop only ever culls evaluated members.
    fn is_evaluated(&self) -> bool;
    fn set_evaluated(&mut self, evaluated: bool);
    /// Parent mark consumed by the post-reproduction cull.
    fn is_parent(&self) -> bool;
    fn set_parent(&mut self, parent: bool);

    fn num_links(&self) -> usize;
    fn num_inputs(&self) -> usize;
    fn num_outputs(&self) -> usize;
    /// Highest link innovation ID present in the genome. Seeds the
    /// innovation registry's link counter.
    fn max_link_innovation(&self) -> u64;
    /// Highest neuron ID present in the genome. Seeds the
    /// innovation registry's neuron counter.
    fn max_neuron_id(&self) -> u64;

    /// Index into the population's behavior pool, when novelty
    /// search is active.
    fn behavior_slot(&self) -> Option<usize>;
    fn set_behavior_slot(&mut self, slot: Option<usize>);

    /// Genetic distance to another genome.
    fn compatibility_distance(&self, other: &Self, config: &Self::Config) -> f64;

    /// Whether two genomes belong in the same species.
    fn is_compatible_with(&self, other: &Self, threshold: f64, config: &Self::Config) -> bool {
        self.compatibility_distance(other, config) <= threshold
    }

    /// Mutates the genome in place. Structural mutations must draw
    /// their IDs from `innovations`, and the operator is expected to
    /// respect the current [`SearchMode`] (no additions while
    /// simplifying, no removals while complexifying).
    fn mutate(
        &mut self,
        config: &Self::Config,
        params: &Parameters,
        mode: SearchMode,
        innovations: &mut InnovationDatabase,
        rng: &mut dyn RngCore,
    );

    /// Combines two genomes into a child. Callers pass the fitter
    /// parent as `self`; disjoint and excess genes are inherited
    /// from it.
    fn crossover(&self, other: &Self, config: &Self::Config, rng: &mut dyn RngCore) -> Self;

    /// Resets every link weight to a uniform sample from
    /// `[-range, range]`.
    fn randomize_link_weights(&mut self, range: f64, rng: &mut dyn RngCore);

    /// Writes the genome as a block of the population snapshot.
    fn write_to(&self, writer: &mut dyn Write) -> io::Result<()>;

    /// Reads a genome block previously written by [`write_to`].
    ///
    /// [`write_to`]: Genome::write_to
    fn read_from(reader: &mut dyn BufRead) -> Result<Self, LoadError>;
}
