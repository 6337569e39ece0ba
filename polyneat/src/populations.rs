//! A Population is a collection of genomes grouped into species
//! that can be evolved generationally ([`epoch`]) or steady-state,
//! one birth and death at a time ([`tick`]), with an externally
//! supplied fitness evaluation as the source of selective pressure.
//!
//! [`epoch`]: Population::epoch
//! [`tick`]: Population::tick
mod log;
mod novelty;
mod phased;
mod serialize;
mod species;

pub use log::{EvolutionLogger, GenerationMemberRecord, Log, ReportingLevel, Stats};
pub use novelty::{NullBehavior, PhenotypeBehavior};
pub use phased::SearchMode;
pub use species::Species;

use crate::genome::Genome;
use crate::innovation::InnovationDatabase;
use crate::parameters::Parameters;
use phased::PhasedSearch;

use ::log::debug;
use rand::prelude::{Rng, SeedableRng};
use rand::rngs::SmallRng;

/// Fitness floor applied to unevaluated or degenerate members at
/// the start of a steady-state step.
const TICK_FITNESS_FLOOR: f64 = 0.00001;

/// A stable reference to a genome inside a population, valid until
/// the next structural change (the next epoch or tick). Returned by
/// [`Population::tick`] so the newborn can be evaluated before the
/// following step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenomeHandle {
    species: usize,
    member: usize,
}

/// A population of genomes, partitioned into species.
///
/// The population owns every genome, its [`Parameters`] copy, the
/// genome configuration, the [`InnovationDatabase`] and a seeded
/// RNG, so runs are deterministic given the seed. The `B` parameter
/// is the behavior descriptor used by novelty search; it defaults
/// to [`NullBehavior`] for ordinary fitness-driven evolution.
pub struct Population<G: Genome, B = NullBehavior> {
    species: Vec<Species<G>>,
    innovations: InnovationDatabase,
    params: Parameters,
    config: G::Config,
    rng: SmallRng,
    generation: usize,
    num_evaluations: usize,
    next_genome_id: u64,
    next_species_id: u64,
    best_fitness_ever: f64,
    best_genome_ever: Option<G>,
    current_best_genome: Option<G>,
    gens_since_best_fitness_last_changed: usize,
    phased: PhasedSearch,
    behaviors: Vec<B>,
    archive: Vec<B>,
    gens_since_last_archiving: usize,
    quick_add_counter: usize,
}

impl<G: Genome, B> Population<G, B> {
    /// Creates a population of `params.population_size` clones of
    /// the seed genome, optionally randomizing their link weights
    /// over `[-randomization_range, randomization_range]`, and
    /// speciates them.
    ///
    /// The innovation registry's counters start just past the
    /// seed's own IDs, so structural mutations never collide with
    /// the seed topology.
    pub fn new(
        seed: G,
        config: G::Config,
        params: Parameters,
        randomize_weights: bool,
        randomization_range: f64,
        rng_seed: u64,
    ) -> Population<G, B> {
        assert!(params.population_size > 0, "population size must be positive");

        let mut rng = SmallRng::seed_from_u64(rng_seed);
        let mut genomes = Vec::with_capacity(params.population_size);
        for i in 0..params.population_size {
            let mut genome = seed.clone();
            genome.set_id(i as u64);
            if randomize_weights {
                genome.randomize_link_weights(randomization_range, &mut rng);
            }
            genomes.push(genome);
        }

        let innovations =
            InnovationDatabase::new(seed.max_link_innovation() + 1, seed.max_neuron_id() + 1);

        let mut population = Population {
            species: Vec::new(),
            innovations,
            rng,
            generation: 0,
            num_evaluations: 0,
            next_genome_id: params.population_size as u64,
            next_species_id: 1,
            best_fitness_ever: f64::NEG_INFINITY,
            best_genome_ever: None,
            current_best_genome: None,
            gens_since_best_fitness_last_changed: 0,
            phased: PhasedSearch::new(&params),
            behaviors: Vec::new(),
            archive: Vec::new(),
            gens_since_last_archiving: 0,
            quick_add_counter: 0,
            params,
            config,
        };
        population.speciate(genomes);
        population.current_best_genome = Some(population.species[0].individuals[0].clone());
        population.sort();
        let mpc = population.current_mean_complexity();
        population.phased.prime(mpc);
        population
    }

    /// Evaluates the fitness of each genome in the population using
    /// the passed evaluator, marking every member evaluated.
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E)
    where
        E: FnMut(&G) -> f64,
    {
        for genome in self.species.iter_mut().flat_map(|s| s.individuals.iter_mut()) {
            let fitness = evaluator(genome);
            assert!(!fitness.is_nan(), "fitness evaluator returned NaN");
            genome.set_fitness(fitness);
            genome.set_evaluated(true);
        }
    }

    /// Evolves the population by one generation: speciation
    /// bookkeeping, fitness sharing, offspring allotment, culling,
    /// reproduction against a frozen parent snapshot, and the
    /// phased-search and delta-coding adjustments.
    ///
    /// Every member must have been evaluated; the population size
    /// is restored exactly by the end of the call.
    pub fn epoch(&mut self) {
        assert!(!self.species.is_empty(), "epoch on an empty population");

        // The generational loop does not run in realtime, so every
        // member counts as evaluated.
        for genome in self.species.iter_mut().flat_map(|s| s.individuals.iter_mut()) {
            genome.set_evaluated(true);
        }

        self.sort();
        self.update_species();

        for species in &mut self.species {
            species.adjust_fitness(&self.params);
        }
        self.count_offspring();

        self.gens_since_best_fitness_last_changed += 1;
        self.refresh_fitness_records();

        self.adjust_compat_threshold_generational();
        self.apply_delta_coding();

        let mpc = self.current_mean_complexity();
        if self
            .phased
            .update(mpc, self.gens_since_best_fitness_last_changed, &self.params)
        {
            debug!(
                "phased search entered {:?} at generation {}",
                self.phased.mode, self.generation
            );
            for species in &mut self.species {
                species.reset_age();
            }
        }

        for species in &mut self.species {
            species.kill_worst(&self.params);
        }

        self.reproduce();

        for species in &mut self.species {
            species.kill_old_parents();
        }
        self.species.retain(|s| !s.is_empty());

        for species in &mut self.species {
            let leader = species.individuals[0].clone();
            species.set_representative(leader);
        }

        // Offspring quotas can fall short of the population size by
        // rounding slack; pad with clones of the leading species'
        // leader.
        let mut total: usize = self.species.iter().map(Species::len).sum();
        while total < self.params.population_size {
            let clone = self.species[0].individuals[0].clone();
            self.species[0].add_individual(clone);
            total += 1;
        }

        self.generation += 1;
        if !self.params.innovations_forever {
            self.innovations.flush();
        }
    }

    /// Sorts each species' members by descending raw fitness, then
    /// the species by descending best fitness.
    pub fn sort(&mut self) {
        for species in &mut self.species {
            species.sort_individuals();
        }
        self.species.sort_by(|a, b| {
            b.best_fitness
                .partial_cmp(&a.best_fitness)
                .unwrap_or_else(|| panic!("invalid species fitnesses detected (NaN)"))
        });
    }

    /// Ages every species, clears its quota, and marks the first
    /// species matching the all-time best fitness as the best one.
    /// If the best-species identity changed, the previous holder's
    /// age is reset so it is not suddenly starved to death.
    fn update_species(&mut self) {
        // The holder of the flag can die off despite the stagnation
        // exemption (it may have been flagged on a fitness tie), so
        // its absence past generation 0 is tolerated.
        let old_best_index = self.species.iter().position(|s| s.is_best_species);
        let old_best_id = old_best_index.map(|i| self.species[i].id);

        for species in &mut self.species {
            species.is_best_species = false;
        }

        // Only one species is marked, in case several are tied.
        let mut new_best_id = None;
        for species in &mut self.species {
            species.increase_age();
            species.increase_gens_no_improvement();
            species.offspring_required = 0;

            if new_best_id.is_none() && species.best_fitness >= self.best_fitness_ever {
                species.is_best_species = true;
                new_best_id = Some(species.id);
            }
        }

        if old_best_id != new_best_id {
            if let Some(index) = old_best_index {
                self.species[index].reset_age();
            }
        }
    }

    /// Computes each member's fractional offspring allotment as its
    /// share of the mean adjusted fitness, then totals the species
    /// quotas.
    fn count_offspring(&mut self) {
        let total_adjusted: f64 = self
            .species
            .iter()
            .flat_map(|s| s.individuals.iter())
            .map(G::adj_fitness)
            .sum();
        assert!(
            total_adjusted > 0.0,
            "total adjusted fitness must be positive"
        );

        let average = total_adjusted / self.params.population_size as f64;
        for genome in self.species.iter_mut().flat_map(|s| s.individuals.iter_mut()) {
            let amount = genome.adj_fitness() / average;
            genome.set_offspring_amount(amount);
        }
        for species in &mut self.species {
            species.count_offspring();
        }

        // Per-species rounding can overshoot the target size; trim
        // the excess from the worst-ranked species. Shortfall is
        // handled by the top-up at the end of the epoch.
        let target = self.params.population_size;
        let mut total: usize = self.species.iter().map(|s| s.offspring_required).sum();
        let mut index = self.species.len();
        while total > target && index > 0 {
            index -= 1;
            let excess = (total - target).min(self.species[index].offspring_required);
            self.species[index].offspring_required -= excess;
            total -= excess;
        }
    }

    /// Rolls the all-time and current best-genome records forward.
    /// The global stagnation counter only resets when the fitness
    /// jump is at least the configured delta.
    fn refresh_fitness_records(&mut self) {
        for species in &mut self.species {
            species.refresh_best_genome();
        }

        for species in &self.species {
            for genome in &species.individuals {
                let fitness = genome.fitness();
                if self.best_fitness_ever < fitness {
                    if (fitness - self.best_fitness_ever).abs() >= self.params.stagnation_delta {
                        self.gens_since_best_fitness_last_changed = 0;
                    }
                    self.best_fitness_ever = fitness;
                    self.best_genome_ever = Some(genome.clone());
                }
            }
        }

        let mut best = f64::NEG_INFINITY;
        for species in &self.species {
            for genome in &species.individuals {
                if genome.fitness() > best {
                    best = genome.fitness();
                    self.current_best_genome = Some(genome.clone());
                }
            }
        }
    }

    fn adjust_compat_threshold_generational(&mut self) {
        if !self.params.dynamic_compatibility {
            return;
        }
        if self.generation % self.params.compat_threshold_change_interval_generations == 0 {
            if self.species.len() > self.params.max_species {
                self.params.compat_threshold += self.params.compat_threshold_modifier;
                debug!("compatibility threshold raised to {}", self.params.compat_threshold);
            } else if self.species.len() < self.params.min_species {
                self.params.compat_threshold -= self.params.compat_threshold_modifier;
                debug!("compatibility threshold lowered to {}", self.params.compat_threshold);
            }
        }
        if self.params.compat_threshold < self.params.min_compat_threshold {
            self.params.compat_threshold = self.params.min_compat_threshold;
        }
    }

    /// After prolonged global stagnation, focuses the whole
    /// offspring budget on the top two species and resets their
    /// ages, re-centering the search on the best material found.
    fn apply_delta_coding(&mut self) {
        if !self.params.delta_coding {
            return;
        }
        if self.gens_since_best_fitness_last_changed
            > self.params.species_dropoff_age + 10
            && self.species.len() > 2
        {
            let half = self.params.population_size / 2;
            self.species[0].offspring_required = half;
            self.species[1].offspring_required = half;
            for species in &mut self.species[2..] {
                species.offspring_required = 0;
            }
            self.species[0].reset_age();
            self.species[1].reset_age();
            self.gens_since_best_fitness_last_changed = 0;
            debug!("delta coding engaged at generation {}", self.generation);
        }
    }

    /// Breeds each species' quota against a frozen snapshot of the
    /// parent species, speciating every offspring into the next
    /// generation's species list.
    fn reproduce(&mut self) {
        for species in &mut self.species {
            species.mark_parents();
        }

        let mut next_species = self.species.clone();

        let Population {
            species,
            innovations,
            params,
            config,
            rng,
            phased,
            next_genome_id,
            next_species_id,
            ..
        } = self;
        let threshold = params.compat_threshold;
        let mut factory = OffspringFactory {
            config: &*config,
            params: &*params,
            innovations,
            rng,
            mode: phased.mode,
        };

        for source in species.iter() {
            if source.individuals.is_empty() {
                continue;
            }
            let quota = source.offspring_required;
            let elite = params.elitism.min(quota).min(source.individuals.len());
            for nth in 0..quota {
                let mut baby = if nth < elite {
                    // Elite members carry over unchanged.
                    let mut elite_copy = source.individuals[nth].clone();
                    elite_copy.set_parent(false);
                    elite_copy
                } else {
                    factory.breed_one(source)
                };
                baby.set_id(*next_genome_id);
                *next_genome_id += 1;
                place_offspring(&mut next_species, baby, threshold, &*config, next_species_id);
            }
        }

        *species = next_species;
    }

    /// Performs one steady-state step: one death and one birth.
    ///
    /// Every surviving member must have been evaluated at least
    /// once. Returns a handle to the newborn (the only unevaluated
    /// member) and the culled genome; the caller evaluates the
    /// newborn before the next call.
    pub fn tick(&mut self) -> (GenomeHandle, G) {
        assert!(!self.species.is_empty(), "tick on an empty population");

        self.num_evaluations += 1;

        for species in &mut self.species {
            species.increase_gens_no_improvement();
            for genome in &mut species.individuals {
                if genome.fitness() <= 0.0 {
                    genome.set_fitness(TICK_FITNESS_FLOOR);
                }
            }
        }

        for species in &self.species {
            for genome in &species.individuals {
                let fitness = genome.fitness();
                if fitness > self.best_fitness_ever {
                    if (fitness - self.best_fitness_ever).abs() >= self.params.stagnation_delta {
                        self.gens_since_best_fitness_last_changed = 0;
                    }
                    self.best_fitness_ever = fitness;
                    self.best_genome_ever = Some(genome.clone());
                }
            }
        }

        let mut best = f64::NEG_INFINITY;
        for species in &self.species {
            for genome in &species.individuals {
                if genome.fitness() > best {
                    best = genome.fitness();
                    self.current_best_genome = Some(genome.clone());
                }
            }
        }
        for species in &mut self.species {
            for index in 0..species.individuals.len() {
                let fitness = species.individuals[index].fitness();
                if fitness >= species.best_fitness {
                    species.best_fitness = fitness;
                    species.gens_no_improvement = 0;
                }
            }
        }

        if self.adjust_compat_threshold_steady_state() {
            for index in 0..self.num_genomes() {
                self.reassign_species(index);
            }
        }

        self.sort();

        let removed = self.remove_worst_individual();

        for species in &mut self.species {
            species.calculate_average_fitness();
        }

        let parent_index = self.choose_parent_species();
        let mut baby = {
            let Population {
                species,
                innovations,
                params,
                config,
                rng,
                phased,
                ..
            } = self;
            let mut factory = OffspringFactory {
                config: &*config,
                params: &*params,
                innovations,
                rng,
                mode: phased.mode,
            };
            factory.breed_one(&species[parent_index])
        };
        baby.set_id(self.next_genome_id);
        self.next_genome_id += 1;
        assert!(baby.num_inputs() > 0, "newborn genome has no inputs");
        assert!(baby.num_outputs() > 0, "newborn genome has no outputs");

        let handle = self.insert_genome(baby);
        (handle, removed)
    }

    /// Returns whether the threshold changed this evaluation.
    fn adjust_compat_threshold_steady_state(&mut self) -> bool {
        if !self.params.dynamic_compatibility {
            return false;
        }
        if self.num_evaluations % self.params.compat_threshold_change_interval_evaluations != 0 {
            return false;
        }
        let mut changed = false;
        if self.species.len() > self.params.max_species {
            self.params.compat_threshold += self.params.compat_threshold_modifier;
            changed = true;
        } else if self.species.len() < self.params.min_species {
            self.params.compat_threshold -= self.params.compat_threshold_modifier;
            changed = true;
        }
        if self.params.compat_threshold < self.params.min_compat_threshold {
            self.params.compat_threshold = self.params.min_compat_threshold;
        }
        changed
    }

    /// Removes the evaluated member with the worst size-shared
    /// fitness, erasing its species if it was the last member.
    fn remove_worst_individual(&mut self) -> G {
        let mut worst: Option<(usize, usize, f64)> = None;
        for (species_index, species) in self.species.iter().enumerate() {
            let size = species.individuals.len() as f64;
            for (member_index, genome) in species.individuals.iter().enumerate() {
                if !genome.is_evaluated() {
                    continue;
                }
                let shared = genome.fitness() / size;
                if worst.map_or(true, |(_, _, fitness)| shared < fitness) {
                    worst = Some((species_index, member_index, shared));
                }
            }
        }

        let (species_index, member_index, _) =
            worst.expect("no evaluated member available for removal");
        let genome = self.species[species_index].remove_individual(member_index);
        if self.species[species_index].is_empty() {
            self.species.remove(species_index);
        }
        genome
    }

    /// Roulette over the species' average fitness, respun until a
    /// species with evaluated members is hit.
    fn choose_parent_species(&mut self) -> usize {
        assert!(!self.species.is_empty());
        let total: f64 = self.species.iter().map(Species::average_fitness).sum();
        assert!(total > 0.0, "no species has evaluated members");

        loop {
            let marble = self.rng.gen::<f64>() * total;
            let mut spin = 0.0;
            let mut chosen = self.species.len() - 1;
            for (index, species) in self.species.iter().enumerate() {
                spin += species.average_fitness;
                if spin >= marble {
                    chosen = index;
                    break;
                }
            }
            if self.species[chosen].average_fitness > 0.0 {
                return chosen;
            }
        }
    }

    /// Moves the genome at the passed flat index into the first
    /// species it is compatible with, creating a new one if none
    /// matches. Used after steady-state threshold changes.
    fn reassign_species(&mut self, index: usize) {
        let mut remaining = index;
        let mut location = None;
        for (species_index, species) in self.species.iter().enumerate() {
            if remaining < species.individuals.len() {
                location = Some((species_index, remaining));
                break;
            }
            remaining -= species.individuals.len();
        }
        let (species_index, member_index) = location.expect("genome index out of bounds");

        let genome = self.species[species_index].remove_individual(member_index);
        if self.species[species_index].is_empty() {
            self.species.remove(species_index);
        }
        self.insert_genome(genome);
    }

    /// Inserts a genome into the first compatible species, or into
    /// a fresh one.
    fn insert_genome(&mut self, genome: G) -> GenomeHandle {
        for (index, species) in self.species.iter_mut().enumerate() {
            if genome.is_compatible_with(
                species.representative(),
                self.params.compat_threshold,
                &self.config,
            ) {
                species.add_individual(genome);
                return GenomeHandle {
                    species: index,
                    member: species.individuals.len() - 1,
                };
            }
        }
        let id = self.next_species_id;
        self.next_species_id += 1;
        self.species.push(Species::new(genome, id));
        GenomeHandle {
            species: self.species.len() - 1,
            member: 0,
        }
    }

    /// Partitions a flat genome list into species by representative
    /// distance, in stable species and genome order.
    fn speciate(&mut self, genomes: Vec<G>) {
        for genome in genomes {
            let target = self.species.iter().position(|s| {
                genome.is_compatible_with(
                    s.representative(),
                    self.params.compat_threshold,
                    &self.config,
                )
            });
            match target {
                Some(index) => self.species[index].add_individual(genome),
                None => {
                    let id = self.next_species_id;
                    self.next_species_id += 1;
                    self.species.push(Species::new(genome, id));
                }
            }
        }
        self.species.retain(|s| !s.is_empty());
    }

    fn current_mean_complexity(&self) -> f64 {
        let count = self.num_genomes();
        assert!(count > 0, "complexity of an empty population");
        let links: usize = self
            .species
            .iter()
            .flat_map(|s| s.individuals.iter())
            .map(G::num_links)
            .sum();
        links as f64 / count as f64
    }

    /// Returns an iterator over all current genomes, in species and
    /// member order.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.species.iter().flat_map(|s| s.individuals.iter())
    }

    /// Mutable variant of [`genomes`], for external evaluation.
    ///
    /// [`genomes`]: Population::genomes
    pub fn genomes_mut(&mut self) -> impl Iterator<Item = &mut G> {
        self.species.iter_mut().flat_map(|s| s.individuals.iter_mut())
    }

    /// Returns the genome at the passed flat index, if it exists.
    pub fn genome(&self, index: usize) -> Option<&G> {
        self.genomes().nth(index)
    }

    /// Mutable variant of [`genome`].
    ///
    /// [`genome`]: Population::genome
    pub fn genome_mut(&mut self, index: usize) -> Option<&mut G> {
        self.genomes_mut().nth(index)
    }

    /// Resolves a handle returned by [`tick`].
    ///
    /// [`tick`]: Population::tick
    pub fn genome_at(&self, handle: GenomeHandle) -> Option<&G> {
        self.species
            .get(handle.species)
            .and_then(|s| s.individuals.get(handle.member))
    }

    /// Mutable variant of [`genome_at`].
    ///
    /// [`genome_at`]: Population::genome_at
    pub fn genome_at_mut(&mut self, handle: GenomeHandle) -> Option<&mut G> {
        self.species
            .get_mut(handle.species)
            .and_then(|s| s.individuals.get_mut(handle.member))
    }

    /// Returns an iterator over all current species.
    pub fn species(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.iter()
    }

    /// Total number of genomes across all species.
    pub fn num_genomes(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }

    /// Current generation number of the generational loop.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Number of steady-state steps performed.
    pub fn num_evaluations(&self) -> usize {
        self.num_evaluations
    }

    /// Best raw fitness ever observed.
    pub fn best_fitness_ever(&self) -> f64 {
        self.best_fitness_ever
    }

    /// Snapshot of the genome that achieved [`best_fitness_ever`].
    ///
    /// [`best_fitness_ever`]: Population::best_fitness_ever
    pub fn best_genome_ever(&self) -> Option<&G> {
        self.best_genome_ever.as_ref()
    }

    /// Snapshot of the best member of the current generation.
    pub fn champion(&self) -> Option<&G> {
        self.current_best_genome.as_ref()
    }

    /// Generations (or ticks) since the all-time best fitness last
    /// improved by more than the stagnation delta.
    pub fn gens_since_best_fitness_last_changed(&self) -> usize {
        self.gens_since_best_fitness_last_changed
    }

    /// Current phased-search regime.
    pub fn search_mode(&self) -> SearchMode {
        self.phased.mode
    }

    /// Mean link count across the population as of the last epoch.
    pub fn mean_complexity(&self) -> f64 {
        self.phased.current_mpc
    }

    /// The population's (possibly dynamically adjusted) parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// The population's innovation registry.
    pub fn innovations(&self) -> &InnovationDatabase {
        &self.innovations
    }
}

/// Breeds offspring for one species against a frozen parent
/// snapshot, so that selection is not perturbed by insertions.
struct OffspringFactory<'a, G: Genome> {
    config: &'a G::Config,
    params: &'a Parameters,
    innovations: &'a mut InnovationDatabase,
    rng: &'a mut SmallRng,
    mode: SearchMode,
}

impl<'a, G: Genome> OffspringFactory<'a, G> {
    /// Produces a single mutated offspring from the passed species.
    fn breed_one(&mut self, parents: &Species<G>) -> G {
        let mut baby = if parents.len() > 1 && self.rng.gen::<f64>() < self.params.crossover_rate {
            let first = self.select_parent(parents);
            let second = self.select_parent(parents);
            let (fitter, other) = if parents.individuals[first].fitness()
                >= parents.individuals[second].fitness()
            {
                (first, second)
            } else {
                (second, first)
            };
            parents.individuals[fitter].crossover(
                &parents.individuals[other],
                self.config,
                self.rng,
            )
        } else {
            let index = self.select_parent(parents);
            parents.individuals[index].clone()
        };

        baby.set_fitness(0.0);
        baby.set_adj_fitness(0.0);
        baby.set_offspring_amount(0.0);
        baby.set_evaluated(false);
        baby.set_parent(false);
        baby.set_behavior_slot(None);
        baby.mutate(self.config, self.params, self.mode, self.innovations, self.rng);
        baby
    }

    fn select_parent(&mut self, parents: &Species<G>) -> usize {
        if self.params.roulette_wheel_selection {
            self.roulette(parents)
        } else {
            self.tournament(parents)
        }
    }

    fn roulette(&mut self, parents: &Species<G>) -> usize {
        let mut weights: Vec<f64> = parents.individuals.iter().map(G::adj_fitness).collect();
        let mut total: f64 = weights.iter().sum();
        if total <= 0.0 {
            // Steady-state breeding happens before any fitness
            // adjustment; fall back to raw fitness.
            weights = parents.individuals.iter().map(G::fitness).collect();
            total = weights.iter().sum();
        }
        if total <= 0.0 {
            return self.rng.gen_range(0..parents.len());
        }
        let marble = self.rng.gen::<f64>() * total;
        let mut spin = 0.0;
        for (index, &weight) in weights.iter().enumerate() {
            spin += weight;
            if spin >= marble {
                return index;
            }
        }
        parents.len() - 1
    }

    fn tournament(&mut self, parents: &Species<G>) -> usize {
        let first = self.rng.gen_range(0..parents.len());
        let second = self.rng.gen_range(0..parents.len());
        if parents.individuals[first].fitness() >= parents.individuals[second].fitness() {
            first
        } else {
            second
        }
    }
}

fn place_offspring<G: Genome>(
    species: &mut Vec<Species<G>>,
    genome: G,
    threshold: f64,
    config: &G::Config,
    next_species_id: &mut u64,
) {
    for target in species.iter_mut() {
        if genome.is_compatible_with(target.representative(), threshold, config) {
            target.add_individual(genome);
            return;
        }
    }
    let id = *next_species_id;
    *next_species_id += 1;
    species.push(Species::new(genome, id));
}
