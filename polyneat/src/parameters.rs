use serde::{Deserialize, Serialize};

/// Configuration data for population generation
/// and evolution.
///
/// A population copies its `Parameters` at construction and owns
/// them for its whole lifetime; the dynamic-compatibility and
/// dynamic-novelty rules mutate the owned copy in place
/// ([`compat_threshold`] and [`novelty_search_p_min`] respectively).
///
/// # Note
/// All quantities expressing probabilities or rates should be in
/// the range [0.0, 1.0]. Using values that are not in this bound
/// may result in odd behaviours and/or incorrect programs.
///
/// [`compat_threshold`]: Parameters::compat_threshold
/// [`novelty_search_p_min`]: Parameters::novelty_search_p_min
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Target number of genomes per generation.
    pub population_size: usize,

    /// Enables adjustment of the compatibility threshold to keep
    /// the species count inside the `[min_species, max_species]` band.
    pub dynamic_compatibility: bool,
    /// Genetic distance beyond which genomes are considered as
    /// belonging to different species.
    pub compat_threshold: f64,
    /// Lower clamp for the dynamically adjusted threshold.
    pub min_compat_threshold: f64,
    /// Step by which the threshold is raised or lowered.
    pub compat_threshold_modifier: f64,
    /// Threshold update cadence for the generational loop.
    pub compat_threshold_change_interval_generations: usize,
    /// Threshold update cadence for the steady-state loop.
    pub compat_threshold_change_interval_evaluations: usize,
    /// Lower bound of the desired species-count band.
    pub min_species: usize,
    /// Upper bound of the desired species-count band.
    pub max_species: usize,

    /// Age below which a species' fitness is boosted.
    pub young_age_threshold: usize,
    /// Fitness multiplier for young species.
    pub young_age_fitness_boost: f64,
    /// Age beyond which a species' fitness is penalized.
    pub old_age_threshold: usize,
    /// Fitness multiplier for old species, in (0, 1].
    pub old_age_fitness_penalty: f64,
    /// Generations without improvement before a species is
    /// considered stagnated.
    pub species_dropoff_age: usize,
    /// Fitness multiplier for stagnated species. Near zero, so a
    /// stagnated species is starved of offspring unless it is the
    /// current best one.
    pub stagnation_penalty: f64,

    /// Fraction of each species kept as eligible parents when the
    /// worst performers are culled.
    pub survival_rate: f64,
    /// Number of top members per species copied unchanged into the
    /// next generation.
    pub elitism: usize,
    /// Chance that offspring is produced by crossover rather than
    /// by cloning a single parent.
    pub crossover_rate: f64,
    /// Selects parents by roulette over adjusted fitness when true,
    /// by tournament otherwise.
    pub roulette_wheel_selection: bool,

    /// Minimum fitness jump that resets the global stagnation
    /// counter. Improvements smaller than this update the record
    /// without resetting the counter.
    pub stagnation_delta: f64,
    /// Focuses reproduction on the top two species after prolonged
    /// global stagnation.
    pub delta_coding: bool,

    /// Enables the complexifying/simplifying search phases.
    pub phased_searching: bool,
    /// Mean-complexity excess over the base level that arms the
    /// switch to the simplifying phase.
    pub simplifying_phase_mpc_threshold: f64,
    /// Global stagnation required before simplification begins.
    pub simplifying_phase_stagnation_threshold: usize,
    /// Generations without a complexity drop after which the
    /// simplifying phase ends.
    pub complexity_floor_generations: usize,

    /// Keeps the innovation registry's queue across generations.
    /// When false the queue is flushed at the end of every epoch,
    /// so equivalent mutations in later generations get fresh IDs.
    pub innovations_forever: bool,

    /// Number of nearest neighbours used for sparseness.
    pub novelty_search_k: usize,
    /// Sparseness above which a behavior enters the archive.
    pub novelty_search_p_min: f64,
    /// Lower clamp for the dynamically lowered archiving threshold.
    pub novelty_search_pmin_min: f64,
    /// Cadence (in evaluations) of the whole-population sparseness
    /// recomputation.
    pub novelty_search_recompute_sparseness_each: usize,
    /// Evaluations without archive additions after which the
    /// archiving threshold is lowered.
    pub novelty_search_no_archiving_stagnation_threshold: usize,
    /// Consecutive archive additions after which the archiving
    /// threshold is raised.
    pub novelty_search_quick_archiving_min_evaluations: usize,
    /// Multiplier applied when lowering the archiving threshold.
    pub novelty_search_pmin_lowering_multiplier: f64,
    /// Multiplier applied when raising the archiving threshold.
    pub novelty_search_pmin_raising_multiplier: f64,
    /// Enables dynamic adjustment of the archiving threshold.
    pub novelty_search_dynamic_pmin: bool,
}

impl Parameters {
    /// Restores every field to its default value.
    ///
    /// # Examples
    /// ```
    /// use polyneat::Parameters;
    ///
    /// let mut params = Parameters {
    ///     population_size: 100,
    ///     ..Parameters::default()
    /// };
    ///
    /// params.reset();
    /// assert_eq!(params, Parameters::default());
    /// ```
    pub fn reset(&mut self) {
        *self = Parameters::default();
    }
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            population_size: 300,
            dynamic_compatibility: true,
            compat_threshold: 5.0,
            min_compat_threshold: 0.2,
            compat_threshold_modifier: 0.3,
            compat_threshold_change_interval_generations: 1,
            compat_threshold_change_interval_evaluations: 10,
            min_species: 5,
            max_species: 10,
            young_age_threshold: 5,
            young_age_fitness_boost: 1.1,
            old_age_threshold: 30,
            old_age_fitness_penalty: 0.5,
            species_dropoff_age: 50,
            stagnation_penalty: 0.0000001,
            survival_rate: 0.25,
            elitism: 1,
            crossover_rate: 0.7,
            roulette_wheel_selection: true,
            stagnation_delta: 0.0,
            delta_coding: false,
            phased_searching: false,
            simplifying_phase_mpc_threshold: 20.0,
            simplifying_phase_stagnation_threshold: 30,
            complexity_floor_generations: 40,
            innovations_forever: true,
            novelty_search_k: 15,
            novelty_search_p_min: 0.5,
            novelty_search_pmin_min: 0.05,
            novelty_search_recompute_sparseness_each: 25,
            novelty_search_no_archiving_stagnation_threshold: 150,
            novelty_search_quick_archiving_min_evaluations: 8,
            novelty_search_pmin_lowering_multiplier: 0.9,
            novelty_search_pmin_raising_multiplier: 1.1,
            novelty_search_dynamic_pmin: true,
        }
    }
}
