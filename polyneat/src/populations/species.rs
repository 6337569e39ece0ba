use crate::genome::Genome;
use crate::parameters::Parameters;

/// Fitness floor applied during adjustment, so that populations
/// evaluated on non-positive scales still produce a positive
/// adjusted-fitness total.
const FITNESS_FLOOR: f64 = 0.0000001;

/// Species are collections of reproductively compatible (within a
/// certain genetic distance) genomes. Membership is determined by
/// comparing against a _representative_: the founding genome at
/// creation, replaced by the species leader at the end of every
/// epoch.
///
/// A species tracks its age, its best fitness ever seen, and how
/// many generations have passed without improving on it. Young
/// species get a fitness boost, old and stagnated ones a penalty,
/// except that the population's current best species is never
/// penalized for stagnation.
#[derive(Debug, Clone)]
pub struct Species<G> {
    pub(super) id: u64,
    pub(super) age: usize,
    pub(super) gens_no_improvement: usize,
    pub(super) best_fitness: f64,
    pub(super) average_fitness: f64,
    pub(super) offspring_required: usize,
    pub(super) is_best_species: bool,
    pub(super) representative: G,
    pub(super) best_genome: Option<G>,
    pub(super) individuals: Vec<G>,
}

impl<G: Genome> Species<G> {
    /// Creates a new species founded by the passed genome. The
    /// founder becomes both the first member and the representative.
    pub(super) fn new(founder: G, id: u64) -> Species<G> {
        Species {
            id,
            age: 0,
            gens_no_improvement: 0,
            best_fitness: f64::NEG_INFINITY,
            average_fitness: 0.0,
            offspring_required: 0,
            is_best_species: false,
            representative: founder.clone(),
            best_genome: None,
            individuals: vec![founder],
        }
    }

    /// Returns the species' ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Returns whether the species has no members.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Generations since the species was created (or since its age
    /// was last reset as a survival protection).
    pub fn age(&self) -> usize {
        self.age
    }

    /// Generations since the species last improved on its best
    /// fitness.
    pub fn gens_no_improvement(&self) -> usize {
        self.gens_no_improvement
    }

    /// Best raw fitness ever observed in this species.
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Mean raw fitness over the evaluated members, recomputed each
    /// steady-state step. Zero means no member has been evaluated.
    pub fn average_fitness(&self) -> f64 {
        self.average_fitness
    }

    /// Offspring count allotted for the next reproduction round.
    pub fn offspring_required(&self) -> usize {
        self.offspring_required
    }

    /// Whether this is the population's current best species. At
    /// most one species holds the flag.
    pub fn is_best_species(&self) -> bool {
        self.is_best_species
    }

    /// Returns the membership representative: the snapshot taken at
    /// creation, or the leader snapshot from the last epoch end.
    pub fn representative(&self) -> &G {
        &self.representative
    }

    pub(super) fn set_representative(&mut self, genome: G) {
        self.representative = genome;
    }

    /// Snapshot of the species leader taken during the last epoch.
    pub fn best_genome(&self) -> Option<&G> {
        self.best_genome.as_ref()
    }

    /// Returns an iterator over the species' members. After a
    /// [`sort_individuals`] the order is descending by raw fitness.
    ///
    /// [`sort_individuals`]: Species::sort_individuals
    pub fn members(&self) -> impl Iterator<Item = &G> {
        self.individuals.iter()
    }

    pub(super) fn add_individual(&mut self, genome: G) {
        self.individuals.push(genome);
    }

    pub(super) fn remove_individual(&mut self, index: usize) -> G {
        self.individuals.remove(index)
    }

    pub(super) fn increase_age(&mut self) {
        self.age += 1;
    }

    pub(super) fn reset_age(&mut self) {
        self.age = 0;
        self.gens_no_improvement = 0;
    }

    pub(super) fn increase_gens_no_improvement(&mut self) {
        self.gens_no_improvement += 1;
    }

    /// Sorts members by descending raw fitness. The sort is stable,
    /// so ties keep their insertion order.
    pub(super) fn sort_individuals(&mut self) {
        self.individuals.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or_else(|| panic!("invalid genome fitnesses detected (NaN)"))
        });
    }

    /// Applies explicit fitness sharing: each member's adjusted
    /// fitness is its raw fitness divided by the species size, after
    /// the age boost/penalty and stagnation penalty multipliers.
    /// Non-positive raw fitness is clamped to a small floor first.
    ///
    /// Also rolls the species' best-fitness record forward,
    /// resetting the no-improvement counter on improvement.
    pub(super) fn adjust_fitness(&mut self, params: &Parameters) {
        if self.individuals.is_empty() {
            return;
        }

        let best = self
            .individuals
            .iter()
            .map(G::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        if best > self.best_fitness {
            self.best_fitness = best;
            self.gens_no_improvement = 0;
        }

        let size = self.individuals.len() as f64;
        let age = self.age;
        let stagnated =
            self.gens_no_improvement > params.species_dropoff_age && !self.is_best_species;
        for genome in &mut self.individuals {
            let mut fitness = genome.fitness();
            if fitness <= 0.0 {
                fitness = FITNESS_FLOOR;
            }
            if age < params.young_age_threshold {
                fitness *= params.young_age_fitness_boost;
            }
            if age > params.old_age_threshold {
                fitness *= params.old_age_fitness_penalty;
            }
            if stagnated {
                fitness *= params.stagnation_penalty;
            }
            genome.set_adj_fitness(fitness / size);
        }
    }

    /// Totals the members' fractional allotments into the integer
    /// offspring quota for the next reproduction round.
    pub(super) fn count_offspring(&mut self) {
        let total: f64 = self.individuals.iter().map(G::offspring_amount).sum();
        self.offspring_required = total.round() as usize;
    }

    /// Removes the worst-performing members, keeping the top
    /// [`survival_rate`] fraction and always at least one. Only
    /// evaluated members are culled; members must be sorted.
    ///
    /// [`survival_rate`]: Parameters::survival_rate
    pub(super) fn kill_worst(&mut self, params: &Parameters) {
        let keep = ((params.survival_rate * self.individuals.len() as f64).floor() as usize + 1)
            .min(self.individuals.len());
        let mut index = self.individuals.len();
        while self.individuals.len() > keep && index > 1 {
            index -= 1;
            if self.individuals[index].is_evaluated() {
                self.individuals.remove(index);
            }
        }
    }

    /// Flags every current member as a parent, ahead of a
    /// reproduction round.
    pub(super) fn mark_parents(&mut self) {
        for genome in &mut self.individuals {
            genome.set_parent(true);
        }
    }

    /// Removes the members that served as parents in the round that
    /// just finished, leaving only their offspring.
    pub(super) fn kill_old_parents(&mut self) {
        self.individuals.retain(|g| !g.is_parent());
    }

    /// Refreshes the cached leader snapshot; members must be sorted.
    pub(super) fn refresh_best_genome(&mut self) {
        self.best_genome = self.individuals.first().cloned();
    }

    /// Recomputes the mean raw fitness over evaluated members.
    pub(super) fn calculate_average_fitness(&mut self) {
        let evaluated: Vec<f64> = self
            .individuals
            .iter()
            .filter(|g| g.is_evaluated())
            .map(|g| g.fitness())
            .collect();
        self.average_fitness = if evaluated.is_empty() {
            0.0
        } else {
            evaluated.iter().sum::<f64>() / evaluated.len() as f64
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_params, TestGenome};

    fn species_of(fitnesses: &[f64]) -> Species<TestGenome> {
        let mut species = Species::new(TestGenome::with_fitness(0, fitnesses[0]), 1);
        for (i, &f) in fitnesses.iter().enumerate().skip(1) {
            species.add_individual(TestGenome::with_fitness(i as u64, f));
        }
        species
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut species = species_of(&[1.0, 3.0, 2.0, 3.0]);
        species.sort_individuals();
        let order: Vec<u64> = species.members().map(|g| g.id()).collect();
        // Members 1 and 3 are tied; 1 was inserted first.
        assert_eq!(order, [1, 3, 2, 0]);
    }

    #[test]
    fn adjust_fitness_shares_by_size() {
        let mut species = species_of(&[8.0, 4.0]);
        species.age = 10;
        let params = test_params();
        species.adjust_fitness(&params);
        let adj: Vec<f64> = species.members().map(|g| g.adj_fitness()).collect();
        assert_eq!(adj, [4.0, 2.0]);
        assert_eq!(species.best_fitness(), 8.0);
        assert_eq!(species.gens_no_improvement(), 0);
    }

    #[test]
    fn young_species_get_boosted() {
        let mut species = species_of(&[6.0]);
        species.age = 0;
        let mut params = test_params();
        params.young_age_threshold = 5;
        params.young_age_fitness_boost = 1.5;
        species.adjust_fitness(&params);
        assert_eq!(species.individuals[0].adj_fitness(), 9.0);
    }

    #[test]
    fn old_species_get_penalized() {
        let mut species = species_of(&[6.0]);
        species.age = 50;
        let mut params = test_params();
        params.old_age_threshold = 30;
        params.old_age_fitness_penalty = 0.5;
        species.adjust_fitness(&params);
        assert_eq!(species.individuals[0].adj_fitness(), 3.0);
    }

    #[test]
    fn stagnation_penalty_spares_the_best_species() {
        let params = test_params();
        let mut stagnated = species_of(&[6.0]);
        stagnated.age = 10;
        stagnated.best_fitness = 100.0;
        stagnated.gens_no_improvement = params.species_dropoff_age + 1;
        stagnated.adjust_fitness(&params);
        assert!(stagnated.individuals[0].adj_fitness() < 1e-5);

        let mut best = species_of(&[6.0]);
        best.age = 10;
        best.best_fitness = 100.0;
        best.gens_no_improvement = params.species_dropoff_age + 1;
        best.is_best_species = true;
        best.adjust_fitness(&params);
        assert_eq!(best.individuals[0].adj_fitness(), 6.0);
    }

    #[test]
    fn non_positive_fitness_is_clamped() {
        let mut species = species_of(&[-3.0, -1.0]);
        species.age = 10;
        species.adjust_fitness(&test_params());
        for genome in species.members() {
            assert!(genome.adj_fitness() > 0.0);
        }
    }

    #[test]
    fn count_offspring_rounds_the_total() {
        let mut species = species_of(&[0.0, 0.0, 0.0]);
        for (genome, amount) in species.individuals.iter_mut().zip([1.4, 0.8, 0.9]) {
            genome.set_offspring_amount(amount);
        }
        species.count_offspring();
        assert_eq!(species.offspring_required(), 3);
    }

    #[test]
    fn kill_worst_keeps_the_survival_fraction() {
        let mut species = species_of(&[10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        species.sort_individuals();
        let mut params = test_params();
        params.survival_rate = 0.2;
        species.kill_worst(&params);
        assert_eq!(species.len(), 3);
        assert_eq!(species.individuals[0].fitness(), 10.0);
    }

    #[test]
    fn kill_worst_spares_unevaluated_members() {
        let mut species = species_of(&[5.0, 4.0, 3.0, 2.0, 1.0]);
        species.individuals[4].set_evaluated(false);
        species.sort_individuals();
        let mut params = test_params();
        params.survival_rate = 0.2;
        species.kill_worst(&params);
        assert!(species.members().any(|g| !g.is_evaluated()));
    }

    #[test]
    fn kill_worst_retains_at_least_one() {
        let mut species = species_of(&[1.0]);
        let mut params = test_params();
        params.survival_rate = 0.0;
        species.kill_worst(&params);
        assert_eq!(species.len(), 1);
    }

    #[test]
    fn kill_old_parents_leaves_offspring_only() {
        let mut species = species_of(&[3.0, 2.0]);
        species.mark_parents();
        let mut baby = TestGenome::with_fitness(9, 0.0);
        baby.set_parent(false);
        species.add_individual(baby);
        species.kill_old_parents();
        assert_eq!(species.len(), 1);
        assert_eq!(species.individuals[0].id(), 9);
    }

    #[test]
    fn average_fitness_covers_evaluated_members_only() {
        let mut species = species_of(&[4.0, 2.0, 100.0]);
        species.individuals[2].set_evaluated(false);
        species.calculate_average_fitness();
        assert_eq!(species.average_fitness(), 3.0);
    }
}
