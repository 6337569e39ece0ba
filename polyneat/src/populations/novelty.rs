use super::Population;
use crate::genome::Genome;

use ::log::debug;

/// A behavior characterization of an evaluated phenotype, the
/// selection currency of novelty search.
///
/// Implementations hold whatever descriptor the domain calls for (a
/// trajectory, an end position, ...); the population only asks for
/// distances between descriptors, acquisition from a genome, and
/// whether the behavior solves the task.
pub trait PhenotypeBehavior<G>: Clone {
    /// Evaluates the genome and stores its behavior descriptor in
    /// `self`. Returns true if the evaluation already produced a
    /// successful behavior.
    fn acquire(&mut self, genome: &mut G) -> bool;

    /// Distance to another behavior in behavior space.
    fn distance_to(&self, other: &Self) -> f64;

    /// Whether this behavior is the one being searched for. Never
    /// true in open-ended evolution.
    fn successful(&self) -> bool;
}

/// Placeholder behavior for fitness-driven runs that never call the
/// novelty-search entry points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullBehavior;

impl<G> PhenotypeBehavior<G> for NullBehavior {
    fn acquire(&mut self, _genome: &mut G) -> bool {
        false
    }

    fn distance_to(&self, _other: &Self) -> f64 {
        0.0
    }

    fn successful(&self) -> bool {
        false
    }
}

impl<G: Genome, B: PhenotypeBehavior<G>> Population<G, B> {
    /// Allocates one behavior slot per member from the passed
    /// template, clears the archive, and zeroes every fitness.
    /// Must be called before the first [`novelty_search_tick`].
    ///
    /// [`novelty_search_tick`]: Population::novelty_search_tick
    pub fn init_phenotype_behavior_data(&mut self, template: B) {
        let count = self.num_genomes();
        self.behaviors = vec![template; count];
        self.archive.clear();
        self.gens_since_last_archiving = 0;
        self.quick_add_counter = 0;

        let mut slot = 0;
        for genome in self.genomes_mut() {
            genome.set_behavior_slot(Some(slot));
            genome.set_fitness(0.0);
            slot += 1;
        }
    }

    /// The archived behaviors accumulated so far.
    pub fn behavior_archive(&self) -> &[B] {
        &self.archive
    }

    /// Sparseness of the behavior in the passed slot: the mean
    /// distance to its K nearest neighbours among the population's
    /// behaviors and the archive. The closest entry is the behavior
    /// itself and is skipped.
    pub fn compute_sparseness(&self, slot: usize) -> f64 {
        let subject = &self.behaviors[slot];

        let mut distances: Vec<f64> = self
            .genomes()
            .map(|genome| {
                let other = genome
                    .behavior_slot()
                    .expect("behavior data not initialized");
                subject.distance_to(&self.behaviors[other])
            })
            .collect();
        distances.extend(self.archive.iter().map(|other| subject.distance_to(other)));
        distances.sort_by(|a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("invalid behavior distance detected (NaN)"))
        });

        let k = self.params.novelty_search_k;
        distances.iter().skip(1).take(k).sum::<f64>() / k as f64
    }

    /// Performs one steady-state step under novelty-search
    /// pressure: periodically re-scores the whole population by
    /// sparseness, breeds one newborn, hands it the culled member's
    /// behavior slot, evaluates it through the behavior's
    /// [`acquire`] hook, and archives the behavior when it is
    /// sparse enough.
    ///
    /// Returns a snapshot of the newborn and whether its behavior
    /// was successful.
    ///
    /// [`acquire`]: PhenotypeBehavior::acquire
    pub fn novelty_search_tick(&mut self) -> (G, bool) {
        // Re-scoring everyone keeps a constant pressure to do
        // something new.
        if self.num_evaluations % self.params.novelty_search_recompute_sparseness_each == 0 {
            let slots: Vec<usize> = self
                .genomes()
                .map(|g| g.behavior_slot().expect("behavior data not initialized"))
                .collect();
            let sparseness: Vec<f64> =
                slots.iter().map(|&slot| self.compute_sparseness(slot)).collect();
            for (genome, sparseness) in self.genomes_mut().zip(sparseness) {
                genome.set_fitness(sparseness);
            }
        }

        let (handle, culled) = self.tick();

        // The newborn reuses the culled member's descriptor slot.
        let slot = culled
            .behavior_slot()
            .expect("culled genome has no behavior slot");
        let success = {
            let Population {
                species, behaviors, ..
            } = self;
            let newborn = &mut species[handle.species].individuals[handle.member];
            newborn.set_behavior_slot(Some(slot));
            behaviors[slot].acquire(newborn)
        };
        if success {
            let newborn = self.genome_at(handle).expect("newborn handle is stale");
            return (newborn.clone(), true);
        }

        let sparseness = self.compute_sparseness(slot);

        self.gens_since_last_archiving += 1;
        if sparseness > self.params.novelty_search_p_min {
            self.archive.push(self.behaviors[slot].clone());
            self.gens_since_last_archiving = 0;
            self.quick_add_counter += 1;
            debug!(
                "behavior archived (sparseness {:.4}, archive size {})",
                sparseness,
                self.archive.len()
            );
        } else {
            self.quick_add_counter = 0;
        }

        if self.params.novelty_search_dynamic_pmin {
            if self.gens_since_last_archiving
                > self.params.novelty_search_no_archiving_stagnation_threshold
            {
                self.params.novelty_search_p_min *=
                    self.params.novelty_search_pmin_lowering_multiplier;
                if self.params.novelty_search_p_min < self.params.novelty_search_pmin_min {
                    self.params.novelty_search_p_min = self.params.novelty_search_pmin_min;
                }
            }
            if self.quick_add_counter > self.params.novelty_search_quick_archiving_min_evaluations
            {
                self.params.novelty_search_p_min *=
                    self.params.novelty_search_pmin_raising_multiplier;
            }
        }

        let newborn = self.genome_at_mut(handle).expect("newborn handle is stale");
        newborn.set_fitness(sparseness);
        newborn.set_evaluated(true);
        let snapshot = newborn.clone();
        let successful = self.behaviors[slot].successful();
        (snapshot, successful)
    }
}
