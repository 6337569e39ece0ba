use super::{Population, SearchMode};
use crate::genome::Genome;

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones species and their champions.
    SpeciesChampions,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population.
#[derive(Clone, Debug)]
pub struct Log<G> {
    pub generation: usize,
    pub num_evaluations: usize,
    pub species_count: usize,
    pub search_mode: SearchMode,
    pub best_fitness_ever: f64,
    pub fitness: Stats,
    pub complexity: Stats,
    pub sample: GenerationMemberRecord<G>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration: {:?}\n\
            \tnum_evaluations: {:?}\n\
            \tspecies_count: {:?}\n\
            \tsearch_mode: {:?}\n\
            \tbest_fitness_ever: {:?}\n\
            \tfitness: {:?}\n\
            \tcomplexity: {:?}\n\
            }}",
            &self.generation,
            &self.num_evaluations,
            &self.species_count,
            &self.search_mode,
            &self.best_fitness_ever,
            &self.fitness,
            &self.complexity,
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence. An empty
    /// sequence yields all zeroes.
    ///
    /// # Examples
    /// ```
    /// use polyneat::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Stats {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: 0.0,
                minimum: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }

        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f64;

        let mid = data.len() / 2;
        let compare = |a: &f64, b: &f64| a.partial_cmp(b).unwrap();
        let mut median = *data.select_nth_unstable_by(mid, compare).1;
        if data.len() % 2 == 0 {
            median = (median + *data.select_nth_unstable_by(mid - 1, compare).1) / 2.0;
        }

        Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        }
    }
}

/// A reporting-level dependant store of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord<G> {
    /// Species IDs, members and stagnation level.
    Species(Vec<(u64, Vec<G>, usize)>),
    /// Only species IDs, species champions, and stagnation level.
    SpeciesChampions(Vec<(u64, G, usize)>),
    /// Only the population champion.
    PopulationChampion(G),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Stores a snapshot of a population.
    pub fn log<B>(&mut self, population: &Population<G, B>) {
        let sample = match self.reporting_level {
            ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                population
                    .species()
                    .map(|s| {
                        (
                            s.id(),
                            s.members().cloned().collect(),
                            s.gens_no_improvement(),
                        )
                    })
                    .collect(),
            ),
            ReportingLevel::SpeciesChampions => GenerationMemberRecord::SpeciesChampions(
                population
                    .species()
                    .filter_map(|s| {
                        s.members()
                            .next()
                            .map(|leader| (s.id(), leader.clone(), s.gens_no_improvement()))
                    })
                    .collect(),
            ),
            ReportingLevel::PopulationChampion => match population.champion() {
                Some(champion) => {
                    GenerationMemberRecord::PopulationChampion(champion.clone())
                }
                None => GenerationMemberRecord::None,
            },
            ReportingLevel::NoGenomes => GenerationMemberRecord::None,
        };

        self.logs.push(Log {
            generation: population.generation(),
            num_evaluations: population.num_evaluations(),
            species_count: population.species().count(),
            search_mode: population.search_mode(),
            best_fitness_ever: population.best_fitness_ever(),
            fitness: Stats::from(population.genomes().map(G::fitness)),
            complexity: Stats::from(population.genomes().map(|g| g.num_links() as f64)),
            sample,
        });
    }

    /// Iterates over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }
}
