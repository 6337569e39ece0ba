use super::{phased::PhasedSearch, Population};
use crate::errors::LoadError;
use crate::genome::Genome;
use crate::innovation::{read_line, InnovationDatabase};
use crate::parameters::Parameters;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use std::io::{self, BufRead, Write};

impl<G: Genome, B> Population<G, B> {
    /// Writes the whole population as a line-oriented text
    /// snapshot: a header with the genome count and the current
    /// compatibility threshold, the innovation registry, and every
    /// genome in species-major order.
    ///
    /// The output is deterministic: saving, loading and saving
    /// again produces identical bytes.
    pub fn save(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "Genomes: {}", self.num_genomes())?;
        writeln!(writer, "Compatibility: {:3.5}", self.params.compat_threshold)?;
        writeln!(writer)?;
        self.innovations.save(writer)?;
        for species in &self.species {
            for genome in &species.individuals {
                genome.write_to(writer)?;
            }
        }
        Ok(())
    }

    /// Reads a snapshot previously written by [`save`], speciating
    /// the loaded genomes from scratch. The genome count and the
    /// compatibility threshold stored in the snapshot override the
    /// corresponding fields of `params`, and the genome ID counter
    /// resumes just past the highest loaded ID.
    ///
    /// On failure the error is returned and no population is
    /// produced; the reader's position is unspecified.
    ///
    /// [`save`]: Population::save
    pub fn load(
        reader: &mut dyn BufRead,
        config: G::Config,
        mut params: Parameters,
        rng_seed: u64,
    ) -> Result<Population<G, B>, LoadError> {
        let header = read_line(reader)?;
        let count: usize = header
            .strip_prefix("Genomes:")
            .and_then(|rest| rest.trim().parse().ok())
            .ok_or_else(|| LoadError::Malformed(header.clone()))?;
        if count == 0 {
            return Err(LoadError::Malformed(header));
        }

        let compat_line = read_line(reader)?;
        let compat_threshold: f64 = compat_line
            .strip_prefix("Compatibility:")
            .and_then(|rest| rest.trim().parse().ok())
            .ok_or_else(|| LoadError::Malformed(compat_line.clone()))?;

        let blank = read_line(reader)?;
        if !blank.is_empty() {
            return Err(LoadError::Malformed(blank));
        }

        let innovations = InnovationDatabase::load(reader)?;

        let mut genomes = Vec::with_capacity(count);
        for _ in 0..count {
            genomes.push(G::read_from(reader)?);
        }

        params.population_size = count;
        params.compat_threshold = compat_threshold;
        let next_genome_id = genomes.iter().map(G::id).max().map_or(0, |max| max + 1);

        let mut population = Population {
            species: Vec::new(),
            innovations,
            rng: SmallRng::seed_from_u64(rng_seed),
            generation: 0,
            num_evaluations: 0,
            next_genome_id,
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
        Ok(population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_params, TestConfig, TestGenome};

    fn saved_population() -> Vec<u8> {
        let mut population: Population<TestGenome> = Population::new(
            TestGenome::with_fitness(7, 0.0),
            TestConfig::default(),
            test_params(),
            false,
            0.0,
            0,
        );
        population.evaluate_fitness(|g| 1.0 + (g.id() % 3) as f64);
        let mut buffer = Vec::new();
        population.save(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn save_load_save_is_byte_identical() {
        let first = saved_population();
        let loaded: Population<TestGenome> = Population::load(
            &mut first.as_slice(),
            TestConfig::default(),
            test_params(),
            0,
        )
        .unwrap();
        let mut second = Vec::new();
        loaded.save(&mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn load_restores_counts_and_resumes_genome_ids() {
        let buffer = saved_population();
        let loaded: Population<TestGenome> = Population::load(
            &mut buffer.as_slice(),
            TestConfig::default(),
            test_params(),
            0,
        )
        .unwrap();

        assert_eq!(loaded.num_genomes(), test_params().population_size);
        let max_id = loaded.genomes().map(TestGenome::id).max().unwrap();
        assert_eq!(loaded.next_genome_id, max_id + 1);
        assert_eq!(
            loaded.parameters().compat_threshold,
            test_params().compat_threshold
        );
    }

    #[test]
    fn truncated_snapshot_is_rejected() {
        let mut buffer = saved_population();
        buffer.truncate(buffer.len() / 2);
        let result: Result<Population<TestGenome>, _> = Population::load(
            &mut buffer.as_slice(),
            TestConfig::default(),
            test_params(),
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn garbage_header_is_rejected() {
        let result: Result<Population<TestGenome>, _> = Population::load(
            &mut b"Genomes: zero\n".as_slice(),
            TestConfig::default(),
            test_params(),
            0,
        );
        assert!(matches!(result, Err(LoadError::Malformed(_))));
    }
}
