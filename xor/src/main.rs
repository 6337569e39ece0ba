//! Evolves an XOR function approximator and prints the champion.

use polyneat::{Genome, Parameters, Population};
use polyneat_nn::genomics::{GeneticConfig, NNGenome};
use polyneat_nn::networks::Network;

use rayon::prelude::*;

use std::num::NonZeroUsize;

/// Three inputs: the two operands plus a constant bias line.
const XOR_ROWS: [([f64; 3], f64); 4] = [
    ([0.0, 0.0, 1.0], 0.0),
    ([0.0, 1.0, 1.0], 1.0),
    ([1.0, 0.0, 1.0], 1.0),
    ([1.0, 1.0, 1.0], 0.0),
];

/// Negated total error over the four XOR rows; a perfect network
/// scores 0.
fn evaluate_xor(genome: &NNGenome) -> f64 {
    let mut network = Network::from(genome);
    -XOR_ROWS
        .iter()
        .map(|(inputs, target)| (network.evaluate_at(inputs)[0] - target).abs())
        .sum::<f64>()
}

fn main() {
    env_logger::init();

    let config = GeneticConfig {
        input_count: NonZeroUsize::new(3).unwrap(),
        output_count: NonZeroUsize::new(1).unwrap(),
        ..GeneticConfig::default()
    };
    let params = Parameters {
        population_size: 100,
        dynamic_compatibility: true,
        compat_threshold: 2.0,
        min_species: 2,
        max_species: 10,
        young_age_threshold: 15,
        old_age_threshold: 35,
        species_dropoff_age: 15,
        survival_rate: 0.2,
        elitism: 1,
        crossover_rate: 0.7,
        roulette_wheel_selection: false,
        ..Parameters::default()
    };

    let seed = NNGenome::new(&config);
    let mut population: Population<NNGenome> = Population::new(seed, config, params, true, 1.0, 0);

    for generation in 1..=21 {
        let fitnesses: Vec<f64> = population
            .genomes()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|genome| evaluate_xor(genome))
            .collect();
        let best = fitnesses.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for (genome, fitness) in population.genomes_mut().zip(fitnesses) {
            genome.set_fitness(fitness);
            genome.set_evaluated(true);
        }

        println!(
            "Generation: {:2}, best fitness: {:+.6}, species: {}, mean complexity: {:.2}",
            generation,
            best,
            population.species().count(),
            population.mean_complexity(),
        );
        population.epoch();
    }

    println!("best fitness ever: {:+.8}", population.best_fitness_ever());
    if let Some(champion) = population.best_genome_ever() {
        println!("champion ({} links): {}", champion.num_links(), ron::to_string(champion).unwrap());
    }
}
