//! A scalar-trait genome used to exercise the population machinery
//! without real genetics.

use crate::errors::LoadError;
use crate::genome::Genome;
use crate::innovation::{parse_field, read_line, InnovationDatabase};
use crate::parameters::Parameters;
use crate::populations::SearchMode;

use rand::RngCore;

use std::io::{self, BufRead, Write};

/// Test genome whose "genes" are a single scalar trait;
/// compatibility distance is the absolute trait difference.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TestGenome {
    pub id: u64,
    pub trait_value: f64,
    pub links: usize,
    pub fitness: f64,
    pub adj_fitness: f64,
    pub offspring_amount: f64,
    pub evaluated: bool,
    pub parent: bool,
    pub behavior_slot: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TestConfig {
    /// Links added to a genome on every mutation.
    pub growth_per_mutation: usize,
}

impl TestGenome {
    pub fn with_fitness(id: u64, fitness: f64) -> TestGenome {
        TestGenome {
            id,
            trait_value: 0.0,
            links: 1,
            fitness,
            adj_fitness: 0.0,
            offspring_amount: 0.0,
            evaluated: true,
            parent: false,
            behavior_slot: None,
        }
    }
}

impl Genome for TestGenome {
    type Config = TestConfig;

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
        self.links
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        1
    }

    fn max_link_innovation(&self) -> u64 {
        self.links as u64
    }

    fn max_neuron_id(&self) -> u64 {
        2
    }

    fn behavior_slot(&self) -> Option<usize> {
        self.behavior_slot
    }

    fn set_behavior_slot(&mut self, slot: Option<usize>) {
        self.behavior_slot = slot;
    }

    fn compatibility_distance(&self, other: &Self, _config: &TestConfig) -> f64 {
        (self.trait_value - other.trait_value).abs()
    }

    fn mutate(
        &mut self,
        config: &TestConfig,
        _params: &Parameters,
        _mode: SearchMode,
        _innovations: &mut InnovationDatabase,
        _rng: &mut dyn RngCore,
    ) {
        self.links += config.growth_per_mutation;
    }

    fn crossover(&self, _other: &Self, _config: &TestConfig, _rng: &mut dyn RngCore) -> Self {
        self.clone()
    }

    fn randomize_link_weights(&mut self, _range: f64, _rng: &mut dyn RngCore) {}

    fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(
            writer,
            "TestGenome {} {} {} {}",
            self.id, self.trait_value, self.links, self.fitness
        )
    }

    fn read_from(reader: &mut dyn BufRead) -> Result<Self, LoadError> {
        let line = read_line(reader)?;
        let mut fields = line
            .strip_prefix("TestGenome")
            .ok_or_else(|| LoadError::Malformed(line.clone()))?
            .split_whitespace();
        let id = parse_field(&mut fields, &line)?;
        let trait_value = parse_field(&mut fields, &line)?;
        let links = parse_field(&mut fields, &line)?;
        let fitness = parse_field(&mut fields, &line)?;
        let mut genome = TestGenome::with_fitness(id, fitness);
        genome.trait_value = trait_value;
        genome.links = links;
        Ok(genome)
    }
}

pub(crate) fn test_params() -> Parameters {
    Parameters {
        population_size: 20,
        dynamic_compatibility: false,
        ..Parameters::default()
    }
}
