//! An implementation of the evolutionary core of NeuroEvolution of
//! Augmenting Topologies, with phased (complexifying/simplifying)
//! search and novelty search.
//!
//! The crate is genome-agnostic: evolution is driven through the
//! [`Genome`] trait, which exposes identity, fitness bookkeeping,
//! structural summaries and the genetic operators, while the
//! population machinery supplies speciation, explicit fitness
//! sharing, offspring allotment, innovation tracking, and two
//! interchangeable evolution loops:
//!
//! - [`Population::epoch`], the generational loop: evaluate every
//!   member externally (e.g. via [`Population::evaluate_fitness`]),
//!   then let an epoch cull, reproduce and re-speciate the whole
//!   population at once;
//! - [`Population::tick`], the steady-state loop: one death and one
//!   birth per call, with the newborn handed back for evaluation.
//!
//! Novelty search is layered on the steady-state loop through
//! [`PhenotypeBehavior`] descriptors and
//! [`Population::novelty_search_tick`], which replaces fitness by
//! sparseness in behavior space.
//!
//! A neural-network genome implementing [`Genome`], along with a
//! network phenotype, is supplied by the `polyneat-nn` crate; the
//! `xor` crate in this workspace shows a complete driver built on
//! the two.
//!
//! Populations are deterministic given their RNG seed: all
//! randomness flows from a generator seeded at construction, and
//! snapshots written by [`Population::save`] round-trip through
//! [`Population::load`] byte-identically.

mod errors;
mod genome;
mod innovation;
mod parameters;
mod populations;
#[cfg(test)]
mod test_support;

pub use errors::LoadError;
pub use genome::Genome;
pub use innovation::{InnovationDatabase, InnovationId, NeuronId};
pub use parameters::Parameters;
pub use populations::{
    EvolutionLogger, GenerationMemberRecord, GenomeHandle, Log, NullBehavior, PhenotypeBehavior,
    Population, ReportingLevel, SearchMode, Species, Stats,
};
