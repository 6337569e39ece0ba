use serde::{Deserialize, Serialize};

use std::fmt;

/// Link genes are the principal components of genomes. They are
/// created between two neuron genes, and become weighted network
/// connections in the genome's phenotype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkGene {
    innovation: u64,
    from: u64,
    to: u64,
    weight: f64,
}

impl LinkGene {
    /// Returns a new link gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use polyneat_nn::genomics::LinkGene;
    ///
    /// let link = LinkGene::new(42, 3, 9, 2.0);
    /// assert_eq!(link.innovation(), 42);
    /// assert_eq!(link.weight(), 2.0);
    /// ```
    pub fn new(innovation: u64, from: u64, to: u64, weight: f64) -> LinkGene {
        LinkGene {
            innovation,
            from,
            to,
            weight,
        }
    }

    pub fn innovation(&self) -> u64 {
        self.innovation
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

impl fmt::Display for LinkGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({:+.3})",
            self.innovation, self.from, self.to, self.weight
        )
    }
}
