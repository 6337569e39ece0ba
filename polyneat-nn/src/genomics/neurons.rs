use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Slope of the sigmoid activation, steep enough to approximate a
/// step function while staying differentiable.
const SIGMOID_SLOPE: f64 = 4.9;

/// An ActivationType represents the type of activation function
/// the neuron's network equivalent will use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationType {
    /// 1 / (1 + exp(-4.9x))
    UnsignedSigmoid,
    /// tanh(x)
    Tanh,
    /// x
    Identity,
    /// max(0, x)
    Relu,
}

impl ActivationType {
    /// Applies the activation function to the passed excitation.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            ActivationType::UnsignedSigmoid => 1.0 / (1.0 + (-SIGMOID_SLOPE * x).exp()),
            ActivationType::Tanh => x.tanh(),
            ActivationType::Identity => x,
            ActivationType::Relu => x.max(0.0),
        }
    }
}

impl fmt::Display for ActivationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivationType::UnsignedSigmoid => "unsigned_sigmoid",
            ActivationType::Tanh => "tanh",
            ActivationType::Identity => "identity",
            ActivationType::Relu => "relu",
        })
    }
}

impl FromStr for ActivationType {
    type Err = ();

    fn from_str(s: &str) -> Result<ActivationType, ()> {
        match s {
            "unsigned_sigmoid" => Ok(ActivationType::UnsignedSigmoid),
            "tanh" => Ok(ActivationType::Tanh),
            "identity" => Ok(ActivationType::Identity),
            "relu" => Ok(ActivationType::Relu),
            _ => Err(()),
        }
    }
}

/// A NeuronKind indicates the function of the neuron's network
/// equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeuronKind {
    /// Input neurons, including any bias line the domain feeds.
    Input,
    /// Output neurons.
    Output,
    /// Hidden neurons, created by link splits.
    Hidden,
}

impl fmt::Display for NeuronKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NeuronKind::Input => "input",
            NeuronKind::Output => "output",
            NeuronKind::Hidden => "hidden",
        })
    }
}

impl FromStr for NeuronKind {
    type Err = ();

    fn from_str(s: &str) -> Result<NeuronKind, ()> {
        match s {
            "input" => Ok(NeuronKind::Input),
            "output" => Ok(NeuronKind::Output),
            "hidden" => Ok(NeuronKind::Hidden),
            _ => Err(()),
        }
    }
}

/// Neuron genes are the structural elements of genomes between
/// which links are created.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeuronGene {
    id: u64,
    kind: NeuronKind,
    activation: ActivationType,
}

impl NeuronGene {
    /// Returns a new neuron gene with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use polyneat_nn::genomics::{ActivationType, NeuronGene, NeuronKind};
    ///
    /// let neuron = NeuronGene::new(5, NeuronKind::Hidden, ActivationType::UnsignedSigmoid);
    /// assert_eq!(neuron.id(), 5);
    /// ```
    pub fn new(id: u64, kind: NeuronKind, activation: ActivationType) -> NeuronGene {
        NeuronGene {
            id,
            kind,
            activation,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    pub fn activation(&self) -> ActivationType {
        self.activation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_values() {
        assert_eq!(ActivationType::Identity.apply(-3.5), -3.5);
        assert_eq!(ActivationType::Relu.apply(-1.0), 0.0);
        assert_eq!(ActivationType::Relu.apply(2.0), 2.0);
        assert_eq!(ActivationType::UnsignedSigmoid.apply(0.0), 0.5);
        assert!(ActivationType::UnsignedSigmoid.apply(10.0) > 0.99);
        assert!(ActivationType::UnsignedSigmoid.apply(-10.0) < 0.01);
    }

    #[test]
    fn kind_and_activation_tokens_round_trip() {
        for kind in [NeuronKind::Input, NeuronKind::Output, NeuronKind::Hidden] {
            assert_eq!(kind.to_string().parse::<NeuronKind>(), Ok(kind));
        }
        for activation in [
            ActivationType::UnsignedSigmoid,
            ActivationType::Tanh,
            ActivationType::Identity,
            ActivationType::Relu,
        ] {
            assert_eq!(activation.to_string().parse::<ActivationType>(), Ok(activation));
        }
    }
}
