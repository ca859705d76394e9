// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use rand::Rng;

use crate::generators::Generator;
use crate::interaction::Interactions;

/// Attributes needed to produce interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionAttributes {
    /// Number of logical qubits, equal to the physical ones.
    pub num_qubits: usize,
}

impl From<&crate::topology::Topology> for InteractionAttributes {
    fn from(topology: &crate::topology::Topology) -> Self {
        Self {
            num_qubits: topology.num_qubits(),
        }
    }
}

/// Interaction generator trait object that can be moved across workers.
pub type DynInteractionGenerator =
    dyn Generator<Instance = Interactions, Attributes = InteractionAttributes> + Send;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum InteractionGeneratorConf {
    /// Always produce no interactions.
    Null,
    /// Produce at most `max_length` random interactions.
    Basic(BasicInteractionConf),
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BasicInteractionConf {
    pub max_length: usize,
}

impl Default for InteractionGeneratorConf {
    fn default() -> Self {
        Self::Basic(BasicInteractionConf { max_length: 10 })
    }
}

impl std::fmt::Display for InteractionGeneratorConf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Basic(conf) => write!(f, "basic-{}", conf.max_length),
        }
    }
}

impl InteractionGeneratorConf {
    /// Create a new generator, not yet bound to its attributes.
    pub fn build(&self, seed: Option<u64>) -> anyhow::Result<Box<DynInteractionGenerator>> {
        let generator: Box<DynInteractionGenerator> = match self {
            Self::Null => Box::new(NullInteractionGenerator),
            Self::Basic(conf) => Box::new(BasicInteractionGenerator::new(conf.max_length, seed)?),
        };
        Ok(generator)
    }
}

/// Interaction generator that never produces interactions.
#[derive(Debug, Default, Clone)]
pub struct NullInteractionGenerator;

impl Generator for NullInteractionGenerator {
    type Instance = Interactions;
    type Attributes = InteractionAttributes;

    fn finite(&self) -> bool {
        false
    }

    fn set_state_attributes(&mut self, _attributes: &Self::Attributes) -> anyhow::Result<()> {
        Ok(())
    }

    fn produce(&mut self) -> anyhow::Result<Self::Instance> {
        Ok(vec![])
    }

    fn reseed(&mut self, _seed: u64) {}
}

/// Interaction generator drawing pairs of distinct logical qubits uniformly
/// at random, without repetitions.
///
/// The number of pairs is drawn uniformly between 1 and the smallest of
/// `max_length` and the number of distinct pairs.
#[derive(Debug, Clone)]
pub struct BasicInteractionGenerator {
    max_length: usize,
    rng: rand::rngs::StdRng,
    attributes: Option<InteractionAttributes>,
}

impl BasicInteractionGenerator {
    pub fn new(max_length: usize, seed: Option<u64>) -> anyhow::Result<Self> {
        anyhow::ensure!(max_length > 0, "vanishing maximum number of interactions");
        Ok(Self {
            max_length,
            rng: crate::generators::rng_from_seed(seed),
            attributes: None,
        })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Number of logical qubits, if bound.
    pub fn num_qubits(&self) -> Option<usize> {
        self.attributes.as_ref().map(|x| x.num_qubits)
    }
}

impl Generator for BasicInteractionGenerator {
    type Instance = Interactions;
    type Attributes = InteractionAttributes;

    fn finite(&self) -> bool {
        false
    }

    fn set_state_attributes(&mut self, attributes: &Self::Attributes) -> anyhow::Result<()> {
        anyhow::ensure!(
            attributes.num_qubits >= 2,
            "cannot draw interactions among {} logical qubits",
            attributes.num_qubits
        );
        self.attributes = Some(attributes.clone());
        Ok(())
    }

    fn produce(&mut self) -> anyhow::Result<Self::Instance> {
        let num_qubits = self
            .num_qubits()
            .ok_or(anyhow::anyhow!("interaction generator used before being bound"))?;

        let num_pairs = num_qubits * (num_qubits - 1) / 2;
        let length = self.rng.gen_range(1..=std::cmp::min(self.max_length, num_pairs));

        Ok(
            rand::seq::index::sample(&mut self.rng, num_pairs, length)
                .into_iter()
                .map(|ndx| pair_from_index(num_qubits, ndx))
                .collect(),
        )
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = crate::generators::rng_from_seed(Some(seed));
    }
}

/// Return the pair (u, v), with u < v, in position `ndx` of the sequence
/// (0,1), (0,2), ..., (0,n-1), (1,2), ..., (n-2,n-1).
fn pair_from_index(num_qubits: usize, mut ndx: usize) -> (usize, usize) {
    let mut u = 0;
    while ndx >= num_qubits - 1 - u {
        ndx -= num_qubits - 1 - u;
        u += 1;
    }
    (u, u + 1 + ndx)
}
