// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use rand::Rng;

use crate::gate::{Circuit, Gate, GateName};
use crate::generators::Generator;

/// Gates that may follow the preparation of the qubits.
static BASIC_VOCABULARY: [GateName; 5] = [
    GateName::X,
    GateName::Y,
    GateName::Z,
    GateName::Cnot,
    GateName::Measure,
];
static WORKSHOP_VOCABULARY: [GateName; 4] =
    [GateName::X, GateName::Y, GateName::Cnot, GateName::Measure];

/// Attributes needed to produce circuits.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CircuitAttributes {
    /// Number of qubits of the machine.
    pub num_qubits: usize,
    /// Maximum number of gates in a circuit, including preparation.
    pub max_gates: usize,
}

impl CircuitAttributes {
    fn valid(&self) -> anyhow::Result<()> {
        let mut errors = vec![];
        if self.num_qubits < 2 {
            errors.push(format!(
                "at least two qubits needed for two-qubit gates, found {}",
                self.num_qubits
            ));
        }
        if self.max_gates < self.num_qubits {
            errors.push(format!(
                "maximum number of gates ({}) smaller than the number of qubits ({})",
                self.max_gates, self.num_qubits
            ));
        }
        if !errors.is_empty() {
            anyhow::bail!("invalid circuit attributes: {}", errors.join(","))
        }
        Ok(())
    }
}

/// Circuit generator trait object that can be moved across workers.
pub type DynCircuitGenerator =
    dyn Generator<Instance = Circuit, Attributes = CircuitAttributes> + Send;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub enum CircuitGeneratorConf {
    /// Always produce empty circuits.
    Null,
    /// Random gates from x, y, z, cnot, measure.
    #[default]
    Basic,
    /// Random gates from x, y, cnot, measure.
    Workshop,
}

impl std::fmt::Display for CircuitGeneratorConf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Null => "null",
                Self::Basic => "basic",
                Self::Workshop => "workshop",
            }
        )
    }
}

impl CircuitGeneratorConf {
    /// Create a new generator, not yet bound to its attributes.
    pub fn build(&self, seed: Option<u64>) -> Box<DynCircuitGenerator> {
        match self {
            Self::Null => Box::new(NullCircuitGenerator),
            Self::Basic => Box::new(BasicCircuitGenerator::new(seed)),
            Self::Workshop => Box::new(WorkshopCircuitGenerator::new(seed)),
        }
    }
}

/// Circuit generator that always produces empty circuits.
#[derive(Debug, Default, Clone)]
pub struct NullCircuitGenerator;

impl Generator for NullCircuitGenerator {
    type Instance = Circuit;
    type Attributes = CircuitAttributes;

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

/// Draw a random circuit: all the qubits are prepared in increasing order,
/// then gates from `vocabulary` follow, with uniform probability, up to a
/// total length drawn uniformly in [num_qubits, max_gates].
fn random_circuit(
    rng: &mut rand::rngs::StdRng,
    attributes: &CircuitAttributes,
    vocabulary: &[GateName],
) -> Circuit {
    let num_qubits = attributes.num_qubits;
    let num_gates = rng.gen_range(num_qubits..=attributes.max_gates);

    let mut circuit = Vec::with_capacity(num_gates);
    for q in 0..num_qubits {
        circuit.push(Gate::single(GateName::Prep, q));
    }
    for _ in num_qubits..num_gates {
        let name = vocabulary[rng.gen_range(0..vocabulary.len())];
        let q1 = rng.gen_range(0..num_qubits);
        let q2 = if name.is_two_qubit() {
            // Skip q1 so that the operands are always distinct.
            let q2 = rng.gen_range(0..(num_qubits - 1));
            if q2 >= q1 {
                q2 + 1
            } else {
                q2
            }
        } else {
            q1
        };
        circuit.push(Gate::new(name, q1, q2));
    }
    circuit
}

macro_rules! random_circuit_generator {
    ($name:ident, $vocabulary:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone)]
        pub struct $name {
            rng: rand::rngs::StdRng,
            attributes: Option<CircuitAttributes>,
        }

        impl $name {
            pub fn new(seed: Option<u64>) -> Self {
                Self {
                    rng: crate::generators::rng_from_seed(seed),
                    attributes: None,
                }
            }

            /// Number of qubits, if bound.
            pub fn num_qubits(&self) -> Option<usize> {
                self.attributes.as_ref().map(|x| x.num_qubits)
            }

            /// Maximum number of gates, if bound.
            pub fn max_gates(&self) -> Option<usize> {
                self.attributes.as_ref().map(|x| x.max_gates)
            }
        }

        impl Generator for $name {
            type Instance = Circuit;
            type Attributes = CircuitAttributes;

            fn finite(&self) -> bool {
                false
            }

            fn set_state_attributes(
                &mut self,
                attributes: &Self::Attributes,
            ) -> anyhow::Result<()> {
                attributes.valid()?;
                self.attributes = Some(attributes.clone());
                Ok(())
            }

            fn produce(&mut self) -> anyhow::Result<Self::Instance> {
                let attributes = self.attributes.as_ref().ok_or(anyhow::anyhow!(
                    "circuit generator used before being bound"
                ))?;
                Ok(random_circuit(&mut self.rng, attributes, &$vocabulary))
            }

            fn reseed(&mut self, seed: u64) {
                self.rng = crate::generators::rng_from_seed(Some(seed));
            }
        }
    };
}

random_circuit_generator!(
    BasicCircuitGenerator,
    BASIC_VOCABULARY,
    "Circuit generator using gates x, y, z, cnot, and measure."
);
random_circuit_generator!(
    WorkshopCircuitGenerator,
    WORKSHOP_VOCABULARY,
    "Circuit generator with a reduced set of gates: x, y, cnot, and measure."
);

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(num_qubits: usize, max_gates: usize) -> CircuitAttributes {
        CircuitAttributes {
            num_qubits,
            max_gates,
        }
    }

    fn check_circuit(
        circuit: &Circuit,
        num_qubits: usize,
        max_gates: usize,
        vocabulary: &[GateName],
    ) {
        assert!(num_qubits <= circuit.len());
        assert!(circuit.len() <= max_gates);

        for (i, gate) in circuit.iter().take(num_qubits).enumerate() {
            assert_eq!(GateName::Prep, gate.name);
            assert_eq!(i, gate.q1);
            assert_eq!(i, gate.q2);
        }

        for gate in circuit.iter().skip(num_qubits) {
            assert!(vocabulary.contains(&gate.name), "unexpected gate {}", gate);
            assert!(gate.q1 < num_qubits);
            assert!(gate.q2 < num_qubits);
            if gate.name == GateName::Cnot {
                assert_ne!(gate.q1, gate.q2);
            } else {
                assert_eq!(gate.q1, gate.q2);
            }
        }
    }

    #[test]
    fn test_circuit_null_generator() -> anyhow::Result<()> {
        let mut generator = NullCircuitGenerator;
        assert!(!generator.finite());
        for (num_qubits, max_gates) in [(0, 0), (5, 50), (10, 1)] {
            generator.set_state_attributes(&attributes(num_qubits, max_gates))?;
            for _ in 0..100 {
                assert!(generator.produce()?.is_empty());
            }
        }
        Ok(())
    }

    #[test]
    fn test_circuit_basic_set_state_attributes() -> anyhow::Result<()> {
        let mut generator = BasicCircuitGenerator::new(None);
        assert!(!generator.finite());
        assert!(generator.num_qubits().is_none());
        assert!(generator.max_gates().is_none());
        assert!(generator.produce().is_err());

        assert!(generator.set_state_attributes(&attributes(0, 50)).is_err());
        assert!(generator.set_state_attributes(&attributes(1, 50)).is_err());
        assert!(generator.set_state_attributes(&attributes(5, 4)).is_err());
        assert!(generator.num_qubits().is_none());

        generator.set_state_attributes(&attributes(5, 50))?;
        assert_eq!(Some(5), generator.num_qubits());
        assert_eq!(Some(50), generator.max_gates());

        generator.set_state_attributes(&attributes(3, 3))?;
        assert_eq!(Some(3), generator.num_qubits());
        assert_eq!(Some(3), generator.max_gates());

        Ok(())
    }

    #[test]
    fn test_circuit_basic_produce() -> anyhow::Result<()> {
        let mut generator = BasicCircuitGenerator::new(Some(42));
        generator.set_state_attributes(&attributes(5, 50))?;
        for _ in 0..100 {
            check_circuit(&generator.produce()?, 5, 50, &BASIC_VOCABULARY);
        }
        Ok(())
    }

    #[test]
    fn test_circuit_basic_only_prep() -> anyhow::Result<()> {
        let mut generator = BasicCircuitGenerator::new(Some(42));
        generator.set_state_attributes(&attributes(4, 4))?;
        for _ in 0..10 {
            let circuit = generator.produce()?;
            assert_eq!(4, circuit.len());
            assert!(circuit.iter().all(|g| g.name == GateName::Prep));
        }
        Ok(())
    }

    #[test]
    fn test_circuit_workshop_produce() -> anyhow::Result<()> {
        let mut generator = WorkshopCircuitGenerator::new(Some(42));
        assert!(!generator.finite());
        assert!(generator.produce().is_err());
        generator.set_state_attributes(&attributes(5, 50))?;
        assert_eq!(Some(5), generator.num_qubits());
        assert_eq!(Some(50), generator.max_gates());
        for _ in 0..100 {
            let circuit = generator.produce()?;
            check_circuit(&circuit, 5, 50, &WORKSHOP_VOCABULARY);
            assert!(circuit.iter().all(|g| g.name != GateName::Z));
        }
        Ok(())
    }

    #[test]
    fn test_circuit_seed() -> anyhow::Result<()> {
        let generators: [fn(Option<u64>) -> Box<DynCircuitGenerator>; 2] = [
            |seed| CircuitGeneratorConf::Basic.build(seed),
            |seed| CircuitGeneratorConf::Workshop.build(seed),
        ];
        for build in generators {
            let mut generator1 = build(Some(1));
            let mut generator2 = build(Some(1));
            let mut generator3 = build(Some(3));
            for generator in [&mut generator1, &mut generator2, &mut generator3] {
                generator.set_state_attributes(&attributes(10, 200))?;
            }

            let mut differ = false;
            for _ in 0..10 {
                let circuit1 = generator1.produce()?;
                let circuit2 = generator2.produce()?;
                let circuit3 = generator3.produce()?;
                assert_eq!(circuit1, circuit2);
                differ |= circuit1 != circuit3;
            }
            assert!(differ);
        }
        Ok(())
    }

    #[test]
    fn test_circuit_reseed() -> anyhow::Result<()> {
        let mut generator = BasicCircuitGenerator::new(Some(7));
        generator.set_state_attributes(&attributes(6, 30))?;
        let first = generator.produce()?;
        generator.produce()?;
        generator.reseed(7);
        assert_eq!(first, generator.produce()?);
        Ok(())
    }
}
