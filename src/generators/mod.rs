// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use rand::SeedableRng;

pub mod circuit;
pub mod interaction;

/// A stateful producer of workload instances.
///
/// A generator can be created before the size of the problem is known, and
/// bound later to it with `set_state_attributes`, which can be called again
/// to rebind the generator to different attributes. Every generator owns its
/// pseudo-random number generator: two generators of the same type created
/// with the same seed and attributes produce the same sequence of instances.
pub trait Generator {
    type Instance;
    type Attributes;

    /// Return true if the sequence of instances produced may end.
    fn finite(&self) -> bool;

    /// Bind the generator to the attributes of the problem.
    fn set_state_attributes(&mut self, attributes: &Self::Attributes) -> anyhow::Result<()>;

    /// Produce the next instance.
    ///
    /// Return an error if the generator has not been bound to its
    /// attributes yet.
    fn produce(&mut self) -> anyhow::Result<Self::Instance>;

    /// Reinitialize the pseudo-random number generator with a given seed.
    fn reseed(&mut self, seed: u64);
}

/// Lazy sequence of the instances produced by a generator.
///
/// The sequence ends after the first error.
pub struct Instances<'a, G: ?Sized> {
    generator: &'a mut G,
    failed: bool,
}

impl<G: Generator + ?Sized> Iterator for Instances<'_, G> {
    type Item = anyhow::Result<G::Instance>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let ret = self.generator.produce();
        self.failed = ret.is_err();
        Some(ret)
    }
}

/// Return a lazy sequence drawing instances from the given generator.
pub fn instances<G: Generator + ?Sized>(generator: &mut G) -> Instances<'_, G> {
    Instances {
        generator,
        failed: false,
    }
}

/// Create a pseudo-random number generator from an optional seed.
/// Without a seed the state is initialized from the operating system.
pub fn rng_from_seed(seed: Option<u64>) -> rand::rngs::StdRng {
    match seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::interaction::{BasicInteractionGenerator, InteractionAttributes};
    use super::{instances, Generator};

    #[test]
    fn test_generators_instances_lazy() -> anyhow::Result<()> {
        let mut generator = BasicInteractionGenerator::new(5, Some(42))?;
        generator.set_state_attributes(&InteractionAttributes { num_qubits: 4 })?;

        let drawn = instances(&mut generator)
            .take(20)
            .collect::<anyhow::Result<Vec<_>>>()?;
        assert_eq!(20, drawn.len());

        let mut other = BasicInteractionGenerator::new(5, Some(42))?;
        other.set_state_attributes(&InteractionAttributes { num_qubits: 4 })?;
        for expected in drawn {
            assert_eq!(expected, other.produce()?);
        }

        Ok(())
    }

    #[test]
    fn test_generators_instances_stop_on_error() -> anyhow::Result<()> {
        let mut generator = BasicInteractionGenerator::new(5, Some(42))?;
        let mut seq = instances(&mut generator);
        assert!(matches!(seq.next(), Some(Err(_))));
        assert!(seq.next().is_none());
        Ok(())
    }
}
