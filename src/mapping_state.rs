// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::generators::interaction::{DynInteractionGenerator, InteractionAttributes};
use crate::generators::Generator;
use crate::interaction::InteractionGraph;
use crate::mapping::Mapping;
use crate::topology::Topology;

/// An episode is truncated after this many steps per physical qubit.
static TRUNCATION_FACTOR: u64 = 10;

/// What an agent can see of the state.
#[derive(Debug, serde::Serialize)]
pub struct Observation<'a> {
    /// Logical qubit assigned to each physical qubit, or the number of
    /// qubits if unassigned.
    pub mapping: &'a [usize],
    /// Flattened interaction matrix.
    pub interaction_matrix: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MappedQubits {
    pub physical: std::collections::BTreeSet<usize>,
    pub logical: std::collections::BTreeSet<usize>,
}

/// Diagnostic information about the state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Info {
    pub steps_done: u64,
    pub mapping: Vec<usize>,
    /// Physical qubit of every logical qubit assigned.
    pub mapping_dict: std::collections::BTreeMap<usize, usize>,
    pub mapped_qubits: MappedQubits,
}

/// State of the initial mapping of logical qubits onto the physical qubits
/// of a given topology.
///
/// At every reset a new interaction graph is adopted, either provided by the
/// caller or drawn from the interaction generator, and the mapping is
/// emptied. Then, every update tries to assign one logical qubit to one
/// physical qubit.
pub struct MappingState {
    topology: Topology,
    generator: Box<DynInteractionGenerator>,
    interaction: InteractionGraph,
    mapping: Mapping,
    steps_done: u64,
}

impl MappingState {
    /// Create a new state, binding the generator to the topology and drawing
    /// the first interaction graph.
    pub fn new(
        topology: &Topology,
        mut generator: Box<DynInteractionGenerator>,
    ) -> anyhow::Result<Self> {
        let num_qubits = topology.num_qubits();
        anyhow::ensure!(num_qubits > 0, "vanishing number of physical qubits");

        generator.set_state_attributes(&InteractionAttributes::from(topology))?;
        let interaction = Self::draw_interaction(generator.as_mut(), num_qubits)?;

        Ok(Self {
            topology: topology.clone(),
            generator,
            interaction,
            mapping: Mapping::new(num_qubits),
            steps_done: 0,
        })
    }

    fn draw_interaction(
        generator: &mut DynInteractionGenerator,
        num_qubits: usize,
    ) -> anyhow::Result<InteractionGraph> {
        let pairs = generator.produce()?;
        InteractionGraph::from_pairs(num_qubits, &pairs)
    }

    /// Start a new episode.
    ///
    /// Parameters:
    /// - `seed`: if present, the generator is reseeded before drawing;
    ///   this is meant to be done only once, before the first episode
    /// - `interaction`: the interaction graph to be used, which is copied;
    ///   if None a new one is drawn from the generator
    ///
    /// If an error is returned the state is left unchanged.
    pub fn reset(
        &mut self,
        seed: Option<u64>,
        interaction: Option<&InteractionGraph>,
    ) -> anyhow::Result<&mut Self> {
        let num_qubits = self.num_qubits();
        if let Some(interaction) = interaction {
            anyhow::ensure!(
                interaction.num_qubits() == num_qubits,
                "interaction graph with {} logical qubits, expected {}",
                interaction.num_qubits(),
                num_qubits
            );
        }

        if let Some(seed) = seed {
            self.generator.reseed(seed);
        }

        let interaction = match interaction {
            Some(interaction) => interaction.clone(),
            None => Self::draw_interaction(self.generator.as_mut(), num_qubits)?,
        };
        log::debug!(
            "reset with {} interactions among {} qubits",
            interaction.num_interactions(),
            num_qubits
        );

        self.interaction = interaction;
        self.mapping.clear();
        self.steps_done = 0;
        Ok(self)
    }

    /// Try to assign `action.1` (logical qubit) to `action.0` (physical
    /// qubit).
    ///
    /// The number of steps is always increased. If any of the two qubits is
    /// already assigned, or out of range, then the action is ignored.
    /// Return true if the assignment was made.
    pub fn update(&mut self, action: (usize, usize)) -> bool {
        self.steps_done += 1;
        let (physical, logical) = action;
        let applied = self.mapping.assign(physical, logical);
        if !applied {
            log::trace!(
                "step {}: ignored action ({},{})",
                self.steps_done,
                physical,
                logical
            );
        }
        applied
    }

    /// Return true if all the logical qubits have been assigned.
    pub fn is_done(&self) -> bool {
        self.mapping.is_complete()
    }

    /// Return true if the episode lasted more than ten steps per qubit.
    pub fn is_truncated(&self) -> bool {
        self.steps_done > self.num_qubits() as u64 * TRUNCATION_FACTOR
    }

    pub fn observe(&self) -> Observation<'_> {
        Observation {
            mapping: self.mapping.as_slice(),
            interaction_matrix: self.interaction.matrix(),
        }
    }

    pub fn info(&self) -> Info {
        Info {
            steps_done: self.steps_done,
            mapping: self.mapping.as_slice().to_vec(),
            mapping_dict: self.mapping.logical_to_physical().clone(),
            mapped_qubits: MappedQubits {
                physical: self.mapping.mapped_physical().clone(),
                logical: self.mapping.mapped_logical().clone(),
            },
        }
    }

    /// Number of physical qubits, equal to the number of logical qubits.
    pub fn num_qubits(&self) -> usize {
        self.topology.num_qubits()
    }

    pub fn steps_done(&self) -> u64 {
        self.steps_done
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn interaction(&self) -> &InteractionGraph {
        &self.interaction
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Return the number of interactions whose logical qubits are both
    /// assigned to physical qubits that are directly connected.
    pub fn adjacent_interactions(&self) -> usize {
        self.interaction
            .pairs()
            .iter()
            .filter(
                |(u, v)| match (self.mapping.physical(*u), self.mapping.physical(*v)) {
                    // Assigned physical qubits are always nodes of the topology.
                    (Some(p), Some(q)) => self
                        .topology
                        .graph()
                        .find_edge((p as u32).into(), (q as u32).into())
                        .is_some(),
                    _ => false,
                },
            )
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::MappingState;
    use crate::generators::interaction::{BasicInteractionGenerator, NullInteractionGenerator};
    use crate::interaction::InteractionGraph;
    use crate::topology::Topology;

    fn null_state(num_qubits: u32) -> MappingState {
        MappingState::new(
            &Topology::line(num_qubits).unwrap(),
            Box::new(NullInteractionGenerator),
        )
        .unwrap()
    }

    #[test]
    fn test_mapping_state_new() -> anyhow::Result<()> {
        let state = crate::tests::grid_3_3_state(42);
        assert_eq!(9, state.num_qubits());
        assert_eq!(0, state.steps_done());
        assert_eq!(vec![9; 9], state.observe().mapping.to_vec());
        assert_eq!(81, state.observe().interaction_matrix.len());
        assert!(state.interaction().num_interactions() > 0);

        let state = null_state(4);
        assert!(state.observe().interaction_matrix.iter().all(|x| *x == 0));
        Ok(())
    }

    #[test]
    fn test_mapping_state_new_generator_mismatch() -> anyhow::Result<()> {
        // A single qubit cannot have interactions.
        assert!(MappingState::new(
            &Topology::empty(1)?,
            Box::new(BasicInteractionGenerator::new(10, Some(0))?)
        )
        .is_err());
        assert!(MappingState::new(&Topology::empty(1)?, Box::new(NullInteractionGenerator)).is_ok());
        Ok(())
    }

    #[test]
    fn test_mapping_state_no_op_on_conflict() {
        let mut state = null_state(9);
        assert!(state.update((2, 5)));
        let before = state.info();

        assert!(!state.update((2, 7)));
        let after = state.info();
        assert_eq!(before.steps_done + 1, after.steps_done);
        assert_eq!(before.mapping, after.mapping);
        assert_eq!(before.mapping_dict, after.mapping_dict);
        assert_eq!(before.mapped_qubits, after.mapped_qubits);

        assert!(!state.update((3, 5)));
        assert!(!state.update((9, 0)));
        assert!(!state.update((0, 9)));
        assert_eq!(before.mapping, state.info().mapping);
        assert_eq!(5, state.steps_done());
    }

    #[test]
    fn test_mapping_state_termination() {
        let mut state = null_state(9);
        for i in 0..9 {
            assert!(!state.is_done());
            // Repeated actions do not count.
            state.update((i, (i + 4) % 9));
            state.update((i, (i + 4) % 9));
        }
        assert!(state.is_done());
        assert_eq!(18, state.steps_done());
        assert!(!state.is_truncated());

        while state.steps_done() < 90 {
            state.update((0, 0));
            assert!(!state.is_truncated());
        }
        state.update((0, 0));
        assert_eq!(91, state.steps_done());
        assert!(state.is_truncated());
        assert!(state.is_done());
    }

    #[test]
    fn test_mapping_state_truncated_not_done() {
        let mut state = null_state(3);
        for _ in 0..30 {
            state.update((0, 0));
        }
        assert!(!state.is_truncated());
        state.update((1, 1));
        assert!(state.is_truncated());
        assert!(!state.is_done());
    }

    #[test]
    fn test_mapping_state_reset() -> anyhow::Result<()> {
        let mut state = crate::tests::grid_3_3_state(42);
        state.update((0, 1));
        state.update((1, 0));
        state.reset(None, None)?;

        let info = state.info();
        assert_eq!(0, info.steps_done);
        assert_eq!(vec![9; 9], info.mapping);
        assert!(info.mapping_dict.is_empty());
        assert!(info.mapped_qubits.physical.is_empty());
        assert!(info.mapped_qubits.logical.is_empty());
        Ok(())
    }

    #[test]
    fn test_mapping_state_reset_with_interaction() -> anyhow::Result<()> {
        let mut state = crate::tests::grid_3_3_state(42);

        let mut graph = InteractionGraph::from_pairs(9, &[(0, 1), (3, 8), (8, 4)])?;
        state.update((0, 0));
        state.reset(None, Some(&graph))?;
        assert_eq!(graph.matrix(), state.observe().interaction_matrix);

        // The state owns a copy.
        graph = InteractionGraph::empty(9);
        assert_ne!(graph.matrix(), state.observe().interaction_matrix);
        assert_eq!(vec![(0, 1), (3, 8), (4, 8)], state.interaction().pairs());

        // Wrong size: the state is left unchanged.
        state.update((0, 0));
        assert!(state
            .reset(None, Some(&InteractionGraph::empty(4)))
            .is_err());
        assert_eq!(1, state.steps_done());
        assert_eq!(vec![(0, 1), (3, 8), (4, 8)], state.interaction().pairs());
        Ok(())
    }

    #[test]
    fn test_mapping_state_reset_seed() -> anyhow::Result<()> {
        let mut state1 = crate::tests::grid_3_3_state(1);
        let mut state2 = crate::tests::grid_3_3_state(2);

        let mut drawn1 = vec![];
        let mut drawn2 = vec![];
        state1.reset(Some(99), None)?;
        state2.reset(Some(99), None)?;
        for _ in 0..10 {
            drawn1.push(state1.interaction().pairs());
            drawn2.push(state2.interaction().pairs());
            state1.reset(None, None)?;
            state2.reset(None, None)?;
        }
        assert_eq!(drawn1, drawn2);
        Ok(())
    }

    #[test]
    fn test_mapping_state_failed_reset_keeps_generator() -> anyhow::Result<()> {
        let mut state1 = crate::tests::grid_3_3_state(1);
        let mut state2 = crate::tests::grid_3_3_state(1);

        assert!(state2
            .reset(Some(12345), Some(&InteractionGraph::empty(4)))
            .is_err());

        for _ in 0..5 {
            state1.reset(None, None)?;
            state2.reset(None, None)?;
            assert_eq!(state1.interaction().pairs(), state2.interaction().pairs());
        }
        Ok(())
    }

    #[test]
    fn test_mapping_state_random_updates_consistent() {
        use rand::{Rng, SeedableRng};

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut state = null_state(9);
        while !state.is_done() && !state.is_truncated() {
            let action = (rng.gen_range(0..10), rng.gen_range(0..10));
            let applied = state.update(action);

            let info = state.info();
            if applied {
                assert_eq!(action.1, info.mapping[action.0]);
            }
            assert_eq!(info.mapping_dict.len(), info.mapped_qubits.physical.len());
            assert_eq!(info.mapping_dict.len(), info.mapped_qubits.logical.len());
            for (p, l) in info.mapping.iter().enumerate() {
                if *l == 9 {
                    assert!(!info.mapped_qubits.physical.contains(&p));
                } else {
                    assert_eq!(Some(&p), info.mapping_dict.get(l));
                    assert!(info.mapped_qubits.physical.contains(&p));
                    assert!(info.mapped_qubits.logical.contains(l));
                }
            }
        }
        assert!(state.is_done() || state.is_truncated());
    }

    #[test]
    fn test_mapping_state_adjacent_interactions() -> anyhow::Result<()> {
        let mut state = null_state(4);
        let graph = InteractionGraph::from_pairs(4, &[(0, 1), (2, 3), (0, 3)])?;
        state.reset(None, Some(&graph))?;
        assert_eq!(0, state.adjacent_interactions());

        // Line 0-1-2-3: logical 0 -> 1, 1 -> 0, 2 -> 3, 3 -> 2
        state.update((1, 0));
        state.update((0, 1));
        assert_eq!(1, state.adjacent_interactions());
        state.update((3, 2));
        state.update((2, 3));
        assert_eq!(3, state.adjacent_interactions());
        Ok(())
    }

    #[test]
    fn test_mapping_state_info_serialize() -> anyhow::Result<()> {
        let mut state = null_state(3);
        state.update((2, 0));
        let json = serde_json::to_string(&state.info())?;
        assert_eq!(
            r#"{"steps_done":1,"mapping":[3,3,0],"mapping_dict":{"0":2},"mapped_qubits":{"physical":[2],"logical":[0]}}"#,
            json
        );
        let json = serde_json::to_string(&state.observe())?;
        assert_eq!(
            r#"{"mapping":[3,3,0],"interaction_matrix":[0,0,0,0,0,0,0,0,0]}"#,
            json
        );
        Ok(())
    }
}
