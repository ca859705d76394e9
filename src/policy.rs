// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use rand::Rng;

/// Policy used to select the next assignment during an episode.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Policy {
    /// Physical and logical qubits drawn uniformly at random, possibly
    /// already assigned.
    #[default]
    Random,
    /// The first unassigned logical qubit goes to the first unassigned
    /// physical qubit.
    Greedy,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Policy::Random => "random",
                Policy::Greedy => "greedy",
            }
        )
    }
}

impl Policy {
    /// Return the next (physical, logical) pair.
    pub fn action(
        &self,
        state: &crate::mapping_state::MappingState,
        rng: &mut rand::rngs::StdRng,
    ) -> (usize, usize) {
        let n = state.num_qubits();
        match self {
            Policy::Random => (rng.gen_range(0..n), rng.gen_range(0..n)),
            Policy::Greedy => {
                let mapping = state.mapping();
                let physical = (0..n)
                    .find(|p| !mapping.mapped_physical().contains(p))
                    .unwrap_or(0);
                let logical = (0..n)
                    .find(|l| !mapping.mapped_logical().contains(l))
                    .unwrap_or(0);
                (physical, logical)
            }
        }
    }
}
