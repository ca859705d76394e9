// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Partial assignment of logical qubits to physical qubits.
///
/// The assignment is kept in three views, which are only modified together
/// by `assign` and `clear`:
/// - an array indexed by physical qubit, containing the logical qubit or
///   `num_qubits` if unassigned
/// - a map from logical to physical qubits
/// - the sets of the physical and logical qubits assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    physical_to_logical: Vec<usize>,
    logical_to_physical: std::collections::BTreeMap<usize, usize>,
    mapped_physical: std::collections::BTreeSet<usize>,
    mapped_logical: std::collections::BTreeSet<usize>,
}

impl Mapping {
    /// Create a mapping of `num_qubits` qubits with no assignments.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            physical_to_logical: vec![num_qubits; num_qubits],
            logical_to_physical: std::collections::BTreeMap::new(),
            mapped_physical: std::collections::BTreeSet::new(),
            mapped_logical: std::collections::BTreeSet::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.physical_to_logical.len()
    }

    /// Value used in the array view for unassigned physical qubits.
    pub fn unassigned(&self) -> usize {
        self.num_qubits()
    }

    /// Assign a logical qubit to a physical qubit.
    ///
    /// Nothing is changed if either qubit is out of range or already
    /// assigned. Return true if the assignment has been recorded.
    pub fn assign(&mut self, physical: usize, logical: usize) -> bool {
        let n = self.num_qubits();
        if physical >= n
            || logical >= n
            || self.mapped_physical.contains(&physical)
            || self.mapped_logical.contains(&logical)
        {
            return false;
        }

        self.physical_to_logical[physical] = logical;
        self.logical_to_physical.insert(logical, physical);
        self.mapped_physical.insert(physical);
        self.mapped_logical.insert(logical);
        true
    }

    /// Remove all the assignments.
    pub fn clear(&mut self) {
        let n = self.num_qubits();
        self.physical_to_logical.fill(n);
        self.logical_to_physical.clear();
        self.mapped_physical.clear();
        self.mapped_logical.clear();
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.logical_to_physical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logical_to_physical.is_empty()
    }

    /// Return true if all the logical qubits are assigned.
    pub fn is_complete(&self) -> bool {
        self.len() == self.num_qubits()
    }

    /// Array view, indexed by physical qubit.
    pub fn as_slice(&self) -> &[usize] {
        &self.physical_to_logical
    }

    pub fn logical_to_physical(&self) -> &std::collections::BTreeMap<usize, usize> {
        &self.logical_to_physical
    }

    pub fn mapped_physical(&self) -> &std::collections::BTreeSet<usize> {
        &self.mapped_physical
    }

    pub fn mapped_logical(&self) -> &std::collections::BTreeSet<usize> {
        &self.mapped_logical
    }

    /// Physical qubit to which a logical qubit is assigned, if any.
    pub fn physical(&self, logical: usize) -> Option<usize> {
        self.logical_to_physical.get(&logical).copied()
    }

    /// Logical qubit assigned to a physical qubit, if any.
    pub fn logical(&self, physical: usize) -> Option<usize> {
        self.physical_to_logical
            .get(physical)
            .copied()
            .filter(|l| *l != self.unassigned())
    }
}
