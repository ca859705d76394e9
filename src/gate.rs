// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateName {
    /// Qubit preparation.
    Prep,
    X,
    Y,
    Z,
    /// Controlled NOT, the only two-qubit gate.
    Cnot,
    Measure,
}

impl std::fmt::Display for GateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                GateName::Prep => "prep",
                GateName::X => "x",
                GateName::Y => "y",
                GateName::Z => "z",
                GateName::Cnot => "cnot",
                GateName::Measure => "measure",
            }
        )
    }
}

impl std::str::FromStr for GateName {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prep" => Ok(GateName::Prep),
            "x" => Ok(GateName::X),
            "y" => Ok(GateName::Y),
            "z" => Ok(GateName::Z),
            "cnot" => Ok(GateName::Cnot),
            "measure" => Ok(GateName::Measure),
            _ => anyhow::bail!("unknown gate name: {}", s),
        }
    }
}

impl GateName {
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, GateName::Cnot)
    }
}

/// A single operation of a circuit.
///
/// Single-qubit gates are encoded with `q1 == q2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Gate {
    pub name: GateName,
    pub q1: usize,
    pub q2: usize,
}

impl Gate {
    pub fn new(name: GateName, q1: usize, q2: usize) -> Self {
        Self { name, q1, q2 }
    }

    /// Create a gate acting on a single qubit.
    pub fn single(name: GateName, q: usize) -> Self {
        Self::new(name, q, q)
    }

    /// Return true if the operands are consistent with the gate arity.
    pub fn is_well_formed(&self) -> bool {
        self.name.is_two_qubit() == (self.q1 != self.q2)
    }
}

impl std::fmt::Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_two_qubit() {
            write!(f, "{} {},{}", self.name, self.q1, self.q2)
        } else {
            write!(f, "{} {}", self.name, self.q1)
        }
    }
}

/// Ordered sequence of gates.
pub type Circuit = Vec<Gate>;
