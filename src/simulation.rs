// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use rand::{Rng, SeedableRng};

use crate::generators::circuit::{CircuitAttributes, DynCircuitGenerator};
use crate::generators::Generator;
use crate::output::ScalarMetricType;

/// A sequence of episodes, all driven by the same seed.
///
/// The simulation owns its state, generators, and pseudo-random number
/// generators, thus different simulations can run in parallel.
pub struct Simulation {
    // internal data structures
    state: crate::mapping_state::MappingState,
    circuit_generator: Box<DynCircuitGenerator>,
    rng: rand::rngs::StdRng,

    // configuration
    config: crate::config::Config,
}

impl Simulation {
    pub fn new(config: crate::config::Config) -> anyhow::Result<Self> {
        let conf = &config.user_config;
        anyhow::ensure!(conf.episodes > 0, "vanishing number of episodes");

        let topology = conf.topology.build()?;

        // each generator has its own seed, derived from the simulation seed
        let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
        let interaction_generator = conf.interaction_generator.build(Some(rng.gen()))?;
        let mut circuit_generator = conf.circuit_generator.build(Some(rng.gen()));
        circuit_generator.set_state_attributes(&CircuitAttributes {
            num_qubits: topology.num_qubits(),
            max_gates: conf.max_gates,
        })?;

        let state = crate::mapping_state::MappingState::new(&topology, interaction_generator)?;

        Ok(Self {
            state,
            circuit_generator,
            rng,
            config,
        })
    }

    /// Run all the episodes of the simulation.
    pub fn run(&mut self) -> anyhow::Result<crate::output::Output> {
        let conf = &self.config.user_config;

        // outputs
        let mut scalar = crate::output::OutputScalar::default();
        let mut series = crate::output::OutputSeries::default();
        for name in [
            "steps",
            "ignored_actions",
            "interactions",
            "adjacent_ratio",
            "circuit_len",
            "cnot_ratio",
        ] {
            scalar.init(name, ScalarMetricType::Avg);
        }
        for name in ["done", "truncated"] {
            scalar.init(name, ScalarMetricType::Count);
        }
        series.set_headers("episode_steps", &["outcome"]);

        let real_now = std::time::Instant::now();
        let mut last_progress = 0;
        for episode in 0..conf.episodes {
            let progress = 100 * episode / conf.episodes;
            if progress >= last_progress + 10 {
                log::info!("seed {} completed {}%", self.config.seed, progress);
                last_progress = progress;
            }

            self.state.reset(None, None)?;
            let num_interactions = self.state.interaction().num_interactions();

            // the workload of this episode
            let circuit = self.circuit_generator.produce()?;
            if !circuit.is_empty() {
                let num_cnots = circuit.iter().filter(|g| g.name.is_two_qubit()).count();
                scalar.avg("circuit_len", circuit.len() as f64);
                scalar.avg("cnot_ratio", num_cnots as f64 / circuit.len() as f64);
            }

            // episode loop
            let mut ignored = 0;
            let outcome = loop {
                if self.state.is_done() {
                    break "done";
                }
                if self.state.is_truncated() {
                    break "truncated";
                }
                let action = conf.policy.action(&self.state, &mut self.rng);
                if !self.state.update(action) {
                    ignored += 1;
                }
            };

            let steps = self.state.steps_done();
            log::debug!(
                "seed {} episode {} {} after {} steps",
                self.config.seed,
                episode,
                outcome,
                steps
            );
            scalar.count(outcome);
            scalar.avg("steps", steps as f64);
            scalar.avg("ignored_actions", ignored as f64);
            scalar.avg("interactions", num_interactions as f64);
            if outcome == "done" && num_interactions > 0 {
                scalar.avg(
                    "adjacent_ratio",
                    self.state.adjacent_interactions() as f64 / num_interactions as f64,
                );
            }
            series.add(
                "episode_steps",
                vec![outcome.to_string()],
                episode,
                steps as f64,
            )?;
        }

        // save final metrics
        scalar.one_time("episodes", conf.episodes as f64);
        scalar.one_time("execution_time", real_now.elapsed().as_secs_f64());

        // return the simulation output
        Ok(crate::output::Output {
            scalar,
            series,
            config_csv: self.config.to_csv(),
        })
    }
}
