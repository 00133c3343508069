// src/simulation/mod.rs

//! Executes `teleport_quest::circuits::Circuit` descriptions and reports
//! measurement-outcome frequencies.
//!
//! The puzzle engine only depends on the [`ExecutionBackend`] trait. The
//! [`StatevectorSimulator`] in this module is the local implementation: an
//! exact statevector evolution sampled over a number of shots, with an
//! optional noisy mode that injects Pauli errors after gates and flips
//! readout bits.

mod results;
pub(crate) mod engine;

pub use results::{Counts, ExecutionResult};

use crate::circuits::Circuit;
use crate::core::{ClbitId, DEFAULT_SHOTS, QubitId, QuestError};
use crate::operations::Operation;
use engine::{PauliError, StatevectorEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, instrument};

/// Which execution model the backend should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Noise-free statevector sampling.
    #[default]
    Ideal,
    /// Sampling under the configured noise model.
    Noisy,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Ideal => write!(f, "ideal"),
            ExecutionMode::Noisy => write!(f, "noisy"),
        }
    }
}

/// Error rates used by [`ExecutionMode::Noisy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Probability, per touched qubit and gate, of a random Pauli error.
    pub gate_error: f64,
    /// Probability of each reported classical bit being flipped.
    pub readout_error: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            gate_error: 0.01,
            readout_error: 0.02,
        }
    }
}

impl NoiseParams {
    /// A noise model that never fires.
    pub fn noiseless() -> Self {
        Self {
            gate_error: 0.0,
            readout_error: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), QuestError> {
        for (name, p) in [("gate_error", self.gate_error), ("readout_error", self.readout_error)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(QuestError::Configuration {
                    message: format!("{} must lie in [0, 1], got {}", name, p),
                });
            }
        }
        Ok(())
    }
}

/// Something that can run a circuit and report outcome frequencies.
///
/// Calls are synchronous: the puzzle blocks on `execute` and processes no
/// further actions until it returns.
pub trait ExecutionBackend {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Runs `circuit` under `mode`.
    fn execute(&mut self, circuit: &Circuit, mode: ExecutionMode) -> Result<ExecutionResult, QuestError>;
}

/// Local statevector backend.
pub struct StatevectorSimulator {
    shots: u32,
    noise: NoiseParams,
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Creates a simulator with default shots and noise, seeded from the OS.
    pub fn new() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            noise: NoiseParams::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Makes every run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_noise(mut self, noise: NoiseParams) -> Self {
        self.noise = noise;
        self
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn noise(&self) -> NoiseParams {
        self.noise
    }
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Circuit split into the gates to evolve and the terminal measurements.
struct Schedule<'a> {
    gates: Vec<&'a Operation>,
    measurements: Vec<(QubitId, ClbitId)>,
}

impl<'a> Schedule<'a> {
    /// Checks register bounds and that measurements are terminal.
    fn plan(circuit: &'a Circuit) -> Result<Self, QuestError> {
        let mut gates = Vec::new();
        let mut measurements = Vec::new();
        let mut measured: HashSet<QubitId> = HashSet::new();

        for op in circuit.operations() {
            for q in op.involved_qubits() {
                if q.0 >= circuit.num_qubits() {
                    return Err(QuestError::InvalidOperation {
                        message: format!(
                            "Qubit {} is outside a {}-qubit register",
                            q,
                            circuit.num_qubits()
                        ),
                    });
                }
            }
            match op {
                Operation::Measure { qubit, clbit } => {
                    if clbit.0 >= circuit.num_clbits() {
                        return Err(QuestError::InvalidOperation {
                            message: format!(
                                "Classical bit {} is outside a {}-bit register",
                                clbit,
                                circuit.num_clbits()
                            ),
                        });
                    }
                    measured.insert(*qubit);
                    measurements.push((*qubit, *clbit));
                }
                Operation::Barrier { .. } => {}
                gate => {
                    if let Some(q) = gate.involved_qubits().into_iter().find(|q| measured.contains(q)) {
                        return Err(QuestError::InvalidOperation {
                            message: format!("Qubit {} is used after being measured; mid-circuit measurement is not supported", q),
                        });
                    }
                    gates.push(gate);
                }
            }
        }

        if measurements.is_empty() {
            return Err(QuestError::SimulationError {
                message: "Circuit contains no measurements".to_string(),
            });
        }
        Ok(Self { gates, measurements })
    }
}

impl StatevectorSimulator {
    /// Reads the measured qubits out of basis state `outcome` into a
    /// bitstring, highest classical bit first.
    fn bitstring(
        engine: &StatevectorEngine,
        outcome: usize,
        measurements: &[(QubitId, ClbitId)],
        num_clbits: usize,
        flip: &mut dyn FnMut() -> bool,
    ) -> Result<String, QuestError> {
        let mut clbits = vec![false; num_clbits];
        for (qubit, clbit) in measurements {
            clbits[clbit.0] = engine.qubit_value(outcome, *qubit)? ^ flip();
        }
        Ok(clbits.iter().rev().map(|b| if *b { '1' } else { '0' }).collect())
    }

    fn run_ideal(&mut self, circuit: &Circuit, schedule: &Schedule<'_>) -> Result<Counts, QuestError> {
        let mut engine = StatevectorEngine::init(circuit.num_qubits())?;
        for gate in &schedule.gates {
            engine.apply_operation(gate)?;
        }

        let probabilities = engine.probabilities();
        let mut counts = Counts::new();
        for _ in 0..self.shots {
            let outcome = StatevectorEngine::sample_outcome(&probabilities, &mut self.rng);
            let bits = Self::bitstring(
                &engine,
                outcome,
                &schedule.measurements,
                circuit.num_clbits(),
                &mut || false,
            )?;
            counts.insert(bits, 1);
        }
        Ok(counts)
    }

    fn run_noisy(&mut self, circuit: &Circuit, schedule: &Schedule<'_>) -> Result<Counts, QuestError> {
        self.noise.validate()?;
        let NoiseParams { gate_error, readout_error } = self.noise;
        let mut counts = Counts::new();

        for shot in 0..self.shots {
            let mut engine = StatevectorEngine::init(circuit.num_qubits())?;
            for gate in &schedule.gates {
                engine.apply_operation(gate)?;
                for q in gate.involved_qubits() {
                    if self.rng.random::<f64>() < gate_error {
                        let error = match self.rng.random_range(0..3) {
                            0 => PauliError::X,
                            1 => PauliError::Y,
                            _ => PauliError::Z,
                        };
                        engine.apply_pauli_error(q, error)?;
                    }
                }
            }

            let outcome = StatevectorEngine::sample_outcome(&engine.probabilities(), &mut self.rng);
            let rng = &mut self.rng;
            let bits = Self::bitstring(
                &engine,
                outcome,
                &schedule.measurements,
                circuit.num_clbits(),
                &mut || rng.random::<f64>() < readout_error,
            )?;
            counts.insert(bits, 1);

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }
        Ok(counts)
    }
}

impl ExecutionBackend for StatevectorSimulator {
    fn name(&self) -> &str {
        "statevector"
    }

    #[instrument(skip(self, circuit), fields(shots = self.shots))]
    fn execute(&mut self, circuit: &Circuit, mode: ExecutionMode) -> Result<ExecutionResult, QuestError> {
        if self.shots == 0 {
            return Err(QuestError::Configuration {
                message: "Shot count must be positive".to_string(),
            });
        }
        let schedule = Schedule::plan(circuit)?;
        debug!(
            "Starting simulation: {} qubits, {} gates, {} measurements",
            circuit.num_qubits(),
            schedule.gates.len(),
            schedule.measurements.len()
        );

        let counts = match mode {
            ExecutionMode::Ideal => self.run_ideal(circuit, &schedule)?,
            ExecutionMode::Noisy => self.run_noisy(circuit, &schedule)?,
        };

        debug!(outcomes = counts.len(), total = counts.total(), "Simulation completed");
        Ok(ExecutionResult::new(counts, self.shots))
    }
}
