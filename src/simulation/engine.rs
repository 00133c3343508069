// src/simulation/engine.rs
use crate::core::{QubitId, QuestError};
use crate::operations::Operation;
use crate::validation::check_normalization;
use num_complex::Complex64;
use num_traits::Zero;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;

type Matrix2 = [[Complex64; 2]; 2];
type Matrix4 = [[Complex64; 4]; 4];

/// A single-qubit Pauli error injected by the noisy execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PauliError {
    X,
    Y,
    Z,
}

/// Dense statevector over `num_qubits` qubits.
/// (Internal visibility)
///
/// Qubit `i` occupies bit position `num_qubits - 1 - i` of the basis index,
/// so qubit 0 is the most significant bit.
pub(crate) struct StatevectorEngine {
    state: Vec<Complex64>,
    num_qubits: usize,
}

impl StatevectorEngine {
    /// Initializes the engine in |0...0>.
    pub(crate) fn init(num_qubits: usize) -> Result<Self, QuestError> {
        if num_qubits == 0 {
            return Err(QuestError::InvalidOperation {
                message: "Cannot initialize simulation engine with zero qubits".to_string(),
            });
        }
        let dim = u32::try_from(num_qubits)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or_else(|| QuestError::SimulationError {
                message: "Number of qubits too large, resulting state vector dimension overflows usize."
                    .to_string(),
            })?;

        let mut state = vec![Complex64::zero(); dim];
        state[0] = Complex64::new(1.0, 0.0);
        Ok(Self { state, num_qubits })
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: Vec<Complex64>) -> Result<(), QuestError> {
        if state.len() != self.state.len() {
            return Err(QuestError::SimulationError {
                message: format!(
                    "Cannot set state: provided dimension {} does not match engine dimension {}",
                    state.len(),
                    self.state.len()
                ),
            });
        }
        self.state = state;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &[Complex64] {
        &self.state
    }

    /// Applies a single state-changing operation.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<(), QuestError> {
        match op {
            Operation::Initialize { target, amplitudes } => {
                check_normalization(amplitudes, None)?;
                let idx = self.qubit_index(*target)?;
                self.apply_single_qubit_gate(idx, &preparation_matrix(amplitudes[0], amplitudes[1]));
            }
            Operation::Hadamard { target } => {
                let idx = self.qubit_index(*target)?;
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                self.apply_single_qubit_gate(idx, &[[h, h], [h, -h]]);
            }
            Operation::PauliX { target } => {
                let idx = self.qubit_index(*target)?;
                self.apply_single_qubit_gate(idx, &pauli_matrix(PauliError::X));
            }
            Operation::PauliY { target } => {
                let idx = self.qubit_index(*target)?;
                self.apply_single_qubit_gate(idx, &pauli_matrix(PauliError::Y));
            }
            Operation::PauliZ { target } => {
                let idx = self.qubit_index(*target)?;
                self.apply_single_qubit_gate(idx, &pauli_matrix(PauliError::Z));
            }
            Operation::ControlledNot { control, target } => {
                let control_idx = self.qubit_index(*control)?;
                let target_idx = self.qubit_index(*target)?;
                if control_idx == target_idx {
                    return Err(QuestError::InvalidOperation {
                        message: "Control and target qubits cannot be the same for controlled operation"
                            .to_string(),
                    });
                }

                let x = pauli_matrix(PauliError::X);
                let one = Complex64::new(1.0, 0.0);
                let zero = Complex64::zero();
                // Basis order: |control, target> -> |00>, |01>, |10>, |11>
                let cx: Matrix4 = [
                    [one, zero, zero, zero],
                    [zero, one, zero, zero],
                    [zero, zero, x[0][0], x[0][1]],
                    [zero, zero, x[1][0], x[1][1]],
                ];
                self.apply_two_qubit_gate(control_idx, target_idx, &cx);
            }
            Operation::Barrier { qubits } => {
                for q in qubits {
                    self.qubit_index(*q)?;
                }
            }
            Operation::Measure { .. } => {
                return Err(QuestError::InvalidOperation {
                    message: "Measure operation should not be passed directly to apply_operation"
                        .to_string(),
                });
            }
        }
        Ok(())
    }

    /// Applies a Pauli error to `qubit`.
    pub(crate) fn apply_pauli_error(&mut self, qubit: QubitId, error: PauliError) -> Result<(), QuestError> {
        let idx = self.qubit_index(qubit)?;
        self.apply_single_qubit_gate(idx, &pauli_matrix(error));
        Ok(())
    }

    /// Born-rule probability of every basis state.
    pub(crate) fn probabilities(&self) -> Vec<f64> {
        self.state.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Draws a basis-state index from `probabilities`.
    pub(crate) fn sample_outcome<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> usize {
        let r: f64 = rng.random();
        let mut cumulative = 0.0;
        for (i, p) in probabilities.iter().enumerate() {
            cumulative += p;
            if r < cumulative {
                return i;
            }
        }
        // Rounding can leave the cumulative sum just below 1; fall back to
        // the last outcome with non-zero probability.
        probabilities.iter().rposition(|p| *p > 0.0).unwrap_or(0)
    }

    /// Value of `qubit` in basis state `outcome`.
    pub(crate) fn qubit_value(&self, outcome: usize, qubit: QubitId) -> Result<bool, QuestError> {
        let idx = self.qubit_index(qubit)?;
        let bit_pos = self.num_qubits - 1 - idx;
        Ok((outcome >> bit_pos) & 1 == 1)
    }

    fn qubit_index(&self, qubit: QubitId) -> Result<usize, QuestError> {
        if qubit.0 < self.num_qubits {
            Ok(qubit.0)
        } else {
            Err(QuestError::InvalidOperation {
                message: format!("Qubit {} is outside a {}-qubit register", qubit, self.num_qubits),
            })
        }
    }

    /// Applies a 2x2 matrix to the qubit at `target_idx`.
    fn apply_single_qubit_gate(&mut self, target_idx: usize, matrix: &Matrix2) {
        let mask = 1usize << (self.num_qubits - 1 - target_idx);

        // Visit each pair of basis states differing only at the target bit.
        for i0 in (0..self.state.len()).filter(|i| i & mask == 0) {
            let i1 = i0 | mask;
            let psi_0 = self.state[i0];
            let psi_1 = self.state[i1];
            self.state[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            self.state[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    /// Applies a 4x4 matrix to the qubits at `idx1` and `idx2`; matrix rows
    /// and columns follow the `|idx1, idx2>` basis order.
    fn apply_two_qubit_gate(&mut self, idx1: usize, idx2: usize, matrix: &Matrix4) {
        let m1 = 1usize << (self.num_qubits - 1 - idx1);
        let m2 = 1usize << (self.num_qubits - 1 - idx2);

        for base in (0..self.state.len()).filter(|i| i & (m1 | m2) == 0) {
            let indices = [base, base | m2, base | m1, base | m1 | m2];
            let psi = indices.map(|i| self.state[i]);

            for (row, &out) in indices.iter().enumerate() {
                self.state[out] = (0..4).map(|col| matrix[row][col] * psi[col]).sum();
            }
        }
    }
}

fn pauli_matrix(error: PauliError) -> Matrix2 {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::zero();
    let i = Complex64::i();
    match error {
        PauliError::X => [[zero, one], [one, zero]],
        PauliError::Y => [[zero, -i], [i, zero]],
        PauliError::Z => [[one, zero], [zero, -one]],
    }
}

/// Unitary whose first column is `(alpha, beta)`, mapping |0> to the target state.
fn preparation_matrix(alpha: Complex64, beta: Complex64) -> Matrix2 {
    [[alpha, -beta.conj()], [beta, alpha.conj()]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn assert_state_approx_equal(actual: &[Complex64], expected: &[Complex64], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!(
                (a - e).norm_sqr() < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i,
                a,
                e,
                context
            );
        }
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            StatevectorEngine::init(0),
            Err(QuestError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_x_on_most_significant_qubit() -> Result<(), QuestError> {
        let mut engine = StatevectorEngine::init(2)?;
        engine.apply_operation(&Operation::PauliX { target: QubitId(0) })?;
        // Qubit 0 is the MSB, so |10> is index 2.
        let zero = Complex64::zero();
        let one = Complex64::new(1.0, 0.0);
        assert_state_approx_equal(engine.state(), &[zero, zero, one, zero], "X on q0");
        assert!(engine.qubit_value(2, QubitId(0))?);
        assert!(!engine.qubit_value(2, QubitId(1))?);
        Ok(())
    }

    #[test]
    fn test_bell_pair() -> Result<(), QuestError> {
        let mut engine = StatevectorEngine::init(2)?;
        engine.apply_operation(&Operation::Hadamard { target: QubitId(0) })?;
        engine.apply_operation(&Operation::ControlledNot { control: QubitId(0), target: QubitId(1) })?;
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let zero = Complex64::zero();
        assert_state_approx_equal(engine.state(), &[s, zero, zero, s], "Bell pair");
        Ok(())
    }

    #[test]
    fn test_cnot_with_reversed_roles_in_three_qubits() -> Result<(), QuestError> {
        let mut engine = StatevectorEngine::init(3)?;
        engine.apply_operation(&Operation::PauliX { target: QubitId(2) })?; // |001>
        engine.apply_operation(&Operation::ControlledNot { control: QubitId(2), target: QubitId(0) })?;
        // |101> is index 5.
        let probs = engine.probabilities();
        assert!((probs[5] - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_initialize_prepares_amplitudes() -> Result<(), QuestError> {
        let alpha = Complex64::new(0.6, 0.0);
        let beta = Complex64::new(0.0, 0.8);
        let mut engine = StatevectorEngine::init(1)?;
        engine.apply_operation(&Operation::Initialize { target: QubitId(0), amplitudes: [alpha, beta] })?;
        assert_state_approx_equal(engine.state(), &[alpha, beta], "Initialize");

        let bad = Operation::Initialize {
            target: QubitId(0),
            amplitudes: [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
        };
        assert!(engine.apply_operation(&bad).is_err());
        Ok(())
    }

    #[test]
    fn test_out_of_range_qubit() -> Result<(), QuestError> {
        let mut engine = StatevectorEngine::init(1)?;
        let result = engine.apply_operation(&Operation::Hadamard { target: QubitId(3) });
        assert!(matches!(result, Err(QuestError::InvalidOperation { .. })));
        Ok(())
    }

    #[test]
    fn test_pauli_y_error() -> Result<(), QuestError> {
        let mut engine = StatevectorEngine::init(1)?;
        engine.apply_pauli_error(QubitId(0), PauliError::Y)?;
        assert_state_approx_equal(engine.state(), &[Complex64::zero(), Complex64::i()], "Y|0>");
        Ok(())
    }

    #[test]
    fn test_sampling_basis_state_is_deterministic() -> Result<(), QuestError> {
        let mut engine = StatevectorEngine::init(2)?;
        engine.set_state(vec![
            Complex64::zero(),
            Complex64::new(1.0, 0.0),
            Complex64::zero(),
            Complex64::zero(),
        ])?;
        let probs = engine.probabilities();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(StatevectorEngine::sample_outcome(&probs, &mut rng), 1);
        }
        Ok(())
    }
}
