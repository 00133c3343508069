// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operations (`teleport_quest::operations::Operation`).
//!
//! A `Circuit` is the backend-agnostic description handed to an
//! `ExecutionBackend`: register sizes plus the ordered gate list.

use crate::operations::Operation;
use std::fmt;

/// Represents an ordered sequence of Operations applied to a fixed-size
/// quantum register, with results written to a classical register.
///
/// Analogy: Similar to `cirq.Circuit` or `qiskit.QuantumCircuit`.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// Width of the quantum register.
    num_qubits: usize,
    /// Width of the classical register.
    num_clbits: usize,
    /// The ordered sequence of operations defining the circuit's logic.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a new, empty circuit over `num_qubits` qubits and
    /// `num_clbits` classical bits.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits,
            operations: Vec::new(),
        }
    }

    /// Adds a single operation to the end of the circuit's sequence.
    ///
    /// Indices are not checked here; the backend rejects out-of-range
    /// qubits or bits when it executes the circuit.
    pub fn add_operation(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the circuit's sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(ops);
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of `Measure` operations.
    pub fn num_measurements(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Measure { .. }))
            .count()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new builder for a circuit of the given register widths.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits, num_clbits),
        }
    }

    /// Adds a single operation to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() || self.num_qubits == 0 {
            return writeln!(f, "Circuit[0 operations on {} qubits]", self.num_qubits);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let num_rows = self.num_qubits;

        let max_label_width = format!("q{}", num_rows - 1).len();
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_rows];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_rows];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Initialize { target, .. } => {
                    if target.0 < num_rows {
                        op_grid[target.0][t] = format_gate("|ψ>");
                    }
                }
                Operation::Hadamard { target }
                | Operation::PauliX { target }
                | Operation::PauliY { target }
                | Operation::PauliZ { target } => {
                    if target.0 < num_rows {
                        let symbol = match op {
                            Operation::Hadamard { .. } => "H",
                            Operation::PauliX { .. } => "X",
                            Operation::PauliY { .. } => "Y",
                            _ => "Z",
                        };
                        op_grid[target.0][t] = format_gate(symbol);
                    }
                }
                Operation::ControlledNot { control, target } => {
                    if control.0 < num_rows && target.0 < num_rows {
                        op_grid[control.0][t] = format_gate("@");
                        op_grid[target.0][t] = format_gate("X");

                        let r_min = control.0.min(target.0);
                        let r_max = control.0.max(target.0);
                        for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                            row_vec[t] = V_WIRE;
                        }
                    }
                }
                Operation::Barrier { qubits } => {
                    for q in qubits.iter().filter(|q| q.0 < num_rows) {
                        op_grid[q.0][t] = format_gate("░");
                    }
                }
                Operation::Measure { qubit, clbit } => {
                    if qubit.0 < num_rows {
                        op_grid[qubit.0][t] = format_gate(&format!("M{}", clbit.0));
                    }
                }
            }
        }

        writeln!(
            f,
            "Circuit[{} operations on {} qubits, {} clbits]",
            num_ops, self.num_qubits, self.num_clbits
        )?;
        for r in 0..num_rows {
            let label = format!("q{}: ", r);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_rows - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClbitId, QubitId};

    #[test]
    fn test_builder_preserves_order() {
        let circuit = CircuitBuilder::new(2, 1)
            .add_op(Operation::Hadamard { target: QubitId(0) })
            .add_ops([
                Operation::ControlledNot { control: QubitId(0), target: QubitId(1) },
                Operation::Measure { qubit: QubitId(1), clbit: ClbitId(0) },
            ])
            .build();

        assert_eq!(circuit.len(), 3);
        assert_eq!(circuit.num_measurements(), 1);
        assert_eq!(circuit.operations()[0], Operation::Hadamard { target: QubitId(0) });
        assert!(!circuit.operations()[2].is_gate());
    }

    #[test]
    fn test_display_draws_every_qubit() {
        let circuit = CircuitBuilder::new(3, 0)
            .add_op(Operation::ControlledNot { control: QubitId(0), target: QubitId(2) })
            .build();
        let text = circuit.to_string();
        assert!(text.starts_with("Circuit[1 operations on 3 qubits, 0 clbits]"));
        assert!(text.contains("q0: ───@───"));
        assert!(text.contains("q2: ───X───"));
        // Connector passes through the middle wire.
        assert_eq!(text.matches('│').count(), 2);
    }
}
