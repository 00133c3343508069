// tests/protocol_tests.rs

use teleport_quest::{
    BlochVector, CANONICAL_VECTORS, ClassicalBits, Correction, ExecutionBackend, ExecutionMode,
    NoiseParams, QubitId, QuestError, StatevectorSimulator, build_teleportation_circuit,
    correction::VALID_COMBOS, interpret, is_consistent_pair, required_correction,
    sample_vector_pair,
};

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_teleport_circuit_outcomes_are_uniform() -> Result<(), QuestError> {
    let shots = 4096;
    let mut backend = StatevectorSimulator::new().with_seed(2024).with_shots(shots);

    for alice in CANONICAL_VECTORS {
        let circuit = build_teleportation_circuit(alice);
        let result = backend.execute(&circuit, ExecutionMode::Ideal)?;
        let counts = result.counts();

        assert_eq!(result.shots(), shots);
        assert_eq!(counts.total(), u64::from(shots));
        for bits in ["00", "01", "10", "11"] {
            let n = counts.get(bits);
            assert!(
                (800..=1250).contains(&n),
                "outcome {} seen {} times for alice {}",
                bits,
                n,
                alice
            );
        }
        // Whatever wins, it reads as a legal bit pattern.
        interpret(counts)?;
    }
    Ok(())
}

#[test]
fn test_noisy_run_without_errors_matches_ideal_support() -> Result<(), QuestError> {
    let circuit = build_teleportation_circuit(BlochVector::new(1.0, 0.0));
    let mut backend = StatevectorSimulator::new()
        .with_seed(5)
        .with_shots(512)
        .with_noise(NoiseParams::noiseless());

    let noisy = backend.execute(&circuit, ExecutionMode::Noisy)?;
    assert_eq!(noisy.counts().total(), 512);
    assert_eq!(noisy.counts().len(), 4);
    Ok(())
}

#[test]
fn test_correction_gates_recover_alice() -> Result<(), QuestError> {
    for combo in VALID_COMBOS {
        let correction = required_correction(combo.bits.as_str())?;
        assert!(
            correction.apply(combo.bob).approx_eq(&combo.alice, 1e-9),
            "{} does not map {} onto {}",
            correction,
            combo.bob,
            combo.alice
        );
        assert!(is_consistent_pair(combo.alice, combo.bob));
    }
    assert_eq!(
        Correction::XZ.operations(QubitId(2)).len(),
        2,
        "XZ is an X followed by a Z"
    );
    assert_eq!(ClassicalBits::B00.required_correction(), Correction::I);
    Ok(())
}

proptest! {
    #[test]
    fn sampled_pairs_are_consistent(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..20 {
            let (alice, bob) = sample_vector_pair(&mut rng)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!(alice.is_unit(1e-9));
            prop_assert!(is_consistent_pair(alice, bob));
        }
    }
}
