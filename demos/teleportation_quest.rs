//! Console version of the teleportation puzzle.
//!
//! Run with `cargo run --example teleportation_quest -- --help`.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use teleport_quest::{
    ActionKind, ClassicalBits, Correction, ExecutionMode, Phase, PuzzleEngine, PuzzleSnapshot,
    QuestConfig, build_teleportation_circuit,
};
use tracing_subscriber::EnvFilter;

/// Teleportation Quest: learn the quantum teleportation protocol by playing it
#[derive(Parser, Debug)]
#[command(name = "teleportation_quest")]
#[command(about = "Walk Alice's qubit over to Bob, one protocol step at a time")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "TELEPORT_QUEST_CONFIG")]
    config: Option<PathBuf>,

    /// Measure with the noisy simulator
    #[arg(long)]
    noisy: bool,

    /// Shots per measurement
    #[arg(short, long)]
    shots: Option<u32>,

    /// Seed for the simulator and the vector dealer
    #[arg(long)]
    seed: Option<u64>,

    /// Play the right answers without asking
    #[arg(long)]
    auto: bool,

    /// Rounds to play before quitting (unlimited when interactive)
    #[arg(short, long)]
    rounds: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut config = match &args.config {
        Some(path) => QuestConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => QuestConfig::default(),
    };
    if args.noisy {
        config.mode = ExecutionMode::Noisy;
    }
    if let Some(shots) = args.shots {
        config.shots = shots;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut engine = PuzzleEngine::from_config(&config).context("starting the puzzle")?;
    let rounds = args.rounds.unwrap_or(if args.auto { 1 } else { usize::MAX });
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Backend: local statevector simulator ({} mode, {} shots)", config.mode, config.shots);

    let mut played = 0;
    while played < rounds {
        let snapshot = engine.snapshot();
        narrate(&snapshot);

        let outcome = match snapshot.available_actions {
            [ActionKind::SelectBits] => {
                let bits = if args.auto {
                    snapshot.round.expected_bits().unwrap_or(ClassicalBits::B00)
                } else {
                    match prompt::<ClassicalBits>(&mut input, "Bits to send [00/01/10/11]")? {
                        Some(bits) => bits,
                        None => break,
                    }
                };
                engine.select_bits(bits)
            }
            [ActionKind::SelectCorrection] => {
                let correction = if args.auto {
                    snapshot.round.required_correction().unwrap_or(Correction::I)
                } else {
                    match prompt::<Correction>(&mut input, "Correction [I/X/Z/XZ]")? {
                        Some(correction) => correction,
                        None => break,
                    }
                };
                engine.select_correction(correction)
            }
            [ActionKind::AnimationComplete] => {
                if let Some(bits) = snapshot.round.classical_bits {
                    println!("  Alice ~~~> {} ~~~> Bob", bits);
                }
                engine.animation_complete()
            }
            _ => {
                if !args.auto && !wait_for_enter(&mut input)? {
                    break;
                }
                if snapshot.phase == Phase::Result {
                    played += 1;
                    if played >= rounds {
                        break;
                    }
                }
                engine.advance()
            }
        };

        if let Err(e) = outcome {
            println!("\n!! {}", engine.round().message.as_deref().unwrap_or("Round aborted"));
            tracing::error!(error = %e, "Round aborted");
        }
    }

    println!("\nThanks for playing.");
    Ok(())
}

fn narrate(snapshot: &PuzzleSnapshot) {
    let round = &snapshot.round;
    println!();
    match snapshot.phase {
        Phase::Intro => {
            if let Some(message) = &round.message {
                println!("!! {}", message);
            }
            println!("Welcome to Quantum Teleportation Quest");
            println!("Learn how quantum teleportation moves a quantum state");
            println!("from Alice's qubit to Bob's, using entanglement");
            println!("and classical communication.");
        }
        Phase::Entangle => {
            println!("Entangle Alice's and Bob's qubits.");
            println!("Without entanglement the exchange between the two qubits");
            println!("(no matter where they are) would not be possible.");
            print_vectors(snapshot);
        }
        Phase::Measure => {
            println!("Alice measures her qubit.");
            print_vectors(snapshot);
            println!("{}", build_teleportation_circuit(round.alice_vector));
        }
        Phase::Measured => {
            println!("Alice's qubit has been measured.");
            println!("The quantum state collapses to a definite value.");
            if let Some(bits) = round.measured_bits {
                println!("Alice now holds the classical bits {}.", bits);
            }
        }
        Phase::BitExplanation => {
            println!("For Bob to recover Alice's original quantum state,");
            println!("he needs to know which gate to apply to his qubit.");
            println!("Alice's two classical bits tell him:");
            for bits in ClassicalBits::ALL {
                println!("  {} -> {}", bits, bits.required_correction());
            }
        }
        Phase::SendBits => {
            println!("Alice sends classical bits to Bob.");
            print_vectors(snapshot);
            println!("Choose the bits that explain how Bob's vector relates to Alice's.");
        }
        Phase::BitsFly => println!("The bits are on their way..."),
        Phase::ExplainGates => {
            if let Some(bits) = round.classical_bits {
                println!("Alice sent bits {}.", bits);
            }
            println!("Bob applies the matching gates to recover the state.");
        }
        Phase::Result => {
            println!("Teleportation Result");
            if let Some(message) = &round.message {
                println!("  {}", message);
            }
            if let (Some(true), Some(correction)) = (round.succeeded, round.chosen_correction) {
                println!("  Bob's vector is now {}", correction.apply(round.bob_vector));
            }
        }
    }
}

fn print_vectors(snapshot: &PuzzleSnapshot) {
    println!("  Alice: {}", snapshot.round.alice_vector);
    println!("  Bob:   {}", snapshot.round.bob_vector);
}

/// Reads one line; `None` on end of input or "q".
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim().to_string();
    if line.eq_ignore_ascii_case("q") {
        return Ok(None);
    }
    Ok(Some(line))
}

fn wait_for_enter(input: &mut impl BufRead) -> Result<bool> {
    print!("[enter to continue, q to quit] ");
    io::stdout().flush()?;
    Ok(read_line(input)?.is_some())
}

fn prompt<T: std::str::FromStr>(input: &mut impl BufRead, label: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    for _ in 0..5 {
        print!("{}: ", label);
        io::stdout().flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(e) => println!("  {}", e),
        }
    }
    bail!("too many invalid answers")
}
