//! Command line interface

use clap::builder::RangedU64ValueParser;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use kdam::{tqdm, BarExt};
use trilogic::circuit::stats::stats;
use trilogic::equiv::composite_checker;
use trilogic::sim::{
    evaluate, exhaustive_patterns, generate_random_patterns, nb_exhaustive_patterns, truth_table,
};
use trilogic::{Circuit, CircuitConfig, CircuitError, GateKind, Value};

/// Command line arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Maximum propagation depth before reporting a feedback loop
    #[arg(
        long,
        global = true,
        default_value_t = CircuitConfig::DEFAULT_MAX_DEPTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_depth: usize,
}

impl Cli {
    pub fn config(&self) -> CircuitConfig {
        CircuitConfig::default().with_max_depth(self.max_depth)
    }
}

/// Command line arguments
#[derive(Subcommand)]
pub enum Commands {
    /// Show how a gate is built
    ///
    /// Will print every node of the gate with its pins, followed by statistics.
    #[clap()]
    Show(ShowArgs),

    /// Print the truth table of a gate
    ///
    /// Rows use 0, 1 and x, with inputs driven in order on a fresh gate.
    /// The binary truth table is printed as a hexadecimal Lut.
    #[clap(alias = "tt")]
    Table(TableArgs),

    /// Check a composite gate against an explicit wiring of its primitives
    ///
    /// The command will fail if the two are not equivalent, and will output the
    /// failing input pattern.
    #[clap()]
    Check(CheckArgs),
}

/// Gates available from the command line
#[derive(Clone, Copy, ValueEnum)]
pub enum GateArg {
    And,
    Or,
    Not,
    Nand,
    Nor,
}

impl From<GateArg> for GateKind {
    fn from(g: GateArg) -> GateKind {
        match g {
            GateArg::And => GateKind::And,
            GateArg::Or => GateKind::Or,
            GateArg::Not => GateKind::Not,
            GateArg::Nand => GateKind::Nand,
            GateArg::Nor => GateKind::Nor,
        }
    }
}

/// Gate selection shared by all commands
#[derive(Args)]
pub struct GateSelection {
    /// Gate to build
    #[arg(value_enum)]
    gate: GateArg,

    /// Number of inputs
    #[arg(short = 'w', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    width: Option<usize>,
}

impl GateSelection {
    fn kind(&self) -> GateKind {
        self.gate.into()
    }

    fn width(&self) -> Result<usize, clap::Error> {
        let kind = self.kind();
        let width = self.width.unwrap_or(kind.default_width());
        if !kind.is_nary() && width != 1 {
            return Err(Cli::command().error(
                ErrorKind::InvalidValue,
                format!("Invalid width {width} for a {kind} gate"),
            ));
        }
        Ok(width)
    }

    /// Width for commands going through all patterns, which must be countable
    fn exhaustive_width(&self) -> Result<(usize, usize), clap::Error> {
        let width = self.width()?;
        let Some(nb) = nb_exhaustive_patterns(width) else {
            return Err(Cli::command().error(
                ErrorKind::InvalidValue,
                format!("Invalid width {width}: too many patterns to go through"),
            ));
        };
        Ok((width, nb))
    }
}

/// Command arguments for gate display
#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    gate: GateSelection,
}

impl ShowArgs {
    pub fn run(&self, config: CircuitConfig) -> Result<(), CircuitError> {
        let mut circuit = Circuit::with_config(config);
        let width = self.gate.width().unwrap_or_else(|e| e.exit());
        circuit.add_gate(self.gate.kind(), width);
        circuit.check();
        println!("{circuit}");
        println!("{}", stats(&circuit));
        Ok(())
    }
}

/// Command arguments for truth tables
#[derive(Args)]
pub struct TableArgs {
    #[command(flatten)]
    gate: GateSelection,
}

impl TableArgs {
    pub fn run(&self, config: CircuitConfig) -> Result<(), CircuitError> {
        let kind = self.gate.kind();
        let (width, _) = self.gate.exhaustive_width().unwrap_or_else(|e| e.exit());
        for pattern in exhaustive_patterns(width) {
            let mut circuit = Circuit::with_config(config);
            let n = circuit.add_gate(kind, width);
            let out = evaluate(&mut circuit, n, &pattern)?;
            for v in &pattern {
                print!("{v}");
            }
            print!(" ->");
            for v in &out {
                print!(" {v}");
            }
            println!();
        }
        if width <= 16 {
            println!("LUT 0x{}", truth_table(kind, width, config)?.to_hex_string());
        }
        Ok(())
    }
}

/// Command arguments for equivalence checking
#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    gate: GateSelection,

    /// Number of random patterns; all patterns are checked if not given
    #[arg(short = 'r', long)]
    random: Option<usize>,

    /// Seed for random patterns
    #[arg(long, default_value_t = 1)]
    seed: u64,
}

impl CheckArgs {
    pub fn run(&self, config: CircuitConfig) -> Result<(), CircuitError> {
        let kind = self.gate.kind();
        let width;
        let total;
        let patterns: Box<dyn Iterator<Item = Vec<Value>>> = match self.random {
            Some(nb) => {
                width = self.gate.width().unwrap_or_else(|e| e.exit());
                total = nb;
                Box::new(generate_random_patterns(width, nb, self.seed).into_iter())
            }
            None => {
                let (w, nb) = self.gate.exhaustive_width().unwrap_or_else(|e| e.exit());
                width = w;
                total = nb;
                Box::new(exhaustive_patterns(width))
            }
        };
        if !kind.is_composite() {
            println!("{kind} is a primitive gate, nothing to check");
            return Ok(());
        }
        let mut checker = composite_checker(kind, width, config);
        let mut progress = tqdm!(total = total);
        progress.set_description("Patterns checked");
        for pattern in patterns {
            if !checker.check_pattern(&pattern)? {
                progress
                    .write(format!("{kind} gate does not match its reference wiring"))
                    .unwrap();
                print!("Input pattern: ");
                for v in &pattern {
                    print!("{v}");
                }
                println!();
                std::process::exit(1);
            }
            progress.update(1).unwrap();
        }
        progress
            .write(format!(
                "{kind} gate with {width} inputs matches its reference wiring on {total} patterns"
            ))
            .unwrap();
        Ok(())
    }
}
