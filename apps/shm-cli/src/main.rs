use clap::{Parser, Subcommand, ValueEnum};
use shm_app::{AppError, AppResult, RunOutput, explanation, run_request, to_response};
use shm_core::units::with_unit;
use shm_core::{Family, Quantity};
use shm_project::{OptionsDef, SolveRequest, StateDef, TokenDef, load_request, save_request};
use shm_solver::Stage;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "shm-cli")]
#[command(about = "SHM solver - simple harmonic motion word problems", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a request file and print the results
    Solve {
        /// Path to the request file (.json, .yaml or .yml)
        request_path: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Show how each derived field was obtained
        #[arg(long)]
        trace: bool,
    },
    /// Validate request file syntax and structure
    Validate {
        /// Path to the request file
        request_path: PathBuf,
    },
    /// Print the governing relations of a family
    Explain {
        /// Oscillator family (spring or pendulum)
        family: Family,
    },
    /// Write a starter request file
    New {
        /// Path of the file to create
        request_path: PathBuf,
        /// Oscillator family
        #[arg(long, default_value_t = Family::Spring)]
        system: Family,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            request_path,
            format,
            trace,
        } => cmd_solve(&request_path, format, trace),
        Commands::Validate { request_path } => cmd_validate(&request_path),
        Commands::Explain { family } => {
            print!("{}", explanation(family));
            Ok(())
        }
        Commands::New {
            request_path,
            system,
            force,
        } => cmd_new(&request_path, system, force),
    }
}

fn cmd_solve(request_path: &Path, format: OutputFormat, trace: bool) -> AppResult<()> {
    let request = load_request(request_path)?;
    info!(path = %request_path.display(), states = request.states.len(), "loaded request");
    let output = run_request(&request)?;

    match format {
        OutputFormat::Json => {
            let response = to_response(&output);
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            println!("{json}");
        }
        OutputFormat::Table => print_table(&output, trace),
    }
    Ok(())
}

fn print_table(output: &RunOutput, trace: bool) {
    println!("System: {}", output.system);
    for (index, outcome) in output.outcomes.iter().enumerate() {
        println!();
        println!(
            "State {} ({} passes{})",
            index + 1,
            outcome.passes,
            if outcome.converged { "" } else { ", not converged" }
        );
        for (q, value) in outcome.state.iter() {
            match value {
                Some(v) => println!("  {:<7} {}", q.name(), with_unit(q, v)),
                None => println!("  {:<7} -", q.name()),
            }
        }
        for warning in &outcome.warnings {
            println!("  ⚠ {warning}");
        }
        if trace {
            for derivation in &outcome.derivations {
                let stage = match derivation.stage {
                    Stage::Propagation => "from previous state".to_string(),
                    Stage::Pass(n) => format!("pass {n}"),
                };
                println!(
                    "  {:<7} <- {} ({stage})",
                    derivation.quantity.name(),
                    derivation.rule
                );
            }
            for unresolved in &outcome.unresolved {
                println!("  ? {unresolved}");
            }
        }
    }
}

fn cmd_validate(request_path: &Path) -> AppResult<()> {
    println!("Validating request: {}", request_path.display());
    let request = load_request(request_path)?;
    println!(
        "✓ Request is valid ({} system, {} states)",
        request.system,
        request.states.len()
    );
    Ok(())
}

fn cmd_new(request_path: &Path, system: Family, force: bool) -> AppResult<()> {
    if request_path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            request_path.display()
        )));
    }
    let request = starter_request(system);
    save_request(request_path, &request)?;
    println!("✓ Wrote {} request to {}", system, request_path.display());
    Ok(())
}

fn starter_request(system: Family) -> SolveRequest {
    let first: StateDef = match system {
        Family::Spring => [
            (Quantity::Mass, TokenDef::Number(0.5)),
            (Quantity::Stiffness, TokenDef::Number(50.0)),
            (Quantity::Amplitude, TokenDef::Number(0.2)),
        ]
        .into_iter()
        .map(|(q, token)| (q.name().to_string(), Some(token)))
        .collect(),
        Family::Pendulum => [
            (Quantity::Length, TokenDef::Number(2.0)),
            (Quantity::Period, TokenDef::Number(2.5)),
        ]
        .into_iter()
        .map(|(q, token)| (q.name().to_string(), Some(token)))
        .collect(),
    };
    SolveRequest {
        system,
        states: vec![first],
        options: OptionsDef::default(),
    }
}
