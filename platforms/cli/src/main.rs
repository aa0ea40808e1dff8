use anyhow::Context as _;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tmsim::{Halt, ProgramLoader, Snapshot, TuringMachine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The machine description file to execute
    description: PathBuf,

    /// Do not print the configuration before each step
    #[clap(short, long)]
    quiet: bool,

    /// Print progress and the final tape as JSON lines
    #[clap(long)]
    json: bool,

    /// Print the parsed machine before running it
    #[clap(long)]
    dump: bool,
}

fn main() -> ExitCode {
    // Usage errors exit with 1 like every other failure; --help and --version exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let parsed = ProgramLoader::load_program(&cli.description)
        .with_context(|| format!("failed to load {}", cli.description.display()))?;

    for diagnostic in &parsed.diagnostics {
        tracing::warn!("{diagnostic}");
    }

    if cli.dump {
        print!("{}", parsed.program);
    }

    let mut machine = TuringMachine::new(parsed.program);
    let halt = machine.run_with(|snapshot| {
        if !cli.quiet {
            print_snapshot(snapshot, cli.json);
        }
    });

    let steps = match halt {
        Halt::Ok(steps) => steps,
        Halt::Err(e) => return Err(e).context("machine stopped without halting"),
    };

    tracing::debug!(
        steps,
        head = machine.head(),
        state = machine.state(),
        "machine halted"
    );

    let tape = machine.render(true);
    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "halted": true, "steps": steps, "tape": tape })
        );
    } else {
        println!("Machine successfully halted after {steps} operations");
        println!("\nTape after execution");
        println!("{tape}");
    }

    Ok(())
}

fn print_snapshot(snapshot: &Snapshot, json: bool) {
    if !json {
        println!("{snapshot}");
        return;
    }

    match serde_json::to_string(snapshot) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::error!("failed to encode step {}: {e}", snapshot.step),
    }
}
