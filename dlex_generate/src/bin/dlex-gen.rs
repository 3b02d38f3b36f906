//! The offline generator tool: compiles a token catalogue file into the
//! emitted DFA artefact.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dlex_generate::{
    Catalogue, EmissionMode, GenerateOptions, MinimizationAlgorithm, Result,
};

#[derive(Parser, Debug)]
#[command(
    name = "dlex-gen",
    about = "Generate DFA lexer tables from a token catalogue"
)]
struct Cli {
    /// The token catalogue file.
    catalogue: PathBuf,

    /// The output file.
    #[arg(short = 'o', value_name = "filename", default_value = "a.inc")]
    output: PathBuf,

    /// Emit the transition function as a static lookup table (the default).
    #[arg(long = "gen-via-table", conflicts_with = "gen_via_switch")]
    gen_via_table: bool,

    /// Emit the transition function as nested match statements.
    #[arg(long = "gen-via-switch")]
    gen_via_switch: bool,

    /// Minimise with the reverse-edge worklist algorithm (the default).
    #[arg(long = "use-min-algo-o2", conflicts_with = "use_min_algo_o4")]
    use_min_algo_o2: bool,

    /// Minimise with the iterative pair refinement algorithm.
    #[arg(long = "use-min-algo-o4")]
    use_min_algo_o4: bool,

    /// Merge equivalent terminal states even when their token kinds differ.
    #[arg(long = "unify-token-kinds")]
    unify_token_kinds: bool,

    /// Print the state counts of all pipeline stages.
    #[arg(short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("dlex-gen: error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = std::fs::read_to_string(&cli.catalogue)?;
    let catalogue = Catalogue::parse(&text)?;
    let options = GenerateOptions {
        emission: if cli.gen_via_switch {
            EmissionMode::Switch
        } else {
            EmissionMode::Table
        },
        minimization: if cli.use_min_algo_o4 {
            MinimizationAlgorithm::PairRefinement
        } else {
            MinimizationAlgorithm::ReverseWorklist
        },
        unify_token_kinds: cli.unify_token_kinds,
    };

    let (artefact, stats) = dlex_generate::generate_with_stats(&catalogue, &options)?;
    if cli.verbose {
        eprintln!("dlex-gen: NFA states: {}", stats.nfa_states);
        eprintln!("dlex-gen: DFA states: {}", stats.dfa_states);
        eprintln!("dlex-gen: minimised DFA states: {}", stats.min_dfa_states);
    }
    std::fs::write(&cli.output, artefact)?;
    Ok(())
}
