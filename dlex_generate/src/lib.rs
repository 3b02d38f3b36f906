#![forbid(missing_docs)]
//! # `dlex_generate`
//! The `dlex_generate` crate is the offline half of a DFA-based lexer
//! toolchain. It compiles an ordered token catalogue — literal strings and
//! patterns of a restricted regex dialect — through the classic pipeline
//!
//! ```text
//! catalogue → ε-NFA → subset-construction DFA → minimised DFA → emitted code
//! ```
//!
//! The emitted artefact is a single Rust source text with two constants and
//! two pure functions (the transition function δ and the kind lookup κ)
//! that the `dlex` runtime crate consumes. For in-process use the same
//! tables are available without a code generation round trip via
//! [compile].

/// Module with the token catalogue
mod catalogue;
pub use catalogue::{Catalogue, TokenEntry, TokenPattern};

/// Module with error definitions
mod errors;
pub use errors::{GenError, GenErrorKind, RegexError, Result};

/// The module with internal implementation details.
mod internal;
pub use internal::emitter::EmissionMode;
pub use internal::minimizer::MinimizationAlgorithm;

/// Module with the interpreted lexer tables
mod lexer_tables;
pub use lexer_tables::LexerTables;

use log::{info, warn};

use internal::transition_table::TransitionTable;

/// The options of one generator run. A plain value passed explicitly to
/// the pipeline; there is no global configuration state.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// How the transition function is rendered.
    pub emission: EmissionMode,
    /// Which minimisation algorithm refines the distinguishability matrix.
    pub minimization: MinimizationAlgorithm,
    /// Merge equivalent terminal states even when their kinds differ.
    pub unify_token_kinds: bool,
}

/// The state counts of the three automaton stages, as reported by the
/// generator's verbose mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// States of the multi-token ε-NFA.
    pub nfa_states: usize,
    /// States after subset construction.
    pub dfa_states: usize,
    /// States after minimisation.
    pub min_dfa_states: usize,
}

/// Compile a catalogue into interpreted lexer tables.
pub fn compile(catalogue: &Catalogue, options: &GenerateOptions) -> Result<LexerTables> {
    let (table, _) = build_table(catalogue, options)?;
    Ok(LexerTables::new(table, catalogue.token_names().to_vec()))
}

/// Compile a catalogue and additionally report the per-stage state counts.
pub fn compile_with_stats(
    catalogue: &Catalogue,
    options: &GenerateOptions,
) -> Result<(LexerTables, PipelineStats)> {
    let (table, stats) = build_table(catalogue, options)?;
    Ok((
        LexerTables::new(table, catalogue.token_names().to_vec()),
        stats,
    ))
}

/// Compile a catalogue and render the emitted artefact.
pub fn generate(catalogue: &Catalogue, options: &GenerateOptions) -> Result<String> {
    let (text, _) = generate_with_stats(catalogue, options)?;
    Ok(text)
}

/// Compile a catalogue, render the emitted artefact and additionally report
/// the per-stage state counts.
pub fn generate_with_stats(
    catalogue: &Catalogue,
    options: &GenerateOptions,
) -> Result<(String, PipelineStats)> {
    let (table, stats) = build_table(catalogue, options)?;
    Ok((
        internal::emitter::emit(&table, catalogue, options.emission),
        stats,
    ))
}

/// Compile a catalogue and write the emitted artefact to a file.
///
/// The artefact is rendered completely in memory first; a failing run
/// never leaves a partial output file behind.
pub fn generate_to_file(
    catalogue: &Catalogue,
    options: &GenerateOptions,
    path: &std::path::Path,
) -> Result<()> {
    let text = generate(catalogue, options)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// The shared pipeline: catalogue → NFA → DFA → minimised DFA → dense table.
fn build_table(
    catalogue: &Catalogue,
    options: &GenerateOptions,
) -> Result<(TransitionTable, PipelineStats)> {
    if !catalogue.has_user_tokens() {
        return Err(GenError::new(GenErrorKind::CatalogueError(
            "the catalogue declares no tokens".to_string(),
        )));
    }
    if options.unify_token_kinds {
        warn!(
            "unify-token-kinds merges equally behaving terminals of different kinds; \
             do not use it when keywords must stay distinguishable from identifiers"
        );
    }

    let mut nfa = internal::nfa::Nfa::new();
    for entry in catalogue.entries() {
        match entry.pattern() {
            TokenPattern::Literal(text) => nfa.add_raw_string(text, entry.kind()),
            TokenPattern::Regex(pattern) => nfa.add_regex(pattern, entry.kind())?,
        }
    }
    let nfa_states = nfa.len();

    let dfa = internal::dfa::build_dfa(nfa);
    let dfa_states = dfa.len();
    if dfa.kind_of(dfa.start_state()).is_terminal() {
        return Err(GenError::new(GenErrorKind::EmptyToken));
    }

    let minimized =
        internal::minimizer::build_minimized_dfa(dfa, options.minimization, options.unify_token_kinds)?;
    let min_dfa_states = minimized.len();

    let stats = PipelineStats {
        nfa_states,
        dfa_states,
        min_dfa_states,
    };
    info!(
        "pipeline: NFA {} states, DFA {} states, minimised DFA {} states",
        stats.nfa_states, stats.dfa_states, stats.min_dfa_states
    );

    let table = TransitionTable::from_dfa(&minimized)?;
    Ok((table, stats))
}
