//! This module contains the code emitter.
//! Both emission modes render the same dense transition table into a single
//! self-contained Rust source text: constants, the token name table, the
//! transition function δ and the kind lookup function κ. A consumer needs
//! nothing but this file to drive the runtime lexer.

use std::fmt::Write as _;

use super::transition_table::TransitionTable;
use crate::Catalogue;

/// How the transition function is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmissionMode {
    /// A static two-dimensional array of the smallest cell type that holds
    /// the invalid sentinel; δ is a plain double index.
    #[default]
    Table,
    /// Nested matches, outer on the state and inner on the byte, with runs
    /// of bytes folded into range patterns. Larger source, but gives the
    /// compiler a jump-table-shaped function to optimise.
    Switch,
}

/// Render the emitted artefact.
pub(crate) fn emit(table: &TransitionTable, catalogue: &Catalogue, mode: EmissionMode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// Generated by dlex-gen. DO NOT EDIT.");
    let _ = writeln!(
        out,
        "// {} states, {} token kinds, {} emission.",
        table.state_count(),
        catalogue.kind_count(),
        match mode {
            EmissionMode::Table => "table",
            EmissionMode::Switch => "switch",
        }
    );
    let _ = writeln!(out);

    emit_token_kinds(&mut out, catalogue);
    let _ = writeln!(
        out,
        "pub const DFA_START_STATE_ID: u32 = {};",
        table.start_state()
    );
    let _ = writeln!(
        out,
        "pub const DFA_INVALID_STATE_ID: u32 = {};",
        table.invalid_state()
    );
    let _ = writeln!(out);

    match mode {
        EmissionMode::Table => emit_delta_table(&mut out, table),
        EmissionMode::Switch => emit_delta_switch(&mut out, table),
    }
    emit_kind_table(&mut out, table);
    out
}

fn emit_token_kinds(out: &mut String, catalogue: &Catalogue) {
    for (kind, name) in catalogue.token_names().iter().enumerate() {
        let _ = writeln!(
            out,
            "pub const TOK_{}: u16 = {};",
            name.to_uppercase(),
            kind
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "pub static TOKEN_NAMES: [&str; {}] = [",
        catalogue.kind_count()
    );
    for name in catalogue.token_names() {
        let _ = writeln!(out, "    \"{name}\",");
    }
    let _ = writeln!(out, "];");
    let _ = writeln!(out);
}

fn emit_delta_table(out: &mut String, table: &TransitionTable) {
    let cell = table.cell_type();
    let _ = writeln!(
        out,
        "static TRANSITIONS: [[{cell}; 256]; {}] = [",
        table.state_count()
    );
    for state in 0..table.state_count() {
        let _ = writeln!(out, "    [");
        let row = table.row(state);
        for chunk in row.chunks(16) {
            let cells: Vec<String> = chunk.iter().map(|c| c.to_string()).collect();
            let _ = writeln!(out, "        {},", cells.join(", "));
        }
        let _ = writeln!(out, "    ],");
    }
    let _ = writeln!(out, "];");
    let _ = writeln!(out);
    let _ = writeln!(out, "#[inline]");
    let _ = writeln!(out, "pub fn dfa_delta(state: u32, byte: u8) -> u32 {{");
    let _ = writeln!(out, "    TRANSITIONS");
    let _ = writeln!(out, "        .get(state as usize)");
    let _ = writeln!(
        out,
        "        .map_or(DFA_INVALID_STATE_ID, |row| row[byte as usize] as u32)"
    );
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn emit_delta_switch(out: &mut String, table: &TransitionTable) {
    let _ = writeln!(out, "pub fn dfa_delta(state: u32, byte: u8) -> u32 {{");
    let _ = writeln!(out, "    match state {{");
    for state in 0..table.state_count() {
        let runs = byte_runs(table.row(state), table.invalid_state());
        if runs.is_empty() {
            continue;
        }
        let _ = writeln!(out, "        {state} => match byte {{");
        for (lo, hi, target) in runs {
            if lo == hi {
                let _ = writeln!(out, "            {lo:#04X} => {target},");
            } else {
                let _ = writeln!(out, "            {lo:#04X}..={hi:#04X} => {target},");
            }
        }
        let _ = writeln!(out, "            _ => DFA_INVALID_STATE_ID,");
        let _ = writeln!(out, "        }},");
    }
    let _ = writeln!(out, "        _ => DFA_INVALID_STATE_ID,");
    let _ = writeln!(out, "    }}");
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
}

fn emit_kind_table(out: &mut String, table: &TransitionTable) {
    let _ = writeln!(out, "static KINDS: [u16; {}] = [", table.state_count());
    for chunk in table.kinds().chunks(16) {
        let cells: Vec<String> = chunk.iter().map(|c| c.to_string()).collect();
        let _ = writeln!(out, "    {},", cells.join(", "));
    }
    let _ = writeln!(out, "];");
    let _ = writeln!(out);
    let _ = writeln!(out, "#[inline]");
    let _ = writeln!(out, "pub fn dfa_get_kind(state: u32) -> u16 {{");
    let _ = writeln!(
        out,
        "    KINDS.get(state as usize).copied().unwrap_or(TOK_UNKNOWN)"
    );
    let _ = writeln!(out, "}}");
}

/// Fold one table row into maximal runs of consecutive bytes with the same
/// present target. Returns (first byte, last byte, target) triples in
/// ascending byte order.
fn byte_runs(row: &[u32; 256], invalid: u32) -> Vec<(u8, u8, u32)> {
    let mut runs: Vec<(u8, u8, u32)> = Vec::new();
    for byte in 0..=255u8 {
        let target = row[byte as usize];
        if target == invalid {
            continue;
        }
        match runs.last_mut() {
            Some((_, last, t)) if *t == target && *last + 1 == byte => *last = byte,
            _ => runs.push((byte, byte, target)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::dfa::build_dfa;
    use crate::internal::nfa::Nfa;
    use crate::internal::transition_table::TransitionTable;
    use dlex::TokenKind;

    fn fixture() -> (TransitionTable, Catalogue) {
        let mut catalogue = Catalogue::new();
        catalogue.add_literal("kw_for", "for").unwrap();
        catalogue.add_regex("identifier", "[a-z]+").unwrap();
        let mut nfa = Nfa::new();
        for entry in catalogue.entries() {
            match entry.pattern() {
                crate::TokenPattern::Literal(text) => nfa.add_raw_string(text, entry.kind()),
                crate::TokenPattern::Regex(pattern) => {
                    nfa.add_regex(pattern, entry.kind()).unwrap()
                }
            }
        }
        let table = TransitionTable::from_dfa(&build_dfa(nfa)).unwrap();
        (table, catalogue)
    }

    #[test]
    fn test_byte_runs() {
        let mut row = [9u32; 256];
        row[b'a' as usize] = 1;
        row[b'b' as usize] = 1;
        row[b'c' as usize] = 1;
        row[b'x' as usize] = 2;
        row[b'y' as usize] = 3;
        assert_eq!(
            byte_runs(&row, 9),
            vec![(b'a', b'c', 1), (b'x', b'x', 2), (b'y', b'y', 3)]
        );
    }

    #[test]
    fn test_table_emission_shape() {
        let (table, catalogue) = fixture();
        let text = emit(&table, &catalogue, EmissionMode::Table);
        assert!(text.starts_with("// Generated by dlex-gen. DO NOT EDIT."));
        assert!(text.contains("pub const DFA_START_STATE_ID: u32 = 0;"));
        assert!(text.contains(&format!(
            "pub const DFA_INVALID_STATE_ID: u32 = {};",
            table.invalid_state()
        )));
        assert!(text.contains(&format!(
            "static TRANSITIONS: [[u8; 256]; {}] = [",
            table.state_count()
        )));
        assert!(text.contains("pub fn dfa_delta(state: u32, byte: u8) -> u32"));
        assert!(text.contains("pub fn dfa_get_kind(state: u32) -> u16"));
    }

    #[test]
    fn test_token_constants_and_names() {
        let (table, catalogue) = fixture();
        for mode in [EmissionMode::Table, EmissionMode::Switch] {
            let text = emit(&table, &catalogue, mode);
            assert!(text.contains("pub const TOK_UNKNOWN: u16 = 0;"));
            assert!(text.contains("pub const TOK_EOF: u16 = 1;"));
            assert!(text.contains("pub const TOK_KW_FOR: u16 = 4;"));
            assert!(text.contains("pub const TOK_IDENTIFIER: u16 = 5;"));
            assert!(text.contains("pub static TOKEN_NAMES: [&str; 6] = ["));
            assert!(text.contains("    \"identifier\","));
        }
    }

    #[test]
    fn test_switch_emission_contains_runs() {
        let (table, catalogue) = fixture();
        let text = emit(&table, &catalogue, EmissionMode::Switch);
        // The identifier class produces a contiguous lowercase run out of
        // the start state.
        let target_f = table.delta(0, b'f');
        let target_other = table.delta(0, b'a');
        assert_ne!(target_f, target_other, "'f' starts the keyword path");
        assert!(text.contains(&format!("0x66 => {target_f},")));
        assert!(text.contains("..="), "runs are folded into range arms");
        assert!(text.contains("        _ => DFA_INVALID_STATE_ID,"));
        assert!(!text.contains("static TRANSITIONS"));
    }

    #[test]
    fn test_emission_is_deterministic() {
        let (table, catalogue) = fixture();
        for mode in [EmissionMode::Table, EmissionMode::Switch] {
            let first = emit(&table, &catalogue, mode);
            let second = emit(&table, &catalogue, mode);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_eof_state_is_terminal_in_kind_table() {
        let (table, catalogue) = fixture();
        let text = emit(&table, &catalogue, EmissionMode::Table);
        let eof_state = table.delta(0, 0);
        assert_ne!(eof_state, table.invalid_state());
        assert_eq!(table.kind_of(eof_state), TokenKind::EOF.id());
        assert!(text.contains(&format!("static KINDS: [u16; {}] = [", table.state_count())));
    }
}
