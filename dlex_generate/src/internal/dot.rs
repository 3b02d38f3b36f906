//! The `dot` module contains the conversion from an automaton to the
//! graphviz dot format. The functions in this module are used for testing
//! and debugging purposes.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use super::nfa::Nfa;

/// Render an automaton to the graphviz dot format. Terminal states are
/// labelled with their token kind; byte edges with runs of consecutive
/// bytes folded together.
#[allow(dead_code)]
pub(crate) fn automaton_render<W: Write>(automaton: &Nfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for (state_id, state) in automaton.states().iter().enumerate() {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&state_id.to_string());
            if state_id == automaton.start_state().as_usize() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if state.kind().is_terminal() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0)
                    .set_label(&format!("{}\nkind {}", state_id, state.kind()));
            }
            source_node.id()
        };
        for (edge_label, target) in folded_edges(state.byte_edges()) {
            digraph
                .edge(source_id.clone(), &format!("node_{}", target))
                .attributes()
                .set_label(&edge_label);
        }
        for target in state.epsilon_edges() {
            digraph
                .edge(source_id.clone(), &format!("node_{}", target.as_usize()))
                .attributes()
                .set_label("ε");
        }
    }
}

/// Group a state's byte edges by target and fold consecutive bytes into
/// range labels, so that a class edge reads `61-7A` instead of 26 arrows.
fn folded_edges(edges: &[(u8, super::ids::StateId)]) -> Vec<(String, usize)> {
    let mut sorted: Vec<(u8, usize)> = edges.iter().map(|(b, t)| (*b, t.as_usize())).collect();
    sorted.sort_unstable_by_key(|(b, t)| (*t, *b));
    let mut folded: Vec<(u8, u8, usize)> = Vec::new();
    for (byte, target) in sorted {
        match folded.last_mut() {
            Some((_, last, t)) if *t == target && *last + 1 == byte => *last = byte,
            _ => folded.push((byte, byte, target)),
        }
    }
    folded
        .into_iter()
        .map(|(lo, hi, target)| {
            let label = if lo == hi {
                format!("{lo:02X}")
            } else {
                format!("{lo:02X}-{hi:02X}")
            };
            (label, target)
        })
        .collect()
}
