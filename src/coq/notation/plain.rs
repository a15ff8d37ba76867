//! Plain-text rendering of notations, used to derive object names
//!
//! Repetitions, optional parts and alternatives are abbreviated with an ellipsis, so an
//! error message such as `Cannot find @ident{? in @qualid}` gets the name
//! `Cannot find ‘ident’…`.

use super::{NotationNode, RepeatKind};

pub const ELLIPSIS: &str = "…";

pub(super) fn stringify_with_ellipses(nodes: &[NotationNode]) -> String {
    let mut buffer = String::new();
    write_nodes(nodes, &mut buffer);
    buffer
}

fn write_nodes(nodes: &[NotationNode], buffer: &mut String) {
    for node in nodes {
        write_node(node, buffer);
    }
}

fn write_node(node: &NotationNode, buffer: &mut String) {
    match node {
        NotationNode::Atom(text) => buffer.push_str(text),
        NotationNode::Whitespace => buffer.push(' '),
        NotationNode::Hole(name) => {
            buffer.push('‘');
            buffer.push_str(name);
            buffer.push('’');
        }
        NotationNode::Curlies(body) => {
            buffer.push('{');
            write_nodes(body, buffer);
            buffer.push('}');
        }
        NotationNode::Repeat {
            kind: RepeatKind::OneOrMore,
            separator,
            body,
        } => {
            write_nodes(body, buffer);
            if let Some(separator) = separator {
                buffer.push_str(separator);
            }
            buffer.push(' ');
            buffer.push_str(ELLIPSIS);
        }
        NotationNode::Repeat { .. } | NotationNode::Optional(_) | NotationNode::Alternative(_) => {
            buffer.push_str(ELLIPSIS)
        }
    }
}
