//! This module provides the encoder that turns a `Program` back into the description
//! format accepted by the parser.

use crate::types::Program;
use std::fmt;

/// Encodes a `Program` as a machine description.
///
/// Format:
/// - line 0: the initial tape;
/// - line 1: the head position;
/// - line 2: the start state;
/// - line 3: the halting states, space separated and ascending;
/// - then one `state read write move next` rule per line, ordered by state and read
///   symbol, with a state's wildcard rule last.
///
/// Parsing the result yields a program equal to the input.
pub fn encode(program: &Program) -> String {
    let mut lines = vec![
        program.initial_tape(),
        program.head.to_string(),
        program.initial_state.to_string(),
        encode_halting(program),
    ];

    lines.extend(
        program
            .transitions()
            .map(|(state, transition)| format!("{state} {transition}")),
    );

    let mut encoded = lines.join("\n");
    encoded.push('\n');
    encoded
}

fn encode_halting(program: &Program) -> String {
    program
        .halting
        .iter()
        .map(|state| state.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_encode_orders_rules() {
        let input = "1-1\n-2\n0\n3 1\n1 * * 1 1\n0 b x -1 1\n0 - y 0 3\n1 - - 0 3\n0 * * 1 0\n";
        let program = parse(input).unwrap();

        assert_eq!(
            encode(&program),
            "1-1\n-2\n0\n1 3\n0 - y 0 3\n0 b x -1 1\n0 * * 1 0\n1 - - 0 3\n1 * * 1 1\n"
        );
    }

    #[test]
    fn test_encoded_program_parses_back() {
        let program = parse("0110\n2\n1\n0\n1 0 1 1 1\n1 1 0 1 1\n1 - * -1 0\n").unwrap();

        assert_eq!(parse(&encode(&program)).unwrap(), program);
    }

    #[test]
    fn test_encode_empty_tape_without_rules() {
        let program = parse("\n0\n0\n0\n").unwrap();

        assert_eq!(program.to_string(), "\n0\n0\n0\n");
    }
}
