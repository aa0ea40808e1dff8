//! This module provides the parser for machine descriptions, utilizing the `pest` crate.
//! The grammar in `grammar.pest` splits the input into header fields and rule lines; the
//! functions here turn them into a validated `Program`.

use crate::{
    analyzer::analyze,
    types::{
        Diagnostic, Direction, MachineError, Program, Read, State, Transition, Write,
        WILDCARD_SYMBOL,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Derives a `PestParser` for the description grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DescriptionParser;

/// A parsed program together with the non-fatal findings collected while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses the given description into a `Program`, discarding diagnostics.
///
/// # Returns
///
/// * `Ok(Program)` if the description is well formed.
/// * `Err(MachineError::ParseError)` if the header lines are malformed.
/// * `Err(MachineError::MalformedRule)` if a rule line is not five valid fields.
/// * `Err(MachineError::InvalidMove)` if a rule moves by anything but -1, 0 or 1.
pub fn parse(input: &str) -> Result<Program, MachineError> {
    parse_description(input).map(|parsed| parsed.program)
}

/// Parses the given description into a `Program` and its diagnostics.
///
/// This is the main entry point for parsing. Rules are applied in file order, so when two
/// rules share a state and read symbol the later one wins and a
/// [`Diagnostic::DuplicateTransition`] is recorded. The finished program is then analyzed
/// for states that can be entered but have no rules.
pub fn parse_description(input: &str) -> Result<Parsed, MachineError> {
    let pairs = DescriptionParser::parse(Rule::description, input)
        .map_err(|e| MachineError::ParseError(Box::new(e)))?;

    let mut tape = Vec::new();
    let mut head = 0;
    let mut initial_state = 0;
    let mut halting = BTreeSet::new();
    let mut states: BTreeMap<usize, State> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    // Rule: description > [tape, head, initial_state, halting, rule_line*]
    for p in pairs.flat_map(|description| description.into_inner()) {
        match p.as_rule() {
            Rule::tape => tape = parse_tape(p)?,
            Rule::head => head = parse_number(&p)?,
            Rule::initial_state => initial_state = parse_number(&p)?,
            Rule::halting => halting = parse_halting(p)?,
            Rule::rule_line => {
                let Some(rule) = parse_rule(p, input.len())? else {
                    continue;
                };

                // States are created by the first rule that mentions them.
                let state = states
                    .entry(rule.state)
                    .or_insert_with(|| State::new(rule.state));

                if let Some(previous) = state.add_transition(rule.transition) {
                    diagnostics.push(Diagnostic::DuplicateTransition {
                        line: rule.line,
                        state: rule.state,
                        previous,
                        replacement: rule.transition,
                    });
                }
            }
            _ => {} // EOI
        }
    }

    let program = Program {
        tape,
        head,
        initial_state,
        halting,
        states,
    };

    diagnostics.extend(analyze(&program));

    Ok(Parsed {
        program,
        diagnostics,
    })
}

/// Parses the initial tape from a `Pair<Rule::tape>`, rejecting the wildcard symbol.
fn parse_tape(pair: Pair<Rule>) -> Result<Vec<char>, MachineError> {
    let mut symbols = Vec::new();

    // Rule: tape > [tape_symbol]
    for symbol_pair in pair.into_inner() {
        let span = symbol_pair.as_span();
        let Some(symbol) = symbol_pair.as_str().chars().next() else {
            continue;
        };

        if symbol == WILDCARD_SYMBOL {
            return Err(parse_error(
                &format!("The wildcard symbol '{WILDCARD_SYMBOL}' cannot appear on the tape"),
                span,
            ));
        }

        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Parses the halting state list from a `Pair<Rule::halting>`.
fn parse_halting(pair: Pair<Rule>) -> Result<BTreeSet<usize>, MachineError> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::index)
        .map(|p| parse_number(&p))
        .collect()
}

/// Parses a numeric header field. The grammar only admits digits, so the only failure
/// left is a value that does not fit the target type.
fn parse_number<T: FromStr>(pair: &Pair<Rule>) -> Result<T, MachineError> {
    pair.as_str().parse().map_err(|_| {
        parse_error(
            &format!("Number out of range: {}", pair.as_str()),
            pair.as_span(),
        )
    })
}

/// Parses one rule line from a `Pair<Rule::rule_line>`.
///
/// Returns `Ok(None)` only for the empty line that follows the final newline of the input.
/// Any other line without exactly five fields is malformed, blank lines included.
fn parse_rule(pair: Pair<Rule>, input_len: usize) -> Result<Option<ParsedRule>, MachineError> {
    let span = pair.as_span();
    let line = span.start_pos().line_col().0;
    let text = pair.as_str().trim().to_string();

    if span.start() == input_len {
        return Ok(None);
    }

    // Rule: rule_line > [token]
    let tokens: Vec<&str> = pair.into_inner().map(|p| p.as_str()).collect();

    let malformed = || MachineError::MalformedRule {
        line,
        text: text.clone(),
    };

    let [state, read, write, movement, next] = tokens.as_slice() else {
        return Err(malformed());
    };

    let state = state.parse::<usize>().map_err(|_| malformed())?;
    let read = parse_symbol(read).ok_or_else(malformed)?;
    let write = parse_symbol(write).ok_or_else(malformed)?;
    let movement = parse_move(movement).ok_or_else(malformed)?;
    let next_state = next.parse::<usize>().map_err(|_| malformed())?;

    let direction = Direction::try_from(movement)
        .map_err(|value| MachineError::InvalidMove { line, value })?;

    Ok(Some(ParsedRule {
        line,
        state,
        transition: Transition {
            read: Read::from_symbol(read),
            write: Write::from_symbol(write),
            direction,
            next_state,
        },
    }))
}

/// Parses a move token. Any optionally signed run of digits is a move value; values that
/// overflow `i64` saturate so they are still reported as an invalid move.
fn parse_move(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(token.parse().unwrap_or(if token.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Parses a rule symbol token, which must be exactly one character.
fn parse_symbol(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}

/// Creates a `MachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> MachineError {
    MachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// A helper struct to temporarily hold a parsed rule line.
struct ParsedRule {
    line: usize,
    state: usize,
    transition: Transition,
}
