//! This module defines the core data structures and types used throughout the simulator,
//! including the program representation, transitions, execution results, and error types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The symbol filling every tape cell that has never been written.
pub const BLANK_SYMBOL: char = '-';
/// The reserved symbol meaning "any symbol" when read and "leave unchanged" when written.
pub const WILDCARD_SYMBOL: char = '*';
/// The maximum allowed size for a machine description in bytes.
pub const MAX_DESCRIPTION_SIZE: usize = 65536; // 64KB

/// A parsed machine description: the initial configuration and the state table.
///
/// A program is immutable once built. Everything that changes during a run lives in
/// [`crate::machine::TuringMachine`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The initial tape content, left to right, starting at head position 0.
    pub tape: Vec<char>,
    /// The initial head position. May be negative.
    pub head: i64,
    /// The index of the state the machine starts in.
    pub initial_state: usize,
    /// Reaching any of these states ends the run successfully.
    pub halting: BTreeSet<usize>,
    /// The transition table, keyed by state index.
    pub states: BTreeMap<usize, State>,
}

impl Program {
    /// Returns the initial tape content as a `String`.
    pub fn initial_tape(&self) -> String {
        self.tape.iter().collect()
    }

    /// Checks whether `state` belongs to the halting set.
    pub fn is_halting(&self, state: usize) -> bool {
        self.halting.contains(&state)
    }

    /// Returns the state with the given index, if any rule defines it.
    pub fn state(&self, index: usize) -> Option<&State> {
        self.states.get(&index)
    }

    /// Iterates over every transition in the table, ordered by state then read symbol.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &Transition)> {
        self.states
            .values()
            .flat_map(|state| state.transitions().map(move |t| (state.index, t)))
    }
}

/// The read side of a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Read {
    /// Matches exactly this symbol.
    Symbol(char),
    /// Matches any symbol that has no exact rule.
    Any,
}

impl Read {
    /// Converts a description token into a read pattern.
    pub fn from_symbol(symbol: char) -> Self {
        if symbol == WILDCARD_SYMBOL {
            Read::Any
        } else {
            Read::Symbol(symbol)
        }
    }
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Read::Symbol(c) => write!(f, "{c}"),
            Read::Any => write!(f, "{WILDCARD_SYMBOL}"),
        }
    }
}

/// The write side of a transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Write {
    /// Overwrite the cell with this symbol.
    Symbol(char),
    /// Leave the cell as it is.
    Keep,
}

impl Write {
    /// Converts a description token into a write action.
    pub fn from_symbol(symbol: char) -> Self {
        if symbol == WILDCARD_SYMBOL {
            Write::Keep
        } else {
            Write::Symbol(symbol)
        }
    }
}

impl fmt::Display for Write {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Write::Symbol(c) => write!(f, "{c}"),
            Write::Keep => write!(f, "{WILDCARD_SYMBOL}"),
        }
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The signed change applied to the head position.
    pub fn offset(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Stay => 0,
            Direction::Right => 1,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = i64;

    /// Only `-1`, `0` and `1` are legal moves; any other value is handed back.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Left),
            0 => Ok(Direction::Stay),
            1 => Ok(Direction::Right),
            other => Err(other),
        }
    }
}

/// A single transition rule.
///
/// A transition defines what the machine does when it is in a given state and reads a
/// matching symbol under the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The symbol this rule matches.
    pub read: Read,
    /// What to write into the cell under the head.
    pub write: Write,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine enters next.
    pub next_state: usize,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.read,
            self.write,
            self.direction.offset(),
            self.next_state
        )
    }
}

/// A machine state: its index and the rules leaving it.
///
/// Exact-symbol rules are looked up first; the wildcard rule is only a fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub index: usize,
    exact: BTreeMap<char, Transition>,
    wildcard: Option<Transition>,
}

impl State {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Adds a rule, returning the rule it replaced if one existed for the same read key.
    pub fn add_transition(&mut self, transition: Transition) -> Option<Transition> {
        match transition.read {
            Read::Symbol(symbol) => self.exact.insert(symbol, transition),
            Read::Any => self.wildcard.replace(transition),
        }
    }

    /// Resolves the rule for `symbol`: an exact match wins over the wildcard.
    pub fn resolve(&self, symbol: char) -> Option<&Transition> {
        self.exact.get(&symbol).or(self.wildcard.as_ref())
    }

    /// Returns the wildcard rule, if any.
    pub fn wildcard(&self) -> Option<&Transition> {
        self.wildcard.as_ref()
    }

    /// Iterates over the rules ordered by read symbol, wildcard last.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.exact.values().chain(self.wildcard.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.wildcard.is_none()
    }
}

/// The observable configuration of a machine between two steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Steps completed so far.
    pub step: usize,
    pub state: usize,
    pub head: i64,
    /// The full tape, blanks included.
    pub tape: String,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tape: {} head: {} state: {}",
            self.tape, self.head, self.state
        )
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step and keeps running.
    Continue,
    /// The machine stopped.
    Halt(Halt),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// Reached a halting state after the given number of steps.
    Ok(usize),

    Err(MachineError),
}

/// A non-fatal finding about a description. Reported, never aborts parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A later rule replaced an earlier one for the same state and read symbol.
    DuplicateTransition {
        line: usize,
        state: usize,
        previous: Transition,
        replacement: Transition,
    },
    /// A state the machine can enter has no rules and is not halting.
    UndefinedState(usize),
    /// No halting state is ever entered by the start state or any rule.
    UnreachableHalt,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DuplicateTransition {
                line,
                state,
                previous,
                replacement,
            } => write!(
                f,
                "line {line}: transition already added for state {state} symbol {}, \
                 overwriting previous: {previous} with {replacement}",
                replacement.read
            ),
            Diagnostic::UndefinedState(state) => {
                write!(f, "state {state} has no transitions and is not a halting state")
            }
            Diagnostic::UnreachableHalt => write!(f, "no halting state is ever entered"),
        }
    }
}

/// Represents the errors that can occur while loading, parsing or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// The description header does not follow the expected layout.
    #[error("Description parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// A rule line could not be split into its five fields.
    #[error("Malformed state line {line}: {text}")]
    MalformedRule { line: usize, text: String },
    /// A rule moves the head by something other than -1, 0 or 1.
    #[error("Invalid state rule on line {line}: attempting to move {value} when valid values are -1 0 1")]
    InvalidMove { line: usize, value: i64 },
    /// No exact or wildcard rule matches the symbol under the head.
    #[error("No valid transition for state {state} symbol {symbol} after {steps} steps")]
    TransitionNotFound {
        state: usize,
        symbol: char,
        steps: usize,
    },
    /// The tape cannot be grown far enough to reach the head.
    #[error("Cannot grow the tape to reach head position {head}")]
    TapeExhausted { head: i64 },
    /// Indicates an error related to reading description files.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(read: char, write: char, direction: Direction, next_state: usize) -> Transition {
        Transition {
            read: Read::from_symbol(read),
            write: Write::from_symbol(write),
            direction,
            next_state,
        }
    }

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, left_deserialized);
    }

    #[test]
    fn test_direction_from_move() {
        assert_eq!(Direction::try_from(-1), Ok(Direction::Left));
        assert_eq!(Direction::try_from(0), Ok(Direction::Stay));
        assert_eq!(Direction::try_from(1), Ok(Direction::Right));
        assert_eq!(Direction::try_from(2), Err(2));
        assert_eq!(Direction::try_from(-5), Err(-5));
    }

    #[test]
    fn test_wildcard_tokens() {
        assert_eq!(Read::from_symbol('*'), Read::Any);
        assert_eq!(Read::from_symbol('-'), Read::Symbol('-'));
        assert_eq!(Write::from_symbol('*'), Write::Keep);
        assert_eq!(Write::from_symbol('1'), Write::Symbol('1'));
    }

    #[test]
    fn test_state_prefers_exact_match() {
        let mut state = State::new(0);
        state.add_transition(rule('*', '*', Direction::Right, 0));
        state.add_transition(rule('1', '0', Direction::Left, 1));

        assert_eq!(state.resolve('1').unwrap().next_state, 1);
        assert_eq!(state.resolve('x').unwrap().next_state, 0);
        assert_eq!(state.resolve(BLANK_SYMBOL).unwrap().read, Read::Any);
    }

    #[test]
    fn test_state_without_wildcard_resolves_nothing() {
        let mut state = State::new(3);
        state.add_transition(rule('1', '1', Direction::Right, 3));

        assert!(state.resolve('0').is_none());
        assert!(State::new(4).resolve('0').is_none());
    }

    #[test]
    fn test_add_transition_returns_replaced_rule() {
        let mut state = State::new(0);
        let first = rule('a', 'b', Direction::Right, 1);
        let second = rule('a', 'c', Direction::Left, 2);

        assert_eq!(state.add_transition(first), None);
        assert_eq!(state.add_transition(second), Some(first));
        assert_eq!(state.resolve('a'), Some(&second));
        assert_eq!(state.transitions().count(), 1);
    }

    #[test]
    fn test_transition_display() {
        assert_eq!(rule('1', '*', Direction::Left, 7).to_string(), "1 * -1 7");
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::TransitionNotFound {
            state: 2,
            symbol: 'x',
            steps: 5,
        };

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("state 2"));
        assert!(error_msg.contains("symbol x"));
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot {
            step: 3,
            state: 1,
            head: -2,
            tape: "1-1".to_string(),
        };

        assert_eq!(snapshot.to_string(), "tape: 1-1 head: -2 state: 1");
        assert_eq!(
            serde_json::to_string(&snapshot).unwrap(),
            r#"{"step":3,"state":1,"head":-2,"tape":"1-1"}"#
        );
    }
}
