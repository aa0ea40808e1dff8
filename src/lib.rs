//! This crate provides the core logic for a deterministic single-tape Turing machine
//! simulator. It includes modules for parsing machine descriptions, simulating their
//! execution on a two-way infinite tape, and analyzing transition tables.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function from the analyzer module.
pub use analyzer::analyze;
/// Re-exports the encoding function from the encoder module.
pub use encoder::encode;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the parsing entry points from the parser module.
pub use parser::{parse, parse_description, Parsed};
/// Re-exports the two-way tape and its index mapping.
pub use tape::{physical_index, Tape};
/// Re-exports the types describing machines, their runs and their errors.
pub use types::{
    Diagnostic, Direction, Halt, MachineError, Program, Read, Snapshot, State, Step, Transition,
    Write, BLANK_SYMBOL, MAX_DESCRIPTION_SIZE, WILDCARD_SYMBOL,
};
