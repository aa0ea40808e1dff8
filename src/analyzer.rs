//! This module provides checks that run over a parsed `Program` to surface likely mistakes
//! in its transition table. Every finding is a [`Diagnostic`]: the program stays runnable,
//! and a run that actually hits the problem ends in a `TransitionNotFound` error.

use crate::types::{Diagnostic, Program, State};
use std::collections::BTreeSet;

/// Analyzes a `Program` and returns all findings, in a stable order.
///
/// The checks are:
/// - every state the machine can enter (the start state and every rule's next state) is
///   either halting or has at least one rule;
/// - at least one halting state can be entered at all.
pub fn analyze(program: &Program) -> Vec<Diagnostic> {
    [check_undefined_states, check_reachable_halt]
        .iter()
        .flat_map(|f| f(program))
        .collect()
}

/// States the machine can be in: the start state and every rule's target.
fn entered_states(program: &Program) -> BTreeSet<usize> {
    std::iter::once(program.initial_state)
        .chain(program.transitions().map(|(_, t)| t.next_state))
        .collect()
}

fn check_undefined_states(program: &Program) -> Vec<Diagnostic> {
    entered_states(program)
        .into_iter()
        .filter(|&state| !program.is_halting(state))
        .filter(|&state| program.state(state).is_none_or(State::is_empty))
        .map(Diagnostic::UndefinedState)
        .collect()
}

fn check_reachable_halt(program: &Program) -> Vec<Diagnostic> {
    if entered_states(program).is_disjoint(&program.halting) {
        vec![Diagnostic::UnreachableHalt]
    } else {
        Vec::new()
    }
}
