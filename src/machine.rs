//! This module defines the `TuringMachine` struct, which executes a `Program` on a
//! two-way infinite tape. It owns the whole runtime configuration: the current state, the
//! head position, the tape and the step counter.

use crate::tape::Tape;
use crate::types::{Halt, MachineError, Program, Snapshot, Step, Transition, BLANK_SYMBOL};

/// A deterministic single-tape Turing machine.
///
/// The program is fixed for the lifetime of the machine; stepping only changes the tape
/// contents, the head position, the current state and the step counter.
pub struct TuringMachine {
    state: usize,
    head: i64,
    tape: Tape,
    program: Program,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` in the initial configuration of `program`.
    pub fn new(program: Program) -> Self {
        Self {
            state: program.initial_state,
            head: program.head,
            tape: Tape::new(&program.tape, BLANK_SYMBOL),
            program,
            step_count: 0,
        }
    }

    /// Executes a single step of the computation.
    ///
    /// Reads the symbol under the head (growing the tape if the head is past its end),
    /// resolves the transition, writes, moves the head and enters the next state.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a step was performed.
    /// * `Step::Halt(Halt::Ok(steps))` if the current state is a halting state.
    /// * `Step::Halt(Halt::Err(MachineError::TransitionNotFound))` if no rule matches. Apart
    ///   from tape growth, the configuration is left as it was before the step.
    /// * `Step::Halt(Halt::Err(MachineError::TapeExhausted))` if the cell under the head
    ///   cannot be allocated.
    pub fn step(&mut self) -> Step {
        if self.is_halted() {
            return Step::Halt(Halt::Ok(self.step_count));
        }

        let transition = match self.tape.read(self.head).and_then(|s| self.resolve(s)) {
            Ok(t) => t,
            Err(e) => return Step::Halt(Halt::Err(e)),
        };

        if let Err(e) = self.tape.write(self.head, transition.write) {
            return Step::Halt(Halt::Err(e));
        }
        self.head += transition.direction.offset();
        self.state = transition.next_state;
        self.step_count += 1;

        Step::Continue
    }

    /// Runs the machine until it halts or fails. There is no step limit.
    pub fn run(&mut self) -> Halt {
        self.run_with(|_| {})
    }

    /// Runs the machine like [`TuringMachine::run`], handing the configuration to
    /// `observer` before every step attempt.
    pub fn run_with<F>(&mut self, mut observer: F) -> Halt
    where
        F: FnMut(&Snapshot),
    {
        loop {
            if !self.is_halted() {
                observer(&self.snapshot());
            }

            match self.step() {
                Step::Continue => continue,
                Step::Halt(halt) => return halt,
            }
        }
    }

    /// Finds the rule for `symbol` in the current state: an exact match first, then the
    /// state's wildcard rule.
    pub fn resolve(&self, symbol: char) -> Result<Transition, MachineError> {
        self.program
            .state(self.state)
            .and_then(|state| state.resolve(symbol))
            .copied()
            .ok_or(MachineError::TransitionNotFound {
                state: self.state,
                symbol,
                steps: self.step_count,
            })
    }

    /// Returns the current state index.
    pub fn state(&self) -> usize {
        self.state
    }

    /// Returns the current head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// A machine is halted once its current state is in the halting set.
    pub fn is_halted(&self) -> bool {
        self.program.is_halting(self.state)
    }

    /// Returns the symbol under the head without growing the tape.
    pub fn symbol(&self) -> char {
        self.tape.get(self.head)
    }

    /// Renders the tape, optionally without its leading and trailing blanks.
    pub fn render(&self, trim_blanks: bool) -> String {
        self.tape.render(trim_blanks)
    }

    /// Captures the observable configuration.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            step: self.step_count,
            state: self.state,
            head: self.head,
            tape: self.tape.render(false),
        }
    }

    /// Resets the machine to the initial configuration of its program.
    pub fn reset(&mut self) {
        self.state = self.program.initial_state;
        self.head = self.program.head;
        self.tape = Tape::new(&self.program.tape, BLANK_SYMBOL);
        self.step_count = 0;
    }
}
