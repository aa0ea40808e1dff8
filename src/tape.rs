//! This module provides the two-way infinite `Tape`.
//!
//! The tape is stored as two growable halves. Position `p >= 0` lives in the forward half at
//! index `p`; position `p < 0` lives in the backward half at index `-p - 1`, so position `-1`
//! is the first backward cell. Cells come into existence on demand and are filled with the
//! blank symbol. Neither half ever shrinks.

use crate::types::{MachineError, Write};

/// Maps a head position to its index inside the half of the tape it addresses.
pub fn physical_index(position: i64) -> usize {
    if position >= 0 {
        position as usize
    } else {
        (-(position + 1)) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    forward: Vec<char>,
    backward: Vec<char>,
    blank: char,
}

impl Tape {
    /// Creates a tape whose cells `0..symbols.len()` hold `symbols`.
    pub fn new(symbols: &[char], blank: char) -> Self {
        Self {
            forward: symbols.to_vec(),
            backward: Vec::new(),
            blank,
        }
    }

    /// Returns the symbol at `position`, extending the addressed half with blanks up to
    /// and including that cell first.
    ///
    /// Fails with `MachineError::TapeExhausted` only when that many cells cannot be
    /// allocated.
    pub fn read(&mut self, position: i64) -> Result<char, MachineError> {
        self.cell_mut(position).map(|cell| *cell)
    }

    /// Writes into the cell at `position`. `Write::Keep` leaves the tape untouched.
    pub fn write(&mut self, position: i64, write: Write) -> Result<(), MachineError> {
        if let Write::Symbol(symbol) = write {
            *self.cell_mut(position)? = symbol;
        }

        Ok(())
    }

    /// Returns the symbol at `position` without growing the tape.
    pub fn get(&self, position: i64) -> char {
        self.half(position)
            .get(physical_index(position))
            .copied()
            .unwrap_or(self.blank)
    }

    /// Returns the tape content from left to right. With `trim_blanks`, leading and
    /// trailing blanks are removed; blanks in between are kept.
    pub fn cells(&self, trim_blanks: bool) -> Vec<char> {
        let cells = self.backward.iter().rev().chain(self.forward.iter());

        if !trim_blanks {
            return cells.copied().collect();
        }

        let mut cells: Vec<char> = cells.copied().skip_while(|&c| c == self.blank).collect();
        while cells.last() == Some(&self.blank) {
            cells.pop();
        }

        cells
    }

    /// Same as [`Tape::cells`], joined into a `String`.
    pub fn render(&self, trim_blanks: bool) -> String {
        self.cells(trim_blanks).into_iter().collect()
    }

    /// The number of materialized cells on both halves.
    pub fn len(&self) -> usize {
        self.forward.len() + self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn forward(&self) -> &[char] {
        &self.forward
    }

    pub fn backward(&self) -> &[char] {
        &self.backward
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    fn half(&self, position: i64) -> &[char] {
        if position < 0 {
            &self.backward
        } else {
            &self.forward
        }
    }

    fn cell_mut(&mut self, position: i64) -> Result<&mut char, MachineError> {
        let index = physical_index(position);
        let blank = self.blank;
        let half = if position < 0 {
            &mut self.backward
        } else {
            &mut self.forward
        };

        if index >= half.len() {
            half.try_reserve(index - half.len() + 1)
                .map_err(|_| MachineError::TapeExhausted { head: position })?;
            half.resize(index + 1, blank);
        }

        Ok(&mut half[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BLANK_SYMBOL;
    use proptest::prelude::*;

    fn tape(content: &str) -> Tape {
        Tape::new(&content.chars().collect::<Vec<_>>(), BLANK_SYMBOL)
    }

    #[test]
    fn test_physical_index_mapping() {
        assert_eq!(physical_index(0), 0);
        assert_eq!(physical_index(5), 5);
        assert_eq!(physical_index(-1), 0);
        assert_eq!(physical_index(-4), 3);
    }

    #[test]
    fn test_read_within_initial_content() {
        let mut tape = tape("abc");

        assert_eq!(tape.read(0).unwrap(), 'a');
        assert_eq!(tape.read(2).unwrap(), 'c');
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_read_past_end_grows_forward_half() {
        let mut tape = tape("ab");

        assert_eq!(tape.read(5).unwrap(), BLANK_SYMBOL);
        assert_eq!(tape.forward(), &['a', 'b', '-', '-', '-', '-']);
        assert!(tape.backward().is_empty());
    }

    #[test]
    fn test_read_negative_grows_backward_half() {
        let mut tape = tape("ab");

        assert_eq!(tape.read(-3).unwrap(), BLANK_SYMBOL);
        assert_eq!(tape.backward(), &['-', '-', '-']);
        assert_eq!(tape.forward(), &['a', 'b']);
    }

    #[test]
    fn test_write_and_render_both_halves() {
        let mut tape = tape("12");
        tape.write(-1, Write::Symbol('x')).unwrap();
        tape.write(-2, Write::Symbol('y')).unwrap();
        tape.write(3, Write::Symbol('z')).unwrap();

        assert_eq!(tape.render(false), "yx12-z");
        assert_eq!(tape.get(-2), 'y');
        assert_eq!(tape.get(2), '-');
    }

    #[test]
    fn test_write_keep_is_noop() {
        let mut tape = tape("abc");
        tape.write(1, Write::Keep).unwrap();

        assert_eq!(tape.render(false), "abc");
    }

    #[test]
    fn test_render_trims_only_outer_blanks() {
        let mut tape = tape("--1-1--");
        tape.read(-2).unwrap();

        assert_eq!(tape.render(false), "----1-1--");
        assert_eq!(tape.render(true), "1-1");
    }

    #[test]
    fn test_render_all_blank_tape() {
        let mut tape = tape("");
        tape.read(-2).unwrap();
        tape.read(2).unwrap();

        assert_eq!(tape.render(false), "-----");
        assert_eq!(tape.render(true), "");
    }

    #[test]
    fn test_unreachable_positions_fail_cleanly() {
        let mut tape = tape("1");

        assert_eq!(
            tape.read(i64::MAX),
            Err(MachineError::TapeExhausted { head: i64::MAX })
        );
        assert_eq!(
            tape.write(i64::MIN, Write::Symbol('x')),
            Err(MachineError::TapeExhausted { head: i64::MIN })
        );
        assert_eq!(tape.render(false), "1");
    }

    #[test]
    fn test_get_does_not_grow() {
        let tape = tape("a");

        assert_eq!(tape.get(10), BLANK_SYMBOL);
        assert_eq!(tape.get(-10), BLANK_SYMBOL);
        assert_eq!(tape.len(), 1);
    }

    proptest! {
        #[test]
        fn physical_index_is_injective(a in -10_000i64..10_000, b in -10_000i64..10_000) {
            prop_assume!(a != b);
            // Positions on the same side of zero must never share a cell.
            if (a < 0) == (b < 0) {
                prop_assert_ne!(physical_index(a), physical_index(b));
            }
        }

        #[test]
        fn read_always_materializes_the_cell(position in -500i64..500) {
            let mut tape = tape("101");
            let symbol = tape.read(position).unwrap();
            prop_assert_eq!(symbol, tape.get(position));

            let side = if position < 0 { tape.backward().len() } else { tape.forward().len() };
            prop_assert!(side >= physical_index(position) + 1);
        }

        #[test]
        fn tape_never_shrinks(positions in proptest::collection::vec(-200i64..200, 1..40)) {
            let mut tape = tape("");
            let mut previous = tape.render(false).len();

            for position in positions {
                tape.read(position).unwrap();
                tape.write(position, Write::Symbol('1')).unwrap();
                let current = tape.render(false).len();
                prop_assert!(current >= previous);
                previous = current;
            }
        }
    }
}
