//! Typing animation state machine.
//!
//! The simulator only decides how far to reveal and how long to wait; the
//! browser layer owns the timer and the DOM. Every step is computed from the
//! code snapshot taken when the simulator was created.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::entities::entity_at;

/// Lifecycle of one typing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypingState {
    #[default]
    Idle,
    Typing,
    Done,
}

/// One reveal: show `code[..end]` after waiting `delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingStep {
    /// Byte index into the code, always on a char boundary.
    pub end: usize,
    pub delay_ms: u32,
}

const SPACE_AFTER_SPACE_MS: RangeInclusive<f64> = 50.0..=250.0;
const WORD_AFTER_SPACE_MS: RangeInclusive<f64> = 300.0..=750.0;
const AFTER_WORD_MS: RangeInclusive<f64> = 25.0..=300.0;

/// Delay window for revealing `current` right after `prev`.
pub fn delay_window(prev: char, current: char) -> RangeInclusive<f64> {
    match (prev.is_whitespace(), current.is_whitespace()) {
        (true, true) => SPACE_AFTER_SPACE_MS,
        (true, false) => WORD_AFTER_SPACE_MS,
        (false, _) => AFTER_WORD_MS,
    }
}

#[derive(Debug, Clone)]
pub struct TypingSimulator {
    code: String,
    speed: f64,
    tab_size: usize,
    position: usize,
    prev: char,
    state: TypingState,
}

impl TypingSimulator {
    /// `speed` multiplies every delay; lower is faster.
    pub fn new(code: impl Into<String>, speed: f64, tab_size: usize) -> Self {
        Self {
            code: code.into(),
            speed: if speed.is_finite() { speed.max(0.0) } else { 1.0 },
            tab_size: tab_size.max(1),
            position: 0,
            prev: ' ',
            state: TypingState::Idle,
        }
    }

    pub fn state(&self) -> TypingState {
        self.state
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Text revealed so far.
    pub fn partial(&self) -> &str {
        &self.code[..self.position]
    }

    /// Begin the sequence. Returns `false` if it was already started.
    pub fn start(&mut self) -> bool {
        if self.state != TypingState::Idle {
            return false;
        }
        self.state = TypingState::Typing;
        true
    }

    /// Byte length of the next atomic unit at the current position.
    fn unit_len(&self) -> usize {
        let rest = &self.code[self.position..];
        let line_start = self.code[..self.position]
            .rfind('\n')
            .map_or(0, |newline| newline + 1);
        let in_indentation = self.code[line_start..self.position]
            .bytes()
            .all(|b| b == b' ');

        if in_indentation && rest.len() >= self.tab_size {
            let indent = &rest.as_bytes()[..self.tab_size];
            if indent.iter().all(|b| *b == b' ') {
                return self.tab_size;
            }
        }
        if let Some((len, _)) = entity_at(rest) {
            return len;
        }
        rest.chars().next().map_or(0, char::len_utf8)
    }

    /// Advance by one unit. Returns `None` once everything is revealed, at
    /// which point the state is `Done`.
    pub fn next_step<R: Rng>(&mut self, rng: &mut R) -> Option<TypingStep> {
        if self.state != TypingState::Typing {
            return None;
        }
        if self.position >= self.code.len() {
            self.state = TypingState::Done;
            return None;
        }

        let current = self.code[self.position..].chars().next()?;
        let delay_ms = if self.position == 0 {
            0
        } else {
            let drawn = rng.random_range(delay_window(self.prev, current));
            (drawn * self.speed).round() as u32
        };

        let end = self.position + self.unit_len();
        self.prev = self.code[self.position..end]
            .chars()
            .last()
            .unwrap_or(current);
        self.position = end;

        Some(TypingStep { end, delay_ms })
    }

    /// Skip to the end of the sequence.
    pub fn finish(&mut self) {
        self.position = self.code.len();
        self.state = TypingState::Done;
    }

    /// Partial code padded with blank rows so the block starts at
    /// `min_lines` rows (never more than the full code has) instead of
    /// growing one row at a time.
    pub fn padded_partial(&self, min_lines: usize) -> String {
        let partial = self.partial();
        let partial_lines = partial.split('\n').count();
        let total_lines = self.code.split('\n').count();
        let padding = min_lines
            .saturating_sub(partial_lines)
            .min(total_lines.saturating_sub(partial_lines));

        let mut padded = String::with_capacity(partial.len() + padding * 2);
        padded.push_str(partial);
        for _ in 0..padding {
            padded.push_str("\n ");
        }
        padded
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn run(sim: &mut TypingSimulator, seed: u64) -> Vec<TypingStep> {
        let mut rng = SmallRng::seed_from_u64(seed);
        sim.start();
        std::iter::from_fn(|| sim.next_step(&mut rng)).collect()
    }

    #[test]
    fn test_state_transitions() {
        let mut sim = TypingSimulator::new("ab", 1.0, 2);
        assert_eq!(sim.state(), TypingState::Idle);
        assert!(sim.start());
        assert_eq!(sim.state(), TypingState::Typing);
        assert!(!sim.start());
        let steps = run(&mut sim, 1);
        assert_eq!(steps.len(), 2);
        assert_eq!(sim.state(), TypingState::Done);
        assert_eq!(sim.partial(), "ab");
        assert!(!sim.start());
    }

    #[test]
    fn test_not_started_yields_nothing() {
        let mut sim = TypingSimulator::new("abc", 1.0, 2);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(sim.next_step(&mut rng), None);
        assert_eq!(sim.state(), TypingState::Idle);
    }

    #[test]
    fn test_first_step_immediate() {
        let mut sim = TypingSimulator::new("hello world", 1.0, 2);
        let steps = run(&mut sim, 3);
        assert_eq!(steps[0].delay_ms, 0);
        assert!(steps[1..].iter().all(|s| s.delay_ms >= 25));
    }

    #[test]
    fn test_terminates_within_char_count() {
        let code = "fn main() {\n    println!(\"&lt;hi&gt;\");\n}\n";
        for seed in 0..8 {
            let mut sim = TypingSimulator::new(code, 1.0, 4);
            let steps = run(&mut sim, seed);
            assert!(steps.len() <= code.chars().count());
            assert_eq!(steps.last().map(|s| s.end), Some(code.len()));
            assert!(steps.windows(2).all(|w| w[0].end < w[1].end));
        }
    }

    #[test]
    fn test_indentation_and_entities_atomic() {
        let mut sim = TypingSimulator::new("a\n    b &amp; c", 1.0, 2);
        let ends: Vec<usize> = run(&mut sim, 5).iter().map(|s| s.end).collect();
        // a, \n, two indentation units, b, space, &amp;, space, c
        assert_eq!(ends, vec![1, 2, 4, 6, 7, 8, 13, 14, 15]);
    }

    #[test]
    fn test_multibyte_chars() {
        let mut sim = TypingSimulator::new("é→x", 1.0, 2);
        let ends: Vec<usize> = run(&mut sim, 2).iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![2, 5, 6]);
    }

    #[test]
    fn test_delay_windows() {
        assert_eq!(delay_window(' ', '\n'), 50.0..=250.0);
        assert_eq!(delay_window('\n', 'x'), 300.0..=750.0);
        assert_eq!(delay_window('x', ' '), 25.0..=300.0);
        assert_eq!(delay_window('x', 'y'), 25.0..=300.0);
    }

    #[test]
    fn test_delays_scaled_by_speed() {
        let mut sim = TypingSimulator::new("a b c d e", 0.5, 2);
        for step in run(&mut sim, 11).iter().skip(1) {
            assert!(step.delay_ms <= 375, "{step:?}");
        }

        let mut instant = TypingSimulator::new("a b c", 0.0, 2);
        assert!(run(&mut instant, 11).iter().all(|s| s.delay_ms == 0));
    }

    #[test]
    fn test_empty_code_finishes_immediately() {
        let mut sim = TypingSimulator::new("", 1.0, 2);
        assert!(run(&mut sim, 0).is_empty());
        assert_eq!(sim.state(), TypingState::Done);
    }

    #[test]
    fn test_padded_partial() {
        let mut sim = TypingSimulator::new("a\nb\nc\nd\ne\nf", 1.0, 2);
        sim.start();
        let mut rng = SmallRng::seed_from_u64(0);
        sim.next_step(&mut rng);
        assert_eq!(sim.partial(), "a");
        assert_eq!(sim.padded_partial(4), "a\n \n \n ");

        sim.finish();
        assert_eq!(sim.padded_partial(4), "a\nb\nc\nd\ne\nf");
    }

    #[test]
    fn test_padding_capped_by_code_length() {
        let mut sim = TypingSimulator::new("a\nb", 1.0, 2);
        sim.start();
        let mut rng = SmallRng::seed_from_u64(0);
        sim.next_step(&mut rng);
        assert_eq!(sim.padded_partial(4), "a\n ");
    }
}
