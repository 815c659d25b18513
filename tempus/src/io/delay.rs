//! Out-of-order replay of update streams.
//!
//! [`DelayShuffler`] holds back a share of the lines it is fed for a random number of steps,
//! turning an ordered stream into one where some records arrive late. Every line fed in comes
//! out exactly once.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    io::{BufRead, Write},
    mem,
};
use tracing::debug;

use crate::errors::GraphError;

#[derive(Debug, Clone)]
pub struct DelayShuffler<R = StdRng> {
    delay_percent: u32,
    max_delay: usize,
    rng: R,
    pending: Vec<(String, usize)>,
}

impl DelayShuffler<StdRng> {
    pub fn new(delay_percent: u32, max_delay: usize) -> Self {
        Self::with_rng(delay_percent, max_delay, StdRng::from_entropy())
    }

    /// A shuffler that produces the same output for the same seed and input
    pub fn seeded(delay_percent: u32, max_delay: usize, seed: u64) -> Self {
        Self::with_rng(delay_percent, max_delay, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DelayShuffler<R> {
    /// `delay_percent` of the lines (capped at 100) are held back for `2..=max_delay` steps.
    /// With `max_delay` below 2 no line is delayed.
    pub fn with_rng(delay_percent: u32, max_delay: usize, rng: R) -> Self {
        Self {
            delay_percent: delay_percent.min(100),
            max_delay,
            rng,
            pending: vec![],
        }
    }

    /// Number of lines held back
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Feed one line and return the lines released by this step, oldest first.
    pub fn push(&mut self, line: String) -> Vec<String> {
        let delay = if self.max_delay >= 2 && self.rng.gen_range(0..100) < self.delay_percent {
            self.rng.gen_range(2..=self.max_delay)
        } else {
            1
        };
        self.pending.push((line, delay));
        self.tick()
    }

    /// Release everything still held back, in the order it would have come out.
    pub fn finish(&mut self) -> Vec<String> {
        let mut released = vec![];
        while !self.pending.is_empty() {
            released.extend(self.tick());
        }
        released
    }

    fn tick(&mut self) -> Vec<String> {
        let mut released = vec![];
        self.pending.retain_mut(|(line, delay)| {
            *delay -= 1;
            if *delay == 0 {
                released.push(mem::take(line));
                false
            } else {
                true
            }
        });
        released
    }

    /// Shuffle every line of `reader` into `writer`. Returns the number of lines written.
    pub fn shuffle<B: BufRead, W: Write>(&mut self, reader: B, mut writer: W) -> Result<usize, GraphError> {
        let mut written = 0;
        for line in reader.lines() {
            for out in self.push(line?) {
                writeln!(writer, "{out}")?;
                written += 1;
            }
        }
        for out in self.finish() {
            writeln!(writer, "{out}")?;
            written += 1;
        }
        writer.flush()?;
        debug!(written, "shuffled update stream");
        Ok(written)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("add {i} {} {i}", i + 1)).collect()
    }

    fn run(shuffler: &mut DelayShuffler, input: &[String]) -> Vec<String> {
        let mut out = vec![];
        for line in input {
            out.extend(shuffler.push(line.clone()));
        }
        out.extend(shuffler.finish());
        out
    }

    #[test]
    fn no_delay_keeps_order() {
        let input = lines(50);
        assert_eq!(run(&mut DelayShuffler::seeded(0, 40, 1), &input), input);
        assert_eq!(run(&mut DelayShuffler::seeded(100, 1, 1), &input), input);
    }

    #[test]
    fn full_delay_reorders() {
        let input = lines(200);
        let output = run(&mut DelayShuffler::seeded(100, 10, 7), &input);
        assert_ne!(output, input);
        let mut sorted = output.clone();
        sorted.sort();
        let mut expected = input.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn seeded_is_reproducible() {
        let input = lines(100);
        let a = run(&mut DelayShuffler::seeded(40, 40, 42), &input);
        let b = run(&mut DelayShuffler::seeded(40, 40, 42), &input);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_stream() {
        let input = lines(30).join("\n");
        let mut out = vec![];
        let written = DelayShuffler::seeded(40, 5, 3)
            .shuffle(Cursor::new(input), &mut out)
            .unwrap();
        assert_eq!(written, 30);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 30);
    }

    proptest! {
        #[test]
        fn lines_are_delayed_by_at_most_max_delay(n in 0usize..100, pct in 0u32..=100, max_delay in 0usize..20, seed: u64) {
            let input = lines(n);
            let mut shuffler = DelayShuffler::seeded(pct, max_delay, seed);
            let mut released_at = vec![];
            for (step, line) in input.iter().enumerate() {
                for out in shuffler.push(line.clone()) {
                    released_at.push((out, step));
                }
            }
            prop_assert!(shuffler.pending() <= max_delay);
            let drained = shuffler.finish();
            prop_assert_eq!(released_at.len() + drained.len(), n);
            for (line, step) in released_at {
                let fed = input.iter().position(|l| *l == line).unwrap();
                prop_assert!(step >= fed);
                prop_assert!(step - fed < max_delay.max(1));
            }
        }
    }
}
