//! Window selection over raw price lines.
//!
//! The sampler validates every non-blank line before it picks a window, so a
//! single malformed record rejects the batch even when it lies outside the
//! chosen slice.

use rand::Rng;
use tracing::debug;

use crate::error::{OutlierError, Result};
use crate::types::{RawRecord, Window};

/// Number of consecutive prices in a window.
pub const DEFAULT_WINDOW_SIZE: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampler {
    window_size: usize,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl Sampler {
    /// Creates a sampler producing windows of `window_size` prices.
    ///
    /// A zero size is clamped to one.
    #[must_use]
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
        }
    }

    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Parses `lines` and returns a random contiguous window.
    ///
    /// # Errors
    ///
    /// Returns [`OutlierError::Format`] if any non-blank line is malformed and
    /// [`OutlierError::InsufficientData`] if fewer than `window_size` records
    /// remain after blank lines are dropped.
    pub fn sample<S, R>(&self, lines: &[S], rng: &mut R) -> Result<Window>
    where
        S: AsRef<str>,
        R: Rng,
    {
        let records = parse_records(lines)?;

        if records.len() < self.window_size {
            return Err(OutlierError::InsufficientData {
                required: self.window_size,
                available: records.len(),
            });
        }

        let start = rng.gen_range(0..=records.len() - self.window_size);
        debug!(
            start,
            available = records.len(),
            window_size = self.window_size,
            "selected sample window"
        );

        let slice = &records[start..start + self.window_size];
        Ok(Window {
            prices: slice.iter().map(|r| r.price).collect(),
            first_date: slice[0].date,
        })
    }
}

/// Parses every non-blank line, failing on the first malformed one.
///
/// # Errors
///
/// Returns [`OutlierError::Format`] naming the 1-based line number.
pub fn parse_records<S: AsRef<str>>(lines: &[S]) -> Result<Vec<RawRecord>> {
    let mut records = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line: &str = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        let record = line.parse::<RawRecord>().map_err(|err| match err {
            OutlierError::Format(reason) => {
                OutlierError::Format(format!("line {}: {reason}", idx + 1))
            }
            other => other,
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn make_lines(count: usize) -> Vec<String> {
        let start = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        (0..count)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i as u64)).unwrap();
                format!("FLTR,{},{}.5", date.format("%d-%m-%Y"), 100 + i)
            })
            .collect()
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn exact_window_is_returned_unchanged() {
        let lines = make_lines(30);
        let window = Sampler::default().sample(&lines, &mut rng()).unwrap();

        assert_eq!(window.len(), 30);
        assert_eq!(window.prices[0], 100.5);
        assert_eq!(window.prices[29], 129.5);
        assert_eq!(window.first_date, NaiveDate::from_ymd_opt(2023, 9, 1).unwrap());
    }

    #[test]
    fn short_input_is_insufficient() {
        let lines = make_lines(29);
        let err = Sampler::default().sample(&lines, &mut rng()).unwrap_err();
        assert_eq!(
            err,
            OutlierError::InsufficientData {
                required: 30,
                available: 29
            }
        );
    }

    #[test]
    fn blank_lines_do_not_count() {
        let mut lines = make_lines(29);
        lines.insert(5, String::new());
        lines.push("   ".to_string());
        lines.push(String::new());

        let err = Sampler::default().sample(&lines, &mut rng()).unwrap_err();
        assert!(matches!(err, OutlierError::InsufficientData { available: 29, .. }));
    }

    #[test]
    fn blank_lines_are_skipped_inside_a_window() {
        let mut lines = make_lines(30);
        lines.insert(10, String::new());
        let window = Sampler::default().sample(&lines, &mut rng()).unwrap();
        assert_eq!(window.len(), 30);
        assert_eq!(window.prices[10], 110.5);
    }

    #[test]
    fn malformed_line_rejects_whole_batch() {
        let mut lines = make_lines(100);
        lines[87] = "FLTR,not-a-date,1.0".to_string();

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let err = Sampler::default().sample(&lines, &mut rng).unwrap_err();
            match err {
                OutlierError::Format(msg) => assert!(msg.contains("line 88"), "message was {msg}"),
                other => panic!("expected format error, got {other:?}"),
            }
        }
    }

    #[test]
    fn format_error_wins_over_insufficient_data() {
        let lines = vec!["FLTR,01-01-2023".to_string()];
        let err = Sampler::default().sample(&lines, &mut rng()).unwrap_err();
        assert!(matches!(err, OutlierError::Format(_)));
    }

    #[test]
    fn window_is_contiguous_slice_of_source() {
        let lines = make_lines(75);
        let sampler = Sampler::default();

        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let window = sampler.sample(&lines, &mut rng).unwrap();
            let offset = (window.prices[0] - 100.5) as usize;

            assert!(offset <= 75 - 30);
            for (i, price) in window.prices.iter().enumerate() {
                assert_eq!(*price, 100.5 + (offset + i) as f64);
            }
            let expected_first = NaiveDate::from_ymd_opt(2023, 9, 1)
                .unwrap()
                .checked_add_days(Days::new(offset as u64))
                .unwrap();
            assert_eq!(window.first_date, expected_first);
        }
    }

    #[test]
    fn every_start_offset_is_reachable() {
        let lines = make_lines(33);
        let sampler = Sampler::default();
        let mut seen = [false; 4];
        let mut rng = rng();

        for _ in 0..400 {
            let window = sampler.sample(&lines, &mut rng).unwrap();
            seen[(window.prices[0] - 100.5) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "offsets seen: {seen:?}");
    }

    #[test]
    fn same_seed_gives_same_window() {
        let lines = make_lines(200);
        let sampler = Sampler::default();
        let a = sampler
            .sample(&lines, &mut ChaCha8Rng::seed_from_u64(7))
            .unwrap();
        let b = sampler
            .sample(&lines, &mut ChaCha8Rng::seed_from_u64(7))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn custom_window_size() {
        let lines = make_lines(10);
        let window = Sampler::new(10).sample(&lines, &mut rng()).unwrap();
        assert_eq!(window.len(), 10);
        assert_eq!(Sampler::new(0).window_size(), 1);
    }
}
