use std::fmt;

use serde::{Deserialize, Serialize};

use super::markov::Markov;

/// Outcome of comparing an unknown text against two reference speakers.
///
/// `Either` reports the tie case where both normalized likelihoods are
/// numerically equal, as happens with identical reference texts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
	A,
	B,
	Either,
}

impl fmt::Display for Verdict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Verdict::A => write!(f, "A"),
			Verdict::B => write!(f, "B"),
			Verdict::Either => write!(f, "A or B"),
		}
	}
}

/// Result of an attribution run: the normalized log-likelihood of the
/// unknown text under each reference model, and the verdict.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Attribution {
	pub score_a: f64,
	pub score_b: f64,
	pub verdict: Verdict,
}

/// Scores `unknown` under two already-built reference models.
///
/// Each score is the summed log-probability divided by the character
/// count of `unknown`, so texts of different lengths compare on equal
/// footing. The strictly greater score wins; exact equality is reported
/// as `Verdict::Either`. Neither model is mutated.
///
/// # Errors
/// Returns an error if `unknown` is empty (normalization would divide
/// by zero).
pub fn attribute(
	model_a: &Markov,
	model_b: &Markov,
	unknown: &str,
) -> Result<Attribution, String> {
	let len = unknown.chars().count();
	if len == 0 {
		return Err("unknown text must not be empty".to_owned());
	}

	let score_a = model_a.log_probability(unknown) / len as f64;
	let score_b = model_b.log_probability(unknown) / len as f64;

	let verdict = if score_a > score_b {
		Verdict::A
	} else if score_b > score_a {
		Verdict::B
	} else {
		Verdict::Either
	};

	Ok(Attribution { score_a, score_b, verdict })
}

/// Given sample text from two speakers and text from an unidentified
/// speaker, builds a k-order Markov model per speaker and returns the
/// normalized log-likelihood of the unknown text under each, together
/// with a verdict. Deterministic for identical inputs.
///
/// # Errors
/// Returns an error if either model construction rejects its input
/// (order too large for the text) or if the unknown text is empty.
pub fn identify_speaker(
	text_a: &str,
	text_b: &str,
	unknown: &str,
	order: usize,
) -> Result<Attribution, String> {
	let model_a = Markov::new(order, text_a)?;
	let model_b = Markov::new(order, text_b)?;
	attribute(&model_a, &model_b, unknown)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn attributes_to_the_closer_speaker() {
		// Speaker A's sample is a-heavy, speaker B's is b-heavy; an
		// all-a unknown must land on A, an all-b unknown on B.
		let res = identify_speaker("aaab", "bbba", "aaaa", 1).unwrap();
		assert_eq!(res.verdict, Verdict::A);
		assert!(res.score_a > res.score_b);

		let res = identify_speaker("aaab", "bbba", "bbbb", 1).unwrap();
		assert_eq!(res.verdict, Verdict::B);
		assert!(res.score_b > res.score_a);
	}

	#[test]
	fn identical_references_tie() {
		let text = "the quick brown fox jumps over the lazy dog";
		let res = identify_speaker(text, text, "the lazy fox", 2).unwrap();
		assert_eq!(res.verdict, Verdict::Either);
		assert_eq!(res.score_a, res.score_b);
	}

	#[test]
	fn scores_are_normalized_by_query_length() {
		// Model of "aaab", order 1: query "aa" sums 2 * ln(3/5), so the
		// normalized score is ln(3/5) regardless of the repetition count.
		let model = Markov::new(1, "aaab").unwrap();
		let other = Markov::new(1, "bbba").unwrap();
		let short = attribute(&model, &other, "aa").unwrap();
		let long = attribute(&model, &other, "aaaa").unwrap();
		assert!((short.score_a - long.score_a).abs() < 1e-12);
		assert!((short.score_a - (3.0f64 / 5.0).ln()).abs() < 1e-12);
	}

	#[test]
	fn rejects_empty_unknown_text() {
		let model = Markov::new(1, "aaab").unwrap();
		assert!(attribute(&model, &model, "").is_err());
	}

	#[test]
	fn rejects_oversized_order_through_the_entry_point() {
		assert!(identify_speaker("ab", "cd", "abcd", 5).is_err());
	}
}
