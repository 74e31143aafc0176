use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::table::HashTable;
use crate::io::{build_output_path, read_file};

/// Initial cell count of a model's hash table.
///
/// The table doubles on demand, so this only seeds the first allocation.
const HASH_CELLS: usize = 57;

/// A k-order Markov model over the characters of a training text.
///
/// Construction counts every length-k and length-(k+1) window of the
/// circularly extended text in a single hash table; counting wraps past
/// the end of the text so every position contributes exactly one window
/// of each length. The model is read-only afterwards: queries never
/// mutate it.
///
/// # Invariants
/// - `order < ` number of characters of the training text
/// - Every stored count is >= 1 (the table default of 0 means "never seen")
/// - `alphabet_size` >= 1
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Markov {
	/// The order k of the model.
	order: usize,
	/// Counts for all observed k-grams and (k+1)-grams.
	table: HashTable<usize>,
	/// Number of distinct characters in the training text.
	alphabet_size: usize,
}

impl Markov {
	/// Builds a k-order Markov model from the statistics of `text`.
	///
	/// # Errors
	/// Returns an error if `order` is not smaller than the character
	/// count of `text` (which also rejects empty text), since the
	/// circular extension is ill-defined in that case.
	pub fn new(order: usize, text: &str) -> Result<Self, String> {
		let chars: Vec<char> = text.chars().collect();
		if order >= chars.len() {
			return Err(format!(
				"order must be smaller than the text length, got order {} for {} characters",
				order,
				chars.len()
			));
		}

		// HashTable::new only fails on zero cells
		let mut table = HashTable::new(HASH_CELLS, 0)?;
		let ext_k = Self::extend(&chars, order);
		let ext_k1 = Self::extend(&chars, order + 1);

		for r in 0..chars.len() {
			let gram_k: String = ext_k[r..r + order].iter().collect();
			let count = table.lookup(&gram_k);
			table.update(&gram_k, count + 1);

			let gram_k1: String = ext_k1[r..r + order + 1].iter().collect();
			let count = table.lookup(&gram_k1);
			table.update(&gram_k1, count + 1);
		}

		let alphabet: HashSet<char> = chars.iter().copied().collect();

		Ok(Self { order, table, alphabet_size: alphabet.len() })
	}

	/// Builds a model from a text file, caching the trained model next to
	/// it as `<stem>.k<order>.bin` (postcard-encoded). A later call with
	/// the same file and order deserializes the cache instead of
	/// retraining. The order is part of the cache name, so models of
	/// different orders never collide.
	pub fn from_file<P: AsRef<Path>>(
		filepath: P,
		order: usize,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let cache_path = build_output_path(&filepath, &format!("k{order}.bin"))?;
		if cache_path.exists() {
			let bytes = std::fs::read(cache_path)?;
			return Ok(postcard::from_bytes(&bytes)?);
		}

		let text = read_file(&filepath)?;
		let model = Self::new(order, &text)?;

		let bytes = postcard::to_stdvec(&model)?;
		std::fs::write(cache_path, bytes)?;

		Ok(model)
	}

	/// Returns the order k of the model.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns the number of distinct characters of the training text.
	pub fn alphabet_size(&self) -> usize {
		self.alphabet_size
	}

	/// Gets the log probability of `query` under this model, summed with
	/// add-one (Laplace) smoothing over every position of the circularly
	/// extended query.
	///
	/// For each position, with N the training count of the k-gram, M the
	/// training count of the (k+1)-gram and S the alphabet size, the
	/// contribution is `ln((M + 1) / (N + S))`. The smoothing terms keep
	/// the argument strictly positive even for grams never seen during
	/// training.
	///
	/// # Notes
	/// - The result is *not* normalized by the query length; comparison
	///   across texts of different lengths is the caller's concern.
	/// - Queries shorter than k clamp their windows to the extended
	///   length, mirroring the counting done at training time.
	pub fn log_probability(&self, query: &str) -> f64 {
		let chars: Vec<char> = query.chars().collect();
		let ext_k = Self::extend(&chars, self.order);
		let ext_k1 = Self::extend(&chars, self.order + 1);

		let mut prob = 0.0;
		let s = self.alphabet_size as f64;

		for r in 0..chars.len() {
			let gram_k: String = ext_k[r..(r + self.order).min(ext_k.len())].iter().collect();
			let gram_k1: String = ext_k1[r..(r + self.order + 1).min(ext_k1.len())].iter().collect();

			let n = self.table.lookup(&gram_k) as f64;
			let m = self.table.lookup(&gram_k1) as f64;

			prob += ((m + 1.0) / (n + s)).ln();
		}

		prob
	}

	/// Circularly extends `chars` by its own first `n` characters, so
	/// that windows starting near the end wrap around to the beginning.
	fn extend(chars: &[char], n: usize) -> Vec<char> {
		let mut ext = chars.to_vec();
		ext.extend_from_slice(&chars[..n.min(chars.len())]);
		ext
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPSILON: f64 = 1e-12;

	#[test]
	fn rejects_order_not_smaller_than_text() {
		assert!(Markov::new(3, "abc").is_err());
		assert!(Markov::new(4, "abc").is_err());
		assert!(Markov::new(0, "").is_err());
		assert!(Markov::new(2, "abc").is_ok());
	}

	#[test]
	fn circular_counting_wraps_past_the_end() {
		let model = Markov::new(1, "aaab").unwrap();
		assert_eq!(model.table.lookup("a"), 3);
		assert_eq!(model.table.lookup("b"), 1);
		assert_eq!(model.table.lookup("aa"), 2);
		assert_eq!(model.table.lookup("ab"), 1);
		// The wrap window bridges the final 'b' back to the leading 'a'
		assert_eq!(model.table.lookup("ba"), 1);
		assert_eq!(model.table.lookup("bb"), 0);
	}

	#[test]
	fn alphabet_size_counts_distinct_characters() {
		assert_eq!(Markov::new(1, "aaab").unwrap().alphabet_size(), 2);
		assert_eq!(Markov::new(2, "abcabc").unwrap().alphabet_size(), 3);
	}

	#[test]
	fn log_probability_matches_hand_computation() {
		// Model of "aaab", order 1: counts a=3, b=1, aa=2, ab=1, ba=1, S=2.
		let model = Markov::new(1, "aaab").unwrap();

		// Query "aa" extends to "aaa"/"aaaa": two positions, each
		// contributing ln((2+1)/(3+2)).
		let expected = 2.0 * (3.0f64 / 5.0).ln();
		assert!((model.log_probability("aa") - expected).abs() < EPSILON);
	}

	#[test]
	fn unseen_grams_stay_finite() {
		let model = Markov::new(1, "aaab").unwrap();
		// No 'z' anywhere in training; smoothing must keep every term finite
		let prob = model.log_probability("zzzz");
		assert!(prob.is_finite());
		let expected = 4.0 * (1.0f64 / 2.0).ln();
		assert!((prob - expected).abs() < EPSILON);
	}

	#[test]
	fn queries_do_not_mutate_the_model() {
		let model = Markov::new(1, "aaab").unwrap();
		let first = model.log_probability("abab");
		let second = model.log_probability("abab");
		assert!((first - second).abs() < EPSILON);
		assert_eq!(model.table.lookup("a"), 3);
	}
}
