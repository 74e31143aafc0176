use serde::{Deserialize, Serialize};

/// Grow once an insertion would leave the load factor at or above this.
const TOO_FULL: f64 = 0.5;
/// Cell count multiplier applied on each rehash.
const GROWTH_RATIO: usize = 2;

/// A single cell of the backing array.
///
/// Absence is tracked structurally rather than by comparing stored values
/// against the table default, so a legitimately stored value equal to the
/// default never corrupts probing or rehashing.
#[derive(Serialize, Deserialize, Clone, Debug)]
enum Slot<V> {
	Empty,
	Occupied { key: String, value: V },
}

/// An open-addressing hash table from string keys to values of type `V`.
///
/// Collisions are resolved by linear probing; the table doubles its cell
/// count whenever an insertion would push the load factor to 0.5 or above,
/// so probing always terminates at an empty cell.
///
/// # Responsibilities
/// - Store and retrieve (key, value) pairs with expected O(1) access
/// - Yield a caller-chosen default value for keys never inserted
/// - Grow transparently, preserving every stored pair across rehashes
///
/// # Invariants
/// - After any `update` returns, `len() / cells() < 0.5`
/// - Every stored key is reachable from its home cell by linear probing
///   without crossing an empty cell
/// - Keys are unique; the most recent `update` for a key wins
///
/// # Notes
/// The `lookup` return convention cannot distinguish "absent" from
/// "present with a value equal to the default". Callers that store the
/// default as a real value must track presence themselves; the Markov
/// model avoids the issue entirely by only ever storing counts >= 1
/// against a default of 0.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HashTable<V> {
	/// Value yielded for keys that were never inserted.
	default: V,
	/// Number of cells currently allocated.
	cells: usize,
	/// Backing array, one `Slot` per cell.
	data: Vec<Slot<V>>,
	/// Number of occupied cells.
	occupied: usize,
}

impl<V: Clone> HashTable<V> {
	/// Creates a table with `cells` cells, all empty, yielding `default`
	/// upon lookup of a key that has not previously been inserted.
	///
	/// # Errors
	/// Returns an error if `cells` is zero.
	pub fn new(cells: usize, default: V) -> Result<Self, String> {
		if cells == 0 {
			return Err("cells must be positive".to_owned());
		}
		Ok(Self {
			default,
			cells,
			data: vec![Slot::Empty; cells],
			occupied: 0,
		})
	}

	/// Retrieves the value associated with `key`, or a clone of the
	/// default value if the key has not previously been inserted.
	pub fn lookup(&self, key: &str) -> V {
		match &self.data[self.find_slot(key)] {
			Slot::Occupied { value, .. } => value.clone(),
			Slot::Empty => self.default.clone(),
		}
	}

	/// Changes the value associated with `key` to `value`, inserting the
	/// key if it is not currently present.
	///
	/// For a brand-new key the table grows *before* the cell is chosen,
	/// whenever placing the key would leave the load factor at or above
	/// 0.5. Growing first keeps the post-call invariant strict and means
	/// the new key is hashed against the final cell count.
	pub fn update(&mut self, key: &str, value: V) {
		let index = self.find_slot(key);
		if let Slot::Occupied { value: stored, .. } = &mut self.data[index] {
			*stored = value;
			return;
		}

		// One doubling is not always enough at tiny cell counts (1 -> 2
		// still holds a single key at exactly 0.5), so grow until the
		// insertion fits below the threshold.
		while (self.occupied + 1) as f64 / self.cells as f64 >= TOO_FULL {
			self.rehash();
		}

		// Re-probe: the rehash (if any) moved every home cell.
		let index = self.find_slot(key);
		self.data[index] = Slot::Occupied { key: key.to_owned(), value };
		self.occupied += 1;
	}

	/// Returns the number of keys currently stored.
	pub fn len(&self) -> usize {
		self.occupied
	}

	/// Returns `true` if no key has been inserted yet.
	pub fn is_empty(&self) -> bool {
		self.occupied == 0
	}

	/// Returns the number of cells currently allocated.
	pub fn cells(&self) -> usize {
		self.cells
	}

	/// Probes linearly from the key's home cell, wrapping at the cell
	/// count, and returns the index of either the cell holding `key` or
	/// the first empty cell on the probe path.
	///
	/// Terminates because the load factor is kept strictly below 1.
	fn find_slot(&self, key: &str) -> usize {
		let mut index = self.create_hash(key);
		loop {
			match &self.data[index] {
				Slot::Empty => return index,
				Slot::Occupied { key: stored, .. } if stored == key => return index,
				Slot::Occupied { .. } => index = (index + 1) % self.cells,
			}
		}
	}

	/// Hashes a string key to its home cell: the sum of the character
	/// code points, multiplied by 37, reduced modulo the current cell
	/// count. Deterministic for a given key and cell count.
	fn create_hash(&self, key: &str) -> usize {
		let letter_tot: u64 = key.chars().map(|c| c as u64).sum();
		((letter_tot.wrapping_mul(37)) % self.cells as u64) as usize
	}

	/// Doubles the cell count and re-inserts every stored pair.
	///
	/// The old backing array is swapped out wholesale; re-insertion
	/// rebuilds the occupancy count. Pairs land in new cells because the
	/// hash is taken modulo the new cell count.
	fn rehash(&mut self) {
		self.cells *= GROWTH_RATIO;
		let hold_data = std::mem::replace(&mut self.data, vec![Slot::Empty; self.cells]);
		self.occupied = 0;
		for slot in hold_data {
			if let Slot::Occupied { key, value } = slot {
				self.update(&key, value);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_zero_cells() {
		assert!(HashTable::<usize>::new(0, 0).is_err());
	}

	#[test]
	fn lookup_of_absent_key_yields_default() {
		let table = HashTable::new(7, -1i64).unwrap();
		assert_eq!(table.lookup("missing"), -1);
		assert!(table.is_empty());
	}

	#[test]
	fn round_trip_and_overwrite() {
		let mut table = HashTable::new(11, 0usize).unwrap();
		table.update("alpha", 1);
		table.update("beta", 2);
		assert_eq!(table.lookup("alpha"), 1);
		assert_eq!(table.lookup("beta"), 2);

		// Overwrite must not change occupancy
		let before = table.len();
		table.update("alpha", 42);
		assert_eq!(table.lookup("alpha"), 42);
		assert_eq!(table.len(), before);
	}

	#[test]
	fn colliding_keys_both_retrievable() {
		// "ab" and "ba" have equal code point sums, hence the same home cell
		let mut table = HashTable::new(13, 0usize).unwrap();
		table.update("ab", 1);
		table.update("ba", 2);
		assert_eq!(table.lookup("ab"), 1);
		assert_eq!(table.lookup("ba"), 2);
	}

	#[test]
	fn load_factor_stays_below_half_after_every_update() {
		let mut table = HashTable::new(3, 0usize).unwrap();
		for i in 0..200 {
			table.update(&format!("key-{i}"), i);
			assert!((table.len() as f64) / (table.cells() as f64) < 0.5);
		}
	}

	#[test]
	fn one_cell_table_grows_enough_on_the_first_inserts() {
		// From a single cell, one doubling per insert would leave the
		// load factor pinned at exactly 0.5 (1/2, then 2/4)
		let mut table = HashTable::new(1, 0usize).unwrap();
		table.update("first", 1);
		assert!((table.len() as f64) / (table.cells() as f64) < 0.5);
		table.update("second", 2);
		assert!((table.len() as f64) / (table.cells() as f64) < 0.5);
		assert_eq!(table.lookup("first"), 1);
		assert_eq!(table.lookup("second"), 2);
	}

	#[test]
	fn growth_loses_nothing() {
		// Small initial size forces several rehashes
		let mut table = HashTable::new(2, 0usize).unwrap();
		for i in 0..500 {
			table.update(&format!("entry-{i}"), i * 3);
		}
		assert_eq!(table.len(), 500);
		for i in 0..500 {
			assert_eq!(table.lookup(&format!("entry-{i}")), i * 3);
		}
	}

	#[test]
	fn identical_operation_sequences_are_observationally_identical() {
		let build = || {
			let mut table = HashTable::new(5, 0usize).unwrap();
			for i in 0..50 {
				table.update(&format!("k{i}"), i);
			}
			table
		};
		let a = build();
		let b = build();
		assert_eq!(a.cells(), b.cells());
		assert_eq!(a.len(), b.len());
		for i in 0..50 {
			assert_eq!(a.lookup(&format!("k{i}")), b.lookup(&format!("k{i}")));
		}
	}
}
