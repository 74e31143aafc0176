//! Top-level module for the attribution system.
//!
//! This module provides character-level speaker attribution, including:
//! - A fixed-growth open-addressing hash table (`HashTable`)
//! - k-order Markov models over characters (`Markov`)
//! - Two-model comparison and verdicts (`attribution`)

/// Open-addressing hash table with linear probing and doubling growth.
///
/// Maps string keys to values of a caller-chosen type, yielding a
/// caller-chosen default for absent keys. No deletion, no shrinking.
pub mod table;

/// k-order character Markov model.
///
/// Handles circular n-gram counting at construction, Laplace-smoothed
/// log-likelihood queries, and an optional on-disk model cache.
pub mod markov;

/// Attribution of an unknown text to one of two reference speakers.
///
/// Compares normalized log-likelihoods under two models and reports
/// `A`, `B`, or a tie.
pub mod attribution;
