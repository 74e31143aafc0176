//! Speaker attribution library built on k-order character Markov models.
//!
//! This crate provides the statistical core of the attribution system:
//! - A fixed-growth open-addressing hash table for string-keyed counts
//! - Character-level Markov models with Laplace-smoothed log-likelihood
//! - Two-model comparison producing a categorical verdict
//!
//! The core performs no I/O of its own; drivers read the texts and hand
//! them in as strings. The only file-touching entry point is the model
//! cache (`Markov::from_file`), kept out of the pure constructors.

/// Core model types and attribution logic.
///
/// This module exposes the hash table, the Markov model and the
/// attribution entry points.
pub mod model;

/// I/O utilities (file loading, path helpers).
///
/// Used by the model cache and by driver binaries.
pub mod io;
