//! `num-surd` computes the periodic continued-fraction expansion of quadratic
//! surds `(√r + a) / b` on top of the `num` crates, and partitions all reduced
//! surds of a given radicand into the cycles induced by the continued-fraction
//! transformation (the classical machinery behind Pell-equation periods and
//! the classification of reduced indefinite forms).
//!
//! The API is generic over any integer implementing [QuadSurdBase]; use
//! `num_bigint::BigInt` for unbounded precision.

mod cycles;
mod expand;
mod surd;

pub use cycles::{all_with, all_with_reduced, partition, partition_reduced, square_content};
pub use expand::{Convergents, Expansion, Terms};
pub use surd::{InvalidArgument, QuadSurd, QuadSurdBase};
