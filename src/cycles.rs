//! Enumeration of reduced quadratic surds and their partition into
//! the cycles induced by the continued-fraction transformation.

use crate::expand::Cursor;
use crate::surd::{InvalidArgument, QuadSurd, QuadSurdBase};
use num_integer::{sqrt, Integer};
use num_traits::{One, RefNum, Signed, Zero};
use std::collections::HashSet;
use std::hash::Hash;

/// Enumerate all primitive reduced surds with radicand `r`, in order of the
/// numerator offset `-i` for `i` from 1 to `⌊√r⌋`.
///
/// Returns an empty list when `r` is a perfect square (no irrational surds
/// exist) and an error for a negative `r`. Each offset contributes the
/// divisors `j` of `r - i²` admissible as denominators, paired with their
/// codivisors; runs in O(√r) trial divisions per offset.
pub fn all_with<T: QuadSurdBase>(r: T) -> Result<Vec<QuadSurd<T>>, InvalidArgument>
where
    for<'r> &'r T: RefNum<T>,
{
    if r.is_negative() {
        return Err(InvalidArgument::NegativeRadicand);
    }
    let mut result = Vec::new();
    let root = sqrt(r.clone());
    if &root * &root == r {
        return Ok(result);
    }

    let mut i = T::one();
    while i <= root {
        let top = &r - &i * &i;
        // the reduced predicate needs b > ⌊√r⌋ - i, smaller divisors are skipped
        let mut j = &root - &i + T::one();
        while &j * &j < top {
            if top.is_multiple_of(&j) {
                let small = QuadSurd::new_raw(r.clone(), T::zero() - &i, j.clone());
                if small.content().is_one() {
                    let partner = QuadSurd::new_raw(r.clone(), T::zero() - &i, &top / &j);
                    result.push(small);
                    result.push(partner);
                }
            }
            j = j + T::one();
        }
        if &j * &j == top {
            let exact = QuadSurd::new_raw(r.clone(), T::zero() - &i, j);
            if exact.content().is_one() {
                result.push(exact);
            }
        }
        i = i + T::one();
    }
    Ok(result)
}

/// Group the surds of [all_with] into the closed walks of the flip/extract
/// transformation. Every cycle is returned in visitation order starting from
/// its first enumerated pivot; together the cycles partition the full set.
pub fn partition<T: QuadSurdBase + Hash>(r: T) -> Result<Vec<Vec<QuadSurd<T>>>, InvalidArgument>
where
    for<'r> &'r T: RefNum<T>,
{
    let pivots = all_with(r)?;
    let mut cycles = Vec::new();
    let mut used = HashSet::new();
    for pivot in pivots {
        if used.contains(&pivot) {
            continue;
        }
        let mut cursor = Cursor::new(pivot.clone());
        let mut cycle = Vec::new();
        let mut current = pivot;
        while !used.contains(&current) {
            used.insert(current.clone());
            cycle.push(current);
            cursor.step();
            current = cursor.surd();
        }
        cycles.push(cycle);
    }
    Ok(cycles)
}

/// Split `n` into `(m, k)` with `n = m²·k` and `k` square-free, by trial
/// division of square factors
pub fn square_content<T: QuadSurdBase>(n: T) -> (T, T)
where
    for<'r> &'r T: RefNum<T>,
{
    let mut n = n;
    let mut root = T::one();
    let mut base = T::one() + T::one();
    let mut square = &base * &base;
    while square <= n {
        if n.is_multiple_of(&square) {
            n = &n / &square;
            root = root * &base;
        } else {
            base = base + T::one();
            square = &base * &base;
        }
    }
    (root, n)
}

// Collapse the part of the square content of r that a and b share with it:
// d = gcd(gcd(a, b), m), result ((m/d)²·k, a/d, b/d).
fn reduce_triple<T: QuadSurdBase>(root: &T, square_free: &T, surd: QuadSurd<T>) -> QuadSurd<T>
where
    for<'r> &'r T: RefNum<T>,
{
    let (_, a, b) = surd.into_parts();
    let d = a.gcd(&b).gcd(root);
    let m = root / &d;
    QuadSurd::new_raw(&(&m * &m) * square_free, a / &d, b / d)
}

/// [all_with], with every triple collapsed by the square content of `r`
/// shared with its coefficients
pub fn all_with_reduced<T: QuadSurdBase>(r: T) -> Result<Vec<QuadSurd<T>>, InvalidArgument>
where
    for<'r> &'r T: RefNum<T>,
{
    let (root, square_free) = square_content(r.clone());
    Ok(all_with(r)?
        .into_iter()
        .map(|surd| reduce_triple(&root, &square_free, surd))
        .collect())
}

/// [partition], with every triple collapsed by the square content of `r`
/// shared with its coefficients
pub fn partition_reduced<T: QuadSurdBase + Hash>(
    r: T,
) -> Result<Vec<Vec<QuadSurd<T>>>, InvalidArgument>
where
    for<'r> &'r T: RefNum<T>,
{
    let (root, square_free) = square_content(r.clone());
    Ok(partition(r)?
        .into_iter()
        .map(|cycle| {
            cycle
                .into_iter()
                .map(|surd| reduce_triple(&root, &square_free, surd))
                .collect()
        })
        .collect())
}
