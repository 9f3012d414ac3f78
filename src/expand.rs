//! Continued-fraction expansion of quadratic surds.

use crate::surd::{is_reduced, InvalidArgument, QuadSurd, QuadSurdBase};
use num_integer::{sqrt, Integer};
use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedMul, One, RefNum, Signed, Zero};
use std::fmt;
use std::mem::swap;

/// Mutable cursor driving one expansion or one partition walk. Exclusively
/// owned by the routine that creates it and discarded afterwards.
pub(crate) struct Cursor<T> {
    r: T,
    ir: T, // ⌊√r⌋, fixed for the lifetime of the cursor
    a: T,
    b: T,
}

impl<T: QuadSurdBase> Cursor<T>
where
    for<'r> &'r T: RefNum<T>,
{
    pub(crate) fn new(surd: QuadSurd<T>) -> Self {
        let (r, a, b) = surd.into_parts();
        let ir = sqrt(r.clone());
        Cursor { r, ir, a, b }
    }

    /// Snapshot of the current triple
    pub(crate) fn surd(&self) -> QuadSurd<T> {
        QuadSurd::new_raw(self.r.clone(), self.a.clone(), self.b.clone())
    }

    // Invert the fractional part: b ← (r - a²)/b, a ← -a.
    // The division is exact as long as the divisibility invariant holds.
    pub(crate) fn flip(&mut self) {
        let numerator = &self.r - &self.a * &self.a;
        self.b = numerator / &self.b;
        self.a = T::zero() - &self.a;
    }

    // Extract and return the integer part of the value, leaving the
    // fractional remainder in `a`. The quotient rounds towards negative
    // infinity; the +1 shift for b < 0 makes the result the true floor
    // of (√r + a)/b despite ir underestimating √r.
    pub(crate) fn extract(&mut self) -> T {
        let shifted = &self.a + &self.ir;
        let quotient = if self.b.is_negative() {
            (shifted + T::one()).div_floor(&self.b)
        } else {
            shifted.div_floor(&self.b)
        };
        self.a = &self.a - &quotient * &self.b;
        quotient
    }

    /// One full continued-fraction step, returning the emitted term
    pub(crate) fn step(&mut self) -> T {
        self.flip();
        self.extract()
    }

    pub(crate) fn is_reduced(&self) -> bool {
        is_reduced(&self.ir, &self.a, &self.b)
    }
}

/// The continued fraction of a quadratic surd: a finite aperiodic prefix
/// followed by an endlessly repeating cycle of terms.
///
/// Produced by [QuadSurd::expand]; the repeating part is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expansion<T> {
    initial: Vec<T>,
    repeating: Vec<T>,
}

impl<T> Expansion<T> {
    /// Terms before the expansion enters its cycle
    #[inline]
    pub fn initial(&self) -> &[T] {
        &self.initial[..]
    }

    /// Terms of the repeating cycle
    #[inline]
    pub fn repeating(&self) -> &[T] {
        &self.repeating[..]
    }

    /// Length of the repeating cycle
    #[inline]
    pub fn period(&self) -> usize {
        self.repeating.len()
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<T>, Vec<T>) {
        (self.initial, self.repeating)
    }

    /// Returns an endless iterator of the terms: the prefix once, then the
    /// repeating cycle over and over
    pub fn terms(&self) -> Terms<T> {
        Terms {
            i_iter: Some(self.initial.iter()),
            p_ref: &self.repeating,
            p_iter: None,
        }
    }
}

impl<T: Integer + Clone + CheckedAdd + CheckedMul> Expansion<T> {
    /// Returns an iterator of the convergents of the term sequence. The
    /// iterator stops when numeric overflow happens.
    pub fn convergents(&self) -> Convergents<T> {
        Convergents {
            terms: self.terms(),
            pm1: T::one(),
            pm2: T::zero(),
            qm1: T::zero(),
            qm2: T::one(),
        }
    }
}

/// Iterator of the terms in an [Expansion]
#[derive(Debug, Clone)]
pub struct Terms<'a, T> {
    i_iter: Option<std::slice::Iter<'a, T>>, // None once the prefix is consumed
    p_ref: &'a Vec<T>,
    p_iter: Option<std::slice::Iter<'a, T>>, // None before the prefix is consumed
}

impl<'a, T> Iterator for Terms<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(it) = self.i_iter.as_mut() {
            // in the prefix
            match it.next() {
                Some(v) => Some(v),
                None => {
                    self.i_iter = None;
                    if self.p_ref.len() > 0 {
                        let mut new_iter = self.p_ref.iter();
                        let result = new_iter.next();
                        self.p_iter = Some(new_iter);
                        result
                    } else {
                        None
                    }
                }
            }
        } else if let Some(it) = self.p_iter.as_mut() {
            // in the cycle
            match it.next() {
                Some(v) => Some(v),
                None => {
                    let mut new_iter = self.p_ref.iter();
                    let result = new_iter.next();
                    self.p_iter = Some(new_iter);
                    result
                }
            }
        } else {
            None
        }
    }
}

/// Iterator of convergents of an [Expansion]
pub struct Convergents<'a, T> {
    terms: Terms<'a, T>,
    pm1: T, // p_(k-1)
    pm2: T, // p_(k-2)
    qm1: T, // q_(k-1)
    qm2: T, // q_(k-2)
}

impl<'a, T: Integer + Clone + CheckedAdd + CheckedMul> Iterator for Convergents<'a, T> {
    type Item = Ratio<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let a = self.terms.next()?;
        // p_k = a_k * p_(k-1) + p_(k-2)
        let p = a.checked_mul(&self.pm1).and_then(|v| v.checked_add(&self.pm2))?;
        // q_k = a_k * q_(k-1) + q_(k-2)
        let q = a.checked_mul(&self.qm1).and_then(|v| v.checked_add(&self.qm2))?;
        if q.is_zero() {
            return None;
        }

        swap(&mut self.pm2, &mut self.pm1); // self.pm2 = self.pm1
        swap(&mut self.qm2, &mut self.qm1); // self.qm2 = self.qm1
        self.pm1 = p.clone();
        self.qm1 = q.clone();

        Some(Ratio::new(p, q))
    }
}

impl<T: QuadSurdBase> QuadSurd<T>
where
    for<'r> &'r T: RefNum<T>,
{
    /// Expand the surd into its continued fraction. The represented value
    /// must lie strictly between 0 and 1 and `r` must not be a perfect
    /// square (both checked after scaling up to the divisibility invariant).
    ///
    /// The states walked here stay within the finitely many reduced triples
    /// of the scaled radicand, so both loops terminate; no step cap is
    /// imposed, callers needing time-boxing must wrap the call themselves.
    pub fn expand(self) -> Result<Expansion<T>, InvalidArgument> {
        // scale up only: a gcd reduction here would change the walked states
        let scaled = if self.is_divisible() {
            self
        } else {
            self.scale_to_divisible()
        };

        let root = sqrt(scaled.r.clone());
        if &root * &root == scaled.r {
            return Err(InvalidArgument::PerfectSquare);
        }
        let shifted = &scaled.a + &root;
        let in_range = if scaled.b.is_negative() {
            shifted >= scaled.b && shifted.is_negative()
        } else {
            shifted < scaled.b && !shifted.is_negative()
        };
        if !in_range {
            return Err(InvalidArgument::OutsideUnitInterval);
        }

        let mut cursor = Cursor::new(scaled);
        let mut initial = Vec::new();
        while !cursor.is_reduced() {
            initial.push(cursor.step());
        }

        let start = cursor.surd();
        let mut repeating = vec![cursor.step()];
        while cursor.surd() != start {
            repeating.push(cursor.step());
        }
        Ok(Expansion { initial, repeating })
    }
}

impl<T: fmt::Display> fmt::Display for Expansion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for term in self.initial.iter() {
            write!(f, "{}, ", term)?;
        }
        let mut piter = self.repeating.iter();
        write!(f, "({}", piter.next().unwrap())?;
        for term in piter {
            write!(f, ", {}", term)?;
        }
        write!(f, ")]")
    }
}
