//! Quadratic surd triples `(√r + a) / b` and their canonical reduction.

use num_integer::{sqrt, Integer, Roots};
use num_traits::{NumRef, One, RefNum, Signed, ToPrimitive, Zero};
use std::fmt;

/// A helper trait to define valid types that can be used for [QuadSurd]
pub trait QuadSurdBase: Integer + NumRef + Clone + Roots + Signed {}
impl<T: Integer + NumRef + Clone + Roots + Signed> QuadSurdBase for T {}

/// The reason an argument was rejected by one of the surd operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The radicand `r` must be non-negative
    NegativeRadicand,
    /// The denominator `b` must be non-zero
    ZeroDenominator,
    /// The radicand must not be a perfect square
    PerfectSquare,
    /// The represented value must lie strictly between 0 and 1
    OutsideUnitInterval,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::NegativeRadicand => write!(f, "r must be non-negative"),
            InvalidArgument::ZeroDenominator => write!(f, "b must be non-zero"),
            InvalidArgument::PerfectSquare => write!(f, "r cannot be a perfect square"),
            InvalidArgument::OutsideUnitInterval => write!(f, "quantity not between 0 and 1"),
        }
    }
}

impl std::error::Error for InvalidArgument {}

/// A quadratic surd represented as `(√r + a) / b`.
///
/// Equality and hashing are structural over the triple `(r, a, b)`, which is
/// what the cycle detection in [expand][QuadSurd::expand] and
/// [partition][crate::partition] relies on. Two triples representing the same
/// real value compare equal only after [normalize][QuadSurd::normalize].
#[derive(PartialEq, Eq, Hash, Clone, Debug, Copy)]
pub struct QuadSurd<T> {
    pub(crate) r: T,
    pub(crate) a: T,
    pub(crate) b: T,
}

impl<T> QuadSurd<T> {
    #[inline]
    pub(crate) const fn new_raw(r: T, a: T, b: T) -> Self {
        QuadSurd { r, a, b }
    }

    /// Get return-only references to the components `(r, a, b)`
    #[inline]
    pub const fn parts(&self) -> (&T, &T, &T) {
        (&self.r, &self.a, &self.b)
    }

    /// Decompose the surd into its components `(r, a, b)`
    #[inline]
    pub fn into_parts(self) -> (T, T, T) {
        (self.r, self.a, self.b)
    }
}

impl<T: QuadSurdBase> QuadSurd<T>
where
    for<'r> &'r T: RefNum<T>,
{
    /// Create a surd `(√r + a) / b`, rejecting a negative radicand
    /// and a zero denominator.
    pub fn new(r: T, a: T, b: T) -> Result<Self, InvalidArgument> {
        if r.is_negative() {
            return Err(InvalidArgument::NegativeRadicand);
        }
        if b.is_zero() {
            return Err(InvalidArgument::ZeroDenominator);
        }
        Ok(QuadSurd::new_raw(r, a, b))
    }

    /// Create the fractional part of `√r`, i.e. the triple `(r, -⌊√r⌋, 1)`.
    ///
    /// This is the canonical starting point for computing the period of `√r`;
    /// a perfect square has no irrational part and is rejected.
    pub fn from_sqrt(r: T) -> Result<Self, InvalidArgument> {
        if r.is_negative() {
            return Err(InvalidArgument::NegativeRadicand);
        }
        let root = sqrt(r.clone());
        if &root * &root == r {
            return Err(InvalidArgument::PerfectSquare);
        }
        Ok(QuadSurd::new_raw(r, -root, T::one()))
    }

    // Whether b | (r - a²), the invariant required by `content` and `flip`.
    #[inline]
    pub(crate) fn is_divisible(&self) -> bool {
        (&self.r - &self.a * &self.a).is_multiple_of(&self.b)
    }

    // Scale by q = b / gcd(r - a², b) into an equivalent triple
    // (r·q², q·a, q·b) satisfying the divisibility invariant.
    pub(crate) fn scale_to_divisible(self) -> Self {
        let g = (&self.r - &self.a * &self.a).gcd(&self.b);
        let q = &self.b / &g;
        let square = &q * &q;
        QuadSurd::new_raw(self.r * &square, &q * self.a, q * self.b)
    }

    // Content of the triple: gcd(gcd(a, b), (r - a²)/b).
    // The divisibility invariant must already hold.
    pub(crate) fn content(&self) -> T {
        let quotient = (&self.r - &self.a * &self.a) / &self.b;
        self.a.gcd(&self.b).gcd(&quotient)
    }

    // Divide out the content (r by its square), collapsing a non-primitive
    // triple to the primitive one.
    pub(crate) fn reduce_content(self) -> Self {
        let d = self.content();
        QuadSurd::new_raw(self.r / (&d * &d), self.a / &d, self.b / d)
    }

    /// Bring the triple into canonical form: scale up to the divisibility
    /// invariant `b | (r - a²)` when it does not hold yet, then divide out
    /// the common content. The result is a fixed point of `normalize`.
    pub fn normalize(self) -> Self {
        let scaled = if self.is_divisible() {
            self
        } else {
            self.scale_to_divisible()
        };
        scaled.reduce_content()
    }

    /// Whether the (already normalized) surd lies in the reduced region,
    /// i.e. `b > 0`, `a < 0`, `b > a + ⌊√r⌋` and `b ≤ ⌊√r⌋ - a`.
    #[inline]
    pub fn is_reduced(&self) -> bool {
        is_reduced(&sqrt(self.r.clone()), &self.a, &self.b)
    }

    /// Normalize the triple and return its radicand if it is a valid reduced
    /// surd representative, or zero if `r` is a perfect square or the
    /// normalized triple is not reduced.
    pub fn characteristic(self) -> T {
        let normal = self.normalize();
        let root = sqrt(normal.r.clone());
        if &root * &root == normal.r || !is_reduced(&root, &normal.a, &normal.b) {
            return T::zero();
        }
        normal.r
    }
}

impl<T: QuadSurdBase + ToPrimitive> QuadSurd<T>
where
    for<'r> &'r T: RefNum<T>,
{
    /// Approximate the represented value as a float
    #[inline]
    pub fn to_f64(&self) -> Option<f64> {
        Some((self.r.to_f64()?.sqrt() + self.a.to_f64()?) / self.b.to_f64()?)
    }
}

// The reduced ("standard") region predicate over ir = ⌊√r⌋.
pub(crate) fn is_reduced<T: QuadSurdBase>(ir: &T, a: &T, b: &T) -> bool
where
    for<'r> &'r T: RefNum<T>,
{
    if b.is_negative() || !a.is_negative() {
        return false;
    }
    let low = a + ir;
    let high = ir - a;
    b > &low && b <= &high
}

impl<T: fmt::Display> fmt::Display for QuadSurd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(√{} + {}) / {}", self.r, self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_test() {
        assert!(QuadSurd::new(2, -1, 1).is_ok());
        assert_eq!(
            QuadSurd::new(-2, 0, 1),
            Err(InvalidArgument::NegativeRadicand)
        );
        assert_eq!(QuadSurd::new(2, 0, 0), Err(InvalidArgument::ZeroDenominator));
    }

    #[test]
    fn from_sqrt_test() {
        assert_eq!(QuadSurd::from_sqrt(2), Ok(QuadSurd::new_raw(2, -1, 1)));
        assert_eq!(QuadSurd::from_sqrt(13), Ok(QuadSurd::new_raw(13, -3, 1)));
        assert_eq!(QuadSurd::from_sqrt(9), Err(InvalidArgument::PerfectSquare));
        assert_eq!(QuadSurd::from_sqrt(-1), Err(InvalidArgument::NegativeRadicand));
    }

    #[test]
    fn normalize_test() {
        // already canonical
        assert_eq!(
            QuadSurd::new_raw(2, 0, 2).normalize(),
            QuadSurd::new_raw(2, 0, 2)
        );
        // scaled up to divisibility: √3/2 becomes √12/4
        assert_eq!(
            QuadSurd::new_raw(3, 0, 2).normalize(),
            QuadSurd::new_raw(12, 0, 4)
        );
        // content divided out: (√8 - 2)/2 = √2 - 1
        assert_eq!(
            QuadSurd::new_raw(8, -2, 2).normalize(),
            QuadSurd::new_raw(2, -1, 1)
        );
        // a negative denominator is preserved
        assert_eq!(
            QuadSurd::new_raw(2, -1, -1).normalize(),
            QuadSurd::new_raw(2, -1, -1)
        );
    }

    #[test]
    fn normalize_idempotent_test() {
        let triples = [
            (2i64, 0, 2),
            (3, 0, 2),
            (8, -2, 2),
            (2, -1, -1),
            (45, -3, 6),
            (7, 2, 5),
        ];
        for &(r, a, b) in triples.iter() {
            let once = QuadSurd::new_raw(r, a, b).normalize();
            assert_eq!(once.clone().normalize(), once);
        }
    }

    #[test]
    fn characteristic_test() {
        assert_eq!(QuadSurd::new_raw(2, -1, 1).characteristic(), 2);
        assert_eq!(QuadSurd::new_raw(3, -1, 2).characteristic(), 3);
        // normalization happens first, so the reduced radicand is returned
        assert_eq!(QuadSurd::new_raw(8, -2, 2).characteristic(), 2);
        // perfect squares and non-reduced triples are rejected
        assert_eq!(QuadSurd::new_raw(4, -1, 1).characteristic(), 0);
        assert_eq!(QuadSurd::new_raw(2, 1, 1).characteristic(), 0);
        assert_eq!(QuadSurd::new_raw(2, -1, 4).characteristic(), 0);
    }

    #[test]
    fn is_reduced_test() {
        assert!(QuadSurd::new_raw(2, -1, 1).is_reduced());
        assert!(QuadSurd::new_raw(5, -1, 2).is_reduced());
        assert!(!QuadSurd::new_raw(5, 1, 2).is_reduced()); // a >= 0
        assert!(!QuadSurd::new_raw(5, -1, -2).is_reduced()); // b < 0
        assert!(!QuadSurd::new_raw(5, -1, 4).is_reduced()); // b > ir - a
    }

    #[test]
    fn to_f64_test() {
        let golden_frac = QuadSurd::new_raw(5, -1, 2);
        assert!(matches!(golden_frac.to_f64(), Some(v) if (v - 0.61803398874989f64).abs() < 1e-10));
        let sq2_frac = QuadSurd::new_raw(2, -1, 1);
        assert!(matches!(sq2_frac.to_f64(), Some(v) if (v - 0.41421356237309f64).abs() < 1e-10));
    }

    #[test]
    fn fmt_test() {
        assert_eq!(format!("{}", QuadSurd::new_raw(5, -1, 2)), "(√5 + -1) / 2");
    }
}
