//! Differentiability grades and their reduction

use std::cmp::Ordering;

/// How well a term can be differentiated with respect to one variable.
///
/// Grades are totally ordered from most to least restrictive:
/// `None < Numerical < Analytical < Independent`. The order is defined by
/// [`Differentiability::rank`], not by declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Differentiability {
    /// No derivative is defined
    None,
    /// Only a numerical approximation is available
    Numerical,
    /// A closed-form derivative exists
    Analytical,
    /// The term does not depend on the variable; its derivative is zero
    Independent,
}

impl Differentiability {
    pub const fn rank(self) -> u8 {
        match self {
            Differentiability::None => 0,
            Differentiability::Numerical => 1,
            Differentiability::Analytical => 2,
            Differentiability::Independent => 3,
        }
    }

    /// Most restrictive grade among `grades`; `Independent` when empty
    pub fn reduce<I>(grades: I) -> Self
    where
        I: IntoIterator<Item = Differentiability>,
    {
        grades
            .into_iter()
            .fold(Differentiability::Independent, Ord::min)
    }

    pub fn is_independent(self) -> bool {
        self == Differentiability::Independent
    }

    pub fn is_differentiable(self) -> bool {
        self != Differentiability::None
    }
}

impl Ord for Differentiability {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Differentiability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
