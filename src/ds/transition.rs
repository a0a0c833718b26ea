/// Membership of a point in an operand's solid material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialState {
    /// Inside the solid.
    In,
    /// Outside the solid.
    Out,
    /// Could not be determined (tangential or degenerate configuration).
    Unknown,
}

/// The material-membership change at a crossing point.
///
/// Walking along the parametrized support curve through an interference,
/// membership in the other operand's solid changes from `before` to
/// `after`. Stored per (support shape, interference) pair, never globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Material state just before the crossing.
    pub before: MaterialState,
    /// Material state just after the crossing.
    pub after: MaterialState,
}

impl Transition {
    /// Creates a new transition.
    #[must_use]
    pub fn new(before: MaterialState, after: MaterialState) -> Self {
        Self { before, after }
    }

    /// The fully indeterminate transition.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(MaterialState::Unknown, MaterialState::Unknown)
    }

    /// Returns `true` when neither side is determined.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.before == MaterialState::Unknown && self.after == MaterialState::Unknown
    }

    /// The transition seen when walking the support in the opposite
    /// direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.after, self.before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_swaps_sides() {
        let t = Transition::new(MaterialState::In, MaterialState::Out);
        assert_eq!(
            t.reversed(),
            Transition::new(MaterialState::Out, MaterialState::In)
        );
    }

    #[test]
    fn unknown_is_unknown() {
        assert!(Transition::unknown().is_unknown());
        assert!(!Transition::new(MaterialState::In, MaterialState::Unknown).is_unknown());
    }
}
