//! Per-stage state.

use super::CycleId;

/// State of one generation stage.
///
/// `Pending` remembers which cycle issued the request so a completion can be
/// checked against it before anything is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum StageState<T> {
    Idle,
    Pending { cycle: CycleId },
    Succeeded(T),
    Failed(String),
}

impl<T> StageState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, StageState::Pending { .. })
    }

    /// Cycle that owns the in-flight request, if any.
    pub fn pending_cycle(&self) -> Option<CycleId> {
        match self {
            StageState::Pending { cycle } => Some(*cycle),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            StageState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            StageState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for StageState<T> {
    fn default() -> Self {
        StageState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let idle: StageState<u32> = StageState::default();
        assert_eq!(idle, StageState::Idle);
        assert!(!idle.is_pending());
        assert_eq!(idle.value(), None);

        let pending: StageState<u32> = StageState::Pending {
            cycle: CycleId::new(3),
        };
        assert!(pending.is_pending());
        assert_eq!(pending.pending_cycle(), Some(CycleId::new(3)));

        let done = StageState::Succeeded(7u32);
        assert_eq!(done.value(), Some(&7));
        assert_eq!(done.pending_cycle(), None);

        let failed: StageState<u32> = StageState::Failed("nope".to_string());
        assert_eq!(failed.error(), Some("nope"));
        assert_eq!(failed.value(), None);
    }
}
