/// A pre-mutation snapshot paired with the optimistically applied value.
///
/// The caller shows `applied()` right away and, once the remote result is
/// known, either keeps it with `commit()` or goes back with `rollback()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimistic<T> {
    previous: T,
    applied: T,
}

impl<T> Optimistic<T> {
    pub fn apply(current: T, mutate: impl FnOnce(&T) -> T) -> Self {
        let applied = mutate(&current);
        Self { previous: current, applied }
    }

    pub fn previous(&self) -> &T {
        &self.previous
    }

    pub fn applied(&self) -> &T {
        &self.applied
    }

    pub fn commit(self) -> T {
        self.applied
    }

    pub fn rollback(self) -> T {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LikeState;

    #[test]
    fn test_rollback_restores_snapshot() {
        let update = Optimistic::apply(LikeState::new(false, 10), LikeState::toggled);
        assert_eq!(update.applied(), &LikeState::new(true, 11));
        assert_eq!(update.rollback(), LikeState::new(false, 10));
    }

    #[test]
    fn test_commit_keeps_applied_value() {
        let update = Optimistic::apply(LikeState::new(true, 3), LikeState::toggled);
        assert_eq!(update.previous(), &LikeState::new(true, 3));
        assert_eq!(update.commit(), LikeState::new(false, 2));
    }
}
