use thiserror::Error;

/// Errors raised when raw indices cross into the typed environment API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("Invalid action index: {0} (expected 0..5)")]
    InvalidAction(usize),

    #[error("Position out of range: {0} (expected 0..8)")]
    PositionOutOfRange(usize),

    #[error("Both players cannot occupy cell {0}")]
    Collision(usize),

    #[error("Invalid possession index: {0} (expected 0 or 1)")]
    InvalidPossession(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_action_display() {
        let e = EnvironmentError::InvalidAction(7);
        assert_eq!(e.to_string(), "Invalid action index: 7 (expected 0..5)");
    }

    #[test]
    fn collision_display() {
        let e = EnvironmentError::Collision(3);
        assert_eq!(e.to_string(), "Both players cannot occupy cell 3");
    }
}
