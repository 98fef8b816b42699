//! Input gate.

use crate::error::OrchestratorError;
use crate::types::GenerationRequest;

/// Validate a raw dish name. Surrounding whitespace is dropped; a name that
/// is empty afterwards is rejected.
pub fn accept(raw: &str) -> Result<GenerationRequest, OrchestratorError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(OrchestratorError::EmptyName);
    }

    Ok(GenerationRequest {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_trims() {
        let request = accept("  Chicken Tikka Masala \n").unwrap();
        assert_eq!(request.name, "Chicken Tikka Masala");
    }

    #[test]
    fn test_reject_blank() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(accept(raw), Err(OrchestratorError::EmptyName)));
        }
    }
}
