//! Error types for trigger-comparison

use thiserror::Error;

/// trigger-comparison error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// A named object could not be found in an input file.
    #[error("missing histogram object: {0}")]
    MissingObject(String),

    /// Two histograms that must share binning do not.
    #[error("binning mismatch: {0}")]
    BinningMismatch(String),

    /// Input file could not be decoded.
    #[error("Input error: {0}")]
    Input(String),
}

impl Error {
    /// Whether this error concerns a single input object (and can be skipped)
    /// rather than the run as a whole.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Error::MissingObject(_)
                | Error::BinningMismatch(_)
                | Error::Validation(_)
                | Error::Computation(_)
                | Error::Input(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_fatal() {
        let io = Error::from(std::io::Error::other("disk full"));
        assert!(!io.is_per_item());
        assert!(Error::MissingObject("TriggerBits/L1Paths".into()).is_per_item());
        assert_eq!(
            Error::MissingObject("RecoJets/L1/JetMult_L1_A".into()).to_string(),
            "missing histogram object: RecoJets/L1/JetMult_L1_A"
        );
    }
}
