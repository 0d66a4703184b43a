use super::graph::PrimitiveId;

pub type ScriptResult<T> = Result<T, ScriptError>;

/// Everything a scene script can fail with. None of these are recoverable: a
/// script is an all-or-nothing sequence and is never retried.
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("reference error: {0} was removed from the scene")]
    Removed(PrimitiveId),

    #[error("reference error: {0} was never declared")]
    Undeclared(PrimitiveId),

    #[error("reference error: {0} is declared but not on stage")]
    NotOnStage(PrimitiveId),

    #[error("construction error: {0}")]
    Construction(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("frame sink error: {0:#}")]
    Sink(#[from] anyhow::Error),
}

impl ScriptError {
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// True for the fail-fast class raised when a step names a primitive that
    /// is not available in the scene graph.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::Removed(_) | Self::Undeclared(_) | Self::NotOnStage(_)
        )
    }
}

/// Reject NaN, infinities and negative values for anything measured in seconds.
pub(crate) fn check_duration(what: &str, secs: f64) -> ScriptResult<()> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(ScriptError::construction(format!(
            "{what} must be a finite, non-negative number of seconds (got {secs})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ScriptError::Removed(PrimitiveId(3))
                .to_string()
                .contains("reference error:")
        );
        assert!(
            ScriptError::construction("x")
                .to_string()
                .contains("construction error:")
        );
        assert!(
            ScriptError::invalid_state("x")
                .to_string()
                .contains("invalid state:")
        );
    }

    #[test]
    fn sink_preserves_source() {
        let err = ScriptError::from(anyhow::anyhow!("disk full"));
        assert!(err.to_string().contains("disk full"));
        assert!(!err.is_reference_error());
    }

    #[test]
    fn durations_must_be_finite_and_non_negative() {
        assert!(check_duration("wait", 0.0).is_ok());
        assert!(check_duration("wait", 1.5).is_ok());
        assert!(check_duration("wait", -0.1).is_err());
        assert!(check_duration("wait", f64::NAN).is_err());
        assert!(check_duration("wait", f64::INFINITY).is_err());
    }
}
