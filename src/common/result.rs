use crate::common::error::SgitError;

/// Result type used across the crate for invocation-level failures.
///
/// # Examples
///
/// ```
/// use sgit::common::result::SgitResult;
/// use sgit::common::error::SgitError;
///
/// fn example_function() -> SgitResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> SgitResult<()> {
///     Err(SgitError::internal_error("Something went wrong"))
/// }
/// # assert!(example_function().is_ok());
/// # assert!(example_with_error().is_err());
/// ```
pub type SgitResult<T> = Result<T, SgitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_carries_sgit_error() {
        let result: SgitResult<()> = Err(SgitError::internal_error("no value"));
        assert_eq!(result.unwrap_err().to_string(), "Internal error: no value");
    }
}
