pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Fails with `MissingRequiredField` naming `$name` when `$expr` is false.
///
/// ```
/// fn check(workspace: &str) -> rankconf_common::Result<()> {
///     rankconf_common::verify_field!(workspace, !workspace.is_empty());
///     Ok(())
/// }
/// assert!(check("/ws").is_ok());
/// assert!(check("").is_err());
/// ```
#[macro_export]
macro_rules! verify_field {
    ($name:ident, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_field(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_field(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        missing_required(name, condition)
    }
}

#[cold]
pub fn missing_required(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::ErrorKind::MissingRequiredField {
        field: name.to_string(),
        message: format!("condition `{condition}` does not hold"),
    }
    .into())
}
