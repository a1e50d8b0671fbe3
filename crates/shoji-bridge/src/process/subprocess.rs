//! Entry point of a dedicated engine helper executable.

/// The engine's own subprocess dispatch.
///
/// Returns the subprocess exit code, or a negative value when the argument
/// vector does not name a subprocess role this engine runs.
pub trait SubprocessEngine {
    fn execute_process(&mut self, args: &[String]) -> i32;
}

#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("not a recognized subprocess role (engine returned {0})")]
    UnrecognizedRole(i32),
}

/// Forward `args` to the engine and return its exit code verbatim.
pub fn run_subprocess(
    args: &[String],
    engine: &mut dyn SubprocessEngine,
) -> Result<i32, HelperError> {
    let code = engine.execute_process(args);
    if code < 0 {
        return Err(HelperError::UnrecognizedRole(code));
    }
    Ok(code)
}

/// Value of the `--type=<role>` switch, if present.
pub fn subprocess_role(args: &[String]) -> Option<&str> {
    args.iter().find_map(|a| a.strip_prefix("--type="))
}
