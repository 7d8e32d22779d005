use std::fmt;

/// Every failure this back end can report. All of them indicate a bug in
/// an earlier compiler phase or in this one; none are recoverable, and
/// the caller discards whatever output has already been emitted.
#[derive(Debug)]
pub enum CodegenError {
    /// Address generation was invoked on a node kind that cannot be
    /// addressed.
    NotAnLvalue { line: u32 },
    /// The expression dispatcher reached a kind it does not implement.
    InvalidExpression { line: u32 },
    /// The statement dispatcher reached a kind it does not implement.
    InvalidStatement { line: u32 },
    /// A function body left the push-depth counter non-zero at its exit.
    UnbalancedStack { function: String, depth: i64 },
    /// Writing to the output sink failed.
    Io(std::io::Error),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::NotAnLvalue { line } => write!(f, "line {line}: not an lvalue"),
            CodegenError::InvalidExpression { line } => {
                write!(f, "line {line}: invalid expression")
            }
            CodegenError::InvalidStatement { line } => write!(f, "line {line}: invalid statement"),
            CodegenError::UnbalancedStack { function, depth } => write!(
                f,
                "function `{function}` exited with push depth {depth}, expected 0"
            ),
            CodegenError::Io(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for CodegenError {}

impl From<std::io::Error> for CodegenError {
    fn from(e: std::io::Error) -> Self {
        CodegenError::Io(e)
    }
}
