use std::io::Write;

use crate::error::CodegenError;

/// The only source of output. Every other component goes through this to
/// write a line; nothing buffers beyond the sink's own buffering.
pub struct Emitter<'a, W: Write> {
    sink: &'a mut W,
}

impl<'a, W: Write> Emitter<'a, W> {
    pub fn new(sink: &'a mut W) -> Self {
        Emitter { sink }
    }

    pub fn emit_line(&mut self, line: impl AsRef<str>) -> Result<(), CodegenError> {
        writeln!(self.sink, "{}", line.as_ref())?;
        Ok(())
    }
}
