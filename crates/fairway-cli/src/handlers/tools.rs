use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::OutputWriter;
use fairway_core::TOOL_NAMES;

/// List every tool name, one per line in human mode
pub fn handle_tools(output: &mut OutputWriter) -> Result<()> {
    if output.format() == OutputFormat::Human {
        for name in TOOL_NAMES {
            output.writeln(name)?;
        }
        Ok(())
    } else {
        output.data(&TOOL_NAMES, false)
    }
}
