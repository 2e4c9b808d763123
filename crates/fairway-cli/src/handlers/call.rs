//! Call command handler

use crate::cli::{CallArgs, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use fairway_core::{ApiResult, ValidationError, TOOL_NAMES};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Handle the call command
pub async fn handle_call(args: CallArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    if !TOOL_NAMES.contains(&args.tool.as_str()) {
        return Err(ValidationError::UnknownTool { name: args.tool }.into());
    }
    let tool_args = read_tool_args(args.args.as_deref(), args.args_file.as_deref())?;

    let tools = super::league_tools(config)?;
    info!(tool = %args.tool, "Invoking tool");
    let result = tools.invoke(&args.tool, tool_args).await?;
    let pretty = args.pretty || config.output.pretty;

    match result {
        ApiResult::Success(body) => output.response_body(&body, pretty),
        ApiResult::Failure(descriptor) => {
            if output.format() != OutputFormat::Human {
                output.data(&ApiResult::Failure(descriptor.clone()), pretty)?;
            }
            Err(Error::Tool(descriptor))
        }
    }
}

/// Tool arguments from `--args`, `--args-file`, or none (`null`)
fn read_tool_args(inline: Option<&str>, file: Option<&Path>) -> Result<Value> {
    if let Some(json) = inline {
        return Ok(serde_json::from_str(json)?);
    }

    let Some(path) = file else {
        return Ok(Value::Null);
    };
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}
