use miette::{IntoDiagnostic, Result, WrapErr};
use murmur_core::MurmurConfig;
use serde_json::Value;

use crate::output::Output;

/// Invoke one tool the way an agent would and print the text it gets back
pub async fn run(config: MurmurConfig, tool: &str, args: &str) -> Result<()> {
    let arguments = parse_arguments(args)?;
    let tools = super::connect_tools(config).await?;

    let output = Output::new();
    output.tool_call(tool, &arguments.to_string());

    let outcome = tools.dispatch(tool, arguments).await;
    if outcome.is_failure() {
        output.error(outcome.text());
    } else {
        println!("{}", outcome.text());
    }
    Ok(())
}

fn parse_arguments(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw)
        .into_diagnostic()
        .wrap_err("Tool arguments must be a JSON object")?;
    if !value.is_object() {
        miette::bail!("Tool arguments must be a JSON object, got: {raw}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arguments_must_be_an_object() {
        let value = parse_arguments(r#"{"channel_id": "1"}"#).unwrap();
        assert_eq!(value["channel_id"], "1");

        assert!(parse_arguments("[1, 2]").is_err());
        assert!(parse_arguments("channel_id=1").is_err());
    }
}
