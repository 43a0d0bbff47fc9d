//! `ign-check schema`: JSON Schema of the current config format.

use std::io::Write;

use ign_config::types::Config;

use crate::error::Result;
use crate::exit_codes::ExitCode;

pub fn render_schema() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&schemars::schema_for!(Config))
}

pub fn run_schema(out: &mut impl Write) -> Result<ExitCode> {
    writeln!(out, "{}", render_schema()?)?;
    Ok(ExitCode::Clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_describes_config() {
        let schema: serde_json::Value = serde_json::from_str(&render_schema().unwrap()).unwrap();
        assert_eq!(schema["title"], "Config");
        assert!(schema["properties"]["ignition"].is_object());
        assert!(schema["properties"]["storage"].is_object());
    }
}
