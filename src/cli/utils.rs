use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::tier::Decision;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Pretty-print any serializable value as JSON
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Output an allow/deny decision for `subject`
pub fn output_decision(
    output_format: &OutputFormat,
    subject: &str,
    decision: &Decision,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&json!({
            "subject": subject,
            "allowed": decision.is_allowed(),
            "reason": decision.reason(),
            "requiredTier": decision.required_tier(),
        })),
        OutputFormat::Text => {
            match (decision.is_allowed(), decision.reason()) {
                (true, Some(note)) => println!("✓ {} allowed ({})", subject, note),
                (true, None) => println!("✓ {} allowed", subject),
                (false, reason) => println!("✗ {} denied: {}", subject, reason.unwrap_or("no reason given")),
            }
            Ok(())
        }
    }
}
