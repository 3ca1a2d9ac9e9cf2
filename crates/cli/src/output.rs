use colored::Colorize;
use mimir_abi::{
    selector::{event_topic, method_id, signature},
    types::parse_event_signature,
    ContractAbi,
};
use serde_json::{json, Value};

use crate::error::Error;

/// Serializes `value`, pretty-printed when `pretty` is set.
pub(crate) fn to_json_string(value: &Value, pretty: bool) -> Result<String, Error> {
    Ok(if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? })
}

/// Lists every function selector and event topic in `abi`, in declaration order.
pub(crate) fn selectors_json(abi: &ContractAbi) -> Value {
    json!({
        "functions": abi
            .functions()
            .map(|f| json!({ "selector": f.selector().to_string(), "signature": f.signature() }))
            .collect::<Vec<_>>(),
        "events": abi
            .events()
            .map(|e| {
                json!({
                    "topic": e.topic().to_string(),
                    "signature": e.signature(),
                    "anonymous": e.anonymous(),
                })
            })
            .collect::<Vec<_>>(),
    })
}

/// The human-readable form of [`selectors_json`].
pub(crate) fn render_selectors(abi: &ContractAbi) -> String {
    let mut lines = Vec::new();

    for function in abi.functions() {
        lines.push(format!("{} {}", function.selector().to_string().cyan(), function.signature()));
    }
    for event in abi.events() {
        let anonymous =
            if event.anonymous() { " (anonymous)".dimmed().to_string() } else { String::new() };
        lines.push(format!(
            "{} {}{anonymous}",
            event.topic().to_string().cyan(),
            event.signature()
        ));
    }

    lines.join("\n")
}

/// Canonicalizes signature text and computes its method ID and event topic.
pub(crate) fn signature_json(text: &str) -> Result<Value, Error> {
    let (name, params) = parse_event_signature(text)
        .map_err(|e| Error::Generic(format!("failed to parse signature: {}", e)))?;
    let canonical = signature(&name, &params);

    Ok(json!({
        "signature": canonical,
        "selector": method_id(&canonical).to_string(),
        "topic": event_topic(&canonical).to_string(),
    }))
}
