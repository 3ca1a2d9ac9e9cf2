use std::fmt;

use alloy::primitives::B256;
use colored::Colorize;
use mimir_abi::{registry::EventValue, AbiObject, BytesEncoding};
use serde_json::{json, Value};

use crate::error::Error;

/// What the decoded payload was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// Call data, routed on its selector
    Call,
    /// Return data of a function
    Output,
    /// Arguments appended to deployment bytecode
    Constructor,
    /// An event log
    Event,
    /// A revert payload
    Revert,
}

impl fmt::Display for DecodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DecodeKind::Call => "call",
            DecodeKind::Output => "output",
            DecodeKind::Constructor => "constructor",
            DecodeKind::Event => "event",
            DecodeKind::Revert => "revert",
        })
    }
}

/// The value of one decoded parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A fully decoded value
    Decoded(AbiObject),
    /// An indexed event parameter of a reference type, of which only the hash is logged
    Hashed(B256),
}

impl From<EventValue> for ParamValue {
    fn from(value: EventValue) -> Self {
        match value {
            EventValue::Decoded(object) => ParamValue::Decoded(object),
            EventValue::Hashed(hash) => ParamValue::Hashed(hash),
        }
    }
}

/// One decoded parameter, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedParam {
    /// The declared name, empty when unnamed
    pub name: String,
    /// The canonical type string
    pub ty: String,
    /// Whether the value was read from an event topic
    pub indexed: bool,
    /// The value
    pub value: ParamValue,
}

impl DecodedParam {
    fn value_json(&self, encoding: BytesEncoding) -> Value {
        match &self.value {
            ParamValue::Decoded(object) => object.to_json(encoding),
            ParamValue::Hashed(hash) => json!({ "hash": hash.to_string() }),
        }
    }

    fn value_text(&self) -> String {
        match &self.value {
            ParamValue::Decoded(object) => object.to_value().to_string(),
            ParamValue::Hashed(hash) => format!("{hash} (hashed)"),
        }
    }
}

#[derive(Debug, Clone)]
/// Result of a successful decode operation
///
/// Contains the resolved signature and the decoded parameters, along with the byte encoding
/// used when rendering them.
pub struct DecodeResult {
    /// What was decoded
    pub kind: DecodeKind,
    /// The function, event or error name
    pub name: String,
    /// The canonical signature
    pub signature: String,
    /// The decoded parameters
    pub params: Vec<DecodedParam>,
    /// Extra context, such as the meaning of a panic code
    pub note: Option<String>,
    pub(crate) encoding: BytesEncoding,
}

impl DecodeResult {
    /// Displays the decoded signature and parameters in a formatted way
    pub fn display(&self) {
        println!("{}", self.render());
    }

    /// Renders the human-readable form printed by [`DecodeResult::display`]
    pub fn render(&self) -> String {
        let mut lines =
            vec![format!("{} {}", self.kind.to_string().dimmed(), self.signature.bold())];

        for (index, param) in self.params.iter().enumerate() {
            let name =
                if param.name.is_empty() { String::new() } else { format!(" {}", param.name) };
            let indexed = if param.indexed { " indexed" } else { "" };
            lines.push(format!(
                "  [{index}] {}{indexed}{name}: {}",
                param.ty.cyan(),
                param.value_text()
            ));
        }

        if let Some(note) = &self.note {
            lines.push(format!("  {}", note.yellow()));
        }

        lines.join("\n")
    }

    /// Converts the decode result to a JSON value
    pub fn to_json_value(&self) -> Value {
        let mut result = json!({
            "kind": self.kind.to_string(),
            "name": self.name,
            "signature": self.signature,
            "params": self
                .params
                .iter()
                .map(|param| {
                    json!({
                        "name": param.name,
                        "type": param.ty,
                        "indexed": param.indexed,
                        "value": param.value_json(self.encoding),
                    })
                })
                .collect::<Vec<_>>(),
        });

        if let Some(note) = &self.note {
            result["note"] = json!(note);
        }

        result
    }

    /// Converts the decode result to a JSON string
    pub fn to_json(&self, pretty: bool) -> Result<String, Error> {
        let value = self.to_json_value();
        Ok(if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        })
    }
}
