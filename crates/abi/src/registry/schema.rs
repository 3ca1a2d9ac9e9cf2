//! Serde mirror of the ABI JSON document.

use serde::{Deserialize, Serialize};

use crate::{error::Error, types::NamedType};

fn default_entry_type() -> String {
    "function".to_string()
}

/// One element of the top-level ABI JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    /// `constructor`, `function`, `event`, `error`, `fallback` or `receive`. Defaults to
    /// `function` when absent
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: String,
    /// The function or event name
    #[serde(default)]
    pub name: String,
    /// The declared inputs
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    /// The declared outputs
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    /// `pure`, `view`, `nonpayable` or `payable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// The legacy `constant` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    /// The legacy `payable` flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    /// Whether the event omits its signature topic
    #[serde(default)]
    pub anonymous: bool,
}

/// A declared parameter of an [`AbiEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AbiParam {
    /// The parameter name. May be empty
    #[serde(default)]
    pub name: String,
    /// The type string. I.e. `uint256[]`, `tuple[2]`
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether this is an indexed event parameter
    #[serde(default)]
    pub indexed: bool,
    /// The components of a `tuple` type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<AbiParam>>,
    /// The compiler's source-level type, carried through untouched
    #[serde(rename = "internalType", default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
}

impl AbiParam {
    /// Parses this parameter, and its components recursively, into a [`NamedType`].
    pub fn to_named_type(&self) -> Result<NamedType, Error> {
        let components = self
            .components
            .as_ref()
            .map(|components| {
                components.iter().map(AbiParam::to_named_type).collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        NamedType::parse(self.name.clone(), &self.ty, components, self.indexed)
            .map_err(|e| match e {
                Error::MalformedAbiDefinition(message) => Error::MalformedAbiDefinition(format!(
                    "parameter '{}': {message}",
                    self.name
                )),
                other => other,
            })
    }

    /// Renders a [`NamedType`] back into its JSON form.
    pub fn from_named_type(param: &NamedType) -> Self {
        Self {
            name: param.name.clone(),
            ty: param.ty.abi_type(),
            indexed: param.indexed,
            components: param
                .components()
                .map(|components| components.iter().map(AbiParam::from_named_type).collect()),
            internal_type: None,
        }
    }
}

/// Parses a list of JSON parameters.
pub fn parse_params(params: &[AbiParam]) -> Result<Vec<NamedType>, Error> {
    params.iter().map(AbiParam::to_named_type).collect()
}
