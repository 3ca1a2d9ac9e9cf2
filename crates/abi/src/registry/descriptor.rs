use std::fmt;

use alloy::primitives::{Selector, B256};
use serde_json::Value;

use super::schema::AbiEntry;
use crate::{
    codec::{decode_params, encode_params},
    error::Error,
    object::{template_for, template_for_params, AbiObject, AbiValue},
    selector::{event_topic_with, method_id_with, signature, Keccak256, SignatureHasher},
    types::{parse_event_signature, parse_signature, NamedType},
};

/// How a function interacts with chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateMutability {
    /// Reads nothing, writes nothing
    Pure,
    /// Reads state
    View,
    /// Writes state, rejects value transfers
    NonPayable,
    /// Writes state, accepts value transfers
    Payable,
}

impl StateMutability {
    /// Resolves the mutability of an entry, falling back to the legacy `constant` /
    /// `payable` flags when `stateMutability` is absent.
    pub fn from_entry(entry: &AbiEntry) -> Result<Self, Error> {
        match entry.state_mutability.as_deref() {
            Some("pure") => Ok(StateMutability::Pure),
            Some("view") => Ok(StateMutability::View),
            Some("nonpayable") => Ok(StateMutability::NonPayable),
            Some("payable") => Ok(StateMutability::Payable),
            Some(other) => Err(Error::MalformedAbiDefinition(format!(
                "unknown stateMutability '{other}' on '{}'",
                entry.name
            ))),
            None if entry.constant == Some(true) => Ok(StateMutability::View),
            None if entry.payable == Some(true) => Ok(StateMutability::Payable),
            None => Ok(StateMutability::NonPayable),
        }
    }
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StateMutability::Pure => "pure",
            StateMutability::View => "view",
            StateMutability::NonPayable => "nonpayable",
            StateMutability::Payable => "payable",
        })
    }
}

/// A callable function or constructor, with its selector and templates precomputed.
#[derive(Debug, Clone)]
pub struct FunctionDescriptor {
    name: String,
    inputs: Vec<NamedType>,
    outputs: Vec<NamedType>,
    mutability: StateMutability,
    signature: String,
    selector: Selector,
    input_template: AbiObject,
    output_template: AbiObject,
}

impl FunctionDescriptor {
    /// Builds a descriptor, hashing its signature with `hasher`.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<NamedType>,
        outputs: Vec<NamedType>,
        mutability: StateMutability,
        hasher: &dyn SignatureHasher,
    ) -> Self {
        let name = name.into();
        let signature = signature(&name, &inputs);
        let selector = method_id_with(hasher, &signature);
        let input_template = template_for_params(&inputs);
        let output_template = template_for_params(&outputs);

        Self {
            name,
            inputs,
            outputs,
            mutability,
            signature,
            selector,
            input_template,
            output_template,
        }
    }

    /// Builds the descriptor of a constructor. Constructors have no selector of their own;
    /// the one derived from `constructor(...)` is never put on the wire.
    pub fn constructor(
        inputs: Vec<NamedType>,
        mutability: StateMutability,
        hasher: &dyn SignatureHasher,
    ) -> Self {
        Self::new("constructor", inputs, Vec::new(), mutability, hasher)
    }

    /// Builds a nonpayable descriptor with no outputs from signature text, i.e.
    /// `transfer(address,uint256)`.
    pub fn from_signature(signature: &str) -> Result<Self, Error> {
        let (name, inputs) = parse_signature(signature)?;
        Ok(Self::new(name, inputs, Vec::new(), StateMutability::NonPayable, &Keccak256))
    }

    /// The function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared inputs.
    pub fn inputs(&self) -> &[NamedType] {
        &self.inputs
    }

    /// The declared outputs.
    pub fn outputs(&self) -> &[NamedType] {
        &self.outputs
    }

    /// The state mutability.
    pub fn mutability(&self) -> StateMutability {
        self.mutability
    }

    /// The canonical signature. I.e. `transfer(address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The 4-byte method ID.
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// A fresh instance of the argument tuple.
    pub fn input_instance(&self) -> AbiObject {
        self.input_template.instantiate()
    }

    /// A fresh instance of the return tuple.
    pub fn output_instance(&self) -> AbiObject {
        self.output_template.instantiate()
    }

    /// Encodes the argument tuple, without the selector.
    pub fn encode_params(&self, args: &[AbiValue]) -> Result<Vec<u8>, Error> {
        self.check_arity(args.len())?;
        let mut instance = self.input_instance();
        for (index, arg) in args.iter().enumerate() {
            instance.field_mut(index)?.fill(arg)?;
        }

        encode_params(&instance)
    }

    /// Encodes the argument tuple from JSON values, without the selector.
    pub fn encode_params_json(&self, args: &[Value]) -> Result<Vec<u8>, Error> {
        self.check_arity(args.len())?;
        let mut instance = self.input_instance();
        for (index, arg) in args.iter().enumerate() {
            instance.field_mut(index)?.fill_from_json(arg)?;
        }

        encode_params(&instance)
    }

    /// Encodes full call data: the selector followed by the argument tuple.
    pub fn encode_input(&self, args: &[AbiValue]) -> Result<Vec<u8>, Error> {
        Ok([self.selector.as_slice(), &self.encode_params(args)?].concat())
    }

    /// Encodes full call data from JSON values.
    pub fn encode_input_json(&self, args: &[Value]) -> Result<Vec<u8>, Error> {
        Ok([self.selector.as_slice(), &self.encode_params_json(args)?].concat())
    }

    /// Decodes full call data, checking that it starts with this function's selector.
    pub fn decode_input(&self, calldata: &[u8]) -> Result<AbiObject, Error> {
        let prefix = calldata.get(..4).ok_or_else(|| Error::truncated(0, 4, calldata.len()))?;
        if prefix != self.selector.as_slice() {
            return Err(Error::UnknownSelector(Selector::from_slice(prefix)));
        }

        self.decode_params(&calldata[4..])
    }

    /// Decodes an argument tuple with no selector prefix, i.e. constructor arguments.
    pub fn decode_params(&self, data: &[u8]) -> Result<AbiObject, Error> {
        decode_params(&self.input_template, data)
    }

    /// Decodes return data.
    pub fn decode_output(&self, data: &[u8]) -> Result<AbiObject, Error> {
        decode_params(&self.output_template, data)
    }

    fn check_arity(&self, actual: usize) -> Result<(), Error> {
        if actual != self.inputs.len() {
            return Err(Error::ArityMismatch { expected: self.inputs.len(), actual });
        }
        Ok(())
    }
}

/// An event, with its topic and data template precomputed.
#[derive(Debug, Clone)]
pub struct EventDescriptor {
    name: String,
    inputs: Vec<NamedType>,
    anonymous: bool,
    signature: String,
    topic: B256,
    data_template: AbiObject,
}

/// The value of one event parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValue {
    /// A value read from the data field, or from the topic of an indexed value type
    Decoded(AbiObject),
    /// An indexed reference type, of which only the hash is logged
    Hashed(B256),
}

/// One parameter of a decoded event, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEventParam {
    /// The declared name
    pub name: String,
    /// The canonical type string
    pub ty: String,
    /// Whether the parameter was read from a topic
    pub indexed: bool,
    /// The value
    pub value: EventValue,
}

/// A decoded event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// The event name
    pub name: String,
    /// The canonical signature
    pub signature: String,
    /// The parameters, indexed and non-indexed merged in declaration order
    pub params: Vec<DecodedEventParam>,
}

impl EventDescriptor {
    /// Builds a descriptor, hashing its signature with `hasher`.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<NamedType>,
        anonymous: bool,
        hasher: &dyn SignatureHasher,
    ) -> Self {
        let name = name.into();
        let signature = signature(&name, &inputs);
        let topic = event_topic_with(hasher, &signature);
        let data_params = inputs.iter().filter(|p| !p.indexed).cloned().collect::<Vec<_>>();
        let data_template = template_for_params(&data_params);

        Self { name, inputs, anonymous, signature, topic, data_template }
    }

    /// Builds a non-anonymous descriptor from signature text with `indexed` markers, i.e.
    /// `Transfer(address indexed,address indexed,uint256)`.
    pub fn from_signature(signature: &str) -> Result<Self, Error> {
        let (name, inputs) = parse_event_signature(signature)?;
        Ok(Self::new(name, inputs, false, &Keccak256))
    }

    /// The event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared inputs, indexed or not.
    pub fn inputs(&self) -> &[NamedType] {
        &self.inputs
    }

    /// Whether the event omits its signature topic.
    pub fn anonymous(&self) -> bool {
        self.anonymous
    }

    /// The canonical signature. I.e. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The 32-byte topic.
    pub fn topic(&self) -> B256 {
        self.topic
    }

    /// Decodes a log. `topics` must hold the signature topic (unless the event is anonymous)
    /// followed by one word per indexed parameter.
    pub fn decode_log(&self, topics: &[B256], data: &[u8]) -> Result<DecodedEvent, Error> {
        let indexed_count = self.inputs.iter().filter(|p| p.indexed).count();
        let expected = indexed_count + usize::from(!self.anonymous);
        if topics.len() != expected {
            return Err(Error::ArityMismatch { expected, actual: topics.len() });
        }

        let mut indexed_topics = topics.iter();
        if !self.anonymous {
            if let Some(topic) = indexed_topics.next() {
                if *topic != self.topic {
                    return Err(Error::UnknownEventTopic(*topic));
                }
            }
        }

        let mut data_fields = decode_params(&self.data_template, data)?.into_children().into_iter();
        let mut params = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let value = if input.indexed {
                let topic = indexed_topics
                    .next()
                    .ok_or(Error::ArityMismatch { expected, actual: topics.len() })?;
                if input.ty.is_value_type() {
                    EventValue::Decoded(decode_params(&template_for(input), topic.as_slice())?)
                } else {
                    EventValue::Hashed(*topic)
                }
            } else {
                EventValue::Decoded(data_fields.next().ok_or(Error::ArityMismatch {
                    expected: self.inputs.len(),
                    actual: params.len(),
                })?)
            };

            params.push(DecodedEventParam {
                name: input.name.clone(),
                ty: input.ty.canonical(),
                indexed: input.indexed,
                value,
            });
        }

        Ok(DecodedEvent { name: self.name.clone(), signature: self.signature.clone(), params })
    }
}
