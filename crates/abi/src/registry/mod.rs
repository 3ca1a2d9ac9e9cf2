//! The contract registry: an immutable index of a contract's functions and events, built
//! once from its ABI JSON and shared across calls.

mod descriptor;
pub mod schema;

use std::sync::Arc;

use alloy::primitives::{Selector, B256};
use hashbrown::HashMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

pub use descriptor::{
    DecodedEvent, DecodedEventParam, EventDescriptor, EventValue, FunctionDescriptor,
    StateMutability,
};
use schema::{parse_params, AbiEntry};

use crate::{
    error::Error,
    object::{AbiObject, AbiValue},
    selector::{signature as canonical_signature, Keccak256, SignatureHasher},
    types::parse_signature,
};

/// A parsed contract ABI.
///
/// Descriptors are reference-counted so a `ContractAbi` is cheap to clone and can be shared
/// across threads. To reload an ABI, build a new instance and swap the reference.
#[derive(Debug, Clone)]
pub struct ContractAbi {
    constructor: Arc<FunctionDescriptor>,
    functions: HashMap<String, Vec<Arc<FunctionDescriptor>>>,
    events: HashMap<String, Vec<Arc<EventDescriptor>>>,
    selectors: HashMap<Selector, Arc<FunctionDescriptor>>,
    topics: HashMap<B256, Arc<EventDescriptor>>,
    function_order: Vec<Arc<FunctionDescriptor>>,
    event_order: Vec<Arc<EventDescriptor>>,
    has_fallback: bool,
    has_receive: bool,
}

impl ContractAbi {
    /// Parses an ABI JSON document, hashing signatures with Keccak-256.
    ///
    /// ```
    /// use mimir_abi::ContractAbi;
    ///
    /// let abi = ContractAbi::from_json_str(
    ///     r#"[{
    ///         "type": "function",
    ///         "name": "transfer",
    ///         "inputs": [
    ///             {"name": "to", "type": "address"},
    ///             {"name": "amount", "type": "uint256"}
    ///         ],
    ///         "outputs": [{"type": "bool"}],
    ///         "stateMutability": "nonpayable"
    ///     }]"#,
    /// )
    /// .expect("failed to parse abi");
    /// let transfer = abi.function("transfer").expect("transfer is declared");
    /// assert_eq!(transfer[0].selector().to_string(), "0xa9059cbb");
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Self::from_json_str_with_hasher(json, &Keccak256)
    }

    /// Parses an ABI JSON document, hashing signatures with `hasher`.
    pub fn from_json_str_with_hasher(
        json: &str,
        hasher: &dyn SignatureHasher,
    ) -> Result<Self, Error> {
        let entries: Vec<AbiEntry> = serde_json::from_str(json)?;
        Self::from_entries(&entries, hasher)
    }

    /// Builds the registry from already-deserialized entries.
    pub fn from_entries(entries: &[AbiEntry], hasher: &dyn SignatureHasher) -> Result<Self, Error> {
        let mut constructor = None;
        let mut functions: HashMap<String, Vec<Arc<FunctionDescriptor>>> = HashMap::new();
        let mut events: HashMap<String, Vec<Arc<EventDescriptor>>> = HashMap::new();
        let mut selectors = HashMap::new();
        let mut topics = HashMap::new();
        let mut function_order = Vec::new();
        let mut event_order = Vec::new();
        let mut has_fallback = false;
        let mut has_receive = false;

        for entry in entries {
            match entry.entry_type.as_str() {
                "constructor" => {
                    if constructor.is_some() {
                        warn!("abi declares more than one constructor, keeping the last");
                    }
                    constructor = Some(Arc::new(FunctionDescriptor::constructor(
                        parse_params(&entry.inputs)?,
                        StateMutability::from_entry(entry)?,
                        hasher,
                    )));
                }
                "function" => {
                    let descriptor = Arc::new(FunctionDescriptor::new(
                        entry.name.clone(),
                        parse_params(&entry.inputs)?,
                        parse_params(&entry.outputs)?,
                        StateMutability::from_entry(entry)?,
                        hasher,
                    ));
                    trace!(
                        "indexed function {} as {}",
                        descriptor.signature(),
                        descriptor.selector()
                    );

                    if let Some(previous) =
                        selectors.insert(descriptor.selector(), descriptor.clone())
                    {
                        warn!(
                            "selector collision on {}: '{}' replaces '{}'",
                            descriptor.selector(),
                            descriptor.signature(),
                            previous.signature()
                        );
                    }
                    functions.entry(entry.name.clone()).or_default().push(descriptor.clone());
                    function_order.push(descriptor);
                }
                "event" => {
                    let descriptor = Arc::new(EventDescriptor::new(
                        entry.name.clone(),
                        parse_params(&entry.inputs)?,
                        entry.anonymous,
                        hasher,
                    ));
                    trace!("indexed event {} as {}", descriptor.signature(), descriptor.topic());

                    // anonymous events carry no signature topic to look them up by
                    if !descriptor.anonymous() {
                        if let Some(previous) =
                            topics.insert(descriptor.topic(), descriptor.clone())
                        {
                            warn!(
                                "event topic collision on {}: '{}' replaces '{}'",
                                descriptor.topic(),
                                descriptor.signature(),
                                previous.signature()
                            );
                        }
                    }
                    events.entry(entry.name.clone()).or_default().push(descriptor.clone());
                    event_order.push(descriptor);
                }
                "fallback" => has_fallback = true,
                "receive" => has_receive = true,
                other => debug!("ignoring abi entry '{}' of type '{}'", entry.name, other),
            }
        }

        let constructor = match constructor {
            Some(constructor) => constructor,
            None => {
                debug!("abi declares no constructor, using the default");
                Arc::new(FunctionDescriptor::constructor(
                    Vec::new(),
                    StateMutability::NonPayable,
                    hasher,
                ))
            }
        };

        debug!(
            "built contract abi with {} functions and {} events",
            function_order.len(),
            event_order.len()
        );

        Ok(Self {
            constructor,
            functions,
            events,
            selectors,
            topics,
            function_order,
            event_order,
            has_fallback,
            has_receive,
        })
    }

    /// The constructor, or a no-argument default if the ABI declares none.
    pub fn constructor(&self) -> &FunctionDescriptor {
        &self.constructor
    }

    /// Every function, in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.function_order.iter().map(Arc::as_ref)
    }

    /// Every event, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.event_order.iter().map(Arc::as_ref)
    }

    /// The overloads of a function, in declaration order.
    pub fn function(&self, name: &str) -> Option<&[Arc<FunctionDescriptor>]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// The overloads of an event, in declaration order.
    pub fn event(&self, name: &str) -> Option<&[Arc<EventDescriptor>]> {
        self.events.get(name).map(Vec::as_slice)
    }

    /// The function a selector routes to.
    pub fn function_by_selector(&self, selector: &Selector) -> Option<&FunctionDescriptor> {
        self.selectors.get(selector).map(Arc::as_ref)
    }

    /// The overload whose canonical signature matches `signature`, i.e.
    /// `transfer(address, uint256)`. Fails if the text is not a valid signature.
    pub fn function_by_signature(&self, signature: &str) -> Result<&FunctionDescriptor, Error> {
        let (name, params) = parse_signature(signature)?;
        let canonical = canonical_signature(&name, &params);
        self.function(&name)
            .and_then(|overloads| overloads.iter().find(|f| f.signature() == canonical))
            .map(Arc::as_ref)
            .ok_or(Error::UnknownFunction(canonical))
    }

    /// The event a topic identifies.
    pub fn event_by_topic(&self, topic: &B256) -> Option<&EventDescriptor> {
        self.topics.get(topic).map(Arc::as_ref)
    }

    /// Whether the ABI declares a fallback function.
    pub fn has_fallback(&self) -> bool {
        self.has_fallback
    }

    /// Whether the ABI declares a receive function.
    pub fn has_receive(&self) -> bool {
        self.has_receive
    }

    /// Encodes call data for the function `name`. Overloads with the same number of
    /// parameters are tried in declaration order and the first that accepts `args` wins.
    pub fn encode_call(&self, name: &str, args: &[AbiValue]) -> Result<Vec<u8>, Error> {
        self.resolve_overload(name, args.len(), |descriptor| descriptor.encode_input(args))
    }

    /// Encodes call data for the function `name` from JSON arguments, resolving overloads
    /// as [`ContractAbi::encode_call`] does.
    pub fn encode_call_json(&self, name: &str, args: &[Value]) -> Result<Vec<u8>, Error> {
        self.resolve_overload(name, args.len(), |descriptor| descriptor.encode_input_json(args))
    }

    /// Encodes constructor arguments. The caller prepends the deployment bytecode.
    pub fn encode_constructor(&self, args: &[AbiValue]) -> Result<Vec<u8>, Error> {
        self.constructor.encode_params(args)
    }

    /// Encodes constructor arguments from JSON values.
    pub fn encode_constructor_json(&self, args: &[Value]) -> Result<Vec<u8>, Error> {
        self.constructor.encode_params_json(args)
    }

    /// Decodes call data, routing on its 4-byte selector.
    pub fn decode_call(&self, calldata: &[u8]) -> Result<(&FunctionDescriptor, AbiObject), Error> {
        let prefix = calldata.get(..4).ok_or_else(|| Error::truncated(0, 4, calldata.len()))?;
        let selector = Selector::from_slice(prefix);
        let descriptor =
            self.function_by_selector(&selector).ok_or(Error::UnknownSelector(selector))?;
        trace!("routing {} to {}", selector, descriptor.signature());

        Ok((descriptor, descriptor.decode_params(&calldata[4..])?))
    }

    /// Decodes the return data of the function `name`, using its first declared overload.
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<AbiObject, Error> {
        let descriptor = self
            .function(name)
            .and_then(<[_]>::first)
            .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        descriptor.decode_output(data)
    }

    /// Decodes an event log, identifying the event by its first topic.
    pub fn decode_log(&self, topics: &[B256], data: &[u8]) -> Result<DecodedEvent, Error> {
        let topic = topics.first().ok_or(Error::ArityMismatch { expected: 1, actual: 0 })?;
        let descriptor = self.event_by_topic(topic).ok_or(Error::UnknownEventTopic(*topic))?;
        descriptor.decode_log(topics, data)
    }

    /// Decodes an event log as the named event. This is the only way to decode anonymous
    /// events. Overloads are tried in declaration order.
    pub fn decode_log_as(
        &self,
        name: &str,
        topics: &[B256],
        data: &[u8],
    ) -> Result<DecodedEvent, Error> {
        let candidates = self.event(name).ok_or_else(|| Error::UnknownEvent(name.to_string()))?;
        first_success(name, candidates, |descriptor| descriptor.decode_log(topics, data))
    }

    fn resolve_overload<T>(
        &self,
        name: &str,
        arity: usize,
        attempt: impl FnMut(&FunctionDescriptor) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let overloads =
            self.function(name).ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
        let candidates = overloads
            .iter()
            .filter(|descriptor| descriptor.inputs().len() == arity)
            .cloned()
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            return Err(Error::ArityMismatch {
                expected: overloads[0].inputs().len(),
                actual: arity,
            });
        }

        first_success(name, &candidates, attempt)
    }
}

/// Tries each candidate in order, returning the first success. A lone candidate reports its
/// own error; otherwise only the last error is kept in the summary.
fn first_success<D, T>(
    name: &str,
    candidates: &[Arc<D>],
    mut attempt: impl FnMut(&D) -> Result<T, Error>,
) -> Result<T, Error> {
    if let [only] = candidates {
        return attempt(&**only);
    }

    let mut last = None;
    for candidate in candidates {
        match attempt(&**candidate) {
            Ok(result) => return Ok(result),
            Err(e) => last = Some(e),
        }
    }

    Err(Error::NoMatchingOverload {
        name: name.to_string(),
        tried: candidates.len(),
        last: last.map(|e| e.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{I256, U256};

    use super::*;
    use crate::object::ScalarValue;

    const OVERLOADED_ABI: &str = r#"[
        {
            "type":"function",
            "name":"f",
            "inputs":[{"name":"a","type":"uint256"}],
            "outputs":[],
            "stateMutability":"nonpayable"
        },
        {
            "type":"function",
            "name":"f",
            "inputs":[{"name":"a","type":"int256"}],
            "outputs":[],
            "stateMutability":"nonpayable"
        },
        {
            "type":"function",
            "name":"f",
            "inputs":[{"name":"a","type":"uint256"},{"name":"b","type":"bool"}],
            "outputs":[],
            "stateMutability":"nonpayable"
        },
        {"type":"fallback"},
        {"type":"error","name":"Oops","inputs":[]}
    ]"#;

    #[test]
    fn test_default_constructor_is_synthesized() {
        let abi = ContractAbi::from_json_str("[]").expect("failed to parse abi");
        assert!(abi.constructor().inputs().is_empty());
        assert_eq!(abi.encode_constructor(&[]).expect("failed to encode"), Vec::<u8>::new());
    }

    #[test]
    fn test_declared_constructor() {
        let abi = ContractAbi::from_json_str(
            r#"[{
                "type":"constructor",
                "inputs":[{"name":"owner","type":"address"}],
                "stateMutability":"payable"
            }]"#,
        )
        .expect("failed to parse abi");
        assert_eq!(abi.constructor().inputs().len(), 1);
        assert_eq!(abi.constructor().mutability(), StateMutability::Payable);
    }

    #[test]
    fn test_overloads_coexist() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");
        assert_eq!(abi.function("f").map(<[_]>::len), Some(3));
        assert_eq!(abi.functions().count(), 3);
        assert!(abi.has_fallback());
        assert!(!abi.has_receive());
        assert!(abi.function("Oops").is_none());
    }

    #[test]
    fn test_function_by_signature() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");

        let f = abi.function_by_signature("f(uint256, bool)").expect("overload exists");
        assert_eq!(f.inputs().len(), 2);
        assert!(matches!(
            abi.function_by_signature("f(bool)"),
            Err(Error::UnknownFunction(signature)) if signature == "f(bool)"
        ));
        assert!(abi.function_by_signature("f").is_err());
    }

    #[test]
    fn test_overload_resolution_picks_first_compatible() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");

        let calldata = abi.encode_call("f", &[AbiValue::from(5u64)]).expect("failed to encode");
        assert_eq!(&calldata[..4], crate::selector::method_id("f(uint256)").as_slice());

        // a negative value is rejected by f(uint256) and falls through to f(int256)
        let calldata = abi.encode_call("f", &[AbiValue::from(-1i64)]).expect("failed to encode");
        assert_eq!(&calldata[..4], crate::selector::method_id("f(int256)").as_slice());

        let calldata = abi
            .encode_call("f", &[AbiValue::from(5u64), AbiValue::from(true)])
            .expect("failed to encode");
        assert_eq!(&calldata[..4], crate::selector::method_id("f(uint256,bool)").as_slice());
    }

    #[test]
    fn test_overload_resolution_masks_structurally_compatible_overload() {
        let abi = ContractAbi::from_json_str(
            r#"[
                {"type":"function","name":"f","inputs":[{"name":"a","type":"int256"}]},
                {"type":"function","name":"f","inputs":[{"name":"a","type":"uint256"}]}
            ]"#,
        )
        .expect("failed to parse abi");

        // an unsigned value fits int256, so the first declared overload wins even though
        // f(uint256) is the closer match
        let calldata = abi.encode_call("f", &[AbiValue::from(5u64)]).expect("failed to encode");
        assert_eq!(&calldata[..4], crate::selector::method_id("f(int256)").as_slice());
    }

    #[test]
    fn test_overload_resolution_reports_single_summary() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");
        let err = abi
            .encode_call("f", &[AbiValue::from("text")])
            .expect_err("no overload accepts a string");
        assert!(matches!(err, Error::NoMatchingOverload { tried: 2, .. }));
    }

    #[test]
    fn test_single_candidate_reports_own_error() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");
        let err = abi
            .encode_call("f", &[AbiValue::from("text"), AbiValue::from(true)])
            .expect_err("f(uint256,bool) rejects a string");
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_function_and_arity() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");
        assert!(matches!(abi.encode_call("g", &[]), Err(Error::UnknownFunction(_))));
        assert!(matches!(abi.encode_call("f", &[]), Err(Error::ArityMismatch { .. })));
    }

    #[test]
    fn test_decode_call_routes_by_selector() {
        let abi = ContractAbi::from_json_str(OVERLOADED_ABI).expect("failed to parse abi");
        let calldata = abi.encode_call("f", &[AbiValue::from(-7i64)]).expect("failed to encode");

        let (descriptor, args) = abi.decode_call(&calldata).expect("failed to decode");
        assert_eq!(descriptor.signature(), "f(int256)");
        let expected = -I256::from_raw(U256::from(7));
        assert_eq!(args.children()[0].value(), Some(&ScalarValue::Int(expected)));

        assert!(matches!(abi.decode_call(&[0, 0, 0, 0]), Err(Error::UnknownSelector(_))));
    }

    #[test]
    fn test_selector_collision_last_writer_wins() {
        #[derive(Debug)]
        struct ConstantHasher;

        impl SignatureHasher for ConstantHasher {
            fn hash(&self, _input: &[u8]) -> B256 {
                B256::repeat_byte(0xab)
            }
        }

        let abi = ContractAbi::from_json_str_with_hasher(
            r#"[
                {"type":"function","name":"first","inputs":[]},
                {"type":"function","name":"second","inputs":[]}
            ]"#,
            &ConstantHasher,
        )
        .expect("failed to parse abi");

        let selector = Selector::repeat_byte(0xab);
        assert_eq!(
            abi.function_by_selector(&selector).map(|f| f.name().to_string()),
            Some("second".to_string())
        );
        assert!(abi.function("first").is_some());
    }

    #[test]
    fn test_malformed_abi() {
        assert!(matches!(ContractAbi::from_json_str("{"), Err(Error::Json(_))));
        assert!(matches!(
            ContractAbi::from_json_str(
                r#"[{"type":"function","name":"f","inputs":[{"name":"a","type":"uint7"}]}]"#
            ),
            Err(Error::MalformedAbiDefinition(_))
        ));
    }

    #[test]
    fn test_decode_log_as_anonymous() {
        let abi = ContractAbi::from_json_str(
            r#"[{
                "type":"event",
                "name":"Ping",
                "anonymous":true,
                "inputs":[{"name":"n","type":"uint256","indexed":true}]
            }]"#,
        )
        .expect("failed to parse abi");

        let topic = B256::with_last_byte(9);
        assert!(matches!(abi.decode_log(&[topic], &[]), Err(Error::UnknownEventTopic(_))));

        let event = abi.decode_log_as("Ping", &[topic], &[]).expect("failed to decode log");
        assert_eq!(event.params[0].name, "n");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_across_threads() {
        assert_send_sync::<ContractAbi>();

        let abi = ContractAbi::from_json_str(
            r#"[{
                "type":"function",
                "name":"set",
                "inputs":[{"name":"n","type":"uint256"},{"name":"s","type":"string"}],
                "outputs":[],
                "stateMutability":"nonpayable"
            }]"#,
        )
        .expect("failed to parse abi");

        std::thread::scope(|scope| {
            for n in 0..4u64 {
                let abi = &abi;
                scope.spawn(move || {
                    let args = [AbiValue::from(n), AbiValue::from("shared")];
                    let calldata = abi.encode_call("set", &args).expect("failed to encode");
                    let (function, decoded) = abi.decode_call(&calldata).expect("failed to decode");
                    assert_eq!(function.name(), "set");
                    assert_eq!(decoded.to_value(), AbiValue::Tuple(args.to_vec()));
                });
            }
        });
    }
}
