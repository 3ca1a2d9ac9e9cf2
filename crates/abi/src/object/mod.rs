//! The value tree: an owned, mutable mirror of a [`CanonicalType`].
//!
//! Templates are built once per declared parameter list and never mutated. Every encode or
//! decode works on a fresh instance produced by [`AbiObject::instantiate`].

mod value;

use alloy::primitives::{Address, I256, U256};

pub use value::AbiValue;

use crate::{
    codec::scalar,
    error::Error,
    types::{BaseType, CanonicalType, NamedType, ScalarKind},
};

/// The leaf kinds a [`ScalarNode`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `bool`
    Bool,
    /// `intN`, with the bit width
    Int(usize),
    /// `uintN`, with the bit width
    Uint(usize),
    /// `address`
    Address,
    /// `bytesN`, with the byte length
    FixedBytes(usize),
    /// `bytes`
    DynamicBytes,
    /// `string`
    String,
}

impl ValueKind {
    /// Whether values of this kind are length-prefixed on the wire.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, ValueKind::DynamicBytes | ValueKind::String)
    }

    /// The canonical type string of this kind. I.e. `uint256`
    pub fn type_string(&self) -> String {
        match self {
            ValueKind::Bool => "bool".to_string(),
            ValueKind::Int(bits) => format!("int{bits}"),
            ValueKind::Uint(bits) => format!("uint{bits}"),
            ValueKind::Address => "address".to_string(),
            ValueKind::FixedBytes(size) => format!("bytes{size}"),
            ValueKind::DynamicBytes => "bytes".to_string(),
            ValueKind::String => "string".to_string(),
        }
    }

    /// The zero value of this kind.
    pub fn zero_value(&self) -> ScalarValue {
        match self {
            ValueKind::Bool => ScalarValue::Bool(false),
            ValueKind::Int(_) => ScalarValue::Int(I256::ZERO),
            ValueKind::Uint(_) => ScalarValue::Uint(U256::ZERO),
            ValueKind::Address => ScalarValue::Address(Address::ZERO),
            ValueKind::FixedBytes(size) => ScalarValue::Bytes(vec![0u8; *size]),
            ValueKind::DynamicBytes => ScalarValue::Bytes(Vec::new()),
            ValueKind::String => ScalarValue::String(String::new()),
        }
    }

    fn from_base(base: &BaseType) -> Option<Self> {
        match base {
            BaseType::Scalar(ScalarKind::Bool) => Some(ValueKind::Bool),
            BaseType::Scalar(ScalarKind::Int(bits)) => Some(ValueKind::Int(*bits)),
            BaseType::Scalar(ScalarKind::Uint(bits)) => Some(ValueKind::Uint(*bits)),
            BaseType::Scalar(ScalarKind::Address) => Some(ValueKind::Address),
            BaseType::FixedBytes(size) => Some(ValueKind::FixedBytes(*size)),
            BaseType::DynamicBytes => Some(ValueKind::DynamicBytes),
            BaseType::Utf8String => Some(ValueKind::String),
            BaseType::Tuple(_) => None,
        }
    }
}

/// The payload of a [`ScalarNode`]. Fixed and dynamic byte strings share [`ScalarValue::Bytes`];
/// the node's [`ValueKind`] tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    /// A boolean
    Bool(bool),
    /// A signed integer
    Int(I256),
    /// An unsigned integer
    Uint(U256),
    /// A 20-byte address
    Address(Address),
    /// A byte string
    Bytes(Vec<u8>),
    /// A UTF-8 string
    String(String),
}

impl ScalarValue {
    /// A short description of the payload's shape, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            ScalarValue::Bool(_) => "bool",
            ScalarValue::Int(_) => "signed integer",
            ScalarValue::Uint(_) => "unsigned integer",
            ScalarValue::Address(_) => "address",
            ScalarValue::Bytes(_) => "bytes",
            ScalarValue::String(_) => "string",
        }
    }
}

/// The length rule of a [`ListNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    /// `T[n]`: exactly `n` elements, with `n` taken from the type
    Fixed(usize),
    /// `T[]`: any number of elements, count-prefixed on the wire
    Dynamic,
}

/// A single-value leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    pub(crate) kind: ValueKind,
    pub(crate) value: ScalarValue,
}

impl ScalarNode {
    /// The leaf kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The current payload.
    pub fn value(&self) -> &ScalarValue {
        &self.value
    }
}

/// An array of identically-shaped elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    pub(crate) element: Box<AbiObject>,
    pub(crate) mode: LengthMode,
    pub(crate) elements: Vec<AbiObject>,
    pub(crate) dynamic: bool,
}

impl ListNode {
    /// The template every element is instantiated from.
    pub fn element_template(&self) -> &AbiObject {
        &self.element
    }

    /// The length rule.
    pub fn mode(&self) -> LengthMode {
        self.mode
    }

    /// The current elements.
    pub fn elements(&self) -> &[AbiObject] {
        &self.elements
    }

    fn type_string(&self) -> String {
        match self.mode {
            LengthMode::Fixed(size) => format!("{}[{size}]", self.element.type_string()),
            LengthMode::Dynamic => format!("{}[]", self.element.type_string()),
        }
    }

    fn replace_elements(&mut self, elements: Vec<AbiObject>) -> Result<(), Error> {
        if let LengthMode::Fixed(size) = self.mode {
            if elements.len() != size {
                return Err(Error::ArityMismatch { expected: size, actual: elements.len() });
            }
        }

        let expected = self.element.type_string();
        if let Some(bad) = elements.iter().find(|e| e.type_string() != expected) {
            return Err(Error::type_mismatch(expected, bad.type_string()));
        }

        self.dynamic = self.mode == LengthMode::Dynamic ||
            self.element.is_dynamic() ||
            elements.iter().any(AbiObject::is_dynamic);
        self.elements = elements;
        Ok(())
    }
}

/// An ordered set of named, heterogeneously-typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructNode {
    pub(crate) names: Vec<String>,
    pub(crate) fields: Vec<AbiObject>,
    pub(crate) dynamic: bool,
}

impl StructNode {
    /// The field names, in declaration order. Unnamed fields are empty strings.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The fields, in declaration order.
    pub fn fields(&self) -> &[AbiObject] {
        &self.fields
    }

    fn type_string(&self) -> String {
        let fields = self.fields.iter().map(AbiObject::type_string).collect::<Vec<_>>();
        format!("({})", fields.join(","))
    }
}

/// A node of the value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiObject {
    /// A leaf value
    Scalar(ScalarNode),
    /// An array
    List(ListNode),
    /// A tuple
    Struct(StructNode),
}

/// Builds the zero-valued template for a declared parameter.
pub fn template_for(named: &NamedType) -> AbiObject {
    template_for_type(&named.ty)
}

/// Builds the template for a parameter list, as a [`AbiObject::Struct`] with one field per
/// parameter. This is the shape of a call's argument tuple or a function's return tuple.
pub fn template_for_params(params: &[NamedType]) -> AbiObject {
    AbiObject::new_struct(
        params.iter().map(|p| p.name.clone()).collect(),
        params.iter().map(template_for).collect(),
    )
}

/// Builds the zero-valued template for a type.
pub fn template_for_type(ty: &CanonicalType) -> AbiObject {
    if let Some(element) = ty.element_type() {
        let mode = match ty.dimensions().last() {
            Some(Some(size)) => LengthMode::Fixed(*size),
            _ => LengthMode::Dynamic,
        };
        return AbiObject::new_list(template_for_type(&element), mode, Vec::new());
    }

    match ValueKind::from_base(ty.base()) {
        Some(kind) => AbiObject::new_scalar(kind, kind.zero_value()),
        None => template_for_params(ty.components().unwrap_or_default()),
    }
}

impl AbiObject {
    pub(crate) fn new_scalar(kind: ValueKind, value: ScalarValue) -> Self {
        AbiObject::Scalar(ScalarNode { kind, value })
    }

    pub(crate) fn new_list(element: AbiObject, mode: LengthMode, elements: Vec<AbiObject>) -> Self {
        let dynamic = mode == LengthMode::Dynamic ||
            element.is_dynamic() ||
            elements.iter().any(AbiObject::is_dynamic);
        AbiObject::List(ListNode { element: Box::new(element), mode, elements, dynamic })
    }

    pub(crate) fn new_struct(names: Vec<String>, fields: Vec<AbiObject>) -> Self {
        let dynamic = fields.iter().any(AbiObject::is_dynamic);
        AbiObject::Struct(StructNode { names, fields, dynamic })
    }

    /// Produces a deep, independently-owned copy of this node, recomputing every
    /// `is_dynamic` flag on the way.
    pub fn instantiate(&self) -> AbiObject {
        match self {
            AbiObject::Scalar(node) => AbiObject::new_scalar(node.kind, node.value.clone()),
            AbiObject::List(node) => AbiObject::new_list(
                node.element.instantiate(),
                node.mode,
                node.elements.iter().map(AbiObject::instantiate).collect(),
            ),
            AbiObject::Struct(node) => AbiObject::new_struct(
                node.names.clone(),
                node.fields.iter().map(AbiObject::instantiate).collect(),
            ),
        }
    }

    /// Whether this node has a variable-length encoding.
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiObject::Scalar(node) => node.kind.is_dynamic(),
            AbiObject::List(node) => node.dynamic,
            AbiObject::Struct(node) => node.dynamic,
        }
    }

    /// The canonical type string this node mirrors. I.e. `(uint256,string)[]`
    pub fn type_string(&self) -> String {
        match self {
            AbiObject::Scalar(node) => node.kind.type_string(),
            AbiObject::List(node) => node.type_string(),
            AbiObject::Struct(node) => node.type_string(),
        }
    }

    /// The scalar payload, if this is a leaf.
    pub fn value(&self) -> Option<&ScalarValue> {
        match self {
            AbiObject::Scalar(node) => Some(&node.value),
            _ => None,
        }
    }

    /// Replaces the payload of a leaf, validating it against the leaf's kind.
    pub fn set_value(&mut self, value: ScalarValue) -> Result<(), Error> {
        match self {
            AbiObject::Scalar(node) => {
                scalar::validate(node.kind, &value)?;
                node.value = value;
                Ok(())
            }
            other => Err(Error::type_mismatch(other.type_string(), value.describe())),
        }
    }

    /// The current elements of a list, or the fields of a struct.
    pub fn children(&self) -> &[AbiObject] {
        match self {
            AbiObject::Scalar(_) => &[],
            AbiObject::List(node) => &node.elements,
            AbiObject::Struct(node) => &node.fields,
        }
    }

    /// Consumes the node, returning the elements of a list or the fields of a struct.
    pub fn into_children(self) -> Vec<AbiObject> {
        match self {
            AbiObject::Scalar(_) => Vec::new(),
            AbiObject::List(node) => node.elements,
            AbiObject::Struct(node) => node.fields,
        }
    }

    /// The number of elements of a list, or fields of a struct.
    pub fn len(&self) -> usize {
        self.children().len()
    }

    /// Whether [`AbiObject::len`] is zero.
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Appends a fresh element instance to a list and returns it for filling.
    pub fn push_element(&mut self) -> Result<&mut AbiObject, Error> {
        let type_string = self.type_string();
        let AbiObject::List(node) = self else {
            return Err(Error::type_mismatch(type_string, "list element"));
        };
        if let LengthMode::Fixed(size) = node.mode {
            if node.elements.len() >= size {
                return Err(Error::ArityMismatch { expected: size, actual: size + 1 });
            }
        }

        let element = node.element.instantiate();
        node.dynamic |= element.is_dynamic();
        node.elements.push(element);
        let index = node.elements.len() - 1;
        Ok(&mut node.elements[index])
    }

    /// Replaces every element of a list. Each element must mirror the list's element type,
    /// and a fixed-length list must receive exactly its declared number of elements.
    pub fn set_elements(&mut self, elements: Vec<AbiObject>) -> Result<(), Error> {
        match self {
            AbiObject::List(node) => node.replace_elements(elements),
            other => Err(Error::type_mismatch(other.type_string(), "list")),
        }
    }

    /// A mutable reference to the `index`th field of a struct.
    pub fn field_mut(&mut self, index: usize) -> Result<&mut AbiObject, Error> {
        let type_string = self.type_string();
        match self {
            AbiObject::Struct(node) => {
                let count = node.fields.len();
                node.fields
                    .get_mut(index)
                    .ok_or(Error::ArityMismatch { expected: count, actual: index + 1 })
            }
            _ => Err(Error::type_mismatch(type_string, "struct")),
        }
    }

    /// The field of a struct with the given name.
    pub fn field(&self, name: &str) -> Option<&AbiObject> {
        match self {
            AbiObject::Struct(node) => {
                node.names.iter().position(|n| n == name).map(|index| &node.fields[index])
            }
            _ => None,
        }
    }

    /// Fills this node from a native value tree.
    pub fn fill(&mut self, value: &AbiValue) -> Result<(), Error> {
        match self {
            AbiObject::Scalar(node) => {
                let scalar = value.to_scalar(node.kind)?;
                scalar::validate(node.kind, &scalar)?;
                node.value = scalar;
                Ok(())
            }
            AbiObject::List(node) => {
                let AbiValue::Array(values) = value else {
                    return Err(Error::type_mismatch(node.type_string(), value.describe()));
                };
                let elements = values
                    .iter()
                    .map(|value| {
                        let mut element = node.element.instantiate();
                        element.fill(value)?;
                        Ok(element)
                    })
                    .collect::<Result<Vec<_>, Error>>()?;
                node.replace_elements(elements)
            }
            AbiObject::Struct(node) => {
                let AbiValue::Tuple(values) = value else {
                    return Err(Error::type_mismatch(node.type_string(), value.describe()));
                };
                if values.len() != node.fields.len() {
                    return Err(Error::ArityMismatch {
                        expected: node.fields.len(),
                        actual: values.len(),
                    });
                }
                for (field, value) in node.fields.iter_mut().zip(values) {
                    field.fill(value)?;
                }
                node.dynamic = node.fields.iter().any(AbiObject::is_dynamic);
                Ok(())
            }
        }
    }

    /// Projects this node into a native value tree.
    pub fn to_value(&self) -> AbiValue {
        match self {
            AbiObject::Scalar(node) => AbiValue::from_scalar(node.kind, &node.value),
            AbiObject::List(node) => {
                AbiValue::Array(node.elements.iter().map(AbiObject::to_value).collect())
            }
            AbiObject::Struct(node) => {
                AbiValue::Tuple(node.fields.iter().map(AbiObject::to_value).collect())
            }
        }
    }
}
