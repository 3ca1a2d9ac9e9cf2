//! Canonical type parsing.
//!
//! A [`CanonicalType`] is derived once from an ABI type string (plus the JSON `components`
//! list for tuples) and never mutated afterwards. Its canonical string form is what gets
//! hashed into method IDs and event topics, so [`CanonicalType::canonical`] must exactly
//! invert [`CanonicalType::parse`].

use std::fmt;

use mimir_common::{
    constants::{
        ARRAY_DIMENSION_REGEX, ARRAY_SUFFIX_REGEX, FIXED_BYTES_TYPE_REGEX, FIXED_POINT_TYPE_REGEX,
        INTEGER_TYPE_REGEX, SIGNATURE_REGEX,
    },
    utils::strings::{find_balanced_encapsulator, split_top_level},
};

use crate::error::Error;

/// The single-word value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `bool`
    Bool,
    /// `intN`, with the bit width
    Int(usize),
    /// `uintN`, with the bit width
    Uint(usize),
    /// `address`
    Address,
}

/// The element type of a [`CanonicalType`], with every array axis removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    /// A numeric, boolean or address value
    Scalar(ScalarKind),
    /// `bytesN`, with `N` in `1..=32`
    FixedBytes(usize),
    /// `bytes`
    DynamicBytes,
    /// `string`
    Utf8String,
    /// `tuple`, with its ordered components
    Tuple(Vec<NamedType>),
}

impl BaseType {
    /// Whether a value of this base type has a variable-length encoding.
    pub fn is_dynamic(&self) -> bool {
        match self {
            BaseType::DynamicBytes | BaseType::Utf8String => true,
            BaseType::Tuple(components) => components.iter().any(|c| c.ty.is_dynamic()),
            BaseType::Scalar(_) | BaseType::FixedBytes(_) => false,
        }
    }

    fn write_canonical(&self, out: &mut String, tuple_keyword: bool) {
        match self {
            BaseType::Scalar(ScalarKind::Bool) => out.push_str("bool"),
            BaseType::Scalar(ScalarKind::Int(bits)) => out.push_str(&format!("int{bits}")),
            BaseType::Scalar(ScalarKind::Uint(bits)) => out.push_str(&format!("uint{bits}")),
            BaseType::Scalar(ScalarKind::Address) => out.push_str("address"),
            BaseType::FixedBytes(size) => out.push_str(&format!("bytes{size}")),
            BaseType::DynamicBytes => out.push_str("bytes"),
            BaseType::Utf8String => out.push_str("string"),
            BaseType::Tuple(_) if tuple_keyword => out.push_str("tuple"),
            BaseType::Tuple(components) => {
                out.push('(');
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&component.ty.canonical());
                }
                out.push(')');
            }
        }
    }
}

/// A parsed ABI type: a base type plus zero or more array axes.
///
/// `dimensions` lists the axes in textual order, so the **last** entry is the outermost
/// axis: `uint256[3][]` is a dynamic-length array of `uint256[3]`, with dimensions
/// `[Some(3), None]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalType {
    base: BaseType,
    dimensions: Vec<Option<usize>>,
}

impl CanonicalType {
    /// Creates a type from its parts, rejecting zero-length fixed axes.
    pub fn new(base: BaseType, dimensions: Vec<Option<usize>>) -> Result<Self, Error> {
        if dimensions.iter().any(|d| *d == Some(0)) {
            return Err(Error::InvalidFixedArrayLength(format!(
                "fixed array axis of length 0 in {}",
                render(&base, &dimensions, false)
            )));
        }

        if matches!(&base, BaseType::Tuple(components) if components.is_empty()) {
            return Err(Error::MalformedAbiDefinition(format!(
                "tuple type {} has no components",
                render(&base, &dimensions, false)
            )));
        }

        Ok(Self { base, dimensions })
    }

    /// Parses an ABI JSON type string. `components` must be supplied when the base type is
    /// `tuple`, and must be absent (or empty) otherwise.
    ///
    /// ```
    /// use mimir_abi::types::CanonicalType;
    ///
    /// let ty = CanonicalType::parse("address[3][]", None).expect("failed to parse type");
    /// assert_eq!(ty.dimensions(), &[Some(3), None]);
    /// assert_eq!(ty.canonical(), "address[3][]");
    /// ```
    pub fn parse(ty: &str, components: Option<Vec<NamedType>>) -> Result<Self, Error> {
        let ty = ty.trim();
        let (base_text, suffix) = match ty.find('[') {
            Some(index) => ty.split_at(index),
            None => (ty, ""),
        };

        let dimensions = parse_dimensions(ty, suffix)?;
        let base = match (base_text, components) {
            ("tuple", Some(components)) if !components.is_empty() => {
                BaseType::Tuple(components)
            }
            ("tuple", _) => {
                return Err(Error::MalformedAbiDefinition(format!(
                    "tuple type '{ty}' declared without components"
                )))
            }
            (base_text, Some(components)) if !components.is_empty() => {
                return Err(Error::MalformedAbiDefinition(format!(
                    "non-tuple type '{base_text}' declared with components"
                )))
            }
            (base_text, _) => parse_base(base_text)?,
        };

        Self::new(base, dimensions)
    }

    /// Parses a type written in signature form, where tuples are spelled inline, i.e.
    /// `(uint256,bool)[2]`. Tuple components parsed this way are unnamed.
    ///
    /// ```
    /// use mimir_abi::types::CanonicalType;
    ///
    /// let ty = CanonicalType::parse_inline("(uint256,(bool,bytes)[])[2]")
    ///     .expect("failed to parse type");
    /// assert_eq!(ty.abi_type(), "tuple[2]");
    /// assert_eq!(ty.canonical(), "(uint256,(bool,bytes)[])[2]");
    /// ```
    pub fn parse_inline(ty: &str) -> Result<Self, Error> {
        let ty = ty.trim();
        if !ty.starts_with('(') {
            return Self::parse(ty, None);
        }

        let range = find_balanced_encapsulator(ty, ('(', ')'))
            .map_err(|e| Error::MalformedAbiDefinition(e.to_string()))?;
        let suffix = &ty[range.end + 1..];
        let components = split_top_level(&ty[range], ',')
            .map_err(|e| Error::MalformedAbiDefinition(e.to_string()))?
            .into_iter()
            .map(|component| Ok(NamedType::new("", Self::parse_inline(component)?)))
            .collect::<Result<Vec<_>, Error>>()?;

        Self::new(BaseType::Tuple(components), parse_dimensions(ty, suffix)?)
    }

    /// The element type with every array axis removed.
    pub fn base(&self) -> &BaseType {
        &self.base
    }

    /// The array axes, innermost first.
    pub fn dimensions(&self) -> &[Option<usize>] {
        &self.dimensions
    }

    /// Whether this type has at least one array axis.
    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    /// The type of one element of the outermost array axis, or `None` for non-array types.
    pub fn element_type(&self) -> Option<CanonicalType> {
        let (_, inner) = self.dimensions.split_last()?;
        Some(CanonicalType { base: self.base.clone(), dimensions: inner.to_vec() })
    }

    /// Whether a value of this type has a variable-length encoding.
    pub fn is_dynamic(&self) -> bool {
        self.dimensions.iter().any(Option::is_none) || self.base.is_dynamic()
    }

    /// Whether this type is a single-word value type, i.e. one that an indexed event
    /// parameter stores verbatim in its topic.
    pub fn is_value_type(&self) -> bool {
        self.dimensions.is_empty() &&
            matches!(self.base, BaseType::Scalar(_) | BaseType::FixedBytes(_))
    }

    /// The canonical string form, with tuples expanded. I.e. `(uint256,bool)[2]`
    pub fn canonical(&self) -> String {
        render(&self.base, &self.dimensions, false)
    }

    /// The ABI JSON `type` field form, with tuples spelled `tuple`. I.e. `tuple[2]`
    pub fn abi_type(&self) -> String {
        render(&self.base, &self.dimensions, true)
    }

    /// The tuple components, if the base type is a tuple.
    pub fn components(&self) -> Option<&[NamedType]> {
        match &self.base {
            BaseType::Tuple(components) => Some(components),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// A declared parameter: a name, its type, and whether it is an indexed event parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// The parameter name. May be empty.
    pub name: String,
    /// The parameter type
    pub ty: CanonicalType,
    /// Whether the parameter is an indexed event parameter
    pub indexed: bool,
}

impl NamedType {
    /// Creates a non-indexed parameter.
    pub fn new(name: impl Into<String>, ty: CanonicalType) -> Self {
        Self { name: name.into(), ty, indexed: false }
    }

    /// Parses a parameter from its JSON fields.
    pub fn parse(
        name: impl Into<String>,
        ty: &str,
        components: Option<Vec<NamedType>>,
        indexed: bool,
    ) -> Result<Self, Error> {
        Ok(Self { name: name.into(), ty: CanonicalType::parse(ty, components)?, indexed })
    }

    /// Returns a copy of this parameter with the `indexed` flag set.
    pub fn with_indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// The tuple components, populated only when the base type is a tuple.
    pub fn components(&self) -> Option<&[NamedType]> {
        self.ty.components()
    }
}

/// Parses a function or event signature in text form, i.e. `transfer(address,uint256)`,
/// into its name and unnamed parameters. Whitespace is ignored.
///
/// ```
/// use mimir_abi::types::parse_signature;
///
/// let (name, params) =
///     parse_signature("transfer(address, uint256)").expect("failed to parse signature");
/// assert_eq!(name, "transfer");
/// assert_eq!(params.len(), 2);
/// assert_eq!(params[1].ty.canonical(), "uint256");
/// ```
pub fn parse_signature(signature: &str) -> Result<(String, Vec<NamedType>), Error> {
    parse_signature_text(signature, false)
}

/// Parses an event signature in text form, where each parameter may carry a trailing
/// `indexed` marker. I.e. `Transfer(address indexed,address indexed,uint256)`
///
/// ```
/// use mimir_abi::types::parse_event_signature;
///
/// let (_, params) = parse_event_signature("Transfer(address indexed, address indexed, uint256)")
///     .expect("failed to parse signature");
/// assert_eq!(params.iter().map(|p| p.indexed).collect::<Vec<_>>(), vec![true, true, false]);
/// ```
pub fn parse_event_signature(signature: &str) -> Result<(String, Vec<NamedType>), Error> {
    parse_signature_text(signature, true)
}

fn parse_signature_text(
    signature: &str,
    allow_indexed: bool,
) -> Result<(String, Vec<NamedType>), Error> {
    let captures = SIGNATURE_REGEX
        .captures(signature.trim())
        .map_err(|e| Error::MalformedAbiDefinition(e.to_string()))?
        .ok_or_else(|| {
            Error::MalformedAbiDefinition(format!("'{signature}' is not a valid signature"))
        })?;

    let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default().to_string();
    let inner = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
    if inner.trim().is_empty() {
        return Ok((name, Vec::new()));
    }

    let params = split_top_level(inner, ',')
        .map_err(|e| Error::MalformedAbiDefinition(e.to_string()))?
        .into_iter()
        .map(|param| {
            let param = param.trim();
            let (ty, indexed) = match param.strip_suffix("indexed") {
                Some(rest) if allow_indexed && rest.ends_with(char::is_whitespace) => (rest, true),
                _ => (param, false),
            };
            let compact = ty.chars().filter(|c| !c.is_whitespace()).collect::<String>();
            Ok(NamedType::new("", CanonicalType::parse_inline(&compact)?).with_indexed(indexed))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok((name, params))
}

fn render(base: &BaseType, dimensions: &[Option<usize>], tuple_keyword: bool) -> String {
    let mut out = String::new();
    base.write_canonical(&mut out, tuple_keyword);
    for dimension in dimensions {
        match dimension {
            Some(size) => out.push_str(&format!("[{size}]")),
            None => out.push_str("[]"),
        }
    }
    out
}

fn parse_dimensions(ty: &str, suffix: &str) -> Result<Vec<Option<usize>>, Error> {
    let valid = ARRAY_SUFFIX_REGEX
        .is_match(suffix)
        .map_err(|e| Error::MalformedAbiDefinition(e.to_string()))?;
    if !valid {
        return Err(Error::MalformedAbiDefinition(format!(
            "unparsable array suffix '{suffix}' in type '{ty}'"
        )));
    }

    let mut dimensions = Vec::new();
    for captures in ARRAY_DIMENSION_REGEX.captures_iter(suffix) {
        let captures = captures.map_err(|e| Error::MalformedAbiDefinition(e.to_string()))?;
        let size = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        if size.is_empty() {
            dimensions.push(None);
        } else {
            let size = size.parse::<usize>().map_err(|_| {
                Error::MalformedAbiDefinition(format!(
                    "array length '{size}' in type '{ty}' is too large"
                ))
            })?;
            dimensions.push(Some(size));
        }
    }

    Ok(dimensions)
}

fn parse_base(base: &str) -> Result<BaseType, Error> {
    let regex_error = |e: fancy_regex::Error| Error::MalformedAbiDefinition(e.to_string());

    match base {
        "bool" => return Ok(BaseType::Scalar(ScalarKind::Bool)),
        "address" => return Ok(BaseType::Scalar(ScalarKind::Address)),
        "string" => return Ok(BaseType::Utf8String),
        "bytes" => return Ok(BaseType::DynamicBytes),
        "function" => return Err(Error::UnsupportedType(base.to_string())),
        _ => {}
    }

    if let Some(captures) = INTEGER_TYPE_REGEX.captures(base).map_err(regex_error)? {
        let signed = captures.get(1).map(|m| m.as_str()) == Some("int");
        let bits = match captures.get(2).map(|m| m.as_str()).unwrap_or_default() {
            "" => 256,
            bits => bits.parse::<usize>().unwrap_or(0),
        };
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(Error::MalformedAbiDefinition(format!(
                "invalid integer width in '{base}': must be a multiple of 8 in 8..=256"
            )));
        }

        let kind = if signed { ScalarKind::Int(bits) } else { ScalarKind::Uint(bits) };
        return Ok(BaseType::Scalar(kind));
    }

    if let Some(captures) = FIXED_BYTES_TYPE_REGEX.captures(base).map_err(regex_error)? {
        let size = captures.get(1).and_then(|m| m.as_str().parse::<usize>().ok()).unwrap_or(0);
        if !(1..=32).contains(&size) {
            return Err(Error::MalformedAbiDefinition(format!(
                "invalid fixed bytes size in '{base}': must be in 1..=32"
            )));
        }

        return Ok(BaseType::FixedBytes(size));
    }

    if FIXED_POINT_TYPE_REGEX.is_match(base).map_err(regex_error)? {
        return Err(Error::UnsupportedType(base.to_string()));
    }

    Err(Error::MalformedAbiDefinition(format!("unknown type '{base}'")))
}
