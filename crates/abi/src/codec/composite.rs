//! The head/tail codec for arrays and tuples.
//!
//! A container's encoding is a head of one slot per member followed by a tail. Static
//! members are written inline in their slot; dynamic members get a single pointer word in
//! their slot and their full encoding is appended to the tail. Pointers are byte offsets from
//! the first byte of the container's head. For `T[]` the head starts after the count word.

use super::{dynamic, read_usize, read_word, scalar, usize_word, WORD_SIZE};
use crate::{
    error::Error,
    object::{AbiObject, LengthMode, ScalarValue, ValueKind},
};

/// Encodes a parameter tuple, i.e. a template built by
/// [`template_for_params`](crate::object::template_for_params) and then filled.
pub fn encode_params(params: &AbiObject) -> Result<Vec<u8>, Error> {
    encode(params)
}

/// Decodes a parameter tuple from the start of `data`, returning a filled instance of
/// `template`.
pub fn decode_params(template: &AbiObject, data: &[u8]) -> Result<AbiObject, Error> {
    decode(template, data, 0)
}

/// How many output units a decode may produce per word of input. A node costs one unit, and
/// a `bytes` or `string` payload one more per word it spans.
pub const DECODE_UNITS_PER_WORD: usize = 32;

/// Caps the decoded output of one call in proportion to its input. Pointers may alias the
/// same tail region, so without a cap a few kilobytes of input can expand exponentially.
#[derive(Debug)]
struct DecodeBudget {
    limit: usize,
    remaining: usize,
}

impl DecodeBudget {
    fn for_input(data: &[u8]) -> Self {
        let limit = (data.len() / WORD_SIZE + 1).saturating_mul(DECODE_UNITS_PER_WORD);
        Self { limit, remaining: limit }
    }

    fn charge(&mut self, units: usize, input_len: usize) -> Result<(), Error> {
        self.remaining = self
            .remaining
            .checked_sub(units)
            .ok_or(Error::DecodeLimitExceeded { limit: self.limit, input_len })?;
        Ok(())
    }
}

/// Encodes a single node.
pub fn encode(object: &AbiObject) -> Result<Vec<u8>, Error> {
    match object {
        AbiObject::Scalar(node) => match (&node.kind, &node.value) {
            (ValueKind::DynamicBytes, ScalarValue::Bytes(bytes)) => {
                Ok(dynamic::encode_bytes(bytes))
            }
            (ValueKind::String, ScalarValue::String(value)) => {
                Ok(dynamic::encode_string(value))
            }
            (kind, value) => Ok(scalar::encode_word(*kind, value)?.to_vec()),
        },
        AbiObject::List(node) => {
            match node.mode {
                LengthMode::Fixed(0) => {
                    return Err(Error::InvalidFixedArrayLength(object.type_string()))
                }
                LengthMode::Fixed(size) if node.elements.len() != size => {
                    return Err(Error::ArityMismatch {
                        expected: size,
                        actual: node.elements.len(),
                    })
                }
                _ => {}
            }

            let body = encode_sequence(&node.elements)?;
            if node.mode == LengthMode::Dynamic {
                let mut encoded = Vec::with_capacity(WORD_SIZE + body.len());
                encoded.extend_from_slice(&usize_word(node.elements.len()));
                encoded.extend_from_slice(&body);
                return Ok(encoded);
            }

            Ok(body)
        }
        AbiObject::Struct(node) => encode_sequence(&node.fields),
    }
}

/// Encodes an ordered member list with the head/tail layout.
pub fn encode_sequence(items: &[AbiObject]) -> Result<Vec<u8>, Error> {
    let encoded = items
        .iter()
        .map(|item| Ok((item.is_dynamic(), encode(item)?)))
        .collect::<Result<Vec<_>, Error>>()?;

    let head_len = encoded
        .iter()
        .map(|(dynamic, bytes)| if *dynamic { WORD_SIZE } else { bytes.len() })
        .sum::<usize>();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (dynamic, bytes) in encoded {
        if dynamic {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend_from_slice(&bytes);
        } else {
            head.extend_from_slice(&bytes);
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

/// Decodes the node whose encoding starts at `offset`, returning a filled instance of
/// `template`. For a dynamic node, `offset` is the already-resolved pointer target.
pub fn decode(template: &AbiObject, data: &[u8], offset: usize) -> Result<AbiObject, Error> {
    decode_node(template, data, offset, &mut DecodeBudget::for_input(data))
}

fn decode_node(
    template: &AbiObject,
    data: &[u8],
    offset: usize,
    budget: &mut DecodeBudget,
) -> Result<AbiObject, Error> {
    budget.charge(1, data.len())?;

    match template {
        AbiObject::Scalar(node) => {
            let value = match node.kind {
                ValueKind::DynamicBytes => {
                    let bytes = dynamic::decode_bytes(data, offset)?;
                    budget.charge(bytes.len().div_ceil(WORD_SIZE), data.len())?;
                    ScalarValue::Bytes(bytes)
                }
                ValueKind::String => {
                    let value = dynamic::decode_string(data, offset)?;
                    budget.charge(value.len().div_ceil(WORD_SIZE), data.len())?;
                    ScalarValue::String(value)
                }
                kind => scalar::decode_word(kind, read_word(data, offset)?)?,
            };
            Ok(AbiObject::new_scalar(node.kind, value))
        }
        AbiObject::List(node) => {
            let (count, base) = match node.mode {
                LengthMode::Fixed(0) => {
                    return Err(Error::InvalidFixedArrayLength(template.type_string()))
                }
                LengthMode::Fixed(size) => (size, offset),
                LengthMode::Dynamic => (read_usize(data, offset)?, offset + WORD_SIZE),
            };

            // every element occupies at least one head word
            let available = data.len().saturating_sub(base) / WORD_SIZE;
            if count > available {
                return Err(Error::truncated(base, count.saturating_mul(WORD_SIZE), data.len()));
            }

            let templates = vec![node.element.as_ref(); count];
            let elements = decode_members(&templates, data, base, budget)?;
            Ok(AbiObject::new_list(node.element.instantiate(), node.mode, elements))
        }
        AbiObject::Struct(node) => {
            let templates = node.fields.iter().collect::<Vec<_>>();
            let fields = decode_members(&templates, data, offset, budget)?;
            Ok(AbiObject::new_struct(node.names.clone(), fields))
        }
    }
}

/// Decodes an ordered member list whose head starts at `base`.
fn decode_members(
    templates: &[&AbiObject],
    data: &[u8],
    base: usize,
    budget: &mut DecodeBudget,
) -> Result<Vec<AbiObject>, Error> {
    let mut cursor = base;
    let mut decoded = Vec::with_capacity(templates.len());

    for template in templates {
        if template.is_dynamic() {
            let pointer = read_usize(data, cursor)?;
            let target = base
                .checked_add(pointer)
                .ok_or_else(|| Error::truncated(cursor, pointer, data.len()))?;
            decoded.push(decode_node(template, data, target, budget)?);
            cursor += WORD_SIZE;
        } else {
            decoded.push(decode_node(template, data, cursor, budget)?);
            cursor += head_size(template);
        }
    }

    Ok(decoded)
}

/// The number of bytes a node occupies in its container's head: one word for dynamic
/// nodes, the full inline encoding for static ones.
pub fn head_size(object: &AbiObject) -> usize {
    if object.is_dynamic() {
        return WORD_SIZE;
    }

    match object {
        AbiObject::Scalar(_) => WORD_SIZE,
        AbiObject::List(node) => match node.mode {
            LengthMode::Fixed(size) => size * head_size(&node.element),
            LengthMode::Dynamic => WORD_SIZE,
        },
        AbiObject::Struct(node) => node.fields.iter().map(head_size).sum(),
    }
}
