//! Decoded system register values
//!
//! A [`RegisterSnapshot`] is one read of a register, split into fields. It
//! keeps the raw value so that re-encoding reproduces reserved bits exactly.

use heapless::Vec;

use super::layout::{Field, RegisterDescriptor, MAX_FIELDS};
use crate::{Error, Result};

/// Field values of one register read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSnapshot<'d> {
    descriptor: &'d RegisterDescriptor,
    raw: u64,
    values: Vec<u64, MAX_FIELDS>,
}

/// Decode every field of `raw` according to `descriptor`.
///
/// Never fails: a validated descriptor has at most [`MAX_FIELDS`] fields.
pub fn decode(descriptor: &RegisterDescriptor, raw: u64) -> RegisterSnapshot<'_> {
    let values = descriptor
        .fields()
        .iter()
        .map(|field| field.extract(raw))
        .collect();

    RegisterSnapshot {
        descriptor,
        raw,
        values,
    }
}

/// Re-encode `snapshot` with some fields replaced.
///
/// Starts from the snapshot's raw value, so bits outside the overridden
/// fields are reproduced exactly. Values wider than their field are
/// rejected rather than truncated.
pub fn encode(
    descriptor: &RegisterDescriptor,
    snapshot: &RegisterSnapshot<'_>,
    overrides: &[(&'static str, u64)],
) -> Result<u64> {
    if descriptor != snapshot.descriptor {
        return Err(Error::DescriptorMismatch {
            expected: descriptor.name(),
            found: snapshot.descriptor.name(),
        });
    }

    let mut raw = snapshot.raw;
    for &(name, value) in overrides {
        let field = descriptor.field(name).ok_or(Error::UnknownField {
            register: descriptor.name(),
            field: name,
        })?;
        if !field.fits(value) {
            return Err(Error::FieldOverflow {
                register: descriptor.name(),
                field: field.name,
                value,
                width: field.width,
            });
        }
        raw = (raw & !field.mask()) | (value << field.offset);
    }

    Ok(raw)
}

impl<'d> RegisterSnapshot<'d> {
    /// Layout this snapshot was decoded with
    pub fn descriptor(&self) -> &'d RegisterDescriptor {
        self.descriptor
    }

    /// Raw register value
    pub fn raw(&self) -> u64 {
        self.raw
    }

    /// Bits that belong to reserved fields, in register position
    pub fn reserved(&self) -> u64 {
        self.raw & self.descriptor.reserved_mask()
    }

    /// Value of a field, `None` if the layout has no such field
    pub fn get(&self, name: &str) -> Option<u64> {
        self.descriptor
            .index_of(name)
            .and_then(|index| self.values.get(index).copied())
    }

    /// Value of a field, as an error if the layout has no such field
    pub fn field(&self, name: &'static str) -> Result<u64> {
        self.get(name).ok_or(Error::UnknownField {
            register: self.descriptor.name(),
            field: name,
        })
    }

    /// Fields with their values, in bit order
    pub fn iter(&self) -> impl Iterator<Item = (&'static Field, u64)> + '_ {
        self.descriptor
            .fields()
            .iter()
            .zip(self.values.iter().copied())
    }

    /// Shorthand for [`encode`] with this snapshot's own descriptor
    pub fn encode(&self, overrides: &[(&'static str, u64)]) -> Result<u64> {
        encode(self.descriptor, self, overrides)
    }
}
