//! System register field tables
//!
//! A [`RegisterDescriptor`] lists every bit of a 64-bit system register as an
//! ordered run of [`Field`]s, reserved bits included. Construction rejects
//! any table whose fields overlap, leave gaps, or do not cover exactly 64
//! bits, so decoding can never misplace a field.

use core::fmt;

use super::snapshot::{decode, RegisterSnapshot};
use super::SysReg;

/// Width of every AArch64 system register handled here
pub const REGISTER_WIDTH: u32 = 64;

/// Upper bound on the number of fields in a register (one per bit)
pub const MAX_FIELDS: usize = REGISTER_WIDTH as usize;

/// Mask of the low `width` bits
pub(crate) const fn low_mask(width: u32) -> u64 {
    if width >= REGISTER_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// What a field's bits mean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Architecturally defined control or status value
    Value,
    /// Reserved, reads as zero
    Res0,
    /// Reserved, reads as one
    Res1,
}

impl FieldKind {
    pub const fn is_reserved(self) -> bool {
        matches!(self, FieldKind::Res0 | FieldKind::Res1)
    }
}

/// One contiguous bit range of a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name as used in the architecture manual
    pub name: &'static str,
    /// Least significant bit
    pub offset: u32,
    /// Number of bits
    pub width: u32,
    pub kind: FieldKind,
    /// Short description
    pub description: &'static str,
}

impl Field {
    /// Defined field
    pub const fn value(name: &'static str, offset: u32, width: u32, description: &'static str) -> Self {
        Self {
            name,
            offset,
            width,
            kind: FieldKind::Value,
            description,
        }
    }

    /// RES0 placeholder
    pub const fn res0(name: &'static str, offset: u32, width: u32) -> Self {
        Self {
            name,
            offset,
            width,
            kind: FieldKind::Res0,
            description: "Reserved, RES0",
        }
    }

    /// RES1 placeholder
    pub const fn res1(name: &'static str, offset: u32, width: u32) -> Self {
        Self {
            name,
            offset,
            width,
            kind: FieldKind::Res1,
            description: "Reserved, RES1",
        }
    }

    /// Largest value the field can hold
    pub const fn max_value(&self) -> u64 {
        low_mask(self.width)
    }

    /// Bits covered by the field, in register position.
    ///
    /// A field starting past bit 63 covers nothing.
    pub const fn mask(&self) -> u64 {
        match low_mask(self.width).checked_shl(self.offset) {
            Some(mask) => mask,
            None => 0,
        }
    }

    /// Extract the field from a raw register value
    pub const fn extract(&self, raw: u64) -> u64 {
        match raw.checked_shr(self.offset) {
            Some(shifted) => shifted & low_mask(self.width),
            None => 0,
        }
    }

    pub const fn fits(&self, value: u64) -> bool {
        value <= self.max_value()
    }
}

/// Reasons a field table is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// No fields at all
    Empty,
    /// A field with zero width
    ZeroWidth { field: &'static str },
    /// Field starts before the previous one ends
    Overlap {
        field: &'static str,
        offset: u32,
        expected: u32,
    },
    /// Field starts after the previous one ends
    Gap {
        field: &'static str,
        offset: u32,
        expected: u32,
    },
    /// Field extends past bit 63
    OutOfRange { field: &'static str },
    /// Two fields share a name
    DuplicateName { field: &'static str },
    /// Fields end before bit 63
    Coverage { covered: u32 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Empty => write!(f, "no fields"),
            LayoutError::ZeroWidth { field } => write!(f, "field {} has zero width", field),
            LayoutError::Overlap {
                field,
                offset,
                expected,
            } => write!(
                f,
                "field {} at bit {} overlaps the previous field ending at bit {}",
                field, offset, expected
            ),
            LayoutError::Gap {
                field,
                offset,
                expected,
            } => write!(
                f,
                "field {} at bit {} leaves bits from {} undescribed",
                field, offset, expected
            ),
            LayoutError::OutOfRange { field } => write!(f, "field {} extends past bit 63", field),
            LayoutError::DuplicateName { field } => write!(f, "field name {} used twice", field),
            LayoutError::Coverage { covered } => {
                write!(f, "fields cover {} of {} bits", covered, REGISTER_WIDTH)
            }
        }
    }
}

const fn same_name(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Bit-exact layout of one system register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    name: &'static str,
    reg: SysReg,
    fields: &'static [Field],
    reserved_mask: u64,
}

impl RegisterDescriptor {
    /// Validate a field table.
    ///
    /// Fields must be listed from bit 0 upwards, each starting where the
    /// previous one ended, and together cover exactly 64 bits.
    pub const fn try_new(
        name: &'static str,
        reg: SysReg,
        fields: &'static [Field],
    ) -> Result<Self, LayoutError> {
        if fields.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut expected = 0u32;
        let mut reserved_mask = 0u64;
        let mut i = 0;
        while i < fields.len() {
            let field = &fields[i];
            if field.width == 0 {
                return Err(LayoutError::ZeroWidth { field: field.name });
            }
            if field.offset < expected {
                return Err(LayoutError::Overlap {
                    field: field.name,
                    offset: field.offset,
                    expected,
                });
            }
            if field.offset > expected {
                return Err(LayoutError::Gap {
                    field: field.name,
                    offset: field.offset,
                    expected,
                });
            }
            if field.width > REGISTER_WIDTH - field.offset {
                return Err(LayoutError::OutOfRange { field: field.name });
            }

            let mut j = 0;
            while j < i {
                if same_name(fields[j].name, field.name) {
                    return Err(LayoutError::DuplicateName { field: field.name });
                }
                j += 1;
            }

            if field.kind.is_reserved() {
                reserved_mask |= field.mask();
            }
            expected += field.width;
            i += 1;
        }

        if expected != REGISTER_WIDTH {
            return Err(LayoutError::Coverage { covered: expected });
        }

        Ok(Self {
            name,
            reg,
            fields,
            reserved_mask,
        })
    }

    /// Like [`try_new`](Self::try_new), but panics on a bad table.
    ///
    /// Used for `static` tables, where the panic becomes a compile error.
    pub const fn new(name: &'static str, reg: SysReg, fields: &'static [Field]) -> Self {
        match Self::try_new(name, reg, fields) {
            Ok(descriptor) => descriptor,
            Err(LayoutError::Empty) => panic!("register layout has no fields"),
            Err(LayoutError::ZeroWidth { .. }) => panic!("register layout has a zero-width field"),
            Err(LayoutError::Overlap { .. }) => panic!("register layout has overlapping fields"),
            Err(LayoutError::Gap { .. }) => panic!("register layout has a gap between fields"),
            Err(LayoutError::OutOfRange { .. }) => panic!("register layout extends past bit 63"),
            Err(LayoutError::DuplicateName { .. }) => panic!("register layout repeats a field name"),
            Err(LayoutError::Coverage { .. }) => panic!("register layout does not cover 64 bits"),
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Register this layout describes
    pub const fn reg(&self) -> SysReg {
        self.reg
    }

    pub const fn width(&self) -> u32 {
        REGISTER_WIDTH
    }

    /// Fields in bit order
    pub const fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Bits belonging to RES0/RES1 fields
    pub const fn reserved_mask(&self) -> u64 {
        self.reserved_mask
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Decode a raw value with this layout
    pub fn decode(&self, raw: u64) -> RegisterSnapshot<'_> {
        decode(self, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT: &[Field] = &[
        Field::res0("RES0_0", 0, 2),
        Field::value("EL", 2, 2, "Current exception level"),
        Field::res0("RES0_4", 4, 60),
    ];

    #[test]
    fn test_valid_layout() {
        let descriptor = RegisterDescriptor::try_new("CurrentEL", SysReg::CurrentEl, SPLIT).unwrap();
        assert_eq!(descriptor.name(), "CurrentEL");
        assert_eq!(descriptor.width(), 64);
        assert_eq!(descriptor.reserved_mask(), !0b1100);
        assert_eq!(descriptor.field("EL").map(|f| f.offset), Some(2));
        assert_eq!(descriptor.index_of("RES0_4"), Some(2));
        assert!(descriptor.field("M").is_none());
    }

    #[test]
    fn test_63_bit_layout_is_rejected() {
        const SHORT: &[Field] = &[
            Field::res0("RES0_0", 0, 2),
            Field::value("EL", 2, 2, "Current exception level"),
            Field::res0("RES0_4", 4, 59),
        ];
        assert_eq!(
            RegisterDescriptor::try_new("CurrentEL", SysReg::CurrentEl, SHORT),
            Err(LayoutError::Coverage { covered: 63 })
        );
    }

    #[test]
    fn test_overlap_is_rejected() {
        const OVERLAP: &[Field] = &[
            Field::value("A", 0, 4, "a"),
            Field::value("B", 3, 61, "b"),
        ];
        assert_eq!(
            RegisterDescriptor::try_new("X", SysReg::FarEl1, OVERLAP),
            Err(LayoutError::Overlap {
                field: "B",
                offset: 3,
                expected: 4
            })
        );
    }

    #[test]
    fn test_omitted_reserved_bits_are_rejected() {
        // Bit 17 left out: everything above it would be misaligned.
        const MISSING: &[Field] = &[
            Field::value("LO", 0, 17, "low"),
            Field::value("HI", 18, 46, "high"),
        ];
        assert_eq!(
            RegisterDescriptor::try_new("X", SysReg::SctlrEl1, MISSING),
            Err(LayoutError::Gap {
                field: "HI",
                offset: 18,
                expected: 17
            })
        );
    }

    #[test]
    fn test_degenerate_layouts_are_rejected() {
        const ZERO: &[Field] = &[Field::value("Z", 0, 0, "zero"), Field::value("ALL", 0, 64, "all")];
        const WIDE: &[Field] = &[Field::value("LO", 0, 8, "low"), Field::value("HI", 8, 57, "high")];
        const TWICE: &[Field] = &[Field::value("A", 0, 32, "a"), Field::value("A", 32, 32, "a")];

        assert_eq!(RegisterDescriptor::try_new("X", SysReg::FarEl1, &[]), Err(LayoutError::Empty));
        assert_eq!(
            RegisterDescriptor::try_new("X", SysReg::FarEl1, ZERO),
            Err(LayoutError::ZeroWidth { field: "Z" })
        );
        assert_eq!(
            RegisterDescriptor::try_new("X", SysReg::FarEl1, WIDE),
            Err(LayoutError::OutOfRange { field: "HI" })
        );
        assert_eq!(
            RegisterDescriptor::try_new("X", SysReg::FarEl1, TWICE),
            Err(LayoutError::DuplicateName { field: "A" })
        );
    }

    #[test]
    fn test_field_masks() {
        let full = Field::value("VA", 0, 64, "address");
        assert_eq!(full.mask(), u64::MAX);
        assert_eq!(full.extract(0xDEAD_BEEF), 0xDEAD_BEEF);

        let ec = Field::value("EC", 26, 6, "class");
        assert_eq!(ec.mask(), 0xFC00_0000);
        assert_eq!(ec.max_value(), 0x3F);
        assert_eq!(ec.extract(0x5600_0000), 0x15);
        assert!(ec.fits(0x3F));
        assert!(!ec.fits(0x40));
    }

    #[test]
    fn test_field_past_register_end() {
        let beyond = Field::value("X", 64, 1, "unvalidated");
        assert_eq!(beyond.mask(), 0);
        assert_eq!(beyond.extract(u64::MAX), 0);

        let far = Field::value("Y", 200, 8, "unvalidated");
        assert_eq!(far.mask(), 0);
        assert_eq!(far.extract(u64::MAX), 0);
    }

    #[test]
    #[should_panic(expected = "does not cover 64 bits")]
    fn test_new_panics_on_bad_layout() {
        const SHORT: &[Field] = &[Field::value("LO", 0, 63, "low")];
        let _ = RegisterDescriptor::new("X", SysReg::FarEl1, SHORT);
    }
}
