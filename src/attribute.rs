//! Attribute bytes: four 2-bit palette selectors packed into one byte.
//!
//! Field 0 occupies the two most-significant bits, field 3 the two least-significant:
//!
//! ```text
//! aabbccdd    aa | bb
//!             ---|---
//!             cc | dd
//! ```
//!
//! With [`AttributeLayout::Simple`] the tile ids 0-3 are the quadrants of a 2x2 block. With
//! [`AttributeLayout::NibbleGrouped`] the tile ids 0-15 cover a 4x4 block, and each 2x2
//! sub-region shares one field.

use serde::{Deserialize, Serialize};

use crate::{
    common::PaletteIdx,
    error::{CodecError, CodecResult},
};

/// Field index for each tile id of a 4x4 block, i.e. `(id / 2 % 2) + 2 * (id / 8)`.
const NIBBLE_GROUPS: [usize; 16] = [0, 0, 1, 1, 0, 0, 1, 1, 2, 2, 3, 3, 2, 2, 3, 3];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeLayout {
    Simple,
    NibbleGrouped,
}

impl AttributeLayout {
    pub fn tile_count(self) -> usize {
        match self {
            AttributeLayout::Simple => 4,
            AttributeLayout::NibbleGrouped => NIBBLE_GROUPS.len(),
        }
    }

    pub fn field_index(self, tile_id: usize) -> CodecResult<usize> {
        match self {
            AttributeLayout::Simple if tile_id < 4 => Ok(tile_id),
            AttributeLayout::NibbleGrouped => NIBBLE_GROUPS.get(tile_id).copied().ok_or_else(|| {
                CodecError::argument(format!("tile id {tile_id} maps to no attribute group"))
            }),
            AttributeLayout::Simple => Err(CodecError::argument(format!(
                "tile id {tile_id} out of range for a 4-tile attribute (0-3)"
            ))),
        }
    }
}

fn field_shift(field: usize) -> u32 {
    6 - 2 * field as u32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    layout: AttributeLayout,
    value: u8,
}

impl Attribute {
    pub fn new(layout: AttributeLayout, value: u8) -> Self {
        Attribute { layout, value }
    }

    pub fn simple(value: u8) -> Self {
        Attribute::new(AttributeLayout::Simple, value)
    }

    pub fn nibble_grouped(value: u8) -> Self {
        Attribute::new(AttributeLayout::NibbleGrouped, value)
    }

    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    pub fn byte(&self) -> u8 {
        self.value
    }

    pub fn set_byte(&mut self, value: u8) {
        self.value = value;
    }

    pub fn field(&self, tile_id: usize) -> CodecResult<PaletteIdx> {
        let shift = field_shift(self.layout.field_index(tile_id)?);
        Ok((self.value >> shift) & 0b11)
    }

    /// Writing one tile id of a nibble group changes the value read back for all four
    /// members of that group.
    pub fn set_field(&mut self, tile_id: usize, value: PaletteIdx) -> CodecResult<()> {
        if value > 3 {
            return Err(CodecError::argument(format!(
                "attribute value {value} out of range (0-3)"
            )));
        }
        let shift = field_shift(self.layout.field_index(tile_id)?);
        let mask = !(0b11u8 << shift);
        self.value = (self.value & mask) | (value << shift);
        Ok(())
    }

    /// Binary rendering, most-significant bit first (e.g. `11000110`).
    pub fn byte_string(&self) -> String {
        format!("{:08b}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_fields_msb_first() {
        let mut a = Attribute::simple(0xC6);
        assert_eq!(a.byte(), 0xC6);
        assert_eq!(a.field(0).unwrap(), 3);
        assert_eq!(a.field(1).unwrap(), 0);
        assert_eq!(a.field(2).unwrap(), 1);
        assert_eq!(a.field(3).unwrap(), 2);

        a.set_field(0, 2).unwrap();
        assert_eq!(
            (0..4).map(|i| a.field(i).unwrap()).collect::<Vec<_>>(),
            vec![2, 0, 1, 2]
        );
        a.set_field(1, 1).unwrap();
        a.set_field(2, 0).unwrap();
        a.set_field(3, 3).unwrap();
        assert_eq!(
            (0..4).map(|i| a.field(i).unwrap()).collect::<Vec<_>>(),
            vec![2, 1, 0, 3]
        );
        assert_eq!(a.byte_string(), "10010011");
    }

    #[test]
    fn nibble_grouped_fields() {
        let mut a = Attribute::nibble_grouped(0xC6);
        assert_eq!(a.field(0).unwrap(), 3);
        assert_eq!(a.field(1).unwrap(), 3);
        assert_eq!(a.field(9).unwrap(), 1);
        assert_eq!(a.field(14).unwrap(), 2);

        a.set_field(6, 1).unwrap();
        for id in [2, 3, 6, 7] {
            assert_eq!(a.field(id).unwrap(), 1);
        }
        for id in [0, 1, 4, 5] {
            assert_eq!(a.field(id).unwrap(), 3);
        }
        for id in [8, 9, 12, 13] {
            assert_eq!(a.field(id).unwrap(), 1);
        }
        for id in [10, 11, 14, 15] {
            assert_eq!(a.field(id).unwrap(), 2);
        }
        assert_eq!(a.byte(), 0b1101_0110);
    }

    #[test]
    fn group_table_matches_arithmetic() {
        for id in 0..16 {
            assert_eq!(NIBBLE_GROUPS[id], (id / 2 % 2) + 2 * (id / 8));
        }
    }

    #[test]
    fn rejects_out_of_range() {
        let mut a = Attribute::nibble_grouped(0);
        assert!(matches!(a.set_field(16, 1), Err(CodecError::InvalidArgument(_))));
        assert!(matches!(a.field(16), Err(CodecError::InvalidArgument(_))));
        assert!(matches!(a.set_field(3, 4), Err(CodecError::InvalidArgument(_))));
        assert_eq!(a.byte(), 0);

        let mut s = Attribute::simple(0xFF);
        assert!(matches!(s.set_field(4, 0), Err(CodecError::InvalidArgument(_))));
        assert_eq!(s.byte(), 0xFF);
    }

    #[test]
    fn byte_string_is_zero_padded() {
        assert_eq!(Attribute::simple(1).byte_string(), "00000001");
        assert_eq!(Attribute::simple(0).byte_string(), "00000000");
    }
}
