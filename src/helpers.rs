use crate::palette::Rgb;

/// Pack 8 bits (each 0 or 1) into a byte, first element in the most-significant bit.
pub fn pack_bits(bits: &[u8; 8]) -> u8 {
    bits.iter().fold(0, |acc, &b| (acc << 1) | (b & 1))
}

/// Inverse of [`pack_bits`].
pub fn unpack_bits(byte: u8) -> [u8; 8] {
    let mut bits = [0; 8];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (byte >> (7 - i)) & 1;
    }
    bits
}

// Assembler literals: `$0F` and `%00001111`.
pub fn hex_literal(byte: u8) -> String {
    format!("${:02X}", byte)
}

pub fn binary_literal(byte: u8) -> String {
    format!("%{:08b}", byte)
}

pub fn alpha_blend(bg: Rgb, fg: Rgb, alpha: f32) -> Rgb {
    let gamma = 2.2;
    let blend = |b: u8, f: u8| {
        f32::powf(
            (1.0 - alpha) * f32::powf(b as f32, gamma) + alpha * f32::powf(f as f32, gamma),
            1.0 / gamma,
        ) as u8
    };
    Rgb {
        r: blend(bg.r, fg.r),
        g: blend(bg.g, fg.g),
        b: blend(bg.b, fg.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_bits_msb_first() {
        assert_eq!(pack_bits(&[0, 0, 0, 0, 0, 0, 0, 1]), 1);
        assert_eq!(pack_bits(&[0, 0, 0, 0, 0, 0, 1, 0]), 2);
        assert_eq!(pack_bits(&[1; 8]), 255);
        assert_eq!(pack_bits(&[1, 0, 0, 0, 0, 0, 0, 0]), 0x80);
    }

    #[test]
    fn unpack_inverts_pack() {
        for byte in [0x00u8, 0x01, 0x5A, 0xC6, 0xFF] {
            assert_eq!(pack_bits(&unpack_bits(byte)), byte);
        }
        assert_eq!(unpack_bits(0xC6), [1, 1, 0, 0, 0, 1, 1, 0]);
    }

    #[test]
    fn literals_are_zero_padded() {
        assert_eq!(hex_literal(0x0F), "$0F");
        assert_eq!(hex_literal(0xAB), "$AB");
        assert_eq!(binary_literal(1), "%00000001");
        assert_eq!(binary_literal(0xC6), "%11000110");
    }

    #[test]
    fn alpha_blend_endpoints() {
        let bg = Rgb { r: 0, g: 100, b: 200 };
        let fg = Rgb { r: 255, g: 0, b: 50 };
        let close = |a: u8, b: u8| (a as i16 - b as i16).abs() <= 1;
        let none = alpha_blend(bg, fg, 0.0);
        assert!(close(none.r, bg.r) && close(none.g, bg.g) && close(none.b, bg.b));
        let full = alpha_blend(bg, fg, 1.0);
        assert!(close(full.r, fg.r) && close(full.g, fg.g) && close(full.b, fg.b));
    }
}
