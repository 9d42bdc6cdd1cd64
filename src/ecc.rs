use crate::config::ErrorCorrection;
use crate::tables::*;

/// Highest error correction level.
pub const MAX_LEVEL: u8 = 8;

static FACTORS: [&[u16]; 9] = [
    &ECC_L0, &ECC_L1, &ECC_L2, &ECC_L3, &ECC_L4, &ECC_L5, &ECC_L6, &ECC_L7, &ECC_L8,
];

/// Number of correction codewords of a level (2 to 512).
pub const fn ecc_count(level: u8) -> usize {
    assert!(level <= MAX_LEVEL, "ECC level must be between 0 and 8 inclusive");
    1 << (level as usize + 1)
}

/// Picks the correction level for `data_len` data codewords.
pub fn select_level(ec: ErrorCorrection, data_len: usize) -> u8 {
    let auto = match data_len {
        0..=40 => 2,
        41..=160 => 3,
        161..=320 => 4,
        321..=863 => 5,
        _ => 6,
    };
    match ec {
        ErrorCorrection::Level(level) => level,
        ErrorCorrection::AutoLow => auto - 1,
        ErrorCorrection::AutoNormal => auto,
        ErrorCorrection::AutoMedium => auto + 1,
        ErrorCorrection::AutoHigh => auto + 2,
    }
}

/// Fills the last `ecc_count(level)` slots of `codewords` with the
/// correction codewords of the slots before them.
pub fn generate_ecc(codewords: &mut [u16], level: u8) {
    let factors = FACTORS[level as usize];

    debug_assert!(codewords.len() >= factors.len());
    let (data, ecc) = codewords.split_at_mut(codewords.len() - factors.len());
    ecc.fill(0);

    for cw in data {
        let t = (*cw + ecc[0]) % 929;

        for i in (0..factors.len()).rev() {
            let factor = ((t as usize * factors[i] as usize) % 929) as u16;
            let d = if i > 0 { ecc[factors.len() - i] } else { 0 };
            ecc[factors.len() - 1 - i] = (d + 929 - factor) % 929;
        }
    }

    for e in ecc {
        if *e != 0 {
            *e = 929 - *e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT_DATA: [u16; 16] = [16, 902, 1, 278, 827, 900, 295, 902, 2, 326, 823, 544, 900, 149, 900, 900];

    fn ecc_of(input: &[u16], level: u8) -> Vec<u16> {
        let mut data = input.to_vec();
        data.resize(input.len() + ecc_count(level), 0);
        generate_ecc(&mut data, level);
        data[input.len()..].to_vec()
    }

    #[test]
    fn test_ecc_l0() {
        assert_eq!(ecc_of(&INPUT_DATA, 0), [156, 765]);
    }

    #[test]
    fn test_ecc_l1() {
        assert_eq!(ecc_of(&INPUT_DATA, 1), [168, 875, 63, 355]);
    }

    #[test]
    fn test_ecc_l2() {
        assert_eq!(ecc_of(&INPUT_DATA, 2), [628, 715, 393, 299, 863, 601, 169, 708]);
    }

    #[test]
    fn test_ecc_l3() {
        assert_eq!(ecc_of(&INPUT_DATA, 3), [232, 176, 793, 616, 476, 406, 855, 445, 84, 518, 522, 721, 607, 2, 42, 578]);
    }

    #[test]
    fn test_ecc_l4() {
        assert_eq!(ecc_of(&INPUT_DATA, 4), [281, 156, 276, 668, 44, 252, 877, 30, 549, 856, 773, 639, 420, 330, 693, 329, 283, 723, 480, 482, 102, 925, 535, 892, 374, 472, 837, 331, 343, 608, 390, 364]);
    }

    #[test]
    fn test_ecc_mixed_segments() {
        let input = [17, 19 * 30 + 27, 4 * 30 + 18, 19 * 30 + 29, 902, 142, 142, 901, 169, 883, 224, 680, 517, 32, 98, 105, 110];
        assert_eq!(ecc_of(&input, 0), [516, 287]);
    }

    #[test]
    fn test_ecc_count() {
        assert_eq!(ecc_count(0), 2);
        assert_eq!(ecc_count(8), 512);
    }

    #[test]
    fn test_select_level() {
        assert_eq!(select_level(ErrorCorrection::AutoNormal, 40), 2);
        assert_eq!(select_level(ErrorCorrection::AutoNormal, 41), 3);
        assert_eq!(select_level(ErrorCorrection::AutoNormal, 160), 3);
        assert_eq!(select_level(ErrorCorrection::AutoNormal, 320), 4);
        assert_eq!(select_level(ErrorCorrection::AutoNormal, 863), 5);
        assert_eq!(select_level(ErrorCorrection::AutoNormal, 864), 6);
        assert_eq!(select_level(ErrorCorrection::AutoLow, 10), 1);
        assert_eq!(select_level(ErrorCorrection::AutoMedium, 200), 5);
        assert_eq!(select_level(ErrorCorrection::AutoHigh, 900), 8);
        assert_eq!(select_level(ErrorCorrection::Level(7), 10), 7);
    }
}
