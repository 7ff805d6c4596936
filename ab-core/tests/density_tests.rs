use ab_core::utils::mechanics::density::DensityMap;

/// Duty 0 and duty 100 hit the configured bounds exactly, not approximately.
#[test]
fn boundary_exactness_generic() {
    let map = DensityMap::GENERIC;
    assert_eq!(map.density(false, 0), 80);
    assert_eq!(map.density(false, 100), i8::MAX);
    assert_eq!(map.density(true, 0), -76);
    assert_eq!(map.density(true, 100), i8::MIN);
}

#[test]
fn boundary_exactness_rev_b() {
    let map = DensityMap::REV_B;
    assert_eq!(map.density(false, 0), 87);
    assert_eq!(map.density(false, 100), i8::MAX);
    assert_eq!(map.density(true, 0), -110);
    assert_eq!(map.density(true, 100), i8::MIN);
}

/// Within each direction the mapping is monotonic over the whole duty range:
/// non-decreasing for the low-level band, non-increasing for the high-level
/// band (whose bounds run toward the negative extreme).
#[test]
fn monotonic_over_full_duty_range() {
    for map in [DensityMap::GENERIC, DensityMap::REV_B] {
        let mut prev_low = map.density(false, 0);
        let mut prev_high = map.density(true, 0);
        for duty in 1..=100u8 {
            let low = map.density(false, duty);
            let high = map.density(true, duty);
            assert!(low >= prev_low, "low band regressed at duty {duty}");
            assert!(high <= prev_high, "high band regressed at duty {duty}");
            prev_low = low;
            prev_high = high;
        }
    }
}

/// Representative interior points, checked against hand-computed values.
#[test]
fn interior_values() {
    let map = DensityMap::GENERIC;
    assert_eq!(map.density(false, 50), 103); // 80 + 47 * 50 / 100
    assert_eq!(map.density(true, 50), -102); // -76 - 52 * 50 / 100
    assert_eq!(map.density(false, 5), 82);
    assert_eq!(map.density(true, 5), -78);

    let map = DensityMap::REV_B;
    assert_eq!(map.density(false, 50), 107); // 87 + 40 * 50 / 100
    assert_eq!(map.density(true, 50), -119); // -110 - 18 * 50 / 100
}

/// The encoder is a pure function: same inputs, same output.
#[test]
fn deterministic() {
    let map = DensityMap::GENERIC;
    for duty in 0..=100u8 {
        for level in [false, true] {
            assert_eq!(map.density(level, duty), map.density(level, duty));
        }
    }
}

/// The off density is the representable extreme opposite the drive band and
/// does not depend on the calibrated bounds.
#[test]
fn off_density_is_opposite_extreme() {
    for map in [DensityMap::GENERIC, DensityMap::REV_B] {
        assert_eq!(map.off(false), i8::MIN);
        assert_eq!(map.off(true), i8::MAX);
    }
}

#[test]
fn custom_bounds_are_honored() {
    let map = DensityMap::new((-90, i8::MIN), (70, 120));
    assert_eq!(map.density(true, 0), -90);
    assert_eq!(map.density(false, 100), 120);
    assert_eq!(map.bounds(false), (70, 120));
}
