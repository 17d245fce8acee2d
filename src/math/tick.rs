// Tick index arithmetic. A tick `t` stands for price 1.0001^t; pools only
// accept ticks that are exact multiples of their spacing.

/// Bounds of the representable tick range (price 2^-128 .. 2^128).
pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;

const TICK_BASE: f64 = 1.0001;

/// Largest multiple of `spacing` that is <= `tick`. Floors toward negative
/// infinity, so negative ticks snap down: align_tick(-7, 10) == -10. Plain
/// `%` would snap toward zero and shift the whole range by one spacing.
pub fn align_tick(tick: i32, spacing: i32) -> i32 {
    debug_assert!(spacing > 0, "tick spacing must be positive");
    tick.div_euclid(spacing) * spacing
}

/// 1.0001^tick. Display/sizing use only; never submitted on-chain.
pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powi(tick)
}

/// floor(log(price) / log(1.0001)), the advisory inverse of `tick_to_price`.
pub fn price_to_tick(price: f64) -> i32 {
    (price.ln() / TICK_BASE.ln()).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_tick_examples() {
        assert_eq!(align_tick(-7, 10), -10);
        assert_eq!(align_tick(23, 10), 20);
        assert_eq!(align_tick(20, 10), 20);
        assert_eq!(align_tick(0, 60), 0);
        assert_eq!(align_tick(-1, 60), -60);
        assert_eq!(align_tick(-60, 60), -60);
        assert_eq!(align_tick(-61, 60), -120);
    }

    #[test]
    fn test_align_tick_invariants() {
        for spacing in [1, 10, 60, 200] {
            for tick in (-1000..=1000).step_by(7) {
                let aligned = align_tick(tick, spacing);
                assert_eq!(aligned % spacing, 0, "aligned tick must sit on the grid");
                assert!(aligned <= tick, "aligned tick must not exceed the input");
                assert!(tick - aligned < spacing, "aligned tick must be within one spacing");
            }
        }
    }

    #[test]
    fn test_tick_to_price_at_origin() {
        assert_eq!(tick_to_price(0), 1.0);
        assert!(tick_to_price(1) > 1.0);
        assert!(tick_to_price(-1) < 1.0);
    }

    #[test]
    fn test_tick_to_price_symmetry() {
        let up = tick_to_price(600);
        let down = tick_to_price(-600);
        assert!((up * down - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_price_to_tick_floors() {
        assert_eq!(price_to_tick(1.0), 0);
        // ln(2)/ln(1.0001) = 6931.8..., floored either side of 1.0
        assert_eq!(price_to_tick(2.0), 6931);
        assert_eq!(price_to_tick(0.5), -6932);
    }
}
