use crate::storage::{get_tick_bitmap_word, set_tick_bitmap_word};
use clamm_math::{least_significant_bit, most_significant_bit};
use clamm_types::Error;
use ethnum::U256;
use soroban_sdk::Env;

// One bit per spacing-compressed tick, 256 ticks per word.

/// Word index and bit index of a compressed tick.
/// Negative ticks use the euclidean remainder so ordering holds across zero.
pub fn position(compressed: i32) -> (i32, u32) {
    (compressed >> 8, compressed.rem_euclid(256) as u32)
}

/// Compress a tick by the spacing, rounding towards negative infinity
fn compress(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing)
}

/// Flip a tick in the bitmap
pub fn flip_tick(env: &Env, tick: i32, tick_spacing: i32) -> Result<(), Error> {
    if tick % tick_spacing != 0 {
        return Err(Error::TickNotOnSpacing);
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let mask = U256::ONE << bit_pos;
    let word = get_tick_bitmap_word(env, word_pos);
    set_tick_bitmap_word(env, word_pos, word ^ mask);
    Ok(())
}

/// Find the next initialized tick within one word
/// Returns (tick, initialized). When nothing is set the word boundary is
/// returned, so callers loop word by word.
pub fn next_initialized_tick_within_one_word(
    env: &Env,
    tick: i32,
    tick_spacing: i32,
    lte: bool, // less than or equal (searching left)
) -> (i32, bool) {
    let compressed = compress(tick, tick_spacing);

    if lte {
        let (word_pos, bit_pos) = position(compressed);

        // All bits at or below the current position
        let mask = (U256::ONE << bit_pos) - U256::ONE + (U256::ONE << bit_pos);
        let masked = get_tick_bitmap_word(env, word_pos) & mask;

        let initialized = masked != U256::ZERO;
        let next = if initialized {
            let msb = most_significant_bit(masked);
            (compressed - (bit_pos - msb) as i32) * tick_spacing
        } else {
            (compressed - bit_pos as i32) * tick_spacing
        };

        (next, initialized)
    } else {
        // Start from the next tick, the current one is already crossed
        let (word_pos, bit_pos) = position(compressed + 1);

        // All bits at or above the position
        let mask = !((U256::ONE << bit_pos) - U256::ONE);
        let masked = get_tick_bitmap_word(env, word_pos) & mask;

        let initialized = masked != U256::ZERO;
        let next = if initialized {
            let lsb = least_significant_bit(masked);
            (compressed + 1 + (lsb - bit_pos) as i32) * tick_spacing
        } else {
            (compressed + 1 + (255 - bit_pos) as i32) * tick_spacing
        };

        (next, initialized)
    }
}
