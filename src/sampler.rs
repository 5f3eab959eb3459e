/*!
 * Drawing unique 4-digit codes.
 */

use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::error::PayloadError;

/// Number of distinct 4-digit codes: `0000`..=`9999`.
pub const CODE_UNIVERSE: usize = 10_000;

/// Draws `count` distinct codes uniformly from `[0, CODE_UNIVERSE)` without replacement.
/// Codes are returned in draw order.
pub fn sample_codes<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<u16>, PayloadError> {
    if count > CODE_UNIVERSE {
        return Err(PayloadError::Range { requested: count, universe: CODE_UNIVERSE });
    }
    let codes: Vec<u16> = index::sample(rng, CODE_UNIVERSE, count)
        .into_iter()
        .map(|i| i as u16)
        .collect();
    debug!(count = codes.len(), "codes sampled");
    Ok(codes)
}

///////////////////////////////////////////////////////////////////////////////////////////////////
/// Tests
///
