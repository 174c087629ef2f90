use crate::real::Real;

/// Session-wide escape bound for `|z|²`. The orbit has escaped once its
/// squared norm reaches this value.
pub const ESCAPE_BOUND: f64 = 16.0;

/// Escape-time iteration count for the point `c = cre + i·cim`.
///
/// Starts from `z₀ = c` and iterates `z ← z² + c` while `|z|² < 16` and the
/// count is below `max_iter`. Returns 0 when the point is already outside
/// the bound, and `max_iter` (the in-set sentinel) when the orbit never
/// escapes. Written once over [`Real`]; both backends run the identical
/// control flow.
pub fn escape_time<T: Real>(cre: &T, cim: &T, max_iter: u32) -> u32 {
    let mut zre = cre.clone();
    let mut zim = cim.clone();
    let mut count = 0;

    while count < max_iter {
        let re_sq = zre.square();
        let im_sq = zim.square();
        if re_sq.add(&im_sq).exceeds(ESCAPE_BOUND) {
            break;
        }
        // z ← z² + c
        let next_re = re_sq.sub(&im_sq).add(cre);
        let next_im = zre.mul(&zim).scale(2.0).add(cim);
        zre = next_re;
        zim = next_im;
        count += 1;
    }

    count
}
