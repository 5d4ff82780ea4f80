//! Bout order within a pool.
//!
//! The order comes from the circle method: position 1 stays put while the
//! others rotate one step per round, and a ghost position is added for odd
//! sizes (whoever meets the ghost rests that round). Within a round every
//! fencer fences at most once; each round is rotated so that it opens with a
//! bout sharing no fencer with the previous bout whenever one exists.

/// A bout between two pool positions (1-indexed).
pub type Pairing = (usize, usize);

/// Canonical bout order for a pool of `size` fencers.
///
/// Deterministic in `size` alone. Covers every unordered pair exactly once.
pub fn pool_match_order(size: usize) -> Vec<Pairing> {
    if size < 2 {
        return Vec::new();
    }

    let slots = size + size % 2;
    let ghost = (size % 2 == 1).then_some(slots);
    let mut wheel: Vec<usize> = (1..=slots).collect();
    let mut order: Vec<Pairing> = Vec::with_capacity(size * (size - 1) / 2);

    for round in 0..slots - 1 {
        let mut bouts: Vec<Pairing> = (0..slots / 2)
            .map(|i| {
                let (a, b) = (wheel[i], wheel[slots - 1 - i]);
                // Alternate sides of the fixed position so it doesn't always fence on the left.
                if i == 0 && round % 2 == 1 { (b, a) } else { (a, b) }
            })
            .filter(|&(a, b)| Some(a) != ghost && Some(b) != ghost)
            .collect();

        if let Some(&(prev_a, prev_b)) = order.last() {
            let rested = |&(a, b): &Pairing| ![prev_a, prev_b].iter().any(|&p| p == a || p == b);
            if let Some(start) = bouts.iter().position(rested) {
                bouts.rotate_left(start);
            }
        }
        order.extend(bouts);

        wheel[1..].rotate_right(1);
    }

    order
}

/// Number of times a fencer fences two bouts in a row in `order`.
pub fn consecutive_bouts(order: &[Pairing]) -> usize {
    order
        .windows(2)
        .filter(|pair| {
            let ((a1, b1), (a2, b2)) = (pair[0], pair[1]);
            a1 == a2 || a1 == b2 || b1 == a2 || b1 == b2
        })
        .count()
}
