//! Seed placement for direct elimination tableaus.
//!
//! Supported sizes follow the FIE draw tables, which are built by doubling:
//! each seed `s` of the table of `n` opens a pair with its mirror
//! `2n + 1 - s`, and the pair is flipped on every other line so that the two
//! halves of the tableau stay balanced.

use log::warn;
use serde::{Deserialize, Serialize};

/// Smallest tableau ever generated.
pub const MIN_TABLEAU_SIZE: usize = 4;

/// Largest tableau; qualifiers beyond it are not placed.
pub const MAX_TABLEAU_SIZE: usize = 64;

/// Seed rank for each tableau line, top to bottom.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Seeding {
    pub order: Vec<u32>,
    /// False when the size has no draw table and `order` is the identity.
    pub from_table: bool,
}

pub fn is_supported_size(size: usize) -> bool {
    size.is_power_of_two() && (MIN_TABLEAU_SIZE..=MAX_TABLEAU_SIZE).contains(&size)
}

/// Seed order for a tableau of `size` lines.
pub fn seeding(size: usize) -> Seeding {
    if is_supported_size(size) {
        return Seeding {
            order: draw_table(size),
            from_table: true,
        };
    }

    warn!("No draw table for a tableau of {size}, seeding in rank order");
    Seeding {
        order: (1..=size as u32).collect(),
        from_table: false,
    }
}

fn draw_table(size: usize) -> Vec<u32> {
    let mut table = vec![1u32, 2];
    while table.len() < size {
        let mirror = 2 * table.len() as u32 + 1;
        table = table
            .iter()
            .enumerate()
            .flat_map(|(line, &seed)| {
                if line % 2 == 0 {
                    [seed, mirror - seed]
                } else {
                    [mirror - seed, seed]
                }
            })
            .collect();
    }
    table
}

/// Tableau size for a number of qualified fencers: the smallest supported
/// power of two that holds them all, capped at [`MAX_TABLEAU_SIZE`].
pub fn tableau_size_for(qualified: usize) -> usize {
    if qualified == 0 {
        return 0;
    }
    qualified
        .min(MAX_TABLEAU_SIZE)
        .next_power_of_two()
        .max(MIN_TABLEAU_SIZE)
}
