//! Canonical two-team partitions of a roster
//!
//! A partition is a `u32` bitmask over the sorted roster: bit `i` set puts
//! competitor `i` on team A. Each unordered split has exactly one canonical
//! mask, so swapping labels never yields a second candidate:
//!
//! - team A is the strictly smaller team, or
//! - both teams have the same size and team A holds the first competitor.
//!
//! A roster of `N` has `2^(N-1) - 1` canonical partitions, so any exhaustive
//! search is O(2^N · N).

/// Largest roster whose partitions fit a `u32` mask
pub const MAX_ROSTER_SIZE: usize = 31;

/// Number of canonical partitions of a roster of `roster_size`
///
/// Saturates at `u64::MAX` for rosters past 64 competitors.
pub fn canonical_partition_count(roster_size: usize) -> u64 {
    if roster_size < 2 {
        return 0;
    }
    u32::try_from(roster_size - 1)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .map_or(u64::MAX, |partitions| partitions - 1)
}

/// Mask with every competitor of the roster on team A
///
/// `None` once the roster no longer fits in a `u32`.
pub fn full_mask(roster_size: usize) -> Option<u32> {
    if roster_size > MAX_ROSTER_SIZE {
        return None;
    }
    u32::try_from(roster_size)
        .ok()
        .and_then(|shift| 1u32.checked_shl(shift))
        .map(|bit| bit - 1)
}

pub fn is_canonical(mask: u32, roster_size: usize) -> bool {
    let Some(full) = full_mask(roster_size) else {
        return false;
    };
    if mask == 0 || mask & full != mask || mask == full {
        return false;
    }

    let team_a = mask.count_ones() as usize;
    let team_b = roster_size - team_a;
    team_a < team_b || (team_a == team_b && mask & 1 == 1)
}

/// All canonical masks in increasing order
///
/// Empty for rosters that cannot be split or do not fit a mask.
pub fn canonical_masks(roster_size: usize) -> impl Iterator<Item = u32> {
    let end = if roster_size < 2 {
        1
    } else {
        full_mask(roster_size).unwrap_or(1)
    };
    (1..end).filter(move |mask| is_canonical(*mask, roster_size))
}

/// Roster indices of team A and team B for `mask`
pub fn split(mask: u32, roster_size: usize) -> (Vec<usize>, Vec<usize>) {
    (0..roster_size).partition(|&index| mask & (1 << index) != 0)
}
