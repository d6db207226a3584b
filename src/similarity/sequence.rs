//! Ratcliff/Obershelp string similarity
//!
//! `ratio` is `2 * M / T` where `T` is the total number of characters in both
//! strings and `M` the number of characters in matching blocks. Blocks are
//! found by taking the longest common substring and recursing on the pieces
//! to its left and right. Ties go to the block starting earliest in `a`, then
//! earliest in `b`, which makes the measure order-sensitive for some inputs.

/// Similarity of two strings in `[0.0, 1.0]`
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_characters(&a, &b);
    2.0 * matched as f64 / total as f64
}

/// Total size of all matching blocks
fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // lengths[j + 1] = length of the common run ending at a[i - 1], b[j]
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            if a[i] == b[j] {
                let run = prev[j] + 1;
                curr[j + 1] = run;
                if run > best_size {
                    best_i = i + 1 - run;
                    best_j = j + 1 - run;
                    best_size = run;
                }
            } else {
                curr[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_size)
}
