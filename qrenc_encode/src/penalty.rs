//! Mask evaluation: the lower the score, the easier the symbol is to scan.

use itertools::Itertools;

use qrenc_core::Canvas;

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// Dark-light pattern looking like a locator, with four light modules on one side.
const FINDER_LIKE: [bool; 11] = [
    true, false, true, true, true, false, true, false, false, false, false,
];

/// Compute the penalty score of a fully painted `canvas`.
pub fn score(canvas: &Canvas) -> u32 {
    let size = canvas.size();
    let rows = (0..size).map(|i| (0..size).map(|j| canvas.is_dark(i, j)).collect_vec());
    let columns = (0..size).map(|j| (0..size).map(|i| canvas.is_dark(i, j)).collect_vec());
    let lines_score: u32 = rows
        .chain(columns)
        .map(|line| runs_score(&line) + finder_like_score(&line))
        .sum();
    lines_score + blocks_score(canvas) + balance_score(canvas)
}

/// Runs of five or more modules of the same color.
fn runs_score(line: &[bool]) -> u32 {
    line.iter()
        .dedup_with_count()
        .filter(|&(len, _)| len >= 5)
        .map(|(len, _)| N1 + (len as u32 - 5))
        .sum()
}

/// Occurrences of the 1:1:3:1:1 locator-like pattern preceded or followed by four light modules.
fn finder_like_score(line: &[bool]) -> u32 {
    let count = line
        .windows(FINDER_LIKE.len())
        .filter(|window| {
            window.iter().eq(FINDER_LIKE.iter()) || window.iter().eq(FINDER_LIKE.iter().rev())
        })
        .count();
    N3 * count as u32
}

/// 2x2 blocks of the same color.
fn blocks_score(canvas: &Canvas) -> u32 {
    let size = canvas.size();
    let mut count = 0;
    for i in 0..size.saturating_sub(1) {
        for j in 0..size.saturating_sub(1) {
            let color = canvas.is_dark(i, j);
            if canvas.is_dark(i, j + 1) == color
                && canvas.is_dark(i + 1, j) == color
                && canvas.is_dark(i + 1, j + 1) == color
            {
                count += 1;
            }
        }
    }
    N2 * count
}

/// Deviation of the dark module ratio from 50%, in 5% steps.
fn balance_score(canvas: &Canvas) -> u32 {
    let total = canvas.size() * canvas.size();
    if total == 0 {
        return 0;
    }
    let percent = canvas.dark_count() * 100 / total;
    N4 * (percent.abs_diff(50) / 5) as u32
}
