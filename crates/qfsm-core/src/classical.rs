//! Classical reference computations.
//!
//! These mirror what the circuit computes, one boolean at a time, and serve
//! as the oracle for tests and the `verify` command.

use crate::problem::{Mode, Problem};

/// Every `j` with `j + d <= n` and `x[j..j+d] == y[j..j+d]`.
pub fn naive_positions(x: &[bool], y: &[bool], d: usize) -> Vec<usize> {
    let n = x.len().min(y.len());
    if d > n {
        return vec![];
    }
    (0..=n - d).filter(|&j| x[j..j + d] == y[j..j + d]).collect()
}

/// Match starts the circuit must report for `problem`'s mode.
pub fn expected_positions(problem: &Problem) -> Vec<usize> {
    let all = naive_positions(problem.x(), problem.y(), problem.d());
    match (problem.mode(), problem.starting_position()) {
        (Mode::FreeSearch, _) => all,
        (Mode::FixedPosition, _) => all.into_iter().filter(|&j| j == 0).collect(),
        (Mode::FromPosition, Some(p)) => all.into_iter().filter(|&j| j == p).collect(),
        (Mode::FromPosition, None) => vec![],
    }
}

/// Expected value of the found cell.
pub fn expected_found(problem: &Problem) -> bool {
    !expected_positions(problem).is_empty()
}

/// `λ_i[j]`: whether `x` and `y` agree on the `2^i` cells starting at `j`.
///
/// Windows running past the end are 0.
pub fn lambda_cell(x: &[bool], y: &[bool], i: usize, j: usize) -> bool {
    let n = x.len().min(y.len());
    if j + (1 << i) > n {
        return false;
    }
    if i == 0 {
        return x[j] == y[j];
    }
    let half = 1 << (i - 1);
    lambda_cell(x, y, i - 1, j) && lambda_cell(x, y, i - 1, j + half)
}

/// `λ_0 … λ_k` with `k = log2(n)`.
pub fn lambda_chain(x: &[bool], y: &[bool]) -> Vec<Vec<bool>> {
    let n = x.len();
    let k = n.trailing_zeros() as usize;
    (0..=k)
        .map(|i| (0..n).map(|j| lambda_cell(x, y, i, j)).collect())
        .collect()
}

/// `D₋₁, D_0, …, D_{m-1}` as the circuit computes them.
pub fn d_chain(problem: &Problem) -> Vec<Vec<bool>> {
    let n = problem.n();
    let lambda = lambda_chain(problem.x(), problem.y());
    let mut chain = vec![problem.initial_pointers()];

    for stage in 0..problem.d_len() {
        let previous = &chain[chain.len() - 1];
        let next = if problem.d_bit(stage) {
            let mut anded = vec![false; n + 1];
            for t in 0..n {
                anded[t] = previous[t] && lambda[stage][t];
            }
            let shift = (1 << stage) % (n + 1);
            let mut rotated = vec![false; n + 1];
            for (j, bit) in anded.into_iter().enumerate() {
                rotated[(j + shift) % (n + 1)] = bit;
            }
            rotated
        } else {
            previous.clone()
        };
        chain.push(next);
    }
    chain
}

/// Sum of `2^i` over the set bits `i <= end` of `d`.
pub fn bin_prefix_sum(d: usize, end: usize) -> usize {
    if end + 1 >= usize::BITS as usize {
        d
    } else {
        d & ((1 << (end + 1)) - 1)
    }
}

/// Split `pattern` into the chunks matched by each stage: one chunk of
/// length `2^i` per set bit `i` of `d`, in increasing `i`.
///
/// Chunks that would run past the end of `pattern` are dropped.
pub fn pb_decompose<T>(pattern: &[T], d: usize) -> Vec<&[T]> {
    (0..usize::BITS as usize)
        .filter(|&i| (d >> i) & 1 == 1)
        .filter_map(|i| {
            let start = if i == 0 { 0 } else { bin_prefix_sum(d, i - 1) };
            pattern.get(start..start + (1 << i))
        })
        .collect()
}
