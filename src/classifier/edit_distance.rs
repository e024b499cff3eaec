//! Length of the shortest insert/delete edit script between two sequences.
//!
//! Uses Myers' O((N+M)·D) algorithm over furthest-reaching diagonals after
//! stripping the common prefix and suffix. Substitutions count as one
//! deletion plus one insertion, so `"hello"` -> `"hella"` has distance 2.

/// Shortest edit script length between `a` and `b`.
pub fn edit_distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    edit_distance_within(a, b, a.len() + b.len()).unwrap_or(a.len() + b.len())
}

/// Shortest edit script length if it is at most `limit`, else `None`.
///
/// Bounding the search keeps large, completely rewritten files cheap: the
/// work stops as soon as the distance is known to exceed `limit`.
pub fn edit_distance_within<T: PartialEq>(a: &[T], b: &[T], limit: usize) -> Option<usize> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    let (n, m) = (a.len(), b.len());
    if n.abs_diff(m) > limit {
        return None;
    }
    if n == 0 || m == 0 {
        return Some(n + m);
    }

    let max_d = (n + m).min(limit);
    let offset = max_d as isize + 1;
    let mut v = vec![0usize; 2 * max_d + 3];

    for d in 0..=max_d as isize {
        let mut k = -d;
        while k <= d {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && a[x] == b[y] {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                return Some(d as usize);
            }
            k += 2;
        }
    }
    None
}
