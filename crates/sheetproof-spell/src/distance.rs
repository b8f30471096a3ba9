//! Optimal string alignment distance
//!
//! Levenshtein distance plus transposition of two adjacent characters, where
//! no substring is edited more than once. "recieve" is one edit from
//! "receive".

/// Edit distance between two words, counted over characters
pub fn osa_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    distance_chars(&a, &b, usize::MAX).unwrap_or(usize::MAX)
}

/// Edit distance if it is at most `max`, otherwise `None`
///
/// Gives up as soon as a whole row of the table exceeds `max`.
pub(crate) fn distance_chars(a: &[char], b: &[char], max: usize) -> Option<usize> {
    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let width = b.len() + 1;
    // Three rolling rows: two back (for transpositions), previous, current
    let mut before: Vec<usize> = vec![0; width];
    let mut prev: Vec<usize> = (0..width).collect();
    let mut curr: Vec<usize> = vec![0; width];

    for i in 1..=a.len() {
        curr[0] = i;
        let mut row_min = curr[0];

        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut value = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                value = value.min(before[j - 2] + 1);
            }

            curr[j] = value;
            row_min = row_min.min(value);
        }

        if row_min > max {
            return None;
        }

        std::mem::swap(&mut before, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= max).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        assert_eq!(osa_distance("invoice", "invoice"), 0);
        assert_eq!(osa_distance("", ""), 0);
    }

    #[test]
    fn test_single_edits() {
        assert_eq!(osa_distance("cat", "cut"), 1);
        assert_eq!(osa_distance("cat", "cats"), 1);
        assert_eq!(osa_distance("cats", "cat"), 1);
        assert_eq!(osa_distance("", "abc"), 3);
    }

    #[test]
    fn test_transposition() {
        assert_eq!(osa_distance("recieve", "receive"), 1);
        assert_eq!(osa_distance("thsi", "this"), 1);
        assert_eq!(osa_distance("teh", "the"), 1);
    }

    #[test]
    fn test_osa_is_not_full_damerau() {
        // Unrestricted Damerau-Levenshtein would give 2 here
        assert_eq!(osa_distance("ca", "abc"), 3);
    }

    #[test]
    fn test_counts_characters() {
        assert_eq!(osa_distance("café", "cafe"), 1);
    }

    #[test]
    fn test_bounded() {
        let a: Vec<char> = "invoice".chars().collect();
        let b: Vec<char> = "involve".chars().collect();
        let c: Vec<char> = "budget".chars().collect();
        assert_eq!(distance_chars(&a, &b, 2), Some(2));
        assert_eq!(distance_chars(&a, &b, 1), None);
        assert_eq!(distance_chars(&a, &c, 2), None);
    }
}
