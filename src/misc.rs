//! Fuzzy matching of device names.

use hashbrown::HashMap;

pub trait Similarity {
    /// Dice coefficient of the character bigrams of both strings, from 0 to 1.
    fn similarity(&self, other: &Self) -> f64;
}

impl<T: AsRef<str>> Similarity for T {
    fn similarity(&self, other: &Self) -> f64 {
        similarity(self.as_ref(), other.as_ref())
    }
}

pub fn similarity(str1: &str, str2: &str) -> f64 {
    let a = str1.replace(' ', "").to_lowercase();
    let b = str2.replace(' ', "").to_lowercase();

    if a == b {
        return 1.0;
    }

    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams = HashMap::<(char, char), usize>::new();
    for i in a.windows(2) {
        *bigrams.entry((i[0], i[1])).or_default() += 1;
    }

    let mut intersection = 0;
    for i in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(i[0], i[1])).filter(|x| **x > 0) {
            *count -= 1;
            intersection += 1;
        }
    }

    (2 * intersection) as f64 / (a.len() + b.len() - 2) as f64
}

#[cfg(test)]
mod test {
    use super::{similarity, Similarity};

    #[test]
    fn test_similarity_equal() {
        assert_eq!(similarity("Built in Output", "builtin output"), 1.0);
        assert_eq!("pulse".similarity(&"pulse"), 1.0);
    }

    #[test]
    fn test_similarity_disjoint() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("a", "abc"), 0.0);
    }

    #[test]
    fn test_similarity_ranks() {
        let wanted = "usb audio";
        let close = similarity("USB Audio Device", wanted);
        let far = similarity("HDMI Output", wanted);

        assert!(close > far);
        assert!(close > 0.5);
    }
}
