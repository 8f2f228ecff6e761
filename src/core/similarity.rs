//! Similarity ratios between two group membership lists

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Sequences at least this long get popular-element pruning
const AUTOJUNK_MIN_LEN: usize = 200;

/// How two membership lists are scored against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityMetric {
    /// Ratcliff/Obershelp matching-blocks ratio; sensitive to member order
    #[default]
    SequenceMatcher,
    /// Set overlap |A ∩ B| / |A ∪ B|; ignores member order and duplicates
    Jaccard,
}

impl SimilarityMetric {
    pub fn score<T: Eq + Hash>(&self, a: &[T], b: &[T]) -> f64 {
        match self {
            SimilarityMetric::SequenceMatcher => SequenceMatcher::new(a, b).ratio(),
            SimilarityMetric::Jaccard => jaccard(a, b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Longest-contiguous-matching-block comparison of two sequences.
///
/// Finds the longest block common to both sequences, then recurses on the
/// pieces to its left and right. When `b` has at least 200 elements, any
/// element occurring more than `len(b) / 100 + 1` times there cannot seed
/// a block, though it can still extend one.
pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        if b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }

        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut newj2len = HashMap::new();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    newj2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = newj2len;
        }

        // Pruned elements may still extend a block on either side
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        MatchBlock { a: besti, b: bestj, size: bestsize }
    }

    /// Non-overlapping matching blocks, sorted by position
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            blocks.push(m);
        }

        blocks.sort();
        blocks
    }

    /// `2 * M / (len(a) + len(b))`; two empty sequences score 1.0
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matches as f64 / total as f64
    }
}

/// Jaccard index of the two lists taken as sets
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let a: HashSet<&T> = a.iter().collect();
    let b: HashSet<&T> = b.iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
