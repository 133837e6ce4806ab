//! Greedy single-pass grouping of pictures by fingerprint.
//!
//! Each picture joins the first existing group whose every member is
//! within the threshold of it. Unlike union-find clustering, membership
//! is not transitive and depends on input order: with A~B, B~C and
//! A!~C, the input order A, B, C gives {A, B} {C}.

use super::traits::{ComparisonStrategy, Fingerprinted};

/// Groups items greedily under a comparison strategy
pub struct SimilarityGrouper<'a> {
    strategy: &'a dyn ComparisonStrategy,
}

impl<'a> SimilarityGrouper<'a> {
    pub fn new(strategy: &'a dyn ComparisonStrategy) -> Self {
        Self { strategy }
    }

    /// Partition `items` into groups, preserving input order in and across groups.
    ///
    /// Every item lands in exactly one group; no group is empty.
    pub fn group<T>(&self, items: &[T]) -> Vec<Vec<T>>
    where
        T: Fingerprinted + Clone,
    {
        let mut groups: Vec<Vec<T>> = Vec::new();

        for item in items {
            let fingerprint = item.fingerprint();
            let home = groups.iter_mut().find(|group| {
                group.iter().all(|member| {
                    self.strategy
                        .is_similar(member.fingerprint().distance(&fingerprint))
                })
            });

            match home {
                Some(group) => group.push(item.clone()),
                None => groups.push(vec![item.clone()]),
            }
        }

        groups
    }
}
