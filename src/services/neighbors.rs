use crate::models::{ItemId, User};

use super::similarity::similarity;

/// Another user weighed into a prediction, borrowed from the population
///
/// Lives only as long as the prediction call that produced it.
#[derive(Debug, Clone, Copy)]
pub struct ScoredNeighbor<'a> {
    pub user: &'a User,
    pub similarity: f64,
}

/// Selects up to `neighbor_budget` raters of `item` most similar to `target`
///
/// Candidates are the users in `population` other than `target` who have rated
/// `item`, scanned in population order. Scanning stops once `neighbor_budget`
/// candidates have reached `min_similarity`, so the ranking only covers the
/// candidates seen up to that point and depends on population order.
///
/// The result is sorted by similarity, descending; ties keep population order.
pub fn select_neighbors<'a>(
    target: &User,
    item: ItemId,
    population: &'a [User],
    neighbor_budget: usize,
    min_similarity: f64,
) -> Vec<ScoredNeighbor<'a>> {
    if neighbor_budget == 0 {
        return Vec::new();
    }

    let mut scanned: Vec<ScoredNeighbor<'a>> = Vec::new();
    let mut qualifying = 0usize;

    for candidate in population
        .iter()
        .filter(|other| other.id != target.id && other.has_rated(item))
    {
        let score = similarity(target, candidate);
        scanned.push(ScoredNeighbor {
            user: candidate,
            similarity: score,
        });

        if score >= min_similarity {
            qualifying += 1;
            if qualifying >= neighbor_budget {
                break;
            }
        }
    }

    let scanned_count = scanned.len();

    // sort_by is stable, which keeps population order among equal similarities
    scanned.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scanned.truncate(neighbor_budget);

    tracing::trace!(
        user = %target.id,
        item = %item,
        scanned = scanned_count,
        qualifying,
        selected = scanned.len(),
        "Neighbors selected"
    );

    scanned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;

    fn user(id: i64, ratings: &[(i64, f64)]) -> User {
        User::with_ratings(
            UserId(id),
            ratings.iter().map(|&(item, score)| (ItemId(item), score)),
        )
    }

    fn ids(neighbors: &[ScoredNeighbor<'_>]) -> Vec<i64> {
        neighbors.iter().map(|n| n.user.id.0).collect()
    }

    #[test]
    fn test_excludes_target_and_non_raters() {
        let target = user(1, &[(1, 5.0)]);
        let population = vec![
            target.clone(),
            user(2, &[(1, 4.0)]),
            user(3, &[(1, 5.0), (9, 3.0)]),
        ];

        let neighbors = select_neighbors(&target, ItemId(9), &population, 5, 0.0);
        assert_eq!(ids(&neighbors), vec![3]);
    }

    #[test]
    fn test_no_candidates() {
        let target = user(1, &[(1, 5.0)]);
        let population = vec![user(2, &[(1, 4.0)])];
        assert!(select_neighbors(&target, ItemId(9), &population, 3, 0.0).is_empty());
    }

    #[test]
    fn test_zero_budget_selects_nobody() {
        let target = user(1, &[(1, 5.0)]);
        let population = vec![user(2, &[(1, 4.0), (9, 3.0)])];
        assert!(select_neighbors(&target, ItemId(9), &population, 0, 0.0).is_empty());
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let target = user(1, &[(1, 5.0), (2, 1.0)]);
        let population = vec![
            // disjoint => 0.01
            user(2, &[(3, 4.0), (9, 1.0)]),
            // identical direction => 1.0
            user(3, &[(1, 5.0), (2, 1.0), (9, 4.0)]),
            // somewhere between
            user(4, &[(1, 1.0), (2, 5.0), (9, 2.0)]),
        ];

        let neighbors = select_neighbors(&target, ItemId(9), &population, 2, 2.0);
        assert_eq!(ids(&neighbors), vec![3, 4]);
        assert!(neighbors[0].similarity >= neighbors[1].similarity);
    }

    #[test]
    fn test_ties_keep_population_order() {
        let target = user(1, &[(1, 5.0)]);
        let population = vec![
            user(5, &[(2, 1.0), (9, 1.0)]),
            user(3, &[(3, 1.0), (9, 2.0)]),
            user(4, &[(4, 1.0), (9, 3.0)]),
        ];

        let neighbors = select_neighbors(&target, ItemId(9), &population, 3, 2.0);
        assert_eq!(ids(&neighbors), vec![5, 3, 4]);
    }

    #[test]
    fn test_early_stop_after_budget_reached() {
        let target = user(1, &[(1, 5.0), (2, 1.0)]);
        let population = vec![
            user(2, &[(1, 5.0), (2, 1.0), (9, 4.0)]),
            // would rank equal, but is never scanned
            user(3, &[(1, 5.0), (2, 1.0), (9, 2.0)]),
        ];

        let neighbors = select_neighbors(&target, ItemId(9), &population, 1, 0.9);
        assert_eq!(ids(&neighbors), vec![2]);
    }

    #[test]
    fn test_low_similarity_does_not_stop_scan() {
        let target = user(1, &[(1, 5.0), (2, 1.0)]);
        let population = vec![
            // disjoint, below threshold, keeps the scan going
            user(2, &[(3, 5.0), (9, 1.0)]),
            user(3, &[(1, 5.0), (2, 1.0), (9, 4.0)]),
        ];

        let neighbors = select_neighbors(&target, ItemId(9), &population, 1, 0.9);
        assert_eq!(ids(&neighbors), vec![3]);
    }

    #[test]
    fn test_identical_candidates_keep_population_order() {
        let target_ratings: Vec<(i64, f64)> =
            (1..=52).map(|i| (i, (i % 5 + 1) as f64 * 0.9)).collect();
        let target = user(1, &target_ratings);

        let mut shared: Vec<(i64, f64)> =
            (1..=12).map(|i| (i * 4, (i % 4 + 1) as f64 * 1.1)).collect();
        shared.push((999, 4.0));
        let population: Vec<User> = (2..60).map(|id| user(id, &shared)).collect();

        let neighbors = select_neighbors(&target, ItemId(999), &population, 3, 2.0);
        assert_eq!(ids(&neighbors), vec![2, 3, 4]);
    }

    #[test]
    fn test_similarity_equal_to_threshold_counts() {
        let target = user(1, &[(1, 5.0), (2, 1.0)]);
        let population = vec![
            // disjoint => exactly 0.01
            user(2, &[(3, 5.0), (9, 1.0)]),
            user(3, &[(1, 5.0), (2, 1.0), (9, 4.0)]),
        ];

        let neighbors = select_neighbors(&target, ItemId(9), &population, 1, 0.01);
        assert_eq!(ids(&neighbors), vec![2]);
        assert_eq!(neighbors[0].similarity, 0.01);
    }

    #[test]
    fn test_never_exceeds_budget() {
        let target = user(1, &[(1, 3.0)]);
        let population: Vec<User> = (2..20).map(|id| user(id, &[(1, 2.0), (9, 4.0)])).collect();

        for k in 1..25 {
            let neighbors = select_neighbors(&target, ItemId(9), &population, k, 0.0);
            assert_eq!(neighbors.len(), k.min(population.len()));
        }
    }
}
