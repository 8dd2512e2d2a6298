use crate::models::User;

/// Similarity of a user to themself
pub const SELF_SIMILARITY: f64 = 1.0;

/// Similarity assumed when either user has rated nothing
pub const UNKNOWN_SIMILARITY: f64 = 0.5;

/// Similarity of users with no co-rated item; also replaces non-finite results
pub const DISJOINT_SIMILARITY: f64 = 0.01;

/// Cosine similarity of two users over the items both have rated
///
/// Both the dot product and the magnitudes are taken over the shared items only,
/// so rating many unrelated items does not pull two users apart.
///
/// - same user id: [`SELF_SIMILARITY`]
/// - either rating vector empty: [`UNKNOWN_SIMILARITY`]
/// - no shared item: [`DISJOINT_SIMILARITY`]
///
/// The result is always finite.
pub fn similarity(u: &User, v: &User) -> f64 {
    if u.id == v.id {
        return SELF_SIMILARITY;
    }

    if !u.has_ratings() || !v.has_ratings() {
        return UNKNOWN_SIMILARITY;
    }

    // Walk the smaller vector and look items up in the larger one; shared items are
    // visited in id order either way
    let (small, large) = if u.ratings.len() <= v.ratings.len() {
        (u, v)
    } else {
        (v, u)
    };

    let mut dot_product = 0.0;
    let mut small_sq = 0.0;
    let mut large_sq = 0.0;
    let mut shared = 0usize;

    for (item, a) in &small.ratings {
        let Some(b) = large.ratings.get(item) else {
            continue;
        };
        shared += 1;
        dot_product += a * b;
        small_sq += a * a;
        large_sq += b * b;
    }

    if shared == 0 {
        return DISJOINT_SIMILARITY;
    }

    let score = dot_product / (small_sq.sqrt() * large_sq.sqrt());

    if !score.is_finite() {
        tracing::warn!(
            user = %u.id,
            other = %v.id,
            shared,
            "Non-finite similarity, substituting disjoint similarity"
        );
        return DISJOINT_SIMILARITY;
    }

    score
}
