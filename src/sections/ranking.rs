// Token leaderboard.

use crate::model::User;

/// Users ordered by token balance, highest first. Ties break by name so the
/// order is stable across renders.
pub fn token_ranking(users: &[User]) -> Vec<&User> {
    let mut ranked: Vec<&User> = users.iter().collect();
    ranked.sort_by(|a, b| b.tokens.cmp(&a.tokens).then_with(|| a.name.cmp(&b.name)));
    ranked
}

/// 1-based rank of one user in the leaderboard, `None` when absent.
pub fn rank_of(users: &[User], user_id: &str) -> Option<usize> {
    token_ranking(users)
        .iter()
        .position(|u| u.id == user_id)
        .map(|i| i + 1)
}
