use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamImpactRow {
    pub team: String,
    pub position: String,
    /// Change in roster total games when a player of this team/position is added.
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionRanking {
    pub position: String,
    pub rows: Vec<TeamImpactRow>,
}

/// Group `rows` by position in `positions` order, sort each group by descending delta and keep
/// the first `top_n`. The sort is stable: equal deltas keep their input order.
pub fn rank_by_position(
    rows: Vec<TeamImpactRow>,
    positions: &[String],
    top_n: usize,
) -> Vec<PositionRanking> {
    positions
        .iter()
        .map(|position| {
            let mut ranked: Vec<TeamImpactRow> = rows
                .iter()
                .filter(|row| &row.position == position)
                .cloned()
                .collect();
            ranked.sort_by(|left, right| right.delta.cmp(&left.delta));
            ranked.truncate(top_n);
            PositionRanking {
                position: position.clone(),
                rows: ranked,
            }
        })
        .collect()
}
