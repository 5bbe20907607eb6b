use serde::Serialize;

/// One row of the league standings.
///
/// Counting columns are parsed independently and not cross-checked. A cell
/// that does not start with an integer is kept as `None` (serialized as
/// `null`) rather than rejected or corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    pub position: i32,
    pub team: String,
    pub matches_played: Option<i32>,
    pub wins: Option<i32>,
    pub draws: Option<i32>,
    pub losses: Option<i32>,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: Option<i32>,
    pub points: Option<i32>,
}
