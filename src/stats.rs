use crate::types::Board;

/// Percentage of total board area not covered by any piece.
///
/// Every piece spans the full board length, so the area of a piece is its
/// width times `board_length`. Returns 0 when no boards are used.
pub fn waste_rate(boards: &[Board], board_length: f64, board_width: f64) -> f64 {
    let total_area = boards.len() as f64 * board_length * board_width;
    if total_area <= 0.0 {
        return 0.0;
    }
    let used_area: f64 = boards
        .iter()
        .flat_map(|b| &b.pieces)
        .map(|p| p.width.value() * board_length)
        .sum();
    (total_area - used_area) / total_area * 100.0
}

/// Waste rate as reported to users: two decimal places.
pub fn format_waste_rate(rate: f64) -> String {
    format!("{rate:.2}")
}
