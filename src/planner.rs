use crate::types::{Board, CutRequest, Measure, Piece, Plan};

/// Slack allowed when testing whether a piece still fits on a board. Matches
/// the two-decimal display precision, so a board shown with `0.00` remaining
/// is never rejected for a piece that fitted before rounding.
pub const FIT_EPSILON: f64 = 0.01;

/// A board while planning is in progress.
struct OpenBoard {
    widths: Vec<f64>,
    remain: f64,
}

/// First-fit decreasing planner.
///
/// Expects validated input: every width is positive and no wider than the
/// board, and counts are bounded.
pub struct Planner {
    board_width: f64,
    requests: Vec<CutRequest>,
}

impl Planner {
    pub fn new(board_width: f64, requests: Vec<CutRequest>) -> Self {
        Self {
            board_width,
            requests,
        }
    }

    pub fn plan(&self) -> Plan {
        let boards: Vec<Board> = self
            .assign()
            .into_iter()
            .map(|open| Board {
                pieces: open
                    .widths
                    .into_iter()
                    .map(|w| Piece {
                        width: Measure::new(w),
                    })
                    .collect(),
                remain: Measure::new(open.remain),
            })
            .collect();

        tracing::debug!(
            boards = boards.len(),
            board_width = self.board_width,
            "planned cuts"
        );

        Plan {
            boards,
            board_width: self.board_width,
        }
    }

    /// First-fit scan on unrounded widths. Rounding only happens when the
    /// result is turned into output boards.
    fn assign(&self) -> Vec<OpenBoard> {
        let mut boards: Vec<OpenBoard> = Vec::new();

        for width in self.expand_requests() {
            match boards
                .iter_mut()
                .find(|b| b.remain >= width - FIT_EPSILON)
            {
                Some(board) => {
                    board.widths.push(width);
                    board.remain -= width;
                }
                None => boards.push(OpenBoard {
                    widths: vec![width],
                    remain: self.board_width - width,
                }),
            }
        }

        boards
    }

    fn expand_requests(&self) -> Vec<f64> {
        let mut pieces = Vec::new();
        for r in &self.requests {
            for _ in 0..r.count {
                pieces.push(r.width);
            }
        }
        // Widest first; the sort is stable so equal widths keep request order
        pieces.sort_by(|a, b| b.total_cmp(a));
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn widths(board: &Board) -> Vec<f64> {
        board.pieces.iter().map(|p| p.width.value()).collect()
    }

    /// Plans `requests` and checks conservation and capacity, both on the
    /// unrounded assignment and on the output boards.
    fn checked_plan(board_width: f64, requests: &[CutRequest]) -> Plan {
        let planner = Planner::new(board_width, requests.to_vec());
        let expected: usize = requests.iter().map(|r| r.count as usize).sum();

        let open = planner.assign();
        let placed: usize = open.iter().map(|b| b.widths.len()).sum();
        assert_eq!(placed, expected, "expected {expected} pieces placed, got {placed}");
        for (bi, board) in open.iter().enumerate() {
            let used: f64 = board.widths.iter().sum();
            assert!(
                used <= board_width + FIT_EPSILON + 1e-9,
                "board {bi} overfilled: {used} on {board_width}"
            );
            assert!(
                (used + board.remain - board_width).abs() <= 1e-9,
                "board {bi}: used {used} + remain {} != {board_width}",
                board.remain
            );
        }

        let plan = planner.plan();
        assert_eq!(plan.piece_count(), expected);
        assert_eq!(plan.board_count(), open.len());
        for (bi, (board, raw)) in plan.boards.iter().zip(&open).enumerate() {
            assert!(!board.pieces.is_empty(), "board {bi} is empty");
            assert_eq!(board.remain, Measure::new(raw.remain));
            assert!(
                board.remain.value() >= -FIT_EPSILON,
                "board {bi} overfilled: remain {}",
                board.remain
            );
        }
        plan
    }

    #[test]
    fn test_two_halves_fill_one_board() {
        let requests = vec![CutRequest::new(61.0, 2)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 1);
        assert_eq!(widths(&plan.boards[0]), vec![61.0, 61.0]);
        assert_eq!(plan.boards[0].remain.to_string(), "0");
    }

    #[test]
    fn test_oversized_pairs_need_two_boards() {
        let requests = vec![CutRequest::new(100.0, 2)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 2);
        for board in &plan.boards {
            assert_eq!(widths(board), vec![100.0]);
            assert_eq!(board.remain.to_string(), "22");
        }
    }

    #[test]
    fn test_third_piece_opens_new_board() {
        let requests = vec![CutRequest::new(50.0, 3)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 2);
        assert_eq!(widths(&plan.boards[0]), vec![50.0, 50.0]);
        assert_eq!(plan.boards[0].remain.value(), 22.0);
        assert_eq!(widths(&plan.boards[1]), vec![50.0]);
        assert_eq!(plan.boards[1].remain.value(), 72.0);
    }

    #[test]
    fn test_largest_pieces_placed_first() {
        // Request order is small first; the plan must still start with 80
        let requests = vec![CutRequest::new(40.0, 1), CutRequest::new(80.0, 1)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 1);
        assert_eq!(widths(&plan.boards[0]), vec![80.0, 40.0]);
        assert_eq!(plan.boards[0].remain.value(), 2.0);
    }

    #[test]
    fn test_first_fit_not_best_fit() {
        // After 65, 60 and 58 the boards remain 57 and 4. The 3 goes to the
        // first board even though the second one is the tighter fit.
        let requests = vec![
            CutRequest::new(65.0, 1),
            CutRequest::new(60.0, 1),
            CutRequest::new(58.0, 1),
            CutRequest::new(3.0, 1),
        ];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(widths(&plan.boards[0]), vec![65.0, 3.0]);
        assert_eq!(plan.boards[0].remain.value(), 54.0);
        assert_eq!(widths(&plan.boards[1]), vec![60.0, 58.0]);
        assert_eq!(plan.boards[1].remain.value(), 4.0);
    }

    #[test]
    fn test_epsilon_absorbs_rounding() {
        // Three pieces of 33.33 leave 0.01 of 100; a piece 0.01 wider than
        // the remainder still counts as fitting.
        let requests = vec![CutRequest::new(33.33, 3), CutRequest::new(0.02, 1)];
        let plan = checked_plan(100.0, &requests);
        assert_eq!(plan.board_count(), 1);
    }

    #[test]
    fn test_many_thin_pieces_never_overfill() {
        // 0.374 rounds to 0.37 for display; if the remain were rounded per
        // cut, all 329 pieces (123.046 cm) would land on one 122 cm board.
        let requests = vec![CutRequest::new(0.374, 329)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 2);
        assert_eq!(plan.boards[0].pieces.len(), 326);
        assert_eq!(plan.boards[1].pieces.len(), 3);
    }

    #[test]
    fn test_half_cent_pieces_stay_within_board() {
        let requests = vec![CutRequest::new(0.005, 1000)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 1);
        assert_eq!(plan.boards[0].remain.to_string(), "117");
    }

    #[test]
    fn test_fractional_widths_format() {
        let requests = vec![CutRequest::new(33.333, 1)];
        let plan = Planner::new(122.0, requests).plan();
        assert_eq!(plan.boards[0].pieces[0].width.to_string(), "33.33");
        assert_eq!(plan.boards[0].remain.to_string(), "88.67");
    }

    #[test]
    fn test_no_requests() {
        let plan = Planner::new(122.0, vec![]).plan();
        assert_eq!(plan.board_count(), 0);
        assert_eq!(plan.piece_count(), 0);
    }

    #[test]
    fn test_full_width_pieces_one_per_board() {
        let requests = vec![CutRequest::new(122.0, 5)];
        let plan = checked_plan(122.0, &requests);
        assert_eq!(plan.board_count(), 5);
    }

    #[test]
    fn test_thousand_pieces() {
        let requests = vec![
            CutRequest::new(30.5, 400),
            CutRequest::new(45.25, 350),
            CutRequest::new(12.0, 250),
        ];
        let plan = checked_plan(122.0, &requests);
    }

    fn requests_strategy() -> impl Strategy<Value = (f64, Vec<CutRequest>)> {
        (10u32..=1000).prop_flat_map(|board_cm| {
            let board_width = board_cm as f64;
            // Whole cents, or thousandths that do not survive display rounding
            let width = prop_oneof![
                (1u32..=board_cm * 100).prop_map(|cents| cents as f64 / 100.0),
                (1u32..=board_cm * 1000).prop_map(|milli| milli as f64 / 1000.0),
            ];
            let request = (width, 1u32..=60)
                .prop_map(|(width, count)| CutRequest::new(width, count));
            (Just(board_width), prop::collection::vec(request, 1..10))
        })
    }

    proptest! {
        #[test]
        fn plan_conserves_pieces_and_respects_capacity((board_width, requests) in requests_strategy()) {
            checked_plan(board_width, &requests);
        }

        #[test]
        fn plan_is_deterministic((board_width, requests) in requests_strategy()) {
            let a = Planner::new(board_width, requests.clone()).plan();
            let b = Planner::new(board_width, requests).plan();
            prop_assert_eq!(a.board_count(), b.board_count());
            let mut ra: Vec<f64> = a.boards.iter().map(|x| x.remain.value()).collect();
            let mut rb: Vec<f64> = b.boards.iter().map(|x| x.remain.value()).collect();
            ra.sort_by(f64::total_cmp);
            rb.sort_by(f64::total_cmp);
            prop_assert_eq!(ra, rb);
        }

        #[test]
        fn board_count_within_bounds((board_width, requests) in requests_strategy()) {
            let plan = Planner::new(board_width, requests.clone()).plan();
            let total: f64 = requests.iter().map(|r| r.width * r.count as f64).sum();
            let pieces: usize = requests.iter().map(|r| r.count as usize).sum();
            // Slack for the per-board epsilon
            let lower = ((total - FIT_EPSILON * plan.board_count() as f64) / board_width).ceil();
            prop_assert!(plan.board_count() as f64 >= lower);
            prop_assert!(plan.board_count() <= pieces);
        }
    }
}
