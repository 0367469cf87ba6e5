use crate::stats::format_waste_rate;
use crate::types::{Board, Calculation};

/// Columns available inside a board bar.
const MAX_WIDTH: f64 = 72.0;

/// Draw one board as a bar of proportional segments:
///
/// ```text
/// Board 1  remain: 22cm
/// +-----------------------------+-----------------------------+-----------+
/// |            50cm             |            50cm             |...22cm....|
/// +-----------------------------+-----------------------------+-----------+
/// ```
pub fn render_board(index: usize, board: &Board, board_width: f64) -> String {
    let mut out = format!("Board {}  remain: {}cm\n", index + 1, board.remain);
    if board_width <= 0.0 {
        return out;
    }

    let mut segments: Vec<(usize, String, char)> = board
        .pieces
        .iter()
        .map(|p| (columns(p.width.value(), board_width), format!("{}cm", p.width), ' '))
        .collect();
    if board.remain.value() > 0.0 {
        segments.push((
            columns(board.remain.value(), board_width),
            format!("{}cm", board.remain),
            '.',
        ));
    }

    let mut edge = String::from("+");
    let mut body = String::from("|");
    for (cols, label, fill) in &segments {
        edge.push_str(&"-".repeat(*cols));
        edge.push('+');
        body.push_str(&center(label, *cols, *fill));
        body.push('|');
    }

    out.push_str(&edge);
    out.push('\n');
    out.push_str(&body);
    out.push('\n');
    out.push_str(&edge);
    out.push('\n');
    out
}

/// Board count and waste rate, e.g. `Summary: 2 boards used, 18.03% waste`.
pub fn render_summary(calc: &Calculation) -> String {
    let count = calc.board_count();
    format!(
        "Summary: {} board{} used, {}% waste",
        count,
        if count == 1 { "" } else { "s" },
        format_waste_rate(calc.waste_rate()),
    )
}

/// Full text report: one block per board followed by the summary.
pub fn render_calculation(calc: &Calculation, layout: bool) -> String {
    let board_width = calc.board_width.value();
    let mut out = String::new();
    for (i, board) in calc.results.iter().enumerate() {
        if layout {
            out.push_str(&render_board(i, board, board_width));
        } else {
            let widths: Vec<String> = board.pieces.iter().map(|p| p.width.to_string()).collect();
            out.push_str(&format!(
                "Board {}: {}  (remain {}cm)\n",
                i + 1,
                widths.join(" + "),
                board.remain
            ));
        }
    }
    out.push_str(&render_summary(calc));
    out.push('\n');
    out
}

fn columns(width: f64, board_width: f64) -> usize {
    ((width / board_width * MAX_WIDTH).round() as usize).max(1)
}

fn center(label: &str, cols: usize, fill: char) -> String {
    let len = label.chars().count();
    if len > cols {
        return fill.to_string().repeat(cols);
    }
    let left = (cols - len) / 2;
    let right = cols - len - left;
    format!(
        "{}{}{}",
        fill.to_string().repeat(left),
        label,
        fill.to_string().repeat(right)
    )
}
