//! Checks raw user input before anything is planned.
//!
//! The planner assumes its input is sane. Everything it relies on is enforced
//! here, in a fixed order, stopping at the first problem found.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::format::format_number;
use crate::types::{BoardSize, CutRequest};

/// Largest board dimension in centimeters (100 m).
pub const MAX_BOARD_SIZE: f64 = 10_000.0;
/// Largest count for a single width, and for all requests together.
pub const MAX_PIECES: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("board dimensions must be greater than 0")]
    BoardNotPositive,
    #[error("board dimensions cannot exceed 100 m ({max} cm)", max = MAX_BOARD_SIZE)]
    BoardTooLarge,
    #[error("at least one cut request is required")]
    NoRequests,
    #[error("request {row}: please fill in both width and count")]
    IncompleteRequest { row: usize },
    #[error("request {row}: cut width {width} cannot exceed board width {board_width}")]
    WidthExceedsBoard {
        row: usize,
        width: String,
        board_width: String,
    },
    #[error("request {row}: width and count must be greater than 0")]
    NotPositive { row: usize },
    #[error("request {row}: count {count} for a single width cannot exceed {max}", max = MAX_PIECES)]
    CountTooLarge { row: usize, count: i64 },
    #[error("total cut count {total} cannot exceed {max}", max = MAX_PIECES)]
    TotalCountTooLarge { total: i64 },
}

/// Board dimensions as typed by the user. `None` means the field was left
/// empty or could not be read as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardInput {
    #[serde(default, deserialize_with = "deserialize_lenient_width")]
    pub board_length: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_width")]
    pub board_width: Option<f64>,
}

impl From<BoardSize> for BoardInput {
    fn from(size: BoardSize) -> Self {
        Self {
            board_length: Some(size.length),
            board_width: Some(size.width),
        }
    }
}

/// One request row as typed by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RequestInput {
    #[serde(default, deserialize_with = "deserialize_lenient_width")]
    pub width: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_count")]
    pub count: Option<i64>,
}

impl RequestInput {
    pub fn new(width: f64, count: i64) -> Self {
        Self {
            width: Some(width),
            count: Some(count),
        }
    }

    /// Parse a `W:N` pair such as `61:2` or `22.5:10`.
    pub fn parse_pair(s: &str) -> Result<Self, String> {
        let (width, count) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid cut '{s}', expected WIDTH:COUNT"))?;
        Ok(Self {
            width: parse_width(width),
            count: parse_count(count),
        })
    }
}

/// Read a decimal width. Empty, unreadable and NaN input count as missing.
pub fn parse_width(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|w| !w.is_nan())
}

/// Read an integer count. A decimal count is truncated towards zero.
pub fn parse_count(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .map(|c| c.trunc() as i64)
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_lenient_width<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        None => None,
        Some(Lenient::Int(n)) => Some(n as f64),
        Some(Lenient::Float(n)) => Some(n),
        Some(Lenient::Text(s)) => parse_width(&s),
    })
}

fn deserialize_lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        None => None,
        Some(Lenient::Int(n)) => Some(n),
        Some(Lenient::Float(n)) => Some(n.trunc() as i64),
        Some(Lenient::Text(s)) => parse_count(&s),
    })
}

/// Validate board dimensions and request rows, returning the board size and
/// the requests ready for planning.
pub fn validate(
    board: BoardInput,
    rows: &[RequestInput],
) -> Result<(BoardSize, Vec<CutRequest>), ValidationError> {
    let (length, width) = match (board.board_length, board.board_width) {
        (Some(l), Some(w)) if l > 0.0 && w > 0.0 => (l, w),
        _ => return Err(ValidationError::BoardNotPositive),
    };
    if length > MAX_BOARD_SIZE || width > MAX_BOARD_SIZE {
        return Err(ValidationError::BoardTooLarge);
    }
    if rows.is_empty() {
        return Err(ValidationError::NoRequests);
    }

    let mut total: i64 = 0;
    let mut requests = Vec::with_capacity(rows.len());
    for (i, input) in rows.iter().enumerate() {
        let row = i + 1;
        let (w, count) = match (input.width, input.count) {
            (Some(w), Some(c)) => (w, c),
            _ => return Err(ValidationError::IncompleteRequest { row }),
        };

        if w > width {
            return Err(ValidationError::WidthExceedsBoard {
                row,
                width: format_number(w),
                board_width: format_number(width),
            });
        }
        if w <= 0.0 || count <= 0 {
            return Err(ValidationError::NotPositive { row });
        }
        if count > MAX_PIECES {
            return Err(ValidationError::CountTooLarge { row, count });
        }

        total += count;
        if total > MAX_PIECES {
            return Err(ValidationError::TotalCountTooLarge { total });
        }
        // count is within 1..=MAX_PIECES here
        requests.push(CutRequest::new(w, count as u32));
    }

    tracing::debug!(rows = requests.len(), total, "input validated");
    Ok((BoardSize::new(length, width), requests))
}
