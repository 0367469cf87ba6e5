use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::format::{format_number, normalize};

/// A width in centimeters, normalized to at most two decimal places.
///
/// Displays and serializes as the normalized string (`"61"`, `"22.50"`) and
/// deserializes from either a string or a JSON number.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Measure(f64);

impl Measure {
    pub fn new(value: f64) -> Self {
        Self(normalize(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_number(self.0))
    }
}

impl Serialize for Measure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Measure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Ok(Measure::new(n)),
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Measure::new)
                .map_err(|_| serde::de::Error::custom(format!("invalid measure '{s}'"))),
        }
    }
}

/// Board dimensions in centimeters. Only the width takes part in planning;
/// the length is used for the waste rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSize {
    pub length: f64,
    pub width: f64,
}

impl BoardSize {
    pub const DEFAULT_LENGTH: f64 = 244.0;
    pub const DEFAULT_WIDTH: f64 = 122.0;

    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH, Self::DEFAULT_WIDTH)
    }
}

impl std::fmt::Display for BoardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}",
            format_number(self.length),
            format_number(self.width)
        )
    }
}

/// Demand for `count` pieces of the given width. Produced by validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutRequest {
    pub width: f64,
    pub count: u32,
}

impl CutRequest {
    pub fn new(width: f64, count: u32) -> Self {
        Self { width, count }
    }
}

/// A request as it is remembered in history: normalized width plus count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub width: Measure,
    pub count: u32,
}

impl From<CutRequest> for RecordedRequest {
    fn from(req: CutRequest) -> Self {
        Self {
            width: Measure::new(req.width),
            count: req.count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub width: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub pieces: Vec<Piece>,
    pub remain: Measure,
}

/// Planner output: boards in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub boards: Vec<Board>,
    pub board_width: f64,
}

impl Plan {
    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn piece_count(&self) -> usize {
        self.boards.iter().map(|b| b.pieces.len()).sum()
    }

    pub fn waste_rate(&self, board_length: f64) -> f64 {
        crate::stats::waste_rate(&self.boards, board_length, self.board_width)
    }
}

/// Everything needed to show a finished calculation. History entries store
/// it verbatim so that replaying one never runs the planner again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub board_length: Measure,
    pub board_width: Measure,
    pub requests: Vec<RecordedRequest>,
    pub results: Vec<Board>,
}

impl Calculation {
    pub fn new(board: BoardSize, requests: &[CutRequest], plan: Plan) -> Self {
        Self {
            board_length: Measure::new(board.length),
            board_width: Measure::new(board.width),
            requests: requests.iter().copied().map(RecordedRequest::from).collect(),
            results: plan.boards,
        }
    }

    pub fn board_size(&self) -> BoardSize {
        BoardSize::new(self.board_length.value(), self.board_width.value())
    }

    pub fn board_count(&self) -> usize {
        self.results.len()
    }

    /// Total pieces requested, which always equals the pieces placed.
    pub fn piece_count(&self) -> u32 {
        self.requests.iter().map(|r| r.count).sum()
    }

    pub fn waste_rate(&self) -> f64 {
        crate::stats::waste_rate(
            &self.results,
            self.board_length.value(),
            self.board_width.value(),
        )
    }
}
