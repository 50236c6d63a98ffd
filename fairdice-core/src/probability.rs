use crate::dice::DiceConfiguration;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PRECISION: usize = 4;

/// Exact probability that one die beats another: `wins / total` face pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinProbability {
    pub wins: u64,
    pub total: u64,
}

impl WinProbability {
    pub fn as_f64(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.wins as f64 / self.total as f64
    }

    pub fn format(&self, precision: usize) -> String {
        format!("{:.*}", precision, self.as_f64())
    }
}

impl fmt::Display for WinProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_PRECISION);
        write!(f, "{:.*}", precision, self.as_f64())
    }
}

/// Probability that a face of `a` strictly exceeds a face of `b`, every face
/// being equally likely.
pub fn win_probability(a: &DiceConfiguration, b: &DiceConfiguration) -> WinProbability {
    let wins = a
        .faces()
        .iter()
        .map(|fa| b.faces().iter().filter(|fb| fa > fb).count() as u64)
        .sum();

    WinProbability {
        wins,
        total: (a.face_count() * b.face_count()) as u64,
    }
}

/// Pairwise win probabilities; `cell(row, col)` is the chance that the user
/// holding `row` beats `col`. The diagonal is left empty.
#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityTable {
    dice: Vec<DiceConfiguration>,
    cells: Vec<Vec<Option<WinProbability>>>,
    precision: usize,
}

impl ProbabilityTable {
    pub fn new(dice: &[DiceConfiguration], precision: usize) -> Self {
        let cells = dice
            .iter()
            .enumerate()
            .map(|(row, a)| {
                dice.iter()
                    .enumerate()
                    .map(|(col, b)| (row != col).then(|| win_probability(a, b)))
                    .collect()
            })
            .collect();

        Self {
            dice: dice.to_vec(),
            cells,
            precision,
        }
    }

    pub fn dice(&self) -> &[DiceConfiguration] {
        &self.dice
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<WinProbability> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Cell text: the probability, or `-` on the diagonal.
    pub fn cell_text(&self, row: usize, col: usize) -> String {
        match self.cell(row, col) {
            Some(p) => p.format(self.precision),
            None => "-".to_string(),
        }
    }

    pub fn title(&self) -> &'static str {
        "Probability of the win for the user:"
    }

    /// Header and rows as plain strings, ready for any table renderer.
    pub fn header(&self) -> Vec<String> {
        std::iter::once("User dice v".to_string())
            .chain(self.dice.iter().map(|d| d.to_string()))
            .collect()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        (0..self.dice.len())
            .map(|row| {
                std::iter::once(self.dice[row].to_string())
                    .chain((0..self.dice.len()).map(|col| self.cell_text(row, col)))
                    .collect()
            })
            .collect()
    }
}
