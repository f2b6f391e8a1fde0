//! Built-in hatch patterns.

use serde::{Deserialize, Serialize};

/// The built-in hatch catalogue. Each pattern is addressable by its
/// one-character abbreviation or by name.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatchPattern {
    Blank,
    Dot,
    Ring,
    HorizontalLine,
    VerticalLine,
    Cross,
    HorizontalDash,
    VerticalDash,
    Spiral,
    RightDiagonalLine,
    LeftDiagonalLine,
    DiagonalCross,
    RightDiagonalDash,
    LeftDiagonalDash,
    HorizontalWave,
    VerticalWave,
    CrissCross,
}

impl HatchPattern {
    pub const ALL: &'static [HatchPattern] = &[
        HatchPattern::Blank,
        HatchPattern::Dot,
        HatchPattern::Ring,
        HatchPattern::HorizontalLine,
        HatchPattern::VerticalLine,
        HatchPattern::Cross,
        HatchPattern::HorizontalDash,
        HatchPattern::VerticalDash,
        HatchPattern::Spiral,
        HatchPattern::RightDiagonalLine,
        HatchPattern::LeftDiagonalLine,
        HatchPattern::DiagonalCross,
        HatchPattern::RightDiagonalDash,
        HatchPattern::LeftDiagonalDash,
        HatchPattern::HorizontalWave,
        HatchPattern::VerticalWave,
        HatchPattern::CrissCross,
    ];

    pub fn letter(&self) -> char {
        match self {
            HatchPattern::Blank => ' ',
            HatchPattern::Dot => '.',
            HatchPattern::Ring => 'o',
            HatchPattern::HorizontalLine => '-',
            HatchPattern::VerticalLine => '|',
            HatchPattern::Cross => '+',
            HatchPattern::HorizontalDash => '"',
            HatchPattern::VerticalDash => ':',
            HatchPattern::Spiral => '@',
            HatchPattern::RightDiagonalLine => '/',
            HatchPattern::LeftDiagonalLine => '\\',
            HatchPattern::DiagonalCross => 'x',
            HatchPattern::RightDiagonalDash => ',',
            HatchPattern::LeftDiagonalDash => '`',
            HatchPattern::HorizontalWave => 'v',
            HatchPattern::VerticalWave => '>',
            HatchPattern::CrissCross => '*',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HatchPattern::Blank => "blank",
            HatchPattern::Dot => "dot",
            HatchPattern::Ring => "ring",
            HatchPattern::HorizontalLine => "horizontal_line",
            HatchPattern::VerticalLine => "vertical_line",
            HatchPattern::Cross => "cross",
            HatchPattern::HorizontalDash => "horizontal_dash",
            HatchPattern::VerticalDash => "vertical_dash",
            HatchPattern::Spiral => "spiral",
            HatchPattern::RightDiagonalLine => "right_diagonal_line",
            HatchPattern::LeftDiagonalLine => "left_diagonal_line",
            HatchPattern::DiagonalCross => "diagonal_cross",
            HatchPattern::RightDiagonalDash => "right_diagonal_dash",
            HatchPattern::LeftDiagonalDash => "left_diagonal_dash",
            HatchPattern::HorizontalWave => "horizontal_wave",
            HatchPattern::VerticalWave => "vertical_wave",
            HatchPattern::CrissCross => "criss_cross",
        }
    }

    /// Look a pattern up by abbreviation or name
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::ALL.iter().copied().find(|p| p.letter() == c);
        }
        Self::ALL.iter().copied().find(|p| p.name() == text)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, HatchPattern::Blank)
    }
}
