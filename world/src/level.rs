//! Text level grid parsing.

use snowfall_core::TilePosition;
use thiserror::Error;

/// Failures that prevent a level from loading.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The text is empty or has no columns.
    #[error("malformed level: {0}")]
    MalformedLevel(&'static str),
    /// No player start marker was found.
    #[error("level has no player start marker")]
    MissingPlayerStart,
    /// More than one player start marker was found.
    #[error("level has several player start markers, first at {first:?} and another at {second:?}")]
    AmbiguousPlayerStart {
        /// First marker in row-major order.
        first: TilePosition,
        /// Second marker in row-major order.
        second: TilePosition,
    },
}

/// Rectangular grid of level characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    width: usize,
    rows: Vec<Vec<char>>,
}

impl LevelGrid {
    /// Parses level text, replacing spaces with `filler` and right-padding
    /// every row with it.
    ///
    /// The width is the longest line once its terminator is stripped, so a
    /// final line without a terminator counts its full content.
    pub fn parse(text: &str, filler: char) -> Result<Self, LevelError> {
        let lines: Vec<String> = text
            .split_inclusive('\n')
            .map(|raw| {
                let content = raw.trim_end_matches('\n').trim_end_matches('\r');
                content.replace(' ', &filler.to_string())
            })
            .collect();

        let width = lines
            .iter()
            .map(|content| content.chars().count())
            .max()
            .ok_or(LevelError::MalformedLevel("no rows"))?;
        if width == 0 {
            return Err(LevelError::MalformedLevel("zero width"));
        }

        let rows = lines
            .into_iter()
            .map(|content| {
                let mut row: Vec<char> = content.chars().collect();
                row.resize(width, filler);
                row
            })
            .collect();

        Ok(Self { width, rows })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Character at the given cell, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        self.rows.get(row).and_then(|cells| cells.get(column)).copied()
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (TilePosition, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().map(move |(column, token)| {
                (TilePosition::new(column as u32, row as u32), *token)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_rows_lose_their_terminator() {
        let grid = LevelGrid::parse("ABCD\nEFGH\nIJKL\n", 'K').expect("valid level");
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(3, 2), Some('L'));
    }

    #[test]
    fn short_rows_and_spaces_become_filler() {
        let grid = LevelGrid::parse("A B\nC\n", 'K').expect("valid level");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(1, 0), Some('K'));
        assert_eq!(grid.cell(1, 1), Some('K'));
        assert_eq!(grid.cell(2, 1), Some('K'));
    }

    #[test]
    fn unterminated_last_row_fits_when_not_longest() {
        let grid = LevelGrid::parse("@AA\nKKK\nKKK", 'K').expect("valid level");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(0, 0), Some('@'));
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let grid = LevelGrid::parse("AB\r\nCD\r\n", 'K').expect("valid level");
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.cell(1, 1), Some('D'));
    }

    #[test]
    fn empty_text_is_malformed() {
        assert!(matches!(
            LevelGrid::parse("", 'K'),
            Err(LevelError::MalformedLevel(_))
        ));
        assert!(matches!(
            LevelGrid::parse("\n\n", 'K'),
            Err(LevelError::MalformedLevel(_))
        ));
    }

    #[test]
    fn unterminated_longest_row_sets_the_width() {
        let single = LevelGrid::parse("@AA", 'K').expect("single row");
        assert_eq!(single.width(), 3);
        assert_eq!(single.height(), 1);
        assert_eq!(single.cell(2, 0), Some('A'));

        let grid = LevelGrid::parse("AB\nCDEF", 'K').expect("valid level");
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.cell(2, 0), Some('K'));
        assert_eq!(grid.cell(3, 1), Some('F'));
    }

    #[test]
    fn cells_iterate_in_row_major_order() {
        let grid = LevelGrid::parse("AB\nCD\n", 'K').expect("valid level");
        let tokens: String = grid.cells().map(|(_, token)| token).collect();
        assert_eq!(tokens, "ABCD");
    }
}
