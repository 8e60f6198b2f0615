//! JSON document written by the editor's export and accepted by its import.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::EditorCell;

/// File name the exported map is offered under.
pub const EXPORT_FILE_NAME: &str = "rpg_map.json";

/// Errors raised while reading or writing a map document.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The document could not be parsed or produced as JSON.
    #[error("map document is not valid JSON")]
    Json(#[from] serde_json::Error),
    /// The grid does not hold `boardSize` rows.
    #[error("map declares {declared} rows but contains {actual}")]
    RowCount {
        /// Row count declared by `boardSize`.
        declared: u32,
        /// Rows actually present in the grid.
        actual: usize,
    },
    /// A grid row does not hold `boardSize` cells.
    #[error("row {row} holds {actual} cells but the map declares {declared}")]
    RowLength {
        /// Index of the offending row.
        row: usize,
        /// Cell count declared by `boardSize`.
        declared: u32,
        /// Cells actually present in the row.
        actual: usize,
    },
    /// The declared tile size is zero.
    #[error("map declares a tile size of zero")]
    ZeroTileSize,
}

/// Serialized form of an editor board, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapExport {
    /// Number of cells along each side of the square board.
    pub board_size: u32,
    /// Edge length of a rendered cell.
    pub tile_size: u32,
    /// Cells indexed as `grid[row][column]`.
    pub grid: Vec<Vec<EditorCell>>,
}

impl MapExport {
    /// Renders the document as two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a previously exported document.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let export: MapExport = serde_json::from_str(json)?;
        export.validate()?;
        Ok(export)
    }

    /// Checks that the grid matches the declared board size.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.tile_size == 0 {
            return Err(EditorError::ZeroTileSize);
        }
        if self.grid.len() != self.board_size as usize {
            return Err(EditorError::RowCount {
                declared: self.board_size,
                actual: self.grid.len(),
            });
        }
        if let Some((row, cells)) = self
            .grid
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != self.board_size as usize)
        {
            return Err(EditorError::RowLength {
                row,
                declared: self.board_size,
                actual: cells.len(),
            });
        }
        Ok(())
    }
}
