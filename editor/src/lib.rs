#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map editor state for Grid Tactics.
//!
//! The editor owns a square board of cells, each carrying an optional floor
//! tile and a barrier on every edge. Like the combat world it mutates only
//! through [`apply`], reporting every visible change as an [`EditorEvent`] so a
//! renderer can redraw the affected cells. Barrier edits keep shared edges in
//! agreement: toggling one side of an edge forces the same value onto the
//! neighbour's mirrored side.

mod export;
pub mod palette;

use grid_tactics_core::{CellCoord, Direction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use export::{EditorError, MapExport, EXPORT_FILE_NAME};
use palette::{variants, FloorColor, PaletteEntry, TileKind};

/// Distance from a cell border, in pointer units, that still counts as a click on that edge.
pub const EDGE_MARGIN: f32 = 6.0;

const DEFAULT_BOARD_SIZE: u32 = 100;
const DEFAULT_TILE_SIZE: u32 = 48;
const DEFAULT_RNG_SEED: u64 = 0x6d61_705f_6564_6974;

/// Side of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Border shared with the cell above.
    Top,
    /// Border shared with the cell to the right.
    Right,
    /// Border shared with the cell below.
    Bottom,
    /// Border shared with the cell to the left.
    Left,
}

impl Edge {
    /// Every edge in document order.
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Edge of the neighbouring cell that coincides with this one.
    #[must_use]
    pub const fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    /// Orientation of the segment drawn along this edge.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Edge::Top | Edge::Bottom => Orientation::Horizontal,
            Edge::Left | Edge::Right => Orientation::Vertical,
        }
    }

    /// Direction leading from a cell to the neighbour across this edge.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Edge::Top => Direction::North,
            Edge::Right => Direction::East,
            Edge::Bottom => Direction::South,
            Edge::Left => Direction::West,
        }
    }
}

/// Layout of a rendered wall segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Runs along the top or bottom edge.
    Horizontal,
    /// Runs along the left or right edge.
    Vertical,
}

/// Content of a single cell edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Barrier {
    /// Open edge.
    #[default]
    None,
    /// Solid wall.
    Wall,
    /// Door.
    Door,
}

/// Barrier placed by a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarrierKind {
    /// Places or removes a wall.
    Wall,
    /// Places or removes a door.
    Door,
}

impl From<BarrierKind> for Barrier {
    fn from(kind: BarrierKind) -> Self {
        match kind {
            BarrierKind::Wall => Barrier::Wall,
            BarrierKind::Door => Barrier::Door,
        }
    }
}

/// Barriers on the four edges of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    /// Barrier on the top edge.
    pub top: Barrier,
    /// Barrier on the right edge.
    pub right: Barrier,
    /// Barrier on the bottom edge.
    pub bottom: Barrier,
    /// Barrier on the left edge.
    pub left: Barrier,
}

impl Walls {
    /// Barrier on the given edge.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> Barrier {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    fn set(&mut self, edge: Edge, barrier: Barrier) {
        let slot = match edge {
            Edge::Top => &mut self.top,
            Edge::Right => &mut self.right,
            Edge::Bottom => &mut self.bottom,
            Edge::Left => &mut self.left,
        };
        *slot = barrier;
    }
}

/// Painted state of a single editor cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorCell {
    /// Tile family painted onto the cell, if any.
    pub tile: Option<TileKind>,
    /// Colour set the painted image came from.
    pub color: Option<FloorColor>,
    /// Image chosen when the cell was painted.
    pub img: Option<String>,
    /// Barriers on the cell's edges.
    pub walls: Walls,
}

/// Barrier drawn along one edge of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallSegment {
    /// Edge the segment runs along.
    pub edge: Edge,
    /// Barrier drawn, never [`Barrier::None`].
    pub barrier: Barrier,
    /// Layout of the segment.
    pub orientation: Orientation,
}

/// Barrier placement mode. Wall and door mode exclude each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BarrierMode {
    /// Clicks do not touch barriers.
    #[default]
    Off,
    /// Clicks near an edge toggle walls.
    Wall,
    /// Clicks near an edge toggle doors.
    Door,
}

impl BarrierMode {
    /// Barrier a click places in this mode.
    #[must_use]
    pub const fn kind(self) -> Option<BarrierKind> {
        match self {
            BarrierMode::Off => None,
            BarrierMode::Wall => Some(BarrierKind::Wall),
            BarrierMode::Door => Some(BarrierKind::Door),
        }
    }
}

/// Pointer location relative to the top-left corner of the clicked cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    /// Horizontal offset inside the cell.
    pub x: f32,
    /// Vertical offset inside the cell.
    pub y: f32,
    /// Rendered width of the cell.
    pub width: f32,
    /// Rendered height of the cell.
    pub height: f32,
}

/// Edge selected by a pointer, checked in the order top, bottom, left, right.
///
/// Clicks inside the inner area, further than [`EDGE_MARGIN`] from every
/// border, select nothing.
#[must_use]
pub fn edge_from_pointer(pointer: Pointer) -> Option<Edge> {
    if pointer.y < EDGE_MARGIN {
        Some(Edge::Top)
    } else if pointer.y > pointer.height - EDGE_MARGIN {
        Some(Edge::Bottom)
    } else if pointer.x < EDGE_MARGIN {
        Some(Edge::Left)
    } else if pointer.x > pointer.width - EDGE_MARGIN {
        Some(Edge::Right)
    } else {
        None
    }
}

/// Parameters used to construct an [`Editor`].
#[derive(Clone, Copy, Debug)]
pub struct EditorConfig {
    board_size: u32,
    tile_size: u32,
    rng_seed: u64,
}

impl EditorConfig {
    /// Creates a new configuration for a square board.
    #[must_use]
    pub const fn new(board_size: u32, tile_size: u32, rng_seed: u64) -> Self {
        Self {
            board_size,
            tile_size,
            rng_seed,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_SIZE, DEFAULT_TILE_SIZE, DEFAULT_RNG_SEED)
    }
}

/// Commands accepted by the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorCommand {
    /// Flips wall mode, turning door mode off.
    ToggleWallMode,
    /// Flips door mode, turning wall mode off.
    ToggleDoorMode,
    /// Picks up a palette entry for subsequent painting.
    SelectPalette {
        /// Entry that was picked up.
        entry: PaletteEntry,
    },
    /// Drops the selected palette entry onto a cell.
    Paint {
        /// Cell receiving the tile.
        cell: CellCoord,
    },
    /// Clicks a cell; toggles the edge under the pointer when a barrier mode is active.
    Click {
        /// Cell that was clicked.
        cell: CellCoord,
        /// Pointer location inside the cell.
        pointer: Pointer,
    },
    /// Flips a single edge between open and the provided barrier.
    ToggleBarrier {
        /// Cell owning the edge.
        cell: CellCoord,
        /// Edge to flip.
        edge: Edge,
        /// Barrier placed when the edge does not already hold it.
        kind: BarrierKind,
    },
}

/// Changes reported by the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// The barrier mode changed.
    ModeChanged {
        /// Mode now active.
        mode: BarrierMode,
    },
    /// A palette entry was picked up.
    PaletteSelected {
        /// Entry now selected.
        entry: PaletteEntry,
    },
    /// A cell received a floor tile; its walls were kept.
    TilePainted {
        /// Painted cell.
        cell: CellCoord,
        /// Entry the tile came from.
        entry: PaletteEntry,
        /// Image variant chosen for the cell.
        img: String,
    },
    /// One edge of a cell changed.
    BarrierChanged {
        /// Cell owning the edge.
        cell: CellCoord,
        /// Edge that changed.
        edge: Edge,
        /// Barrier now on the edge.
        barrier: Barrier,
    },
}

/// Authoritative editor board.
#[derive(Debug)]
pub struct Editor {
    board_size: u32,
    tile_size: u32,
    cells: Vec<EditorCell>,
    mode: BarrierMode,
    selection: Option<PaletteEntry>,
    rng: ChaCha8Rng,
}

impl Editor {
    /// Creates an empty board.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let count = config.board_size as usize * config.board_size as usize;
        Self {
            board_size: config.board_size,
            tile_size: config.tile_size,
            cells: vec![EditorCell::default(); count],
            mode: BarrierMode::Off,
            selection: None,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Restores a board from an exported document.
    pub fn from_export(export: MapExport, rng_seed: u64) -> Result<Self, EditorError> {
        export.validate()?;
        tracing::info!(
            board_size = export.board_size,
            tile_size = export.tile_size,
            "map imported"
        );
        Ok(Self {
            board_size: export.board_size,
            tile_size: export.tile_size,
            cells: export.grid.into_iter().flatten().collect(),
            mode: BarrierMode::Off,
            selection: None,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.board_size && cell.row() < self.board_size {
            let width = self.board_size as usize;
            Some(cell.row() as usize * width + cell.column() as usize)
        } else {
            None
        }
    }

    fn set_mode(&mut self, mode: BarrierMode, out: &mut Vec<EditorEvent>) {
        self.mode = mode;
        tracing::debug!(?mode, "barrier mode changed");
        out.push(EditorEvent::ModeChanged { mode });
    }

    fn paint(&mut self, cell: CellCoord, out: &mut Vec<EditorEvent>) {
        if self.mode == BarrierMode::Wall {
            tracing::debug!(?cell, "paint refused: wall mode active");
            return;
        }
        let Some(entry) = self.selection else {
            tracing::debug!(?cell, "paint refused: nothing selected");
            return;
        };
        let Some(index) = self.index(cell) else {
            tracing::debug!(?cell, "paint refused: cell outside the board");
            return;
        };

        let images = variants(entry);
        let img = images[self.rng.gen_range(0..images.len())].to_owned();
        let target = &mut self.cells[index];
        target.tile = Some(entry.tile);
        target.color = Some(entry.color);
        target.img = Some(img.clone());
        out.push(EditorEvent::TilePainted { cell, entry, img });
    }

    fn toggle_barrier(
        &mut self,
        cell: CellCoord,
        edge: Edge,
        kind: BarrierKind,
        out: &mut Vec<EditorEvent>,
    ) {
        let Some(index) = self.index(cell) else {
            tracing::debug!(?cell, ?edge, "barrier toggle refused: cell outside the board");
            return;
        };

        let placed = Barrier::from(kind);
        let barrier = if self.cells[index].walls.get(edge) == placed {
            Barrier::None
        } else {
            placed
        };
        self.cells[index].walls.set(edge, barrier);
        out.push(EditorEvent::BarrierChanged {
            cell,
            edge,
            barrier,
        });

        let neighbor = cell
            .step(edge.direction(), self.board_size, self.board_size)
            .and_then(|neighbor| self.index(neighbor).map(|index| (neighbor, index)));
        if let Some((neighbor, index)) = neighbor {
            let mirrored = edge.opposite();
            self.cells[index].walls.set(mirrored, barrier);
            out.push(EditorEvent::BarrierChanged {
                cell: neighbor,
                edge: mirrored,
                barrier,
            });
        }
    }
}

/// Applies the provided command to the editor, appending resulting events.
pub fn apply(editor: &mut Editor, command: EditorCommand, out_events: &mut Vec<EditorEvent>) {
    match command {
        EditorCommand::ToggleWallMode => {
            let mode = if editor.mode == BarrierMode::Wall {
                BarrierMode::Off
            } else {
                BarrierMode::Wall
            };
            editor.set_mode(mode, out_events);
        }
        EditorCommand::ToggleDoorMode => {
            let mode = if editor.mode == BarrierMode::Door {
                BarrierMode::Off
            } else {
                BarrierMode::Door
            };
            editor.set_mode(mode, out_events);
        }
        EditorCommand::SelectPalette { entry } => {
            editor.selection = Some(entry);
            out_events.push(EditorEvent::PaletteSelected { entry });
        }
        EditorCommand::Paint { cell } => editor.paint(cell, out_events),
        EditorCommand::Click { cell, pointer } => {
            let Some(kind) = editor.mode.kind() else {
                return;
            };
            if let Some(edge) = edge_from_pointer(pointer) {
                editor.toggle_barrier(cell, edge, kind, out_events);
            }
        }
        EditorCommand::ToggleBarrier { cell, edge, kind } => {
            editor.toggle_barrier(cell, edge, kind, out_events);
        }
    }
}

/// Query functions that provide read-only access to the editor state.
pub mod query {
    use super::{
        Barrier, BarrierMode, Edge, Editor, EditorCell, MapExport, PaletteEntry, WallSegment,
    };
    use grid_tactics_core::CellCoord;

    /// Number of cells along each side of the board.
    #[must_use]
    pub fn board_size(editor: &Editor) -> u32 {
        editor.board_size
    }

    /// Edge length of a rendered cell.
    #[must_use]
    pub fn tile_size(editor: &Editor) -> u32 {
        editor.tile_size
    }

    /// Barrier mode currently active.
    #[must_use]
    pub fn mode(editor: &Editor) -> BarrierMode {
        editor.mode
    }

    /// Palette entry painted by the next drop.
    #[must_use]
    pub fn selection(editor: &Editor) -> Option<PaletteEntry> {
        editor.selection
    }

    /// State of the provided cell, if it lies on the board.
    #[must_use]
    pub fn cell(editor: &Editor, cell: CellCoord) -> Option<&EditorCell> {
        editor.index(cell).map(|index| &editor.cells[index])
    }

    /// Barrier segments the renderer should draw for a cell.
    #[must_use]
    pub fn wall_segments(editor: &Editor, at: CellCoord) -> Vec<WallSegment> {
        let Some(state) = cell(editor, at) else {
            return Vec::new();
        };
        Edge::ALL
            .into_iter()
            .filter_map(|edge| {
                let barrier = state.walls.get(edge);
                (barrier != Barrier::None).then_some(WallSegment {
                    edge,
                    barrier,
                    orientation: edge.orientation(),
                })
            })
            .collect()
    }

    /// Serializable snapshot of the whole board.
    #[must_use]
    pub fn export(editor: &Editor) -> MapExport {
        let width = (editor.board_size as usize).max(1);
        MapExport {
            board_size: editor.board_size,
            tile_size: editor.tile_size,
            grid: editor
                .cells
                .chunks(width)
                .map(<[EditorCell]>::to_vec)
                .collect(),
        }
    }
}
