//! Board storage and line queries for the 3x3 grid.
//!
//! The board is a flat row-major array of nine cells. All derived facts
//! (winner, fullness, vacancies) are pure queries; mutation happens one
//! cell at a time through [`Board::set`].

use std::fmt;
use std::str::FromStr;

/// Board side length.
pub const SIZE: usize = 3;

/// The eight winning lines: three rows, three columns, two diagonals,
/// as indices into the row-major cell array.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// The X mark (moves first by convention).
    X,
    /// The O mark.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character representation, as persisted in game records.
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// Parses the single-character representation.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Mark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Mark::X),
            "O" | "o" => Ok(Mark::O),
            other => Err(format!("invalid mark '{}', expected X or O", other)),
        }
    }
}

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// No mark placed yet.
    Empty,
    /// Occupied by a player's mark.
    Occupied(Mark),
}

impl Cell {
    /// Character representation: the mark, or a space for an empty cell.
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Occupied(mark) => mark.as_char(),
        }
    }
}

/// A validated (row, col) cell address, each coordinate in `[0, 3)`.
///
/// `Coord` is the only way to address a cell, so bounds checking happens
/// exactly once, at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    row: usize,
    col: usize,
}

impl Coord {
    /// Creates a coordinate, or `None` if either component is out of range.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < SIZE && col < SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Row component.
    pub fn row(self) -> usize {
        self.row
    }

    /// Column component.
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major index into the cell array.
    fn index(self) -> usize {
        self.row * SIZE + self.col
    }

    fn from_index(index: usize) -> Option<Self> {
        if index < SIZE * SIZE {
            Some(Self {
                row: index / SIZE,
                col: index % SIZE,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Error parsing a persisted board string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    /// The string was not exactly nine characters.
    BadLength(usize),
    /// A character was not `'X'`, `'O'`, or `' '`.
    BadChar(char),
}

impl fmt::Display for ParseBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseBoardError::BadLength(len) => {
                write!(f, "board string has {} characters, expected 9", len)
            }
            ParseBoardError::BadChar(c) => {
                write!(f, "invalid board character '{}'", c)
            }
        }
    }
}

impl std::error::Error for ParseBoardError {}

/// The 3x3 cell grid.
///
/// `Copy` so the AI can seed a scratch instance from the live board with a
/// plain assignment; searches never touch the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; SIZE * SIZE],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; SIZE * SIZE],
        }
    }

    /// Reads the cell at the given coordinate.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    /// Writes the cell at the given coordinate.
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        self.cells[coord.index()] = cell;
    }

    /// Whether the cell at the given coordinate is empty.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord) == Cell::Empty
    }

    /// Returns the mark holding a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        for [a, b, c] in LINES {
            if let Cell::Occupied(mark) = self.cells[a] {
                if self.cells[b] == Cell::Occupied(mark) && self.cells[c] == Cell::Occupied(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// Whether the given mark holds a complete line.
    pub fn is_winner(&self, mark: Mark) -> bool {
        LINES.iter().any(|&[a, b, c]| {
            self.cells[a] == Cell::Occupied(mark)
                && self.cells[b] == Cell::Occupied(mark)
                && self.cells[c] == Cell::Occupied(mark)
        })
    }

    /// Whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    /// All empty coordinates, in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .filter_map(|(index, _)| Coord::from_index(index))
            .collect()
    }

    /// Encodes the board as the nine-character row-major string stored in
    /// game records: `'X'`, `'O'`, or `' '` per cell.
    pub fn encode(&self) -> String {
        self.cells.iter().map(|cell| cell.as_char()).collect()
    }

    /// Decodes a board from its persisted nine-character form.
    pub fn decode(s: &str) -> Result<Self, ParseBoardError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != SIZE * SIZE {
            return Err(ParseBoardError::BadLength(chars.len()));
        }
        let mut board = Self::new();
        for (index, &c) in chars.iter().enumerate() {
            let cell = match c {
                ' ' => Cell::Empty,
                _ => Cell::Occupied(Mark::from_char(c).ok_or(ParseBoardError::BadChar(c))?),
            };
            board.cells[index] = cell;
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            for col in 0..SIZE {
                if col > 0 {
                    write!(f, "|")?;
                }
                write!(f, " {} ", self.cells[row * SIZE + col].as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
