//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no UI or I/O dependencies, making them usable
//! from the puzzle model, the interaction controllers and the terminal renderer.
//!
//! # Grid Layout
//!
//! A level with `elements = N` is cut into a `g × g` grid where `g = sqrt(N)`.
//! Positions are row-major indices:
//!
//! ```text
//! g = 3
//! ┌───┬───┬───┐
//! │ 0 │ 1 │ 2 │
//! ├───┼───┼───┤
//! │ 3 │ 4 │ 5 │
//! ├───┼───┼───┤
//! │ 6 │ 7 │ 8 │
//! └───┴───┴───┘
//! ```
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval of the terminal loop (~60 FPS) |
//! | `TIMER_TICK_MS` | 1000 | Elapsed-time callback period |
//! | `PREVIEW_MS` | 3000 | Solved picture shown before a level starts |
//!
//! # Examples
//!
//! ```
//! use tui_tiles_types::{LevelDescriptor, Percent};
//!
//! let level = LevelDescriptor::new(1, "picsum-1", 9).unwrap();
//! assert_eq!(level.grid_size(), 3);
//!
//! assert!(LevelDescriptor::new(2, "picsum-2", 10).is_err());
//!
//! assert_eq!(Percent(50.0).to_string(), "50%");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frame interval of the terminal loop in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Period of the elapsed-time tick callback (1 Hz)
pub const TIMER_TICK_MS: u64 = 1000;

/// How long the solved picture is shown before a level starts
pub const PREVIEW_MS: u64 = 3000;

/// Smallest playable piece count (2x2 grid)
pub const MIN_ELEMENTS: u32 = 4;

/// Opacity of the floating drag visual
pub const DRAG_VISUAL_OPACITY: f32 = 0.9;

/// Stacking order of the floating drag visual above the grid
pub const DRAG_VISUAL_Z_INDEX: i32 = 200;

/// Stable identity of a piece.
///
/// Equal to the piece's index in the model and to its correct position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

impl PieceId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A row-major grid slot, `0..N`.
pub type Position = usize;

/// Opaque handle to the source artwork of a level.
///
/// The core never interprets it; renderers decide what it refers to
/// (a URL, a file name, a procedural palette key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A percentage of the grid container (or of a tile, for backgrounds).
///
/// Displays the way CSS lengths do: `50%`, `33.333333333333336%`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percent(pub f64);

impl Percent {
    pub fn value(self) -> f64 {
        self.0
    }

    /// Fraction in `0.0..=1.0` for `0%..=100%`.
    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Pointer coordinates in pixels (or terminal cells), top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned bounding box, same coordinate space as [`Point`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }
}

/// Rejected level descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {level}: element count {elements} is not a perfect square")]
    NotSquare { level: u32, elements: u32 },

    #[error(
        "level {level}: element count {elements} is below the minimum of {min}",
        min = MIN_ELEMENTS
    )]
    TooFewElements { level: u32, elements: u32 },
}

/// What a level asks for: which artwork and how many pieces.
///
/// The puzzle model assumes `elements` is a perfect square; use
/// [`LevelDescriptor::new`] or [`LevelDescriptor::validate`] at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub level: u32,
    pub image: ImageRef,
    pub elements: u32,
}

impl LevelDescriptor {
    /// Build a validated descriptor.
    pub fn new(level: u32, image: impl Into<String>, elements: u32) -> Result<Self, LevelError> {
        let descriptor = Self {
            level,
            image: ImageRef::new(image),
            elements,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.elements < MIN_ELEMENTS {
            return Err(LevelError::TooFewElements {
                level: self.level,
                elements: self.elements,
            });
        }
        let g = integer_sqrt(self.elements);
        if g * g != self.elements {
            return Err(LevelError::NotSquare {
                level: self.level,
                elements: self.elements,
            });
        }
        Ok(())
    }

    /// Side length of the grid (`floor(sqrt(elements))`).
    pub fn grid_size(&self) -> usize {
        integer_sqrt(self.elements) as usize
    }
}

fn integer_sqrt(n: u32) -> u32 {
    let n = n as u64;
    let mut g = (n as f64).sqrt() as u64;
    // Float rounding can be off by one near large squares.
    while g * g > n {
        g -= 1;
    }
    while (g + 1) * (g + 1) <= n {
        g += 1;
    }
    g as u32
}

/// An ordered list of levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub title: String,
    pub levels: Vec<LevelDescriptor>,
}

impl Default for Campaign {
    /// Six levels: two each of 3x3, 4x4 and 5x5.
    fn default() -> Self {
        let levels = [9, 9, 16, 16, 25, 25]
            .iter()
            .enumerate()
            .map(|(i, &elements)| LevelDescriptor {
                level: i as u32 + 1,
                image: ImageRef::new(format!("picsum-{}", i + 1)),
                elements,
            })
            .collect();
        Self {
            title: "Puzzle".to_string(),
            levels,
        }
    }
}

/// Which controller receives the player's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Continuous pointer drag
    #[default]
    Drag,
    /// Discrete tap-to-select
    Select,
}

impl InputMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "drag" => Some(InputMode::Drag),
            "select" | "tap" => Some(InputMode::Select),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Drag => "drag",
            InputMode::Select => "select",
        }
    }
}

/// Result kind of a tap handled by the selection controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// First tap: the piece is now selected
    Selected,
    /// Second tap on the same piece: selection cleared
    Deselected,
    /// Second tap on another piece: the two were swapped
    Swapped,
    /// Tap on a piece the model does not know
    Ignored,
}

/// Direction of a keyboard cursor step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_descriptor_accepts_perfect_squares() {
        for (elements, g) in [(4, 2), (9, 3), (16, 4), (25, 5), (100, 10)] {
            let level = LevelDescriptor::new(1, "img", elements).unwrap();
            assert_eq!(level.grid_size(), g);
        }
    }

    #[test]
    fn level_descriptor_rejects_non_squares_and_tiny_grids() {
        assert_eq!(
            LevelDescriptor::new(3, "img", 10),
            Err(LevelError::NotSquare {
                level: 3,
                elements: 10
            })
        );
        assert_eq!(
            LevelDescriptor::new(1, "img", 1),
            Err(LevelError::TooFewElements {
                level: 1,
                elements: 1
            })
        );
    }

    #[test]
    fn percent_displays_like_css() {
        assert_eq!(Percent(300.0).to_string(), "300%");
        assert_eq!(Percent(0.0).to_string(), "0%");
        assert_eq!(Percent(100.0 / 3.0).to_string(), "33.333333333333336%");
    }

    #[test]
    fn default_campaign_has_six_growing_levels() {
        let campaign = Campaign::default();
        let sizes: Vec<u32> = campaign.levels.iter().map(|l| l.elements).collect();
        assert_eq!(sizes, vec![9, 9, 16, 16, 25, 25]);
        assert!(campaign.levels.iter().all(|l| l.validate().is_ok()));
        assert_eq!(campaign.levels[0].level, 1);
    }

    #[test]
    fn campaign_parses_from_json() {
        let json = r#"{
            "title": "Puzzle",
            "levels": [
                { "level": 1, "image": "https://picsum.photos/600/600?random=1", "elements": 9 }
            ]
        }"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.levels.len(), 1);
        assert_eq!(
            campaign.levels[0].image.as_str(),
            "https://picsum.photos/600/600?random=1"
        );
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 30.0, 30.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(39.9, 39.9)));
        assert!(!r.contains(Point::new(40.0, 20.0)));
        assert!(!r.contains(Point::new(9.9, 20.0)));
    }

    #[test]
    fn string_round_trips() {
        assert_eq!(InputMode::from_str("TAP"), Some(InputMode::Select));
        assert_eq!(InputMode::Drag.as_str(), "drag");
    }
}
