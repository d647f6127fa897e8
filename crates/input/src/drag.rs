//! Continuous pointer-drag interaction.
//!
//! States: Idle → Dragging → Idle. Hit-testing uses only the pointer position
//! and the container rectangle captured at drag start, never renderer
//! identity, so the controller runs fine on synthetic coordinates.

use tracing::{debug, trace, warn};

use crate::core::{hit_test, PieceBackground, PuzzleModel};
use crate::types::{PieceId, Point, Rect, DRAG_VISUAL_OPACITY, DRAG_VISUAL_Z_INDEX};

/// Geometry and appearance of the floating piece overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStyle {
    pub background: PieceBackground,
    /// Rendered tile size, same units as the container.
    pub width: f32,
    pub height: f32,
    /// Overlay origin relative to the container origin.
    pub left: f32,
    pub top: f32,
    pub opacity: f32,
    pub z_index: i32,
}

/// Ephemeral overlay state for the renderer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragVisual {
    pub active: bool,
    /// Last computed style; kept after the drag ends but only drawn while `active`.
    pub style: Option<DragStyle>,
}

/// The controller has taken ownership of the gesture.
///
/// Whoever delivered the triggering event must suppress its native handling
/// (selection, scrolling, built-in drag and drop).
#[derive(Debug, Clone, PartialEq)]
pub struct DragStarted {
    pub dragged: PieceId,
    pub visual: DragVisual,
}

/// A new drop target is under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverUpdate {
    pub hover: PieceId,
    pub visual: DragVisual,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragged: Option<PieceId>,
    hover: Option<PieceId>,
    is_dragging: bool,
    visual: DragVisual,
    /// Pointer minus the grabbed tile's top-left corner at grab time.
    offset: Point,
    container: Option<Rect>,
    /// Model generation the current gesture belongs to.
    generation: u64,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up `piece` at `pointer`. Only valid while idle.
    pub fn start_drag(
        &mut self,
        pointer: Point,
        piece: PieceId,
        container: Rect,
        model: &mut PuzzleModel,
    ) -> Option<DragStarted> {
        if self.is_dragging && !self.discard_if_stale(model) {
            trace!(%piece, "start_drag ignored: already dragging");
            return None;
        }

        let grabbed = model.piece(piece)?;
        let tile = model.piece_position(grabbed).to_rect(container);
        let background = model.piece_background(grabbed);

        self.container = Some(container);
        self.offset = pointer - tile.origin();
        self.is_dragging = true;
        self.dragged = Some(piece);
        self.hover = None;
        self.generation = model.generation();
        model.set_dragging(piece, true);

        let (left, top) = self.overlay_origin(pointer, container);
        self.visual = DragVisual {
            active: true,
            style: Some(DragStyle {
                background,
                width: tile.width,
                height: tile.height,
                left,
                top,
                opacity: DRAG_VISUAL_OPACITY,
                z_index: DRAG_VISUAL_Z_INDEX,
            }),
        };

        debug!(%piece, x = pointer.x, y = pointer.y, "drag started");
        Some(DragStarted {
            dragged: piece,
            visual: self.visual.clone(),
        })
    }

    /// Follow the pointer and report a newly hovered drop target, if any.
    ///
    /// The overlay moves even when `None` is returned. Leaving the grid or
    /// hovering the dragged piece itself keeps the previous hover target.
    pub fn handle_drag_move(
        &mut self,
        pointer: Point,
        model: &mut PuzzleModel,
    ) -> Option<HoverUpdate> {
        if !self.is_dragging || !self.visual.active {
            return None;
        }
        if self.discard_if_stale(model) {
            return None;
        }
        let container = self.container?;

        let (left, top) = self.overlay_origin(pointer, container);
        if let Some(style) = self.visual.style.as_mut() {
            style.left = left;
            style.top = top;
        }

        let target = hit_test(pointer, container, model.grid_size())
            .and_then(|position| model.piece_at(position))
            .map(|p| p.id())?;
        if Some(target) == self.dragged {
            return None;
        }

        model.highlight_drop_target(target);
        if self.hover != Some(target) {
            trace!(hover = %target, "drop target changed");
        }
        self.hover = Some(target);

        Some(HoverUpdate {
            hover: target,
            visual: self.visual.clone(),
        })
    }

    /// The pointer left the interactive surface; the drag itself continues.
    pub fn handle_drag_leave(&mut self, model: &mut PuzzleModel) {
        if !self.is_dragging || self.discard_if_stale(model) {
            return;
        }
        model.clear_drag_over();
        self.hover = None;
    }

    /// Release the piece. Swaps with the hover target when there is one and
    /// returns whether that swap solved the puzzle. Always ends the drag.
    pub fn drop_piece(&mut self, model: &mut PuzzleModel) -> bool {
        let dragged = match (self.is_dragging, self.dragged) {
            (true, Some(dragged)) => dragged,
            _ => return false,
        };
        if self.discard_if_stale(model) {
            return false;
        }

        let completed = match self.hover {
            Some(target) if target != dragged => {
                debug!(%dragged, %target, "dropped onto target");
                model.swap_pieces(dragged, target)
            }
            _ => {
                debug!(%dragged, "dropped without target");
                false
            }
        };
        self.end_drag(model);
        completed
    }

    /// Close the drag session. Also the cancel path for abandoned gestures.
    ///
    /// Returns `true` only if a drag was actually ended.
    pub fn end_drag(&mut self, model: &mut PuzzleModel) -> bool {
        if !self.is_dragging {
            return false;
        }
        if self.discard_if_stale(model) {
            return true;
        }

        self.is_dragging = false;
        if let Some(dragged) = self.dragged.take() {
            model.set_dragging(dragged, false);
        }
        model.reset_drag_states();
        self.hover = None;
        self.visual.active = false;
        self.container = None;
        debug!("drag ended");
        true
    }

    pub fn drag_visual(&self) -> &DragVisual {
        &self.visual
    }

    pub fn hover_piece(&self) -> Option<PieceId> {
        self.hover
    }

    pub fn dragged_piece(&self) -> Option<PieceId> {
        self.dragged
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    fn overlay_origin(&self, pointer: Point, container: Rect) -> (f32, f32) {
        (
            pointer.x - container.x - self.offset.x,
            pointer.y - container.y - self.offset.y,
        )
    }

    /// Drop a gesture that began on a model that has since been re-initialized.
    ///
    /// The new piece collection never saw this gesture, so it is left alone.
    fn discard_if_stale(&mut self, model: &PuzzleModel) -> bool {
        if !self.is_dragging || self.generation == model.generation() {
            return false;
        }
        warn!(
            gesture = self.generation,
            model = model.generation(),
            "discarding drag from a replaced puzzle"
        );
        self.is_dragging = false;
        self.dragged = None;
        self.hover = None;
        self.visual.active = false;
        self.container = None;
        true
    }
}
