use chrono::NaiveDate;

use crate::model::{
    Board, Member, Note, NoteId, NoteKind, SpatialView, Timeframe, Transform, Viewport,
};

use super::{CELL_HEIGHT_PX, CELL_WIDTH_PX};

/// Model-space size of a goal card
pub const GOAL_CARD_SIZE: (f64, f64) = (340.0, 220.0);
/// Model-space size of every other card
pub const PLAIN_CARD_SIZE: (f64, f64) = (190.0, 130.0);

/// Visual treatment of a card. Bottleneck wins over goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    Bottleneck,
    Goal(Timeframe),
    Plain,
}

impl CardStyle {
    pub fn of(note: &Note) -> CardStyle {
        match note.kind {
            NoteKind::Bottleneck { .. } => CardStyle::Bottleneck,
            NoteKind::Goal { timeframe } => CardStyle::Goal(timeframe),
            NoteKind::Task => CardStyle::Plain,
        }
    }
}

/// A rectangle in terminal cells, relative to the canvas origin. May lie
/// partly or wholly outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    pub fn contains(&self, col: i32, row: i32) -> bool {
        let (col, row) = (i64::from(col), i64::from(row));
        let (x, y) = (i64::from(self.x), i64::from(self.y));
        col >= x && col < x + i64::from(self.width) && row >= y && row < y + i64::from(self.height)
    }

    /// Whether the inner line is wide and tall enough for the link handle
    /// and completion box
    pub fn has_handles(&self) -> bool {
        self.width >= 6 && self.height >= 3
    }

    /// Cell of the `+` link handle
    pub fn link_handle(&self) -> (i32, i32) {
        (self.x.saturating_add(1), self.y.saturating_add(1))
    }

    /// Cell of the completion box
    pub fn complete_toggle(&self) -> (i32, i32) {
        (self.x.saturating_add(3), self.y.saturating_add(1))
    }
}

/// One note as drawn on a spatial view
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: NoteId,
    pub style: CardStyle,
    pub selected: bool,
    pub complete: bool,
    pub member: Member,
    pub icon: String,
    pub title: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Model-space rectangle
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Card {
    fn from_note(note: &Note, selected: bool) -> Card {
        let (width, height) = if note.is_goal() {
            GOAL_CARD_SIZE
        } else {
            PLAIN_CARD_SIZE
        };
        Card {
            id: note.id.clone(),
            style: CardStyle::of(note),
            selected,
            complete: note.complete,
            member: note.member,
            icon: note.icon.clone(),
            title: note.title.clone(),
            start: note.start,
            end: note.end_or_start(),
            x: note.x,
            y: note.y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Where this card lands on the terminal under `transform`
    pub fn cell_rect(&self, transform: &Transform) -> CellRect {
        let (sx, sy) = transform.model_to_screen(self.x, self.y);
        let x = (sx / CELL_WIDTH_PX).floor() as i32;
        let y = (sy / CELL_HEIGHT_PX).floor() as i32;
        let width = (self.width * transform.scale / CELL_WIDTH_PX).round().max(2.0) as i32;
        let height = (self.height * transform.scale / CELL_HEIGHT_PX).round().max(1.0) as i32;
        CellRect {
            x,
            y,
            width,
            height,
        }
    }
}

/// A straight line between two card centers, in model space
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: NoteId,
    pub to: NoteId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Constant on-screen thickness at any zoom
    pub stroke_width: f64,
}

/// What sits under a cell of a spatial canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpatialHit {
    LinkHandle(NoteId),
    CompleteToggle(NoteId),
    Body(NoteId),
    Empty,
}

/// Derived drawing of one spatial view
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialScene {
    pub view: SpatialView,
    pub transform: Transform,
    /// Drawing order; later cards sit on top
    pub cards: Vec<Card>,
    pub connectors: Vec<Connector>,
}

/// Project the board onto one spatial view. The vision board only shows
/// goals; connectors need both ends visible.
pub fn project_spatial(
    board: &Board,
    view: SpatialView,
    viewport: &Viewport,
    selected: Option<&NoteId>,
) -> SpatialScene {
    let cards: Vec<Card> = board
        .notes
        .iter()
        .filter(|n| view == SpatialView::Map || n.is_goal())
        .map(|n| Card::from_note(n, selected == Some(&n.id)))
        .collect();

    let stroke_width = 2.0 / viewport.s;
    let mut connectors = Vec::new();
    for link in &board.links {
        let from = cards.iter().find(|c| c.id == link.from);
        let to = cards.iter().find(|c| c.id == link.to);
        let (Some(from), Some(to)) = (from, to) else {
            log::trace!("skipping link {} -> {} on {:?}", link.from, link.to, view);
            continue;
        };
        let (x1, y1) = from.center();
        let (x2, y2) = to.center();
        connectors.push(Connector {
            from: link.from.clone(),
            to: link.to.clone(),
            x1,
            y1,
            x2,
            y2,
            stroke_width,
        });
    }

    SpatialScene {
        view,
        transform: viewport.apply(),
        cards,
        connectors,
    }
}

impl SpatialScene {
    pub fn card(&self, id: &NoteId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    /// Move one card and re-route its connectors. Returns false when the
    /// card is not on this view.
    pub fn patch_card_position(&mut self, id: &NoteId, x: f64, y: f64) -> bool {
        let Some(card) = self.cards.iter_mut().find(|c| &c.id == id) else {
            return false;
        };
        card.x = x;
        card.y = y;
        let (cx, cy) = card.center();
        for conn in &mut self.connectors {
            if &conn.from == id {
                conn.x1 = cx;
                conn.y1 = cy;
            }
            if &conn.to == id {
                conn.x2 = cx;
                conn.y2 = cy;
            }
        }
        true
    }

    /// Follow a pan or zoom without re-deriving cards
    pub fn patch_viewport(&mut self, viewport: &Viewport) {
        self.transform = viewport.apply();
        let stroke_width = 2.0 / viewport.s;
        for conn in &mut self.connectors {
            conn.stroke_width = stroke_width;
        }
    }

    /// Topmost card part under a canvas cell
    pub fn hit(&self, col: i32, row: i32) -> SpatialHit {
        for card in self.cards.iter().rev() {
            let rect = card.cell_rect(&self.transform);
            if !rect.contains(col, row) {
                continue;
            }
            if rect.has_handles() {
                if (col, row) == rect.link_handle() {
                    return SpatialHit::LinkHandle(card.id.clone());
                }
                if (col, row) == rect.complete_toggle() {
                    return SpatialHit::CompleteToggle(card.id.clone());
                }
            }
            return SpatialHit::Body(card.id.clone());
        }
        SpatialHit::Empty
    }
}
