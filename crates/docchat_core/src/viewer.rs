//! crates/docchat_core/src/viewer.rs
//!
//! The viewer state machine: current page, zoom, and rotation for the
//! active document. Citation selection drives it through the same
//! transition as manual page navigation, which keeps the chat and viewer
//! components independently testable.

use crate::domain::{Citation, Document};
use uuid::Uuid;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 3.0;

/// Whether the active document's content has resolved yet.
///
/// `Ready` and `Error` are terminal for a given activation; a new
/// `activate` call starts a fresh `Loading` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Error,
}

/// Current page, zoom, and rotation for the displayed document.
#[derive(Debug, Clone)]
pub struct ViewerState {
    document_id: Uuid,
    page_count: u32,
    current_page: u32,
    scale: f32,
    rotation: u16,
    load_status: LoadStatus,
}

impl ViewerState {
    /// Activates a document: page 1, scale 1.0, no rotation, loading.
    pub fn activate(document: &Document) -> Self {
        Self {
            document_id: document.id,
            page_count: document.page_count,
            current_page: 1,
            scale: 1.0,
            rotation: 0,
            load_status: LoadStatus::Loading,
        }
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// Jumps to the given 1-indexed page; out-of-bounds requests are a
    /// no-op rather than an error.
    pub fn go_to_page(&mut self, page: u32) {
        if page >= 1 && page <= self.page_count {
            self.current_page = page;
        }
    }

    /// Adjusts the zoom scale by `delta`, clamped to `[0.5, 3.0]`.
    /// The step size (reference: 0.2) belongs to the caller.
    pub fn zoom(&mut self, delta: f32) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Advances rotation by 90 degrees, wrapping 270 back to 0.
    pub fn rotate(&mut self) {
        self.rotation = (self.rotation + 90) % 360;
    }

    /// Restores scale and rotation to their defaults; the page is kept.
    pub fn reset_view(&mut self) {
        self.scale = 1.0;
        self.rotation = 0;
    }

    /// The explicit chat-to-viewer event: a clicked citation navigates to
    /// its page exactly as `go_to_page` would.
    pub fn on_citation_selected(&mut self, citation: &Citation) {
        self.go_to_page(citation.page);
    }

    /// Marks the activation's content as resolved. Only meaningful while
    /// loading; `Ready` is terminal until the next activation.
    pub fn mark_ready(&mut self) {
        if self.load_status == LoadStatus::Loading {
            self.load_status = LoadStatus::Ready;
        }
    }

    /// Marks the activation's content as failed. Terminal, like `Ready`.
    pub fn mark_error(&mut self) {
        if self.load_status == LoadStatus::Loading {
            self.load_status = LoadStatus::Error;
        }
    }
}
