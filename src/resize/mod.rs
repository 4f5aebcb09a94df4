use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::{window_event_listener, WindowListenerHandle};
use serde::{Deserialize, Serialize};

/// Allowed panel width range, in CSS pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ResizeBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ResizeBounds {
    fn default() -> Self {
        Self {
            min: 150.0,
            max: 600.0,
        }
    }
}

/// Panel width for a pointer at `pointer_x`: the distance to the viewport's
/// right edge, clamped to `bounds`.
pub fn panel_width(viewport_width: f64, pointer_x: f64, bounds: ResizeBounds) -> f64 {
    let (min, max) = if bounds.min <= bounds.max {
        (bounds.min, bounds.max)
    } else {
        (bounds.max, bounds.min)
    };
    (viewport_width - pointer_x).clamp(min, max)
}

/// Listeners that live from mousedown on the resize handle to the next
/// mouseup anywhere in the window.
pub struct DragSession {
    on_move: WindowListenerHandle,
    on_up: WindowListenerHandle,
}

impl DragSession {
    /// Start dragging. The session stores itself in `slot` and removes
    /// itself from it on mouseup.
    pub fn start(
        slot: StoredValue<Option<DragSession>>,
        bounds: ResizeBounds,
        width: RwSignal<Option<f64>>,
    ) {
        // A mouseup outside the window can leave a stale session behind.
        DragSession::finish(slot);

        let on_move = window_event_listener(ev::mousemove, move |ev: web_sys::MouseEvent| {
            let viewport = window()
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or_default();
            width.set(Some(panel_width(viewport, ev.client_x() as f64, bounds)));
        });

        let on_up = window_event_listener(ev::mouseup, move |_ev: web_sys::MouseEvent| {
            DragSession::finish(slot);
        });

        set_body_user_select("none");
        slot.set_value(Some(DragSession { on_move, on_up }));
    }

    /// End the session held in `slot`, if any.
    pub fn finish(slot: StoredValue<Option<DragSession>>) {
        let Some(session) = slot.try_update_value(|s| s.take()).flatten() else {
            return;
        };
        session.on_move.remove();
        session.on_up.remove();
        set_body_user_select("");
    }
}

fn set_body_user_select(value: &str) {
    if let Some(body) = document().body() {
        let _ = body.style().set_property("user-select", value);
    }
}
