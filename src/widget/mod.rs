use crate::config::TocConfig;
use crate::outline::OutlineNode;
use crate::resize::DragSession;
use crate::scrollspy::ActiveState;
use leptos::prelude::*;

pub(crate) const OPEN_GLYPH: &str = "▶";
pub(crate) const COLLAPSED_GLYPH: &str = "◀";

/// The toggle points towards the edge the panel will move to.
pub(crate) fn toggle_glyph(collapsed: bool) -> &'static str {
    if collapsed {
        COLLAPSED_GLYPH
    } else {
        OPEN_GLYPH
    }
}

/// Reactive state shared by the mounted widget and the scroll listener.
#[derive(Clone, Copy)]
pub struct TocSignals {
    pub active: RwSignal<Option<String>>,
    pub expanded: RwSignal<Vec<String>>,
    pub collapsed: RwSignal<bool>,
    pub panel_width: RwSignal<Option<f64>>,
}

impl TocSignals {
    pub fn new() -> Self {
        Self {
            active: RwSignal::new(None),
            expanded: RwSignal::new(Vec::new()),
            collapsed: RwSignal::new(false),
            panel_width: RwSignal::new(None),
        }
    }

    /// Write a new highlight state, touching only the signals that changed.
    pub fn apply(&self, state: ActiveState) {
        if self.active.get_untracked() != state.active {
            self.active.set(state.active);
        }
        if self.expanded.with_untracked(|e| *e != state.expanded) {
            self.expanded.set(state.expanded);
        }
    }

    /// Release the signals; reads afterwards see a disposed signal.
    pub fn dispose(self) {
        self.active.dispose();
        self.expanded.dispose();
        self.collapsed.dispose();
        self.panel_width.dispose();
    }
}

impl Default for TocSignals {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
struct EntryMarks {
    active: RwSignal<Option<String>>,
    expanded: RwSignal<Vec<String>>,
    active_class: String,
    expanded_class: String,
}

fn outline_list(nodes: Vec<OutlineNode>, depth: usize, marks: EntryMarks) -> AnyView {
    view! {
        <ul class=format!("toc-level-{depth}")>
            {nodes
                .into_iter()
                .map(|n| outline_item(n, depth, marks.clone()))
                .collect_view()}
        </ul>
    }
    .into_any()
}

fn outline_item(node: OutlineNode, depth: usize, marks: EntryMarks) -> AnyView {
    let OutlineNode { heading, children } = node;
    let href = format!("#{}", heading.id);

    let li_class = {
        let id = heading.id.clone();
        let EntryMarks { expanded, expanded_class, .. } = marks.clone();
        move || {
            if expanded.with(|ids| ids.iter().any(|x| *x == id)) {
                expanded_class.clone()
            } else {
                String::new()
            }
        }
    };

    let a_class = {
        let id = heading.id.clone();
        let EntryMarks { active, active_class, .. } = marks.clone();
        move || {
            if active.with(|a| a.as_deref() == Some(id.as_str())) {
                active_class.clone()
            } else {
                String::new()
            }
        }
    };

    let nested = (!children.is_empty()).then(|| outline_list(children, depth + 1, marks));

    view! {
        <li class=li_class>
            <a href=href class=a_class>{heading.text}</a>
            {nested}
        </li>
    }
    .into_any()
}

/// The injected panel: container, toggle button, optional resize handle and
/// the nested outline.
#[component]
pub fn TocWidget(
    config: TocConfig,
    roots: Vec<OutlineNode>,
    signals: TocSignals,
    /// Render the shell but keep it out of sight (page without headings).
    #[prop(optional)]
    hidden: bool,
) -> impl IntoView {
    let TocSignals {
        active,
        expanded,
        collapsed,
        panel_width,
    } = signals;

    let drag: StoredValue<Option<DragSession>> = StoredValue::new(None);
    on_cleanup(move || DragSession::finish(drag));

    let container_class = {
        let collapsed_class = config.collapsed_class.clone();
        move || {
            if collapsed.get() {
                collapsed_class.clone()
            } else {
                String::new()
            }
        }
    };

    let on_toggle = move |_| collapsed.update(|c| *c = !*c);

    let bounds = config.resize_bounds;
    let resize_handle = config.resize.then(|| {
        view! {
            <div
                id=config.resize_handle_id.clone()
                on:mousedown=move |ev: web_sys::MouseEvent| {
                    // Keep the drag from starting a text selection.
                    ev.prevent_default();
                    DragSession::start(drag, bounds, panel_width);
                }
            ></div>
        }
    });

    let panel_style = move || {
        panel_width
            .get()
            .map(|w| format!("width: {w}px;"))
            .unwrap_or_default()
    };

    let marks = EntryMarks {
        active,
        expanded,
        active_class: config.active_class.clone(),
        expanded_class: config.expanded_class.clone(),
    };

    view! {
        <div
            id=config.container_id.clone()
            class=container_class
            style=if hidden { "display: none;" } else { "" }
        >
            <button id=config.toggle_id.clone() title="Toggle Table of Contents" on:click=on_toggle>
                {move || toggle_glyph(collapsed.get())}
            </button>
            {resize_handle}
            <div id=config.panel_id.clone() style=panel_style>
                <h5 style="margin-top:0;">{config.title.clone()}</h5>
                <nav id=config.nav_id.clone()>{outline_list(roots, 1, marks)}</nav>
            </div>
        </div>
    }
}
