use leptos::*;
use once_cell::sync::OnceCell;

/// Signals shared by every dashboard component
pub struct Globals {
    /// Bumped on every dashboard event; views re-read the coordinator when it moves.
    pub revision: RwSignal<u64>,
    /// Most recent event name, shown in the footer
    pub last_event: RwSignal<&'static str>,
}

static GLOBALS: OnceCell<Globals> = OnceCell::new();

pub fn globals() -> &'static Globals {
    GLOBALS.get_or_init(|| Globals {
        revision: create_rw_signal(0),
        last_event: create_rw_signal(""),
    })
}

pub fn bump_revision(event_type: &'static str) {
    let globals = globals();
    globals.last_event.set(event_type);
    globals.revision.update(|r| *r += 1);
}
