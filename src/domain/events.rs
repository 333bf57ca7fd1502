use crate::domain::market_data::{AssetId, SortKey};
use std::fmt::Debug;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// Changes the view layer reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    SnapshotRequested,
    SnapshotLoaded { asset_count: usize },
    SnapshotFailed { reason: String },
    SeriesRequested { asset_id: AssetId },
    SeriesLoaded { asset_id: AssetId, point_count: usize },
    SeriesFailed { asset_id: AssetId, reason: String },
    SelectionChanged { asset_id: AssetId },
    FavoriteToggled { asset_id: AssetId, is_favorite: bool },
    SearchSettled { query: String },
    SortChanged { sort_key: SortKey },
    FavoritesOnlyChanged { enabled: bool },
    PageChanged { page: usize },
}

impl DomainEvent for DashboardEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::SnapshotRequested => "SnapshotRequested",
            DashboardEvent::SnapshotLoaded { .. } => "SnapshotLoaded",
            DashboardEvent::SnapshotFailed { .. } => "SnapshotFailed",
            DashboardEvent::SeriesRequested { .. } => "SeriesRequested",
            DashboardEvent::SeriesLoaded { .. } => "SeriesLoaded",
            DashboardEvent::SeriesFailed { .. } => "SeriesFailed",
            DashboardEvent::SelectionChanged { .. } => "SelectionChanged",
            DashboardEvent::FavoriteToggled { .. } => "FavoriteToggled",
            DashboardEvent::SearchSettled { .. } => "SearchSettled",
            DashboardEvent::SortChanged { .. } => "SortChanged",
            DashboardEvent::FavoritesOnlyChanged { .. } => "FavoritesOnlyChanged",
            DashboardEvent::PageChanged { .. } => "PageChanged",
        }
    }
}

pub trait EventDispatcher {
    fn publish(&self, event: DashboardEvent);
}

/// Simple in-memory event dispatcher
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    handlers: Vec<Box<dyn Fn(&DashboardEvent)>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&DashboardEvent) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish(&self, event: DashboardEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_receive_published_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = InMemoryEventDispatcher::new();
        let sink = seen.clone();
        dispatcher.subscribe(move |event| sink.borrow_mut().push(event.event_type()));

        dispatcher.publish(DashboardEvent::SnapshotLoaded { asset_count: 3 });
        dispatcher.publish(DashboardEvent::PageChanged { page: 2 });

        assert_eq!(*seen.borrow(), vec!["SnapshotLoaded", "PageChanged"]);
    }
}
