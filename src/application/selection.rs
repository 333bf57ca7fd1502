use crate::config::DASHBOARD;
use crate::domain::market_data::AssetId;

/// The one asset shared by the table highlight and the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCoordinator {
    selected: AssetId,
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new(AssetId::from(DASHBOARD.selection.default_asset_id))
    }
}

impl SelectionCoordinator {
    pub fn new(initial: AssetId) -> Self {
        Self { selected: initial }
    }

    /// Replaces the selection without checking it against any snapshot.
    /// Returns true when the id actually changed.
    pub fn select(&mut self, id: AssetId) -> bool {
        if self.selected == id {
            return false;
        }
        self.selected = id;
        true
    }

    pub fn selected(&self) -> &AssetId {
        &self.selected
    }

    pub fn is_selected(&self, id: &AssetId) -> bool {
        &self.selected == id
    }
}
