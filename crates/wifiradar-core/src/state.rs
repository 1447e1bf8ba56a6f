//! Ephemeral dashboard state: which location distances are measured from and
//! which view is active.

use crate::geo::GeoPoint;
use crate::point::{ReferenceOrigin, ReferencePoint};

pub const DEFAULT_ZOOM: u8 = 14;
pub const FOCUSED_ZOOM: u8 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Radar,
    Stats,
    Data,
}

impl View {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            View::Radar => "Radar WiFi",
            View::Stats => "Usage statistics",
            View::Data => "Data",
        }
    }
}

/// Result of applying a place search to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The reference point moved to the search result.
    Moved { query: String, point: GeoPoint },
    /// Nothing matched; the previous reference point is kept.
    NotFound { query: String },
    /// Blank query, nothing to do.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub reference: ReferencePoint,
    pub zoom: u8,
    pub view: View,
    /// Set once the first device fix has centered the map.
    pub located_once: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            reference: ReferencePoint::city_center(),
            zoom: DEFAULT_ZOOM,
            view: View::default(),
            located_once: false,
        }
    }
}

impl DashboardState {
    /// Center on a device location fix.
    ///
    /// Only the first fix recenters; returns whether the reference moved.
    pub fn apply_device_location(&mut self, point: GeoPoint) -> bool {
        if self.located_once {
            return false;
        }
        self.reference = ReferencePoint::new(point, ReferenceOrigin::Device);
        self.zoom = FOCUSED_ZOOM;
        self.located_once = true;
        true
    }

    /// Switch the active view. The reference point and zoom are unaffected.
    pub fn show(&mut self, view: View) {
        self.view = view;
    }

    /// Apply the geocoding result for `query`.
    pub fn apply_search(&mut self, query: &str, result: Option<GeoPoint>) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }
        match result {
            Some(point) => {
                self.reference = ReferencePoint::new(point, ReferenceOrigin::Search);
                self.zoom = FOCUSED_ZOOM;
                SearchOutcome::Moved {
                    query: query.to_string(),
                    point,
                }
            }
            None => SearchOutcome::NotFound {
                query: query.to_string(),
            },
        }
    }

    /// Back to the city center with the default zoom. The active view is kept.
    pub fn reset(&mut self) {
        self.reference = ReferencePoint::city_center();
        self.zoom = DEFAULT_ZOOM;
        self.located_once = false;
    }

    #[must_use]
    pub fn status_line(&self) -> &'static str {
        if self.located_once && self.reference.origin == ReferenceOrigin::Device {
            "Using your GPS location"
        } else if self.reference.origin == ReferenceOrigin::Search {
            "Using the searched place"
        } else {
            "Using the default city center"
        }
    }
}
