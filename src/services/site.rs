// 🏛️ Archaeological Site Service

use super::{traced, LocationService};
use crate::entities::{ArchaeologicalSite, HistoricalPeriod, SiteDraft};
use crate::error::Result;
use crate::filter::{Criterion, Predicate, TextMatch};
use crate::form::blank_as_none;
use crate::page::{Page, PageRequest};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Optional list filters; every `None` leaves the result unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFilter {
    /// Name contains this text
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,

    /// Area strictly greater than
    #[serde(default, deserialize_with = "blank_as_none")]
    pub area_size: Option<f64>,

    /// Rating strictly greater than
    #[serde(default, deserialize_with = "blank_as_none")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub period: Option<HistoricalPeriod>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub location_id: Option<i64>,
}

pub struct SiteService {
    sites: Arc<dyn EntityStore<ArchaeologicalSite>>,
    locations: LocationService,
    text_match: TextMatch,
}

impl SiteService {
    pub fn new(sites: Arc<dyn EntityStore<ArchaeologicalSite>>, locations: LocationService) -> Self {
        SiteService {
            sites,
            locations,
            text_match: TextMatch::default(),
        }
    }

    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    pub fn list_all(&self) -> Result<Vec<ArchaeologicalSite>> {
        self.sites.list_all()
    }

    pub fn find_by_id(&self, id: i64) -> Result<ArchaeologicalSite> {
        traced(self.sites.find_by_id(id))
    }

    pub fn create(&self, draft: SiteDraft) -> Result<ArchaeologicalSite> {
        draft.validate()?;
        let location = self.locations.find_by_id(draft.location_id)?;

        let site = self.sites.save(ArchaeologicalSite::new(
            draft.name,
            draft.area_size,
            draft.rating,
            draft.period,
            location,
        ))?;

        info!(id = ?site.id, name = %site.name, "archaeological site created");
        Ok(site)
    }

    /// Overwrite every editable field. The location is resolved before the
    /// site is loaded, so an unknown location leaves the site untouched.
    pub fn update(&self, id: i64, draft: SiteDraft) -> Result<ArchaeologicalSite> {
        draft.validate()?;
        let location = self.locations.find_by_id(draft.location_id)?;
        let mut site = self.find_by_id(id)?;

        site.name = draft.name;
        site.area_size = draft.area_size;
        site.rating = draft.rating;
        site.period = draft.period;
        site.location = location;

        let site = self.sites.save(site)?;
        info!(id, "archaeological site updated");
        Ok(site)
    }

    /// Remove the site and return what was removed.
    pub fn delete(&self, id: i64) -> Result<ArchaeologicalSite> {
        let site = self.find_by_id(id)?;
        self.sites.delete(&site)?;
        info!(id, "archaeological site deleted");
        Ok(site)
    }

    pub fn close(&self, id: i64) -> Result<ArchaeologicalSite> {
        let mut site = self.find_by_id(id)?;
        site.close();

        let site = self.sites.save(site)?;
        info!(id, "archaeological site closed");
        Ok(site)
    }

    pub fn predicate(&self, filter: &SiteFilter) -> Predicate {
        Predicate::all_of([
            Criterion::contains_with("name", filter.name.as_deref(), self.text_match),
            Criterion::greater_than("area_size", filter.area_size),
            Criterion::greater_than("rating", filter.rating),
            Criterion::equals("location.id", filter.location_id),
            Criterion::equals("period", filter.period),
        ])
    }

    /// Zero-indexed page of sites matching `filter`.
    pub fn find_page(
        &self,
        filter: &SiteFilter,
        page_num: usize,
        page_size: usize,
    ) -> Result<Page<ArchaeologicalSite>> {
        let request = PageRequest::new(page_num, page_size)?;
        let predicate = self.predicate(filter);
        debug!(?filter, page_num, page_size, "listing archaeological sites");

        self.sites.find_page(&predicate, request)
    }
}

// ============================================================================
// TESTS
// ============================================================================
