// 🌲 National Park Service

use super::{traced, LocationService};
use crate::entities::{NationalPark, ParkDraft, ParkType};
use crate::error::Result;
use crate::filter::{Criterion, Predicate, TextMatch};
use crate::form::blank_as_none;
use crate::page::{Page, PageRequest};
use crate::store::EntityStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub area_size: Option<f64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub rating: Option<f64>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub park_type: Option<ParkType>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub location_id: Option<i64>,
}

pub struct ParkService {
    parks: Arc<dyn EntityStore<NationalPark>>,
    locations: LocationService,
    text_match: TextMatch,
}

impl ParkService {
    pub fn new(parks: Arc<dyn EntityStore<NationalPark>>, locations: LocationService) -> Self {
        ParkService {
            parks,
            locations,
            text_match: TextMatch::default(),
        }
    }

    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    pub fn list_all(&self) -> Result<Vec<NationalPark>> {
        self.parks.list_all()
    }

    pub fn find_by_id(&self, id: i64) -> Result<NationalPark> {
        traced(self.parks.find_by_id(id))
    }

    pub fn create(&self, draft: ParkDraft) -> Result<NationalPark> {
        draft.validate()?;
        let location = self.locations.find_by_id(draft.location_id)?;

        let park = self.parks.save(NationalPark::new(
            draft.name,
            draft.area_size,
            draft.rating,
            draft.park_type,
            location,
        ))?;

        info!(id = ?park.id, name = %park.name, "national park created");
        Ok(park)
    }

    pub fn update(&self, id: i64, draft: ParkDraft) -> Result<NationalPark> {
        draft.validate()?;
        let location = self.locations.find_by_id(draft.location_id)?;
        let mut park = self.find_by_id(id)?;

        park.name = draft.name;
        park.area_size = draft.area_size;
        park.rating = draft.rating;
        park.park_type = draft.park_type;
        park.location = location;

        let park = self.parks.save(park)?;
        info!(id, "national park updated");
        Ok(park)
    }

    pub fn delete(&self, id: i64) -> Result<NationalPark> {
        let park = self.find_by_id(id)?;
        self.parks.delete(&park)?;
        info!(id, "national park deleted");
        Ok(park)
    }

    pub fn close(&self, id: i64) -> Result<NationalPark> {
        let mut park = self.find_by_id(id)?;
        park.close();

        let park = self.parks.save(park)?;
        info!(id, "national park closed");
        Ok(park)
    }

    pub fn predicate(&self, filter: &ParkFilter) -> Predicate {
        Predicate::all_of([
            Criterion::contains_with("name", filter.name.as_deref(), self.text_match),
            Criterion::greater_than("area_size", filter.area_size),
            Criterion::greater_than("rating", filter.rating),
            Criterion::equals("location.id", filter.location_id),
            Criterion::equals("park_type", filter.park_type),
        ])
    }

    pub fn find_page(
        &self,
        filter: &ParkFilter,
        page_num: usize,
        page_size: usize,
    ) -> Result<Page<NationalPark>> {
        let request = PageRequest::new(page_num, page_size)?;
        let predicate = self.predicate(filter);
        debug!(?filter, page_num, page_size, "listing national parks");

        self.parks.find_page(&predicate, request)
    }
}
