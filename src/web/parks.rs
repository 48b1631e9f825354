// 🌲 National park pages

use super::html::{self, escape};
use super::{AppState, ListQuery, WebResult};
use crate::entities::{Location, NationalPark, ParkDraft, ParkType};
use crate::services::ParkFilter;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};

const LIST: &str = "/national-parks";

/// GET /national-parks
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery<ParkFilter>>,
) -> WebResult<Html<String>> {
    let request = query.request(state.page_size)?;
    let filter = &query.filter;
    let page = state
        .catalog
        .parks
        .find_page(filter, request.number(), request.size())?;
    let locations = state.catalog.locations.list_all()?;

    let active = html::query_string(&[
        ("name", filter.name.clone()),
        ("areaSize", filter.area_size.map(|v| v.to_string())),
        ("rating", filter.rating.map(|v| v.to_string())),
        ("parkType", filter.park_type.map(|t| t.as_str().to_string())),
        ("locationId", filter.location_id.map(|id| id.to_string())),
    ]);

    let mut body = filter_form(filter, &locations, request.size());
    body.push_str(r#"<p><a href="/national-parks/add">Add park</a></p>"#);
    body.push_str("<table><tr><th>Name</th><th>Area</th><th>Rating</th><th>Type</th><th>Location</th><th>Status</th><th></th></tr>");
    for park in &page.content {
        body.push_str(&row(park));
    }
    body.push_str("</table>");
    body.push_str(&html::pagination(LIST, &active, &page));

    Ok(html::layout("National Parks", &body))
}

/// GET /national-parks/add
pub async fn add_form(State(state): State<AppState>) -> WebResult<Html<String>> {
    let locations = state.catalog.locations.list_all()?;
    Ok(html::layout("Add Park", &editor(LIST, None, &locations)))
}

/// GET /national-parks/edit/:id
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    let park = state.catalog.parks.find_by_id(id)?;
    let locations = state.catalog.locations.list_all()?;
    let action = format!("{}/{}", LIST, id);

    Ok(html::layout("Edit Park", &editor(&action, Some(&park), &locations)))
}

/// POST /national-parks
pub async fn create(State(state): State<AppState>, Form(draft): Form<ParkDraft>) -> WebResult<Redirect> {
    state.catalog.parks.create(draft)?;
    Ok(Redirect::to(LIST))
}

/// POST /national-parks/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(draft): Form<ParkDraft>,
) -> WebResult<Redirect> {
    state.catalog.parks.update(id, draft)?;
    Ok(Redirect::to(LIST))
}

/// POST /national-parks/delete/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> WebResult<Redirect> {
    state.catalog.parks.delete(id)?;
    Ok(Redirect::to(LIST))
}

/// POST /national-parks/close/:id
pub async fn close(State(state): State<AppState>, Path(id): Path<i64>) -> WebResult<Redirect> {
    state.catalog.parks.close(id)?;
    Ok(Redirect::to(LIST))
}

fn row(park: &NationalPark) -> String {
    let id = park.id.unwrap_or_default();
    let mut actions = format!(r#"<a href="/national-parks/edit/{}">Edit</a> "#, id);
    actions.push_str(&html::post_button(&format!("/national-parks/delete/{}", id), "Delete"));
    if !park.closed {
        actions.push_str(&html::post_button(&format!("/national-parks/close/{}", id), "Close"));
    }

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&park.name),
        park.area_size,
        park.rating,
        park.park_type.label(),
        escape(&park.location.display_name()),
        if park.closed { "Closed" } else { "Open" },
        actions
    )
}

fn type_choices() -> Vec<(String, String)> {
    ParkType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), t.label().to_string()))
        .collect()
}

fn location_choices(locations: &[Location]) -> Vec<(String, String)> {
    locations
        .iter()
        .filter_map(|l| l.id.map(|id| (id.to_string(), l.display_name())))
        .collect()
}

fn filter_form(filter: &ParkFilter, locations: &[Location], page_size: usize) -> String {
    let park_type = filter.park_type.map(|t| t.as_str());
    let location = filter.location_id.map(|id| id.to_string());
    let area = filter.area_size.map(|v| v.to_string()).unwrap_or_default();
    let rating = filter.rating.map(|v| v.to_string()).unwrap_or_default();

    format!(
        r#"<form method="get" action="/national-parks">{} {} {} <label>Type <select name="parkType">{}</select></label> <label>Location <select name="locationId">{}</select></label> <input type="hidden" name="pageSize" value="{}"> <button type="submit">Filter</button></form>"#,
        html::text_input("name", "Name", filter.name.as_deref().unwrap_or_default()),
        html::number_input("areaSize", "Area over", &area, "any"),
        html::number_input("rating", "Rating over", &rating, "any"),
        html::options(type_choices(), park_type, true),
        html::options(location_choices(locations), location.as_deref(), true),
        page_size
    )
}

fn editor(action: &str, park: Option<&NationalPark>, locations: &[Location]) -> String {
    let name = park.map(|p| p.name.as_str()).unwrap_or_default();
    let area = park.map(|p| p.area_size.to_string()).unwrap_or_default();
    let rating = park.map(|p| p.rating.to_string()).unwrap_or_default();
    let park_type = park.map(|p| p.park_type.as_str());
    let location = park.and_then(|p| p.location.id).map(|id| id.to_string());

    format!(
        r#"<form method="post" action="{}">{}<br>{}<br>{}<br><label>Type <select name="parkType">{}</select></label><br><label>Location <select name="locationId">{}</select></label><br><button type="submit">Save</button></form>"#,
        escape(action),
        html::text_input("name", "Name", name),
        html::number_input("areaSize", "Area (km²)", &area, "any"),
        html::number_input("rating", "Rating", &rating, "any"),
        html::options(type_choices(), park_type, false),
        html::options(location_choices(locations), location.as_deref(), false)
    )
}
