// 🏛️ Archaeological site pages

use super::html::{self, escape};
use super::{AppState, ListQuery, WebResult};
use crate::entities::{ArchaeologicalSite, HistoricalPeriod, Location, SiteDraft};
use crate::services::SiteFilter;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};

const LIST: &str = "/archaeological-sites";

/// GET /archaeological-sites (and /) - filtered, paginated list
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery<SiteFilter>>,
) -> WebResult<Html<String>> {
    let request = query.request(state.page_size)?;
    let filter = &query.filter;
    let page = state
        .catalog
        .sites
        .find_page(filter, request.number(), request.size())?;
    let locations = state.catalog.locations.list_all()?;

    let active = html::query_string(&[
        ("name", filter.name.clone()),
        ("areaSize", filter.area_size.map(|v| v.to_string())),
        ("rating", filter.rating.map(|v| v.to_string())),
        ("period", filter.period.map(|p| p.as_str().to_string())),
        ("locationId", filter.location_id.map(|id| id.to_string())),
    ]);

    let mut body = String::new();
    body.push_str(&filter_form(filter, &locations, request.size()));
    body.push_str(r#"<p><a href="/archaeological-sites/add">Add site</a></p>"#);
    body.push_str("<table><tr><th>Name</th><th>Area</th><th>Rating</th><th>Period</th><th>Location</th><th>Status</th><th></th></tr>");

    for site in &page.content {
        body.push_str(&row(site));
    }

    body.push_str("</table>");
    body.push_str(&html::pagination(LIST, &active, &page));

    Ok(html::layout("Archaeological Sites", &body))
}

/// GET /archaeological-sites/add
pub async fn add_form(State(state): State<AppState>) -> WebResult<Html<String>> {
    let locations = state.catalog.locations.list_all()?;
    Ok(html::layout("Add Site", &editor(LIST, None, &locations)))
}

/// GET /archaeological-sites/edit/:id
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    let site = state.catalog.sites.find_by_id(id)?;
    let locations = state.catalog.locations.list_all()?;
    let action = format!("{}/{}", LIST, id);

    Ok(html::layout("Edit Site", &editor(&action, Some(&site), &locations)))
}

/// POST /archaeological-sites
pub async fn create(State(state): State<AppState>, Form(draft): Form<SiteDraft>) -> WebResult<Redirect> {
    state.catalog.sites.create(draft)?;
    Ok(Redirect::to(LIST))
}

/// POST /archaeological-sites/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(draft): Form<SiteDraft>,
) -> WebResult<Redirect> {
    state.catalog.sites.update(id, draft)?;
    Ok(Redirect::to(LIST))
}

/// POST /archaeological-sites/delete/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> WebResult<Redirect> {
    state.catalog.sites.delete(id)?;
    Ok(Redirect::to(LIST))
}

/// POST /archaeological-sites/close/:id
pub async fn close(State(state): State<AppState>, Path(id): Path<i64>) -> WebResult<Redirect> {
    state.catalog.sites.close(id)?;
    Ok(Redirect::to(LIST))
}

fn row(site: &ArchaeologicalSite) -> String {
    let id = site.id.unwrap_or_default();
    let mut actions = format!(r#"<a href="/archaeological-sites/edit/{}">Edit</a> "#, id);
    actions.push_str(&html::post_button(&format!("/archaeological-sites/delete/{}", id), "Delete"));
    if !site.closed {
        actions.push_str(&html::post_button(&format!("/archaeological-sites/close/{}", id), "Close"));
    }

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&site.name),
        site.area_size,
        site.rating,
        site.period.label(),
        escape(&site.location.display_name()),
        if site.closed { "Closed" } else { "Open" },
        actions
    )
}

fn period_choices() -> Vec<(String, String)> {
    HistoricalPeriod::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.label().to_string()))
        .collect()
}

fn location_choices(locations: &[Location]) -> Vec<(String, String)> {
    locations
        .iter()
        .filter_map(|l| l.id.map(|id| (id.to_string(), l.display_name())))
        .collect()
}

fn filter_form(filter: &SiteFilter, locations: &[Location], page_size: usize) -> String {
    let period = filter.period.map(|p| p.as_str());
    let location = filter.location_id.map(|id| id.to_string());

    format!(
        r#"<form method="get" action="/archaeological-sites">{} {} {} <label>Period <select name="period">{}</select></label> <label>Location <select name="locationId">{}</select></label> <input type="hidden" name="pageSize" value="{}"> <button type="submit">Filter</button></form>"#,
        html::text_input("name", "Name", filter.name.as_deref().unwrap_or_default()),
        html::number_input(
            "areaSize",
            "Area over",
            &filter.area_size.map(|v| v.to_string()).unwrap_or_default(),
            "any"
        ),
        html::number_input(
            "rating",
            "Rating over",
            &filter.rating.map(|v| v.to_string()).unwrap_or_default(),
            "any"
        ),
        html::options(period_choices(), period, true),
        html::options(location_choices(locations), location.as_deref(), true),
        page_size
    )
}

fn editor(action: &str, site: Option<&ArchaeologicalSite>, locations: &[Location]) -> String {
    let name = site.map(|s| s.name.as_str()).unwrap_or_default();
    let area = site.map(|s| s.area_size.to_string()).unwrap_or_default();
    let rating = site.map(|s| s.rating.to_string()).unwrap_or_default();
    let period = site.map(|s| s.period.as_str());
    let location = site.and_then(|s| s.location.id).map(|id| id.to_string());

    format!(
        r#"<form method="post" action="{}">{}<br>{}<br>{}<br><label>Period <select name="period">{}</select></label><br><label>Location <select name="locationId">{}</select></label><br><button type="submit">Save</button></form>"#,
        escape(action),
        html::text_input("name", "Name", name),
        html::number_input("areaSize", "Area (ha)", &area, "any"),
        html::number_input("rating", "Rating", &rating, "any"),
        html::options(period_choices(), period, false),
        html::options(location_choices(locations), location.as_deref(), false)
    )
}
