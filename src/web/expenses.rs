// 💸 Expense pages

use super::html::{self, escape};
use super::{AppState, ListQuery, WebResult};
use crate::entities::{Expense, ExpenseCategory, ExpenseDraft, Vendor};
use crate::services::ExpenseFilter;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use chrono::{Local, NaiveDate};

const LIST: &str = "/expenses";

/// GET /expenses
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery<ExpenseFilter>>,
) -> WebResult<Html<String>> {
    let request = query.request(state.page_size)?;
    let filter = &query.filter;
    let page = state
        .catalog
        .expenses
        .find_page(filter, request.number(), request.size())?;
    let vendors = state.catalog.vendors.list_all()?;

    let active = html::query_string(&[
        ("title", filter.title.clone()),
        ("expenseCategory", filter.expense_category.map(|c| c.as_str().to_string())),
        ("vendor", filter.vendor.map(|id| id.to_string())),
    ]);

    let today = Local::now().date_naive();
    let mut body = filter_form(filter, &vendors, request.size());
    body.push_str(r#"<p><a href="/expenses/add">Add expense</a></p>"#);
    body.push_str("<table><tr><th>Title</th><th>Created</th><th>Amount</th><th>Category</th><th>Vendor</th><th>Expires</th><th>Status</th><th></th></tr>");
    for expense in &page.content {
        body.push_str(&row(expense, today));
    }
    body.push_str("</table>");
    body.push_str(&html::pagination(LIST, &active, &page));

    Ok(html::layout("Expenses", &body))
}

/// GET /expenses/add
pub async fn add_form(State(state): State<AppState>) -> WebResult<Html<String>> {
    let vendors = state.catalog.vendors.list_all()?;
    Ok(html::layout("Add Expense", &editor(LIST, None, &vendors)))
}

/// GET /expenses/edit/:id
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> WebResult<Html<String>> {
    let expense = state.catalog.expenses.find_by_id(id)?;
    let vendors = state.catalog.vendors.list_all()?;
    let action = format!("{}/{}", LIST, id);

    Ok(html::layout("Edit Expense", &editor(&action, Some(&expense), &vendors)))
}

/// POST /expenses
pub async fn create(
    State(state): State<AppState>,
    Form(draft): Form<ExpenseDraft>,
) -> WebResult<Redirect> {
    state.catalog.expenses.create(draft)?;
    Ok(Redirect::to(LIST))
}

/// POST /expenses/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(draft): Form<ExpenseDraft>,
) -> WebResult<Redirect> {
    state.catalog.expenses.update(id, draft)?;
    Ok(Redirect::to(LIST))
}

/// POST /expenses/delete/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> WebResult<Redirect> {
    state.catalog.expenses.delete(id)?;
    Ok(Redirect::to(LIST))
}

/// POST /expenses/extend/:id
pub async fn extend(State(state): State<AppState>, Path(id): Path<i64>) -> WebResult<Redirect> {
    state.catalog.expenses.extend_expiration(id)?;
    Ok(Redirect::to(LIST))
}

fn row(expense: &Expense, today: NaiveDate) -> String {
    let id = expense.id.unwrap_or_default();
    let mut actions = format!(r#"<a href="/expenses/edit/{}">Edit</a> "#, id);
    actions.push_str(&html::post_button(&format!("/expenses/delete/{}", id), "Delete"));
    actions.push_str(&html::post_button(&format!("/expenses/extend/{}", id), "Extend"));

    format!(
        "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        escape(&expense.title),
        expense.date_created,
        expense.amount,
        expense.expense_category.label(),
        escape(&expense.vendor.name),
        expense.expires_on(),
        if expense.is_expired(today) { "Expired" } else { "Active" },
        actions
    )
}

fn category_choices() -> Vec<(String, String)> {
    ExpenseCategory::ALL
        .iter()
        .map(|c| (c.as_str().to_string(), c.label().to_string()))
        .collect()
}

fn vendor_choices(vendors: &[Vendor]) -> Vec<(String, String)> {
    vendors
        .iter()
        .filter_map(|v| v.id.map(|id| (id.to_string(), v.name.clone())))
        .collect()
}

fn filter_form(filter: &ExpenseFilter, vendors: &[Vendor], page_size: usize) -> String {
    let category = filter.expense_category.map(|c| c.as_str());
    let vendor = filter.vendor.map(|id| id.to_string());

    format!(
        r#"<form method="get" action="/expenses">{} <label>Category <select name="expenseCategory">{}</select></label> <label>Vendor <select name="vendor">{}</select></label> <input type="hidden" name="pageSize" value="{}"> <button type="submit">Filter</button></form>"#,
        html::text_input("title", "Title", filter.title.as_deref().unwrap_or_default()),
        html::options(category_choices(), category, true),
        html::options(vendor_choices(vendors), vendor.as_deref(), true),
        page_size
    )
}

fn editor(action: &str, expense: Option<&Expense>, vendors: &[Vendor]) -> String {
    let title = expense.map(|e| e.title.as_str()).unwrap_or_default();
    let created = expense
        .map(|e| e.date_created)
        .unwrap_or_else(|| Local::now().date_naive());
    let amount = expense.map(|e| e.amount.to_string()).unwrap_or_default();
    let days = expense.map(|e| e.days_to_expire.to_string()).unwrap_or_default();
    let category = expense.map(|e| e.expense_category.as_str());
    let vendor = expense.and_then(|e| e.vendor.id).map(|id| id.to_string());

    format!(
        r#"<form method="post" action="{}">{}<br><label>Created <input type="date" name="dateCreated" value="{}"></label><br>{}<br>{}<br><label>Category <select name="expenseCategory">{}</select></label><br><label>Vendor <select name="vendor">{}</select></label><br><button type="submit">Save</button></form>"#,
        escape(action),
        html::text_input("title", "Title", title),
        created,
        html::number_input("amount", "Amount", &amount, "0.01"),
        html::number_input("daysToExpire", "Days to expire", &days, "1"),
        html::options(category_choices(), category, false),
        html::options(vendor_choices(vendors), vendor.as_deref(), false)
    )
}
