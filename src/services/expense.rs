// 💸 Expense Service

use super::{traced, VendorService};
use crate::entities::{Expense, ExpenseCategory, ExpenseDraft};
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
pub struct ExpenseFilter {
    /// Title contains this text
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub expense_category: Option<ExpenseCategory>,

    /// Vendor id
    #[serde(default, deserialize_with = "blank_as_none")]
    pub vendor: Option<i64>,
}

pub struct ExpenseService {
    expenses: Arc<dyn EntityStore<Expense>>,
    vendors: VendorService,
    text_match: TextMatch,
}

impl ExpenseService {
    pub fn new(expenses: Arc<dyn EntityStore<Expense>>, vendors: VendorService) -> Self {
        ExpenseService {
            expenses,
            vendors,
            text_match: TextMatch::default(),
        }
    }

    pub fn with_text_match(mut self, text_match: TextMatch) -> Self {
        self.text_match = text_match;
        self
    }

    pub fn list_all(&self) -> Result<Vec<Expense>> {
        self.expenses.list_all()
    }

    pub fn find_by_id(&self, id: i64) -> Result<Expense> {
        traced(self.expenses.find_by_id(id))
    }

    pub fn create(&self, draft: ExpenseDraft) -> Result<Expense> {
        draft.validate()?;
        let vendor = self.vendors.find_by_id(draft.vendor)?;

        let expense = self.expenses.save(Expense::new(
            draft.title,
            draft.date_created,
            draft.amount,
            draft.days_to_expire,
            draft.expense_category,
            vendor,
        ))?;

        info!(id = ?expense.id, title = %expense.title, "expense created");
        Ok(expense)
    }

    pub fn update(&self, id: i64, draft: ExpenseDraft) -> Result<Expense> {
        draft.validate()?;
        let vendor = self.vendors.find_by_id(draft.vendor)?;
        let mut expense = self.find_by_id(id)?;

        expense.title = draft.title;
        expense.date_created = draft.date_created;
        expense.amount = draft.amount;
        expense.days_to_expire = draft.days_to_expire;
        expense.expense_category = draft.expense_category;
        expense.vendor = vendor;

        let expense = self.expenses.save(expense)?;
        info!(id, "expense updated");
        Ok(expense)
    }

    pub fn delete(&self, id: i64) -> Result<Expense> {
        let expense = self.find_by_id(id)?;
        self.expenses.delete(&expense)?;
        info!(id, "expense deleted");
        Ok(expense)
    }

    /// Add one day to the expense's expiration countdown.
    pub fn extend_expiration(&self, id: i64) -> Result<Expense> {
        let mut expense = self.find_by_id(id)?;
        expense.extend();

        let expense = self.expenses.save(expense)?;
        info!(id, days_to_expire = expense.days_to_expire, "expense extended");
        Ok(expense)
    }

    pub fn predicate(&self, filter: &ExpenseFilter) -> Predicate {
        Predicate::all_of([
            Criterion::contains_with("title", filter.title.as_deref(), self.text_match),
            Criterion::equals("expense_category", filter.expense_category),
            Criterion::equals("vendor.id", filter.vendor),
        ])
    }

    pub fn find_page(
        &self,
        filter: &ExpenseFilter,
        page_num: usize,
        page_size: usize,
    ) -> Result<Page<Expense>> {
        let request = PageRequest::new(page_num, page_size)?;
        let predicate = self.predicate(filter);
        debug!(?filter, page_num, page_size, "listing expenses");

        self.expenses.find_page(&predicate, request)
    }
}
