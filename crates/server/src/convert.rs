//! Mapping between engine values and wire types.

use api_types::{
    Notices,
    report::Totals,
    transaction::{Category as ApiCategory, PaymentMethod as ApiMethod, TransactionView},
};
use engine::{Category, Currency, PaymentMethod, TransactionEntry, View};

pub fn map_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Idr => api_types::Currency::Idr,
        Currency::Eur => api_types::Currency::Eur,
    }
}

pub fn map_category(category: Category) -> ApiCategory {
    match category {
        Category::Income => ApiCategory::Income,
        Category::Expense => ApiCategory::Expense,
    }
}

pub fn category_from_api(category: ApiCategory) -> Category {
    match category {
        ApiCategory::Income => Category::Income,
        ApiCategory::Expense => Category::Expense,
    }
}

pub fn map_method(method: PaymentMethod) -> ApiMethod {
    match method {
        PaymentMethod::Cash => ApiMethod::Cash,
        PaymentMethod::BankTransfer => ApiMethod::BankTransfer,
        PaymentMethod::Card => ApiMethod::Card,
        PaymentMethod::EWallet => ApiMethod::EWallet,
    }
}

pub fn method_from_api(method: ApiMethod) -> PaymentMethod {
    match method {
        ApiMethod::Cash => PaymentMethod::Cash,
        ApiMethod::BankTransfer => PaymentMethod::BankTransfer,
        ApiMethod::Card => PaymentMethod::Card,
        ApiMethod::EWallet => PaymentMethod::EWallet,
    }
}

pub fn map_entry(entry: &TransactionEntry) -> TransactionView {
    TransactionView {
        date: entry.date,
        category: map_category(entry.category),
        amount_minor: entry.amount.cents(),
        description: entry.description.clone(),
        payment_method: entry.payment_method.map(map_method),
    }
}

pub fn map_totals(totals: &engine::Totals) -> Totals {
    Totals {
        income_minor: totals.income.cents(),
        expense_minor: totals.expense.cents(),
        net_minor: totals.net().cents(),
    }
}

pub fn notices<T>(view: &View<T>) -> Notices {
    Notices {
        warning: view.warning.clone(),
        skipped_rows: view.skipped_rows,
    }
}
