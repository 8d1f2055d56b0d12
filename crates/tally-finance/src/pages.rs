//! Page templates for the finance tracker.

use tally_core::templates::{
    card, empty_state, error_banner, html_escape, input, layout, select, stats_card, submit_button,
    table, textarea,
};

use crate::BRAND;
use crate::models::{Transaction, TransactionForm, TransactionKind};
use crate::report::{Chart, Summary};

// =============================================================================
// Dashboard
// =============================================================================

pub fn dashboard_page(transactions: &[Transaction], summary: &Summary, flash: Option<&str>) -> String {
    let stats = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-3 gap-6 mb-6">
            {balance}
            {income}
            {expense}
        </div>"##,
        balance = stats_card("Balance", &money(summary.balance), "wallet", "primary"),
        income = stats_card("Income", &money(summary.total_income), "arrow-down", "green"),
        expense = stats_card("Expenses", &money(summary.total_expense), "arrow-up", "red"),
    );

    let charts = summary.charts();
    let charts_html = if charts.is_empty() {
        String::new()
    } else {
        let cells: String = charts
            .iter()
            .enumerate()
            .map(|(i, chart)| chart_block(&format!("chart-{i}"), chart))
            .collect();
        format!(r##"<div class="grid grid-cols-1 md:grid-cols-2 gap-6 mb-6">{cells}</div>"##)
    };

    let list = if transactions.is_empty() {
        empty_state(
            "receipt",
            "No transactions yet",
            "Add one by hand or import a spreadsheet.",
            Some(("Add transaction", "/add_transaction")),
        )
    } else {
        let rows: Vec<Vec<String>> = transactions.iter().map(transaction_row).collect();
        table(&["Date", "Type", "Category", "Amount", "Description"], &rows)
    };

    let content = format!(
        r##"<div class="flex items-center justify-between mb-6">
            <h1 class="text-3xl font-bold text-gray-900">Dashboard</h1>
            <div class="flex items-center gap-2">
                <a href="/add_transaction" class="inline-flex items-center gap-2 bg-primary-600 hover:bg-primary-700 text-white px-4 py-2 rounded-lg font-medium">
                    <i class="fas fa-plus"></i> Add transaction
                </a>
                <a href="/export" class="inline-flex items-center gap-2 border border-gray-300 hover:bg-gray-100 px-4 py-2 rounded-lg font-medium">
                    <i class="fas fa-file-excel"></i> Export
                </a>
            </div>
        </div>
        {stats}
        {charts_html}
        {list}
        {import}"##,
        list = card("Transactions", &list),
        import = card("Import from spreadsheet", &import_form()),
    );

    layout(&BRAND, "Dashboard", true, flash, &content)
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// Canvas plus its JSON data island.
fn chart_block(id: &str, chart: &Chart) -> String {
    // "</" would close the surrounding script element.
    let json = serde_json::to_string(chart)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/");
    format!(
        r##"<div class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <canvas data-chart="{id}"></canvas>
            <script type="application/json" id="{id}">{json}</script>
        </div>"##
    )
}

fn transaction_row(t: &Transaction) -> Vec<String> {
    let kind = match t.kind {
        TransactionKind::Income => r#"<span class="text-green-600">Income</span>"#,
        TransactionKind::Expense => r#"<span class="text-red-600">Expense</span>"#,
    };
    vec![
        t.date.to_string(),
        kind.to_string(),
        html_escape(&t.category),
        money(t.amount),
        t.description.as_deref().map(html_escape).unwrap_or_default(),
    ]
}

fn import_form() -> String {
    format!(
        r##"<form method="POST" action="/import" enctype="multipart/form-data" class="flex items-center gap-4">
            <input type="file" name="file" accept=".xlsx" class="text-sm text-gray-700">
            {submit}
        </form>
        <p class="mt-2 text-sm text-gray-500">Columns: Дата, Приход, Расход, Наименование.</p>"##,
        submit = submit_button("Import"),
    )
}

// =============================================================================
// Add Transaction
// =============================================================================

pub fn add_transaction_page(form: &TransactionForm, error: Option<&str>) -> String {
    let error_html = error.map(error_banner).unwrap_or_default();
    let is_income = form.kind == TransactionKind::Income.as_str();

    let body = format!(
        r##"{error_html}
        <form method="POST" action="/add_transaction">
            {date}
            {amount}
            {kind}
            {category}
            {description}
            <div class="flex items-center gap-4">
                {submit}
                <a href="/" class="text-gray-500 hover:underline">Cancel</a>
            </div>
        </form>"##,
        date = input("date", "Date", "date", &form.date, true),
        amount = input("amount", "Amount", "text", &form.amount, true),
        kind = select(
            "type",
            "Type",
            &[("expense", "Expense", !is_income), ("income", "Income", is_income)],
        ),
        category = input("category", "Category", "text", &form.category, true),
        description = textarea("description", "Description", &form.description),
        submit = submit_button("Add transaction"),
    );

    let content = format!(
        r##"<div class="max-w-xl mx-auto">{}</div>"##,
        card("New transaction", &body)
    );
    layout(&BRAND, "Add transaction", true, None, &content)
}
