use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{read_document, PayArgs};
use crate::earnings::{calculate_earnings, calculate_metrics, Metrics, PayProfile};
use crate::error::Result;
use crate::fmt::{miles, money, percent};
use crate::models::{ExpenseCategory, Load, LoadStatus};
use crate::reports::{self, GroupBy, Period, PeriodEarnings, RevenueEntry, WeekGroup};
use crate::settings::{effective_settings, validate, Settings};

/// Prepend driver/company as a header line if either is set.
fn with_header(settings: &Settings, body: String) -> String {
    let names: Vec<&str> = [settings.driver_name.as_str(), settings.company_name.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        body
    } else {
        format!("{}\n{body}", names.join(" · "))
    }
}

fn status_cell(status: LoadStatus) -> Cell {
    match status {
        LoadStatus::Delivered => Cell::new(status.label().green()),
        LoadStatus::Pending => Cell::new(status.label().yellow()),
    }
}

fn short_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "—".to_string(), |d| d.format("%m/%d/%Y").to_string())
}

fn signed(val: f64) -> Cell {
    if val >= 0.0 {
        Cell::new(money(val).green())
    } else {
        Cell::new(money(val).red())
    }
}

// ---------------------------------------------------------------------------
// Data-fetching wrappers (used by dispatch)
// ---------------------------------------------------------------------------

fn load_inputs(file: &str, pay: &PayArgs) -> Result<(crate::models::BackupDocument, Settings)> {
    let flags = pay.overlay();
    validate(&flags)?;
    let doc = read_document(&PathBuf::from(file))?;
    let settings = effective_settings(&doc.settings, &flags);
    log::debug!("effective settings: {settings:?}");
    Ok((doc, settings))
}

pub fn summary(file: &str, rpm_period: Period, pay: &PayArgs) -> Result<()> {
    let (doc, settings) = load_inputs(file, pay)?;
    let profile = settings.pay_profile();
    let today = reports::today();

    let data = SummaryData {
        periods: reports::period_earnings(&doc.loads, Some(&profile), today),
        metrics: calculate_metrics(&doc.loads, &doc.expenses, Some(&profile)),
        rpm: reports::period_rpm(&doc.loads, Some(&profile), rpm_period, today),
        rpm_period,
        recent: reports::recent_loads(&doc.loads, 5),
    };
    println!("{}", with_header(&settings, format_summary(&settings, &data)));
    Ok(())
}

pub fn analytics(file: &str, by: GroupBy, pay: &PayArgs) -> Result<()> {
    let (doc, settings) = load_inputs(file, pay)?;
    let profile = settings.pay_profile();
    let data = analytics_data(&doc.loads, &profile, by, reports::today());
    println!("{}", with_header(&settings, format_analytics(&data)));
    Ok(())
}

pub fn expenses(file: &str, category: Option<ExpenseCategory>, period: Period) -> Result<()> {
    let (doc, settings) = load_inputs(file, &PayArgs::default())?;
    let report = reports::get_expense_report(&doc.expenses, category, period, reports::today());
    println!("{}", with_header(&settings, format_expenses(&report, period)));
    Ok(())
}

pub fn loads(
    file: &str,
    period: Period,
    search: Option<&str>,
    status: Option<LoadStatus>,
    pay: &PayArgs,
) -> Result<()> {
    let (doc, settings) = load_inputs(file, pay)?;
    let profile = settings.pay_profile();
    let today = reports::today();
    let in_period = reports::filter_by_period(&doc.loads, period);
    let matching = reports::search_loads(&in_period, search.unwrap_or(""), status);
    let groups = reports::group_loads_by_week(&matching, Some(&profile), today);
    let body = format_loads(&groups, &profile, period, doc.loads.len());
    println!("{}", with_header(&settings, body));
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub struct SummaryData {
    pub periods: PeriodEarnings,
    pub metrics: Metrics,
    pub rpm: f64,
    pub rpm_period: Period,
    pub recent: Vec<Load>,
}

pub fn format_summary(settings: &Settings, data: &SummaryData) -> String {
    let mut earnings = Table::new();
    earnings.set_header(vec!["Period", "Earnings"]);
    for (label, value) in [
        ("Today", data.periods.today),
        ("This Week", data.periods.this_week),
        ("This Month", data.periods.this_month),
        ("This Year", data.periods.this_year),
    ] {
        earnings.add_row(vec![Cell::new(label), Cell::new(money(value))]);
    }

    let m = &data.metrics;
    let mut perf = Table::new();
    perf.set_header(vec!["Metric", "Value"]);
    perf.add_row(vec![Cell::new("Total Earnings"), Cell::new(money(m.total_earnings))]);
    perf.add_row(vec![Cell::new("Total Expenses"), Cell::new(money(m.total_expenses))]);
    perf.add_row(vec![Cell::new("Net Revenue".bold()), signed(m.net_revenue)]);
    perf.add_row(vec![Cell::new("Total Miles"), Cell::new(miles(m.total_miles))]);
    perf.add_row(vec![Cell::new("Deadhead Miles"), Cell::new(miles(m.total_deadhead))]);
    perf.add_row(vec![Cell::new("Trips"), Cell::new(m.total_trips)]);
    perf.add_row(vec![Cell::new("Avg per Mile"), Cell::new(money(m.avg_per_mile))]);
    perf.add_row(vec![Cell::new("Avg per Trip"), Cell::new(money(m.avg_per_trip))]);
    perf.add_row(vec![Cell::new("Deadhead Ratio"), Cell::new(percent(m.deadhead_ratio))]);
    perf.add_row(vec![
        Cell::new(format!("RPM ({}, by delivery)", data.rpm_period.label())),
        Cell::new(money(data.rpm)),
    ]);

    let recent = if data.recent.is_empty() {
        "No loads recorded yet.".to_string()
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Load", "Broker", "Route", "Miles", "Amount", "Status", "Date"]);
        for load in &data.recent {
            table.add_row(vec![
                Cell::new(&load.load_id),
                Cell::new(&load.broker_name),
                Cell::new(load.route()),
                Cell::new(miles(load.miles())),
                Cell::new(money(load.gross())),
                status_cell(load.status),
                Cell::new(short_date(load.service_date())),
            ]);
        }
        table.to_string()
    };

    format!(
        "Dashboard ({})\n{earnings}\n\nPerformance\n{perf}\n\nRecent Loads\n{recent}",
        settings.profile_key()
    )
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

pub struct AnalyticsData {
    pub by: GroupBy,
    pub entries: Vec<RevenueEntry>,
    pub total: f64,
    pub month: reports::MonthOverMonth,
    pub top_broker: Option<reports::BrokerShare>,
}

pub fn analytics_data(loads: &[Load], profile: &PayProfile, by: GroupBy, today: NaiveDate) -> AnalyticsData {
    AnalyticsData {
        by,
        entries: reports::revenue_by(loads, Some(profile), by),
        total: crate::earnings::total_earnings(loads, Some(profile)),
        month: reports::month_over_month(loads, Some(profile), today),
        top_broker: reports::top_broker(loads, Some(profile)),
    }
}

pub fn format_analytics(data: &AnalyticsData) -> String {
    let mut kpis = Table::new();
    kpis.set_header(vec!["KPI", "Value"]);
    kpis.add_row(vec![Cell::new("Total Revenue"), Cell::new(money(data.total))]);
    kpis.add_row(vec![Cell::new("This Month"), Cell::new(money(data.month.current))]);
    kpis.add_row(vec![Cell::new("Last Month"), Cell::new(money(data.month.previous))]);
    let change = percent(data.month.change_pct);
    kpis.add_row(vec![
        Cell::new("Change"),
        if data.month.change_pct < 0.0 {
            Cell::new(change.red())
        } else {
            Cell::new(change.green())
        },
    ]);
    match &data.top_broker {
        Some(top) => kpis.add_row(vec![
            Cell::new("Top Broker"),
            Cell::new(format!("{} ({} of revenue)", top.name, percent(top.share_pct))),
        ]),
        None => kpis.add_row(vec![Cell::new("Top Broker"), Cell::new("-")]),
    };

    let mut table = Table::new();
    table.set_header(vec![data.by.label(), "Revenue", "Share", "Cumulative"]);
    let running = reports::cumulative(&data.entries);
    for (entry, cum) in data.entries.iter().zip(running) {
        let share = if data.total > 0.0 { entry.value / data.total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(&entry.key),
            Cell::new(money(entry.value)),
            Cell::new(percent(share)),
            Cell::new(money(cum)),
        ]);
    }

    format!("Analytics\n{kpis}\n\nRevenue\n{table}")
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

pub fn format_expenses(report: &reports::ExpenseReport, period: Period) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in &report.categories {
        table.add_row(vec![
            Cell::new(item.category.key()),
            Cell::new(money(item.total)),
            Cell::new(percent(item.pct)),
            Cell::new(item.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(report.total)),
        Cell::new(""),
        Cell::new(report.expenses.len()),
    ]);

    let mut list = Table::new();
    list.set_header(vec!["Date", "Category", "Title", "Amount"]);
    for e in &report.expenses {
        list.add_row(vec![
            Cell::new(&e.date),
            Cell::new(e.category.key()),
            Cell::new(&e.title),
            Cell::new(money(e.value())),
        ]);
    }

    format!("Expenses ({})\n{table}\n\n{list}", period.label())
}

// ---------------------------------------------------------------------------
// Loads
// ---------------------------------------------------------------------------

/// One table per week, newest week first, each under a subtotal line.
pub fn format_loads(groups: &[WeekGroup], profile: &PayProfile, period: Period, total: usize) -> String {
    let shown: usize = groups.iter().map(|g| g.loads.len()).sum();
    let mut out = format!("Loads ({}): {shown} of {total}", period.label());
    if groups.is_empty() {
        out.push_str("\nNo loads found");
        return out;
    }

    let rate = reports::rate_label(profile);
    for group in groups {
        let mut table = Table::new();
        table.set_header(vec![
            "Load", "Broker", "Route", "Miles", "Gross", "RPM", "Rate", "Earnings", "Status", "PU", "DO",
        ]);
        for load in &group.loads {
            let rpm = reports::load_rpm(load).map_or_else(|| "—".to_string(), |r| format!("${r:.2}/mi"));
            table.add_row(vec![
                Cell::new(&load.load_id),
                Cell::new(&load.broker_name),
                Cell::new(load.route()),
                Cell::new(miles(load.miles())),
                Cell::new(money(load.gross())),
                Cell::new(rpm),
                Cell::new(&rate),
                Cell::new(money(calculate_earnings(load, Some(profile))).green()),
                status_cell(load.status),
                Cell::new(short_date(load.pickup())),
                Cell::new(short_date(load.delivery())),
            ]);
        }
        out.push_str(&format!(
            "\n\n{} {}  trips {}  miles {}  deadhead {}  earnings {}\n{table}",
            "Week of".bold(),
            group.label(),
            group.loads.len(),
            miles(group.miles),
            miles(group.deadhead),
            money(group.earnings),
        ));
    }
    out
}
