use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::earnings::{calculate_earnings, total_earnings, EarningProfile, PayProfile};
use crate::models::{Expense, ExpenseCategory, Load, LoadStatus};

// ---------------------------------------------------------------------------
// Period filter helper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    All,
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
}

impl Period {
    /// Unrecognized names select every record.
    pub fn parse(name: &str) -> Self {
        match name {
            "today" => Self::Today,
            "thisWeek" | "this-week" => Self::ThisWeek,
            "thisMonth" | "this-month" => Self::ThisMonth,
            "thisYear" | "this-year" => Self::ThisYear,
            _ => Self::All,
        }
    }

    pub fn is_known(name: &str) -> bool {
        name == "all" || Self::parse(name) != Self::All
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::ThisYear => "This Year",
        }
    }

    /// Whether `date` falls in this period relative to `today`. Weeks run
    /// Monday through Sunday. A missing date only passes `All`.
    pub fn contains(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        match (self, date) {
            (Self::All, _) => true,
            (_, None) => false,
            (Self::Today, Some(date)) => date == today,
            (Self::ThisWeek, Some(date)) => date.iso_week() == today.iso_week(),
            (Self::ThisMonth, Some(date)) => date.year() == today.year() && date.month() == today.month(),
            (Self::ThisYear, Some(date)) => date.year() == today.year(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateField {
    #[default]
    Pickup,
    Delivery,
}

impl DateField {
    fn of(&self, load: &Load) -> Option<NaiveDate> {
        match self {
            Self::Pickup => load.pickup(),
            Self::Delivery => load.delivery(),
        }
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn filter_by_period_on(loads: &[Load], period: Period, field: DateField, today: NaiveDate) -> Vec<Load> {
    loads
        .iter()
        .filter(|l| period.contains(field.of(l), today))
        .cloned()
        .collect()
}

/// Loads picked up in `period` as of the current local date.
pub fn filter_by_period(loads: &[Load], period: Period) -> Vec<Load> {
    filter_by_period_on(loads, period, DateField::Pickup, today())
}

// ---------------------------------------------------------------------------
// Grouped revenue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueEntry {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupBy {
    Broker,
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl GroupBy {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Broker => "Broker",
            Self::Day => "Day",
            Self::Week => "Week of",
            Self::Month => "Month",
            Self::Year => "Year",
        }
    }
}

pub fn revenue_by(loads: &[Load], profile: Option<&PayProfile>, group: GroupBy) -> Vec<RevenueEntry> {
    match group {
        GroupBy::Broker => revenue_by_broker(loads, profile),
        GroupBy::Day => revenue_by_day(loads, profile),
        GroupBy::Week => revenue_by_week(loads, profile),
        GroupBy::Month => revenue_by_month(loads, profile),
        GroupBy::Year => revenue_by_year(loads, profile),
    }
}

/// Highest-earning broker first. Ties keep first-seen order.
pub fn revenue_by_broker(loads: &[Load], profile: Option<&PayProfile>) -> Vec<RevenueEntry> {
    let mut entries: Vec<RevenueEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for load in loads {
        let broker = if load.broker_name.is_empty() {
            "Unknown"
        } else {
            load.broker_name.as_str()
        };
        let earned = calculate_earnings(load, profile);
        match index.get(broker) {
            Some(&i) => entries[i].value += earned,
            None => {
                index.insert(broker.to_string(), entries.len());
                entries.push(RevenueEntry {
                    key: broker.to_string(),
                    value: earned,
                });
            }
        }
    }
    entries.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    entries
}

/// Sum earnings under a pickup-date key; loads without a usable pickup date
/// are skipped. Keys sort chronologically.
fn revenue_by_pickup<F>(loads: &[Load], profile: Option<&PayProfile>, key: F) -> Vec<RevenueEntry>
where
    F: Fn(NaiveDate) -> String,
{
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    for load in loads {
        let Some(date) = load.pickup() else {
            continue;
        };
        *map.entry(key(date)).or_insert(0.0) += calculate_earnings(load, profile);
    }
    map.into_iter()
        .map(|(key, value)| RevenueEntry { key, value })
        .collect()
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn revenue_by_day(loads: &[Load], profile: Option<&PayProfile>) -> Vec<RevenueEntry> {
    revenue_by_pickup(loads, profile, |d| d.format("%Y-%m-%d").to_string())
}

pub fn revenue_by_week(loads: &[Load], profile: Option<&PayProfile>) -> Vec<RevenueEntry> {
    revenue_by_pickup(loads, profile, |d| week_start(d).format("%Y-%m-%d").to_string())
}

pub fn revenue_by_month(loads: &[Load], profile: Option<&PayProfile>) -> Vec<RevenueEntry> {
    revenue_by_pickup(loads, profile, |d| d.format("%Y-%m").to_string())
}

pub fn revenue_by_year(loads: &[Load], profile: Option<&PayProfile>) -> Vec<RevenueEntry> {
    revenue_by_pickup(loads, profile, |d| d.format("%Y").to_string())
}

pub fn cumulative(entries: &[RevenueEntry]) -> Vec<f64> {
    entries
        .iter()
        .scan(0.0f64, |running, e| {
            *running += e.value;
            Some(*running)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodEarnings {
    pub today: f64,
    pub this_week: f64,
    pub this_month: f64,
    pub this_year: f64,
}

pub fn period_earnings(loads: &[Load], profile: Option<&PayProfile>, today: NaiveDate) -> PeriodEarnings {
    let sum = |period: Period| {
        total_earnings(
            loads.iter().filter(|l| period.contains(l.pickup(), today)),
            profile,
        )
    };
    PeriodEarnings {
        today: sum(Period::Today),
        this_week: sum(Period::ThisWeek),
        this_month: sum(Period::ThisMonth),
        this_year: sum(Period::ThisYear),
    }
}

/// Earnings per loaded mile for loads delivered in `period`.
pub fn period_rpm(loads: &[Load], profile: Option<&PayProfile>, period: Period, today: NaiveDate) -> f64 {
    let selected = filter_by_period_on(loads, period, DateField::Delivery, today);
    let miles: f64 = selected.iter().map(Load::miles).sum();
    if miles > 0.0 {
        total_earnings(&selected, profile) / miles
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Analytics KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthOverMonth {
    pub current: f64,
    pub previous: f64,
    pub change_pct: f64,
}

pub fn month_over_month(loads: &[Load], profile: Option<&PayProfile>, today: NaiveDate) -> MonthOverMonth {
    let prev = today
        .with_day(1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(today);
    let in_month = |date: NaiveDate, month: NaiveDate| {
        date.year() == month.year() && date.month() == month.month()
    };
    let sum_for = |month: NaiveDate| {
        total_earnings(
            loads
                .iter()
                .filter(|l| l.pickup().is_some_and(|d| in_month(d, month))),
            profile,
        )
    };
    let current = sum_for(today);
    let previous = sum_for(prev);
    let change_pct = if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    };
    MonthOverMonth {
        current,
        previous,
        change_pct,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrokerShare {
    pub name: String,
    pub value: f64,
    pub share_pct: f64,
}

pub fn top_broker(loads: &[Load], profile: Option<&PayProfile>) -> Option<BrokerShare> {
    let total = total_earnings(loads, profile);
    let top = revenue_by_broker(loads, profile).into_iter().next()?;
    Some(BrokerShare {
        share_pct: if total > 0.0 { top.value / total * 100.0 } else { 0.0 },
        name: top.key,
        value: top.value,
    })
}

// ---------------------------------------------------------------------------
// Load list
// ---------------------------------------------------------------------------

/// Case-insensitive substring match on load ID, broker, and pickup or
/// delivery city. An empty query matches everything.
pub fn search_loads(loads: &[Load], query: &str, status: Option<LoadStatus>) -> Vec<Load> {
    let q = query.trim().to_lowercase();
    loads
        .iter()
        .filter(|l| {
            q.is_empty()
                || [&l.load_id, &l.broker_name, &l.pickup_city, &l.delivery_city]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&q))
        })
        .filter(|l| status.map_or(true, |s| l.status == s))
        .cloned()
        .collect()
}

/// Gross per loaded mile; `None` when the load has no loaded miles.
pub fn load_rpm(load: &Load) -> Option<f64> {
    (load.miles() > 0.0).then(|| load.gross() / load.miles())
}

/// Short description of how a load is paid under `profile`.
pub fn rate_label(profile: &PayProfile) -> String {
    let pct = profile.percentage_rate.unwrap_or(0.0);
    match profile.earning_profile {
        Some(EarningProfile::SoloPercentage | EarningProfile::TeamPercentage) => format!("{pct}%"),
        Some(EarningProfile::SoloPerMile | EarningProfile::TeamPerMile) => {
            format!("${:.2}/mi", profile.rate_per_mile.unwrap_or(0.0))
        }
        Some(EarningProfile::OwnerOperator) if pct > 0.0 && pct < 100.0 => format!("{pct}%"),
        Some(EarningProfile::OwnerOperator) => "100%".to_string(),
        None => "—".to_string(),
    }
}

fn newest_first(loads: &mut [Load]) {
    loads.sort_by(|a, b| b.service_date().cmp(&a.service_date()));
}

/// The `n` most recent loads by delivery date (pickup date when undelivered).
pub fn recent_loads(loads: &[Load], n: usize) -> Vec<Load> {
    let mut sorted = loads.to_vec();
    newest_first(&mut sorted);
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekGroup {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub loads: Vec<Load>,
    pub miles: f64,
    pub deadhead: f64,
    pub earnings: f64,
}

impl WeekGroup {
    /// "Jan 6 – Jan 12, 2025", with the year on both ends when it differs.
    pub fn label(&self) -> String {
        if self.week_start.year() == self.week_end.year() {
            format!("{} – {}", self.week_start.format("%b %-d"), self.week_end.format("%b %-d, %Y"))
        } else {
            format!(
                "{} – {}",
                self.week_start.format("%b %-d, %Y"),
                self.week_end.format("%b %-d, %Y")
            )
        }
    }
}

/// Group loads by the Monday-start week of their delivery date (pickup date
/// when undelivered), newest week first. Undated loads land in the week of
/// `today`.
pub fn group_loads_by_week(loads: &[Load], profile: Option<&PayProfile>, today: NaiveDate) -> Vec<WeekGroup> {
    let mut weeks: BTreeMap<NaiveDate, Vec<Load>> = BTreeMap::new();
    for load in loads {
        let start = week_start(load.service_date().unwrap_or(today));
        weeks.entry(start).or_default().push(load.clone());
    }
    weeks
        .into_iter()
        .rev()
        .map(|(week_start, mut loads)| {
            newest_first(&mut loads);
            WeekGroup {
                week_start,
                week_end: week_start + Duration::days(6),
                miles: loads.iter().map(Load::miles).sum(),
                deadhead: loads.iter().map(Load::deadhead).sum(),
                earnings: total_earnings(&loads, profile),
                loads,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

pub fn filter_expenses(
    expenses: &[Expense],
    category: Option<ExpenseCategory>,
    period: Period,
    today: NaiveDate,
) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .filter(|e| period.contains(e.day(), today))
        .cloned()
        .collect()
}

pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

pub struct ExpenseReport {
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
    /// Newest first; undated expenses last.
    pub expenses: Vec<Expense>,
}

pub fn expenses_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let total: f64 = expenses.iter().map(Expense::value).sum();
    let mut categories: Vec<CategoryTotal> = ExpenseCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let matching: Vec<&Expense> = expenses.iter().filter(|e| e.category == category).collect();
            if matching.is_empty() {
                return None;
            }
            let sum: f64 = matching.iter().map(|e| e.value()).sum();
            Some(CategoryTotal {
                category,
                total: sum,
                count: matching.len(),
                pct: if total > 0.0 { sum / total * 100.0 } else { 0.0 },
            })
        })
        .collect();
    categories.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    categories
}

pub fn get_expense_report(
    expenses: &[Expense],
    category: Option<ExpenseCategory>,
    period: Period,
    today: NaiveDate,
) -> ExpenseReport {
    let mut filtered = filter_expenses(expenses, category, period, today);
    filtered.sort_by(|a, b| b.day().cmp(&a.day()));
    ExpenseReport {
        categories: expenses_by_category(&filtered),
        total: filtered.iter().map(Expense::value).sum(),
        expenses: filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn load(broker: &str, pickup: &str, miles: f64, gross: f64) -> Load {
        Load {
            broker_name: broker.to_string(),
            pickup_date: pickup.to_string(),
            loaded_miles: Some(miles),
            gross_amount: Some(gross),
            ..Default::default()
        }
    }

    fn expense(category: ExpenseCategory, date: &str, amount: f64) -> Expense {
        Expense {
            category,
            date: date.to_string(),
            amount: Some(amount),
            ..Default::default()
        }
    }

    fn keys(entries: &[RevenueEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_revenue_by_month_is_chronological() {
        let loads = vec![
            load("A", "2025-03-10", 100.0, 300.0),
            load("A", "2025-01-05", 100.0, 100.0),
            load("B", "2025-02-20", 100.0, 200.0),
            load("B", "2025-01-25", 100.0, 50.0),
        ];
        let months = revenue_by_month(&loads, None);
        assert_eq!(keys(&months), vec!["2025-01", "2025-02", "2025-03"]);
        assert_eq!(months[0].value, 150.0);
    }

    #[test]
    fn test_date_grouping_skips_missing_and_bad_dates() {
        let loads = vec![
            load("A", "", 100.0, 300.0),
            load("A", "not a date", 100.0, 300.0),
            load("A", "2024-12-31", 100.0, 10.0),
            load("A", "2025-01-01T10:00:00", 100.0, 20.0),
        ];
        let years = revenue_by_year(&loads, None);
        assert_eq!(keys(&years), vec!["2024", "2025"]);
        assert_eq!(revenue_by_day(&loads, None).len(), 2);
    }

    #[test]
    fn test_revenue_by_week_uses_monday() {
        let loads = vec![
            // Sunday belongs to the week that started the previous Monday.
            load("A", "2025-03-09", 0.0, 100.0),
            load("A", "2025-03-03", 0.0, 50.0),
            load("A", "2025-03-10", 0.0, 25.0),
        ];
        let weeks = revenue_by_week(&loads, None);
        assert_eq!(keys(&weeks), vec!["2025-03-03", "2025-03-10"]);
        assert_eq!(weeks[0].value, 150.0);
        assert_eq!(week_start(d(2025, 1, 1)), d(2024, 12, 30));
    }

    #[test]
    fn test_revenue_by_broker_descending_and_stable() {
        let loads = vec![
            load("", "2025-01-01", 0.0, 100.0),
            load("TQL", "2025-01-01", 0.0, 500.0),
            load("CH Robinson", "2025-01-01", 0.0, 300.0),
            load("Echo", "2025-01-01", 0.0, 200.0),
            load("Unknown", "2025-01-01", 0.0, 100.0),
        ];
        let brokers = revenue_by_broker(&loads, None);
        assert_eq!(keys(&brokers), vec!["TQL", "CH Robinson", "Unknown", "Echo"]);
        assert_eq!(brokers[2].value, 200.0);

        let tied = vec![load("B", "", 0.0, 10.0), load("A", "", 0.0, 10.0)];
        assert_eq!(keys(&revenue_by_broker(&tied, None)), vec!["B", "A"]);
    }

    #[test]
    fn test_grouping_applies_profile() {
        let loads = vec![load("A", "2025-05-01", 1000.0, 2500.0)];
        let p = PayProfile::new(EarningProfile::SoloPerMile, 0.5, 0.0);
        assert_eq!(revenue_by(&loads, Some(&p), GroupBy::Month)[0].value, 500.0);
        assert_eq!(revenue_by(&loads, Some(&p), GroupBy::Broker)[0].value, 500.0);
    }

    #[test]
    fn test_period_contains() {
        let today = d(2025, 6, 18); // Wednesday
        assert!(Period::Today.contains(Some(today), today));
        assert!(Period::ThisWeek.contains(Some(d(2025, 6, 16)), today));
        assert!(Period::ThisWeek.contains(Some(d(2025, 6, 22)), today));
        assert!(!Period::ThisWeek.contains(Some(d(2025, 6, 15)), today));
        assert!(Period::ThisMonth.contains(Some(d(2025, 6, 1)), today));
        assert!(!Period::ThisMonth.contains(Some(d(2024, 6, 18)), today));
        assert!(Period::ThisYear.contains(Some(d(2025, 1, 1)), today));
        assert!(!Period::ThisYear.contains(None, today));
        assert!(Period::All.contains(None, today));
    }

    #[test]
    fn test_period_parse_defaults_to_all() {
        assert_eq!(Period::parse("thisWeek"), Period::ThisWeek);
        assert_eq!(Period::parse("today"), Period::Today);
        assert_eq!(Period::parse("lastDecade"), Period::All);
        assert!(Period::is_known("all"));
        assert!(Period::is_known("this-month"));
        assert!(!Period::is_known("lastDecade"));
    }

    #[test]
    fn test_filter_by_period_on() {
        let today = d(2025, 6, 18);
        let mut delivered = load("A", "2025-05-30", 100.0, 100.0);
        delivered.delivery_date = "2025-06-02".to_string();
        let loads = vec![
            delivered,
            load("B", "2025-06-18", 100.0, 100.0),
            load("C", "", 100.0, 100.0),
        ];
        assert_eq!(filter_by_period_on(&loads, Period::ThisMonth, DateField::Pickup, today).len(), 1);
        assert_eq!(filter_by_period_on(&loads, Period::ThisMonth, DateField::Delivery, today).len(), 1);
        assert_eq!(filter_by_period_on(&loads, Period::All, DateField::Pickup, today).len(), 3);
    }

    #[test]
    fn test_period_earnings_and_rpm() {
        let today = d(2025, 6, 18);
        let mut a = load("A", "2025-06-18", 500.0, 1000.0);
        a.delivery_date = "2025-06-19".to_string();
        let mut b = load("B", "2025-06-02", 250.0, 750.0);
        b.delivery_date = "2025-06-03".to_string();
        let c = load("C", "2025-01-10", 100.0, 100.0);
        let loads = vec![a, b, c];

        let pe = period_earnings(&loads, None, today);
        assert_eq!(pe.today, 1000.0);
        assert_eq!(pe.this_week, 1000.0);
        assert_eq!(pe.this_month, 1750.0);
        assert_eq!(pe.this_year, 1850.0);

        let rpm = period_rpm(&loads, None, Period::ThisMonth, today);
        assert!((rpm - 1750.0 / 750.0).abs() < 1e-9);
        assert_eq!(period_rpm(&loads, None, Period::Today, today), 0.0);
        assert!((period_rpm(&loads, None, Period::All, today) - 1850.0 / 850.0).abs() < 1e-9);
    }

    #[test]
    fn test_month_over_month() {
        let today = d(2025, 3, 31);
        let loads = vec![
            load("A", "2025-03-01", 0.0, 1500.0),
            load("A", "2025-02-28", 0.0, 1000.0),
            load("A", "2024-03-15", 0.0, 9999.0),
        ];
        let mom = month_over_month(&loads, None, today);
        assert_eq!(mom.current, 1500.0);
        assert_eq!(mom.previous, 1000.0);
        assert_eq!(mom.change_pct, 50.0);

        let jan = month_over_month(&[load("A", "2024-12-05", 0.0, 10.0)], None, d(2025, 1, 2));
        assert_eq!(jan.previous, 10.0);
        assert_eq!(jan.change_pct, -100.0);

        let empty = month_over_month(&[], None, today);
        assert_eq!(empty.change_pct, 0.0);
    }

    #[test]
    fn test_top_broker_share() {
        let loads = vec![load("TQL", "", 0.0, 750.0), load("Echo", "", 0.0, 250.0)];
        let top = top_broker(&loads, None).unwrap();
        assert_eq!(top.name, "TQL");
        assert_eq!(top.share_pct, 75.0);
        assert!(top_broker(&[], None).is_none());
    }

    #[test]
    fn test_cumulative() {
        let entries = vec![
            RevenueEntry { key: "a".into(), value: 1.0 },
            RevenueEntry { key: "b".into(), value: 2.5 },
            RevenueEntry { key: "c".into(), value: 0.5 },
        ];
        assert_eq!(cumulative(&entries), vec![1.0, 3.5, 4.0]);
    }

    #[test]
    fn test_expense_report() {
        let today = d(2025, 6, 18);
        let expenses = vec![
            expense(ExpenseCategory::Fuel, "2025-06-10", 300.0),
            expense(ExpenseCategory::Toll, "2025-06-12", 25.0),
            expense(ExpenseCategory::Fuel, "2025-06-15", 200.0),
            expense(ExpenseCategory::Food, "2025-05-30", 40.0),
            expense(ExpenseCategory::Other, "", 10.0),
        ];
        let report = get_expense_report(&expenses, None, Period::ThisMonth, today);
        assert_eq!(report.total, 525.0);
        assert_eq!(report.categories[0].category, ExpenseCategory::Fuel);
        assert_eq!(report.categories[0].count, 2);
        assert!((report.categories[0].pct - 500.0 / 525.0 * 100.0).abs() < 1e-9);
        assert_eq!(report.expenses[0].date, "2025-06-15");

        let fuel = get_expense_report(&expenses, Some(ExpenseCategory::Fuel), Period::All, today);
        assert_eq!(fuel.total, 500.0);
        assert_eq!(fuel.categories.len(), 1);

        let all = get_expense_report(&expenses, None, Period::All, today);
        assert_eq!(all.expenses.len(), 5);
        assert_eq!(all.expenses.last().unwrap().date, "");
    }

    fn trip(id: &str, broker: &str, pickup: &str, delivery: &str, status: LoadStatus) -> Load {
        Load {
            load_id: id.to_string(),
            broker_name: broker.to_string(),
            pickup_date: pickup.to_string(),
            delivery_date: delivery.to_string(),
            loaded_miles: Some(100.0),
            deadhead_miles: Some(10.0),
            gross_amount: Some(300.0),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_search_loads() {
        let mut a = trip("TX-100", "TQL", "2025-06-02", "2025-06-03", LoadStatus::Delivered);
        a.pickup_city = "Amarillo".into();
        let mut b = trip("B-7", "Echo Global", "2025-06-04", "", LoadStatus::Pending);
        b.delivery_city = "Bolingbrook".into();
        let loads = vec![a, b];

        let ids = |found: Vec<Load>| found.into_iter().map(|l| l.load_id).collect::<Vec<_>>();
        assert_eq!(ids(search_loads(&loads, "", None)), vec!["TX-100", "B-7"]);
        assert_eq!(ids(search_loads(&loads, "amar", None)), vec!["TX-100"]);
        assert_eq!(ids(search_loads(&loads, "ECHO", None)), vec!["B-7"]);
        assert_eq!(ids(search_loads(&loads, "boling", None)), vec!["B-7"]);
        assert_eq!(ids(search_loads(&loads, "tx-1", None)), vec!["TX-100"]);
        assert_eq!(ids(search_loads(&loads, "", Some(LoadStatus::Pending))), vec!["B-7"]);
        assert!(search_loads(&loads, "amar", Some(LoadStatus::Pending)).is_empty());
    }

    #[test]
    fn test_load_rpm_and_rate_label() {
        let l = load("TQL", "2025-06-02", 400.0, 1000.0);
        assert_eq!(load_rpm(&l), Some(2.5));
        assert_eq!(load_rpm(&load("TQL", "2025-06-02", 0.0, 1000.0)), None);

        assert_eq!(rate_label(&PayProfile::new(EarningProfile::SoloPerMile, 0.55, 0.0)), "$0.55/mi");
        assert_eq!(rate_label(&PayProfile::new(EarningProfile::TeamPercentage, 0.0, 27.5)), "27.5%");
        assert_eq!(rate_label(&PayProfile::new(EarningProfile::OwnerOperator, 0.0, 0.0)), "100%");
        assert_eq!(rate_label(&PayProfile::new(EarningProfile::OwnerOperator, 0.0, 88.0)), "88%");
        assert_eq!(rate_label(&PayProfile::default()), "—");
    }

    #[test]
    fn test_group_loads_by_week() {
        let today = d(2025, 6, 18);
        let loads = vec![
            // Picked up Sunday, delivered Monday: counts in the later week.
            trip("A", "TQL", "2025-06-01", "2025-06-02", LoadStatus::Delivered),
            trip("B", "TQL", "2025-06-04", "", LoadStatus::Pending),
            trip("C", "Echo", "2025-05-28", "2025-05-29", LoadStatus::Delivered),
            trip("D", "Echo", "", "", LoadStatus::Pending),
        ];
        let groups = group_loads_by_week(&loads, None, today);
        let starts: Vec<NaiveDate> = groups.iter().map(|g| g.week_start).collect();
        assert_eq!(starts, vec![d(2025, 6, 16), d(2025, 6, 2), d(2025, 5, 26)]);

        assert_eq!(groups[0].loads[0].load_id, "D");
        let week = &groups[1];
        assert_eq!(week.week_end, d(2025, 6, 8));
        let ids: Vec<&str> = week.loads.iter().map(|l| l.load_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(week.miles, 200.0);
        assert_eq!(week.deadhead, 20.0);
        assert_eq!(week.earnings, 600.0);
        assert_eq!(week.label(), "Jun 2 – Jun 8, 2025");
    }

    #[test]
    fn test_week_label_across_years() {
        let group = group_loads_by_week(
            &[trip("Y", "TQL", "2024-12-30", "2024-12-31", LoadStatus::Delivered)],
            None,
            d(2025, 1, 5),
        );
        assert_eq!(group[0].label(), "Dec 30, 2024 – Jan 5, 2025");
    }

    #[test]
    fn test_recent_loads_sorted_by_delivery_then_pickup() {
        let loads = vec![
            trip("old", "TQL", "2025-06-01", "2025-06-02", LoadStatus::Delivered),
            trip("pending", "TQL", "2025-06-10", "", LoadStatus::Pending),
            trip("late", "TQL", "2025-06-03", "2025-06-12", LoadStatus::Delivered),
        ];
        let ids: Vec<String> = recent_loads(&loads, 2).into_iter().map(|l| l.load_id).collect();
        assert_eq!(ids, vec!["late", "pending"]);
    }

    #[test]
    fn test_expense_report_today() {
        let today = d(2025, 6, 18);
        let expenses = vec![
            expense(ExpenseCategory::Fuel, "2025-06-18", 80.0),
            expense(ExpenseCategory::Toll, "2025-06-17", 12.0),
        ];
        let report = get_expense_report(&expenses, None, Period::Today, today);
        assert_eq!(report.total, 80.0);
        assert_eq!(report.expenses.len(), 1);
    }
}
