use crate::models::{
    AnalyticsResponse, AttendanceRecord, AttendanceStatus, Band, CategoryShare, DaySummary,
    ExpenseSummaryResponse, MonthlySummary, OverallStats, RankedStudent, Student, StudentStats,
    Transaction, TransactionKind,
};
use chrono::{Datelike, Local, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

pub const GOOD_THRESHOLD: f64 = 75.0;
pub const WARNING_THRESHOLD: f64 = 50.0;

const RECENT_LIMIT: usize = 5;

impl Band {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= GOOD_THRESHOLD {
            Band::Good
        } else if pct >= WARNING_THRESHOLD {
            Band::Warning
        } else {
            Band::Critical
        }
    }
}

pub fn student_stats(records: &[AttendanceRecord], student_id: &str) -> StudentStats {
    let mut total = 0usize;
    let mut present = 0usize;
    for status in records.iter().filter_map(|r| r.statuses.get(student_id)) {
        total += 1;
        if *status == AttendanceStatus::Present {
            present += 1;
        }
    }

    let pct = if total == 0 {
        0.0
    } else {
        present as f64 / total as f64 * 100.0
    };

    StudentStats {
        total,
        present,
        absent: total - present,
        pct,
    }
}

/// Unweighted mean of per-student ratios.
pub fn overall_stats(students: &[Student], records: &[AttendanceRecord]) -> OverallStats {
    let avg_pct = if students.is_empty() || records.is_empty() {
        0.0
    } else {
        let sum: f64 = students
            .iter()
            .map(|s| student_stats(records, &s.id).pct)
            .sum();
        sum / students.len() as f64
    };

    OverallStats {
        avg_pct,
        band: Band::from_pct(avg_pct),
        total_classes: records.len(),
        student_count: students.len(),
    }
}

pub fn ranked_students(students: &[Student], records: &[AttendanceRecord]) -> Vec<RankedStudent> {
    let mut ranked: Vec<RankedStudent> = students
        .iter()
        .map(|student| {
            let stats = student_stats(records, &student.id);
            RankedStudent {
                band: Band::from_pct(stats.pct),
                below_minimum: stats.total > 0 && stats.pct < GOOD_THRESHOLD,
                student: student.clone(),
                stats,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.stats.pct.total_cmp(&a.stats.pct));
    ranked
}

pub fn build_analytics(students: &[Student], records: &[AttendanceRecord]) -> AnalyticsResponse {
    AnalyticsResponse {
        overall: overall_stats(students, records),
        students: ranked_students(students, records),
    }
}

/// Most recent date first.
pub fn day_summaries(records: &[AttendanceRecord]) -> Vec<DaySummary> {
    let mut days: Vec<DaySummary> = records
        .iter()
        .map(|record| {
            let present = record
                .statuses
                .values()
                .filter(|s| **s == AttendanceStatus::Present)
                .count();
            DaySummary {
                date: record.date,
                present,
                absent: record.statuses.len() - present,
                statuses: record.statuses.clone(),
            }
        })
        .collect();
    days.sort_by(|a, b| b.date.cmp(&a.date));
    days
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMonth(pub String);

impl fmt::Display for InvalidMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month must look like YYYY-MM, got '{}'", self.0)
    }
}

impl std::error::Error for InvalidMonth {}

impl FromStr for MonthKey {
    type Err = InvalidMonth;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonth(value.to_string());
        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

fn in_month<'a>(
    txns: &'a [Transaction],
    month: MonthKey,
) -> impl Iterator<Item = &'a Transaction> + 'a {
    txns.iter().filter(move |t| month.contains(t.date))
}

fn total_of(txns: &[Transaction], month: MonthKey, kind: TransactionKind) -> f64 {
    in_month(txns, month)
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn monthly_summary(txns: &[Transaction], month: MonthKey) -> MonthlySummary {
    let income = total_of(txns, month, TransactionKind::Income);
    let expense = total_of(txns, month, TransactionKind::Expense);
    MonthlySummary {
        month: month.to_string(),
        income,
        expense,
        balance: income - expense,
    }
}

/// Per-category expense totals for `month`, largest first. Empty when the
/// month has no expenses.
pub fn category_breakdown(txns: &[Transaction], month: MonthKey) -> Vec<CategoryShare> {
    let total = total_of(txns, month, TransactionKind::Expense);
    if total <= 0.0 {
        return Vec::new();
    }

    let mut sums = BTreeMap::new();
    for txn in in_month(txns, month).filter(|t| t.kind == TransactionKind::Expense) {
        *sums.entry(txn.category).or_insert(0.0) += txn.amount;
    }

    let mut shares: Vec<CategoryShare> = sums
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            amount,
            pct: amount / total * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    shares
}

/// Every month with a transaction plus `today`'s month, most recent first.
pub fn available_months(txns: &[Transaction], today: NaiveDate) -> Vec<String> {
    let mut months: BTreeSet<MonthKey> = txns.iter().map(|t| MonthKey::from_date(t.date)).collect();
    months.insert(MonthKey::from_date(today));
    months.into_iter().rev().map(|m| m.to_string()).collect()
}

/// Most recent date first, larger amounts first within a day.
pub fn history(txns: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = txns.to_vec();
    sorted.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.amount.total_cmp(&a.amount))
    });
    sorted
}

pub fn recent(txns: &[Transaction], month: MonthKey, limit: usize) -> Vec<Transaction> {
    history(txns)
        .into_iter()
        .filter(|t| month.contains(t.date))
        .take(limit)
        .collect()
}

pub fn build_expense_summary(txns: &[Transaction], month: MonthKey) -> ExpenseSummaryResponse {
    ExpenseSummaryResponse {
        summary: monthly_summary(txns, month),
        breakdown: category_breakdown(txns, month),
        recent: recent(txns, month, RECENT_LIMIT),
    }
}
