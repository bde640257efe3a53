use crate::mirror::Keyed;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- attendance ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_no: String,
}

impl Keyed for Student {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    /// Student id to status.
    pub statuses: BTreeMap<String, AttendanceStatus>,
}

impl Keyed for AttendanceRecord {
    type Key = NaiveDate;

    fn key(&self) -> &NaiveDate {
        &self.date
    }
}

pub fn default_students() -> Vec<Student> {
    [
        ("s1", "Aarav Sharma", "CS-001"),
        ("s2", "Priya Patel", "CS-002"),
        ("s3", "Rohan Gupta", "CS-003"),
        ("s4", "Ananya Singh", "CS-004"),
        ("s5", "Vikram Reddy", "CS-005"),
        ("s6", "Neha Verma", "CS-006"),
        ("s7", "Arjun Kumar", "CS-007"),
        ("s8", "Kavya Nair", "CS-008"),
        ("s9", "Ishaan Joshi", "CS-009"),
        ("s10", "Diya Mehta", "CS-010"),
    ]
    .into_iter()
    .map(|(id, name, roll_no)| Student {
        id: id.to_string(),
        name: name.to_string(),
        roll_no: roll_no.to_string(),
    })
    .collect()
}

#[derive(Debug, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub roll_no: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub roll_no: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveDayRequest {
    pub marks: BTreeMap<String, AttendanceStatus>,
}

#[derive(Debug, Deserialize)]
pub struct MarksQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarksResponse {
    pub date: NaiveDate,
    pub saved: bool,
    pub present_count: usize,
    pub absent_count: usize,
    pub marks: BTreeMap<String, AttendanceStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Good,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    pub avg_pct: f64,
    pub band: Band,
    pub total_classes: usize,
    pub student_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedStudent {
    pub student: Student,
    pub stats: StudentStats,
    pub band: Band,
    pub below_minimum: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub overall: OverallStats,
    pub students: Vec<RankedStudent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
    pub statuses: BTreeMap<String, AttendanceStatus>,
}

// --- expenses ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    pub fn categories(self) -> &'static [Category] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    pub fn default_category(self) -> Category {
        self.categories()[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transport,
    Shopping,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    Entertainment,
    Health,
    Education,
    Salary,
    Freelance,
    Investment,
    Gift,
    Other,
}

pub const EXPENSE_CATEGORIES: [Category; 8] = [
    Category::FoodAndDining,
    Category::Transport,
    Category::Shopping,
    Category::BillsAndUtilities,
    Category::Entertainment,
    Category::Health,
    Category::Education,
    Category::Other,
];

pub const INCOME_CATEGORIES: [Category; 5] = [
    Category::Salary,
    Category::Freelance,
    Category::Investment,
    Category::Gift,
    Category::Other,
];

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::FoodAndDining => "Food & Dining",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::BillsAndUtilities => "Bills & Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investment => "Investment",
            Category::Gift => "Gift",
            Category::Other => "Other",
        }
    }

    pub fn belongs_to(self, kind: TransactionKind) -> bool {
        kind.categories().contains(&self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}

impl Keyed for Transaction {
    type Key = str;

    fn key(&self) -> &str {
        &self.id
    }
}

/// Amount as typed into a form or sent as a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInput {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: AmountInput,
    pub description: String,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionPatch {
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub amount: Option<AmountInput>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: f64,
    pub pct: f64,
}

#[derive(Debug, Serialize)]
pub struct ExpenseSummaryResponse {
    pub summary: MonthlySummary,
    pub breakdown: Vec<CategoryShare>,
    pub recent: Vec<Transaction>,
}

// --- counter ---

#[derive(Debug, Deserialize)]
pub struct CounterRequest {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CounterResponse {
    pub value: i64,
}

// --- calculators ---

#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Deserialize)]
pub struct ArithQuery {
    pub a: String,
    pub b: String,
    pub op: String,
}

#[derive(Debug, Deserialize)]
pub struct ParityQuery {
    pub n: String,
}

#[derive(Debug, Deserialize)]
pub struct VotingQuery {
    pub birth_year: i32,
}

#[derive(Debug, Deserialize)]
pub struct GradeQuery {
    pub m1: String,
    pub m2: String,
    pub m3: String,
}

#[derive(Debug, Deserialize)]
pub struct LibraryQuery {
    pub has_card: bool,
    pub is_student: bool,
}

#[derive(Debug, Serialize)]
pub struct CalcResponse<T: Serialize> {
    pub input: String,
    pub result: T,
}
