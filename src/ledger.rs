use crate::errors::AppError;
use crate::mirror::Mirror;
use crate::models::{
    AmountInput, Category, ExpenseSummaryResponse, Transaction, TransactionInput, TransactionKind,
    TransactionPatch,
};
use crate::stats::{self, MonthKey};
use crate::storage::{JsonStore, TRANSACTIONS_KEY};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug)]
pub enum LedgerCommand {
    Add(TransactionInput),
    Update { id: String, patch: TransactionPatch },
    Remove { id: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerOutcome {
    Added { transaction: Transaction },
    Updated { transaction: Transaction },
    Removed { transaction: Transaction },
}

#[derive(Debug)]
pub struct Ledger {
    transactions: Mirror<Transaction>,
}

impl Ledger {
    pub async fn load(store: &JsonStore) -> Self {
        let transactions = Mirror::load(store.clone(), TRANSACTIONS_KEY, Vec::new).await;
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.items()
    }

    pub fn history(&self) -> Vec<Transaction> {
        stats::history(self.transactions())
    }

    pub fn summary(&self, month: MonthKey) -> ExpenseSummaryResponse {
        stats::build_expense_summary(self.transactions(), month)
    }

    pub fn months(&self, today: NaiveDate) -> Vec<String> {
        stats::available_months(self.transactions(), today)
    }

    pub async fn apply(&mut self, command: LedgerCommand) -> Result<LedgerOutcome, AppError> {
        match command {
            LedgerCommand::Add(input) => self.add(input).await,
            LedgerCommand::Update { id, patch } => self.update(&id, patch).await,
            LedgerCommand::Remove { id } => self.remove(&id).await,
        }
    }

    async fn add(&mut self, input: TransactionInput) -> Result<LedgerOutcome, AppError> {
        let transaction = validated(Draft {
            id: Uuid::new_v4().simple().to_string(),
            kind: input.kind,
            amount: parse_amount(&input.amount)?,
            description: input.description,
            category: input.category.unwrap_or_else(|| input.kind.default_category()),
            date: input.date.unwrap_or_else(|| Local::now().date_naive()),
        })?;

        self.transactions.add(transaction.clone()).await?;
        info!(
            id = %transaction.id,
            kind = transaction.kind.label(),
            amount = transaction.amount,
            "transaction added"
        );
        Ok(LedgerOutcome::Added { transaction })
    }

    async fn update(&mut self, id: &str, patch: TransactionPatch) -> Result<LedgerOutcome, AppError> {
        let current = self
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("no transaction with id '{id}'")))?;

        let amount = match &patch.amount {
            Some(amount) => parse_amount(amount)?,
            None => current.amount,
        };
        let transaction = validated(Draft {
            id: current.id,
            kind: patch.kind.unwrap_or(current.kind),
            amount,
            description: patch.description.unwrap_or(current.description),
            category: patch.category.unwrap_or(current.category),
            date: patch.date.unwrap_or(current.date),
        })?;

        let next = transaction.clone();
        self.transactions.update(id, move |_| next).await?;
        info!(id, "transaction updated");
        Ok(LedgerOutcome::Updated { transaction })
    }

    async fn remove(&mut self, id: &str) -> Result<LedgerOutcome, AppError> {
        let transaction = self
            .transactions
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("no transaction with id '{id}'")))?;

        self.transactions.remove(id).await?;
        info!(id, "transaction removed");
        Ok(LedgerOutcome::Removed { transaction })
    }
}

struct Draft {
    id: String,
    kind: TransactionKind,
    amount: f64,
    description: String,
    category: Category,
    date: NaiveDate,
}

fn validated(draft: Draft) -> Result<Transaction, AppError> {
    if !(draft.amount.is_finite() && draft.amount > 0.0) {
        return Err(AppError::bad_request("Enter a valid amount"));
    }
    let description = draft.description.trim();
    if description.is_empty() {
        return Err(AppError::bad_request("Enter a description"));
    }
    if !draft.category.belongs_to(draft.kind) {
        return Err(AppError::bad_request(
            "Category does not match transaction type",
        ));
    }
    Ok(Transaction {
        id: draft.id,
        kind: draft.kind,
        amount: draft.amount,
        description: description.to_string(),
        category: draft.category,
        date: draft.date,
    })
}

fn parse_amount(input: &AmountInput) -> Result<f64, AppError> {
    let amount = match input {
        AmountInput::Number(value) => Some(*value),
        AmountInput::Text(text) => text.trim().parse::<f64>().ok(),
    };
    match amount {
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(AppError::bad_request("Enter a valid amount")),
    }
}
