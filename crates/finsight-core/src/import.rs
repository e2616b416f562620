//! CSV import and export of transaction batches
//!
//! Format: `id,date,amount,merchant,category,description,user_id`. Columns are
//! located by header name, so order does not matter. Only `date`, `amount` and
//! `merchant` are required; a missing `id` falls back to the row number and a
//! missing `user_id` to 1.

use chrono::{NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{parse_iso_date, validate_amount, Transaction};

const HEADER: [&str; 7] = [
    "id",
    "date",
    "amount",
    "merchant",
    "category",
    "description",
    "user_id",
];

const DEFAULT_USER_ID: i64 = 1;

/// Column positions resolved from the header row
struct Columns {
    id: Option<usize>,
    date: usize,
    amount: usize,
    merchant: usize,
    category: Option<usize>,
    description: Option<usize>,
    user_id: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Import(format!("Missing column: {}", name)))
        };

        Ok(Self {
            id: find("id"),
            date: require("date")?,
            amount: require("amount")?,
            merchant: require("merchant")?,
            category: find("category"),
            description: find("description"),
            user_id: find("user_id"),
        })
    }
}

/// Parse a transaction batch from CSV
///
/// Every row must carry a valid date and a finite, non-negative amount; the
/// first bad row fails the whole import.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

        let id = match field(columns.id) {
            "" => index as i64 + 1,
            s => parse_int(s, "id")?,
        };

        let date = parse_timestamp(field(Some(columns.date)))?;

        let amount = parse_amount(field(Some(columns.amount)))?;
        validate_amount(index, amount)?;

        let merchant = field(Some(columns.merchant)).to_string();
        if merchant.is_empty() {
            return Err(Error::Import(format!("Missing merchant on row {}", index + 1)));
        }

        let category = Some(field(columns.category))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let user_id = match field(columns.user_id) {
            "" => DEFAULT_USER_ID,
            s => parse_int(s, "user_id")?,
        };

        transactions.push(Transaction {
            id,
            amount,
            merchant,
            category,
            date,
            description: field(columns.description).to_string(),
            user_id,
        });
    }

    debug!(count = transactions.len(), "Parsed transactions from CSV");
    Ok(transactions)
}

/// Write a batch as CSV in the import format
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for tx in transactions {
        wtr.write_record([
            tx.id.to_string(),
            tx.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx.amount.to_string(),
            tx.merchant.clone(),
            tx.category.clone().unwrap_or_default(),
            tx.description.clone(),
            tx.user_id.to_string(),
        ])?;
    }

    wtr.flush()?;
    debug!(count = transactions.len(), "Wrote transactions to CSV");
    Ok(())
}

/// Parse `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD` at midnight
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    Ok(parse_iso_date(s)?.and_time(NaiveTime::MIN))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned = s.trim().replace(['$', ',', ' '], "");
    cleaned
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}

fn parse_int(s: &str, column: &str) -> Result<i64> {
    s.parse::<i64>()
        .map_err(|_| Error::Import(format!("Unable to parse {}: {}", column, s)))
}
