use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::movie::Movie;
use crate::domain::purchase::PurchasedMovie;
use crate::error::{Result, TheaterError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

const CSV_HEADER: [&str; 7] = [
    "id",
    "name",
    "email",
    "status",
    "status_expiration",
    "money_spent",
    "purchases",
];

/// Flat row written for each customer in CSV output.
#[derive(Debug, Serialize)]
struct CustomerRow<'a> {
    id: u64,
    name: &'a str,
    email: &'a str,
    status: CustomerStatus,
    status_expiration: Option<String>,
    money_spent: String,
    purchases: usize,
}

#[derive(Debug, Serialize)]
struct CustomerDocument<'a> {
    id: u64,
    name: &'a str,
    email: &'a str,
    status: CustomerStatus,
    status_expiration: Option<String>,
    money_spent: String,
    purchases: Vec<PurchaseDocument<'a>>,
}

/// A purchase as shown to the customer. `name` is null when the movie is
/// not in the catalog this writer was given.
#[derive(Debug, Serialize)]
struct PurchaseDocument<'a> {
    movie_id: u64,
    name: Option<&'a str>,
    price: String,
    purchase_date: String,
    expiration_date: Option<String>,
}

impl<'a> PurchaseDocument<'a> {
    fn new(purchase: &PurchasedMovie, titles: &'a HashMap<u64, String>) -> Self {
        Self {
            movie_id: purchase.movie_id,
            name: titles.get(&purchase.movie_id).map(String::as_str),
            price: purchase.price.to_string(),
            purchase_date: timestamp(purchase.purchase_date),
            expiration_date: purchase.expiration_date.map(timestamp),
        }
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Writes the final customer table.
///
/// The status column holds the effective status as of `as_of`, so a lapsed
/// `Advanced` customer is reported as `Regular`.
pub struct CustomerWriter<W: Write> {
    output: W,
    as_of: DateTime<Utc>,
    titles: HashMap<u64, String>,
}

impl<W: Write> CustomerWriter<W> {
    pub fn new(output: W, as_of: DateTime<Utc>) -> Self {
        Self {
            output,
            as_of,
            titles: HashMap::new(),
        }
    }

    /// Catalog used to name purchased movies in JSON output.
    pub fn with_movies(mut self, movies: &[Movie]) -> Self {
        self.titles = movies
            .iter()
            .map(|movie| (movie.id, movie.name.clone()))
            .collect();
        self
    }

    pub fn write_csv(self, customers: &[Customer]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(self.output);
        if customers.is_empty() {
            writer.write_record(CSV_HEADER)?;
        }
        for customer in customers {
            writer.serialize(CustomerRow {
                id: customer.id,
                name: customer.name.as_str(),
                email: customer.email.as_str(),
                status: customer.effective_status(self.as_of),
                status_expiration: customer.status_expiration.map(timestamp),
                money_spent: customer.money_spent.to_string(),
                purchases: customer.purchases.len(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_json(mut self, customers: &[Customer]) -> Result<()> {
        let documents: Vec<CustomerDocument> = customers
            .iter()
            .map(|customer| CustomerDocument {
                id: customer.id,
                name: customer.name.as_str(),
                email: customer.email.as_str(),
                status: customer.effective_status(self.as_of),
                status_expiration: customer.status_expiration.map(timestamp),
                money_spent: customer.money_spent.to_string(),
                purchases: customer
                    .purchases
                    .iter()
                    .map(|purchase| PurchaseDocument::new(purchase, &self.titles))
                    .collect(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut self.output, &documents)
            .map_err(|e| TheaterError::InternalError(Box::new(e)))?;
        writeln!(self.output)?;
        Ok(())
    }
}
