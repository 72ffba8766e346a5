use crate::domain::customer::{Customer, Email};
use crate::domain::movie::Movie;
use crate::domain::ports::{CustomerStore, MovieStore};
use crate::error::{Result, TheaterError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing customers with their purchases.
pub const CF_CUSTOMERS: &str = "customers";
/// Column Family for storing the movie catalog.
pub const CF_MOVIES: &str = "movies";
/// Column Family indexing customer ids by lowercased email.
pub const CF_EMAILS: &str = "emails";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `Customer` and `Movie` entities using separate
/// Column Families. Keys are big-endian ids so iteration follows id order;
/// values are JSON. A third family maps emails to customer ids so email
/// lookups don't scan every customer.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("customers", "movies" and
    /// "emails") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_customers = ColumnFamilyDescriptor::new(CF_CUSTOMERS, Options::default());
        let cf_movies = ColumnFamilyDescriptor::new(CF_MOVIES, Options::default());
        let cf_emails = ColumnFamilyDescriptor::new(CF_EMAILS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_customers, cf_movies, cf_emails])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn put<T: Serialize>(&self, cf_name: &str, id: u64, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value).map_err(|e| internal(format!("Serialization error: {e}")))?;
        self.db.put_cf(cf, id.to_be_bytes(), bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, id: u64) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_pinned_cf(cf, id.to_be_bytes())? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            values.push(decode(&value)?);
        }
        Ok(values)
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("{name} column family not found")))
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| internal(format!("Deserialization error: {e}")))
}

fn internal(message: String) -> TheaterError {
    TheaterError::InternalError(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message,
    )))
}

#[async_trait]
impl CustomerStore for RocksDBStore {
    /// Writes the customer and its email index entry atomically.
    async fn store(&self, customer: Customer) -> Result<()> {
        let previous: Option<Customer> = self.fetch(CF_CUSTOMERS, customer.id)?;
        let cf_customers = self.cf(CF_CUSTOMERS)?;
        let cf_emails = self.cf(CF_EMAILS)?;
        let bytes = serde_json::to_vec(&customer)
            .map_err(|e| internal(format!("Serialization error: {e}")))?;

        let mut batch = WriteBatch::default();
        if let Some(previous) = previous
            && !previous.email.same_address(&customer.email)
        {
            batch.delete_cf(cf_emails, previous.email.key());
        }
        batch.put_cf(cf_emails, customer.email.key(), customer.id.to_be_bytes());
        batch.put_cf(cf_customers, customer.id.to_be_bytes(), bytes);
        self.db.write(batch)?;
        Ok(())
    }

    async fn get(&self, customer_id: u64) -> Result<Option<Customer>> {
        self.fetch(CF_CUSTOMERS, customer_id)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>> {
        let cf = self.cf(CF_EMAILS)?;
        let Some(id) = self.db.get_pinned_cf(cf, email.key())? else {
            return Ok(None);
        };
        let id: [u8; 8] = id
            .as_ref()
            .try_into()
            .map_err(|_| internal("Malformed email index entry".to_string()))?;
        self.fetch(CF_CUSTOMERS, u64::from_be_bytes(id))
    }

    async fn all(&self) -> Result<Vec<Customer>> {
        self.scan(CF_CUSTOMERS)
    }
}

#[async_trait]
impl MovieStore for RocksDBStore {
    async fn store(&self, movie: Movie) -> Result<()> {
        self.put(CF_MOVIES, movie.id, &movie)
    }

    async fn get(&self, movie_id: u64) -> Result<Option<Movie>> {
        self.fetch(CF_MOVIES, movie_id)
    }

    async fn all(&self) -> Result<Vec<Movie>> {
        self.scan(CF_MOVIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::CustomerName;
    use crate::domain::money::Dollars;
    use crate::domain::movie::LicensingModel;
    use crate::domain::purchase::PurchasedMovie;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        assert!(store.db.cf_handle(CF_CUSTOMERS).is_some());
        assert!(store.db.cf_handle(CF_MOVIES).is_some());
        assert!(store.db.cf_handle(CF_EMAILS).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_customer_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let mut customer = Customer::new(
            1,
            CustomerName::new("John Doe").unwrap(),
            Email::new("john@example.com").unwrap(),
        );
        customer.money_spent = Dollars::new(dec!(4.00));
        customer.purchases.push(PurchasedMovie {
            movie_id: 3,
            price: Dollars::new(dec!(4.00)),
            purchase_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            expiration_date: Some(Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap()),
        });

        CustomerStore::store(&store, customer.clone()).await.unwrap();

        let retrieved = CustomerStore::get(&store, 1).await.unwrap().unwrap();
        assert_eq!(retrieved, customer);

        let by_email = store.find_by_email(&customer.email).await.unwrap();
        assert_eq!(by_email, Some(customer.clone()));

        let all = CustomerStore::all(&store).await.unwrap();
        assert_eq!(all, vec![customer]);

        assert!(CustomerStore::get(&store, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_find_by_email_uses_index() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let john = Customer::new(
            1,
            CustomerName::new("John Doe").unwrap(),
            Email::new("John@Example.com").unwrap(),
        );
        CustomerStore::store(&store, john.clone()).await.unwrap();

        let lookup = Email::new("john@example.com").unwrap();
        assert_eq!(store.find_by_email(&lookup).await.unwrap(), Some(john.clone()));

        // Re-storing under a new address drops the old index entry.
        let mut moved = john;
        moved.email = Email::new("johnny@example.com").unwrap();
        CustomerStore::store(&store, moved.clone()).await.unwrap();

        assert!(store.find_by_email(&lookup).await.unwrap().is_none());
        assert_eq!(
            store.find_by_email(&moved.email).await.unwrap(),
            Some(moved)
        );
    }

    #[tokio::test]
    async fn test_rocksdb_email_index_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            let jane = Customer::new(
                2,
                CustomerName::new("Jane Roe").unwrap(),
                Email::new("jane@example.com").unwrap(),
            );
            CustomerStore::store(&store, jane).await.unwrap();
        }

        let store = RocksDBStore::open(dir.path()).unwrap();
        let found = store
            .find_by_email(&Email::new("JANE@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, 2);
    }

    #[tokio::test]
    async fn test_rocksdb_movie_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        let movie = Movie::new(7, "Heat", LicensingModel::LifeLong);
        MovieStore::store(&store, movie.clone()).await.unwrap();

        assert_eq!(MovieStore::get(&store, 7).await.unwrap(), Some(movie));
        assert!(MovieStore::get(&store, 8).await.unwrap().is_none());
    }
}
