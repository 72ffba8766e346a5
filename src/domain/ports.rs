use super::customer::{Customer, Email};
use super::movie::Movie;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn store(&self, customer: Customer) -> Result<()>;
    async fn get(&self, customer_id: u64) -> Result<Option<Customer>>;
    /// Matches addresses case-insensitively.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>>;
    async fn all(&self) -> Result<Vec<Customer>>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn store(&self, movie: Movie) -> Result<()>;
    async fn get(&self, movie_id: u64) -> Result<Option<Movie>>;
    async fn all(&self) -> Result<Vec<Movie>>;
}

pub type CustomerStoreBox = Box<dyn CustomerStore>;
pub type MovieStoreBox = Box<dyn MovieStore>;
