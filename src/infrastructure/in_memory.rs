use crate::domain::customer::{Customer, Email};
use crate::domain::movie::Movie;
use crate::domain::ports::{CustomerStore, MovieStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Customers keyed by id, held for the lifetime of one batch run.
///
/// Email lookups scan every customer; fine for a single run's population.
#[derive(Default, Clone)]
pub struct InMemoryCustomerStore {
    customers: Arc<RwLock<HashMap<u64, Customer>>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn store(&self, customer: Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id, customer);
        Ok(())
    }

    async fn get(&self, customer_id: u64) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&customer_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|c| c.email.same_address(email)).cloned())
    }

    async fn all(&self) -> Result<Vec<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.values().cloned().collect())
    }
}

/// Movie catalog loaded from `--catalog`, keyed by movie id.
#[derive(Default, Clone)]
pub struct InMemoryMovieStore {
    movies: Arc<RwLock<HashMap<u64, Movie>>>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn store(&self, movie: Movie) -> Result<()> {
        let mut movies = self.movies.write().await;
        movies.insert(movie.id, movie);
        Ok(())
    }

    async fn get(&self, movie_id: u64) -> Result<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.get(&movie_id).cloned())
    }

    async fn all(&self) -> Result<Vec<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.values().cloned().collect())
    }
}
