use crate::application::command::{Command, CommandType};
use crate::domain::customer::{Customer, CustomerName, CustomerStatus, Email};
use crate::domain::movie::Movie;
use crate::domain::ports::{CustomerStoreBox, MovieStoreBox};
use crate::domain::pricing::{self, PromotionOutcome, Purchase};
use crate::domain::purchase::PurchasedMovie;
use crate::error::{Rejection, Result, TheaterError};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// The main entry point of the theater backend.
///
/// `TheaterService` owns the storage backends. Each operation loads the
/// snapshots it needs, checks the preconditions the pricing rules leave to
/// the caller, runs the rules and persists the resulting customer. Storage
/// operations are awaited one after another, so commands are applied in the
/// order they are submitted.
pub struct TheaterService {
    customer_store: CustomerStoreBox,
    movie_store: MovieStoreBox,
}

impl TheaterService {
    /// Creates a new `TheaterService` instance.
    ///
    /// # Arguments
    ///
    /// * `customer_store` - The store for customers and their purchases.
    /// * `movie_store` - The store for the movie catalog.
    pub fn new(customer_store: CustomerStoreBox, movie_store: MovieStoreBox) -> Self {
        Self {
            customer_store,
            movie_store,
        }
    }

    pub async fn add_movie(&self, movie: Movie) -> Result<()> {
        debug!(movie = movie.id, model = %movie.licensing_model, "catalog entry stored");
        self.movie_store.store(movie).await
    }

    pub async fn movie(&self, movie_id: u64) -> Result<Movie> {
        self.movie_store
            .get(movie_id)
            .await?
            .ok_or_else(|| Rejection::UnknownMovie(movie_id).into())
    }

    pub async fn movies(&self) -> Result<Vec<Movie>> {
        let mut movies = self.movie_store.all().await?;
        movies.sort_by_key(|m| m.id);
        Ok(movies)
    }

    pub async fn customer(&self, customer_id: u64) -> Result<Customer> {
        self.customer_store
            .get(customer_id)
            .await?
            .ok_or_else(|| Rejection::UnknownCustomer(customer_id).into())
    }

    /// All customers, ordered by id.
    pub async fn customers(&self) -> Result<Vec<Customer>> {
        let mut customers = self.customer_store.all().await?;
        customers.sort_by_key(|c| c.id);
        Ok(customers)
    }

    /// Registers a new `Regular` customer.
    pub async fn register_customer(&self, customer_id: u64, name: &str, email: &str) -> Result<Customer> {
        let name = CustomerName::new(name)?;
        let email = Email::new(email)?;

        if self.customer_store.get(customer_id).await?.is_some() {
            return Err(Rejection::CustomerExists(customer_id).into());
        }
        if self.customer_store.find_by_email(&email).await?.is_some() {
            return Err(Rejection::EmailInUse(email.to_string()).into());
        }

        let customer = Customer::new(customer_id, name, email);
        self.customer_store.store(customer.clone()).await?;
        info!(customer = customer_id, "customer registered");
        Ok(customer)
    }

    pub async fn rename_customer(&self, customer_id: u64, name: &str) -> Result<Customer> {
        let name = CustomerName::new(name)?;
        let mut customer = self.customer(customer_id).await?;
        customer.name = name;
        self.customer_store.store(customer.clone()).await?;
        info!(customer = customer_id, "customer renamed");
        Ok(customer)
    }

    /// Sells a license for `movie_id` to the customer at `now`.
    ///
    /// Rejected while the customer still holds an active license for the
    /// same movie; an expired one can be bought again.
    pub async fn purchase_movie(
        &self,
        customer_id: u64,
        movie_id: u64,
        now: DateTime<Utc>,
    ) -> Result<PurchasedMovie> {
        let movie = self.movie(movie_id).await?;
        let customer = self.customer(customer_id).await?;

        if customer.has_active_purchase(movie.id, now) {
            return Err(Rejection::AlreadyPurchased(movie.name).into());
        }

        let Purchase { record, customer } = pricing::purchase(&customer, &movie, now);
        self.customer_store.store(customer).await?;
        info!(
            customer = customer_id,
            movie = movie_id,
            price = %record.price,
            "movie purchased"
        );
        Ok(record)
    }

    /// Promotes the customer to `Advanced` if eligible at `now`.
    ///
    /// Returns the new status expiration.
    pub async fn promote_customer(&self, customer_id: u64, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let customer = self.customer(customer_id).await?;

        if customer.effective_status(now) == CustomerStatus::Advanced {
            return Err(Rejection::AlreadyAdvanced.into());
        }

        match pricing::promote(&customer, now) {
            PromotionOutcome::Promoted {
                status_expiration,
                customer,
            } => {
                self.customer_store.store(customer).await?;
                info!(customer = customer_id, until = %status_expiration, "customer promoted");
                Ok(status_expiration)
            }
            PromotionOutcome::Ineligible(reason) => Err(Rejection::CannotPromote(reason).into()),
        }
    }

    /// Applies one command from the batch interface.
    pub async fn process_command(&self, command: Command) -> Result<()> {
        let now = command.at.unwrap_or_else(Utc::now);

        match command.command {
            CommandType::Register => {
                let name = required(command.name.as_deref(), "name")?;
                let email = required(command.email.as_deref(), "email")?;
                self.register_customer(command.customer, name, email).await?;
            }
            CommandType::Rename => {
                let name = required(command.name.as_deref(), "name")?;
                self.rename_customer(command.customer, name).await?;
            }
            CommandType::Purchase => {
                let movie = command.movie.ok_or_else(|| missing("movie"))?;
                self.purchase_movie(command.customer, movie, now).await?;
            }
            CommandType::Promote => {
                self.promote_customer(command.customer, now).await?;
            }
        }
        Ok(())
    }

    /// Consumes the service and returns the final state of all customers.
    pub async fn into_results(self) -> Result<Vec<Customer>> {
        self.customers().await
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str> {
    value.ok_or_else(|| missing(field))
}

fn missing(field: &str) -> TheaterError {
    TheaterError::ValidationError(format!("Command is missing the {field} field"))
}
