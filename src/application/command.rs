use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Register,
    Rename,
    Purchase,
    Promote,
}

/// One row of the command stream.
///
/// Which optional fields are required depends on `command`: `register`
/// needs `name` and `email`, `rename` needs `name`, `purchase` needs
/// `movie`. `at` pins the instant the command happens; without it the
/// current time is used.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
pub struct Command {
    pub command: CommandType,
    pub customer: u64,
    pub movie: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub at: Option<DateTime<Utc>>,
}

impl Command {
    pub fn register(customer: u64, name: &str, email: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            ..Self::bare(CommandType::Register, customer)
        }
    }

    pub fn rename(customer: u64, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::bare(CommandType::Rename, customer)
        }
    }

    pub fn purchase(customer: u64, movie: u64) -> Self {
        Self {
            movie: Some(movie),
            ..Self::bare(CommandType::Purchase, customer)
        }
    }

    pub fn promote(customer: u64) -> Self {
        Self::bare(CommandType::Promote, customer)
    }

    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }

    fn bare(command: CommandType, customer: u64) -> Self {
        Self {
            command,
            customer,
            movie: None,
            name: None,
            email: None,
            at: None,
        }
    }
}
