use crate::application::command::Command;
use crate::error::{Result, TheaterError};
use std::io::Read;

/// Reads customer commands from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Command>`.
/// It trims whitespace and accepts rows that omit trailing optional columns.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes commands, so a
    /// malformed row fails on its own without stopping the stream.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(TheaterError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::command::CommandType;

    #[test]
    fn test_reader_valid_stream() {
        let data = "command, customer, movie, name, email, at\n\
                    register, 1, , John Doe, john@example.com,\n\
                    purchase, 1, 2, , ,\n\
                    promote, 1, , , ,";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert_eq!(results.len(), 3);
        let register = results[0].as_ref().unwrap();
        assert_eq!(register.command, CommandType::Register);
        assert_eq!(register.email.as_deref(), Some("john@example.com"));
        assert_eq!(results[1].as_ref().unwrap().movie, Some(2));
        assert_eq!(results[2].as_ref().unwrap().command, CommandType::Promote);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "command, customer, movie\nrefund, 1, 1\npurchase, abc, 1\npurchase, 1, 1";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_reader_rejects_bad_timestamp() {
        let data = "command, customer, movie, name, email, at\npromote, 1, , , , yesterday";
        let reader = CommandReader::new(data.as_bytes());
        let results: Vec<Result<Command>> = reader.commands().collect();

        assert!(matches!(results[0], Err(TheaterError::CsvError(_))));
    }
}
