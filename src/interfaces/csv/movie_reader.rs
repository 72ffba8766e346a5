use crate::domain::movie::Movie;
use crate::error::{Result, TheaterError};
use std::io::Read;

/// Reads the movie catalog from a CSV source with the columns
/// `id, name, licensing_model`.
pub struct MovieReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> MovieReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn movies(self) -> impl Iterator<Item = Result<Movie>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(TheaterError::from))
    }
}
