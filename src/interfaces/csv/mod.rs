pub mod command_reader;
pub mod customer_writer;
pub mod movie_reader;
