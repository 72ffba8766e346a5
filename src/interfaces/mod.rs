//! Batch interfaces: CSV in, CSV or JSON out.

pub mod csv;
