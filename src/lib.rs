//! Focused News - a keyword-focused RSS news page
//!
//! This crate fetches a fixed list of feeds, sorts their entries into
//! highlighted, regional and remaining sections, and serves the result as a
//! single web page with a manual refresh control.

pub mod classify;
pub mod config;
pub mod fetcher;
pub mod routes;
