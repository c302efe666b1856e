//! Metro route and meeting-point server.
//!
//! A web service that answers two questions about a multi-line rail
//! network: "what is the fastest route between these two stations?" and
//! "where should several people starting at different stations meet to
//! minimize their combined travel time?"

pub mod cache;
pub mod domain;
pub mod engine;
pub mod graph;
pub mod meet;
pub mod web;
