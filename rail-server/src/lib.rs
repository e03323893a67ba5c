//! Rail booking server.
//!
//! Finds direct and one-change itineraries across a railway network, and
//! books seats on them without ever overselling a class.

pub mod booking;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod network;
pub mod planner;
pub mod web;
