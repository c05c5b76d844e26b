//! httpbrute brute-forces HTTP paths on a single target.
//!
//! Candidate URLs are built from a wordlist and a set of suffixes, pushed
//! through a dispatch channel and drained by a fixed pool of workers. Each
//! worker probes one URL at a time, retrying transport failures at a fixed
//! interval until a response arrives or shutdown is requested.

pub mod args;
pub mod buster;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod parser;
pub mod pool;
