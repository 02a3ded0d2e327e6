//! Transport layer: the one-shot command line

pub mod cli;
