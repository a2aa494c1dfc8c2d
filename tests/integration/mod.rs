#![allow(clippy::unwrap_used, clippy::expect_used)]

mod tests_analysis;
mod tests_library;
mod tests_lifecycle;
mod tests_palette;
mod tests_round_trip;
