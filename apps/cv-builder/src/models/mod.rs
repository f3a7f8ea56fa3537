pub mod cv;

pub use cv::{DateRange, Responsibility};
