pub mod data;

pub use data::history::ActivityHistory;
pub use data::neighbourhood::Neighbourhood;
