//! Page modules

pub mod presale;

pub use presale::PresalePage;
