pub mod fotmob_fetch;
pub mod provider;
pub mod state;
pub mod store;
pub mod upstream;
