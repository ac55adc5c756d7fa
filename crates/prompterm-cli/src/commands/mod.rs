pub mod config;
pub mod estimate;
pub mod export;
pub mod run;
