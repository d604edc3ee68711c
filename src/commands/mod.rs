pub mod config;
pub mod history;
pub mod inventories;
pub mod run;
pub mod saved;
pub mod sync;
