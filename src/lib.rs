pub mod brawlstars;
pub mod report;
pub mod settings;
