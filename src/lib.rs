pub mod config;
pub mod db;
pub mod etl;
pub mod logging;
pub mod scrape;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_DB: &str = "db_query";
pub const TARGET_ETL: &str = "etl";
