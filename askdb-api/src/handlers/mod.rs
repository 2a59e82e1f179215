pub mod ask;
pub mod database;
pub mod execute;
pub mod logs;
pub mod schema;
