pub mod logging;
pub mod records;
pub mod storage;
