pub mod financial;
pub mod records;
pub mod territory;
pub mod transactions;
