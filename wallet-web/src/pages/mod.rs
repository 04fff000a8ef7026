//! Page modules

pub mod employee;

pub use employee::EmployeePage;
