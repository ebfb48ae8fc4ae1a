pub mod check;
pub mod errors;
pub mod history;
pub mod prescreen;
pub mod recommend;
pub mod report;
pub mod support;
