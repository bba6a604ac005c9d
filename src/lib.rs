// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod artifact;
pub mod check;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod init_sql;
pub mod literal;
pub mod ordering;
pub mod process;
pub mod report;
pub mod sanitizer;
pub mod scaffold;
pub mod seeder;
pub mod sync;
pub mod writer;
