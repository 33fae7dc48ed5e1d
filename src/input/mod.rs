//! Salsa 入力定義

pub mod catalog;
