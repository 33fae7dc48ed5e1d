//! nbr-5410-calculator
//!
//! NBR 5410 に基づく低圧回路の計算と、Qt Linguist 形式（`.ts`）の翻訳カタログの管理

pub mod cli;
pub mod config;
pub mod db;
pub mod i18n;
pub mod indexer;
pub mod input;
pub mod installation;
pub mod ir;
pub mod report;
pub mod syntax;
pub mod types;
