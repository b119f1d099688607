#![allow(dead_code)]

pub mod console;
pub mod keyword_analyzer;

pub use console::{ConsoleListener, ConsoleSpeaker};
pub use keyword_analyzer::KeywordAnalyzer;
