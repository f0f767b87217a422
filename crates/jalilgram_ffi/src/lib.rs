//! Flutter bridge surface of the JalilGram core.

pub mod api;
