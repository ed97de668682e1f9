// Job postings fetched from the remote job board.

pub mod board;
pub mod handlers;
pub mod models;
