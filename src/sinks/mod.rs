#[cfg(test)]
pub mod collecting;
pub mod console;
pub mod fanout;
pub mod log_file;
