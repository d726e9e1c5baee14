//! Workflow log helpers. Lines are written to stdout in the runner's
//! command syntax so warnings and errors surface as annotations.

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn info(message: &str) {
    println!("{message}");
}

pub fn notice(message: &str) {
    println!("::notice::{}", escape_data(message));
}

pub fn warn(message: &str) {
    println!("::warning::{}", escape_data(message));
}

pub fn error_line(message: &str) {
    println!("::error::{}", escape_data(message));
}

pub fn group(name: &str) {
    println!("::group::{}", escape_data(name));
}

pub fn endgroup() {
    println!("::endgroup::");
}
