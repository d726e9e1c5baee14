use flotilla::shared::logging;

fn main() {
    if let Err(err) = flotilla::app::run() {
        logging::error_line(&err.to_string());
        std::process::exit(1);
    }
}
