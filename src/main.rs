//! fdash binary entry point.

fn main() {
    if let Err(err) = feature_dashboard::cli::run() {
        feature_dashboard::ui::output::error(format!("{err:#}"));
        std::process::exit(1);
    }
}
