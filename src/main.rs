fn main() {
    jobconf::app::cli::run();
}
