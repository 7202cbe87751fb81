fn main() -> std::process::ExitCode {
    qrkit_app::run()
}
