//! pydisplay-render - Render display output to an HTML fragment.

fn main() -> std::process::ExitCode {
    pydisplay::cmd::render::main()
}
