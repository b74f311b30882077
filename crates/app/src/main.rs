mod agent_mode;

fn main() {
    // Headless agent mode is the only front end; `--agent` is accepted for
    // compatibility with scripts that pass it.
    for arg in std::env::args().skip(1) {
        if arg != "--agent" {
            eprintln!("aquanexus: ignoring unknown argument {arg:?}");
        }
    }
    agent_mode::run_agent_mode();
}
