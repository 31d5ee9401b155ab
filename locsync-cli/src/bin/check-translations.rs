use locsync_cli::{EntryPoint, run_entry_point};

fn main() {
    std::process::exit(run_entry_point(EntryPoint::Check));
}
