use std::fs;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::Shell;

#[path = "src/cli.rs"]
mod cli;

/// Writes `$OUT_DIR/man/*.1` and `$OUT_DIR/completions/*` for packaging.
fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let Some(out_dir) = std::env::var_os("OUT_DIR") else {
        panic!("OUT_DIR is only unset outside of cargo");
    };
    let out_dir = Path::new(&out_dir);

    let mut cmd = cli::Cli::command();

    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap_or_else(|e| panic!("create {}: {e}", man_dir.display()));
    write_man_pages(&cmd, &man_dir);

    let completion_dir = out_dir.join("completions");
    fs::create_dir_all(&completion_dir)
        .unwrap_or_else(|e| panic!("create {}: {e}", completion_dir.display()));
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        clap_complete::generate_to(shell, &mut cmd, "fleetwatch", &completion_dir)
            .unwrap_or_else(|e| panic!("{shell} completions: {e}"));
    }
}

/// `fleetwatch.1`, `fleetwatch-vehicles.1`, `fleetwatch-vehicles-list.1`, ...
fn write_man_pages(cmd: &clap::Command, dir: &Path) {
    let page = cmd.get_name().to_owned();
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.clone())
        .render(&mut buf)
        .unwrap_or_else(|e| panic!("render {page}.1: {e}"));

    let path = dir.join(format!("{page}.1"));
    fs::write(&path, buf).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));

    for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
        let named = sub.clone().name(format!("{page}-{}", sub.get_name()));
        write_man_pages(&named, dir);
    }
}
