//! Stamps the struct-map version with the current commit and renders the
//! shell completions and man page from the clap definition into `OUT_DIR`.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate_to, Shell};

// Same definition the binary parses with.
include!("src/cli/definition.rs");

const BIN_NAME: &str = "struct-map";

fn git(args: &[&str]) -> Option<std::process::Output> {
    Command::new("git").args(args).output().ok()
}

/// Short commit hash, suffixed with `-dirty` for uncommitted changes.
fn commit_id() -> Option<String> {
    let head = git(&["rev-parse", "--short", "HEAD"]).filter(|o| o.status.success())?;
    let hash = String::from_utf8(head.stdout).ok()?;
    let dirty = git(&["diff", "--quiet", "HEAD"])
        .map(|o| !o.status.success())
        .unwrap_or(false);
    Some(format!("{}{}", hash.trim(), if dirty { "-dirty" } else { "" }))
}

fn write_completions(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut cmd = Cli::command();
    for shell in Shell::value_variants() {
        generate_to(*shell, &mut cmd, BIN_NAME, dir)?;
    }
    Ok(())
}

fn write_man_page(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut page = Vec::new();
    clap_mangen::Man::new(Cli::command()).render(&mut page)?;
    fs::write(dir.join(format!("{}.1", BIN_NAME)), page)
}

fn main() {
    let commit = commit_id().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_HASH={}", commit);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-changed=src/cli/definition.rs");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return;
    };

    if let Err(e) = write_completions(&out_dir.join("completions")) {
        panic!("cannot write {} completions: {}", BIN_NAME, e);
    }
    if let Err(e) = write_man_page(&out_dir.join("man")) {
        panic!("cannot write {} man page: {}", BIN_NAME, e);
    }
}
