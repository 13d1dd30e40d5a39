//! Regenerate expected.js / expected.err for the golden fixtures
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- basic   # Update only fixtures matching "basic"

use statusgen::{Error, Options, Pipeline};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let fixture_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&fixture_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().join("proto.d.ts").is_file())
    {
        let dir = entry.path();
        let name = entry.file_name().to_string_lossy();

        if let Some(ref f) = filter {
            if !name.contains(f.as_str()) {
                skipped += 1;
                continue;
            }
        }

        process_fixture(dir);
        updated += 1;
    }

    println!("Updated {} fixtures, skipped {}", updated, skipped);
}

fn fixture_options(dir: &Path) -> Result<Options, Error> {
    let config = dir.join("options.json");
    let options = if config.is_file() {
        Options::load(&config)?
    } else {
        Options::default()
    };
    Ok(Options {
        proto_dir: dir.join("services"),
        declarations: dir.join("proto.d.ts"),
        output: dir.join("StatusCodes"),
        ..options
    })
}

fn process_fixture(dir: &Path) {
    let expected_js = dir.join("expected.js");
    let expected_err = dir.join("expected.err");

    let result = fixture_options(dir).and_then(|options| Pipeline::new(options).run());

    let (write, stale, contents) = match result {
        Ok(generated) => (&expected_js, &expected_err, generated.code),
        Err(e) => (&expected_err, &expected_js, format!("{}\n", e)),
    };

    if let Err(e) = fs::write(write, &contents) {
        eprintln!("Failed to write {:?}: {}", write, e);
        return;
    }
    println!("  wrote {}", write.display());

    if stale.exists() {
        let _ = fs::remove_file(stale);
    }
}
