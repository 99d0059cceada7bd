use std::{env, fs, path::Path, process};

use teropong::{render::text::render_text, storage::scanner, storage::validator};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: teropong <database_file.db> [output_file.txt]");
        process::exit(1);
    }

    let db_path = &args[1];
    if !Path::new(db_path).exists() {
        eprintln!("Error: database file '{}' not found", db_path);
        process::exit(1);
    }

    let outcome = match scanner::scan_file(db_path) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(1);
        }
    };

    // A file without a readable meta page is unreadable input, which is not
    // the same thing as a readable file holding an empty tree.
    if outcome.root.is_none() {
        eprintln!("Error: '{}' has no readable meta page", db_path);
        process::exit(1);
    }

    for finding in validator::validate(&outcome) {
        eprintln!("Warning: {}", finding);
    }

    let rendered = render_text(&outcome);
    match args.get(2) {
        Some(output_path) => {
            if let Err(err) = fs::write(output_path, &rendered) {
                eprintln!("Error: cannot write '{}': {}", output_path, err);
                process::exit(1);
            }
            println!("Tree visualization written to: {}", output_path);
        }
        None => print!("{}", rendered),
    }
}
