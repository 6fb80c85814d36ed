use std::{env, fs, process};

use sectioned_diff::{OrderedCollection, changes_by_value};

/// Diffs two files line by line and prints the steps turning the first into
/// the second, then checks that applying them reproduces the second file.
///
/// Run it with:
/// `cargo run --example diff-lines old.txt new.txt`
fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: diff-lines <old> <new>");
        process::exit(1);
    }

    let old_file = &args[1];
    let new_file = &args[2];

    let old_content = fs::read_to_string(old_file).unwrap_or_else(|e| {
        eprintln!("Error reading {old_file}: {e}");
        process::exit(1);
    });

    let new_content = fs::read_to_string(new_file).unwrap_or_else(|e| {
        eprintln!("Error reading {new_file}: {e}");
        process::exit(1);
    });

    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    let steps = changes_by_value(&old_lines, &new_lines);
    for step in &steps {
        println!("{step}");
    }

    let mut built = old_lines.clone();
    if let Err(e) = built.apply_changes(steps) {
        eprintln!("Error applying changes: {e}");
        process::exit(1);
    }

    assert_eq!(built, new_lines, "Applying the changes must rebuild the new file");
}
