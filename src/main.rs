//! Interactive shell for the definite-clause engine.
//!
//! Reads commands line by line behind a `kb>` prompt: load a rule file, tell
//! facts, saturate with `infer_all`, and inspect the knowledge base. All
//! inference happens in the library; this binary only parses commands and
//! formats output.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use proplog::{Atom, KnowledgeBase, Rule};

fn main() -> Result<()> {
    env_logger::init();

    let mut kb = KnowledgeBase::new();
    let stdin = io::stdin();

    prompt()?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if !dispatch(&mut kb, line.trim()) {
            return Ok(());
        }
        prompt()?;
    }

    // EOF quits like the quit command does.
    println!("Quitting.");
    Ok(())
}

fn prompt() -> Result<()> {
    print!("kb> ");
    io::stdout().flush().context("failed to write prompt")
}

/// Run one command line. Returns false when the session should end.
fn dispatch(kb: &mut KnowledgeBase, line: &str) -> bool {
    let mut words = line.splitn(2, char::is_whitespace);
    let Some(command) = words.next().filter(|word| !word.is_empty()) else {
        return true;
    };
    let args = words.next().unwrap_or("").trim();

    match command {
        "quit" => {
            println!("Quitting.");
            return false;
        }
        "load" => load(kb, args),
        "tell" => tell(kb, args),
        "infer_all" => infer_all(kb),
        "clear_atoms" => kb.clear_atoms(),
        "show_atoms" => show_numbered(kb.atoms()),
        "show_rules" => show_numbered(kb.rules()),
        "is_true" => is_true(kb, args),
        "help" => help(),
        _ => println!("Error: unknown command {command:?}"),
    }
    true
}

/// Load a rule file, replacing the current rule set wholesale.
///
/// Blank lines and lines starting with `#` are skipped. The first malformed
/// line aborts the load and leaves the current rules unmodified.
fn load(kb: &mut KnowledgeBase, args: &str) {
    if args.is_empty() {
        println!("Syntax: load <filepath>");
        return;
    }

    let path = Path::new(args);
    if !path.exists() {
        println!("File does not exist");
        return;
    }
    if !path.is_file() {
        println!("{} is not a file", path.display());
        return;
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("Failed to read file: {err}");
            return;
        }
    };

    let mut rules = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match Rule::parse(line) {
            Ok(rule) => rules.push(rule),
            Err(err) => {
                println!("Error at line {i}: {line:?}");
                println!("{err}");
                println!("Error: {} is not a valid knowledge base", path.display());
                return;
            }
        }
    }

    log::debug!("loaded {} rules from {}", rules.len(), path.display());
    println!("{} definite clauses read in:", rules.len());
    kb.set_rules(rules);
    show_numbered(kb.rules());
}

/// Add one or more atoms as facts. A single invalid atom aborts the whole
/// request before anything is added.
fn tell(kb: &mut KnowledgeBase, args: &str) {
    if args.is_empty() {
        println!("Error: tell needs at least one atom");
        return;
    }

    match args.split_whitespace().map(Atom::new).collect::<Result<Vec<_>, _>>() {
        Ok(atoms) => {
            for atom in atoms {
                if kb.tell(atom.clone()) {
                    println!("Atom {atom:?} added to KB");
                } else {
                    println!("Atom {atom:?} already known to be true");
                }
            }
        }
        Err(err) => println!("{err}"),
    }
}

fn infer_all(kb: &mut KnowledgeBase) {
    let known: Vec<Atom> = kb.atoms().iter().cloned().collect();
    let new_atoms = kb.infer_all();

    println!("Newly inferred atoms:\n\t{}", atoms_to_str(&new_atoms));
    println!("Already known atoms:\n\t{}", atoms_to_str(&known));
}

/// Report whether all of the given atoms are known to be true.
fn is_true(kb: &KnowledgeBase, args: &str) {
    if args.is_empty() {
        println!("Error: is_true needs at least one argument");
        return;
    }

    match args.split_whitespace().map(Atom::new).collect::<Result<Vec<_>, _>>() {
        Ok(atoms) => {
            let all_known = atoms.iter().all(|atom| kb.atoms().contains(atom));
            println!("{all_known}");
        }
        Err(err) => println!("{err}"),
    }
}

fn help() {
    println!("Commands:");
    println!("  load <filepath>     load a rule file, replacing current rules");
    println!("  tell <atom>...      add atoms as known facts");
    println!("  infer_all           derive everything derivable from the facts");
    println!("  is_true <atom>...   check whether all given atoms are known");
    println!("  show_atoms          list known atoms");
    println!("  show_rules          list loaded rules");
    println!("  clear_atoms         forget all known atoms");
    println!("  quit                exit");
}

fn show_numbered<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) {
    for (i, item) in items.into_iter().enumerate() {
        println!("{:>5}: {item}", i + 1);
    }
}

fn atoms_to_str<'a, I>(atoms: I) -> String
where
    I: IntoIterator<Item = &'a Atom>,
{
    let rendered: Vec<String> = atoms.into_iter().map(ToString::to_string).collect();
    if rendered.is_empty() {
        "<none>".to_string()
    } else {
        rendered.join(", ")
    }
}
