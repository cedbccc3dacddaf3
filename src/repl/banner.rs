use console::{style, Term};

use crate::fixtures::Catalog;

const BRAND: u8 = 45;     // cyan, matches the executing-node color
const BRAND_DIM: u8 = 31; // deep teal
const DIM: u8 = 240;

const SEP_CHAR: char = '\u{2026}'; // …

const TAGLINE: &str = "Ask your data in plain English";

/// Number of sample questions listed under the banner.
const SAMPLE_COUNT: usize = 6;

/// Print the start-up banner: name, version, connected databases and a
/// handful of sample questions.
pub fn show_banner(catalog: &Catalog) {
    let term = Term::stdout();
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");

    let (_, term_cols) = term.size();
    let term_w = term_cols as usize;

    let center = |text_w: usize| -> String {
        if term_w > text_w + 4 {
            " ".repeat((term_w - text_w) / 2)
        } else {
            "  ".to_string()
        }
    };

    println!();
    {
        let title = "N A B L O N";
        println!("{}{}", center(title.len()), style(title).color256(BRAND).bold());
    }
    {
        let version_str = format!("v{} ({})", version, git_hash);
        println!("{}{}", center(version_str.len()), style(version_str).color256(DIM));
    }

    let scene_w = term_w.min(76).max(40);
    let pad = center(scene_w);
    let separator = style(SEP_CHAR.to_string().repeat(scene_w)).color256(BRAND_DIM);
    println!("{}{}", pad, separator);
    println!("{}{}", center(TAGLINE.len()), style(TAGLINE).white().bold());
    println!("{}{}", pad, separator);
    println!();

    print_database_box(catalog, &center);
    println!();

    let samples: Vec<&str> = catalog
        .questions
        .iter()
        .take(SAMPLE_COUNT)
        .map(|q| q.question.as_str())
        .collect();
    if !samples.is_empty() {
        let p = center(56);
        println!("{}  {}", p, style("Try asking:").white().bold());
        println!();
        for q in samples {
            println!("{}    {} {}", p, style("›").color256(BRAND), q);
        }
        println!();
    }

    println!(
        "  {} {} {}",
        style("Type").dim(),
        style("/help").white().bold(),
        style("for commands, Ctrl-C stops a running answer.").dim(),
    );
    println!();
}

/// Print the connected databases inside a box-drawn border.
fn print_database_box(catalog: &Catalog, center: &dyn Fn(usize) -> String) {
    let lines: Vec<String> = if catalog.databases.is_empty() {
        vec!["No databases loaded".to_string()]
    } else {
        catalog
            .databases
            .iter()
            .map(|db| format!("{} ({}, {} tables)", db.name, db.database_type, db.tables.len()))
            .collect()
    };

    let header = "CONNECTED DATABASES";
    let content_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len());
    let inner_w = content_w + 4;
    let pad = center(inner_w + 2);
    let hbar = "\u{2500}".repeat(inner_w);

    println!(
        "{}{}{}{}",
        pad,
        style("\u{250c}").color256(BRAND_DIM),
        style(&hbar).color256(BRAND_DIM),
        style("\u{2510}").color256(BRAND_DIM),
    );
    {
        let left = inner_w.saturating_sub(header.len()) / 2;
        let right = inner_w.saturating_sub(header.len() + left);
        println!(
            "{}{}{}{}{}{}",
            pad,
            style("\u{2502}").color256(BRAND_DIM),
            " ".repeat(left),
            style(header).color256(BRAND).bold(),
            " ".repeat(right),
            style("\u{2502}").color256(BRAND_DIM),
        );
    }
    for line in &lines {
        let right_pad = inner_w.saturating_sub(line.chars().count() + 2);
        println!(
            "{}{}  {}{}{}",
            pad,
            style("\u{2502}").color256(BRAND_DIM),
            style(line).dim(),
            " ".repeat(right_pad),
            style("\u{2502}").color256(BRAND_DIM),
        );
    }
    println!(
        "{}{}{}{}",
        pad,
        style("\u{2514}").color256(BRAND_DIM),
        style(&hbar).color256(BRAND_DIM),
        style("\u{2518}").color256(BRAND_DIM),
    );
}
