use clap::Parser;
use colored::Colorize;
use diff_lens::{DiffLens, FilterOptions, LineRange, Rendered, RenderOptions};

#[derive(Parser)]
#[command(name = "diff-lens")]
#[command(about = "Filtered, line-numbered, budget-bounded git diff review")]
struct Cli {
    /// Restrict output to these path prefixes (component-boundary match)
    paths: Vec<String>,

    /// Diff the index instead of the working tree
    #[arg(long)]
    staged: bool,

    /// Repository to diff
    #[arg(long, default_value = ".")]
    repo: String,

    /// Keep only hunk lines matching this regex (invalid patterns are
    /// treated as literal text)
    #[arg(long)]
    grep: Option<String>,

    /// Context lines to keep around each grep match (0 keeps whole hunks)
    #[arg(long, default_value_t = 0)]
    grep_context: usize,

    /// New-file line range to keep, as START-END
    #[arg(long, value_parser = parse_line_range)]
    lines: Option<LineRange>,

    /// Budget for total emitted diff lines
    #[arg(long, default_value_t = 400)]
    max_lines: usize,

    /// Budget for emitted hunks
    #[arg(long, default_value_t = 40)]
    max_hunks: usize,

    /// Hosted review base URL; adds a deep link per hunk to the report
    #[arg(long)]
    base_url: Option<String>,

    /// Print the annotated block report instead of the compact diff
    #[arg(long)]
    report: bool,
}

fn parse_line_range(value: &str) -> Result<LineRange, String> {
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| format!("invalid range '{value}': expected START-END"))?;
    let start: u32 = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid range start '{start}'"))?;
    let end: u32 = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid range end '{end}'"))?;
    if start == 0 || end < start {
        return Err(format!("invalid range '{value}': need 1 <= START <= END"));
    }
    Ok(LineRange { start, end })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filters = FilterOptions {
        paths: cli.paths,
        grep: cli.grep,
        grep_context: cli.grep_context,
        line_range: cli.lines,
    };
    let opts = RenderOptions {
        base_url: cli.base_url,
        max_lines: cli.max_lines,
        max_hunks: cli.max_hunks,
    };

    let review = DiffLens::new(&cli.repo).review(cli.staged, &filters, &opts)?;

    if cli.report {
        println!("{}", review.text);
    } else {
        print_colorized(&review);
    }

    if review.info.truncated && !cli.report {
        eprintln!(
            "note: output truncated at {} lines / {} hunks; narrow with paths, --grep, or --lines",
            review.info.shown_lines, review.info.shown_hunks
        );
        for (path, ranges) in &review.info.suggested_ranges {
            eprintln!("note: retry {} with --lines {}", path, ranges.join(" / "));
        }
    }

    Ok(())
}

fn print_colorized(review: &Rendered) {
    if review.diff_text.is_empty() {
        println!("{}", review.text);
        return;
    }
    for line in review.diff_text.lines() {
        if line.starts_with("  ") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}
