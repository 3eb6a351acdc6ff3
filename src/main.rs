//! Comment Statistics Tool
//!
//! Scans source files and reports how comments are used: total comment lines,
//! single-line vs. block comments, and TODO markers left in comment text.
//!
//! Supported file types: C-style languages (C/C++, C#, Go, Java,
//! JavaScript/TypeScript, Rust, Scala, Swift) with `//` and `/* ... */`
//! comments, and hash-commented languages (Python, Ruby, Shell, Perl, YAML,
//! TOML) with `#` comments only.

use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use colored::*;

const TODO_TOKEN: &str = "TODO";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Comment and TODO statistics for source files",
    long_about = "Scans each given source file once, classifies its comment regions \
(single-line, trailing, and block comments) and reports per-file statistics \
including TODO markers found inside comment text."
)]
struct Args {
    /// Source files to scan.
    #[arg(required = true)]
    files: Vec<String>,

    /// List every detected comment region with its line/column range.
    #[arg(short, long)]
    verbose: bool,
}

/// Comment marker configuration for one language family.
#[derive(Debug, Clone, Copy)]
struct CommentMarkers {
    line_start: &'static str,
    block_start: &'static str,
    block_end: &'static str,
    block_supported: bool,
}

struct LanguageMarkers {
    suffixes: &'static [&'static str],
    markers: CommentMarkers,
}

// Adding a language means adding a table entry; the scanner never changes.
const MARKER_TABLE: &[LanguageMarkers] = &[
    LanguageMarkers {
        suffixes: &[
            "c", "cc", "cpp", "h", "hpp", "cs", "go", "java", "js", "jsx", "ts", "tsx", "rs",
            "scala", "swift",
        ],
        markers: CommentMarkers {
            line_start: "//",
            block_start: "/*",
            block_end: "*/",
            block_supported: true,
        },
    },
    LanguageMarkers {
        suffixes: &["py", "rb", "sh", "pl", "yaml", "yml", "toml"],
        markers: CommentMarkers {
            line_start: "#",
            block_start: "",
            block_end: "",
            block_supported: false,
        },
    },
];

/// Select the comment markers for a file name (case-insensitive suffix match).
/// Hidden files and names without a recognizable suffix are unsupported.
fn markers_for_file(file_name: &str) -> Option<&'static CommentMarkers> {
    if file_name.starts_with('.') {
        return None;
    }
    let suffix = match file_name.rsplit_once('.') {
        Some((stem, suffix)) if !stem.is_empty() => suffix.to_lowercase(),
        _ => return None,
    };
    MARKER_TABLE
        .iter()
        .find(|entry| entry.suffixes.contains(&suffix.as_str()))
        .map(|entry| &entry.markers)
}

/// One contiguous comment region. Lines and columns are 0-indexed; `end_col`
/// is one past the last comment character for line comments, and the column
/// where the end marker begins for block comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommentSpan {
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
}

impl CommentSpan {
    fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Result of the one-time scanning pass, frozen once produced.
#[derive(Debug, Default)]
struct ScanOutcome {
    spans: Vec<CommentSpan>,
    single_line_comments: usize,
    block_comments: usize,
}

/// Walk the line buffer once, left to right and top to bottom, recording
/// every comment region.
///
/// Rules are tried in priority order per line: a full-line single-line
/// comment (consecutive ones merge into a run), a trailing single-line
/// comment after code, then a block comment. Only the first matching rule
/// fires, so at most one region is detected per physical line. Comment
/// markers inside string literals are not recognized as such.
fn find_comment_spans(lines: &[String], markers: &CommentMarkers) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        if line.trim().starts_with(markers.line_start) {
            let start_line = i;
            // Absorb consecutive full-line comments into a single run.
            while i + 1 < lines.len() && lines[i + 1].trim().starts_with(markers.line_start) {
                i += 1;
            }
            outcome.spans.push(CommentSpan {
                start_line,
                start_col: 0,
                end_line: i,
                end_col: lines[i].len(),
            });
            if i == start_line {
                outcome.single_line_comments += 1;
            } else {
                // A multi-line run counts as one block comment.
                outcome.block_comments += 1;
            }
        } else if let Some(start_col) = line.find(markers.line_start) {
            outcome.spans.push(CommentSpan {
                start_line: i,
                start_col,
                end_line: i,
                end_col: line.len(),
            });
            outcome.single_line_comments += 1;
        } else if markers.block_supported {
            if let Some(start_col) = line.find(markers.block_start) {
                // The end marker is searched from the start marker onward;
                // end_col lands on the column where the end marker begins.
                if let Some(offset) = line[start_col..].find(markers.block_end) {
                    outcome.spans.push(CommentSpan {
                        start_line: i,
                        start_col,
                        end_line: i,
                        end_col: start_col + offset,
                    });
                } else {
                    let start_line = i;
                    let mut end_col = None;
                    while end_col.is_none() && i + 1 < lines.len() {
                        i += 1;
                        end_col = lines[i].find(markers.block_end);
                    }
                    outcome.spans.push(CommentSpan {
                        start_line,
                        start_col,
                        end_line: i,
                        // An unterminated block runs to the end of the file.
                        end_col: end_col.unwrap_or(lines[i].len()),
                    });
                }
                outcome.block_comments += 1;
            }
        }
        i += 1;
    }
    outcome
}

/// Reads a file line by line, decoding every byte as one character (Latin-1)
/// so that no byte sequence can be dropped or merged during decoding.
struct LatinLineReader {
    reader: BufReader<Box<dyn Read>>,
    buffer: Vec<u8>,
}

impl LatinLineReader {
    fn new(file: fs::File) -> Self {
        Self::from_reader(Box::new(file))
    }

    fn from_reader(reader: Box<dyn Read>) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(8 * 1024),
        }
    }

    #[cfg(test)]
    fn with_reader<R: Read + 'static>(reader: R) -> Self {
        Self::from_reader(Box::new(reader))
    }
}

impl Iterator for LatinLineReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                while matches!(self.buffer.last(), Some(b'\n') | Some(b'\r')) {
                    self.buffer.pop();
                }
                let line: String = self.buffer.iter().map(|&b| char::from(b)).collect();
                Some(Ok(line))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Returns an iterator over the lines of a file with terminators stripped.
fn read_file_lines_latin1(file_path: &Path) -> io::Result<LatinLineReader> {
    let file = fs::File::open(file_path)?;
    Ok(LatinLineReader::new(file))
}

/// Scans one source file at construction time and answers read-only
/// statistics queries about its comments.
///
/// The scan records the start and end line/column of every comment region
/// exactly once; `todo_count` re-walks those regions on each call.
struct CommentScanner {
    lines: Vec<String>,
    markers: Option<&'static CommentMarkers>,
    outcome: ScanOutcome,
}

impl CommentScanner {
    /// Reads and scans the file at `file_path`. An unsupported file type
    /// yields a scanner with no statistics (the file is never opened); an
    /// unreadable file fails construction with the I/O error.
    fn from_path(file_path: &Path) -> io::Result<CommentScanner> {
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        let Some(markers) = markers_for_file(file_name) else {
            return Ok(CommentScanner {
                lines: Vec::new(),
                markers: None,
                outcome: ScanOutcome::default(),
            });
        };

        let mut lines = Vec::new();
        for line_result in read_file_lines_latin1(file_path)? {
            lines.push(line_result?);
        }
        let outcome = find_comment_spans(&lines, markers);
        Ok(CommentScanner {
            lines,
            markers: Some(markers),
            outcome,
        })
    }

    /// Whether the input file is a recognized and supported file type.
    /// All numeric queries return zero when this is false.
    fn is_supported_file_type(&self) -> bool {
        self.markers.is_some()
    }

    fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Number of physical lines touched by any comment region, recomputed
    /// from the span list on each call.
    fn comment_lines(&self) -> usize {
        self.outcome.spans.iter().map(CommentSpan::line_count).sum()
    }

    fn single_line_comments(&self) -> usize {
        self.outcome.single_line_comments
    }

    fn block_comments(&self) -> usize {
        self.outcome.block_comments
    }

    fn comment_lines_in_block_comments(&self) -> usize {
        // Every single-line span covers exactly one line, so subtracting the
        // single-line count leaves the lines contributed by block spans.
        self.comment_lines() - self.outcome.single_line_comments
    }

    /// Counts comment lines containing the TODO token, case-insensitively
    /// and at most once per physical line. Re-walks the spans on each call.
    fn todo_count(&self) -> usize {
        let mut todos = 0;
        for span in &self.outcome.spans {
            for i in span.start_line..=span.end_line {
                let line = &self.lines[i];
                let begin = if i == span.start_line {
                    span.start_col
                } else {
                    0
                };
                let end = if i == span.end_line {
                    span.end_col
                } else {
                    line.len()
                };
                if line[begin..end].to_uppercase().contains(TODO_TOKEN) {
                    todos += 1;
                }
            }
        }
        todos
    }

    fn spans(&self) -> &[CommentSpan] {
        &self.outcome.spans
    }
}

/// Render the per-file statistics block printed after each scan.
fn build_file_report(path: &Path, scanner: &CommentScanner, verbose: bool) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "\nFile: {}", path.display());
    let _ = writeln!(
        output,
        "  Total lines: {}",
        scanner.total_lines().to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "  Comment lines: {}",
        scanner.comment_lines().to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "  Single-line comments: {}",
        scanner.single_line_comments().to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "  Comment lines in block comments: {}",
        scanner
            .comment_lines_in_block_comments()
            .to_string()
            .bright_yellow()
    );
    let _ = writeln!(
        output,
        "  Block comments: {}",
        scanner.block_comments().to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "  TODOs: {}",
        scanner.todo_count().to_string().bright_yellow()
    );
    if verbose {
        for span in scanner.spans() {
            let _ = writeln!(
                output,
                "    comment {}:{} .. {}:{}",
                span.start_line, span.start_col, span.end_line, span.end_col
            );
        }
    }
    output
}

fn print_summary(files_scanned: usize, total_todos: usize, error_count: usize) {
    println!("\n{}", "Scan Summary:".blue().bold());
    println!(
        "Files scanned: {}",
        files_scanned.to_string().bright_yellow()
    );
    println!("TODOs found: {}", total_todos.to_string().bright_yellow());
    if error_count > 0 {
        println!(
            "{}: {} file(s) could not be read",
            "Warning".red().bold(),
            error_count.to_string().bright_yellow()
        );
    }
}

fn main() -> io::Result<()> {
    run_with_args(env::args_os())
}

fn run_with_args<I, T>(args: I) -> io::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::parse_from(args);
    run_cli(&args)
}

fn run_cli(args: &Args) -> io::Result<()> {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_yellow()
    );

    let mut files_scanned: usize = 0;
    let mut total_todos: usize = 0;
    let mut error_count: usize = 0;

    for file in &args.files {
        let path = Path::new(file);
        let scanner = match CommentScanner::from_path(path) {
            Ok(scanner) => scanner,
            Err(err) => {
                eprintln!("Error reading {}: {}", path.display(), err);
                error_count += 1;
                continue;
            }
        };

        if !scanner.is_supported_file_type() {
            println!("\nFile: {}", path.display());
            println!("  Unsupported file type");
            continue;
        }

        files_scanned += 1;
        total_todos += scanner.todo_count();
        print!("{}", build_file_report(path, &scanner, args.verbose));
    }

    print_summary(files_scanned, total_todos, error_count);

    if error_count > 0 {
        return Err(io::Error::other(format!(
            "{} file(s) could not be read",
            error_count
        )));
    }
    Ok(())
}
