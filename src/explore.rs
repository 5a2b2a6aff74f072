/// Line-oriented exploration of a finished report.
///
/// Runs after the report has been written; it only reads the table.
use crate::locate::ElementKey;
use crate::report::ReportTable;
use std::io::{BufRead, Write};

const HELP: &str = "\
commands:
  rows            list element keys
  columns         list column names
  show <key>      print every field of one element (key tokens joined by '_')
  column <name>   print one column for every element
  missing         count blank cells per column
  help            show this message
  quit            leave the session
";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Rows,
    Columns,
    Show(&'a str),
    Column(&'a str),
    Missing,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };
    Some(match (word, arg) {
        ("rows", _) => Command::Rows,
        ("columns" | "cols", _) => Command::Columns,
        ("show", key) if !key.is_empty() => Command::Show(key),
        ("column" | "col", name) if !name.is_empty() => Command::Column(name),
        ("missing", _) => Command::Missing,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        _ => Command::Unknown(line),
    })
}

/// Serve commands from `input` until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    table: &ReportTable,
    input: R,
    mut output: W,
) -> std::io::Result<()> {
    writeln!(
        output,
        "report: {} elements, {} columns. Type 'help' for commands.",
        table.len(),
        table.columns().len()
    )?;

    for line in input.lines() {
        let line = line?;
        let Some(command) = parse_command(&line) else {
            continue;
        };
        tracing::debug!(?command, "explore command");

        match command {
            Command::Rows => {
                for row in table.rows() {
                    writeln!(output, "{}", row.key)?;
                }
            }
            Command::Columns => {
                for column in table.columns() {
                    writeln!(output, "{column}")?;
                }
            }
            Command::Show(key) => {
                let key = ElementKey::from(key.split('_').map(str::to_string).collect::<Vec<_>>());
                match table.row(&key) {
                    Some(row) => {
                        for column in table.columns() {
                            let value = row.record.get(column).unwrap_or("");
                            writeln!(output, "{column}: {}", value.replace('\n', " | "))?;
                        }
                    }
                    None => writeln!(output, "no element {key}")?,
                }
            }
            Command::Column(name) => match table.column(name) {
                Some(values) => {
                    for (key, value) in values {
                        writeln!(output, "{key}: {}", value.unwrap_or("").replace('\n', " | "))?;
                    }
                }
                None => writeln!(output, "no column {name}")?,
            },
            Command::Missing => {
                for column in table.columns() {
                    let blank = table
                        .rows()
                        .iter()
                        .filter(|row| row.record.get(column).map_or(true, str::is_empty))
                        .count();
                    writeln!(output, "{column}: {blank}/{}", table.len())?;
                }
            }
            Command::Help => write!(output, "{HELP}")?,
            Command::Quit => break,
            Command::Unknown(line) => writeln!(output, "unknown command: {line}")?,
        }
    }

    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractedRecord;

    fn table() -> ReportTable {
        let mut table = ReportTable::new(vec!["CPUs".into()], vec!["warnings".into()]);
        let mut a = ExtractedRecord::new();
        a.set("CPUs", Some("4.0".into()));
        a.set("warnings", Some("low memory\nslow disk".into()));
        let mut b = ExtractedRecord::new();
        b.set("CPUs", None);
        b.set("warnings", Some(String::new()));
        table.push(ElementKey::from(vec!["1".into(), "A".into()]), a);
        table.push(ElementKey::from(vec!["1".into(), "B".into()]), b);
        table
    }

    fn session(commands: &str) -> String {
        let mut out = Vec::new();
        run_session(&table(), commands.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_known_commands() {
        assert_eq!(parse_command("rows"), Some(Command::Rows));
        assert_eq!(parse_command("  show 1_A "), Some(Command::Show("1_A")));
        assert_eq!(parse_command("col CPUs"), Some(Command::Column("CPUs")));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("show"), Some(Command::Unknown("show")));
    }

    #[test]
    fn rows_and_columns() {
        let out = session("rows\ncolumns\n");
        assert!(out.contains("1_A\n1_B\n"));
        assert!(out.contains("CPUs\nwarnings\n"));
    }

    #[test]
    fn show_element() {
        let out = session("show 1_A\nshow 9_Z\n");
        assert!(out.contains("CPUs: 4.0\n"));
        assert!(out.contains("warnings: low memory | slow disk\n"));
        assert!(out.contains("no element 9_Z\n"));
    }

    #[test]
    fn column_values() {
        let out = session("column CPUs\ncolumn nope\n");
        assert!(out.contains("1_A: 4.0\n1_B: \n"));
        assert!(out.contains("no column nope\n"));
    }

    #[test]
    fn missing_counts_blank_cells() {
        let out = session("missing\n");
        assert!(out.contains("CPUs: 1/2\n"));
        assert!(out.contains("warnings: 1/2\n"));
    }

    #[test]
    fn quit_stops_reading() {
        let out = session("quit\nrows\n");
        assert!(!out.contains("1_A"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let out = session("frobnicate\n");
        assert!(out.contains("unknown command: frobnicate"));
    }
}
