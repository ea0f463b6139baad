//! Interactive confirmation before a batch

use std::io::{self, BufRead, Write};

/// Lists the titles and asks whether to continue
///
/// Only `y` or `yes` (any case) accept; an empty line or EOF declines.
pub fn confirm<R, W>(titles: &[&str], input: &mut R, out: &mut W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "About to create {} issue(s):", titles.len())?;
    for (i, title) in titles.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, title)?;
    }
    write!(out, "Continue? [y/N]: ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}
