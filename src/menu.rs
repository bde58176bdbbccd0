//! Interactive option loop over a built [`TextIndex`].

use std::io::{self, BufRead, Write};

use crate::index::TextIndex;
use crate::report;

const MENU: &str = "\
======================================
Please select option below to operate:
  0. Quit the program
  1. Print out the frequency of an entered word
  2. Print out all words that have a frequency that is greater than an entered value
  3. Reserved for extra credit:
    a) Print out total number of words repeated more than once
    b) Print out the most repeated word(s)
    c) Print out the lines an entered word appears in";

/// Run the menu until the user picks `0` or input ends.
pub fn run<R: BufRead, W: Write>(index: &TextIndex, input: R, mut output: W) -> io::Result<()> {
    let mut lines = input.lines();

    loop {
        writeln!(output, "{MENU}")?;
        let Some(option) = prompt_number(&mut lines, &mut output, "Please enter option [0-3]: ")?
        else {
            break;
        };

        match option {
            0 => break,
            1 => {
                let Some(word) =
                    prompt(&mut lines, &mut output, "Enter the word to find its frequency: ")?
                else {
                    break;
                };
                writeln!(output, "{}", report::frequency(&word, &index.lookup(&word)))?;
            }
            2 => {
                let Some(least) = prompt_number(
                    &mut lines,
                    &mut output,
                    "Enter the least frequency to list all words: ",
                )?
                else {
                    break;
                };
                let words = index.try_words_above_threshold(least);
                writeln!(output, "{}", report::words_above(least, &words))?;
            }
            3 => {
                writeln!(
                    output,
                    "a) {}",
                    report::repeated_total(index.total_words_repeated_more_than_once())
                )?;
                writeln!(
                    output,
                    "b) {}",
                    report::most_repeated(&index.most_repeated_words())
                )?;
                let Some(word) = prompt(
                    &mut lines,
                    &mut output,
                    "c) Enter a word you would like to search for: ",
                )?
                else {
                    break;
                };
                match index.try_lines_containing(&word) {
                    Ok(matches) => writeln!(output, "{}", report::lines(&word, &matches))?,
                    Err(err) => writeln!(output, "Invalid word \"{word}\": {err}")?,
                }
            }
            other => writeln!(
                output,
                "Sorry, I could not find the function for the option {other}"
            )?,
        }
    }

    writeln!(output, "Thank you for using the program")?;
    output.flush()
}

/// Print `message` and return the first whitespace-delimited token of the
/// next non-blank line. `None` on end of input.
fn prompt<I, W>(lines: &mut I, output: &mut W, message: &str) -> io::Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    loop {
        write!(output, "{message}")?;
        output.flush()?;
        match lines.next() {
            None => return Ok(None),
            Some(line) => {
                if let Some(token) = line?.split_whitespace().next() {
                    return Ok(Some(token.to_string()));
                }
            }
        }
    }
}

/// Like [`prompt`], but reprompts until the answer parses as an integer.
fn prompt_number<I, W>(lines: &mut I, output: &mut W, message: &str) -> io::Result<Option<i64>>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    while let Some(answer) = prompt(lines, output, message)? {
        match answer.parse::<i64>() {
            Ok(number) => return Ok(Some(number)),
            Err(_) => writeln!(output, "\"{answer}\" is not a number")?,
        }
    }
    Ok(None)
}
