//! Line-based console protocol.
//!
//! [`Console`] wraps a reader and writer pair and owns the prompt-until-valid
//! loop around the pure validators in [`crate::input`]. Modules talk to the
//! operator exclusively through this type, so their menu loops can be driven
//! by scripted input in tests.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use crate::error::{Error, Result};
use crate::input::{parse_and_validate, FieldSpec, Value};

/// A reader/writer pair speaking the suite's line protocol.
#[derive(Debug)]
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Build a console over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self {
            reader: BufReader::new(io::stdin()),
            writer: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Build a console over an arbitrary reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print a line to the operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    /// Print a prompt (no newline) and read one trimmed line.
    ///
    /// End of input is the operator's interrupt signal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] at end of input, or an I/O error.
    pub fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;

        let mut line = String::new();
        let bytes = self.reader.read_line(&mut line)?;
        if bytes == 0 {
            return Err(Error::Interrupted);
        }
        Ok(line.trim().to_string())
    }

    /// Prompt for a field until its constraint accepts the input.
    ///
    /// Rejections print the field's own message and re-prompt; a validation
    /// failure never reaches the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] at end of input, or an I/O error.
    pub fn read_field(&mut self, field: &FieldSpec) -> Result<Value> {
        loop {
            let raw = self.prompt(field.prompt)?;
            match parse_and_validate(&raw, &field.constraint) {
                Ok(value) => return Ok(value),
                Err(violation) => self.say(field.message_for(violation))?,
            }
        }
    }

    /// Prompt for a text-valued field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] at end of input, or an I/O error.
    pub fn read_text(&mut self, field: &FieldSpec) -> Result<String> {
        self.read_field(field)?
            .into_text()
            .ok_or_else(|| Error::internal(format!("field '{}' is not text", field.prompt)))
    }

    /// Prompt for an integer-valued field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] at end of input, or an I/O error.
    pub fn read_integer(&mut self, field: &FieldSpec) -> Result<i64> {
        self.read_field(field)?
            .into_integer()
            .ok_or_else(|| Error::internal(format!("field '{}' is not an integer", field.prompt)))
    }

    /// Prompt for a real-valued field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interrupted`] at end of input, or an I/O error.
    pub fn read_real(&mut self, field: &FieldSpec) -> Result<f64> {
        self.read_field(field)?
            .into_real()
            .ok_or_else(|| Error::internal(format!("field '{}' is not a real", field.prompt)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Constraint;
    use std::io::Cursor;

    fn scripted(input: &str) -> Console<Cursor<String>, Vec<u8>> {
        Console::new(Cursor::new(input.to_string()), Vec::new())
    }

    fn output(console: Console<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8(console.writer).expect("console output is UTF-8")
    }

    const YEAR_FIELD: FieldSpec = FieldSpec {
        prompt: "Enter manufacture year: ",
        constraint: Constraint::Integer {
            min: Some(1950),
            max: Some(2025),
        },
        format_message: "Manufacture year must be a numeric value.",
        range_message: "Enter a realistic year between 1950\u{2013}2025.",
    };

    #[test]
    fn test_prompt_trims_input() {
        let mut console = scripted("  hello  \n");
        let line = console.prompt("> ").unwrap();
        assert_eq!(line, "hello");
    }

    #[test]
    fn test_prompt_eof_is_interrupted() {
        let mut console = scripted("");
        let err = console.prompt("> ").unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_read_field_retries_until_valid() {
        let mut console = scripted("abc\n1800\n1998\n");
        let value = console.read_integer(&YEAR_FIELD).unwrap();
        assert_eq!(value, 1998);

        let out = output(console);
        assert!(out.contains("Manufacture year must be a numeric value."));
        assert!(out.contains("Enter a realistic year between 1950\u{2013}2025."));
        assert_eq!(out.matches("Enter manufacture year: ").count(), 3);
    }

    #[test]
    fn test_read_field_eof_mid_retry() {
        let mut console = scripted("abc\n");
        let err = console.read_integer(&YEAR_FIELD).unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn test_read_text_accepts_first_valid() {
        const NAME_FIELD: FieldSpec = FieldSpec {
            prompt: "Enter aircraft name: ",
            constraint: Constraint::NonEmpty,
            format_message: "Aircraft name cannot be empty.",
            range_message: "Aircraft name cannot be empty.",
        };
        let mut console = scripted("\nConcorde\n");
        let name = console.read_text(&NAME_FIELD).unwrap();
        assert_eq!(name, "Concorde");

        let out = output(console);
        assert!(out.contains("Aircraft name cannot be empty."));
    }

    #[test]
    fn test_read_real_converts() {
        const WIND_FIELD: FieldSpec = FieldSpec {
            prompt: "Enter wind speed (knots): ",
            constraint: Constraint::Real(crate::input::RealBound::NonNegative),
            format_message: "Enter a valid number for wind speed.",
            range_message: "Wind speed cannot be negative.",
        };
        let mut console = scripted("-2\n12.5\n");
        let wind = console.read_real(&WIND_FIELD).unwrap();
        assert!((wind - 12.5).abs() < f64::EPSILON);

        let out = output(console);
        assert!(out.contains("Wind speed cannot be negative."));
    }

    #[test]
    fn test_say_appends_newline() {
        let mut console = scripted("");
        console.say("Registered Aircraft:").unwrap();
        assert_eq!(output(console), "Registered Aircraft:\n");
    }
}
