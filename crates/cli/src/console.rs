//! Line-oriented prompting over any reader/writer pair.
//!
//! Every prompt loops until the input parses; end of input surfaces as
//! `UnexpectedEof` so a closed stdin ends the session instead of spinning.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use dealership_core::Vin;

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn println(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Non-blank text.
    pub fn prompt_string(&mut self, prompt: &str) -> io::Result<String> {
        loop {
            let line = self.read_line(prompt)?;
            if !line.is_empty() {
                return Ok(line);
            }
            self.println("A value is required. Please try again.")?;
        }
    }

    pub fn prompt_parse<T: FromStr>(&mut self, prompt: &str) -> io::Result<T> {
        loop {
            match self.read_line(prompt)?.parse() {
                Ok(value) => return Ok(value),
                Err(_) => self.println("Invalid input. Please enter a whole number.")?,
            }
        }
    }

    pub fn prompt_int(&mut self, prompt: &str) -> io::Result<u32> {
        self.prompt_parse(prompt)
    }

    pub fn prompt_u64(&mut self, prompt: &str) -> io::Result<u64> {
        self.prompt_parse(prompt)
    }

    /// Numbered choice; returns the 1-based index.
    pub fn prompt_option(&mut self, options: &[&str]) -> io::Result<usize> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {option}", i + 1)?;
        }
        loop {
            let choice = self.prompt_int("Enter your choice: ")? as usize;
            if (1..=options.len()).contains(&choice) {
                return Ok(choice);
            }
            self.println("Please make a selection from the menu")?;
        }
    }

    /// Inclusive bounds for `label`; re-prompts both while min > max.
    pub fn prompt_range<T>(&mut self, label: &str) -> io::Result<(T, T)>
    where
        T: FromStr + PartialOrd,
    {
        loop {
            let min: T = self.prompt_parse(&format!("Please enter a minimum {label}: "))?;
            let max: T = self.prompt_parse(&format!("Please enter a maximum {label}: "))?;
            if min <= max {
                return Ok((min, max));
            }
            self.println(format!(
                "Minimum {label} cannot be greater than maximum {label}. Please try again."
            ))?;
        }
    }

    pub fn prompt_vin(&mut self, prompt: &str) -> io::Result<Vin> {
        loop {
            match self.read_line(prompt)?.parse::<Vin>() {
                Ok(vin) => return Ok(vin),
                Err(_) => self.println("Invalid VIN. Please enter a 9-digit number.")?,
            }
        }
    }

    pub fn prompt_yes_no(&mut self, prompt: &str) -> io::Result<bool> {
        loop {
            match self.read_line(prompt)?.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.println("Please answer Y or N.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn numeric_prompt_retries_on_garbage() {
        let mut c = console("abc\n-5\n42\n");
        assert_eq!(c.prompt_int("n: ").unwrap(), 42);
        assert_eq!(output(c).matches("Invalid input").count(), 2);
    }

    #[test]
    fn range_prompt_retries_when_min_exceeds_max() {
        let mut c = console("20000\n10000\n10000\n20000\n");
        let (min, max): (u64, u64) = c.prompt_range("price").unwrap();
        assert_eq!((min, max), (10_000, 20_000));
        assert!(output(c).contains("Minimum price cannot be greater than maximum price"));
    }

    #[test]
    fn option_prompt_rejects_out_of_menu_choices() {
        let mut c = console("0\n4\n2\n");
        assert_eq!(c.prompt_option(&["Yes", "No"]).unwrap(), 2);
        assert_eq!(
            output(c).matches("Please make a selection from the menu").count(),
            2
        );
    }

    #[test]
    fn vin_prompt_requires_nine_digits() {
        let mut c = console("12345\n1234567890\n123456789\n");
        assert_eq!(c.prompt_vin("VIN: ").unwrap().get(), 123_456_789);
    }

    #[test]
    fn string_prompt_skips_blank_lines() {
        let mut c = console("   \nHonda\n");
        assert_eq!(c.prompt_string("Make: ").unwrap(), "Honda");
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut c = console("");
        let err = c.prompt_string("Make: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
