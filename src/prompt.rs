//! # Interactive Prompt Module
//!
//! Prompt su stdin per il custom mode: per ogni file l'operatore può
//! indicare una larghezza di destinazione oppure premere invio per
//! mantenere le dimensioni originali. EOF su stdin viene trattato come
//! "mantieni le dimensioni" per tutti i file rimanenti.

use std::io::{self, BufRead, Write};

/// Ask the operator for a target width for one file.
///
/// `label` is the file name, `details` a short description of the source
/// (dimensions, size). Returns `None` when the original size is kept.
pub fn ask_target_width(label: &str, details: &str) -> io::Result<Option<u32>> {
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        eprint!("{} ({}) - target width [keep]: ", label, details);
        io::stderr().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF: keep the original size
            return Ok(None);
        }

        match parse_width_reply(&line) {
            Ok(width) => return Ok(width),
            Err(_) => {
                eprintln!("Enter a positive number of pixels, or press enter to keep the original width.");
            }
        }
    }
}

/// Parse one prompt reply.
///
/// Empty (or zero) keeps the original width; a positive integer sets the
/// target width; anything else is an error and triggers a re-prompt.
pub fn parse_width_reply(line: &str) -> Result<Option<u32>, std::num::ParseIntError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let width = trimmed.parse::<u32>()?;
    Ok(if width == 0 { None } else { Some(width) })
}
