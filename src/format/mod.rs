//! Plain text cube files
//!
//! A cube file is a sequence of cubes, each made of an input part and an
//! output part. Each part is a run of literals closed by its terminator,
//! which defaults to a blank for the input part and a newline for the output
//! part. Other characters up to and including a blank are ignored, and
//! anything between two `/` is a comment, so `/* ... */` works as expected.
//!
//! Input literals are `0`, `1` and one of `x`, `X`, `-` for a free variable.
//! Output literals are `0`, `1` and one of `d`, `D`, `-` for don't care.
//! The first cube fixes the dimensions of the whole file.
//!
//! ```text
//! /* majority */
//! 11- 1
//! 1-1 1
//! -11 1
//! ```

pub(crate) mod error;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, warn};

use crate::cover::Cover;

pub use error::{CubeFileError, CubeReadError, CubeWriteError};

/// Terminators used to read and print cube files
///
/// Files are scanned byte by byte, so the read terminators must be ASCII
/// characters. Reading with any other terminator fails with
/// [`CubeFileError::NonAsciiTerminator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeFormat {
    /// Character closing the input part of a cube when reading
    pub input_terminator: char,
    /// Character closing the output part of a cube when reading
    pub output_terminator: char,
    /// Text printed after the input part of a cube
    pub print_input_terminator: String,
    /// Text printed after the output part of a cube
    pub print_output_terminator: String,
}

impl Default for CubeFormat {
    fn default() -> Self {
        CubeFormat {
            input_terminator: ' ',
            output_terminator: '\n',
            print_input_terminator: " ".to_string(),
            print_output_terminator: "\n".to_string(),
        }
    }
}

/// How a part ended
#[derive(Debug, PartialEq, Eq)]
enum PartEnd {
    /// Closed by its terminator
    Terminated,
    /// Complete but cut by the end of the file
    Unterminated,
    /// The file ended before any literal
    Empty,
}

type Literal = fn(u8) -> Option<Option<bool>>;

fn input_literal(ch: u8) -> Option<Option<bool>> {
    match ch {
        b'0' => Some(Some(false)),
        b'1' => Some(Some(true)),
        b'x' | b'X' | b'-' => Some(None),
        _ => None,
    }
}

fn output_literal(ch: u8) -> Option<Option<bool>> {
    match ch {
        b'0' => Some(Some(false)),
        b'1' => Some(Some(true)),
        b'd' | b'D' | b'-' => Some(None),
        _ => None,
    }
}

/// Character scanner keeping track of line numbers
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    after_newline: bool,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Scanner {
            bytes,
            pos: 0,
            line: 1,
            after_newline: false,
        }
    }

    fn next_char(&mut self) -> Option<u8> {
        let ch = *self.bytes.get(self.pos)?;
        self.pos += 1;
        if self.after_newline {
            self.line += 1;
        }
        self.after_newline = ch == b'\n';
        Some(ch)
    }

    /// Skip a comment whose opening `/` was just read
    ///
    /// Returns false if the file ends inside it.
    fn skip_comment(&mut self) -> bool {
        while let Some(ch) = self.next_char() {
            if ch == b'/' {
                return true;
            }
        }
        false
    }

    /// Read one part into `values`
    ///
    /// With `expected` unset the part may hold any non-zero number of
    /// literals, which is how the first cube fixes the dimensions.
    fn read_part(
        &mut self,
        terminator: char,
        expected: Option<usize>,
        literal: Literal,
        values: &mut Vec<Option<bool>>,
    ) -> Result<PartEnd, CubeFileError> {
        values.clear();
        loop {
            let ch = match self.next_char() {
                Some(b'/') if self.skip_comment() => continue,
                Some(b'/') | None => return self.end_of_file(expected, values.len()),
                Some(ch) => ch,
            };

            if char::from(ch) == terminator && !values.is_empty() {
                return match expected {
                    Some(expected) if expected != values.len() => Err(CubeFileError::WrongBitCount {
                        line: self.line,
                        terminator,
                        read: values.len(),
                        expected,
                    }),
                    _ => Ok(PartEnd::Terminated),
                };
            }
            if ch <= b' ' {
                continue;
            }

            let value = literal(ch).ok_or(CubeFileError::InvalidCharacter {
                line: self.line,
                character: char::from(ch),
            })?;
            if let Some(expected) = expected {
                if values.len() == expected {
                    return Err(CubeFileError::TooManyBits {
                        line: self.line,
                        terminator,
                        expected,
                    });
                }
            }
            values.push(value);
        }
    }

    fn end_of_file(&self, expected: Option<usize>, read: usize) -> Result<PartEnd, CubeFileError> {
        match expected {
            _ if read == 0 => Ok(PartEnd::Empty),
            Some(expected) if expected != read => Err(CubeFileError::UnexpectedEof {
                line: self.line,
                read,
                expected,
            }),
            _ => Ok(PartEnd::Unterminated),
        }
    }
}

/// Read a cover from cube text
///
/// A last cube whose output part is complete but lacks its terminator is
/// accepted with a warning.
pub fn read_cover<R: BufRead>(mut reader: R, format: &CubeFormat) -> Result<Cover, CubeReadError> {
    for terminator in [format.input_terminator, format.output_terminator] {
        if !terminator.is_ascii() {
            return Err(CubeFileError::NonAsciiTerminator { terminator }.into());
        }
    }

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut scanner = Scanner::new(&bytes);
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut cover: Option<Cover> = None;

    loop {
        let dimensions = cover.as_ref().map(|c| (c.num_inputs(), c.num_outputs()));
        let input_end = scanner.read_part(
            format.input_terminator,
            dimensions.map(|(i, _)| i),
            input_literal,
            &mut inputs,
        )?;
        match input_end {
            PartEnd::Empty => break,
            PartEnd::Unterminated => {
                return Err(CubeFileError::MissingOutputPart { line: scanner.line }.into());
            }
            PartEnd::Terminated => {}
        }

        let output_end = scanner.read_part(
            format.output_terminator,
            dimensions.map(|(_, o)| o),
            output_literal,
            &mut outputs,
        )?;
        if output_end == PartEnd::Empty {
            return Err(CubeFileError::MissingOutputPart { line: scanner.line }.into());
        }

        cover
            .get_or_insert_with(|| Cover::new(inputs.len(), outputs.len()))
            .add_cube(&inputs, &outputs);

        if output_end == PartEnd::Unterminated {
            warn!(
                "missing {:?} after the last cube (line {})",
                format.output_terminator, scanner.line
            );
            break;
        }
    }

    let cover = cover.ok_or(CubeFileError::NoCubes)?;
    debug!(
        "read {} cubes with {} inputs and {} outputs",
        cover.num_cubes(),
        cover.num_inputs(),
        cover.num_outputs()
    );
    Ok(cover)
}

/// Write a cover as cube text
pub fn write_cover<W: Write>(cover: &Cover, mut writer: W, format: &CubeFormat) -> Result<(), CubeWriteError> {
    let mut line = String::with_capacity(
        cover.num_inputs()
            + cover.num_outputs()
            + format.print_input_terminator.len()
            + format.print_output_terminator.len(),
    );
    for (inputs, outputs) in cover.cubes_iter() {
        line.clear();
        line.extend(inputs.iter().map(|value| match value {
            Some(true) => '1',
            Some(false) => '0',
            None => '-',
        }));
        line.push_str(&format.print_input_terminator);
        line.extend(outputs.iter().map(|value| match value {
            Some(true) => '1',
            Some(false) => '0',
            None => 'd',
        }));
        line.push_str(&format.print_output_terminator);
        writer.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Write one line of text as a comment the reader skips
///
/// Any `/` in `text` would close the comment early and is replaced.
pub fn write_comment<W: Write>(mut writer: W, text: &str) -> Result<(), CubeWriteError> {
    writeln!(writer, "/* {} */", text.replace('/', "|"))?;
    Ok(())
}

/// Write a cover to cube text
///
/// # Examples
///
/// ```
/// use mcboole_logic::{Cover, CubeFileWriter, CubeFormat};
///
/// let mut cover = Cover::new(2, 1);
/// cover.add_cube(&[Some(true), None], &[Some(true)]);
/// let text = cover.to_cube_string(&CubeFormat::default()).unwrap();
/// assert_eq!(text, "1- 1\n");
/// ```
pub trait CubeFileWriter {
    /// Write to any writer
    fn write_cubes<W: Write>(&self, writer: W, format: &CubeFormat) -> Result<(), CubeWriteError>;

    /// Write to a string
    fn to_cube_string(&self, format: &CubeFormat) -> Result<String, CubeWriteError> {
        let mut buffer = Vec::new();
        self.write_cubes(&mut buffer, format)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Write to a file
    fn to_cube_file<P: AsRef<Path>>(&self, path: P, format: &CubeFormat) -> Result<(), CubeWriteError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_cubes(&mut writer, format)?;
        writer.flush()?;
        Ok(())
    }
}

impl CubeFileWriter for Cover {
    fn write_cubes<W: Write>(&self, writer: W, format: &CubeFormat) -> Result<(), CubeWriteError> {
        write_cover(self, writer, format)
    }
}

/// Read a cover from cube text
///
/// # Examples
///
/// ```
/// use mcboole_logic::{Cover, CubeFileReader, CubeFormat};
///
/// let cover = Cover::from_cube_string("/* and */ 11 1\n", &CubeFormat::default()).unwrap();
/// assert_eq!(cover.num_inputs(), 2);
/// assert_eq!(cover.num_cubes(), 1);
/// ```
pub trait CubeFileReader: Sized {
    /// Read from any buffered reader
    fn from_cube_reader<R: BufRead>(reader: R, format: &CubeFormat) -> Result<Self, CubeReadError>;

    /// Read from a string
    fn from_cube_string(text: &str, format: &CubeFormat) -> Result<Self, CubeReadError> {
        Self::from_cube_reader(text.as_bytes(), format)
    }

    /// Read from a file
    fn from_cube_file<P: AsRef<Path>>(path: P, format: &CubeFormat) -> Result<Self, CubeReadError> {
        Self::from_cube_reader(BufReader::new(File::open(path)?), format)
    }
}

impl CubeFileReader for Cover {
    fn from_cube_reader<R: BufRead>(reader: R, format: &CubeFormat) -> Result<Self, CubeReadError> {
        read_cover(reader, format)
    }
}
