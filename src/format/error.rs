//! Error types for the cube text format

use std::fmt;
use std::io;

/// Errors in the content of a cube file
///
/// Every variant that can be tied to a place in the file carries the line it
/// was detected on, counting from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CubeFileError {
    /// A part ended with a number of literals other than the first cube had
    WrongBitCount {
        /// Line of the terminator
        line: usize,
        /// Terminator that ended the part
        terminator: char,
        /// Literals read before it
        read: usize,
        /// Literals expected
        expected: usize,
    },
    /// A character that is not a literal of the part being read
    InvalidCharacter {
        /// Line of the character
        line: usize,
        /// The offending character
        character: char,
    },
    /// More literals than expected before the terminator
    TooManyBits {
        /// Line of the extra literal
        line: usize,
        /// Terminator that was expected
        terminator: char,
        /// Literals expected
        expected: usize,
    },
    /// The file ended in the middle of a part
    UnexpectedEof {
        /// Last line of the file
        line: usize,
        /// Literals read
        read: usize,
        /// Literals expected
        expected: usize,
    },
    /// The last cube of the file has an input part only
    MissingOutputPart {
        /// Last line of the file
        line: usize,
    },
    /// The file holds no cube
    NoCubes,
    /// A read terminator outside ASCII, which no byte of the file can match
    NonAsciiTerminator {
        /// The configured terminator
        terminator: char,
    },
}

impl fmt::Display for CubeFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeFileError::WrongBitCount {
                line,
                terminator,
                read,
                expected,
            } => write!(
                f,
                "wrong number of bits on line {}: {:?} was reached after {} bits, {} were expected",
                line, terminator, read, expected
            ),
            CubeFileError::InvalidCharacter { line, character } => {
                write!(f, "invalid character {:?} on line {}", character, line)
            }
            CubeFileError::TooManyBits {
                line,
                terminator,
                expected,
            } => write!(
                f,
                "too many bits on line {}: {:?} not reached after {} bits",
                line, terminator, expected
            ),
            CubeFileError::UnexpectedEof {
                line,
                read,
                expected,
            } => write!(
                f,
                "end of file on line {} after {} bits, {} were expected",
                line, read, expected
            ),
            CubeFileError::MissingOutputPart { line } => {
                write!(f, "last cube of the file has no output part (line {})", line)
            }
            CubeFileError::NoCubes => write!(f, "no cube found in the file"),
            CubeFileError::NonAsciiTerminator { terminator } => {
                write!(f, "terminator {:?} is not an ASCII character", terminator)
            }
        }
    }
}

impl std::error::Error for CubeFileError {}

impl From<CubeFileError> for io::Error {
    fn from(err: CubeFileError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

/// Errors that can occur when reading a cube file
#[derive(Debug)]
pub enum CubeReadError {
    /// Malformed content
    Format(CubeFileError),
    /// IO error during reading
    Io(io::Error),
}

impl fmt::Display for CubeReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeReadError::Format(e) => write!(f, "cube format error: {}", e),
            CubeReadError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CubeReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CubeReadError::Format(e) => Some(e),
            CubeReadError::Io(e) => Some(e),
        }
    }
}

impl From<CubeFileError> for CubeReadError {
    fn from(err: CubeFileError) -> Self {
        CubeReadError::Format(err)
    }
}

impl From<io::Error> for CubeReadError {
    fn from(err: io::Error) -> Self {
        CubeReadError::Io(err)
    }
}

impl From<CubeReadError> for io::Error {
    fn from(err: CubeReadError) -> Self {
        match err {
            CubeReadError::Io(e) => e,
            CubeReadError::Format(e) => io::Error::new(io::ErrorKind::InvalidData, e),
        }
    }
}

/// Errors that can occur when writing a cube file
#[derive(Debug)]
pub enum CubeWriteError {
    /// IO error during writing
    Io(io::Error),
}

impl fmt::Display for CubeWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CubeWriteError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CubeWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CubeWriteError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for CubeWriteError {
    fn from(err: io::Error) -> Self {
        CubeWriteError::Io(err)
    }
}

impl From<CubeWriteError> for io::Error {
    fn from(err: CubeWriteError) -> Self {
        match err {
            CubeWriteError::Io(e) => e,
        }
    }
}
