use std::path::PathBuf;

use clap::Parser;
use fmap::logging::Verbosity;
use fmap::{Request, RequestedRange};

const LONG_ABOUT: &str = "\
Map FILE's memory and output its content to STDOUT.
If STDIN got ANY data, copy STDIN into the mapped memory instead.

The mapped region can be customized using OFFSET and SIZE
in order to map a file using [OFFSET; OFFSET+SIZE) memory range.

Effectively does the same as 'cat' but uses 'mmap' instead, which can
be used to interact with specific devices (like /dev/mem for example).";

#[derive(Parser, Debug)]
#[command(name = "fmap", version, about, long_about = LONG_ABOUT)]
pub(crate) struct CliArgs {
    /// Name of the file to map
    #[arg(value_name = "FILE")]
    pub(crate) file: PathBuf,

    /// OFFSET of the mapping in bytes; < 0 is relative to the end of FILE (regular files only)
    #[arg(
        short,
        long,
        value_name = "N",
        default_value = "0",
        value_parser = parse_int,
        allow_hyphen_values = true
    )]
    pub(crate) offset: i64,

    /// SIZE of the mapping in bytes; absent or < 0 maps up to the end of FILE (regular files only)
    #[arg(
        short,
        long,
        value_name = "N",
        value_parser = parse_int,
        allow_hyphen_values = true
    )]
    pub(crate) size: Option<i64>,

    /// Log level [DEBUG, INFO, WARN, ERROR]
    #[arg(short, long, value_name = "LEVEL", default_value_t = Verbosity::Warn)]
    pub(crate) verbose: Verbosity,
}

impl CliArgs {
    pub(crate) fn request(&self) -> Request {
        let range = RequestedRange::from_signed(self.offset, self.size.unwrap_or(-1));
        Request::new(&self.file, range)
    }
}

/// `strtol(s, _, 0)` notation: optional sign, then `0x` hex, leading `0` octal or decimal
fn parse_int(s: &str) -> Result<i64, String> {
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // from_str_radix would accept a second sign
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("'{s}': not an integer"));
    }

    let magnitude = u64::from_str_radix(digits, radix).map_err(|err| format!("'{s}': {err}"))?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    i64::try_from(value).map_err(|_| format!("'{s}': out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use fmap::Offset;

    #[test]
    fn test_parse_int_notations() {
        assert_eq!(parse_int("0"), Ok(0));
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("+42"), Ok(42));
        assert_eq!(parse_int("-100"), Ok(-100));
        assert_eq!(parse_int("0x1000"), Ok(4096));
        assert_eq!(parse_int("0XfEd00000"), Ok(0xfed0_0000));
        assert_eq!(parse_int("-0x10"), Ok(-16));
        assert_eq!(parse_int("010"), Ok(8));
        assert_eq!(parse_int("-9223372036854775808"), Ok(i64::MIN));
    }

    #[test]
    fn test_parse_int_rejects_garbage() {
        assert!(parse_int("").is_err());
        assert!(parse_int("-").is_err());
        assert!(parse_int("0x").is_err());
        assert!(parse_int("12k").is_err());
        assert!(parse_int("09").is_err());
        assert!(parse_int("--1").is_err());
        assert!(parse_int("9223372036854775808").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["fmap", "/dev/mem"]).unwrap();
        assert_eq!(args.offset, 0);
        assert_eq!(args.size, None);
        assert_eq!(args.verbose, Verbosity::Warn);

        let request = args.request();
        assert_eq!(request.path(), std::path::Path::new("/dev/mem"));
        assert_eq!(request.range().offset(), Offset::FromStart(0));
        assert_eq!(request.range().size(), None);
    }

    #[test]
    fn test_negative_offset_and_hex_size() {
        let args =
            CliArgs::try_parse_from(["fmap", "-o", "-100", "--size", "0x10", "-v", "DEBUG", "f"])
                .unwrap();
        assert_eq!(args.offset, -100);
        assert_eq!(args.size, Some(16));
        assert_eq!(args.verbose, Verbosity::Debug);
        assert_eq!(args.request().range(), RequestedRange::from_signed(-100, 16));
    }

    #[test]
    fn test_negative_size_means_whole_remainder() {
        let args = CliArgs::try_parse_from(["fmap", "-s", "-1", "f"]).unwrap();
        assert_eq!(args.request().range().size(), None);
    }

    #[test]
    fn test_argument_errors() {
        let err = CliArgs::try_parse_from(["fmap"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = CliArgs::try_parse_from(["fmap", "-o", "abc", "f"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = CliArgs::try_parse_from(["fmap", "-v", "LOUD", "f"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = CliArgs::try_parse_from(["fmap", "a", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_help_and_version_short_circuit() {
        let err = CliArgs::try_parse_from(["fmap", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = CliArgs::try_parse_from(["fmap", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }
}
