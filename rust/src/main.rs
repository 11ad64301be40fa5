use std::env;
use std::fmt;
use std::io::{self, Write};
use std::process;

use tracing_subscriber::{EnvFilter, fmt as log_fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ucid::{
    RandomSource, TimestampPlacement, Ucid, UcidOptions, UcidOutput, generate, preset_names,
};

const HELP: &str = "\
ucid - customizable random ID generator

Usage: ucid [options]

Options:
  --uppercase[=true|false]    Include uppercase letters (A-Z)
  --lowercase[=true|false]    Include lowercase letters (a-z) (default: true)
  --numbers[=true|false]      Include numeric characters (0-9) (default: true)
  --no-numbers                Disable numeric characters
  --symbols[=true|false]      Include symbols (default: false)
  --octets=<number>           Number of ID segments (default: 4)
  --octetLength=<number>      Length of each segment (default: 8)
  --instances=<number>        Number of IDs to generate
  --octetSeparator=<text>     Separator between segments (default: \"-\"), alias --separator
  --octetFormat=<format>      Per-segment lengths, e.g. \"4-6-8\", alias --format
  --includeOnly=<chars>       Use only the provided characters
  --timestamp=<prefix|suffix> Include a timestamp in the ID
  --timestampFormat=<format>  Timestamp format (e.g. yyyy-mm-dd, unix, iso)
  --prefix=<text>             Prepend a string to the generated ID
  --suffix=<text>             Append a string to the generated ID
  --template=<tpl>            Template with %id and %ts placeholders
  --idFormat=<preset>         Use a named preset (uuid, nanoid, cuid, ...)
  --secure[=true|false]       Use OS secure randomness (default: true)
  --verbose                   Print each ID with its resolved options as JSON
  --list-presets              List preset names
  --help                      Show this help message

Examples:
  ucid --octets=3
  ucid --idFormat=uuid --instances=5
  ucid --template=\"user-%id-%ts\" --timestampFormat=yyyy-mm-dd

Logging: set UCID_LOG (e.g. UCID_LOG=debug) to log to stderr.
";

#[derive(Debug)]
enum CliAction {
    Help,
    ListPresets,
    Generate(UcidOptions),
}

#[derive(Debug, PartialEq)]
enum ArgError {
    Unknown(String),
    Invalid(String),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(flag) => write!(f, "Unknown option: {flag}"),
            Self::Invalid(msg) => f.write_str(msg),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("UCID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(log_fmt::layer().with_writer(io::stderr))
        .init();
}

fn parse_bool(key: &str, value: Option<&str>) -> Result<bool, ArgError> {
    match value {
        None | Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(ArgError::Invalid(format!("--{key} expects true or false"))),
    }
}

fn parse_count(key: &str, value: Option<&str>) -> Result<usize, ArgError> {
    let raw = require(key, value)?;
    raw.parse::<usize>()
        .map_err(|_| ArgError::Invalid(format!("invalid integer for --{key}")))
}

fn require<'a>(key: &str, value: Option<&'a str>) -> Result<&'a str, ArgError> {
    value.ok_or_else(|| ArgError::Invalid(format!("missing value for --{key}")))
}

fn parse_args(args: &[String]) -> Result<CliAction, ArgError> {
    let mut opts = UcidOptions::new();

    for arg in args {
        let Some(flag) = arg.strip_prefix("--") else {
            continue;
        };
        let (key, value) = match flag.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (flag.trim(), None),
        };

        match key {
            "help" => return Ok(CliAction::Help),
            "list-presets" => return Ok(CliAction::ListPresets),
            "uppercase" => opts.uppercase = Some(parse_bool(key, value)?),
            "lowercase" => opts.lowercase = Some(parse_bool(key, value)?),
            "numbers" => opts.digits = Some(parse_bool(key, value)?),
            "no-numbers" => opts.digits = Some(false),
            "symbols" => opts.symbols = Some(parse_bool(key, value)?),
            "verbose" => opts.verbose = Some(parse_bool(key, value)?),
            "secure" => {
                opts.random = Some(if parse_bool(key, value)? {
                    RandomSource::Secure
                } else {
                    RandomSource::Fast
                });
            }
            "octets" => opts.segment_count = Some(parse_count(key, value)?),
            "octetLength" => opts.segment_length = Some(parse_count(key, value)?),
            "instances" => opts.instances = Some(parse_count(key, value)?),
            "octetSeparator" | "separator" | "sep" => {
                opts.separator = Some(value.unwrap_or_default().to_string());
            }
            "octetFormat" | "format" => {
                opts.segment_format = Some(require(key, value)?.into());
            }
            "includeOnly" => opts.custom_charset = Some(require(key, value)?.to_string()),
            "timestamp" => {
                let raw = require(key, value)?;
                let placement = TimestampPlacement::parse(raw).ok_or_else(|| {
                    ArgError::Invalid("--timestamp must be one of: prefix, suffix, none".to_string())
                })?;
                opts.timestamp = Some(placement);
            }
            "timestampFormat" => opts.timestamp_format = Some(require(key, value)?.to_string()),
            "prefix" => opts.prefix = Some(value.unwrap_or_default().to_string()),
            "suffix" => opts.suffix = Some(value.unwrap_or_default().to_string()),
            "template" => opts.template = Some(require(key, value)?.to_string()),
            "idFormat" | "preset" => opts.preset = Some(require(key, value)?.to_string()),
            _ => return Err(ArgError::Unknown(format!("--{key}"))),
        }
    }

    Ok(CliAction::Generate(opts))
}

/// Writes the warning for `err` to `errout` and the usage text to `out`.
fn report_unknown(err: &ArgError, out: &mut impl Write, errout: &mut impl Write) -> io::Result<()> {
    writeln!(errout, "warning: {err}")?;
    writeln!(out, "{HELP}")
}

fn render(item: &Ucid) -> Result<String, String> {
    match item {
        Ucid::Plain(id) => Ok(id.clone()),
        Ucid::Verbose(record) => serde_json::to_string(record).map_err(|e| e.to_string()),
    }
}

fn run_generate(opts: &UcidOptions) -> Result<(), String> {
    match generate(opts).map_err(|e| e.to_string())? {
        Some(UcidOutput::Single(item)) => println!("{}", render(&item)?),
        Some(UcidOutput::Batch(items)) => {
            for item in &items {
                println!("{}", render(item)?);
            }
        }
        None => {}
    }
    Ok(())
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();

    let action = match parse_args(&args) {
        Ok(action) => action,
        Err(err @ ArgError::Unknown(_)) => {
            let _ = report_unknown(&err, &mut io::stdout(), &mut io::stderr());
            process::exit(1);
        }
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    let res = match action {
        CliAction::Help => {
            println!("{HELP}");
            Ok(())
        }
        CliAction::ListPresets => {
            for name in preset_names() {
                println!("{name}");
            }
            Ok(())
        }
        CliAction::Generate(opts) => run_generate(&opts),
    };

    if let Err(err) = res {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
