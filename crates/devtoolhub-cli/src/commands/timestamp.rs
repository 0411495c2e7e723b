use devtoolhub_core::tools::timestamp::{self, Converted, Unit};

use crate::cli::{TimestampCommands, UnitArg};
use crate::error::CliError;

pub fn run_timestamp(command: TimestampCommands) -> Result<(), CliError> {
    let converted = match command {
        TimestampCommands::FromUnix {
            value,
            unit,
            offset,
        } => timestamp::from_unix(value, unit.into(), parse_offset(offset.as_deref())?)?,
        TimestampCommands::FromDate { text, offset } => {
            timestamp::from_datetime(&text, parse_offset(offset.as_deref())?)?
        }
        TimestampCommands::Now { offset } => timestamp::now(parse_offset(offset.as_deref())?),
    };
    for line in format_converted(&converted) {
        println!("{line}");
    }
    Ok(())
}

impl From<UnitArg> for Unit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Seconds => Self::Seconds,
            UnitArg::Milliseconds => Self::Milliseconds,
            UnitArg::Auto => Self::Auto,
        }
    }
}

fn parse_offset(offset: Option<&str>) -> Result<Option<chrono::FixedOffset>, CliError> {
    offset
        .map(timestamp::parse_offset)
        .transpose()
        .map_err(CliError::from)
}

pub fn format_converted(converted: &Converted) -> Vec<String> {
    vec![
        format!("seconds:      {}", converted.seconds),
        format!("milliseconds: {}", converted.milliseconds),
        format!("iso:          {}", converted.iso),
        format!("human:        {}", converted.human),
    ]
}
