use chrono::{DateTime, Utc};
use devtoolhub_core::tools::cron::{self, CronFields, TEMPLATES};

use crate::cli::CronCommands;
use crate::error::CliError;

pub fn run_cron(command: CronCommands) -> Result<(), CliError> {
    match command {
        CronCommands::Next {
            expression,
            count,
            from,
        } => {
            let from = match from.as_deref() {
                Some(text) => DateTime::parse_from_rfc3339(text.trim())
                    .map_err(|error| CliError::Config(format!("Invalid --from instant: {error}")))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            if let Some(description) = cron::describe(&expression) {
                println!("{description}");
            }
            for run in cron::next_runs(&expression, from, count)? {
                println!("{}", run.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        CronCommands::Compose {
            minute,
            hour,
            day_of_month,
            month,
            day_of_week,
        } => {
            let expression = cron::compose(&CronFields {
                minute,
                hour,
                day_of_month,
                month,
                day_of_week,
            })?;
            println!("{expression}");
        }
        CronCommands::Templates => {
            for (expression, description) in TEMPLATES {
                println!("{expression:<12}  {description}");
            }
        }
    }
    Ok(())
}
