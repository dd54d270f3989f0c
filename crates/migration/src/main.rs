use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./insight.db?mode=rwc";
const USAGE: &str = "usage: migration [up [steps] | down [steps] | fresh | status]";

/// Schema action picked on the command line. `steps` limits how many
/// migrations are applied or reverted; `None` means all pending ones for
/// `up` and a single one for `down`.
enum Command {
    Up(Option<u32>),
    Down(Option<u32>),
    Fresh,
    Status,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let name = args.next().unwrap_or_else(|| "up".to_string());
        let steps = args
            .next()
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| format!("steps must be a whole number, got '{raw}'"))
            })
            .transpose()?;

        match (name.as_str(), steps) {
            ("up", steps) => Ok(Self::Up(steps)),
            ("down", steps) => Ok(Self::Down(steps.or(Some(1)))),
            ("fresh", None) => Ok(Self::Fresh),
            ("status", None) => Ok(Self::Status),
            (other, _) => Err(format!("unknown command '{other}'")),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(reason) => {
            eprintln!("{reason}\n{USAGE}");
            std::process::exit(2);
        }
    };

    // Same file the server opens with its default settings.
    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&url).await?;

    match command {
        Command::Up(steps) => migration::Migrator::up(&db, steps).await?,
        Command::Down(steps) => migration::Migrator::down(&db, steps).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        Command::parse(args.iter().map(|arg| ToString::to_string(arg)))
    }

    #[test]
    fn no_arguments_applies_everything() {
        assert!(matches!(parse(&[]), Ok(Command::Up(None))));
    }

    #[test]
    fn down_reverts_one_migration_unless_told_otherwise() {
        assert!(matches!(parse(&["down"]), Ok(Command::Down(Some(1)))));
        assert!(matches!(parse(&["down", "3"]), Ok(Command::Down(Some(3)))));
    }

    #[test]
    fn bad_arguments_are_refused() {
        assert!(parse(&["sideways"]).is_err());
        assert!(parse(&["up", "many"]).is_err());
        assert!(parse(&["status", "2"]).is_err());
    }
}
