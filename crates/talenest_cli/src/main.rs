//! CLI smoke entry point.
//!
//! # Responsibility
//! - Load config, start logging and open the configured database.
//! - Print per-table row counts as a quick wiring check.

use log::error;
use std::error::Error;
use std::process::ExitCode;
use talenest_core::{
    Chapter, ChapterRepository, Database, Entity, Repository, Status, StatusRepository, Tag,
    TagRepository, Tale, TaleRepository,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("talenest: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let app_dir = talenest_core::app_dir();
    let config = talenest_core::load_or_init(&app_dir)?;
    talenest_core::init_logging(&config.log_level, &config.log_dir)?;

    println!("talenest_core version={}", talenest_core::core_version());
    println!("sqlite_path={}", config.sqlite_path.display());

    let db = Database::open(&config.sqlite_path)?;
    print_count::<Status, _>(StatusRepository::try_new(&db)?)?;
    print_count::<Tag, _>(TagRepository::try_new(&db)?)?;
    print_count::<Tale, _>(TaleRepository::try_new(&db)?)?;
    print_count::<Chapter, _>(ChapterRepository::try_new(&db)?)?;
    db.close()?;
    Ok(())
}

fn print_count<E, R>(repo: R) -> Result<(), Box<dyn Error>>
where
    E: Entity,
    R: Repository<E>,
{
    let count = repo.read_all()?.len();
    repo.close()?;
    println!("{}={count}", E::TABLE);
    Ok(())
}
