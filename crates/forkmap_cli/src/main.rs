//! `forkmap` command line front end.
//!
//! # Responsibility
//! - Load configuration, start logging and open the database.
//! - Map subcommands onto `forkmap_core` repositories and services.

use clap::{Parser, Subcommand};
use forkmap_core::db::open_db;
use forkmap_core::{
    init_logging, AppConfig, HttpPlaceResolver, ImportService, List,
    ListRepository, NewReview, Restaurant, RestaurantRepository, ReviewRepository,
    SqliteListRepository, SqliteRestaurantRepository, SqliteReviewRepository,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "forkmap")]
#[command(about = "Track restaurants, reviews and lists; import Google Takeout saved places")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides `database.path`)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import Takeout saved-places CSV files, one list per file
    Import {
        /// CSV files; each becomes (or extends) the list named after it
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show every restaurant with its rating
    Restaurants,

    /// Show lists, most recently extended first
    Lists,

    /// Show one list with its restaurants
    List {
        /// List id
        id: Uuid,
    },

    /// Add a review to a restaurant
    Review {
        /// Restaurant id
        restaurant_id: Uuid,

        /// Rating between 0 and 5
        rating: f64,

        /// Optional free-text comment
        #[arg(default_value = "")]
        comment: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    config.validate()?;
    init_logging(&config.logging)?;

    let conn = open_db(&config.database.path)?;
    let restaurants = SqliteRestaurantRepository::new(&conn);
    let lists = SqliteListRepository::new(&conn);

    match cli.command {
        Commands::Import { files } => {
            let resolver = HttpPlaceResolver::new(&config.import);
            let service = ImportService::new(restaurants, lists, resolver, config.import.clone());
            for summary in service.import_paths(&files)? {
                println!(
                    "{}: {} of {} places resolved ({} new, {} already known)",
                    summary.list_name,
                    summary.resolved,
                    summary.candidates,
                    summary.created,
                    summary.reused
                );
            }
        }
        Commands::Restaurants => {
            for restaurant in restaurants.get_all()? {
                print_restaurant(&restaurant);
            }
        }
        Commands::Lists => {
            for list in lists.get_all()? {
                print_list_header(&list);
            }
        }
        Commands::List { id } => match lists.get_by_id(id)? {
            Some(list) => {
                print_list_header(&list);
                if let Some(description) = list.description.as_deref() {
                    println!("  {description}");
                }
                for restaurant in &list.restaurants {
                    print!("  ");
                    print_restaurant(restaurant);
                }
            }
            None => return Err(format!("list {id} not found").into()),
        },
        Commands::Review {
            restaurant_id,
            rating,
            comment,
        } => {
            if restaurants.get_by_id(restaurant_id)?.is_none() {
                return Err(format!("restaurant {restaurant_id} not found").into());
            }
            let review = SqliteReviewRepository::new(&conn)
                .create(&NewReview::new(restaurant_id, rating, comment))?;
            info!("event=review_add module=cli status=ok review_id={}", review.id);
            println!("{}", review.id);
        }
    }
    Ok(())
}

fn print_restaurant(restaurant: &Restaurant) {
    println!(
        "{} {} {:.1} {} ({:.6}, {:.6})",
        restaurant.id,
        restaurant.icon,
        restaurant.rating,
        restaurant.name,
        restaurant.coordinates.latitude,
        restaurant.coordinates.longitude
    );
}

fn print_list_header(list: &List) {
    println!(
        "{} {} {} [{} restaurants]",
        list.id,
        list.icon,
        list.name,
        list.restaurants.len()
    );
}
