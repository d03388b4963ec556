use clap::{Parser, Subcommand};
use marsfeed::models::PropertyFilter;

#[derive(Parser)]
#[command(name = "marsfeed")]
#[command(about = "Browse Mars real-estate listings from the Mars API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List properties matching a filter
    List {
        /// Filter to apply (all, rent, buy)
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Show the detail view of one property
    Show {
        /// Property id
        id: String,

        /// Filter used to look the property up (all, rent, buy)
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Apply filters one after another and print every published change
    Watch {
        /// Filters to apply in order (all, rent, buy)
        #[arg(short, long, num_args = 1.., default_values_t = vec!["rent".to_string(), "buy".to_string()])]
        filter: Vec<String>,
    },
}

impl Commands {
    pub fn parse_filter(filter: &str) -> Result<PropertyFilter, anyhow::Error> {
        filter.parse()
    }
}
