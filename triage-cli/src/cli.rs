use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Offline symptom triage for community health workers
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(version, about = "Offline symptom triage for community health workers")]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON)
    #[arg(short, long, global = true, env = "TRIAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an assessment from a JSON file of inputs
    Assess {
        /// Assessment inputs (patientName, vitals, symptoms, notes); "-" reads stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Summary language: English, Tagalog or Cebuano
        #[arg(short, long)]
        language: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map symptom phrases to vocabulary ids
    Normalize {
        #[arg(required = true)]
        symptoms: Vec<String>,
    },

    /// Find vocabulary symptoms mentioned in free text
    Extract {
        text: String,
    },

    /// Search the symptom catalogue
    Symptoms {
        /// Keyword filter; omit to list everything grouped by letter
        query: Option<String>,
    },

    /// List models in the configured manifest
    Models {
        /// Copy every model into the local cache
        #[arg(long)]
        cache: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assess() {
        let cli = Cli::parse_from(["triage", "assess", "--input", "visit.json", "--language", "cebuano", "--json"]);
        match cli.command {
            Command::Assess { input, language, json } => {
                assert_eq!(input, PathBuf::from("visit.json"));
                assert_eq!(language.as_deref(), Some("cebuano"));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_normalize_requires_symptoms() {
        assert!(Cli::try_parse_from(["triage", "normalize"]).is_err());
    }
}
