use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_wordgame::lexicon::{compress, DawgBuilder, LexiconLibrary, DICT_EXTENSION};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dict", version, about = "Build and query word game dictionaries")]
struct Cli {
    /// Directory holding `.dict` files.
    #[arg(long, env = "DICT_DIR", default_value = "dictionaries")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dictionaries in the directory.
    List,
    /// Look words up in a dictionary.
    Check {
        dictionary: String,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Find every word that can be made from some of the letters. A space
    /// or `?` stands for a blank.
    Anagrams {
        dictionary: String,
        letters: String,
        /// Only show words at least this long.
        #[arg(long, default_value_t = 2)]
        min: usize,
    },
    /// Compile a word list (one word per line) into a gzipped `.dict`.
    Compile {
        input: PathBuf,
        /// Output name; defaults to the input's file stem.
        #[arg(long)]
        name: Option<String>,
    },
    /// Print every word in a dictionary.
    Dump { dictionary: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let library = LexiconLibrary::new(&cli.dir);

    match cli.command {
        Commands::List => {
            for name in library.available()? {
                println!("{name}");
            }
        }
        Commands::Check { dictionary, words } => {
            let lexicon = library.load(&dictionary)?;
            for word in words {
                let found = lexicon.has_word(&word.to_uppercase());
                println!("{word}: {}", if found { "yes" } else { "no" });
            }
        }
        Commands::Anagrams { dictionary, letters, min } => {
            let lexicon = library.load(&dictionary)?;
            let letters = letters.to_uppercase().replace('?', " ");
            let mut found: Vec<_> = lexicon
                .find_anagrams(&letters)
                .into_iter()
                .filter(|(word, _)| word.chars().count() >= min)
                .collect();
            found.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
            for (word, tiles) in found {
                println!("{word}\t{tiles}");
            }
        }
        Commands::Compile { input, name } => {
            let text = std::fs::read_to_string(&input)?;
            let builder = DawgBuilder::from_words(text.lines().map(str::trim));
            let name = match name {
                Some(name) => name,
                None => input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .ok_or("input has no file name")?,
            };
            let bytes = compress(&builder.build())?;
            std::fs::create_dir_all(&cli.dir)?;
            let path = cli.dir.join(format!("{name}.{DICT_EXTENSION}"));
            std::fs::write(&path, &bytes)?;
            info!(words = builder.len(), path = %path.display(), "compiled dictionary");
            println!("{}", path.display());
        }
        Commands::Dump { dictionary } => {
            let lexicon = library.load(&dictionary)?;
            lexicon.walk(|word| println!("{word}"));
        }
    }
    Ok(())
}
